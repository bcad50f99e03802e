//! Transformatiestappen: de koppeling tussen een soort, een dial-gewicht in
//! het stap-record en een geordende operandlijst.

use std::collections::BTreeSet;

use crate::engine::synthesis::TransformKind;

use super::param::ParamId;
use super::sequence::SequenceId;

/// Identifier voor een transformatiestap; de index verdubbelt als record-
/// adres in de staptabel (aparte teller, los van de parameteradressen).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Ord, PartialOrd)]
pub struct StepId(pub usize);

impl StepId {
    #[must_use]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }
}

/// Stapknoop met de sequenties die hem bevatten als abonnees.
#[derive(Debug, Clone)]
pub(crate) struct StepNode {
    pub kind: TransformKind,
    pub operands: Vec<ParamId>,
    pub subscribers: BTreeSet<SequenceId>,
}

impl StepNode {
    pub fn new(kind: TransformKind, operands: Vec<ParamId>) -> Self {
        debug_assert_eq!(operands.len(), kind.operand_count());
        Self {
            kind,
            operands,
            subscribers: BTreeSet::new(),
        }
    }
}
