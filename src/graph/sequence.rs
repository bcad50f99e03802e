//! Sequenties: geordende lijsten van stappen en dial-hervertalingen die
//! samen één samengestelde, animeerbare transformatie vormen.

use super::dial::DialCurve;
use super::param::ParamId;
use super::step::StepId;

/// Identifier voor een sequentie.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Ord, PartialOrd)]
pub struct SequenceId(pub usize);

impl SequenceId {
    #[must_use]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }
}

/// Eén entry in de lijst van een sequentie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// Een transformatiestap die met het actuele effectieve dial-gewicht
    /// wordt gesynthetiseerd en in het product wordt opgenomen.
    Step(StepId),
    /// Een hervertaling die het effectieve dial-gewicht voor de volgende
    /// stappen opnieuw afleidt uit de topniveau-voortgang.
    Dial(DialCurve),
}

/// Sequentieknoop.
///
/// De entrylijst wordt altijd in zijn geheel vervangen; de oorsprong wordt
/// alleen bewaard voor de externe attach-stap en beïnvloedt de compositie
/// niet.
#[derive(Debug, Clone, Default)]
pub(crate) struct SequenceNode {
    pub entries: Vec<Entry>,
    pub progress: f64,
    pub origin: Option<[ParamId; 3]>,
    pub matrix: Option<String>,
}
