//! De reactieve afhankelijkheidsgraaf: blad- en calc-parameters,
//! transformatiestappen en sequenties, met abonneeadministratie.
//!
//! Alle knopen leven in arena's waarvan de indices als adressen dienen;
//! adressen worden nooit hergebruikt. Calc-knopen kunnen uitsluitend naar
//! eerder aangemaakte knopen verwijzen en hun bedrading ligt vast, zodat
//! cycli per constructie onmogelijk zijn.

pub mod dial;
pub mod param;
pub mod sequence;
pub mod step;

use crate::engine::synthesis::TransformKind;
use crate::engine::units::Unit;
use crate::engine::viewport::Viewport;

use param::{CalcOp, ParamId, ParamKind, ParamNode};
use sequence::{SequenceId, SequenceNode};
use step::{StepId, StepNode};

/// Abonnee van een parameterknoop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Subscriber {
    /// Een calc-knoop die deze parameter als operand gebruikt.
    Calc(ParamId),
    /// Een transformatiestap die deze parameter als operand gebruikt.
    Step(StepId),
}

/// Fouten bij het opbouwen of aanspreken van de graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("parameter {0} bestaat niet in de graph")]
    UnknownParameter(usize),
    #[error("transformatiestap {0} bestaat niet in de graph")]
    UnknownStep(usize),
    #[error("sequentie {0} bestaat niet in de graph")]
    UnknownSequence(usize),
    #[error("operatie `{op}` verwacht {expected} operand(en) maar kreeg er {got}")]
    OperandArity {
        op: &'static str,
        expected: &'static str,
        got: usize,
    },
    #[error("soort `{kind}` accepteert hoogstens {max} operand(en), kreeg er {got}")]
    TooManyOperands {
        kind: &'static str,
        max: usize,
        got: usize,
    },
    #[error("parameter {0} is een calc-knoop; alleen bladwaarden zijn toewijsbaar")]
    NotALeaf(usize),
    #[error("de {table} is vol ({capacity} records)")]
    TableFull {
        table: &'static str,
        capacity: usize,
    },
}

/// Arena-opslag voor alle knopen.
#[derive(Debug, Clone, Default)]
pub(crate) struct TransformGraph {
    pub params: Vec<ParamNode>,
    pub steps: Vec<StepNode>,
    pub sequences: Vec<SequenceNode>,
}

impl TransformGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_leaf(&mut self, unit: Unit, raw: f64) -> ParamId {
        let id = ParamId::new(self.params.len());
        self.params.push(ParamNode::leaf(unit, raw));
        id
    }

    pub fn add_calc(&mut self, op: CalcOp, operands: Vec<ParamId>) -> ParamId {
        let id = ParamId::new(self.params.len());
        self.params.push(ParamNode::calc(op, operands));
        id
    }

    pub fn add_step(&mut self, kind: TransformKind, operands: Vec<ParamId>) -> StepId {
        let id = StepId::new(self.steps.len());
        self.steps.push(StepNode::new(kind, operands));
        id
    }

    pub fn add_sequence(&mut self) -> SequenceId {
        let id = SequenceId::new(self.sequences.len());
        self.sequences.push(SequenceNode::default());
        id
    }

    pub fn param(&self, id: ParamId) -> Result<&ParamNode, GraphError> {
        self.params.get(id.0).ok_or(GraphError::UnknownParameter(id.0))
    }

    pub fn param_mut(&mut self, id: ParamId) -> Result<&mut ParamNode, GraphError> {
        self.params
            .get_mut(id.0)
            .ok_or(GraphError::UnknownParameter(id.0))
    }

    pub fn step(&self, id: StepId) -> Result<&StepNode, GraphError> {
        self.steps.get(id.0).ok_or(GraphError::UnknownStep(id.0))
    }

    pub fn step_mut(&mut self, id: StepId) -> Result<&mut StepNode, GraphError> {
        self.steps.get_mut(id.0).ok_or(GraphError::UnknownStep(id.0))
    }

    pub fn sequence(&self, id: SequenceId) -> Result<&SequenceNode, GraphError> {
        self.sequences
            .get(id.0)
            .ok_or(GraphError::UnknownSequence(id.0))
    }

    pub fn sequence_mut(&mut self, id: SequenceId) -> Result<&mut SequenceNode, GraphError> {
        self.sequences
            .get_mut(id.0)
            .ok_or(GraphError::UnknownSequence(id.0))
    }

    /// Canonieke waarde van een knoop: blad × eenheidsfactor, of de
    /// operatie toegepast op de canonieke operandwaarden (op aanvraag,
    /// zonder aparte cache naast de geheugencel).
    pub fn canonical(&self, id: ParamId, viewport: &Viewport) -> f64 {
        match &self.params[id.0].kind {
            ParamKind::Leaf { raw, unit } => raw * f64::from(unit.factor(viewport)),
            ParamKind::Calc { op, operands } => {
                let values: Vec<f64> = operands
                    .iter()
                    .map(|operand| self.canonical(*operand, viewport))
                    .collect();
                op.apply(&values)
            }
        }
    }
}
