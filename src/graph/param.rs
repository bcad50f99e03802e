//! Bladparameters en daarvan afgeleide calc-knopen.

use std::collections::BTreeSet;

use crate::engine::units::Unit;

use super::Subscriber;

/// Identifier voor een parameter- of calc-knoop; de index verdubbelt als
/// slot-adres in de parametertabel.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Ord, PartialOrd)]
pub struct ParamId(pub usize);

impl ParamId {
    #[must_use]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }
}

/// Rekenkundige operaties voor calc-knopen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcOp {
    Add,
    Sub,
    Mul,
    Div,
    Sqrt,
    Min,
    Max,
}

impl CalcOp {
    /// Zoek een operatie op aan de hand van de korte naam.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let op = match name {
            "add" => Self::Add,
            "sub" => Self::Sub,
            "mul" => Self::Mul,
            "div" => Self::Div,
            "sqrt" => Self::Sqrt,
            "min" => Self::Min,
            "max" => Self::Max,
            _ => return None,
        };
        Some(op)
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Sqrt => "sqrt",
            Self::Min => "min",
            Self::Max => "max",
        }
    }

    /// Beschrijving van het verwachte operand-aantal, voor foutmeldingen.
    #[must_use]
    pub fn expected_arity(&self) -> &'static str {
        match self {
            Self::Sub | Self::Div => "precies 2",
            Self::Sqrt => "precies 1",
            Self::Add | Self::Mul | Self::Min | Self::Max => "minstens 1",
        }
    }

    /// Controleer of `count` operanden toegestaan zijn.
    #[must_use]
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Self::Sub | Self::Div => count == 2,
            Self::Sqrt => count == 1,
            Self::Add | Self::Mul | Self::Min | Self::Max => count >= 1,
        }
    }

    /// Pas de operatie toe op de canonieke operandwaarden.
    ///
    /// Delen door nul volgt de IEEE-754-semantiek en levert oneindig of
    /// NaN op; er wordt nooit afgebroken.
    #[must_use]
    pub fn apply(&self, values: &[f64]) -> f64 {
        match self {
            Self::Add => values.iter().sum(),
            Self::Sub => values[0] - values[1],
            Self::Mul => values.iter().product(),
            Self::Div => values[0] / values[1],
            Self::Sqrt => values[0].sqrt(),
            Self::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Self::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// De twee gedaanten van een parameterknoop.
#[derive(Debug, Clone)]
pub(crate) enum ParamKind {
    /// Bladinvoer: ruwe waarde plus eenheid.
    Leaf { raw: f64, unit: Unit },
    /// Afgeleide waarde: operatie over eerder aangemaakte knopen.
    /// De bedrading ligt vast na constructie.
    Calc { op: CalcOp, operands: Vec<ParamId> },
}

/// Parameterknoop met abonneeadministratie.
#[derive(Debug, Clone)]
pub(crate) struct ParamNode {
    pub kind: ParamKind,
    pub subscribers: BTreeSet<Subscriber>,
}

impl ParamNode {
    pub fn leaf(unit: Unit, raw: f64) -> Self {
        Self {
            kind: ParamKind::Leaf { raw, unit },
            subscribers: BTreeSet::new(),
        }
    }

    pub fn calc(op: CalcOp, operands: Vec<ParamId>) -> Self {
        Self {
            kind: ParamKind::Calc { op, operands },
            subscribers: BTreeSet::new(),
        }
    }
}
