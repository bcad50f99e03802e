//! Dial-hervertalingen: pure functies van voortgang naar voortgang.

/// Beschikbare hervertaalcurves voor sequentie-entries.
///
/// Een curve-entry herleidt het effectieve dial-gewicht voor de stappen die
/// erna komen, steeds vanuit de oorspronkelijke topniveau-voortgang.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialCurve {
    /// Constante nul: schakelt volgende stappen uit.
    Zero,
    /// Constante één: volgende stappen op volle sterkte.
    One,
    /// Doorgeefluik.
    Linear,
    /// Kwadratische versnelling.
    Square,
    /// Kubische versnelling.
    Cube,
}

impl DialCurve {
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let curve = match name {
            "zero" => Self::Zero,
            "one" => Self::One,
            "linear" => Self::Linear,
            "square" => Self::Square,
            "cube" => Self::Cube,
            _ => return None,
        };
        Some(curve)
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::Linear => "linear",
            Self::Square => "square",
            Self::Cube => "cube",
        }
    }

    /// Pas de curve toe op een voortgangswaarde.
    #[must_use]
    pub fn apply(&self, progress: f64) -> f64 {
        match self {
            Self::Zero => 0.0,
            Self::One => 1.0,
            Self::Linear => progress,
            Self::Square => progress * progress,
            Self::Cube => progress * progress * progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DialCurve;

    #[test]
    fn curve_values() {
        assert_eq!(DialCurve::Zero.apply(0.7), 0.0);
        assert_eq!(DialCurve::One.apply(0.7), 1.0);
        assert_eq!(DialCurve::Linear.apply(0.7), 0.7);
        assert!((DialCurve::Square.apply(0.5) - 0.25).abs() < 1e-12);
        assert!((DialCurve::Cube.apply(0.5) - 0.125).abs() < 1e-12);
    }

    #[test]
    fn names_roundtrip() {
        for curve in [
            DialCurve::Zero,
            DialCurve::One,
            DialCurve::Linear,
            DialCurve::Square,
            DialCurve::Cube,
        ] {
            assert_eq!(DialCurve::parse(curve.name()), Some(curve));
        }
        assert_eq!(DialCurve::parse("bounce"), None);
    }
}
