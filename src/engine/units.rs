//! Eenheidconversie: van ruwe parameterwaarden naar canonieke waarden
//! (pixels voor lengtes, radialen voor hoeken, ongewijzigd voor getallen).

use std::f32::consts::PI;

use super::memory::EngineMemory;
use super::viewport::Viewport;

/// Ondersteunde eenheden voor parameterwaarden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Pixels, de canonieke lengte-eenheid.
    Px,
    /// Inches (96 px).
    In,
    /// Pica's (16 px).
    Pc,
    /// Punten (4/3 px).
    Pt,
    /// Centimeters (96/2.54 px).
    Cm,
    /// Millimeters (96/25.4 px).
    Mm,
    /// Kwartmillimeters (96/101.6 px).
    Q,
    /// Honderdsten van de viewportbreedte.
    Vw,
    /// Honderdsten van de viewporthoogte.
    Vh,
    /// Honderdsten van de kleinste viewportdimensie.
    Vmin,
    /// Honderdsten van de grootste viewportdimensie.
    Vmax,
    /// Radialen, de canonieke hoekeenheid.
    Rad,
    /// Graden (π/180 rad).
    Deg,
    /// Decimale graden (π/200 rad).
    Grad,
    /// Omwentelingen (2π rad).
    Turn,
    /// Dimensieloos getal (schaalfactoren, rotatie-assen).
    Number,
}

impl Unit {
    /// Zoek een eenheid op aan de hand van de CSS-notatie.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        let unit = match tag {
            "px" => Self::Px,
            "in" => Self::In,
            "pc" => Self::Pc,
            "pt" => Self::Pt,
            "cm" => Self::Cm,
            "mm" => Self::Mm,
            "Q" | "q" => Self::Q,
            "vw" => Self::Vw,
            "vh" => Self::Vh,
            "vmin" => Self::Vmin,
            "vmax" => Self::Vmax,
            "rad" => Self::Rad,
            "deg" => Self::Deg,
            "grad" => Self::Grad,
            "turn" => Self::Turn,
            "number" | "" => Self::Number,
            _ => return None,
        };
        Some(unit)
    }

    /// De CSS-notatie van deze eenheid.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::In => "in",
            Self::Pc => "pc",
            Self::Pt => "pt",
            Self::Cm => "cm",
            Self::Mm => "mm",
            Self::Q => "Q",
            Self::Vw => "vw",
            Self::Vh => "vh",
            Self::Vmin => "vmin",
            Self::Vmax => "vmax",
            Self::Rad => "rad",
            Self::Deg => "deg",
            Self::Grad => "grad",
            Self::Turn => "turn",
            Self::Number => "number",
        }
    }

    /// Geeft aan of de conversiefactor van de viewport afhangt.
    #[must_use]
    pub fn is_viewport_relative(&self) -> bool {
        matches!(self, Self::Vw | Self::Vh | Self::Vmin | Self::Vmax)
    }

    /// De vermenigvuldigingsfactor van ruwe naar canonieke waarde.
    ///
    /// Constant voor alle eenheden behalve de vier viewport-relatieve,
    /// die de actuele viewportfactoren lezen.
    #[must_use]
    pub fn factor(&self, viewport: &Viewport) -> f32 {
        match self {
            Self::Px | Self::Rad | Self::Number => 1.0,
            Self::In => 96.0,
            Self::Pc => 16.0,
            Self::Pt => 4.0 / 3.0,
            Self::Cm => 96.0 / 2.54,
            Self::Mm => 96.0 / 25.4,
            Self::Q => 96.0 / 101.6,
            Self::Vw => viewport.vw(),
            Self::Vh => viewport.vh(),
            Self::Vmin => viewport.vmin(),
            Self::Vmax => viewport.vmax(),
            Self::Deg => PI / 180.0,
            Self::Grad => PI / 200.0,
            Self::Turn => PI * 2.0,
        }
    }
}

/// Schrijf `ruw × factor` in de canonieke cel van het parameter-slot.
///
/// Overschrijft precies één cel en is idempotent zolang de invoer gelijk
/// blijft.
pub fn convert(memory: &mut EngineMemory, slot: usize, factor: f32) {
    let canonical = memory.raw(slot) * factor;
    memory.write_canonical(slot, canonical);
}

#[cfg(test)]
mod tests {
    use super::{Unit, convert};
    use crate::engine::memory::{EngineMemory, MemoryLayout};
    use crate::engine::viewport::Viewport;

    const FIXED_UNITS: &[Unit] = &[
        Unit::Px,
        Unit::In,
        Unit::Pc,
        Unit::Pt,
        Unit::Cm,
        Unit::Mm,
        Unit::Q,
        Unit::Rad,
        Unit::Deg,
        Unit::Grad,
        Unit::Turn,
        Unit::Number,
    ];

    #[test]
    fn tags_roundtrip() {
        for unit in FIXED_UNITS {
            assert_eq!(Unit::parse(unit.tag()), Some(*unit));
        }
        assert_eq!(Unit::parse("vmin"), Some(Unit::Vmin));
        assert_eq!(Unit::parse("furlong"), None);
    }

    #[test]
    fn known_conversion_factors() {
        let viewport = Viewport::default();
        assert_eq!(Unit::In.factor(&viewport), 96.0);
        assert_eq!(Unit::Pc.factor(&viewport), 16.0);
        assert!((Unit::Pt.factor(&viewport) - 4.0 / 3.0).abs() < 1e-6);
        assert!((Unit::Cm.factor(&viewport) - 37.795_277).abs() < 1e-3);
        assert!((Unit::Deg.factor(&viewport) - 0.017_453_292).abs() < 1e-8);
        assert!((Unit::Turn.factor(&viewport) - 6.283_185_3).abs() < 1e-6);
    }

    #[test]
    fn viewport_units_track_live_factors() {
        let viewport = Viewport::new(1000.0, 500.0);
        assert_eq!(Unit::Vw.factor(&viewport), 10.0);
        assert_eq!(Unit::Vh.factor(&viewport), 5.0);
        assert_eq!(Unit::Vmin.factor(&viewport), 5.0);
        assert_eq!(Unit::Vmax.factor(&viewport), 10.0);
    }

    #[test]
    fn fixed_factor_conversion_is_linear() {
        let viewport = Viewport::default();
        let mut memory = EngineMemory::new(MemoryLayout::default()).unwrap();

        for unit in FIXED_UNITS {
            let factor = unit.factor(&viewport);
            memory.write_raw(0, 3.0);
            convert(&mut memory, 0, factor);
            let single = memory.canonical(0);

            memory.write_raw(0, 6.0);
            convert(&mut memory, 0, factor);
            let doubled = memory.canonical(0);

            assert!(
                (doubled - 2.0 * single).abs() <= f32::EPSILON * doubled.abs().max(1.0),
                "unit {} niet lineair",
                unit.tag()
            );
        }
    }

    #[test]
    fn convert_touches_only_the_canonical_cell() {
        let mut memory = EngineMemory::new(MemoryLayout::default()).unwrap();
        memory.write_raw(0, 2.0);
        memory.write_raw(1, 5.0);
        memory.write_canonical(1, 5.0);

        convert(&mut memory, 0, 96.0);

        assert_eq!(memory.raw(0), 2.0);
        assert_eq!(memory.canonical(0), 192.0);
        assert_eq!(memory.raw(1), 5.0);
        assert_eq!(memory.canonical(1), 5.0);
    }
}
