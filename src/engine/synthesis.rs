//! Matrixsynthese per transformatiesoort, met het dial-gewicht direct in de
//! formule gesubstitueerd (geen interpolatie van matrixelementen).

use super::matrix::Mat4;

/// De ondersteunde transformatiesoorten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    Translate,
    Translate3d,
    TranslateX,
    TranslateY,
    TranslateZ,
    Rotate3d,
    RotateX,
    RotateY,
    RotateZ,
    Scale,
    Scale3d,
    ScaleX,
    ScaleY,
    ScaleZ,
    Skew,
    SkewX,
    SkewY,
}

impl TransformKind {
    /// Zoek een soort op aan de hand van de CSS-functienaam.
    /// `rotate` is een alias voor `rotateZ`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let kind = match name {
            "translate" => Self::Translate,
            "translate3d" => Self::Translate3d,
            "translateX" => Self::TranslateX,
            "translateY" => Self::TranslateY,
            "translateZ" => Self::TranslateZ,
            "rotate3d" => Self::Rotate3d,
            "rotateX" => Self::RotateX,
            "rotateY" => Self::RotateY,
            "rotateZ" | "rotate" => Self::RotateZ,
            "scale" => Self::Scale,
            "scale3d" => Self::Scale3d,
            "scaleX" => Self::ScaleX,
            "scaleY" => Self::ScaleY,
            "scaleZ" => Self::ScaleZ,
            "skew" => Self::Skew,
            "skewX" => Self::SkewX,
            "skewY" => Self::SkewY,
            _ => return None,
        };
        Some(kind)
    }

    /// De CSS-functienaam van deze soort.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Translate => "translate",
            Self::Translate3d => "translate3d",
            Self::TranslateX => "translateX",
            Self::TranslateY => "translateY",
            Self::TranslateZ => "translateZ",
            Self::Rotate3d => "rotate3d",
            Self::RotateX => "rotateX",
            Self::RotateY => "rotateY",
            Self::RotateZ => "rotateZ",
            Self::Scale => "scale",
            Self::Scale3d => "scale3d",
            Self::ScaleX => "scaleX",
            Self::ScaleY => "scaleY",
            Self::ScaleZ => "scaleZ",
            Self::Skew => "skew",
            Self::SkewX => "skewX",
            Self::SkewY => "skewY",
        }
    }

    /// Aantal operand-parameters dat deze soort leest.
    #[must_use]
    pub fn operand_count(&self) -> usize {
        match self {
            Self::TranslateX
            | Self::TranslateY
            | Self::TranslateZ
            | Self::RotateX
            | Self::RotateY
            | Self::RotateZ
            | Self::ScaleX
            | Self::ScaleY
            | Self::ScaleZ
            | Self::SkewX
            | Self::SkewY => 1,
            Self::Translate | Self::Scale | Self::Skew => 2,
            Self::Translate3d | Self::Scale3d => 3,
            Self::Rotate3d => 4,
        }
    }
}

fn translation(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::new([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        x, y, z, 1.0,
    ])
}

/// Rodrigues-rotatie rond de eenheidsas `(x, y, z)` over hoek `a`.
fn rotation(x: f32, y: f32, z: f32, a: f32) -> Mat4 {
    let s = a.sin();
    let c = a.cos();
    let t = 1.0 - c;

    Mat4::new([
        1.0 + t * (x * x - 1.0),
        -z * s + x * y * t,
        y * s + x * z * t,
        0.0,
        z * s + x * y * t,
        1.0 + t * (y * y - 1.0),
        -x * s + y * z * t,
        0.0,
        -y * s + x * z * t,
        x * s + y * z * t,
        1.0 + t * (z * z - 1.0),
        0.0,
        0.0,
        0.0,
        0.0,
        1.0,
    ])
}

fn scaling(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::new([
        x, 0.0, 0.0, 0.0, //
        0.0, y, 0.0, 0.0, //
        0.0, 0.0, z, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ])
}

fn skewing(tx: f32, ty: f32) -> Mat4 {
    Mat4::new([
        1.0, ty, 0.0, 0.0, //
        tx, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ])
}

/// Schaalfactor affien gemengd van 1 naar de doelwaarde.
fn blend(value: f32, dial: f32) -> f32 {
    1.0 + (value - 1.0) * dial
}

/// Synthetiseer de volledige 4×4 matrix voor een soort bij dial-gewicht
/// `dial` en canonieke operandwaarden `operands`.
///
/// Bij `dial = 0` levert elke soort de identiteitsmatrix op, bij `dial = 1`
/// de onverzwakte transformatie. Hoeken worden met `-dial` vermenigvuldigd
/// vóór de sinus/cosinus-evaluatie; een 3D-rotatieas van lengte nul wordt
/// als identiteitsrotatie behandeld in plaats van een NaN-matrix te
/// produceren.
#[must_use]
pub fn synthesize(kind: TransformKind, dial: f32, operands: &[f32]) -> Mat4 {
    debug_assert_eq!(operands.len(), kind.operand_count(), "operand-aantal klopt niet");

    let p = |lane: usize| operands.get(lane).copied().unwrap_or(0.0);

    match kind {
        TransformKind::Translate => translation(dial * p(0), dial * p(1), 0.0),
        TransformKind::Translate3d => translation(dial * p(0), dial * p(1), dial * p(2)),
        TransformKind::TranslateX => translation(dial * p(0), 0.0, 0.0),
        TransformKind::TranslateY => translation(0.0, dial * p(0), 0.0),
        TransformKind::TranslateZ => translation(0.0, 0.0, dial * p(0)),
        TransformKind::Rotate3d => {
            let (x, y, z) = (p(0), p(1), p(2));
            let a = p(3) * -dial;
            let norm = x.hypot(y).hypot(z);
            if norm == 0.0 {
                Mat4::IDENTITY
            } else {
                rotation(x / norm, y / norm, z / norm, a)
            }
        }
        TransformKind::RotateX => rotation(1.0, 0.0, 0.0, p(0) * -dial),
        TransformKind::RotateY => rotation(0.0, 1.0, 0.0, p(0) * -dial),
        TransformKind::RotateZ => rotation(0.0, 0.0, 1.0, p(0) * -dial),
        TransformKind::Scale => scaling(blend(p(0), dial), blend(p(1), dial), 1.0),
        TransformKind::Scale3d => {
            scaling(blend(p(0), dial), blend(p(1), dial), blend(p(2), dial))
        }
        TransformKind::ScaleX => scaling(blend(p(0), dial), 1.0, 1.0),
        TransformKind::ScaleY => scaling(1.0, blend(p(0), dial), 1.0),
        TransformKind::ScaleZ => scaling(1.0, 1.0, blend(p(0), dial)),
        TransformKind::Skew => skewing((p(0) * dial).tan(), (p(1) * dial).tan()),
        TransformKind::SkewX => skewing((p(0) * dial).tan(), 0.0),
        TransformKind::SkewY => skewing(0.0, (p(0) * dial).tan()),
    }
}

/// Alle soorten, voor registratie- en testdoeleinden.
pub const ALL_KINDS: &[TransformKind] = &[
    TransformKind::Translate,
    TransformKind::Translate3d,
    TransformKind::TranslateX,
    TransformKind::TranslateY,
    TransformKind::TranslateZ,
    TransformKind::Rotate3d,
    TransformKind::RotateX,
    TransformKind::RotateY,
    TransformKind::RotateZ,
    TransformKind::Scale,
    TransformKind::Scale3d,
    TransformKind::ScaleX,
    TransformKind::ScaleY,
    TransformKind::ScaleZ,
    TransformKind::Skew,
    TransformKind::SkewX,
    TransformKind::SkewY,
];

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    use super::{ALL_KINDS, TransformKind, synthesize};
    use crate::engine::matrix::Mat4;

    const EPSILON: f32 = 1e-6;

    fn sample_operands(kind: TransformKind) -> Vec<f32> {
        match kind {
            TransformKind::Rotate3d => vec![1.0, 2.0, 2.0, FRAC_PI_4],
            TransformKind::RotateX
            | TransformKind::RotateY
            | TransformKind::RotateZ
            | TransformKind::Skew
            | TransformKind::SkewX
            | TransformKind::SkewY => vec![FRAC_PI_4; kind.operand_count()],
            TransformKind::Scale
            | TransformKind::Scale3d
            | TransformKind::ScaleX
            | TransformKind::ScaleY
            | TransformKind::ScaleZ => vec![2.5; kind.operand_count()],
            _ => vec![40.0; kind.operand_count()],
        }
    }

    #[test]
    fn names_roundtrip() {
        for kind in ALL_KINDS {
            assert_eq!(TransformKind::parse(kind.name()), Some(*kind));
        }
        assert_eq!(TransformKind::parse("rotate"), Some(TransformKind::RotateZ));
        assert_eq!(TransformKind::parse("bend"), None);
    }

    #[test]
    fn dial_zero_yields_identity_for_every_kind() {
        for kind in ALL_KINDS {
            let operands = sample_operands(*kind);
            let matrix = synthesize(*kind, 0.0, &operands);
            assert!(
                matrix.approx_eq(&Mat4::IDENTITY, EPSILON),
                "{} is geen identiteit bij dial 0",
                kind.name()
            );
        }
    }

    #[test]
    fn translate_x_halfway() {
        let matrix = synthesize(TransformKind::TranslateX, 0.5, &[100.0]);
        let mut expected = Mat4::IDENTITY;
        expected.m[12] = 50.0;
        assert!(matrix.approx_eq(&expected, EPSILON));
    }

    #[test]
    fn rotate_z_quarter_turn_follows_negative_dial_convention() {
        let matrix = synthesize(TransformKind::RotateZ, 1.0, &[FRAC_PI_2]);
        let expected = Mat4::new([
            0.0, 1.0, 0.0, 0.0, //
            -1.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ]);
        assert!(matrix.approx_eq(&expected, EPSILON));
    }

    #[test]
    fn rotate3d_normalizes_its_axis() {
        // As (0, 0, 10) gedraagt zich als (0, 0, 1).
        let scaled_axis = synthesize(TransformKind::Rotate3d, 1.0, &[0.0, 0.0, 10.0, FRAC_PI_2]);
        let unit_axis = synthesize(TransformKind::RotateZ, 1.0, &[FRAC_PI_2]);
        assert!(scaled_axis.approx_eq(&unit_axis, EPSILON));
    }

    #[test]
    fn rotate3d_zero_axis_is_identity() {
        let matrix = synthesize(TransformKind::Rotate3d, 1.0, &[0.0, 0.0, 0.0, FRAC_PI_2]);
        assert!(matrix.approx_eq(&Mat4::IDENTITY, EPSILON));
    }

    #[test]
    fn scale_x_blends_affinely_toward_target() {
        let matrix = synthesize(TransformKind::ScaleX, 0.5, &[2.0]);
        assert!((matrix.m[0] - 1.5).abs() < EPSILON);

        let full = synthesize(TransformKind::ScaleX, 1.0, &[2.0]);
        assert!((full.m[0] - 2.0).abs() < EPSILON);
    }

    #[test]
    fn skew_applies_tangent_after_dial() {
        let matrix = synthesize(TransformKind::SkewX, 0.5, &[FRAC_PI_2]);
        let expected_tx = (FRAC_PI_2 * 0.5).tan();
        assert!((matrix.m[4] - expected_tx).abs() < EPSILON);

        let both = synthesize(TransformKind::Skew, 1.0, &[FRAC_PI_4, FRAC_PI_4]);
        assert!((both.m[4] - 1.0).abs() < EPSILON);
        assert!((both.m[1] - 1.0).abs() < EPSILON);
    }

    #[test]
    fn dial_one_matches_direct_construction() {
        let translate = synthesize(TransformKind::Translate3d, 1.0, &[10.0, 20.0, 30.0]);
        let mut expected = Mat4::IDENTITY;
        expected.m[12] = 10.0;
        expected.m[13] = 20.0;
        expected.m[14] = 30.0;
        assert!(translate.approx_eq(&expected, EPSILON));

        let scale = synthesize(TransformKind::Scale3d, 1.0, &[2.0, 3.0, 4.0]);
        let mut expected = Mat4::IDENTITY;
        expected.m[0] = 2.0;
        expected.m[5] = 3.0;
        expected.m[10] = 4.0;
        assert!(scale.approx_eq(&expected, EPSILON));

        let skew = synthesize(TransformKind::Skew, 1.0, &[FRAC_PI_4, 0.0]);
        let mut expected = Mat4::IDENTITY;
        expected.m[4] = FRAC_PI_4.tan();
        assert!(skew.approx_eq(&expected, EPSILON));
    }
}
