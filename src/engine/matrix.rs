use std::fmt::Write as _;

// ─────────────────────────────────────────────────────────────────────────────
// Mat4
// ─────────────────────────────────────────────────────────────────────────────

/// A 4×4 homogeneous transform matrix.
///
/// Entries are stored in the order they are written into the engine buffer
/// (row `p`, column `q` at index `4p + q`). CSS `matrix3d(...)` interprets
/// that same sequence column-major, which is why a translation ends up in
/// entries 12–14.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub m: [f32; 16],
}

impl Mat4 {
    /// Identity matrix.
    pub const IDENTITY: Self = Self {
        m: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    #[must_use]
    pub const fn new(m: [f32; 16]) -> Self {
        Self { m }
    }

    /// Row-by-column product `self × rhs`.
    ///
    /// With `self` the freshly synthesized step and `rhs` the running
    /// accumulator this pre-multiplies the newest step onto everything
    /// composed so far.
    #[must_use]
    pub fn multiplied(self, rhs: Self) -> Self {
        let mut out = [0.0_f32; 16];
        for p in 0..4 {
            for q in 0..4 {
                let mut sum = 0.0_f32;
                for r in 0..4 {
                    sum += self.m[4 * p + r] * rhs.m[4 * r + q];
                }
                out[4 * p + q] = sum;
            }
        }
        Self { m: out }
    }

    /// Serialize to the CSS `matrix3d(...)` literal: sixteen comma-separated
    /// values in storage order.
    #[must_use]
    pub fn to_matrix3d(&self) -> String {
        let mut out = String::with_capacity(16 * 10);
        out.push_str("matrix3d(");
        for (index, value) in self.m.iter().enumerate() {
            if index > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{value}");
        }
        out.push(')');
        out
    }

    /// Entry-wise comparison within `epsilon`.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}
