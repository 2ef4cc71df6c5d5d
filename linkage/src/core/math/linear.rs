use glam::{DMat2, DVec2};

/// Solves `m x = rhs` by Cramer's rule.
///
/// Returns `None` for a singular (or numerically non-finite) system.
pub fn solve_2x2(m: DMat2, rhs: DVec2) -> Option<DVec2> {
    let det = m.determinant();
    if det == 0.0 || !det.is_finite() {
        return None;
    }
    let x = DMat2::from_cols(rhs, m.y_axis).determinant() / det;
    let y = DMat2::from_cols(m.x_axis, rhs).determinant() / det;
    let solution = DVec2::new(x, y);
    solution.is_finite().then_some(solution)
}

/// A link expressed as a length and an absolute angle (radians).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkVector {
    pub length: f64,
    pub angle: f64,
}

impl LinkVector {
    pub fn new(length: f64, angle: f64) -> Self {
        Self { length, angle }
    }

    pub fn between(from: DVec2, to: DVec2) -> Self {
        let d = to - from;
        Self {
            length: d.length(),
            angle: d.y.atan2(d.x),
        }
    }

    /// Time derivative direction of the link vector per unit angular velocity.
    fn tangent(&self) -> DVec2 {
        let (sin, cos) = self.angle.sin_cos();
        DVec2::new(-sin, cos) * self.length
    }
}

/// Coupler and rocker angular velocities of a four-bar loop.
///
/// Joints A (driven pivot), B (crank tip), C (coupler/rocker pin) and
/// D (rocker pivot) close as `AB = AD + DC + CB`, so `crank` is A→B,
/// `coupler` is C→B and `rocker` is D→C. Differentiating with AD fixed gives
///
/// ```text
/// w3 r3 [-sin t3, cos t3] + w4 r4 [-sin t4, cos t4] = w2 r2 [-sin t2, cos t2]
/// ```
///
/// Returns `(w3, w4)`, or `None` at a toggle position where the system is singular.
pub fn four_bar_angular_velocities(
    crank: LinkVector,
    coupler: LinkVector,
    rocker: LinkVector,
    crank_omega: f64,
) -> Option<(f64, f64)> {
    let m = DMat2::from_cols(coupler.tangent(), rocker.tangent());
    let rhs = crank.tangent() * crank_omega;
    solve_2x2(m, rhs).map(|w| (w.x, w.y))
}
