use glam::DVec2;

/// Intersection of the parametric lines `p1 + t d1` and `p2 + s d2`.
///
/// Parallel directions have no unique intersection and return `None`.
pub fn intersect_lines(p1: DVec2, d1: DVec2, p2: DVec2, d2: DVec2) -> Option<DVec2> {
    let denominator = d1.perp_dot(d2);
    if denominator == 0.0 {
        return None;
    }
    let t = (p2 - p1).perp_dot(d2) / denominator;
    let point = p1 + d1 * t;
    point.is_finite().then_some(point)
}
