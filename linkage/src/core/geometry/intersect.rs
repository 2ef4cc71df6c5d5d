use glam::DVec2;

/// Intersection points of two circles.
///
/// Returns `None` when the circles are disjoint, one contains the other, or
/// they share a center. A tangent pair yields the touching point twice.
pub fn circle_circle(c1: DVec2, r1: f64, c2: DVec2, r2: f64) -> Option<[DVec2; 2]> {
    let offset = c2 - c1;
    let d = offset.length();
    if d == 0.0 || d > r1 + r2 || d < (r1 - r2).abs() {
        return None;
    }

    let a = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    let h = (r1 * r1 - a * a).max(0.0).sqrt();
    let axis = offset / d;
    let mid = c1 + axis * a;
    let across = axis.perp() * h;
    Some([mid + across, mid - across])
}

/// Intersection of a circle with the line through `through` at `angle` radians.
///
/// The line is written as `y = m x + b` in coordinates centred on the circle
/// and substituted into the circle equation. Lines steeper than
/// `vertical_slope_limit`, or whose quadratic overflows, are solved for `y`
/// at the fixed `x` of `through` instead.
pub fn circle_line(
    center: DVec2,
    radius: f64,
    through: DVec2,
    angle: f64,
    vertical_slope_limit: f64,
) -> Option<[DVec2; 2]> {
    let m = angle.tan();
    if !m.is_finite() || m.abs() > vertical_slope_limit {
        return circle_vertical_line(center, radius, through.x);
    }

    let local = through - center;
    let b = local.y - m * local.x;
    let qa = 1.0 + m * m;
    // Quarter discriminant of qa x^2 + 2 m b x + (b^2 - r^2).
    let discriminant = qa * radius * radius - b * b;
    if !discriminant.is_finite() {
        return circle_vertical_line(center, radius, through.x);
    }
    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    let first = DVec2::new(-m * b + root, b + m * root) / qa;
    let second = DVec2::new(-m * b - root, b - m * root) / qa;
    Some([center + first, center + second])
}

fn circle_vertical_line(center: DVec2, radius: f64, x: f64) -> Option<[DVec2; 2]> {
    let dx = x - center.x;
    let remaining = radius * radius - dx * dx;
    if remaining.is_nan() || remaining < 0.0 {
        return None;
    }
    let dy = remaining.sqrt();
    Some([DVec2::new(x, center.y + dy), DVec2::new(x, center.y - dy)])
}

/// Candidate closest to `reference`; the first wins unless the second is strictly closer.
pub fn nearest(candidates: [DVec2; 2], reference: DVec2) -> DVec2 {
    let [first, second] = candidates;
    if second.distance_squared(reference) < first.distance_squared(reference) {
        second
    } else {
        first
    }
}
