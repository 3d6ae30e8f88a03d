use nalgebra::Vector3;

// ---------------------------------------------------------------------------
// Vector helpers with explicit degenerate policies
// ---------------------------------------------------------------------------
// nalgebra's normalize/angle panic or return NaN on near-zero input; steering
// code needs total functions, so the guarded forms live here.

/// Degenerate-safe normalization: near-zero vectors map to the zero vector.
pub fn normalized_or_zero(v: &Vector3<f64>) -> Vector3<f64> {
    let len = v.norm();
    if len <= 1e-10 {
        Vector3::zeros()
    } else {
        v / len
    }
}

/// Angle between two vectors in degrees, in [0, 180].
pub fn angle_deg(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let cos = normalized_or_zero(a).dot(&normalized_or_zero(b));
    cos.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Spherical linear interpolation between unit vectors.
///
/// Degenerates to `start` when the residual direction is near zero
/// (inputs nearly parallel or antiparallel).
pub fn slerp(start: &Vector3<f64>, end: &Vector3<f64>, factor: f64) -> Vector3<f64> {
    let dot = start.dot(end).clamp(-1.0, 1.0);
    let theta = dot.acos() * factor;

    let relative = end - start * dot;
    if relative.norm() < 1e-10 {
        return *start;
    }
    let relative = relative / relative.norm();

    start * theta.cos() + relative * theta.sin()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
