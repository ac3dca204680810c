use glam::{Vec2, Vec3};

use crate::field::Field;

pub struct SplatParams<'a> {
    /// Field the impulse is added to.
    pub source: &'a Field,
    /// Centre of the impulse, in normalized coordinates.
    pub point: Vec2,
    /// Value added at the centre.
    pub value: Vec3,
    /// Radius of the impulse, as a fraction of the domain height.
    pub radius: f32,
    /// Domain width over height.
    pub aspect: f32,
}

/// Weight of the impulse at `offset` (normalized coordinates) from its centre.
///
/// The x offset is stretched by `aspect` so the kernel is round in physical space on non-square
/// domains. The kernel is `(1 - d²/r²)³` inside the radius and zero outside.
#[inline]
pub fn falloff(offset: Vec2, radius: f32, aspect: f32) -> f32 {
    if radius <= 0.0 {
        return 0.0;
    }

    let d2 = Vec2::new(offset.x * aspect, offset.y).length_squared();
    let q = d2 / (radius * radius);

    if q >= 1.0 {
        0.0
    } else {
        let s = 1.0 - q;
        s * s * s
    }
}

/// Adds a radially decaying impulse to `source`, writing the result into `target`.
pub fn splat(params: &SplatParams, target: &mut Field) {
    debug_assert_eq!(params.source.size(), target.size());

    target.par_fill_with(|i, j| {
        let offset = params.source.texel_center(i, j) - params.point;
        params.source.get(i, j) + params.value * falloff(offset, params.radius, params.aspect)
    });
}
