use glam::{Vec2, Vec3};

use crate::field::Field;

pub struct AdvectionParams<'a> {
    /// Field being transported.
    pub source: &'a Field,
    /// Transporting velocity, in texels per time unit.
    pub velocity: &'a Field,
    /// Size of one texel in normalized coordinates.
    pub texel: Vec2,
    pub dt: f32,
}

/// Semi-Lagrangian advection: every texel traces back along the velocity for one timestep and
/// takes the bilinear, edge-clamped sample of the source found there.
pub fn advect(params: &AdvectionParams, target: &mut Field) {
    debug_assert_eq!(params.source.size(), target.size());
    debug_assert_eq!(params.velocity.size(), target.size());

    target.par_fill_with(|i, j| {
        let uv = (Vec2::new(i as f32, j as f32) + 0.5) * params.texel;
        let velocity = params.velocity.get(i, j).truncate();
        let departure = uv - params.dt * velocity * params.texel;

        params.source.sample(departure)
    });
}
