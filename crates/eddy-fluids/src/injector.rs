use glam::{Vec2, Vec3};

use crate::{
    field::DoubleField,
    params::StableFluidParams,
    pointer::PointerState,
    stable::splat::{splat, SplatParams},
};

/// Turns pointer motion into velocity and dye splats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Injector {
    /// Splat radius, as a fraction of the domain height.
    pub radius: f32,
    /// Scale from pointer displacement to injected velocity.
    pub gain: f32,
    /// Colour added under the pointer.
    pub dye: Vec3,
}

impl Injector {
    pub fn new(params: &StableFluidParams) -> Self {
        Self {
            radius: params.splat_radius,
            gain: params.pointer_gain,
            dye: params.dye,
        }
    }

    /// Splats the pointer's motion into `velocity` and `dye`, swapping each right after its
    /// splat. Does nothing unless the pointer is dirty. Returns whether anything was injected.
    pub fn inject(&self, pointer: &PointerState, velocity: &mut DoubleField, dye: &mut DoubleField) -> bool {
        if !pointer.dirty {
            return false;
        }

        let size = velocity.size().as_vec2();
        let aspect = size.x / size.y;
        // Surface pixels grow downwards, the domain grows upwards.
        let impulse = self.gain * Vec2::new(pointer.delta.x, -pointer.delta.y);

        let (read, write) = velocity.split();
        splat(&SplatParams {
            source: read,
            point: pointer.position,
            value: impulse.extend(0.0),
            radius: self.radius,
            aspect,
        }, write);
        velocity.swap();

        let (read, write) = dye.split();
        splat(&SplatParams {
            source: read,
            point: pointer.position,
            value: self.dye,
            radius: self.radius,
            aspect,
        }, write);
        dye.swap();

        true
    }
}
