use glam::Vec3;

/// Tunable constants of the solver and the injector.
#[derive(Debug, Clone, PartialEq)]
pub struct StableFluidParams {
    /// Jacobi sweeps per tick. There is no convergence check: this bounds the per-tick cost.
    pub pressure_iterations: usize,
    /// Advection timestep.
    pub dt: f32,
    /// Splat radius, as a fraction of the domain height.
    pub splat_radius: f32,
    /// Scale from pointer displacement (pixels) to injected velocity (texels per time unit).
    pub pointer_gain: f32,
    /// Colour injected under the pointer.
    pub dye: Vec3,
    /// Domain resolution relative to the surface, per axis.
    pub resolution_scale: f32,
    /// Largest number of texels a single field may hold.
    pub max_texels: usize,
}

impl Default for StableFluidParams {
    fn default() -> Self {
        Self {
            pressure_iterations: 10,
            dt: 1.0 / 60.0,
            splat_radius: 0.01,
            pointer_gain: 5.0,
            dye: Vec3::X,
            resolution_scale: 0.5,
            max_texels: 4096 * 4096,
        }
    }
}
