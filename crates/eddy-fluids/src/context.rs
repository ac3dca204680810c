use crate::{
    domain::SimulationDomain,
    error::FluidError,
    field::{ChannelLayout, DoubleField, Field},
    injector::Injector,
    pointer::PointerState,
    stable::{
        advection::{advect, AdvectionParams},
        divergence::{divergence, DivergenceParams},
        pressure::{self, PressureParams},
        projection::{subtract_gradient, ProjectionParams},
    },
};

/// All state of one simulation: the fields at the current domain resolution and the pointer.
///
/// Each pass method samples the read sides, writes a write side and swaps that field once.
#[derive(Debug, Clone)]
pub struct SimulationContext {
    domain: SimulationDomain,
    /// Velocity, in texels per time unit.
    pub velocity: DoubleField,
    /// Colour presented to the display.
    pub dye: DoubleField,
    pub pressure: DoubleField,
    /// Scratch field, only meaningful within the tick that computed it.
    pub divergence: Field,
    pub pointer: PointerState,
}

impl SimulationContext {
    /// Allocates zeroed fields for `domain`.
    pub fn new(domain: SimulationDomain, pointer: PointerState) -> Result<Self, FluidError> {
        let SimulationDomain { width, height } = domain;

        Ok(Self {
            domain,
            velocity: DoubleField::new(width, height, ChannelLayout::Rg)?,
            dye: DoubleField::new(width, height, ChannelLayout::Rgb)?,
            pressure: DoubleField::new(width, height, ChannelLayout::R)?,
            divergence: Field::new(width, height, ChannelLayout::R)?,
            pointer,
        })
    }

    #[inline]
    pub fn domain(&self) -> SimulationDomain {
        self.domain
    }

    pub fn inject(&mut self, injector: &Injector) -> bool {
        injector.inject(&self.pointer, &mut self.velocity, &mut self.dye)
    }

    pub fn compute_divergence(&mut self) {
        divergence(&DivergenceParams {
            velocity: self.velocity.read(),
        }, &mut self.divergence);
    }

    pub fn solve_pressure(&mut self, iterations: usize) {
        pressure::solve(&PressureParams {
            divergence: &self.divergence,
            iterations,
        }, &mut self.pressure);
    }

    pub fn project(&mut self) {
        let (velocity, target) = self.velocity.split();
        subtract_gradient(&ProjectionParams {
            velocity,
            pressure: self.pressure.read(),
        }, target);
        self.velocity.swap();
    }

    pub fn advect_velocity(&mut self, dt: f32) {
        let texel = self.domain.texel_size();
        let (velocity, target) = self.velocity.split();
        advect(&AdvectionParams {
            source: velocity,
            velocity,
            texel,
            dt,
        }, target);
        self.velocity.swap();
    }

    /// Transports the dye along the projected velocity of this tick. Must follow
    /// [`advect_velocity`](Self::advect_velocity), which leaves that field on the write side.
    pub fn advect_dye(&mut self, dt: f32) {
        let texel = self.domain.texel_size();
        let (dye, target) = self.dye.split();
        advect(&AdvectionParams {
            source: dye,
            velocity: self.velocity.previous(),
            texel,
            dt,
        }, target);
        self.dye.swap();
    }
}
