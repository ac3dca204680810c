use glam::Vec2;
use log::{error, info, trace, warn};

use crate::{
    context::SimulationContext,
    domain::SimulationDomain,
    error::FluidError,
    field::ChannelLayout,
    injector::Injector,
    params::StableFluidParams,
    Surface,
};

/// Where the driver is in its tick cycle.
///
/// `tick` borrows the driver for the whole cycle, so between calls the phase reads `Idle`. A
/// driver left in `Stepping` had its last tick cut short by a panic, and its fields may hold a
/// partially advanced state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    #[default]
    Idle,
    Stepping,
}

/// Owns the simulation and advances it once per display frame.
///
/// The driver starts without a domain: nothing is simulated and pointer input is dropped until
/// the first [`resize`](Self::resize) or [`rebuild_domain`](Self::rebuild_domain).
#[derive(Debug)]
pub struct FrameDriver {
    params: StableFluidParams,
    injector: Injector,
    context: Option<SimulationContext>,
    /// Size of the presentation surface in pixels, if known.
    surface: Option<Vec2>,
    phase: Phase,
    ticks: u64,
}

impl FrameDriver {
    pub fn new(params: StableFluidParams) -> Self {
        Self {
            injector: Injector::new(&params),
            params,
            context: None,
            surface: None,
            phase: Phase::Idle,
            ticks: 0,
        }
    }

    /// Rebuilds the domain for a surface of `width` x `height` pixels.
    ///
    /// A surface too small to yield a single texel is rejected and the current domain stays live.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<SimulationDomain, FluidError> {
        let surface = Vec2::new(width, height);
        let domain = SimulationDomain::from_surface(surface, self.params.resolution_scale)
            .inspect_err(|e| warn!("ignoring resize to {width}x{height}: {e}"))?;

        self.surface = Some(surface);
        self.rebuild(domain)
    }

    /// Rebuilds the domain at exactly `width` x `height` texels. Every field is recreated zeroed.
    pub fn rebuild_domain(&mut self, width: u32, height: u32) -> Result<SimulationDomain, FluidError> {
        let domain = SimulationDomain::new(width, height)
            .inspect_err(|e| warn!("ignoring domain rebuild: {e}"))?;

        self.rebuild(domain)
    }

    fn rebuild(&mut self, domain: SimulationDomain) -> Result<SimulationDomain, FluidError> {
        // Old fields are released before the new ones are allocated.
        let pointer = self.context.take().map(|context| context.pointer).unwrap_or_default();

        if domain.texels() > self.params.max_texels {
            let err = FluidError::ResourceAllocation {
                width: domain.width,
                height: domain.height,
                channels: ChannelLayout::Rgb.channels(),
                reason: format!("{} texels exceed the budget of {}", domain.texels(), self.params.max_texels),
            };
            error!("{err}");
            return Err(err);
        }

        let context = SimulationContext::new(domain, pointer).inspect_err(|e| error!("{e}"))?;
        self.context = Some(context);

        info!("simulation domain rebuilt at {}x{}", domain.width, domain.height);
        Ok(domain)
    }

    /// Drops every field. Input is ignored until the next rebuild.
    pub fn teardown(&mut self) {
        if self.context.take().is_some() {
            info!("simulation torn down after {} ticks", self.ticks);
        }
        self.phase = Phase::Idle;
    }

    /// Records pointer motion at surface pixel `(x, y)`, origin top-left.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        let Some(context) = self.context.as_mut() else {
            trace!("dropping pointer sample at ({x}, {y}): no simulation");
            return;
        };

        let surface = self.surface.unwrap_or_else(|| context.domain().size().as_vec2());
        context.pointer.record(Vec2::new(x, y), surface);
    }

    /// Runs one full simulation step and presents the dye to `surface`.
    ///
    /// Without a live domain this does nothing. The pointer's motion is consumed even when
    /// presenting fails.
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<(), S::Error> {
        let Some(context) = self.context.as_mut() else {
            return Ok(());
        };

        self.phase = Phase::Stepping;

        let injected = context.inject(&self.injector);
        context.compute_divergence();
        context.solve_pressure(self.params.pressure_iterations);
        context.project();
        context.advect_velocity(self.params.dt);
        context.advect_dye(self.params.dt);

        let presented = surface.present(context.dye.read());

        context.pointer.consume();
        self.phase = Phase::Idle;
        self.ticks += 1;

        trace!("tick {} done (injected: {injected})", self.ticks);
        presented
    }

    /// `Stepping` only after a tick that unwound before finishing.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of completed ticks since the driver was created.
    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    #[inline]
    pub fn params(&self) -> &StableFluidParams {
        &self.params
    }

    #[inline]
    pub fn context(&self) -> Option<&SimulationContext> {
        self.context.as_ref()
    }

    /// Mutable access to the simulation state, for seeding fields.
    #[inline]
    pub fn context_mut(&mut self) -> Option<&mut SimulationContext> {
        self.context.as_mut()
    }

    #[inline]
    pub fn domain(&self) -> Option<SimulationDomain> {
        self.context.as_ref().map(SimulationContext::domain)
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new(StableFluidParams::default())
    }
}

#[cfg(test)]
mod tests {
    use glam::UVec2;

    use crate::field::Field;

    use super::*;

    fn skip(_: &Field) {}

    #[test]
    fn resize_scales_the_surface() {
        let mut driver = FrameDriver::default();
        let domain = driver.resize(800.0, 601.0).unwrap();

        assert_eq!(domain.size(), UVec2::new(400, 300));
        assert_eq!(driver.context().unwrap().dye.size(), UVec2::new(400, 300));
    }

    #[test]
    fn degenerate_resize_keeps_the_domain() {
        let mut driver = FrameDriver::default();
        driver.resize(64.0, 32.0).unwrap();

        let err = driver.resize(1.0, 32.0).unwrap_err();

        assert_eq!(err, FluidError::DegenerateDomain { width: 0, height: 16 });
        assert_eq!(driver.domain().unwrap().size(), UVec2::new(32, 16));

        assert!(driver.rebuild_domain(0, 0).is_err());
        assert_eq!(driver.domain().unwrap().size(), UVec2::new(32, 16));
    }

    #[test]
    fn exceeding_the_texel_budget_tears_down() {
        let mut driver = FrameDriver::new(StableFluidParams {
            max_texels: 100,
            ..Default::default()
        });
        driver.rebuild_domain(10, 10).unwrap();

        let err = driver.rebuild_domain(11, 10).unwrap_err();

        assert!(matches!(err, FluidError::ResourceAllocation { width: 11, height: 10, .. }));
        assert!(driver.context().is_none());

        // Ticking and pointer input are no-ops until the next successful rebuild.
        driver.pointer_moved(1.0, 1.0);
        driver.tick(&mut skip).unwrap();
        assert_eq!(driver.tick_count(), 0);
    }

    #[test]
    fn input_before_initialisation_is_dropped() {
        let mut driver = FrameDriver::default();
        driver.pointer_moved(4.0, 4.0);
        driver.rebuild_domain(8, 8).unwrap();

        assert_eq!(driver.context().unwrap().pointer, Default::default());
    }

    #[test]
    fn input_after_teardown_is_dropped() {
        let mut driver = FrameDriver::default();
        driver.rebuild_domain(8, 8).unwrap();
        driver.teardown();
        driver.pointer_moved(4.0, 4.0);

        assert!(driver.context().is_none());
        assert_eq!(driver.phase(), Phase::Idle);
    }

    #[test]
    fn tick_consumes_the_pointer_and_returns_to_idle() {
        let mut driver = FrameDriver::default();
        driver.rebuild_domain(16, 16).unwrap();
        driver.pointer_moved(8.0, 8.0);
        driver.pointer_moved(9.0, 8.0);
        assert!(driver.context().unwrap().pointer.dirty);

        let mut presented = Vec::new();
        driver.tick(&mut |dye: &Field| presented.push(dye.size())).unwrap();

        assert_eq!(presented, [UVec2::new(16, 16)]);
        assert!(!driver.context().unwrap().pointer.dirty);
        assert_eq!(driver.phase(), Phase::Idle);
        assert_eq!(driver.tick_count(), 1);
    }

    #[test]
    fn pointer_survives_a_rebuild() {
        let mut driver = FrameDriver::default();
        driver.rebuild_domain(16, 16).unwrap();
        driver.pointer_moved(4.0, 12.0);
        driver.rebuild_domain(32, 32).unwrap();

        let pointer = driver.context().unwrap().pointer;
        assert_eq!(pointer.position, Vec2::new(0.25, 0.25));
    }

    #[test]
    fn interrupted_tick_stays_stepping() {
        use std::panic::{catch_unwind, AssertUnwindSafe};

        let mut driver = FrameDriver::default();
        driver.rebuild_domain(4, 4).unwrap();

        let result = catch_unwind(AssertUnwindSafe(|| {
            driver.tick(&mut |_: &Field| panic!("surface lost")).unwrap();
        }));

        assert!(result.is_err());
        assert_eq!(driver.phase(), Phase::Stepping);
        assert_eq!(driver.tick_count(), 0);

        driver.tick(&mut skip).unwrap();
        assert_eq!(driver.phase(), Phase::Idle);
    }

    #[test]
    fn presentation_errors_reach_the_caller() {
        struct Broken;

        impl Surface for Broken {
            type Error = &'static str;

            fn present(&mut self, _: &Field) -> Result<(), Self::Error> {
                Err("surface lost")
            }
        }

        let mut driver = FrameDriver::default();
        driver.rebuild_domain(4, 4).unwrap();

        assert_eq!(driver.tick(&mut Broken), Err("surface lost"));
        assert_eq!(driver.phase(), Phase::Idle);
    }
}
