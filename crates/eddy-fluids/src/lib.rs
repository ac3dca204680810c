use std::convert::Infallible;

pub use context::SimulationContext;
pub use domain::SimulationDomain;
pub use driver::{FrameDriver, Phase};
pub use error::FluidError;
pub use field::{ChannelLayout, DoubleField, Field};
pub use injector::Injector;
pub use params::StableFluidParams;
pub use pointer::PointerState;

pub mod context;
pub mod domain;
pub mod driver;
pub mod error;
pub mod field;
pub mod injector;
pub mod params;
pub mod pointer;
pub mod stable;

/// Destination of the dye field at the end of every tick.
pub trait Surface {
    type Error;

    fn present(&mut self, dye: &Field) -> Result<(), Self::Error>;
}

impl<F: FnMut(&Field)> Surface for F {
    type Error = Infallible;

    fn present(&mut self, dye: &Field) -> Result<(), Self::Error> {
        self(dye);
        Ok(())
    }
}
