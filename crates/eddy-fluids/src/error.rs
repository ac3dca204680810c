use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FluidError {
    /// A field could not be created. Fatal to the simulation: the driver drops every field
    /// before surfacing this to the host.
    #[error("failed to allocate a {width}x{height} field with {channels} channel(s): {reason}")]
    ResourceAllocation {
        width: u32,
        height: u32,
        channels: usize,
        reason: String,
    },
    /// The requested domain has no area. The last valid domain stays live.
    #[error("degenerate simulation domain {width}x{height}")]
    DegenerateDomain {
        width: i64,
        height: i64,
    },
}
