use glam::{UVec2, Vec2};

use crate::error::FluidError;

/// Resolution shared by every field of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimulationDomain {
    pub width: u32,
    pub height: u32,
}

impl SimulationDomain {
    pub fn new(width: u32, height: u32) -> Result<Self, FluidError> {
        if width == 0 || height == 0 {
            return Err(FluidError::DegenerateDomain {
                width: width.into(),
                height: height.into(),
            });
        }

        Ok(Self { width, height })
    }

    /// The domain for a surface of the given size in pixels, scaled per axis.
    pub fn from_surface(surface: Vec2, scale: f32) -> Result<Self, FluidError> {
        let scaled = (surface * scale).floor();

        if !(scaled.x >= 1.0 && scaled.y >= 1.0) || scaled.x > u32::MAX as f32 || scaled.y > u32::MAX as f32 {
            return Err(FluidError::DegenerateDomain {
                width: scaled.x as i64,
                height: scaled.y as i64,
            });
        }

        Self::new(scaled.x as u32, scaled.y as u32)
    }

    #[inline]
    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    #[inline]
    pub fn texel_size(&self) -> Vec2 {
        self.size().as_vec2().recip()
    }

    #[inline]
    pub fn texels(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_is_scaled_down_per_axis() {
        let domain = SimulationDomain::from_surface(Vec2::new(1921.0, 1080.0), 0.5).unwrap();
        assert_eq!(domain.size(), UVec2::new(960, 540));
    }

    #[test]
    fn tiny_surface_is_degenerate() {
        let err = SimulationDomain::from_surface(Vec2::new(1.0, 600.0), 0.5).unwrap_err();
        assert_eq!(err, FluidError::DegenerateDomain { width: 0, height: 300 });
    }

    #[test]
    fn negative_surface_is_degenerate() {
        let err = SimulationDomain::from_surface(Vec2::new(-20.0, 10.0), 0.5).unwrap_err();
        assert_eq!(err, FluidError::DegenerateDomain { width: -10, height: 5 });
    }
}
