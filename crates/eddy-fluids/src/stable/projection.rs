use glam::Vec3;

use crate::field::Field;

use super::Neighbors;

pub struct ProjectionParams<'a> {
    pub velocity: &'a Field,
    pub pressure: &'a Field,
}

/// Subtracts the central-difference pressure gradient from the velocity.
pub fn subtract_gradient(params: &ProjectionParams, target: &mut Field) {
    debug_assert_eq!(params.velocity.size(), target.size());
    debug_assert_eq!(params.pressure.size(), target.size());

    target.par_fill_with(|i, j| {
        let p = Neighbors::gather(params.pressure, i, j);
        let gradient = 0.5 * Vec3::new(p.right.x - p.left.x, p.top.x - p.bottom.x, 0.0);

        params.velocity.get(i, j) - gradient
    });
}

#[cfg(test)]
mod tests {
    use crate::field::ChannelLayout;

    use super::*;

    #[test]
    fn flat_pressure_leaves_velocity_untouched() {
        let mut velocity = Field::new(6, 4, ChannelLayout::Rg).unwrap();
        velocity.par_fill_with(|i, j| Vec3::new(i as f32, -(j as f32), 0.0));
        let mut pressure = Field::new(6, 4, ChannelLayout::R).unwrap();
        pressure.fill(7.0);

        let mut target = Field::new(6, 4, ChannelLayout::Rg).unwrap();
        subtract_gradient(&ProjectionParams { velocity: &velocity, pressure: &pressure }, &mut target);

        assert_eq!(target.view(), velocity.view());
    }

    #[test]
    fn linear_pressure_removes_a_constant_gradient() {
        let velocity = Field::new(6, 4, ChannelLayout::Rg).unwrap();
        let mut pressure = Field::new(6, 4, ChannelLayout::R).unwrap();
        pressure.par_fill_with(|i, j| Vec3::new(2.0 * i as f32 + j as f32, 0.0, 0.0));

        let mut target = Field::new(6, 4, ChannelLayout::Rg).unwrap();
        subtract_gradient(&ProjectionParams { velocity: &velocity, pressure: &pressure }, &mut target);

        assert_eq!(target.get(2, 1), Vec3::new(-2.0, -1.0, 0.0));
        // One-sided at the clamped corner.
        assert_eq!(target.get(0, 0), Vec3::new(-1.0, -0.5, 0.0));
    }
}
