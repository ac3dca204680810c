use glam::Vec3;

use crate::field::{DoubleField, Field};

use super::Neighbors;

pub struct PressureParams<'a> {
    /// Divergence of the velocity field, in the first channel.
    pub divergence: &'a Field,
    /// Number of Jacobi sweeps. Runs exactly this many, with no convergence check.
    pub iterations: usize,
}

/// One Jacobi sweep of the pressure Poisson equation `∇²p = div`.
pub fn jacobi_sweep(divergence: &Field, pressure: &Field, target: &mut Field) {
    debug_assert_eq!(pressure.size(), target.size());
    debug_assert_eq!(divergence.size(), target.size());

    target.par_fill_with(|i, j| {
        let n = Neighbors::gather(pressure, i, j);
        let div = divergence.get(i, j).x;

        Vec3::new(0.25 * (n.left.x + n.right.x + n.bottom.x + n.top.x - div), 0.0, 0.0)
    });
}

/// Relaxes `pressure` towards the solution, swapping after every sweep. The result ends up on
/// the read side.
pub fn solve(params: &PressureParams, pressure: &mut DoubleField) {
    for _ in 0..params.iterations {
        let (read, write) = pressure.split();
        jacobi_sweep(params.divergence, read, write);
        pressure.swap();
    }
}

#[cfg(test)]
mod tests {
    use crate::field::ChannelLayout;

    use super::*;

    #[test]
    fn zero_divergence_is_a_fixed_point() {
        let divergence = Field::new(12, 10, ChannelLayout::R).unwrap();
        let mut pressure = DoubleField::new(12, 10, ChannelLayout::R).unwrap();

        for iterations in [1, 2, 10] {
            solve(&PressureParams { divergence: &divergence, iterations }, &mut pressure);
            assert!(pressure.read().is_zero());
        }
    }

    #[test]
    fn sweep_averages_neighbours_minus_divergence() {
        let mut divergence = Field::new(3, 3, ChannelLayout::R).unwrap();
        divergence.set(1, 1, Vec3::X * 2.0);

        let mut pressure = Field::new(3, 3, ChannelLayout::R).unwrap();
        pressure.set(0, 1, Vec3::X * 4.0);
        pressure.set(2, 1, Vec3::X * 8.0);

        let mut target = Field::new(3, 3, ChannelLayout::R).unwrap();
        jacobi_sweep(&divergence, &pressure, &mut target);

        assert_eq!(target.get(1, 1).x, 0.25 * (4.0 + 8.0 - 2.0));
        // (0, 0) clamps its left and bottom neighbours onto itself.
        assert_eq!(target.get(0, 0).x, 0.25 * 4.0);
    }

    #[test]
    fn each_sweep_consumes_the_previous_one() {
        let mut divergence = Field::new(5, 5, ChannelLayout::R).unwrap();
        divergence.set(2, 2, Vec3::X);

        let mut once = DoubleField::new(5, 5, ChannelLayout::R).unwrap();
        solve(&PressureParams { divergence: &divergence, iterations: 1 }, &mut once);
        let mut twice = once.clone();
        solve(&PressureParams { divergence: &divergence, iterations: 1 }, &mut twice);

        let mut direct = DoubleField::new(5, 5, ChannelLayout::R).unwrap();
        solve(&PressureParams { divergence: &divergence, iterations: 2 }, &mut direct);

        assert_eq!(direct.read().view(), twice.read().view());
        assert_ne!(once.read().view(), twice.read().view());
    }
}
