use glam::Vec3;

use crate::field::Field;

use super::Neighbors;

pub struct DivergenceParams<'a> {
    pub velocity: &'a Field,
}

/// Central-difference divergence of `velocity`, written into the first channel of `target`.
pub fn divergence(params: &DivergenceParams, target: &mut Field) {
    debug_assert_eq!(params.velocity.size(), target.size());

    target.par_fill_with(|i, j| {
        let n = Neighbors::gather(params.velocity, i, j);
        Vec3::new(0.5 * (n.right.x - n.left.x + n.top.y - n.bottom.y), 0.0, 0.0)
    });
}

#[cfg(test)]
mod tests {
    use crate::field::ChannelLayout;

    use super::*;

    fn divergence_of(velocity: &Field) -> Field {
        let mut target = Field::new(velocity.width(), velocity.height(), ChannelLayout::R).unwrap();
        divergence(&DivergenceParams { velocity }, &mut target);
        target
    }

    #[test]
    fn uniform_velocity_is_divergence_free() {
        let mut velocity = Field::new(9, 6, ChannelLayout::Rg).unwrap();
        velocity.par_fill_with(|_, _| Vec3::new(3.5, -1.25, 0.0));

        assert!(divergence_of(&velocity).is_zero());
    }

    #[test]
    fn linear_expansion_has_unit_divergence_inside() {
        let mut velocity = Field::new(8, 8, ChannelLayout::Rg).unwrap();
        velocity.par_fill_with(|i, j| Vec3::new(0.5 * i as f32, 0.5 * j as f32, 0.0));

        let div = divergence_of(&velocity);

        for i in 1..7 {
            for j in 1..7 {
                assert_eq!(div.get(i, j).x, 1.0);
            }
        }

        // Clamped edges see only half the stencil on one side.
        assert_eq!(div.get(0, 3).x, 0.75);
    }
}
