//! Whole-field passes of the stable fluids solver.
//!
//! Every pass is a plain function over a typed parameter struct: it samples the fields the
//! parameters borrow and writes one target field. Swapping double-buffered targets is left to
//! the caller.

use glam::Vec3;

use crate::field::Field;

pub mod advection;
pub mod divergence;
pub mod pressure;
pub mod projection;
pub mod splat;

/// The four direct neighbours of a texel, edge-clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Neighbors {
    left: Vec3,
    right: Vec3,
    bottom: Vec3,
    top: Vec3,
}

impl Neighbors {
    #[inline]
    fn gather(field: &Field, i: usize, j: usize) -> Self {
        let (i, j) = (i as isize, j as isize);

        Self {
            left: field.fetch(i - 1, j),
            right: field.fetch(i + 1, j),
            bottom: field.fetch(i, j - 1),
            top: field.fetch(i, j + 1),
        }
    }
}
