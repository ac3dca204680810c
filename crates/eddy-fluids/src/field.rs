use glam::{UVec2, Vec2, Vec3};
use ndarray::{Array3, ArrayView3, Axis, Zip};

use crate::error::FluidError;

/// Number and meaning of the channels stored per texel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelLayout {
    /// Scalar fields (pressure, divergence).
    R,
    /// 2D vectors (velocity).
    Rg,
    /// Colour (dye).
    Rgb,
}

impl ChannelLayout {
    #[inline]
    pub const fn channels(self) -> usize {
        match self {
            ChannelLayout::R => 1,
            ChannelLayout::Rg => 2,
            ChannelLayout::Rgb => 3,
        }
    }
}

/// A 2D grid of `f32` samples over the simulation domain.
///
/// Texels are addressed `(i, j)` with `i` growing to the right and `j` growing upwards, the
/// same orientation as texture UV space. Values are read and written as [`Vec3`]; channels the
/// layout does not store read as zero and are dropped on write.
#[derive(Debug, Clone)]
pub struct Field {
    /// Samples, indexed `[i, j, channel]`.
    data: Array3<f32>,
    layout: ChannelLayout,
    /// Size of the field, in texels.
    size: UVec2,
    /// `1.0 / size`.
    texel_size: Vec2,
}

impl Field {
    /// Allocates a zeroed field.
    pub fn new(width: u32, height: u32, layout: ChannelLayout) -> Result<Self, FluidError> {
        if width == 0 || height == 0 {
            return Err(FluidError::DegenerateDomain {
                width: width.into(),
                height: height.into(),
            });
        }

        let channels = layout.channels();
        let alloc_error = |reason: String| FluidError::ResourceAllocation {
            width,
            height,
            channels,
            reason,
        };

        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(channels))
            .ok_or_else(|| alloc_error("texel count overflows usize".to_string()))?;

        let mut samples = Vec::new();
        samples.try_reserve_exact(len).map_err(|e| alloc_error(e.to_string()))?;
        samples.resize(len, 0.0);

        let data = Array3::from_shape_vec((width as usize, height as usize, channels), samples)
            .map_err(|e| alloc_error(e.to_string()))?;

        let size = UVec2::new(width, height);

        Ok(Self {
            data,
            layout,
            size,
            texel_size: size.as_vec2().recip(),
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.size.y
    }

    #[inline]
    pub fn size(&self) -> UVec2 {
        self.size
    }

    #[inline]
    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    #[inline]
    pub fn texel_size(&self) -> Vec2 {
        self.texel_size
    }

    /// Raw samples, indexed `[i, j, channel]`.
    pub fn view(&self) -> ArrayView3<'_, f32> {
        self.data.view()
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Vec3 {
        let mut value = Vec3::ZERO;
        for c in 0..self.layout.channels() {
            value[c] = self.data[(i, j, c)];
        }
        value
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: Vec3) {
        for c in 0..self.layout.channels() {
            self.data[(i, j, c)] = value[c];
        }
    }

    /// Texel fetch with edge clamping: out-of-range indices read the nearest edge texel.
    #[inline]
    pub fn fetch(&self, i: isize, j: isize) -> Vec3 {
        let i = i.clamp(0, self.size.x as isize - 1) as usize;
        let j = j.clamp(0, self.size.y as isize - 1) as usize;
        self.get(i, j)
    }

    /// Bilinear sample at normalized coordinates. Positions outside the domain clamp to the
    /// nearest texel centre inside it.
    pub fn sample(&self, uv: Vec2) -> Vec3 {
        let max = (self.size - 1).as_vec2();
        let p = (uv * self.size.as_vec2() - 0.5).clamp(Vec2::ZERO, max);
        let p0 = p.floor();
        let t = p - p0;

        let i0 = p0.x as usize;
        let j0 = p0.y as usize;
        let i1 = (i0 + 1).min(self.size.x as usize - 1);
        let j1 = (j0 + 1).min(self.size.y as usize - 1);

        let bottom = mix(self.get(i0, j0), self.get(i1, j0), t.x);
        let top = mix(self.get(i0, j1), self.get(i1, j1), t.x);

        mix(bottom, top, t.y)
    }

    /// Normalized coordinates of the centre of texel `(i, j)`.
    #[inline]
    pub fn texel_center(&self, i: usize, j: usize) -> Vec2 {
        (Vec2::new(i as f32, j as f32) + 0.5) * self.texel_size
    }

    /// Overwrites every texel with `f(i, j)`. Texels are computed in parallel and the call
    /// returns once the whole field is written.
    pub(crate) fn par_fill_with<F>(&mut self, f: F)
    where
        F: Fn(usize, usize) -> Vec3 + Sync + Send,
    {
        let channels = self.layout.channels();

        Zip::indexed(self.data.lanes_mut(Axis(2))).par_for_each(|(i, j), mut texel| {
            let value = f(i, j);
            for c in 0..channels {
                texel[c] = value[c];
            }
        });
    }

    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|&v| v == 0.0)
    }

    /// Largest Euclidean norm of any texel.
    pub fn max_magnitude(&self) -> f32 {
        self.data
            .lanes(Axis(2))
            .into_iter()
            .map(|texel| texel.iter().map(|v| v * v).sum::<f32>().sqrt())
            .fold(0.0, f32::max)
    }

    /// Largest absolute value of any sample.
    pub fn max_abs(&self) -> f32 {
        self.data.iter().fold(0.0, |m, v| m.max(v.abs()))
    }

    /// Per-channel sum over the whole field.
    pub fn sum(&self) -> Vec3 {
        let mut total = Vec3::ZERO;
        for (c, lane) in self.data.axis_iter(Axis(2)).enumerate() {
            total[c] = lane.sum();
        }
        total
    }
}

/// Linear interpolation that reproduces `a` exactly when `a == b`.
#[inline]
fn mix(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// A ping-pong pair of same-shaped fields.
///
/// Passes sample [`read`](Self::read) and target [`write`](Self::write); [`swap`](Self::swap) is
/// called once after the pass so the next pass observes the result.
#[derive(Debug, Clone)]
pub struct DoubleField {
    read: Field,
    write: Field,
}

impl DoubleField {
    pub fn new(width: u32, height: u32, layout: ChannelLayout) -> Result<Self, FluidError> {
        Ok(Self {
            read: Field::new(width, height, layout)?,
            write: Field::new(width, height, layout)?,
        })
    }

    #[inline]
    pub fn read(&self) -> &Field {
        &self.read
    }

    #[inline]
    pub fn write(&mut self) -> &mut Field {
        &mut self.write
    }

    /// Mutable access to the read side, for seeding state.
    #[inline]
    pub fn read_mut(&mut self) -> &mut Field {
        &mut self.read
    }

    /// The write side. Right after a swap this is the field the last pass sampled.
    #[inline]
    pub fn previous(&self) -> &Field {
        &self.write
    }

    /// Borrows both sides for one pass.
    #[inline]
    pub fn split(&mut self) -> (&Field, &mut Field) {
        (&self.read, &mut self.write)
    }

    /// Exchanges the roles of the two fields. No samples are copied.
    #[inline]
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.read, &mut self.write);
    }

    #[inline]
    pub fn size(&self) -> UVec2 {
        self.read.size()
    }

    #[inline]
    pub fn texel_size(&self) -> Vec2 {
        self.read.texel_size()
    }

    #[inline]
    pub fn layout(&self) -> ChannelLayout {
        self.read.layout()
    }

    pub fn is_zero(&self) -> bool {
        self.read.is_zero() && self.write.is_zero()
    }
}
