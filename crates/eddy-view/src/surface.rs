use std::convert::Infallible;

use bevy::{
    asset::RenderAssetUsages,
    image::ImageSampler,
    prelude::*,
    render::render_resource::{Extent3d, TextureDimension, TextureFormat},
    window::{PrimaryWindow, WindowResized},
};
use eddy_fluids::{Field, Surface};

/// The sprite the dye is drawn on. It always covers the whole window.
#[derive(Component)]
pub(crate) struct DyeSprite;

/// A blank texture for dye frames, resized on the first frame presented into it.
pub(crate) fn dye_image() -> Image {
    let mut image = Image::new_fill(
        Extent3d {
            width: 1,
            height: 1,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        &[0, 0, 0, 255],
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    );
    image.sampler = ImageSampler::linear();
    image
}

pub(crate) fn spawn_dye_sprite(commands: &mut Commands, image: Handle<Image>, window: Option<&Window>) {
    commands.spawn(Camera2d);
    commands.spawn((
        Sprite {
            image,
            custom_size: window.map(Window::size),
            ..default()
        },
        DyeSprite,
    ));
}

pub(crate) fn fit_to_window(
    mut events: EventReader<WindowResized>,
    windows: Query<(), With<PrimaryWindow>>,
    mut sprites: Query<&mut Sprite, With<DyeSprite>>,
) {
    let Some(event) = events.read().filter(|e| windows.contains(e.window)).last() else {
        return;
    };

    for mut sprite in &mut sprites {
        sprite.custom_size = Some(Vec2::new(event.width, event.height));
    }
}

/// Presents dye fields into a bevy image.
pub(crate) struct ImageSurface<'a> {
    image: &'a mut Image,
}

impl<'a> ImageSurface<'a> {
    pub(crate) fn new(image: &'a mut Image) -> Self {
        Self { image }
    }

    /// Writes a `width` x `height` frame whose colours are given by `texel(i, j)`, `j` growing
    /// upwards.
    pub(crate) fn write(&mut self, width: u32, height: u32, texel: impl Fn(usize, usize) -> Vec3) {
        let size = Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        if self.image.texture_descriptor.size != size {
            self.image.resize(size);
        }

        let pixels: &mut [[u8; 4]] = bytemuck::cast_slice_mut(&mut self.image.data);

        // Image rows run top to bottom.
        for (row, line) in pixels.chunks_exact_mut(width as usize).enumerate() {
            let j = height as usize - 1 - row;
            for (i, pixel) in line.iter_mut().enumerate() {
                *pixel = rgba8(texel(i, j));
            }
        }
    }
}

impl Surface for ImageSurface<'_> {
    type Error = Infallible;

    fn present(&mut self, dye: &Field) -> Result<(), Self::Error> {
        self.write(dye.width(), dye.height(), |i, j| dye.get(i, j));
        Ok(())
    }
}

fn rgba8(colour: Vec3) -> [u8; 4] {
    let [r, g, b] = (colour.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round().to_array();
    [r as u8, g as u8, b as u8, 255]
}

#[cfg(test)]
mod tests {
    use eddy_fluids::ChannelLayout;

    use super::*;

    #[test]
    fn colours_are_clamped() {
        assert_eq!(rgba8(Vec3::new(1.5, -0.2, 0.5)), [255, 0, 128, 255]);
    }

    #[test]
    fn dye_is_flipped_into_image_rows() {
        let mut dye = Field::new(2, 3, ChannelLayout::Rgb).unwrap();
        dye.set(0, 0, Vec3::X);
        dye.set(1, 2, Vec3::Z);

        let mut image = dye_image();
        ImageSurface::new(&mut image).present(&dye).unwrap();

        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 3);

        let pixels: &[[u8; 4]] = bytemuck::cast_slice(&image.data);
        // Top-right pixel is the top row of the domain, bottom-left the bottom row.
        assert_eq!(pixels[1], [0, 0, 255, 255]);
        assert_eq!(pixels[4], [255, 0, 0, 255]);
        assert_eq!(pixels[0], [0, 0, 0, 255]);
    }
}
