use bevy::{
    input::touch::{TouchInput, TouchPhase},
    prelude::*,
    window::{CursorMoved, PrimaryWindow, WindowResized},
};
use eddy_fluids::{FluidError, FrameDriver, StableFluidParams};

use crate::{
    stats::GridStats,
    surface::{dye_image, fit_to_window, spawn_dye_sprite, ImageSurface},
};

/// Runs the simulation in the primary window: resizes follow the window, the cursor and touches
/// stir the fluid, and one tick runs per frame.
pub struct FluidPlugin {
    pub params: StableFluidParams,
}

impl Plugin for FluidPlugin {
    fn build(&self, app: &mut App) {
        app
            .insert_resource(Simulation(FrameDriver::new(self.params.clone())))
            .add_systems(Startup, setup)
            .add_systems(Update, (
                (resize, fit_to_window),
                pointer,
                tick,
            ).chain());
    }
}

#[derive(Resource)]
pub struct Simulation(pub FrameDriver);

#[derive(Resource)]
struct DyeTexture(Handle<Image>);

fn setup(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    mut simulation: ResMut<Simulation>,
    mut exit: EventWriter<AppExit>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let window = windows.get_single().ok();
    let image = images.add(dye_image());

    spawn_dye_sprite(&mut commands, image.clone(), window);
    commands.insert_resource(DyeTexture(image));

    if let Some(window) = window {
        rebuild(&mut simulation.0, window.width(), window.height(), &mut exit);
    }
}

fn resize(
    mut events: EventReader<WindowResized>,
    mut simulation: ResMut<Simulation>,
    mut exit: EventWriter<AppExit>,
    windows: Query<(), With<PrimaryWindow>>,
) {
    if let Some(event) = events.read().filter(|e| windows.contains(e.window)).last() {
        rebuild(&mut simulation.0, event.width, event.height, &mut exit);
    }
}

fn rebuild(driver: &mut FrameDriver, width: f32, height: f32, exit: &mut EventWriter<AppExit>) {
    match driver.resize(width, height) {
        Ok(domain) => info!("window {width}x{height}, simulating {}x{}", domain.width, domain.height),
        // A minimized window; the previous domain stays live.
        Err(FluidError::DegenerateDomain { .. }) => {}
        Err(err @ FluidError::ResourceAllocation { .. }) => {
            error!("stopping: {err}");
            exit.send(AppExit::error());
        }
    }
}

fn pointer(
    mut cursor: EventReader<CursorMoved>,
    mut touches: EventReader<TouchInput>,
    mut simulation: ResMut<Simulation>,
) {
    for event in cursor.read() {
        simulation.0.pointer_moved(event.position.x, event.position.y);
    }

    for touch in touches.read().filter(|t| t.phase == TouchPhase::Moved) {
        simulation.0.pointer_moved(touch.position.x, touch.position.y);
    }
}

fn tick(
    mut simulation: ResMut<Simulation>,
    mut stats: ResMut<GridStats>,
    mut images: ResMut<Assets<Image>>,
    texture: Res<DyeTexture>,
) {
    let Some(image) = images.get_mut(&texture.0) else {
        return;
    };

    let driver = &mut simulation.0;
    driver
        .tick(&mut ImageSurface::new(image))
        .unwrap_or_else(|never| match never {});

    stats.size = driver.domain().map(|domain| domain.size());
    stats.frame = driver.tick_count();
}
