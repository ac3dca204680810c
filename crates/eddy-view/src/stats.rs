use bevy::{diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin}, prelude::*};

const STATS_OVERLAY_ZINDEX: i32 = i32::MAX - 32;

/// One line of text in the top-left corner: frame rate, grid size and frame number. F1 hides it.
pub struct StatsOverlayPlugin;

impl Plugin for StatsOverlayPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<FrameTimeDiagnosticsPlugin>() {
            app.add_plugins(FrameTimeDiagnosticsPlugin);
        }

        app.init_resource::<GridStats>()
            .add_systems(Startup, setup)
            .add_systems(Update, (toggle_display, update_text));
    }
}

/// What the overlay reports about the grid being shown.
#[derive(Resource, Default)]
pub struct GridStats {
    pub size: Option<UVec2>,
    /// Simulation ticks, or the frame index when playing a recording back.
    pub frame: u64,
}

#[derive(Component)]
struct StatsText;

fn setup(mut commands: Commands) {
    commands.spawn((
        Text::default(),
        TextFont::from_font_size(20.0),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(8.0),
            top: Val::Px(8.0),
            ..default()
        },
        GlobalZIndex(STATS_OVERLAY_ZINDEX),
        StatsText,
    ));
}

fn update_text(
    diagnostic: Res<DiagnosticsStore>,
    stats: Res<GridStats>,
    mut query: Query<&mut Text, With<StatsText>>,
) {
    let fps = diagnostic
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
        .unwrap_or(0.0);

    let grid = match stats.size {
        Some(size) => format!("{}x{} grid, frame {}", size.x, size.y, stats.frame),
        None => "no grid".to_string(),
    };

    for mut text in &mut query {
        text.0 = format!("{fps:.1} fps | {grid}");
    }
}

fn toggle_display(
    keys: Res<ButtonInput<KeyCode>>,
    mut query: Query<&mut Visibility, With<StatsText>>,
) {
    if !keys.just_pressed(KeyCode::F1) {
        return;
    }

    for mut visibility in &mut query {
        *visibility = match *visibility {
            Visibility::Hidden => Visibility::Inherited,
            _ => Visibility::Hidden,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay_app() -> (App, Entity) {
        let mut app = App::new();
        app.init_resource::<DiagnosticsStore>()
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<GridStats>()
            .add_systems(Update, (toggle_display, update_text));

        let entity = app.world_mut().spawn((Text::default(), Visibility::Inherited, StatsText)).id();
        (app, entity)
    }

    #[test]
    fn text_reports_the_grid() {
        let (mut app, entity) = overlay_app();
        app.update();
        assert_eq!(app.world().get::<Text>(entity).unwrap().0, "0.0 fps | no grid");

        *app.world_mut().resource_mut::<GridStats>() = GridStats {
            size: Some(UVec2::new(320, 180)),
            frame: 7,
        };
        app.update();
        assert_eq!(app.world().get::<Text>(entity).unwrap().0, "0.0 fps | 320x180 grid, frame 7");
    }

    #[test]
    fn f1_toggles_the_overlay() {
        let (mut app, entity) = overlay_app();

        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().press(KeyCode::F1);
        app.update();
        assert_eq!(*app.world().get::<Visibility>(entity).unwrap(), Visibility::Hidden);

        let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keys.release(KeyCode::F1);
        keys.clear();
        keys.press(KeyCode::F1);
        app.update();
        assert_eq!(*app.world().get::<Visibility>(entity).unwrap(), Visibility::Inherited);
    }
}
