//! Minimal degree-based map view demonstrating `bevy_map_scale_bar`.
//!
//! - Arrow keys pan the view (fires `ViewPanEnd`)
//! - `+` / `-` zoom in and out (fires `ViewZoomEnd`)
//! - Left click refreshes the bar in place (fires `ViewClick`)
//! - `U` toggles metric/imperial, `A` cycles the anchor

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_map_scale_bar::prelude::*;

const START_BOUNDS: GeoBounds = GeoBounds::new(30.0, 40.0, -100.0, -90.0);
const PAN_STEP: f64 = 0.1;
const ZOOM_IN_FACTOR: f64 = 0.5;
const ZOOM_OUT_FACTOR: f64 = 2.0;
const LAND_COLOR: Color = Color::srgb(0.85, 0.80, 0.65);
const WATER_COLOR: Color = Color::srgb(0.55, 0.70, 0.85);
const HELP_FONT_SIZE: f32 = 13.0;

fn main() {
    App::new()
        .add_plugins((DefaultPlugins, ScaleBarPlugin))
        .add_systems(Startup, setup)
        .add_systems(Update, (handle_input, sync_camera_to_bounds).chain())
        .run();
}

fn setup(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Projection::from(OrthographicProjection {
            scale: START_BOUNDS.lat_span() as f32 / 720.0,
            ..OrthographicProjection::default_2d()
        }),
        Transform::from_xyz(
            START_BOUNDS.center_lon() as f32,
            START_BOUNDS.center_lat() as f32,
            0.0,
        ),
        START_BOUNDS,
        ScaleBarConfig::default(),
    ));

    // A sea of water with one rectangular continent, in degree coordinates.
    commands.spawn((
        Sprite::from_color(WATER_COLOR, Vec2::new(360.0, 180.0)),
        Transform::from_xyz(0.0, 0.0, -2.0),
    ));
    commands.spawn((
        Sprite::from_color(LAND_COLOR, Vec2::new(40.0, 25.0)),
        Transform::from_xyz(-98.0, 38.0, -1.0),
    ));

    commands.spawn((
        Text::new("arrows: pan   +/-: zoom   click: refresh   U: units   A: anchor"),
        TextFont {
            font_size: HELP_FONT_SIZE,
            ..default()
        },
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            top: Val::Px(10.0),
            ..default()
        },
    ));
}

fn zoom_about_center(bounds: &mut GeoBounds, factor: f64) {
    let half_lat = bounds.lat_span() * 0.5 * factor;
    let half_lon = bounds.lon_span() * 0.5 * factor;
    let (center_lat, center_lon) = (bounds.center_lat(), bounds.center_lon());
    *bounds = GeoBounds::new(
        center_lat - half_lat,
        center_lat + half_lat,
        center_lon - half_lon,
        center_lon + half_lon,
    );
}

fn next_anchor(anchor: ScaleAnchor) -> ScaleAnchor {
    match anchor {
        ScaleAnchor::SouthEast => ScaleAnchor::South,
        ScaleAnchor::South => ScaleAnchor::SouthWest,
        ScaleAnchor::SouthWest => ScaleAnchor::NorthWest,
        ScaleAnchor::NorthWest => ScaleAnchor::North,
        ScaleAnchor::North => ScaleAnchor::NorthEast,
        ScaleAnchor::NorthEast => ScaleAnchor::SouthEast,
    }
}

fn handle_input(
    keys: Res<ButtonInput<KeyCode>>,
    buttons: Res<ButtonInput<MouseButton>>,
    mut commands: Commands,
    mut views: Query<(Entity, &mut GeoBounds, &mut ScaleBarConfig)>,
) {
    let Ok((view, mut bounds, mut config)) = views.single_mut() else {
        return;
    };

    let lon_step = bounds.lon_span() * PAN_STEP;
    let lat_step = bounds.lat_span() * PAN_STEP;
    let mut panned = false;
    if keys.just_pressed(KeyCode::ArrowLeft) {
        bounds.lon_min -= lon_step;
        bounds.lon_max -= lon_step;
        panned = true;
    }
    if keys.just_pressed(KeyCode::ArrowRight) {
        bounds.lon_min += lon_step;
        bounds.lon_max += lon_step;
        panned = true;
    }
    if keys.just_pressed(KeyCode::ArrowDown) {
        bounds.lat_min -= lat_step;
        bounds.lat_max -= lat_step;
        panned = true;
    }
    if keys.just_pressed(KeyCode::ArrowUp) {
        bounds.lat_min += lat_step;
        bounds.lat_max += lat_step;
        panned = true;
    }
    if panned {
        commands.trigger(ViewPanEnd { view });
    }

    if keys.just_pressed(KeyCode::Equal) {
        zoom_about_center(&mut bounds, ZOOM_IN_FACTOR);
        commands.trigger(ViewZoomEnd { view });
    }
    if keys.just_pressed(KeyCode::Minus) {
        zoom_about_center(&mut bounds, ZOOM_OUT_FACTOR);
        commands.trigger(ViewZoomEnd { view });
    }

    if keys.just_pressed(KeyCode::KeyU) {
        config.units = match config.units {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        };
        commands.trigger(RefreshScaleBar { view });
    }
    if keys.just_pressed(KeyCode::KeyA) {
        config.anchor = next_anchor(config.anchor);
        commands.trigger(RefreshScaleBar { view });
    }

    if buttons.just_pressed(MouseButton::Left) {
        commands.trigger(ViewClick { view });
    }
}

fn sync_camera_to_bounds(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut cameras: Query<(&GeoBounds, &mut Transform, &mut Projection), With<Camera2d>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((bounds, mut transform, mut projection)) = cameras.single_mut() else {
        return;
    };
    transform.translation.x = bounds.center_lon() as f32;
    transform.translation.y = bounds.center_lat() as f32;
    if let Projection::Orthographic(ortho) = &mut *projection {
        ortho.scale = bounds.lat_span() as f32 / window.height();
    }
}
