//! Observers and systems that keep the overlay synchronized with the view.
//!
//! All observers are registered exactly once by [`ScaleBarPlugin`]; reactive
//! rebuilds never register anything, so callbacks cannot accumulate across
//! refreshes. Gesture events are gated by `ScaleBarConfig::auto_refresh`,
//! while an explicit [`RefreshScaleBar`] always rebuilds.
//!
//! [`ScaleBarPlugin`]: crate::ScaleBarPlugin

use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

use crate::bounds::GeoBounds;
use crate::config::ScaleBarConfig;
use crate::events::{RefreshScaleBar, ViewClick, ViewPanEnd, ViewZoomEnd};
use crate::overlay::{ScaleBarArtifact, ScaleBarArtifacts, clear_overlay, rebuild_overlay};
use crate::placement::label_font_size;

/// Container height assumed when no primary window exists (headless hosts).
const FALLBACK_CONTAINER_HEIGHT_PX: f32 = 720.0;

fn container_height(windows: &Query<&Window, With<PrimaryWindow>>) -> f32 {
    windows
        .single()
        .map_or(FALLBACK_CONTAINER_HEIGHT_PX, Window::height)
}

fn refresh_view(
    view: Entity,
    gesture: bool,
    commands: &mut Commands,
    views: &Query<(&GeoBounds, &ScaleBarConfig)>,
    tagged: &Query<(Entity, &ScaleBarArtifact)>,
    windows: &Query<&Window, With<PrimaryWindow>>,
) {
    let Ok((bounds, config)) = views.get(view) else {
        return;
    };
    if gesture && !config.auto_refresh {
        return;
    }
    rebuild_overlay(
        commands,
        view,
        bounds,
        config,
        container_height(windows),
        tagged,
    );
}

/// Builds the initial overlay when a `ScaleBarConfig` lands on a view that
/// already carries `GeoBounds`.
pub(crate) fn on_config_added(
    add: On<Add, ScaleBarConfig>,
    mut commands: Commands,
    views: Query<(&GeoBounds, &ScaleBarConfig)>,
    tagged: Query<(Entity, &ScaleBarArtifact)>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    refresh_view(add.entity, false, &mut commands, &views, &tagged, &windows);
}

/// Tears the overlay down when the config is removed from its view.
pub(crate) fn on_config_removed(
    remove: On<Remove, ScaleBarConfig>,
    mut commands: Commands,
    tagged: Query<(Entity, &ScaleBarArtifact)>,
) {
    let view = remove.entity;
    clear_overlay(&mut commands, view, &tagged);
    if let Ok(mut entity) = commands.get_entity(view) {
        entity.remove::<ScaleBarArtifacts>();
    }
}

/// Observer for explicit refresh requests; ignores `auto_refresh`.
pub(crate) fn on_refresh(
    refresh: On<RefreshScaleBar>,
    mut commands: Commands,
    views: Query<(&GeoBounds, &ScaleBarConfig)>,
    tagged: Query<(Entity, &ScaleBarArtifact)>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    refresh_view(
        refresh.view,
        false,
        &mut commands,
        &views,
        &tagged,
        &windows,
    );
}

/// Observer for settled zoom gestures.
pub(crate) fn on_view_zoom_end(
    zoom: On<ViewZoomEnd>,
    mut commands: Commands,
    views: Query<(&GeoBounds, &ScaleBarConfig)>,
    tagged: Query<(Entity, &ScaleBarArtifact)>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    refresh_view(zoom.view, true, &mut commands, &views, &tagged, &windows);
}

/// Observer for settled pan gestures.
pub(crate) fn on_view_pan_end(
    pan: On<ViewPanEnd>,
    mut commands: Commands,
    views: Query<(&GeoBounds, &ScaleBarConfig)>,
    tagged: Query<(Entity, &ScaleBarArtifact)>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    refresh_view(pan.view, true, &mut commands, &views, &tagged, &windows);
}

/// Observer for view clicks.
pub(crate) fn on_view_click(
    click: On<ViewClick>,
    mut commands: Commands,
    views: Query<(&GeoBounds, &ScaleBarConfig)>,
    tagged: Query<(Entity, &ScaleBarArtifact)>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    refresh_view(click.view, true, &mut commands, &views, &tagged, &windows);
}

/// Rescales label fonts when the container resizes. Resize deliberately
/// touches only the font: the bar geometry depends on the view bounds, not on
/// the container size.
pub(crate) fn sync_label_font_on_resize(
    mut resized: MessageReader<WindowResized>,
    primary: Query<Entity, With<PrimaryWindow>>,
    mut labels: Query<&mut TextFont, With<ScaleBarArtifact>>,
) {
    // Rebuilds size from the primary window, so only its resizes apply here.
    let primary = primary.single().ok();
    let Some(resize) = resized
        .read()
        .filter(|resize| primary.is_none_or(|window| resize.window == window))
        .last()
    else {
        return;
    };
    let font_size = label_font_size(resize.height);
    for mut font in &mut labels {
        font.font_size = font_size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScaleBarPlugin;
    use crate::placement::ScaleAnchor;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(ScaleBarPlugin);
        app
    }

    fn spawn_view(app: &mut App, config: ScaleBarConfig) -> Entity {
        app.world_mut()
            .spawn((GeoBounds::new(30.0, 40.0, -100.0, -90.0), config))
            .id()
    }

    fn tagged_entities(app: &mut App, view: Entity) -> Vec<Entity> {
        let mut query = app.world_mut().query::<(Entity, &ScaleBarArtifact)>();
        let mut entities: Vec<Entity> = query
            .iter(app.world())
            .filter(|(_, tag)| tag.view == view)
            .map(|(entity, _)| entity)
            .collect();
        entities.sort();
        entities
    }

    #[test]
    fn config_insertion_builds_one_overlay_set() {
        let mut app = test_app();
        let view = spawn_view(&mut app, ScaleBarConfig::default());
        app.update();

        let tagged = tagged_entities(&mut app, view);
        assert_eq!(tagged.len(), 3);

        let artifacts = app.world().get::<ScaleBarArtifacts>(view).unwrap();
        assert!(tagged.contains(&artifacts.box_entity));
        assert!(tagged.contains(&artifacts.line_entity));
        assert!(tagged.contains(&artifacts.label_entity));
    }

    #[test]
    fn refresh_is_idempotent_with_fresh_handles() {
        let mut app = test_app();
        let view = spawn_view(&mut app, ScaleBarConfig::default());
        app.update();
        let before = tagged_entities(&mut app, view);

        app.world_mut().trigger(RefreshScaleBar { view });
        app.update();

        let after = tagged_entities(&mut app, view);
        assert_eq!(after.len(), 3);
        assert!(before.iter().all(|entity| !after.contains(entity)));
    }

    #[test]
    fn gesture_events_rebuild_when_auto_refresh_is_on() {
        let mut app = test_app();
        let view = spawn_view(&mut app, ScaleBarConfig::default());
        app.update();
        let before = tagged_entities(&mut app, view);

        app.world_mut().trigger(ViewPanEnd { view });
        app.update();

        let after = tagged_entities(&mut app, view);
        assert_eq!(after.len(), 3);
        assert!(before.iter().all(|entity| !after.contains(entity)));
    }

    #[test]
    fn gesture_events_are_ignored_when_auto_refresh_is_off() {
        let mut app = test_app();
        let view = spawn_view(
            &mut app,
            ScaleBarConfig {
                auto_refresh: false,
                ..default()
            },
        );
        app.update();
        let before = tagged_entities(&mut app, view);
        assert_eq!(before.len(), 3);

        app.world_mut().trigger(ViewZoomEnd { view });
        app.world_mut().trigger(ViewClick { view });
        app.update();

        assert_eq!(tagged_entities(&mut app, view), before);

        // An explicit refresh still works.
        app.world_mut().trigger(RefreshScaleBar { view });
        app.update();
        let after = tagged_entities(&mut app, view);
        assert_eq!(after.len(), 3);
        assert!(before.iter().all(|entity| !after.contains(entity)));
    }

    #[test]
    fn failed_argument_parse_leaves_the_overlay_untouched() {
        let mut app = test_app();
        let view = spawn_view(&mut app, ScaleBarConfig::default());
        app.update();
        let before = tagged_entities(&mut app, view);
        assert_eq!(before.len(), 3);

        // Validation rejects the arguments before any component could be
        // built, so there is nothing to insert and nothing to rebuild.
        let err = ScaleBarConfig::from_kwargs([("units", "xyz")]).unwrap_err();
        assert_eq!(err, crate::ScaleBarError::InvalidUnits("xyz".to_string()));
        app.update();

        assert_eq!(tagged_entities(&mut app, view), before);
        assert!(app.world().get::<ScaleBarArtifacts>(view).is_some());
    }

    #[test]
    fn removing_the_config_tears_the_overlay_down() {
        let mut app = test_app();
        let view = spawn_view(&mut app, ScaleBarConfig::default());
        app.update();
        assert_eq!(tagged_entities(&mut app, view).len(), 3);

        app.world_mut().entity_mut(view).remove::<ScaleBarConfig>();
        app.update();

        assert!(tagged_entities(&mut app, view).is_empty());
        assert!(app.world().get::<ScaleBarArtifacts>(view).is_none());
    }

    #[test]
    fn resize_updates_font_but_not_geometry() {
        let mut app = test_app();
        let view = spawn_view(&mut app, ScaleBarConfig::default());
        app.update();

        let artifacts = *app.world().get::<ScaleBarArtifacts>(view).unwrap();
        let label_transform_before = *app
            .world()
            .get::<Transform>(artifacts.label_entity)
            .unwrap();

        app.world_mut().write_message(WindowResized {
            window: Entity::PLACEHOLDER,
            width:  800.0,
            height: 600.0,
        });
        app.update();

        // Same entities, same geometry, new font size.
        let artifacts_after = *app.world().get::<ScaleBarArtifacts>(view).unwrap();
        assert_eq!(artifacts_after, artifacts);
        let font = app.world().get::<TextFont>(artifacts.label_entity).unwrap();
        assert!((font.font_size - label_font_size(600.0)).abs() < 1e-6);
        assert_eq!(
            *app.world()
                .get::<Transform>(artifacts.label_entity)
                .unwrap(),
            label_transform_before
        );
    }

    #[test]
    fn resize_of_a_non_primary_window_is_ignored() {
        let mut app = test_app();
        let primary = app
            .world_mut()
            .spawn((Window::default(), PrimaryWindow))
            .id();
        let view = spawn_view(&mut app, ScaleBarConfig::default());
        app.update();

        let artifacts = *app.world().get::<ScaleBarArtifacts>(view).unwrap();
        let before = app
            .world()
            .get::<TextFont>(artifacts.label_entity)
            .unwrap()
            .font_size;

        app.world_mut().write_message(WindowResized {
            window: Entity::PLACEHOLDER,
            width:  100.0,
            height: 100.0,
        });
        app.update();
        let font = app.world().get::<TextFont>(artifacts.label_entity).unwrap();
        assert_eq!(font.font_size, before);

        app.world_mut().write_message(WindowResized {
            window: primary,
            width:  800.0,
            height: 600.0,
        });
        app.update();
        let font = app.world().get::<TextFont>(artifacts.label_entity).unwrap();
        assert!((font.font_size - label_font_size(600.0)).abs() < 1e-6);
    }

    #[test]
    fn two_views_keep_independent_overlays() {
        let mut app = test_app();
        let left = spawn_view(&mut app, ScaleBarConfig::default());
        let right = spawn_view(
            &mut app,
            ScaleBarConfig {
                anchor: ScaleAnchor::NorthWest,
                ..default()
            },
        );
        app.update();
        let right_before = tagged_entities(&mut app, right);

        app.world_mut().trigger(RefreshScaleBar { view: left });
        app.update();

        assert_eq!(tagged_entities(&mut app, left).len(), 3);
        // The other view's artifacts were not disturbed.
        assert_eq!(tagged_entities(&mut app, right), right_before);
    }

    #[test]
    fn degenerate_bounds_still_produce_a_full_overlay() {
        let mut app = test_app();
        let view = app
            .world_mut()
            .spawn((
                GeoBounds::new(100.0, 120.0, 0.0, 10.0),
                ScaleBarConfig::default(),
            ))
            .id();
        app.update();
        assert_eq!(tagged_entities(&mut app, view).len(), 3);
    }
}
