//! Overlay artifact lifecycle: tagged despawn-then-spawn of box, baseline,
//! and label entities.

use bevy::math::DVec2;
use bevy::prelude::*;

use crate::bounds::GeoBounds;
use crate::config::ScaleBarConfig;
use crate::distance::ground_distance;
use crate::placement::{label_font_size, place};
use crate::scale::select_scale;

const BOX_FILL: Color = Color::srgba(1.0, 1.0, 1.0, 0.85);
const BASELINE_COLOR: Color = Color::BLACK;
const LABEL_COLOR: Color = Color::BLACK;

/// Baseline thickness as a fraction of the latitude extent.
const BASELINE_THICKNESS: f64 = 0.005;

// The overlay sits above the host's map content.
const BOX_Z: f32 = 10.0;
const BASELINE_Z: f32 = 10.5;
const LABEL_Z: f32 = 11.0;

/// Reserved tag carried by every overlay entity.
///
/// This is the discovery contract: rebuilds despawn exactly the entities
/// tagged for their view and touch nothing else, so external code may attach
/// its own children to the view freely, or remove a bar by despawning the
/// tagged entities itself.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component)]
pub struct ScaleBarArtifact {
    pub view: Entity,
}

/// Direct handles to the current overlay set, kept on the view entity.
/// Replaced wholesale on every rebuild; at most one set exists per view.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component)]
pub struct ScaleBarArtifacts {
    pub box_entity:   Entity,
    pub line_entity:  Entity,
    pub label_entity: Entity,
}

/// Center and size of the axis-aligned box polygon.
fn rect_center_size(polygon: &[DVec2; 4]) -> (DVec2, DVec2) {
    let [sw, _, ne, _] = *polygon;
    ((sw + ne) * 0.5, ne - sw)
}

/// Destroys the view's tagged overlay set, then creates a fresh box, baseline,
/// and label from the current bounds and config.
///
/// The whole sequence runs inside a single command batch within one handler
/// invocation, so no observer ever sees a half-rebuilt overlay.
pub(crate) fn rebuild_overlay(
    commands: &mut Commands,
    view: Entity,
    bounds: &GeoBounds,
    config: &ScaleBarConfig,
    container_height: f32,
    tagged: &Query<(Entity, &ScaleBarArtifact)>,
) {
    for (entity, tag) in tagged {
        if tag.view == view {
            commands.entity(entity).despawn();
        }
    }

    let distance = ground_distance(bounds);
    let spec = select_scale(distance, config.width_fraction, config.units);
    let placement = place(bounds, spec.distance_meters, config.anchor);

    debug!(
        "scale bar rebuild: view={view:?} anchor={:?} label=\"{}\" bar={}m",
        config.anchor,
        spec.label(),
        spec.distance_meters
    );

    let tag = ScaleBarArtifact { view };
    let lat_span = bounds.lat_span();

    let (box_center, box_size) = rect_center_size(&placement.box_polygon);
    let box_entity = commands
        .spawn((
            Sprite::from_color(BOX_FILL, box_size.as_vec2()),
            Transform::from_xyz(box_center.x as f32, box_center.y as f32, BOX_Z),
            tag,
        ))
        .id();

    let baseline_mid = (placement.baseline_start + placement.baseline_end) * 0.5;
    let baseline_len = (placement.baseline_end.x - placement.baseline_start.x).abs();
    let line_entity = commands
        .spawn((
            Sprite::from_color(
                BASELINE_COLOR,
                Vec2::new(baseline_len as f32, (BASELINE_THICKNESS * lat_span) as f32),
            ),
            Transform::from_xyz(baseline_mid.x as f32, baseline_mid.y as f32, BASELINE_Z),
            tag,
        ))
        .id();

    // Text renders at `font_size` logical pixels; scaling by degrees-per-pixel
    // keeps that size in the degree-based world.
    let degrees_per_pixel = (lat_span / f64::from(container_height)) as f32;
    let label_entity = commands
        .spawn((
            Text2d::new(spec.label()),
            TextFont {
                font_size: label_font_size(container_height),
                ..default()
            },
            TextColor(LABEL_COLOR),
            Transform::from_xyz(
                placement.label_position.x as f32,
                placement.label_position.y as f32,
                LABEL_Z,
            )
            .with_scale(Vec3::new(degrees_per_pixel, degrees_per_pixel, 1.0)),
            tag,
        ))
        .id();

    commands.entity(view).insert(ScaleBarArtifacts {
        box_entity,
        line_entity,
        label_entity,
    });
}

/// Destroys the view's tagged overlay set without creating a replacement.
pub(crate) fn clear_overlay(
    commands: &mut Commands,
    view: Entity,
    tagged: &Query<(Entity, &ScaleBarArtifact)>,
) {
    for (entity, tag) in tagged {
        if tag.view == view {
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_center_size_from_polygon() {
        let polygon = [
            DVec2::new(-1.0, 2.0),
            DVec2::new(3.0, 2.0),
            DVec2::new(3.0, 4.0),
            DVec2::new(-1.0, 4.0),
        ];
        let (center, size) = rect_center_size(&polygon);
        assert_eq!(center, DVec2::new(1.0, 3.0));
        assert_eq!(size, DVec2::new(4.0, 2.0));
    }
}
