//! Entity events the host fires at a map view to drive the overlay.

use bevy::prelude::*;

/// Rebuilds the overlay unconditionally, regardless of `auto_refresh`.
/// Fire after mutating a view's `GeoBounds` outside the usual gestures.
#[derive(EntityEvent, Reflect)]
#[reflect(Event, FromReflect)]
pub struct RefreshScaleBar {
    #[event_target]
    pub view: Entity,
}

/// Fired by the host when a zoom gesture on the view settles.
#[derive(EntityEvent, Reflect)]
#[reflect(Event, FromReflect)]
pub struct ViewZoomEnd {
    #[event_target]
    pub view: Entity,
}

/// Fired by the host when a pan gesture on the view settles.
#[derive(EntityEvent, Reflect)]
#[reflect(Event, FromReflect)]
pub struct ViewPanEnd {
    #[event_target]
    pub view: Entity,
}

/// Fired by the host when the view is clicked.
#[derive(EntityEvent, Reflect)]
#[reflect(Event, FromReflect)]
pub struct ViewClick {
    #[event_target]
    pub view: Entity,
}
