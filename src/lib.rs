// bevy_map_scale_bar
// Scale bar overlay plugin for 2D geographic map views providing:
// - Nice-number distance/unit selection at the view's center latitude
// - Anchor-based placement of box, baseline, and label
// - Reactive rebuild on zoom/pan/click, font-only update on resize

use bevy::prelude::*;
use bevy::window::WindowResized;

mod bounds;
mod config;
mod controller;
mod distance;
mod events;
mod overlay;
mod placement;
pub mod prelude;
mod scale;

// Public API - Events
pub use events::RefreshScaleBar;
pub use events::ViewClick;
pub use events::ViewPanEnd;
pub use events::ViewZoomEnd;

// Public API - View-side components
pub use bounds::GeoBounds;
pub use config::ScaleBarConfig;
pub use config::ScaleBarError;

// Public API - Overlay artifacts (for querying)
pub use overlay::ScaleBarArtifact;
pub use overlay::ScaleBarArtifacts;

// Public API - Core pipeline types and functions
pub use config::clamp_width_fraction;
pub use distance::EARTH_RADIUS_M;
pub use distance::ground_distance;
pub use placement::Placement;
pub use placement::ScaleAnchor;
pub use placement::label_font_size;
pub use placement::place;
pub use scale::ScaleSpec;
pub use scale::UnitSystem;
pub use scale::nice_round;
pub use scale::select_scale;

// Internal - used by plugin, not for external use
use controller::{
    on_config_added, on_config_removed, on_refresh, on_view_click, on_view_pan_end,
    on_view_zoom_end, sync_label_font_on_resize,
};

/// Plugin that adds the scale bar overlay functionality.
///
/// A "view" is any entity carrying both [`GeoBounds`] and [`ScaleBarConfig`];
/// insert the bounds together with (or before) the config so the initial
/// overlay can be built. The host keeps the bounds current and fires
/// [`ViewZoomEnd`], [`ViewPanEnd`], and [`ViewClick`] at the view as its
/// gestures settle.
pub struct ScaleBarPlugin;

impl Plugin for ScaleBarPlugin {
    fn build(&self, app: &mut App) {
        app
            // Resize messages exist even on headless hosts
            .add_message::<WindowResized>()
            // Register observers for component lifecycle events
            .add_observer(on_config_added)
            .add_observer(on_config_removed)
            // Register observers for view events
            .add_observer(on_refresh)
            .add_observer(on_view_zoom_end)
            .add_observer(on_view_pan_end)
            .add_observer(on_view_click)
            // Add systems
            .add_systems(Update, sync_label_font_on_resize);
    }
}
