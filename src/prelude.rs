//! Convenient re-exports for common types and traits

pub use crate::GeoBounds;
pub use crate::RefreshScaleBar;
pub use crate::ScaleAnchor;
pub use crate::ScaleBarArtifact;
pub use crate::ScaleBarArtifacts;
pub use crate::ScaleBarConfig;
pub use crate::ScaleBarError;
pub use crate::ScaleBarPlugin;
pub use crate::UnitSystem;
pub use crate::ViewClick;
pub use crate::ViewPanEnd;
pub use crate::ViewZoomEnd;
