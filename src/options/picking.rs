use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::picking::DEFAULT_ROTATION_DEADZONE;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Picking", inline)]
#[serde(default)]
/// Drag tuning and the cursor marker.
pub struct PickingOptions {
    /// Minimum change between successive rotation vectors before a rotation
    /// is emitted.
    #[schemars(title = "Rotation Deadzone", range(min = 0.0, max = 0.1), extend("step" = 0.0005))]
    pub rotation_deadzone: f32,
    /// Radius of the sphere drawn at the pick point.
    #[schemars(title = "Marker Radius", range(min = 0.0, max = 0.5), extend("step" = 0.01))]
    pub marker_radius: f32,
    /// Draw the marker while a button is held over the selection.
    #[schemars(title = "Show Marker")]
    pub show_marker: bool,
    /// Marker color (linear RGB).
    #[schemars(skip)]
    pub marker_color: [f32; 3],
}

impl Default for PickingOptions {
    fn default() -> Self {
        Self {
            rotation_deadzone: DEFAULT_ROTATION_DEADZONE,
            marker_radius: 0.05,
            show_marker: true,
            marker_color: [1.0, 1.0, 0.0],
        }
    }
}
