//! Per-frame uniform data derived from the scene and picking state.

use glam::Vec3;

use crate::options::PickingOptions;
use crate::picking::PickColor;
use crate::renderer::ObjectUniforms;
use crate::scene::Scene;

/// One block per object in scene order, each carrying its index color.
pub(super) fn object_blocks(scene: &Scene) -> Vec<ObjectUniforms> {
    scene
        .iter()
        .map(|(id, object)| {
            let pick = PickColor::encode(id).unwrap_or_else(|| {
                log::warn!("{id:?} exceeds the index target range, unpickable");
                PickColor::BACKGROUND
            });
            ObjectUniforms::from_object(object, pick)
        })
        .collect()
}

/// Marker block at the pick point, or `None` when the marker is hidden.
pub(super) fn marker_block(
    options: &PickingOptions,
    pick_point: Option<Vec3>,
) -> Option<ObjectUniforms> {
    if !options.show_marker || options.marker_radius <= 0.0 {
        return None;
    }
    pick_point.map(|point| {
        ObjectUniforms::marker(
            point,
            options.marker_radius,
            Vec3::from_array(options.marker_color),
        )
    })
}
