use glam::{Quat, Vec3};

use super::ray::RaySegment;
use crate::input::InputSnapshot;

/// Default length deadzone between successive rotation vectors.
pub const DEFAULT_ROTATION_DEADZONE: f32 = 1e-3;

/// Incremental transform produced by one frame of dragging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragDelta {
    /// World-space translation to append.
    pub translation: Vec3,
    /// Rotation about the object's own center.
    pub rotation: Quat,
}

impl DragDelta {
    /// No movement.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Whether this delta leaves a transform unchanged.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.translation == Vec3::ZERO && self.rotation == Quat::IDENTITY
    }
}

impl Default for DragDelta {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Current drag mode with the anchors captured when the drag began.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragMode {
    /// No drag in progress.
    #[default]
    Idle,
    /// Left-button drag at constant ray depth.
    Translating {
        /// Pick distance as a fraction of the near-to-far segment.
        ratio: f32,
        /// World-space pick point of the previous frame.
        anchor: Vec3,
    },
    /// Right-button drag rotating about the bounds center.
    Rotating {
        /// Pick point relative to the bounds center, previous frame.
        anchor: Vec3,
    },
}

/// What the picking ray saw this frame.
#[derive(Debug, Clone, Copy)]
pub struct PickHit<'a> {
    /// Unprojected cursor.
    pub segment: &'a RaySegment,
    /// Distance along the ray to the bounding sphere.
    pub t: f32,
    /// Center of the selected object's bounding sphere.
    pub center: Vec3,
}

impl PickHit<'_> {
    /// World-space point where the ray meets the sphere.
    #[must_use]
    pub fn point(&self) -> Vec3 {
        self.segment.ray.at(self.t)
    }
}

/// Translate/rotate drag state machine.
///
/// Anchors are captured on the frame a drag begins and carried across
/// frames until both buttons are released.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    mode: DragMode,
    rotation_deadzone: f32,
}

impl Default for DragState {
    fn default() -> Self {
        Self::new(DEFAULT_ROTATION_DEADZONE)
    }
}

impl DragState {
    /// Idle state with the given rotation deadzone.
    #[must_use]
    pub fn new(rotation_deadzone: f32) -> Self {
        Self {
            mode: DragMode::Idle,
            rotation_deadzone,
        }
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> DragMode {
        self.mode
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.mode != DragMode::Idle
    }

    /// Change the rotation deadzone. Takes effect on the next frame.
    pub fn set_rotation_deadzone(&mut self, deadzone: f32) {
        self.rotation_deadzone = deadzone;
    }

    /// Drop any drag in progress.
    pub fn reset(&mut self) {
        if self.mode != DragMode::Idle {
            log::debug!("drag: {:?} -> Idle", self.mode);
        }
        self.mode = DragMode::Idle;
    }

    /// Advance one frame.
    ///
    /// `hit` is `None` when the ray was skipped or missed the selected
    /// object's bounds; the state is then preserved unless both buttons are
    /// up.
    pub fn advance(
        &mut self,
        input: &InputSnapshot,
        hit: Option<&PickHit<'_>>,
    ) -> DragDelta {
        if !input.left && !input.right {
            self.reset();
            return DragDelta::IDENTITY;
        }
        let Some(hit) = hit else {
            return DragDelta::IDENTITY;
        };

        if input.drag_started {
            self.begin(input, hit);
            return DragDelta::IDENTITY;
        }

        match self.mode {
            DragMode::Translating { ratio, anchor } if input.left => {
                let current = hit.segment.lerp(ratio);
                self.mode = DragMode::Translating {
                    ratio,
                    anchor: current,
                };
                DragDelta {
                    translation: current - anchor,
                    rotation: Quat::IDENTITY,
                }
            }
            DragMode::Rotating { anchor } if input.right => {
                let current = hit.point() - hit.center;
                let rotation = self.rotation_step(anchor, current);
                if rotation.is_some() {
                    self.mode = DragMode::Rotating { anchor: current };
                }
                DragDelta {
                    translation: Vec3::ZERO,
                    rotation: rotation.unwrap_or(Quat::IDENTITY),
                }
            }
            _ => DragDelta::IDENTITY,
        }
    }

    /// Capture anchors for the button that started the drag. Left wins when
    /// both are down.
    fn begin(&mut self, input: &InputSnapshot, hit: &PickHit<'_>) {
        let next = if input.left {
            let length = hit.segment.length();
            if length <= f32::EPSILON {
                return;
            }
            DragMode::Translating {
                ratio: hit.t / length,
                anchor: hit.point(),
            }
        } else {
            DragMode::Rotating {
                anchor: hit.point() - hit.center,
            }
        };
        log::debug!("drag: {:?} -> {:?}", self.mode, next);
        self.mode = next;
    }

    /// Shortest-arc rotation from `anchor` to `current`, or `None` inside the
    /// deadzone or for degenerate vectors.
    fn rotation_step(&self, anchor: Vec3, current: Vec3) -> Option<Quat> {
        if (current - anchor).length() <= self.rotation_deadzone {
            return None;
        }
        let from = anchor.try_normalize()?;
        let to = current.try_normalize()?;
        Some(Quat::from_rotation_arc(from, to))
    }
}
