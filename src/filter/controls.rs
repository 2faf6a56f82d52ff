use super::config::BloomSettings;

/// Pending threshold/strength edits handed to the graph once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BloomUpdate {
    /// New threshold, if it changed.
    pub threshold: Option<f32>,
    /// New strength, if it changed.
    pub strength: Option<f32>,
}

impl BloomUpdate {
    /// Whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.threshold.is_none() && self.strength.is_none()
    }
}

/// Host-facing bloom scalars with change tracking.
///
/// Setters only mark the controls dirty when the value actually moves, so
/// the per-frame upload is skipped while the user isn't touching anything.
#[derive(Debug, Clone, PartialEq)]
pub struct BloomControls {
    threshold: f32,
    strength: f32,
    pending: BloomUpdate,
}

impl BloomControls {
    /// Controls seeded from the graph settings. Starts clean.
    #[must_use]
    pub fn new(settings: &BloomSettings) -> Self {
        Self {
            threshold: settings.threshold,
            strength: settings.strength,
            pending: BloomUpdate::default(),
        }
    }

    /// Current threshold.
    #[must_use]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Current strength.
    #[must_use]
    pub fn strength(&self) -> f32 {
        self.strength
    }

    /// Set the threshold, clamped to `[0, 1]`.
    pub fn set_threshold(&mut self, threshold: f32) {
        if threshold.is_nan() {
            return;
        }
        let threshold = threshold.clamp(0.0, 1.0);
        if threshold != self.threshold {
            self.threshold = threshold;
            self.pending.threshold = Some(threshold);
        }
    }

    /// Set the strength, clamped to be non-negative. Non-finite values are
    /// ignored.
    pub fn set_strength(&mut self, strength: f32) {
        if !strength.is_finite() {
            return;
        }
        let strength = strength.max(0.0);
        if strength != self.strength {
            self.strength = strength;
            self.pending.strength = Some(strength);
        }
    }

    /// Whether an edit is waiting to be applied.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Take the pending edits and clear the dirty flag.
    pub fn take_dirty(&mut self) -> BloomUpdate {
        std::mem::take(&mut self.pending)
    }

    /// Adopt the scalars of a freshly built graph, dropping pending edits.
    pub fn reset(&mut self, settings: &BloomSettings) {
        *self = Self::new(settings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_clean() {
        let controls = BloomControls::new(&BloomSettings::default());
        assert!(!controls.is_dirty());
        assert_eq!(controls.threshold(), 0.3);
    }

    #[test]
    fn same_value_does_not_dirty() {
        let mut controls = BloomControls::new(&BloomSettings::default());
        controls.set_threshold(0.3);
        controls.set_strength(0.5);
        assert!(!controls.is_dirty());
    }

    #[test]
    fn change_is_taken_once() {
        let mut controls = BloomControls::new(&BloomSettings::default());
        controls.set_strength(1.25);
        assert!(controls.is_dirty());
        let update = controls.take_dirty();
        assert_eq!(update.strength, Some(1.25));
        assert_eq!(update.threshold, None);
        assert!(!controls.is_dirty());
        assert!(controls.take_dirty().is_empty());
    }

    #[test]
    fn values_are_clamped() {
        let mut controls = BloomControls::new(&BloomSettings::default());
        controls.set_threshold(4.0);
        controls.set_strength(-1.0);
        assert_eq!(controls.threshold(), 1.0);
        assert_eq!(controls.strength(), 0.0);
        controls.set_threshold(f32::NAN);
        assert_eq!(controls.threshold(), 1.0);
        controls.set_strength(f32::INFINITY);
        assert_eq!(controls.strength(), 0.0);
    }
}
