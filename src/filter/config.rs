use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::FilterConfigError;

/// How blur passes are sized within a level.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum BlurSizing {
    /// Both blur passes run at the level's own resolution.
    #[default]
    PerLevel,
    /// Blur-Y always runs at the smallest level's resolution, whatever level
    /// is being processed. Kept for visual parity with older output.
    SmallestLevelY,
}

/// Parameters the bloom graph is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Bloom", inline)]
#[serde(default)]
pub struct BloomSettings {
    /// Smallest level divisor. Power of two, at least 1.
    #[schemars(title = "Down Levels", range(min = 1, max = 64))]
    pub down_levels: u32,
    /// Separable blur iterations per level.
    #[schemars(title = "Blur Repeat", range(min = 0, max = 16))]
    pub repeat: u32,
    /// Brightness threshold applied by the first downsample.
    #[schemars(title = "Threshold", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub threshold: f32,
    /// Bloom contribution in the final combine.
    #[schemars(title = "Strength", range(min = 0.0, max = 3.0), extend("step" = 0.05))]
    pub strength: f32,
    /// Blur pass sizing.
    #[schemars(skip)]
    pub blur_sizing: BlurSizing,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            down_levels: 4,
            repeat: 2,
            threshold: 0.3,
            strength: 0.5,
            blur_sizing: BlurSizing::PerLevel,
        }
    }
}

impl BloomSettings {
    /// Check the settings against a `width` x `height` screen.
    ///
    /// # Errors
    ///
    /// Returns the first [`FilterConfigError`] that applies, checking the
    /// resolution, then `down_levels`, then threshold and strength.
    pub fn validate(
        &self,
        width: u32,
        height: u32,
    ) -> Result<(), FilterConfigError> {
        if width == 0 || height == 0 {
            return Err(FilterConfigError::EmptyResolution);
        }
        if self.down_levels == 0 {
            return Err(FilterConfigError::ZeroDownLevels);
        }
        if !self.down_levels.is_power_of_two() {
            return Err(FilterConfigError::DownLevelsNotPowerOfTwo(
                self.down_levels,
            ));
        }
        if self.down_levels > width || self.down_levels > height {
            return Err(FilterConfigError::DownLevelsExceedResolution {
                down_levels: self.down_levels,
                width,
                height,
            });
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(FilterConfigError::ThresholdOutOfRange(self.threshold));
        }
        if !self.strength.is_finite() || self.strength < 0.0 {
            return Err(FilterConfigError::NegativeStrength(self.strength));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_levels(down_levels: u32) -> BloomSettings {
        BloomSettings {
            down_levels,
            ..BloomSettings::default()
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert_eq!(BloomSettings::default().validate(1280, 720), Ok(()));
        assert_eq!(with_levels(1).validate(1, 1), Ok(()));
    }

    #[test]
    fn down_levels_must_be_power_of_two() {
        assert_eq!(
            with_levels(0).validate(640, 480),
            Err(FilterConfigError::ZeroDownLevels)
        );
        for bad in [3, 6, 12] {
            assert_eq!(
                with_levels(bad).validate(640, 480),
                Err(FilterConfigError::DownLevelsNotPowerOfTwo(bad))
            );
        }
    }

    #[test]
    fn down_levels_bounded_by_screen() {
        assert_eq!(
            with_levels(1024).validate(640, 480),
            Err(FilterConfigError::DownLevelsExceedResolution {
                down_levels: 1024,
                width: 640,
                height: 480,
            })
        );
        assert_eq!(
            BloomSettings::default().validate(0, 480),
            Err(FilterConfigError::EmptyResolution)
        );
    }

    #[test]
    fn scalar_ranges() {
        let high = BloomSettings {
            threshold: 1.5,
            ..BloomSettings::default()
        };
        assert_eq!(
            high.validate(640, 480),
            Err(FilterConfigError::ThresholdOutOfRange(1.5))
        );
        let negative = BloomSettings {
            strength: -0.1,
            ..BloomSettings::default()
        };
        assert_eq!(
            negative.validate(640, 480),
            Err(FilterConfigError::NegativeStrength(-0.1))
        );
        let infinite = BloomSettings {
            strength: f32::INFINITY,
            ..BloomSettings::default()
        };
        assert_eq!(
            infinite.validate(640, 480),
            Err(FilterConfigError::NegativeStrength(f32::INFINITY))
        );
    }

    #[test]
    fn sizing_parses_from_snake_case() {
        let settings: BloomSettings =
            toml::from_str("blur_sizing = \"smallest_level_y\"").unwrap();
        assert_eq!(settings.blur_sizing, BlurSizing::SmallestLevelY);
        assert_eq!(settings.down_levels, 4);
    }

    #[test]
    fn negative_repeat_fails_to_parse() {
        assert!(toml::from_str::<BloomSettings>("repeat = -1").is_err());
    }
}
