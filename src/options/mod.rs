//! Engine options with TOML preset support.
//!
//! Bloom, picking and display settings live here. Options serialize to and
//! from TOML for presets stored in `assets/presets/`; every section uses
//! `#[serde(default)]`, so a preset only needs the fields it overrides.

mod display;
mod picking;

use std::path::Path;

pub use display::DisplayOptions;
pub use picking::PickingOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::GlintError;
pub use crate::filter::{BloomSettings, BlurSizing};

/// Top-level options container.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Bloom filter graph parameters.
    pub bloom: BloomSettings,
    /// Drag tuning and the cursor marker.
    pub picking: PickingOptions,
    /// Scene pass and presentation toggles.
    pub display: DisplayOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from a TOML string. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::OptionsParse`] on malformed TOML or
    /// out-of-type values (e.g. a negative `repeat`).
    pub fn from_toml_str(content: &str) -> Result<Self, GlintError> {
        toml::from_str(content)
            .map_err(|e| GlintError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::Io`] if the file cannot be read, or
    /// [`GlintError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, GlintError> {
        let content = std::fs::read_to_string(path).map_err(GlintError::Io)?;
        let options = Self::from_toml_str(&content)?;
        log::info!("loaded options from {}", path.display());
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::OptionsParse`] if serialization fails, or
    /// [`GlintError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), GlintError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GlintError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(GlintError::Io)?;
        }
        std::fs::write(path, content).map_err(GlintError::Io)?;
        log::info!("saved options to {}", path.display());
        Ok(())
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn defaults_match_documented_values() {
        let opts = Options::default();
        assert_eq!(opts.bloom.down_levels, 4);
        assert_eq!(opts.bloom.repeat, 2);
        assert_eq!(opts.bloom.blur_sizing, BlurSizing::PerLevel);
        assert!((opts.picking.rotation_deadzone - 1e-3).abs() < 1e-9);
        assert!(opts.display.post_processing);
        assert_eq!(opts.display.sample_count(), 4);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[bloom]
threshold = 0.8

[display]
msaa_samples = 1
";
        let opts = Options::from_toml_str(toml_str).unwrap();
        assert_eq!(opts.bloom.threshold, 0.8);
        assert_eq!(opts.display.sample_count(), 1);
        // Everything else should be default
        assert_eq!(opts.bloom.strength, 0.5);
        assert_eq!(opts.picking, PickingOptions::default());
    }

    #[test]
    fn legacy_blur_sizing_parses() {
        let opts =
            Options::from_toml_str("[bloom]\nblur_sizing = \"smallest_level_y\"\n")
                .unwrap();
        assert_eq!(opts.bloom.blur_sizing, BlurSizing::SmallestLevelY);
    }

    #[test]
    fn negative_repeat_is_a_parse_error() {
        let err = Options::from_toml_str("[bloom]\nrepeat = -1\n").unwrap_err();
        assert!(matches!(err, GlintError::OptionsParse(_)));
    }

    #[test]
    fn save_load_and_list_presets() {
        let dir = std::env::temp_dir()
            .join(format!("glint-presets-{}", std::process::id()));
        let mut opts = Options::default();
        opts.bloom.strength = 1.25;
        opts.display.wireframe = true;
        opts.save(&dir.join("bright.toml")).unwrap();
        Options::default().save(&dir.join("calm.toml")).unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        assert_eq!(Options::list_presets(&dir), vec!["bright", "calm"]);
        assert_eq!(Options::load(&dir.join("bright.toml")).unwrap(), opts);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_preset_dir_lists_nothing() {
        let dir = std::env::temp_dir().join("glint-no-such-preset-dir");
        assert!(Options::list_presets(&dir).is_empty());
        assert!(matches!(
            Options::load(&dir.join("x.toml")),
            Err(GlintError::Io(_))
        ));
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("bloom"));
        assert!(props.contains_key("picking"));
        assert!(props.contains_key("display"));

        let bloom = &props["bloom"]["properties"];
        assert!(bloom.get("threshold").is_some());
        assert!(bloom.get("down_levels").is_some());
        assert!(bloom.get("blur_sizing").is_none());

        let display = &props["display"]["properties"];
        assert!(display.get("msaa_samples").is_some());
        assert!(display.get("clear_color").is_none());
    }
}
