//! Options, bloom and resize methods for [`SceneEngine`].

use std::path::Path;

use super::SceneEngine;
use crate::error::{FilterConfigError, GlintError};
use crate::filter::{BloomSettings, FilterGraphShape, Resolution};
use crate::options::Options;
use crate::renderer::{DrawerSetup, FilterGraph, FrameTargets, PresentPass};

impl SceneEngine {
    /// Rebuild the filter graph from `settings` at the current size.
    ///
    /// The new graph replaces the old one only once it is fully built.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::FilterConfig`] for invalid settings and
    /// [`GlintError::ResourceCreation`] if GPU allocation fails. In both
    /// cases the previous graph and settings stay in effect.
    pub fn rebuild_filter_graph(
        &mut self,
        settings: BloomSettings,
    ) -> Result<(), GlintError> {
        let (width, height) = self.frame_targets.size();
        let graph = FilterGraphShape::build(width, height, &settings)
            .map_err(GlintError::from)
            .and_then(|shape| self.realize_shape(shape))
            .inspect_err(|e| {
                log::error!("filter graph rebuild rejected: {e}");
            })?;
        log::info!("filter graph rebuilt: {} stages", graph.shape().len());
        self.filter_graph = Some(graph);
        self.bloom_controls.reset(&settings);
        self.options.bloom = settings;
        Ok(())
    }

    fn realize_filter_graph(
        &self,
        settings: &BloomSettings,
    ) -> Result<FilterGraph, GlintError> {
        let (width, height) = self.frame_targets.size();
        let shape = FilterGraphShape::build(width, height, settings)?;
        self.realize_shape(shape)
    }

    fn realize_shape(
        &self,
        shape: FilterGraphShape,
    ) -> Result<FilterGraph, GlintError> {
        FilterGraph::realize(
            &self.context,
            &self.filter_pipelines,
            shape,
            &self.frame_targets.color_resolve.view,
        )
    }

    /// Set the bloom threshold (clamped to `[0, 1]`). Applied to the
    /// threshold stage on the next [`update`](Self::update), and only if it
    /// changed.
    pub fn set_bloom_threshold(&mut self, threshold: f32) {
        self.bloom_controls.set_threshold(threshold);
    }

    /// Set the bloom strength (negative values clamp to 0). Applied to the
    /// combine stage on the next [`update`](Self::update), and only if it
    /// changed.
    pub fn set_bloom_strength(&mut self, strength: f32) {
        self.bloom_controls.set_strength(strength);
    }

    /// Resize the surface and every size-dependent target.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.context.resize(width, height);
        self.recreate_frame_targets(self.frame_targets.sample_count());
    }

    /// Replace options and apply all changes to subsystems.
    ///
    /// Bloom settings that do not lay out at the current size are rejected
    /// and the previous settings and graph stay in effect, also across an
    /// MSAA change.
    pub fn set_options(&mut self, new: Options) {
        let old = std::mem::replace(&mut self.options, new);
        self.picking.apply_options(&self.options.picking);
        let candidate = std::mem::replace(&mut self.options.bloom, old.bloom);

        let sample_count = self.options.display.sample_count();
        if sample_count != self.frame_targets.sample_count() {
            let (width, height) = self.frame_targets.size();
            if let Err(e) =
                adopt_bloom(&mut self.options.bloom, candidate, width, height)
            {
                log::warn!("keeping previous bloom settings: {e}");
            }
            self.recreate_frame_targets(sample_count);
            self.prepare_drawer();
            self.bloom_controls.reset(&self.options.bloom);
        } else if candidate != self.options.bloom {
            if let Err(e) = self.rebuild_filter_graph(candidate) {
                log::warn!("keeping previous bloom settings: {e}");
            }
        }
    }

    /// Load a named preset from `presets_dir`. Returns true on success.
    pub fn load_preset(&mut self, name: &str, presets_dir: &Path) -> bool {
        let path = presets_dir.join(format!("{name}.toml"));
        match Options::load(&path) {
            Ok(opts) => {
                log::info!("loaded preset '{name}'");
                self.set_options(opts);
                true
            }
            Err(e) => {
                log::error!("failed to load preset '{name}': {e}");
                false
            }
        }
    }

    /// Save the current options as a named preset. Returns true on
    /// success.
    pub fn save_preset(&self, name: &str, presets_dir: &Path) -> bool {
        let path = presets_dir.join(format!("{name}.toml"));
        match self.options.save(&path) {
            Ok(()) => {
                log::info!("saved preset '{name}'");
                true
            }
            Err(e) => {
                log::error!("failed to save preset '{name}': {e}");
                false
            }
        }
    }

    /// Reallocate scene targets and everything that reads them.
    ///
    /// A graph that no longer fits the new size is dropped and the scene is
    /// presented unfiltered until a valid rebuild.
    fn recreate_frame_targets(&mut self, sample_count: u32) {
        self.frame_targets = FrameTargets::new(
            &self.context.device,
            self.context.width(),
            self.context.height(),
            sample_count,
        );
        self.index_sample_pass
            .bind(&self.context.device, &self.frame_targets);
        self.filter_graph = match self.realize_filter_graph(&self.options.bloom)
        {
            Ok(graph) => Some(graph),
            Err(e) => {
                log::warn!("bloom disabled at this size: {e}");
                None
            }
        };
        let (width, height) = self.frame_targets.size();
        self.present_pass = PresentPass::new(
            &self.context,
            &self.filter_pipelines,
            &self.frame_targets.color_resolve.view,
            Resolution::new(width, height),
        );
        log::debug!(
            "frame targets recreated: {width}x{height}, {sample_count}x MSAA"
        );
    }

    fn prepare_drawer(&mut self) {
        let result = self.drawer.prepare(DrawerSetup {
            context: &self.context,
            composer: &mut self.composer,
            layouts: self.scene_bindings.layouts(),
            sample_count: self.frame_targets.sample_count(),
        });
        if let Err(e) = result {
            log::error!("scene drawer rebuild failed: {e}");
        }
    }
}

/// Replace `current` with `candidate` if it lays out at `width` x `height`.
/// A rejected candidate leaves `current` untouched.
fn adopt_bloom(
    current: &mut BloomSettings,
    candidate: BloomSettings,
    width: u32,
    height: u32,
) -> Result<FilterGraphShape, FilterConfigError> {
    let shape = FilterGraphShape::build(width, height, &candidate)?;
    *current = candidate;
    Ok(shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_bloom_keeps_current_settings() {
        let mut current = BloomSettings::default();
        let before = current.clone();
        let candidate = BloomSettings {
            down_levels: 6,
            ..BloomSettings::default()
        };
        assert_eq!(
            adopt_bloom(&mut current, candidate, 1280, 720),
            Err(FilterConfigError::DownLevelsNotPowerOfTwo(6))
        );
        assert_eq!(current, before);

        let shape = FilterGraphShape::build(1280, 720, &current).unwrap();
        assert_eq!(shape.settings(), &before);
        assert_eq!(shape.len(), 13);
    }

    #[test]
    fn oversized_levels_are_rejected_at_the_current_size() {
        let mut current = BloomSettings::default();
        let candidate = BloomSettings {
            down_levels: 1024,
            ..BloomSettings::default()
        };
        assert!(adopt_bloom(&mut current, candidate, 640, 480).is_err());
        assert_eq!(current.down_levels, 4);
    }

    #[test]
    fn valid_bloom_is_adopted_with_its_shape() {
        let mut current = BloomSettings::default();
        let candidate = BloomSettings {
            down_levels: 8,
            repeat: 1,
            strength: 1.5,
            ..BloomSettings::default()
        };
        let shape = adopt_bloom(&mut current, candidate.clone(), 1280, 720)
            .unwrap();
        assert_eq!(current, candidate);
        assert_eq!(shape.settings(), &candidate);
    }
}
