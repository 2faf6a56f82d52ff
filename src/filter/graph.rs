use super::config::{BloomSettings, BlurSizing};
use crate::error::FilterConfigError;

/// Position of a stage in its graph. Stages are numbered in construction
/// (and execution) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StageId(usize);

impl StageId {
    /// Index into [`FilterGraphShape::stages`].
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Role a stage plays in the bloom chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    /// Full-resolution pass-through of the scene color.
    Copy,
    /// Halve the resolution (the first one also thresholds).
    Downsample,
    /// Horizontal blur.
    BlurX,
    /// Vertical blur.
    BlurY,
    /// Double the resolution back toward the screen size.
    Upsample,
    /// Sharp image plus bloom, written to the presentation target.
    Combine,
}

/// Pixel shader a stage runs. The vertex stage is always the fullscreen
/// triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderPair {
    /// Plain bilinear sample.
    Sampling,
    /// Bilinear sample keeping only texels brighter than the threshold.
    Threshold,
    /// Horizontal Gaussian.
    BlurX,
    /// Vertical Gaussian.
    BlurY,
    /// Two-input additive combine.
    Combine,
}

impl ShaderPair {
    /// Every shader pair, in a stable order.
    pub const ALL: [Self; 5] = [
        Self::Sampling,
        Self::Threshold,
        Self::BlurX,
        Self::BlurY,
        Self::Combine,
    ];

    /// Number of sampled textures the pair binds.
    #[must_use]
    pub const fn input_count(self) -> usize {
        match self {
            Self::Combine => 2,
            _ => 1,
        }
    }
}

/// Render target size of a stage in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    /// Resolution of `width` x `height`, clamped to at least 1x1.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// This resolution divided by `divisor`, clamped to at least 1x1.
    #[must_use]
    pub fn divided(self, divisor: u32) -> Self {
        let divisor = divisor.max(1);
        Self::new(self.width / divisor, self.height / divisor)
    }

    /// Twice this resolution, saturating.
    #[must_use]
    pub fn doubled(self) -> Self {
        Self::new(self.width.saturating_mul(2), self.height.saturating_mul(2))
    }

    /// Size of one texel in UV units.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn texel_size(self) -> (f32, f32) {
        (1.0 / self.width as f32, 1.0 / self.height as f32)
    }
}

/// Where a stage reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageInput {
    /// The resolved scene color.
    Scene,
    /// Output of an earlier stage.
    Stage(StageId),
}

/// Where a stage writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageOutput {
    /// A texture owned by the stage.
    Intermediate,
    /// The presentation target supplied at execution time.
    Presentation,
}

/// Per-stage GPU parameter block.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StageParams {
    /// Texel width in UV units.
    pub dx: f32,
    /// Texel height in UV units.
    pub dy: f32,
    /// Brightness cutoff (threshold stage only, 0 elsewhere).
    pub threshold: f32,
    /// Bloom strength (combine stage only, 0 elsewhere).
    pub strength: f32,
}

impl StageParams {
    fn for_resolution(resolution: Resolution) -> Self {
        let (dx, dy) = resolution.texel_size();
        Self {
            dx,
            dy,
            threshold: 0.0,
            strength: 0.0,
        }
    }
}

/// One pass of the bloom chain, without GPU resources.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterStage {
    /// Position in the graph.
    pub id: StageId,
    /// Role in the chain.
    pub kind: StageKind,
    /// Pixel shader.
    pub shader: ShaderPair,
    /// Output size.
    pub resolution: Resolution,
    /// Sampled inputs, in binding order.
    pub inputs: Vec<StageInput>,
    /// Output destination.
    pub output: StageOutput,
    /// Parameter block uploaded for this stage.
    pub params: StageParams,
}

/// Ordered stage list of a bloom graph.
///
/// Topology is a pure function of the screen size and [`BloomSettings`];
/// only the threshold and strength parameters change after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterGraphShape {
    stages: Vec<FilterStage>,
    settings: BloomSettings,
    screen: Resolution,
    threshold_stage: Option<StageId>,
    combine_stage: StageId,
}

impl FilterGraphShape {
    /// Lay out the bloom chain for a `width` x `height` screen.
    ///
    /// The order is copy, the downsample chain (`d = 2 .. down_levels`),
    /// then for each level from the smallest back to half resolution:
    /// `repeat` blur-X/blur-Y pairs followed by an upsample (except at the
    /// last level), and finally the combine.
    ///
    /// # Errors
    ///
    /// Returns the [`FilterConfigError`] from
    /// [`BloomSettings::validate`]; no stage list is produced.
    pub fn build(
        width: u32,
        height: u32,
        settings: &BloomSettings,
    ) -> Result<Self, FilterConfigError> {
        settings.validate(width, height)?;

        let screen = Resolution::new(width, height);
        let mut builder = ShapeBuilder::default();

        let copy = builder.push(
            StageKind::Copy,
            ShaderPair::Sampling,
            screen,
            vec![StageInput::Scene],
        );
        let mut prev = copy;

        let mut threshold_stage = None;
        for level in 1..=settings.down_levels.trailing_zeros() {
            let divisor = 1 << level;
            let first = threshold_stage.is_none();
            let shader = if first {
                ShaderPair::Threshold
            } else {
                ShaderPair::Sampling
            };
            prev = builder.push(
                StageKind::Downsample,
                shader,
                screen.divided(divisor),
                vec![StageInput::Stage(prev)],
            );
            if first {
                builder.stages[prev.index()].params.threshold =
                    settings.threshold;
                threshold_stage = Some(prev);
            }
        }

        let smallest = screen.divided(settings.down_levels);
        let mut divisor = settings.down_levels;
        while divisor >= 2 {
            let level = screen.divided(divisor);
            let blur_y = match settings.blur_sizing {
                BlurSizing::PerLevel => level,
                BlurSizing::SmallestLevelY => smallest,
            };
            for _ in 0..settings.repeat {
                prev = builder.push(
                    StageKind::BlurX,
                    ShaderPair::BlurX,
                    level,
                    vec![StageInput::Stage(prev)],
                );
                prev = builder.push(
                    StageKind::BlurY,
                    ShaderPair::BlurY,
                    blur_y,
                    vec![StageInput::Stage(prev)],
                );
            }
            if divisor > 2 {
                prev = builder.push(
                    StageKind::Upsample,
                    ShaderPair::Sampling,
                    level.doubled(),
                    vec![StageInput::Stage(prev)],
                );
            }
            divisor /= 2;
        }

        let combine_stage = builder.push(
            StageKind::Combine,
            ShaderPair::Combine,
            screen,
            vec![StageInput::Stage(copy), StageInput::Stage(prev)],
        );
        let combine = &mut builder.stages[combine_stage.index()];
        combine.output = StageOutput::Presentation;
        combine.params.strength = settings.strength;

        Ok(Self {
            stages: builder.stages,
            settings: settings.clone(),
            screen,
            threshold_stage,
            combine_stage,
        })
    }

    /// Stages in execution order.
    #[must_use]
    pub fn stages(&self) -> &[FilterStage] {
        &self.stages
    }

    /// Look up a stage.
    #[must_use]
    pub fn stage(&self, id: StageId) -> Option<&FilterStage> {
        self.stages.get(id.index())
    }

    /// Number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always `false`: a graph has at least copy and combine.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Settings the graph was built from, with current scalar values.
    #[must_use]
    pub fn settings(&self) -> &BloomSettings {
        &self.settings
    }

    /// Screen size the graph was built for.
    #[must_use]
    pub fn screen(&self) -> Resolution {
        self.screen
    }

    /// The thresholding downsample, absent when `down_levels` is 1.
    #[must_use]
    pub fn threshold_stage(&self) -> Option<StageId> {
        self.threshold_stage
    }

    /// The final combine stage.
    #[must_use]
    pub fn combine_stage(&self) -> StageId {
        self.combine_stage
    }

    /// Change the bloom threshold in place. Returns the stage whose
    /// parameter block must be re-uploaded.
    pub fn set_threshold(&mut self, threshold: f32) -> Option<StageId> {
        self.settings.threshold = threshold;
        let id = self.threshold_stage?;
        self.stages[id.index()].params.threshold = threshold;
        Some(id)
    }

    /// Change the bloom strength in place. Returns the stage whose parameter
    /// block must be re-uploaded.
    pub fn set_strength(&mut self, strength: f32) -> Option<StageId> {
        self.settings.strength = strength;
        let id = self.combine_stage;
        let stage = self.stages.get_mut(id.index())?;
        stage.params.strength = strength;
        Some(id)
    }
}

#[derive(Default)]
struct ShapeBuilder {
    stages: Vec<FilterStage>,
}

impl ShapeBuilder {
    fn push(
        &mut self,
        kind: StageKind,
        shader: ShaderPair,
        resolution: Resolution,
        inputs: Vec<StageInput>,
    ) -> StageId {
        let id = StageId(self.stages.len());
        self.stages.push(FilterStage {
            id,
            kind,
            shader,
            resolution,
            inputs,
            output: StageOutput::Intermediate,
            params: StageParams::for_resolution(resolution),
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(settings: &BloomSettings) -> FilterGraphShape {
        FilterGraphShape::build(1280, 720, settings).unwrap()
    }

    fn kinds(shape: &FilterGraphShape) -> Vec<StageKind> {
        shape.stages().iter().map(|s| s.kind).collect()
    }

    #[test]
    fn four_levels_two_repeats_has_thirteen_stages() {
        use StageKind::{BlurX, BlurY, Combine, Copy, Downsample, Upsample};
        let shape = build(&BloomSettings {
            down_levels: 4,
            repeat: 2,
            ..BloomSettings::default()
        });
        assert_eq!(
            kinds(&shape),
            vec![
                Copy, Downsample, Downsample, BlurX, BlurY, BlurX, BlurY,
                Upsample, BlurX, BlurY, BlurX, BlurY, Combine,
            ]
        );

        let res: Vec<_> = shape
            .stages()
            .iter()
            .map(|s| (s.resolution.width, s.resolution.height))
            .collect();
        assert_eq!(res[0], (1280, 720));
        assert_eq!(res[1], (640, 360));
        assert_eq!(res[2], (320, 180));
        assert_eq!(res[3..7], [(320, 180); 4]);
        assert_eq!(res[7], (640, 360));
        assert_eq!(res[8..12], [(640, 360); 4]);
        assert_eq!(res[12], (1280, 720));
    }

    #[test]
    fn shader_pairs_follow_roles() {
        let shape = build(&BloomSettings::default());
        let stages = shape.stages();
        assert_eq!(stages[0].shader, ShaderPair::Sampling);
        assert_eq!(stages[1].shader, ShaderPair::Threshold);
        assert_eq!(stages[2].shader, ShaderPair::Sampling);
        assert_eq!(stages[7].shader, ShaderPair::Sampling);
        assert_eq!(stages[12].shader, ShaderPair::Combine);
        assert_eq!(shape.threshold_stage(), Some(stages[1].id));
        assert_eq!(shape.combine_stage(), stages[12].id);
    }

    #[test]
    fn inputs_reference_earlier_stages() {
        let shape = build(&BloomSettings {
            down_levels: 8,
            repeat: 3,
            ..BloomSettings::default()
        });
        for stage in shape.stages() {
            for input in &stage.inputs {
                match input {
                    StageInput::Scene => assert_eq!(stage.id.index(), 0),
                    StageInput::Stage(src) => assert!(src < &stage.id),
                }
            }
            assert_eq!(stage.inputs.len(), stage.shader.input_count());
        }
        let combine = &shape.stages()[shape.len() - 1];
        assert_eq!(combine.inputs[0], StageInput::Stage(shape.stages()[0].id));
        assert_eq!(combine.output, StageOutput::Presentation);
        let intermediates = shape
            .stages()
            .iter()
            .filter(|s| s.output == StageOutput::Intermediate)
            .count();
        assert_eq!(intermediates, shape.len() - 1);
    }

    #[test]
    fn build_is_idempotent() {
        let settings = BloomSettings {
            down_levels: 8,
            repeat: 1,
            ..BloomSettings::default()
        };
        assert_eq!(build(&settings), build(&settings));
    }

    #[test]
    fn strength_update_touches_only_combine() {
        let mut shape = build(&BloomSettings::default());
        let before = shape.clone();
        let changed = shape.set_strength(2.0);
        assert_eq!(changed, Some(shape.combine_stage()));

        for (old, new) in before.stages().iter().zip(shape.stages()) {
            assert_eq!(old.resolution, new.resolution);
            assert_eq!(old.inputs, new.inputs);
            assert_eq!(old.shader, new.shader);
            if new.id == shape.combine_stage() {
                assert_eq!(new.params.strength, 2.0);
            } else {
                assert_eq!(old.params, new.params);
            }
        }
    }

    #[test]
    fn threshold_update_touches_first_downsample() {
        let mut shape = build(&BloomSettings::default());
        let changed = shape.set_threshold(0.8);
        assert_eq!(changed, shape.threshold_stage());
        let stage = shape.stage(shape.threshold_stage().unwrap()).unwrap();
        assert_eq!(stage.params.threshold, 0.8);
        assert_eq!(shape.settings().threshold, 0.8);
        assert!(shape
            .stages()
            .iter()
            .filter(|s| s.id != stage.id)
            .all(|s| s.params.threshold == 0.0));
    }

    #[test]
    fn single_level_is_copy_then_combine() {
        let mut shape = build(&BloomSettings {
            down_levels: 1,
            ..BloomSettings::default()
        });
        assert_eq!(kinds(&shape), vec![StageKind::Copy, StageKind::Combine]);
        let copy = StageInput::Stage(shape.stages()[0].id);
        assert_eq!(shape.stages()[1].inputs, vec![copy, copy]);
        assert_eq!(shape.set_threshold(0.5), None);
    }

    #[test]
    fn zero_repeat_keeps_upsamples() {
        let shape = build(&BloomSettings {
            down_levels: 8,
            repeat: 0,
            ..BloomSettings::default()
        });
        use StageKind::{Combine, Copy, Downsample, Upsample};
        assert_eq!(
            kinds(&shape),
            vec![Copy, Downsample, Downsample, Downsample, Upsample, Upsample, Combine]
        );
    }

    #[test]
    fn legacy_sizing_puts_blur_y_at_smallest_level() {
        let shape = build(&BloomSettings {
            down_levels: 8,
            blur_sizing: BlurSizing::SmallestLevelY,
            ..BloomSettings::default()
        });
        let smallest = Resolution::new(160, 90);
        for stage in shape.stages() {
            if stage.kind == StageKind::BlurY {
                assert_eq!(stage.resolution, smallest);
            }
        }
        let widest_blur_x = shape
            .stages()
            .iter()
            .filter(|s| s.kind == StageKind::BlurX)
            .map(|s| s.resolution.width)
            .max();
        assert_eq!(widest_blur_x, Some(640));
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let bad = BloomSettings {
            down_levels: 6,
            ..BloomSettings::default()
        };
        assert_eq!(
            FilterGraphShape::build(640, 480, &bad),
            Err(FilterConfigError::DownLevelsNotPowerOfTwo(6))
        );
    }

    #[test]
    fn upsample_doubles_the_level_below_on_odd_screens() {
        let shape = FilterGraphShape::build(
            1283,
            723,
            &BloomSettings {
                down_levels: 4,
                repeat: 1,
                ..BloomSettings::default()
            },
        )
        .unwrap();
        let upsample = shape
            .stages()
            .iter()
            .find(|s| s.kind == StageKind::Upsample)
            .unwrap();
        assert_eq!(upsample.resolution, Resolution::new(640, 360));
    }

    #[test]
    fn largest_power_of_two_levels_build_without_overflow() {
        let settings = BloomSettings {
            down_levels: 1 << 31,
            repeat: 0,
            ..BloomSettings::default()
        };
        let shape =
            FilterGraphShape::build(u32::MAX, u32::MAX, &settings).unwrap();
        let count = |kind| shape.stages().iter().filter(|s| s.kind == kind).count();
        assert_eq!(count(StageKind::Downsample), 31);
        assert_eq!(count(StageKind::Upsample), 30);
        assert_eq!(shape.len(), 63);
    }

    #[test]
    fn texel_size_matches_resolution() {
        let shape = build(&BloomSettings::default());
        let params = shape.stages()[2].params;
        assert!((params.dx - 1.0 / 320.0).abs() < 1e-9);
        assert!((params.dy - 1.0 / 180.0).abs() < 1e-9);
    }
}
