use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor, ShaderLanguage,
    ShaderType,
};

use crate::error::GlintError;

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// Shared modules are registered at construction time. Consuming shaders use
/// `#import glint::module_name` to pull in shared code. The composer produces
/// `naga::Module` IR directly, skipping WGSL re-parse at runtime.
pub struct ShaderComposer {
    composer: Composer,
}

/// Shared module definition: (source, file_path)
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

/// Shared modules in dependency order.
const MODULES: &[ModuleDef] = &[
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/fullscreen.wgsl"),
        file_path: "modules/fullscreen.wgsl",
    },
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/scene.wgsl"),
        file_path: "modules/scene.wgsl",
    },
];

impl ShaderComposer {
    /// Register every shared module.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::Shader`] if a module fails to parse.
    pub fn new() -> Result<Self, GlintError> {
        let mut composer = Composer::default();
        for m in MODULES {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| {
                    GlintError::Shader(format!(
                        "failed to register '{}': {e:?}",
                        m.file_path
                    ))
                })?;
        }
        Ok(Self { composer })
    }

    /// Compose a shader source string (which may contain `#import`
    /// directives) into a `wgpu::ShaderModule` ready for pipeline creation.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::Shader`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        source: &str,
        file_path: &str,
    ) -> Result<wgpu::ShaderModule, GlintError> {
        let naga_module = self.compose_naga(source, file_path)?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose a shader source into a `naga::Module` without creating a wgpu
    /// shader module. Useful for testing shader composition without a GPU
    /// device.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::Shader`] if composition fails.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
    ) -> Result<naga::Module, GlintError> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(|e| {
                GlintError::Shader(format!(
                    "failed to compose '{file_path}': {}",
                    e.emit_to_string(&self.composer)
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{FilterPipelines, ImpostorRenderer, IndexSamplePass};

    #[test]
    fn all_shaders_compose() {
        let mut composer = ShaderComposer::new().unwrap();
        let sources = FilterPipelines::SOURCES
            .iter()
            .copied()
            .chain([ImpostorRenderer::SOURCE, IndexSamplePass::SOURCE]);
        for (source, file_path) in sources {
            let _ = composer
                .compose_naga(source, file_path)
                .unwrap_or_else(|e| panic!("{file_path}: {e}"));
        }
    }

    #[test]
    fn filter_shaders_export_fragment_entries() {
        let mut composer = ShaderComposer::new().unwrap();
        for &(source, file_path) in FilterPipelines::SOURCES {
            let module = composer.compose_naga(source, file_path).unwrap();
            let names: Vec<_> =
                module.entry_points.iter().map(|e| e.name.as_str()).collect();
            assert!(names.contains(&"vs_main"), "{file_path}: {names:?}");
            assert!(
                names.iter().any(|n| n.starts_with("fs_")),
                "{file_path}: {names:?}"
            );
        }
    }

    #[test]
    fn index_sample_shader_reads_a_multisampled_texture() {
        let mut composer = ShaderComposer::new().unwrap();
        let (source, file_path) = IndexSamplePass::SOURCE;
        let module = composer.compose_naga(source, file_path).unwrap();
        assert!(module
            .entry_points
            .iter()
            .any(|e| e.name == "fs_sample_zero"));
        let multisampled = module.global_variables.iter().any(|(_, var)| {
            matches!(
                module.types[var.ty].inner,
                naga::TypeInner::Image {
                    class: naga::ImageClass::Sampled { multi: true, .. },
                    ..
                }
            )
        });
        assert!(multisampled);
    }
}
