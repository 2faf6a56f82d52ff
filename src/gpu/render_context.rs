//! Device, queue and the target the filter graph presents into.

use std::fmt;

/// GPU initialization failures.
#[derive(Debug)]
pub enum GpuInitError {
    /// The window handle could not back a surface.
    Surface(wgpu::CreateSurfaceError),
    /// No adapter can drive the surface (or any adapter, headless).
    Adapter(wgpu::RequestAdapterError),
    /// The adapter refused the device request.
    Device(wgpu::RequestDeviceError),
    /// The surface reports no usable color format.
    NoSurfaceFormat,
}

impl fmt::Display for GpuInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surface(e) => write!(f, "cannot create surface: {e}"),
            Self::Adapter(e) => write!(f, "no usable adapter: {e}"),
            Self::Device(e) => write!(f, "device request refused: {e}"),
            Self::NoSurfaceFormat => {
                write!(f, "surface exposes no presentable color format")
            }
        }
    }
}

impl std::error::Error for GpuInitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Surface(e) => Some(e),
            Self::Adapter(e) => Some(e),
            Self::Device(e) => Some(e),
            Self::NoSurfaceFormat => None,
        }
    }
}

/// Where the combine stage (or the passthrough) writes.
enum Presentation {
    Window {
        surface: wgpu::Surface<'static>,
        config: wgpu::SurfaceConfiguration,
    },
    /// The host supplies a view of `format` to
    /// [`SceneEngine::render_to_view`](crate::engine::SceneEngine::render_to_view).
    Offscreen {
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    },
}

/// wgpu device and queue plus the presentation target.
pub struct RenderContext {
    /// Logical device.
    pub device: wgpu::Device,
    /// Command queue.
    pub queue: wgpu::Queue,
    presentation: Presentation,
}

impl RenderContext {
    /// Open a device that presents to `window`.
    ///
    /// The filter graph writes linear color, so an sRGB surface format is
    /// preferred when the surface offers one.
    ///
    /// # Errors
    ///
    /// Returns [`GpuInitError`] if the surface, adapter or device cannot be
    /// created, or the surface has no color format.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        (width, height): (u32, u32),
    ) -> Result<Self, GpuInitError> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .map_err(GpuInitError::Surface)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                power_preference: wgpu::PowerPreference::HighPerformance,
                ..Default::default()
            })
            .await
            .map_err(GpuInitError::Adapter)?;
        let (device, queue) = open_device(&adapter).await?;

        let caps = surface.get_capabilities(&adapter);
        let format = preferred_surface_format(&caps.formats)
            .ok_or(GpuInitError::NoSurfaceFormat)?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: 2,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: Vec::new(),
        };
        surface.configure(&device, &config);
        log::info!(
            "presenting {format:?} at {}x{}",
            config.width,
            config.height
        );

        Ok(Self {
            device,
            queue,
            presentation: Presentation::Window { surface, config },
        })
    }

    /// Open a device without a window. Frames are rendered with
    /// [`SceneEngine::render_to_view`](crate::engine::SceneEngine::render_to_view)
    /// into host views of `format`.
    ///
    /// # Errors
    ///
    /// Returns [`GpuInitError`] if no adapter or device is available.
    pub async fn headless(
        format: wgpu::TextureFormat,
        (width, height): (u32, u32),
    ) -> Result<Self, GpuInitError> {
        let instance = wgpu::Instance::default();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions::default())
            .await
            .map_err(GpuInitError::Adapter)?;
        let (device, queue) = open_device(&adapter).await?;
        Ok(Self {
            device,
            queue,
            presentation: Presentation::Offscreen {
                format,
                width: width.max(1),
                height: height.max(1),
            },
        })
    }

    /// Format the final pass renders in.
    #[must_use]
    pub fn format(&self) -> wgpu::TextureFormat {
        match &self.presentation {
            Presentation::Window { config, .. } => config.format,
            Presentation::Offscreen { format, .. } => *format,
        }
    }

    /// Presentation size in pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        match &self.presentation {
            Presentation::Window { config, .. } => (config.width, config.height),
            Presentation::Offscreen { width, height, .. } => (*width, *height),
        }
    }

    /// Presentation width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.size().0
    }

    /// Presentation height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.size().1
    }

    /// Adopt a new size, reconfiguring the surface if there is one.
    /// Zero-sized requests are ignored.
    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width == 0 || new_height == 0 {
            return;
        }
        match &mut self.presentation {
            Presentation::Window { surface, config } => {
                config.width = new_width;
                config.height = new_height;
                surface.configure(&self.device, config);
            }
            Presentation::Offscreen { width, height, .. } => {
                *width = new_width;
                *height = new_height;
            }
        }
    }

    /// Next surface texture to present.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the surface cannot hand out a
    /// texture, and [`wgpu::SurfaceError::Lost`] for headless contexts.
    pub fn acquire_frame(
        &self,
    ) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        match &self.presentation {
            Presentation::Window { surface, .. } => surface.get_current_texture(),
            Presentation::Offscreen { .. } => Err(wgpu::SurfaceError::Lost),
        }
    }

    /// Encoder for one frame's passes.
    #[must_use]
    pub fn create_encoder(&self) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Glint Frame Encoder"),
            })
    }

    /// Finish `encoder` and submit it.
    pub fn submit(&self, encoder: wgpu::CommandEncoder) {
        let _ = self.queue.submit(std::iter::once(encoder.finish()));
    }
}

async fn open_device(
    adapter: &wgpu::Adapter,
) -> Result<(wgpu::Device, wgpu::Queue), GpuInitError> {
    log::info!("using adapter: {:?}", adapter.get_info().name);
    adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("Glint Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            ..Default::default()
        })
        .await
        .map_err(GpuInitError::Device)
}

/// First sRGB format in `formats`, else the first one listed.
fn preferred_surface_format(
    formats: &[wgpu::TextureFormat],
) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(wgpu::TextureFormat::is_srgb)
        .or_else(|| formats.first().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat;

    #[test]
    fn srgb_surface_format_is_preferred() {
        let formats = [TextureFormat::Bgra8Unorm, TextureFormat::Bgra8UnormSrgb];
        assert_eq!(
            preferred_surface_format(&formats),
            Some(TextureFormat::Bgra8UnormSrgb)
        );
    }

    #[test]
    fn linear_only_surface_uses_first_format() {
        let formats = [TextureFormat::Rgba16Float, TextureFormat::Bgra8Unorm];
        assert_eq!(
            preferred_surface_format(&formats),
            Some(TextureFormat::Rgba16Float)
        );
    }

    #[test]
    fn empty_format_list_has_no_choice() {
        assert_eq!(preferred_surface_format(&[]), None);
    }
}
