//! GPU object picking by index-target readback.
//!
//! The scene pass writes each object's [`PickColor`] into a second color
//! attachment. After the pass, the texel under the cursor is copied into a
//! staging buffer, mapped asynchronously after submit, and read without
//! blocking on a later frame.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use crate::gpu::texture::RenderTarget;
use crate::picking::{PickColor, SelectionResolver};
use crate::scene::ObjectId;

/// Copy row pitch; wgpu requires 256-byte aligned rows.
const STAGING_SIZE: u32 = 256;

const MAP_PENDING: u8 = 0;
const MAP_READY: u8 = 1;
const MAP_FAILED: u8 = 2;

/// Result of the staging-buffer mapping, written by the `map_async`
/// callback.
#[derive(Debug, Clone, Default)]
struct MapSignal(Arc<AtomicU8>);

impl MapSignal {
    fn reset(&self) {
        self.0.store(MAP_PENDING, Ordering::SeqCst);
    }

    fn report(&self, mapped: bool) {
        let state = if mapped { MAP_READY } else { MAP_FAILED };
        self.0.store(state, Ordering::SeqCst);
    }

    fn load(&self) -> u8 {
        self.0.load(Ordering::SeqCst)
    }
}

/// What a poll of the readback found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadbackPoll {
    /// No mapping requested.
    Idle,
    /// Mapping requested and not yet finished.
    Pending,
    /// The buffer is mapped and must be read, then unmapped.
    Ready,
    /// The mapping failed; the buffer is free for the next copy.
    Failed,
}

/// Copy, map and read sequencing, independent of the GPU buffer.
#[derive(Debug, Default)]
struct ReadbackState {
    /// A copy was encoded this frame and awaits `begin_map`.
    copy_pending: bool,
    /// A mapping was requested and has not been consumed.
    in_flight: bool,
    signal: MapSignal,
}

impl ReadbackState {
    fn can_copy(&self) -> bool {
        !self.in_flight
    }

    fn copied(&mut self) {
        self.copy_pending = true;
    }

    /// Signal for a new `map_async` callback, or `None` if there is nothing
    /// to map or a mapping is already in flight.
    fn begin_map(&mut self) -> Option<MapSignal> {
        if self.in_flight || !self.copy_pending {
            return None;
        }
        self.copy_pending = false;
        self.in_flight = true;
        self.signal.reset();
        Some(self.signal.clone())
    }

    /// Check the mapping. `Ready` and `Failed` both end the readback.
    fn poll(&mut self) -> ReadbackPoll {
        if !self.in_flight {
            return ReadbackPoll::Idle;
        }
        match self.signal.load() {
            MAP_READY => {
                self.in_flight = false;
                ReadbackPoll::Ready
            }
            MAP_FAILED => {
                self.in_flight = false;
                ReadbackPoll::Failed
            }
            _ => ReadbackPoll::Pending,
        }
    }
}

/// One-texel readback of the index target.
pub struct IndexPicker {
    staging_buffer: wgpu::Buffer,
    state: ReadbackState,
    resolved: Option<ObjectId>,
}

impl IndexPicker {
    /// Allocate the staging buffer.
    #[must_use]
    pub fn new(device: &wgpu::Device) -> Self {
        let staging_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Index Picker Staging Buffer"),
            size: u64::from(STAGING_SIZE),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });
        Self {
            staging_buffer,
            state: ReadbackState::default(),
            resolved: None,
        }
    }

    /// Copy the texel at `cursor` out of the single-sample index target.
    /// Skipped while a previous readback is still in flight.
    pub fn copy_pixel_to_staging(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        index_target: &RenderTarget,
        (x, y): (u32, u32),
    ) {
        if x >= index_target.width()
            || y >= index_target.height()
            || !self.state.can_copy()
        {
            return;
        }
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &index_target.texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.staging_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(STAGING_SIZE),
                    rows_per_image: Some(1),
                },
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
        self.state.copied();
    }

    /// Request the staging buffer mapping. Call after the queue submit that
    /// carried the copy.
    pub fn start_readback(&mut self) {
        let Some(signal) = self.state.begin_map() else {
            return;
        };
        self.staging_buffer
            .slice(..4)
            .map_async(wgpu::MapMode::Read, move |result| {
                if let Err(e) = &result {
                    log::warn!("index readback mapping failed: {e}");
                }
                signal.report(result.is_ok());
            });
    }

    /// Try to complete the readback without blocking. Returns the texel if
    /// the mapping finished since the last call. A failed mapping returns
    /// `None` and frees the buffer for the next frame's copy.
    pub fn complete_readback(
        &mut self,
        device: &wgpu::Device,
    ) -> Option<PickColor> {
        if !self.state.in_flight {
            return None;
        }
        let _ = device.poll(wgpu::PollType::Poll);

        match self.state.poll() {
            ReadbackPoll::Ready => {
                let data = self.staging_buffer.slice(..4).get_mapped_range();
                let texel = PickColor([data[0], data[1], data[2], data[3]]);
                drop(data);
                self.staging_buffer.unmap();
                Some(texel)
            }
            ReadbackPoll::Idle | ReadbackPoll::Pending | ReadbackPoll::Failed => {
                None
            }
        }
    }

    /// Poll the readback and stash the decoded object for the next
    /// [`SelectionResolver::resolve_selection`] call.
    pub fn poll(&mut self, device: &wgpu::Device) {
        if let Some(texel) = self.complete_readback(device) {
            self.resolved = texel.decode();
            log::trace!("index readback {texel:?} -> {:?}", self.resolved);
        }
    }
}

impl SelectionResolver for IndexPicker {
    fn resolve_selection(&mut self) -> Option<ObjectId> {
        self.resolved.take()
    }
}
