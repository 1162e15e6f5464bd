//! wgpu-backed reflection targets.
//!
//! [`GpuTargetPool`] implements [`TargetAllocator`] on a `wgpu::Device`. Each
//! target owns a color texture the water material samples, a depth texture for
//! the mirror pass, and a uniform buffer holding [`ReflectionUniforms`]. A host
//! renders into a target by looking it up with [`GpuTargetPool::target`].

use std::collections::HashMap;

use mirrorscope_core::{MirrorCameraState, Result, TargetHandle};
use wgpu::util::DeviceExt;

use crate::error::{RenderError, RenderResult};
use crate::host::{TargetAllocator, TargetDescriptor};
use crate::uniforms::ReflectionUniforms;

/// GPU resources behind one reflection target.
pub struct GpuReflectionTarget {
    /// Color texture the reflection is rendered into.
    pub color_texture: wgpu::Texture,
    /// View of the color texture.
    pub color_view: wgpu::TextureView,
    /// Depth texture, absent when the descriptor asked for no depth.
    pub depth_texture: Option<wgpu::Texture>,
    /// View of the depth texture.
    pub depth_view: Option<wgpu::TextureView>,
    /// Mirror camera uniforms.
    pub uniform_buffer: wgpu::Buffer,
    /// Descriptor the target was created from.
    pub descriptor: TargetDescriptor,
}

/// Pool of reflection targets on one device.
pub struct GpuTargetPool {
    device: wgpu::Device,
    targets: HashMap<TargetHandle, GpuReflectionTarget>,
    next_id: u64,
}

impl GpuTargetPool {
    /// Format of reflection color textures.
    pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    /// Creates an empty pool.
    pub fn new(device: wgpu::Device) -> Self {
        Self {
            device,
            targets: HashMap::new(),
            next_id: 0,
        }
    }

    /// The device targets are created on.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Looks up a live target.
    pub fn target(&self, handle: TargetHandle) -> Option<&GpuReflectionTarget> {
        self.targets.get(&handle)
    }

    /// Number of live targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns whether the pool holds no target.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Uploads the mirror camera into its target's uniform buffer.
    pub fn write_uniforms(&self, queue: &wgpu::Queue, camera: &MirrorCameraState) -> RenderResult<()> {
        let handle = camera.target.ok_or_else(|| {
            RenderError::TextureCreationFailed(format!("{} has no target", camera.handle))
        })?;
        let target = self
            .targets
            .get(&handle)
            .ok_or(RenderError::UnknownTarget(handle))?;
        let uniforms = ReflectionUniforms::from(camera);
        queue.write_buffer(&target.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
        Ok(())
    }

    fn depth_format(depth_bits: u32) -> RenderResult<Option<wgpu::TextureFormat>> {
        match depth_bits {
            0 => Ok(None),
            16 => Ok(Some(wgpu::TextureFormat::Depth16Unorm)),
            24 => Ok(Some(wgpu::TextureFormat::Depth24Plus)),
            32 => Ok(Some(wgpu::TextureFormat::Depth32Float)),
            other => Err(RenderError::TextureCreationFailed(format!(
                "unsupported depth precision: {other} bits"
            ))),
        }
    }

    fn create_target(&self, descriptor: &TargetDescriptor) -> RenderResult<GpuReflectionTarget> {
        let max = self.device.limits().max_texture_dimension_2d;
        let largest = descriptor.width.max(descriptor.height);
        if largest > max {
            return Err(RenderError::ResolutionTooLarge {
                resolution: largest,
                max,
            });
        }
        if descriptor.width == 0 || descriptor.height == 0 {
            return Err(RenderError::TextureCreationFailed(format!(
                "empty target {}x{}",
                descriptor.width, descriptor.height
            )));
        }
        let depth_format = Self::depth_format(descriptor.depth_bits)?;

        let size = wgpu::Extent3d {
            width: descriptor.width,
            height: descriptor.height,
            depth_or_array_layers: 1,
        };

        let color_texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(descriptor.label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let color_view = color_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let (depth_texture, depth_view) = match depth_format {
            Some(format) => {
                let texture = self.device.create_texture(&wgpu::TextureDescriptor {
                    label: Some("WaterReflection Depth"),
                    size,
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    view_formats: &[],
                });
                let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
                (Some(texture), Some(view))
            }
            None => (None, None),
        };

        let uniform_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("WaterReflection Uniform Buffer"),
                contents: bytemuck::cast_slice(&[ReflectionUniforms::default()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });

        Ok(GpuReflectionTarget {
            color_texture,
            color_view,
            depth_texture,
            depth_view,
            uniform_buffer,
            descriptor: descriptor.clone(),
        })
    }
}

impl TargetAllocator for GpuTargetPool {
    fn allocate_render_target(&mut self, descriptor: &TargetDescriptor) -> Result<TargetHandle> {
        let target = self.create_target(descriptor)?;
        self.next_id += 1;
        let handle = TargetHandle(self.next_id);
        self.targets.insert(handle, target);
        Ok(handle)
    }

    fn release_render_target(&mut self, target: TargetHandle) {
        match self.targets.remove(&target) {
            Some(resources) => {
                resources.color_texture.destroy();
                if let Some(depth) = resources.depth_texture {
                    depth.destroy();
                }
                resources.uniform_buffer.destroy();
            }
            None => log::warn!("release of unknown render target {target}"),
        }
    }
}

/// Creates a device and queue with no surface attached.
pub async fn request_headless_device() -> RenderResult<(wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..wgpu::InstanceDescriptor::default()
    });

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
        .map_err(|_| RenderError::AdapterCreationFailed)?;

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("mirrorscope device (headless)"),
            ..wgpu::DeviceDescriptor::default()
        })
        .await?;

    Ok((device, queue))
}
