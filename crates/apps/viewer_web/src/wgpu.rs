#[cfg(target_arch = "wasm32")]
mod imp {
    use ::wgpu::util::DeviceExt;
    use foundation::math::latlon_to_sphere;
    use scene::RasterImage;
    use std::borrow::Cow;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    #[derive(Debug)]
    pub struct WgpuContext {
        pub _instance: &'static ::wgpu::Instance,
        pub surface: ::wgpu::Surface<'static>,
        pub device: ::wgpu::Device,
        pub queue: ::wgpu::Queue,
        pub config: ::wgpu::SurfaceConfiguration,
        pub _canvas: web_sys::HtmlCanvasElement,
        pub globe_pipeline: ::wgpu::RenderPipeline,
        pub clouds_pipeline: ::wgpu::RenderPipeline,
        pub atmosphere_pipeline: ::wgpu::RenderPipeline,
        pub globals_buffer: ::wgpu::Buffer,
        pub globals_bind_group: ::wgpu::BindGroup,
        pub texture_bgl: ::wgpu::BindGroupLayout,
        pub texture_bind_group: ::wgpu::BindGroup,
        pub sampler: ::wgpu::Sampler,
        pub base_texture: ::wgpu::Texture,
        pub cloud_texture: ::wgpu::Texture,
        pub depth_view: ::wgpu::TextureView,
        pub vertex_buffer: ::wgpu::Buffer,
        pub index_buffer: ::wgpu::Buffer,
        pub index_count: u32,
        pub has_base_texture: bool,
        pub has_cloud_texture: bool,
    }

    /// Per-frame renderer inputs, already converted at the f64 -> f32
    /// boundary.
    #[derive(Debug, Copy, Clone)]
    pub struct GlobeFrame {
        pub view_proj: [[f32; 4]; 4],
        pub model: [[f32; 4]; 4],
        /// Cloud layer transform; drifts slightly ahead of the surface.
        pub cloud_model: [[f32; 4]; 4],
        pub camera_pos: [f32; 3],
        pub time_s: f32,
    }

    const GLOBE_SHADER: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    cloud_model: mat4x4<f32>,
    camera_pos: vec3<f32>,
    time_s: f32,
    // x: base texture loaded, y: cloud texture loaded,
    // z: atmosphere shell scale, w: cloud shell scale.
    params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

@group(1) @binding(0)
var base_tex: texture_2d<f32>;
@group(1) @binding(1)
var layer_samp: sampler;
@group(1) @binding(2)
var cloud_tex: texture_2d<f32>;

struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
) -> VsOut {
    let world = globals.model * vec4<f32>(position, 1.0);
    return VsOut(
        globals.view_proj * world,
        (globals.model * vec4<f32>(normal, 0.0)).xyz,
        uv,
    );
}

@fragment
fn fs_main(fs_in: VsOut) -> @location(0) vec4<f32> {
    let n = normalize(fs_in.normal);
    let l = normalize(vec3<f32>(0.4, 0.7, 0.2));
    let shade = 0.25 + 0.75 * max(dot(n, l), 0.0);

    var base = vec3<f32>(0.10, 0.55, 0.85);
    if (globals.params.x > 0.5) {
        base = textureSample(base_tex, layer_samp, fs_in.uv).rgb;
    }
    return vec4<f32>(base * shade, 1.0);
}
"#;

    const CLOUDS_SHADER: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    cloud_model: mat4x4<f32>,
    camera_pos: vec3<f32>,
    time_s: f32,
    params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

@group(1) @binding(0)
var base_tex: texture_2d<f32>;
@group(1) @binding(1)
var layer_samp: sampler;
@group(1) @binding(2)
var cloud_tex: texture_2d<f32>;

struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
) -> VsOut {
    // The cloud layer is the same unit sphere pushed out to a thin shell.
    let world = globals.cloud_model * vec4<f32>(position * globals.params.w, 1.0);
    return VsOut(
        globals.view_proj * world,
        (globals.cloud_model * vec4<f32>(normal, 0.0)).xyz,
        uv,
    );
}

@fragment
fn fs_main(fs_in: VsOut) -> @location(0) vec4<f32> {
    let n = normalize(fs_in.normal);
    let l = normalize(vec3<f32>(0.4, 0.7, 0.2));
    let shade = 0.35 + 0.65 * max(dot(n, l), 0.0);

    // White-on-black cloud raster: brightness doubles as coverage.
    let cover = textureSample(cloud_tex, layer_samp, fs_in.uv).r;
    return vec4<f32>(vec3<f32>(shade), cover * 0.85);
}
"#;

    const ATMOSPHERE_SHADER: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    cloud_model: mat4x4<f32>,
    camera_pos: vec3<f32>,
    time_s: f32,
    params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) world: vec3<f32>,
};

@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
) -> VsOut {
    let world = globals.model * vec4<f32>(position * globals.params.z, 1.0);
    return VsOut(
        globals.view_proj * world,
        (globals.model * vec4<f32>(normal, 0.0)).xyz,
        world.xyz,
    );
}

@fragment
fn fs_main(fs_in: VsOut) -> @location(0) vec4<f32> {
    let n = normalize(fs_in.normal);
    let v = normalize(globals.camera_pos - fs_in.world);
    let rim = pow(1.0 - max(dot(n, v), 0.0), 3.0);
    return vec4<f32>(vec3<f32>(0.30, 0.55, 1.00) * rim, rim);
}
"#;

    #[repr(C)]
    #[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
    struct Vertex {
        position: [f32; 3],
        normal: [f32; 3],
        uv: [f32; 2],
    }

    #[repr(C)]
    #[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
    struct Globals {
        view_proj: [[f32; 4]; 4],
        model: [[f32; 4]; 4],
        cloud_model: [[f32; 4]; 4],
        camera_pos: [f32; 3],
        time_s: f32,
        params: [f32; 4],
    }

    const ATMOSPHERE_SHELL_SCALE: f32 = 1.035;
    const CLOUD_SHELL_SCALE: f32 = 1.012;

    fn create_depth_view(
        device: &::wgpu::Device,
        config: &::wgpu::SurfaceConfiguration,
    ) -> ::wgpu::TextureView {
        let tex = device.create_texture(&::wgpu::TextureDescriptor {
            label: Some("globe-depth"),
            size: ::wgpu::Extent3d {
                width: config.width.max(1),
                height: config.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: ::wgpu::TextureDimension::D2,
            format: ::wgpu::TextureFormat::Depth24Plus,
            usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        tex.create_view(&::wgpu::TextureViewDescriptor::default())
    }

    /// Unit sphere with equirectangular UVs.
    ///
    /// Vertex positions come from the same lat/lon mapping the pins use, so
    /// the texture and the pin anchors cannot drift apart.
    fn generate_globe_mesh(lat_segments: u32, lon_segments: u32) -> (Vec<Vertex>, Vec<u16>) {
        let lat_segments = lat_segments.max(3);
        let lon_segments = lon_segments.max(3);

        let mut vertices = Vec::with_capacity(((lat_segments + 1) * (lon_segments + 1)) as usize);
        for row in 0..=lat_segments {
            let v = row as f64 / lat_segments as f64;
            let lat = 90.0 - 180.0 * v;
            for col in 0..=lon_segments {
                let u = col as f64 / lon_segments as f64;
                let lon = -180.0 + 360.0 * u;
                let p = latlon_to_sphere(lat, lon, 1.0);
                let position = [p.x as f32, p.y as f32, p.z as f32];
                vertices.push(Vertex {
                    position,
                    normal: position,
                    uv: [u as f32, v as f32],
                });
            }
        }

        let stride = lon_segments + 1;
        let mut indices = Vec::with_capacity((lat_segments * lon_segments * 6) as usize);
        for lat in 0..lat_segments {
            for lon in 0..lon_segments {
                let i0 = lat * stride + lon;
                let i1 = i0 + 1;
                let i2 = i0 + stride;
                let i3 = i2 + 1;

                indices.push(i0 as u16);
                indices.push(i2 as u16);
                indices.push(i1 as u16);
                indices.push(i1 as u16);
                indices.push(i2 as u16);
                indices.push(i3 as u16);
            }
        }

        (vertices, indices)
    }

    fn vertex_layout() -> ::wgpu::VertexBufferLayout<'static> {
        ::wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as ::wgpu::BufferAddress,
            step_mode: ::wgpu::VertexStepMode::Vertex,
            attributes: &[
                ::wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: ::wgpu::VertexFormat::Float32x3,
                },
                ::wgpu::VertexAttribute {
                    offset: 12,
                    shader_location: 1,
                    format: ::wgpu::VertexFormat::Float32x3,
                },
                ::wgpu::VertexAttribute {
                    offset: 24,
                    shader_location: 2,
                    format: ::wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }

    fn create_layer_texture(
        device: &::wgpu::Device,
        label: &str,
        width: u32,
        height: u32,
    ) -> ::wgpu::Texture {
        device.create_texture(&::wgpu::TextureDescriptor {
            label: Some(label),
            size: ::wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: ::wgpu::TextureDimension::D2,
            format: ::wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: ::wgpu::TextureUsages::TEXTURE_BINDING | ::wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        })
    }

    fn create_texture_bind_group(
        device: &::wgpu::Device,
        layout: &::wgpu::BindGroupLayout,
        sampler: &::wgpu::Sampler,
        base: &::wgpu::Texture,
        clouds: &::wgpu::Texture,
    ) -> ::wgpu::BindGroup {
        let base_view = base.create_view(&::wgpu::TextureViewDescriptor::default());
        let cloud_view = clouds.create_view(&::wgpu::TextureViewDescriptor::default());
        device.create_bind_group(&::wgpu::BindGroupDescriptor {
            label: Some("globe-layers-bg"),
            layout,
            entries: &[
                ::wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ::wgpu::BindingResource::TextureView(&base_view),
                },
                ::wgpu::BindGroupEntry {
                    binding: 1,
                    resource: ::wgpu::BindingResource::Sampler(sampler),
                },
                ::wgpu::BindGroupEntry {
                    binding: 2,
                    resource: ::wgpu::BindingResource::TextureView(&cloud_view),
                },
            ],
        })
    }

    fn upload_raster(queue: &::wgpu::Queue, texture: &::wgpu::Texture, raster: &RasterImage) {
        queue.write_texture(
            ::wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: ::wgpu::Origin3d::ZERO,
                aspect: ::wgpu::TextureAspect::All,
            },
            &raster.rgba8,
            ::wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(raster.width * 4),
                rows_per_image: Some(raster.height),
            },
            ::wgpu::Extent3d {
                width: raster.width,
                height: raster.height,
                depth_or_array_layers: 1,
            },
        );
    }

    pub async fn init_wgpu_from_canvas_id(canvas_id: &str) -> Result<WgpuContext, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("window missing"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("document missing"))?;
        let canvas_elem = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str("canvas missing"))?
            .dyn_into::<web_sys::HtmlCanvasElement>()?;

        let width = canvas_elem.width();
        let height = canvas_elem.height();

        // IMPORTANT: `wgpu::Surface` must not outlive its `wgpu::Instance`.
        // To avoid UB, we leak the instance for the lifetime of the app.
        //
        // Prefer WebGPU when available, but allow WebGL as a fallback.
        let instance: &'static ::wgpu::Instance = Box::leak(Box::new(::wgpu::Instance::new(
            &::wgpu::InstanceDescriptor {
                backends: ::wgpu::Backends::BROWSER_WEBGPU | ::wgpu::Backends::GL,
                ..Default::default()
            },
        )));

        let surface = instance
            .create_surface(::wgpu::SurfaceTarget::Canvas(canvas_elem.clone()))
            .map_err(|e| JsValue::from_str(&format!("surface error: {e}")))?;

        let adapter = instance
            .request_adapter(&::wgpu::RequestAdapterOptions {
                power_preference: ::wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("adapter error: {e}")))?;

        let (device, queue) = adapter
            .request_device(&::wgpu::DeviceDescriptor {
                label: Some("globe-wgpu-device"),
                required_features: ::wgpu::Features::empty(),
                required_limits: ::wgpu::Limits::downlevel_webgl2_defaults(),
                ..Default::default()
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("device error: {e}")))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .cloned()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let config = ::wgpu::SurfaceConfiguration {
            usage: ::wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            desired_maximum_frame_latency: 2,
            present_mode: ::wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_view(&device, &config);

        let globe_shader = device.create_shader_module(::wgpu::ShaderModuleDescriptor {
            label: Some("globe-surface-shader"),
            source: ::wgpu::ShaderSource::Wgsl(Cow::Borrowed(GLOBE_SHADER)),
        });
        let clouds_shader = device.create_shader_module(::wgpu::ShaderModuleDescriptor {
            label: Some("globe-clouds-shader"),
            source: ::wgpu::ShaderSource::Wgsl(Cow::Borrowed(CLOUDS_SHADER)),
        });
        let atmosphere_shader = device.create_shader_module(::wgpu::ShaderModuleDescriptor {
            label: Some("globe-atmosphere-shader"),
            source: ::wgpu::ShaderSource::Wgsl(Cow::Borrowed(ATMOSPHERE_SHADER)),
        });

        let globals_buffer = device.create_buffer(&::wgpu::BufferDescriptor {
            label: Some("globe-globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: ::wgpu::BufferUsages::UNIFORM | ::wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let globals_bgl = device.create_bind_group_layout(&::wgpu::BindGroupLayoutDescriptor {
            label: Some("globe-globals-bgl"),
            entries: &[::wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: ::wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: ::wgpu::BindingType::Buffer {
                    ty: ::wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let globals_bind_group = device.create_bind_group(&::wgpu::BindGroupDescriptor {
            label: Some("globe-globals-bg"),
            layout: &globals_bgl,
            entries: &[::wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let texture_bgl = device.create_bind_group_layout(&::wgpu::BindGroupLayoutDescriptor {
            label: Some("globe-layers-bgl"),
            entries: &[
                ::wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ::wgpu::ShaderStages::FRAGMENT,
                    ty: ::wgpu::BindingType::Texture {
                        sample_type: ::wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: ::wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                ::wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: ::wgpu::ShaderStages::FRAGMENT,
                    ty: ::wgpu::BindingType::Sampler(::wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                ::wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: ::wgpu::ShaderStages::FRAGMENT,
                    ty: ::wgpu::BindingType::Texture {
                        sample_type: ::wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: ::wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&::wgpu::SamplerDescriptor {
            label: Some("globe-layer-sampler"),
            address_mode_u: ::wgpu::AddressMode::Repeat,
            address_mode_v: ::wgpu::AddressMode::ClampToEdge,
            mag_filter: ::wgpu::FilterMode::Linear,
            min_filter: ::wgpu::FilterMode::Linear,
            ..Default::default()
        });

        // Placeholder 1x1 layers until the startup fetches resolve.
        let base_texture = create_layer_texture(&device, "globe-base-layer", 1, 1);
        let cloud_texture = create_layer_texture(&device, "globe-cloud-layer", 1, 1);
        let texture_bind_group = create_texture_bind_group(
            &device,
            &texture_bgl,
            &sampler,
            &base_texture,
            &cloud_texture,
        );

        let surface_pipeline_layout =
            device.create_pipeline_layout(&::wgpu::PipelineLayoutDescriptor {
                label: Some("globe-surface-pipeline-layout"),
                bind_group_layouts: &[&globals_bgl, &texture_bgl],
                immediate_size: 0,
            });
        let atmosphere_pipeline_layout =
            device.create_pipeline_layout(&::wgpu::PipelineLayoutDescriptor {
                label: Some("globe-atmosphere-pipeline-layout"),
                bind_group_layouts: &[&globals_bgl],
                immediate_size: 0,
            });

        let globe_pipeline = device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
            label: Some("globe-surface-pipeline"),
            layout: Some(&surface_pipeline_layout),
            vertex: ::wgpu::VertexState {
                module: &globe_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout()],
            },
            fragment: Some(::wgpu::FragmentState {
                module: &globe_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(::wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: ::wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: ::wgpu::PrimitiveState {
                topology: ::wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: ::wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: ::wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(::wgpu::DepthStencilState {
                format: ::wgpu::TextureFormat::Depth24Plus,
                depth_write_enabled: true,
                depth_compare: ::wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: ::wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let clouds_pipeline = device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
            label: Some("globe-clouds-pipeline"),
            layout: Some(&surface_pipeline_layout),
            vertex: ::wgpu::VertexState {
                module: &clouds_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout()],
            },
            fragment: Some(::wgpu::FragmentState {
                module: &clouds_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(::wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(::wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: ::wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: ::wgpu::PrimitiveState {
                topology: ::wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: ::wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: ::wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            // Clouds read depth so the far hemisphere shell stays hidden,
            // but never write it.
            depth_stencil: Some(::wgpu::DepthStencilState {
                format: ::wgpu::TextureFormat::Depth24Plus,
                depth_write_enabled: false,
                depth_compare: ::wgpu::CompareFunction::LessEqual,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: ::wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let atmosphere_pipeline =
            device.create_render_pipeline(&::wgpu::RenderPipelineDescriptor {
                label: Some("globe-atmosphere-pipeline"),
                layout: Some(&atmosphere_pipeline_layout),
                vertex: ::wgpu::VertexState {
                    module: &atmosphere_shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[vertex_layout()],
                },
                fragment: Some(::wgpu::FragmentState {
                    module: &atmosphere_shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(::wgpu::ColorTargetState {
                        format: config.format,
                        blend: Some(::wgpu::BlendState {
                            color: ::wgpu::BlendComponent {
                                src_factor: ::wgpu::BlendFactor::SrcAlpha,
                                dst_factor: ::wgpu::BlendFactor::One,
                                operation: ::wgpu::BlendOperation::Add,
                            },
                            alpha: ::wgpu::BlendComponent::OVER,
                        }),
                        write_mask: ::wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: ::wgpu::PrimitiveState {
                    topology: ::wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: ::wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: ::wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(::wgpu::DepthStencilState {
                    format: ::wgpu::TextureFormat::Depth24Plus,
                    depth_write_enabled: false,
                    depth_compare: ::wgpu::CompareFunction::LessEqual,
                    stencil: Default::default(),
                    bias: Default::default(),
                }),
                multisample: ::wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

        let (vertices, indices) = generate_globe_mesh(48, 96);
        let vertex_buffer = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some("globe-vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: ::wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&::wgpu::util::BufferInitDescriptor {
            label: Some("globe-indices"),
            contents: bytemuck::cast_slice(&indices),
            usage: ::wgpu::BufferUsages::INDEX,
        });

        Ok(WgpuContext {
            _instance: instance,
            surface,
            device,
            queue,
            config,
            _canvas: canvas_elem,
            globe_pipeline,
            clouds_pipeline,
            atmosphere_pipeline,
            globals_buffer,
            globals_bind_group,
            texture_bgl,
            texture_bind_group,
            sampler,
            base_texture,
            cloud_texture,
            depth_view,
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            has_base_texture: false,
            has_cloud_texture: false,
        })
    }

    pub fn set_base_raster(ctx: &mut WgpuContext, raster: &RasterImage) {
        ctx.base_texture =
            create_layer_texture(&ctx.device, "globe-base-layer", raster.width, raster.height);
        upload_raster(&ctx.queue, &ctx.base_texture, raster);
        ctx.texture_bind_group = create_texture_bind_group(
            &ctx.device,
            &ctx.texture_bgl,
            &ctx.sampler,
            &ctx.base_texture,
            &ctx.cloud_texture,
        );
        ctx.has_base_texture = true;
    }

    pub fn set_cloud_raster(ctx: &mut WgpuContext, raster: &RasterImage) {
        ctx.cloud_texture = create_layer_texture(
            &ctx.device,
            "globe-cloud-layer",
            raster.width,
            raster.height,
        );
        upload_raster(&ctx.queue, &ctx.cloud_texture, raster);
        ctx.texture_bind_group = create_texture_bind_group(
            &ctx.device,
            &ctx.texture_bgl,
            &ctx.sampler,
            &ctx.base_texture,
            &ctx.cloud_texture,
        );
        ctx.has_cloud_texture = true;
    }

    pub fn resize_wgpu(ctx: &mut WgpuContext, width: u32, height: u32) {
        ctx.config.width = width.max(1);
        ctx.config.height = height.max(1);
        ctx.surface.configure(&ctx.device, &ctx.config);
        ctx.depth_view = create_depth_view(&ctx.device, &ctx.config);
    }

    pub fn render_globe(ctx: &WgpuContext, frame: &GlobeFrame) -> Result<(), JsValue> {
        let surface_frame = ctx
            .surface
            .get_current_texture()
            .map_err(|e| JsValue::from_str(&format!("surface acquire failed: {e}")))?;
        let view = surface_frame
            .texture
            .create_view(&::wgpu::TextureViewDescriptor::default());

        let globals = Globals {
            view_proj: frame.view_proj,
            model: frame.model,
            cloud_model: frame.cloud_model,
            camera_pos: frame.camera_pos,
            time_s: frame.time_s,
            params: [
                if ctx.has_base_texture { 1.0 } else { 0.0 },
                if ctx.has_cloud_texture { 1.0 } else { 0.0 },
                ATMOSPHERE_SHELL_SCALE,
                CLOUD_SHELL_SCALE,
            ],
        };
        ctx.queue
            .write_buffer(&ctx.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let mut encoder = ctx
            .device
            .create_command_encoder(&::wgpu::CommandEncoderDescriptor {
                label: Some("globe-encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&::wgpu::RenderPassDescriptor {
                label: Some("globe-pass"),
                color_attachments: &[Some(::wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: ::wgpu::Operations {
                        load: ::wgpu::LoadOp::Clear(::wgpu::Color {
                            r: 0.004,
                            g: 0.008,
                            b: 0.016,
                            a: 1.0,
                        }),
                        store: ::wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(::wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_view,
                    depth_ops: Some(::wgpu::Operations {
                        load: ::wgpu::LoadOp::Clear(1.0),
                        store: ::wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            rpass.set_vertex_buffer(0, ctx.vertex_buffer.slice(..));
            rpass.set_index_buffer(ctx.index_buffer.slice(..), ::wgpu::IndexFormat::Uint16);

            rpass.set_pipeline(&ctx.globe_pipeline);
            rpass.set_bind_group(0, &ctx.globals_bind_group, &[]);
            rpass.set_bind_group(1, &ctx.texture_bind_group, &[]);
            rpass.draw_indexed(0..ctx.index_count, 0, 0..1);

            if ctx.has_cloud_texture {
                rpass.set_pipeline(&ctx.clouds_pipeline);
                rpass.set_bind_group(0, &ctx.globals_bind_group, &[]);
                rpass.set_bind_group(1, &ctx.texture_bind_group, &[]);
                rpass.draw_indexed(0..ctx.index_count, 0, 0..1);
            }

            rpass.set_pipeline(&ctx.atmosphere_pipeline);
            rpass.set_bind_group(0, &ctx.globals_bind_group, &[]);
            rpass.draw_indexed(0..ctx.index_count, 0, 0..1);
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        surface_frame.present();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use scene::RasterImage;
    use wasm_bindgen::prelude::JsValue;

    #[derive(Debug, Default)]
    pub struct WgpuContext;

    #[derive(Debug, Copy, Clone)]
    pub struct GlobeFrame {
        pub view_proj: [[f32; 4]; 4],
        pub model: [[f32; 4]; 4],
        pub cloud_model: [[f32; 4]; 4],
        pub camera_pos: [f32; 3],
        pub time_s: f32,
    }

    pub async fn init_wgpu_from_canvas_id(_canvas_id: &str) -> Result<WgpuContext, JsValue> {
        Err(JsValue::from_str(
            "wgpu initialization is only available on wasm32 targets",
        ))
    }

    pub fn set_base_raster(_ctx: &mut WgpuContext, _raster: &RasterImage) {}

    pub fn set_cloud_raster(_ctx: &mut WgpuContext, _raster: &RasterImage) {}

    pub fn resize_wgpu(_ctx: &mut WgpuContext, _width: u32, _height: u32) {}

    pub fn render_globe(_ctx: &WgpuContext, _frame: &GlobeFrame) -> Result<(), JsValue> {
        Err(JsValue::from_str(
            "wgpu rendering is only available on wasm32 targets",
        ))
    }
}

pub use imp::{
    GlobeFrame, WgpuContext, init_wgpu_from_canvas_id, render_globe, resize_wgpu,
    set_base_raster, set_cloud_raster,
};
