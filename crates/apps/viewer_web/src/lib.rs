use console_error_panic_hook::set_once;
use gloo_net::http::Request;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use catalog::LocationSet;
use foundation::math::Mat4;
use overlay::{
    ClickGuard, FrameInput, ProjectorSettings, ReleaseAction, apply_placements, fallback_links,
    place_pins,
};
use scene::{AssetOutcome, CameraLimits, FrameClock, OrbitCamera, PinSet, RasterImage, SphereSpin};

mod dom;
mod wgpu;
use dom::{DomPinView, build_pin_views, query_rect, show_fallback_list, warn};
use wgpu::{
    GlobeFrame, WgpuContext, init_wgpu_from_canvas_id, render_globe, resize_wgpu, set_base_raster,
    set_cloud_raster,
};

const GLOBE_RADIUS: f64 = 10.0;
const CANVAS_ID: &str = "globe-canvas-3d";
const OVERLAY_ID: &str = "globe-pin-overlay";
const FALLBACK_ID: &str = "globe-fallback";

/// Cloud layer spins slightly faster than the surface so it visibly drifts.
const CLOUD_DRIFT_RATIO: f64 = 1.35;

#[derive(Debug)]
pub struct ViewerState {
    pub locations: LocationSet,
    pub pins: PinSet,
    pub pin_views: Vec<DomPinView>,
    pub camera: OrbitCamera,
    pub limits: CameraLimits,
    pub spin: SphereSpin,
    pub clock: FrameClock,
    pub projector: ProjectorSettings,
    pub click_guard: ClickGuard,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub wgpu: Option<WgpuContext>,
    pub base_layer: AssetOutcome,
    pub cloud_layer: AssetOutcome,
}

thread_local! {
    static STATE: RefCell<ViewerState> = RefCell::new(ViewerState {
        locations: LocationSet::default(),
        pins: PinSet::from_locations(&LocationSet::default(), GLOBE_RADIUS),
        pin_views: Vec::new(),
        camera: OrbitCamera::default(),
        limits: CameraLimits::default(),
        spin: SphereSpin::default(),
        clock: FrameClock::new(1.0 / 60.0),
        projector: ProjectorSettings::default(),
        click_guard: ClickGuard::new(),
        canvas_width: 1280.0,
        canvas_height: 720.0,
        wgpu: None,
        base_layer: AssetOutcome::Pending,
        cloud_layer: AssetOutcome::Pending,
    });
}

const RASTER_MAGIC: &[u8; 4] = b"GLBR";

/// Decodes the `.bin` raster format served for globe layers: 4-byte magic,
/// little-endian u32 width and height, then tightly packed RGBA8.
fn decode_raster(bytes: &[u8]) -> Result<RasterImage, String> {
    if bytes.len() < 12 {
        return Err("raster shorter than its 12-byte header".to_string());
    }
    if &bytes[0..4] != RASTER_MAGIC {
        return Err("bad raster magic".to_string());
    }
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[4..8]);
    let width = u32::from_le_bytes(word);
    word.copy_from_slice(&bytes[8..12]);
    let height = u32::from_le_bytes(word);
    RasterImage::new(width, height, bytes[12..].to_vec())
}

async fn fetch_raster(url: &str) -> Result<RasterImage, String> {
    let resp = Request::get(url).send().await.map_err(|e| e.to_string())?;
    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }
    let bytes = resp.binary().await.map_err(|e| e.to_string())?;
    decode_raster(&bytes)
}

fn globe_frame(state: &ViewerState) -> GlobeFrame {
    let scale = Mat4::scale_uniform(GLOBE_RADIUS);
    let model = state.spin.world_transform().mul(scale);
    let cloud_model = Mat4::rotation_y(state.spin.yaw_rad * CLOUD_DRIFT_RATIO).mul(scale);
    let eye = state.camera.eye();

    GlobeFrame {
        view_proj: state
            .camera
            .view_proj(state.canvas_width, state.canvas_height, &state.limits)
            .to_f32_cols(),
        model: model.to_f32_cols(),
        cloud_model: cloud_model.to_f32_cols(),
        camera_pos: [eye.x as f32, eye.y as f32, eye.z as f32],
        time_s: state.clock.time().0 as f32,
    }
}

fn render_scene() -> Result<(), JsValue> {
    STATE.with(|state_ref| {
        let state = state_ref.borrow();
        if let Some(ctx) = &state.wgpu {
            let frame = globe_frame(&state);
            render_globe(ctx, &frame)?;
        }
        Ok(())
    })
}

/// One synchronous projection pass: both layout rects are queried fresh, the
/// placements computed, and the DOM anchors updated.
fn project_pins() {
    let viewport = query_rect(CANVAS_ID);
    let overlay = query_rect(OVERLAY_ID);

    STATE.with(|state_ref| {
        let mut state = state_ref.borrow_mut();
        let (Some(viewport), Some(overlay)) = (viewport, overlay) else {
            return;
        };

        let input = FrameInput {
            camera_pos: state.camera.eye(),
            view_proj: state
                .camera
                .view_proj(viewport.width, viewport.height, &state.limits),
            sphere_transform: state.spin.world_transform(),
            viewport,
            overlay,
        };
        let placements = place_pins(&state.pins, &input, &state.projector);
        apply_placements(&placements, &mut state.pin_views);
    });
}

fn sync_layers_to_gpu(state: &mut ViewerState) {
    let base = state.base_layer.raster().cloned();
    let clouds = state.cloud_layer.raster().cloned();
    if let Some(ctx) = &mut state.wgpu {
        if let Some(raster) = base {
            set_base_raster(ctx, &raster);
        }
        if let Some(raster) = clouds {
            set_cloud_raster(ctx, &raster);
        }
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Loads the static location list (a JSON array) and builds the session's
/// pins and their DOM anchors. Must run before `init_renderer`.
#[wasm_bindgen]
pub fn load_locations(json: &str) -> Result<usize, JsValue> {
    let locations =
        LocationSet::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let pins = PinSet::from_locations(&locations, GLOBE_RADIUS);
    let pin_views = build_pin_views(OVERLAY_ID, &locations)?;

    let count = pins.len();
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        s.locations = locations;
        s.pins = pins;
        s.pin_views = pin_views;
    });
    Ok(count)
}

/// Starts the GPU backend. When no backend can be initialized the canvas is
/// replaced by the static link list built from the same locations.
#[wasm_bindgen]
pub fn init_renderer() {
    spawn_local(async move {
        match init_wgpu_from_canvas_id(CANVAS_ID).await {
            Ok(ctx) => {
                STATE.with(|state| {
                    let mut s = state.borrow_mut();
                    s.wgpu = Some(ctx);
                    sync_layers_to_gpu(&mut s);
                });
                let _ = render_scene();
                project_pins();
            }
            Err(err) => {
                warn(&format!("globe renderer unavailable: {err:?}"));
                let links = STATE.with(|state| fallback_links(&state.borrow().locations));
                if let Err(err) = show_fallback_list(FALLBACK_ID, CANVAS_ID, &links) {
                    warn(&format!("fallback list failed: {err:?}"));
                }
            }
        }
    });
}

/// Kicks off the startup layer fetches. Each resolves to a per-asset
/// outcome; failures degrade shading and never touch pin projection.
#[wasm_bindgen]
pub fn load_layers(base_url: String, clouds_url: Option<String>) {
    spawn_local(async move {
        let outcome = match fetch_raster(&base_url).await {
            Ok(raster) => AssetOutcome::Loaded(raster),
            Err(reason) => {
                warn(&format!("base layer failed to load: {reason}"));
                AssetOutcome::Failed(reason)
            }
        };
        STATE.with(|state| {
            let mut s = state.borrow_mut();
            s.base_layer = outcome;
            sync_layers_to_gpu(&mut s);
        });
        let _ = render_scene();
    });

    if let Some(clouds_url) = clouds_url {
        spawn_local(async move {
            let outcome = match fetch_raster(&clouds_url).await {
                Ok(raster) => AssetOutcome::Loaded(raster),
                Err(reason) => {
                    warn(&format!("cloud layer failed to load: {reason}"));
                    AssetOutcome::Failed(reason)
                }
            };
            STATE.with(|state| {
                let mut s = state.borrow_mut();
                s.cloud_layer = outcome;
                sync_layers_to_gpu(&mut s);
            });
            let _ = render_scene();
        });
    }
}

/// Advances the deterministic engine time by one fixed-timestep frame,
/// renders, and re-projects every pin.
#[wasm_bindgen]
pub fn advance_frame() -> Result<f64, JsValue> {
    let time_s = STATE.with(|state| {
        let mut s = state.borrow_mut();
        let s = &mut *s;
        s.clock.tick(&mut s.spin).0
    });

    render_scene()?;
    project_pins();
    Ok(time_s)
}

/// Rotation-speed multiplier for the automatic spin. 0 pauses it.
#[wasm_bindgen]
pub fn set_rotation_speed(multiplier: f64) {
    STATE.with(|state| {
        state.borrow_mut().spin.speed_multiplier = multiplier.clamp(0.0, 10.0);
    });
}

/// Orbit around the globe.
///
/// Intended usage: call with pointer delta in pixels.
#[wasm_bindgen]
pub fn camera_orbit(delta_x_px: f64, delta_y_px: f64) -> Result<(), JsValue> {
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        let limits = s.limits;
        s.camera.orbit(delta_x_px, delta_y_px, &limits);
    });
    render_scene()?;
    project_pins();
    Ok(())
}

/// Zoom (dolly) in/out.
///
/// Intended usage: call with wheel deltaY.
#[wasm_bindgen]
pub fn camera_zoom(wheel_delta_y: f64) -> Result<(), JsValue> {
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        let limits = s.limits;
        s.camera.zoom(wheel_delta_y, &limits);
    });
    render_scene()?;
    project_pins();
    Ok(())
}

/// Manually rotate the globe itself by a pointer drag delta in pixels.
#[wasm_bindgen]
pub fn globe_drag(delta_x_px: f64) -> Result<(), JsValue> {
    STATE.with(|state| {
        state.borrow_mut().spin.drag(delta_x_px * 0.005);
    });
    render_scene()?;
    project_pins();
    Ok(())
}

/// Resize hook. Layout can change under us, so this triggers an immediate
/// synchronous re-projection rather than waiting for the next frame.
#[wasm_bindgen]
pub fn set_canvas_sizes(width: f64, height: f64) -> Result<(), JsValue> {
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        s.canvas_width = width;
        s.canvas_height = height;
        if let Some(ctx) = &mut s.wgpu {
            resize_wgpu(ctx, width as u32, height as u32);
        }
    });
    render_scene()?;
    project_pins();
    Ok(())
}

/// Records the press position for the click-vs-drag gesture filter.
#[wasm_bindgen]
pub fn pointer_down(x_px: f64, y_px: f64) {
    STATE.with(|state| {
        state.borrow_mut().click_guard.pointer_down(x_px, y_px);
    });
}

/// Returns `true` when the release ends a drag and the pin's default
/// activation (navigation) must be suppressed for this event.
#[wasm_bindgen]
pub fn pointer_up(x_px: f64, y_px: f64) -> bool {
    STATE.with(|state| {
        state.borrow_mut().click_guard.pointer_up(x_px, y_px) == ReleaseAction::Suppress
    })
}
