use foundation::math::{Mat4, Vec3};
use foundation::rect::PixelRect;
use scene::pins::PinSet;

use crate::view::PinView;

/// Tuning values for pin placement.
///
/// These are calibrated-by-eye constants, not invariants: the small positive
/// occlusion threshold hides pins right at the grazing edge where a zero
/// threshold would flicker, and the scale clamp keeps markers roughly
/// constant-sized across the zoom range.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProjectorSettings {
    /// Pins with `dot(normalize(world_pos), normalize(camera_pos))` at or
    /// below this are on the far side of the globe.
    pub occlusion_threshold: f64,
    pub scale_min: f64,
    pub scale_max: f64,
    /// Distance producing scale 1.0 is `scale_k_factor * radius`.
    pub scale_k_factor: f64,
}

impl Default for ProjectorSettings {
    fn default() -> Self {
        Self {
            occlusion_threshold: 0.02,
            scale_min: 0.7,
            scale_max: 1.4,
            scale_k_factor: 2.8,
        }
    }
}

/// Read-only per-frame snapshot consumed by the projector.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameInput {
    pub camera_pos: Vec3,
    pub view_proj: Mat4,
    /// The sphere's accumulated world transform.
    pub sphere_transform: Mat4,
    /// Render viewport rect, page pixels, queried fresh this frame.
    pub viewport: PixelRect,
    /// Overlay container rect, page pixels, queried fresh this frame.
    pub overlay: PixelRect,
}

/// Where one pin goes this frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PinPlacement {
    /// Position in overlay-container pixels plus a marker scale.
    Shown { left: f64, top: f64, scale: f64 },
    /// Far side of the globe, or projection unusable this frame.
    Hidden,
}

/// Computes this frame's placement for every pin.
///
/// Pure: identical inputs give identical placements, so re-running the pass
/// within a frame is harmless. Output order matches the pin set.
///
/// A pin is `Hidden` when:
/// - it faces away from the camera (occlusion test), or
/// - either layout rect is degenerate (zero-size viewport during layout
///   thrash), or
/// - projection produced no usable finite coordinates.
/// Non-finite values never reach the view layer.
pub fn place_pins(
    pins: &PinSet,
    input: &FrameInput,
    settings: &ProjectorSettings,
) -> Vec<PinPlacement> {
    let mut out = Vec::with_capacity(pins.len());
    if pins.is_empty() {
        return out;
    }

    let rects_usable = !input.viewport.is_degenerate() && !input.overlay.is_degenerate();
    let camera_dir = input.camera_pos.normalize();
    let scale_k = settings.scale_k_factor * pins.radius();

    for pin in pins.iter() {
        let world_pos = input.sphere_transform.transform_point(pin.sphere_pos);

        let facing = match (world_pos.normalize(), camera_dir) {
            (Some(pin_dir), Some(cam_dir)) => pin_dir.dot(cam_dir),
            _ => -1.0,
        };
        if !(facing > settings.occlusion_threshold) {
            out.push(PinPlacement::Hidden);
            continue;
        }

        if !rects_usable {
            out.push(PinPlacement::Hidden);
            continue;
        }

        let Some(ndc) = input.view_proj.project_point(world_pos) else {
            out.push(PinPlacement::Hidden);
            continue;
        };

        let page_px = input.viewport.ndc_to_page_px(ndc);
        let local_px = input.overlay.to_local(page_px);
        if !local_px.is_finite() {
            out.push(PinPlacement::Hidden);
            continue;
        }

        let distance = input.camera_pos.distance(world_pos);
        let scale = if distance > 0.0 {
            (scale_k / distance).clamp(settings.scale_min, settings.scale_max)
        } else {
            settings.scale_max
        };

        out.push(PinPlacement::Shown {
            left: local_px.x,
            top: local_px.y,
            scale,
        });
    }

    out
}

/// Applies placements to the matching pin views.
pub fn apply_placements<V: PinView>(placements: &[PinPlacement], views: &mut [V]) {
    for (placement, view) in placements.iter().zip(views.iter_mut()) {
        match *placement {
            PinPlacement::Shown { left, top, scale } => {
                view.set_position_px(left, top);
                view.set_scale(scale);
                view.set_visible(true);
            }
            PinPlacement::Hidden => {
                view.set_visible(false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FrameInput, PinPlacement, ProjectorSettings, apply_placements, place_pins};
    use crate::view::PinView;
    use catalog::{Location, LocationSet};
    use foundation::math::{Mat4, Vec3};
    use foundation::rect::PixelRect;
    use scene::camera::{CameraLimits, OrbitCamera};
    use scene::pins::PinSet;

    const RADIUS: f64 = 10.0;

    fn location(id: &str, lat: f64, lon: f64) -> Location {
        Location {
            id: id.to_string(),
            location_name: id.to_string(),
            latitude: lat,
            longitude: lon,
            branch_url: format!("https://example.com/{id}"),
        }
    }

    fn pin_set(locs: Vec<Location>) -> PinSet {
        PinSet::from_locations(&LocationSet::from_locations(locs).expect("valid"), RADIUS)
    }

    /// Camera on the +Z axis looking at the origin. Under the texture
    /// convention, (lat 0, lon -90) maps to +Z (theta = 90deg: x = 0, z = +r).
    fn frame_input(camera_pos: Vec3) -> FrameInput {
        let view = Mat4::look_at_rh(camera_pos, Vec3::zero(), Vec3::new(0.0, 1.0, 0.0));
        let proj = Mat4::perspective_rh_z0(45f64.to_radians(), 1.0, 0.05, 1000.0);
        FrameInput {
            camera_pos,
            view_proj: proj.mul(view),
            sphere_transform: Mat4::identity(),
            viewport: PixelRect::new(0.0, 0.0, 800.0, 800.0),
            overlay: PixelRect::new(0.0, 0.0, 800.0, 800.0),
        }
    }

    #[test]
    fn facing_pin_is_shown_far_side_pin_is_hidden() {
        let pins = pin_set(vec![
            location("front", 0.0, -90.0),
            location("back", 0.0, 90.0),
        ]);
        let input = frame_input(Vec3::new(0.0, 0.0, 30.0));

        let placements = place_pins(&pins, &input, &ProjectorSettings::default());
        assert!(matches!(placements[0], PinPlacement::Shown { .. }));
        assert_eq!(placements[1], PinPlacement::Hidden);
    }

    #[test]
    fn facing_pin_lands_near_viewport_center() {
        let pins = pin_set(vec![location("front", 0.0, -90.0)]);
        let input = frame_input(Vec3::new(0.0, 0.0, 30.0));

        let placements = place_pins(&pins, &input, &ProjectorSettings::default());
        let PinPlacement::Shown { left, top, .. } = placements[0] else {
            panic!("expected shown");
        };
        assert!((left - 400.0).abs() < 1e-6, "left = {left}");
        assert!((top - 400.0).abs() < 1e-6, "top = {top}");
    }

    #[test]
    fn offset_overlay_shifts_reported_pixels() {
        let pins = pin_set(vec![location("front", 0.0, -90.0)]);
        let mut input = frame_input(Vec3::new(0.0, 0.0, 30.0));
        input.overlay = PixelRect::new(10.0, 20.0, 820.0, 840.0);

        let placements = place_pins(&pins, &input, &ProjectorSettings::default());
        let PinPlacement::Shown { left, top, .. } = placements[0] else {
            panic!("expected shown");
        };
        assert!((left - 390.0).abs() < 1e-6);
        assert!((top - 380.0).abs() < 1e-6);
    }

    #[test]
    fn grazing_edge_pin_is_hidden_by_the_threshold() {
        // Slightly front of the limb: facing is ~0.0105, positive but below
        // the 0.02 threshold.
        let pins = pin_set(vec![location("limb", 0.0, -179.4)]);
        let input = frame_input(Vec3::new(0.0, 0.0, 30.0));

        let placements = place_pins(&pins, &input, &ProjectorSettings::default());
        assert_eq!(placements[0], PinPlacement::Hidden);
    }

    #[test]
    fn scale_clamps_at_both_extremes() {
        let settings = ProjectorSettings::default();
        let pins = pin_set(vec![location("front", 0.0, -90.0)]);

        // Camera nearly touching the pin: upper clamp.
        let near = frame_input(Vec3::new(0.0, 0.0, RADIUS + 1e-6));
        let placements = place_pins(&pins, &near, &settings);
        if let PinPlacement::Shown { scale, .. } = placements[0] {
            assert_eq!(scale, settings.scale_max);
        } else {
            panic!("expected shown");
        }

        // Camera very far away: lower clamp.
        let far = frame_input(Vec3::new(0.0, 0.0, 1.0e6));
        let placements = place_pins(&pins, &far, &settings);
        if let PinPlacement::Shown { scale, .. } = placements[0] {
            assert_eq!(scale, settings.scale_min);
        } else {
            panic!("expected shown");
        }
    }

    #[test]
    fn sphere_rotation_carries_pins_to_the_far_side() {
        let pins = pin_set(vec![location("front", 0.0, -90.0)]);
        let mut input = frame_input(Vec3::new(0.0, 0.0, 30.0));

        // Half a turn moves the front pin behind the globe.
        input.sphere_transform = Mat4::rotation_y(std::f64::consts::PI);
        let placements = place_pins(&pins, &input, &ProjectorSettings::default());
        assert_eq!(placements[0], PinPlacement::Hidden);
    }

    #[test]
    fn degenerate_viewport_hides_instead_of_propagating_nan() {
        let pins = pin_set(vec![location("front", 0.0, -90.0)]);
        let mut input = frame_input(Vec3::new(0.0, 0.0, 30.0));
        input.viewport = PixelRect::new(0.0, 0.0, 0.0, 0.0);

        let placements = place_pins(&pins, &input, &ProjectorSettings::default());
        assert_eq!(placements[0], PinPlacement::Hidden);
    }

    #[test]
    fn empty_pin_set_is_a_no_op() {
        let pins = pin_set(vec![]);
        let input = frame_input(Vec3::new(0.0, 0.0, 30.0));
        assert!(place_pins(&pins, &input, &ProjectorSettings::default()).is_empty());
    }

    #[test]
    fn identical_inputs_give_identical_placements() {
        let pins = pin_set(vec![
            location("a", 12.0, 80.0),
            location("b", -40.0, 100.0),
            location("c", 5.0, -95.0),
        ]);
        let camera = OrbitCamera::default();
        let limits = CameraLimits::default();
        let input = FrameInput {
            camera_pos: camera.eye(),
            view_proj: camera.view_proj(1280.0, 720.0, &limits),
            sphere_transform: Mat4::rotation_y(0.8),
            viewport: PixelRect::new(16.0, 64.0, 1280.0, 720.0),
            overlay: PixelRect::new(12.0, 60.0, 1288.0, 728.0),
        };

        let settings = ProjectorSettings::default();
        let first = place_pins(&pins, &input, &settings);
        let second = place_pins(&pins, &input, &settings);
        assert_eq!(first, second);
    }

    #[derive(Debug, Default)]
    struct RecordingView {
        position: Option<(f64, f64)>,
        scale: Option<f64>,
        visible: Option<bool>,
        target: String,
    }

    impl PinView for RecordingView {
        fn set_position_px(&mut self, left: f64, top: f64) {
            self.position = Some((left, top));
        }

        fn set_visible(&mut self, visible: bool) {
            self.visible = Some(visible);
        }

        fn set_scale(&mut self, scale: f64) {
            self.scale = Some(scale);
        }

        fn activation_target(&self) -> &str {
            &self.target
        }
    }

    #[test]
    fn apply_skips_position_updates_for_hidden_pins() {
        let placements = vec![
            PinPlacement::Shown {
                left: 10.0,
                top: 20.0,
                scale: 1.1,
            },
            PinPlacement::Hidden,
        ];
        let mut views = vec![RecordingView::default(), RecordingView::default()];
        apply_placements(&placements, &mut views);

        assert_eq!(views[0].position, Some((10.0, 20.0)));
        assert_eq!(views[0].scale, Some(1.1));
        assert_eq!(views[0].visible, Some(true));

        assert_eq!(views[1].position, None);
        assert_eq!(views[1].visible, Some(false));
    }
}
