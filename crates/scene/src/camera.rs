use foundation::math::{Mat4, Vec3};

/// Orbit camera around the globe: yaw/pitch around a target at a distance.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitCamera {
    pub yaw_rad: f64,
    pub pitch_rad: f64,
    pub distance: f64,
    pub target: Vec3,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw_rad: 0.6,
            pitch_rad: 0.3,
            distance: 30.0,
            target: Vec3::zero(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraLimits {
    pub pitch_max_rad: f64,
    pub distance_min: f64,
    pub distance_max: f64,
    pub fov_y_rad: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for CameraLimits {
    fn default() -> Self {
        Self {
            pitch_max_rad: 1.55,
            distance_min: 12.0,
            distance_max: 200.0,
            fov_y_rad: 45f64.to_radians(),
            near: 0.05,
            far: 10_000.0,
        }
    }
}

impl OrbitCamera {
    /// Orbit from a pointer delta in pixels.
    pub fn orbit(&mut self, delta_x_px: f64, delta_y_px: f64, limits: &CameraLimits) {
        let speed = 0.005;
        self.yaw_rad += delta_x_px * speed;
        self.pitch_rad = (self.pitch_rad + delta_y_px * speed)
            .clamp(-limits.pitch_max_rad, limits.pitch_max_rad);
    }

    /// Dolly from a wheel delta. Exponential so zoom feels uniform.
    pub fn zoom(&mut self, wheel_delta_y: f64, limits: &CameraLimits) {
        let factor = (wheel_delta_y * 0.0015).exp();
        self.distance = (self.distance * factor).clamp(limits.distance_min, limits.distance_max);
    }

    pub fn eye(&self) -> Vec3 {
        let dir = Vec3::new(
            self.pitch_rad.cos() * self.yaw_rad.cos(),
            self.pitch_rad.sin(),
            self.pitch_rad.cos() * self.yaw_rad.sin(),
        );
        self.target + dir * self.distance
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::new(0.0, 1.0, 0.0))
    }

    pub fn projection_matrix(&self, viewport_w: f64, viewport_h: f64, limits: &CameraLimits) -> Mat4 {
        let aspect = if viewport_h <= 0.0 {
            1.0
        } else {
            (viewport_w / viewport_h).max(1e-6)
        };
        Mat4::perspective_rh_z0(limits.fov_y_rad, aspect, limits.near, limits.far)
    }

    pub fn view_proj(&self, viewport_w: f64, viewport_h: f64, limits: &CameraLimits) -> Mat4 {
        self.projection_matrix(viewport_w, viewport_h, limits)
            .mul(self.view_matrix())
    }
}
