use foundation::math::Mat4;

/// Accumulated rotation of the globe about its vertical axis.
///
/// The projector is agnostic to the rotation source: automatic spin and
/// manual drag both feed the same accumulated yaw, and consumers only read
/// the resulting world transform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SphereSpin {
    pub yaw_rad: f64,
    /// User-facing multiplier on the base rate. 0 pauses the spin.
    pub speed_multiplier: f64,
    /// Base rotation rate (radians per second) at multiplier 1.
    pub base_rate_rad_per_s: f64,
}

impl Default for SphereSpin {
    fn default() -> Self {
        Self {
            yaw_rad: 0.0,
            speed_multiplier: 1.0,
            base_rate_rad_per_s: 0.05,
        }
    }
}

impl SphereSpin {
    /// Advances the automatic spin by one frame of `dt_s` seconds.
    pub fn advance(&mut self, dt_s: f64) {
        self.yaw_rad += dt_s * self.speed_multiplier * self.base_rate_rad_per_s;
    }

    /// Applies a manual drag delta (radians), on top of the automatic spin.
    pub fn drag(&mut self, delta_yaw_rad: f64) {
        self.yaw_rad += delta_yaw_rad;
    }

    /// Current world transform of the sphere.
    pub fn world_transform(&self) -> Mat4 {
        Mat4::rotation_y(self.yaw_rad)
    }
}
