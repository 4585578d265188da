use super::Vec3;

/// Column-major 4x4 matrix.
///
/// CPU-side math is kept in `f64`; convert with [`Mat4::to_f32_cols`] only at
/// the GPU upload boundary.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4 {
    pub cols: [[f64; 4]; 4],
}

impl Mat4 {
    pub fn identity() -> Self {
        let mut cols = [[0.0; 4]; 4];
        for (i, col) in cols.iter_mut().enumerate() {
            col[i] = 1.0;
        }
        Self { cols }
    }

    /// Rotation about the +Y (vertical) axis.
    pub fn rotation_y(angle_rad: f64) -> Self {
        let (s, c) = angle_rad.sin_cos();
        Self {
            cols: [
                [c, 0.0, -s, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [s, 0.0, c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Uniform scale about the origin.
    pub fn scale_uniform(s: f64) -> Self {
        let mut m = Self::identity();
        m.cols[0][0] = s;
        m.cols[1][1] = s;
        m.cols[2][2] = s;
        m
    }

    /// Right-handed look-at view matrix.
    pub fn look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let f = (target - eye).normalize().unwrap_or(Vec3::new(0.0, 0.0, -1.0));
        let s = f.cross(up).normalize().unwrap_or(Vec3::new(1.0, 0.0, 0.0));
        let u = s.cross(f);

        Self {
            cols: [
                [s.x, u.x, -f.x, 0.0],
                [s.y, u.y, -f.y, 0.0],
                [s.z, u.z, -f.z, 0.0],
                [-s.dot(eye), -u.dot(eye), f.dot(eye), 1.0],
            ],
        }
    }

    /// Right-handed perspective projection, depth range [0, 1].
    pub fn perspective_rh_z0(fov_y_rad: f64, aspect: f64, near: f64, far: f64) -> Self {
        let f = 1.0 / (0.5 * fov_y_rad).tan();
        let m22 = far / (near - far);
        let m23 = (near * far) / (near - far);

        Self {
            cols: [
                [f / aspect, 0.0, 0.0, 0.0],
                [0.0, f, 0.0, 0.0],
                [0.0, 0.0, m22, -1.0],
                [0.0, 0.0, m23, 0.0],
            ],
        }
    }

    pub fn mul(self, other: Self) -> Self {
        let mut cols = [[0.0; 4]; 4];
        for (col, out) in cols.iter_mut().enumerate() {
            for row in 0..4 {
                out[row] = self.cols[0][row] * other.cols[col][0]
                    + self.cols[1][row] * other.cols[col][1]
                    + self.cols[2][row] * other.cols[col][2]
                    + self.cols[3][row] * other.cols[col][3];
            }
        }
        Self { cols }
    }

    /// Applies the matrix to a point with an implicit `w = 1`, without a
    /// perspective divide. Intended for affine (model/view) transforms.
    pub fn transform_point(self, p: Vec3) -> Vec3 {
        let c = &self.cols;
        Vec3::new(
            c[0][0] * p.x + c[1][0] * p.y + c[2][0] * p.z + c[3][0],
            c[0][1] * p.x + c[1][1] * p.y + c[2][1] * p.z + c[3][1],
            c[0][2] * p.x + c[1][2] * p.y + c[2][2] * p.z + c[3][2],
        )
    }

    /// Full projective transform with perspective divide.
    ///
    /// Returns normalized device coordinates (x, y in [-1, 1] for on-screen
    /// points, z the [0, 1] depth). `None` when the point is at or behind the
    /// eye plane (`w <= 0`) or the result is non-finite.
    pub fn project_point(self, p: Vec3) -> Option<Vec3> {
        let c = &self.cols;
        let w = c[0][3] * p.x + c[1][3] * p.y + c[2][3] * p.z + c[3][3];
        if !(w > 0.0) {
            return None;
        }
        let inv_w = 1.0 / w;
        let ndc = self.transform_point(p) * inv_w;
        if !ndc.is_finite() {
            return None;
        }
        Some(ndc)
    }

    pub fn to_f32_cols(self) -> [[f32; 4]; 4] {
        let mut out = [[0.0f32; 4]; 4];
        for (col, src) in out.iter_mut().zip(self.cols.iter()) {
            for (dst, v) in col.iter_mut().zip(src.iter()) {
                *dst = *v as f32;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::Mat4;
    use crate::math::Vec3;

    fn assert_vec_close(a: Vec3, b: Vec3, eps: f64) {
        assert!(
            a.distance(b) <= eps,
            "expected {a:?} ~= {b:?} (diff {})",
            a.distance(b)
        );
    }

    #[test]
    fn identity_preserves_points() {
        let p = Vec3::new(1.0, -2.0, 3.0);
        assert_eq!(Mat4::identity().transform_point(p), p);
    }

    #[test]
    fn scale_uniform_scales_from_origin() {
        let m = Mat4::rotation_y(0.25).mul(Mat4::scale_uniform(3.0));
        let p = m.transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert!((p.length() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn rotation_y_quarter_turn() {
        let r = Mat4::rotation_y(std::f64::consts::FRAC_PI_2);
        // +X rotates to -Z under a right-handed +Y rotation.
        assert_vec_close(
            r.transform_point(Vec3::new(1.0, 0.0, 0.0)),
            Vec3::new(0.0, 0.0, -1.0),
            1e-12,
        );
        assert_vec_close(
            r.transform_point(Vec3::new(0.0, 1.0, 0.0)),
            Vec3::new(0.0, 1.0, 0.0),
            1e-12,
        );
    }

    #[test]
    fn look_at_moves_eye_to_origin() {
        let view = Mat4::look_at_rh(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::zero(),
            Vec3::new(0.0, 1.0, 0.0),
        );
        assert_vec_close(
            view.transform_point(Vec3::new(0.0, 0.0, 5.0)),
            Vec3::zero(),
            1e-12,
        );
        // A point in front of the eye lands on the -Z axis in view space.
        assert_vec_close(
            view.transform_point(Vec3::zero()),
            Vec3::new(0.0, 0.0, -5.0),
            1e-12,
        );
    }

    #[test]
    fn project_point_centers_the_view_axis() {
        let view = Mat4::look_at_rh(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::zero(),
            Vec3::new(0.0, 1.0, 0.0),
        );
        let proj = Mat4::perspective_rh_z0(60f64.to_radians(), 16.0 / 9.0, 0.05, 100.0);
        let view_proj = proj.mul(view);

        let ndc = view_proj.project_point(Vec3::zero()).expect("in front");
        assert!(ndc.x.abs() < 1e-12 && ndc.y.abs() < 1e-12);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn project_point_rejects_behind_eye() {
        let view = Mat4::look_at_rh(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::zero(),
            Vec3::new(0.0, 1.0, 0.0),
        );
        let proj = Mat4::perspective_rh_z0(60f64.to_radians(), 1.0, 0.05, 100.0);
        let behind = Vec3::new(0.0, 0.0, 10.0);
        assert_eq!(proj.mul(view).project_point(behind), None);
    }

    #[test]
    fn mul_composes_in_application_order() {
        let a = Mat4::rotation_y(0.3);
        let b = Mat4::rotation_y(0.5);
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_vec_close(
            a.mul(b).transform_point(p),
            a.transform_point(b.transform_point(p)),
            1e-12,
        );
        assert_vec_close(
            a.mul(b).transform_point(p),
            Mat4::rotation_y(0.8).transform_point(p),
            1e-12,
        );
    }
}
