use glam::{Mat4, Quat, Vec3};

/// Camera flying over the terrain.
///
/// The view is a fixed look-down-the-valley basis composed with the plane's
/// pitch/roll attitude and its position. The terrain is z-up.
pub struct FlightCamera {
    pub position: Vec3,
    pub pitch: f32,
    pub roll: f32,
}

impl FlightCamera {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            pitch: 0.0,
            roll: 0.0,
        }
    }

    pub fn build_view_matrix(&self) -> Mat4 {
        let base = Mat4::look_at_rh(
            Vec3::new(0.0, 0.0, 0.5),
            Vec3::new(0.0, -1.0, 0.4),
            Vec3::Z,
        );
        let attitude = Quat::from_rotation_x(self.pitch) * Quat::from_rotation_y(self.roll);

        base * Mat4::from_quat(attitude) * Mat4::from_translation(self.position)
    }
}

pub struct Projection {
    aspect: f32,
    fovy: f32,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32, fovy_degrees: f32, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height as f32,
            fovy: fovy_degrees.to_radians(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn build_projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy, self.aspect, self.znear, self.zfar)
    }
}
