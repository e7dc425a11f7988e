use crate::camera::FlightCamera;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{Key, NamedKey};

const MOVE_SPEED: f32 = 0.005;
const ROT_SPEED: f32 = 0.005;
const FORWARD_SPEED: f32 = 0.003;
const EASE_DIVISOR: f32 = 1.03;
const EASE_SNAP: f32 = 0.01;

/// Arrow-key flight controls.
///
/// Left/right strafe and roll, up/down climb and pitch. The plane drifts
/// forward on its own every frame. Releasing a key eases the matching angle
/// back toward level flight.
#[derive(Default)]
pub struct FlightController {
    strafe: f32,
    climb: f32,
    pitch_rate: f32,
    roll_rate: f32,
    easing_pitch: bool,
    easing_roll: bool,
}

impl FlightController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_events(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(key),
                        state,
                        ..
                    },
                ..
            } => self.apply(*key, *state == ElementState::Pressed),
            _ => false,
        }
    }

    fn apply(&mut self, key: NamedKey, pressed: bool) -> bool {
        match key {
            NamedKey::ArrowRight => {
                if pressed {
                    self.strafe = MOVE_SPEED;
                    self.roll_rate = ROT_SPEED;
                    self.easing_roll = false;
                } else {
                    self.strafe = 0.0;
                    self.roll_rate = 0.0;
                    self.easing_roll = true;
                }
                true
            }
            NamedKey::ArrowLeft => {
                if pressed {
                    self.strafe = -MOVE_SPEED;
                    self.roll_rate = -ROT_SPEED;
                    self.easing_roll = false;
                } else {
                    self.strafe = 0.0;
                    self.roll_rate = 0.0;
                    self.easing_roll = true;
                }
                true
            }
            NamedKey::ArrowUp => {
                if pressed {
                    self.climb = -MOVE_SPEED;
                    self.pitch_rate = ROT_SPEED;
                    self.easing_pitch = false;
                } else {
                    self.climb = 0.0;
                    self.pitch_rate = 0.0;
                    self.easing_pitch = true;
                }
                true
            }
            NamedKey::ArrowDown => {
                if pressed {
                    self.climb = MOVE_SPEED;
                    self.pitch_rate = -ROT_SPEED;
                    self.easing_pitch = false;
                } else {
                    self.climb = 0.0;
                    self.pitch_rate = 0.0;
                    self.easing_pitch = true;
                }
                true
            }
            _ => false,
        }
    }

    /// Advances one frame of flight.
    ///
    /// Position wraps so the camera never leaves the tiled terrain: x resets
    /// to 0 outside +-2, y resets to -2 once it passes 0, altitude stays in
    /// [-0.1, 0.3]. Pitch is bounded to +-0.2 and roll to +-0.7.
    pub fn update_camera(&mut self, camera: &mut FlightCamera) {
        camera.position.y += FORWARD_SPEED;
        camera.position.x += self.strafe;
        camera.position.z += self.climb;
        camera.pitch += self.pitch_rate;
        camera.roll += self.roll_rate;

        if camera.position.x > 2.0 || camera.position.x < -2.0 {
            camera.position.x = 0.0;
        }
        if camera.position.y > 0.0 {
            camera.position.y = -2.0;
        }
        camera.position.z = camera.position.z.clamp(-0.1, 0.3);
        camera.pitch = camera.pitch.clamp(-0.2, 0.2);
        camera.roll = camera.roll.clamp(-0.7, 0.7);

        if self.easing_pitch {
            camera.pitch /= EASE_DIVISOR;
            if camera.pitch.abs() < EASE_SNAP {
                camera.pitch = 0.0;
                self.easing_pitch = false;
            }
        }
        if self.easing_roll {
            camera.roll /= EASE_DIVISOR;
            if camera.roll.abs() < EASE_SNAP {
                camera.roll = 0.0;
                self.easing_roll = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn camera() -> FlightCamera {
        FlightCamera::new(Vec3::new(0.0, -2.0, 0.0))
    }

    #[test]
    fn test_roll_clamps_while_turning() {
        let mut controller = FlightController::new();
        let mut camera = camera();

        controller.apply(NamedKey::ArrowRight, true);
        for _ in 0..200 {
            controller.update_camera(&mut camera);
        }

        assert_eq!(camera.roll, 0.7);
        assert_eq!(camera.pitch, 0.0);
    }

    #[test]
    fn test_roll_eases_back_to_level() {
        let mut controller = FlightController::new();
        let mut camera = camera();

        controller.apply(NamedKey::ArrowLeft, true);
        for _ in 0..50 {
            controller.update_camera(&mut camera);
        }
        assert!(camera.roll < 0.0);

        controller.apply(NamedKey::ArrowLeft, false);
        for _ in 0..200 {
            controller.update_camera(&mut camera);
        }
        assert_eq!(camera.roll, 0.0);
    }

    #[test]
    fn test_position_wraps_inside_tiled_terrain() {
        let mut controller = FlightController::new();
        let mut camera = camera();

        camera.position.x = 1.999;
        controller.apply(NamedKey::ArrowRight, true);
        controller.update_camera(&mut camera);
        assert_eq!(camera.position.x, 0.0);

        camera.position.y = -0.001;
        controller.update_camera(&mut camera);
        assert_eq!(camera.position.y, -2.0);
    }

    #[test]
    fn test_altitude_stays_bounded() {
        let mut controller = FlightController::new();
        let mut camera = camera();

        controller.apply(NamedKey::ArrowUp, true);
        for _ in 0..100 {
            controller.update_camera(&mut camera);
        }
        assert_eq!(camera.position.z, -0.1);

        controller.apply(NamedKey::ArrowUp, false);
        controller.apply(NamedKey::ArrowDown, true);
        for _ in 0..200 {
            controller.update_camera(&mut camera);
        }
        assert_eq!(camera.position.z, 0.3);
    }
}
