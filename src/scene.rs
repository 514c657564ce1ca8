//! État de la scène possédé par la boucle de rendu

use std::time::{Duration, Instant};

use winit::event::ElementState;
use winit::keyboard::KeyCode;

use crate::camera::Camera;
use crate::input::{InputEvent, InputManager, KeyBindings};

/// Mesure du temps écoulé entre deux frames
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_frame: Option<Instant>,
    delta: Duration,
    frames: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_frame: None,
            delta: Duration::ZERO,
            frames: 0,
        }
    }

    /// Démarre une nouvelle frame ; la première a un delta nul
    pub fn tick(&mut self, now: Instant) -> f32 {
        self.delta = self
            .last_frame
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last_frame = Some(now);
        self.frames += 1;
        self.delta_seconds()
    }

    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Caméra, entrées et horloge de la démo
#[derive(Debug)]
pub struct SceneState {
    pub camera: Camera,
    pub input: InputManager,
    pub clock: FrameClock,
    quit_requested: bool,
}

impl SceneState {
    pub fn new(camera: Camera, bindings: KeyBindings) -> Self {
        Self {
            camera,
            input: InputManager::new(bindings),
            clock: FrameClock::new(),
            quit_requested: false,
        }
    }

    /// Applique un événement d'entrée
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key { code, state } => {
                if code == KeyCode::Escape && state == ElementState::Pressed {
                    self.quit_requested = true;
                }
                self.input.handle_key(code, state);
            }
            InputEvent::CursorMoved { x, y } => {
                let (dx, dy) = self.input.mouse.offset(x, y);
                self.camera.process_mouse_movement(dx, dy, true);
            }
            InputEvent::Scroll { delta_y } => {
                self.camera.process_mouse_scroll(delta_y);
            }
        }
    }

    /// Avance l'horloge puis déplace la caméra selon les touches enfoncées
    pub fn update(&mut self, now: Instant) {
        let delta_time = self.clock.tick(now);
        for direction in self.input.movement().directions() {
            self.camera.process_keyboard(direction, delta_time);
        }
    }

    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }
}
