//! Gestion des contrôles et entrées
//!
//! Les événements fenêtre sont convertis en [`InputEvent`] avant d'atteindre
//! l'état de la scène ; ce module ne connaît que ces enregistrements.

use std::collections::HashSet;

use anyhow::{anyhow, Result};
use bitflags::bitflags;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

use crate::camera::CameraMovement;
use crate::config::InputConfig;

/// Événement d'entrée discret
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key { code: KeyCode, state: ElementState },
    CursorMoved { x: f64, y: f64 },
    Scroll { delta_y: f32 },
}

bitflags! {
    /// Directions de déplacement actuellement demandées
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Movement: u8 {
        const FORWARD = 1 << 0;
        const BACKWARD = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        const UP = 1 << 4;
        const DOWN = 1 << 5;
    }
}

impl Movement {
    /// Directions caméra correspondant aux bits actifs
    pub fn directions(self) -> impl Iterator<Item = CameraMovement> {
        [
            (Movement::FORWARD, CameraMovement::Forward),
            (Movement::BACKWARD, CameraMovement::Backward),
            (Movement::LEFT, CameraMovement::Left),
            (Movement::RIGHT, CameraMovement::Right),
            (Movement::UP, CameraMovement::Up),
            (Movement::DOWN, CameraMovement::Down),
        ]
        .into_iter()
        .filter(move |(flag, _)| self.contains(*flag))
        .map(|(_, direction)| direction)
    }
}

/// Touches associées à chaque direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    pub forward: KeyCode,
    pub backward: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub up: KeyCode,
    pub down: KeyCode,
}

impl KeyBindings {
    /// Résout les noms de touches de la configuration
    pub fn from_config(config: &InputConfig) -> Result<Self> {
        let resolve = |name: &str| {
            key_code_from_name(name).ok_or_else(|| anyhow!("Touche inconnue dans la configuration : '{}'", name))
        };

        Ok(Self {
            forward: resolve(&config.forward)?,
            backward: resolve(&config.backward)?,
            left: resolve(&config.left)?,
            right: resolve(&config.right)?,
            up: resolve(&config.up)?,
            down: resolve(&config.down)?,
        })
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            backward: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
            up: KeyCode::Space,
            down: KeyCode::ShiftLeft,
        }
    }
}

/// Suivi du curseur produisant des déplacements relatifs
#[derive(Debug, Clone, Default)]
pub struct MouseTracker {
    last: Option<(f64, f64)>,
}

impl MouseTracker {
    /// Renvoie (dx, dy) depuis la dernière position ; dy est inversé car
    /// l'axe Y de la fenêtre descend. Le premier appel renvoie (0, 0).
    pub fn offset(&mut self, x: f64, y: f64) -> (f32, f32) {
        let (last_x, last_y) = self.last.unwrap_or((x, y));
        self.last = Some((x, y));
        ((x - last_x) as f32, (last_y - y) as f32)
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Gestionnaire d'entrées
#[derive(Debug)]
pub struct InputManager {
    pressed_keys: HashSet<KeyCode>,
    bindings: KeyBindings,
    pub mouse: MouseTracker,
}

impl InputManager {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            pressed_keys: HashSet::new(),
            bindings,
            mouse: MouseTracker::default(),
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.pressed_keys.insert(key);
            }
            ElementState::Released => {
                self.pressed_keys.remove(&key);
            }
        }
    }

    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    pub fn movement(&self) -> Movement {
        let b = &self.bindings;
        let mut movement = Movement::empty();
        movement.set(Movement::FORWARD, self.is_pressed(b.forward));
        movement.set(Movement::BACKWARD, self.is_pressed(b.backward));
        movement.set(Movement::LEFT, self.is_pressed(b.left));
        movement.set(Movement::RIGHT, self.is_pressed(b.right));
        movement.set(Movement::UP, self.is_pressed(b.up));
        movement.set(Movement::DOWN, self.is_pressed(b.down));
        movement
    }

    /// Relâche toutes les touches (perte de focus)
    pub fn clear(&mut self) {
        self.pressed_keys.clear();
        self.mouse.reset();
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(KeyBindings::default())
    }
}

/// Convertit un nom de touche de la configuration en `KeyCode`
pub fn key_code_from_name(name: &str) -> Option<KeyCode> {
    let code = match name {
        "A" => KeyCode::KeyA,
        "B" => KeyCode::KeyB,
        "C" => KeyCode::KeyC,
        "D" => KeyCode::KeyD,
        "E" => KeyCode::KeyE,
        "F" => KeyCode::KeyF,
        "G" => KeyCode::KeyG,
        "H" => KeyCode::KeyH,
        "I" => KeyCode::KeyI,
        "J" => KeyCode::KeyJ,
        "K" => KeyCode::KeyK,
        "L" => KeyCode::KeyL,
        "M" => KeyCode::KeyM,
        "N" => KeyCode::KeyN,
        "O" => KeyCode::KeyO,
        "P" => KeyCode::KeyP,
        "Q" => KeyCode::KeyQ,
        "R" => KeyCode::KeyR,
        "S" => KeyCode::KeyS,
        "T" => KeyCode::KeyT,
        "U" => KeyCode::KeyU,
        "V" => KeyCode::KeyV,
        "W" => KeyCode::KeyW,
        "X" => KeyCode::KeyX,
        "Y" => KeyCode::KeyY,
        "Z" => KeyCode::KeyZ,
        "Space" => KeyCode::Space,
        "ShiftLeft" | "LShift" => KeyCode::ShiftLeft,
        "ShiftRight" | "RShift" => KeyCode::ShiftRight,
        "ControlLeft" | "LControl" => KeyCode::ControlLeft,
        "ControlRight" | "RControl" => KeyCode::ControlRight,
        "Up" => KeyCode::ArrowUp,
        "Down" => KeyCode::ArrowDown,
        "Left" => KeyCode::ArrowLeft,
        "Right" => KeyCode::ArrowRight,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        _ => return None,
    };
    Some(code)
}
