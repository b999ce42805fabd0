use macroquad::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TickIntent {
    pub dir_x: f32,
    pub dir_y: f32,
    pub attack: bool,
}

// Attack triggers are collected every presentation frame and drained once per
// simulation tick, so a click landing between ticks is never lost and a tick
// consumes at most one trigger.
pub struct Input {
    pending_attacks: u32,
}

impl Input {
    pub fn new() -> Self {
        Self { pending_attacks: 0 }
    }

    pub fn poll(&mut self) {
        if is_mouse_button_pressed(MouseButton::Left) {
            self.queue_attack();
        }
    }

    pub fn is_down(&self, key: Key) -> bool {
        match key {
            Key::Left => is_key_down(KeyCode::A) || is_key_down(KeyCode::Left),
            Key::Right => is_key_down(KeyCode::D) || is_key_down(KeyCode::Right),
            Key::Up => is_key_down(KeyCode::W) || is_key_down(KeyCode::Up),
            Key::Down => is_key_down(KeyCode::S) || is_key_down(KeyCode::Down),
        }
    }

    pub fn tick_intent(&mut self) -> TickIntent {
        let mut dir_x = 0.0;
        let mut dir_y = 0.0;
        if self.is_down(Key::Left) {
            dir_x = -1.0;
        }
        if self.is_down(Key::Right) {
            dir_x = 1.0;
        }
        if self.is_down(Key::Up) {
            dir_y = -1.0;
        }
        if self.is_down(Key::Down) {
            dir_y = 1.0;
        }
        TickIntent {
            dir_x,
            dir_y,
            attack: self.drain_attacks(),
        }
    }

    pub fn queue_attack(&mut self) {
        self.pending_attacks += 1;
    }

    fn drain_attacks(&mut self) -> bool {
        let pending = self.pending_attacks > 0;
        self.pending_attacks = 0;
        pending
    }
}
