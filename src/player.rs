use crate::config::{
    PLAYER_BOTTOM_MARGIN, PLAYER_HITBOX_OFFSET, PLAYER_HITBOX_SIZE, PLAYER_SIZE, PLAYER_SPEED,
};
use crate::geometry::{Rect, Viewport};
use crate::input::InputState;

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub speed: f64,
    pub vx: f64,
}

impl Player {
    pub fn spawn(viewport: &Viewport) -> Self {
        let mut player = Self {
            x: 0.0,
            y: 0.0,
            width: PLAYER_SIZE,
            height: PLAYER_SIZE,
            speed: PLAYER_SPEED,
            vx: 0.0,
        };
        player.recenter(viewport);
        player
    }

    pub fn recenter(&mut self, viewport: &Viewport) {
        self.x = viewport.center_x() - self.width * 0.5;
        self.y = viewport.height - PLAYER_BOTTOM_MARGIN;
        self.vx = 0.0;
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn hitbox(&self) -> Rect {
        Rect::new(
            self.x + PLAYER_HITBOX_OFFSET.0,
            self.y + PLAYER_HITBOX_OFFSET.1,
            PLAYER_HITBOX_SIZE.0,
            PLAYER_HITBOX_SIZE.1,
        )
    }

    /// Moves by `steps` nominal frames of input and clamps into the lane.
    pub fn update(&mut self, input: &InputState, steps: f64, viewport: &Viewport) {
        let (dx, dy) = input.axes();
        self.vx = dx * self.speed;
        let vy = dy * self.speed;

        self.x += self.vx * steps;
        self.y += vy * steps;
        self.clamp(viewport);
    }

    fn clamp(&mut self, viewport: &Viewport) {
        let left = viewport.lane_left();
        let right = (viewport.lane_right() - self.width).max(left);
        let bottom = (viewport.height - self.height).max(0.0);
        self.x = self.x.clamp(left, right);
        self.y = self.y.clamp(0.0, bottom);
    }
}
