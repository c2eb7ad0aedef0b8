use rand::Rng;

use crate::config::{
    INITIAL_SPAWN_INTERVAL_MS, OBSTACLE_HEIGHT, OBSTACLE_HITBOX_PAD, OBSTACLE_MAX_SPEED,
    OBSTACLE_MIN_SPEED, SPAWN_FLOOR_MS, SPAWN_STEP_MS,
};
use crate::geometry::{Rect, Viewport};

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub speed: f64,
    pub hitbox: Rect,
}

impl Obstacle {
    pub fn new(x: f64, y: f64, width: f64, height: f64, speed: f64) -> Self {
        // Clamp the inset so a narrow truck ends up with an empty hitbox, never an inverted one.
        let pad_x = OBSTACLE_HITBOX_PAD.0.min(width * 0.5);
        let pad_y = OBSTACLE_HITBOX_PAD.1.min(height * 0.5);
        Self {
            x,
            y,
            width,
            height,
            speed,
            hitbox: Rect::new(
                x + pad_x,
                y + pad_y,
                width - pad_x * 2.0,
                height - pad_y * 2.0,
            ),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    fn advance(&mut self, steps: f64) {
        let dy = self.speed * steps;
        self.y += dy;
        self.hitbox.y += dy;
    }
}

/// Width and height of a truck drawn at the fixed target height, keeping the source aspect.
/// `None` while the source image has not decoded yet.
pub fn obstacle_size(source: (u32, u32)) -> Option<(f64, f64)> {
    let (w, h) = source;
    if w == 0 || h == 0 {
        return None;
    }
    Some((OBSTACLE_HEIGHT * (w as f64 / h as f64), OBSTACLE_HEIGHT))
}

/// Lowers `interval` by `step` but never below `floor`, and never raises it.
#[inline]
pub fn tighten_interval(interval: f64, step: f64, floor: f64) -> f64 {
    (interval - step).max(floor).min(interval)
}

#[derive(Clone, Debug)]
pub struct ObstacleField {
    pub obstacles: Vec<Obstacle>,
    pub spawn_interval: f64,
    pub last_spawn: Option<f64>,
}

impl Default for ObstacleField {
    fn default() -> Self {
        Self {
            obstacles: Vec::new(),
            spawn_interval: INITIAL_SPAWN_INTERVAL_MS,
            last_spawn: None,
        }
    }
}

impl ObstacleField {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn spawn_due(&self, now: f64) -> bool {
        match self.last_spawn {
            None => true,
            Some(last) => now - last > self.spawn_interval,
        }
    }

    /// One tick: spawn when due, advance everything, then drop obstacles that left the
    /// bottom of the canvas. Returns how many left.
    pub fn update<R: Rng>(
        &mut self,
        now: f64,
        steps: f64,
        viewport: &Viewport,
        source: (u32, u32),
        rng: &mut R,
    ) -> u32 {
        if self.spawn_due(now) {
            if let Some(size) = obstacle_size(source) {
                self.spawn(now, size, viewport, rng);
            }
        }

        for obstacle in &mut self.obstacles {
            obstacle.advance(steps);
        }

        self.prune(viewport.height)
    }

    fn spawn<R: Rng>(&mut self, now: f64, size: (f64, f64), viewport: &Viewport, rng: &mut R) {
        let (width, height) = size;
        let min_x = viewport.lane_left();
        let max_x = viewport.lane_right() - width;
        let x = if max_x > min_x {
            rng.gen_range(min_x..max_x)
        } else {
            min_x
        };
        let speed = rng.gen_range(OBSTACLE_MIN_SPEED..OBSTACLE_MAX_SPEED);

        self.obstacles
            .push(Obstacle::new(x, -height, width, height, speed));
        self.last_spawn = Some(now);
        self.spawn_interval = tighten_interval(self.spawn_interval, SPAWN_STEP_MS, SPAWN_FLOOR_MS);
    }

    fn prune(&mut self, canvas_height: f64) -> u32 {
        let before = self.obstacles.len();
        self.obstacles.retain(|ob| ob.y <= canvas_height);
        (before - self.obstacles.len()) as u32
    }

    pub fn first_hit(&self, hitbox: &Rect) -> Option<&Obstacle> {
        self.obstacles.iter().find(|ob| hitbox.overlaps(&ob.hitbox))
    }
}
