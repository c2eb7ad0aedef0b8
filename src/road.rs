use crate::config::{ROAD_SPEED, STRIPE_GAP, STRIPE_HEIGHT, STRIPE_WIDTH};
use crate::geometry::{Rect, Viewport};
use crate::surface::Surface;
use crate::theme::Theme;

#[derive(Clone, Debug, PartialEq)]
pub struct Road {
    pub stripe_width: f64,
    pub stripe_height: f64,
    pub gap: f64,
    pub speed: f64,
    pub offset: f64,
}

impl Default for Road {
    fn default() -> Self {
        Self {
            stripe_width: STRIPE_WIDTH,
            stripe_height: STRIPE_HEIGHT,
            gap: STRIPE_GAP,
            speed: ROAD_SPEED,
            offset: 0.0,
        }
    }
}

impl Road {
    pub fn period(&self) -> f64 {
        self.stripe_height + self.gap
    }

    pub fn advance(&mut self, steps: f64) {
        self.offset += self.speed * steps;
        if self.offset >= self.period() {
            self.offset = 0.0;
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface, viewport: &Viewport, theme: Theme) {
        surface.fill_rect(
            Rect::new(
                viewport.lane_left(),
                0.0,
                viewport.lane_width,
                viewport.height,
            ),
            theme.road_color(),
        );

        let x = viewport.center_x() - self.stripe_width * 0.5;
        let mut y = -self.stripe_height + self.offset;
        while y < viewport.height {
            surface.fill_rect(
                Rect::new(x, y, self.stripe_width, self.stripe_height),
                theme.stripe_color(),
            );
            y += self.period();
        }
    }
}
