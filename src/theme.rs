//! Biomes. The theme changes every few levels and decides the road colours and what is
//! painted on either side of the road.

use crate::geometry::Rect;
use crate::surface::Surface;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Desert,
    Grassland,
    Ocean,
    Snow,
}

pub const THEMES: [Theme; 4] = [Theme::Desert, Theme::Grassland, Theme::Ocean, Theme::Snow];

impl Theme {
    pub fn for_level(level: u32, levels_per_theme: u32) -> Theme {
        let index = (level.max(1) - 1) / levels_per_theme.max(1);
        THEMES[index as usize % THEMES.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Desert => "desert",
            Theme::Grassland => "grassland",
            Theme::Ocean => "ocean",
            Theme::Snow => "snow",
        }
    }

    pub fn road_color(self) -> &'static str {
        match self {
            Theme::Desert => "#111",
            Theme::Grassland => "#3a3a3a",
            Theme::Ocean => "#0f1a2b",
            Theme::Snow => "#263238",
        }
    }

    pub fn stripe_color(self) -> &'static str {
        match self {
            Theme::Desert => "white",
            Theme::Grassland => "#f7f7f7",
            Theme::Ocean => "#a8d5ff",
            Theme::Snow => "#e0f7fa",
        }
    }

    pub fn sides(self) -> &'static dyn SideFill {
        match self {
            Theme::Desert => &DesertSides,
            Theme::Grassland => &GrasslandSides,
            Theme::Ocean => &OceanSides,
            Theme::Snow => &SnowSides,
        }
    }
}

/// Paints one side region. `scroll` is the road offset, so decor moves with the road.
pub trait SideFill {
    fn side_fill(&self, surface: &mut dyn Surface, rect: Rect, scroll: f64);
}

pub struct DesertSides;
pub struct GrasslandSides;
pub struct OceanSides;
pub struct SnowSides;

const GRASS_GAP: f64 = 22.0;
const GRASS_INSET: f64 = 8.0;
const WAVE_GAP: f64 = 18.0;
const WAVE_AMPLITUDE: f64 = 4.0;
const WAVE_X_FREQ: f64 = 0.03;
const WAVE_Y_PHASE: f64 = 0.05;
const WAVE_SAMPLE: f64 = 8.0;
const SNOW_GAP: f64 = 26.0;
const SNOW_INSET: f64 = 8.0;
const SNOW_RADIUS: f64 = 1.6;

/// Y positions of repeating decor rows, starting just above `rect` and shifted by `scroll`.
fn decor_rows(rect: Rect, scroll: f64, gap: f64) -> impl Iterator<Item = f64> {
    let start = rect.y - scroll.rem_euclid(gap);
    let end = rect.bottom();
    (0..)
        .map(move |i| start + i as f64 * gap)
        .take_while(move |y| *y < end)
}

impl SideFill for DesertSides {
    fn side_fill(&self, surface: &mut dyn Surface, rect: Rect, _scroll: f64) {
        surface.fill_rect(rect, "#f4a261");
    }
}

impl SideFill for GrasslandSides {
    fn side_fill(&self, surface: &mut dyn Surface, rect: Rect, scroll: f64) {
        surface.fill_vertical_gradient(rect, "#7ec850", "#2c7c31");
        for y in decor_rows(rect, scroll, GRASS_GAP) {
            surface.stroke_polyline(
                &[(rect.x + GRASS_INSET, y), (rect.right() - GRASS_INSET, y)],
                "rgba(0,0,0,0.15)",
                1.0,
            );
        }
    }
}

impl SideFill for OceanSides {
    fn side_fill(&self, surface: &mut dyn Surface, rect: Rect, scroll: f64) {
        surface.fill_vertical_gradient(rect, "#69a9ff", "#0b4ea2");
        let mut points = Vec::new();
        for y in decor_rows(rect, scroll, WAVE_GAP) {
            points.clear();
            let mut x = rect.x;
            while x <= rect.right() {
                let dy = (x * WAVE_X_FREQ + y * WAVE_Y_PHASE).sin() * WAVE_AMPLITUDE;
                points.push((x, y + dy));
                x += WAVE_SAMPLE;
            }
            surface.stroke_polyline(&points, "rgba(255,255,255,0.3)", 2.0);
        }
    }
}

impl SideFill for SnowSides {
    fn side_fill(&self, surface: &mut dyn Surface, rect: Rect, scroll: f64) {
        surface.fill_rect(rect, "#e9f5ff");
        for y in decor_rows(rect, scroll, SNOW_GAP) {
            let mut x = rect.x + SNOW_INSET;
            while x < rect.right() {
                surface.fill_circle(x, y, SNOW_RADIUS, "rgba(255,255,255,0.7)");
                x += SNOW_GAP;
            }
        }
    }
}
