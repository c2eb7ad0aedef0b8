pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;
pub const MAX_FRAME_DT_MS: f64 = 50.0;

pub const NARROW_VIEWPORT_PX: f64 = 768.0;
pub const NARROW_LANE_FRACTION: f64 = 0.9;
pub const WIDE_LANE_FRACTION: f64 = 0.55;

pub const STRIPE_WIDTH: f64 = 10.0;
pub const STRIPE_HEIGHT: f64 = 40.0;
pub const STRIPE_GAP: f64 = 30.0;
pub const ROAD_SPEED: f64 = 5.0;

pub const PLAYER_SIZE: f64 = 100.0;
pub const PLAYER_SPEED: f64 = 6.0;
pub const PLAYER_BOTTOM_MARGIN: f64 = 120.0;
pub const PLAYER_HITBOX_OFFSET: (f64, f64) = (30.0, 5.0);
pub const PLAYER_HITBOX_SIZE: (f64, f64) = (40.0, 90.0);

pub const OBSTACLE_HEIGHT: f64 = 120.0;
pub const OBSTACLE_MIN_SPEED: f64 = 2.0;
pub const OBSTACLE_MAX_SPEED: f64 = 5.0;
pub const OBSTACLE_HITBOX_PAD: (f64, f64) = (55.0, 10.0);

pub const INITIAL_SPAWN_INTERVAL_MS: f64 = 1500.0;
pub const SPAWN_STEP_MS: f64 = 10.0;
pub const SPAWN_FLOOR_MS: f64 = 400.0;
pub const LEVEL_UP_SPAWN_STEP_MS: f64 = 200.0;
pub const LEVEL_UP_SPAWN_FLOOR_MS: f64 = 300.0;

pub const FIRST_LEVEL_SCORE: u32 = 10;
pub const LEVEL_SCORE_STEP: u32 = 10;
pub const LEVELS_PER_THEME: u32 = 3;
pub const LEVEL_POPUP_MS: f64 = 2000.0;

pub const BEST_SCORE_KEY: &str = "bestScore";
pub const PLAYER_SPRITE_URL: &str = "mobil.png";
pub const TRUCK_SPRITE_URL: &str = "truk2.png";
pub const CREDIT_LINE: &str = "by Leon & Ghali";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoringRule {
    /// One point per obstacle that leaves the bottom of the screen. Drives levels.
    ObstacleExit,
    /// One point per nominal frame survived. No level progression, nothing persisted.
    FrameCount,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub scoring: ScoringRule,
    pub seed: Option<u64>,
    pub levels_per_theme: u32,
    pub show_diagnostics: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringRule::ObstacleExit,
            seed: None,
            levels_per_theme: LEVELS_PER_THEME,
            show_diagnostics: false,
        }
    }
}

impl GameConfig {
    /// Reads overrides from a `location.search` string such as `?scoring=frames&seed=7`.
    /// `diag=1` shows the diagnostics panel.
    /// Unknown keys and malformed values are ignored.
    pub fn from_query(search: &str) -> Self {
        let mut config = Self::default();
        let query = search.strip_prefix('?').unwrap_or(search);

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "scoring" => match value {
                    "frames" => config.scoring = ScoringRule::FrameCount,
                    "exits" => config.scoring = ScoringRule::ObstacleExit,
                    _ => {}
                },
                "seed" => {
                    if let Ok(seed) = value.parse::<u64>() {
                        config.seed = Some(seed);
                    }
                }
                "theme_every" => {
                    if let Ok(n) = value.parse::<u32>() {
                        if n > 0 {
                            config.levels_per_theme = n;
                        }
                    }
                }
                "diag" => config.show_diagnostics = value == "1",
                _ => {}
            }
        }

        config
    }
}
