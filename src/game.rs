use std::f64::consts::PI;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::clock::frame_steps;
use crate::config::{GameConfig, LEVEL_UP_SPAWN_FLOOR_MS, LEVEL_UP_SPAWN_STEP_MS, ScoringRule};
use crate::geometry::Viewport;
use crate::hud;
use crate::input::InputState;
use crate::obstacles::{ObstacleField, tighten_interval};
use crate::player::Player;
use crate::road::Road;
use crate::scoring::{Phase, Session};
use crate::storage::BestScoreStore;
use crate::surface::{SpriteKind, Surface};
use crate::theme::Theme;

const TRUCK_ROTATION: f64 = 3.0 * PI / 2.0;

pub struct GameController<S: BestScoreStore> {
    config: GameConfig,
    viewport: Viewport,
    session: Session,
    player: Player,
    field: ObstacleField,
    road: Road,
    rng: SmallRng,
    store: S,
    truck_size: (u32, u32),
    now: f64,
    frame_credit: f64,
    last_storage_error: Option<String>,
}

impl<S: BestScoreStore> GameController<S> {
    /// `entropy` seeds spawning unless the config pins a seed.
    pub fn new(config: GameConfig, viewport: Viewport, store: S, entropy: u64) -> Self {
        let seed = config.seed.unwrap_or(entropy);
        let best_score = store.load();
        Self {
            config,
            viewport,
            session: Session::new(best_score),
            player: Player::spawn(&viewport),
            field: ObstacleField::default(),
            road: Road::default(),
            rng: SmallRng::seed_from_u64(seed),
            store,
            truck_size: (0, 0),
            now: 0.0,
            frame_credit: 0.0,
            last_storage_error: None,
        }
    }

    pub fn reset(&mut self) {
        self.session.reset();
        self.field.clear();
        self.road = Road::default();
        self.player.recenter(&self.viewport);
        self.now = 0.0;
        self.frame_credit = 0.0;
    }

    /// A finished run keeps the car where it crashed; `reset` re-centres it.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if !self.session.is_over() {
            self.player.recenter(&viewport);
        }
    }

    /// Natural size of the truck image; (0, 0) until it has loaded.
    pub fn set_truck_size(&mut self, size: (u32, u32)) {
        self.truck_size = size;
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    pub fn is_running(&self) -> bool {
        !self.session.is_over()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn field(&self) -> &ObstacleField {
        &self.field
    }

    pub fn theme(&self) -> Theme {
        Theme::for_level(self.session.level, self.config.levels_per_theme)
    }

    pub fn last_storage_error(&self) -> Option<&str> {
        self.last_storage_error.as_deref()
    }

    /// Advances the run by `dt_ms`. Does nothing once the game is over.
    pub fn update(&mut self, dt_ms: f64, input: &InputState) {
        if self.session.is_over() {
            return;
        }

        self.now += dt_ms;
        let steps = frame_steps(dt_ms);

        self.road.advance(steps);
        self.player.update(input, steps, &self.viewport);

        let exited = self.field.update(
            self.now,
            steps,
            &self.viewport,
            self.truck_size,
            &mut self.rng,
        );

        match self.config.scoring {
            ScoringRule::ObstacleExit => {
                for _ in 0..exited {
                    self.score_point();
                    if self.session.check_level_up(self.now) {
                        self.field.spawn_interval = tighten_interval(
                            self.field.spawn_interval,
                            LEVEL_UP_SPAWN_STEP_MS,
                            LEVEL_UP_SPAWN_FLOOR_MS,
                        );
                    }
                }
            }
            ScoringRule::FrameCount => {
                // Whole nominal frames survived; the best score is not persisted here.
                self.frame_credit += steps;
                while self.frame_credit >= 1.0 {
                    self.frame_credit -= 1.0;
                    self.session.add_point();
                }
            }
        }

        self.session.expire_popup(self.now);

        if self.field.first_hit(&self.player.hitbox()).is_some() {
            self.session.phase = Phase::GameOver;
        }
    }

    fn score_point(&mut self) {
        let Some(best) = self.session.add_point() else {
            return;
        };
        self.last_storage_error = self.store.save(best).err();
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        let theme = self.theme();
        for rect in self.viewport.side_regions() {
            theme.sides().side_fill(surface, rect, self.road.offset);
        }
        self.road.draw(surface, &self.viewport, theme);

        surface.draw_sprite(SpriteKind::Player, self.player.bounds(), 0.0);
        for obstacle in &self.field.obstacles {
            surface.draw_sprite(SpriteKind::Truck, obstacle.bounds(), TRUCK_ROTATION);
        }

        hud::draw_score_panel(surface, &self.session);
        hud::draw_level_popup(surface, &self.session, &self.viewport);
        hud::draw_credit(surface, &self.viewport);

        if self.session.is_over() {
            hud::draw_game_over(surface, &self.viewport);
        }
    }

    pub fn diagnostics(&self) -> Vec<String> {
        vec![
            format!(
                "phase: {}",
                match self.session.phase {
                    Phase::Playing => "playing",
                    Phase::GameOver => "game_over",
                }
            ),
            format!(
                "score: {} (best {})",
                self.session.score, self.session.best_score
            ),
            format!(
                "level: {} (next at {})",
                self.session.level, self.session.next_level_score
            ),
            format!("theme: {}", self.theme().name()),
            format!(
                "scoring: {}",
                match self.config.scoring {
                    ScoringRule::ObstacleExit => "exits",
                    ScoringRule::FrameCount => "frames",
                }
            ),
            format!("obstacles: {}", self.field.obstacles.len()),
            format!("spawn_interval: {:.0}ms", self.field.spawn_interval),
            format!(
                "lane: {:.0}..{:.0}",
                self.viewport.lane_left(),
                self.viewport.lane_right()
            ),
            format!("truck: {}x{}", self.truck_size.0, self.truck_size.1),
            format!(
                "storage_error: {}",
                self.last_storage_error.as_deref().unwrap_or("none")
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{INITIAL_SPAWN_INTERVAL_MS, NOMINAL_FRAME_MS};
    use crate::input::Direction;
    use crate::obstacles::Obstacle;
    use crate::storage::MemoryStore;
    use crate::surface::recording::{Op, RecordingSurface};

    const TRUCK: (u32, u32) = (240, 120);

    fn viewport() -> Viewport {
        Viewport::new(1280.0, 800.0, 1280.0)
    }

    fn controller(store: MemoryStore) -> GameController<MemoryStore> {
        GameController::new(GameConfig::default(), viewport(), store, 99)
    }

    /// Narrow truck with an empty hitbox.
    fn ghost_truck(y: f64) -> Obstacle {
        Obstacle::new(500.0, y, 100.0, 120.0, 5.0)
    }

    fn run_until_clear(game: &mut GameController<MemoryStore>) -> u32 {
        let input = InputState::default();
        let mut frames = 0;
        while !game.field.obstacles.is_empty() {
            game.update(NOMINAL_FRAME_MS, &input);
            frames += 1;
            assert!(frames < 10_000, "obstacles never cleared");
        }
        frames
    }

    #[test]
    fn exiting_obstacle_scores_one_point() {
        let store = MemoryStore::default();
        let mut game = controller(store.clone());
        game.field.last_spawn = Some(0.0);
        game.field.obstacles.push(ghost_truck(-120.0));

        let frames = run_until_clear(&mut game);
        assert_eq!(frames, 185);
        assert_eq!(game.session().score, 1);
        assert_eq!(game.session().best_score, 1);
        assert_eq!(store.get(), Some(1));
        assert!(game.is_running());
    }

    #[test]
    fn frame_scoring_ignores_exits() {
        let config = GameConfig {
            scoring: ScoringRule::FrameCount,
            ..GameConfig::default()
        };
        let store = MemoryStore::default();
        let mut game = GameController::new(config, viewport(), store.clone(), 1);
        game.field.last_spawn = Some(0.0);
        game.field.obstacles.push(ghost_truck(-120.0));

        let frames = run_until_clear(&mut game);
        assert_eq!(game.session().score, frames);
        assert_eq!(game.session().best_score, frames);
        assert_eq!(game.session().level, 1);
        assert_eq!(store.get(), None);
    }

    #[test]
    fn frame_scoring_follows_elapsed_time() {
        let config = GameConfig {
            scoring: ScoringRule::FrameCount,
            ..GameConfig::default()
        };
        let mut game = GameController::new(config, viewport(), MemoryStore::default(), 1);
        let input = InputState::default();

        game.update(0.0, &input);
        assert_eq!(game.session().score, 0);

        for _ in 0..4 {
            game.update(NOMINAL_FRAME_MS / 2.0, &input);
        }
        assert_eq!(game.session().score, 2);

        game.update(NOMINAL_FRAME_MS * 2.0, &input);
        assert_eq!(game.session().score, 4);

        game.reset();
        game.update(NOMINAL_FRAME_MS / 2.0, &input);
        assert_eq!(game.session().score, 0);
    }

    #[test]
    fn reaching_threshold_levels_up() {
        let mut game = controller(MemoryStore::default());
        game.session.score = 9;
        game.field.last_spawn = Some(0.0);
        game.field.obstacles.push(ghost_truck(796.0));

        game.update(NOMINAL_FRAME_MS, &InputState::default());
        let session = game.session();
        assert_eq!(session.score, 10);
        assert_eq!(session.level, 2);
        assert_eq!(session.next_level_score, 20);
        assert!(session.popup_visible());
        assert_eq!(game.field.spawn_interval, INITIAL_SPAWN_INTERVAL_MS - 200.0);
    }

    #[test]
    fn popup_expires_after_two_seconds_of_play() {
        let mut game = controller(MemoryStore::default());
        game.session.score = 9;
        game.field.last_spawn = Some(0.0);
        game.field.obstacles.push(ghost_truck(796.0));
        let input = InputState::default();
        game.update(NOMINAL_FRAME_MS, &input);
        assert!(game.session().popup_visible());

        for _ in 0..119 {
            game.update(NOMINAL_FRAME_MS, &input);
        }
        assert!(game.session().popup_visible());
        game.update(NOMINAL_FRAME_MS, &input);
        game.update(NOMINAL_FRAME_MS, &input);
        assert!(!game.session().popup_visible());
    }

    #[test]
    fn collision_ends_the_run_and_freezes_state() {
        let mut game = controller(MemoryStore::default());
        game.set_truck_size(TRUCK);
        let hitbox = game.player().hitbox();
        game.field.last_spawn = Some(0.0);
        game.field
            .obstacles
            .push(Obstacle::new(hitbox.x - 60.0, hitbox.y - 20.0, 160.0, 120.0, 0.0));

        let mut input = InputState::default();
        game.update(NOMINAL_FRAME_MS, &input);
        assert_eq!(game.phase(), Phase::GameOver);
        assert!(!game.is_running());

        let session = game.session().clone();
        let player = game.player().clone();
        let obstacles = game.field.obstacles.clone();
        let offset = game.road.offset;

        input.set(Direction::Left, true);
        for _ in 0..200 {
            game.update(NOMINAL_FRAME_MS, &input);
        }
        assert_eq!(game.session(), &session);
        assert_eq!(game.player(), &player);
        assert_eq!(game.field.obstacles, obstacles);
        assert_eq!(game.road.offset, offset);
    }

    #[test]
    fn empty_hitbox_over_the_car_is_harmless() {
        let mut game = controller(MemoryStore::default());
        let hitbox = game.player().hitbox();
        game.field.last_spawn = Some(0.0);
        let truck = Obstacle::new(hitbox.x - 30.0, hitbox.y, 100.0, 120.0, 0.0);
        assert!(truck.hitbox.is_empty());
        assert!(truck.hitbox.x > hitbox.x && truck.hitbox.x < hitbox.right());
        game.field.obstacles.push(truck);

        game.update(NOMINAL_FRAME_MS, &InputState::default());
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn reset_starts_a_fresh_run_and_keeps_best() {
        let store = MemoryStore::with_value(30);
        let mut game = controller(store);
        game.set_truck_size(TRUCK);
        let input = InputState::default();
        for _ in 0..300 {
            game.update(NOMINAL_FRAME_MS, &input);
        }
        game.session.score = 12;
        game.session.level = 3;
        game.session.phase = Phase::GameOver;

        game.reset();
        assert!(game.is_running());
        assert_eq!(game.session(), &Session::new(30));
        assert!(game.field.obstacles.is_empty());
        assert_eq!(game.field.spawn_interval, INITIAL_SPAWN_INTERVAL_MS);
        assert_eq!(game.player(), &Player::spawn(&viewport()));
    }

    #[test]
    fn best_score_survives_a_restart() {
        let store = MemoryStore::default();
        {
            let mut game = controller(store.clone());
            game.field.last_spawn = Some(0.0);
            for i in 0..3 {
                game.field.obstacles.push(ghost_truck(700.0 - i as f64 * 10.0));
            }
            run_until_clear(&mut game);
            assert_eq!(game.session().score, 3);
        }

        let game = controller(store);
        assert_eq!(game.session().best_score, 3);
        assert_eq!(game.session().score, 0);
    }

    #[test]
    fn long_run_keeps_invariants() {
        let mut game = controller(MemoryStore::default());
        game.set_truck_size(TRUCK);
        let mut input = InputState::default();
        let vp = viewport();

        let mut last_score = 0;
        let mut last_level = 1;
        let mut last_interval = game.field.spawn_interval;
        for frame in 0..5_000 {
            // Weave left and right so the run lasts a while.
            let left = (frame / 90) % 2 == 0;
            input.set(Direction::Left, left);
            input.set(Direction::Right, !left);
            input.set(Direction::Up, frame % 200 < 20);

            game.update(NOMINAL_FRAME_MS, &input);

            let player = game.player();
            assert!(player.x >= vp.lane_left());
            assert!(player.x <= vp.lane_right() - player.width);
            assert!(player.y >= 0.0 && player.y <= vp.height - player.height);

            let session = game.session();
            assert!(session.score >= last_score);
            assert!(session.level >= last_level);
            assert!(session.best_score >= session.score);
            assert!(game.field.spawn_interval <= last_interval);
            assert!(game.field.spawn_interval >= 300.0);
            for ob in &game.field.obstacles {
                assert!(ob.bounds().contains_rect(&ob.hitbox));
                assert!(ob.x >= vp.lane_left() && ob.x <= vp.lane_right() - ob.width);
            }

            last_score = session.score;
            last_level = session.level;
            last_interval = game.field.spawn_interval;
            if !game.is_running() {
                break;
            }
        }
    }

    #[test]
    fn resize_recomputes_lane_and_recentres() {
        let mut game = controller(MemoryStore::default());
        let mut input = InputState::default();
        input.set(Direction::Left, true);
        game.update(NOMINAL_FRAME_MS * 10.0 / 3.0, &input);

        game.resize(Viewport::new(600.0, 900.0, 600.0));
        assert_eq!(game.viewport().lane_width, 540.0);
        assert_eq!(game.player().x, 250.0);
        assert_eq!(game.player().y, 780.0);
    }

    #[test]
    fn resize_after_game_over_keeps_the_crash_scene() {
        let mut game = controller(MemoryStore::default());
        let mut input = InputState::default();
        input.set(Direction::Left, true);
        game.update(NOMINAL_FRAME_MS * 2.0, &input);
        game.session.phase = Phase::GameOver;
        let player = game.player().clone();

        game.resize(Viewport::new(600.0, 900.0, 600.0));
        assert_eq!(game.viewport().lane_width, 540.0);
        assert_eq!(game.player(), &player);

        game.reset();
        assert_eq!(game.player().x, 250.0);
        assert_eq!(game.player().y, 780.0);
    }

    #[test]
    fn render_draws_scene_in_order() {
        let mut game = controller(MemoryStore::default());
        game.field.obstacles.push(ghost_truck(100.0));
        let mut surface = RecordingSurface::default();
        game.render(&mut surface);

        // desert sides, road, stripes...
        assert_eq!(
            surface.ops[0],
            Op::Rect(
                crate::geometry::Rect::new(0.0, 0.0, 288.0, 800.0),
                "#f4a261".to_string()
            )
        );
        let sprites: Vec<SpriteKind> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Sprite(kind, _, _) => Some(*kind),
                _ => None,
            })
            .collect();
        assert_eq!(sprites, vec![SpriteKind::Player, SpriteKind::Truck]);
        assert!(surface.texts().contains(&"Score: 0"));
        assert!(!surface.texts().contains(&"GAME OVER"));

        game.session.phase = Phase::GameOver;
        let mut surface = RecordingSurface::default();
        game.render(&mut surface);
        assert!(surface.texts().contains(&"GAME OVER"));
    }

    #[test]
    fn later_levels_switch_theme() {
        let mut game = controller(MemoryStore::default());
        assert_eq!(game.theme(), Theme::Desert);
        game.session.level = 4;
        assert_eq!(game.theme(), Theme::Grassland);
        game.session.level = 10;
        assert_eq!(game.theme(), Theme::Snow);
    }
}
