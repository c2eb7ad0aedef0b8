use crate::config::{FIRST_LEVEL_SCORE, LEVEL_POPUP_MS, LEVEL_SCORE_STEP};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Playing,
    GameOver,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub score: u32,
    pub best_score: u32,
    pub level: u32,
    pub next_level_score: u32,
    pub phase: Phase,
    pub level_popup_at: Option<f64>,
}

impl Session {
    pub fn new(best_score: u32) -> Self {
        Self {
            score: 0,
            best_score,
            level: 1,
            next_level_score: FIRST_LEVEL_SCORE,
            phase: Phase::Playing,
            level_popup_at: None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.best_score);
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Adds a point. Returns the new best score when this point beat it.
    pub fn add_point(&mut self) -> Option<u32> {
        self.score = self.score.saturating_add(1);
        if self.score > self.best_score {
            self.best_score = self.score;
            Some(self.best_score)
        } else {
            None
        }
    }

    /// Advances a level when the score reached the current threshold, opening the banner at
    /// `now`. Returns whether a level was gained.
    pub fn check_level_up(&mut self, now: f64) -> bool {
        if self.score < self.next_level_score {
            return false;
        }
        self.level += 1;
        self.next_level_score += LEVEL_SCORE_STEP;
        self.level_popup_at = Some(now);
        true
    }

    pub fn popup_visible(&self) -> bool {
        self.level_popup_at.is_some()
    }

    pub fn expire_popup(&mut self, now: f64) {
        if let Some(at) = self.level_popup_at {
            if now - at > LEVEL_POPUP_MS {
                self.level_popup_at = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_score_tracks_score() {
        let mut session = Session::new(2);
        assert_eq!(session.add_point(), None);
        assert_eq!(session.add_point(), None);
        assert_eq!(session.add_point(), Some(3));
        assert_eq!(session.best_score, 3);
        assert!(session.best_score >= session.score);
    }

    #[test]
    fn level_up_at_threshold() {
        let mut session = Session::new(0);
        session.score = 10;
        assert!(session.check_level_up(500.0));
        assert_eq!(session.level, 2);
        assert_eq!(session.next_level_score, 20);
        assert!(session.popup_visible());

        assert!(!session.check_level_up(600.0));
        assert_eq!(session.level, 2);
    }

    #[test]
    fn below_threshold_stays() {
        let mut session = Session::new(0);
        session.score = 9;
        assert!(!session.check_level_up(0.0));
        assert_eq!(session.level, 1);
        assert!(!session.popup_visible());
    }

    #[test]
    fn popup_clears_after_two_seconds() {
        let mut session = Session::new(0);
        session.score = 10;
        session.check_level_up(1000.0);
        session.expire_popup(3000.0);
        assert!(session.popup_visible());
        session.expire_popup(3000.5);
        assert!(!session.popup_visible());
    }

    #[test]
    fn reset_keeps_best() {
        let mut session = Session::new(0);
        for _ in 0..12 {
            session.add_point();
        }
        session.check_level_up(0.0);
        session.phase = Phase::GameOver;
        session.reset();
        assert_eq!(session, Session::new(12));
    }
}
