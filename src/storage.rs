use std::cell::Cell;
use std::rc::Rc;

use web_sys::Storage;

use crate::config::BEST_SCORE_KEY;

pub trait BestScoreStore {
    /// Stored best score, 0 when absent or unreadable.
    fn load(&self) -> u32;
    fn save(&mut self, best: u32) -> Result<(), String>;
}

/// Parses a stored value the way a lenient numeric read would: blank or junk is 0.
pub fn parse_best_score(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(|v| v.min(u32::MAX as f64) as u32)
        .unwrap_or(0)
}

pub struct LocalStorageStore {
    storage: Option<Storage>,
}

impl LocalStorageStore {
    /// `localStorage` can be missing or throw (private mode, sandboxed iframes). The game
    /// then runs without persistence.
    pub fn open() -> Self {
        let storage = web_sys::window().and_then(|win| win.local_storage().ok().flatten());
        Self { storage }
    }

    pub fn is_available(&self) -> bool {
        self.storage.is_some()
    }
}

impl BestScoreStore for LocalStorageStore {
    fn load(&self) -> u32 {
        let Some(storage) = &self.storage else {
            return 0;
        };
        let raw = storage.get_item(BEST_SCORE_KEY).ok().flatten();
        parse_best_score(raw.as_deref())
    }

    fn save(&mut self, best: u32) -> Result<(), String> {
        let Some(storage) = &self.storage else {
            return Err("localStorage unavailable".to_string());
        };
        storage
            .set_item(BEST_SCORE_KEY, &best.to_string())
            .map_err(|err| format!("localStorage write failed: {:?}", err))
    }
}

/// In-memory store. Clones share the value, which lets a rebuilt controller see what the
/// previous one saved.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    value: Rc<Cell<Option<u32>>>,
}

impl MemoryStore {
    pub fn with_value(best: u32) -> Self {
        Self {
            value: Rc::new(Cell::new(Some(best))),
        }
    }

    pub fn get(&self) -> Option<u32> {
        self.value.get()
    }
}

impl BestScoreStore for MemoryStore {
    fn load(&self) -> u32 {
        self.value.get().unwrap_or(0)
    }

    fn save(&mut self, best: u32) -> Result<(), String> {
        self.value.set(Some(best));
        Ok(())
    }
}
