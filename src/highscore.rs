//! Best-score persistence
//!
//! A single number, stored in LocalStorage on the web.

/// LocalStorage key for the best score
pub const STORAGE_KEY: &str = "mieAyamHighScore";

/// Scalar key-value store holding the best score
pub trait ScoreStore {
    fn get(&self) -> Option<u64>;
    fn set(&mut self, score: u64);
}

/// Parse a stored score; anything that isn't a non-negative integer reads as absent
pub fn parse_score(raw: &str) -> Option<u64> {
    raw.trim().parse().ok()
}

/// Read the best score, defaulting to 0
pub fn load<S: ScoreStore>(store: &S) -> u64 {
    match store.get() {
        Some(score) => {
            log::info!("Loaded high score {}", score);
            score
        }
        None => {
            log::info!("No high score found, starting fresh");
            0
        }
    }
}

/// In-memory store (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<u64>,
}

impl MemoryStore {
    pub fn new(value: Option<u64>) -> Self {
        Self { value }
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self) -> Option<u64> {
        self.value
    }

    fn set(&mut self, score: u64) {
        self.value = Some(score);
    }
}

/// LocalStorage-backed store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageStore {
    fn get(&self) -> Option<u64> {
        let raw = Self::storage()?.get_item(STORAGE_KEY).ok()??;
        let score = parse_score(&raw);
        if score.is_none() {
            log::warn!("Ignoring unreadable high score {:?}", raw);
        }
        score
    }

    fn set(&mut self, score: u64) {
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, high score not saved");
            return;
        };
        match storage.set_item(STORAGE_KEY, &score.to_string()) {
            Ok(()) => log::info!("High score saved ({})", score),
            Err(e) => log::error!("Failed to save high score: {:?}", e),
        }
    }
}
