// Library surface for the CLI binary and integration tests.
pub mod app_dirs;
pub mod config;
pub mod logging;
pub mod model;
pub mod scoreboard;
pub mod session;
pub mod store;
pub mod words;

pub use model::{Difficulty, GameState, WordResult, WordStatus};
pub use session::{GameSession, SessionDefaults, SessionState, SESSION_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore, SqliteStore, StoreError};
