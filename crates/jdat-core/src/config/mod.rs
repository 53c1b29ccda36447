//! Unified configuration layer.
//!
//! Every environment variable read goes through this module; callers use the
//! structured configs instead of `std::env::var`.
//!
//! - `loader`: `env_or`, `env_optional`, `env_bool`, `.env` loading
//! - `schema`: `ObservabilityConfig`, `BuildConfig`
//! - `env_keys`: key constants and their aliases

pub mod env_keys;
pub mod loader;
pub mod schema;

pub use loader::{env_bool, env_list, env_optional, env_or, load_dotenv, load_dotenv_from_dir};
pub use schema::{BuildConfig, ObservabilityConfig};
