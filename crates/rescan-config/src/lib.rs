#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! YAML-backed configuration for the rescan service.
//!
//! Layout: `model.rs` (typed configuration), `loader.rs` (file/env loading),
//! `validate.rs` (structural checks), `defaults.rs`, `error.rs`.

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{config_path_from_env, load_from_path, load_from_str};
pub use model::{AppConfig, LogFormatSetting, LoggingSettings, TdarrConfig, TriggersConfig, Verbosity};
pub use validate::validate;
