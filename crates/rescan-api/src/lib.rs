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
#![allow(clippy::redundant_pub_crate)]

//! HTTP host for rescan triggers.
//!
//! Layout: `triggers/` (trigger seam, outcomes, Tdarr adapter), `http/`
//! (router, health/metrics endpoints, middleware), `state.rs`, `error.rs`.

pub mod error;
pub mod http;
pub mod state;
pub mod triggers;

pub use error::{ApiServerError, ApiServerResult};
pub use http::router::ApiServer;
pub use state::{ApiState, TriggerSummary};
pub use triggers::tdarr::TdarrTrigger;
pub use triggers::{HttpTrigger, TriggerDeps, TriggerError, TriggerOutcome, trigger_route};
