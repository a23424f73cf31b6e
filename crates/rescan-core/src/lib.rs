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

//! Trigger-agnostic building blocks shared by every rescan trigger.
//!
//! Layout: `model.rs` (scan requests), `processor.rs` (dispatch seam and the
//! in-process scan queue), `clock.rs` (time source), `rewrite.rs` (path
//! rewriting rules), `paths.rs` (lexical path helpers), `error.rs`.

pub mod clock;
pub mod error;
pub mod model;
pub mod paths;
pub mod processor;
pub mod rewrite;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, CoreResult};
pub use model::ScanRequest;
pub use processor::{ProcessorFn, ScanProcessor, ScanQueue, ScanReceiver};
pub use rewrite::{PathRewriter, RewriteRule};
