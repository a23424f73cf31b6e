//! Command handlers grouped by concern.

pub(crate) mod check;
pub(crate) mod ping;
pub(crate) mod preview;
