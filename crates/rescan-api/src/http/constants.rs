//! Shared HTTP constants (headers, problem URIs).

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

pub(crate) const PROBLEM_INTERNAL: &str = "https://rescan.dev/problems/internal";
pub(crate) const PROBLEM_NOT_FOUND: &str = "https://rescan.dev/problems/not-found";
