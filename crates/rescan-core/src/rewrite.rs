//! Regex-driven path rewriting.
//!
//! # Design
//! - Rules compile once in [`PathRewriter::new`]; a malformed pattern is a
//!   configuration error and never surfaces at request time.
//! - Rules are tried in declaration order and the first matching rule wins.
//!   Its replacement is applied to every match of its pattern (`$1` and
//!   `${name}` expand capture groups); later rules are not consulted.
//! - A path matched by no rule is returned unchanged.

use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Configured pattern/replacement pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    /// Regular expression matched against the full path.
    pub from: String,
    /// Replacement template applied to each match.
    pub to: String,
}

impl RewriteRule {
    /// Convenience constructor.
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[derive(Debug)]
struct CompiledRule {
    pattern: Regex,
    replacement: String,
}

/// Compiled, immutable rule set.
#[derive(Debug, Clone, Default)]
pub struct PathRewriter {
    rules: Arc<[CompiledRule]>,
}

impl PathRewriter {
    /// Compile `rules` into a rewriter.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRewrite`] for the first rule whose pattern
    /// does not compile.
    pub fn new(rules: &[RewriteRule]) -> CoreResult<Self> {
        let compiled = rules
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                Regex::new(&rule.from)
                    .map(|pattern| CompiledRule {
                        pattern,
                        replacement: rule.to.clone(),
                    })
                    .map_err(|source| CoreError::InvalidRewrite {
                        index,
                        pattern: rule.from.clone(),
                        source,
                    })
            })
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(Self {
            rules: compiled.into(),
        })
    }

    /// Number of compiled rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the rewriter has no rules and is therefore the identity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply the first matching rule to `path`.
    #[must_use]
    pub fn rewrite(&self, path: &str) -> String {
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(path))
            .map_or_else(
                || path.to_string(),
                |rule| {
                    rule.pattern
                        .replace_all(path, rule.replacement.as_str())
                        .into_owned()
                },
            )
    }
}
