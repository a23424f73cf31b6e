//! Tdarr webhook adapter.
//!
//! Tdarr posts a JSON notification once a file finishes transcoding. The
//! adapter rewrites the reported path into the local namespace, strips the
//! file name and hands the containing folder to the scan processor.
//!
//! # Design
//! - Decoding is lenient. Keys match case-insensitively and the last
//!   duplicate wins, with `null` leaving a field untouched.
//! - Only the first JSON value is read; trailing data is ignored. Invalid
//!   UTF-8 bytes become U+FFFD before parsing.
//! - Missing wire fields decode as empty so a `Test` event only needs
//!   `eventType`; wrong field types are malformed.
//! - The rewrite runs on the full file path before the file name is removed.
//! - Exactly one processor call per valid `Transcoded` event; no retries.
//! - Per-trigger verbosity gates trace/debug/info records; errors always log.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::routing::post;
use rescan_config::{TdarrConfig, Verbosity};
use rescan_core::{CoreResult, PathRewriter, ScanRequest, paths};
use serde::de::{self, DeserializeSeed, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use tracing::{Instrument, Level, debug, error, info, info_span, trace};

use super::{HttpTrigger, TriggerDeps, TriggerError, TriggerOutcome, trigger_route};

const KIND: &str = "tdarr";
const EVENT_TEST: &str = "Test";
const EVENT_TRANSCODED: &str = "Transcoded";

/// Notification body as posted by Tdarr.
///
/// Keys match case-insensitively and a repeated key overwrites the earlier
/// value, except that `null` leaves a field untouched. Unknown keys are
/// skipped.
#[derive(Debug, Default)]
struct TdarrEvent {
    event_type: String,
    file: String,
    analyze: bool,
    meta: TdarrMeta,
}

#[derive(Debug, Default)]
struct TdarrMeta {
    directory: String,
}

impl TdarrEvent {
    /// Decode the first JSON value in `body`; anything after it is ignored.
    fn decode(body: &[u8]) -> Result<Self, TriggerError> {
        let text = replace_invalid_utf8(body);
        let mut json = serde_json::Deserializer::from_str(&text);
        Self::deserialize(&mut json).map_err(|source| TriggerError::Decode { source })
    }
}

impl<'de> Deserialize<'de> for TdarrEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EventVisitor)
    }
}

struct EventVisitor;

impl<'de> Visitor<'de> for EventVisitor {
    type Value = TdarrEvent;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a Tdarr notification object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut event = TdarrEvent::default();
        while let Some(key) = map.next_key::<String>()? {
            if key_matches(&key, "eventType") {
                overwrite(&mut event.event_type, map.next_value()?);
            } else if key_matches(&key, "file") {
                overwrite(&mut event.file, map.next_value()?);
            } else if key_matches(&key, "analyze") {
                overwrite(&mut event.analyze, map.next_value()?);
            } else if key_matches(&key, "meta") {
                // A repeated object merges into the meta decoded so far.
                map.next_value_seed(MetaSeed(&mut event.meta))?;
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(event)
    }
}

struct MetaSeed<'a>(&'a mut TdarrMeta);

impl<'de> DeserializeSeed<'de> for MetaSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_option(self)
    }
}

impl<'de> Visitor<'de> for MetaSeed<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a meta object or null")
    }

    fn visit_none<E: de::Error>(self) -> Result<(), E> {
        Ok(())
    }

    fn visit_unit<E: de::Error>(self) -> Result<(), E> {
        Ok(())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_map(MetaVisitor(self.0))
    }
}

struct MetaVisitor<'a>(&'a mut TdarrMeta);

impl<'de> Visitor<'de> for MetaVisitor<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a meta object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<(), A::Error> {
        while let Some(key) = map.next_key::<String>()? {
            if key_matches(&key, "Directory") {
                overwrite(&mut self.0.directory, map.next_value()?);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(())
    }
}

fn overwrite<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Case-insensitive key comparison using simple case folding: ASCII letters
/// plus the two non-ASCII runes that fold onto them (long s, Kelvin sign).
fn key_matches(key: &str, field: &str) -> bool {
    fn fold(ch: char) -> char {
        match ch {
            '\u{17F}' => 's',
            '\u{212A}' => 'k',
            _ => ch.to_ascii_lowercase(),
        }
    }
    key.chars().map(fold).eq(field.chars().map(fold))
}

/// Replace every byte that is not part of valid UTF-8 with U+FFFD.
fn replace_invalid_utf8(body: &[u8]) -> Cow<'_, str> {
    if let Ok(text) = std::str::from_utf8(body) {
        return Cow::Borrowed(text);
    }
    let mut text = String::with_capacity(body.len());
    for chunk in body.utf8_chunks() {
        text.push_str(chunk.valid());
        text.extend(chunk.invalid().iter().map(|_| char::REPLACEMENT_CHARACTER));
    }
    Cow::Owned(text)
}

/// Classified notification.
#[derive(Debug, PartialEq, Eq)]
enum Notification {
    Test,
    Transcoded {
        directory: String,
        file: String,
        analyze: bool,
    },
}

impl TryFrom<TdarrEvent> for Notification {
    type Error = TriggerError;

    fn try_from(event: TdarrEvent) -> Result<Self, Self::Error> {
        match event.event_type.as_str() {
            EVENT_TEST => Ok(Self::Test),
            EVENT_TRANSCODED => {
                if event.file.is_empty() {
                    return Err(TriggerError::MissingField { field: "file" });
                }
                if event.meta.directory.is_empty() {
                    return Err(TriggerError::MissingField {
                        field: "meta.Directory",
                    });
                }
                Ok(Self::Transcoded {
                    directory: event.meta.directory,
                    file: event.file,
                    analyze: event.analyze,
                })
            }
            _ => Err(TriggerError::UnsupportedEvent {
                kind: event.event_type,
            }),
        }
    }
}

/// Successful terminal states of a request.
enum Handled {
    Tested,
    Dispatched { folder: String, analyze: bool },
}

/// Trigger translating Tdarr notifications into scan requests.
pub struct TdarrTrigger {
    name: String,
    priority: i32,
    verbosity: Verbosity,
    rewriter: PathRewriter,
    deps: TriggerDeps,
}

impl TdarrTrigger {
    /// Build a trigger from its configuration, compiling the rewrite rules.
    ///
    /// # Errors
    ///
    /// Returns [`rescan_core::CoreError::InvalidRewrite`] when a rewrite
    /// pattern does not compile.
    pub fn new(config: &TdarrConfig, deps: TriggerDeps) -> CoreResult<Self> {
        let rewriter = PathRewriter::new(&config.rewrite)?;
        Ok(Self {
            name: config.name.clone(),
            priority: config.priority,
            verbosity: config.verbosity,
            rewriter,
            deps,
        })
    }

    /// Folder a `Transcoded` event for `file` in `directory` would scan.
    #[must_use]
    pub fn folder_for(&self, directory: &str, file: &str) -> String {
        paths::dir(&self.rewriter.rewrite(&paths::join(directory, file)))
    }

    /// Handle one notification body and report the status to return.
    pub async fn handle(&self, body: &[u8]) -> TriggerOutcome {
        let span = info_span!("trigger", kind = KIND, name = %self.name);
        async {
            let outcome = match self.process(body).await {
                Ok(Handled::Tested) => {
                    if self.verbosity.allows(Level::DEBUG) {
                        debug!("received test event");
                    }
                    TriggerOutcome::Ok
                }
                Ok(Handled::Dispatched { folder, analyze }) => {
                    if self.verbosity.allows(Level::INFO) {
                        info!(
                            folder = %folder,
                            priority = self.priority,
                            analyze,
                            "scan moved to processor"
                        );
                    }
                    TriggerOutcome::Ok
                }
                Err(err) => {
                    log_failure(&err);
                    err.outcome()
                }
            };
            if let Some(metrics) = &self.deps.metrics {
                metrics.inc_trigger_outcome(&self.name, outcome.label());
            }
            outcome
        }
        .instrument(span)
        .await
    }

    async fn process(&self, body: &[u8]) -> Result<Handled, TriggerError> {
        if self.verbosity.allows(Level::TRACE) {
            trace!(body = %String::from_utf8_lossy(body), "request body");
        }
        match Notification::try_from(TdarrEvent::decode(body)?)? {
            Notification::Test => Ok(Handled::Tested),
            Notification::Transcoded {
                directory,
                file,
                analyze,
            } => {
                let folder = self.folder_for(&directory, &file);
                let scan = ScanRequest {
                    folder: folder.clone(),
                    priority: self.priority,
                    analyze,
                    time: self.deps.clock.now(),
                };
                self.deps
                    .processor
                    .process(scan)
                    .await
                    .map_err(|source| TriggerError::Dispatch {
                        folder: folder.clone(),
                        source,
                    })?;
                Ok(Handled::Dispatched { folder, analyze })
            }
        }
    }
}

fn log_failure(err: &TriggerError) {
    match err {
        TriggerError::Decode { source } => {
            error!(detail = %source, "failed decoding request");
        }
        TriggerError::UnsupportedEvent { kind } => {
            error!(event_type = %kind, "unsupported event type");
        }
        TriggerError::MissingField { field } => {
            error!(field = %field, "required field missing");
        }
        TriggerError::Dispatch { folder, source } => {
            let detail = format!("{source:#}");
            error!(folder = %folder, detail = %detail, "processor could not process scan");
        }
    }
}

impl HttpTrigger for TdarrTrigger {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        KIND
    }

    fn router(self: Arc<Self>) -> Router {
        let route = trigger_route(&self.name);
        Router::new().route(&route, post(receive)).with_state(self)
    }
}

async fn receive(State(trigger): State<Arc<TdarrTrigger>>, body: Bytes) -> TriggerOutcome {
    trigger.handle(&body).await
}
