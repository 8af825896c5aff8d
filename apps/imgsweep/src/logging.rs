//! Structured logging integration for events
//!
//! Every event drained from the channel is also written to tracing, with
//! the envelope's ids and the event's own fields attached, so a `--debug`
//! log file holds the full history of a sweep.

use imgsweep_events::{AppEvent, EventMessage, GeneralEvent, PlatformEvent, SweepEvent};
use tracing::{debug, error, info, trace, warn, Level};

/// Log at a level only known at runtime.
macro_rules! log_at {
    ($level:expr, $($args:tt)+) => {
        match $level {
            Level::ERROR => error!($($args)+),
            Level::WARN => warn!($($args)+),
            Level::INFO => info!($($args)+),
            Level::DEBUG => debug!($($args)+),
            _ => trace!($($args)+),
        }
    };
}

/// Log an `AppEvent` using the tracing infrastructure with structured fields
pub fn log_event_with_tracing(message: &EventMessage) {
    let meta = &message.meta;
    let level = meta.tracing_level();

    match &message.event {
        AppEvent::Sweep(sweep_event) => match sweep_event {
            SweepEvent::Started {
                sweep_id,
                vault_root,
                canonical_folder,
                dry_run,
            } => {
                log_at!(
                    level,
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    sweep_id = %sweep_id,
                    vault = %vault_root.display(),
                    canonical_folder = %canonical_folder,
                    dry_run = dry_run,
                    "Sweep started"
                );
            }
            SweepEvent::ImageMoved { from, to, renamed } => {
                log_at!(
                    level,
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    from = %from,
                    to = %to,
                    renamed = renamed,
                    "Image moved"
                );
            }
            SweepEvent::ImageDeleted { path } => {
                log_at!(
                    level,
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    path = %path,
                    "Image deleted"
                );
            }
            SweepEvent::ItemFailed {
                stage,
                path,
                failure,
            } => {
                log_at!(
                    level,
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    stage = %stage,
                    path = ?path,
                    retryable = failure.retryable,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Sweep item failed"
                );
            }
            SweepEvent::Completed {
                sweep_id,
                moved,
                deleted,
                failures,
                duration_ms,
            } => {
                log_at!(
                    level,
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    sweep_id = %sweep_id,
                    moved = moved,
                    deleted = deleted,
                    failures = failures,
                    duration_ms = duration_ms,
                    "Sweep completed"
                );
            }
            SweepEvent::Failed { sweep_id, failure } => {
                log_at!(
                    level,
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    sweep_id = %sweep_id,
                    retryable = failure.retryable,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Sweep failed"
                );
            }
            other => {
                log_at!(
                    level,
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    event = ?other,
                    "Sweep event"
                );
            }
        },

        AppEvent::Platform(platform_event) => match platform_event {
            PlatformEvent::OperationFailed {
                context,
                failure,
                metrics,
            } => {
                log_at!(
                    level,
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    operation = %context.operation,
                    target = ?context.target,
                    code = ?failure.code,
                    message = %failure.message,
                    duration_ms = ?metrics.as_ref().and_then(|m| m.duration_ms),
                    "Filesystem operation failed"
                );
            }
            PlatformEvent::OperationStarted { context }
            | PlatformEvent::OperationCompleted { context, .. } => {
                log_at!(
                    level,
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    operation = %context.operation,
                    target = ?context.target,
                    from = ?context.source,
                    "Filesystem operation"
                );
            }
        },

        AppEvent::General(general_event) => match general_event {
            GeneralEvent::OperationFailed { operation, error } => {
                log_at!(
                    level,
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    operation = %operation,
                    error = %error,
                    "Operation failed"
                );
            }
            GeneralEvent::Warning { message, context } => {
                log_at!(
                    level,
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    message = %message,
                    context = ?context,
                    "Warning"
                );
            }
            GeneralEvent::DebugLog { message, context } => {
                log_at!(
                    level,
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    message = %message,
                    context = ?context,
                    "Debug log"
                );
            }
            other => {
                log_at!(
                    level,
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    event = ?other,
                    "General event"
                );
            }
        },
    }
}
