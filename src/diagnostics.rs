//! Fallback diagnostic channel
//!
//! Sink failures never reach the caller. They are reported here as `tracing`
//! events under the `corelog::fallback` target, which stay inside the process and
//! are only visible when a subscriber is installed.

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Target used for every fallback event
pub const FALLBACK_TARGET: &str = "corelog::fallback";

/// Report a sink failure
pub(crate) fn report_failure(sink: &str, error: &dyn std::error::Error) {
    tracing::warn!(target: FALLBACK_TARGET, sink, "{}", error);
}

/// Report a non-failure event worth seeing while debugging sinks
pub(crate) fn note(sink: &str, message: &str) {
    tracing::debug!(target: FALLBACK_TARGET, sink, "{}", message);
}

/// Install a stderr subscriber so fallback events become visible
///
/// `RUST_LOG` takes precedence over `default_directive`. Fails instead of
/// panicking when a global subscriber is already set.
pub fn init(default_directive: &str) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive.into());

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()
        .context("Failed to install diagnostics subscriber")
}

/// Collects the events emitted while a closure runs, for asserting on what the
/// fallback channel received
#[cfg(test)]
pub(crate) mod capture {
    use std::fmt;
    use std::sync::{Arc, Mutex};

    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    #[derive(Debug, Clone)]
    pub(crate) struct CapturedEvent {
        pub target: String,
        pub level: Level,
        pub sink: String,
        pub message: String,
    }

    #[derive(Clone, Default)]
    pub(crate) struct EventRecorder(Arc<Mutex<Vec<CapturedEvent>>>);

    impl EventRecorder {
        /// Run `f` with this recorder as the thread's subscriber
        pub(crate) fn run<R>(&self, f: impl FnOnce() -> R) -> R {
            let subscriber = tracing_subscriber::registry().with(self.clone());
            tracing::subscriber::with_default(subscriber, f)
        }

        pub(crate) fn events(&self) -> Vec<CapturedEvent> {
            self.0.lock().unwrap().clone()
        }
    }

    #[derive(Default)]
    struct FieldVisitor {
        sink: String,
        message: String,
    }

    impl Visit for FieldVisitor {
        fn record_str(&mut self, field: &Field, value: &str) {
            if field.name() == "sink" {
                self.sink = value.to_string();
            }
        }

        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            match field.name() {
                "message" => self.message = format!("{:?}", value),
                "sink" => self.sink = format!("{:?}", value),
                _ => {}
            }
        }
    }

    impl<S: Subscriber> Layer<S> for EventRecorder {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut visitor = FieldVisitor::default();
            event.record(&mut visitor);
            self.0.lock().unwrap().push(CapturedEvent {
                target: event.metadata().target().to_string(),
                level: *event.metadata().level(),
                sink: visitor.sink,
                message: visitor.message,
            });
        }
    }
}
