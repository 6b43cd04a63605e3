//! Tracing layer that feeds the activity log
//!
//! Library code (the adapter, the use cases) logs through `tracing`; this
//! layer forwards those events into the app channel so they land in the
//! same scrollback as the user-facing lines instead of corrupting the
//! terminal.

use std::fmt;

use tokio::sync::mpsc;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use pdrive_core::domain::console::{LogLine, Severity};

use crate::app::AppEvent;

/// Forwards tracing events to the activity log
pub struct TuiLogLayer {
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl TuiLogLayer {
    pub fn new(tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { tx }
    }
}

impl<S> Layer<S> for TuiLogLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let severity = match *event.metadata().level() {
            Level::ERROR => Severity::Error,
            Level::WARN => Severity::Warning,
            _ => Severity::Info,
        };

        let mut message = String::new();
        let mut visitor = MessageVisitor(&mut message);
        event.record(&mut visitor);

        if message.is_empty() {
            message = event.metadata().target().to_string();
        }

        let _ = self.tx.send(AppEvent::Log(LogLine::new(severity, message)));
    }
}

/// Extracts the `message` field (or the first field) of an event
struct MessageVisitor<'a>(&'a mut String);

impl tracing::field::Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            *self.0 = format!("{value:?}");
        } else if self.0.is_empty() {
            *self.0 = format!("{}={value:?}", field.name());
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            *self.0 = value.to_string();
        } else if self.0.is_empty() {
            *self.0 = format!("{}={value}", field.name());
        }
    }
}
