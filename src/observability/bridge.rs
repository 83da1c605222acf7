//! Forwards `tracing` events into a [`Logger`].
//!
//! Libraries instrumented with `tracing` (tower-http, hyper, tokio) end up in
//! the same JSON stream as everything else, filtered by the same level atom.

use std::fmt;

use tracing::field::{Field as TracingField, Visit};
use tracing::subscriber::Interest;
use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::layer::{Context as LayerContext, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::core::entry::Caller;
use crate::core::field::Field;
use crate::core::level::Level;
use crate::logger::Logger;

pub struct TracingBridge {
    logger: Logger,
}

impl TracingBridge {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl<S: Subscriber> Layer<S> for TracingBridge {
    // The level atom can change at runtime, so callsite interest is never cached.
    fn register_callsite(&self, _metadata: &'static Metadata<'static>) -> Interest {
        Interest::sometimes()
    }

    fn enabled(&self, metadata: &Metadata<'_>, _ctx: LayerContext<'_, S>) -> bool {
        !metadata.is_event() || self.logger.enabled(Level::from(*metadata.level()))
    }

    fn on_event(&self, event: &Event<'_>, _ctx: LayerContext<'_, S>) {
        let metadata = event.metadata();
        let level = Level::from(*metadata.level());
        if !self.logger.enabled(level) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let caller = Caller::new(
            metadata.file().unwrap_or("<unknown>"),
            metadata.line().unwrap_or(0),
            None,
        );
        self.logger
            .named(metadata.target())
            .log(level, caller, &visitor.message, &visitor.fields);
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: Vec<Field>,
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &TracingField, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(Field::string(field.name(), value));
        }
    }

    fn record_i64(&mut self, field: &TracingField, value: i64) {
        self.fields.push(Field::int(field.name(), value));
    }

    fn record_u64(&mut self, field: &TracingField, value: u64) {
        self.fields.push(Field::uint(field.name(), value));
    }

    fn record_f64(&mut self, field: &TracingField, value: f64) {
        self.fields.push(Field::float(field.name(), value));
    }

    fn record_bool(&mut self, field: &TracingField, value: bool) {
        self.fields.push(Field::bool(field.name(), value));
    }

    fn record_error(&mut self, field: &TracingField, value: &(dyn std::error::Error + 'static)) {
        self.fields.push(Field::string(field.name(), value.to_string()));
    }

    fn record_debug(&mut self, field: &TracingField, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push(Field::string(field.name(), format!("{:?}", value)));
        }
    }
}

/// Install the bridge as the global `tracing` subscriber.
///
/// `RUST_LOG`, when set, narrows which events reach the bridge. Returns
/// `false` when another global subscriber is already installed.
pub fn install_tracing_bridge(logger: Logger) -> bool {
    let filter = EnvFilter::try_from_default_env().ok();
    tracing_subscriber::registry()
        .with(filter)
        .with(TracingBridge::new(logger))
        .try_init()
        .is_ok()
}
