//! Ships every log record onto the event bus as a `logging` event, so admins
//! can follow the server log over the websocket API.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;

use askgod_domain::{EventLogging, EventType};
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use super::bus::EventBus;

pub struct EventBusLayer {
    bus: Arc<EventBus>,
}

impl EventBusLayer {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self { bus }
    }
}

impl<S: tracing::Subscriber> Layer<S> for EventBusLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = ContextVisitor::default();
        event.record(&mut visitor);

        let record = EventLogging {
            message: visitor.message,
            level: event.metadata().level().as_str().to_lowercase(),
            context: visitor.context,
        };

        self.bus.publish(EventType::Logging, &record);
    }
}

#[derive(Default)]
struct ContextVisitor {
    message: String,
    context: BTreeMap<String, String>,
}

impl Visit for ContextVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.context.insert(field.name().to_string(), value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            self.context
                .insert(field.name().to_string(), format!("{:?}", value));
        }
    }
}
