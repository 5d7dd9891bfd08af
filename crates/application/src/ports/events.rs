use askgod_domain::{EventFlag, EventInternal, EventTimeline};
use async_trait::async_trait;

/// Outbound side of the event bus as seen by the application layer.
///
/// Publishing is best-effort: listeners that cannot keep up or have gone
/// away never fail the operation that emitted the event.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish_flag(&self, event: EventFlag);

    async fn publish_timeline(&self, event: EventTimeline);

    async fn publish_internal(&self, event: EventInternal);
}
