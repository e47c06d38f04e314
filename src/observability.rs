use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("folio.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("folio.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("folio.client.request_duration_seconds");

pub(crate) static STREAM_EVENTS: Counter = Counter::new("folio.stream.events");
pub(crate) static STREAM_ERRORS: Counter = Counter::new("folio.stream.errors");
pub(crate) static STREAM_BYTES: Counter = Counter::new("folio.stream.bytes");

pub(crate) static CHAT_SUBMITS: Counter = Counter::new("folio.chat.submits");
pub(crate) static CHAT_FAILED_REPLIES: Counter = Counter::new("folio.chat.failed_replies");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&STREAM_EVENTS);
    collector.register_counter(&STREAM_ERRORS);
    collector.register_counter(&STREAM_BYTES);

    collector.register_counter(&CHAT_SUBMITS);
    collector.register_counter(&CHAT_FAILED_REPLIES);
}
