use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("agentchat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("agentchat.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("agentchat.client.request_duration_seconds");

pub(crate) static STREAM_EVENTS: Counter = Counter::new("agentchat.stream.events");
pub(crate) static STREAM_BYTES: Counter = Counter::new("agentchat.stream.bytes");
pub(crate) static STREAM_DECODE_ERRORS: Counter = Counter::new("agentchat.stream.decode_errors");

pub(crate) static SESSION_SUBMISSIONS: Counter = Counter::new("agentchat.session.submissions");
pub(crate) static SESSION_REJECTIONS: Counter = Counter::new("agentchat.session.rejections");
pub(crate) static SESSION_STREAM_FAILURES: Counter =
    Counter::new("agentchat.session.stream_failures");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&STREAM_EVENTS);
    collector.register_counter(&STREAM_BYTES);
    collector.register_counter(&STREAM_DECODE_ERRORS);

    collector.register_counter(&SESSION_SUBMISSIONS);
    collector.register_counter(&SESSION_REJECTIONS);
    collector.register_counter(&SESSION_STREAM_FAILURES);
}
