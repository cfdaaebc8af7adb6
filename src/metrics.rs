// Prometheus counters exposed on `/metrics`. Each `Metrics` owns its own
// `Registry` so tests can build as many apps as they like without tripping
// duplicate-registration errors.
use prometheus::{IntCounterVec, Opts, Registry};
use std::sync::Arc;

#[derive(Clone)]
pub struct Metrics {
    pub registry: Arc<Registry>,
    topic_messages: IntCounterVec,
    state_requests: IntCounterVec,
}

#[derive(Debug, Clone, Copy)]
pub enum StateOp {
    Get,
    Save,
}

impl StateOp {
    fn as_str(self) -> &'static str {
        match self {
            StateOp::Get => "get",
            StateOp::Save => "save",
        }
    }
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let topic_messages = IntCounterVec::new(
            Opts::new("topic_messages_total", "Broker deliveries received per topic"),
            &["topic"],
        )?;
        registry.register(Box::new(topic_messages.clone()))?;

        let state_requests = IntCounterVec::new(
            Opts::new("state_requests_total", "Outbound state store calls by operation and outcome"),
            &["operation", "outcome"],
        )?;
        registry.register(Box::new(state_requests.clone()))?;

        Ok(Metrics { registry: Arc::new(registry), topic_messages, state_requests })
    }

    pub fn topic_message(&self, topic: &str) {
        self.topic_messages.with_label_values(&[topic]).inc();
    }

    pub fn state_request(&self, op: StateOp, ok: bool) {
        let outcome = if ok { "ok" } else { "error" };
        self.state_requests.with_label_values(&[op.as_str(), outcome]).inc();
    }

    #[cfg(test)]
    pub fn topic_count(&self, topic: &str) -> u64 {
        self.topic_messages.with_label_values(&[topic]).get()
    }

    #[cfg(test)]
    pub fn state_count(&self, op: StateOp, ok: bool) -> u64 {
        let outcome = if ok { "ok" } else { "error" };
        self.state_requests.with_label_values(&[op.as_str(), outcome]).get()
    }
}
