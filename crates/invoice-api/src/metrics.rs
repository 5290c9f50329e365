//! Prometheus registry and the counters exposed on `/metrics`
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    generations: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let generations = IntCounterVec::new(
            Opts::new(
                "invoice_ai_generations_total",
                "AI draft generation requests by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(generations.clone()))?;
        Ok(Self {
            registry,
            generations,
        })
    }

    pub fn record_generation(&self, outcome: &str) {
        self.generations.with_label_values(&[outcome]).inc();
    }

    pub fn encode(&self) -> Result<String, prometheus::Error> {
        encode(&self.registry)
    }
}

pub fn encode(registry: &Registry) -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&registry.gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).to_string())
}
