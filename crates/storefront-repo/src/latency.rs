use std::time::Duration;

/// Artificial delay applied before every repository call, to exercise
/// loading states in clients. Zero means no suspension at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Latency(Duration);

impl Latency {
    pub const fn none() -> Self {
        Self(Duration::ZERO)
    }

    pub const fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }

    pub fn duration(&self) -> Duration {
        self.0
    }

    pub async fn wait(&self) {
        if !self.0.is_zero() {
            tokio::time::sleep(self.0).await;
        }
    }
}

/// Delay per collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyProfile {
    pub products: Latency,
    pub orders: Latency,
    pub conversations: Latency,
    pub messages: Latency,
}

impl LatencyProfile {
    pub const fn uniform(latency: Latency) -> Self {
        Self {
            products: latency,
            orders: latency,
            conversations: latency,
            messages: latency,
        }
    }

    pub const fn none() -> Self {
        Self::uniform(Latency::none())
    }
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self {
            products: Latency::from_millis(300),
            orders: Latency::from_millis(400),
            conversations: Latency::from_millis(200),
            messages: Latency::from_millis(200),
        }
    }
}
