//! Bounded polling for "the renderer has laid the content out".

use std::future::Future;
use std::time::Duration;

use crate::constants::{READINESS_INTERVAL_MS, READINESS_MAX_ATTEMPTS};
use crate::geometry::{Bounds, GeometryProvider};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct ReadinessPolicy {
    pub max_attempts: u32,
    pub interval_ms: u32,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            max_attempts: READINESS_MAX_ATTEMPTS,
            interval_ms: READINESS_INTERVAL_MS,
        }
    }
}

impl ReadinessPolicy {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms as u64)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Readiness {
    Ready(Bounds),
    NotReady { attempts: u32 },
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready(_))
    }
}

/// Query `provider` until it reports non-zero width and height, sleeping
/// `policy.interval()` between attempts, at most `policy.max_attempts` times.
///
/// `sleep` is supplied by the caller so the poller runs on any executor.
pub async fn wait_until_ready<G, S, F>(provider: &G, policy: ReadinessPolicy, mut sleep: S) -> Readiness
where
    G: GeometryProvider + ?Sized,
    S: FnMut(Duration) -> F,
    F: Future<Output = ()>,
{
    for attempt in 1..=policy.max_attempts {
        let b = provider.content_bounds();
        if b.has_area() {
            tracing::debug!(attempt, width = b.width, height = b.height, "content ready");
            return Readiness::Ready(b);
        }
        if attempt < policy.max_attempts {
            sleep(policy.interval()).await;
        }
    }
    tracing::warn!(attempts = policy.max_attempts, "content never reported a size");
    Readiness::NotReady {
        attempts: policy.max_attempts,
    }
}
