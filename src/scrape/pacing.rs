//! Fixed politeness delay between requests to the target site.

use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

/// Spaces consecutive requests at least `delay` apart.
///
/// The first request goes out immediately. Time already spent processing a
/// response counts toward the delay.
#[derive(Debug)]
pub struct Pacer {
    delay: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_slot: Mutex::new(None),
        }
    }

    /// Waits until the next request may be sent, then reserves the slot after it.
    pub async fn pace(&self) {
        if self.delay.is_zero() {
            return;
        }
        let wait = {
            let mut next_slot = match self.next_slot.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            let now = Instant::now();
            let start = next_slot.map_or(now, |slot| slot.max(now));
            *next_slot = Some(start + self.delay);
            start - now
        };
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }
}
