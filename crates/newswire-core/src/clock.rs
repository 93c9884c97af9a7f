use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

use crate::traits::Clock;

/// Wall clock backed by [`Utc::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Process-wide source of `news.app_id` values.
///
/// Each id is the clock reading in unix nanoseconds, bumped past the last
/// issued id when the clock stalls or steps backwards. Ids are strictly
/// increasing across clones, so concurrent ingestion runs never collide.
#[derive(Debug, Clone, Default)]
pub struct RowIdSequence {
    last: Arc<AtomicI64>,
}

impl RowIdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id<C: Clock>(&self, clock: &C) -> i64 {
        let now = clock.now();
        let seed = now
            .timestamp_nanos_opt()
            .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1_000));
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(seed.max(last.saturating_add(1)))
            })
            .unwrap_or_else(|last| last);
        seed.max(previous.saturating_add(1))
    }
}
