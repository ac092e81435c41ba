use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Token-bucket send quota keyed by user id. Tokens refill continuously;
/// each allowed action spends one.
pub struct RateLimiter {
    buckets: Mutex<HashMap<String, Bucket>>,
    burst: f64,
    refill_per_sec: f64,
}

struct Bucket {
    tokens: f64,
    touched: Instant,
}

impl RateLimiter {
    /// `burst` actions may happen back to back; after that, one more is
    /// allowed every `refill_seconds`.
    pub fn new(burst: u32, refill_seconds: f64) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            burst: burst as f64,
            refill_per_sec: 1.0 / refill_seconds,
        }
    }

    /// Spend one token for `key` if available.
    pub fn allow(&self, key: &str) -> bool {
        let mut buckets = self.buckets.lock().unwrap();
        let now = Instant::now();

        let bucket = buckets.entry(key.to_string()).or_insert(Bucket {
            tokens: self.burst,
            touched: now,
        });

        let elapsed = now.duration_since(bucket.touched).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.refill_per_sec).min(self.burst);
        bucket.touched = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Drop buckets untouched for longer than `older_than`.
    pub fn cleanup(&self, older_than: Duration) {
        let cutoff = Instant::now() - older_than;
        self.buckets
            .lock()
            .unwrap()
            .retain(|_, b| b.touched > cutoff);
    }
}
