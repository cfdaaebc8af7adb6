//! Source of the numbers handed out by `GET /randomNumber`.
//!
//! Handlers take an `Arc<dyn NumberSource>` so tests can swap in a fixed
//! sequence instead of the thread-local RNG.
use rand::Rng;

/// Exclusive upper bound of generated numbers; the range is `[0, UPPER_BOUND)`.
pub const UPPER_BOUND: i64 = 100;

pub trait NumberSource: Send + Sync {
    /// Next number in `[0, UPPER_BOUND)`.
    fn next_number(&self) -> i64;
}

/// Production source backed by `rand::thread_rng()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSource;

impl NumberSource for ThreadRngSource {
    fn next_number(&self) -> i64 {
        rand::thread_rng().gen_range(0..UPPER_BOUND)
    }
}
