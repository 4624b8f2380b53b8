//! Randomized expirations.
//!
//! Entries populated at the same moment with the same TTL would all expire
//! together. Spreading each TTL uniformly over `[base - base/10, base + base/10)`
//! keeps their expiries apart.

use std::time::Duration;

use rand::Rng;

/// Returns `base` shifted by a uniform random offset in `[-base/10, base/10)`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use campus_core::cache::jittered_duration;
///
/// let ttl = jittered_duration(Duration::from_secs(300));
/// assert!(ttl >= Duration::from_secs(270));
/// assert!(ttl < Duration::from_secs(330));
/// ```
pub fn jittered_duration(base: Duration) -> Duration {
    jittered_duration_with(&mut rand::rng(), base)
}

/// Same as [`jittered_duration`] with an explicit random source.
pub fn jittered_duration_with<R: Rng + ?Sized>(rng: &mut R, base: Duration) -> Duration {
    let base_nanos = base.as_nanos();
    let spread = base_nanos / 10;
    if spread == 0 {
        return base;
    }

    let low = base_nanos - spread;
    let high = base_nanos + spread;
    let nanos = rng.random_range(low..high);

    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}
