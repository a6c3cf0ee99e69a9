use chrono::{DateTime, Duration, Utc};

/// Default self-service cancellation window, in hours.
///
/// This is the single authoritative value: the server-side enforcement check
/// and the `cancellableUntil` hint surfaced to clients both derive from the
/// same policy, so nothing else ever encodes its own window length.
pub const DEFAULT_CANCELLATION_WINDOW_HOURS: i64 = 3;

/// Time span after order creation during which a non-admin owner may
/// self-cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancellationPolicy {
    window: Duration,
}

impl CancellationPolicy {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    pub fn hours(hours: i64) -> Self {
        Self::new(Duration::hours(hours))
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Last instant at which the owner may still cancel.
    pub fn cancellable_until(&self, created_at: DateTime<Utc>) -> DateTime<Utc> {
        created_at + self.window
    }

    pub fn has_expired(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - created_at > self.window
    }
}

impl Default for CancellationPolicy {
    fn default() -> Self {
        Self::hours(DEFAULT_CANCELLATION_WINDOW_HOURS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_boundary_is_inclusive() {
        let policy = CancellationPolicy::hours(3);
        let created = Utc::now();

        assert!(!policy.has_expired(created, created + Duration::hours(3)));
        assert!(policy.has_expired(created, created + Duration::hours(3) + Duration::seconds(1)));
    }

    #[test]
    fn cancellable_until_tracks_creation_time() {
        let policy = CancellationPolicy::default();
        let created = Utc::now();

        assert_eq!(
            policy.cancellable_until(created),
            created + Duration::hours(DEFAULT_CANCELLATION_WINDOW_HOURS)
        );
    }
}
