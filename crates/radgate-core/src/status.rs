// ── Connectivity status machine ──
//
// The console's single status indicator. Transitions between visible
// indicator states are rate-limited to one per minimum-dwell interval so
// a quick busy->online flicker doesn't strobe the operator; the textual
// status message is NOT debounced and always reflects the latest request.
//
// The clock is passed in explicitly so tests can drive time.

use std::time::{Duration, Instant};

/// Minimum time a visible indicator state is held before the next
/// transition is applied.
pub const STATUS_MIN_DWELL: Duration = Duration::from_millis(500);

/// Indicator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusKind {
    #[default]
    Unknown,
    Online,
    Offline,
    Busy,
    Error,
}

/// One status update: the indicator state plus an operator-facing message
/// (may be empty -- e.g. routine "online" has no text).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
}

impl Status {
    pub fn new(kind: StatusKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn online() -> Self {
        Self::new(StatusKind::Online, "")
    }

    pub fn offline() -> Self {
        Self::new(StatusKind::Offline, "offline mode -- device API unavailable")
    }

    pub fn busy() -> Self {
        Self::new(StatusKind::Busy, "")
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(StatusKind::Error, message)
    }
}

/// Debounced status holder.
///
/// `request` applies a status immediately when the dwell time has elapsed,
/// otherwise parks it as pending (latest request wins). `poll` -- driven by
/// the UI tick -- applies a due pending status.
#[derive(Debug)]
pub struct StatusDebouncer {
    current: Status,
    pending: Option<Status>,
    last_switch: Option<Instant>,
}

impl Default for StatusDebouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusDebouncer {
    pub fn new() -> Self {
        Self {
            current: Status::default(),
            pending: None,
            last_switch: None,
        }
    }

    /// The currently visible status.
    pub fn current(&self) -> &Status {
        &self.current
    }

    fn dwell_elapsed(&self, now: Instant) -> bool {
        self.last_switch
            .is_none_or(|t| now.duration_since(t) >= STATUS_MIN_DWELL)
    }

    /// Request a transition. Returns `true` if it was applied immediately.
    pub fn request(&mut self, status: Status, now: Instant) -> bool {
        if self.dwell_elapsed(now) {
            self.apply(status, now);
            true
        } else {
            self.pending = Some(status);
            false
        }
    }

    /// Apply a due pending transition, if any. Returns `true` if the
    /// visible status changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.pending.is_some() && self.dwell_elapsed(now) {
            if let Some(status) = self.pending.take() {
                let changed = status != self.current;
                self.apply(status, now);
                return changed;
            }
        }
        false
    }

    fn apply(&mut self, status: Status, now: Instant) {
        self.current = status;
        self.last_switch = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_request_applies_immediately() {
        let mut d = StatusDebouncer::new();
        let t0 = Instant::now();
        assert!(d.request(Status::busy(), t0));
        assert_eq!(d.current().kind, StatusKind::Busy);
    }

    #[test]
    fn rapid_second_request_is_parked() {
        let mut d = StatusDebouncer::new();
        let t0 = Instant::now();
        d.request(Status::busy(), t0);

        // 100ms later: inside the dwell window, stays Busy.
        let t1 = t0 + Duration::from_millis(100);
        assert!(!d.request(Status::online(), t1));
        assert_eq!(d.current().kind, StatusKind::Busy);

        // Not due yet.
        assert!(!d.poll(t0 + Duration::from_millis(400)));
        assert_eq!(d.current().kind, StatusKind::Busy);

        // Due: pending applies.
        assert!(d.poll(t0 + Duration::from_millis(500)));
        assert_eq!(d.current().kind, StatusKind::Online);
    }

    #[test]
    fn latest_pending_request_wins() {
        let mut d = StatusDebouncer::new();
        let t0 = Instant::now();
        d.request(Status::busy(), t0);
        d.request(Status::online(), t0 + Duration::from_millis(50));
        d.request(Status::error("boom"), t0 + Duration::from_millis(100));

        d.poll(t0 + Duration::from_millis(600));
        assert_eq!(d.current().kind, StatusKind::Error);
        assert_eq!(d.current().message, "boom");
    }

    #[test]
    fn spaced_requests_apply_directly() {
        let mut d = StatusDebouncer::new();
        let t0 = Instant::now();
        d.request(Status::busy(), t0);
        assert!(d.request(Status::online(), t0 + Duration::from_millis(700)));
        assert_eq!(d.current().kind, StatusKind::Online);
    }
}
