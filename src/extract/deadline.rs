use std::sync::{Arc,
                atomic::{AtomicBool, Ordering}};
use std::time::{Duration, Instant};

/// Stand-in expiry for timeouts too large to add to the current instant
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// `timeout` from now, saturating at [`FAR_FUTURE`]
fn expiry_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout).unwrap_or(now + FAR_FUTURE)
}

/// The session-wide execution budget.
///
/// Expires at a fixed instant or when cancelled through a [`CancelHandle`].
/// Every action derives its own shorter [`Deadline`] from it.
#[derive(Debug, Clone)]
pub struct Budget {
    expires_at: Instant,
    cancelled: Arc<AtomicBool>,
}

/// Cancels a [`Budget`] from anywhere, e.g. a signal handler thread
#[derive(Debug, Clone)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl Budget {
    pub fn new(timeout: Duration) -> Self {
        Self { expires_at: expiry_after(timeout), cancelled: Arc::new(AtomicBool::new(false)) }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle(self.cancelled.clone())
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Cancelled or past its expiry
    pub fn is_exhausted(&self) -> bool {
        self.is_cancelled() || Instant::now() >= self.expires_at
    }

    pub fn remaining(&self) -> Duration {
        if self.is_cancelled() {
            return Duration::ZERO;
        }
        self.expires_at.saturating_duration_since(Instant::now())
    }

    /// Child deadline `timeout` from now, never later than the budget itself
    pub fn child(&self, timeout: Duration) -> Deadline {
        let wanted = expiry_after(timeout);
        if wanted < self.expires_at {
            Deadline { expires_at: wanted, timeout, parent_bound: false }
        } else {
            Deadline { expires_at: self.expires_at, timeout, parent_bound: true }
        }
    }
}

/// Expiry for a single executor call
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    expires_at: Instant,
    timeout: Duration,
    parent_bound: bool,
}

impl Deadline {
    /// The timeout that was asked for, before clamping to the budget
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether the budget, not the requested timeout, sets the expiry
    pub fn is_parent_bound(&self) -> bool {
        self.parent_bound
    }

    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}
