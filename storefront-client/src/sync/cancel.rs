use tokio_util::sync::CancellationToken;

use crate::remote::ListenerRegistration;

/// Cancels one collection subscription
///
/// Obtained from `subscribe`/`watch`. A handle is consumed by [`cancel`], so
/// it can be invoked at most once. A failed subscription yields a no-op
/// handle ([`is_active`] is `false`); cancelling it does nothing.
///
/// Dropping a handle does not cancel the subscription.
///
/// [`cancel`]: CancelHandle::cancel
/// [`is_active`]: CancelHandle::is_active
#[derive(Debug)]
#[must_use = "dropping a CancelHandle leaves the subscription running"]
pub struct CancelHandle {
    inner: Option<ActiveSubscription>,
}

#[derive(Debug)]
struct ActiveSubscription {
    path: String,
    token: CancellationToken,
    registration: ListenerRegistration,
}

impl CancelHandle {
    pub(crate) fn new(
        path: impl Into<String>,
        token: CancellationToken,
        registration: ListenerRegistration,
    ) -> Self {
        Self {
            inner: Some(ActiveSubscription {
                path: path.into(),
                token,
                registration,
            }),
        }
    }

    /// Handle returned when subscription setup failed
    pub fn noop() -> Self {
        Self { inner: None }
    }

    pub fn is_active(&self) -> bool {
        self.inner.is_some()
    }

    /// Stop delivery for this subscription and detach it from the backend
    pub fn cancel(self) {
        if let Some(mut sub) = self.inner {
            sub.token.cancel();
            sub.registration.remove();
            tracing::debug!(collection = %sub.path, "Subscription cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_noop_handle() {
        let handle = CancelHandle::noop();
        assert!(!handle.is_active());
        handle.cancel();
    }

    #[test]
    fn test_cancel_fires_token_and_registration() {
        let removed = Arc::new(AtomicUsize::new(0));
        let counter = removed.clone();
        let token = CancellationToken::new();
        let handle = CancelHandle::new(
            "order",
            token.clone(),
            ListenerRegistration::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        assert!(handle.is_active());
        handle.cancel();
        assert!(token.is_cancelled());
        assert_eq!(removed.load(Ordering::SeqCst), 1);
    }
}
