//! Cooperative cancellation checked at row boundaries.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::RowJsonError;

/// A signal the encoder polls between rows.
pub trait CancellationSignal {
    fn is_fired(&self) -> bool;

    /// Reason reported once the signal has fired.
    fn cause(&self) -> Option<String> {
        None
    }
}

/// No cancellation.
impl CancellationSignal for () {
    fn is_fired(&self) -> bool {
        false
    }
}

impl CancellationSignal for CancellationToken {
    fn is_fired(&self) -> bool {
        self.is_cancelled()
    }

    fn cause(&self) -> Option<String> {
        self.is_cancelled().then(|| "cancellation requested".to_owned())
    }
}

impl<T: CancellationSignal + ?Sized> CancellationSignal for &T {
    fn is_fired(&self) -> bool {
        (**self).is_fired()
    }

    fn cause(&self) -> Option<String> {
        (**self).cause()
    }
}

pub(crate) fn ensure_active<C>(cancel: &C) -> Result<(), RowJsonError>
where
    C: CancellationSignal + ?Sized,
{
    if cancel.is_fired() {
        #[cfg(feature = "tracing")]
        tracing::debug!("encoding aborted: {:?}", cancel.cause());

        return Err(RowJsonError::Cancelled {
            cause: cancel.cause(),
        });
    }
    Ok(())
}

/// Caller-driven token and/or deadline.
///
/// The default value never fires.
#[derive(Clone, Debug, Default)]
pub struct Cancellation {
    token: Option<CancellationToken>,
    deadline: Option<Instant>,
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires when `token` is cancelled.
    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Fires once `deadline` has passed.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Fires `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn token(&self) -> Option<&CancellationToken> {
        self.token.as_ref()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    fn deadline_passed(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Completes when the token is cancelled or the deadline passes.
    ///
    /// Pending forever when neither is set.
    pub(crate) async fn fired(&self) {
        let cancelled = async {
            match &self.token {
                Some(token) => token.cancelled().await,
                None => std::future::pending().await,
            }
        };
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            () = cancelled => {}
            () = expired => {}
        }
    }
}

impl CancellationSignal for Cancellation {
    fn is_fired(&self) -> bool {
        self.token.as_ref().is_some_and(CancellationToken::is_cancelled) || self.deadline_passed()
    }

    fn cause(&self) -> Option<String> {
        if self.deadline_passed() {
            Some("deadline exceeded".to_owned())
        } else if self.token.as_ref().is_some_and(CancellationToken::is_cancelled) {
            Some("cancellation requested".to_owned())
        } else {
            None
        }
    }
}

impl From<CancellationToken> for Cancellation {
    fn from(token: CancellationToken) -> Self {
        Self::new().with_token(token)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;
    use tokio_util::sync::CancellationToken;

    use super::{ensure_active, Cancellation, CancellationSignal};
    use crate::RowJsonError;

    #[test]
    fn unit_never_fires() {
        assert!(!().is_fired());
        assert!(ensure_active(&()).is_ok());
    }

    #[test]
    fn default_cancellation_never_fires() {
        let cancel = Cancellation::default();
        assert!(!cancel.is_fired());
        assert_eq!(cancel.cause(), None);
    }

    #[test]
    fn token_fires_with_cause() {
        let token = CancellationToken::new();
        let cancel = Cancellation::from(token.clone());
        assert!(!cancel.is_fired());

        token.cancel();
        assert!(cancel.is_fired());
        let err = ensure_active(&cancel).expect_err("must be cancelled");
        assert!(matches!(
            err,
            RowJsonError::Cancelled { cause: Some(ref cause) } if cause == "cancellation requested"
        ));
    }

    #[test]
    fn bare_token_reports_cause_only_once_cancelled() {
        let token = CancellationToken::new();
        assert_eq!(token.cause(), None);

        token.cancel();
        assert_eq!(token.cause().as_deref(), Some("cancellation requested"));
    }

    #[test]
    fn past_deadline_fires() {
        let cancel = Cancellation::new().with_deadline(Instant::now() - Duration::from_millis(1));
        assert!(cancel.is_fired());
        assert_eq!(cancel.cause().as_deref(), Some("deadline exceeded"));

        let later = Cancellation::new().with_timeout(Duration::from_secs(3600));
        assert!(!later.is_fired());
        assert!(later.deadline().is_some());
    }

    #[tokio::test]
    async fn fired_resolves_on_deadline() {
        let cancel = Cancellation::new().with_timeout(Duration::from_millis(10));
        tokio::time::timeout(Duration::from_secs(5), cancel.fired())
            .await
            .expect("deadline must resolve the fired future");
        assert!(cancel.is_fired());
    }

    #[tokio::test]
    async fn fired_resolves_on_token() {
        let token = CancellationToken::new();
        let cancel = Cancellation::from(token.clone());
        token.cancel();
        tokio::time::timeout(Duration::from_secs(5), cancel.fired())
            .await
            .expect("token must resolve the fired future");
    }
}
