// View lifecycle - remote calls are cancelled when their view is disposed
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Cloneable handle tying in-flight requests to the view that issued them.
///
/// Every clone shares the same token, so a host can keep a handle and
/// dispose the view from another task while an operation is awaiting.
#[derive(Debug, Clone, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive `fut` to completion unless the scope is disposed first.
    /// A disposed scope drops the future (aborting the request) and yields `None`.
    pub async fn run<F>(&self, fut: F) -> Option<F::Output>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            output = fut => Some(output),
        }
    }

    pub fn dispose(&self) {
        self.token.cancel();
    }

    pub fn is_disposed(&self) -> bool {
        self.token.is_cancelled()
    }
}
