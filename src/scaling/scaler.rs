//核心 Trait 定义（Scaler）
use super::metric_types::{ExternalMetricValue, LabelSelector, MetricSpec};
use super::scaling_error::ScalingError;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// The capability set every scaler variant exposes to the host control loop.
///
/// `is_active` and `get_metrics` hit the external signal source and must honor
/// the context. A failed fetch is returned as `Err`, never as a zero reading.
#[async_trait]
pub trait Scaler: Send + Sync {
    /// `Err` means "unknown, do not scale up", not "inactive".
    async fn is_active(&self, ctx: &ScalerContext) -> Result<bool, ScalingError>;

    /// Pure, no I/O.
    fn get_metric_spec_for_scaling(&self) -> Vec<MetricSpec>;

    async fn get_metrics(
        &self,
        ctx: &ScalerContext,
        metric_name: &str,
        selector: &LabelSelector,
    ) -> Result<Vec<ExternalMetricValue>, ScalingError>;

    async fn close(&self) -> Result<(), ScalingError>;
}

// 可取消的上下文：取消信号 + 可选截止时间
#[derive(Debug, Clone)]
pub struct ScalerContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl ScalerContext {
    pub fn background() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// Cancelling the parent cancels the child, not the other way round.
    /// The child keeps the earlier of the two deadlines.
    pub fn child(&self, timeout: Option<Duration>) -> Self {
        let deadline = match (self.deadline, timeout.map(|t| Instant::now() + t)) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        Self {
            token: self.token.child_token(),
            deadline,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn err(&self) -> Option<ScalingError> {
        if self.token.is_cancelled() {
            return Some(ScalingError::Cancelled);
        }
        match self.deadline {
            Some(d) if Instant::now() >= d => Some(ScalingError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Races `fut` against cancellation and the deadline.
    pub async fn run<T, F>(&self, fut: F) -> Result<T, ScalingError>
    where
        F: Future<Output = Result<T, ScalingError>>,
    {
        if let Some(err) = self.err() {
            return Err(err);
        }
        let deadline = async {
            match self.deadline {
                Some(d) => tokio::time::sleep_until(d).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(ScalingError::Cancelled),
            _ = deadline => Err(ScalingError::DeadlineExceeded),
            res = fut => res,
        }
    }
}

impl Default for ScalerContext {
    fn default() -> Self {
        Self::background()
    }
}
