//! 计划中的批处理入口
//!
//! 目前都未实现，调用方会收到 NotImplemented (501)，而不是静默成功。

use crate::error::{AppError, AppResult};

#[derive(Clone, Default)]
pub struct ScheduledOperations;

impl ScheduledOperations {
    pub fn new() -> Self {
        Self
    }

    /// 月度销售额重置
    /// 销售额已按自然月分行记录，跨月无需清零
    pub async fn reset_monthly_sales(&self) -> AppResult<u64> {
        Err(AppError::NotImplemented(
            "Monthly sales reset is not implemented; sales are already tracked per calendar month"
                .to_string(),
        ))
    }

    /// 批量打款
    pub async fn process_batch_payouts(&self) -> AppResult<u64> {
        Err(AppError::NotImplemented(
            "Batch payout processing is not implemented; approve and pay requests individually"
                .to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scheduled_operations_fail_loudly() {
        let ops = ScheduledOperations::new();
        assert!(matches!(
            ops.reset_monthly_sales().await,
            Err(AppError::NotImplemented(_))
        ));
        assert!(matches!(
            ops.process_batch_payouts().await,
            Err(AppError::NotImplemented(_))
        ));
    }
}
