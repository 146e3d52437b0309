//! Background scheduled tasks.
//!
//! Call `spawn_all` once during startup. Each task loops on its own interval and
//! logs failures instead of exiting.

use crate::services::CommissionService;

/// Spawn all background tasks.
pub fn spawn_all(commission_service: CommissionService, release_interval_secs: u64) {
    // 佣金结算: 完成超过 hold_days 的佣金从 pending 转入 available
    {
        let svc = commission_service.clone();
        let interval = std::time::Duration::from_secs(release_interval_secs.max(60));
        tokio::spawn(async move {
            loop {
                match svc.release_matured_earnings().await {
                    Ok(s) if s.released_count > 0 => log::info!(
                        "Released {} matured commissions ({} total)",
                        s.released_count,
                        s.released_amount
                    ),
                    Ok(_) => {}
                    Err(e) => log::error!("Failed to release matured commissions: {e:?}"),
                }
                tokio::time::sleep(interval).await;
            }
        });
    }
}
