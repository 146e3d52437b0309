use super::BPS_SCALE;
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

/// 四舍五入的整数除法 (half away from zero)
fn round_div(numerator: i128, denominator: i128) -> i128 {
    let half = denominator / 2;
    if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        (numerator - half) / denominator
    }
}

fn to_i64(value: i128, what: &str) -> AppResult<i64> {
    i64::try_from(value).map_err(|_| AppError::ValidationError(format!("{what} is out of range")))
}

/// effective = base × (1 + Σ bonus)，仅作展示快照
pub fn effective_rate_bp(base_rate_bp: i64, bonus_bp_sum: i64) -> AppResult<i64> {
    let factor = BPS_SCALE as i128 + bonus_bp_sum as i128;
    to_i64(
        round_div(base_rate_bp as i128 * factor, BPS_SCALE as i128),
        "Effective rate",
    )
}

/// amount = total × base × (1 + Σ bonus)，由未取整的费率一次取整到美分
pub fn commission_amount(sale_total: i64, base_rate_bp: i64, bonus_bp_sum: i64) -> AppResult<i64> {
    let overflow = || AppError::ValidationError("Commission amount is out of range".to_string());
    let factor = BPS_SCALE as i128 + bonus_bp_sum as i128;
    let numerator = (sale_total as i128)
        .checked_mul(base_rate_bp as i128)
        .and_then(|v| v.checked_mul(factor))
        .ok_or_else(overflow)?;
    let scale = BPS_SCALE as i128 * BPS_SCALE as i128;
    to_i64(round_div(numerator, scale), "Commission amount")
}

/// 佣金计算的全部输入快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommissionQuote {
    pub sale_total: i64,
    pub base_rate_bp: i64,
    pub content_bonus_bp: i64,
    pub seasonal_bonus_bp: i64,
    pub campaign_id: Option<i64>,
    pub effective_rate_bp: i64,
    pub commission_amount: i64,
}

impl CommissionQuote {
    pub fn compute(
        sale_total: i64,
        base_rate_bp: i64,
        content_bonus_bp: i64,
        seasonal: Option<(i64, i64)>,
    ) -> AppResult<Self> {
        if sale_total <= 0 {
            return Err(AppError::ValidationError(
                "Sale total must be positive".to_string(),
            ));
        }
        if base_rate_bp < 0 || content_bonus_bp < 0 {
            return Err(AppError::ValidationError(
                "Commission rate and bonuses must not be negative".to_string(),
            ));
        }
        let (campaign_id, seasonal_bonus_bp) = match seasonal {
            Some((id, bonus)) => (Some(id), bonus.max(0)),
            None => (None, 0),
        };
        let bonus = content_bonus_bp + seasonal_bonus_bp;
        let effective = effective_rate_bp(base_rate_bp, bonus)?;
        let amount = commission_amount(sale_total, base_rate_bp, bonus)?;
        Ok(Self {
            sale_total,
            base_rate_bp,
            content_bonus_bp,
            seasonal_bonus_bp,
            campaign_id,
            effective_rate_bp: effective,
            commission_amount: amount,
        })
    }
}

/// 销售统计周期 (自然月)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SalesPeriod {
    pub year: i32,
    pub month: u32,
}

impl SalesPeriod {
    pub fn containing(at: DateTime<Utc>) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }

    pub fn current() -> Self {
        Self::containing(Utc::now())
    }

    pub fn month_i16(&self) -> i16 {
        self.month as i16
    }
}

impl std::fmt::Display for SalesPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_video_bonus_example() {
        // $1000, 5%, 视频加成 0.5, 无活动 -> 7.5%, $75.00
        let quote = CommissionQuote::compute(100_000, 500, 5_000, None).unwrap();
        assert_eq!(quote.effective_rate_bp, 750);
        assert_eq!(quote.commission_amount, 7_500);
        assert_eq!(quote.campaign_id, None);
        assert_eq!(quote.seasonal_bonus_bp, 0);
    }

    #[test]
    fn test_seasonal_bonus_is_additive() {
        // 5% × (1 + 0.5 + 0.2) = 8.5%
        let quote = CommissionQuote::compute(20_000, 500, 5_000, Some((7, 2_000))).unwrap();
        assert_eq!(quote.effective_rate_bp, 850);
        assert_eq!(quote.commission_amount, 1_700);
        assert_eq!(quote.campaign_id, Some(7));
    }

    #[test]
    fn test_commission_rounds_to_cents() {
        // 333 × 5% × 1.5 = 24.975 -> 25
        assert_eq!(commission_amount(333, 500, 5_000).unwrap(), 25);
        // 331 × 5% × 1.5 = 24.825 -> 25
        assert_eq!(commission_amount(331, 500, 5_000).unwrap(), 25);
        // 326 × 5% × 1.5 = 24.45 -> 24
        assert_eq!(commission_amount(326, 500, 5_000).unwrap(), 24);
    }

    #[test]
    fn test_effective_rate_rounds_fractional_bp() {
        // 333bp × 1.5 = 499.5 -> 500
        assert_eq!(effective_rate_bp(333, 5_000).unwrap(), 500);
        assert_eq!(effective_rate_bp(500, 0).unwrap(), 500);
    }

    #[test]
    fn test_fractional_rate_rounds_once() {
        // 7.5% × 1.3333 = 9.99975%，展示费率取整为 1000bp，金额按未取整费率计算
        let quote = CommissionQuote::compute(1_000_000, 750, 3_333, None).unwrap();
        assert_eq!(quote.effective_rate_bp, 1_000);
        assert_eq!(quote.commission_amount, 99_998);
    }

    #[test]
    fn test_non_positive_sale_is_rejected() {
        assert!(CommissionQuote::compute(0, 500, 0, None).is_err());
        assert!(CommissionQuote::compute(-100, 500, 0, None).is_err());
    }

    #[test]
    fn test_overflow_is_reported() {
        assert!(commission_amount(i64::MAX, i64::MAX, 0).is_err());
        assert!(commission_amount(i64::MAX, 10_000, 0).is_ok());
    }

    #[test]
    fn test_sales_period_display() {
        let at = Utc.with_ymd_and_hms(2026, 3, 31, 23, 59, 59).unwrap();
        let period = SalesPeriod::containing(at);
        assert_eq!(period.to_string(), "2026-03");
        assert_eq!(period.month_i16(), 3);
    }
}
