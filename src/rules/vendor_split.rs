use super::BPS_SCALE;
use crate::error::{AppError, AppResult};
use serde::Serialize;
use utoipa::ToSchema;

/// 商家提现拆分：门店抽成 + 商家实得
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct VendorSplit {
    pub gross_amount: i64,
    pub commission_rate_bp: i64,
    pub store_cut: i64,
    pub net_payout: i64,
}

/// store_cut = gross × rate；net = gross - store_cut，最低为 0
/// 门店抽成向下取整，零头归商家
pub fn split_vendor_payout(gross_amount: i64, commission_rate_bp: i64) -> AppResult<VendorSplit> {
    if gross_amount < 0 {
        return Err(AppError::ValidationError(
            "Gross amount must not be negative".to_string(),
        ));
    }
    if commission_rate_bp < 0 {
        return Err(AppError::ValidationError(
            "Store commission rate must not be negative".to_string(),
        ));
    }
    let store_cut = gross_amount as i128 * commission_rate_bp as i128 / BPS_SCALE as i128;
    let store_cut = i64::try_from(store_cut)
        .map_err(|_| AppError::ValidationError("Store cut is out of range".to_string()))?;
    let net_payout = (gross_amount - store_cut).max(0);
    Ok(VendorSplit {
        gross_amount,
        commission_rate_bp,
        store_cut,
        net_payout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_commission() {
        // $500, 25% -> $125 / $375
        let split = split_vendor_payout(50_000, 2_500).unwrap();
        assert_eq!(split.store_cut, 12_500);
        assert_eq!(split.net_payout, 37_500);
        assert_eq!(split.store_cut + split.net_payout, split.gross_amount);
    }

    #[test]
    fn test_full_or_higher_rate_nets_zero() {
        assert_eq!(split_vendor_payout(50_000, 10_000).unwrap().net_payout, 0);
        let over = split_vendor_payout(50_000, 12_000).unwrap();
        assert_eq!(over.net_payout, 0);
        assert_eq!(over.store_cut, 60_000);
    }

    #[test]
    fn test_remainder_goes_to_vendor() {
        // 333 × 10% = 33.3 -> 门店 33，商家 300
        let split = split_vendor_payout(333, 1_000).unwrap();
        assert_eq!(split.store_cut, 33);
        assert_eq!(split.net_payout, 300);
    }

    #[test]
    fn test_negative_inputs_are_rejected() {
        assert!(split_vendor_payout(-1, 1_000).is_err());
        assert!(split_vendor_payout(100, -1).is_err());
    }
}
