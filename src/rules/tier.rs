use crate::config::{CommissionConfig, TierConfig};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Tier {
    pub name: String,
    /// 当月销售额门槛 (美分)
    pub threshold: i64,
    pub rate_bp: i64,
}

impl From<&TierConfig> for Tier {
    fn from(c: &TierConfig) -> Self {
        Self {
            name: c.name.clone(),
            threshold: c.threshold,
            rate_bp: c.rate_bp,
        }
    }
}

/// 按门槛从高到低排列的等级表；低于所有门槛时落到基础等级
#[derive(Debug, Clone)]
pub struct TierSchedule {
    base: Tier,
    tiers: Vec<Tier>,
}

impl TierSchedule {
    pub fn new(base: Tier, mut tiers: Vec<Tier>) -> Self {
        tiers.sort_by(|a, b| b.threshold.cmp(&a.threshold));
        Self { base, tiers }
    }

    pub fn from_config(config: &CommissionConfig) -> Self {
        let base = Tier {
            threshold: 0,
            ..Tier::from(&config.base_tier)
        };
        Self::new(base, config.tiers.iter().map(Tier::from).collect())
    }

    pub fn base(&self) -> &Tier {
        &self.base
    }

    /// 从最高门槛开始，第一个 sales >= threshold 的等级
    pub fn evaluate(&self, period_sales: i64) -> &Tier {
        self.tiers
            .iter()
            .find(|t| period_sales >= t.threshold)
            .unwrap_or(&self.base)
    }

    /// 从低到高
    pub fn all(&self) -> Vec<&Tier> {
        std::iter::once(&self.base)
            .chain(self.tiers.iter().rev())
            .collect()
    }
}
