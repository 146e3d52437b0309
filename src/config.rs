use crate::entities::ActorType;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub events: EventsConfig,
    #[serde(default)]
    pub payout: PayoutConfig,
    #[serde(default)]
    pub commission: CommissionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expires_in: i64, // seconds
}

/// 事件触发 (sale-created / delivery-confirmed / click) 共享密钥
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EventsConfig {
    pub secret: String,
}

/// 最低提现金额 (美分)，按账户类型区分
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutConfig {
    #[serde(default = "default_partner_minimum")]
    pub partner_minimum: i64,
    #[serde(default = "default_vendor_minimum")]
    pub vendor_minimum: i64,
    #[serde(default = "default_staff_minimum")]
    pub staff_minimum: i64,
}

impl Default for PayoutConfig {
    fn default() -> Self {
        Self {
            partner_minimum: default_partner_minimum(),
            vendor_minimum: default_vendor_minimum(),
            staff_minimum: default_staff_minimum(),
        }
    }
}

impl PayoutConfig {
    pub fn minimum_for(&self, actor_type: ActorType) -> i64 {
        match actor_type {
            ActorType::Partner => self.partner_minimum,
            ActorType::Vendor => self.vendor_minimum,
            ActorType::Staff => self.staff_minimum,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TierConfig {
    pub name: String,
    /// 当月销售额门槛 (美分)，基础等级忽略此值
    #[serde(default)]
    pub threshold: i64,
    pub rate_bp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionConfig {
    /// 佣金完成后多少天从 pending 转为 available
    #[serde(default = "default_hold_days")]
    pub hold_days: i64,
    /// 转可提现后台任务间隔 (秒)
    #[serde(default = "default_release_interval_secs")]
    pub release_interval_secs: u64,
    #[serde(default = "default_base_tier")]
    pub base_tier: TierConfig,
    #[serde(default = "default_tiers")]
    pub tiers: Vec<TierConfig>,
}

impl Default for CommissionConfig {
    fn default() -> Self {
        Self {
            hold_days: default_hold_days(),
            release_interval_secs: default_release_interval_secs(),
            base_tier: default_base_tier(),
            tiers: default_tiers(),
        }
    }
}

fn default_partner_minimum() -> i64 {
    5_000 // $50
}

fn default_vendor_minimum() -> i64 {
    10_000 // $100
}

fn default_staff_minimum() -> i64 {
    2_000 // $20
}

fn default_hold_days() -> i64 {
    14
}

fn default_release_interval_secs() -> u64 {
    3600
}

fn default_base_tier() -> TierConfig {
    TierConfig {
        name: "Bronze".to_string(),
        threshold: 0,
        rate_bp: 500,
    }
}

fn default_tiers() -> Vec<TierConfig> {
    vec![
        TierConfig {
            name: "Silver".to_string(),
            threshold: 500_000,
            rate_bp: 600,
        },
        TierConfig {
            name: "Gold".to_string(),
            threshold: 1_500_000,
            rate_bp: 750,
        },
        TierConfig {
            name: "Platinum".to_string(),
            threshold: 3_000_000,
            rate_bp: 1000,
        },
    ]
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => Self::parse(&config_str)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                // 数据库 URL 在无配置文件时必须提供
                let database_url = get_env("DATABASE_URL")
                    .ok_or("DATABASE_URL is required when config.toml is absent")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    jwt: JwtConfig {
                        secret: get_env("JWT_SECRET")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                        access_token_expires_in: get_env_parse("JWT_ACCESS_EXPIRES_IN", 7200i64),
                    },
                    events: EventsConfig::default(),
                    payout: PayoutConfig::default(),
                    commission: CommissionConfig::default(),
                }
            }
            Err(e) => {
                return Err(format!("Failed to read config file {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            config.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_ACCESS_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            config.jwt.access_token_expires_in = n;
        }
        if let Ok(v) = env::var("EVENTS_SECRET") {
            config.events.secret = v;
        }
        if let Ok(v) = env::var("PAYOUT_PARTNER_MINIMUM")
            && let Ok(n) = v.parse()
        {
            config.payout.partner_minimum = n;
        }
        if let Ok(v) = env::var("PAYOUT_VENDOR_MINIMUM")
            && let Ok(n) = v.parse()
        {
            config.payout.vendor_minimum = n;
        }
        if let Ok(v) = env::var("PAYOUT_STAFF_MINIMUM")
            && let Ok(n) = v.parse()
        {
            config.payout.staff_minimum = n;
        }
        if let Ok(v) = env::var("COMMISSION_HOLD_DAYS")
            && let Ok(n) = v.parse()
        {
            config.commission.hold_days = n;
        }
        if let Ok(v) = env::var("COMMISSION_RELEASE_INTERVAL_SECS")
            && let Ok(n) = v.parse()
        {
            config.commission.release_interval_secs = n;
        }

        config.validate()?;
        Ok(config)
    }

    /// 解析 TOML 内容（不读取环境变量）
    pub fn parse(config_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Config =
            toml::from_str(config_str).map_err(|e| format!("Failed to parse config file: {e}"))?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.events.secret.is_empty() {
            log::warn!("events.secret is empty; event triggers will be rejected");
        }
        if self.commission.hold_days < 0 {
            return Err("commission.hold_days must not be negative".into());
        }
        for t in &self.commission.tiers {
            if t.threshold <= 0 {
                return Err(format!("Tier {} must have a positive threshold", t.name).into());
            }
        }
        Ok(())
    }
}
