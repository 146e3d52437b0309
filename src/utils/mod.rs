pub mod jwt;
pub mod referral_code;

pub use jwt::*;
pub use referral_code::{generate_unique_referral_code, is_valid_referral_code, normalize_referral_code};
