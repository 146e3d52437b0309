use crate::entities::partner_entity as partners;
use crate::error::AppResult;
use rand::Rng;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};

const CODE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_LEN: usize = 8;

/// 推荐码统一大写存储，查询前做同样的规范化
pub fn normalize_referral_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// 自定义推荐码: 4-32 位字母数字或 '-' / '_'
pub fn is_valid_referral_code(code: &str) -> bool {
    (4..=32).contains(&code.len())
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn random_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| CODE_CHARS[rng.gen_range(0..CODE_CHARS.len())] as char)
        .collect()
}

/// 生成唯一的8位字母数字推荐码
pub async fn generate_unique_referral_code<C>(db: &C) -> AppResult<String>
where
    C: ConnectionTrait,
{
    loop {
        let code = random_code();

        // 检查是否已存在
        let exists = partners::Entity::find()
            .filter(partners::Column::ReferralCode.eq(code.as_str()))
            .count(db)
            .await?;

        if exists == 0 {
            return Ok(code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_referral_code() {
        assert_eq!(normalize_referral_code("  jane2026 "), "JANE2026");
        assert_eq!(normalize_referral_code("Jane-2026"), "JANE-2026");
    }

    #[test]
    fn test_random_code_shape() {
        let code = random_code();
        assert_eq!(code.len(), CODE_LEN);
        assert!(code.bytes().all(|b| CODE_CHARS.contains(&b)));
    }

    #[test]
    fn test_custom_code_validation() {
        assert!(is_valid_referral_code("JANE2026"));
        assert!(is_valid_referral_code("JANE_PICKS-1"));
        assert!(!is_valid_referral_code("ABC"));
        assert!(!is_valid_referral_code("HAS SPACE"));
    }
}
