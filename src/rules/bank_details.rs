use crate::entities::BankAccountType;
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct BankDetails {
    #[schema(example = "Jane Doe")]
    pub holder_name: String,
    #[schema(example = "First National Bank")]
    pub bank_name: String,
    #[schema(example = "000123456789")]
    pub account_number: String,
    /// 分行号 / routing number
    #[schema(example = "021000021")]
    pub routing_code: String,
    #[schema(example = "checking")]
    pub account_type: String,
}

/// 校验通过后的银行信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidBankDetails {
    pub holder_name: String,
    pub bank_name: String,
    pub account_number: String,
    pub routing_code: String,
    pub account_type: BankAccountType,
}

impl BankDetails {
    /// 结构完整性检查；错误信息指明缺失的字段
    pub fn validate(&self) -> AppResult<ValidBankDetails> {
        let required = [
            ("account holder name", &self.holder_name),
            ("bank name", &self.bank_name),
            ("account number", &self.account_number),
            ("branch/routing code", &self.routing_code),
            ("account type", &self.account_type),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, v)| v.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(AppError::ValidationError(format!(
                "Incomplete bank details: missing {}",
                missing.join(", ")
            )));
        }

        let account_number = self.account_number.trim().replace([' ', '-'], "");
        if !account_number.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AppError::ValidationError(
                "Incomplete bank details: account number must be alphanumeric".to_string(),
            ));
        }
        let account_type = self
            .account_type
            .parse::<BankAccountType>()
            .map_err(|e| AppError::ValidationError(format!("Incomplete bank details: {e}")))?;

        Ok(ValidBankDetails {
            holder_name: self.holder_name.trim().to_string(),
            bank_name: self.bank_name.trim().to_string(),
            account_number,
            routing_code: self.routing_code.trim().to_string(),
            account_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> BankDetails {
        BankDetails {
            holder_name: "Jane Doe".into(),
            bank_name: "First National".into(),
            account_number: "0001 2345-6789".into(),
            routing_code: "021000021".into(),
            account_type: "Savings".into(),
        }
    }

    #[test]
    fn test_complete_details_are_normalized() {
        let valid = complete().validate().unwrap();
        assert_eq!(valid.account_number, "000123456789");
        assert_eq!(valid.account_type, BankAccountType::Savings);
    }

    #[test]
    fn test_missing_fields_are_named() {
        let details = BankDetails {
            bank_name: "  ".into(),
            routing_code: String::new(),
            ..complete()
        };
        match details.validate() {
            Err(AppError::ValidationError(msg)) => {
                assert!(msg.contains("bank name"));
                assert!(msg.contains("branch/routing code"));
                assert!(!msg.contains("holder"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_account_type() {
        let details = BankDetails {
            account_type: "brokerage".into(),
            ..complete()
        };
        assert!(matches!(
            details.validate(),
            Err(AppError::ValidationError(_))
        ));
    }
}
