//! Issuer and client details printed on invoices.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::validation::{validate_registration_number, ValidationResult};

/// Company settings, persisted as one value in the local settings file.
///
/// Every field defaults independently, so a settings file written by an
/// older build (missing fields) still loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyInfo {
    pub name: String,
    pub postal_code: String,
    pub address_line: String,
    pub tel: String,
    pub email: String,
    pub bank_info: String,
    pub client_name: String,
    pub client_postal_code: String,
    pub client_address_line: String,
    /// Qualified invoice issuer number (`T` + 13 digits).
    pub registration_number: String,
}

impl CompanyInfo {
    /// Checks the fields an invoice cannot be issued without.
    pub fn validate(&self) -> ValidationResult<()> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "name".to_string(),
            });
        }
        if !self.registration_number.trim().is_empty() {
            validate_registration_number(&self.registration_number)?;
        }
        Ok(())
    }
}

impl Default for CompanyInfo {
    fn default() -> Self {
        Self {
            name: "株式会社キムチ工房".to_string(),
            postal_code: "123-4567".to_string(),
            address_line: "東京都○○区××1-2-3".to_string(),
            tel: "03-1234-5678".to_string(),
            email: "info@kimchi-kobo.example.com".to_string(),
            bank_info: "○○銀行 △△支店 普通 1234567".to_string(),
            client_name: "株式会社スーパーマーケット 御中".to_string(),
            client_postal_code: "890-1234".to_string(),
            client_address_line: "東京都□□区△△4-5-6".to_string(),
            registration_number: "T1234567890123".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(CompanyInfo::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let info: CompanyInfo = serde_json::from_str(r#"{"name":"株式会社テスト"}"#).unwrap();
        assert_eq!(info.name, "株式会社テスト");
        assert_eq!(info.registration_number, "T1234567890123");
    }

    #[test]
    fn test_validate() {
        let mut info = CompanyInfo::default();
        info.registration_number = String::new();
        assert!(info.validate().is_ok());

        info.registration_number = "X123".to_string();
        assert!(info.validate().is_err());

        let mut info = CompanyInfo::default();
        info.name = " ".to_string();
        assert!(info.validate().is_err());
    }
}
