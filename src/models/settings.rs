// src/models/settings.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "setting_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SettingType {
    String,
    Number,
    Boolean,
}

impl SettingType {
    /// Converte o texto gravado no valor JSON do tipo declarado.
    pub fn parse(self, raw: &str) -> Result<Value, AppError> {
        let mismatch = || AppError::BusinessRule("rule.setting_type_mismatch");
        match self {
            SettingType::String => Ok(Value::String(raw.to_string())),
            SettingType::Number => {
                let number: Decimal = raw.trim().parse().map_err(|_| mismatch())?;
                serde_json::to_value(number).map_err(|_| mismatch())
            }
            SettingType::Boolean => match raw.trim() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(mismatch()),
            },
        }
    }

    /// Texto a gravar: só números e booleanos perdem os espaços das pontas.
    pub fn normalize(self, raw: &str) -> &str {
        match self {
            SettingType::String => raw,
            SettingType::Number | SettingType::Boolean => raw.trim(),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct SystemSetting {
    pub key: String,
    pub value: String,
    pub value_type: SettingType,
    pub updated_at: DateTime<Utc>,
}

/// Configuração como sai na API: `value` já no tipo JSON correto.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingView {
    #[schema(example = "currency")]
    pub key: String,
    #[schema(value_type = Object, example = "EGP")]
    pub value: Value,
    pub value_type: SettingType,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<SystemSetting> for SettingView {
    type Error = AppError;

    fn try_from(setting: SystemSetting) -> Result<Self, Self::Error> {
        let value = setting.value_type.parse(&setting.value)?;
        Ok(Self {
            key: setting.key,
            value,
            value_type: setting.value_type,
            updated_at: setting.updated_at,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PutSettingPayload {
    #[validate(length(max = 4000, message = "too_long"))]
    #[schema(example = "EGP")]
    pub value: String,
    pub value_type: Option<SettingType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_become_json_numbers() {
        let value = SettingType::Number.parse("12.5").unwrap();
        assert_eq!(value, serde_json::json!(12.5));
    }

    #[test]
    fn booleans_are_strict() {
        assert_eq!(SettingType::Boolean.parse("true").unwrap(), Value::Bool(true));
        assert!(SettingType::Boolean.parse("yes").is_err());
    }

    #[test]
    fn mismatched_values_are_rejected() {
        let err = SettingType::Number.parse("abc").unwrap_err();
        assert_eq!(err.message_key(), "rule.setting_type_mismatch");
        assert!(SettingType::String.parse("anything").is_ok());
    }

    #[test]
    fn text_settings_keep_their_spaces() {
        assert_eq!(SettingType::String.normalize("  Atelier Noor  "), "  Atelier Noor  ");
        assert_eq!(
            SettingType::String.parse("  Atelier Noor  ").unwrap(),
            Value::String("  Atelier Noor  ".to_string())
        );
        assert_eq!(SettingType::Number.normalize(" 12.5 "), "12.5");
        assert_eq!(SettingType::Boolean.normalize("true\n"), "true");
    }
}
