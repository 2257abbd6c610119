// src/common/error.rs

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

/// Erros internos da aplicação. Viram `ApiError` (com mensagem traduzida) na borda HTTP.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Regras checadas antes de qualquer escrita (ex: pagamento maior que o saldo).
    // O código é a chave de tradução.
    #[error("Regra de negócio violada: {0}")]
    BusinessRule(&'static str),

    #[error("Nenhum campo para atualizar")]
    EmptyUpdate,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Recurso não encontrado: {0}")]
    ResourceNotFound(&'static str),

    #[error("Valor duplicado: {0}")]
    UniqueConstraintViolation(String),

    #[error("Registro em uso: {0}")]
    ForeignKeyViolation(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    // Erro compartilhado pelo cache entre requisições que aguardavam a mesma busca
    #[error(transparent)]
    Shared(Arc<AppError>),
}

impl From<Arc<AppError>> for AppError {
    fn from(err: Arc<AppError>) -> Self {
        AppError::Shared(err)
    }
}

impl AppError {
    /// Falhas de conexão valem uma nova tentativa; erros de query ou de regra não.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::DatabaseError(e) => matches!(
                e,
                sqlx::Error::Io(_)
                    | sqlx::Error::Tls(_)
                    | sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
                    | sqlx::Error::Protocol(_)
                    | sqlx::Error::WorkerCrashed
            ),
            AppError::Shared(inner) => inner.is_retryable(),
            _ => false,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::BusinessRule(_) | AppError::EmptyUpdate => {
                StatusCode::BAD_REQUEST
            }
            AppError::EmailAlreadyExists
            | AppError::UniqueConstraintViolation(_)
            | AppError::ForeignKeyViolation(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Shared(inner) => inner.status(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Chave no catálogo de mensagens (`locales/*.json`).
    pub fn message_key(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "error.validation",
            AppError::BusinessRule(code) => *code,
            AppError::EmptyUpdate => "error.empty_update",
            AppError::EmailAlreadyExists => "error.email_exists",
            AppError::InvalidCredentials => "error.invalid_credentials",
            AppError::InvalidToken => "error.invalid_token",
            AppError::ResourceNotFound(_) => "error.not_found",
            AppError::UniqueConstraintViolation(_) => "error.duplicate",
            AppError::ForeignKeyViolation(_) => "error.in_use",
            AppError::Shared(inner) => inner.message_key(),
            _ => "error.internal",
        }
    }

    /// Converte para a resposta HTTP, traduzindo a mensagem para o idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        if let AppError::Shared(inner) = self {
            return inner.to_api_error(locale, i18n);
        }

        let lang = locale.0.as_str();
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("Erro Interno do Servidor: {:?}", self);
        }

        let error = match self {
            AppError::ResourceNotFound(entity) => {
                let entity_name = i18n.translate(lang, &format!("entity.{entity}"));
                i18n.translate_with(lang, self.message_key(), &[("entity", &entity_name)])
            }
            AppError::UniqueConstraintViolation(what) | AppError::ForeignKeyViolation(what) => {
                i18n.translate_with(lang, self.message_key(), &[("field", what)])
            }
            _ => i18n.translate(lang, self.message_key()),
        };

        let details = match self {
            AppError::ValidationError(errors) => Some(validation_details(errors)),
            _ => None,
        };

        ApiError {
            status,
            error,
            details,
            redirect_to: None,
        }
    }
}

// Campo -> lista de códigos/mensagens do validator
fn validation_details(errors: &validator::ValidationErrors) -> Value {
    let mut details = Map::new();
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<Value> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| Value::String(m.to_string()))
                    .unwrap_or_else(|| Value::String(e.code.to_string()))
            })
            .collect();
        details.insert(field.to_string(), Value::Array(messages));
    }
    Value::Object(details)
}

// ---
// Resposta de erro para o cliente
// ---

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
    // Usado pelo guard de sessão para mandar o dashboard para a tela de login
    pub redirect_to: Option<&'static str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({ "error": self.error });
        if let Some(details) = self.details {
            body["details"] = details;
        }
        if let Some(redirect_to) = self.redirect_to {
            body["redirectTo"] = Value::String(redirect_to.to_string());
        }
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> I18nStore {
        I18nStore::load().expect("catálogos embutidos")
    }

    #[test]
    fn business_rules_are_bad_requests() {
        let err = AppError::BusinessRule("rule.payment_exceeds_balance");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message_key(), "rule.payment_exceeds_balance");
    }

    #[test]
    fn not_found_message_names_the_entity() {
        let api = AppError::ResourceNotFound("client")
            .to_api_error(&Locale("en".into()), &store());
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.error, "Client not found.");
    }

    #[test]
    fn shared_errors_keep_the_inner_status() {
        let inner = Arc::new(AppError::DatabaseError(sqlx::Error::PoolTimedOut));
        let err = AppError::from(inner);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.is_retryable());
    }

    #[test]
    fn query_errors_are_not_retried() {
        let err = AppError::DatabaseError(sqlx::Error::RowNotFound);
        assert!(!err.is_retryable());
        assert!(!AppError::InvalidToken.is_retryable());
    }

    #[test]
    fn validation_errors_carry_field_details() {
        let mut errors = validator::ValidationErrors::new();
        let mut e = validator::ValidationError::new("length");
        e.message = Some("required".into());
        errors.add("fullName", e);

        let api = AppError::ValidationError(errors).to_api_error(&Locale("en".into()), &store());
        let details = api.details.expect("detalhes");
        assert_eq!(details["fullName"][0], "required");
    }
}
