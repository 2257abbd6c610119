// src/common/responses.rs

use axum::Json;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::{error::AppError, i18n::I18nStore};
use crate::middleware::i18n::Locale;

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Envelope das listagens. Se a leitura falhar, `items` vem vazio e `notice` traz o aviso.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListResponse {
    #[schema(value_type = Vec<Object>)]
    pub items: Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// Leitura de lista que nunca falha para o cliente: erros são logados e viram lista vazia.
pub fn list_or_notice(
    result: Result<Value, AppError>,
    entity: &str,
    locale: &Locale,
    i18n: &I18nStore,
) -> Json<ListResponse> {
    match result {
        Ok(items) => Json(ListResponse { items, notice: None }),
        Err(err) => {
            tracing::error!("Falha ao listar {}: {}", entity, err);
            let entity_name = i18n.translate(&locale.0, &format!("entity.{entity}"));
            let notice = i18n.translate_with(&locale.0, "notice.load_failed", &[("entity", &entity_name)]);
            Json(ListResponse {
                items: Value::Array(Vec::new()),
                notice: Some(notice),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_reads_become_an_empty_list_with_notice() {
        let store = I18nStore::load().unwrap();
        let Json(body) = list_or_notice(
            Err(AppError::DatabaseError(sqlx::Error::PoolTimedOut)),
            "client",
            &Locale("en".into()),
            &store,
        );

        assert_eq!(body.items, Value::Array(vec![]));
        assert_eq!(
            body.notice.as_deref(),
            Some("Could not load Client records. Showing an empty list.")
        );
    }

    #[test]
    fn successful_reads_have_no_notice() {
        let store = I18nStore::load().unwrap();
        let Json(body) = list_or_notice(
            Ok(serde_json::json!([{ "fullName": "Sara Ahmed" }])),
            "client",
            &Locale::default(),
            &store,
        );

        assert!(body.notice.is_none());
        assert_eq!(body.items[0]["fullName"], "Sara Ahmed");
    }
}
