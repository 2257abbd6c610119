// src/handlers/reports.rs

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Datelike, Utc};
use serde_json::Value;

use crate::{
    common::{
        error::ApiError,
        query_cache::{CacheEntity, QueryKey},
        responses::{list_or_notice, ListResponse},
    },
    config::AppState,
    middleware::i18n::Locale,
    models::{
        employee::CommissionPeriod,
        report::{check_year, DashboardSummary, GrowthReport, YearQuery},
    },
};

#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Reports",
    responses(
        (status = 200, description = "Indicadores da página inicial", body = DashboardSummary),
        (status = 401, description = "Sessão ausente ou inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn dashboard(State(app_state): State<AppState>, locale: Locale) -> Result<Json<Value>, ApiError> {
    let service = &app_state.report_service;
    let summary = app_state
        .query_cache
        .fetch(QueryKey::new(CacheEntity::Reports, "dashboard"), || service.dashboard())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(summary))
}

/// Sempre 12 meses; meses sem pagamento saem zerados.
#[utoipa::path(
    get,
    path = "/api/reports/monthly-revenue",
    tag = "Reports",
    params(YearQuery),
    responses(
        (status = 200, description = "Receita mês a mês", body = ListResponse),
        (status = 400, description = "Ano fora do intervalo aceito")
    ),
    security(("api_jwt" = []))
)]
pub async fn monthly_revenue(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<YearQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    let year = check_year(query.year.unwrap_or_else(|| Utc::now().year()))
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let service = &app_state.report_service;
    let result = app_state
        .query_cache
        .fetch(QueryKey::new(CacheEntity::Reports, format!("monthly:{year}")), || {
            service.monthly_revenue(year)
        })
        .await;

    Ok(list_or_notice(result, "report", &locale, &app_state.i18n_store))
}

#[utoipa::path(
    get,
    path = "/api/reports/payment-methods",
    tag = "Reports",
    responses(
        (status = 200, description = "Quantidade e soma por forma de pagamento", body = ListResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn payment_methods(State(app_state): State<AppState>, locale: Locale) -> Json<ListResponse> {
    let service = &app_state.report_service;
    let result = app_state
        .query_cache
        .fetch(QueryKey::new(CacheEntity::Reports, "payment_methods"), || service.payment_methods())
        .await;

    list_or_notice(result, "report", &locale, &app_state.i18n_store)
}

#[utoipa::path(
    get,
    path = "/api/reports/commissions",
    tag = "Reports",
    params(CommissionPeriod),
    responses(
        (status = 200, description = "Comissão estimada por funcionário", body = ListResponse),
        (status = 400, description = "Período inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn commissions(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(period): Query<CommissionPeriod>,
) -> Result<Json<ListResponse>, ApiError> {
    period
        .check()
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let service = &app_state.report_service;
    let result = app_state
        .query_cache
        .fetch(QueryKey::with_filter(CacheEntity::Reports, &period), || service.commissions(&period))
        .await;

    Ok(list_or_notice(result, "report", &locale, &app_state.i18n_store))
}

#[utoipa::path(
    get,
    path = "/api/reports/growth",
    tag = "Reports",
    responses(
        (status = 200, description = "Crescimento do mês atual sobre o anterior", body = GrowthReport)
    ),
    security(("api_jwt" = []))
)]
pub async fn growth(State(app_state): State<AppState>, locale: Locale) -> Result<Json<Value>, ApiError> {
    let service = &app_state.report_service;
    let report = app_state
        .query_cache
        .fetch(QueryKey::new(CacheEntity::Reports, "growth"), || service.growth())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(report))
}
