// src/middleware/auth.rs

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{request::Parts, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::auth::{Claims, User},
};

/// Sessão ativa, inserida pelo `auth_guard` em toda rota protegida.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub claims: Claims,
}

// Para onde o dashboard deve mandar quem não tem sessão
const LOGIN_PATH: &str = "/login";

fn unauthorized(err: AppError, locale: &Locale, app_state: &AppState) -> ApiError {
    let mut api_error = err.to_api_error(locale, &app_state.i18n_store);
    if api_error.status == axum::http::StatusCode::UNAUTHORIZED {
        api_error.redirect_to = Some(LOGIN_PATH);
    }
    api_error
}

// O middleware em si
pub async fn auth_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        return Err(unauthorized(AppError::InvalidToken, &locale, &app_state));
    };

    let (user, claims) = app_state
        .auth_service
        .validate_token(bearer.token())
        .await
        .map_err(|e| unauthorized(e, &locale, &app_state))?;

    // Insere a sessão nos "extensions" da requisição
    request.extensions_mut().insert(AuthenticatedUser { user, claims });
    Ok(next.run(request).await)
}

// Extrator para obter a sessão diretamente nos handlers
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(session.clone());
        }

        // Rota montada fora do guard: responde como sessão ausente
        let Ok(locale) = Locale::from_request_parts(parts, state).await;
        Err(unauthorized(AppError::InvalidToken, &locale, state))
    }
}
