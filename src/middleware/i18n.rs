// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::common::i18n::DEFAULT_LANG;

// Idiomas com catálogo em `locales/`
const SUPPORTED: &[&str] = &["en", "ar"];

/// Idioma preferido do cliente, lido do `Accept-Language`.
#[derive(Debug, Clone, PartialEq)]
pub struct Locale(pub String);

impl Locale {
    pub fn from_header(header_str: Option<&str>) -> Self {
        // "ar-EG" -> "ar"; a lista do parse já vem ordenada por qualidade (q=)
        let lang = header_str
            .map(accept_language::parse)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|tag| tag.split('-').next().map(str::to_lowercase))
            .find(|primary| SUPPORTED.contains(&primary.as_str()))
            .unwrap_or_else(|| DEFAULT_LANG.to_string());

        Locale(lang)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale(DEFAULT_LANG.to_string())
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header_str = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok());

        Ok(Locale::from_header(header_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_the_first_supported_language() {
        assert_eq!(Locale::from_header(Some("fr-FR, ar-EG;q=0.8, en;q=0.5")).0, "ar");
    }

    #[test]
    fn defaults_to_english() {
        assert_eq!(Locale::from_header(None).0, "en");
        assert_eq!(Locale::from_header(Some("de")).0, "en");
    }
}
