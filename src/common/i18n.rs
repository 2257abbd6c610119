// src/common/i18n.rs

use std::collections::HashMap;

use anyhow::Context;

pub const DEFAULT_LANG: &str = "en";

// Os catálogos vão embutidos no binário
const CATALOGS: &[(&str, &str)] = &[
    ("en", include_str!("../../locales/en.json")),
    ("ar", include_str!("../../locales/ar.json")),
];

/// Mensagens traduzidas por idioma. Chaves ausentes caem no inglês e, por fim, na própria chave.
#[derive(Debug, Clone)]
pub struct I18nStore {
    catalogs: HashMap<String, HashMap<String, String>>,
}

impl I18nStore {
    pub fn load() -> anyhow::Result<Self> {
        let mut catalogs = HashMap::new();
        for (lang, raw) in CATALOGS {
            let messages: HashMap<String, String> = serde_json::from_str(raw)
                .with_context(|| format!("catálogo de mensagens '{lang}' inválido"))?;
            catalogs.insert(lang.to_string(), messages);
        }
        Ok(Self { catalogs })
    }

    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.lookup(lang, key)
            .or_else(|| self.lookup(DEFAULT_LANG, key))
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string())
    }

    /// Traduz e substitui os marcadores `{nome}` pelos argumentos.
    pub fn translate_with(&self, lang: &str, key: &str, args: &[(&str, &str)]) -> String {
        args.iter()
            .fold(self.translate(lang, key), |message, (name, value)| {
                message.replace(&format!("{{{name}}}"), value)
            })
    }

    fn lookup(&self, lang: &str, key: &str) -> Option<&str> {
        self.catalogs
            .get(lang)
            .and_then(|messages| messages.get(key))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_into_arabic() {
        let store = I18nStore::load().unwrap();
        assert_eq!(
            store.translate("ar", "rule.coupon_expired"),
            "انتهت صلاحية هذا الكوبون."
        );
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        let store = I18nStore::load().unwrap();
        assert_eq!(
            store.translate("pt", "error.invalid_credentials"),
            "Invalid email or password."
        );
    }

    #[test]
    fn every_catalog_has_the_same_keys() {
        let store = I18nStore::load().unwrap();
        let english: std::collections::BTreeSet<_> = store.catalogs["en"].keys().collect();
        let arabic: std::collections::BTreeSet<_> = store.catalogs["ar"].keys().collect();
        assert_eq!(english, arabic);
    }

    #[test]
    fn unknown_key_is_returned_as_is() {
        let store = I18nStore::load().unwrap();
        assert_eq!(store.translate("en", "rule.does_not_exist"), "rule.does_not_exist");
    }

    #[test]
    fn placeholders_are_filled() {
        let store = I18nStore::load().unwrap();
        let message = store.translate_with("en", "error.duplicate", &[("field", "code")]);
        assert_eq!(message, "A record with this code already exists.");
    }
}
