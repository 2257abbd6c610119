// src/models/catalog.rs

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef},
    Decode, Encode, Postgres, Type,
};
use thiserror::Error;
use utoipa::ToSchema;

use crate::models::order::OrderItemType;

#[derive(Debug, Error, PartialEq)]
#[error("serviço desconhecido: '{0}'")]
pub struct UnknownServiceKind(pub String);

// Gera o enum de estilos de uma categoria com a lista fechada de slugs
macro_rules! style_enum {
    ($name:ident { $($variant:ident => $slug:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $slug),+
                }
            }

            fn parse(slug: &str) -> Option<Self> {
                match slug {
                    $($slug => Some($name::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

style_enum!(MakeupStyle {
    Bridal => "bridal",
    Engagement => "engagement",
    Soiree => "soiree",
    Photoshoot => "photoshoot",
});

style_enum!(HairStyle {
    Bridal => "bridal",
    Updo => "updo",
    Blowout => "blowout",
    Extensions => "extensions",
});

style_enum!(HennaStyle {
    Bride => "bride",
    Guest => "guest",
});

style_enum!(PhotoPackage {
    Studio => "studio",
    Outdoor => "outdoor",
    FullDay => "full_day",
});

/// Serviço prestado num item de pedido: categoria -> estilo.
/// JSON: `{ "category": "makeup", "style": "bridal" }`; no banco: `makeup.bridal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(tag = "category", content = "style", rename_all = "snake_case")]
pub enum ServiceKind {
    Makeup(MakeupStyle),
    Hair(HairStyle),
    Henna(HennaStyle),
    Photography(PhotoPackage),
}

impl ServiceKind {
    pub fn category(&self) -> &'static str {
        match self {
            ServiceKind::Makeup(_) => "makeup",
            ServiceKind::Hair(_) => "hair",
            ServiceKind::Henna(_) => "henna",
            ServiceKind::Photography(_) => "photography",
        }
    }

    pub fn style(&self) -> &'static str {
        match self {
            ServiceKind::Makeup(s) => s.as_str(),
            ServiceKind::Hair(s) => s.as_str(),
            ServiceKind::Henna(s) => s.as_str(),
            ServiceKind::Photography(s) => s.as_str(),
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.category(), self.style())
    }
}

impl FromStr for ServiceKind {
    type Err = UnknownServiceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownServiceKind(s.to_string());
        let (category, style) = s.split_once('.').ok_or_else(unknown)?;

        let kind = match category {
            "makeup" => MakeupStyle::parse(style).map(ServiceKind::Makeup),
            "hair" => HairStyle::parse(style).map(ServiceKind::Hair),
            "henna" => HennaStyle::parse(style).map(ServiceKind::Henna),
            "photography" => PhotoPackage::parse(style).map(ServiceKind::Photography),
            _ => None,
        };

        kind.ok_or_else(unknown)
    }
}

// Gravado como TEXT
impl Type<Postgres> for ServiceKind {
    fn type_info() -> PgTypeInfo {
        <String as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<Postgres>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Postgres> for ServiceKind {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        <String as Encode<'q, Postgres>>::encode_by_ref(&self.to_string(), buf)
    }
}

impl<'r> Decode<'r, Postgres> for ServiceKind {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let raw = <&str as Decode<'r, Postgres>>::decode(value)?;
        Ok(raw.parse()?)
    }
}

// ---
// Árvore de opções para os selects do dashboard
// ---

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCategoryOptions {
    pub category: String,
    pub styles: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemTypeOption {
    pub item_type: OrderItemType,
    pub requires_service: bool,
    pub requires_dress: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemCatalog {
    pub item_types: Vec<ItemTypeOption>,
    pub services: Vec<ServiceCategoryOptions>,
}

impl OrderItemCatalog {
    pub fn build() -> Self {
        let item_types = OrderItemType::ALL
            .iter()
            .map(|&item_type| ItemTypeOption {
                item_type,
                requires_service: item_type.requires_service(),
                requires_dress: item_type.requires_dress(),
            })
            .collect();

        let services = vec![
            ServiceCategoryOptions {
                category: "makeup".into(),
                styles: MakeupStyle::ALL.iter().map(|s| s.as_str().to_string()).collect(),
            },
            ServiceCategoryOptions {
                category: "hair".into(),
                styles: HairStyle::ALL.iter().map(|s| s.as_str().to_string()).collect(),
            },
            ServiceCategoryOptions {
                category: "henna".into(),
                styles: HennaStyle::ALL.iter().map(|s| s.as_str().to_string()).collect(),
            },
            ServiceCategoryOptions {
                category: "photography".into(),
                styles: PhotoPackage::ALL.iter().map(|s| s.as_str().to_string()).collect(),
            },
        ];

        Self { item_types, services }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_round_trips_through_text() {
        let kind = ServiceKind::Photography(PhotoPackage::FullDay);
        assert_eq!(kind.to_string(), "photography.full_day");
        assert_eq!("photography.full_day".parse::<ServiceKind>(), Ok(kind));
    }

    #[test]
    fn style_must_belong_to_its_category() {
        assert!("henna.bridal".parse::<ServiceKind>().is_err());
        assert!("makeup".parse::<ServiceKind>().is_err());
        assert!("nails.french".parse::<ServiceKind>().is_err());
    }

    #[test]
    fn json_uses_category_and_style() {
        let kind: ServiceKind =
            serde_json::from_value(serde_json::json!({ "category": "hair", "style": "updo" })).unwrap();
        assert_eq!(kind, ServiceKind::Hair(HairStyle::Updo));

        let invalid = serde_json::from_value::<ServiceKind>(
            serde_json::json!({ "category": "hair", "style": "guest" }),
        );
        assert!(invalid.is_err());
    }

    #[test]
    fn catalog_lists_every_category() {
        let catalog = OrderItemCatalog::build();
        let categories: Vec<_> = catalog.services.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(categories, ["makeup", "hair", "henna", "photography"]);
        assert_eq!(catalog.item_types.len(), OrderItemType::ALL.len());
        assert!(catalog.item_types.iter().any(|t| t.requires_dress));
    }
}
