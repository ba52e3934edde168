//! Entities and page extraction
//!
//! Page bodies differ per listing only in the name of their list field, so the
//! caller hands the controller a [`PageExtractor`] that knows where the items
//! live. Each item becomes an [`Entity`] whose asset reference is resolved
//! once, at construction, and never recomputed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

use super::error::TransportError;
use crate::query::EntityKind;
use crate::resolver::NameResolver;

/// Field holding the backend-supplied asset reference, unless overridden
pub const DEFAULT_LOGO_FIELD: &str = "logo_url";

/// Backend identifier of an entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Accepts string or integer ids
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(id) if !id.is_empty() => Some(Self(id.clone())),
            Value::Number(id) => Some(Self(id.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A listed company, bank or venue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    id: EntityId,
    name: String,
    asset_ref: String,
    raw_attributes: Map<String, Value>,
}

impl Entity {
    /// Build an entity from one item of a page body
    ///
    /// # Errors
    /// Returns `TransportError::Malformed` if the item is not an object or
    /// lacks an `id` or a string `name`.
    pub fn from_raw(
        item: &Value,
        logo_field: &str,
        resolver: &NameResolver,
    ) -> Result<Self, TransportError> {
        let Value::Object(attributes) = item else {
            return Err(TransportError::Malformed(
                "list item is not an object".to_string(),
            ));
        };

        let id = attributes
            .get("id")
            .and_then(EntityId::from_value)
            .ok_or_else(|| TransportError::Malformed("list item has no usable `id`".to_string()))?;

        let name = attributes
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| TransportError::Malformed(format!("entity {id} has no `name`")))?
            .to_string();

        let direct = attributes.get(logo_field).and_then(Value::as_str);
        let asset_ref = resolver.resolve(&name, direct);

        Ok(Self {
            id,
            name,
            asset_ref,
            raw_attributes: attributes.clone(),
        })
    }

    #[must_use]
    pub const fn id(&self) -> &EntityId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Asset reference resolved when the entity was created
    #[must_use]
    pub fn asset_ref(&self) -> &str {
        &self.asset_ref
    }

    /// Every field of the original item, including `id` and `name`
    #[must_use]
    pub const fn raw_attributes(&self) -> &Map<String, Value> {
        &self.raw_attributes
    }

    /// String form of a raw attribute, for display
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<String> {
        match self.raw_attributes.get(key)? {
            Value::Null => None,
            Value::String(value) => Some(value.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// A decoded page
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPage {
    pub entities: Vec<Entity>,
    pub total: u64,
    pub has_next: bool,
}

type ItemsFn = dyn Fn(&Value) -> Option<&Vec<Value>> + Send + Sync;

fn items_fn<F>(extract: F) -> Arc<ItemsFn>
where
    F: for<'a> Fn(&'a Value) -> Option<&'a Vec<Value>> + Send + Sync + 'static,
{
    Arc::new(extract)
}

/// Locates the item list in a page body and turns it into entities
#[derive(Clone)]
pub struct PageExtractor {
    items: Arc<ItemsFn>,
    logo_field: String,
}

impl PageExtractor {
    /// Items live in the top-level array `items_field`
    #[must_use]
    pub fn field(items_field: impl Into<String>) -> Self {
        let items_field = items_field.into();
        Self {
            items: items_fn(move |body| body.get(&items_field).and_then(Value::as_array)),
            logo_field: DEFAULT_LOGO_FIELD.to_string(),
        }
    }

    /// Extractor for one of the built-in listings
    #[must_use]
    pub fn for_kind(kind: EntityKind) -> Self {
        Self::field(kind.items_field())
    }

    /// Items are found by an arbitrary function of the body
    #[must_use]
    pub fn custom<F>(extract: F) -> Self
    where
        F: for<'a> Fn(&'a Value) -> Option<&'a Vec<Value>> + Send + Sync + 'static,
    {
        Self {
            items: items_fn(extract),
            logo_field: DEFAULT_LOGO_FIELD.to_string(),
        }
    }

    /// Read the direct asset reference from `field` instead of `logo_url`
    #[must_use]
    pub fn with_logo_field(mut self, field: impl Into<String>) -> Self {
        self.logo_field = field.into();
        self
    }

    #[must_use]
    pub fn logo_field(&self) -> &str {
        &self.logo_field
    }

    /// Decode a page body
    ///
    /// # Errors
    /// Returns `TransportError::Malformed` if the list, `total` or `has_next`
    /// is missing or any item is unusable.
    pub fn extract(&self, body: &Value, resolver: &NameResolver) -> Result<ParsedPage, TransportError> {
        let items = (self.items)(body)
            .ok_or_else(|| TransportError::Malformed("missing item list".to_string()))?;

        let total = body
            .get("total")
            .and_then(Value::as_u64)
            .ok_or_else(|| TransportError::Malformed("missing or invalid `total`".to_string()))?;

        let has_next = body
            .get("has_next")
            .and_then(Value::as_bool)
            .ok_or_else(|| TransportError::Malformed("missing or invalid `has_next`".to_string()))?;

        let entities = items
            .iter()
            .map(|item| Entity::from_raw(item, &self.logo_field, resolver))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ParsedPage {
            entities,
            total,
            has_next,
        })
    }
}

impl fmt::Debug for PageExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageExtractor")
            .field("logo_field", &self.logo_field)
            .finish_non_exhaustive()
    }
}
