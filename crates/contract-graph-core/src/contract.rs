//! Contract records: the `{slug, version, schema}` inputs supplied by the
//! contract store, and the root envelope they are compiled from.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::CompileError;
use crate::naming::{self, SEMVER};

/// Name of the interface every concrete card type implements.
pub const CARD_INTERFACE: &str = "Card";

/// Slug of the base contract the `Card` interface is derived from.
pub const BASE_CARD_SLUG: &str = "card";

/// A versioned, JSON-Schema-described record type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractDefinition {
    pub slug: String,
    pub version: String,
    pub schema: Value,
}

impl ContractDefinition {
    pub fn new(slug: impl Into<String>, version: impl Into<String>, schema: Value) -> Self {
        Self {
            slug: slug.into(),
            version: version.into(),
            schema,
        }
    }

    /// `Pascal(slug)V<version with dots as underscores>`.
    pub fn type_name(&self) -> String {
        naming::card_type_name(&self.slug, &self.version)
    }

    /// `<slug>@<version>`, the form found in a card value's `type` field.
    pub fn type_reference(&self) -> String {
        format!("{}@{}", self.slug, self.version)
    }

    pub fn is_base_card(&self) -> bool {
        self.slug == BASE_CARD_SLUG
    }

    /// Reject records that cannot produce a valid type name.
    pub fn validate(&self) -> Result<(), CompileError> {
        if naming::pascal_case(&self.slug).is_empty() {
            return Err(CompileError::InvalidContract {
                slug: self.slug.clone(),
                message: "slug has no alphanumeric characters".to_string(),
            });
        }
        if naming::pascal_case(&self.slug).starts_with(|c: char| c.is_ascii_digit()) {
            return Err(CompileError::InvalidContract {
                slug: self.slug.clone(),
                message: "slug must not start with a digit".to_string(),
            });
        }
        if !SEMVER.is_match(&self.version) {
            return Err(CompileError::InvalidContract {
                slug: self.slug.clone(),
                message: format!("version `{}` is not a 3-part semver", self.version),
            });
        }
        Ok(())
    }

    /// The contract-definition card the root handlers match on.
    pub fn to_fragment(&self) -> Value {
        json!({
            "slug": self.slug,
            "version": self.version,
            "type": "type@1.0.0",
            "active": true,
            "data": { "schema": self.schema }
        })
    }

    /// The canonical `card@1.0.0` contract.
    pub fn base_card() -> Self {
        Self::new(
            BASE_CARD_SLUG,
            "1.0.0",
            json!({
                "type": "object",
                "properties": {
                    "id": { "type": "string", "format": "uuid" },
                    "slug": { "type": "string" },
                    "type": { "type": "string" },
                    "version": { "type": "string" },
                    "name": { "type": ["string", "null"] },
                    "active": { "type": "boolean" },
                    "tags": { "type": "array", "items": { "type": "string" } },
                    "markers": { "type": "array", "items": { "type": "string" } },
                    "created_at": { "type": "string", "format": "date-time" },
                    "updated_at": { "type": ["string", "null"], "format": "date-time" },
                    "links": { "type": "object" },
                    "requires": { "type": "array", "items": { "type": "object" } },
                    "capabilities": { "type": "array", "items": { "type": "object" } },
                    "data": { "type": "object" }
                },
                "required": [
                    "id", "slug", "type", "version", "active", "tags", "markers",
                    "created_at", "links", "requires", "capabilities", "data"
                ]
            }),
        )
    }
}

/// Parse a JSON array of contract records.
pub fn parse_contracts(input: &str) -> Result<Vec<ContractDefinition>, CompileError> {
    Ok(serde_json::from_str(input)?)
}
