//! Collection configuration

use serde::{Deserialize, Serialize};

use crate::{OrdoError, OrdoResult};

/// Default identifier field name
pub const DEFAULT_IDENTIFIER: &str = "id";

/// How consumers observe the collection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transformer {
    /// Keyed mapping projection, identifier -> record
    #[default]
    Object,
    /// The ordered sequence itself
    Array,
}

/// Collection configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollectionConfig {
    /// Projection handed to observers
    pub transformer: Transformer,
    /// Name of the identifier field
    pub identifier: String,
    /// Generate identifiers for records that lack one instead of rejecting them
    #[serde(alias = "autoId")]
    pub auto_id: bool,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        CollectionConfig {
            transformer: Transformer::Object,
            identifier: DEFAULT_IDENTIFIER.to_string(),
            auto_id: false,
        }
    }
}

impl CollectionConfig {
    /// Parse a configuration from JSON, filling omitted options with defaults
    pub fn from_json(input: &str) -> OrdoResult<Self> {
        let config: CollectionConfig =
            serde_json::from_str(input).map_err(|e| OrdoError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> OrdoResult<()> {
        if self.identifier.is_empty() {
            return Err(OrdoError::InvalidConfig(
                "identifier field name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_transformer(mut self, transformer: Transformer) -> Self {
        self.transformer = transformer;
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    pub fn with_auto_id(mut self, auto_id: bool) -> Self {
        self.auto_id = auto_id;
        self
    }
}
