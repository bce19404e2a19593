//! `User` Avro schemas.
//!
//! Two variants of the same record are shipped: a namespaced "specific"
//! schema and a bare "generic" one. The variant is picked from a string
//! flag where only the literal `"true"` selects the specific schema.

use std::fmt;
use std::path::{Path, PathBuf};

use apache_avro::Schema;
use schema_registry_converter::schema_registry_common::{
    SchemaType, SubjectNameStrategy, SuppliedSchema,
};

use crate::error::{ClientError, Result};

/// Which of the two bundled `User` schemas to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVariant {
    Specific,
    Generic,
}

impl SchemaVariant {
    pub fn from_flag(flag: &str) -> Self {
        if flag == "true" {
            SchemaVariant::Specific
        } else {
            SchemaVariant::Generic
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            SchemaVariant::Specific => "user_specific.avsc",
            SchemaVariant::Generic => "user_generic.avsc",
        }
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaVariant::Specific => f.write_str("specific"),
            SchemaVariant::Generic => f.write_str("generic"),
        }
    }
}

/// A loaded and parsed `User` schema.
#[derive(Debug, Clone)]
pub struct UserSchema {
    variant: SchemaVariant,
    path: PathBuf,
    text: String,
    parsed: Schema,
}

impl UserSchema {
    /// Read `<dir>/<variant file>` and parse it.
    pub fn load(dir: &Path, variant: SchemaVariant) -> Result<Self> {
        let path = dir.join(variant.file_name());
        let text = std::fs::read_to_string(&path).map_err(|e| {
            ClientError::Schema(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_text(path, variant, text)
    }

    /// Parse schema text that did not come from `load`. `origin` only labels
    /// the schema in errors and logs.
    pub fn from_text(
        origin: impl Into<PathBuf>,
        variant: SchemaVariant,
        text: impl Into<String>,
    ) -> Result<Self> {
        let path = origin.into();
        let text = text.into();
        let parsed = Schema::parse_str(&text).map_err(|e| {
            ClientError::Schema(format!("failed to parse {}: {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), %variant, "loaded user schema");
        Ok(Self {
            variant,
            path,
            text,
            parsed,
        })
    }

    pub fn variant(&self) -> SchemaVariant {
        self.variant
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parsed(&self) -> &Schema {
        &self.parsed
    }

    /// Fully qualified record name, e.g.
    /// `confluent.io.examples.serialization.avro.User`.
    pub fn full_name(&self) -> Option<String> {
        match &self.parsed {
            Schema::Record(record) => Some(record.name.fullname(None)),
            _ => None,
        }
    }

    pub fn supplied(&self) -> SuppliedSchema {
        SuppliedSchema {
            name: self.full_name(),
            schema_type: SchemaType::Avro,
            schema: self.text.clone(),
            references: vec![],
        }
    }

    /// Subject strategy for record values on `topic` (`<topic>-value`). The
    /// schema travels with the strategy so it gets registered on first use.
    pub fn value_strategy(&self, topic: &str) -> SubjectNameStrategy {
        SubjectNameStrategy::TopicNameStrategyWithSchema(
            topic.to_string(),
            false,
            self.supplied().into(),
        )
    }
}

/// Registry subject for record values on `topic`.
pub fn value_subject(topic: &str) -> String {
    format!("{}-value", topic)
}
