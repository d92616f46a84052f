//! Identifier generation for new entities.

use std::{fmt, str::FromStr, sync::Arc};
use ulid::Ulid;
use uuid::Uuid;

/// Produces unique string identifiers.
pub trait IdGenerator: Send + Sync + fmt::Debug {
    fn next_id(&self) -> String;
}

/// Lexicographically sortable ULIDs (the default).
#[derive(Clone, Copy, Debug, Default)]
pub struct UlidGenerator;

impl IdGenerator for UlidGenerator {
    fn next_id(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }
}

/// Time-ordered UUID v7 identifiers.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidV7Generator;

impl IdGenerator for UuidV7Generator {
    fn next_id(&self) -> String {
        Uuid::now_v7().to_string()
    }
}

/// Identifier format selectable from the CLI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IdFormat {
    #[default]
    Ulid,
    Uuid,
}

impl IdFormat {
    #[must_use]
    pub fn generator(self) -> Arc<dyn IdGenerator> {
        match self {
            Self::Ulid => Arc::new(UlidGenerator),
            Self::Uuid => Arc::new(UuidV7Generator),
        }
    }
}

impl FromStr for IdFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "ulid" => Ok(Self::Ulid),
            "uuid" => Ok(Self::Uuid),
            _ => Err("invalid id format, expected 'ulid' or 'uuid'".to_string()),
        }
    }
}
