use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Contract every stored entity type declares once.
///
/// The store persists entities as JSON documents; the associated consts tell
/// it which collection the documents live in, which fields free-text search
/// matches against, which fields must be non-empty on create/upsert, and
/// which fields hold references resolvable via `populate`.
pub trait Entity: Serialize + DeserializeOwned {
    /// Collection the entity's documents belong to.
    const COLLECTION: &'static str;

    /// Fields matched by free-text search.
    const SEARCHABLE: &'static [&'static str];

    /// Fields that must be present and non-empty on create and upsert.
    const REQUIRED: &'static [&'static str];

    /// `(field, collection)` pairs naming reference fields and the
    /// collection holding the referenced documents.
    const REFERENCES: &'static [(&'static str, &'static str)] = &[];
}

/// A persisted document: store-managed id and timestamps around the
/// entity's own fields. The id is assigned on creation and immutable;
/// `updated_at` is bumped on every mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Doc<T> {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub data: T,
}

/// A field referencing a document in another collection.
///
/// Serialized as the bare id string; after population it carries the
/// referenced document instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Reference<T> {
    Id(String),
    Resolved(Box<Doc<T>>),
}

impl<T> Reference<T> {
    pub fn id(&self) -> &str {
        match self {
            Reference::Id(id) => id,
            Reference::Resolved(doc) => &doc.id,
        }
    }
}
