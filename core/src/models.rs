use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// A note's user-supplied fields. The id and timestamps are store-managed
/// and live on the surrounding [`crate::entity::Doc`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    pub title: String,
    pub content: String,
}

impl Entity for Note {
    const COLLECTION: &'static str = "notes";
    const SEARCHABLE: &'static [&'static str] = &["title", "content"];
    const REQUIRED: &'static [&'static str] = &["title", "content"];
}
