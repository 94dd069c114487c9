use chrono::{DateTime, Utc};
use noted_core::{Doc, Note, Paginated};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Body of `POST /notes`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
}

impl From<CreateNoteRequest> for Note {
    fn from(request: CreateNoteRequest) -> Self {
        Note {
            title: request.title,
            content: request.content,
        }
    }
}

/// Note as returned to clients, timestamps as ISO-8601 strings
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Doc<Note>> for NoteResponse {
    fn from(doc: Doc<Note>) -> Self {
        NoteResponse {
            id: doc.id,
            title: doc.data.title,
            content: doc.data.content,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

/// One page of notes plus paging metadata
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotePage {
    pub docs: Vec<NoteResponse>,
    pub total_docs: u64,
    pub limit: u64,
    pub offset: u64,
    pub page: u64,
    pub paging_counter: u64,
    pub total_pages: u64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<u64>,
}

impl From<Paginated<Doc<Note>>> for NotePage {
    fn from(page: Paginated<Doc<Note>>) -> Self {
        let page = page.map(NoteResponse::from);
        NotePage {
            docs: page.docs,
            total_docs: page.total_docs,
            limit: page.limit,
            offset: page.offset,
            page: page.page,
            paging_counter: page.paging_counter,
            total_pages: page.total_pages,
            has_prev_page: page.has_prev_page,
            has_next_page: page.has_next_page,
            prev_page: page.prev_page,
            next_page: page.next_page,
        }
    }
}
