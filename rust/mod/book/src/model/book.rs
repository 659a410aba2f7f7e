use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Publication state of a book. Serialized as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum BookStatus {
    #[default]
    Draft = 0,
    Active = 1,
}

impl From<BookStatus> for u8 {
    fn from(s: BookStatus) -> u8 {
        s as u8
    }
}

impl TryFrom<u8> for BookStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(BookStatus::Draft),
            1 => Ok(BookStatus::Active),
            other => Err(format!("unknown book status {}", other)),
        }
    }
}

/// Free-form attributes attached to a book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookAttrs {
    #[serde(default)]
    pub picture: String,

    #[serde(default)]
    pub description: String,

    /// 1..=10, or 0 when unrated.
    #[serde(default)]
    pub rating: u8,
}

/// The managed resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// System-assigned identifier, immutable once created.
    pub id: Uuid,

    pub title: String,

    pub author: String,

    pub status: BookStatus,

    #[serde(default)]
    pub attrs: BookAttrs,

    /// Set once, at creation.
    pub created_at: DateTime<Utc>,

    /// `None` until the first successful update.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Book {
    /// Build a freshly created book from caller input.
    ///
    /// The caller controls only `title` and `author`; everything else is
    /// assigned here.
    pub fn new(input: CreateBook, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            author: input.author,
            status: BookStatus::Active,
            attrs: BookAttrs::default(),
            created_at: now,
            updated_at: None,
        }
    }

    /// Apply an update payload on top of the stored record.
    ///
    /// `id`, `created_at` and `status` are kept from `self`.
    pub fn apply(&self, input: UpdateBook, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id,
            title: input.title,
            author: input.author,
            status: self.status,
            attrs: input.attrs,
            created_at: self.created_at,
            updated_at: Some(now),
        }
    }
}

/// Request body for creating a book.
///
/// Any other field the caller sends (`id`, `status`, timestamps) is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBook {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub attrs: BookAttrs,
}

/// Request body for updating a book.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBook {
    pub id: Uuid,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub attrs: BookAttrs,
}

/// Request body for deleting a book.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteBook {
    pub id: Uuid,
}
