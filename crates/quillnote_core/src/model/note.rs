//! Note record and its field registry.
//!
//! # Responsibility
//! - Define the canonical note shape persisted by the storage
//!   collaborator and served to response serialization.
//!
//! # Invariants
//! - `id` is the integer primary key; `modified` is epoch seconds.
//! - `content` carries whatever scalar the caller supplied, uncoerced.

use crate::entity::value::{AttrType, Value};
use crate::entity::{EntityResult, FieldDef, Record};
use serde::Serialize;

/// Canonical note record.
///
/// Fields stay private; all mutation flows through the entity accessor
/// protocol so dirty tracking and coercion cannot be bypassed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Note {
    id: Option<i64>,
    title: Option<String>,
    modified: Option<i64>,
    content: Value,
}

const NOTE_FIELDS: &[FieldDef<Note>] = &[
    FieldDef::new("id", AttrType::Integer, get_id, set_id),
    FieldDef::new("title", AttrType::Text, get_title, set_title),
    FieldDef::new("modified", AttrType::Integer, get_modified, set_modified),
    FieldDef::new("content", AttrType::Untyped, get_content, set_content),
];

impl Record for Note {
    fn fields() -> &'static [FieldDef<Self>] {
        NOTE_FIELDS
    }
}

impl Note {
    /// Primary key; unset until the persistence writer assigns one.
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Last modification time in epoch seconds.
    pub fn modified(&self) -> Option<i64> {
        self.modified
    }

    /// Raw note body as supplied by the caller.
    pub fn content(&self) -> &Value {
        &self.content
    }
}

fn get_id(note: &Note) -> Value {
    note.id.map_or(Value::Null, Value::Integer)
}

fn set_id(note: &mut Note, value: Value) -> EntityResult<()> {
    note.id = value.into_integer_field("id")?;
    Ok(())
}

fn get_title(note: &Note) -> Value {
    note.title.clone().map_or(Value::Null, Value::Text)
}

fn set_title(note: &mut Note, value: Value) -> EntityResult<()> {
    note.title = value.into_text_field("title")?;
    Ok(())
}

fn get_modified(note: &Note) -> Value {
    note.modified.map_or(Value::Null, Value::Integer)
}

fn set_modified(note: &mut Note, value: Value) -> EntityResult<()> {
    note.modified = value.into_integer_field("modified")?;
    Ok(())
}

fn get_content(note: &Note) -> Value {
    note.content.clone()
}

fn set_content(note: &mut Note, value: Value) -> EntityResult<()> {
    note.content = value;
    Ok(())
}
