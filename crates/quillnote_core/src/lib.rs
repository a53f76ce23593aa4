//! Core record mapping layer for Quillnote.
//! This crate is the single source of truth for hydration and dirty
//! tracking rules.

pub mod entity;
pub mod logging;
pub mod model;

pub use entity::naming::{column_to_property, property_to_column, slug_from};
pub use entity::value::{AttrType, Value};
pub use entity::{Entity, EntityError, EntityResult, FieldDef, Record};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::Note;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
