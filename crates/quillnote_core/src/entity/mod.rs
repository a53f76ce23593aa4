//! Generic record mapping layer.
//!
//! # Responsibility
//! - Hydrate concrete record types from storage rows and request
//!   parameter maps.
//! - Provide one string-keyed get/set protocol for all attributes.
//! - Track which attributes were written since hydration, for
//!   minimal-diff persistence writes.
//!
//! # Invariants
//! - An attribute is settable/gettable only when its name appears in
//!   the concrete type's field registry; unknown names fail, never
//!   create fields.
//! - Row hydration resets the dirty set; parameter hydration leaves
//!   every supplied key dirty.
//! - A failed hydration never yields an instance.

use log::debug;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod naming;
pub mod value;

use naming::{column_to_property, property_to_column, slug_from};
use value::{coerce, AttrType, Value};

pub type EntityResult<T> = Result<T, EntityError>;

/// Fatal mapping errors. The entity layer never recovers internally;
/// translation to a user-facing response is the caller's concern.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityError {
    /// Name has no entry in the concrete type's field registry.
    UnknownAttribute { name: String },
    /// Non-null raw value cannot represent the declared type.
    TypeCoercion {
        name: String,
        declared: AttrType,
        value: Value,
    },
}

impl Display for EntityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownAttribute { name } => {
                write!(f, "`{name}` is not a valid attribute")
            }
            Self::TypeCoercion {
                name,
                declared,
                value,
            } => write!(
                f,
                "cannot coerce value `{value}` of attribute `{name}` to declared type {declared}"
            ),
        }
    }
}

impl Error for EntityError {}

/// Registry entry for one mappable attribute of a concrete record type.
///
/// Registries are built once per type at definition time (a `const`
/// slice), so declared types are immutable after construction and
/// attribute lookup needs no per-call introspection.
pub struct FieldDef<R> {
    name: &'static str,
    declared: AttrType,
    get: fn(&R) -> Value,
    set: fn(&mut R, Value) -> EntityResult<()>,
}

impl<R> FieldDef<R> {
    /// Declares one attribute: its name, declared type, and the
    /// getter/setter pair storing into the concrete field.
    pub const fn new(
        name: &'static str,
        declared: AttrType,
        get: fn(&R) -> Value,
        set: fn(&mut R, Value) -> EntityResult<()>,
    ) -> Self {
        Self {
            name,
            declared,
            get,
            set,
        }
    }

    /// Attribute name, camelCase by convention.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Declared type tag used for set-time coercion.
    pub const fn declared(&self) -> AttrType {
        self.declared
    }
}

/// Contract for concrete record types mapped by [`Entity`].
///
/// # Invariants
/// - The registry must contain an `id` entry declared
///   `AttrType::Integer`; every record carries the integer primary key.
/// - `Default` yields the bare all-unset record; it exists for the
///   hydration entry points and is not a public construction path.
pub trait Record: Default {
    /// Field registry for this type, built once at definition time.
    fn fields() -> &'static [FieldDef<Self>]
    where
        Self: Sized;
}

/// A concrete record plus its mapping state: the uniform accessor
/// protocol and the set of attributes written since the last reset.
#[derive(Debug, Clone)]
pub struct Entity<R: Record> {
    record: R,
    updated: BTreeSet<&'static str>,
}

impl<R: Record + 'static> Entity<R> {
    fn bare() -> Self {
        Self {
            record: R::default(),
            updated: BTreeSet::new(),
        }
    }

    fn field(name: &str) -> EntityResult<&'static FieldDef<R>> {
        R::fields()
            .iter()
            .find(|def| def.name == name)
            .ok_or_else(|| EntityError::UnknownAttribute {
                name: name.to_string(),
            })
    }

    /// Hydrates a record from one storage row.
    ///
    /// Column names are translated to attribute names, values are set
    /// through the accessor protocol in presentation order (later
    /// duplicates overwrite), and the dirty set is reset afterwards:
    /// the instance represents as-stored state.
    ///
    /// # Errors
    /// - `EntityError::UnknownAttribute` on a column with no registered
    ///   attribute; an unknown column is a schema mismatch and must
    ///   surface immediately.
    /// - `EntityError::TypeCoercion` on an inconvertible value.
    pub fn from_row<I, K>(row: I) -> EntityResult<Self>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut entity = Self::bare();

        for (column, raw) in row {
            let property = column_to_property(column.as_ref());
            entity.set(&property, raw).map_err(|err| {
                debug!(
                    "event=hydrate_row module=entity status=error column={} error={}",
                    column.as_ref(),
                    err
                );
                err
            })?;
        }

        entity.reset_updated_fields();
        Ok(entity)
    }

    /// Hydrates a record from request-supplied parameters.
    ///
    /// Keys are attribute names already; no column translation happens
    /// and the dirty set is kept, so every supplied parameter is
    /// recorded as a pending write for a new record.
    ///
    /// # Errors
    /// - Same unknown-attribute and coercion failures as
    ///   [`Entity::from_row`].
    pub fn from_params<I, K>(params: I) -> EntityResult<Self>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut entity = Self::bare();

        for (name, raw) in params {
            entity.set(name.as_ref(), raw).map_err(|err| {
                debug!(
                    "event=hydrate_params module=entity status=error attribute={} error={}",
                    name.as_ref(),
                    err
                );
                err
            })?;
        }

        Ok(entity)
    }

    /// Returns the current value of the named attribute.
    ///
    /// # Errors
    /// - `EntityError::UnknownAttribute` when no such attribute is
    ///   registered.
    pub fn get(&self, name: &str) -> EntityResult<Value> {
        let def = Self::field(name)?;
        Ok((def.get)(&self.record))
    }

    /// Stores a value into the named attribute.
    ///
    /// Non-null values are coerced to the attribute's declared type
    /// first; untyped attributes pass raw values through unchanged. The
    /// attribute is marked dirty on every successful set, equal value
    /// or not: the layer tracks "was written", not "changed".
    ///
    /// # Errors
    /// - `EntityError::UnknownAttribute` when no such attribute is
    ///   registered.
    /// - `EntityError::TypeCoercion` when a non-null value cannot
    ///   represent the declared type.
    pub fn set(&mut self, name: &str, value: Value) -> EntityResult<()> {
        let def = Self::field(name)?;
        let coerced = coerce(def.name, def.declared, value)?;
        (def.set)(&mut self.record, coerced)?;
        self.updated.insert(def.name);
        Ok(())
    }

    /// Attribute names written since the last reset, sorted.
    pub fn updated_fields(&self) -> Vec<&'static str> {
        self.updated.iter().copied().collect()
    }

    /// Returns whether the named attribute was written since the last
    /// reset. Unknown names are simply not dirty.
    pub fn is_updated(&self, name: &str) -> bool {
        self.updated.contains(name)
    }

    /// Marks the record as clean. Public because persistence writers
    /// reset after assigning the id on insertion.
    pub fn reset_updated_fields(&mut self) {
        self.updated.clear();
    }

    /// Every attribute as a `(column_name, value)` pair, registry
    /// order. The mapping-out half of the row contract.
    pub fn to_row(&self) -> Vec<(String, Value)> {
        R::fields()
            .iter()
            .map(|def| (property_to_column(def.name), (def.get)(&self.record)))
            .collect()
    }

    /// Dirty attributes only, column-named: the minimal-diff write set
    /// consumed by persistence writers.
    pub fn updated_row(&self) -> Vec<(String, Value)> {
        R::fields()
            .iter()
            .filter(|def| self.updated.contains(def.name))
            .map(|def| (property_to_column(def.name), (def.get)(&self.record)))
            .collect()
    }

    /// Derives a slug from the named attribute's current value.
    ///
    /// The value is read through the accessor protocol and rendered to
    /// text; a `Null` attribute yields the empty slug. Slugs are not
    /// unique by contract.
    ///
    /// # Errors
    /// - `EntityError::UnknownAttribute` when no such attribute is
    ///   registered.
    pub fn slugify(&self, name: &str) -> EntityResult<String> {
        let value = self.get(name)?;
        Ok(slug_from(&value.render_text()))
    }

    /// Read access to the typed record.
    pub fn record(&self) -> &R {
        &self.record
    }

    /// Consumes the wrapper, returning the typed record.
    pub fn into_record(self) -> R {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::value::{AttrType, Value};
    use super::{Entity, EntityError, EntityResult, FieldDef, Record};

    /// Minimal record with one typed and one untyped attribute.
    #[derive(Debug, Default)]
    struct Bookmark {
        id: Option<i64>,
        label: Value,
    }

    fn get_id(record: &Bookmark) -> Value {
        record.id.map_or(Value::Null, Value::Integer)
    }

    fn set_id(record: &mut Bookmark, value: Value) -> EntityResult<()> {
        record.id = value.into_integer_field("id")?;
        Ok(())
    }

    fn get_label(record: &Bookmark) -> Value {
        record.label.clone()
    }

    fn set_label(record: &mut Bookmark, value: Value) -> EntityResult<()> {
        record.label = value;
        Ok(())
    }

    const BOOKMARK_FIELDS: &[FieldDef<Bookmark>] = &[
        FieldDef::new("id", AttrType::Integer, get_id, set_id),
        FieldDef::new("label", AttrType::Untyped, get_label, set_label),
    ];

    impl Record for Bookmark {
        fn fields() -> &'static [FieldDef<Self>] {
            BOOKMARK_FIELDS
        }
    }

    #[test]
    fn set_coerces_and_marks_dirty() {
        let mut entity = Entity::<Bookmark>::from_params(Vec::<(String, Value)>::new())
            .expect("empty params must hydrate");

        entity
            .set("id", Value::Text("7".to_string()))
            .expect("numeric text should coerce");

        assert_eq!(entity.get("id").unwrap(), Value::Integer(7));
        assert_eq!(entity.updated_fields(), vec!["id"]);
    }

    #[test]
    fn set_marks_dirty_even_when_value_is_unchanged() {
        let mut entity =
            Entity::<Bookmark>::from_row(vec![("id".to_string(), Value::Integer(1))])
                .expect("row must hydrate");
        assert!(entity.updated_fields().is_empty());

        entity
            .set("id", Value::Integer(1))
            .expect("set should succeed");
        assert!(entity.is_updated("id"));
    }

    #[test]
    fn untyped_attribute_stores_raw_value_unchanged() {
        let mut entity = Entity::<Bookmark>::from_params(Vec::<(String, Value)>::new())
            .expect("empty params must hydrate");

        entity
            .set("label", Value::Integer(42))
            .expect("untyped set never coerces");

        assert_eq!(entity.get("label").unwrap(), Value::Integer(42));
        assert!(entity.is_updated("label"));
    }

    #[test]
    fn unknown_attribute_fails_get_set_and_slugify() {
        let mut entity = Entity::<Bookmark>::from_params(Vec::<(String, Value)>::new())
            .expect("empty params must hydrate");

        for err in [
            entity.get("missing").unwrap_err(),
            entity.set("missing", Value::Null).unwrap_err(),
            entity.slugify("missing").unwrap_err(),
        ] {
            assert_eq!(
                err,
                EntityError::UnknownAttribute {
                    name: "missing".to_string()
                }
            );
        }
    }

    #[test]
    fn null_set_on_typed_attribute_clears_without_coercion() {
        let mut entity =
            Entity::<Bookmark>::from_row(vec![("id".to_string(), Value::Integer(3))])
                .expect("row must hydrate");

        entity.set("id", Value::Null).expect("null passes through");
        assert_eq!(entity.get("id").unwrap(), Value::Null);
    }

    #[test]
    fn updated_row_contains_only_dirty_columns() {
        let mut entity =
            Entity::<Bookmark>::from_row(vec![("id".to_string(), Value::Integer(3))])
                .expect("row must hydrate");

        entity
            .set("label", Value::Text("pinned".to_string()))
            .expect("set should succeed");

        let updated = entity.updated_row();
        assert_eq!(
            updated,
            vec![("label".to_string(), Value::Text("pinned".to_string()))]
        );

        let full = entity.to_row();
        assert_eq!(full.len(), 2);
        assert_eq!(full[0], ("id".to_string(), Value::Integer(3)));
    }
}
