//! Concrete record types mapped by the entity layer.
//!
//! # Responsibility
//! - Define the shipping `Record` implementations and their field
//!   registries.
//!
//! # Invariants
//! - Every registry declares the integer `id` primary key attribute.

pub mod note;
