//! Domain model for students, tutorials and assignments.
//!
//! # Responsibility
//! - Define leaf records and their validated field types.
//! - Keep identity rules next to the records they identify.
//!
//! # Invariants
//! - Every entity exposes an `is_same_*` identity check distinct from `==`.
//! - Field values are validated at construction and on deserialization.

pub mod assignment;
pub mod fields;
pub mod prefs;
pub mod sample;
pub mod student;
pub mod tutorial;
