//! Core use-case services.
//!
//! # Responsibility
//! - `ModelManager`: the in-memory facade the command layer mutates.
//! - `LogicManager`: parse → execute → persist orchestration.
//!
//! # See also
//! - `command` for the command set executed here.

pub mod logic;
pub mod model_manager;
