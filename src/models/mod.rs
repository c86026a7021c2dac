//! Domain model module declarations.

pub mod callback;
pub mod operation;
