//! Row models mapping directly onto table columns.

pub mod alert;
pub mod contact;
