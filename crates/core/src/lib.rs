//! SafeStep domain primitives shared by every crate in the workspace.

pub mod alert;
pub mod contact;
pub mod error;
pub mod pagination;
pub mod roles;
pub mod status;
pub mod types;
