pub mod admin;
pub mod alerts;
