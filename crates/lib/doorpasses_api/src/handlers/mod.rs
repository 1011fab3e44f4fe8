//! Request handlers.

pub mod connections;
pub mod oauth;
pub mod well_known;
