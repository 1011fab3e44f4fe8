//! Domain model types shared across the workspace.

pub mod oauth;
