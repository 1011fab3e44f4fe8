//! # doorpasses_core
//!
//! Core domain logic for the DoorPasses MCP authorization server.

pub mod db;
pub mod identity;
pub mod migrate;
pub mod models;
pub mod oauth;
pub mod uuid;

#[cfg(test)]
pub(crate) mod testkit;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
