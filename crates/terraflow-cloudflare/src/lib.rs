//! Cloudflare resource catalog for TerraFlow
//!
//! Declares DNS zones and records as schema-validated document entries.
//! Like every TerraFlow catalog this crate performs no API calls and
//! needs no credentials; it only shapes the configuration document.
//!
//! # Example
//!
//! ```ignore
//! use terraflow_core::synth::Document;
//! use terraflow_cloudflare as cloudflare;
//!
//! let mut document = Document::new();
//!
//! let main = cloudflare::zone(&mut document, "main", json!({
//!     "account_id": "abc123",
//!     "zone": "example.com",
//! }))?;
//!
//! cloudflare::record(&mut document, "www", json!({
//!     "zone_id": main.output("id").unwrap(),
//!     "name": "www",
//!     "type": "A",
//!     "value": "203.0.113.1",
//!     "proxied": true,
//! }))?;
//! ```

pub mod record;
pub mod zone;

pub use record::record;
pub use zone::zone;

use terraflow_registry::Registry;

/// Provider namespace in the registry
pub const NAMESPACE: &str = "cloudflare";

/// Definition functions this catalog provides
pub const DEFINITIONS: &[&str] = &["zone", "record"];

/// Static output table: resource type → output names
pub fn outputs_for(resource_type: &str) -> Option<&'static [&'static str]> {
    match resource_type {
        zone::TYPE => Some(zone::OUTPUTS),
        record::TYPE => Some(record::OUTPUTS),
        _ => None,
    }
}

/// Register every definition of this catalog
pub fn register(registry: &mut Registry) {
    registry.register(NAMESPACE, DEFINITIONS.iter().copied());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = Registry::new();
        register(&mut registry);
        register(&mut registry);

        assert_eq!(registry.lookup(NAMESPACE).len(), DEFINITIONS.len());
        assert!(registry.contains(NAMESPACE, "record"));
    }

    #[test]
    fn test_outputs_table() {
        assert_eq!(outputs_for("cloudflare_zone"), Some(zone::OUTPUTS));
        assert_eq!(outputs_for("cloudflare_record"), Some(record::OUTPUTS));
        assert_eq!(outputs_for("cloudflare_worker"), None);
    }
}
