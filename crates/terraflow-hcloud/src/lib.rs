//! Hetzner Cloud resource catalog for TerraFlow
//!
//! Each module declares one resource type: a static schema, the static
//! output table, and a definition function that validates raw attributes
//! and synthesizes the resource into a shared document. The catalog never
//! talks to the Hetzner API; it only shapes the document a downstream
//! apply tool consumes.
//!
//! # Resources
//!
//! - Block storage volumes (`hcloud_volume`)
//! - Cloud servers (`hcloud_server`)
//! - Uploaded SSH public keys (`hcloud_ssh_key`)
//! - Private networks and subnets (`hcloud_network`, `hcloud_network_subnet`)
//! - Firewalls with repeated rule blocks (`hcloud_firewall`)
//!
//! # Example
//!
//! ```ignore
//! use terraflow_core::synth::Document;
//! use terraflow_hcloud as hcloud;
//!
//! let mut document = Document::new();
//!
//! let key = hcloud::ssh_key(&mut document, "ops", json!({
//!     "name": "ops",
//!     "public_key": "ssh-ed25519 AAAAC3Nza ops@example",
//! }))?;
//!
//! hcloud::server(&mut document, "web", json!({
//!     "name": "web",
//!     "server_type": "cx22",
//!     "image": "ubuntu-24.04",
//!     "ssh_keys": [key.output("id").unwrap()],
//! }))?;
//!
//! document.write_json_file("infra.tf.json")?;
//! ```

pub mod firewall;
pub mod network;
pub mod server;
pub mod ssh_key;
pub mod volume;

pub use firewall::firewall;
pub use network::{network, network_subnet};
pub use server::server;
pub use ssh_key::ssh_key;
pub use volume::volume;

use terraflow_registry::Registry;

/// Provider namespace in the registry
pub const NAMESPACE: &str = "hetzner";

/// Definition functions this catalog provides
pub const DEFINITIONS: &[&str] = &[
    "volume",
    "server",
    "ssh_key",
    "network",
    "network_subnet",
    "firewall",
];

/// Static output table: resource type → output names
///
/// The set depends only on the type, never on which optional attributes
/// a declaration supplied.
pub fn outputs_for(resource_type: &str) -> Option<&'static [&'static str]> {
    match resource_type {
        volume::TYPE => Some(volume::OUTPUTS),
        server::TYPE => Some(server::OUTPUTS),
        ssh_key::TYPE => Some(ssh_key::OUTPUTS),
        network::TYPE => Some(network::OUTPUTS),
        network::SUBNET_TYPE => Some(network::SUBNET_OUTPUTS),
        firewall::TYPE => Some(firewall::OUTPUTS),
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

        let definitions = registry.lookup(NAMESPACE);
        assert_eq!(definitions.len(), DEFINITIONS.len());
        assert!(definitions.contains("volume"));
        assert!(definitions.contains("network_subnet"));
    }

    #[test]
    fn test_outputs_table() {
        assert_eq!(outputs_for("hcloud_volume"), Some(volume::OUTPUTS));
        assert_eq!(outputs_for("hcloud_server"), Some(server::OUTPUTS));
        assert_eq!(outputs_for("aws_instance"), None);
    }
}
