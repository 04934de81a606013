//! Private networks and subnets (`hcloud_network`, `hcloud_network_subnet`)
//!
//! A subnet normally takes its `network_id` from a network declaration's
//! `id` output, so the two resources wire together through references.

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde_json::Value;
use terraflow_core::{declare, Document, FieldKind, FieldSpec, Reference, Result, Schema};

/// Resource type emitted into the document
pub const TYPE: &str = "hcloud_network";
pub const SUBNET_TYPE: &str = "hcloud_network_subnet";

/// Outputs of a network declaration
pub const OUTPUTS: &[&str] = &["id"];
pub const SUBNET_OUTPUTS: &[&str] = &["id"];

/// Networks are IPv4 only
const IPV4_CIDR: &str = r"^\d{1,3}(\.\d{1,3}){3}/\d{1,2}$";

static SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    Arc::new(
        Schema::builder()
            .field(FieldSpec::required("name", FieldKind::Str))
            .field(FieldSpec::required(
                "ip_range",
                FieldKind::pattern(IPV4_CIDR).expect("CIDR pattern compiles"),
            ))
            .field(FieldSpec::optional("labels", FieldKind::map(FieldKind::Str)))
            .build()
            .expect("network schema is well-formed"),
    )
});

static SUBNET_SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    Arc::new(
        Schema::builder()
            .field(FieldSpec::required("network_id", FieldKind::Str))
            .field(FieldSpec::required(
                "type",
                FieldKind::enum_of(["cloud", "server", "vswitch"]),
            ))
            .field(FieldSpec::required(
                "network_zone",
                FieldKind::enum_of(["eu-central", "us-east", "us-west"]),
            ))
            .field(FieldSpec::required(
                "ip_range",
                FieldKind::pattern(IPV4_CIDR).expect("CIDR pattern compiles"),
            ))
            .build()
            .expect("network_subnet schema is well-formed"),
    )
});

/// Schema for `hcloud_network`
pub fn schema() -> &'static Arc<Schema> {
    &SCHEMA
}

/// Schema for `hcloud_network_subnet`
pub fn subnet_schema() -> &'static Arc<Schema> {
    &SUBNET_SCHEMA
}

/// Declare a private network
pub fn network(document: &mut Document, name: &str, attrs: Value) -> Result<Reference> {
    declare(document, TYPE, name, &SCHEMA, &attrs, OUTPUTS)
}

/// Declare a subnet within a network
pub fn network_subnet(document: &mut Document, name: &str, attrs: Value) -> Result<Reference> {
    declare(document, SUBNET_TYPE, name, &SUBNET_SCHEMA, &attrs, SUBNET_OUTPUTS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use terraflow_core::{TerraError, ValidationError};

    #[test]
    fn test_network_with_subnet() {
        let mut document = Document::new();
        let net = network(
            &mut document,
            "internal",
            json!({"name": "internal", "ip_range": "10.0.0.0/16"}),
        )
        .unwrap();

        network_subnet(
            &mut document,
            "internal_eu",
            json!({
                "network_id": net.output("id").unwrap(),
                "type": "cloud",
                "network_zone": "eu-central",
                "ip_range": "10.0.1.0/24",
            }),
        )
        .unwrap();

        let subnet = document.get(SUBNET_TYPE, "internal_eu").unwrap();
        assert_eq!(
            subnet.child("network_id").unwrap().value(),
            Some(&json!("${hcloud_network.internal.id}"))
        );
    }

    #[test]
    fn test_malformed_cidr_rejected() {
        let mut document = Document::new();
        let error = network(
            &mut document,
            "internal",
            json!({"name": "internal", "ip_range": "10.0.0.0"}),
        )
        .unwrap_err();

        let TerraError::Validation(errors) = error else {
            panic!("expected validation error");
        };
        match errors.iter().next().unwrap() {
            ValidationError::ConstraintViolation { path, message } => {
                assert_eq!(path.to_string(), "ip_range");
                assert!(message.contains("10.0.0.0"), "message: {message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_subnet_zone_membership() {
        let mut document = Document::new();
        let error = network_subnet(
            &mut document,
            "bad",
            json!({
                "network_id": "42",
                "type": "cloud",
                "network_zone": "mars-central",
                "ip_range": "10.0.1.0/24",
            }),
        )
        .unwrap_err();

        assert!(matches!(error, TerraError::Validation(_)));
    }
}
