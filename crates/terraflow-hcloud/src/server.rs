//! Cloud servers (`hcloud_server`)
//!
//! The `public_net` nested block carries its own defaults: both address
//! families are enabled unless the declaration turns one off.

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde_json::{json, Value};
use terraflow_core::{
    declare, Document, FieldKind, FieldSpec, Invariant, Reference, Result, Schema,
};

/// Resource type emitted into the document
pub const TYPE: &str = "hcloud_server";

/// Outputs every server declaration exposes
pub const OUTPUTS: &[&str] = &["id", "ipv4_address", "ipv6_address", "status"];

static PUBLIC_NET: Lazy<Arc<Schema>> = Lazy::new(|| {
    Arc::new(
        Schema::builder()
            .field(FieldSpec::optional("enable_ipv4", FieldKind::Bool).with_default(json!(true)))
            .field(FieldSpec::optional("enable_ipv6", FieldKind::Bool).with_default(json!(true)))
            .build()
            .expect("public_net schema is well-formed"),
    )
});

static SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    Arc::new(
        Schema::builder()
            .field(FieldSpec::required("name", FieldKind::Str))
            .field(FieldSpec::required(
                "server_type",
                FieldKind::enum_of(["cx22", "cx32", "cx42", "cx52", "cpx11", "cpx21", "cpx31"]),
            ))
            .field(FieldSpec::required("image", FieldKind::Str))
            .field(FieldSpec::optional(
                "location",
                FieldKind::enum_of(["fsn1", "nbg1", "hel1", "ash", "hil"]),
            ))
            .field(FieldSpec::optional("ssh_keys", FieldKind::list(FieldKind::Str)))
            .field(FieldSpec::optional("user_data", FieldKind::Str))
            .field(FieldSpec::optional("backups", FieldKind::Bool).with_default(json!(false)))
            .field(FieldSpec::optional("public_net", FieldKind::nested(&PUBLIC_NET)))
            .field(FieldSpec::optional("firewall_ids", FieldKind::list(FieldKind::Str)))
            .field(FieldSpec::optional("labels", FieldKind::map(FieldKind::Str)))
            .invariant(Invariant::unique_items("ssh_keys"))
            .build()
            .expect("server schema is well-formed"),
    )
});

/// Schema for `hcloud_server`
pub fn schema() -> &'static Arc<Schema> {
    &SCHEMA
}

/// Declare a cloud server
pub fn server(document: &mut Document, name: &str, attrs: Value) -> Result<Reference> {
    declare(document, TYPE, name, &SCHEMA, &attrs, OUTPUTS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use terraflow_core::{TerraError, ValidationError};

    #[test]
    fn test_minimal_server() {
        let mut document = Document::new();
        let web = server(
            &mut document,
            "web",
            json!({"name": "web", "server_type": "cx22", "image": "ubuntu-24.04"}),
        )
        .unwrap();

        assert_eq!(web.output("ipv4_address"), Some("${hcloud_server.web.ipv4_address}"));
        assert_eq!(
            serde_json::to_value(&document).unwrap(),
            json!({
                "hcloud_server": {
                    "web": {
                        "name": "web",
                        "server_type": "cx22",
                        "image": "ubuntu-24.04",
                        "backups": false,
                    },
                },
            })
        );
    }

    #[test]
    fn test_public_net_defaults_fill_in() {
        let mut document = Document::new();
        server(
            &mut document,
            "web",
            json!({
                "name": "web",
                "server_type": "cx22",
                "image": "ubuntu-24.04",
                "public_net": {"enable_ipv4": false},
            }),
        )
        .unwrap();

        let block = document.get(TYPE, "web").unwrap();
        let public_net = block.child("public_net").unwrap();
        assert_eq!(public_net.child("enable_ipv4").unwrap().value(), Some(&json!(false)));
        // the untouched side keeps its default
        assert_eq!(public_net.child("enable_ipv6").unwrap().value(), Some(&json!(true)));
    }

    #[test]
    fn test_unknown_nested_field_is_qualified() {
        let mut document = Document::new();
        let error = server(
            &mut document,
            "web",
            json!({
                "name": "web",
                "server_type": "cx22",
                "image": "ubuntu-24.04",
                "public_net": {"enable_ip": true},
            }),
        )
        .unwrap_err();

        let TerraError::Validation(errors) = error else {
            panic!("expected validation error");
        };
        match errors.iter().next().unwrap() {
            ValidationError::ConstraintViolation { path, .. } => {
                assert_eq!(path.to_string(), "public_net.enable_ip");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_ssh_keys_rejected() {
        let mut document = Document::new();
        let error = server(
            &mut document,
            "web",
            json!({
                "name": "web",
                "server_type": "cx22",
                "image": "ubuntu-24.04",
                "ssh_keys": ["ops", "deploy", "ops"],
            }),
        )
        .unwrap_err();

        let TerraError::Validation(errors) = error else {
            panic!("expected validation error");
        };
        assert!(matches!(
            errors.iter().next().unwrap(),
            ValidationError::CrossFieldInvariant { .. }
        ));
    }

    #[test]
    fn test_unsupported_server_type() {
        let mut document = Document::new();
        let error = server(
            &mut document,
            "web",
            json!({"name": "web", "server_type": "m5.large", "image": "ubuntu-24.04"}),
        )
        .unwrap_err();

        let TerraError::Validation(errors) = error else {
            panic!("expected validation error");
        };
        match errors.iter().next().unwrap() {
            ValidationError::ConstraintViolation { path, message } => {
                assert_eq!(path.to_string(), "server_type");
                assert!(message.contains("m5.large"), "message: {message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
