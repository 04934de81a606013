//! Uploaded SSH public keys (`hcloud_ssh_key`)

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde_json::Value;
use terraflow_core::{declare, Document, FieldKind, FieldSpec, Reference, Result, Schema};

/// Resource type emitted into the document
pub const TYPE: &str = "hcloud_ssh_key";

/// Outputs every key declaration exposes
pub const OUTPUTS: &[&str] = &["id", "fingerprint"];

static SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    Arc::new(
        Schema::builder()
            .field(FieldSpec::required("name", FieldKind::Str))
            .field(FieldSpec::required("public_key", FieldKind::Str))
            .field(FieldSpec::optional("labels", FieldKind::map(FieldKind::Str)))
            .build()
            .expect("ssh_key schema is well-formed"),
    )
});

/// Schema for `hcloud_ssh_key`
pub fn schema() -> &'static Arc<Schema> {
    &SCHEMA
}

/// Declare an SSH public key
pub fn ssh_key(document: &mut Document, name: &str, attrs: Value) -> Result<Reference> {
    declare(document, TYPE, name, &SCHEMA, &attrs, OUTPUTS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ssh_key_outputs() {
        let mut document = Document::new();
        let ops = ssh_key(
            &mut document,
            "ops",
            json!({"name": "ops", "public_key": "ssh-ed25519 AAAAC3Nza ops@example"}),
        )
        .unwrap();

        let names: Vec<&str> = ops.outputs().keys().map(String::as_str).collect();
        assert_eq!(names, vec!["id", "fingerprint"]);
        assert_eq!(ops.output("fingerprint"), Some("${hcloud_ssh_key.ops.fingerprint}"));
    }

    #[test]
    fn test_public_key_is_required() {
        let mut document = Document::new();
        assert!(ssh_key(&mut document, "ops", json!({"name": "ops"})).is_err());
        assert!(document.is_empty());
    }
}
