//! DNS records (`cloudflare_record`)
//!
//! MX records carry a delivery preference, so `priority` is mandatory for
//! them and meaningless-but-allowed for no other type here.

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde_json::{json, Map, Value};
use terraflow_core::{
    declare, Document, FieldKind, FieldSpec, Invariant, Reference, Result, Schema,
};

/// Resource type emitted into the document
pub const TYPE: &str = "cloudflare_record";

/// Outputs every record declaration exposes
pub const OUTPUTS: &[&str] = &["id", "hostname"];

fn mx_needs_priority(attrs: &Map<String, Value>) -> bool {
    match attrs.get("type").and_then(Value::as_str) {
        Some("MX") => attrs.contains_key("priority"),
        _ => true,
    }
}

static SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    Arc::new(
        Schema::builder()
            .field(FieldSpec::required("zone_id", FieldKind::Str))
            .field(FieldSpec::required("name", FieldKind::Str))
            .field(FieldSpec::required(
                "type",
                FieldKind::enum_of(["A", "AAAA", "CNAME", "TXT", "MX", "NS"]),
            ))
            .field(FieldSpec::required("value", FieldKind::Str))
            .field(
                FieldSpec::optional("ttl", FieldKind::int_range(60, 86_400))
                    .with_default(json!(300)),
            )
            .field(FieldSpec::optional("proxied", FieldKind::Bool).with_default(json!(false)))
            .field(FieldSpec::optional("priority", FieldKind::int_range(0, 65_535)))
            .invariant(Invariant::custom(
                "MX records require a priority",
                ["type", "priority"],
                mx_needs_priority,
            ))
            .build()
            .expect("record schema is well-formed"),
    )
});

/// Schema for `cloudflare_record`
pub fn schema() -> &'static Arc<Schema> {
    &SCHEMA
}

/// Declare a DNS record
pub fn record(document: &mut Document, name: &str, attrs: Value) -> Result<Reference> {
    declare(document, TYPE, name, &SCHEMA, &attrs, OUTPUTS)
}
