//! DNS zones (`cloudflare_zone`)

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde_json::{json, Value};
use terraflow_core::{declare, Document, FieldKind, FieldSpec, Reference, Result, Schema};

/// Resource type emitted into the document
pub const TYPE: &str = "cloudflare_zone";

/// Outputs every zone declaration exposes
pub const OUTPUTS: &[&str] = &["id", "name_servers", "status"];

/// Lowercase registrable domain, at least two labels
const DOMAIN: &str = r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?(\.[a-z0-9]([a-z0-9-]*[a-z0-9])?)+$";

static SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    Arc::new(
        Schema::builder()
            .field(FieldSpec::required("account_id", FieldKind::Str))
            .field(FieldSpec::required(
                "zone",
                FieldKind::pattern(DOMAIN).expect("domain pattern compiles"),
            ))
            .field(
                FieldSpec::optional(
                    "plan",
                    FieldKind::enum_of(["free", "pro", "business", "enterprise"]),
                )
                .with_default(json!("free")),
            )
            .field(FieldSpec::optional("paused", FieldKind::Bool).with_default(json!(false)))
            .field(
                FieldSpec::optional("type", FieldKind::enum_of(["full", "partial"]))
                    .with_default(json!("full")),
            )
            .build()
            .expect("zone schema is well-formed"),
    )
});

/// Schema for `cloudflare_zone`
pub fn schema() -> &'static Arc<Schema> {
    &SCHEMA
}

/// Declare a DNS zone
pub fn zone(document: &mut Document, name: &str, attrs: Value) -> Result<Reference> {
    declare(document, TYPE, name, &SCHEMA, &attrs, OUTPUTS)
}
