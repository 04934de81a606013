//! Block storage volumes (`hcloud_volume`)
//!
//! A volume is anchored to exactly one placement: either a datacenter
//! location or an existing server. Automount only makes sense when the
//! volume is attached to a server, so it requires `server_id`.

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde_json::{json, Value};
use terraflow_core::{
    declare, Document, FieldKind, FieldSpec, Invariant, Reference, Result, Schema,
};

/// Resource type emitted into the document
pub const TYPE: &str = "hcloud_volume";

/// Outputs every volume declaration exposes, regardless of input
pub const OUTPUTS: &[&str] = &["id", "size", "linux_device"];

static SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    Arc::new(
        Schema::builder()
            .field(FieldSpec::required("name", FieldKind::Str))
            .field(FieldSpec::required("size", FieldKind::int_range(10, 10_000)))
            .field(FieldSpec::optional(
                "location",
                FieldKind::enum_of(["fsn1", "nbg1", "hel1", "ash", "hil"]),
            ))
            .field(FieldSpec::optional("server_id", FieldKind::Str))
            .field(FieldSpec::optional("format", FieldKind::enum_of(["ext4", "xfs"])))
            .field(FieldSpec::optional("automount", FieldKind::Bool))
            .field(
                FieldSpec::optional("delete_protection", FieldKind::Bool)
                    .with_default(json!(false)),
            )
            .field(FieldSpec::optional("labels", FieldKind::map(FieldKind::Str)))
            .invariant(Invariant::exactly_one_of(["location", "server_id"]))
            .invariant(Invariant::required_with("automount", "server_id"))
            .build()
            .expect("volume schema is well-formed"),
    )
});

/// Schema for `hcloud_volume`
pub fn schema() -> &'static Arc<Schema> {
    &SCHEMA
}

/// Declare a block storage volume
pub fn volume(document: &mut Document, name: &str, attrs: Value) -> Result<Reference> {
    declare(document, TYPE, name, &SCHEMA, &attrs, OUTPUTS)
}
