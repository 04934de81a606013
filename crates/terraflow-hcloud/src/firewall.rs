//! Firewalls and their rules (`hcloud_firewall`)
//!
//! Rules are repeated nested blocks. A port range is only meaningful for
//! TCP and UDP, which the rule schema enforces as a cross-field invariant.

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use terraflow_core::{
    declare, Document, FieldKind, FieldSpec, Invariant, Reference, Result, Schema,
};

/// Resource type emitted into the document
pub const TYPE: &str = "hcloud_firewall";

/// Outputs every firewall declaration exposes
pub const OUTPUTS: &[&str] = &["id"];

/// Accepts IPv4 and IPv6 CIDRs ("0.0.0.0/0", "::/0", ...)
const ANY_CIDR: &str = r"^[0-9a-fA-F:.]+/\d{1,3}$";

fn port_requires_tcp_or_udp(attrs: &Map<String, Value>) -> bool {
    match attrs.get("port") {
        Some(_) => matches!(
            attrs.get("protocol").and_then(Value::as_str),
            Some("tcp" | "udp")
        ),
        None => true,
    }
}

static RULE: Lazy<Arc<Schema>> = Lazy::new(|| {
    Arc::new(
        Schema::builder()
            .field(FieldSpec::required("direction", FieldKind::enum_of(["in", "out"])))
            .field(FieldSpec::required(
                "protocol",
                FieldKind::enum_of(["tcp", "udp", "icmp", "esp", "gre"]),
            ))
            .field(FieldSpec::optional(
                "port",
                FieldKind::pattern(r"^(\d+(-\d+)?|any)$").expect("port pattern compiles"),
            ))
            .field(FieldSpec::optional(
                "source_ips",
                FieldKind::list(FieldKind::pattern(ANY_CIDR).expect("CIDR pattern compiles")),
            ))
            .field(FieldSpec::optional("description", FieldKind::Str))
            .invariant(Invariant::custom(
                "port requires protocol tcp or udp",
                ["port", "protocol"],
                port_requires_tcp_or_udp,
            ))
            .build()
            .expect("firewall rule schema is well-formed"),
    )
});

static SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    Arc::new(
        Schema::builder()
            .field(FieldSpec::required("name", FieldKind::Str))
            .field(FieldSpec::optional("rules", FieldKind::list(FieldKind::nested(&RULE))))
            .field(FieldSpec::optional("labels", FieldKind::map(FieldKind::Str)))
            .build()
            .expect("firewall schema is well-formed"),
    )
});

/// Schema for `hcloud_firewall`
pub fn schema() -> &'static Arc<Schema> {
    &SCHEMA
}

/// Declare a firewall with its rules
pub fn firewall(document: &mut Document, name: &str, attrs: Value) -> Result<Reference> {
    declare(document, TYPE, name, &SCHEMA, &attrs, OUTPUTS)
}
