//! Rust declaration emitter.
//!
//! Walks the builder order and emits one declaration per type definition:
//! scalar aliases, enums in declared order, record structs for objects and
//! input objects, and closed enums for interfaces/unions tagged with the
//! `__typename` discriminator. Emission is a pure function of
//! `(label, scalar mapping, document)` — identical inputs produce
//! byte-identical text, which the regeneration tests rely on.

use std::collections::HashSet;

use crate::order::build_order;
use crate::schema::{
    DISCRIMINATOR, FieldDefinition, ScalarMapping, SchemaDocument, SchemaError, TypeDefinition,
    TypeKind, TypeRef,
};

// ————————————————————————————————————————————————————————————————————————————
// ENTRY POINT
// ————————————————————————————————————————————————————————————————————————————

/// Generate Rust type declarations for every definition in `doc`.
///
/// Fail-fast: every scalar referenced from a field or member position must
/// have a mapping entry before a single line is emitted, so an
/// [`SchemaError::UnmappedScalar`] never leaves partial output behind.
pub fn generate_types(
    label: &str,
    scalars: &ScalarMapping,
    doc: &SchemaDocument,
) -> Result<String, SchemaError> {
    // Document order, so the first missing scalar reported is stable.
    let referenced = referenced_scalars(doc);
    for def in doc.iter() {
        for field in def.fields() {
            let base = field.ty.base_name();
            if referenced.contains(base) && !scalars.contains_key(base) {
                return Err(SchemaError::UnmappedScalar(base.to_string()));
            }
        }
    }

    let order = build_order(doc)?;

    let mut cg = Codegen::new();
    cg.line(&format!("// Generated by gql-typegen from `{label}`. Do not edit by hand."));
    cg.line("//");
    cg.line("// Wire contract: fields appear in schema declaration order; absent optional");
    cg.line("// fields are omitted; interface/union-typed positions carry a `__typename`");
    cg.line("// discriminator naming the concrete type.");
    cg.line("#![allow(non_camel_case_types, non_snake_case)]");
    cg.blank();
    cg.line("use serde::{Deserialize, Serialize};");

    for name in &order {
        let Some(def) = doc.get(name) else { continue };
        match def {
            TypeDefinition::Scalar { name } => {
                // Unreferenced scalars get no alias (and need no mapping).
                if referenced.contains(name.as_str()) {
                    emit_scalar(&mut cg, name, &scalars[name]);
                }
            }
            TypeDefinition::Enum { name, values } => emit_enum(&mut cg, name, values),
            TypeDefinition::Object { name, fields, interfaces } => {
                emit_record(&mut cg, name, fields, interfaces);
            }
            TypeDefinition::InputObject { name, fields } => emit_record(&mut cg, name, fields, &[]),
            TypeDefinition::Interface { name, fields, implementers, .. } => {
                let contract = fields.iter().map(|f| f.name.as_str()).collect::<Vec<_>>().join("`, `");
                cg.blank();
                cg.line(&format!("/// Closed set of `{name}` implementers. Field contract: `{contract}`."));
                emit_closed_enum(&mut cg, name, implementers);
            }
            TypeDefinition::Union { name, members } => {
                cg.blank();
                cg.line(&format!("/// Closed set of `{name}` members."));
                emit_closed_enum(&mut cg, name, members);
            }
        }
    }

    Ok(cg.into_string())
}

// ————————————————————————————————————————————————————————————————————————————
// TEXT BUFFER
// ————————————————————————————————————————————————————————————————————————————

pub struct Codegen {
    buf: String,
}

impl Codegen {
    pub fn new() -> Self {
        Self { buf: String::new() }
    }

    fn line(&mut self, s: &str) {
        self.buf.push_str(s);
        self.buf.push('\n');
    }

    fn blank(&mut self) {
        self.buf.push('\n');
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

impl Default for Codegen {
    fn default() -> Self {
        Self::new()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// PER-KIND EMISSION
// ————————————————————————————————————————————————————————————————————————————

fn emit_scalar(cg: &mut Codegen, name: &str, repr: &str) {
    // `pub type String = String;` would be a self-referential alias; the
    // mapped representation already is the type in that case.
    if name == repr {
        return;
    }
    cg.blank();
    cg.line(&format!("pub type {name} = {repr};"));
}

fn emit_enum(cg: &mut Codegen, name: &str, values: &[String]) {
    cg.blank();
    cg.line("#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]");
    cg.line(&format!("pub enum {name} {{"));
    for value in values {
        if let Some(wire_name) = rename_for(value) {
            cg.line(&format!("    #[serde(rename = \"{wire_name}\")]"));
        }
        cg.line(&format!("    {},", ident(value)));
    }
    cg.line("}");
}

fn emit_record(cg: &mut Codegen, name: &str, fields: &[FieldDefinition], interfaces: &[String]) {
    cg.blank();
    if !interfaces.is_empty() {
        cg.line(&format!("/// Implements `{}`.", interfaces.join("`, `")));
    }
    cg.line("#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]");
    cg.line(&format!("pub struct {name} {{"));
    for field in fields {
        let optional = !field.ty.is_non_null();
        if optional {
            cg.line("    #[serde(skip_serializing_if = \"Option::is_none\", default)]");
        }
        if let Some(wire_name) = rename_for(&field.name) {
            cg.line(&format!("    #[serde(rename = \"{wire_name}\")]"));
        }
        cg.line(&format!("    pub {}: {},", ident(&field.name), render_type(&field.ty)));
    }
    cg.line("}");
}

/// One newtype variant per concrete member, dispatched over the reserved
/// discriminator. Pattern-matching the enum is the capability abstraction.
fn emit_closed_enum(cg: &mut Codegen, name: &str, members: &[String]) {
    cg.line("#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]");
    cg.line(&format!("#[serde(tag = \"{DISCRIMINATOR}\")]"));
    cg.line(&format!("pub enum {name} {{"));
    for member in members {
        cg.line(&format!("    {member}({member}),"));
    }
    cg.line("}");
    for member in members {
        cg.blank();
        cg.line(&format!("impl From<{member}> for {name} {{"));
        cg.line(&format!("    fn from(value: {member}) -> Self {{"));
        cg.line(&format!("        {name}::{member}(value)"));
        cg.line("    }");
        cg.line("}");
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TYPE RENDERING
// ————————————————————————————————————————————————————————————————————————————

/// `NonNull(x)` → bare representation; anything else is `Option<…>`.
fn render_type(ty: &TypeRef) -> String {
    match ty {
        TypeRef::NonNull(inner) => render_base(inner),
        other => format!("Option<{}>", render_base(other)),
    }
}

fn render_base(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Named(name) => name.clone(),
        TypeRef::List(inner) => format!("Vec<{}>", render_type(inner)),
        // Loader invariant: NonNull never wraps NonNull.
        TypeRef::NonNull(inner) => render_base(inner),
    }
}

/// Scalar names referenced from any field/member position, in no particular
/// order (membership only).
fn referenced_scalars(doc: &SchemaDocument) -> HashSet<&str> {
    let mut out = HashSet::new();
    for def in doc.iter() {
        for field in def.fields() {
            let base = field.ty.base_name();
            if doc.get(base).is_some_and(|d| d.kind() == TypeKind::Scalar) {
                out.insert(base);
            }
        }
    }
    out
}

// ————————————————————————————————————————————————————————————————————————————
// IDENTIFIERS
// ————————————————————————————————————————————————————————————————————————————

const RAW_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
    "pub", "ref", "return", "static", "struct", "trait", "true", "type", "unsafe", "use",
    "where", "while",
];

/// Keywords that cannot be raw identifiers at all.
const RESERVED: &[&str] = &["self", "Self", "super", "crate"];

fn ident(name: &str) -> String {
    if RAW_KEYWORDS.contains(&name) {
        format!("r#{name}")
    } else if RESERVED.contains(&name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

/// A serde rename is only needed when the Rust identifier no longer spells
/// the wire name (raw identifiers already do).
fn rename_for(name: &str) -> Option<&str> {
    RESERVED.contains(&name).then_some(name)
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
