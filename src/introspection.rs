//! Introspection loader.
//!
//! Parses a raw GraphQL introspection document into the immutable
//! [`SchemaDocument`] model. The serde layer mirrors the introspection wire
//! shape (kind tags, `ofType` wrapper chains, camelCase children); conversion
//! then flattens wrapper chains into [`TypeRef`] and hands the definitions to
//! `SchemaDocument::new`, which enforces referential integrity. Either a
//! fully valid document comes back, or no document at all.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::schema::{FieldDefinition, SchemaDocument, SchemaError, TypeDefinition, TypeRef};

// ————————————————————————————————————————————————————————————————————————————
// RAW WIRE MODEL
// ————————————————————————————————————————————————————————————————————————————

/// Kind tags exactly as introspection spells them.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
enum RawTypeKind {
    SCALAR,
    OBJECT,
    INTERFACE,
    UNION,
    ENUM,
    INPUT_OBJECT,
    LIST,
    NON_NULL,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTypeRef {
    kind: RawTypeKind,
    name: Option<String>,
    of_type: Option<Box<RawTypeRef>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawField {
    name: String,
    #[serde(rename = "type")]
    type_: RawTypeRef,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEnumValue {
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawType {
    kind: RawTypeKind,
    name: Option<String>,
    #[serde(default)]
    fields: Option<Vec<RawField>>,
    #[serde(default)]
    input_fields: Option<Vec<RawField>>,
    #[serde(default)]
    interfaces: Option<Vec<RawTypeRef>>,
    #[serde(default)]
    enum_values: Option<Vec<RawEnumValue>>,
    #[serde(default)]
    possible_types: Option<Vec<RawTypeRef>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSchema {
    types: Vec<RawType>,
}

#[derive(Debug, Deserialize)]
struct SchemaContainer {
    #[serde(rename = "__schema")]
    schema: RawSchema,
}

#[derive(Debug, Deserialize)]
struct FullResponse {
    data: SchemaContainer,
}

/// Accepts a whole response body, a bare `{"__schema": …}` container, or the
/// `__schema` payload itself.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IntrospectionEnvelope {
    Response(FullResponse),
    Container(SchemaContainer),
    Schema(RawSchema),
}

impl IntrospectionEnvelope {
    fn into_schema(self) -> RawSchema {
        match self {
            IntrospectionEnvelope::Response(full) => full.data.schema,
            IntrospectionEnvelope::Container(container) => container.schema,
            IntrospectionEnvelope::Schema(schema) => schema,
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// LOADING
// ————————————————————————————————————————————————————————————————————————————

/// Parse raw introspection JSON into a validated [`SchemaDocument`].
pub fn load(raw: &str) -> Result<SchemaDocument, SchemaError> {
    let envelope: IntrospectionEnvelope = from_str_with_path(raw)?;
    let schema = envelope.into_schema();

    let mut definitions = Vec::with_capacity(schema.types.len());
    for raw_type in schema.types {
        if let Some(def) = convert_type(raw_type)? {
            definitions.push(def);
        }
    }
    SchemaDocument::new(definitions)
}

/// Deserialize with JSON-path context in error messages.
fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, SchemaError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    match serde_path_to_error::deserialize::<_, T>(de) {
        Ok(v) => Ok(v),
        Err(err) => {
            let path = err.path().to_string();
            Err(SchemaError::Parse(format!("at JSON path {path} → {}", err.into_inner())))
        }
    }
}

/// Convert one raw descriptor. Introspection meta types (`__Schema`,
/// `__Type`, …) come back as `None`: they describe the introspection system,
/// not the schema under generation.
fn convert_type(raw: RawType) -> Result<Option<TypeDefinition>, SchemaError> {
    let name = match raw.name {
        Some(name) => name,
        None => return Err(SchemaError::MalformedTypeRef("<top-level type without a name>".into())),
    };
    if name.starts_with("__") {
        return Ok(None);
    }

    let def = match raw.kind {
        RawTypeKind::SCALAR => TypeDefinition::Scalar { name },
        RawTypeKind::ENUM => TypeDefinition::Enum {
            name,
            values: raw
                .enum_values
                .unwrap_or_default()
                .into_iter()
                .map(|v| v.name)
                .collect(),
        },
        RawTypeKind::OBJECT => {
            let fields = convert_fields(&name, raw.fields.unwrap_or_default())?;
            let interfaces = convert_names(&name, raw.interfaces.unwrap_or_default())?;
            TypeDefinition::Object { name, fields, interfaces }
        }
        RawTypeKind::INTERFACE => {
            let fields = convert_fields(&name, raw.fields.unwrap_or_default())?;
            let interfaces = convert_names(&name, raw.interfaces.unwrap_or_default())?;
            let implementers = convert_names(&name, raw.possible_types.unwrap_or_default())?;
            TypeDefinition::Interface { name, fields, interfaces, implementers }
        }
        RawTypeKind::UNION => {
            let members = convert_names(&name, raw.possible_types.unwrap_or_default())?;
            TypeDefinition::Union { name, members }
        }
        RawTypeKind::INPUT_OBJECT => {
            let fields = convert_fields(&name, raw.input_fields.unwrap_or_default())?;
            TypeDefinition::InputObject { name, fields }
        }
        // Wrapper kinds only ever appear inside `ofType` chains.
        RawTypeKind::LIST | RawTypeKind::NON_NULL => {
            return Err(SchemaError::MalformedTypeRef(name));
        }
    };
    Ok(Some(def))
}

fn convert_fields(owner: &str, raw_fields: Vec<RawField>) -> Result<Vec<FieldDefinition>, SchemaError> {
    raw_fields
        .into_iter()
        .map(|f| {
            let context = format!("{owner}.{}", f.name);
            Ok(FieldDefinition { name: f.name, ty: convert_ref(&context, &f.type_)? })
        })
        .collect()
}

/// `interfaces` / `possibleTypes` entries are plain named references.
fn convert_names(owner: &str, refs: Vec<RawTypeRef>) -> Result<Vec<String>, SchemaError> {
    refs.into_iter()
        .map(|r| r.name.ok_or_else(|| SchemaError::MalformedTypeRef(owner.to_string())))
        .collect()
}

/// Flatten an `ofType` chain into a [`TypeRef`], rejecting shapes no valid
/// introspection produces.
fn convert_ref(context: &str, raw: &RawTypeRef) -> Result<TypeRef, SchemaError> {
    match raw.kind {
        RawTypeKind::NON_NULL => {
            let inner = raw
                .of_type
                .as_deref()
                .ok_or_else(|| SchemaError::MalformedTypeRef(context.to_string()))?;
            if inner.kind == RawTypeKind::NON_NULL {
                return Err(SchemaError::MalformedTypeRef(context.to_string()));
            }
            Ok(TypeRef::NonNull(Box::new(convert_ref(context, inner)?)))
        }
        RawTypeKind::LIST => {
            let inner = raw
                .of_type
                .as_deref()
                .ok_or_else(|| SchemaError::MalformedTypeRef(context.to_string()))?;
            Ok(TypeRef::List(Box::new(convert_ref(context, inner)?)))
        }
        _ => {
            let name = raw
                .name
                .clone()
                .ok_or_else(|| SchemaError::MalformedTypeRef(context.to_string()))?;
            Ok(TypeRef::Named(name))
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
