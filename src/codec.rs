//! Polymorphic JSON codec.
//!
//! A schema-driven runtime codec over a dynamic instance model. Both
//! directions are stateless pure transforms; the document drives every
//! decision, so the codec needs no host reflection to recover "the real type
//! of this interface-typed value" — the wire format itself carries it:
//!
//! - fields are written in schema declaration order, never map-iteration
//!   order, so output text is deterministic;
//! - absent optional fields are omitted; decode maps an explicit `null` and a
//!   missing key to the same absence, making one round trip a fixed point
//!   (`serialize(deserialize(serialize(g))) == serialize(g)`);
//! - interface/union-typed positions carry a leading `__typename`
//!   discriminator naming the concrete type; concrete Object positions carry
//!   none.

use indexmap::IndexMap;
use serde_json::Value as Json;

use crate::schema::{DISCRIMINATOR, FieldDefinition, SchemaDocument, TypeDefinition, TypeKind, TypeRef};

// ————————————————————————————————————————————————————————————————————————————
// ERRORS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Decode-time: the discriminator names no known implementer/member.
    /// Never silently falls back to a default type.
    #[error("discriminator `{0}` does not name a known implementer or member")]
    UnknownDiscriminator(String),

    /// The JSON structure (or instance graph) does not match the declared
    /// shape at `at`.
    #[error("shape mismatch at `{at}`: expected {expected}, found {found}")]
    ShapeMismatch { at: String, expected: String, found: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn mismatch(at: &str, expected: impl Into<String>, found: impl Into<String>) -> CodecError {
    CodecError::ShapeMismatch {
        at: at.to_string(),
        expected: expected.into(),
        found: found.into(),
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INSTANCE MODEL
// ————————————————————————————————————————————————————————————————————————————

/// A runtime value shaped like some generated type.
#[derive(Debug, Clone, PartialEq)]
pub enum Instance {
    /// Explicit null at a nullable position. Inside arrays this is the only
    /// lawful encoding of an absent element (omission would change length
    /// and order); in an object field slot it normalizes to omission.
    Null,
    /// Leaf value for a scalar-typed slot: string, number, or boolean.
    Scalar(Json),
    /// An enum member name.
    Enum(String),
    List(Vec<Instance>),
    Object(ObjectInstance),
}

impl Instance {
    pub fn string(s: impl Into<String>) -> Self {
        Instance::Scalar(Json::String(s.into()))
    }

    fn describe(&self) -> &'static str {
        match self {
            Instance::Null => "null",
            Instance::Scalar(_) => "scalar",
            Instance::Enum(_) => "enum member",
            Instance::List(_) => "list",
            Instance::Object(_) => "object",
        }
    }
}

/// A concrete object value. An absent key is an absent optional field.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectInstance {
    pub type_name: String,
    pub fields: IndexMap<String, Instance>,
}

impl ObjectInstance {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self { type_name: type_name.into(), fields: IndexMap::new() }
    }

    pub fn with(mut self, field: impl Into<String>, value: Instance) -> Self {
        self.fields.insert(field.into(), value);
        self
    }

    pub fn field(&self, name: &str) -> Option<&Instance> {
        self.fields.get(name)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// ENCODE
// ————————————————————————————————————————————————————————————————————————————

/// Encode `instance` as UTF-8 JSON text, with `expected` giving the static
/// type of the root position.
pub fn serialize(
    doc: &SchemaDocument,
    expected: &TypeRef,
    instance: &Instance,
) -> Result<String, CodecError> {
    let value = encode(doc, expected, instance, expected.base_name())?;
    Ok(serde_json::to_string(&value)?)
}

fn encode(
    doc: &SchemaDocument,
    expected: &TypeRef,
    instance: &Instance,
    at: &str,
) -> Result<Json, CodecError> {
    if matches!(instance, Instance::Null) {
        return match expected {
            TypeRef::NonNull(_) => Err(mismatch(at, "non-null value", "null")),
            _ => Ok(Json::Null),
        };
    }
    match expected {
        // Presence of non-null fields is enforced at the field loop; the
        // wrapper itself adds nothing to an already-present value.
        TypeRef::NonNull(inner) => encode(doc, inner, instance, at),
        TypeRef::List(inner) => {
            let Instance::List(items) = instance else {
                return Err(mismatch(at, "list", instance.describe()));
            };
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                out.push(encode(doc, inner, item, &format!("{at}[{i}]"))?);
            }
            Ok(Json::Array(out))
        }
        TypeRef::Named(name) => encode_named(doc, name, instance, at),
    }
}

fn encode_named(
    doc: &SchemaDocument,
    name: &str,
    instance: &Instance,
    at: &str,
) -> Result<Json, CodecError> {
    let Some(def) = doc.get(name) else {
        return Err(mismatch(at, format!("a type named `{name}`"), "no such definition"));
    };
    match def {
        TypeDefinition::Scalar { .. } => {
            let Instance::Scalar(value) = instance else {
                return Err(mismatch(at, "scalar", instance.describe()));
            };
            if matches!(value, Json::String(_) | Json::Number(_) | Json::Bool(_)) {
                Ok(value.clone())
            } else {
                Err(mismatch(at, "scalar leaf (string, number, or boolean)", json_kind(value)))
            }
        }
        TypeDefinition::Enum { values, .. } => {
            let Instance::Enum(member) = instance else {
                return Err(mismatch(at, "enum member", instance.describe()));
            };
            if values.contains(member) {
                Ok(Json::String(member.clone()))
            } else {
                Err(mismatch(at, format!("a member of `{name}`"), format!("`{member}`")))
            }
        }
        TypeDefinition::Object { fields, .. } | TypeDefinition::InputObject { fields, .. } => {
            let obj = expect_object(instance, at)?;
            if obj.type_name != *name {
                return Err(mismatch(at, format!("an instance of `{name}`"), format!("`{}`", obj.type_name)));
            }
            // Static type is concrete: no discriminator on the wire.
            encode_object(doc, fields, obj, at, None)
        }
        TypeDefinition::Interface { implementers, .. } => {
            let obj = expect_object(instance, at)?;
            encode_polymorphic(doc, name, implementers, obj, at)
        }
        TypeDefinition::Union { members, .. } => {
            let obj = expect_object(instance, at)?;
            encode_polymorphic(doc, name, members, obj, at)
        }
    }
}

fn expect_object<'a>(instance: &'a Instance, at: &str) -> Result<&'a ObjectInstance, CodecError> {
    match instance {
        Instance::Object(obj) => Ok(obj),
        other => Err(mismatch(at, "object", other.describe())),
    }
}

/// Interface/union position: the concrete runtime type cannot be inferred
/// from shape alone, so the discriminator goes first on the wire.
fn encode_polymorphic(
    doc: &SchemaDocument,
    abstract_name: &str,
    allowed: &[String],
    obj: &ObjectInstance,
    at: &str,
) -> Result<Json, CodecError> {
    if !allowed.contains(&obj.type_name) {
        return Err(mismatch(
            at,
            format!("an implementer/member of `{abstract_name}`"),
            format!("`{}`", obj.type_name),
        ));
    }
    let concrete = doc.get(&obj.type_name).filter(|d| d.kind() == TypeKind::Object);
    let Some(concrete) = concrete else {
        return Err(mismatch(at, "a concrete object type", format!("`{}`", obj.type_name)));
    };
    encode_object(doc, concrete.fields(), obj, at, Some(&obj.type_name))
}

fn encode_object(
    doc: &SchemaDocument,
    field_defs: &[FieldDefinition],
    obj: &ObjectInstance,
    at: &str,
    discriminator: Option<&str>,
) -> Result<Json, CodecError> {
    let mut map = serde_json::Map::with_capacity(field_defs.len() + 1);
    if let Some(tag) = discriminator {
        map.insert(DISCRIMINATOR.to_string(), Json::String(tag.to_string()));
    }
    // Declaration order, straight off the schema.
    for fd in field_defs {
        let field_at = format!("{at}.{}", fd.name);
        match obj.field(&fd.name) {
            // An explicit null in a field slot normalizes to omission, so
            // one round trip stays a fixed point.
            Some(Instance::Null) | None => {
                if fd.ty.is_non_null() {
                    return Err(mismatch(&field_at, "a value for a non-null field", "absent or null"));
                }
            }
            Some(value) => {
                map.insert(fd.name.clone(), encode(doc, &fd.ty, value, &field_at)?);
            }
        }
    }
    for key in obj.fields.keys() {
        if !field_defs.iter().any(|fd| &fd.name == key) {
            return Err(mismatch(
                at,
                format!("a field of `{}`", obj.type_name),
                format!("unknown field `{key}`"),
            ));
        }
    }
    Ok(Json::Object(map))
}

// ————————————————————————————————————————————————————————————————————————————
// DECODE
// ————————————————————————————————————————————————————————————————————————————

/// Decode UTF-8 JSON text into an instance of the shape named by `expected`.
pub fn deserialize(
    doc: &SchemaDocument,
    expected: &TypeRef,
    json_text: &str,
) -> Result<Instance, CodecError> {
    let value: Json = serde_json::from_str(json_text)?;
    decode(doc, expected, &value, expected.base_name())
}

fn decode(
    doc: &SchemaDocument,
    expected: &TypeRef,
    value: &Json,
    at: &str,
) -> Result<Instance, CodecError> {
    // Field slots intercept nulls as absence before reaching here; this
    // covers nullable positions inside arrays (and a nullable root).
    if value.is_null() {
        return match expected {
            TypeRef::NonNull(_) => Err(mismatch(at, "non-null value", "null")),
            _ => Ok(Instance::Null),
        };
    }
    match expected {
        TypeRef::NonNull(inner) => decode(doc, inner, value, at),
        TypeRef::List(inner) => {
            let Json::Array(items) = value else {
                return Err(mismatch(at, "array", json_kind(value)));
            };
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                out.push(decode(doc, inner, item, &format!("{at}[{i}]"))?);
            }
            Ok(Instance::List(out))
        }
        TypeRef::Named(name) => decode_named(doc, name, value, at),
    }
}

fn decode_named(
    doc: &SchemaDocument,
    name: &str,
    value: &Json,
    at: &str,
) -> Result<Instance, CodecError> {
    let Some(def) = doc.get(name) else {
        return Err(mismatch(at, format!("a type named `{name}`"), "no such definition"));
    };
    match def {
        TypeDefinition::Scalar { .. } => {
            if matches!(value, Json::String(_) | Json::Number(_) | Json::Bool(_)) {
                Ok(Instance::Scalar(value.clone()))
            } else {
                Err(mismatch(at, "scalar leaf (string, number, or boolean)", json_kind(value)))
            }
        }
        TypeDefinition::Enum { values, .. } => {
            let Json::String(member) = value else {
                return Err(mismatch(at, "enum member string", json_kind(value)));
            };
            if values.contains(member) {
                Ok(Instance::Enum(member.clone()))
            } else {
                Err(mismatch(at, format!("a member of `{name}`"), format!("`{member}`")))
            }
        }
        TypeDefinition::Object { fields, .. } | TypeDefinition::InputObject { fields, .. } => {
            let map = expect_json_object(value, at)?;
            // A concrete position never needs a discriminator, but foreign
            // encoders may write one everywhere; accept it only when it names
            // this exact type.
            if let Some(tag) = map.get(DISCRIMINATOR) {
                if tag.as_str() != Some(name) {
                    return Err(mismatch(at, format!("`{name}`"), format!("discriminator {tag}")));
                }
            }
            decode_fields(doc, fields, name, map, at)
        }
        TypeDefinition::Interface { implementers, .. } => {
            decode_polymorphic(doc, name, implementers, value, at)
        }
        TypeDefinition::Union { members, .. } => {
            decode_polymorphic(doc, name, members, value, at)
        }
    }
}

/// Interface/union slot: the discriminator selects which concrete shape to
/// decode into.
fn decode_polymorphic(
    doc: &SchemaDocument,
    abstract_name: &str,
    allowed: &[String],
    value: &Json,
    at: &str,
) -> Result<Instance, CodecError> {
    let map = expect_json_object(value, at)?;
    let Some(tag) = map.get(DISCRIMINATOR) else {
        return Err(mismatch(at, format!("a `{DISCRIMINATOR}` discriminator for `{abstract_name}`"), "absent"));
    };
    let Json::String(concrete_name) = tag else {
        return Err(mismatch(at, "string discriminator", json_kind(tag)));
    };
    if !allowed.contains(concrete_name) {
        return Err(CodecError::UnknownDiscriminator(concrete_name.clone()));
    }
    let concrete = doc.get(concrete_name).filter(|d| d.kind() == TypeKind::Object);
    let Some(concrete) = concrete else {
        return Err(CodecError::UnknownDiscriminator(concrete_name.clone()));
    };
    decode_fields(doc, concrete.fields(), concrete_name, map, at)
}

fn decode_fields(
    doc: &SchemaDocument,
    field_defs: &[FieldDefinition],
    type_name: &str,
    map: &serde_json::Map<String, Json>,
    at: &str,
) -> Result<Instance, CodecError> {
    let mut fields = IndexMap::with_capacity(field_defs.len());
    for fd in field_defs {
        let field_at = format!("{at}.{}", fd.name);
        match map.get(&fd.name) {
            // Explicit null and a missing key both mean "absent"; re-encode
            // omits either way, keeping round trips at a fixed point.
            None | Some(Json::Null) => {
                if fd.ty.is_non_null() {
                    return Err(mismatch(&field_at, "a value for a non-null field", "absent or null"));
                }
            }
            Some(value) => {
                fields.insert(fd.name.clone(), decode(doc, &fd.ty, value, &field_at)?);
            }
        }
    }
    for key in map.keys() {
        if key == DISCRIMINATOR {
            continue;
        }
        if !field_defs.iter().any(|fd| &fd.name == key) {
            return Err(mismatch(
                at,
                format!("a field of `{type_name}`"),
                format!("unknown field `{key}`"),
            ));
        }
    }
    Ok(Instance::Object(ObjectInstance { type_name: type_name.to_string(), fields }))
}

fn expect_json_object<'a>(
    value: &'a Json,
    at: &str,
) -> Result<&'a serde_json::Map<String, Json>, CodecError> {
    match value {
        Json::Object(map) => Ok(map),
        other => Err(mismatch(at, "object", json_kind(other))),
    }
}

fn json_kind(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::schema::SchemaDocument;

    fn order_ref() -> TypeRef {
        TypeRef::NonNull(Box::new(TypeRef::Named("Order".into())))
    }

    fn order_list_ref() -> TypeRef {
        TypeRef::List(Box::new(order_ref()))
    }

    /// `Order{id, customer:Customer{id}, purchasingEntity:PurchasingCompany{
    /// id, contact:CompanyContact{id}}}`, with the company reusing the order
    /// id and optional fields left absent.
    fn order(id: &str, customer_id: &str, contact_id: &str) -> Instance {
        Instance::Object(
            ObjectInstance::new("Order")
                .with("id", Instance::string(id))
                .with(
                    "customer",
                    Instance::Object(ObjectInstance::new("Customer").with("id", Instance::string(customer_id))),
                )
                .with(
                    "purchasingEntity",
                    Instance::Object(
                        ObjectInstance::new("PurchasingCompany")
                            .with("id", Instance::string(id))
                            .with(
                                "contact",
                                Instance::Object(
                                    ObjectInstance::new("CompanyContact")
                                        .with("id", Instance::string(contact_id)),
                                ),
                            ),
                    ),
                ),
        )
    }

    fn doc() -> SchemaDocument {
        fixtures::purchase_document()
    }

    #[test]
    fn fields_follow_declaration_order_and_only_polymorphic_positions_carry_discriminators() {
        let text = serialize(&doc(), &order_ref(), &order("123", "234", "456")).unwrap();
        assert_eq!(
            text,
            r#"{"id":"123","customer":{"id":"234"},"purchasingEntity":{"__typename":"PurchasingCompany","id":"123","contact":{"id":"456"}}}"#
        );
    }

    #[test]
    fn round_trip_is_idempotent() {
        let doc = doc();
        let first = serialize(&doc, &order_ref(), &order("123", "234", "456")).unwrap();
        let decoded = deserialize(&doc, &order_ref(), &first).unwrap();
        let second = serialize(&doc, &order_ref(), &decoded).unwrap();
        assert_eq!(first, second);

        let decoded_again = deserialize(&doc, &order_ref(), &second).unwrap();
        let third = serialize(&doc, &order_ref(), &decoded_again).unwrap();
        assert_eq!(second, third);
    }

    #[test]
    fn concrete_type_survives_an_interface_typed_position() {
        let doc = doc();
        let text = serialize(&doc, &order_ref(), &order("123", "234", "456")).unwrap();
        let Instance::Object(decoded) = deserialize(&doc, &order_ref(), &text).unwrap() else {
            panic!("expected object");
        };
        let Some(Instance::Object(entity)) = decoded.field("purchasingEntity") else {
            panic!("purchasingEntity missing");
        };
        assert_eq!(entity.type_name, "PurchasingCompany");
        let Some(Instance::Object(contact)) = entity.field("contact") else {
            panic!("contact missing");
        };
        assert_eq!(contact.field("id"), Some(&Instance::string("456")));
    }

    #[test]
    fn arrays_round_trip_with_order_and_count_preserved() {
        let doc = doc();
        let graph = Instance::List(vec![
            order("123", "234", "456"),
            order("abc", "def", "ghi"),
        ]);
        let first = serialize(&doc, &order_list_ref(), &graph).unwrap();
        let decoded = deserialize(&doc, &order_list_ref(), &first).unwrap();
        let second = serialize(&doc, &order_list_ref(), &decoded).unwrap();
        assert_eq!(first, second);

        let Instance::List(items) = decoded else { panic!("expected list") };
        assert_eq!(items.len(), 2);
        for (item, (id, customer_id, contact_id)) in
            items.iter().zip([("123", "234", "456"), ("abc", "def", "ghi")])
        {
            let Instance::Object(order) = item else { panic!("expected object") };
            assert_eq!(order.field("id"), Some(&Instance::string(id)));
            let Some(Instance::Object(customer)) = order.field("customer") else {
                panic!("customer missing");
            };
            assert_eq!(customer.field("id"), Some(&Instance::string(customer_id)));
            let Some(Instance::Object(entity)) = order.field("purchasingEntity") else {
                panic!("purchasingEntity missing");
            };
            assert_eq!(entity.type_name, "PurchasingCompany");
            let Some(Instance::Object(contact)) = entity.field("contact") else {
                panic!("contact missing");
            };
            assert_eq!(contact.field("id"), Some(&Instance::string(contact_id)));
        }
    }

    #[test]
    fn optional_enum_and_list_fields_round_trip() {
        let doc = doc();
        let graph = match order("123", "234", "456") {
            Instance::Object(obj) => Instance::Object(
                obj.with("status", Instance::Enum("OPEN".into())).with(
                    "tags",
                    Instance::List(vec![Instance::string("rush"), Instance::string("export")]),
                ),
            ),
            _ => unreachable!(),
        };
        let first = serialize(&doc, &order_ref(), &graph).unwrap();
        assert!(first.ends_with(r#","status":"OPEN","tags":["rush","export"]}"#));
        let decoded = deserialize(&doc, &order_ref(), &first).unwrap();
        assert_eq!(serialize(&doc, &order_ref(), &decoded).unwrap(), first);
    }

    #[test]
    fn unknown_discriminator_is_rejected_not_defaulted() {
        let doc = doc();
        let text = r#"{"id":"1","customer":{"id":"2"},"purchasingEntity":{"__typename":"Mystery","id":"1"}}"#;
        let err = deserialize(&doc, &order_ref(), text).unwrap_err();
        assert!(matches!(err, CodecError::UnknownDiscriminator(name) if name == "Mystery"));
    }

    #[test]
    fn missing_discriminator_at_polymorphic_position_is_a_shape_mismatch() {
        let doc = doc();
        let text = r#"{"id":"1","customer":{"id":"2"},"purchasingEntity":{"id":"1"}}"#;
        let err = deserialize(&doc, &order_ref(), text).unwrap_err();
        let CodecError::ShapeMismatch { at, .. } = err else { panic!("expected shape mismatch") };
        assert_eq!(at, "Order.purchasingEntity");
    }

    #[test]
    fn explicit_null_and_omission_decode_to_the_same_absence() {
        let doc = doc();
        let customer_ref = TypeRef::NonNull(Box::new(TypeRef::Named("Customer".into())));
        let omitted = deserialize(&doc, &customer_ref, r#"{"id":"1"}"#).unwrap();
        let explicit = deserialize(&doc, &customer_ref, r#"{"id":"1","orders":null}"#).unwrap();
        assert_eq!(omitted, explicit);
        assert_eq!(serialize(&doc, &customer_ref, &explicit).unwrap(), r#"{"id":"1"}"#);
    }

    #[test]
    fn wrong_json_kind_for_a_field_is_a_shape_mismatch() {
        let doc = doc();
        let text = r#"{"id":"1","customer":"not-an-object","purchasingEntity":{"__typename":"PurchasingCompany","id":"1","contact":{"id":"3"}}}"#;
        let err = deserialize(&doc, &order_ref(), text).unwrap_err();
        let CodecError::ShapeMismatch { at, found, .. } = err else { panic!("expected shape mismatch") };
        assert_eq!(at, "Order.customer");
        assert_eq!(found, "string");
    }

    #[test]
    fn missing_non_null_field_fails_decode() {
        let doc = doc();
        let text = r#"{"customer":{"id":"2"},"purchasingEntity":{"__typename":"PurchasingCompany","id":"1","contact":{"id":"3"}}}"#;
        let err = deserialize(&doc, &order_ref(), text).unwrap_err();
        let CodecError::ShapeMismatch { at, .. } = err else { panic!("expected shape mismatch") };
        assert_eq!(at, "Order.id");
    }

    #[test]
    fn unknown_object_keys_are_rejected() {
        let doc = doc();
        let customer_ref = TypeRef::NonNull(Box::new(TypeRef::Named("Customer".into())));
        let err = deserialize(&doc, &customer_ref, r#"{"id":"1","nickname":"x"}"#).unwrap_err();
        let CodecError::ShapeMismatch { found, .. } = err else { panic!("expected shape mismatch") };
        assert_eq!(found, "unknown field `nickname`");
    }

    #[test]
    fn unknown_enum_members_are_rejected_both_ways() {
        let doc = doc();
        let graph = match order("123", "234", "456") {
            Instance::Object(obj) => Instance::Object(obj.with("status", Instance::Enum("BOGUS".into()))),
            _ => unreachable!(),
        };
        assert!(matches!(
            serialize(&doc, &order_ref(), &graph),
            Err(CodecError::ShapeMismatch { .. })
        ));

        let text = r#"{"id":"1","customer":{"id":"2"},"purchasingEntity":{"__typename":"PurchasingCompany","id":"1","contact":{"id":"3"}},"status":"BOGUS"}"#;
        assert!(matches!(
            deserialize(&doc, &order_ref(), text),
            Err(CodecError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn nullable_list_elements_round_trip_as_explicit_nulls() {
        let doc = doc();
        let customer_ref = TypeRef::NonNull(Box::new(TypeRef::Named("Customer".into())));
        let graph = Instance::Object(
            ObjectInstance::new("Customer").with("id", Instance::string("1")).with(
                "nicknames",
                Instance::List(vec![
                    Instance::string("Ace"),
                    Instance::Null,
                    Instance::string("Trey"),
                ]),
            ),
        );
        let first = serialize(&doc, &customer_ref, &graph).unwrap();
        assert_eq!(first, r#"{"id":"1","nicknames":["Ace",null,"Trey"]}"#);

        let decoded = deserialize(&doc, &customer_ref, &first).unwrap();
        let Instance::Object(customer) = &decoded else { panic!("expected object") };
        let Some(Instance::List(items)) = customer.field("nicknames") else {
            panic!("nicknames missing");
        };
        assert_eq!(items[1], Instance::Null);
        assert_eq!(serialize(&doc, &customer_ref, &decoded).unwrap(), first);
    }

    #[test]
    fn null_element_in_a_non_null_list_fails_both_ways() {
        let doc = doc();
        // Order.tags is [String!]: the list is optional, its elements are not.
        let graph = match order("123", "234", "456") {
            Instance::Object(obj) => Instance::Object(obj.with(
                "tags",
                Instance::List(vec![Instance::string("rush"), Instance::Null]),
            )),
            _ => unreachable!(),
        };
        let err = serialize(&doc, &order_ref(), &graph).unwrap_err();
        let CodecError::ShapeMismatch { at, .. } = err else { panic!("expected shape mismatch") };
        assert_eq!(at, "Order.tags[1]");

        let text = r#"{"id":"1","customer":{"id":"2"},"purchasingEntity":{"__typename":"PurchasingCompany","id":"1","contact":{"id":"3"}},"tags":["rush",null]}"#;
        let err = deserialize(&doc, &order_ref(), text).unwrap_err();
        let CodecError::ShapeMismatch { at, .. } = err else { panic!("expected shape mismatch") };
        assert_eq!(at, "Order.tags[1]");
    }

    #[test]
    fn explicit_null_in_an_optional_field_slot_encodes_as_omission() {
        let doc = doc();
        let customer_ref = TypeRef::NonNull(Box::new(TypeRef::Named("Customer".into())));
        let graph = Instance::Object(
            ObjectInstance::new("Customer")
                .with("id", Instance::string("1"))
                .with("nicknames", Instance::Null),
        );
        assert_eq!(serialize(&doc, &customer_ref, &graph).unwrap(), r#"{"id":"1"}"#);
    }

    #[test]
    fn union_typed_lists_carry_discriminators_per_element() {
        let doc = doc();
        let page_ref = TypeRef::NonNull(Box::new(TypeRef::Named("SearchPage".into())));
        let page = Instance::Object(ObjectInstance::new("SearchPage").with(
            "results",
            Instance::List(vec![
                Instance::Object(ObjectInstance::new("Customer").with("id", Instance::string("234"))),
                Instance::Object(
                    ObjectInstance::new("PurchasingCompany")
                        .with("id", Instance::string("9"))
                        .with(
                            "contact",
                            Instance::Object(
                                ObjectInstance::new("CompanyContact").with("id", Instance::string("456")),
                            ),
                        ),
                ),
            ]),
        ));
        let first = serialize(&doc, &page_ref, &page).unwrap();
        assert_eq!(
            first,
            r#"{"results":[{"__typename":"Customer","id":"234"},{"__typename":"PurchasingCompany","id":"9","contact":{"id":"456"}}]}"#
        );
        let decoded = deserialize(&doc, &page_ref, &first).unwrap();
        assert_eq!(serialize(&doc, &page_ref, &decoded).unwrap(), first);
    }
}
