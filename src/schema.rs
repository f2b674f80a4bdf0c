//! Immutable schema model.
//!
//! A `SchemaDocument` is built once (normally by [`crate::introspection::load`]),
//! validated on construction, and never mutated afterwards. Every downstream
//! pass — ordering, codegen, the runtime codec — reads it through shared
//! references, so two generation runs with different scalar mappings can share
//! one document without coordination.

use indexmap::IndexMap;

/// Reserved wire-format property naming the concrete type behind an
/// interface/union-typed value. Never a legal schema field name.
pub const DISCRIMINATOR: &str = "__typename";

/// Caller-supplied table from scalar type name to target Rust representation.
/// No implicit defaults: a referenced scalar without an entry is a hard error.
pub type ScalarMapping = IndexMap<String, String>;

// ————————————————————————————————————————————————————————————————————————————
// ERRORS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The raw introspection document could not be parsed. Carries the JSON
    /// path of the offending node.
    #[error("failed to parse introspection document: {0}")]
    Parse(String),

    #[error("duplicate type name `{0}` in schema document")]
    DuplicateTypeName(String),

    /// A field, implements-list, or union-member names a type absent from
    /// the document.
    #[error("`{referrer}` references `{reference}`, which is not defined in the schema document")]
    UnknownTypeReference { referrer: String, reference: String },

    #[error("union `{union}` lists `{member}` as a member, but `{member}` is not an object type")]
    NonObjectUnionMember { union: String, member: String },

    /// An interface declares a possible type that does not implement it back.
    #[error("interface `{interface}` lists `{implementer}` as an implementer, but `{implementer}` does not implement it")]
    AsymmetricImplementer { interface: String, implementer: String },

    /// A wrapper (`ofType`) chain that no valid introspection produces:
    /// NON_NULL of NON_NULL, a wrapper without `ofType`, or a named kind
    /// without a name.
    #[error("malformed type reference in `{0}`")]
    MalformedTypeRef(String),

    /// The interface-implements relation is cyclic, so no declaration order
    /// can put every interface before its implementers.
    #[error("interface `{0}` participates in an implements-cycle that cannot be declared")]
    UnresolvableCycle(String),

    #[error("scalar `{0}` has no entry in the scalar mapping")]
    UnmappedScalar(String),
}

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// A reference to a type, as it appears at a field/member position.
///
/// Invariant (enforced by the loader): `NonNull` never wraps another
/// `NonNull`, and every chain bottoms out in a `Named` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    /// The underlying named type, unwrapping all list/non-null wrappers.
    pub fn base_name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.base_name(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Scalar,
    Enum,
    Object,
    Interface,
    Union,
    InputObject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub name: String,
    pub ty: TypeRef,
}

/// One discriminant per introspection kind, with kind-specific payload, so
/// every consumer handles all kinds exhaustively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDefinition {
    /// Representation comes from the caller's [`ScalarMapping`].
    Scalar { name: String },
    /// `values` keeps the schema's declared order; it is reproduced, never
    /// sorted.
    Enum { name: String, values: Vec<String> },
    Object {
        name: String,
        fields: Vec<FieldDefinition>,
        /// Names of the interfaces this object implements.
        interfaces: Vec<String>,
    },
    Interface {
        name: String,
        fields: Vec<FieldDefinition>,
        /// Interfaces this interface itself implements.
        interfaces: Vec<String>,
        /// Known concrete implementers, for emitting polymorphism.
        implementers: Vec<String>,
    },
    /// Members are all Object kind (validated on construction).
    Union { name: String, members: Vec<String> },
    /// Same field shape as Object; used for argument-shaped types.
    InputObject { name: String, fields: Vec<FieldDefinition> },
}

impl TypeDefinition {
    pub fn name(&self) -> &str {
        match self {
            TypeDefinition::Scalar { name }
            | TypeDefinition::Enum { name, .. }
            | TypeDefinition::Object { name, .. }
            | TypeDefinition::Interface { name, .. }
            | TypeDefinition::Union { name, .. }
            | TypeDefinition::InputObject { name, .. } => name,
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            TypeDefinition::Scalar { .. } => TypeKind::Scalar,
            TypeDefinition::Enum { .. } => TypeKind::Enum,
            TypeDefinition::Object { .. } => TypeKind::Object,
            TypeDefinition::Interface { .. } => TypeKind::Interface,
            TypeDefinition::Union { .. } => TypeKind::Union,
            TypeDefinition::InputObject { .. } => TypeKind::InputObject,
        }
    }

    /// Field list for the kinds that have one.
    pub fn fields(&self) -> &[FieldDefinition] {
        match self {
            TypeDefinition::Object { fields, .. }
            | TypeDefinition::Interface { fields, .. }
            | TypeDefinition::InputObject { fields, .. } => fields,
            _ => &[],
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// DOCUMENT
// ————————————————————————————————————————————————————————————————————————————

/// The full set of type definitions, keyed by name, in document order.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    types: IndexMap<String, TypeDefinition>,
}

impl SchemaDocument {
    /// Validates and assembles a document. Either every invariant holds on
    /// the returned value, or no document is produced:
    ///
    /// - no two definitions share a name;
    /// - every `TypeRef` base, implements-entry, and union member resolves;
    /// - union members are Object kind;
    /// - every declared implementer is an object whose implements-list names
    ///   the interface back;
    /// - interface implementer sets are completed from objects'
    ///   implements-lists, so the two directions stay symmetric.
    pub fn new(definitions: Vec<TypeDefinition>) -> Result<Self, SchemaError> {
        let mut types: IndexMap<String, TypeDefinition> = IndexMap::with_capacity(definitions.len());
        for def in definitions {
            let name = def.name().to_string();
            if types.insert(name.clone(), def).is_some() {
                return Err(SchemaError::DuplicateTypeName(name));
            }
        }
        let mut doc = SchemaDocument { types };
        doc.check_references()?;
        doc.complete_implementers();
        Ok(doc)
    }

    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    /// Definitions in document order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn check_references(&self) -> Result<(), SchemaError> {
        let resolve = |referrer: &str, reference: &str| -> Result<&TypeDefinition, SchemaError> {
            self.types.get(reference).ok_or_else(|| SchemaError::UnknownTypeReference {
                referrer: referrer.to_string(),
                reference: reference.to_string(),
            })
        };

        for def in self.types.values() {
            for field in def.fields() {
                resolve(def.name(), field.ty.base_name())?;
            }
            match def {
                TypeDefinition::Object { name, interfaces, .. }
                | TypeDefinition::Interface { name, interfaces, .. } => {
                    for iface in interfaces {
                        let target = resolve(name, iface)?;
                        if target.kind() != TypeKind::Interface {
                            return Err(SchemaError::UnknownTypeReference {
                                referrer: name.clone(),
                                reference: iface.clone(),
                            });
                        }
                    }
                    if let TypeDefinition::Interface { implementers, .. } = def {
                        for impl_name in implementers {
                            // Symmetry holds in both directions: a declared
                            // implementer must be an object that lists this
                            // interface back.
                            let implements_back = match resolve(name, impl_name)? {
                                TypeDefinition::Object { interfaces, .. } => {
                                    interfaces.contains(name)
                                }
                                _ => false,
                            };
                            if !implements_back {
                                return Err(SchemaError::AsymmetricImplementer {
                                    interface: name.clone(),
                                    implementer: impl_name.clone(),
                                });
                            }
                        }
                    }
                }
                TypeDefinition::Union { name, members } => {
                    for member in members {
                        let target = resolve(name, member)?;
                        if target.kind() != TypeKind::Object {
                            return Err(SchemaError::NonObjectUnionMember {
                                union: name.clone(),
                                member: member.clone(),
                            });
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Merge each object's implements-list into the target interface's
    /// implementer set, keeping document order and dropping duplicates.
    fn complete_implementers(&mut self) {
        let mut extra: IndexMap<String, Vec<String>> = IndexMap::new();
        for def in self.types.values() {
            if let TypeDefinition::Object { name, interfaces, .. } = def {
                for iface in interfaces {
                    extra.entry(iface.clone()).or_default().push(name.clone());
                }
            }
        }
        for (iface, implementer_names) in extra {
            if let Some(TypeDefinition::Interface { implementers, .. }) = self.types.get_mut(&iface) {
                for name in implementer_names {
                    if !implementers.contains(&name) {
                        implementers.push(name);
                    }
                }
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
