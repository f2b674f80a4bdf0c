//! Emission-order builder.
//!
//! GraphQL object types routinely reference each other mutually, so a strict
//! dependency-respecting topological sort over *field* edges is impossible in
//! general. The order produced here guarantees a weaker, sufficient property
//! instead:
//!
//! 1. every type name is declared (name + kind known) before any type's field
//!    bodies reference it;
//! 2. interfaces are fully declared, including field shape, before any
//!    implementer that lists them as a supertype.
//!
//! Field-body cycles among objects are therefore acceptable (resolved by
//! forward reference). Only a cycle in the interface-implements relation is
//! genuinely inexpressible and errors.

use std::collections::HashMap;

use crate::schema::{SchemaDocument, SchemaError, TypeDefinition, TypeKind};

/// Compute a deterministic emission order over all type names in `doc`.
///
/// Kind groups come out leaf-first — scalars, enums, interfaces, unions,
/// objects, input objects — each group in document order, except that
/// interfaces are topologically sorted over their own implements-edges.
pub fn build_order(doc: &SchemaDocument) -> Result<Vec<String>, SchemaError> {
    let mut order = Vec::with_capacity(doc.len());

    push_kind(doc, TypeKind::Scalar, &mut order);
    push_kind(doc, TypeKind::Enum, &mut order);
    order.extend(interface_order(doc)?);
    push_kind(doc, TypeKind::Union, &mut order);
    push_kind(doc, TypeKind::Object, &mut order);
    push_kind(doc, TypeKind::InputObject, &mut order);

    Ok(order)
}

fn push_kind(doc: &SchemaDocument, kind: TypeKind, order: &mut Vec<String>) {
    for def in doc.iter() {
        if def.kind() == kind {
            order.push(def.name().to_string());
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Interfaces sorted so every super-interface precedes the interfaces that
/// implement it. A depth-first walk with an in-progress mark; re-entering a
/// node mid-visit proves an implements-cycle.
fn interface_order(doc: &SchemaDocument) -> Result<Vec<String>, SchemaError> {
    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut order = Vec::new();

    for def in doc.iter() {
        if def.kind() == TypeKind::Interface {
            visit(doc, def.name(), &mut marks, &mut order)?;
        }
    }
    Ok(order)
}

fn visit<'a>(
    doc: &'a SchemaDocument,
    name: &'a str,
    marks: &mut HashMap<&'a str, Mark>,
    order: &mut Vec<String>,
) -> Result<(), SchemaError> {
    match marks.get(name) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => return Err(SchemaError::UnresolvableCycle(name.to_string())),
        None => {}
    }
    marks.insert(name, Mark::Visiting);

    if let Some(TypeDefinition::Interface { interfaces, .. }) = doc.get(name) {
        for superinterface in interfaces {
            visit(doc, superinterface, marks, order)?;
        }
    }

    marks.insert(name, Mark::Done);
    order.push(name.to_string());
    Ok(())
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
