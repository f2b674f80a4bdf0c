//! Shared test fixture: a small purchase-order schema exercising every kind —
//! scalars, an enum, an interface with two implementers, a union, mutually
//! recursive objects (`Order` ⇄ `Customer`), and an input object.

use serde_json::{Value, json};

use crate::introspection;
use crate::schema::{ScalarMapping, SchemaDocument};

pub fn introspection_json() -> Value {
    json!({
        "__schema": {
            "types": [
                { "kind": "SCALAR", "name": "ID" },
                { "kind": "SCALAR", "name": "String" },
                {
                    "kind": "ENUM",
                    "name": "OrderStatus",
                    "enumValues": [
                        { "name": "OPEN" },
                        { "name": "FULFILLED" },
                        { "name": "CANCELLED" }
                    ]
                },
                {
                    "kind": "INTERFACE",
                    "name": "PurchasingEntity",
                    "fields": [
                        { "name": "id", "type": non_null(named("SCALAR", "ID")) }
                    ],
                    "interfaces": [],
                    "possibleTypes": [
                        { "kind": "OBJECT", "name": "PurchasingCompany" },
                        { "kind": "OBJECT", "name": "PurchasingIndividual" }
                    ]
                },
                {
                    "kind": "OBJECT",
                    "name": "CompanyContact",
                    "fields": [
                        { "name": "id", "type": non_null(named("SCALAR", "ID")) },
                        { "name": "email", "type": named("SCALAR", "String") }
                    ],
                    "interfaces": []
                },
                {
                    "kind": "OBJECT",
                    "name": "PurchasingCompany",
                    "fields": [
                        { "name": "id", "type": non_null(named("SCALAR", "ID")) },
                        { "name": "contact", "type": non_null(named("OBJECT", "CompanyContact")) }
                    ],
                    "interfaces": [ { "kind": "INTERFACE", "name": "PurchasingEntity" } ]
                },
                {
                    "kind": "OBJECT",
                    "name": "PurchasingIndividual",
                    "fields": [
                        { "name": "id", "type": non_null(named("SCALAR", "ID")) },
                        { "name": "fullName", "type": named("SCALAR", "String") }
                    ],
                    "interfaces": [ { "kind": "INTERFACE", "name": "PurchasingEntity" } ]
                },
                {
                    "kind": "OBJECT",
                    "name": "Customer",
                    "fields": [
                        { "name": "id", "type": non_null(named("SCALAR", "ID")) },
                        { "name": "orders", "type": list(non_null(named("OBJECT", "Order"))) },
                        { "name": "nicknames", "type": list(named("SCALAR", "String")) }
                    ],
                    "interfaces": []
                },
                {
                    "kind": "UNION",
                    "name": "SearchResult",
                    "possibleTypes": [
                        { "kind": "OBJECT", "name": "Customer" },
                        { "kind": "OBJECT", "name": "PurchasingCompany" }
                    ]
                },
                {
                    "kind": "OBJECT",
                    "name": "SearchPage",
                    "fields": [
                        { "name": "results", "type": non_null(list(non_null(named("UNION", "SearchResult")))) }
                    ],
                    "interfaces": []
                },
                {
                    "kind": "OBJECT",
                    "name": "Order",
                    "fields": [
                        { "name": "id", "type": non_null(named("SCALAR", "ID")) },
                        { "name": "customer", "type": non_null(named("OBJECT", "Customer")) },
                        { "name": "purchasingEntity", "type": non_null(named("INTERFACE", "PurchasingEntity")) },
                        { "name": "status", "type": named("ENUM", "OrderStatus") },
                        { "name": "tags", "type": list(non_null(named("SCALAR", "String"))) }
                    ],
                    "interfaces": []
                },
                {
                    "kind": "INPUT_OBJECT",
                    "name": "OrderFilter",
                    "inputFields": [
                        { "name": "status", "type": named("ENUM", "OrderStatus") },
                        { "name": "ids", "type": list(non_null(named("SCALAR", "ID"))) }
                    ]
                }
            ]
        }
    })
}

pub fn purchase_document() -> SchemaDocument {
    introspection::load(&introspection_json().to_string()).expect("fixture schema loads")
}

pub fn scalar_mapping() -> ScalarMapping {
    ScalarMapping::from_iter([
        ("ID".to_string(), "String".to_string()),
        ("String".to_string(), "String".to_string()),
    ])
}

fn named(kind: &str, name: &str) -> Value {
    json!({ "kind": kind, "name": name })
}

fn non_null(of_type: Value) -> Value {
    json!({ "kind": "NON_NULL", "ofType": of_type })
}

fn list(of_type: Value) -> Value {
    json!({ "kind": "LIST", "ofType": of_type })
}
