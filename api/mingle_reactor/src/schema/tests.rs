// Copyright 2015-2024 Swim Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::{
    DefinitionMap, EnumDefinition, FieldDefinition, StructDefinition, TypeDefinition,
    TypeDefinitionLookup,
};
use crate::cast::cast_value;
use crate::order::{FieldSpecification, OrderGetter};
use crate::{CastDelegate, ReactorError, ValueError};
use crate::tests::{id, qn};
use mingle_model::{BuiltinType, Enum, Struct, SymbolMap, TypeReference, Value};

fn schema() -> DefinitionMap {
    DefinitionMap::new()
        .with(StructDefinition {
            name: qn("ns:test@v1/Base"),
            super_type: None,
            fields: vec![FieldDefinition::new(
                id("id"),
                BuiltinType::Int64.type_ref(),
            )],
        })
        .with(StructDefinition {
            name: qn("ns:test@v1/Item"),
            super_type: Some(qn("ns:test@v1/Base")),
            fields: vec![
                FieldDefinition::new(id("color"), TypeReference::atomic(qn("ns:test@v1/Color"))),
                FieldDefinition::new(
                    id("label"),
                    TypeReference::nullable(BuiltinType::String.type_ref()),
                ),
            ],
        })
        .with(EnumDefinition {
            name: qn("ns:test@v1/Color"),
            values: vec![id("red"), id("green")],
        })
}

fn item(fields: Vec<(&str, Value)>) -> Value {
    Value::Struct(Struct {
        type_name: qn("ns:test@v1/Item"),
        fields: fields
            .into_iter()
            .map(|(name, value)| (id(name), value))
            .collect(),
    })
}

fn red() -> Value {
    Value::Enum(Enum {
        type_name: qn("ns:test@v1/Color"),
        value: id("red"),
    })
}

#[test]
fn lookup() {
    let schema = schema();
    assert_eq!(schema.len(), 3);
    assert!(matches!(
        schema.get(&qn("ns:test@v1/Color")),
        Some(TypeDefinition::Enum(_))
    ));
    assert!(schema.get(&qn("ns:test@v1/Other")).is_none());
    match schema.expect_type(&qn("ns:test@v1/Other")) {
        Err(ReactorError::Value(ValueError::UnknownType { name, .. })) => {
            assert_eq!(name, qn("ns:test@v1/Other"));
        }
        ow => panic!("Unexpected result: {:?}", ow),
    }
}

#[test]
fn field_order_includes_inherited_fields() {
    let order = schema()
        .field_order_for(&qn("ns:test@v1/Item"))
        .expect("No order.");
    assert_eq!(
        order.fields(),
        &[
            FieldSpecification::required(id("id")),
            FieldSpecification::required(id("color")),
            FieldSpecification::optional(id("label")),
        ]
    );
    assert!(schema().field_order_for(&qn("ns:test@v1/Color")).is_none());
}

#[test]
fn assignability() {
    let schema = schema();
    let item = qn("ns:test@v1/Item");
    let base = qn("ns:test@v1/Base");
    assert!(schema.is_assignable(&item, &item));
    assert!(schema.is_assignable(&item, &base));
    assert!(!schema.is_assignable(&base, &item));
}

#[test]
fn cyclic_super_types() {
    let schema = DefinitionMap::new()
        .with(StructDefinition {
            name: qn("ns:test@v1/A"),
            super_type: Some(qn("ns:test@v1/B")),
            fields: vec![],
        })
        .with(StructDefinition {
            name: qn("ns:test@v1/B"),
            super_type: Some(qn("ns:test@v1/A")),
            fields: vec![],
        });
    assert!(!schema.is_assignable(&qn("ns:test@v1/A"), &qn("ns:test@v1/C")));
}

#[test]
fn cast_struct_with_enum_field() {
    let input = item(vec![("id", Value::Int32(1)), ("color", Value::text("red"))]);
    let expected = item(vec![("id", Value::Int64(1)), ("color", red())]);
    assert_eq!(
        cast_value(&input, TypeReference::atomic(qn("ns:test@v1/Item")), schema()),
        Ok(expected)
    );
}

#[test]
fn cast_sub_type_to_super_type() {
    let input = item(vec![("id", Value::Int64(1)), ("color", red())]);
    assert_eq!(
        cast_value(&input, TypeReference::atomic(qn("ns:test@v1/Base")), schema()),
        Ok(input)
    );
}

#[test]
fn invalid_enum_constant() {
    let input = item(vec![("id", Value::Int64(1)), ("color", Value::text("blue"))]);
    let err = cast_value(&input, TypeReference::atomic(qn("ns:test@v1/Item")), schema())
        .expect_err("Cast should fail.");
    assert_eq!(
        err.to_string(),
        "color: Invalid ns:test@v1/Color constant: \"blue\""
    );
}

#[test]
fn unrecognized_field() {
    let input = item(vec![("id", Value::Int64(1)), ("size", Value::Int32(2))]);
    match cast_value(&input, TypeReference::atomic(qn("ns:test@v1/Item")), schema()) {
        Err(ReactorError::Value(ValueError::UnrecognizedField { field, .. })) => {
            assert_eq!(field, id("size"));
        }
        ow => panic!("Unexpected result: {:?}", ow),
    }
}

#[test]
fn unknown_struct_type() {
    let input = Value::Struct(Struct {
        type_name: qn("ns:test@v1/Mystery"),
        fields: SymbolMap::new(),
    });
    let target = TypeReference::atomic(qn("ns:test@v1/Mystery"));
    match cast_value(&input, target, schema()) {
        Err(ReactorError::Value(ValueError::UnknownType { name, .. })) => {
            assert_eq!(name, qn("ns:test@v1/Mystery"));
        }
        ow => panic!("Unexpected result: {:?}", ow),
    }
}

#[test]
fn unknown_struct_under_value_is_unconstrained() {
    let mut fields = SymbolMap::new();
    fields.insert(id("anything"), Value::text("x"));
    let input = Value::Struct(Struct {
        type_name: qn("ns:test@v1/Mystery"),
        fields,
    });
    assert_eq!(
        cast_value(&input, BuiltinType::Value.type_ref(), schema()),
        Ok(input.clone())
    );

    let nested = Value::from_vec(vec![input.clone()]);
    assert_eq!(
        cast_value(&nested, BuiltinType::Value.type_ref(), schema()),
        Ok(nested)
    );
}

#[test]
fn symbol_map_fields_are_untyped() {
    let mut fields = SymbolMap::new();
    fields.insert(id("anything"), Value::text("x"));
    let input = Value::SymbolMap(fields);
    assert_eq!(
        cast_value(&input, BuiltinType::SymbolMap.type_ref(), schema()),
        Ok(input)
    );
}
