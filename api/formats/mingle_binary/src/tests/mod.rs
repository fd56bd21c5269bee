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

use crate::{BinReader, BinWriter};
use chrono::{TimeZone, Utc};
use mingle_model::{BuiltinType, Enum, QualifiedTypeName, Struct, SymbolMap, TypeReference, Value};
use mingle_reactor::schema::{DefinitionMap, FieldDefinition, StructDefinition};
use mingle_reactor::{
    CastProcessor, FieldOrderProcessor, PathSetter, Pipeline, Processor, StructuralCheck,
    TopType, TracingProcessor, ValueBuilder,
};
use std::sync::Arc;

fn foo_type() -> QualifiedTypeName {
    "ns:test@v1/Foo".parse().unwrap()
}

fn foo() -> Value {
    let mut fields = SymbolMap::new();
    fields.insert("name".parse().unwrap(), Value::text("x"));
    fields.insert("count".parse().unwrap(), Value::Int32(3));
    Value::Struct(Struct {
        type_name: foo_type(),
        fields,
    })
}

fn schema() -> DefinitionMap {
    DefinitionMap::new().with(StructDefinition {
        name: foo_type(),
        super_type: None,
        fields: vec![
            FieldDefinition::new("name".parse().unwrap(), BuiltinType::String.type_ref()),
            FieldDefinition::new("count".parse().unwrap(), BuiltinType::Int32.type_ref()),
        ],
    })
}

fn encode(value: &Value) -> Vec<u8> {
    let mut bytes = vec![];
    let mut writer = BinWriter::new(&mut bytes);
    writer.write_value(value).expect("Encoding failed.");
    bytes
}

#[test]
fn encode_decode_reencode() {
    let value = foo();
    let bytes = encode(&value);

    let mut reader = BinReader::new(bytes.as_slice());
    let decoded = reader.read_value().expect("Decoding failed.");
    assert!(!reader.has_remaining());
    assert_eq!(decoded, value);

    assert_eq!(encode(&decoded), bytes);
}

#[test]
fn decode_through_cast_pipeline() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();

    let bytes = encode(&foo());
    let schema = Arc::new(schema());
    let orders = schema.clone();
    let processors: Vec<Box<dyn Processor>> = vec![
        Box::new(StructuralCheck::new(TopType::Struct)),
        Box::new(PathSetter::new()),
        Box::new(TracingProcessor::default()),
        Box::new(FieldOrderProcessor::new(move |name: &QualifiedTypeName| {
            mingle_reactor::OrderGetter::field_order_for(orders.as_ref(), name)
        })),
        Box::new(CastProcessor::new(TypeReference::atomic(foo_type()), schema)),
    ];
    let mut pipeline = Pipeline::new(processors, ValueBuilder::new()).expect("No processors.");

    let mut reader = BinReader::new(bytes.as_slice());
    reader
        .read_reactor_value(&mut pipeline)
        .expect("Pipeline failed.");
    assert_eq!(pipeline.into_terminal().into_value(), Some(foo()));
}

#[test]
fn all_scalars() {
    let color: QualifiedTypeName = "ns:test@v1/Color".parse().unwrap();
    let values = vec![
        Value::Null,
        Value::Boolean(true),
        Value::Int32(i32::MIN),
        Value::Int64(i64::MAX),
        Value::Uint32(u32::MAX),
        Value::Uint64(u64::MAX),
        Value::Float32(1.25),
        Value::Float64(-0.5),
        Value::text("héllo"),
        Value::Buffer(vec![0, 1, 255]),
        Value::Timestamp(
            Utc.with_ymd_and_hms(1969, 7, 20, 20, 17, 40).single().unwrap()
                + chrono::Duration::nanoseconds(123_456_789),
        ),
        Value::Enum(Enum {
            type_name: color,
            value: "dark-red".parse().unwrap(),
        }),
    ];
    let list = Value::List(values);
    let bytes = encode(&list);
    let decoded = BinReader::new(bytes.as_slice())
        .read_value()
        .expect("Decoding failed.");
    assert_eq!(decoded, list);
}
