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

use super::{FieldOrder, FieldOrderProcessor, FieldSpecification};
use crate::tests::{events, field, id, qn, run_processor, start_struct, value};
use crate::{EventKind, ReactorError, ValueError};
use mingle_model::QualifiedTypeName;

const FOO: &str = "ns:test@v1/Foo";
const BAR: &str = "ns:test@v1/Bar";

fn orders(name: &QualifiedTypeName) -> Option<FieldOrder> {
    if name == &qn(FOO) {
        Some(FieldOrder::new(vec![
            FieldSpecification::required(id("a")),
            FieldSpecification::required(id("b")),
            FieldSpecification::optional(id("c")),
        ]))
    } else if name == &qn(BAR) {
        Some(FieldOrder::new(vec![
            FieldSpecification::required(id("x")),
            FieldSpecification::required(id("y")),
        ]))
    } else {
        None
    }
}

fn reorder(input: Vec<EventKind>) -> (Vec<EventKind>, Result<(), ReactorError>) {
    let mut processor = FieldOrderProcessor::new(orders);
    let (recorder, result) = run_processor(&mut processor, events(input));
    (recorder.kinds(), result)
}

#[test]
fn already_ordered() {
    let input = vec![
        start_struct(FOO),
        field("a"),
        value(1),
        field("b"),
        value(2),
        field("c"),
        value(3),
        EventKind::End,
    ];
    let (output, result) = reorder(input.clone());
    assert_eq!(result, Ok(()));
    assert_eq!(output, input);
}

#[test]
fn reorder_fields() {
    let input = vec![
        start_struct(FOO),
        field("c"),
        value(3),
        field("a"),
        value(1),
        field("b"),
        value(2),
        EventKind::End,
    ];
    let (output, result) = reorder(input);
    assert_eq!(result, Ok(()));
    assert_eq!(
        output,
        vec![
            start_struct(FOO),
            field("a"),
            value(1),
            field("b"),
            value(2),
            field("c"),
            value(3),
            EventKind::End,
        ]
    );
}

#[test]
fn optional_field_absent() {
    let input = vec![
        start_struct(FOO),
        field("b"),
        value(2),
        field("a"),
        value(1),
        EventKind::End,
    ];
    let (output, result) = reorder(input);
    assert_eq!(result, Ok(()));
    assert_eq!(
        output,
        vec![
            start_struct(FOO),
            field("a"),
            value(1),
            field("b"),
            value(2),
            EventKind::End,
        ]
    );
}

#[test]
fn missing_required_field() {
    let input = vec![
        start_struct(FOO),
        field("a"),
        value(1),
        field("c"),
        value(3),
        EventKind::End,
    ];
    let (output, result) = reorder(input);
    match result {
        Err(ReactorError::Value(ValueError::MissingFields { fields, .. })) => {
            assert_eq!(fields, vec![id("b")]);
        }
        ow => panic!("Unexpected result: {:?}", ow),
    }
    assert_eq!(
        output,
        vec![start_struct(FOO), field("a"), value(1), field("c"), value(3)]
    );
}

#[test]
fn missing_fields_are_sorted() {
    let input = vec![start_struct(FOO), field("c"), value(3), EventKind::End];
    let (_, result) = reorder(input);
    let err = result.expect_err("Fields should be missing.");
    assert_eq!(err.to_string(), "Missing fields: a, b.");
}

#[test]
fn unknown_fields_pass_through() {
    let input = vec![
        start_struct(FOO),
        field("z"),
        value(0),
        field("b"),
        value(2),
        field("a"),
        value(1),
        EventKind::End,
    ];
    let (output, result) = reorder(input);
    assert_eq!(result, Ok(()));
    assert_eq!(
        output,
        vec![
            start_struct(FOO),
            field("z"),
            value(0),
            field("a"),
            value(1),
            field("b"),
            value(2),
            EventKind::End,
        ]
    );
}

#[test]
fn unordered_struct_passes_through() {
    let input = vec![
        start_struct("ns:test@v1/Baz"),
        field("b"),
        value(2),
        field("a"),
        value(1),
        EventKind::End,
    ];
    let (output, result) = reorder(input.clone());
    assert_eq!(result, Ok(()));
    assert_eq!(output, input);
}

#[test]
fn buffered_container_value() {
    let input = vec![
        start_struct(FOO),
        field("b"),
        EventKind::StartList,
        value(1),
        EventKind::StartMap,
        field("q"),
        value(2),
        EventKind::End,
        EventKind::End,
        field("a"),
        value(0),
        EventKind::End,
    ];
    let (output, result) = reorder(input);
    assert_eq!(result, Ok(()));
    assert_eq!(
        output,
        vec![
            start_struct(FOO),
            field("a"),
            value(0),
            field("b"),
            EventKind::StartList,
            value(1),
            EventKind::StartMap,
            field("q"),
            value(2),
            EventKind::End,
            EventKind::End,
            EventKind::End,
        ]
    );
}

#[test]
fn nested_struct_reordered_when_emitted() {
    let input = vec![
        start_struct(FOO),
        field("b"),
        start_struct(BAR),
        field("y"),
        value(2),
        field("x"),
        value(1),
        EventKind::End,
        field("a"),
        value(0),
        EventKind::End,
    ];
    let (output, result) = reorder(input);
    assert_eq!(result, Ok(()));
    assert_eq!(
        output,
        vec![
            start_struct(FOO),
            field("a"),
            value(0),
            field("b"),
            start_struct(BAR),
            field("x"),
            value(1),
            field("y"),
            value(2),
            EventKind::End,
            EventKind::End,
        ]
    );
}

#[test]
fn nested_struct_in_forwarded_field() {
    let input = vec![
        start_struct(FOO),
        field("a"),
        start_struct(BAR),
        field("y"),
        value(2),
        field("x"),
        value(1),
        EventKind::End,
        field("b"),
        value(0),
        EventKind::End,
    ];
    let (output, result) = reorder(input);
    assert_eq!(result, Ok(()));
    assert_eq!(
        output,
        vec![
            start_struct(FOO),
            field("a"),
            start_struct(BAR),
            field("x"),
            value(1),
            field("y"),
            value(2),
            EventKind::End,
            field("b"),
            value(0),
            EventKind::End,
        ]
    );
}

#[test]
fn struct_in_list() {
    let input = vec![
        EventKind::StartList,
        start_struct(BAR),
        field("y"),
        value(2),
        field("x"),
        value(1),
        EventKind::End,
        value(3),
        EventKind::End,
    ];
    let (output, result) = reorder(input);
    assert_eq!(result, Ok(()));
    assert_eq!(
        output,
        vec![
            EventKind::StartList,
            start_struct(BAR),
            field("x"),
            value(1),
            field("y"),
            value(2),
            EventKind::End,
            value(3),
            EventKind::End,
        ]
    );
}

#[test]
fn empty_order_passes_through() {
    let mut processor =
        FieldOrderProcessor::new(|_: &QualifiedTypeName| Some(FieldOrder::default()));
    let input = vec![start_struct(FOO), field("b"), value(2), EventKind::End];
    let (recorder, result) = run_processor(&mut processor, events(input.clone()));
    assert_eq!(result, Ok(()));
    assert_eq!(recorder.kinds(), input);
}
