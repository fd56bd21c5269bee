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

use super::PathSetter;
use crate::tests::{events, field, id, run_processor, start_struct, value};
use crate::{EventKind, ReactorError, ReactorEvent};
use mingle_model::ObjectPath;

#[test]
fn root_scalar() {
    let mut setter = PathSetter::new();
    let (recorder, result) = run_processor(&mut setter, events(vec![value(1)]));
    assert_eq!(result, Ok(()));
    assert_eq!(recorder.events[0].path(), Some(&ObjectPath::root()));
}

#[test]
fn nested_paths() {
    let mut setter = PathSetter::new();
    let input = events(vec![
        start_struct("ns:test@v1/Foo"),
        field("a"),
        EventKind::StartList,
        value(1),
        EventKind::StartMap,
        field("b"),
        value(2),
        EventKind::End,
        EventKind::End,
        field("c"),
        value(3),
        EventKind::End,
    ]);
    let (recorder, result) = run_processor(&mut setter, input);
    assert_eq!(result, Ok(()));
    assert_eq!(
        recorder.paths(),
        vec!["", "a", "a", "a[0]", "a[1]", "a[1].b", "a[1].b", "a[1]", "a", "c", "c", ""]
    );
}

#[test]
fn empty_list_has_no_index() {
    let mut setter = PathSetter::new();
    let input = events(vec![
        EventKind::StartMap,
        field("a"),
        EventKind::StartList,
        EventKind::End,
        EventKind::End,
    ]);
    let (recorder, result) = run_processor(&mut setter, input);
    assert_eq!(result, Ok(()));
    assert_eq!(recorder.paths(), vec!["", "a", "a", "a", ""]);
}

#[test]
fn nested_lists() {
    let mut setter = PathSetter::new();
    let input = events(vec![
        EventKind::StartList,
        EventKind::StartList,
        value(1),
        EventKind::End,
        value(2),
        EventKind::End,
    ]);
    let (recorder, result) = run_processor(&mut setter, input);
    assert_eq!(result, Ok(()));
    assert_eq!(
        recorder.paths(),
        vec!["", "[0]", "[0][0]", "[0]", "[1]", ""]
    );
}

#[test]
fn start_path() {
    let start = ObjectPath::root().descend(id("outer")).index(4);
    let mut setter = PathSetter::with_start_path(start);
    let input = events(vec![EventKind::StartMap, field("a"), value(1), EventKind::End]);
    let (recorder, result) = run_processor(&mut setter, input);
    assert_eq!(result, Ok(()));
    assert_eq!(
        recorder.paths(),
        vec!["outer[4]", "outer[4].a", "outer[4].a", "outer[4]"]
    );
}

#[test]
fn replaces_existing_path() {
    let mut setter = PathSetter::new();
    let input = vec![ReactorEvent::new(value(1)).with_path(ObjectPath::root().descend(id("x")))];
    let (recorder, result) = run_processor(&mut setter, input);
    assert_eq!(result, Ok(()));
    assert_eq!(recorder.paths(), vec![""]);
}

#[test]
fn field_outside_map() {
    let mut setter = PathSetter::new();
    let (_, result) = run_processor(&mut setter, events(vec![EventKind::StartList, field("a")]));
    assert!(matches!(result, Err(ReactorError::Protocol(_))));
}

#[test]
fn unbalanced_end() {
    let mut setter = PathSetter::new();
    let (_, result) = run_processor(&mut setter, events(vec![EventKind::End]));
    assert!(matches!(result, Err(ReactorError::Protocol(_))));
}
