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

use mingle_model::{Identifier, ObjectPath, QualifiedTypeName, Value};
use std::fmt::{Display, Formatter};

/// The structural events that make up a value. A scalar value is a single [`EventKind::Value`]
/// event. Lists are bracketed by [`EventKind::StartList`] and [`EventKind::End`] with the
/// events for each element between them. Symbol maps and structs are bracketed in the same way
/// and each of their members is introduced by a [`EventKind::StartField`] event, followed by
/// the events of its value.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Value(Value),
    StartList,
    StartMap,
    StartStruct(QualifiedTypeName),
    StartField(Identifier),
    End,
}

impl EventKind {
    /// Whether this event begins a value (either a scalar or a container).
    pub fn is_value_start(&self) -> bool {
        matches!(
            self,
            EventKind::Value(_)
                | EventKind::StartList
                | EventKind::StartMap
                | EventKind::StartStruct(_)
        )
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Value(value) => write!(f, "value {}", value),
            EventKind::StartList => f.write_str("start of list"),
            EventKind::StartMap => f.write_str("start of symbol map"),
            EventKind::StartStruct(name) => write!(f, "start of struct {}", name),
            EventKind::StartField(name) => write!(f, "field '{}'", name),
            EventKind::End => f.write_str("end"),
        }
    }
}

/// A single event, optionally annotated with its location in the logical tree. Events are
/// owned by the stage processing them so a stage that needs to retain an event (for example, to
/// replay it later) may simply keep it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactorEvent {
    pub kind: EventKind,
    pub path: Option<ObjectPath>,
}

impl ReactorEvent {
    pub fn new(kind: EventKind) -> Self {
        ReactorEvent { kind, path: None }
    }

    pub fn with_path(self, path: ObjectPath) -> Self {
        ReactorEvent {
            path: Some(path),
            ..self
        }
    }

    pub fn path(&self) -> Option<&ObjectPath> {
        self.path.as_ref()
    }

    /// The path of the event or the root path if it has not been set.
    pub fn path_or_root(&self) -> ObjectPath {
        self.path.clone().unwrap_or_default()
    }

    pub fn value(&self) -> Option<&Value> {
        match &self.kind {
            EventKind::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn field(&self) -> Option<&Identifier> {
        match &self.kind {
            EventKind::StartField(name) => Some(name),
            _ => None,
        }
    }

    pub fn struct_type(&self) -> Option<&QualifiedTypeName> {
        match &self.kind {
            EventKind::StartStruct(name) => Some(name),
            _ => None,
        }
    }
}

impl From<EventKind> for ReactorEvent {
    fn from(kind: EventKind) -> Self {
        ReactorEvent::new(kind)
    }
}

impl From<Value> for ReactorEvent {
    fn from(value: Value) -> Self {
        ReactorEvent::new(EventKind::Value(value))
    }
}
