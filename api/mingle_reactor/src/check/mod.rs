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

use crate::{EventKind, ProtocolError, Processor, Reactor, ReactorError, ReactorEvent};
use mingle_model::Identifier;
use std::collections::HashSet;

/// The kind of value that a [`StructuralCheck`] permits at the top level of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopType {
    /// Any value, scalar or container.
    #[default]
    Value,
    List,
    Map,
    Struct,
}

impl TopType {
    fn admits(&self, kind: &EventKind) -> bool {
        match self {
            TopType::Value => kind.is_value_start(),
            TopType::List => matches!(kind, EventKind::StartList),
            TopType::Map => matches!(kind, EventKind::StartMap),
            TopType::Struct => matches!(kind, EventKind::StartStruct(_)),
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            TopType::Value => "a value",
            TopType::List => "start of list",
            TopType::Map => "start of symbol map",
            TopType::Struct => "start of struct",
        }
    }
}

enum Frame {
    List,
    Field(Identifier),
    Map(HashSet<Identifier>),
}

impl Frame {
    fn describe(&self) -> String {
        match self {
            Frame::List => "a list value or end".to_string(),
            Frame::Field(name) => format!("a value for field '{}'", name),
            Frame::Map(_) => "a field or end".to_string(),
        }
    }
}

/// A pass-through [`Processor`] that verifies that the events it receives form a single,
/// well formed value: containers are ended exactly once, fields only occur directly within
/// symbol maps and structs (and not more than once in each) and values only occur where they
/// are expected. Violations are reported as [`ProtocolError`]s.
pub struct StructuralCheck {
    top: TopType,
    stack: Vec<Frame>,
    done: bool,
}

impl Default for StructuralCheck {
    fn default() -> Self {
        StructuralCheck::new(TopType::Value)
    }
}

impl StructuralCheck {
    pub fn new(top: TopType) -> Self {
        StructuralCheck {
            top,
            stack: vec![],
            done: false,
        }
    }

    fn expecting(&self) -> String {
        match self.stack.last() {
            Some(frame) => frame.describe(),
            None => self.top.describe().to_string(),
        }
    }

    fn unexpected(&self, kind: &EventKind) -> ProtocolError {
        ProtocolError::new(format!("Saw {} while expecting {}.", kind, self.expecting()))
    }

    fn complete_value(&mut self) {
        if self.stack.is_empty() {
            self.done = true;
        }
    }

    fn check_value_start(&mut self, kind: &EventKind) -> Result<(), ProtocolError> {
        match self.stack.last() {
            None if !self.top.admits(kind) => return Err(self.unexpected(kind)),
            Some(Frame::Map(_)) => return Err(self.unexpected(kind)),
            Some(Frame::Field(_)) => {
                self.stack.pop();
            }
            _ => {}
        }
        match kind {
            EventKind::StartList => self.stack.push(Frame::List),
            EventKind::StartMap | EventKind::StartStruct(_) => {
                self.stack.push(Frame::Map(HashSet::new()))
            }
            _ => self.complete_value(),
        }
        Ok(())
    }

    fn check_field(&mut self, kind: &EventKind, name: &Identifier) -> Result<(), ProtocolError> {
        if let Some(Frame::Map(seen)) = self.stack.last_mut() {
            if seen.insert(name.clone()) {
                self.stack.push(Frame::Field(name.clone()));
                Ok(())
            } else {
                Err(ProtocolError::new(format!(
                    "Invalid fields: Multiple entries for key: {}.",
                    name
                )))
            }
        } else {
            Err(self.unexpected(kind))
        }
    }

    fn check_end(&mut self, kind: &EventKind) -> Result<(), ProtocolError> {
        match self.stack.last() {
            Some(Frame::List) | Some(Frame::Map(_)) => {
                self.stack.pop();
                self.complete_value();
                Ok(())
            }
            _ => Err(self.unexpected(kind)),
        }
    }

    /// Check the next event in the stream.
    pub fn check(&mut self, kind: &EventKind) -> Result<(), ProtocolError> {
        if self.done {
            return Err(ProtocolError::new(format!(
                "Saw {} after value was built.",
                kind
            )));
        }
        match kind {
            EventKind::StartField(name) => self.check_field(kind, name),
            EventKind::End => self.check_end(kind),
            _ => self.check_value_start(kind),
        }
    }

    /// Whether a complete value has been seen.
    pub fn is_complete(&self) -> bool {
        self.done
    }
}

impl Processor for StructuralCheck {
    fn process_event(
        &mut self,
        event: ReactorEvent,
        next: &mut dyn Reactor,
    ) -> Result<(), ReactorError> {
        self.check(&event.kind)?;
        next.process_event(event)
    }
}
