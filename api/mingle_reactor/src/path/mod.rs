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

use crate::{EventKind, Processor, Reactor, ReactorError, ReactorEvent};
use mingle_model::ObjectPath;

enum Container {
    List { path: ObjectPath, next_index: usize },
    Map { path: ObjectPath },
    Field { path: ObjectPath },
}

/// A [`Processor`] that stamps each event with its location in the logical tree before
/// forwarding it. Container start and end events carry the path of the container, field
/// events carry the path of the field and each list element is assigned its index when it
/// starts (so an empty list never introduces an index).
///
/// Any path already attached to an incoming event is replaced.
pub struct PathSetter {
    start: ObjectPath,
    stack: Vec<Container>,
}

impl Default for PathSetter {
    fn default() -> Self {
        PathSetter::new()
    }
}

impl PathSetter {
    pub fn new() -> Self {
        PathSetter::with_start_path(ObjectPath::root())
    }

    /// Create a path setter for a stream that describes a value part way through a larger
    /// tree. All paths will be relative to the start path.
    pub fn with_start_path(start: ObjectPath) -> Self {
        PathSetter {
            start,
            stack: vec![],
        }
    }

    fn value_path(&mut self) -> ObjectPath {
        if matches!(self.stack.last(), Some(Container::Field { .. })) {
            if let Some(Container::Field { path }) = self.stack.pop() {
                return path;
            }
        }
        match self.stack.last_mut() {
            Some(Container::List { path, next_index }) => {
                let element_path = path.index(*next_index);
                *next_index += 1;
                element_path
            }
            _ => self.start.clone(),
        }
    }

    fn path_for(&mut self, kind: &EventKind) -> Result<ObjectPath, ReactorError> {
        match kind {
            EventKind::Value(_) => Ok(self.value_path()),
            EventKind::StartList => {
                let path = self.value_path();
                self.stack.push(Container::List {
                    path: path.clone(),
                    next_index: 0,
                });
                Ok(path)
            }
            EventKind::StartMap | EventKind::StartStruct(_) => {
                let path = self.value_path();
                self.stack.push(Container::Map { path: path.clone() });
                Ok(path)
            }
            EventKind::StartField(name) => match self.stack.last() {
                Some(Container::Map { path }) => {
                    let path = path.descend(name.clone());
                    self.stack.push(Container::Field { path: path.clone() });
                    Ok(path)
                }
                _ => Err(ReactorError::protocol(format!(
                    "Cannot set the path of {} outside of a symbol map or struct.",
                    kind
                ))),
            },
            EventKind::End => match self.stack.pop() {
                Some(Container::List { path, .. }) | Some(Container::Map { path }) => Ok(path),
                _ => Err(ReactorError::protocol(
                    "Cannot set the path of an end event outside of a container.",
                )),
            },
        }
    }
}

impl Processor for PathSetter {
    fn process_event(
        &mut self,
        event: ReactorEvent,
        next: &mut dyn Reactor,
    ) -> Result<(), ReactorError> {
        let path = self.path_for(&event.kind)?;
        next.process_event(event.with_path(path))
    }
}

#[cfg(test)]
mod tests;
