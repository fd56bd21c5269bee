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


use crate::{EventKind, Reactor, ReactorError, ReactorEvent};
use mingle_model::{Identifier, QualifiedTypeName, Struct, SymbolMap, Value};

enum Partial {
    List(Vec<Value>),
    Map(SymbolMap),
    Struct(QualifiedTypeName, SymbolMap),
}

struct Frame {
    partial: Partial,
    field: Option<Identifier>,
}

/// A [`Reactor`] that assembles the events it receives into a [`Value`].
#[derive(Default)]
pub struct ValueBuilder {
    stack: Vec<Frame>,
    result: Option<Value>,
}

impl ValueBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The value that was built, if the stream of events has completed.
    pub fn value(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    pub fn into_value(self) -> Option<Value> {
        self.result
    }

    fn complete(&mut self, value: Value) -> Result<(), ReactorError> {
        match self.stack.last_mut() {
            Some(Frame {
                partial: Partial::List(items),
                ..
            }) => {
                items.push(value);
                Ok(())
            }
            Some(Frame {
                partial: Partial::Map(fields) | Partial::Struct(_, fields),
                field,
            }) => match field.take() {
                Some(name) => {
                    fields.insert(name, value);
                    Ok(())
                }
                None => Err(ReactorError::protocol(
                    "A value was received where a field was expected.",
                )),
            },
            None if self.result.is_none() => {
                self.result = Some(value);
                Ok(())
            }
            None => Err(ReactorError::protocol(
                "A value was received after the value was built.",
            )),
        }
    }

    fn push(&mut self, partial: Partial) {
        self.stack.push(Frame {
            partial,
            field: None,
        });
    }
}

impl Reactor for ValueBuilder {
    fn process_event(&mut self, event: ReactorEvent) -> Result<(), ReactorError> {
        match event.kind {
            EventKind::Value(value) => self.complete(value),
            EventKind::StartList => {
                self.push(Partial::List(vec![]));
                Ok(())
            }
            EventKind::StartMap => {
                self.push(Partial::Map(SymbolMap::new()));
                Ok(())
            }
            EventKind::StartStruct(type_name) => {
                self.push(Partial::Struct(type_name, SymbolMap::new()));
                Ok(())
            }
            EventKind::StartField(name) => match self.stack.last_mut() {
                Some(Frame {
                    partial: Partial::Map(_) | Partial::Struct(..),
                    field: field @ None,
                }) => {
                    *field = Some(name);
                    Ok(())
                }
                _ => Err(ReactorError::protocol(format!(
                    "Unexpected field '{}'.",
                    name
                ))),
            },
            EventKind::End => {
                let value = match self.stack.pop() {
                    Some(Frame {
                        partial: Partial::List(items),
                        ..
                    }) => Value::List(items),
                    Some(Frame {
                        partial: Partial::Map(fields),
                        ..
                    }) => Value::SymbolMap(fields),
                    Some(Frame {
                        partial: Partial::Struct(type_name, fields),
                        ..
                    }) => Value::Struct(Struct { type_name, fields }),
                    None => return Err(ReactorError::protocol("Unexpected end.")),
                };
                self.complete(value)
            }
        }
    }
}
