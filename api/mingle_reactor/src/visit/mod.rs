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
use mingle_model::{Struct, SymbolMap, Value};

/// Feed a value to a reactor as a depth first sequence of events. Scalar values produce a
/// single event; lists, symbol maps and structs are bracketed by a start event and an end
/// event, with each member of a symbol map or struct preceded by a field event.
pub fn visit_value<R>(value: &Value, reactor: &mut R) -> Result<(), ReactorError>
where
    R: Reactor + ?Sized,
{
    match value {
        Value::List(items) => {
            emit(reactor, EventKind::StartList)?;
            for item in items {
                visit_value(item, reactor)?;
            }
        }
        Value::SymbolMap(fields) => {
            emit(reactor, EventKind::StartMap)?;
            visit_fields(fields, reactor)?;
        }
        Value::Struct(Struct { type_name, fields }) => {
            emit(reactor, EventKind::StartStruct(type_name.clone()))?;
            visit_fields(fields, reactor)?;
        }
        scalar => return emit(reactor, EventKind::Value(scalar.clone())),
    }
    emit(reactor, EventKind::End)
}

fn visit_fields<R>(fields: &SymbolMap, reactor: &mut R) -> Result<(), ReactorError>
where
    R: Reactor + ?Sized,
{
    for (name, value) in fields {
        emit(reactor, EventKind::StartField(name.clone()))?;
        visit_value(value, reactor)?;
    }
    Ok(())
}

fn emit<R>(reactor: &mut R, kind: EventKind) -> Result<(), ReactorError>
where
    R: Reactor + ?Sized,
{
    reactor.process_event(ReactorEvent::new(kind))
}
