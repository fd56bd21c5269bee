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

//! Validation and coercion of event streams against expected types.

mod atomic;

pub use atomic::cast_atomic;

use crate::builder::ValueBuilder;
use crate::pipeline::Pipeline;
use crate::visit::visit_value;
use crate::{
    EventKind, PathSetter, Processor, Reactor, ReactorError, ReactorEvent, StructuralCheck,
    TopType, ValueError,
};
use mingle_model::{
    AtomicTypeReference, BuiltinType, Identifier, ListTypeReference, ObjectPath,
    QualifiedTypeName, TypeReference, Value,
};
use std::sync::Arc;
use tracing::debug;

/// Supplies the expected types of the fields of a symbol map or struct.
pub trait FieldTyper {
    fn field_type_for(
        &mut self,
        field: &Identifier,
        path: &ObjectPath,
    ) -> Result<TypeReference, ReactorError>;
}

/// A [`FieldTyper`] that admits any value for any field.
#[derive(Debug, Default, Clone, Copy)]
pub struct ValueFieldTyper;

impl FieldTyper for ValueFieldTyper {
    fn field_type_for(
        &mut self,
        _field: &Identifier,
        _path: &ObjectPath,
    ) -> Result<TypeReference, ReactorError> {
        Ok(BuiltinType::Value.type_ref())
    }
}

/// Schema dependent decisions made by a [`CastProcessor`].
pub trait CastDelegate {
    /// Provide the field typer for a symbol map (where `type_name` is absent) or a struct.
    fn field_typer_for(
        &self,
        type_name: Option<&QualifiedTypeName>,
        path: &ObjectPath,
    ) -> Result<Box<dyn FieldTyper>, ReactorError>;

    /// Attempt to cast a value to a type that is not built in. Returning nothing indicates
    /// that the value is not of the type.
    fn cast_atomic(
        &self,
        _value: &Value,
        _target: &AtomicTypeReference,
        _path: &ObjectPath,
    ) -> Option<Result<Value, ReactorError>> {
        None
    }

    /// Whether a struct of type `actual` may be used where a value of type `expected` is
    /// required.
    fn is_assignable(&self, actual: &QualifiedTypeName, expected: &QualifiedTypeName) -> bool {
        actual == expected
    }
}

impl<D: CastDelegate + ?Sized> CastDelegate for Arc<D> {
    fn field_typer_for(
        &self,
        type_name: Option<&QualifiedTypeName>,
        path: &ObjectPath,
    ) -> Result<Box<dyn FieldTyper>, ReactorError> {
        (**self).field_typer_for(type_name, path)
    }

    fn cast_atomic(
        &self,
        value: &Value,
        target: &AtomicTypeReference,
        path: &ObjectPath,
    ) -> Option<Result<Value, ReactorError>> {
        (**self).cast_atomic(value, target, path)
    }

    fn is_assignable(&self, actual: &QualifiedTypeName, expected: &QualifiedTypeName) -> bool {
        (**self).is_assignable(actual, expected)
    }
}

/// A [`CastDelegate`] with no knowledge of any types beyond the built in types. The fields of
/// all maps and structs are typed as `Value`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultCastDelegate;

impl CastDelegate for DefaultCastDelegate {
    fn field_typer_for(
        &self,
        _type_name: Option<&QualifiedTypeName>,
        _path: &ObjectPath,
    ) -> Result<Box<dyn FieldTyper>, ReactorError> {
        Ok(Box::new(ValueFieldTyper))
    }
}

struct ListCast {
    list_type: TypeReference,
    element: TypeReference,
    allows_empty: bool,
    seen: bool,
}

enum Frame {
    /// The type of the next value.
    Expect(TypeReference),
    /// Within a symbol map or struct.
    Fields(Box<dyn FieldTyper>),
    /// Within a list.
    List(ListCast),
}

/// Strip nullable and pointer wrappers from a type (these do not affect how containers are
/// cast).
fn unwrap_type(typ: &TypeReference) -> &TypeReference {
    match typ {
        TypeReference::Nullable(inner) | TypeReference::Pointer(inner) => unwrap_type(inner),
        _ => typ,
    }
}

fn mismatch(path: &ObjectPath, expected: &TypeReference, actual: TypeReference) -> ReactorError {
    let err = ValueError::TypeMismatch {
        path: path.clone(),
        expected: expected.clone(),
        actual,
    };
    debug!(error = %err, "Cast failed.");
    err.into()
}

/// A [`Processor`] that checks each value in the stream against its expected type, starting
/// from a single target type for the root value. Scalar values are coerced where the target
/// type permits it (see [`cast_atomic`]) and the coerced value is forwarded in place of the
/// original. The expected types of the members of containers are derived from the list type
/// or, for symbol maps and structs, from the [`FieldTyper`] provided by the [`CastDelegate`].
///
/// Structs cast to `SymbolMap` are forwarded as symbol maps.
pub struct CastProcessor<D> {
    delegate: D,
    stack: Vec<Frame>,
}

impl<D: CastDelegate> CastProcessor<D> {
    pub fn new(target: TypeReference, delegate: D) -> Self {
        CastProcessor {
            delegate,
            stack: vec![Frame::Expect(target)],
        }
    }

    /// The type expected for the next value (scalar or container).
    fn next_expected(&mut self, what: &str) -> Result<TypeReference, ReactorError> {
        match self.stack.last_mut() {
            Some(Frame::List(list)) => {
                list.seen = true;
                return Ok(list.element.clone());
            }
            Some(Frame::Expect(_)) => {}
            _ => {
                return Err(ReactorError::protocol(format!(
                    "Saw {} when no value was expected.",
                    what
                )))
            }
        }
        match self.stack.pop() {
            Some(Frame::Expect(typ)) => Ok(typ),
            _ => Err(ReactorError::protocol("Cast state is inconsistent.")),
        }
    }

    fn cast_scalar(
        &self,
        value: Value,
        typ: &TypeReference,
        path: &ObjectPath,
    ) -> Result<Value, ReactorError> {
        match typ {
            TypeReference::Nullable(_) if value.is_null() => Ok(value),
            TypeReference::Nullable(inner) | TypeReference::Pointer(inner) => {
                self.cast_scalar(value, inner, path)
            }
            TypeReference::List(_) => Err(mismatch(path, typ, value.type_of())),
            TypeReference::Atomic(atomic) => cast_atomic(value, atomic, path, &self.delegate),
        }
    }

    fn start_list(&mut self, typ: TypeReference, path: &ObjectPath) -> Result<(), ReactorError> {
        let list = match unwrap_type(&typ) {
            TypeReference::List(ListTypeReference {
                element,
                allows_empty,
            }) => ListCast {
                list_type: typ.clone(),
                element: element.as_ref().clone(),
                allows_empty: *allows_empty,
                seen: false,
            },
            t if t.builtin() == Some(BuiltinType::Value) => ListCast {
                list_type: typ.clone(),
                element: BuiltinType::Value.type_ref(),
                allows_empty: true,
                seen: false,
            },
            _ => {
                let actual = TypeReference::list_of(BuiltinType::Value.type_ref(), true);
                return Err(mismatch(path, &typ, actual));
            }
        };
        self.stack.push(Frame::List(list));
        Ok(())
    }

    fn start_map(&mut self, typ: TypeReference, path: &ObjectPath) -> Result<(), ReactorError> {
        match unwrap_type(&typ).builtin() {
            Some(BuiltinType::Value) | Some(BuiltinType::SymbolMap) => {
                let typer = self.delegate.field_typer_for(None, path)?;
                self.stack.push(Frame::Fields(typer));
                Ok(())
            }
            _ => Err(mismatch(path, &typ, BuiltinType::SymbolMap.type_ref())),
        }
    }

    /// A struct under a `Value` target is left unconstrained when the delegate does not know
    /// its type.
    fn unconstrained_typer(
        &self,
        type_name: &QualifiedTypeName,
        path: &ObjectPath,
    ) -> Result<Box<dyn FieldTyper>, ReactorError> {
        match self.delegate.field_typer_for(Some(type_name), path) {
            Err(ReactorError::Value(ValueError::UnknownType { .. })) => {
                Ok(Box::new(ValueFieldTyper))
            }
            result => result,
        }
    }

    /// Returns the event to forward, which will be a map event if the struct is cast to a
    /// symbol map.
    fn start_struct(
        &mut self,
        typ: TypeReference,
        type_name: &QualifiedTypeName,
        path: &ObjectPath,
    ) -> Result<EventKind, ReactorError> {
        let (kind, typer) = match unwrap_type(&typ) {
            TypeReference::Atomic(AtomicTypeReference { name, .. }) => {
                match BuiltinType::from_qualified_name(name) {
                    Some(BuiltinType::Value) => (
                        EventKind::StartStruct(type_name.clone()),
                        self.unconstrained_typer(type_name, path)?,
                    ),
                    Some(BuiltinType::SymbolMap) => (
                        EventKind::StartMap,
                        self.delegate.field_typer_for(None, path)?,
                    ),
                    None if name == type_name || self.delegate.is_assignable(type_name, name) => (
                        EventKind::StartStruct(type_name.clone()),
                        self.delegate.field_typer_for(Some(type_name), path)?,
                    ),
                    _ => {
                        return Err(mismatch(
                            path,
                            &typ,
                            TypeReference::atomic(type_name.clone()),
                        ))
                    }
                }
            }
            _ => {
                return Err(mismatch(
                    path,
                    &typ,
                    TypeReference::atomic(type_name.clone()),
                ))
            }
        };
        self.stack.push(Frame::Fields(typer));
        Ok(kind)
    }

    fn start_field(&mut self, name: &Identifier, path: &ObjectPath) -> Result<(), ReactorError> {
        match self.stack.last_mut() {
            Some(Frame::Fields(typer)) => {
                let typ = typer.field_type_for(name, path)?;
                self.stack.push(Frame::Expect(typ));
                Ok(())
            }
            _ => Err(ReactorError::protocol(format!(
                "Saw field '{}' outside of a symbol map or struct.",
                name
            ))),
        }
    }

    fn end(&mut self, path: &ObjectPath) -> Result<(), ReactorError> {
        match self.stack.pop() {
            Some(Frame::List(ListCast {
                list_type,
                allows_empty,
                seen,
                ..
            })) => {
                if !seen && !allows_empty {
                    Err(ValueError::EmptyList {
                        path: path.clone(),
                        expected: list_type,
                    }
                    .into())
                } else {
                    Ok(())
                }
            }
            Some(Frame::Fields(_)) => Ok(()),
            _ => Err(ReactorError::protocol(
                "Saw end outside of a list, symbol map or struct.",
            )),
        }
    }
}

impl<D: CastDelegate> Processor for CastProcessor<D> {
    fn process_event(
        &mut self,
        event: ReactorEvent,
        next: &mut dyn Reactor,
    ) -> Result<(), ReactorError> {
        let ReactorEvent { kind, path } = event;
        let at = path.clone().unwrap_or_default();
        let kind = match kind {
            EventKind::Value(value) => {
                let typ = self.next_expected("a value")?;
                EventKind::Value(self.cast_scalar(value, &typ, &at)?)
            }
            EventKind::StartList => {
                let typ = self.next_expected("the start of a list")?;
                self.start_list(typ, &at)?;
                EventKind::StartList
            }
            EventKind::StartMap => {
                let typ = self.next_expected("the start of a symbol map")?;
                self.start_map(typ, &at)?;
                EventKind::StartMap
            }
            EventKind::StartStruct(type_name) => {
                let typ = self.next_expected("the start of a struct")?;
                self.start_struct(typ, &type_name, &at)?
            }
            EventKind::StartField(name) => {
                self.start_field(&name, &at)?;
                EventKind::StartField(name)
            }
            EventKind::End => {
                self.end(&at)?;
                EventKind::End
            }
        };
        next.process_event(ReactorEvent { kind, path })
    }
}

/// Cast a complete value to a type, checking its structure and tracking paths for error
/// reporting.
pub fn cast_value<D>(
    value: &Value,
    target: TypeReference,
    delegate: D,
) -> Result<Value, ReactorError>
where
    D: CastDelegate + 'static,
{
    let processors: Vec<Box<dyn Processor>> = vec![
        Box::new(StructuralCheck::new(TopType::Value)),
        Box::new(PathSetter::new()),
        Box::new(CastProcessor::new(target, delegate)),
    ];
    let mut pipeline = Pipeline::from_parts(processors, ValueBuilder::new());
    visit_value(value, &mut pipeline)?;
    pipeline
        .into_terminal()
        .into_value()
        .ok_or_else(|| ReactorError::protocol("The value was incomplete."))
}
