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

use crate::type_code;
use crate::BinIoError;
use bytes::BufMut;
use mingle_model::{
    AtomicTypeReference, DeclaredTypeName, Enum, Identifier, ListTypeReference, Namespace,
    QualifiedTypeName, RangeRestriction, Restriction, TypeReference, Value,
};
use mingle_reactor::{visit_value, EventKind, Reactor, ReactorError, ReactorEvent};


/// Writes Mingle data to a buffer in the binary format. This is the inverse of
/// [`crate::BinReader`]: each write method produces exactly the unit consumed by the
/// corresponding read method.
///
/// A writer is also a [`Reactor`] and will encode any stream of events that it receives,
/// without checking that the stream is well formed.
pub struct BinWriter<W> {
    output: W,
    offset: u64,
}

impl<W: BufMut> BinWriter<W> {
    pub fn new(output: W) -> Self {
        BinWriter { output, offset: 0 }
    }

    /// The number of bytes written so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn get_ref(&self) -> &W {
        &self.output
    }

    pub fn into_inner(self) -> W {
        self.output
    }

    pub fn write_type_code(&mut self, code: u8) {
        self.put_u8(code);
    }

    fn put_u8(&mut self, n: u8) {
        self.output.put_u8(n);
        self.offset += 1;
    }

    fn put_bool(&mut self, p: bool) {
        self.put_u8(u8::from(p));
    }

    fn put_slice(&mut self, bytes: &[u8]) {
        self.output.put_slice(bytes);
        self.offset += bytes.len() as u64;
    }

    fn put_bytes(&mut self, bytes: &[u8]) -> Result<(), BinIoError> {
        let len = i32::try_from(bytes.len()).map_err(|_| {
            BinIoError::codec(
                self.offset,
                format!("{} bytes is too long to be encoded.", bytes.len()),
            )
        })?;
        self.put_slice(&len.to_le_bytes());
        self.put_slice(bytes);
        Ok(())
    }

    fn put_count(&mut self, count: usize, what: &str) -> Result<(), BinIoError> {
        match u8::try_from(count) {
            Ok(n) => {
                self.put_u8(n);
                Ok(())
            }
            Err(_) => Err(BinIoError::codec(
                self.offset,
                format!("{} has {} parts but at most 255 may be encoded.", what, count),
            )),
        }
    }

    pub fn write_identifier(&mut self, id: &Identifier) -> Result<(), BinIoError> {
        self.write_type_code(type_code::ID);
        let parts = id.parts();
        self.put_count(parts.len(), "An identifier")?;
        for part in parts {
            self.put_bytes(part.as_bytes())?;
        }
        Ok(())
    }

    pub fn write_namespace(&mut self, namespace: &Namespace) -> Result<(), BinIoError> {
        self.write_type_code(type_code::NS);
        let parts = namespace.parts();
        self.put_count(parts.len(), "A namespace")?;
        for part in parts {
            self.write_identifier(part)?;
        }
        self.write_identifier(namespace.version())
    }

    pub fn write_declared_type_name(&mut self, name: &DeclaredTypeName) -> Result<(), BinIoError> {
        self.write_type_code(type_code::DECL_NM);
        self.put_bytes(name.as_str().as_bytes())
    }

    pub fn write_qualified_type_name(
        &mut self,
        name: &QualifiedTypeName,
    ) -> Result<(), BinIoError> {
        self.write_type_code(type_code::QN);
        self.write_namespace(name.namespace())?;
        self.write_declared_type_name(name.name())
    }

    pub fn write_type_reference(&mut self, typ: &TypeReference) -> Result<(), BinIoError> {
        match typ {
            TypeReference::Atomic(AtomicTypeReference { name, restriction }) => {
                self.write_type_code(type_code::ATOM_TYP);
                self.write_qualified_type_name(name)?;
                match restriction {
                    Some(restriction) => self.write_restriction(restriction),
                    None => {
                        self.write_type_code(type_code::NIL);
                        Ok(())
                    }
                }
            }
            TypeReference::List(ListTypeReference {
                element,
                allows_empty,
            }) => {
                self.write_type_code(type_code::LIST_TYP);
                self.write_type_reference(element)?;
                self.put_bool(*allows_empty);
                Ok(())
            }
            TypeReference::Nullable(inner) => {
                self.write_type_code(type_code::NULLABLE_TYP);
                self.write_type_reference(inner)
            }
            TypeReference::Pointer(inner) => {
                self.write_type_code(type_code::POINTER_TYP);
                self.write_type_reference(inner)
            }
        }
    }

    fn write_restriction(&mut self, restriction: &Restriction) -> Result<(), BinIoError> {
        match restriction {
            Restriction::Regex(regex) => {
                self.write_type_code(type_code::REGEX_RESTRICT);
                self.put_bytes(regex.pattern().as_bytes())
            }
            Restriction::Range(RangeRestriction {
                min_closed,
                min,
                max,
                max_closed,
            }) => {
                self.write_type_code(type_code::RANGE_RESTRICT);
                self.put_bool(*min_closed);
                self.write_bound(min.as_ref())?;
                self.write_bound(max.as_ref())?;
                self.put_bool(*max_closed);
                Ok(())
            }
        }
    }

    fn write_bound(&mut self, bound: Option<&Value>) -> Result<(), BinIoError> {
        match bound {
            Some(value) => self.write_scalar(value),
            None => {
                self.write_type_code(type_code::NIL);
                Ok(())
            }
        }
    }

    /// Write a scalar value. Lists, symbol maps and structs are rejected (see
    /// [`BinWriter::write_value`]).
    pub fn write_scalar(&mut self, value: &Value) -> Result<(), BinIoError> {
        match value {
            Value::Null => self.write_type_code(type_code::NIL),
            Value::Boolean(p) => {
                self.write_type_code(type_code::BOOL);
                self.put_bool(*p);
            }
            Value::String(s) => {
                self.write_type_code(type_code::STRING);
                self.put_bytes(s.as_bytes())?;
            }
            Value::Int32(n) => {
                self.write_type_code(type_code::INT32);
                self.put_slice(&n.to_le_bytes());
            }
            Value::Int64(n) => {
                self.write_type_code(type_code::INT64);
                self.put_slice(&n.to_le_bytes());
            }
            Value::Uint32(n) => {
                self.write_type_code(type_code::UINT32);
                self.put_slice(&n.to_le_bytes());
            }
            Value::Uint64(n) => {
                self.write_type_code(type_code::UINT64);
                self.put_slice(&n.to_le_bytes());
            }
            Value::Float32(x) => {
                self.write_type_code(type_code::FLOAT32);
                self.put_slice(&x.to_le_bytes());
            }
            Value::Float64(x) => {
                self.write_type_code(type_code::FLOAT64);
                self.put_slice(&x.to_le_bytes());
            }
            Value::Timestamp(t) => {
                self.write_type_code(type_code::TIMESTAMP);
                self.put_slice(&t.timestamp().to_le_bytes());
                // Always less than 2 * 10^9 so fits in an i32.
                let nanos = t.timestamp_subsec_nanos() as i32;
                self.put_slice(&nanos.to_le_bytes());
            }
            Value::Buffer(bytes) => {
                self.write_type_code(type_code::BUFFER);
                self.put_bytes(bytes)?;
            }
            Value::Enum(Enum { type_name, value }) => {
                self.write_type_code(type_code::ENUM);
                self.write_qualified_type_name(type_name)?;
                self.write_identifier(value)?;
            }
            Value::List(_) | Value::SymbolMap(_) | Value::Struct(_) => {
                return Err(BinIoError::codec(
                    self.offset,
                    format!("A {:?} value is not a scalar.", value.kind()),
                ))
            }
        }
        Ok(())
    }

    /// Write a complete value of any kind.
    pub fn write_value(&mut self, value: &Value) -> Result<(), BinIoError> {
        match value {
            Value::List(items) => {
                self.write_type_code(type_code::LIST);
                for item in items {
                    self.write_value(item)?;
                }
            }
            Value::SymbolMap(fields) => {
                self.write_type_code(type_code::SYM_MAP);
                for (name, value) in fields {
                    self.write_type_code(type_code::FIELD);
                    self.write_identifier(name)?;
                    self.write_value(value)?;
                }
            }
            Value::Struct(s) => {
                self.write_type_code(type_code::STRUCT);
                self.write_qualified_type_name(&s.type_name)?;
                for (name, value) in &s.fields {
                    self.write_type_code(type_code::FIELD);
                    self.write_identifier(name)?;
                    self.write_value(value)?;
                }
            }
            scalar => return self.write_scalar(scalar),
        }
        self.write_type_code(type_code::END);
        Ok(())
    }

    fn write_event(&mut self, kind: &EventKind) -> Result<(), BinIoError> {
        match kind {
            EventKind::Value(value) => self.write_scalar(value)?,
            EventKind::StartList => self.write_type_code(type_code::LIST),
            EventKind::StartMap => self.write_type_code(type_code::SYM_MAP),
            EventKind::StartStruct(type_name) => {
                self.write_type_code(type_code::STRUCT);
                self.write_qualified_type_name(type_name)?;
            }
            EventKind::StartField(name) => {
                self.write_type_code(type_code::FIELD);
                self.write_identifier(name)?;
            }
            EventKind::End => self.write_type_code(type_code::END),
        }
        Ok(())
    }

    /// Write a value by visiting it with this writer, as a reactor. This produces the same
    /// bytes as [`BinWriter::write_value`].
    pub fn write_events(&mut self, value: &Value) -> Result<(), ReactorError> {
        visit_value(value, self)
    }
}

impl<W: BufMut> Reactor for BinWriter<W> {
    fn process_event(&mut self, event: ReactorEvent) -> Result<(), ReactorError> {
        self.write_event(&event.kind).map_err(|err| match err {
            BinIoError::Reactor(err) => err,
            err => ReactorError::sink(err),
        })
    }
}
