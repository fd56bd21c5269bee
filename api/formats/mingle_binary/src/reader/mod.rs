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

use crate::type_code::{self, describe};
use crate::{BinIoError, BinReaderConfig};
use bytes::Buf;
use chrono::DateTime;
use mingle_model::{
    AtomicTypeReference, DeclaredTypeName, Enum, Identifier, Namespace, QualifiedTypeName,
    RangeRestriction, RegexRestriction, Restriction, TypeReference, Value,
};
use mingle_reactor::{EventKind, Reactor, ReactorEvent, ValueBuilder};
use std::mem::size_of;
use tracing::trace;

#[cfg(test)]
mod tests;

/// Reads Mingle data from a buffer in the binary format. Each read method consumes exactly one
/// unit of the format. Any error carries the offset (from the start of the input) at which it
/// was detected; after an error the position of the reader is unspecified.
pub struct BinReader<B> {
    input: B,
    offset: u64,
    config: BinReaderConfig,
}

macro_rules! get_le {
    ($name:ident, $get:ident, $t:ty) => {
        fn $name(&mut self, what: &str) -> Result<$t, BinIoError> {
            self.ensure(size_of::<$t>(), what)?;
            self.offset += size_of::<$t>() as u64;
            Ok(self.input.$get())
        }
    };
}

impl<B: Buf> BinReader<B> {
    pub fn new(input: B) -> Self {
        BinReader::with_config(input, BinReaderConfig::default())
    }

    pub fn with_config(input: B, config: BinReaderConfig) -> Self {
        BinReader {
            input,
            offset: 0,
            config,
        }
    }

    /// The number of bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn has_remaining(&self) -> bool {
        self.input.has_remaining()
    }

    pub fn into_inner(self) -> B {
        self.input
    }

    fn ensure(&self, len: usize, what: &str) -> Result<(), BinIoError> {
        if self.input.remaining() < len {
            Err(BinIoError::codec(
                self.offset,
                format!("Expected {} but the input ended.", what),
            ))
        } else {
            Ok(())
        }
    }

    get_le!(get_u8, get_u8, u8);
    get_le!(get_i32, get_i32_le, i32);
    get_le!(get_i64, get_i64_le, i64);
    get_le!(get_u32, get_u32_le, u32);
    get_le!(get_u64, get_u64_le, u64);
    get_le!(get_f32, get_f32_le, f32);
    get_le!(get_f64, get_f64_le, f64);

    /// Consume the next type code.
    pub fn next_type_code(&mut self) -> Result<u8, BinIoError> {
        let offset = self.offset;
        let code = self.get_u8("a type code")?;
        trace!(offset, code = %describe(code), "Read type code.");
        Ok(code)
    }

    /// Inspect the next type code without consuming it.
    pub fn peek_type_code(&self) -> Result<u8, BinIoError> {
        self.ensure(1, "a type code")?;
        Ok(self.input.chunk()[0])
    }

    fn unexpected(&self, offset: u64, code: u8, expectation: &str) -> BinIoError {
        BinIoError::codec(
            offset,
            format!("Expected {} but found {}.", expectation, describe(code)),
        )
    }

    fn expect_type_code(&mut self, allowed: &[u8], expectation: &str) -> Result<u8, BinIoError> {
        let offset = self.offset;
        let code = self.next_type_code()?;
        if allowed.contains(&code) {
            Ok(code)
        } else {
            Err(self.unexpected(offset, code, expectation))
        }
    }

    fn get_bool(&mut self) -> Result<bool, BinIoError> {
        let offset = self.offset;
        match self.get_u8("a boolean")? {
            0 => Ok(false),
            1 => Ok(true),
            b => Err(BinIoError::codec(
                offset,
                format!("Invalid boolean byte: 0x{:02x}.", b),
            )),
        }
    }

    fn get_bytes(&mut self, what: &str) -> Result<Vec<u8>, BinIoError> {
        let offset = self.offset;
        let len = self.get_i32(what)?;
        let len = match usize::try_from(len) {
            Ok(len) => len,
            Err(_) => {
                return Err(BinIoError::codec(
                    offset,
                    format!("Invalid length for {}: {}.", what, len),
                ))
            }
        };
        if len > self.config.max_string_len {
            return Err(BinIoError::codec(
                offset,
                format!(
                    "Length of {} ({} bytes) exceeds the limit of {} bytes.",
                    what, len, self.config.max_string_len
                ),
            ));
        }
        self.ensure(len, what)?;
        self.offset += len as u64;
        Ok(self.input.copy_to_bytes(len).to_vec())
    }

    fn get_utf8(&mut self) -> Result<String, BinIoError> {
        let offset = self.offset;
        String::from_utf8(self.get_bytes("a string")?)
            .map_err(|_| BinIoError::codec(offset, "A string contained invalid UTF-8."))
    }

    pub fn read_identifier(&mut self) -> Result<Identifier, BinIoError> {
        let offset = self.offset;
        self.expect_type_code(&[type_code::ID], "an identifier")?;
        let count = self.get_u8("an identifier part count")?;
        let mut parts = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            parts.push(self.get_utf8()?);
        }
        Identifier::new(parts).map_err(|err| BinIoError::codec(offset, err.to_string()))
    }

    pub fn read_namespace(&mut self) -> Result<Namespace, BinIoError> {
        let offset = self.offset;
        self.expect_type_code(&[type_code::NS], "a namespace")?;
        let count = self.get_u8("a namespace part count")?;
        let mut parts = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            parts.push(self.read_identifier()?);
        }
        let version = self.read_identifier()?;
        Namespace::new(parts, version).map_err(|err| BinIoError::codec(offset, err.to_string()))
    }

    pub fn read_declared_type_name(&mut self) -> Result<DeclaredTypeName, BinIoError> {
        let offset = self.offset;
        self.expect_type_code(&[type_code::DECL_NM], "a declared type name")?;
        let name = self.get_utf8()?;
        DeclaredTypeName::new(name).map_err(|err| BinIoError::codec(offset, err.to_string()))
    }

    pub fn read_qualified_type_name(&mut self) -> Result<QualifiedTypeName, BinIoError> {
        self.expect_type_code(&[type_code::QN], "a qualified type name")?;
        let namespace = self.read_namespace()?;
        let name = self.read_declared_type_name()?;
        Ok(QualifiedTypeName::new(namespace, name))
    }

    pub fn read_type_reference(&mut self) -> Result<TypeReference, BinIoError> {
        self.read_type_reference_at(0)
    }

    fn check_depth(&self, depth: usize) -> Result<(), BinIoError> {
        if depth >= self.config.max_depth {
            Err(BinIoError::codec(
                self.offset,
                format!(
                    "Maximum nesting depth of {} exceeded.",
                    self.config.max_depth
                ),
            ))
        } else {
            Ok(())
        }
    }

    fn read_type_reference_at(&mut self, depth: usize) -> Result<TypeReference, BinIoError> {
        self.check_depth(depth)?;
        let code = self.expect_type_code(&type_code::TYPE_REFERENCES, "a type reference")?;
        let typ = match code {
            type_code::ATOM_TYP => {
                let name = self.read_qualified_type_name()?;
                let restriction = self.read_restriction()?;
                TypeReference::Atomic(AtomicTypeReference { name, restriction })
            }
            type_code::LIST_TYP => {
                let element = self.read_type_reference_at(depth + 1)?;
                let allows_empty = self.get_bool()?;
                TypeReference::list_of(element, allows_empty)
            }
            type_code::NULLABLE_TYP => {
                TypeReference::nullable(self.read_type_reference_at(depth + 1)?)
            }
            _ => TypeReference::pointer(self.read_type_reference_at(depth + 1)?),
        };
        Ok(typ)
    }

    fn read_restriction(&mut self) -> Result<Option<Restriction>, BinIoError> {
        let offset = self.offset;
        let code = self.expect_type_code(
            &[
                type_code::NIL,
                type_code::REGEX_RESTRICT,
                type_code::RANGE_RESTRICT,
            ],
            "a restriction or nil",
        )?;
        let restriction = match code {
            type_code::REGEX_RESTRICT => {
                let pattern = self.get_utf8()?;
                let regex = RegexRestriction::new(&pattern)
                    .map_err(|err| BinIoError::codec(offset, err.to_string()))?;
                Restriction::Regex(regex)
            }
            type_code::RANGE_RESTRICT => {
                let min_closed = self.get_bool()?;
                let min = self.read_bound()?;
                let max = self.read_bound()?;
                let max_closed = self.get_bool()?;
                Restriction::Range(RangeRestriction {
                    min_closed,
                    min,
                    max,
                    max_closed,
                })
            }
            _ => return Ok(None),
        };
        Ok(Some(restriction))
    }

    fn read_bound(&mut self) -> Result<Option<Value>, BinIoError> {
        if self.peek_type_code()? == type_code::NIL {
            self.next_type_code()?;
            Ok(None)
        } else {
            self.read_scalar().map(Some)
        }
    }

    /// Read a single scalar value (any value other than a list, symbol map or struct).
    pub fn read_scalar(&mut self) -> Result<Value, BinIoError> {
        self.read_scalar_expecting("a scalar value")
    }

    fn read_scalar_expecting(&mut self, expectation: &str) -> Result<Value, BinIoError> {
        let code = self.expect_type_code(&type_code::SCALARS, expectation)?;
        let value = match code {
            type_code::NIL => Value::Null,
            type_code::BOOL => Value::Boolean(self.get_bool()?),
            type_code::STRING => Value::String(self.get_utf8()?),
            type_code::INT32 => Value::Int32(self.get_i32("an Int32")?),
            type_code::INT64 => Value::Int64(self.get_i64("an Int64")?),
            type_code::UINT32 => Value::Uint32(self.get_u32("a Uint32")?),
            type_code::UINT64 => Value::Uint64(self.get_u64("a Uint64")?),
            type_code::FLOAT32 => Value::Float32(self.get_f32("a Float32")?),
            type_code::FLOAT64 => Value::Float64(self.get_f64("a Float64")?),
            type_code::TIMESTAMP => {
                let offset = self.offset;
                let secs = self.get_i64("a timestamp")?;
                let nanos = self.get_i32("a timestamp")?;
                let timestamp = u32::try_from(nanos)
                    .ok()
                    .and_then(|nanos| DateTime::from_timestamp(secs, nanos));
                match timestamp {
                    Some(t) => Value::Timestamp(t),
                    None => {
                        return Err(BinIoError::codec(
                            offset,
                            format!("Invalid timestamp: {} seconds, {} nanoseconds.", secs, nanos),
                        ))
                    }
                }
            }
            type_code::BUFFER => Value::Buffer(self.get_bytes("a buffer")?),
            _ => {
                let type_name = self.read_qualified_type_name()?;
                let value = self.read_identifier()?;
                Value::Enum(Enum { type_name, value })
            }
        };
        Ok(value)
    }

    fn emit(reactor: &mut dyn Reactor, kind: EventKind) -> Result<(), BinIoError> {
        reactor.process_event(ReactorEvent::new(kind))?;
        Ok(())
    }

    /// Read a complete value, feeding it to a reactor as a sequence of events. The value is
    /// never materialized by the reader.
    pub fn read_reactor_value(&mut self, reactor: &mut dyn Reactor) -> Result<(), BinIoError> {
        self.read_events(reactor, 0)
    }

    fn read_events(&mut self, reactor: &mut dyn Reactor, depth: usize) -> Result<(), BinIoError> {
        match self.peek_type_code()? {
            type_code::LIST => {
                self.check_depth(depth)?;
                self.next_type_code()?;
                Self::emit(reactor, EventKind::StartList)?;
                while self.peek_type_code()? != type_code::END {
                    self.read_events(reactor, depth + 1)?;
                }
                self.next_type_code()?;
                Self::emit(reactor, EventKind::End)
            }
            type_code::SYM_MAP => {
                self.check_depth(depth)?;
                self.next_type_code()?;
                Self::emit(reactor, EventKind::StartMap)?;
                self.read_fields(reactor, depth + 1)
            }
            type_code::STRUCT => {
                self.check_depth(depth)?;
                self.next_type_code()?;
                let type_name = self.read_qualified_type_name()?;
                Self::emit(reactor, EventKind::StartStruct(type_name))?;
                self.read_fields(reactor, depth + 1)
            }
            _ => {
                let value = self.read_scalar_expecting("a value")?;
                Self::emit(reactor, EventKind::Value(value))
            }
        }
    }

    fn read_fields(&mut self, reactor: &mut dyn Reactor, depth: usize) -> Result<(), BinIoError> {
        loop {
            let code =
                self.expect_type_code(&[type_code::FIELD, type_code::END], "a field or end")?;
            if code == type_code::END {
                return Self::emit(reactor, EventKind::End);
            }
            let name = self.read_identifier()?;
            Self::emit(reactor, EventKind::StartField(name))?;
            self.read_events(reactor, depth)?;
        }
    }

    /// Read a complete value.
    pub fn read_value(&mut self) -> Result<Value, BinIoError> {
        let mut builder = ValueBuilder::new();
        self.read_reactor_value(&mut builder)?;
        let offset = self.offset;
        builder
            .into_value()
            .ok_or_else(|| BinIoError::codec(offset, "The value was incomplete."))
    }
}
