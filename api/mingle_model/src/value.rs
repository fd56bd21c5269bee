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

use crate::types::BuiltinType;
use crate::{Identifier, QualifiedTypeName, TypeReference};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use std::fmt::{Display, Formatter};

/// Timestamps are UTC instants with nanosecond precision.
pub type Timestamp = DateTime<Utc>;

/// An insertion ordered map from field names to values.
pub type SymbolMap = IndexMap<Identifier, Value>;

/// A constant of an enumerated type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Enum {
    pub type_name: QualifiedTypeName,
    pub value: Identifier,
}

/// A [`SymbolMap`] tagged with the name of its type.
#[derive(Debug, Clone, PartialEq)]
pub struct Struct {
    pub type_name: QualifiedTypeName,
    pub fields: SymbolMap,
}

/// The generic representation of a value in the Mingle model.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Uint32(u32),
    Uint64(u64),
    Float32(f32),
    Float64(f64),
    String(String),
    Buffer(Vec<u8>),
    Timestamp(Timestamp),
    Enum(Enum),
    List(Vec<Value>),
    SymbolMap(SymbolMap),
    Struct(Struct),
}

/// The kinds of [`Value`], without their payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Boolean,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Float32,
    Float64,
    String,
    Buffer,
    Timestamp,
    Enum,
    List,
    SymbolMap,
    Struct,
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn from_vec<T: Into<Value>>(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Int32(_) => ValueKind::Int32,
            Value::Int64(_) => ValueKind::Int64,
            Value::Uint32(_) => ValueKind::Uint32,
            Value::Uint64(_) => ValueKind::Uint64,
            Value::Float32(_) => ValueKind::Float32,
            Value::Float64(_) => ValueKind::Float64,
            Value::String(_) => ValueKind::String,
            Value::Buffer(_) => ValueKind::Buffer,
            Value::Timestamp(_) => ValueKind::Timestamp,
            Value::Enum(_) => ValueKind::Enum,
            Value::List(_) => ValueKind::List,
            Value::SymbolMap(_) => ValueKind::SymbolMap,
            Value::Struct(_) => ValueKind::Struct,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Scalar values are transported by a single event, as opposed to lists, symbol maps and
    /// structs.
    pub fn is_scalar(&self) -> bool {
        !matches!(
            self,
            Value::List(_) | Value::SymbolMap(_) | Value::Struct(_)
        )
    }

    /// The type of this value. Lists are typed as lists of `Value` as their elements may be
    /// heterogeneous.
    pub fn type_of(&self) -> TypeReference {
        match self {
            Value::Null => BuiltinType::Null.type_ref(),
            Value::Boolean(_) => BuiltinType::Boolean.type_ref(),
            Value::Int32(_) => BuiltinType::Int32.type_ref(),
            Value::Int64(_) => BuiltinType::Int64.type_ref(),
            Value::Uint32(_) => BuiltinType::Uint32.type_ref(),
            Value::Uint64(_) => BuiltinType::Uint64.type_ref(),
            Value::Float32(_) => BuiltinType::Float32.type_ref(),
            Value::Float64(_) => BuiltinType::Float64.type_ref(),
            Value::String(_) => BuiltinType::String.type_ref(),
            Value::Buffer(_) => BuiltinType::Buffer.type_ref(),
            Value::Timestamp(_) => BuiltinType::Timestamp.type_ref(),
            Value::Enum(Enum { type_name, .. }) | Value::Struct(Struct { type_name, .. }) => {
                TypeReference::atomic(type_name.clone())
            }
            Value::List(_) => TypeReference::list_of(BuiltinType::Value.type_ref(), true),
            Value::SymbolMap(_) => BuiltinType::SymbolMap.type_ref(),
        }
    }
}

fn write_fields(fields: &SymbolMap, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str("{")?;
    for (i, (name, value)) in fields.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}:{}", name, value)?;
    }
    f.write_str("}")
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(p) => write!(f, "{}", p),
            Value::Int32(n) => write!(f, "{}", n),
            Value::Int64(n) => write!(f, "{}", n),
            Value::Uint32(n) => write!(f, "{}", n),
            Value::Uint64(n) => write!(f, "{}", n),
            Value::Float32(x) => write!(f, "{}", x),
            Value::Float64(x) => write!(f, "{}", x),
            Value::String(s) => crate::write_quoted(s, f),
            Value::Buffer(blob) => write!(f, "buffer:[{}]", STANDARD.encode(blob)),
            Value::Timestamp(t) => {
                crate::write_quoted(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true), f)
            }
            Value::Enum(Enum { type_name, value }) => write!(f, "{}.{}", type_name, value),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::SymbolMap(fields) => write_fields(fields, f),
            Value::Struct(Struct { type_name, fields }) => {
                write!(f, "{}", type_name)?;
                write_fields(fields, f)
            }
        }
    }
}

macro_rules! value_from {
    ($t:ty, $variant:ident) => {
        impl From<$t> for Value {
            fn from(value: $t) -> Self {
                Value::$variant(value)
            }
        }
    };
}

value_from!(bool, Boolean);
value_from!(i32, Int32);
value_from!(i64, Int64);
value_from!(u32, Uint32);
value_from!(u64, Uint64);
value_from!(f32, Float32);
value_from!(f64, Float64);
value_from!(String, String);
value_from!(Timestamp, Timestamp);
value_from!(Enum, Enum);
value_from!(SymbolMap, SymbolMap);
value_from!(Struct, Struct);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}
