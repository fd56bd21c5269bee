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

//! # Mingle data model
//!
//! The generic representation of values exchanged through the Mingle serialization model,
//! together with the names and type references used to describe them. Values are immutable
//! trees ([`Value`]) whose structured members are keyed by [`Identifier`]s. Types are
//! referred to by [`TypeReference`]s that are resolved against named types
//! ([`QualifiedTypeName`]).

mod error;
pub mod identifier;
pub mod names;
pub mod path;
#[cfg(test)]
mod tests;
pub mod types;
mod value;

pub use error::ModelError;
pub use identifier::{Identifier, IdentifierFormat};
pub use names::{DeclaredTypeName, Namespace, QualifiedTypeName};
pub use path::{ObjectPath, PathStep};
pub use types::{
    AtomicTypeReference, BuiltinType, ListTypeReference, RangeRestriction, RegexRestriction,
    Restriction, TypeReference,
};
pub use value::{Enum, Struct, SymbolMap, Timestamp, Value, ValueKind};

pub(crate) fn write_quoted(text: &str, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    use std::fmt::Write;

    f.write_char('"')?;
    for c in text.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\r' => f.write_str("\\r")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            cp if cp < '\u{20}' => write!(f, "\\u{:04x}", cp as u32)?,
            _ => f.write_char(c)?,
        }
    }
    f.write_char('"')
}
