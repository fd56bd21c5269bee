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

use crate::{DeclaredTypeName, Identifier, ModelError, Namespace, QualifiedTypeName, Value};
use regex::Regex;
use std::fmt::{Display, Formatter};
use std::sync::OnceLock;

/// The types that are built into the model. These all belong to the `mingle:core@v1`
/// namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    /// Matches any value, including null.
    Value,
    Null,
    Boolean,
    Buffer,
    String,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Float32,
    Float64,
    Timestamp,
    SymbolMap,
}

static CORE_NAMESPACE: OnceLock<Namespace> = OnceLock::new();

/// The namespace of the built in types, `mingle:core@v1`.
pub fn core_namespace() -> &'static Namespace {
    CORE_NAMESPACE.get_or_init(|| {
        Namespace::new_unchecked(
            vec![Identifier::single_part("mingle"), Identifier::single_part("core")],
            Identifier::single_part("v1"),
        )
    })
}

impl BuiltinType {
    pub const ALL: [BuiltinType; 13] = [
        BuiltinType::Value,
        BuiltinType::Null,
        BuiltinType::Boolean,
        BuiltinType::Buffer,
        BuiltinType::String,
        BuiltinType::Int32,
        BuiltinType::Int64,
        BuiltinType::Uint32,
        BuiltinType::Uint64,
        BuiltinType::Float32,
        BuiltinType::Float64,
        BuiltinType::Timestamp,
        BuiltinType::SymbolMap,
    ];

    pub fn declared_name(&self) -> &'static str {
        match self {
            BuiltinType::Value => "Value",
            BuiltinType::Null => "Null",
            BuiltinType::Boolean => "Boolean",
            BuiltinType::Buffer => "Buffer",
            BuiltinType::String => "String",
            BuiltinType::Int32 => "Int32",
            BuiltinType::Int64 => "Int64",
            BuiltinType::Uint32 => "Uint32",
            BuiltinType::Uint64 => "Uint64",
            BuiltinType::Float32 => "Float32",
            BuiltinType::Float64 => "Float64",
            BuiltinType::Timestamp => "Timestamp",
            BuiltinType::SymbolMap => "SymbolMap",
        }
    }

    pub fn qualified_name(&self) -> QualifiedTypeName {
        let name = DeclaredTypeName::new_unchecked(self.declared_name());
        QualifiedTypeName::new(core_namespace().clone(), name)
    }

    pub fn type_ref(&self) -> TypeReference {
        TypeReference::atomic(self.qualified_name())
    }

    pub fn from_qualified_name(name: &QualifiedTypeName) -> Option<BuiltinType> {
        if name.namespace() != core_namespace() {
            return None;
        }
        BuiltinType::ALL
            .into_iter()
            .find(|builtin| builtin.declared_name() == name.name().as_str())
    }
}

/// A constraint on the values admitted by an atomic type.
#[derive(Debug, Clone, PartialEq)]
pub enum Restriction {
    Range(RangeRestriction),
    Regex(RegexRestriction),
}

/// An interval of values. An absent bound is unbounded in that direction.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeRestriction {
    pub min_closed: bool,
    pub min: Option<Value>,
    pub max: Option<Value>,
    pub max_closed: bool,
}

/// A regular expression that string values must match.
#[derive(Debug, Clone)]
pub struct RegexRestriction {
    regex: Regex,
}

impl RegexRestriction {
    pub fn new(pattern: &str) -> Result<Self, ModelError> {
        Regex::new(pattern)
            .map(|regex| RegexRestriction { regex })
            .map_err(|err| ModelError::InvalidRegex {
                pattern: pattern.to_owned(),
                message: err.to_string(),
            })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for RegexRestriction {
    fn eq(&self, other: &Self) -> bool {
        self.pattern() == other.pattern()
    }
}

impl Display for Restriction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Restriction::Range(RangeRestriction {
                min_closed,
                min,
                max,
                max_closed,
            }) => {
                f.write_str(if *min_closed { "[" } else { "(" })?;
                if let Some(min) = min {
                    write!(f, "{}", min)?;
                }
                f.write_str(",")?;
                if let Some(max) = max {
                    write!(f, "{}", max)?;
                }
                f.write_str(if *max_closed { "]" } else { ")" })
            }
            Restriction::Regex(regex) => crate::write_quoted(regex.pattern(), f),
        }
    }
}

/// A named type with an optional restriction.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomicTypeReference {
    pub name: QualifiedTypeName,
    pub restriction: Option<Restriction>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListTypeReference {
    pub element: Box<TypeReference>,
    pub allows_empty: bool,
}

/// A reference to a type, as it appears in field declarations and as the target of casts.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeReference {
    Atomic(AtomicTypeReference),
    List(ListTypeReference),
    Nullable(Box<TypeReference>),
    Pointer(Box<TypeReference>),
}

impl TypeReference {
    pub fn atomic(name: QualifiedTypeName) -> Self {
        TypeReference::Atomic(AtomicTypeReference {
            name,
            restriction: None,
        })
    }

    pub fn restricted(name: QualifiedTypeName, restriction: Restriction) -> Self {
        TypeReference::Atomic(AtomicTypeReference {
            name,
            restriction: Some(restriction),
        })
    }

    pub fn list_of(element: TypeReference, allows_empty: bool) -> Self {
        TypeReference::List(ListTypeReference {
            element: Box::new(element),
            allows_empty,
        })
    }

    pub fn nullable(inner: TypeReference) -> Self {
        TypeReference::Nullable(Box::new(inner))
    }

    pub fn pointer(inner: TypeReference) -> Self {
        TypeReference::Pointer(Box::new(inner))
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, TypeReference::Nullable(_))
    }

    /// The built in type referred to, if this is an atomic reference to one.
    pub fn builtin(&self) -> Option<BuiltinType> {
        match self {
            TypeReference::Atomic(AtomicTypeReference { name, .. }) => {
                BuiltinType::from_qualified_name(name)
            }
            _ => None,
        }
    }

    /// The atomic type at the base of any list, nullable and pointer wrappers.
    pub fn atomic_base(&self) -> &AtomicTypeReference {
        match self {
            TypeReference::Atomic(atomic) => atomic,
            TypeReference::List(ListTypeReference { element, .. }) => element.atomic_base(),
            TypeReference::Nullable(inner) | TypeReference::Pointer(inner) => inner.atomic_base(),
        }
    }
}

impl Display for TypeReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeReference::Atomic(AtomicTypeReference { name, restriction }) => {
                write!(f, "{}", name)?;
                if let Some(restriction) = restriction {
                    write!(f, "~{}", restriction)?;
                }
                Ok(())
            }
            TypeReference::List(ListTypeReference {
                element,
                allows_empty,
            }) => write!(f, "{}{}", element, if *allows_empty { "*" } else { "+" }),
            TypeReference::Nullable(inner) => write!(f, "{}?", inner),
            TypeReference::Pointer(inner) => match inner.as_ref() {
                TypeReference::Atomic(_) | TypeReference::Pointer(_) => write!(f, "&{}", inner),
                _ => write!(f, "&({})", inner),
            },
        }
    }
}

impl From<QualifiedTypeName> for TypeReference {
    fn from(name: QualifiedTypeName) -> Self {
        TypeReference::atomic(name)
    }
}

impl From<BuiltinType> for TypeReference {
    fn from(builtin: BuiltinType) -> Self {
        builtin.type_ref()
    }
}
