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

use crate::{Identifier, IdentifierFormat, ModelError};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A versioned namespace for type names, written as `part1:part2@version`, for example
/// `mingle:core@v1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace {
    parts: Vec<Identifier>,
    version: Identifier,
}

impl Namespace {
    pub fn new(parts: Vec<Identifier>, version: Identifier) -> Result<Self, ModelError> {
        if parts.is_empty() {
            Err(ModelError::InvalidNamespace(format!("@{}", version)))
        } else {
            Ok(Namespace { parts, version })
        }
    }

    pub(crate) fn new_unchecked(parts: Vec<Identifier>, version: Identifier) -> Self {
        Namespace { parts, version }
    }

    pub fn parts(&self) -> &[Identifier] {
        &self.parts
    }

    pub fn version(&self) -> &Identifier {
        &self.version
    }
}

impl Display for Namespace {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            f.write_str(&part.format(IdentifierFormat::LcCamelCapped))?;
        }
        write!(f, "@{}", self.version.format(IdentifierFormat::LcCamelCapped))
    }
}

impl FromStr for Namespace {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::InvalidNamespace(s.to_owned());
        let (parts, version) = s.split_once('@').ok_or_else(invalid)?;
        let parts = parts
            .split(':')
            .map(Identifier::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;
        let version = version.parse().map_err(|_| invalid())?;
        Namespace::new(parts, version).map_err(|_| invalid())
    }
}

/// Determine if a string is a valid declared type name: an upper case ASCII letter followed by
/// ASCII letters and digits.
///
/// # Examples
///
/// ```
/// use mingle_model::names::is_declared_type_name;
///
/// assert!(is_declared_type_name("Struct1"));
/// assert!(!is_declared_type_name("struct1"));
/// assert!(!is_declared_type_name("Two_Parts"));
/// ```
pub fn is_declared_type_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

/// The local name of a type within a [`Namespace`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclaredTypeName(String);

impl DeclaredTypeName {
    pub fn new(name: impl Into<String>) -> Result<Self, ModelError> {
        let name = name.into();
        if is_declared_type_name(&name) {
            Ok(DeclaredTypeName(name))
        } else {
            Err(ModelError::InvalidDeclaredTypeName(name))
        }
    }

    pub(crate) fn new_unchecked(name: &str) -> Self {
        DeclaredTypeName(name.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DeclaredTypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for DeclaredTypeName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DeclaredTypeName {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeclaredTypeName::new(s)
    }
}

/// The fully qualified name of a type, written as `namespace/Name`, for example
/// `mingle:core@v1/String`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedTypeName {
    namespace: Namespace,
    name: DeclaredTypeName,
}

impl QualifiedTypeName {
    pub fn new(namespace: Namespace, name: DeclaredTypeName) -> Self {
        QualifiedTypeName { namespace, name }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn name(&self) -> &DeclaredTypeName {
        &self.name
    }
}

impl Display for QualifiedTypeName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

impl FromStr for QualifiedTypeName {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::InvalidQualifiedTypeName(s.to_owned());
        let (namespace, name) = s.split_once('/').ok_or_else(invalid)?;
        let namespace = namespace.parse().map_err(|_| invalid())?;
        let name = name.parse().map_err(|_| invalid())?;
        Ok(QualifiedTypeName::new(namespace, name))
    }
}
