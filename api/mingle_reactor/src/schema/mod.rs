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

//! Definitions of the named types of a schema.

#[cfg(test)]
mod tests;

use crate::cast::{CastDelegate, FieldTyper, ValueFieldTyper};
use crate::order::{FieldOrder, FieldSpecification, OrderGetter};
use crate::{ReactorError, ValueError};
use mingle_model::{
    AtomicTypeReference, Enum, Identifier, ObjectPath, QualifiedTypeName, TypeReference, Value,
};
use std::collections::{HashMap, HashSet};

/// A field of a struct type. Fields with nullable types are optional; all others are
/// required.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub name: Identifier,
    pub type_ref: TypeReference,
}

impl FieldDefinition {
    pub fn new(name: Identifier, type_ref: TypeReference) -> Self {
        FieldDefinition { name, type_ref }
    }

    pub fn is_required(&self) -> bool {
        !self.type_ref.is_nullable()
    }
}

/// A struct type. A struct inherits the fields of its super type, which precede its own
/// fields in its canonical order.
#[derive(Debug, Clone, PartialEq)]
pub struct StructDefinition {
    pub name: QualifiedTypeName,
    pub super_type: Option<QualifiedTypeName>,
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDefinition {
    pub name: QualifiedTypeName,
    pub values: Vec<Identifier>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDefinition {
    Struct(StructDefinition),
    Enum(EnumDefinition),
}

impl TypeDefinition {
    pub fn name(&self) -> &QualifiedTypeName {
        match self {
            TypeDefinition::Struct(StructDefinition { name, .. })
            | TypeDefinition::Enum(EnumDefinition { name, .. }) => name,
        }
    }
}

impl From<StructDefinition> for TypeDefinition {
    fn from(def: StructDefinition) -> Self {
        TypeDefinition::Struct(def)
    }
}

impl From<EnumDefinition> for TypeDefinition {
    fn from(def: EnumDefinition) -> Self {
        TypeDefinition::Enum(def)
    }
}

/// Resolves qualified type names to their definitions.
pub trait TypeDefinitionLookup {
    fn get(&self, name: &QualifiedTypeName) -> Option<&TypeDefinition>;

    fn expect_type(&self, name: &QualifiedTypeName) -> Result<&TypeDefinition, ReactorError> {
        self.get(name).ok_or_else(|| {
            ValueError::UnknownType {
                path: ObjectPath::root(),
                name: name.clone(),
            }
            .into()
        })
    }
}

/// A collection of type definitions, keyed by name.
///
/// As well as resolving names, a definition map provides the canonical field orders of its
/// struct types (see [`crate::FieldOrderProcessor`]) and acts as a [`CastDelegate`]: the
/// fields of structs are typed according to their definitions (with unrecognized fields
/// rejected), strings are cast to the constants of enum types and a struct may be used where
/// any of its super types is expected.
#[derive(Debug, Clone, Default)]
pub struct DefinitionMap {
    definitions: HashMap<QualifiedTypeName, TypeDefinition>,
}

impl DefinitionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition, returning any previous definition with the same name.
    pub fn insert(&mut self, definition: impl Into<TypeDefinition>) -> Option<TypeDefinition> {
        let definition = definition.into();
        self.definitions
            .insert(definition.name().clone(), definition)
    }

    pub fn with(mut self, definition: impl Into<TypeDefinition>) -> Self {
        self.insert(definition);
        self
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    fn get_struct(&self, name: &QualifiedTypeName) -> Option<&StructDefinition> {
        match self.definitions.get(name) {
            Some(TypeDefinition::Struct(def)) => Some(def),
            _ => None,
        }
    }

    /// The chain of struct definitions from the named type up through its super types.
    fn ancestry(&self, name: &QualifiedTypeName) -> Vec<&StructDefinition> {
        let mut chain = vec![];
        let mut seen = HashSet::new();
        let mut current = self.get_struct(name);
        while let Some(def) = current {
            if !seen.insert(&def.name) {
                break;
            }
            chain.push(def);
            current = def
                .super_type
                .as_ref()
                .and_then(|super_type| self.get_struct(super_type));
        }
        chain
    }

    /// All fields of a struct type, including those inherited from its super types, in their
    /// canonical order.
    pub fn fields_of(&self, name: &QualifiedTypeName) -> Vec<&FieldDefinition> {
        self.ancestry(name)
            .into_iter()
            .rev()
            .flat_map(|def| def.fields.iter())
            .collect()
    }
}

impl FromIterator<TypeDefinition> for DefinitionMap {
    fn from_iter<T: IntoIterator<Item = TypeDefinition>>(iter: T) -> Self {
        let mut map = DefinitionMap::new();
        for definition in iter {
            map.insert(definition);
        }
        map
    }
}

impl TypeDefinitionLookup for DefinitionMap {
    fn get(&self, name: &QualifiedTypeName) -> Option<&TypeDefinition> {
        self.definitions.get(name)
    }
}

impl OrderGetter for DefinitionMap {
    fn field_order_for(&self, type_name: &QualifiedTypeName) -> Option<FieldOrder> {
        self.get_struct(type_name)?;
        Some(
            self.fields_of(type_name)
                .into_iter()
                .map(|field| FieldSpecification {
                    field: field.name.clone(),
                    required: field.is_required(),
                })
                .collect(),
        )
    }
}

/// Types the fields of a struct according to its definition.
struct DefinedFieldTyper {
    fields: HashMap<Identifier, TypeReference>,
}

impl FieldTyper for DefinedFieldTyper {
    fn field_type_for(
        &mut self,
        field: &Identifier,
        path: &ObjectPath,
    ) -> Result<TypeReference, ReactorError> {
        match self.fields.get(field) {
            Some(typ) => Ok(typ.clone()),
            None => Err(ValueError::UnrecognizedField {
                path: path.clone(),
                field: field.clone(),
            }
            .into()),
        }
    }
}

fn unknown_type(name: &QualifiedTypeName, path: &ObjectPath) -> ReactorError {
    ValueError::UnknownType {
        path: path.clone(),
        name: name.clone(),
    }
    .into()
}

impl CastDelegate for DefinitionMap {
    fn field_typer_for(
        &self,
        type_name: Option<&QualifiedTypeName>,
        path: &ObjectPath,
    ) -> Result<Box<dyn FieldTyper>, ReactorError> {
        let Some(type_name) = type_name else {
            return Ok(Box::new(ValueFieldTyper));
        };
        match self.get(type_name) {
            Some(TypeDefinition::Struct(_)) => {
                let fields = self
                    .fields_of(type_name)
                    .into_iter()
                    .map(|field| (field.name.clone(), field.type_ref.clone()))
                    .collect();
                Ok(Box::new(DefinedFieldTyper { fields }))
            }
            Some(TypeDefinition::Enum(_)) => Err(ValueError::invalid(
                path,
                format!("{} is an enum type and has no fields.", type_name),
            )
            .into()),
            None => Err(unknown_type(type_name, path)),
        }
    }

    fn cast_atomic(
        &self,
        value: &Value,
        target: &AtomicTypeReference,
        path: &ObjectPath,
    ) -> Option<Result<Value, ReactorError>> {
        let definition = match self.get(&target.name) {
            Some(TypeDefinition::Enum(definition)) => definition,
            Some(TypeDefinition::Struct(_)) => return None,
            None => return Some(Err(unknown_type(&target.name, path))),
        };
        let Value::String(text) = value else {
            return None;
        };
        let constant = text
            .parse::<Identifier>()
            .ok()
            .filter(|id| definition.values.contains(id));
        Some(match constant {
            Some(value) => Ok(Value::Enum(Enum {
                type_name: definition.name.clone(),
                value,
            })),
            None => Err(ValueError::invalid(
                path,
                format!("Invalid {} constant: {:?}", definition.name, text),
            )
            .into()),
        })
    }

    fn is_assignable(&self, actual: &QualifiedTypeName, expected: &QualifiedTypeName) -> bool {
        self.ancestry(actual)
            .iter()
            .any(|def| &def.name == expected)
    }
}
