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

use mingle_model::{Identifier, ObjectPath, QualifiedTypeName, Restriction, TypeReference, Value};
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use thiserror::Error;

/// Prefixes a message with a path, if the path is not the root.
struct AtPath<'a>(&'a ObjectPath);

impl<'a> Display for AtPath<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let AtPath(path) = self;
        if path.is_root() {
            Ok(())
        } else {
            write!(f, "{}: ", path)
        }
    }
}

fn comma_sep(names: &[Identifier]) -> String {
    names
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// The event stream itself was malformed (for example, a field occurred twice in the same
/// map or a container ended that was never started).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProtocolError {
    message: String,
}

impl ProtocolError {
    pub fn new(message: impl Into<String>) -> Self {
        ProtocolError {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The event stream was well formed but a value did not conform to the type expected for it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("{}Expected value of type {expected} but found {actual}.", AtPath(.path))]
    TypeMismatch {
        path: ObjectPath,
        expected: TypeReference,
        actual: TypeReference,
    },
    #[error("{}{message}", AtPath(.path))]
    InvalidValue { path: ObjectPath, message: String },
    #[error("{}Missing fields: {}.", AtPath(.path), comma_sep(.fields))]
    MissingFields {
        path: ObjectPath,
        fields: Vec<Identifier>,
    },
    #[error("{}Empty list is not permitted for type {expected}.", AtPath(.path))]
    EmptyList {
        path: ObjectPath,
        expected: TypeReference,
    },
    #[error("{}Unrecognized field: {field}.", AtPath(.path))]
    UnrecognizedField { path: ObjectPath, field: Identifier },
    #[error("{}Value {value} does not satisfy restriction {restriction}.", AtPath(.path))]
    RestrictionViolated {
        path: ObjectPath,
        value: Value,
        restriction: Restriction,
    },
    #[error("{}Unknown type: {name}.", AtPath(.path))]
    UnknownType {
        path: ObjectPath,
        name: QualifiedTypeName,
    },
}

impl ValueError {
    pub fn path(&self) -> &ObjectPath {
        match self {
            ValueError::TypeMismatch { path, .. }
            | ValueError::InvalidValue { path, .. }
            | ValueError::MissingFields { path, .. }
            | ValueError::EmptyList { path, .. }
            | ValueError::UnrecognizedField { path, .. }
            | ValueError::RestrictionViolated { path, .. }
            | ValueError::UnknownType { path, .. } => path,
        }
    }

    pub(crate) fn invalid(path: &ObjectPath, message: impl Into<String>) -> Self {
        ValueError::InvalidValue {
            path: path.clone(),
            message: message.into(),
        }
    }
}

/// Errors raised while processing a stream of events. Processing stops at the first error.
#[derive(Debug, Clone, Error)]
pub enum ReactorError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Value(#[from] ValueError),
    /// A terminal reactor failed to consume a well formed event (for example, a writer that
    /// could not encode it).
    #[error("{0}")]
    Sink(#[source] Arc<dyn std::error::Error + Send + Sync>),
}

impl ReactorError {
    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        ReactorError::Protocol(ProtocolError::new(message))
    }

    pub fn sink<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ReactorError::Sink(Arc::new(err))
    }
}

impl PartialEq for ReactorError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ReactorError::Protocol(lhs), ReactorError::Protocol(rhs)) => lhs == rhs,
            (ReactorError::Value(lhs), ReactorError::Value(rhs)) => lhs == rhs,
            (ReactorError::Sink(lhs), ReactorError::Sink(rhs)) => Arc::ptr_eq(lhs, rhs),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("A pipeline requires at least one processor.")]
    NoProcessors,
}
