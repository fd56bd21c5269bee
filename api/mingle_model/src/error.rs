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

use thiserror::Error;

/// Errors that can occur constructing the names and types of the model from their textual
/// representations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("An identifier must have at least one part.")]
    EmptyIdentifier,
    #[error("'{0}' is not a valid identifier part.")]
    InvalidIdentifierPart(String),
    #[error("'{0}' is not a valid identifier.")]
    InvalidIdentifier(String),
    #[error("'{0}' is not a valid namespace.")]
    InvalidNamespace(String),
    #[error("'{0}' is not a valid declared type name.")]
    InvalidDeclaredTypeName(String),
    #[error("'{0}' is not a valid qualified type name.")]
    InvalidQualifiedTypeName(String),
    #[error("Invalid regular expression '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },
}
