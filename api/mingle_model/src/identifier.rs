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

use crate::ModelError;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The textual forms in which an [`Identifier`] can be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IdentifierFormat {
    /// `first-second`
    #[default]
    LcHyphenated,
    /// `first_second`
    LcUnderscore,
    /// `firstSecond`
    LcCamelCapped,
}

/// A name in the Mingle model, used for fields, enumeration constants and the parts of
/// namespaces. An identifier is a non-empty sequence of parts where each part starts with a
/// lower case ASCII letter and consists only of lower case ASCII letters and digits. The
/// parts are independent of the format in which the identifier is written so `field-name`,
/// `field_name` and `fieldName` all denote the same identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    parts: Vec<String>,
}

/// Determine if a string is a valid part of an [`Identifier`].
///
/// # Examples
///
/// ```
/// use mingle_model::identifier::is_identifier_part;
///
/// assert!(is_identifier_part("name"));
/// assert!(is_identifier_part("name2"));
/// assert!(!is_identifier_part("2name"));
/// assert!(!is_identifier_part("Name"));
/// assert!(!is_identifier_part(""));
/// ```
pub fn is_identifier_part(part: &str) -> bool {
    let mut chars = part.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {
            chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        }
        _ => false,
    }
}

impl Identifier {
    /// Create an identifier from its parts.
    pub fn new<I, S>(parts: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let parts: Vec<String> = parts.into_iter().map(Into::into).collect();
        if parts.is_empty() {
            return Err(ModelError::EmptyIdentifier);
        }
        if let Some(bad) = parts.iter().find(|part| !is_identifier_part(part)) {
            return Err(ModelError::InvalidIdentifierPart(bad.clone()));
        }
        Ok(Identifier { parts })
    }

    pub(crate) fn single_part(part: &str) -> Self {
        Identifier {
            parts: vec![part.to_owned()],
        }
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Render the identifier in the requested format.
    pub fn format(&self, format: IdentifierFormat) -> String {
        match format {
            IdentifierFormat::LcHyphenated => self.parts.join("-"),
            IdentifierFormat::LcUnderscore => self.parts.join("_"),
            IdentifierFormat::LcCamelCapped => {
                let mut out = String::new();
                for (i, part) in self.parts.iter().enumerate() {
                    if i == 0 {
                        out.push_str(part);
                    } else {
                        let mut chars = part.chars();
                        if let Some(first) = chars.next() {
                            out.push(first.to_ascii_uppercase());
                            out.push_str(chars.as_str());
                        }
                    }
                }
                out
            }
        }
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            f.write_str(part)?;
        }
        Ok(())
    }
}

fn split_camel(text: &str) -> Vec<String> {
    let mut parts = vec![];
    let mut current = String::new();
    for c in text.chars() {
        if c.is_ascii_uppercase() {
            if !current.is_empty() {
                parts.push(std::mem::take(&mut current));
            }
            current.push(c.to_ascii_lowercase());
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

impl FromStr for Identifier {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::InvalidIdentifier(s.to_owned());
        if s.starts_with(|c: char| c.is_ascii_uppercase()) {
            return Err(invalid());
        }
        let parts: Vec<String> = if s.contains('-') {
            s.split('-').map(ToOwned::to_owned).collect()
        } else if s.contains('_') {
            s.split('_').map(ToOwned::to_owned).collect()
        } else {
            split_camel(s)
        };
        Identifier::new(parts).map_err(|_| invalid())
    }
}

impl TryFrom<&str> for Identifier {
    type Error = ModelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}
