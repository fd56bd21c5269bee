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

//! # Mingle binary format
//!
//! A compact, single pass binary encoding of Mingle values, names and type references. Each
//! encoded unit is preceded by a one byte type code (see [`type_code`]) and all multi-byte
//! integers are little endian. Values are encoded as a flat sequence of structural events so
//! the [`BinReader`] can feed decoded data directly to a [`mingle_reactor::Reactor`] and the
//! [`BinWriter`] can itself act as the terminal stage of a [`mingle_reactor::Pipeline`].

mod reader;
#[cfg(test)]
mod tests;
pub mod type_code;
mod writer;

pub use reader::BinReader;
pub use writer::BinWriter;

use mingle_reactor::ReactorError;
use thiserror::Error;

/// The default limit on the length, in bytes, of strings and buffers.
pub const DEFAULT_MAX_STRING_LEN: usize = 16 * 1024 * 1024;

/// The default limit on the nesting depth of values and type references.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Limits applied by a [`BinReader`] to guard against malicious or corrupt input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinReaderConfig {
    /// The maximum length of a string or buffer.
    pub max_string_len: usize,
    /// The maximum nesting depth of lists, symbol maps and structs (and of the wrappers of
    /// type references).
    pub max_depth: usize,
}

impl Default for BinReaderConfig {
    fn default() -> Self {
        BinReaderConfig {
            max_string_len: DEFAULT_MAX_STRING_LEN,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Errors that can occur reading or writing the binary format.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BinIoError {
    /// The data did not conform to the format (or, when writing, could not be represented in
    /// it).
    #[error("Invalid binary data at offset {offset}: {message}")]
    Codec { offset: u64, message: String },
    /// The reactor consuming the decoded events failed.
    #[error(transparent)]
    Reactor(#[from] ReactorError),
}

impl BinIoError {
    pub(crate) fn codec(offset: u64, message: impl Into<String>) -> Self {
        BinIoError::Codec {
            offset,
            message: message.into(),
        }
    }
}
