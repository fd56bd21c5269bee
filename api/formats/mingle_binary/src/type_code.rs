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

//! The type codes that precede each unit of the binary format.

pub const NIL: u8 = 0x00;
pub const ID: u8 = 0x01;
pub const NS: u8 = 0x02;
pub const DECL_NM: u8 = 0x03;
pub const QN: u8 = 0x04;
pub const ATOM_TYP: u8 = 0x05;
pub const LIST_TYP: u8 = 0x06;
pub const NULLABLE_TYP: u8 = 0x07;
pub const REGEX_RESTRICT: u8 = 0x08;
pub const RANGE_RESTRICT: u8 = 0x09;
pub const BOOL: u8 = 0x0a;
pub const STRING: u8 = 0x0b;
pub const INT32: u8 = 0x0c;
pub const INT64: u8 = 0x0d;
pub const UINT32: u8 = 0x0e;
pub const UINT64: u8 = 0x0f;
pub const FLOAT32: u8 = 0x10;
pub const FLOAT64: u8 = 0x11;
pub const TIMESTAMP: u8 = 0x12;
pub const BUFFER: u8 = 0x13;
pub const ENUM: u8 = 0x14;
pub const SYM_MAP: u8 = 0x15;
pub const FIELD: u8 = 0x16;
pub const STRUCT: u8 = 0x17;
pub const LIST: u8 = 0x19;
pub const END: u8 = 0x1a;
pub const POINTER_TYP: u8 = 0x1b;

/// The codes that may introduce a scalar value.
pub const SCALARS: [u8; 12] = [
    NIL, BOOL, STRING, INT32, INT64, UINT32, UINT64, FLOAT32, FLOAT64, TIMESTAMP, BUFFER, ENUM,
];

/// The codes that may introduce a type reference.
pub const TYPE_REFERENCES: [u8; 4] = [ATOM_TYP, LIST_TYP, NULLABLE_TYP, POINTER_TYP];

/// The name of a type code, if it is recognized.
pub fn name(code: u8) -> Option<&'static str> {
    let name = match code {
        NIL => "NIL",
        ID => "ID",
        NS => "NS",
        DECL_NM => "DECL_NM",
        QN => "QN",
        ATOM_TYP => "ATOM_TYP",
        LIST_TYP => "LIST_TYP",
        NULLABLE_TYP => "NULLABLE_TYP",
        REGEX_RESTRICT => "REGEX_RESTRICT",
        RANGE_RESTRICT => "RANGE_RESTRICT",
        BOOL => "BOOL",
        STRING => "STRING",
        INT32 => "INT32",
        INT64 => "INT64",
        UINT32 => "UINT32",
        UINT64 => "UINT64",
        FLOAT32 => "FLOAT32",
        FLOAT64 => "FLOAT64",
        TIMESTAMP => "TIMESTAMP",
        BUFFER => "BUFFER",
        ENUM => "ENUM",
        SYM_MAP => "SYM_MAP",
        FIELD => "FIELD",
        STRUCT => "STRUCT",
        LIST => "LIST",
        END => "END",
        POINTER_TYP => "POINTER_TYP",
        _ => return None,
    };
    Some(name)
}

pub(crate) fn describe(code: u8) -> String {
    match name(code) {
        Some(name) => format!("{} (0x{:02x})", name, code),
        None => format!("unknown type code 0x{:02x}", code),
    }
}
