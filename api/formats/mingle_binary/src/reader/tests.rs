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

use crate::type_code::*;
use crate::{BinIoError, BinReader, BinReaderConfig};
use mingle_model::{Identifier, Value};
use mingle_reactor::{DiscardReactor, Pipeline, Processor, ReactorError, StructuralCheck, TopType};

fn utf8(bytes: &mut Vec<u8>, text: &str) {
    bytes.extend_from_slice(&(text.len() as i32).to_le_bytes());
    bytes.extend_from_slice(text.as_bytes());
}

fn identifier(bytes: &mut Vec<u8>, parts: &[&str]) {
    bytes.push(ID);
    bytes.push(parts.len() as u8);
    for part in parts {
        utf8(bytes, part);
    }
}

fn codec_error(offset: u64, message: &str) -> BinIoError {
    BinIoError::Codec {
        offset,
        message: message.to_string(),
    }
}

#[test]
fn read_identifier() {
    let mut bytes = vec![];
    identifier(&mut bytes, &["foo", "bar"]);
    let mut reader = BinReader::new(bytes.as_slice());
    let id = reader.read_identifier().expect("Read failed.");
    assert_eq!(id, Identifier::new(["foo", "bar"]).unwrap());
    assert_eq!(reader.offset(), bytes.len() as u64);
    assert!(!reader.has_remaining());
}

#[test]
fn read_namespace() {
    let mut bytes = vec![NS, 2];
    identifier(&mut bytes, &["ns"]);
    identifier(&mut bytes, &["test"]);
    identifier(&mut bytes, &["v1"]);
    let mut reader = BinReader::new(bytes.as_slice());
    let namespace = reader.read_namespace().expect("Read failed.");
    assert_eq!(namespace.to_string(), "ns:test@v1");
}

#[test]
fn wrong_type_code() {
    let bytes = [STRING, 0, 0, 0, 0];
    let mut reader = BinReader::new(&bytes[..]);
    assert_eq!(
        reader.read_identifier(),
        Err(codec_error(0, "Expected an identifier but found STRING (0x0b)."))
    );
}

#[test]
fn unknown_type_code_in_value() {
    let bytes = [LIST, INT32, 1, 0, 0, 0, 0x30];
    let mut reader = BinReader::new(&bytes[..]);
    assert_eq!(
        reader.read_value(),
        Err(codec_error(
            6,
            "Expected a value but found unknown type code 0x30."
        ))
    );
}

#[test]
fn container_code_as_scalar() {
    let bytes = [STRUCT];
    let mut reader = BinReader::new(&bytes[..]);
    assert_eq!(
        reader.read_scalar(),
        Err(codec_error(
            0,
            "Expected a scalar value but found STRUCT (0x17)."
        ))
    );
}

#[test]
fn truncated_input() {
    let bytes = [INT32, 1, 0];
    let mut reader = BinReader::new(&bytes[..]);
    assert_eq!(
        reader.read_scalar(),
        Err(codec_error(1, "Expected an Int32 but the input ended."))
    );

    let empty: &[u8] = &[];
    let mut reader = BinReader::new(empty);
    assert_eq!(
        reader.read_value(),
        Err(codec_error(0, "Expected a type code but the input ended."))
    );
}

#[test]
fn unterminated_list() {
    let bytes = [LIST, NIL];
    let mut reader = BinReader::new(&bytes[..]);
    assert_eq!(
        reader.read_value(),
        Err(codec_error(2, "Expected a type code but the input ended."))
    );
}

#[test]
fn invalid_identifier_part() {
    let mut bytes = vec![];
    identifier(&mut bytes, &["Foo"]);
    let mut reader = BinReader::new(bytes.as_slice());
    assert_eq!(
        reader.read_identifier(),
        Err(codec_error(0, "'Foo' is not a valid identifier part."))
    );
}

#[test]
fn invalid_utf8() {
    let bytes = [STRING, 2, 0, 0, 0, 0xc3, 0x28];
    let mut reader = BinReader::new(&bytes[..]);
    assert_eq!(
        reader.read_scalar(),
        Err(codec_error(1, "A string contained invalid UTF-8."))
    );
}

#[test]
fn negative_length() {
    let bytes = [BUFFER, 0xff, 0xff, 0xff, 0xff];
    let mut reader = BinReader::new(&bytes[..]);
    assert_eq!(
        reader.read_scalar(),
        Err(codec_error(1, "Invalid length for a buffer: -1."))
    );
}

#[test]
fn invalid_boolean() {
    let bytes = [BOOL, 2];
    let mut reader = BinReader::new(&bytes[..]);
    assert_eq!(
        reader.read_scalar(),
        Err(codec_error(1, "Invalid boolean byte: 0x02."))
    );
}

#[test]
fn string_length_limit() {
    let config = BinReaderConfig {
        max_string_len: 2,
        ..Default::default()
    };
    let mut bytes = vec![STRING];
    utf8(&mut bytes, "abc");
    let mut reader = BinReader::with_config(bytes.as_slice(), config);
    assert_eq!(
        reader.read_scalar(),
        Err(codec_error(
            1,
            "Length of a string (3 bytes) exceeds the limit of 2 bytes."
        ))
    );
}

#[test]
fn depth_limit() {
    let config = BinReaderConfig {
        max_depth: 2,
        ..Default::default()
    };
    let bytes = [LIST, LIST, LIST, END, END, END];
    let mut reader = BinReader::with_config(&bytes[..], config);
    assert_eq!(
        reader.read_value(),
        Err(codec_error(2, "Maximum nesting depth of 2 exceeded."))
    );

    let mut reader = BinReader::with_config(&bytes[1..], config);
    assert_eq!(
        reader.read_value(),
        Ok(Value::List(vec![Value::List(vec![])]))
    );
}

#[test]
fn peek_does_not_consume() {
    let bytes = [NIL];
    let mut reader = BinReader::new(&bytes[..]);
    assert_eq!(reader.peek_type_code(), Ok(NIL));
    assert_eq!(reader.offset(), 0);
    assert_eq!(reader.next_type_code(), Ok(NIL));
    assert_eq!(reader.offset(), 1);
}

#[test]
fn timestamp() {
    let mut bytes = vec![TIMESTAMP];
    bytes.extend_from_slice(&1_700_000_000i64.to_le_bytes());
    bytes.extend_from_slice(&500i32.to_le_bytes());
    let mut reader = BinReader::new(bytes.as_slice());
    match reader.read_scalar() {
        Ok(Value::Timestamp(t)) => {
            assert_eq!(t.timestamp(), 1_700_000_000);
            assert_eq!(t.timestamp_subsec_nanos(), 500);
        }
        ow => panic!("Unexpected result: {:?}", ow),
    }

    let mut bytes = vec![TIMESTAMP];
    bytes.extend_from_slice(&0i64.to_le_bytes());
    bytes.extend_from_slice(&(-1i32).to_le_bytes());
    let mut reader = BinReader::new(bytes.as_slice());
    assert!(matches!(
        reader.read_scalar(),
        Err(BinIoError::Codec { offset: 1, .. })
    ));
}

#[test]
fn invalid_regex() {
    let mut bytes = vec![ATOM_TYP, QN, NS, 1];
    identifier(&mut bytes, &["ns"]);
    identifier(&mut bytes, &["v1"]);
    bytes.push(DECL_NM);
    utf8(&mut bytes, "Foo");
    let restriction_offset = bytes.len() as u64;
    bytes.push(REGEX_RESTRICT);
    utf8(&mut bytes, "(");
    let mut reader = BinReader::new(bytes.as_slice());
    match reader.read_type_reference() {
        Err(BinIoError::Codec { offset, message }) => {
            assert_eq!(offset, restriction_offset);
            assert!(message.starts_with("Invalid regular expression '('"));
        }
        ow => panic!("Unexpected result: {:?}", ow),
    }
}

#[test]
fn reactor_errors_propagate() {
    let processors: Vec<Box<dyn Processor>> = vec![Box::new(StructuralCheck::new(TopType::Map))];
    let mut pipeline = Pipeline::new(processors, DiscardReactor).expect("No processors.");
    let bytes = [LIST, END];
    let mut reader = BinReader::new(&bytes[..]);
    assert!(matches!(
        reader.read_reactor_value(&mut pipeline),
        Err(BinIoError::Reactor(ReactorError::Protocol(_)))
    ));
}
