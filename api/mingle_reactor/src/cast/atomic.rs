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

use super::CastDelegate;
use crate::{ReactorError, ValueError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};
use mingle_model::{
    AtomicTypeReference, BuiltinType, Enum, ObjectPath, RangeRestriction, Restriction,
    TypeReference, Value,
};
use std::cmp::Ordering;

/// Cast a scalar value to an atomic type and then check it against any restriction attached
/// to the type.
///
/// Values of the built in types are coerced between one another where there is a sensible
/// conversion (for example, the string `"5"` may be cast to `Int32` and the integer `5` to
/// `String`). Values of other types are passed through when their type matches exactly and
/// are otherwise offered to the delegate.
pub fn cast_atomic<D>(
    value: Value,
    target: &AtomicTypeReference,
    path: &ObjectPath,
    delegate: &D,
) -> Result<Value, ReactorError>
where
    D: CastDelegate + ?Sized,
{
    let cast = match BuiltinType::from_qualified_name(&target.name) {
        Some(builtin) => cast_builtin(value, builtin, target, path)?,
        None => match value {
            Value::Enum(Enum { type_name, value }) if type_name == target.name => {
                Value::Enum(Enum { type_name, value })
            }
            value => match delegate.cast_atomic(&value, target, path) {
                Some(result) => result?,
                None => return Err(mismatch(&value, target, path)),
            },
        },
    };
    if let Some(restriction) = &target.restriction {
        check_restriction(&cast, restriction, path)?;
    }
    Ok(cast)
}

fn mismatch(value: &Value, target: &AtomicTypeReference, path: &ObjectPath) -> ReactorError {
    ValueError::TypeMismatch {
        path: path.clone(),
        expected: TypeReference::Atomic(target.clone()),
        actual: value.type_of(),
    }
    .into()
}

fn cast_builtin(
    value: Value,
    builtin: BuiltinType,
    target: &AtomicTypeReference,
    path: &ObjectPath,
) -> Result<Value, ReactorError> {
    match builtin {
        BuiltinType::Value => Ok(value),
        BuiltinType::Null => match value {
            Value::Null => Ok(value),
            v => Err(mismatch(&v, target, path)),
        },
        BuiltinType::Boolean => match value {
            Value::Boolean(_) => Ok(value),
            Value::String(s) => match s.as_str() {
                "true" => Ok(Value::Boolean(true)),
                "false" => Ok(Value::Boolean(false)),
                _ => Err(invalid_text(builtin, &s, path)),
            },
            v => Err(mismatch(&v, target, path)),
        },
        BuiltinType::String => match as_text(&value) {
            Some(text) => Ok(Value::String(text)),
            None => Err(mismatch(&value, target, path)),
        },
        BuiltinType::Int32 | BuiltinType::Int64 | BuiltinType::Uint32 | BuiltinType::Uint64 => {
            cast_integral(value, builtin, target, path)
        }
        BuiltinType::Float32 | BuiltinType::Float64 => cast_float(value, builtin, target, path),
        BuiltinType::Timestamp => match value {
            Value::Timestamp(_) => Ok(value),
            Value::String(s) => match DateTime::parse_from_rfc3339(&s) {
                Ok(t) => Ok(Value::Timestamp(t.with_timezone(&Utc))),
                Err(_) => Err(invalid_text(builtin, &s, path)),
            },
            v => Err(mismatch(&v, target, path)),
        },
        BuiltinType::Buffer => match value {
            Value::Buffer(_) => Ok(value),
            Value::String(s) => match STANDARD.decode(s.as_bytes()) {
                Ok(bytes) => Ok(Value::Buffer(bytes)),
                Err(_) => Err(invalid_text(builtin, &s, path)),
            },
            v => Err(mismatch(&v, target, path)),
        },
        BuiltinType::SymbolMap => match value {
            Value::SymbolMap(_) => Ok(value),
            Value::Struct(s) => Ok(Value::SymbolMap(s.fields)),
            v => Err(mismatch(&v, target, path)),
        },
    }
}

/// The text form of a scalar value, if it has one.
fn as_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Boolean(b) => b.to_string(),
        Value::Int32(n) => n.to_string(),
        Value::Int64(n) => n.to_string(),
        Value::Uint32(n) => n.to_string(),
        Value::Uint64(n) => n.to_string(),
        Value::Float32(x) => x.to_string(),
        Value::Float64(x) => x.to_string(),
        Value::Timestamp(t) => t.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        Value::Enum(e) => e.value.to_string(),
        Value::Buffer(bytes) => STANDARD.encode(bytes),
        Value::Null | Value::List(_) | Value::SymbolMap(_) | Value::Struct(_) => return None,
    };
    Some(text)
}

fn invalid_text(builtin: BuiltinType, text: &str, path: &ObjectPath) -> ReactorError {
    ValueError::invalid(
        path,
        format!("Invalid {} value: {:?}", builtin.declared_name(), text),
    )
    .into()
}

fn out_of_range(builtin: BuiltinType, value: &Value, path: &ObjectPath) -> ReactorError {
    ValueError::invalid(
        path,
        format!(
            "Value {} is out of range for {}.",
            value,
            builtin.declared_name()
        ),
    )
    .into()
}

fn cast_integral(
    value: Value,
    builtin: BuiltinType,
    target: &AtomicTypeReference,
    path: &ObjectPath,
) -> Result<Value, ReactorError> {
    let wide: i128 = match &value {
        Value::Int32(n) => i128::from(*n),
        Value::Int64(n) => i128::from(*n),
        Value::Uint32(n) => i128::from(*n),
        Value::Uint64(n) => i128::from(*n),
        Value::Float32(x) if x.is_finite() => x.trunc() as i128,
        Value::Float64(x) if x.is_finite() => x.trunc() as i128,
        Value::Float32(_) | Value::Float64(_) => return Err(out_of_range(builtin, &value, path)),
        Value::String(s) => match s.trim().parse::<i128>() {
            Ok(n) => n,
            Err(_) => return Err(invalid_text(builtin, s, path)),
        },
        _ => return Err(mismatch(&value, target, path)),
    };
    let cast = match builtin {
        BuiltinType::Int32 => i32::try_from(wide).ok().map(Value::Int32),
        BuiltinType::Int64 => i64::try_from(wide).ok().map(Value::Int64),
        BuiltinType::Uint32 => u32::try_from(wide).ok().map(Value::Uint32),
        _ => u64::try_from(wide).ok().map(Value::Uint64),
    };
    cast.ok_or_else(|| out_of_range(builtin, &value, path))
}

fn cast_float(
    value: Value,
    builtin: BuiltinType,
    target: &AtomicTypeReference,
    path: &ObjectPath,
) -> Result<Value, ReactorError> {
    let wide = match &value {
        Value::Float32(x) if builtin == BuiltinType::Float32 => return Ok(Value::Float32(*x)),
        Value::Float32(x) => f64::from(*x),
        Value::Float64(x) => *x,
        Value::Int32(n) => f64::from(*n),
        Value::Int64(n) => *n as f64,
        Value::Uint32(n) => f64::from(*n),
        Value::Uint64(n) => *n as f64,
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(x) => x,
            Err(_) => return Err(invalid_text(builtin, s, path)),
        },
        _ => return Err(mismatch(&value, target, path)),
    };
    if builtin == BuiltinType::Float32 {
        let narrow = wide as f32;
        if wide.is_finite() && narrow.is_infinite() {
            return Err(out_of_range(builtin, &value, path));
        }
        Ok(Value::Float32(narrow))
    } else {
        Ok(Value::Float64(wide))
    }
}

fn check_restriction(
    value: &Value,
    restriction: &Restriction,
    path: &ObjectPath,
) -> Result<(), ReactorError> {
    let satisfied = match restriction {
        Restriction::Range(range) => in_range(value, range),
        Restriction::Regex(regex) => match value {
            Value::String(s) => regex.is_match(s),
            _ => false,
        },
    };
    if satisfied {
        Ok(())
    } else {
        Err(ValueError::RestrictionViolated {
            path: path.clone(),
            value: value.clone(),
            restriction: restriction.clone(),
        }
        .into())
    }
}

fn in_range(value: &Value, range: &RangeRestriction) -> bool {
    let RangeRestriction {
        min_closed,
        min,
        max,
        max_closed,
    } = range;
    let above_min = match min {
        Some(min) => match compare(value, min) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => *min_closed,
            _ => false,
        },
        None => true,
    };
    let below_max = match max {
        Some(max) => match compare(value, max) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => *max_closed,
            _ => false,
        },
        None => true,
    };
    above_min && below_max
}

fn as_integer(value: &Value) -> Option<i128> {
    match value {
        Value::Int32(n) => Some(i128::from(*n)),
        Value::Int64(n) => Some(i128::from(*n)),
        Value::Uint32(n) => Some(i128::from(*n)),
        Value::Uint64(n) => Some(i128::from(*n)),
        _ => None,
    }
}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Float32(x) => Some(f64::from(*x)),
        Value::Float64(x) => Some(*x),
        _ => as_integer(value).map(|n| n as f64),
    }
}

/// Order two values for range checks. Numbers of any type may be compared with one another.
fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        (Value::Timestamp(l), Value::Timestamp(r)) => Some(l.cmp(r)),
        _ => match (as_integer(left), as_integer(right)) {
            (Some(l), Some(r)) => Some(l.cmp(&r)),
            _ => as_float(left)?.partial_cmp(&as_float(right)?),
        },
    }
}
