//! Value converter
//!
//! Turns a single argument token, or a declared default, into a [`Value`] of the
//! parameter's declared type.

use crate::catalog::{EnumValue, Literal, ParamType, ScalarKind, Value};
use crate::error::{BindError, BindResult, DefinitionError};
use crate::resolve::Comparison;
use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader};
use std::path::PathBuf;
use tracing::trace;

/// Token that stands for the standard input or output handle
pub const STD_HANDLE: &str = "-";

/// Token accepted as null by every nullable non-string parameter
pub const NULL_TOKEN: &str = "null";

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Convert `token` for the parameter called `parameter` declared as `ty`
pub fn convert(parameter: &str, ty: &ParamType, token: &str, cmp: Comparison) -> BindResult<Value> {
    trace!(parameter, token, ty = %ty, "converting token");

    match ty {
        ParamType::Scalar(ScalarKind::String) => Ok(Value::String(token.to_string())),

        ParamType::Nullable(inner) => {
            if token.is_empty() || (!is_text(inner) && cmp.eq(token, NULL_TOKEN)) {
                return Ok(Value::Null);
            }
            convert(parameter, inner, token, cmp)
        }

        ParamType::Enum(ty) => match ty.parse(token, cmp) {
            Some(member) => Ok(Value::Enum(EnumValue {
                type_name: ty.name.clone(),
                name: member.name.clone(),
                value: member.value,
            })),
            None => Err(failed(
                parameter,
                format!("'{}' is not a member of {}", token, ty.name),
            )),
        },

        ParamType::Stream => {
            if token == STD_HANDLE {
                return Ok(Value::Stream(Box::new(io::stdin())));
            }
            let file = open_existing(parameter, token)?;
            Ok(Value::Stream(Box::new(file)))
        }

        ParamType::TextReader => {
            if token == STD_HANDLE {
                return Ok(Value::TextReader(Box::new(BufReader::new(io::stdin()))));
            }
            let file = open_existing(parameter, token)?;
            Ok(Value::TextReader(Box::new(BufReader::new(file))))
        }

        ParamType::TextWriter => {
            if token == STD_HANDLE {
                return Ok(Value::TextWriter(Box::new(io::stdout())));
            }
            let file = create_new(parameter, token)?;
            Ok(Value::TextWriter(Box::new(file)))
        }

        ParamType::FilePath => Ok(Value::File(PathBuf::from(token))),
        ParamType::DirectoryPath => Ok(Value::Directory(PathBuf::from(token))),
        ParamType::Any => Ok(Value::String(token.to_string())),

        ParamType::Scalar(kind) => parse_scalar(parameter, *kind, token),

        ParamType::Custom(custom) => {
            let to_value = custom
                .converter
                .as_ref()
                .or(custom.constructor.as_ref())
                .ok_or_else(|| unsupported(parameter, ty))?;
            to_value(token).map_err(|e| BindError::conversion(parameter, Some(e.into())))
        }

        // only reachable through a slot, never as a direct target
        ParamType::Enumerable { .. } | ParamType::Composite(_) => Err(unsupported(parameter, ty)),
    }
}

/// Apply a declared default to a parameter of type `ty`.
///
/// Text defaults go through [`convert`]; other literals are cast to the target.
pub fn coerce(parameter: &str, ty: &ParamType, literal: &Literal, cmp: Comparison) -> BindResult<Value> {
    trace!(parameter, ?literal, ty = %ty, "applying default");

    if let Literal::Text(s) = literal {
        return convert(parameter, ty, s, cmp);
    }

    match ty {
        ParamType::Nullable(inner) => match literal {
            Literal::Null => Ok(Value::Null),
            _ => coerce(parameter, inner, literal, cmp),
        },

        ParamType::Any => Ok(match literal {
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Int(i) => Value::Int(*i),
            Literal::Float(f) => Value::Float(*f),
            Literal::Text(s) => Value::String(s.clone()),
        }),

        ParamType::Scalar(ScalarKind::String) => Ok(match literal {
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::String(b.to_string()),
            Literal::Int(i) => Value::String(i.to_string()),
            Literal::Float(f) => Value::String(f.to_string()),
            Literal::Text(s) => Value::String(s.clone()),
        }),

        ParamType::Scalar(kind) => cast_scalar(parameter, *kind, literal),

        ParamType::Enum(ty) => match literal {
            Literal::Int(i) => ty
                .by_value(*i)
                .map(|member| {
                    Value::Enum(EnumValue {
                        type_name: ty.name.clone(),
                        name: member.name.clone(),
                        value: member.value,
                    })
                })
                .ok_or_else(|| failed(parameter, format!("{} is not a value of {}", i, ty.name))),
            other => Err(failed(parameter, format!("cannot use {:?} as {}", other, ty.name))),
        },

        ParamType::Enumerable { .. } | ParamType::Composite(_) => Err(unsupported(parameter, ty)),

        // handles, paths and host types only take a null default
        _ => match literal {
            Literal::Null => Ok(Value::Null),
            other => Err(failed(parameter, format!("cannot use {:?} as {}", other, ty))),
        },
    }
}

fn is_text(ty: &ParamType) -> bool {
    matches!(ty, ParamType::Scalar(ScalarKind::String))
}

fn parse_scalar(parameter: &str, kind: ScalarKind, token: &str) -> BindResult<Value> {
    let s = token.trim();

    match kind {
        ScalarKind::String => Ok(Value::String(token.to_string())),
        ScalarKind::Boolean => {
            if s.eq_ignore_ascii_case("true") {
                Ok(Value::Bool(true))
            } else if s.eq_ignore_ascii_case("false") {
                Ok(Value::Bool(false))
            } else {
                Err(failed(parameter, format!("'{}' is not a boolean", token)))
            }
        }
        ScalarKind::Char => {
            let mut chars = token.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::Char(c)),
                _ => Err(failed(parameter, format!("'{}' is not a single character", token))),
            }
        }
        ScalarKind::Single => s
            .parse::<f32>()
            .map(|f| Value::Float(f as f64))
            .map_err(|e| BindError::conversion(parameter, Some(Box::new(e)))),
        ScalarKind::Double => s
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|e| BindError::conversion(parameter, Some(Box::new(e)))),
        ScalarKind::DateTime => parse_date_time(s)
            .map(Value::DateTime)
            .ok_or_else(|| failed(parameter, format!("'{}' is not a date", token))),
        _ => {
            let n = s
                .parse::<i128>()
                .map_err(|e| BindError::conversion(parameter, Some(Box::new(e))))?;
            integer(kind, n).ok_or_else(|| {
                failed(
                    parameter,
                    format!("{} is out of range for {}", n, kind.type_code()),
                )
            })
        }
    }
}

fn cast_scalar(parameter: &str, kind: ScalarKind, literal: &Literal) -> BindResult<Value> {
    let value = match (kind, literal) {
        (ScalarKind::Boolean, Literal::Bool(b)) => Some(Value::Bool(*b)),
        (ScalarKind::Boolean, Literal::Int(i)) => Some(Value::Bool(*i != 0)),
        (ScalarKind::Single | ScalarKind::Double, Literal::Int(i)) => Some(Value::Float(*i as f64)),
        (ScalarKind::Single | ScalarKind::Double, Literal::Float(f)) => Some(Value::Float(*f)),
        (ScalarKind::Char, Literal::Int(i)) => u32::try_from(*i)
            .ok()
            .and_then(char::from_u32)
            .map(Value::Char),
        (ScalarKind::DateTime, _) | (_, Literal::Null) => None,
        (kind, Literal::Int(i)) => integer(kind, *i as i128),
        (kind, Literal::Float(f)) if f.fract() == 0.0 => integer(kind, *f as i128),
        (kind, Literal::Bool(b)) => integer(kind, *b as i128),
        _ => None,
    };

    value.ok_or_else(|| {
        failed(
            parameter,
            format!("cannot use {:?} as {}", literal, kind.type_code()),
        )
    })
}

/// Range-checked integer of the given kind
fn integer(kind: ScalarKind, n: i128) -> Option<Value> {
    let (min, max) = match kind {
        ScalarKind::SByte => (i8::MIN as i128, i8::MAX as i128),
        ScalarKind::Byte => (0, u8::MAX as i128),
        ScalarKind::Int16 => (i16::MIN as i128, i16::MAX as i128),
        ScalarKind::UInt16 => (0, u16::MAX as i128),
        ScalarKind::Int32 => (i32::MIN as i128, i32::MAX as i128),
        ScalarKind::UInt32 => (0, u32::MAX as i128),
        ScalarKind::Int64 => (i64::MIN as i128, i64::MAX as i128),
        ScalarKind::UInt64 => (0, u64::MAX as i128),
        _ => return None,
    };

    if n < min || n > max {
        return None;
    }

    Some(match kind {
        ScalarKind::UInt64 => Value::UInt(n as u64),
        _ => Value::Int(n as i64),
    })
}

fn parse_date_time(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn open_existing(parameter: &str, token: &str) -> BindResult<File> {
    File::open(token).map_err(|e| BindError::conversion(parameter, Some(Box::new(e))))
}

fn create_new(parameter: &str, token: &str) -> BindResult<File> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(token)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => BindError::FileExists {
                parameter: parameter.to_string(),
                path: PathBuf::from(token),
            },
            _ => BindError::conversion(parameter, Some(Box::new(e))),
        })
}

fn failed(parameter: &str, message: String) -> BindError {
    BindError::conversion(parameter, Some(anyhow!(message).into()))
}

fn unsupported(parameter: &str, ty: &ParamType) -> BindError {
    BindError::Definition(DefinitionError::UnsupportedType {
        parameter: parameter.to_string(),
        type_name: ty.display_name(),
    })
}
