//! Runtime values handed to and returned from operations

use chrono::NaiveDateTime;
use futures::future::BoxFuture;
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::io::{BufRead, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// A converted argument or a returned result
pub enum Value {
    Null,
    Bool(bool),
    Char(char),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    DateTime(NaiveDateTime),
    Enum(EnumValue),
    Stream(Box<dyn Read + Send>),
    TextReader(Box<dyn BufRead + Send>),
    TextWriter(Box<dyn Write + Send>),
    File(PathBuf),
    Directory(PathBuf),
    List(Vec<Value>),
    Array(Vec<Value>),
    Record(Record),
    Custom(CustomValue),
}

/// A selected enumeration member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub type_name: String,
    pub name: String,
    pub value: i64,
}

/// The materialized value of a composite parameter
#[derive(Debug)]
pub struct Record {
    pub type_name: String,
    pub fields: Vec<(String, Value)>,
}

impl Record {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

/// An opaque host value produced by a custom converter
#[derive(Clone)]
pub struct CustomValue {
    pub type_name: String,
    pub value: Arc<dyn Any + Send + Sync>,
}

impl CustomValue {
    pub fn new<T: Any + Send + Sync>(type_name: impl Into<String>, value: T) -> Self {
        CustomValue {
            type_name: type_name.into(),
            value: Arc::new(value),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::UInt(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            Value::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_date_time(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(d) => Some(*d),
            _ => None,
        }
    }

    /// Items of a list or array value
    pub fn as_items(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&PathBuf> {
        match self {
            Value::File(p) | Value::Directory(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_custom(&self) -> Option<&CustomValue> {
        match self {
            Value::Custom(c) => Some(c),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Char(c) => f.debug_tuple("Char").field(c).finish(),
            Value::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Value::UInt(u) => f.debug_tuple("UInt").field(u).finish(),
            Value::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::DateTime(d) => f.debug_tuple("DateTime").field(d).finish(),
            Value::Enum(e) => f.debug_tuple("Enum").field(e).finish(),
            Value::Stream(_) => f.write_str("Stream(..)"),
            Value::TextReader(_) => f.write_str("TextReader(..)"),
            Value::TextWriter(_) => f.write_str("TextWriter(..)"),
            Value::File(p) => f.debug_tuple("File").field(p).finish(),
            Value::Directory(p) => f.debug_tuple("Directory").field(p).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Array(items) => f.debug_tuple("Array").field(items).finish(),
            Value::Record(r) => f.debug_tuple("Record").field(r).finish(),
            Value::Custom(c) => write!(f, "Custom({})", c.type_name),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Char(c) => write!(f, "{}", c),
            Value::Int(i) => write!(f, "{}", i),
            Value::UInt(u) => write!(f, "{}", u),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => f.write_str(s),
            Value::DateTime(d) => write!(f, "{}", d),
            Value::Enum(e) => f.write_str(&e.name),
            Value::Stream(_) | Value::TextReader(_) | Value::TextWriter(_) => f.write_str("<handle>"),
            Value::File(p) | Value::Directory(p) => write!(f, "{}", p.display()),
            Value::List(items) | Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Record(r) => {
                write!(f, "{} {{", r.type_name)?;
                for (i, (name, value)) in r.fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, " {}: {}", name, value)?;
                }
                f.write_str(" }")
            }
            Value::Custom(c) => write!(f, "<{}>", c.type_name),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Asynchronous result of an operation
pub type Deferred = BoxFuture<'static, anyhow::Result<Value>>;

/// What an operation handed back
pub enum Returned {
    /// Nothing
    Unit,
    /// A value available immediately
    Value(Value),
    /// A value that has to be waited for before it can be used
    Deferred(Deferred),
}

impl Returned {
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        Returned::Deferred(Box::pin(future))
    }
}

impl From<Value> for Returned {
    fn from(value: Value) -> Self {
        Returned::Value(value)
    }
}

impl fmt::Debug for Returned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Returned::Unit => f.write_str("Unit"),
            Returned::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Returned::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// Everything an operation handler receives
pub struct Call<'a> {
    instance: Option<&'a mut (dyn Any + Send)>,
    args: Vec<Value>,
}

impl<'a> Call<'a> {
    pub fn new(instance: Option<&'a mut (dyn Any + Send)>, args: Vec<Value>) -> Self {
        Call { instance, args }
    }

    /// The group instance the operation runs on
    pub fn instance<T: Any>(&mut self) -> anyhow::Result<&mut T> {
        self.instance
            .as_deref_mut()
            .and_then(|i| i.downcast_mut::<T>())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "operation expected an instance of {}",
                    std::any::type_name::<T>()
                )
            })
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }

    /// Move an argument out, leaving `Null` behind
    pub fn take(&mut self, index: usize) -> Value {
        self.args
            .get_mut(index)
            .map(|v| std::mem::replace(v, Value::Null))
            .unwrap_or(Value::Null)
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}
