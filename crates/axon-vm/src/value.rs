//! Runtime value domain (spec §3).

use std::fmt;
use std::rc::Rc;

use axon_compile::CodeObject;
use axon_util::Symbol;
use indexmap::IndexMap;

use crate::error::RuntimeError;

/// A user-defined function's captured shape: its parameter names and the
/// bytecode compiled for its body. Functions capture nothing beyond
/// globals (spec §9: no closures).
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionValue {
    pub name: Symbol,
    pub params: Vec<Symbol>,
    pub body: CodeObject,
}

/// A host-language function exposed to Axon code through `globals`
/// (spec's "host callable"). `print`/`cls` are invoked directly by the
/// dedicated `Print`/`Clear` opcodes rather than through this path (spec
/// §4.4), so in the bundled language surface no user code can reach a
/// `HostFn` through `CALL_FUNCTION` — the variant exists so the VM's
/// name-resolution path documented in spec §4.4 ("if the binding is a
/// host callable, invoke it") is real, reachable code, exercised by
/// tests that register a synthetic host function.
#[derive(Clone)]
pub struct HostFn(pub Rc<dyn Fn(&[Value]) -> Result<Value, RuntimeError>>);

impl fmt::Debug for HostFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HostFn(..)")
    }
}

impl PartialEq for HostFn {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// A dict key (spec §3: "keys are hashable scalars"). Floats are keyed
/// by bit pattern so `Dict` can still use a plain hash map without
/// requiring `Eq`/`Hash` on `f64` itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Int(i64),
    FloatBits(u64),
    Bool(bool),
    Str(String),
    Nil,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(n) => write!(f, "{n}"),
            Key::FloatBits(bits) => write!(f, "{}", f64::from_bits(*bits)),
            Key::Bool(b) => write!(f, "{b}"),
            Key::Str(s) => write!(f, "{s}"),
            Key::Nil => write!(f, "nil"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
    List(Rc<Vec<Value>>),
    Dict(Rc<IndexMap<Key, Value>>),
    Function(Rc<FunctionValue>),
    HostFn(HostFn),
    Nil,
}

impl Value {
    /// Truthiness table resolved by spec §9: `false`, `0`, `0.0`, empty
    /// string, empty list, empty dict, and `Nil` are falsy; everything
    /// else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Bool(b) => *b,
            Value::String(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Dict(entries) => !entries.is_empty(),
            Value::Function(_) | Value::HostFn(_) => true,
            Value::Nil => false,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Dict(_) => "dict",
            Value::Function(_) => "function",
            Value::HostFn(_) => "function",
            Value::Nil => "nil",
        }
    }

    /// Converts a hashable scalar into a `Dict` key, or fails with
    /// `TypeError` for containers and functions.
    pub fn into_key(self) -> Result<Key, RuntimeError> {
        match self {
            Value::Int(n) => Ok(Key::Int(n)),
            Value::Float(f) => Ok(Key::FloatBits(f.to_bits())),
            Value::Bool(b) => Ok(Key::Bool(b)),
            Value::String(s) => Ok(Key::Str(s)),
            Value::Nil => Ok(Key::Nil),
            other => Err(RuntimeError::TypeError(format!(
                "unhashable type used as dict key: {}",
                other.type_name()
            ))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::String(s) => write!(f, "{s}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Dict(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
            Value::Function(func) => write!(f, "<function {}>", func.name),
            Value::HostFn(_) => write!(f, "<host function>"),
            Value::Nil => write!(f, "nil"),
        }
    }
}
