//! Stack-based dispatch loop (spec §4.4), with the §9 corrections:
//! fresh per-call `locals`, `RETURN` outside a function is an error,
//! division by zero is a `TypeError`, and the truthiness table resolved
//! there.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::rc::Rc;

use axon_compile::{CodeObject, Const, Instr};
use axon_util::Symbol;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::error::RuntimeError;
use crate::value::{FunctionValue, HostFn, Value};

type Env = Rc<RefCell<FxHashMap<Symbol, Value>>>;

/// Outcome of running a `CodeObject` to completion, used to propagate
/// `return`/`break`/`continue` up through nested constructs without
/// resorting to ip-pair bookkeeping once `while`/`for` bodies became
/// their own nested `CodeObject`s (see DESIGN.md).
enum Signal {
    Normal,
    Return(Value),
    Break,
    Continue,
}

/// CLI-configurable VM behavior (spec's ambient config section).
#[derive(Debug, Clone)]
pub struct VmOptions {
    pub allow_clear_screen: bool,
}

impl Default for VmOptions {
    fn default() -> Self {
        Self {
            allow_clear_screen: true,
        }
    }
}

/// A reusable bytecode interpreter. `globals` persists across
/// `push_frame`/`run` cycles so a REPL can keep state between
/// statements (spec §6).
pub struct VM {
    globals: Env,
    pending: VecDeque<CodeObject>,
    options: VmOptions,
}

impl VM {
    pub fn new() -> Self {
        Self::with_options(VmOptions::default())
    }

    pub fn with_options(options: VmOptions) -> Self {
        let globals = Rc::new(RefCell::new(FxHashMap::default()));
        register_host_bindings(&globals, &options);
        Self {
            globals,
            pending: VecDeque::new(),
            options,
        }
    }

    pub fn push_frame(&mut self, code: CodeObject) {
        debug!(name = %code.name, instrs = code.len(), "queued code object");
        self.pending.push_back(code);
    }

    /// Runs every queued `CodeObject` to completion. `globals` is left
    /// intact even when a run fails, so a REPL driver can print the
    /// error and keep accepting input (spec §4.4's "errors are fatal for
    /// the current `run()` invocation").
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        while let Some(code) = self.pending.pop_front() {
            let mut stack = Vec::new();
            let globals = self.globals.clone();
            match exec_code(&code, &globals, &globals, &self.options, &mut stack)? {
                Signal::Normal => {}
                Signal::Return(_) => {
                    return Err(RuntimeError::ReturnOutsideFunction(
                        "'return' used outside of a function".into(),
                    ))
                }
                Signal::Break | Signal::Continue => {
                    return Err(RuntimeError::LoopControlOutsideLoop(
                        "'break'/'continue' used outside of a loop".into(),
                    ))
                }
            }
        }
        Ok(())
    }

    /// Reads a global binding without running any code; used by tests
    /// and by a REPL that wants to echo a bare expression's value.
    pub fn get_global(&self, name: Symbol) -> Option<Value> {
        self.globals.borrow().get(&name).cloned()
    }
}

impl Default for VM {
    fn default() -> Self {
        Self::new()
    }
}

fn register_host_bindings(globals: &Env, options: &VmOptions) {
    let allow_clear = options.allow_clear_screen;
    globals.borrow_mut().insert(
        Symbol::intern("print"),
        Value::HostFn(HostFn(Rc::new(|args: &[Value]| {
            let rendered = args
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            println!("{rendered}");
            io::stdout().flush().ok();
            Ok(Value::Nil)
        }))),
    );
    globals.borrow_mut().insert(
        Symbol::intern("cls"),
        Value::HostFn(HostFn(Rc::new(move |_args: &[Value]| {
            if allow_clear {
                print!("\x1B[2J\x1B[H");
                io::stdout().flush().ok();
            }
            Ok(Value::Nil)
        }))),
    );
}

fn const_to_value(c: &Const) -> Value {
    match c {
        Const::Int(n) => Value::Int(*n),
        Const::Float(f) => Value::Float(*f),
        Const::Bool(b) => Value::Bool(*b),
        Const::Str(s) => Value::String(s.clone()),
        Const::Nil => Value::Nil,
    }
}

fn pop(stack: &mut Vec<Value>) -> Result<Value, RuntimeError> {
    stack
        .pop()
        .ok_or_else(|| RuntimeError::StackUnderflow("evaluation stack is empty".into()))
}

fn pop_n(stack: &mut Vec<Value>, n: usize) -> Result<Vec<Value>, RuntimeError> {
    if stack.len() < n {
        return Err(RuntimeError::StackUnderflow(format!(
            "expected {n} values on the evaluation stack, found {}",
            stack.len()
        )));
    }
    Ok(stack.split_off(stack.len() - n))
}

fn load_name(locals: &Env, globals: &Env, name: Symbol) -> Result<Value, RuntimeError> {
    if let Some(v) = locals.borrow().get(&name) {
        return Ok(v.clone());
    }
    if let Some(v) = globals.borrow().get(&name) {
        return Ok(v.clone());
    }
    Err(RuntimeError::NameError(format!("undefined name '{name}'")))
}

/// Executes one `CodeObject`'s instructions against `locals`/`globals`,
/// using `stack` as its evaluation stack. Nested `if`/`and`/`or` are
/// flattened into the same instruction stream by the compiler, so they
/// fall out of this loop's ordinary ip stepping; `while`/`for` bodies are
/// separate `CodeObject`s run recursively, sharing `locals` (spec §4.4
/// describes the for-loop body as running in "a fresh child frame whose
/// globals alias the current VM's globals" — sharing `locals` by `Rc`
/// clone is the Rust-idiomatic reading of that aliasing).
fn exec_code(
    code: &CodeObject,
    locals: &Env,
    globals: &Env,
    options: &VmOptions,
    stack: &mut Vec<Value>,
) -> Result<Signal, RuntimeError> {
    let mut ip = 0usize;
    while ip < code.code.len() {
        let instr = &code.code[ip];
        trace!(ip, ?instr, "dispatch");
        ip += 1;
        match instr {
            Instr::Const(idx) => stack.push(const_to_value(&code.consts[*idx as usize])),
            Instr::LoadName(name) => stack.push(load_name(locals, globals, *name)?),
            Instr::StoreName(name) => {
                let value = pop(stack)?;
                locals.borrow_mut().insert(*name, value);
            }
            Instr::Dup => {
                let top = stack
                    .last()
                    .cloned()
                    .ok_or_else(|| RuntimeError::StackUnderflow("nothing to duplicate".into()))?;
                stack.push(top);
            }
            Instr::Pop => {
                pop(stack)?;
            }
            Instr::Print => {
                let value = pop(stack)?;
                println!("{value}");
                io::stdout().flush().ok();
            }
            Instr::Clear => {
                if options.allow_clear_screen {
                    print!("\x1B[2J\x1B[H");
                    io::stdout().flush().ok();
                }
            }
            Instr::BuildList(n) => {
                let items = pop_n(stack, *n as usize)?;
                stack.push(Value::List(Rc::new(items)));
            }
            Instr::BuildDict(n) => {
                let flat = pop_n(stack, 2 * *n as usize)?;
                let mut map = IndexMap::new();
                for pair in flat.chunks(2) {
                    let key = pair[0].clone().into_key()?;
                    map.insert(key, pair[1].clone());
                }
                stack.push(Value::Dict(Rc::new(map)));
            }
            Instr::BinarySubscr => {
                let index = pop(stack)?;
                let collection = pop(stack)?;
                stack.push(subscript(&collection, index)?);
            }
            Instr::BinaryAdd => binary_arith(stack, Arith::Add)?,
            Instr::BinarySub => binary_arith(stack, Arith::Sub)?,
            Instr::BinaryMul => binary_arith(stack, Arith::Mul)?,
            Instr::BinaryDiv => binary_arith(stack, Arith::Div)?,
            Instr::BinaryMod => binary_arith(stack, Arith::Mod)?,
            Instr::CompareEq => {
                let b = pop(stack)?;
                let a = pop(stack)?;
                stack.push(Value::Bool(values_equal(&a, &b)));
            }
            Instr::CompareNe => {
                let b = pop(stack)?;
                let a = pop(stack)?;
                stack.push(Value::Bool(!values_equal(&a, &b)));
            }
            Instr::CompareLt => compare(stack, |o| o == std::cmp::Ordering::Less)?,
            Instr::CompareLe => compare(stack, |o| o != std::cmp::Ordering::Greater)?,
            Instr::CompareGt => compare(stack, |o| o == std::cmp::Ordering::Greater)?,
            Instr::CompareGe => compare(stack, |o| o != std::cmp::Ordering::Less)?,
            // Never emitted by the compiler (spec §9's short-circuit
            // correction); kept semantically meaningful for
            // completeness rather than treated as unknown opcodes.
            Instr::BinaryAnd => {
                let b = pop(stack)?;
                let a = pop(stack)?;
                stack.push(if a.is_truthy() { b } else { a });
            }
            Instr::BinaryOr => {
                let b = pop(stack)?;
                let a = pop(stack)?;
                stack.push(if a.is_truthy() { a } else { b });
            }
            Instr::UnaryNeg => {
                let v = pop(stack)?;
                stack.push(match v {
                    Value::Int(n) => Value::Int(-n),
                    Value::Float(f) => Value::Float(-f),
                    other => {
                        return Err(RuntimeError::TypeError(format!(
                            "unary '-' is not defined for {}",
                            other.type_name()
                        )))
                    }
                });
            }
            Instr::UnaryNot => {
                let v = pop(stack)?;
                stack.push(Value::Bool(!v.is_truthy()));
            }
            Instr::CallFunction(name, argc) => {
                call_function(*name, *argc as usize, locals, globals, options, stack)?
            }
            Instr::Jump(offset) => {
                ip = apply_offset(ip, *offset)?;
            }
            Instr::JumpIfFalse(offset) => {
                let cond = pop(stack)?;
                if !cond.is_truthy() {
                    ip = apply_offset(ip, *offset)?;
                }
            }
            Instr::MakeFunction { name, params, body } => {
                locals.borrow_mut().insert(
                    *name,
                    Value::Function(Rc::new(FunctionValue {
                        name: *name,
                        params: params.clone(),
                        body: body.clone(),
                    })),
                );
            }
            Instr::Return => {
                let value = stack.pop().unwrap_or(Value::Nil);
                return Ok(Signal::Return(value));
            }
            Instr::Break => return Ok(Signal::Break),
            Instr::Continue => return Ok(Signal::Continue),
            Instr::ForLoop { var, body } => {
                let end = pop(stack)?;
                let end_n = expect_int(&end, "for-loop end value")?;
                let start = load_name(locals, globals, *var)?;
                let mut i = expect_int(&start, "for-loop start value")?;
                loop {
                    if i >= end_n {
                        break;
                    }
                    locals.borrow_mut().insert(*var, Value::Int(i));
                    let mut body_stack = Vec::new();
                    match exec_code(body, locals, globals, options, &mut body_stack)? {
                        Signal::Normal | Signal::Continue => {}
                        Signal::Break => break,
                        Signal::Return(v) => return Ok(Signal::Return(v)),
                    }
                    i += 1;
                }
            }
            Instr::WhileLoop { cond, body } => loop {
                let mut cond_stack = Vec::new();
                exec_code(cond, locals, globals, options, &mut cond_stack)?;
                let condition = cond_stack.pop().ok_or_else(|| {
                    RuntimeError::StackUnderflow("while condition produced no value".into())
                })?;
                if !condition.is_truthy() {
                    break;
                }
                let mut body_stack = Vec::new();
                match exec_code(body, locals, globals, options, &mut body_stack)? {
                    Signal::Normal => {}
                    Signal::Break => break,
                    Signal::Continue => continue,
                    Signal::Return(v) => return Ok(Signal::Return(v)),
                }
            },
        }
    }
    Ok(Signal::Normal)
}

fn apply_offset(ip: usize, offset: i32) -> Result<usize, RuntimeError> {
    let target = ip as i64 + offset as i64;
    if target < 0 {
        return Err(RuntimeError::UnknownOpcode(format!(
            "jump target {target} is out of range"
        )));
    }
    Ok(target as usize)
}

fn expect_int(value: &Value, what: &str) -> Result<i64, RuntimeError> {
    match value {
        Value::Int(n) => Ok(*n),
        other => Err(RuntimeError::TypeError(format!(
            "{what} must be an integer, found {}",
            other.type_name()
        ))),
    }
}

fn call_function(
    name: Symbol,
    argc: usize,
    locals: &Env,
    globals: &Env,
    options: &VmOptions,
    stack: &mut Vec<Value>,
) -> Result<(), RuntimeError> {
    let args = pop_n(stack, argc)?;
    let callee = load_name(locals, globals, name)?;
    match callee {
        Value::Function(func) => {
            if func.params.len() != args.len() {
                return Err(RuntimeError::TypeError(format!(
                    "'{name}' expects {} argument(s), got {}",
                    func.params.len(),
                    args.len()
                )));
            }
            debug!(%name, argc, "pushing call frame");
            // Fresh locals per call (spec §9, required): never aliases
            // or writes into `globals`.
            let call_locals: Env = Rc::new(RefCell::new(FxHashMap::default()));
            for (param, arg) in func.params.iter().zip(args) {
                call_locals.borrow_mut().insert(*param, arg);
            }
            let mut call_stack = Vec::new();
            let signal = exec_code(&func.body, &call_locals, globals, options, &mut call_stack)?;
            debug!(%name, "popping call frame");
            match signal {
                Signal::Return(v) => stack.push(v),
                Signal::Normal => stack.push(Value::Nil),
                Signal::Break | Signal::Continue => {
                    return Err(RuntimeError::LoopControlOutsideLoop(format!(
                        "'break'/'continue' escaped the body of '{name}'"
                    )))
                }
            }
        }
        Value::HostFn(host) => {
            let result = (host.0)(&args)?;
            stack.push(result);
        }
        other => {
            return Err(RuntimeError::CallOfNonFunction(format!(
                "'{name}' is not callable (found {})",
                other.type_name()
            )))
        }
    }
    Ok(())
}

fn subscript(collection: &Value, index: Value) -> Result<Value, RuntimeError> {
    match collection {
        Value::List(items) => {
            let i = expect_int(&index, "list index")?;
            let len = items.len() as i64;
            if i < 0 || i >= len {
                return Err(RuntimeError::IndexError(format!(
                    "list index {i} out of bounds (length {len})"
                )));
            }
            Ok(items[i as usize].clone())
        }
        Value::Dict(entries) => {
            let key = index.into_key()?;
            entries
                .get(&key)
                .cloned()
                .ok_or_else(|| RuntimeError::IndexError(format!("key '{key}' not found")))
        }
        other => Err(RuntimeError::TypeError(format!(
            "'{}' is not subscriptable",
            other.type_name()
        ))),
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(x), Value::Float(y)) | (Value::Float(y), Value::Int(x)) => *x as f64 == *y,
        _ => a == b,
    }
}

enum Arith {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

fn binary_arith(stack: &mut Vec<Value>, op: Arith) -> Result<(), RuntimeError> {
    let b = pop(stack)?;
    let a = pop(stack)?;
    let result = match (&op, &a, &b) {
        (Arith::Add, Value::String(x), Value::String(y)) => Value::String(format!("{x}{y}")),
        (Arith::Add, Value::String(_), _) | (Arith::Add, _, Value::String(_)) => {
            return Err(RuntimeError::TypeError(format!(
                "cannot add {} and {}",
                a.type_name(),
                b.type_name()
            )))
        }
        // Division always yields a float (spec §4.4); zero divisor is a
        // TypeError regardless of operand types (spec §9 resolution).
        (Arith::Div, _, _) => {
            let (x, y) = (as_f64(&a)?, as_f64(&b)?);
            if y == 0.0 {
                return Err(RuntimeError::TypeError("division by zero".into()));
            }
            Value::Float(x / y)
        }
        (Arith::Mod, Value::Int(x), Value::Int(y)) => {
            if *y == 0 {
                return Err(RuntimeError::TypeError("division by zero".into()));
            }
            Value::Int(x % y)
        }
        (Arith::Mod, _, _) => {
            let (x, y) = (as_f64(&a)?, as_f64(&b)?);
            if y == 0.0 {
                return Err(RuntimeError::TypeError("division by zero".into()));
            }
            Value::Float(x % y)
        }
        (Arith::Add, Value::Int(x), Value::Int(y)) => Value::Int(x + y),
        (Arith::Sub, Value::Int(x), Value::Int(y)) => Value::Int(x - y),
        (Arith::Mul, Value::Int(x), Value::Int(y)) => Value::Int(x * y),
        (Arith::Add, _, _) => Value::Float(as_f64(&a)? + as_f64(&b)?),
        (Arith::Sub, _, _) => Value::Float(as_f64(&a)? - as_f64(&b)?),
        (Arith::Mul, _, _) => Value::Float(as_f64(&a)? * as_f64(&b)?),
    };
    stack.push(result);
    Ok(())
}

fn as_f64(v: &Value) -> Result<f64, RuntimeError> {
    match v {
        Value::Int(n) => Ok(*n as f64),
        Value::Float(f) => Ok(*f),
        other => Err(RuntimeError::TypeError(format!(
            "expected a number, found {}",
            other.type_name()
        ))),
    }
}

fn compare(stack: &mut Vec<Value>, accept: impl Fn(std::cmp::Ordering) -> bool) -> Result<(), RuntimeError> {
    let b = pop(stack)?;
    let a = pop(stack)?;
    let ordering = match (&a, &b) {
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => as_f64(&a)?
            .partial_cmp(&as_f64(&b)?)
            .ok_or_else(|| RuntimeError::TypeError("cannot order NaN".into()))?,
    };
    stack.push(Value::Bool(accept(ordering)));
    Ok(())
}
