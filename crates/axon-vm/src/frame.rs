//! One function activation (spec §3's `Frame`).
//!
//! Top-level code has no `Frame` of its own: per spec, "top-level frames
//! share the VM's globals as their locals view," so the VM simply runs
//! top-level `CodeObject`s against `globals` directly (see `vm.rs`).
//! `Frame` exists for the one case where locals genuinely diverge from
//! globals: a function call (spec §9's required correction — every call
//! gets a fresh, empty `locals`, parented only by read-through access to
//! `globals`, never aliased into it).

use axon_util::Symbol;
use rustc_hash::FxHashMap;

use crate::value::Value;

pub struct Frame {
    pub locals: FxHashMap<Symbol, Value>,
    pub eval_stack: Vec<Value>,
}

impl Frame {
    pub fn new() -> Self {
        Self {
            locals: FxHashMap::default(),
            eval_stack: Vec::new(),
        }
    }

    pub fn with_params(params: &[Symbol], args: Vec<Value>) -> Self {
        let mut locals = FxHashMap::default();
        for (param, arg) in params.iter().zip(args) {
            locals.insert(*param, arg);
        }
        Self {
            locals,
            eval_stack: Vec::new(),
        }
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}
