//! A small string interner for identifier names.
//!
//! Axon programs re-read the same handful of names (locals, function
//! names, globals) constantly during both compilation and execution.
//! Interning them once means every later comparison and hash is on a
//! `u32`, not a re-walked `String`.
//!
//! Unlike a production compiler's interner, this one is not thread-safe
//! on purpose: a single `VM::run()` call and a single `compile()` call
//! each execute on one thread (spec §5), so there is nothing to
//! synchronize.

use std::cell::RefCell;
use std::fmt;

use rustc_hash::FxHashMap;

thread_local! {
    static TABLE: RefCell<Table> = RefCell::new(Table::new());
}

struct Table {
    strings: Vec<Box<str>>,
    lookup: FxHashMap<Box<str>, u32>,
}

impl Table {
    fn new() -> Self {
        Self {
            strings: Vec::new(),
            lookup: FxHashMap::default(),
        }
    }

    fn intern(&mut self, s: &str) -> u32 {
        if let Some(&id) = self.lookup.get(s) {
            return id;
        }
        let id = self.strings.len() as u32;
        let boxed: Box<str> = s.into();
        self.strings.push(boxed.clone());
        self.lookup.insert(boxed, id);
        id
    }
}

/// An interned identifier. Cheap to copy, compare, and hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    pub fn intern(s: &str) -> Self {
        TABLE.with(|t| Symbol(t.borrow_mut().intern(s)))
    }

    /// Copy the interned text out as an owned `String`.
    ///
    /// There is no `&'static str` accessor here: unlike the teacher's
    /// interner this one does not leak memory, so the string can only be
    /// borrowed for the lifetime of the thread-local table borrow.
    pub fn as_string(&self) -> String {
        TABLE.with(|t| t.borrow().strings[self.0 as usize].to_string())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_string())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_string_interns_to_same_symbol() {
        let a = Symbol::intern("foo");
        let b = Symbol::intern("foo");
        assert_eq!(a, b);
    }

    #[test]
    fn different_strings_intern_differently() {
        let a = Symbol::intern("foo");
        let b = Symbol::intern("bar");
        assert_ne!(a, b);
    }

    #[test]
    fn round_trips_text() {
        let s = Symbol::intern("hello_world");
        assert_eq!(s.as_string(), "hello_world");
    }
}
