use core::fmt;
use std::{cell::RefCell, rc::Rc};

use itertools::Itertools;

use crate::{environment::Environment, error::{LispError, LispResult}, symbol::{intern, Symbol}};

pub type BuiltinFn = fn(Atom) -> LispResult<Atom>;

/// A host primitive. Builtins are compared by name, which the registry keeps unique.
#[derive(Clone, Copy)]
pub struct Builtin {
    name: &'static str,
    func: BuiltinFn,
}

impl Builtin {
    pub const fn new(name: &'static str, func: BuiltinFn) -> Self {
        Self { name, func }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn call(&self, args: Atom) -> LispResult<Atom> {
        (self.func)(args)
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// A two-slot mutable cell. Clones share the cell, so a mutation through one
/// handle is seen through every other.
#[derive(Clone)]
pub struct Pair(Rc<RefCell<(Atom, Atom)>>);

impl Pair {
    pub fn new(car: Atom, cdr: Atom) -> Self {
        Self(Rc::new(RefCell::new((car, cdr))))
    }

    pub fn car(&self) -> Atom {
        self.0.borrow().0.clone()
    }

    pub fn cdr(&self) -> Atom {
        self.0.borrow().1.clone()
    }

    pub fn set_car(&self, value: Atom) {
        self.0.borrow_mut().0 = value;
    }

    pub fn set_cdr(&self, value: Atom) {
        self.0.borrow_mut().1 = value;
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Shared shape of closures and macros.
pub struct Closure {
    pub(crate) env: Environment,
    pub(crate) params: Atom,
    pub(crate) body: Atom,
}

impl Closure {
    /// Checks that `body` is a proper list and that `params` is a chain of
    /// symbols ending in Nil or in a rest symbol.
    pub fn new(env: Environment, params: Atom, body: Atom) -> LispResult<Self> {
        if !body.is_list() {
            return Err(LispError::syntax("Function body must be a list."));
        }

        let mut p = params.clone();
        loop {
            p = match p {
                Atom::Nil | Atom::Symbol(_) => break,
                Atom::Pair(pair) if matches!(pair.car(), Atom::Symbol(_)) => pair.cdr(),
                _ => return Err(LispError::type_error("Arguments need to be symbols.")),
            };
        }

        Ok(Self { env, params, body })
    }
}

#[derive(Clone)]
pub enum Atom {
    Nil,
    Integer(i64),
    Real(f64),
    String(Rc<str>),
    Symbol(Symbol),
    Pair(Pair),
    Builtin(Builtin),
    Closure(Rc<Closure>),
    Macro(Rc<Closure>),
    Error(Rc<LispError>),
}

impl Atom {
    pub fn cons(car: Atom, cdr: Atom) -> Self {
        Self::Pair(Pair::new(car, cdr))
    }

    pub fn symbol(name: &str) -> Self {
        Self::Symbol(intern(name))
    }

    pub fn string(text: impl Into<Rc<str>>) -> Self {
        Self::String(text.into())
    }

    pub fn t() -> Self {
        Self::symbol("T")
    }

    pub fn boolean(value: bool) -> Self {
        if value { Self::t() } else { Self::Nil }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    pub fn as_pair(&self) -> Option<&Pair> {
        match self {
            Self::Pair(pair) => Some(pair),
            _ => None,
        }
    }

    /// Nil or a chain of pairs ending in Nil.
    pub fn is_list(&self) -> bool {
        let mut current = self.clone();
        loop {
            current = match current {
                Self::Nil => return true,
                Self::Pair(pair) => pair.cdr(),
                _ => return false,
            };
        }
    }

    pub fn list(items: impl IntoIterator<Item = Atom>) -> Self {
        Self::list_with_tail(items, Self::Nil)
    }

    pub fn list_with_tail(items: impl IntoIterator<Item = Atom>, tail: Atom) -> Self {
        items.into_iter()
            .collect_vec()
            .into_iter()
            .rev()
            .fold(tail, |rest, item| Self::cons(item, rest))
    }

    /// Iterates the elements of a list, stopping at the first non-pair tail.
    pub fn iter(&self) -> ListIter {
        ListIter(self.clone())
    }

    /// A fresh spine of pairs holding the same elements. An improper tail is
    /// kept as it is.
    pub fn copy_list(&self) -> Self {
        let mut items = Vec::new();
        let mut current = self.clone();
        while let Self::Pair(pair) = current {
            items.push(pair.car());
            current = pair.cdr();
        }
        Self::list_with_tail(items, current)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::String(_) => "string",
            Self::Symbol(_) => "symbol",
            Self::Pair(_) => "pair",
            Self::Builtin(_) => "builtin",
            Self::Closure(_) => "closure",
            Self::Macro(_) => "macro",
            Self::Error(_) => "error",
        }
    }
}

impl From<LispError> for Atom {
    fn from(error: LispError) -> Self {
        Self::Error(Rc::new(error))
    }
}

pub struct ListIter(Atom);

impl Iterator for ListIter {
    type Item = Atom;

    fn next(&mut self) -> Option<Atom> {
        let (car, cdr) = match &self.0 {
            Atom::Pair(pair) => (pair.car(), pair.cdr()),
            _ => return None,
        };
        self.0 = cdr;
        Some(car)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "NIL"),
            Self::Integer(value) => write!(f, "{}", value),
            Self::Real(value) => write!(f, "{:.6}", value),
            Self::String(text) => write!(f, "\"{}\"", text),
            Self::Symbol(symbol) => write!(f, "{}", symbol),
            Self::Error(error) => write!(f, "{}", error.message()),
            Self::Builtin(_) => write!(f, "#<BUILTIN>"),
            Self::Closure(_) => write!(f, "#<CLOSURE>"),
            Self::Macro(_) => write!(f, "#<MACRO>"),
            Self::Pair(pair) => {
                write!(f, "({}", pair.car())?;
                let mut rest = pair.cdr();
                loop {
                    rest = match rest {
                        Self::Nil => break,
                        Self::Pair(pair) => {
                            write!(f, " {}", pair.car())?;
                            pair.cdr()
                        }
                        tail => {
                            write!(f, " . {}", tail)?;
                            break;
                        }
                    };
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self as &dyn fmt::Display).fmt(f)
    }
}
