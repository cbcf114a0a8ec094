use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{atom::Atom, error::{ErrorKind, LispError, LispResult}, symbol::Symbol};


struct Frame {
    bindings: RefCell<HashMap<Symbol, Atom>>,
    parent: Option<Environment>,
}

/// A handle to one frame of the scope chain. Clones refer to the same frame;
/// closures keep their defining frame alive through such a handle.
#[derive(Clone)]
pub struct Environment(Rc<Frame>);

impl Environment {
    pub fn root() -> Self {
        Self(Rc::new(Frame {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        }))
    }

    pub fn new(parent: &Environment) -> Self {
        Self(Rc::new(Frame {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(parent.clone()),
        }))
    }

    #[cfg(test)]
    pub(crate) fn parent(&self) -> Option<&Environment> {
        self.0.parent.as_ref()
    }

    /// Looks `symbol` up in this frame, then in each ancestor.
    pub fn get(&self, symbol: Symbol) -> LispResult<Atom> {
        if let Some(value) = self.0.bindings.borrow().get(&symbol) {
            return Ok(value.clone());
        }
        match &self.0.parent {
            Some(parent) => parent.get(symbol),
            None => Err(LispError::new(ErrorKind::Unbound, symbol.name())),
        }
    }

    /// Binds `symbol` in this frame, overwriting a binding of this frame only.
    pub fn set(&self, symbol: Symbol, value: Atom) {
        self.0.bindings.borrow_mut().insert(symbol, value);
    }

    /// Rebinds the nearest existing binding of `symbol`. Never creates one.
    pub fn set_existing(&self, symbol: Symbol, value: Atom) -> LispResult<()> {
        if let Some(slot) = self.0.bindings.borrow_mut().get_mut(&symbol) {
            *slot = value;
            return Ok(());
        }
        match &self.0.parent {
            Some(parent) => parent.set_existing(symbol, value),
            None => Err(LispError::new(ErrorKind::Unbound, symbol.name())),
        }
    }

    #[cfg(test)]
    pub(crate) fn contains_local(&self, symbol: Symbol) -> bool {
        self.0.bindings.borrow().contains_key(&symbol)
    }

    #[cfg(test)]
    pub(crate) fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
