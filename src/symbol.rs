use core::fmt;
use std::{collections::HashMap, hash::{Hash, Hasher}, sync::{LazyLock, Mutex, PoisonError}};


/// Operators handled by the evaluator itself. Resolved once, when the symbol
/// naming them is interned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialForm {
    Quote,
    Define,
    Set,
    Progn,
    Lambda,
    If,
    Defmacro,
    Load,
}

impl SpecialForm {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "QUOTE" => Self::Quote,
            "DEFINE" => Self::Define,
            "SET!" => Self::Set,
            "PROGN" => Self::Progn,
            "LAMBDA" => Self::Lambda,
            "IF" => Self::If,
            "DEFMACRO" => Self::Defmacro,
            "LOAD" => Self::Load,
            _ => return None,
        })
    }
}

struct SymbolData {
    name: Box<str>,
    form: Option<SpecialForm>,
}

/// An interned name. Two symbols are equal exactly when they are the same
/// registry entry, so comparison and hashing never look at the text.
#[derive(Clone, Copy)]
pub struct Symbol(&'static SymbolData);

impl Symbol {
    pub fn name(&self) -> &'static str {
        &self.0.name
    }

    pub fn special_form(&self) -> Option<SpecialForm> {
        self.0.form
    }

    /// Keywords such as `:key` evaluate to themselves.
    pub fn is_keyword(&self) -> bool {
        self.0.name.starts_with(':')
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.0 as *const SymbolData).hash(state)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Entries are leaked on insertion and never removed, which is what lets
// `Symbol` hand out `&'static str` names without holding the lock.
static SYMBOL_TABLE: LazyLock<Mutex<HashMap<&'static str, Symbol>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Returns the canonical symbol for `name`, upper-casing it first.
pub fn intern(name: &str) -> Symbol {
    let canonical = name.to_ascii_uppercase();
    let mut table = SYMBOL_TABLE.lock().unwrap_or_else(PoisonError::into_inner);

    if let Some(symbol) = table.get(canonical.as_str()) {
        return *symbol;
    }

    let data: &'static SymbolData = Box::leak(Box::new(SymbolData {
        form: SpecialForm::from_name(&canonical),
        name: canonical.into_boxed_str(),
    }));
    let symbol = Symbol(data);
    table.insert(&data.name, symbol);
    symbol
}
