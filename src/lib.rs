
mod atom;
mod builtin;
mod config;
mod context;
mod environment;
mod error;
mod interpreter;
mod loader;
mod parser;
mod symbol;

#[cfg(test)]
mod test_utils;

pub use atom::{Atom, Builtin, BuiltinFn, Closure, ListIter, Pair};
pub use config::{InterpreterConfig, OnError};
pub use context::EvaluationContext;
pub use environment::Environment;
pub use error::{ErrorKind, LispError, LispResult};
pub use interpreter::{apply, eval};
pub use loader::{load_file, load_source};
pub use parser::{parse, read_expr, Reader};
pub use symbol::{intern, SpecialForm, Symbol};
