use std::path::Path;

use crate::{atom::Atom, builtin::builtin_frame, config::{InterpreterConfig, OnError}, environment::Environment, error::LispResult, interpreter::eval, loader};

const PRELUDE: &str = include_str!("prelude.lisp");


/// An evaluation context that reads source text and evaluates it in one
/// global environment, so definitions persist from one call to the next.
///
/// The global frame sits directly under the builtin frame; user definitions
/// shadow builtins rather than replacing them.
pub struct EvaluationContext {
    environment: Environment,
    config: InterpreterConfig,
}

impl EvaluationContext {
    pub fn new() -> LispResult<Self> {
        Self::with_config(InterpreterConfig::default())
    }

    pub fn with_config(config: InterpreterConfig) -> LispResult<Self> {
        let environment = Environment::new(&builtin_frame());
        if config.prelude {
            loader::load_source(PRELUDE, &environment, OnError::Abort)?;
        }

        Ok(Self { environment, config })
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    #[cfg(test)]
    pub(crate) fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn evaluate(&mut self, expr: &Atom) -> LispResult<Atom> {
        eval(expr, &self.environment)
    }

    /// Evaluates every form in `input`, stopping at the first error, and
    /// returns the value of the last one (NIL for empty input).
    pub fn evaluate_str(&mut self, input: &str) -> LispResult<Atom> {
        loader::load_source(input, &self.environment, OnError::Abort)
    }

    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> LispResult<Atom> {
        loader::load_file(path, &self.environment, self.config.load_errors)
    }
}
