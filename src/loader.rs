use std::path::Path;

use crate::{atom::Atom, config::OnError, environment::Environment, error::{ErrorKind, LispError, LispResult}, interpreter::eval, parser::Reader};


/// Evaluates every form of `source` in order and returns the last value.
///
/// A read error always stops the load. An evaluation error stops it only
/// under [`OnError::Abort`]; with [`OnError::Skip`] it is logged and the next
/// form runs.
pub fn load_source(source: &str, environment: &Environment, on_error: OnError) -> LispResult<Atom> {
    let mut last = Atom::Nil;

    for expr in Reader::new(source) {
        let expr = expr?;
        match eval(&expr, environment) {
            Ok(value) => last = value,
            Err(err) if on_error == OnError::Skip => {
                log::warn!("{} in expression {}", err.diagnostic(), expr);
            }
            Err(err) => return Err(err),
        }
    }

    Ok(last)
}

pub fn load_file<P: AsRef<Path>>(path: P, environment: &Environment, on_error: OnError) -> LispResult<Atom> {
    let path = path.as_ref();
    log::debug!("Reading {}", path.display());

    let source = std::fs::read_to_string(path)
        .map_err(|err| LispError::new(ErrorKind::Io, format!("{}: {}", path.display(), err)))?;
    load_source(&source, environment, on_error)
}
