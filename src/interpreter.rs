use std::rc::Rc;

use itertools::Itertools;

use crate::{atom::{Atom, Closure}, config::OnError, environment::Environment, error::{LispError, LispResult}, loader, symbol::{SpecialForm, Symbol}};


/// Evaluates `expr` in `env`.
///
/// Symbols resolve through the scope chain unless they are keywords, lists are
/// special forms, macro invocations or function calls, and everything else
/// evaluates to itself.
pub fn eval(expr: &Atom, env: &Environment) -> LispResult<Atom> {
    match expr {
        Atom::Symbol(symbol) if symbol.is_keyword() => Ok(expr.clone()),
        Atom::Symbol(symbol) => env.get(*symbol),
        Atom::Pair(_) => evaluate_expression(expr, env),
        _ => Ok(expr.clone()),
    }
}

/// Calls `function` with an already evaluated argument list.
pub fn apply(function: &Atom, args: Atom) -> LispResult<Atom> {
    match function {
        Atom::Builtin(builtin) => builtin.call(args),
        Atom::Closure(closure) => apply_closure(closure, args),
        other => Err(LispError::type_error(format!("Type must be closure, got {}.", other.type_name()))),
    }
}

fn apply_closure(closure: &Closure, mut args: Atom) -> LispResult<Atom> {
    let environment = Environment::new(&closure.env);
    let mut params = closure.params.clone();

    loop {
        params = match params {
            Atom::Nil => break,
            Atom::Symbol(rest) => {
                environment.set(rest, args);
                args = Atom::Nil;
                break;
            }
            Atom::Pair(param) => {
                let Atom::Pair(arg) = args else {
                    return Err(LispError::args("Argument required."));
                };
                let Atom::Symbol(name) = param.car() else {
                    return Err(LispError::type_error("Arguments need to be symbols."));
                };
                environment.set(name, arg.car());
                args = arg.cdr();
                param.cdr()
            }
            _ => return Err(LispError::type_error("Arguments need to be symbols.")),
        };
    }

    if !args.is_nil() {
        return Err(LispError::args("Too many arguments."));
    }

    evaluate_body(&closure.body, &environment)
}

fn evaluate_body(body: &Atom, environment: &Environment) -> LispResult<Atom> {
    body.iter().try_fold(Atom::Nil, |_, form| eval(&form, environment))
}

fn evaluate_expression(expr: &Atom, environment: &Environment) -> LispResult<Atom> {
    if !expr.is_list() {
        return Err(LispError::syntax("Expression must be list."));
    }
    let Atom::Pair(pair) = expr else {
        return Err(LispError::syntax("Expression must be list."));
    };
    let (operator, args) = (pair.car(), pair.cdr());

    if let Some(form) = special_form(&operator) {
        let operands = args.iter().collect_vec();
        return match form {
            SpecialForm::Quote => evaluate_quote(&operands),
            SpecialForm::Define => evaluate_define(&operands, environment),
            SpecialForm::Set => evaluate_set_bang(&operands, environment),
            SpecialForm::Progn => evaluate_progn(&operands, environment),
            SpecialForm::Lambda => evaluate_lambda(&operands, environment),
            SpecialForm::If => evaluate_if(&operands, environment),
            SpecialForm::Defmacro => evaluate_defmacro(&operands, environment),
            SpecialForm::Load => evaluate_load(&operands, environment),
        };
    }

    let function = eval(&operator, environment)?;

    if let Atom::Macro(macro_) = &function {
        let expansion = apply_closure(macro_, args)?;
        log::trace!("{} expanded to {}", operator, expansion);
        return eval(&expansion, environment);
    }

    // Evaluate into a copy so a quoted list in the source is never overwritten.
    let args = args.copy_list();
    let mut cursor = args.clone();
    while let Atom::Pair(cell) = cursor {
        cell.set_car(eval(&cell.car(), environment)?);
        cursor = cell.cdr();
    }

    apply(&function, args)
}

fn special_form(operator: &Atom) -> Option<SpecialForm> {
    match operator {
        Atom::Symbol(symbol) => symbol.special_form(),
        _ => None,
    }
}

fn evaluate_quote(list: &[Atom]) -> LispResult<Atom> {
    if list.len() != 1 { return Err(LispError::args("QUOTE requires an argument.")); }
    Ok(list[0].clone())
}

/// Shared by DEFINE and SET!: either `name value` or `(name . params) body...`.
fn definition(form: &str, list: &[Atom], environment: &Environment) -> LispResult<(Symbol, Atom)> {
    if list.len() < 2 { return Err(LispError::args(format!("{} requires two arguments.", form))); }

    match &list[0] {
        Atom::Symbol(name) => {
            if list.len() != 2 { return Err(LispError::args(format!("{} argument error.", form))); }
            Ok((*name, eval(&list[1], environment)?))
        }
        Atom::Pair(signature) => {
            let Atom::Symbol(name) = signature.car() else {
                return Err(LispError::type_error(format!("{} first argument must be symbol.", form)));
            };
            let closure = Closure::new(environment.clone(), signature.cdr(), Atom::list(list[1..].to_vec()))?;
            Ok((name, Atom::Closure(Rc::new(closure))))
        }
        _ => Err(LispError::type_error(format!("{} argument error.", form))),
    }
}

fn evaluate_define(list: &[Atom], environment: &Environment) -> LispResult<Atom> {
    let (name, value) = definition("DEFINE", list, environment)?;
    environment.set(name, value);
    Ok(Atom::Symbol(name))
}

fn evaluate_set_bang(list: &[Atom], environment: &Environment) -> LispResult<Atom> {
    let (name, value) = definition("SET!", list, environment)?;
    environment.set_existing(name, value)?;
    Ok(Atom::Symbol(name))
}

fn evaluate_progn(list: &[Atom], environment: &Environment) -> LispResult<Atom> {
    list.iter().try_fold(Atom::Nil, |_, form| eval(form, environment))
}

fn evaluate_lambda(list: &[Atom], environment: &Environment) -> LispResult<Atom> {
    if list.len() < 2 { return Err(LispError::args("LAMBDA requires two arguments.")); }

    let closure = Closure::new(environment.clone(), list[0].clone(), Atom::list(list[1..].to_vec()))?;
    Ok(Atom::Closure(Rc::new(closure)))
}

fn evaluate_if(list: &[Atom], environment: &Environment) -> LispResult<Atom> {
    if list.len() != 3 { return Err(LispError::args("IF requires three arguments.")); }

    let branch = if eval(&list[0], environment)?.is_nil() { &list[2] } else { &list[1] };
    eval(branch, environment)
}

fn evaluate_defmacro(list: &[Atom], environment: &Environment) -> LispResult<Atom> {
    if list.len() < 2 { return Err(LispError::args("DEFMACRO requires two arguments.")); }

    let Atom::Pair(signature) = &list[0] else {
        return Err(LispError::syntax("DEFMACRO syntax error."));
    };
    let Atom::Symbol(name) = signature.car() else {
        return Err(LispError::type_error("DEFMACRO type error."));
    };

    let closure = Closure::new(environment.clone(), signature.cdr(), Atom::list(list[1..].to_vec()))?;
    environment.set(name, Atom::Macro(Rc::new(closure)));
    Ok(Atom::Symbol(name))
}

fn evaluate_load(list: &[Atom], environment: &Environment) -> LispResult<Atom> {
    if list.len() != 1 { return Err(LispError::args("LOAD takes one argument.")); }

    let Atom::String(path) = eval(&list[0], environment)? else {
        return Err(LispError::type_error("LOAD argument must be a string."));
    };
    loader::load_file(&*path, environment, OnError::Skip)?;
    Ok(Atom::t())
}
