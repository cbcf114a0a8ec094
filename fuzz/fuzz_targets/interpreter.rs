#![no_main]

use core::fmt;

use itertools::Itertools;
use libfuzzer_sys::{arbitrary::Arbitrary, fuzz_target};

// Builtins and variable references
#[derive(Arbitrary, Debug)]
enum CutieAtom {
    Add, Sub, Mul, Div,
    Eq, Less, T, Nil,

    Car, Cdr, List, SetCar, SetCdr,
    StringEqual, StringConcat, StringSubstr,
    Apply, IsPair, IsSymbol,

    Identifier(String),
    Integer(i64),
    Text(String),
}

impl fmt::Display for CutieAtom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", match self {
            CutieAtom::Add => "+",
            CutieAtom::Sub => "-",
            CutieAtom::Mul => "*",
            CutieAtom::Div => "/",
            CutieAtom::Eq => "=",
            CutieAtom::Less => "<",
            CutieAtom::T => "t",
            CutieAtom::Nil => "nil",
            CutieAtom::Car => "car",
            CutieAtom::Cdr => "cdr",
            CutieAtom::List => "list",
            CutieAtom::SetCar => "set-car!",
            CutieAtom::SetCdr => "set-cdr!",
            CutieAtom::StringEqual => "string-equal",
            CutieAtom::StringConcat => "string-concat",
            CutieAtom::StringSubstr => "string-substr",
            CutieAtom::Apply => "apply",
            CutieAtom::IsPair => "pair?",
            CutieAtom::IsSymbol => "symbol?",
            CutieAtom::Identifier(identifier) => identifier,
            CutieAtom::Integer(value) => return write!(f, "{}", value),
            CutieAtom::Text(text) => return write!(f, "{:?}", text),
        })
    }
}

#[derive(Arbitrary, Debug)]
enum CutieCommand {
    Quote(Vec<CutieCommand>),
    Define(Vec<CutieCommand>),
    Set(Vec<CutieCommand>),
    Progn(Vec<CutieCommand>),
    Lambda(Vec<CutieCommand>),
    If(Vec<CutieCommand>),
    Defmacro(Vec<CutieCommand>),
    Cons(Vec<CutieCommand>),
    Call(Vec<CutieCommand>),

    Atom(CutieAtom),
}

fn stringify_arguments(values: &[CutieCommand]) -> String {
    values.iter()
        .map(CutieCommand::to_string)
        .join(" ")
}

impl fmt::Display for CutieCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (head, args) = match self {
            CutieCommand::Atom(atom) => return atom.fmt(f),
            CutieCommand::Call(args) => return write!(f, "({})", stringify_arguments(args)),
            CutieCommand::Quote(args) => ("quote", args),
            CutieCommand::Define(args) => ("define", args),
            CutieCommand::Set(args) => ("set!", args),
            CutieCommand::Progn(args) => ("progn", args),
            CutieCommand::Lambda(args) => ("lambda", args),
            CutieCommand::If(args) => ("if", args),
            CutieCommand::Defmacro(args) => ("defmacro", args),
            CutieCommand::Cons(args) => ("cons", args),
        };

        write!(f, "({} {})", head, stringify_arguments(args))
    }
}

fuzz_target!(|commands: Vec<CutieCommand>| {
    let Ok(mut context) = cutie::EvaluationContext::new() else { return };

    for command in commands {
        let _ = context.evaluate_str(&command.to_string());
    }
});
