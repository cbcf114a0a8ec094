use std::rc::Rc;

use itertools::Itertools;

use crate::{atom::{Atom, Builtin}, environment::Environment, error::{ErrorKind, LispError, LispResult}, interpreter::apply, symbol::intern};


/// Splits a proper argument list of exactly `N` elements.
#[track_caller]
fn arguments<const N: usize>(args: &Atom) -> LispResult<[Atom; N]> {
    let values = args.iter().collect_vec();
    match <[Atom; N]>::try_from(values) {
        Ok(values) if args.is_list() => Ok(values),
        _ => Err(match N {
            1 => LispError::args("Requires a single argument."),
            2 => LispError::args("Requires two arguments."),
            _ => LispError::args(format!("Requires {} arguments.", N)),
        }),
    }
}

#[track_caller]
fn integers(args: &Atom) -> LispResult<(i64, i64)> {
    match arguments::<2>(args)? {
        [Atom::Integer(a), Atom::Integer(b)] => Ok((a, b)),
        _ => Err(LispError::type_error("Arguments must be integers.")),
    }
}

#[track_caller]
fn strings(args: &Atom) -> LispResult<(Rc<str>, Rc<str>)> {
    match arguments::<2>(args)? {
        [Atom::String(a), Atom::String(b)] => Ok((a, b)),
        _ => Err(LispError::type_error("Arguments must be strings.")),
    }
}

fn builtin_add(args: Atom) -> LispResult<Atom> {
    let (a, b) = integers(&args)?;
    Ok(Atom::Integer(a.wrapping_add(b)))
}

fn builtin_sub(args: Atom) -> LispResult<Atom> {
    let (a, b) = integers(&args)?;
    Ok(Atom::Integer(a.wrapping_sub(b)))
}

fn builtin_mul(args: Atom) -> LispResult<Atom> {
    let (a, b) = integers(&args)?;
    Ok(Atom::Integer(a.wrapping_mul(b)))
}

fn builtin_div(args: Atom) -> LispResult<Atom> {
    let (a, b) = integers(&args)?;
    if b == 0 { return Err(LispError::new(ErrorKind::DivideByZero, "Divisor is zero.")); }
    Ok(Atom::Integer(a.wrapping_div(b)))
}

fn builtin_numeq(args: Atom) -> LispResult<Atom> {
    let (a, b) = integers(&args)?;
    Ok(Atom::boolean(a == b))
}

fn builtin_less(args: Atom) -> LispResult<Atom> {
    let (a, b) = integers(&args)?;
    Ok(Atom::boolean(a < b))
}

fn builtin_car(args: Atom) -> LispResult<Atom> {
    match arguments::<1>(&args)? {
        [Atom::Nil] => Ok(Atom::Nil),
        [Atom::Pair(pair)] => Ok(pair.car()),
        _ => Err(LispError::type_error("CAR argument must be pair.")),
    }
}

fn builtin_cdr(args: Atom) -> LispResult<Atom> {
    match arguments::<1>(&args)? {
        [Atom::Nil] => Ok(Atom::Nil),
        [Atom::Pair(pair)] => Ok(pair.cdr()),
        _ => Err(LispError::type_error("CDR argument must be pair.")),
    }
}

fn builtin_cons(args: Atom) -> LispResult<Atom> {
    let [car, cdr] = arguments::<2>(&args)?;
    Ok(Atom::cons(car, cdr))
}

fn builtin_list(args: Atom) -> LispResult<Atom> {
    if !args.is_list() { return Err(LispError::syntax("Arguments must be a list.")); }
    Ok(args.copy_list())
}

fn builtin_set_car(args: Atom) -> LispResult<Atom> {
    match arguments::<2>(&args)? {
        [Atom::Pair(pair), value] => {
            pair.set_car(value.clone());
            Ok(value)
        }
        _ => Err(LispError::type_error("SET-CAR! argument must be pair.")),
    }
}

fn builtin_set_cdr(args: Atom) -> LispResult<Atom> {
    match arguments::<2>(&args)? {
        [Atom::Pair(pair), value] => {
            pair.set_cdr(value.clone());
            Ok(value)
        }
        _ => Err(LispError::type_error("SET-CDR! argument must be pair.")),
    }
}

fn builtin_string_equal(args: Atom) -> LispResult<Atom> {
    let (a, b) = strings(&args)?;
    Ok(Atom::boolean(a == b))
}

/// The index of the first differing character when the first string sorts
/// before the second, NIL otherwise.
fn builtin_string_lessp(args: Atom) -> LispResult<Atom> {
    let (a, b) = strings(&args)?;
    if a >= b { return Ok(Atom::Nil); }

    let index = a.chars().zip(b.chars())
        .take_while(|(x, y)| x == y)
        .count();
    Ok(Atom::Integer(index as i64))
}

fn builtin_string_concat(args: Atom) -> LispResult<Atom> {
    let (a, b) = strings(&args)?;
    Ok(Atom::string(format!("{}{}", a, b)))
}

fn builtin_string_substr(args: Atom) -> LispResult<Atom> {
    let values = args.iter().collect_vec();
    if !args.is_list() || !(2..=3).contains(&values.len()) {
        return Err(LispError::args("Requires two or three arguments."));
    }

    let (text, start, length) = match (&values[0], &values[1], values.get(2).unwrap_or(&Atom::Nil)) {
        (Atom::String(text), Atom::Integer(start), Atom::Integer(length)) => (text, *start, Some(*length)),
        (Atom::String(text), Atom::Integer(start), Atom::Nil) => (text, *start, None),
        _ => return Err(LispError::type_error("Arguments must be <string> <integer> <optional integer>.")),
    };

    let total = text.chars().count() as i64;
    if start < 0 || start > total {
        return Err(LispError::new(ErrorKind::OutOfBounds, "Index out of bounds."));
    }
    let length = length.unwrap_or(total - start);
    if length < 0 || length > total - start {
        return Err(LispError::new(ErrorKind::OutOfBounds, "Index out of bounds."));
    }

    Ok(Atom::string(text.chars().skip(start as usize).take(length as usize).collect::<String>()))
}

fn builtin_apply(args: Atom) -> LispResult<Atom> {
    let [function, list] = arguments::<2>(&args)?;
    if !list.is_list() { return Err(LispError::syntax("Arguments must be a list.")); }
    apply(&function, list)
}

/// Identity for mutable and callable values, contents for strings and numbers.
/// Error values are never equal, not even to themselves.
fn builtin_eq(args: Atom) -> LispResult<Atom> {
    let [a, b] = arguments::<2>(&args)?;

    let eq = match (&a, &b) {
        (Atom::Nil, Atom::Nil) => true,
        (Atom::Pair(a), Atom::Pair(b)) => a.ptr_eq(b),
        (Atom::Closure(a), Atom::Closure(b)) | (Atom::Macro(a), Atom::Macro(b)) => Rc::ptr_eq(a, b),
        (Atom::Builtin(a), Atom::Builtin(b)) => a == b,
        (Atom::String(a), Atom::String(b)) => a == b,
        (Atom::Symbol(a), Atom::Symbol(b)) => a == b,
        (Atom::Integer(a), Atom::Integer(b)) => a == b,
        (Atom::Real(a), Atom::Real(b)) => a == b,
        _ => false,
    };

    Ok(Atom::boolean(eq))
}

fn builtin_pairp(args: Atom) -> LispResult<Atom> {
    let [value] = arguments::<1>(&args)?;
    Ok(Atom::boolean(matches!(value, Atom::Pair(_))))
}

fn builtin_symbolp(args: Atom) -> LispResult<Atom> {
    let [value] = arguments::<1>(&args)?;
    Ok(Atom::boolean(matches!(value, Atom::Symbol(_))))
}

fn builtin_stringp(args: Atom) -> LispResult<Atom> {
    let [value] = arguments::<1>(&args)?;
    Ok(Atom::boolean(matches!(value, Atom::String(_))))
}

fn builtin_numberp(args: Atom) -> LispResult<Atom> {
    let [value] = arguments::<1>(&args)?;
    Ok(Atom::boolean(matches!(value, Atom::Integer(_) | Atom::Real(_))))
}

fn builtin_error(args: Atom) -> LispResult<Atom> {
    let [value] = arguments::<1>(&args)?;
    let message = match value {
        Atom::String(text) => text.to_string(),
        other => other.to_string(),
    };
    Err(LispError::syntax(message))
}

fn builtin_print(args: Atom) -> LispResult<Atom> {
    let [value] = arguments::<1>(&args)?;
    println!("{}", value);
    Ok(value)
}

const BUILTINS: &[Builtin] = &[
    Builtin::new("+", builtin_add),
    Builtin::new("-", builtin_sub),
    Builtin::new("*", builtin_mul),
    Builtin::new("/", builtin_div),
    Builtin::new("=", builtin_numeq),
    Builtin::new("<", builtin_less),

    Builtin::new("CAR", builtin_car),
    Builtin::new("CDR", builtin_cdr),
    Builtin::new("CONS", builtin_cons),
    Builtin::new("LIST", builtin_list),
    Builtin::new("SET-CAR!", builtin_set_car),
    Builtin::new("SET-CDR!", builtin_set_cdr),

    Builtin::new("STRING-EQUAL", builtin_string_equal),
    Builtin::new("STRING-LESSP", builtin_string_lessp),
    Builtin::new("STRING-CONCAT", builtin_string_concat),
    Builtin::new("STRING-SUBSTR", builtin_string_substr),

    Builtin::new("APPLY", builtin_apply),
    Builtin::new("EQ?", builtin_eq),
    Builtin::new("PAIR?", builtin_pairp),
    Builtin::new("SYMBOL?", builtin_symbolp),
    Builtin::new("STRING?", builtin_stringp),
    Builtin::new("NUMBER?", builtin_numberp),
    Builtin::new("ERROR", builtin_error),
    Builtin::new("PRINT", builtin_print),
];

/// The root frame: every builtin plus `T` bound to itself.
pub(crate) fn builtin_frame() -> Environment {
    let environment = Environment::root();
    for builtin in BUILTINS {
        environment.set(intern(builtin.name()), Atom::Builtin(*builtin));
    }
    environment.set(intern("T"), Atom::t());
    environment
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;

    use super::*;

    fn call(name: &str, source: &str) -> LispResult<Atom> {
        let builtin = BUILTINS.iter().find(|builtin| builtin.name() == name).unwrap();
        builtin.call(parse(source).unwrap())
    }

    fn printed(name: &str, source: &str) -> String {
        call(name, source).unwrap().to_string()
    }

    fn kind(name: &str, source: &str) -> ErrorKind {
        call(name, source).err().unwrap().kind()
    }

    #[test]
    fn arithmetic() {
        assert_eq!(printed("+", "(1 2)"), "3");
        assert_eq!(printed("-", "(1 2)"), "-1");
        assert_eq!(printed("*", "(3 4)"), "12");
        assert_eq!(printed("/", "(7 2)"), "3");
        assert_eq!(kind("/", "(7 0)"), ErrorKind::DivideByZero);
        assert_eq!(kind("+", "(1 \"2\")"), ErrorKind::Type);
        assert_eq!(kind("*", "(1)"), ErrorKind::Args);
        assert_eq!(kind("-", "(1 . 2)"), ErrorKind::Args);
        assert_eq!(kind("-", "(1 2 . 3)"), ErrorKind::Args);
    }

    #[test]
    fn comparisons() {
        assert_eq!(printed("=", "(2 2)"), "T");
        assert_eq!(printed("=", "(2 3)"), "NIL");
        assert_eq!(printed("<", "(2 3)"), "T");
        assert_eq!(kind("<", "(2.0 3)"), ErrorKind::Type);
    }

    #[test]
    fn pair_access() {
        assert_eq!(printed("CAR", "((1 2))"), "1");
        assert_eq!(printed("CDR", "((1 2))"), "(2)");
        assert_eq!(printed("CAR", "(nil)"), "NIL");
        assert_eq!(printed("CDR", "(nil)"), "NIL");
        assert_eq!(kind("CAR", "(1)"), ErrorKind::Type);
        assert_eq!(kind("CDR", "()"), ErrorKind::Args);
        assert_eq!(printed("CONS", "(1 2)"), "(1 . 2)");
        assert_eq!(printed("LIST", "(1 2 3)"), "(1 2 3)");
        assert_eq!(printed("LIST", "()"), "NIL");
    }

    #[test]
    fn strings() {
        assert_eq!(printed("STRING-EQUAL", "(\"ab\" \"ab\")"), "T");
        assert_eq!(printed("STRING-EQUAL", "(\"ab\" \"ac\")"), "NIL");
        assert_eq!(printed("STRING-LESSP", "(\"abc\" \"abd\")"), "2");
        assert_eq!(printed("STRING-LESSP", "(\"abd\" \"abc\")"), "NIL");
        assert_eq!(printed("STRING-CONCAT", "(\"foo\" \"bar\")"), "\"foobar\"");
        assert_eq!(kind("STRING-CONCAT", "(\"foo\" 1)"), ErrorKind::Type);
    }

    #[test]
    fn substrings() {
        assert_eq!(printed("STRING-SUBSTR", "(\"hello\" 1 3)"), "\"ell\"");
        assert_eq!(printed("STRING-SUBSTR", "(\"hello\" 2)"), "\"llo\"");
        assert_eq!(printed("STRING-SUBSTR", "(\"hello\" 2 nil)"), "\"llo\"");
        assert_eq!(printed("STRING-SUBSTR", "(\"hello\" 5 0)"), "\"\"");
        assert_eq!(kind("STRING-SUBSTR", "(\"hello\" 3 3)"), ErrorKind::OutOfBounds);
        assert_eq!(kind("STRING-SUBSTR", "(\"hello\" -1 2)"), ErrorKind::OutOfBounds);
        assert_eq!(kind("STRING-SUBSTR", "(\"hello\" 6)"), ErrorKind::OutOfBounds);
        assert_eq!(kind("STRING-SUBSTR", "(\"a\" -9223372036854775808)"), ErrorKind::OutOfBounds);
        assert_eq!(kind("STRING-SUBSTR", "(\"hello\" 1 9223372036854775807)"), ErrorKind::OutOfBounds);
        assert_eq!(kind("STRING-SUBSTR", "(\"hello\")"), ErrorKind::Args);
        assert_eq!(kind("STRING-SUBSTR", "(hello 1)"), ErrorKind::Type);
    }

    #[test]
    fn equality() {
        assert_eq!(printed("EQ?", "(1 1)"), "T");
        assert_eq!(printed("EQ?", "(foo FOO)"), "T");
        assert_eq!(printed("EQ?", "(\"a\" \"a\")"), "T");
        assert_eq!(printed("EQ?", "(nil nil)"), "T");
        assert_eq!(printed("EQ?", "((1) (1))"), "NIL");
        assert_eq!(printed("EQ?", "(1 \"1\")"), "NIL");

        let error = Atom::from(LispError::syntax("boom"));
        let args = Atom::list([error.clone(), error]);
        assert!(builtin_eq(args).unwrap().is_nil());

        let plus = Atom::Builtin(BUILTINS[0]);
        assert_eq!(builtin_eq(Atom::list([plus.clone(), plus])).unwrap().to_string(), "T");
    }

    #[test]
    fn predicates() {
        assert_eq!(printed("PAIR?", "((1))"), "T");
        assert_eq!(printed("PAIR?", "(nil)"), "NIL");
        assert_eq!(printed("SYMBOL?", "(a)"), "T");
        assert_eq!(printed("STRING?", "(\"a\")"), "T");
        assert_eq!(printed("NUMBER?", "(1.5)"), "T");
        assert_eq!(printed("NUMBER?", "(a)"), "NIL");
    }

    #[test]
    fn apply_and_error() {
        let plus = Atom::Builtin(BUILTINS[0]);
        let args = Atom::list([plus.clone(), Atom::list([Atom::Integer(1), Atom::Integer(2)])]);
        assert_eq!(builtin_apply(args).unwrap().to_string(), "3");

        let args = Atom::list([plus, Atom::Integer(1)]);
        assert_eq!(builtin_apply(args).err().unwrap().kind(), ErrorKind::Syntax);

        let err = call("ERROR", "(\"custom failure\")").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(err.message(), "custom failure");
    }

    #[test]
    fn mutation() {
        let list = parse("(1 2)").unwrap();
        builtin_set_car(Atom::list([list.clone(), Atom::Integer(9)])).unwrap();
        builtin_set_cdr(Atom::list([list.clone(), Atom::Nil])).unwrap();
        assert_eq!(list.to_string(), "(9)");
        assert_eq!(kind("SET-CAR!", "(1 2)"), ErrorKind::Type);
    }

    #[test]
    fn frame_binds_every_builtin() {
        let frame = builtin_frame();
        for builtin in BUILTINS {
            assert!(matches!(frame.get(intern(builtin.name())), Ok(Atom::Builtin(_))));
        }
        assert_eq!(frame.get(intern("t")).unwrap().to_string(), "T");
    }
}
