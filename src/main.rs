use std::io::Read;

use cutie::{EvaluationContext, InterpreterConfig, Reader};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match std::env::var_os("CUTIE_CONFIG") {
        Some(path) => InterpreterConfig::from_file(path)?,
        None => InterpreterConfig::default(),
    };
    let mut context = EvaluationContext::with_config(config)?;

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if !paths.is_empty() {
        for path in paths {
            let value = context.load_file(&path)?;
            println!("{}: {}", path, value);
        }
        return Ok(());
    }

    let mut source = String::new();
    std::io::stdin().read_to_string(&mut source)?;

    for expr in Reader::new(&source) {
        match expr.and_then(|expr| context.evaluate(&expr)) {
            Ok(value) => println!("{}", value),
            Err(err) => println!("{}", err.diagnostic()),
        }
    }

    Ok(())
}
