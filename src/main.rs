use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser as ClapParser, ValueEnum};

use pyrite::compiler::compiler::Compiler;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Output the AST in JSON format
    Parse,
    /// Output the type-checked AST in JSON format
    Tc,
    /// Output untyped source code (default)
    Emit,
}

#[derive(ClapParser, Debug)]
#[command(about = "pyrite - a compiler front end for a statically-typed scripting subset")]
struct Cli {
    /// Processing mode
    #[arg(long, value_enum, default_value_t = Mode::Emit)]
    mode: Mode,

    /// Host syntax tree to process, as JSON
    input: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let compiler = Compiler::new();
    let module = match compiler.load_module(&cli.input) {
        Ok(module) => module,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let (program, parse_errors) = compiler.parse(&module);
    if !parse_errors.is_empty() || program.is_none() {
        for error in &parse_errors {
            eprintln!("{}", error);
        }
        eprintln!("Encountered parse errors. Exiting.");
        return ExitCode::FAILURE;
    }
    let mut program = program.expect("checked above");

    if cli.mode != Mode::Parse {
        compiler.typecheck(&mut program);
        if !program.errors.is_empty() {
            for error in &program.errors.errors {
                eprintln!("{}", error);
            }
            eprintln!("Encountered typecheck errors. Exiting.");
            return ExitCode::FAILURE;
        }
    }

    match cli.mode {
        Mode::Parse | Mode::Tc => {
            let json = program.to_json(false);
            println!("{}", serde_json::to_string_pretty(&json).expect("AST dumps encode"));
        }
        Mode::Emit => {
            println!("{}", compiler.emit_source(&mut program));
        }
    }
    ExitCode::SUCCESS
}
