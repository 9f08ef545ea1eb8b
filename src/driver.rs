//! Command-line front end for `cflatc`.
//!
//! Exit codes: 0 on success, 1 when the program has syntax or semantic
//! errors (or a file cannot be read or written), 2 when the compiler itself
//! fails.

use std::{fs, path::PathBuf};

use clap::{ArgAction, Parser};
use log::{info, LevelFilter};

use crate::{
    analyze,
    ast::unparse::unparse,
    compiler::compiler::compile,
    display_error,
    errors::errors::InternalError,
    parse_source,
};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_INTERNAL: i32 = 2;

#[derive(Parser, Debug, Clone)]
#[command(name = "cflatc", version, about = "Compiles cflat programs to MIPS assembly")]
pub struct Args {
    /// Source file to compile
    pub input: PathBuf,

    /// Where to write the assembly [default: INPUT with a .s extension]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the program with resolved identifier types after analysis
    #[arg(long)]
    pub unparse: bool,

    /// Stop after analysis without writing any assembly
    #[arg(long)]
    pub check: bool,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// The assembly file: `--output`, or the input with its extension
    /// replaced by `.s`.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input.with_extension("s"))
    }
}

/// Runs one compilation and returns the process exit code.
pub fn run(args: &Args) -> i32 {
    let file = args.input.display().to_string();

    let source = match fs::read_to_string(&args.input) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Error: cannot read {}: {}", file, error);
            return EXIT_FAILURE;
        }
    };

    let mut program = match parse_source(&source, &file) {
        Ok(program) => program,
        Err(error) => {
            eprint!("{}", display_error(&error, &file, &source));
            return EXIT_FAILURE;
        }
    };

    let mut context = match analyze(&mut program) {
        Ok(context) => context,
        Err(error) => return internal_failure(&error),
    };

    if args.unparse {
        print!("{}", unparse(&program, Some(&context.symbols)));
    }

    if context.diagnostics.has_errors() {
        for error in context.diagnostics.errors() {
            eprint!("{}", display_error(error, &file, &source));
        }
        eprintln!("{} error(s) in {}", context.diagnostics.len(), file);
        return EXIT_FAILURE;
    }

    if args.check {
        info!("{} checked without errors", file);
        return EXIT_SUCCESS;
    }

    let assembly = match compile(&program, &mut context) {
        Ok(assembly) => assembly,
        Err(error) => return internal_failure(&error),
    };

    let output = args.output_path();
    if let Err(error) = fs::write(&output, assembly.to_string()) {
        eprintln!("Error: cannot write {}: {}", output.display(), error);
        return EXIT_FAILURE;
    }

    info!("wrote {}", output.display());
    EXIT_SUCCESS
}

fn internal_failure(error: &InternalError) -> i32 {
    eprintln!("internal compiler error: {}", error);
    EXIT_INTERNAL
}
