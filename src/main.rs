use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use botbuddy::{Config, Interpreter, LineSupplier, NullActuator, ReadSource, Registry};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Script file to interpret; reads piped stdin when omitted
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Parse only: print the resolution trace without performing actions
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Treat an unterminated quote or heredoc as an error
    #[arg(short = 's', long)]
    strict: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config {
        strict: args.strict,
        ..Config::default()
    };
    let mut interp = Interpreter::with_config(NullActuator::new(), Registry::base(), config);

    match &args.file {
        Some(path) => {
            let mut source = ReadSource::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            run(&mut interp, &mut source, args.dry_run)
        }
        None => {
            let stdin = io::stdin();
            if stdin.is_terminal() {
                // Neither a file nor a pipe: nothing to interpret.
                Args::command().print_help()?;
                return Ok(());
            }
            let mut source = ReadSource::new(stdin.lock());
            run(&mut interp, &mut source, args.dry_run)
        }
    }
}

fn run(
    interp: &mut Interpreter<NullActuator>,
    source: &mut dyn LineSupplier,
    dry_run: bool,
) -> Result<()> {
    if dry_run {
        print!("{}", interp.interpret_dry_run(source)?);
    } else {
        interp.interpret(source)?;
    }
    Ok(())
}
