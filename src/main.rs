// CLI entrypoint: interpret one G-code file and print machine actions.

use std::fs::File;
use std::io::{self, BufReader};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use gcode_core::{ConsoleMachine, GcodeError, Interpreter, InterpreterConfig};

#[derive(Parser, Debug)]
#[command(name = "gcode-run", about = "Interpret a G-code program and print the machine actions")]
struct Cli {
    /// Program to run; the path must end in `gcode`
    gcode_file: String,
}

/// Last five characters of the path, reported before anything runs.
fn file_ending(path: &str) -> &str {
    path.char_indices().rev().nth(4).map_or(path, |(i, _)| &path[i..])
}

fn run(path: &str) -> Result<(), GcodeError> {
    let file = File::open(path)?;
    let machine = ConsoleMachine::new(io::stdout().lock());
    let mut interpreter = Interpreter::new(machine, InterpreterConfig::default());

    let summary = interpreter.run_reader(BufReader::new(file))?;
    tracing::info!(
        lines = summary.lines_read,
        instructions = summary.instructions_executed,
        stopped = summary.stopped,
        "program finished"
    );

    let stdout = interpreter.into_machine().into_inner()?;
    drop(stdout);
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    println!("A file with the following ending has been added: {}", file_ending(&cli.gcode_file));

    if !cli.gcode_file.ends_with("gcode") {
        println!("Add a gcode file");
        return ExitCode::SUCCESS;
    }

    match run(&cli.gcode_file) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
