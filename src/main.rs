// Monkey: lexer, Pratt parser and REPL

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser as _;
use crossterm::tty::IsTty;

use monkey::parser::{parse, Node};
use monkey::repl::{self, Mode, ReplConfig};

#[derive(clap::Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Parse this file and print the canonical program instead of starting the REPL
    file: Option<PathBuf>,

    /// Print tokens instead of the parsed program
    #[arg(long)]
    tokens: bool,

    /// REPL prompt
    #[arg(long, default_value = repl::PROMPT)]
    prompt: String,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Silence all log output
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    stderrlog::new()
        .module("monkey")
        .quiet(cli.quiet)
        .verbosity(usize::from(cli.verbose) + 1)
        .init()?;

    if let Some(path) = &cli.file {
        return run_file(path);
    }

    let stdout = io::stdout();
    let config = ReplConfig {
        mode: if cli.tokens { Mode::Tokens } else { Mode::Ast },
        prompt: cli.prompt,
        color: !cli.no_color && stdout.is_tty(),
    };

    println!("Hello {}! This is the Monkey programming language!", current_user());
    println!("Feel free to type in commands");

    repl::start(io::stdin().lock(), stdout.lock(), &config)?;
    Ok(())
}

fn run_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(path)?;
    log::info!("parsing {}", path.display());

    let (program, errors) = parse(&source);

    if !errors.is_empty() {
        for err in &errors {
            eprintln!("{}:{}: {}", path.display(), err.location, err);
        }
        std::process::exit(1);
    }

    log::info!("parsed {} top-level statements", program.statements.len());
    println!("{}", program.render());
    Ok(())
}

fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "there".to_string())
}
