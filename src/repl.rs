//! Interactive read/print loop
//!
//! Each input line is lexed and parsed on its own.  Depending on [`Mode`] the
//! loop prints the token stream or the canonical rendering of the parsed
//! program.  When the parser reports problems, the diagnostics are printed
//! under a fixed banner instead of the program.

use crate::parser::{Lexer, Node, Parser};
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use std::io::{self, BufRead, Write};

pub const PROMPT: &str = ">> ";

pub const MONKEY_FACE: &str = r#"            __,__
   .--.  .-"     "-.  .--.
  / .. \/  .-. .-.  \/ .. \
 | |  '|  /   Y   \  |'  | |
 | \   \  \ 0 | 0 /  /   / |
  \ '- ,\.-"""""""-./, -' /
   ''-' /_   ^ ^   _\ '-''
       |  \._   _./  |
       \   \ '~' /   /
        '._ '-=-' _.'
           '-----'
"#;

const PROMPT_COLOR: Color = Color::Rgb { r: 137, g: 180, b: 250 };
const ERROR_COLOR: Color = Color::Rgb { r: 243, g: 139, b: 168 };
const TOKEN_COLOR: Color = Color::Rgb { r: 250, g: 179, b: 135 };

/// What the loop prints for each line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// One token per line
    Tokens,
    /// The rendered program
    #[default]
    Ast,
}

#[derive(Debug, Clone)]
pub struct ReplConfig {
    pub mode: Mode,
    pub prompt: String,
    pub color: bool,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            prompt: PROMPT.to_string(),
            color: false,
        }
    }
}

/// Run the loop until `input` is exhausted.
pub fn start<R: BufRead, W: Write>(input: R, mut output: W, config: &ReplConfig) -> io::Result<()> {
    let mut lines = input.lines();

    loop {
        write_styled(&mut output, &config.prompt, PROMPT_COLOR, config.color)?;
        output.flush()?;

        let Some(line) = lines.next() else {
            log::debug!("end of input, leaving repl");
            return Ok(());
        };
        let line = line?;

        if line.trim().is_empty() {
            continue;
        }

        log::debug!("evaluating line ({} bytes) in {:?} mode", line.len(), config.mode);

        match config.mode {
            Mode::Tokens => print_tokens(&mut output, &line, config.color)?,
            Mode::Ast => print_program(&mut output, &line, config.color)?,
        }
    }
}

fn print_tokens<W: Write>(output: &mut W, line: &str, color: bool) -> io::Result<()> {
    for token in Lexer::new(line) {
        write_styled(output, &format!("{:?}", token.kind), TOKEN_COLOR, color)?;
        writeln!(output, " '{}'", token.literal)?;
    }
    Ok(())
}

fn print_program<W: Write>(output: &mut W, line: &str, color: bool) -> io::Result<()> {
    let mut parser = Parser::new(Lexer::new(line));
    let program = parser.parse_program();

    let errors = parser.errors();
    if !errors.is_empty() {
        return print_parse_errors(output, &errors, color);
    }

    writeln!(output, "{}", program.render())
}

/// Banner followed by one tab-indented line per diagnostic
pub fn print_parse_errors<W: Write>(output: &mut W, errors: &[String], color: bool) -> io::Result<()> {
    write_styled(output, MONKEY_FACE, ERROR_COLOR, color)?;
    writeln!(output, "Woops! We ran into some monkey business here!")?;
    writeln!(output, " parser errors:")?;
    for message in errors {
        writeln!(output, "\t{}", message)?;
    }
    Ok(())
}

fn write_styled<W: Write>(output: &mut W, text: &str, fg: Color, color: bool) -> io::Result<()> {
    if color {
        queue!(output, SetForegroundColor(fg), Print(text), ResetColor)
    } else {
        write!(output, "{}", text)
    }
}
