//! Interactive fallback for run parameters not given on the command line.

use std::io::{BufRead, Write};

use crate::error::{CliError, Result};

/// Next non-blank whitespace-separated token from `input`.
fn next_token<R: BufRead>(input: &mut R, what: &'static str) -> Result<String> {
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(CliError::InputClosed(what));
        }
        if let Some(tok) = line.split_whitespace().next() {
            return Ok(tok.to_string());
        }
    }
}

/// Ask for a function name until one of `choices` is entered.
pub fn prompt_function<R, W, E>(
    input: &mut R,
    out: &mut W,
    err: &mut E,
    choices: &[&str],
) -> Result<String>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    loop {
        writeln!(out, "Which function to optimize?")?;
        writeln!(out, "Possible choices: {}", choices.join(" "))?;
        out.flush()?;
        let choice = next_token(input, "function name")?;
        if choices.contains(&choice.as_str()) {
            return Ok(choice);
        }
        writeln!(err, "Bad choice")?;
    }
}

/// Ask for the stopping threshold until a number is entered.
///
/// Range checks are left to the search, which rejects non-positive values.
pub fn prompt_precision<R, W>(input: &mut R, out: &mut W) -> Result<f64>
where
    R: BufRead,
    W: Write,
{
    loop {
        write!(out, "Precision? ")?;
        out.flush()?;
        if let Ok(p) = next_token(input, "precision")?.parse() {
            return Ok(p);
        }
    }
}
