//! Normalize command implementation.

use std::io::{self, Write};

use unf_canonical::{Canonicalizer, Digits};

use crate::input::{self, Subject};
use crate::output;

pub fn run(
    input: Option<String>,
    digits: Digits,
    raw: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let canonicalizer = Canonicalizer::default();
    let value = match input::load(input)? {
        Subject::Value(value) => value,
        Subject::Table(_) => {
            return Err("Tables have no single normal form; normalize one column at a time".into())
        }
    };

    let bytes = canonicalizer
        .normalize(&value, digits)
        .map_err(|e| format!("Normalization failed: {}", e))?;

    if raw {
        let mut stdout = io::stdout().lock();
        stdout.write_all(&bytes)?;
        stdout.flush()?;
    } else {
        println!("{}", output::escape_bytes(&bytes));
    }
    Ok(())
}
