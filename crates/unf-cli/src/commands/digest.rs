//! Digest command implementation.

use unf_canonical::{Canonicalizer, Digits};

use crate::input;

pub fn run(input: Option<String>, digits: Digits) -> Result<(), Box<dyn std::error::Error>> {
    let canonicalizer = Canonicalizer::default();
    let subject = input::load(input)?;

    let digest = subject
        .digest(digits, &canonicalizer)
        .map_err(|e| format!("Fingerprinting failed: {}", e))?;

    println!("{}", digest);
    Ok(())
}
