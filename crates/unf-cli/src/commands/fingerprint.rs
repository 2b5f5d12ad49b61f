//! Fingerprint command implementation.

use serde_json::json;
use unf_canonical::{Canonicalizer, Digits};

use crate::input;
use crate::output;

pub fn run(
    input: Option<String>,
    digits: Digits,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let canonicalizer = Canonicalizer::default();
    let subject = input::load(input)?;

    let fingerprint = subject
        .fingerprint(digits, &canonicalizer)
        .map_err(|e| format!("Fingerprinting failed: {}", e))?;

    if json {
        let report = json!({
            "fingerprint": fingerprint.to_string(),
            "version": fingerprint.version(),
            "digits": digits.get(),
            "digest": fingerprint.digest(),
            "kind": subject.kind(),
        });
        println!("{}", output::format_json(&report));
    } else {
        println!("{}", fingerprint);
    }
    Ok(())
}
