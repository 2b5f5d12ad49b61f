//! Verify command implementation.

use serde_json::json;
use tracing::debug;
use unf_canonical::{Canonicalizer, Fingerprint};

use crate::input;
use crate::output;

pub fn run(
    fingerprint: String,
    input: Option<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let expected = Fingerprint::parse(&fingerprint)
        .map_err(|e| format!("Invalid fingerprint: {}", e))?;
    let canonicalizer = Canonicalizer::default();
    let subject = input::load(input)?;

    let computed = subject
        .fingerprint(expected.digits(), &canonicalizer)
        .map_err(|e| format!("Fingerprinting failed: {}", e))?;
    let matched = computed == expected;
    debug!(%expected, %computed, matched, "verified input");

    if json {
        let report = json!({
            "expected": expected.to_string(),
            "computed": computed.to_string(),
            "match": matched,
        });
        println!("{}", output::format_json(&report));
    } else if matched {
        println!("OK {}", computed);
    } else {
        println!("MISMATCH expected {} computed {}", expected, computed);
    }

    if !matched {
        std::process::exit(1);
    }
    Ok(())
}
