//! Interactive country picker.
//!
//! This is intentionally kept separate from clap parsing:
//! - clap handles structured flags/subcommands
//! - the picker turns loosely-typed country input into a known country name
//!
//! Matching is case-insensitive. An exact name wins; otherwise a prefix that
//! matches exactly one country is accepted.

use std::io::{self, Write};

use crate::error::{AppError, EXIT_INPUT};

/// Maximum number of suggestions shown for an ambiguous or unknown name.
const MAX_SUGGESTIONS: usize = 8;

/// Resolve user input to one of `countries`.
pub fn resolve_country(input: &str, countries: &[String]) -> Result<String, AppError> {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return Err(AppError::new(EXIT_INPUT, "Empty country name."));
    }

    if let Some(exact) = countries.iter().find(|c| c.to_lowercase() == needle) {
        return Ok(exact.clone());
    }

    let prefixed: Vec<&String> = countries
        .iter()
        .filter(|c| c.to_lowercase().starts_with(&needle))
        .collect();
    match prefixed.as_slice() {
        [only] => Ok((*only).clone()),
        [] => {
            let contains: Vec<&String> = countries
                .iter()
                .filter(|c| c.to_lowercase().contains(&needle))
                .collect();
            Err(AppError::new(
                EXIT_INPUT,
                format!("Unknown country '{}'.{}", input.trim(), suggestions(&contains)),
            ))
        }
        many => Err(AppError::new(
            EXIT_INPUT,
            format!("Ambiguous country '{}'.{}", input.trim(), suggestions(many)),
        )),
    }
}

fn suggestions(candidates: &[&String]) -> String {
    if candidates.is_empty() {
        return String::new();
    }
    let shown: Vec<&str> = candidates.iter().take(MAX_SUGGESTIONS).map(|s| s.as_str()).collect();
    let more = candidates.len().saturating_sub(MAX_SUGGESTIONS);
    if more > 0 {
        format!(" Did you mean: {} (+{more} more)?", shown.join(", "))
    } else {
        format!(" Did you mean: {}?", shown.join(", "))
    }
}

/// Prompt on stdin until the user names a known country.
///
/// - any resolvable name or unique prefix is accepted
/// - `q` cancels
pub fn prompt_for_country(countries: &[String]) -> Result<String, AppError> {
    if countries.is_empty() {
        return Err(AppError::new(EXIT_INPUT, "No countries available in the loaded data."));
    }

    loop {
        print!("Country ({} available, q to quit): ", countries.len());
        io::stdout()
            .flush()
            .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write prompt: {e}")))?;

        let mut input = String::new();
        let bytes = io::stdin()
            .read_line(&mut input)
            .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to read input: {e}")))?;

        if bytes == 0 {
            return Err(AppError::new(
                EXIT_INPUT,
                "No input received. Provide a country with `--country <name>`.",
            ));
        }

        let input = input.trim();
        if input.eq_ignore_ascii_case("q") {
            return Err(AppError::new(EXIT_INPUT, "Canceled."));
        }

        match resolve_country(input, countries) {
            Ok(country) => return Ok(country),
            Err(err) => println!("{err}"),
        }
    }
}
