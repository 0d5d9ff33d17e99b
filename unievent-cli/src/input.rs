//! Parsing and prompting for event fields.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use dialoguer::Input;
use owo_colors::OwoColorize;

/// Parse a date like "2025-10-31".
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{input}', expected YYYY-MM-DD"))
}

/// Parse a 24-hour time like "20:00".
pub fn parse_time(input: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(input.trim(), "%H:%M")
        .with_context(|| format!("Invalid time '{input}', expected HH:MM"))
}

/// Parse a cost: "free", "0", "10", "$12.50".
pub fn parse_cost(input: &str) -> Result<f64> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("free") {
        return Ok(0.0);
    }

    let cost: f64 = input
        .trim_start_matches('$')
        .parse()
        .with_context(|| format!("Invalid cost '{input}'"))?;

    if !cost.is_finite() || cost < 0.0 {
        anyhow::bail!("Cost must be zero or more, got '{input}'");
    }
    Ok(cost)
}

pub fn parse_capacity(input: &str) -> Result<u32> {
    input
        .trim()
        .parse()
        .with_context(|| format!("Invalid capacity '{input}', expected a whole number"))
}

/// Clap value parsers wrap the anyhow parsers above.
pub mod flag {
    use chrono::{NaiveDate, NaiveTime};

    pub fn date(input: &str) -> Result<NaiveDate, String> {
        super::parse_date(input).map_err(|e| e.to_string())
    }

    pub fn time(input: &str) -> Result<NaiveTime, String> {
        super::parse_time(input).map_err(|e| e.to_string())
    }

    pub fn cost(input: &str) -> Result<f64, String> {
        super::parse_cost(input).map_err(|e| e.to_string())
    }
}

/// Prompt until `parse` accepts the answer.
pub fn prompt_with_retry<T, F>(prompt: &str, parse: F) -> Result<T>
where
    F: Fn(&str) -> Result<T>,
{
    loop {
        let input: String = Input::new().with_prompt(prompt).interact_text()?;
        match parse(&input) {
            Ok(result) => return Ok(result),
            Err(e) => {
                eprintln!("  {}", e.to_string().red());
            }
        }
    }
}

/// Prompt for free text, allowing an empty answer.
pub fn prompt_text(prompt: &str) -> Result<String> {
    let text: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(text)
}
