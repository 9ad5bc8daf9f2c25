use std::io::{self, BufRead, Write};

use thiserror::Error;

pub const YES_NO: [&str; 2] = ["yes", "no"];

pub const MONTH_CHOICES: [&str; 7] = [
    "all", "january", "february", "march", "april", "may", "june",
];

pub const DAY_CHOICES: [&str; 8] = [
    "all",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Why a typed answer could not be resolved to one of the offered choices.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChoiceError {
    #[error("please type one of: {}", .options.join(", "))]
    Empty { options: Vec<&'static str> },

    #[error("'{input}' does not match any of: {}", .options.join(", "))]
    NoMatch {
        input: String,
        options: Vec<&'static str>,
    },

    #[error("'{input}' could be any of: {}; type more letters", .candidates.join(", "))]
    Ambiguous {
        input: String,
        candidates: Vec<&'static str>,
    },
}

/// Resolve free text to the single offered choice it names.
///
/// Matching is case-insensitive. An exact match wins; otherwise the input
/// must be a prefix of exactly one choice.
pub fn resolve_choice(
    input: &str,
    options: &[&'static str],
) -> Result<&'static str, ChoiceError> {
    let wanted = input.trim().to_lowercase();
    if wanted.is_empty() {
        return Err(ChoiceError::Empty {
            options: options.to_vec(),
        });
    }
    if let Some(exact) = options.iter().copied().find(|o| *o == wanted) {
        return Ok(exact);
    }
    let candidates: Vec<&'static str> = options
        .iter()
        .copied()
        .filter(|o| o.starts_with(&wanted))
        .collect();
    match candidates.len() {
        1 => Ok(candidates[0]),
        0 => Err(ChoiceError::NoMatch {
            input: input.trim().to_string(),
            options: options.to_vec(),
        }),
        _ => Err(ChoiceError::Ambiguous {
            input: input.trim().to_string(),
            candidates,
        }),
    }
}

/// Title-case a choice for display: `"new york city"` → `"New York City"`.
pub fn display_name(choice: &str) -> String {
    choice
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Ask `question` until the answer resolves to one of `options`.
///
/// Returns `None` when input ends before a valid answer is given.
pub fn ask<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    question: &str,
    options: &[&'static str],
) -> io::Result<Option<&'static str>> {
    let mut line = String::new();
    loop {
        write!(out, "{question} ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(None);
        }
        match resolve_choice(&line, options) {
            Ok(choice) => {
                writeln!(out, "You have picked {}", display_name(choice))?;
                return Ok(Some(choice));
            }
            Err(err) => {
                log::debug!("rejected answer {:?}: {err}", line.trim());
                writeln!(out, "{err}")?;
            }
        }
    }
}
