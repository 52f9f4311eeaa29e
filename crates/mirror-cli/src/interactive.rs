//! Interactive prompts for configuration values
//!
//! Uses dialoguer for terminal input. Each answer is checked with the same
//! predicate the non-interactive path uses, and the prompt repeats until it
//! passes.

use colored::Colorize;
use dialoguer::Input;
use mirror_core::config::{parse_interval, validate_directory};
use mirror_core::{ConfigField, Error, ValueProvider};

/// Asks on the terminal for every missing or rejected value
#[derive(Debug, Default)]
pub struct DialoguerPrompt;

impl ValueProvider for DialoguerPrompt {
    fn request(&mut self, field: ConfigField, problem: Option<&str>) -> mirror_core::Result<String> {
        if let Some(problem) = problem {
            eprintln!("{} {}", "!".yellow().bold(), problem);
        }

        let input = Input::<String>::new().with_prompt(field.prompt());
        let input = match field {
            ConfigField::Interval => input.validate_with(|raw: &String| {
                parse_interval(raw).map(|_| ()).map_err(|e| e.to_string())
            }),
            _ => input.validate_with(move |raw: &String| {
                validate_directory(field, raw)
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            }),
        };

        input
            .interact_text()
            .map_err(|e| Error::ValueUnavailable {
                field: field.key().to_string(),
                message: e.to_string(),
            })
    }
}
