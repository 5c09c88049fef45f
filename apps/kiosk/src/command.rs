//! One typed line of kiosk input, parsed into an event.

use std::path::PathBuf;

use shared::{catalog::CatalogError, domain::RequestStatus};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    Name(String),
    Email(String),
    Location(String),
    Description(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A 1-based pick from the list on screen.
    Select(usize),
    Back,
    Home,
    History,
    Help,
    Quit,
    Field(FormField),
    ToggleAnonymous,
    TogglePriority,
    Submit,
    FilterCampus(String),
    FilterCategory(String),
    FilterStatus(String),
    Search(String),
    ResetFilters,
    SetStatus { id: i64, status: RequestStatus },
    Cancel(i64),
    Export(Option<PathBuf>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("type a command, or 'help' to list them")]
    Empty,
    #[error("unknown command '{0}'; type 'help' to list commands")]
    Unknown(String),
    #[error("'{0}' needs a value")]
    MissingArgument(&'static str),
    #[error("'{0}' is not a request number")]
    BadId(String),
    #[error(transparent)]
    BadStatus(#[from] CatalogError),
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(CommandError::Empty);
    }

    if let Ok(choice) = line.parse::<usize>() {
        return Ok(Command::Select(choice));
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "back" => Command::Back,
        "home" => Command::Home,
        "history" => Command::History,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "name" => Command::Field(FormField::Name(rest.to_string())),
        "email" => Command::Field(FormField::Email(rest.to_string())),
        "location" => Command::Field(FormField::Location(rest.to_string())),
        "desc" | "description" => Command::Field(FormField::Description(rest.to_string())),
        "anon" | "anonymous" => Command::ToggleAnonymous,
        "priority" | "urgent" => Command::TogglePriority,
        "submit" => Command::Submit,
        "campus" => Command::FilterCampus(required(rest, "campus")?),
        "category" => Command::FilterCategory(required(rest, "category")?),
        "status" => Command::FilterStatus(required(rest, "status")?),
        "search" => Command::Search(rest.to_string()),
        "reset" => Command::ResetFilters,
        "set" => {
            let (id, status) = rest
                .split_once(char::is_whitespace)
                .ok_or(CommandError::MissingArgument("set"))?;
            Command::SetStatus {
                id: parse_id(id)?,
                status: status.trim().parse()?,
            }
        }
        "cancel" => Command::Cancel(parse_id(&required(rest, "cancel")?)?),
        "export" => Command::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
        _ => return Err(CommandError::Unknown(word.to_string())),
    };
    Ok(command)
}

fn required(rest: &str, command: &'static str) -> Result<String, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument(command))
    } else {
        Ok(rest.to_string())
    }
}

fn parse_id(raw: &str) -> Result<i64, CommandError> {
    raw.trim()
        .trim_start_matches('#')
        .parse()
        .map_err(|_| CommandError::BadId(raw.to_string()))
}

pub const HELP: &str = "\
Pick a numbered item to move forward.
Form:     name <text> | email <text> | anon | location <text> | desc <text> | priority | submit
History:  campus <name|all> | category <id|all> | status <status|all> | search <text> | reset
          set <id> <status> | cancel <id> | export [dir]
Anywhere: back | home | history | help | quit";

#[cfg(test)]
#[path = "tests/command_tests.rs"]
mod tests;
