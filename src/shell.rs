//! Line-oriented command shell driving the stores

use crate::app::App;
use crate::core::LoadOutcome;
use crate::error::StoreError;
use crate::models::{LoginForm, PetId, SwipeAction};
use std::fmt::Write as _;
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  signin <email> <password>   Sign in and load your pets
  signout                     Sign out
  pets                        List your pets
  select <pet-id>             Swipe as this pet
  candidates                  Load candidates for the active pet
  like [pet-id]               Like a candidate (default: the next one)
  reject [pet-id]             Reject a candidate (default: the next one)
  matches                     List your matches
  count                       Show your match count
  help                        Show this help
  quit                        Exit";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown command: {0} (try 'help')")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SignIn { email: String, password: String },
    SignOut,
    Pets,
    Select(PetId),
    Candidates,
    Swipe { action: SwipeAction, target: Option<PetId> },
    Matches,
    Count,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line; blank lines yield `None`
    pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match (name.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("signin", [email, password]) => Command::SignIn {
                email: email.to_string(),
                password: password.to_string(),
            },
            ("signin", _) => return Err(ParseError::Usage("signin <email> <password>")),
            ("signout", []) => Command::SignOut,
            ("pets", []) => Command::Pets,
            ("select", [pet_id]) => Command::Select(pet_id.to_string()),
            ("select", _) => return Err(ParseError::Usage("select <pet-id>")),
            ("candidates", []) => Command::Candidates,
            (action @ ("like" | "reject" | "pass"), rest) if rest.len() <= 1 => {
                let action = action
                    .parse::<SwipeAction>()
                    .map_err(|_| ParseError::UnknownCommand(action.to_string()))?;
                Command::Swipe {
                    action,
                    target: rest.first().map(|id| id.to_string()),
                }
            }
            ("like" | "reject" | "pass", _) => return Err(ParseError::Usage("like|reject [pet-id]")),
            ("matches", []) => Command::Matches,
            ("count", []) => Command::Count,
            ("help" | "?", _) => Command::Help,
            ("quit" | "exit", _) => Command::Quit,
            _ => return Err(ParseError::UnknownCommand(name.to_string())),
        };

        Ok(Some(command))
    }
}

/// Run one command and render its result
pub async fn execute(app: &App, command: Command) -> Result<String, StoreError> {
    match command {
        Command::SignIn { email, password } => {
            let result = app.auth().sign_in(LoginForm { email, password }).await?;
            let pets = app.pets().fetch_my_pets().await?;
            Ok(format!(
                "Signed in as {} ({} pets)",
                result.user.email.as_deref().unwrap_or(&result.user.id),
                pets.len()
            ))
        }
        Command::SignOut => {
            app.sign_out().await?;
            Ok("Signed out".to_string())
        }
        Command::Pets => {
            let pets = app.pets().fetch_my_pets().await?;
            let active = app.matching().active_pet().await.map(|p| p.id);
            if pets.is_empty() {
                return Ok("You have no pets yet".to_string());
            }
            let mut out = String::new();
            for pet in &pets {
                let marker = if active.as_deref() == Some(pet.id.as_str()) { "*" } else { " " };
                let hidden = if pet.is_active { "" } else { " [hidden]" };
                let _ = writeln!(
                    out,
                    "{} {}  {} ({}, {}y, {}){}",
                    marker, pet.id, pet.name, pet.breed, pet.age_years, pet.gender, hidden
                );
            }
            Ok(out.trim_end().to_string())
        }
        Command::Select(pet_id) => {
            let pet = app.pets().select_active_pet(&pet_id).await?;
            Ok(format!("Now swiping as {}", pet.name))
        }
        Command::Candidates => {
            if app.matching().load_candidates().await? == LoadOutcome::Stale {
                return Ok("Selection changed while loading".to_string());
            }
            let candidates = app.matching().candidates().await;
            if candidates.is_empty() {
                return Ok("No candidates right now".to_string());
            }
            let mut out = String::new();
            for candidate in &candidates {
                let _ = writeln!(
                    out,
                    "{}  {} ({}, {}y, {})",
                    candidate.id, candidate.name, candidate.breed, candidate.age_years, candidate.gender
                );
            }
            Ok(out.trim_end().to_string())
        }
        Command::Swipe { action, target } => {
            let target = match target {
                Some(id) => id,
                None => match app.matching().head().await {
                    Some(candidate) => candidate.id,
                    None => return Ok("No candidates left; try 'candidates'".to_string()),
                },
            };
            let matched = app.matching().swipe(&target, action).await?;
            Ok(match matched {
                Some(m) => format!("It's a match! ({})", m.id),
                None => format!("{} {}", action, target),
            })
        }
        Command::Matches => {
            let matches = app.matching().fetch_matches().await?;
            if matches.is_empty() {
                return Ok("No matches yet".to_string());
            }
            let mine: Vec<PetId> = app.pets().my_pets().await.into_iter().map(|p| p.id).collect();
            let mut out = String::new();
            for details in &matches {
                let (own, other) = details.sides(&mine);
                let _ = writeln!(out, "{} <3 {} ({})", own.name, other.name, other.breed);
            }
            Ok(out.trim_end().to_string())
        }
        Command::Count => {
            let count = app.matching().fetch_match_count().await?;
            Ok(format!("{} matches", count))
        }
        Command::Help => Ok(HELP.to_string()),
        Command::Quit => Ok("Bye".to_string()),
    }
}
