//! Client argument types

use std::fmt;
use std::str::FromStr;

/// How to identify a game
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameLookup {
    /// Numeric game id
    Id(u64),
    /// Exact game name, resolved through a search
    Name(String),
}

impl From<u64> for GameLookup {
    fn from(id: u64) -> Self {
        GameLookup::Id(id)
    }
}

impl From<&str> for GameLookup {
    fn from(name: &str) -> Self {
        GameLookup::Name(name.to_string())
    }
}

impl From<String> for GameLookup {
    fn from(name: String) -> Self {
        GameLookup::Name(name)
    }
}

impl FromStr for GameLookup {
    type Err = std::convert::Infallible;

    /// All-digit input is an id, anything else a name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<u64>() {
            Ok(id) => GameLookup::Id(id),
            Err(_) => GameLookup::Name(s.to_string()),
        })
    }
}

impl fmt::Display for GameLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameLookup::Id(id) => write!(f, "#{id}"),
            GameLookup::Name(name) => f.write_str(name),
        }
    }
}
