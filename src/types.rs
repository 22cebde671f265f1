//! Common types used throughout the client
//!
//! This module contains shared type definitions, type aliases,
//! and the enumerated request options accepted by the XML API.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

/// Progress callback: `(items aggregated so far, expected total)`
pub type ProgressFn = dyn Fn(u64, u64) + Send + Sync;

// ============================================================================
// Search Type
// ============================================================================

/// Kind of item a search is restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    /// Role-playing game items
    RpgItem,
    /// Video games
    VideoGame,
    /// Board games
    BoardGame,
    /// Board game expansions
    BoardGameExpansion,
}

impl SearchType {
    /// Value sent in the `type` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::RpgItem => "rpgitem",
            SearchType::VideoGame => "videogame",
            SearchType::BoardGame => "boardgame",
            SearchType::BoardGameExpansion => "boardgameexpansion",
        }
    }

    /// Join a set of search types into the comma-separated API form.
    ///
    /// Duplicates collapse and the output order is stable.
    pub fn join(types: &[SearchType]) -> String {
        let set: BTreeSet<SearchType> = types.iter().copied().collect();
        set.iter()
            .map(SearchType::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rpgitem" => Ok(SearchType::RpgItem),
            "videogame" => Ok(SearchType::VideoGame),
            "boardgame" => Ok(SearchType::BoardGame),
            "boardgameexpansion" => Ok(SearchType::BoardGameExpansion),
            other => Err(Error::invalid_request(format!(
                "invalid search type: {other}"
            ))),
        }
    }
}

// ============================================================================
// Hot Item Type
// ============================================================================

/// Category of the "hot items" list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HotItemType {
    /// Board games
    BoardGame,
    /// Role-playing games
    Rpg,
    /// Video games
    VideoGame,
    /// Board game designers and artists
    BoardGamePerson,
    /// Role-playing game people
    RpgPerson,
    /// Board game publishers
    BoardGameCompany,
    /// Role-playing game publishers
    RpgCompany,
    /// Video game companies
    VideoGameCompany,
}

impl HotItemType {
    /// All accepted hot item types
    pub const ALL: [HotItemType; 8] = [
        HotItemType::BoardGame,
        HotItemType::Rpg,
        HotItemType::VideoGame,
        HotItemType::BoardGamePerson,
        HotItemType::RpgPerson,
        HotItemType::BoardGameCompany,
        HotItemType::RpgCompany,
        HotItemType::VideoGameCompany,
    ];

    /// Value sent in the `type` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            HotItemType::BoardGame => "boardgame",
            HotItemType::Rpg => "rpg",
            HotItemType::VideoGame => "videogame",
            HotItemType::BoardGamePerson => "boardgameperson",
            HotItemType::RpgPerson => "rpgperson",
            HotItemType::BoardGameCompany => "boardgamecompany",
            HotItemType::RpgCompany => "rpgcompany",
            HotItemType::VideoGameCompany => "videogamecompany",
        }
    }
}

impl fmt::Display for HotItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HotItemType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::invalid_request(format!("invalid hot item type: {s}")))
    }
}

// ============================================================================
// Choose Strategy
// ============================================================================

/// How to pick one game when a name search returns several matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChooseStrategy {
    /// First result as returned by the server
    #[default]
    First,
    /// Most recently published
    Recent,
    /// Best board game rank (requires fetching every match)
    BestRank,
}

impl fmt::Display for ChooseStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChooseStrategy::First => "first",
            ChooseStrategy::Recent => "recent",
            ChooseStrategy::BestRank => "best-rank",
        })
    }
}

impl FromStr for ChooseStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "first" => Ok(ChooseStrategy::First),
            "recent" => Ok(ChooseStrategy::Recent),
            "best-rank" => Ok(ChooseStrategy::BestRank),
            other => Err(Error::invalid_request(format!(
                "invalid value for parameter 'choose': {other}"
            ))),
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("rpgitem", SearchType::RpgItem)]
    #[test_case("videogame", SearchType::VideoGame)]
    #[test_case("boardgame", SearchType::BoardGame)]
    #[test_case("boardgameexpansion", SearchType::BoardGameExpansion)]
    fn test_search_type_parse(input: &str, expected: SearchType) {
        assert_eq!(input.parse::<SearchType>().unwrap(), expected);
        assert_eq!(expected.to_string(), input);
    }

    #[test]
    fn test_search_type_join_dedupes() {
        let joined = SearchType::join(&[
            SearchType::BoardGameExpansion,
            SearchType::BoardGame,
            SearchType::BoardGame,
        ]);
        assert_eq!(joined, "boardgame,boardgameexpansion");
    }

    #[test]
    fn test_invalid_search_type() {
        let err = "boardgames".parse::<SearchType>().unwrap_err();
        assert!(matches!(err, Error::InvalidRequest { .. }));
    }

    #[test]
    fn test_hot_item_type_round_trip() {
        for t in HotItemType::ALL {
            assert_eq!(t.as_str().parse::<HotItemType>().unwrap(), t);
        }
        assert!("cardgame".parse::<HotItemType>().is_err());
    }

    #[test_case("first", ChooseStrategy::First)]
    #[test_case("recent", ChooseStrategy::Recent)]
    #[test_case("best-rank", ChooseStrategy::BestRank)]
    fn test_choose_strategy_parse(input: &str, expected: ChooseStrategy) {
        assert_eq!(input.parse::<ChooseStrategy>().unwrap(), expected);
    }

    #[test]
    fn test_choose_strategy_rejects_unknown() {
        let err = "best".parse::<ChooseStrategy>().unwrap_err();
        assert!(err.to_string().contains("'choose'"));
    }

    #[test]
    fn test_option_string_none_if_empty() {
        assert_eq!(
            Some("test".to_string()).none_if_empty(),
            Some("test".to_string())
        );
        assert_eq!(Some(String::new()).none_if_empty(), None);
        assert_eq!(None::<String>.none_if_empty(), None);
        assert_eq!(String::new().none_if_empty(), None);
    }
}
