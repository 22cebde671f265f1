//! CLI commands and argument parsing

use crate::client::GameLookup;
use crate::types::{ChooseStrategy, HotItemType, SearchType};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// BoardGameGeek XML API command line client
#[derive(Parser, Debug)]
#[command(name = "bgg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML, or JSON by extension)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Cache URI (memory:///?ttl=SECS or file:///DIR?ttl=SECS)
    #[arg(long, global = true, conflicts_with = "no_cache")]
    pub cache: Option<String>,

    /// Disable response caching
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Requests per minute
    #[arg(long, global = true)]
    pub rpm: Option<u32>,

    /// Per-attempt timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Total attempts per request
    #[arg(long, global = true)]
    pub retries: Option<u32>,

    /// Delay between attempts in seconds
    #[arg(long, global = true)]
    pub retry_delay: Option<u64>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a game by id or name
    Game {
        /// Game id, or its exact name
        lookup: GameLookup,

        /// Which match to pick when several games share the name
        #[arg(long, default_value = "first")]
        choose: ChooseStrategy,
    },

    /// Fetch every game and expansion with this exact name
    Games {
        /// Exact name
        name: String,
    },

    /// Search items by name
    Search {
        /// Search query
        query: String,

        /// Item types to search (repeatable, default boardgame)
        #[arg(short = 't', long = "type")]
        types: Vec<SearchType>,

        /// Only exact name matches
        #[arg(long)]
        exact: bool,
    },

    /// Fetch a user with buddies and guilds
    User {
        /// User name
        name: String,
    },

    /// Fetch a guild with all members
    Guild {
        /// Guild id
        id: u64,
    },

    /// Fetch logged plays of a user or a game
    Plays(PlaysArgs),

    /// Fetch a user's collection
    Collection {
        /// User name
        user: String,

        /// Extra collection filters as KEY=VALUE (e.g. own=1)
        #[arg(short, long = "filter", value_parser = parse_key_value)]
        filters: Vec<(String, String)>,
    },

    /// Fetch the hot list
    Hot {
        /// Item type
        #[arg(short = 't', long = "type", default_value = "boardgame")]
        item_type: HotItemType,
    },
}

/// Arguments of the `plays` command
#[derive(Args, Debug)]
#[command(group(clap::ArgGroup::new("subject").required(true).args(["user", "game"])))]
pub struct PlaysArgs {
    /// Plays logged by this user
    #[arg(long)]
    pub user: Option<String>,

    /// Plays of this game id
    #[arg(long)]
    pub game: Option<u64>,

    /// Earliest play date (YYYY-MM-DD)
    #[arg(long)]
    pub min_date: Option<NaiveDate>,

    /// Latest play date (YYYY-MM-DD)
    #[arg(long)]
    pub max_date: Option<NaiveDate>,
}

fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    s.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_game_with_global_flags() {
        let cli = Cli::try_parse_from([
            "bgg", "game", "Catan", "--choose", "best-rank", "--rpm", "10", "--no-cache",
        ])
        .unwrap();
        assert_eq!(cli.rpm, Some(10));
        assert!(cli.no_cache);
        match cli.command {
            Commands::Game { lookup, choose } => {
                assert_eq!(lookup, GameLookup::Name("Catan".into()));
                assert_eq!(choose, ChooseStrategy::BestRank);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cache_conflicts_with_no_cache() {
        let err = Cli::try_parse_from(["bgg", "--cache", "memory:///", "--no-cache", "hot"]);
        assert!(err.is_err());
    }

    #[test]
    fn test_parse_search_types() {
        let cli = Cli::try_parse_from(["bgg", "search", "Azul", "-t", "boardgame", "-t", "rpgitem"])
            .unwrap();
        match cli.command {
            Commands::Search { types, exact, .. } => {
                assert_eq!(types, vec![SearchType::BoardGame, SearchType::RpgItem]);
                assert!(!exact);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_plays_requires_subject() {
        assert!(Cli::try_parse_from(["bgg", "plays"]).is_err());
        assert!(Cli::try_parse_from(["bgg", "plays", "--user", "a", "--game", "1"]).is_err());

        let cli = Cli::try_parse_from(["bgg", "plays", "--game", "822", "--min-date", "2024-01-01"])
            .unwrap();
        match cli.command {
            Commands::Plays(args) => {
                assert_eq!(args.game, Some(822));
                assert_eq!(args.min_date, NaiveDate::from_ymd_opt(2024, 1, 1));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_collection_filters() {
        let cli = Cli::try_parse_from(["bgg", "collection", "alice", "-f", "own=1"]).unwrap();
        match cli.command {
            Commands::Collection { filters, .. } => {
                assert_eq!(filters, vec![("own".to_string(), "1".to_string())]);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Cli::try_parse_from(["bgg", "collection", "alice", "-f", "own"]).is_err());
    }
}
