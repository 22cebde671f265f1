//! CLI module
//!
//! Command-line interface over the client facade.
//!
//! # Commands
//!
//! - `game` - Fetch a game by id or name
//! - `games` - Fetch every game with an exact name
//! - `search` - Search items by name
//! - `user` - Fetch a user with buddies and guilds
//! - `guild` - Fetch a guild with its members
//! - `plays` - Fetch logged plays of a user or game
//! - `collection` - Fetch a user's collection
//! - `hot` - Fetch the hot list
//!
//! Records are printed as JSON on stdout, progress goes to stderr. A
//! missing resource exits with status 2.

mod commands;
mod runner;

pub use commands::{Cli, Commands, PlaysArgs};
pub use runner::{Outcome, Runner, EXIT_NOT_FOUND};
