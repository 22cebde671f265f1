//! # BoardGameGeek XML API client
//!
//! A resilient client for the BoardGameGeek XML API 2: rate limited,
//! cached, retrying on the server's "still processing" answer, and able to
//! stitch paginated resources back together.
//!
//! ## Features
//!
//! - **Rate Limiting**: rolling one-minute request budget shared by every operation
//! - **Caching**: in-memory or file-backed response cache with TTL expiry
//! - **Retries**: fixed-delay retries on `202 Accepted`, timeouts and transient errors
//! - **Pagination**: aggregation of guild members, user buddies/guilds and plays
//!   with progress reporting and truncation on late-page failures
//! - **Typed Records**: games, users, guilds, plays, collections, hot lists, search results
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bgg_xmlapi::{BoardGameGeek, ChooseStrategy, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let bgg = BoardGameGeek::new()?;
//!
//!     if let Some(game) = bgg.game("Android: Netrunner".into(), ChooseStrategy::BestRank).await? {
//!         println!("{} ({:?})", game.display_name(), game.boardgame_rank());
//!     }
//!
//!     let progress = |current: u64, total: u64| eprintln!("{current}/{total}");
//!     let guild = bgg.guild(1229, Some(&progress)).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  BoardGameGeek (client facade)                  │
//! │   game  games  search  user  guild  plays  collection  hot      │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌────────────┬─────────────────┴──┬──────────────┬───────────────┐
//! │ Pagination │ Transport          │ Cache        │ Decode/Models │
//! ├────────────┼────────────────────┼──────────────┼───────────────┤
//! │ Aggregator │ Fixed-delay retry  │ Memory       │ XML tree      │
//! │ Progress   │ Rolling rate limit │ File (JSON)  │ Typed records │
//! └────────────┴────────────────────┴──────────────┴───────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
// Allow common clippy pedantic lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Client configuration
pub mod config;

/// XML response decoding
pub mod decode;

/// Response cache backends
pub mod cache;

/// HTTP transport with retry and rate limiting
pub mod http;

/// Paginated aggregation
pub mod pagination;

/// Typed API records
pub mod models;

/// Per-resource client operations
pub mod client;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use client::{BoardGameGeek, GameLookup};
pub use config::ClientConfig;
pub use pagination::{AggregationSummary, Aggregator, Termination};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
