//! Typed records built from API responses
//!
//! Paginated resources come with a `*Pages` collector implementing
//! [`PageConsumer`](crate::pagination::PageConsumer); single-page resources
//! expose a `from_document` constructor.

mod fields;
mod game;
mod guild;
mod items;
mod plays;
mod user;

pub use game::{Game, GameStats, ItemRef, Rank};
pub use guild::{Guild, GuildPages, Location};
pub use items::{Collection, CollectionItem, CollectionStatus, HotItem, HotItems, SearchResult};
pub use plays::{Play, Player, Plays, PlaysPages, PlaysSubject};
pub use user::{User, UserPages};
