//! Board game records (`/thing`)

use super::fields::{attr_string, required_id, signed_year, text_string, unescape_html};
use crate::decode::XmlElement;
use crate::error::{Error, Result};
use serde::Serialize;

/// Reference to another item by id and name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRef {
    /// Item id
    pub id: u64,
    /// Item name
    pub name: String,
}

/// Position in one ranking list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rank {
    /// Internal list name, e.g. `boardgame` or `strategygames`
    pub name: Option<String>,
    /// Display name of the list, e.g. `Board Game Rank`
    pub friendly_name: Option<String>,
    /// `None` when the game is not ranked in this list
    pub value: Option<u64>,
}

/// Community statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GameStats {
    /// Number of users who rated the game
    pub users_rated: Option<u64>,
    /// Average rating
    pub average: Option<f64>,
    /// Bayesian average rating
    pub bayes_average: Option<f64>,
    /// Standard deviation of ratings
    pub stddev: Option<f64>,
    /// Median rating
    pub median: Option<f64>,
    /// Users owning a copy
    pub owned: Option<u64>,
    /// Users offering it for trade
    pub trading: Option<u64>,
    /// Users wanting it in trade
    pub wanting: Option<u64>,
    /// Users with it on their wishlist
    pub wishing: Option<u64>,
    /// Number of comments
    pub num_comments: Option<u64>,
    /// Number of weight votes
    pub num_weights: Option<u64>,
    /// Average complexity weight (1 to 5)
    pub average_weight: Option<f64>,
}

impl GameStats {
    fn from_ratings(ratings: &XmlElement) -> Self {
        Self {
            users_rated: ratings.child_value_parse("usersrated"),
            average: ratings.child_value_parse("average"),
            bayes_average: ratings.child_value_parse("bayesaverage"),
            stddev: ratings.child_value_parse("stddev"),
            median: ratings.child_value_parse("median"),
            owned: ratings.child_value_parse("owned"),
            trading: ratings.child_value_parse("trading"),
            wanting: ratings.child_value_parse("wanting"),
            wishing: ratings.child_value_parse("wishing"),
            num_comments: ratings.child_value_parse("numcomments"),
            num_weights: ratings.child_value_parse("numweights"),
            average_weight: ratings.child_value_parse("averageweight"),
        }
    }
}

/// A board game or expansion
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Game {
    /// Game id
    pub id: u64,
    /// Primary name
    pub name: Option<String>,
    /// Alternate names in other languages or editions
    pub alternative_names: Vec<String>,
    /// Is this item an expansion of another game?
    pub expansion: bool,
    /// Thumbnail image URL
    pub thumbnail: Option<String>,
    /// Full image URL
    pub image: Option<String>,
    /// Description with HTML entities decoded
    pub description: Option<String>,
    /// Publication year, negative before the common era
    pub year_published: Option<i64>,
    /// Minimum player count
    pub min_players: Option<u32>,
    /// Maximum player count
    pub max_players: Option<u32>,
    /// Playing time in minutes
    pub playing_time: Option<u32>,
    /// Minimum recommended age
    pub min_age: Option<u32>,
    /// Family links
    pub families: Vec<String>,
    /// Category links
    pub categories: Vec<String>,
    /// Games implementing or reimplementing this one
    pub implementations: Vec<String>,
    /// Mechanic links
    pub mechanics: Vec<String>,
    /// Designer names
    pub designers: Vec<String>,
    /// Artist names
    pub artists: Vec<String>,
    /// Publisher names
    pub publishers: Vec<String>,
    /// Expansions for this game
    pub expansions: Vec<ItemRef>,
    /// Games this item expands
    pub expands: Vec<ItemRef>,
    /// Rating statistics
    pub stats: GameStats,
    /// Positions in every ranking list
    pub ranks: Vec<Rank>,
}

impl Game {
    /// Build a game from a `/thing` response.
    ///
    /// Returns `None` when the document holds no item (unknown id).
    pub fn from_document(root: &XmlElement) -> Result<Option<Self>> {
        root.child("item").map(Self::from_item).transpose()
    }

    /// Build a game from one `<item>` element
    pub fn from_item(item: &XmlElement) -> Result<Self> {
        let id = required_id(item, "id")?;
        let item_type = item.attr("type").unwrap_or_default();
        if item_type != "boardgame" && item_type != "boardgameexpansion" {
            return Err(Error::invalid_request(format!(
                "item {id} is not a board game (type: {item_type})"
            )));
        }

        let links = |kind: &str| -> Vec<String> {
            item.descendants_where("link", "type", kind)
                .into_iter()
                .filter_map(|link| attr_string(link, "value"))
                .collect()
        };

        let mut expansions = Vec::new();
        let mut expands = Vec::new();
        for link in item.descendants_where("link", "type", "boardgameexpansion") {
            let (Some(id), Some(name)) = (link.attr_parse("id"), attr_string(link, "value")) else {
                continue;
            };
            let inbound = link
                .attr("inbound")
                .is_some_and(|v| v.to_ascii_lowercase().starts_with('t'));
            if inbound {
                expands.push(ItemRef { id, name });
            } else {
                expansions.push(ItemRef { id, name });
            }
        }

        let names = |kind: &str| -> Vec<String> {
            item.descendants_where("name", "type", kind)
                .into_iter()
                .filter_map(|name| attr_string(name, "value"))
                .collect()
        };

        let ranks = item
            .descendants("rank")
            .into_iter()
            .map(|rank| Rank {
                name: attr_string(rank, "name"),
                friendly_name: attr_string(rank, "friendlyname"),
                value: rank.attr_parse("value"),
            })
            .collect();

        Ok(Self {
            id,
            name: names("primary").into_iter().next(),
            alternative_names: names("alternate"),
            expansion: item_type == "boardgameexpansion",
            thumbnail: text_string(item, "thumbnail"),
            image: text_string(item, "image"),
            description: text_string(item, "description").map(|d| unescape_html(&d)),
            year_published: signed_year(item.child_value_parse("yearpublished")),
            min_players: item.child_value_parse("minplayers"),
            max_players: item.child_value_parse("maxplayers"),
            playing_time: item.child_value_parse("playingtime"),
            min_age: item.child_value_parse("minage"),
            families: links("boardgamefamily"),
            categories: links("boardgamecategory"),
            implementations: links("boardgameimplementation"),
            mechanics: links("boardgamemechanic"),
            designers: links("boardgamedesigner"),
            artists: links("boardgameartist"),
            publishers: links("boardgamepublisher"),
            expansions,
            expands,
            stats: item
                .find("ratings")
                .map(GameStats::from_ratings)
                .unwrap_or_default(),
            ranks,
        })
    }

    /// Rank in the overall board game list
    pub fn boardgame_rank(&self) -> Option<u64> {
        self.ranks
            .iter()
            .find(|rank| rank.name.as_deref() == Some("boardgame"))
            .and_then(|rank| rank.value)
    }

    /// Primary name, or an empty string
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}
