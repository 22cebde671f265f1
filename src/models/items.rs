//! Single-page item lists: hot items, search results and collections

use super::fields::{attr_string, flag, required_id, signed_year, text_string, value_string};
use crate::decode::XmlElement;
use crate::error::Result;
use crate::types::HotItemType;
use serde::Serialize;

// ============================================================================
// Hot Items
// ============================================================================

/// One entry of a hot list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HotItem {
    /// Item id
    pub id: u64,
    /// Position on the hot list, starting at 1
    pub rank: u32,
    /// Item name
    pub name: Option<String>,
    /// Publication year
    pub year_published: Option<i64>,
    /// Thumbnail image URL
    pub thumbnail: Option<String>,
}

/// Currently trending items of one kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HotItems {
    /// Item type the list was requested for
    pub item_type: HotItemType,
    /// Items in rank order
    pub items: Vec<HotItem>,
}

impl HotItems {
    /// Build the list from a `/hot` response
    pub fn from_document(item_type: HotItemType, root: &XmlElement) -> Result<Self> {
        let items = root
            .children_named("item")
            .map(|item| {
                Ok(HotItem {
                    id: required_id(item, "id")?,
                    rank: item.attr_parse("rank").unwrap_or_default(),
                    name: value_string(item, "name"),
                    year_published: signed_year(item.child_value_parse("yearpublished")),
                    thumbnail: value_string(item, "thumbnail"),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { item_type, items })
    }
}

// ============================================================================
// Search Results
// ============================================================================

/// One match of a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// Item id
    pub id: u64,
    /// Primary name
    pub name: Option<String>,
    /// Publication year
    pub year_published: Option<i64>,
    /// Item type as reported, e.g. `boardgame`
    #[serde(rename = "type")]
    pub item_type: Option<String>,
}

impl SearchResult {
    /// Parse every `<item>` of a `/search` response
    pub fn from_document(root: &XmlElement) -> Result<Vec<Self>> {
        root.children_named("item")
            .map(|item| {
                Ok(Self {
                    id: required_id(item, "id")?,
                    name: value_string(item, "name"),
                    year_published: signed_year(item.child_value_parse("yearpublished")),
                    item_type: attr_string(item, "type"),
                })
            })
            .collect()
    }
}

// ============================================================================
// Collections
// ============================================================================

/// Ownership and wish flags of a collection entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionStatus {
    /// Currently owned
    pub own: bool,
    /// Previously owned
    pub prev_owned: bool,
    /// Preordered
    pub preordered: bool,
    /// Offered for trade
    pub for_trade: bool,
    /// Wanted in trade
    pub want: bool,
    /// Wanted to play
    pub want_to_play: bool,
    /// Wanted to buy
    pub want_to_buy: bool,
    /// On the wishlist
    pub wishlist: bool,
    /// Wishlist priority, 1 (must have) to 5
    pub wishlist_priority: Option<u8>,
    /// Last modification timestamp as reported
    pub last_modified: Option<String>,
}

impl CollectionStatus {
    fn from_element(status: &XmlElement) -> Self {
        Self {
            own: flag(status, "own"),
            prev_owned: flag(status, "prevowned"),
            preordered: flag(status, "preordered"),
            for_trade: flag(status, "fortrade"),
            want: flag(status, "want"),
            want_to_play: flag(status, "wanttoplay"),
            want_to_buy: flag(status, "wanttobuy"),
            wishlist: flag(status, "wishlist"),
            wishlist_priority: status.attr_parse("wishlistpriority"),
            last_modified: attr_string(status, "lastmodified"),
        }
    }
}

/// One board game in a collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionItem {
    /// Item id
    pub id: u64,
    /// Item name
    pub name: Option<String>,
    /// The owner's rating, `None` when unrated
    pub rating: Option<f64>,
    /// Number of logged plays
    pub num_plays: Option<u32>,
    /// Collection flags
    pub status: CollectionStatus,
}

/// A user's board game collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collection {
    /// User name owning the collection
    pub owner: String,
    /// Board game entries
    pub items: Vec<CollectionItem>,
}

impl Collection {
    /// Build a collection from a `/collection` response.
    ///
    /// The API reports unknown users inside an `<error>` element, which
    /// yields `None`.
    pub fn from_document(owner: &str, root: &XmlElement) -> Result<Option<Self>> {
        if root.name == "error" || root.find("error").is_some() {
            let message = root
                .find("message")
                .map(|m| m.text.trim().to_string())
                .unwrap_or_default();
            tracing::warn!(owner, message = %message, "Collection request rejected");
            return Ok(None);
        }

        let items = root
            .descendants_where("item", "subtype", "boardgame")
            .into_iter()
            .map(|item| {
                Ok(CollectionItem {
                    id: required_id(item, "objectid")?,
                    name: text_string(item, "name"),
                    rating: item
                        .child("stats")
                        .and_then(|stats| stats.child_value_parse("rating")),
                    num_plays: item
                        .child_text("numplays")
                        .and_then(|n| n.parse().ok()),
                    status: item
                        .child("status")
                        .map(CollectionStatus::from_element)
                        .unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(Self {
            owner: owner.to_string(),
            items,
        }))
    }

    /// Number of games in the collection
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
