//! User records (`/user`)

use super::fields::{attr_string, date, value_string};
use super::game::ItemRef;
use crate::decode::XmlElement;
use crate::error::Result;
use crate::pagination::PageConsumer;
use chrono::NaiveDate;
use serde::Serialize;

/// A user profile with buddies, guilds and favourite items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct User {
    /// User id
    pub id: u64,
    /// User name
    pub name: String,
    /// First name
    pub first_name: Option<String>,
    /// Last name
    pub last_name: Option<String>,
    /// Avatar image URL
    pub avatar_link: Option<String>,
    /// Year of registration
    pub year_registered: Option<u32>,
    /// Date of last login
    pub last_login: Option<NaiveDate>,
    /// State or province
    pub state_or_province: Option<String>,
    /// Country
    pub country: Option<String>,
    /// Personal website
    pub web_address: Option<String>,
    /// Xbox account
    pub xbox_account: Option<String>,
    /// Wii account
    pub wii_account: Option<String>,
    /// PlayStation Network account
    pub psn_account: Option<String>,
    /// Steam account
    pub steam_account: Option<String>,
    /// Trade rating
    pub trade_rating: Option<i64>,
    /// Buddies across every page
    pub buddies: Vec<ItemRef>,
    /// Guild memberships across every page
    pub guilds: Vec<ItemRef>,
    /// Top items list
    pub top_items: Vec<ItemRef>,
    /// Hot items list
    pub hot_items: Vec<ItemRef>,
}

impl User {
    /// Build the profile from the first page.
    ///
    /// Unknown users come back as a document with an empty `id`, which
    /// yields `None`.
    pub fn from_header(root: &XmlElement) -> Option<Self> {
        let id = root.attr_parse("id")?;
        let name = attr_string(root, "name")?;

        Some(Self {
            id,
            name,
            first_name: value_string(root, "firstname"),
            last_name: value_string(root, "lastname"),
            avatar_link: value_string(root, "avatarlink"),
            year_registered: root.child_value_parse("yearregistered"),
            last_login: date(root.child_value("lastlogin")),
            state_or_province: value_string(root, "stateorprovince"),
            country: value_string(root, "country"),
            web_address: value_string(root, "webaddress"),
            xbox_account: value_string(root, "xboxaccount"),
            wii_account: value_string(root, "wiiaccount"),
            psn_account: value_string(root, "psnaccount"),
            steam_account: value_string(root, "steamaccount"),
            trade_rating: root.child_value_parse("traderating"),
            buddies: Vec::new(),
            guilds: Vec::new(),
            top_items: item_refs(root, "top"),
            hot_items: item_refs(root, "hot"),
        })
    }

    /// Number of buddies fetched
    pub fn total_buddies(&self) -> usize {
        self.buddies.len()
    }

    /// Number of guilds fetched
    pub fn total_guilds(&self) -> usize {
        self.guilds.len()
    }
}

fn item_refs(root: &XmlElement, list: &str) -> Vec<ItemRef> {
    root.child(list)
        .map(|list| list.children_named("item").filter_map(item_ref).collect())
        .unwrap_or_default()
}

fn item_ref(element: &XmlElement) -> Option<ItemRef> {
    Some(ItemRef {
        id: element.attr_parse("id")?,
        name: attr_string(element, "name")?,
    })
}

/// Collects a user across buddy and guild pages.
///
/// Both lists page together, so progress follows the longer one: the
/// expected total is the larger announced total, and a page counts the
/// growth of the larger list.
#[derive(Debug, Default)]
pub struct UserPages {
    user: Option<User>,
}

impl UserPages {
    /// Start collecting a user
    pub fn new() -> Self {
        Self::default()
    }

    /// The collected user, `None` if the user does not exist
    pub fn finish(self) -> Option<User> {
        self.user
    }
}

impl PageConsumer for UserPages {
    fn expected_total(&self, page: &XmlElement) -> Option<u64> {
        let total = |list: &str| -> u64 {
            page.child(list)
                .and_then(|l| l.attr_parse("total"))
                .unwrap_or(0)
        };
        Some(total("buddies").max(total("guilds")))
    }

    fn consume(&mut self, page: &XmlElement) -> Result<u64> {
        if self.user.is_none() {
            self.user = User::from_header(page);
        }
        let Some(user) = self.user.as_mut() else {
            return Ok(0);
        };

        let longest = |user: &User| user.buddies.len().max(user.guilds.len());
        let before = longest(user);
        user.buddies
            .extend(page.descendants("buddy").into_iter().filter_map(item_ref));
        user.guilds
            .extend(page.descendants("guild").into_iter().filter_map(item_ref));
        Ok(longest(user).saturating_sub(before) as u64)
    }
}
