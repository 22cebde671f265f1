//! Guild records (`/guild`)

use super::fields::{attr_string, text_string, unescape_html};
use crate::decode::XmlElement;
use crate::error::Result;
use crate::pagination::PageConsumer;
use serde::Serialize;

/// Postal location of a guild
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Location {
    pub addr1: Option<String>,
    pub addr2: Option<String>,
    /// City
    pub city: Option<String>,
    /// State or province
    pub state_or_province: Option<String>,
    /// Postal code
    pub postal_code: Option<String>,
    /// Country
    pub country: Option<String>,
}

/// A guild and its member names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Guild {
    /// Guild id
    pub id: u64,
    /// Guild name
    pub name: String,
    /// Creation date as reported
    pub created: Option<String>,
    /// Guild category, e.g. `interest` or `group`
    pub category: Option<String>,
    /// Guild website
    pub website: Option<String>,
    /// Name of the managing user
    pub manager: Option<String>,
    /// Description with HTML entities decoded
    pub description: Option<String>,
    /// Postal location, when the guild has one
    pub location: Option<Location>,
    /// Member user names across every page
    pub members: Vec<String>,
}

impl Guild {
    /// Build the guild header from the first page.
    ///
    /// Returns `None` when the response has no guild name (unknown id).
    pub fn from_header(id: u64, root: &XmlElement) -> Option<Self> {
        let name = attr_string(root, "name")?;
        let location = root.child("location").map(|location| Location {
            addr1: text_string(location, "addr1"),
            addr2: text_string(location, "addr2"),
            city: text_string(location, "city"),
            state_or_province: text_string(location, "stateorprovince"),
            postal_code: text_string(location, "postalcode"),
            country: text_string(location, "country"),
        });

        Some(Self {
            id,
            name,
            created: attr_string(root, "created"),
            category: text_string(root, "category"),
            website: text_string(root, "website"),
            manager: text_string(root, "manager"),
            description: text_string(root, "description").map(|d| unescape_html(&d)),
            location,
            members: Vec::new(),
        })
    }

    /// Number of members fetched
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

/// Collects a guild across member pages
#[derive(Debug)]
pub struct GuildPages {
    id: u64,
    guild: Option<Guild>,
}

impl GuildPages {
    /// Start collecting the guild with the given id
    pub fn new(id: u64) -> Self {
        Self { id, guild: None }
    }

    /// The collected guild, `None` if the first page named no guild
    pub fn finish(self) -> Option<Guild> {
        self.guild
    }
}

impl PageConsumer for GuildPages {
    fn expected_total(&self, page: &XmlElement) -> Option<u64> {
        page.find("members").and_then(|m| m.attr_parse("count"))
    }

    fn consume(&mut self, page: &XmlElement) -> Result<u64> {
        if self.guild.is_none() {
            self.guild = Guild::from_header(self.id, page);
        }
        let Some(guild) = self.guild.as_mut() else {
            return Ok(0);
        };

        let before = guild.members.len();
        guild.members.extend(
            page.descendants("member")
                .into_iter()
                .filter_map(|member| attr_string(member, "name")),
        );
        Ok((guild.members.len() - before) as u64)
    }
}
