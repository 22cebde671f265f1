//! Play logs (`/plays`)

use super::fields::{attr_string, date, flag, required_id, text_string};
use crate::decode::XmlElement;
use crate::error::Result;
use crate::pagination::PageConsumer;
use chrono::NaiveDate;
use serde::Serialize;

/// Whose plays to list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaysSubject {
    /// Plays logged by a user
    User(String),
    /// Plays of a game, across all users
    Game(u64),
}

/// One participant of a play
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Player {
    /// BGG user name, if the player has an account
    pub username: Option<String>,
    /// BGG user id, if the player has an account
    pub user_id: Option<u64>,
    /// Display name
    pub name: Option<String>,
    /// Start position as entered
    pub start_position: Option<String>,
    /// First play of the game for this player
    pub new: bool,
    /// Won the play
    pub win: bool,
    /// Rating as entered
    pub rating: Option<String>,
    /// Score as entered
    pub score: Option<String>,
}

impl Player {
    fn from_element(player: &XmlElement) -> Self {
        Self {
            username: attr_string(player, "username"),
            // Anonymous players carry userid="0"
            user_id: player.attr_parse("userid").filter(|id| *id != 0),
            name: attr_string(player, "name"),
            start_position: attr_string(player, "startposition"),
            new: flag(player, "new"),
            win: flag(player, "win"),
            rating: attr_string(player, "rating"),
            score: attr_string(player, "score"),
        }
    }
}

/// One logged play
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Play {
    /// Play id
    pub id: u64,
    /// User who logged the play
    pub user_id: Option<u64>,
    /// Date of the play
    pub date: Option<NaiveDate>,
    /// Number of plays this entry stands for
    pub quantity: u32,
    /// Duration in minutes
    pub duration: u32,
    /// Play was not finished
    pub incomplete: bool,
    /// Excluded from win statistics
    pub no_win_stats: bool,
    /// Where the game was played
    pub location: Option<String>,
    /// Id of the game played
    pub game_id: Option<u64>,
    /// Name of the game played
    pub game_name: Option<String>,
    /// Free-text comment
    pub comment: Option<String>,
    /// Participants
    pub players: Vec<Player>,
}

impl Play {
    fn from_element(play: &XmlElement, default_user: Option<u64>) -> Result<Self> {
        let item = play.child("item");
        Ok(Self {
            id: required_id(play, "id")?,
            user_id: play.attr_parse("userid").or(default_user),
            date: date(play.attr("date")),
            quantity: play.attr_parse("quantity").unwrap_or(1),
            duration: play.attr_parse("length").unwrap_or(0),
            incomplete: flag(play, "incomplete"),
            no_win_stats: flag(play, "nowinstats"),
            location: attr_string(play, "location"),
            game_id: item.and_then(|i| i.attr_parse("objectid")),
            game_name: item.and_then(|i| attr_string(i, "name")),
            comment: text_string(play, "comments"),
            players: play
                .descendants("player")
                .into_iter()
                .map(Player::from_element)
                .collect(),
        })
    }
}

/// All plays of a user or a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plays {
    /// Whose plays these are
    pub subject: PlaysSubject,
    /// Numeric id of the user, when listing a user's plays
    pub user_id: Option<u64>,
    /// Plays across every page
    pub plays: Vec<Play>,
}

impl Plays {
    /// Number of plays fetched
    pub fn len(&self) -> usize {
        self.plays.len()
    }

    /// Check if no plays were fetched
    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }
}

/// Collects plays across pages
#[derive(Debug)]
pub struct PlaysPages {
    subject: PlaysSubject,
    plays: Option<Plays>,
}

impl PlaysPages {
    /// Start collecting plays for `subject`
    pub fn new(subject: PlaysSubject) -> Self {
        Self {
            subject,
            plays: None,
        }
    }

    /// The collected plays.
    ///
    /// `None` when the first page carried no `total`, which is how the API
    /// answers an unknown user or game.
    pub fn finish(self) -> Option<Plays> {
        self.plays
    }
}

impl PageConsumer for PlaysPages {
    fn expected_total(&self, page: &XmlElement) -> Option<u64> {
        page.attr_parse("total")
    }

    fn consume(&mut self, page: &XmlElement) -> Result<u64> {
        if self.plays.is_none() {
            if page.attr_parse::<u64>("total").is_none() {
                return Ok(0);
            }
            self.plays = Some(Plays {
                subject: self.subject.clone(),
                user_id: page.attr_parse("userid"),
                plays: Vec::new(),
            });
        }
        let Some(plays) = self.plays.as_mut() else {
            return Ok(0);
        };

        let mut added = 0;
        for element in page.children_named("play") {
            plays.plays.push(Play::from_element(element, plays.user_id)?);
            added += 1;
        }
        Ok(added)
    }
}
