//! Per-resource operations of the XML API

use super::types::GameLookup;
use crate::config::ClientConfig;
use crate::error::{missing_as_none, Error, Result};
use crate::http::{HttpClient, RequestDescriptor};
use crate::models::{
    Collection, Game, Guild, GuildPages, HotItems, Plays, PlaysPages, PlaysSubject, SearchResult,
    User, UserPages,
};
use crate::pagination::{Aggregator, AggregationSummary, PageConsumer};
use crate::types::{ChooseStrategy, HotItemType, ProgressFn, SearchType};
use chrono::NaiveDate;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

/// Concurrent record fetches when resolving several search matches
const LOOKUP_CONCURRENCY: usize = 4;

/// Client for the BoardGameGeek XML API 2.
///
/// All operations share one transport, so they share its cache and its
/// request budget.
#[derive(Debug)]
pub struct BoardGameGeek {
    http: HttpClient,
}

impl BoardGameGeek {
    /// Create a client with the default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(&ClientConfig::default())
    }

    /// Create a client from a configuration
    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::with_config(config.http_config()?)?;
        Ok(Self { http })
    }

    /// Wrap an already configured transport
    pub fn with_http_client(http: HttpClient) -> Self {
        Self { http }
    }

    /// The underlying transport
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    // ========================================================================
    // Paginated Resources
    // ========================================================================

    /// Fetch a guild and all of its members
    #[tracing::instrument(skip(self, progress))]
    pub async fn guild(&self, id: u64, progress: Option<&ProgressFn>) -> Result<Option<Guild>> {
        let request = self.http.request("guild").param("id", id).param("members", 1);
        let mut pages = GuildPages::new(id);
        if self.aggregate(&request, &mut pages, progress).await?.is_none() {
            return Ok(None);
        }
        Ok(pages.finish())
    }

    /// Fetch a user with all buddies and guilds
    #[tracing::instrument(skip(self, progress))]
    pub async fn user(&self, name: &str, progress: Option<&ProgressFn>) -> Result<Option<User>> {
        if name.trim().is_empty() {
            return Err(Error::invalid_request("no user name specified"));
        }

        let request = self
            .http
            .request("user")
            .param("name", name)
            .param("buddies", 1)
            .param("guilds", 1)
            .param("hot", 1)
            .param("top", 1);
        let mut pages = UserPages::new();
        if self.aggregate(&request, &mut pages, progress).await?.is_none() {
            return Ok(None);
        }
        Ok(pages.finish())
    }

    /// Fetch every play of a user or a game, optionally within a date range
    #[tracing::instrument(skip(self, progress))]
    pub async fn plays(
        &self,
        subject: PlaysSubject,
        min_date: Option<NaiveDate>,
        max_date: Option<NaiveDate>,
        progress: Option<&ProgressFn>,
    ) -> Result<Option<Plays>> {
        let mut request = match &subject {
            PlaysSubject::User(name) if name.trim().is_empty() => {
                return Err(Error::invalid_request("no user name specified"));
            }
            PlaysSubject::User(name) => self.http.request("plays").param("username", name),
            PlaysSubject::Game(id) => self.http.request("plays").param("id", id),
        };
        if let Some(date) = min_date {
            request = request.param("mindate", date.format("%Y-%m-%d"));
        }
        if let Some(date) = max_date {
            request = request.param("maxdate", date.format("%Y-%m-%d"));
        }

        let mut pages = PlaysPages::new(subject);
        if self.aggregate(&request, &mut pages, progress).await?.is_none() {
            return Ok(None);
        }
        Ok(pages.finish())
    }

    /// Run an aggregation, mapping a missing first page to `None`
    async fn aggregate<C: PageConsumer>(
        &self,
        request: &RequestDescriptor,
        consumer: &mut C,
        progress: Option<&ProgressFn>,
    ) -> Result<Option<AggregationSummary>> {
        let aggregator = Aggregator::new(&self.http).with_progress(progress);
        let summary = missing_as_none(aggregator.aggregate(request, consumer).await)?;
        if let Some(ref summary) = summary {
            debug!(
                accumulated = summary.accumulated,
                expected = summary.expected_total,
                termination = ?summary.termination,
                "Aggregation finished"
            );
        }
        Ok(summary)
    }

    // ========================================================================
    // Single-page Resources
    // ========================================================================

    /// Fetch the current hot list of one item type
    pub async fn hot_items(&self, item_type: HotItemType) -> Result<Option<HotItems>> {
        let request = self.http.request("hot").param("type", item_type);
        match missing_as_none(self.http.fetch(&request).await)? {
            Some(root) => HotItems::from_document(item_type, &root).map(Some),
            None => Ok(None),
        }
    }

    /// Fetch a user's board game collection.
    ///
    /// `params` are passed through as extra query parameters (e.g. `own=1`).
    pub async fn collection<I, K, V>(&self, user: &str, params: I) -> Result<Option<Collection>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        if user.trim().is_empty() {
            return Err(Error::invalid_request("no user name specified"));
        }

        let request = self
            .http
            .request("collection")
            .param("username", user)
            .param("stats", 1)
            .params(params);
        match missing_as_none(self.http.fetch(&request).await)? {
            Some(root) => Collection::from_document(user, &root),
            None => Ok(None),
        }
    }

    /// Search items by name; no `types` means board games only
    pub async fn search(
        &self,
        query: &str,
        types: &[SearchType],
        exact: bool,
    ) -> Result<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Err(Error::invalid_request("invalid query string"));
        }

        let types = if types.is_empty() {
            SearchType::join(&[SearchType::BoardGame])
        } else {
            SearchType::join(types)
        };
        let mut request = self
            .http
            .request("search")
            .param("query", query)
            .param("type", types);
        if exact {
            request = request.param("exact", 1);
        }

        match missing_as_none(self.http.fetch(&request).await)? {
            Some(root) => SearchResult::from_document(&root),
            None => Ok(Vec::new()),
        }
    }

    // ========================================================================
    // Games
    // ========================================================================

    /// Resolve a game name to an id, choosing among exact matches
    #[tracing::instrument(skip(self))]
    pub async fn game_id(&self, name: &str, choose: ChooseStrategy) -> Result<Option<u64>> {
        let matches = self.search(name, &[SearchType::BoardGame], true).await?;
        if matches.is_empty() {
            return Ok(None);
        }

        let id = match choose {
            ChooseStrategy::First => Some(matches[0].id),
            ChooseStrategy::Recent => matches
                .iter()
                .enumerate()
                // Latest year wins, earlier result breaks ties
                .max_by_key(|(index, m)| {
                    (
                        m.year_published.unwrap_or(i64::MIN),
                        std::cmp::Reverse(*index),
                    )
                })
                .map(|(_, m)| m.id),
            ChooseStrategy::BestRank => self.best_ranked(&matches).await?,
        };
        Ok(id)
    }

    /// Fetch every match and pick the best overall rank; unranked games lose
    async fn best_ranked(&self, matches: &[SearchResult]) -> Result<Option<u64>> {
        let games: Vec<(usize, Option<Game>)> = stream::iter(matches.iter().enumerate())
            .map(|(index, m)| async move { Ok::<_, Error>((index, self.game_by_id(m.id).await?)) })
            .buffer_unordered(LOOKUP_CONCURRENCY)
            .try_collect()
            .await?;

        Ok(games
            .into_iter()
            .filter_map(|(index, game)| game.map(|g| (index, g)))
            .min_by_key(|(index, game)| (game.boardgame_rank().unwrap_or(u64::MAX), *index))
            .map(|(_, game)| game.id))
    }

    /// Fetch a game by id or by name
    #[tracing::instrument(skip(self))]
    pub async fn game(&self, lookup: GameLookup, choose: ChooseStrategy) -> Result<Option<Game>> {
        let id = match lookup {
            GameLookup::Id(id) => id,
            GameLookup::Name(ref name) => {
                if name.trim().is_empty() {
                    return Err(Error::invalid_request("game name or id not specified"));
                }
                match self.game_id(name, choose).await? {
                    Some(id) => id,
                    None => {
                        info!(name = %name, "No game found with this name");
                        return Ok(None);
                    }
                }
            }
        };
        self.game_by_id(id).await
    }

    /// Fetch every board game or expansion named exactly `name`
    #[tracing::instrument(skip(self))]
    pub async fn games(&self, name: &str) -> Result<Vec<Game>> {
        let matches = self
            .search(
                name,
                &[SearchType::BoardGame, SearchType::BoardGameExpansion],
                true,
            )
            .await?;

        let games: Vec<Option<Game>> = stream::iter(matches.iter())
            .map(|m| self.game_by_id(m.id))
            .buffered(LOOKUP_CONCURRENCY)
            .try_collect()
            .await?;
        Ok(games.into_iter().flatten().collect())
    }

    async fn game_by_id(&self, id: u64) -> Result<Option<Game>> {
        debug!(id, "Retrieving game");
        let request = self.http.request("thing").param("id", id).param("stats", 1);
        match missing_as_none(self.http.fetch(&request).await)? {
            Some(root) => Game::from_document(&root),
            None => Ok(None),
        }
    }
}
