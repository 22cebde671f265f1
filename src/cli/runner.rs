//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, PlaysArgs};
use crate::client::BoardGameGeek;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::models::PlaysSubject;
use crate::types::ProgressFn;
use serde::Serialize;
use tracing::debug;

/// Process exit code when the requested resource does not exist
pub const EXIT_NOT_FOUND: i32 = 2;

/// What a command produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A record was printed
    Found,
    /// The resource does not exist
    NotFound,
}

impl Outcome {
    /// Process exit code for this outcome
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Found => 0,
            Outcome::NotFound => EXIT_NOT_FOUND,
        }
    }
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<Outcome> {
        let config = self.client_config()?;
        debug!(endpoint = %config.endpoint(), cache = ?config.cache, "Client configured");
        let bgg = BoardGameGeek::with_config(&config)?;
        let progress: &ProgressFn = &report_progress;

        match &self.cli.command {
            Commands::Game { lookup, choose } => {
                print_record(bgg.game(lookup.clone(), *choose).await?)
            }
            Commands::Games { name } => print_list(&bgg.games(name).await?),
            Commands::Search {
                query,
                types,
                exact,
            } => print_list(&bgg.search(query, types, *exact).await?),
            Commands::User { name } => print_record(bgg.user(name, Some(progress)).await?),
            Commands::Guild { id } => print_record(bgg.guild(*id, Some(progress)).await?),
            Commands::Plays(args) => {
                let subject = plays_subject(args)?;
                print_record(
                    bgg.plays(subject, args.min_date, args.max_date, Some(progress))
                        .await?,
                )
            }
            Commands::Collection { user, filters } => {
                print_record(bgg.collection(user, filters.iter().cloned()).await?)
            }
            Commands::Hot { item_type } => print_record(bgg.hot_items(*item_type).await?),
        }
    }

    /// Config file (or defaults) with command line overrides applied
    fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match self.cli.config {
            Some(ref path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        };

        if self.cli.no_cache {
            config.cache = None;
        } else if let Some(ref cache) = self.cli.cache {
            config.cache = Some(cache.clone());
        }
        if let Some(rpm) = self.cli.rpm {
            config.requests_per_minute = rpm;
        }
        if let Some(timeout) = self.cli.timeout {
            config.timeout_seconds = timeout;
        }
        if let Some(retries) = self.cli.retries {
            config.retries = retries;
        }
        if let Some(delay) = self.cli.retry_delay {
            config.retry_delay_seconds = delay;
        }

        config.validate()?;
        Ok(config)
    }
}

fn plays_subject(args: &PlaysArgs) -> Result<PlaysSubject> {
    match (&args.user, args.game) {
        (Some(user), None) => Ok(PlaysSubject::User(user.clone())),
        (None, Some(game)) => Ok(PlaysSubject::Game(game)),
        _ => Err(Error::invalid_request("specify exactly one of --user or --game")),
    }
}

fn report_progress(current: u64, total: u64) {
    eprintln!("Fetched {current} of {total}");
}

fn print_record<T: Serialize>(record: Option<T>) -> Result<Outcome> {
    match record {
        Some(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(Outcome::Found)
        }
        None => {
            eprintln!("Not found");
            Ok(Outcome::NotFound)
        }
    }
}

fn print_list<T: Serialize>(records: &[T]) -> Result<Outcome> {
    if records.is_empty() {
        eprintln!("Nothing found");
        return Ok(Outcome::NotFound);
    }
    println!("{}", serde_json::to_string_pretty(records)?);
    Ok(Outcome::Found)
}
