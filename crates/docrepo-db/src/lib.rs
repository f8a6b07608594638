//! # docrepo-db
//!
//! Typed repositories over MongoDB collections.
//!
//! [`DocDb`] owns the driver client and hands out [`Repository`] values bound
//! to one collection each. Repositories forward every call to the driver and
//! add a uniform not-found convention on top; filters and updates are driver
//! documents passed through verbatim.
//!
//! ```no_run
//! use docrepo_config::DocRepoConfig;
//! use docrepo_db::{DocDb, QueryOptions, RepositoryOptions};
//! use mongodb::bson::doc;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct User {
//!     name: String,
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DocRepoConfig::load_with_dotenv()?;
//! let db = DocDb::connect(&config.mongo).await?;
//! let users = db.repository::<User>("users", RepositoryOptions::default());
//!
//! let created = users
//!     .create(&User { name: "ada".into() }, &mut QueryOptions::new())
//!     .await?;
//! let found = users
//!     .find_one_or_fail(doc! { "_id": created.get_object_id("_id")? }, &mut QueryOptions::new())
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod options;
pub mod projection;
pub mod repository;

pub use error::{DatabaseError, RepositoryError};
pub use options::{Constructor, Pagination, QueryOptions, RepositoryOptions};
pub use projection::expand_projection;
pub use repository::Repository;

use docrepo_config::MongoConfig;
use mongodb::bson::{Document, doc};
use mongodb::options::ClientOptions;
use mongodb::{Client, ClientSession, Database};
use tracing::info;

/// Handshake application name used when neither config nor URI names one.
pub const DEFAULT_APP_NAME: &str = "docrepo";

/// Connection handle shared by every repository of one database.
///
/// Cloning is cheap; clones share the driver's connection pool.
#[derive(Debug, Clone)]
pub struct DocDb {
    client: Client,
    database: Database,
}

impl DocDb {
    /// Open a client from configuration and select the configured database.
    ///
    /// Connection is lazy: the first operation performs server selection.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotConfigured` if the section is incomplete or
    /// invalid, or `DatabaseError::Driver` if the URI cannot be parsed.
    pub async fn connect(config: &MongoConfig) -> Result<Self, DatabaseError> {
        let config = config.require()?;
        let options = client_options(config).await?;
        let app_name = options.app_name.clone().unwrap_or_default();
        let client = Client::with_options(options)?;
        info!(database = %config.database, %app_name, "opened MongoDB client");
        Ok(Self::from_client(client, &config.database))
    }

    /// Wrap an existing client.
    #[must_use]
    pub fn from_client(client: Client, database: &str) -> Self {
        let database = client.database(database);
        Self { client, database }
    }

    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    #[must_use]
    pub const fn database(&self) -> &Database {
        &self.database
    }

    /// Bind a repository to `collection` in this database.
    #[must_use]
    pub fn repository<T>(&self, collection: &str, options: RepositoryOptions<T>) -> Repository<T> {
        Repository::new(self.database.collection::<Document>(collection), options)
    }

    /// Start a session owned by the caller.
    ///
    /// Pass it to repository calls through [`QueryOptions::session`]; the
    /// caller starts, commits or aborts any transaction on it.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Driver` if the server does not support sessions.
    pub async fn start_session(&self) -> Result<ClientSession, DatabaseError> {
        Ok(self.client.start_session().await?)
    }

    /// Round-trip a `ping` command to check connectivity.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Driver` if no server is reachable.
    pub async fn ping(&self) -> Result<(), DatabaseError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

/// Driver options for `config`: parsed URI plus the configured overrides.
///
/// Settings left unset in `config` keep the value parsed from the URI.
/// # Errors
///
/// Returns `DatabaseError::Driver` if the URI cannot be parsed.
pub async fn client_options(config: &MongoConfig) -> Result<ClientOptions, DatabaseError> {
    let mut options = ClientOptions::parse(config.uri.as_str()).await?;
    if let Some(name) = &config.app_name {
        options.app_name = Some(name.clone());
    }
    if options.app_name.is_none() {
        options.app_name = Some(DEFAULT_APP_NAME.to_owned());
    }
    if let Some(timeout) = config.connect_timeout() {
        options.connect_timeout = Some(timeout);
    }
    if let Some(timeout) = config.server_selection_timeout() {
        options.server_selection_timeout = Some(timeout);
    }
    if let Some(min) = config.min_pool_size {
        options.min_pool_size = Some(min);
    }
    if let Some(max) = config.max_pool_size {
        options.max_pool_size = Some(max);
    }
    Ok(options)
}
