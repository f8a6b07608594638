//! Per-call and per-repository option types.

use std::fmt;

use mongodb::ClientSession;
use mongodb::bson::{self, Document};
use serde::de::DeserializeOwned;

/// Per-call read and session settings.
///
/// The session is borrowed from the caller. Repositories attach it to every
/// driver call they make while the options are in scope but never commit,
/// abort or end it.
#[derive(Default)]
pub struct QueryOptions<'s> {
    /// Fields to include in read results.
    pub project_columns: Vec<String>,
    /// Fields to exclude from read results. Applied after `project_columns`.
    pub skip_columns: Vec<String>,
    /// Caller-owned session to run the operation in.
    pub session: Option<&'s mut ClientSession>,
}

impl<'s> QueryOptions<'s> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn project<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.project_columns.extend(columns.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn skip<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_columns.extend(columns.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn session(mut self, session: &'s mut ClientSession) -> Self {
        self.session = Some(session);
        self
    }

    /// Reborrow the attached session, if any.
    pub fn session_mut(&mut self) -> Option<&mut ClientSession> {
        self.session.as_deref_mut()
    }

    #[must_use]
    pub const fn has_session(&self) -> bool {
        self.session.is_some()
    }
}

impl fmt::Debug for QueryOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryOptions")
            .field("project_columns", &self.project_columns)
            .field("skip_columns", &self.skip_columns)
            .field("session", &self.session.is_some())
            .finish()
    }
}

/// Limit/offset hints for `find`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    /// Maximum number of documents. The driver reads a negative limit as
    /// "one batch, then close the cursor", so constructors drop non-positive
    /// values and `find` ignores them.
    pub limit: Option<i64>,
    pub offset: Option<u64>,
}

impl Pagination {
    #[must_use]
    pub const fn new(limit: Option<i64>, offset: Option<u64>) -> Self {
        Self {
            limit: positive(limit),
            offset,
        }
    }

    /// First `limit` matches. A non-positive `limit` yields no limit.
    #[must_use]
    pub const fn first(limit: i64) -> Self {
        Self::new(Some(limit), None)
    }

    /// The limit to hand to the driver, if any.
    #[must_use]
    pub const fn effective_limit(&self) -> Option<i64> {
        positive(self.limit)
    }

    /// Zero-based page `page` of `size` documents.
    ///
    /// A non-positive `size` yields no limit and no offset.
    #[must_use]
    pub fn page(page: u64, size: i64) -> Self {
        match u64::try_from(size) {
            Ok(step) if step > 0 => Self {
                limit: Some(size),
                offset: Some(page.saturating_mul(step)),
            },
            _ => Self::default(),
        }
    }
}

const fn positive(limit: Option<i64>) -> Option<i64> {
    match limit {
        Some(limit) if limit > 0 => Some(limit),
        _ => None,
    }
}

/// Builds a typed document from a stored one.
pub type Constructor<T> = fn(Document) -> Result<T, bson::de::Error>;

/// Per-repository settings fixed at construction.
pub struct RepositoryOptions<T> {
    /// Constructor used to hydrate documents returned by `get_by_id`.
    pub base_class: Constructor<T>,
    /// Constructor producing authorization subjects, when it differs from `base_class`.
    pub casl_class: Option<Constructor<T>>,
    /// Name used in error messages. Defaults to the collection name.
    pub model_name: Option<String>,
}

impl<T: DeserializeOwned> Default for RepositoryOptions<T> {
    fn default() -> Self {
        Self {
            base_class: bson::from_document::<T>,
            casl_class: None,
            model_name: None,
        }
    }
}

impl<T> RepositoryOptions<T> {
    #[must_use]
    pub const fn new(base_class: Constructor<T>) -> Self {
        Self {
            base_class,
            casl_class: None,
            model_name: None,
        }
    }

    #[must_use]
    pub fn with_casl_class(mut self, casl_class: Constructor<T>) -> Self {
        self.casl_class = Some(casl_class);
        self
    }

    #[must_use]
    pub fn with_model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = Some(name.into());
        self
    }

    /// Build the hydrated shape of `document`.
    ///
    /// # Errors
    ///
    /// Propagates the constructor's deserialization error.
    pub fn construct(&self, document: Document) -> Result<T, bson::de::Error> {
        (self.base_class)(document)
    }

    /// Build the authorization subject for `document`, falling back to
    /// `base_class` when no `casl_class` is configured.
    ///
    /// # Errors
    ///
    /// Propagates the constructor's deserialization error.
    pub fn construct_authorized(&self, document: Document) -> Result<T, bson::de::Error> {
        self.casl_class.unwrap_or(self.base_class)(document)
    }
}

impl<T> Clone for RepositoryOptions<T> {
    fn clone(&self) -> Self {
        Self {
            base_class: self.base_class,
            casl_class: self.casl_class,
            model_name: self.model_name.clone(),
        }
    }
}

impl<T> fmt::Debug for RepositoryOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryOptions")
            .field("casl_class", &self.casl_class.is_some())
            .field("model_name", &self.model_name)
            .finish_non_exhaustive()
    }
}
