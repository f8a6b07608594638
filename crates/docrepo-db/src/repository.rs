//! Generic repository over one MongoDB collection.
//!
//! Every method is a single pass-through to the driver (two for the methods
//! that pre-check existence or re-read after a write). Reads return lean
//! `Document`s except `get_by_id`, which hydrates through the configured
//! constructor.

use anyhow::anyhow;
use futures::TryStreamExt;
use mongodb::Collection;
use mongodb::bson::{self, Bson, Document, doc, oid::ObjectId};
use mongodb::results::{DeleteResult, UpdateResult};
use serde::Serialize;
use tracing::debug;

use crate::error::RepositoryError;
use crate::options::{Pagination, QueryOptions, RepositoryOptions};
use crate::projection::expand_projection;

/// Await a driver action, attaching the session from `$options` when present.
macro_rules! run {
    ($action:expr, $options:expr) => {
        match $options.session_mut() {
            Some(session) => $action.session(session).await,
            None => $action.await,
        }
    };
}

/// CRUD access to one collection, hydrating documents into `T` on demand.
pub struct Repository<T> {
    collection: Collection<Document>,
    options: RepositoryOptions<T>,
    model_name: String,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            options: self.options.clone(),
            model_name: self.model_name.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Repository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("collection", &self.collection.name())
            .field("model_name", &self.model_name)
            .field("options", &self.options)
            .finish()
    }
}

impl<T> Repository<T> {
    /// Bind a repository to `collection`.
    #[must_use]
    pub fn new(collection: Collection<Document>, options: RepositoryOptions<T>) -> Self {
        let model_name = options
            .model_name
            .clone()
            .unwrap_or_else(|| collection.name().to_string());
        Self {
            collection,
            options,
            model_name,
        }
    }

    #[must_use]
    pub const fn collection(&self) -> &Collection<Document> {
        &self.collection
    }

    #[must_use]
    pub const fn options(&self) -> &RepositoryOptions<T> {
        &self.options
    }

    /// Name used in error messages.
    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Build the typed shape of a lean document.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Deserialize` if the constructor rejects it.
    pub fn hydrate(&self, document: Document) -> Result<T, RepositoryError> {
        Ok(self.options.construct(document)?)
    }

    /// Build the authorization subject for a lean document.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Deserialize` if the constructor rejects it.
    pub fn hydrate_authorized(&self, document: Document) -> Result<T, RepositoryError> {
        Ok(self.options.construct_authorized(document)?)
    }

    /// Insert `document`, then read it back by its assigned `_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Serialize` if `document` is not a BSON
    /// document, `RepositoryError::Driver` on insert failure (e.g. duplicate
    /// key), and `RepositoryError::NotFound` if the re-read comes back empty.
    pub async fn create(
        &self,
        document: &T,
        options: &mut QueryOptions<'_>,
    ) -> Result<Document, RepositoryError>
    where
        T: Serialize,
    {
        let document = bson::to_document(document)?;
        let inserted = run!(self.collection.insert_one(document), options)?;
        debug!(collection = %self.model_name, id = %inserted.inserted_id, "inserted document");

        let created = run!(
            self.collection.find_one(doc! { "_id": inserted.inserted_id }),
            options
        )?;
        created.ok_or_else(|| RepositoryError::NotFound(not_found_message(&self.model_name)))
    }

    /// Whether at least one document matches `filter`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Driver` if the count fails.
    pub async fn exists(
        &self,
        filter: Document,
        options: &mut QueryOptions<'_>,
    ) -> Result<bool, RepositoryError> {
        let count = run!(self.collection.count_documents(filter), options)?;
        debug!(collection = %self.model_name, count, "counted documents");
        Ok(count > 0)
    }

    /// Delete every document matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if nothing matches, or
    /// `RepositoryError::Driver` if the count or delete fails.
    pub async fn delete(
        &self,
        filter: Document,
        options: &mut QueryOptions<'_>,
    ) -> Result<DeleteResult, RepositoryError> {
        if !self.exists(filter.clone(), options).await? {
            return Err(RepositoryError::NotFound(not_found_message(&self.model_name)));
        }

        let result = run!(self.collection.delete_many(filter), options)?;
        debug!(collection = %self.model_name, deleted = result.deleted_count, "deleted documents");
        Ok(result)
    }

    /// All documents matching `filter` (pass an empty document for all),
    /// projected per `options` and paged per `pagination`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Driver` if the query or cursor fails.
    pub async fn find(
        &self,
        filter: Document,
        options: &mut QueryOptions<'_>,
        pagination: Option<&Pagination>,
    ) -> Result<Vec<Document>, RepositoryError> {
        let mut action = self.collection.find(filter);
        if let Some(projection) = expand_projection(options) {
            action = action.projection(projection);
        }
        if let Some(pagination) = pagination {
            if let Some(limit) = pagination.effective_limit() {
                action = action.limit(limit);
            }
            if let Some(offset) = pagination.offset {
                action = action.skip(offset);
            }
        }

        let documents = match options.session_mut() {
            Some(session) => {
                let mut cursor = action.session(&mut *session).await?;
                cursor.stream(session).try_collect::<Vec<_>>().await?
            }
            None => action.await?.try_collect::<Vec<_>>().await?,
        };
        debug!(collection = %self.model_name, count = documents.len(), "find");
        Ok(documents)
    }

    /// First document matching `filter`, projected per `options`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Driver` if the query fails. Absence is `Ok(None)`.
    pub async fn find_one(
        &self,
        filter: Document,
        options: &mut QueryOptions<'_>,
    ) -> Result<Option<Document>, RepositoryError> {
        let mut action = self.collection.find_one(filter);
        if let Some(projection) = expand_projection(options) {
            action = action.projection(projection);
        }
        let document = run!(action, options)?;
        debug!(collection = %self.model_name, found = document.is_some(), "find_one");
        Ok(document)
    }

    /// First document matching `filter`, unprojected.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` naming the filter if nothing
    /// matches, or `RepositoryError::Driver` if the query fails.
    pub async fn find_one_or_fail(
        &self,
        filter: Document,
        options: &mut QueryOptions<'_>,
    ) -> Result<Document, RepositoryError> {
        let document = run!(self.collection.find_one(filter.clone()), options)?;
        debug!(collection = %self.model_name, found = document.is_some(), "find_one_or_fail");
        document.ok_or_else(|| {
            RepositoryError::NotFound(filter_not_found_message(&self.model_name, &filter))
        })
    }

    /// Hydrated document with `_id` equal to `id`, projected per `options`.
    ///
    /// # Errors
    ///
    /// Absence is reported as `RepositoryError::Other`, not `NotFound`.
    /// Returns `RepositoryError::Deserialize` if hydration fails and
    /// `RepositoryError::Driver` if the query fails.
    pub async fn get_by_id(
        &self,
        id: ObjectId,
        options: &mut QueryOptions<'_>,
    ) -> Result<T, RepositoryError> {
        debug!(collection = %self.model_name, %id, "get_by_id");
        match self.find_one(doc! { "_id": id }, options).await? {
            Some(document) => self.hydrate(document),
            None => Err(anyhow!(
                "Document of type {} with ID {id} not found",
                self.model_name
            )
            .into()),
        }
    }

    /// Apply `update` to the first document matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if nothing matches, or
    /// `RepositoryError::Driver` if the count or update fails.
    pub async fn update(
        &self,
        filter: Document,
        update: Document,
        options: &mut QueryOptions<'_>,
    ) -> Result<UpdateResult, RepositoryError> {
        if !self.exists(filter.clone(), options).await? {
            return Err(RepositoryError::NotFound(not_found_message(&self.model_name)));
        }

        let result = run!(self.collection.update_one(filter, update), options)?;
        debug!(
            collection = %self.model_name,
            matched = result.matched_count,
            modified = result.modified_count,
            "updated document"
        );
        Ok(result)
    }

    /// [`Self::update`], then [`Self::find_one_or_fail`] with the same filter.
    ///
    /// If `update` rewrites a field the filter matches on, the re-read fails
    /// with `NotFound` even though the update was applied.
    ///
    /// # Errors
    ///
    /// Same as [`Self::update`] and [`Self::find_one_or_fail`].
    pub async fn update_and_get(
        &self,
        filter: Document,
        update: Document,
        options: &mut QueryOptions<'_>,
    ) -> Result<Document, RepositoryError> {
        self.update(filter.clone(), update, options).await?;
        self.find_one_or_fail(filter, options).await
    }

    /// Apply `update` to every document matching `filter`. Zero matches is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Driver` if the update fails.
    pub async fn update_many(
        &self,
        filter: Document,
        update: Document,
        options: &mut QueryOptions<'_>,
    ) -> Result<UpdateResult, RepositoryError> {
        let result = run!(self.collection.update_many(filter, update), options)?;
        debug!(
            collection = %self.model_name,
            matched = result.matched_count,
            modified = result.modified_count,
            "updated documents"
        );
        Ok(result)
    }
}

fn not_found_message(model: &str) -> String {
    format!("Document of type {model} not found")
}

fn filter_not_found_message(model: &str, filter: &Document) -> String {
    let criteria = Bson::Document(filter.clone()).into_relaxed_extjson();
    format!("Document of type {model} with filter criteria {criteria} not found")
}
