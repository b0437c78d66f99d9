use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::FindOptions;
use mongodb::Collection;
use serde::{de::DeserializeOwned, Serialize};

use crate::database::MongoDB;
use crate::utils::{AppError, PageParams};

/// Generic single-document CRUD wrapper over a collection. All
/// operations are optimistic, no transaction boundaries; a missing
/// target comes back as None, a duplicate key as Validation.
pub struct Repository<T: Send + Sync> {
    collection: Collection<T>,
    name: &'static str,
}

impl<T> Repository<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + Unpin,
{
    pub fn new(db: &MongoDB, name: &'static str) -> Self {
        Repository {
            collection: db.collection::<T>(name),
            name,
        }
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> Result<Option<T>, AppError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn find_one(&self, filter: Document) -> Result<Option<T>, AppError> {
        Ok(self.collection.find_one(filter).await?)
    }

    /// First document under the given sort order, e.g. the current
    /// maximum of a counter field with a descending sort.
    pub async fn find_one_sorted(
        &self,
        filter: Document,
        sort: Document,
    ) -> Result<Option<T>, AppError> {
        Ok(self.collection.find_one(filter).sort(sort).await?)
    }

    /// Paginated listing: (page of documents, total matching count).
    pub async fn list(
        &self,
        filter: Document,
        params: &PageParams,
    ) -> Result<(Vec<T>, u64), AppError> {
        let total = self.collection.count_documents(filter.clone()).await?;

        let options = FindOptions::builder()
            .sort(doc! { "_id": 1 })
            .skip(params.skip())
            .limit(params.page_size() as i64)
            .build();

        let mut cursor = self.collection.find(filter).with_options(options).await?;

        let mut items = Vec::new();
        while let Some(result) = cursor.next().await {
            match result {
                Ok(item) => items.push(item),
                Err(e) => log::error!("Error reading {} document: {}", self.name, e),
            }
        }

        Ok((items, total))
    }

    pub async fn insert(&self, document: &T) -> Result<ObjectId, AppError> {
        let result = self.collection.insert_one(document).await.map_err(|e| {
            if is_duplicate_key(&e) {
                AppError::Validation(format!("{}: duplicate unique key", self.name))
            } else {
                AppError::DatabaseError(e.to_string())
            }
        })?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::DatabaseError("insert returned no ObjectId".to_string()))
    }

    /// `$set` the given fields on the first document matching the filter.
    pub async fn set(&self, filter: Document, fields: Document) -> Result<u64, AppError> {
        let result = self
            .collection
            .update_one(filter, doc! { "$set": fields })
            .await?;
        Ok(result.matched_count)
    }

    /// Raw update document, for positional (`field.$.x`) and `$push`
    /// mutations the caller assembles itself.
    pub async fn update(&self, filter: Document, update: Document) -> Result<u64, AppError> {
        let result = self.collection.update_one(filter, update).await?;
        Ok(result.matched_count)
    }
}

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    match &*e.kind {
        ErrorKind::Write(WriteFailure::WriteError(we)) => we.code == 11000,
        _ => false,
    }
}
