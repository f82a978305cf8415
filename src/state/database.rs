use futures::TryStreamExt;
use mongodb::{
    bson::{doc, from_document, Document},
    Database,
};

use crate::models::{
    fastbtc::FastBtcBridgeDocument, stats::AggregatedDocument,
    transactions::TransactionDocument,
};

use super::DatabaseError;

pub const TRANSACTION_COLLECTION: &str = "Transaction";
pub const FASTBTC_COLLECTION: &str = "FastBtcBridge";

pub trait DatabaseExt {
    async fn find_transactions(
        &self,
        filter: Document,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<TransactionDocument>, DatabaseError>;

    async fn count_transactions(&self, filter: Document) -> Result<u64, DatabaseError>;

    async fn find_pegouts(
        &self,
        filter: Document,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<FastBtcBridgeDocument>, DatabaseError>;

    async fn count_pegouts(&self, filter: Document) -> Result<u64, DatabaseError>;

    async fn aggregate_transactions(
        &self,
        pipeline: Vec<Document>,
    ) -> Result<Vec<AggregatedDocument>, DatabaseError>;
}

impl DatabaseExt for Database {
    async fn find_transactions(
        &self,
        filter: Document,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<TransactionDocument>, DatabaseError> {
        let cursor = self
            .collection::<TransactionDocument>(TRANSACTION_COLLECTION)
            .find(filter)
            .sort(doc! { "createdAt": -1 })
            .skip(skip)
            .limit(limit)
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn count_transactions(&self, filter: Document) -> Result<u64, DatabaseError> {
        let total = self
            .collection::<TransactionDocument>(TRANSACTION_COLLECTION)
            .count_documents(filter)
            .await?;
        Ok(total)
    }

    async fn find_pegouts(
        &self,
        filter: Document,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<FastBtcBridgeDocument>, DatabaseError> {
        let cursor = self
            .collection::<FastBtcBridgeDocument>(FASTBTC_COLLECTION)
            .find(filter)
            .sort(doc! { "timestamp": -1 })
            .skip(skip)
            .limit(limit)
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn count_pegouts(&self, filter: Document) -> Result<u64, DatabaseError> {
        let total = self
            .collection::<FastBtcBridgeDocument>(FASTBTC_COLLECTION)
            .count_documents(filter)
            .await?;
        Ok(total)
    }

    async fn aggregate_transactions(
        &self,
        pipeline: Vec<Document>,
    ) -> Result<Vec<AggregatedDocument>, DatabaseError> {
        let documents: Vec<Document> = self
            .collection::<Document>(TRANSACTION_COLLECTION)
            .aggregate(pipeline)
            .await?
            .try_collect()
            .await?;

        documents
            .into_iter()
            .map(|document| from_document(document).map_err(DatabaseError::DeserializationFailed))
            .collect()
    }
}
