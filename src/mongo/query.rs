use futures::TryStreamExt;
use mongodb::{bson::Document, Collection};

pub async fn find_all(collection: &Collection<Document>) -> mongodb::error::Result<Vec<Document>> {
    let cursor = collection.find(None, None).await?;
    cursor.try_collect().await
}
