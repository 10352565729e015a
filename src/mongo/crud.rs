use mongodb::{
    bson::{doc, Document},
    results::UpdateResult,
    Collection,
};

use crate::validation::DashboardPatch;

pub async fn update_one(
    collection: &Collection<Document>,
    filter: Document,
    update: Document,
) -> mongodb::error::Result<UpdateResult> {
    collection.update_one(filter, update, None).await
}

/// `$set` document for the editable dashboard fields.
pub fn dashboard_set(patch: &DashboardPatch) -> Document {
    doc! {
        "$set": {
            "guildID": patch.guild_id.as_str(),
            "url": patch.url.as_str(),
            "port": i32::from(patch.port),
        }
    }
}
