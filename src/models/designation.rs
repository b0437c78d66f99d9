use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Master designation (job title) catalog entry, collection "designations".
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct Designation {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    #[schema(ignore)]
    pub _id: Option<ObjectId>,
    pub designation_id: i32,
    pub title: String,
    #[schema(ignore)]
    pub created_at: Option<BsonDateTime>,
}
