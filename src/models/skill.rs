use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Master skill catalog entry, collection "skills".
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct Skill {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    #[schema(ignore)]
    pub _id: Option<ObjectId>,
    pub skill_id: i32,
    pub name: String,
    /// Code from lookup::skill_type (core/soft).
    pub skill_type: i32,
    #[serde(default)]
    pub categories: Vec<String>,
    #[schema(ignore)]
    pub created_at: Option<BsonDateTime>,
}
