use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Uploaded file record, collection "files". Bytes live on local disk
/// under UPLOAD_DIR; deletion flips the status, the bytes stay.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FileDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub file_id: String,
    /// On-disk name inside the upload directory.
    pub name: String,
    /// Code from lookup::file_type.
    pub file_type: i32,
    pub profile_id: String,
    pub size: u64,
    pub status: i32,
    pub created_at: Option<BsonDateTime>,
}
