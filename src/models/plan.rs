use chrono::NaiveDate;
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::profile::SubItem;

/// Growth plan linking a profile to a master skill, collection "plans".
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Plan {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub plan_id: String,
    pub profile_id: String,
    pub skill_id: i32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub tasks: Vec<PlanTask>,
    pub status: i32,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct PlanTask {
    pub task_id: i64,
    pub description: String,
    pub status: i32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub duration_hours: Option<f64>,
}

impl SubItem for PlanTask {
    fn item_id(&self) -> i64 {
        self.task_id
    }
}
