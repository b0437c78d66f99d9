use crate::database::MongoDB;
use crate::models::{next_item_id, status, validate_date_range, Plan, PlanTask, Profile};
use crate::repository::Repository;
use crate::services::skill_service;
use crate::utils::{AppError, Page, PageParams};
use chrono::NaiveDate;
use mongodb::bson::{doc, to_bson, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreatePlanRequest {
    pub skill_id: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct PlanTaskRequest {
    /// Present → update of the addressed task; absent → create.
    pub task_id: Option<i64>,
    pub description: Option<String>,
    pub status: Option<i32>,
    pub duration_hours: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlanDto {
    pub plan_id: String,
    pub profile_id: String,
    pub skill_id: i32,
    pub skill_name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub tasks: Vec<PlanTaskDto>,
    pub status: i32,
    pub status_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlanTaskDto {
    pub task_id: i64,
    pub description: String,
    pub status: i32,
    pub status_name: Option<String>,
    pub duration_hours: Option<f64>,
}

fn repo(db: &MongoDB) -> Repository<Plan> {
    Repository::new(db, "plans")
}

/// Create a growth plan tying the profile to a master skill.
pub async fn create_plan(
    db: &MongoDB,
    profile: &Profile,
    request: &CreatePlanRequest,
) -> Result<PlanDto, AppError> {
    let skill = skill_service::require_master_skill(db, request.skill_id).await?;
    validate_date_range(request.start_date, request.end_date)?;

    let plan = Plan {
        _id: None,
        plan_id: uuid::Uuid::new_v4().to_string(),
        profile_id: profile.id_or_err()?.to_hex(),
        skill_id: request.skill_id,
        start_date: request.start_date,
        end_date: request.end_date,
        tasks: Vec::new(),
        status: status::ACTIVE,
        created_at: Some(BsonDateTime::now()),
        updated_at: Some(BsonDateTime::now()),
    };

    repo(db).insert(&plan).await?;

    Ok(plan_dto(&plan, Some(skill.name)))
}

/// Upsert a task within a plan owned by the given profile. Tasks follow
/// the same max+1 id rule as profile sub-resources.
pub async fn upsert_task(
    db: &MongoDB,
    profile: &Profile,
    plan_id: &str,
    request: &PlanTaskRequest,
) -> Result<PlanDto, AppError> {
    let profile_id = profile.id_or_err()?.to_hex();

    let plan = repo(db)
        .find_one(doc! { "plan_id": plan_id })
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Plan {} not found", plan_id)))?;

    if plan.profile_id != profile_id {
        return Err(AppError::Unauthorized(
            "Plan belongs to another profile".to_string(),
        ));
    }

    if let Some(s) = request.status {
        if !status::is_valid(s) {
            return Err(AppError::Validation(format!("Invalid status code: {}", s)));
        }
    }

    let mut tasks = plan.tasks.clone();
    match request.task_id {
        Some(id) => {
            let task = tasks
                .iter_mut()
                .find(|t| t.task_id == id)
                .ok_or_else(|| AppError::Validation(format!("Task {} does not exist", id)))?;

            if let Some(description) = &request.description {
                task.description = description.clone();
            }
            if let Some(s) = request.status {
                task.status = s;
            }
            if request.duration_hours.is_some() {
                task.duration_hours = request.duration_hours;
            }
        }
        None => {
            let description = request.description.clone().ok_or_else(|| {
                AppError::Validation("description is required".to_string())
            })?;

            tasks.push(PlanTask {
                task_id: next_item_id(&plan.tasks),
                description,
                status: request.status.unwrap_or(status::PENDING),
                duration_hours: request.duration_hours,
            });
        }
    }

    repo(db)
        .update(
            doc! { "plan_id": plan_id },
            doc! {
                "$set": {
                    "tasks": to_bson(&tasks)
                        .map_err(|e| AppError::DatabaseError(e.to_string()))?,
                    "updated_at": BsonDateTime::now(),
                }
            },
        )
        .await?;

    let skill_name = skill_service::require_master_skill(db, plan.skill_id)
        .await
        .ok()
        .map(|s| s.name);

    let mut updated = plan;
    updated.tasks = tasks;
    Ok(plan_dto(&updated, skill_name))
}

pub async fn list_plans_for_profile(
    db: &MongoDB,
    profile: &Profile,
    params: &PageParams,
) -> Result<Page<PlanDto>, AppError> {
    let profile_id = profile.id_or_err()?.to_hex();
    list_plans(db, doc! { "profile_id": profile_id }, params).await
}

pub async fn list_all_plans(db: &MongoDB, params: &PageParams) -> Result<Page<PlanDto>, AppError> {
    list_plans(db, doc! {}, params).await
}

async fn list_plans(
    db: &MongoDB,
    filter: mongodb::bson::Document,
    params: &PageParams,
) -> Result<Page<PlanDto>, AppError> {
    let (plans, total) = repo(db).list(filter, params).await?;

    let mut items = Vec::with_capacity(plans.len());
    for plan in &plans {
        let skill_name = skill_service::require_master_skill(db, plan.skill_id)
            .await
            .ok()
            .map(|s| s.name);
        items.push(plan_dto(plan, skill_name));
    }

    Ok(Page::new(items, total, params))
}

fn plan_dto(plan: &Plan, skill_name: Option<String>) -> PlanDto {
    PlanDto {
        plan_id: plan.plan_id.clone(),
        profile_id: plan.profile_id.clone(),
        skill_id: plan.skill_id,
        skill_name,
        start_date: plan.start_date,
        end_date: plan.end_date,
        tasks: plan
            .tasks
            .iter()
            .map(|t| PlanTaskDto {
                task_id: t.task_id,
                description: t.description.clone(),
                status: t.status,
                status_name: status::name(t.status).map(str::to_string),
                duration_hours: t.duration_hours,
            })
            .collect(),
        status: plan.status,
        status_name: status::name(plan.status).map(str::to_string),
    }
}
