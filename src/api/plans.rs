use crate::database::MongoDB;
use crate::services::auth_service::Claims;
use crate::services::{
    plan_service::{self, CreatePlanRequest, PlanDto, PlanTaskRequest},
    profile_service,
};
use crate::utils::{AppError, PageParams};
use actix_web::{web, HttpResponse};

#[utoipa::path(
    get,
    path = "/api/v1/profile/plans",
    tag = "Plans",
    responses((status = 200, description = "Own growth plans")),
    security(("bearer_auth" = []))
)]
pub async fn list_own_plans(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    params: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /profile/plans - user {}", user.sub);

    let profile = profile_service::load_by_user_id(&db, &user.sub).await?;
    let page = plan_service::list_plans_for_profile(&db, &profile, &params).await?;

    Ok(HttpResponse::Ok().json(page))
}

#[utoipa::path(
    post,
    path = "/api/v1/profile/plan",
    tag = "Plans",
    request_body = CreatePlanRequest,
    responses(
        (status = 201, description = "Plan created", body = PlanDto),
        (status = 400, description = "Unknown skill or invalid dates")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_plan(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<CreatePlanRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!(
        "📅 POST /profile/plan - user {} for skill {}",
        user.sub,
        request.skill_id
    );

    let profile = profile_service::load_by_user_id(&db, &user.sub).await?;
    let dto = plan_service::create_plan(&db, &profile, &request).await?;

    Ok(HttpResponse::Created().json(dto))
}

#[utoipa::path(
    post,
    path = "/api/v1/profile/plan/{plan_id}/task",
    tag = "Plans",
    request_body = PlanTaskRequest,
    responses(
        (status = 200, description = "Task created or updated", body = PlanDto),
        (status = 400, description = "Unknown task_id or missing description"),
        (status = 404, description = "Plan not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upsert_task(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    plan_id: web::Path<String>,
    request: web::Json<PlanTaskRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /profile/plan/{}/task - user {}", plan_id, user.sub);

    let profile = profile_service::load_by_user_id(&db, &user.sub).await?;
    let dto = plan_service::upsert_task(&db, &profile, &plan_id, &request).await?;

    Ok(HttpResponse::Ok().json(dto))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/plans",
    tag = "Plans",
    responses((status = 200, description = "Paginated plan list across profiles")),
    security(("bearer_auth" = []))
)]
pub async fn list_all_plans(
    admin: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    params: web::Query<PageParams>,
) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /admin/plans - admin {}", admin.sub);

    let page = plan_service::list_all_plans(&db, &params).await?;

    Ok(HttpResponse::Ok().json(page))
}
