use crate::database::MongoDB;
use crate::services::auth_service::{
    self, AuthResponse, Claims, LoginRequest, RefreshTokenRequest, RegisterRequest,
};
use crate::utils::AppError;
use actix_web::{web, HttpResponse};

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    db: web::Data<MongoDB>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔐 POST /auth/login - email: {}", request.email);

    let response = auth_service::login(&db, &request).await?;

    log::info!("✅ Login successful: {}", request.email);
    Ok(HttpResponse::Ok().json(response))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = AuthResponse),
        (status = 400, description = "Invalid request or user already exists")
    )
)]
pub async fn register(
    db: web::Data<MongoDB>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /auth/register - email: {}", request.email);

    let response = auth_service::register(&db, &request).await?;

    log::info!("✅ Registration successful: {}", request.email);
    Ok(HttpResponse::Created().json(response))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    tag = "Auth",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New token pair", body = AuthResponse),
        (status = 401, description = "Invalid or expired refresh token")
    )
)]
pub async fn refresh_token(
    db: web::Data<MongoDB>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔄 POST /auth/refresh");

    let response = auth_service::refresh_token(&db, &request).await?;

    Ok(HttpResponse::Ok().json(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user info"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_me(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    log::info!("👤 GET /auth/me - user {}", user.sub);

    let info = auth_service::get_current_user(&db, &user.sub).await?;

    Ok(HttpResponse::Ok().json(info))
}
