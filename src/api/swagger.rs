use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Profile Service API",
        version = "1.0.0",
        description = "Employee profile, skill, education, experience and designation management.\n\n**Authentication:** Bearer JWT on all /profile and /admin endpoints; /admin additionally requires the admin role.",
    ),
    paths(
        // Auth
        crate::api::auth::login,
        crate::api::auth::register,
        crate::api::auth::refresh_token,
        crate::api::auth::get_me,

        // Health
        crate::api::health::health_check,

        // Self-service profile
        crate::api::profile::get_profile,
        crate::api::profile::update_profile,
        crate::api::profile::submit_designation,
        crate::api::profile::upsert_education,
        crate::api::profile::upsert_experience,
        crate::api::profile::upsert_skill,

        // Plans
        crate::api::plans::list_own_plans,
        crate::api::plans::create_plan,
        crate::api::plans::upsert_task,
        crate::api::plans::list_all_plans,

        // Files
        crate::api::files::upload_resume,
        crate::api::files::upload_picture,
        crate::api::files::upload_certificate,
        crate::api::files::download_file,
        crate::api::files::delete_file,
        crate::api::files::list_files,
        crate::api::files::admin_download_file,

        // Admin
        crate::api::admin::list_profiles,
        crate::api::admin::create_profile,
        crate::api::admin::get_profile,
        crate::api::admin::update_profile,
        crate::api::admin::upsert_education,
        crate::api::admin::upsert_experience,
        crate::api::admin::upsert_skill,
        crate::api::admin::activate_designation,

        // Catalog
        crate::api::catalog::list_skills,
        crate::api::catalog::create_skill,
        crate::api::catalog::list_designations,
        crate::api::catalog::create_designation,
        crate::api::catalog::list_lookups,
    ),
    components(
        schemas(
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::RegisterRequest,
            crate::services::auth_service::RefreshTokenRequest,
            crate::services::auth_service::AuthResponse,
            crate::services::auth_service::UserInfo,

            crate::api::health::HealthResponse,

            crate::services::profile_service::ProfileDto,
            crate::services::profile_service::ProfilePatchRequest,
            crate::services::profile_service::CreateProfileRequest,
            crate::services::profile_service::DesignationDto,
            crate::services::profile_service::SkillItemDto,
            crate::services::profile_service::ExperienceDto,
            crate::services::profile_service::EducationDto,

            crate::services::designation_service::DesignationChangeRequest,
            crate::services::designation_service::CreateDesignationRequest,
            crate::services::education_service::EducationRequest,
            crate::services::experience_service::ExperienceRequest,
            crate::services::skill_service::SkillItemRequest,
            crate::services::skill_service::CreateSkillRequest,

            crate::services::plan_service::CreatePlanRequest,
            crate::services::plan_service::PlanTaskRequest,
            crate::services::plan_service::PlanDto,
            crate::services::plan_service::PlanTaskDto,

            crate::services::file_service::FileDto,

            crate::models::skill::Skill,
            crate::models::designation::Designation,
            crate::models::lookup::Lookup,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Auth", description = "Registration, login and token verification."),
        (name = "Health", description = "Liveness check."),
        (name = "Profile", description = "Self-service profile and sub-resource management."),
        (name = "Plans", description = "Skill growth plans and their task lists."),
        (name = "Files", description = "Resume, picture and certificate uploads."),
        (name = "Admin", description = "Administrator profile management and approvals."),
        (name = "Catalog", description = "Master skills, designations and lookup tables."),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
