mod api;
mod database;
mod jobs;
mod middleware;
mod models;
mod repository;
mod seeds;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    log::info!("🚀 Starting Profile Service...");
    log::info!("📊 Database: {}", database_url);

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&database_url)
        .await
        .expect("Failed to connect to MongoDB");

    let db_data = web::Data::new(db.clone());

    log::info!("✅ MongoDB connected successfully");

    // 🌱 Seed lookup tables and starter master data
    seeds::lookup_seed::seed_lookups(&db).await;
    seeds::lookup_seed::seed_designations(&db).await;
    seeds::lookup_seed::seed_skills(&db).await;

    // 📬 Start notification email worker
    let email_client = services::email_service::EmailClient::from_env()
        .expect("Failed to configure SMTP client");
    let email_queue = web::Data::new(jobs::start_email_worker(email_client));
    log::info!("✅ Email worker started");

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://127.0.0.1:3000")
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .app_data(email_queue.clone())
            .wrap(cors)
            .wrap(Logger::default())
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Auth endpoints
            .service(
                web::scope("/api/v1/auth")
                    .route("/login", web::post().to(api::auth::login))
                    .route("/register", web::post().to(api::auth::register))
                    .route("/refresh", web::post().to(api::auth::refresh_token))
                    .service(
                        web::resource("/me")
                            .wrap(middleware::AuthMiddleware)
                            .route(web::get().to(api::auth::get_me)),
                    ),
            )
            // ==================== SELF-SERVICE ====================
            .service(
                web::scope("/api/v1/profile")
                    .wrap(middleware::AuthMiddleware)
                    .route("", web::get().to(api::profile::get_profile))
                    .route("", web::put().to(api::profile::update_profile))
                    .route("/designation", web::post().to(api::profile::submit_designation))
                    .route("/education", web::post().to(api::profile::upsert_education))
                    .route("/experience", web::post().to(api::profile::upsert_experience))
                    .route("/skill", web::post().to(api::profile::upsert_skill))
                    // Growth plans
                    .route("/plans", web::get().to(api::plans::list_own_plans))
                    .route("/plan", web::post().to(api::plans::create_plan))
                    .route("/plan/{plan_id}/task", web::post().to(api::plans::upsert_task))
                    // File uploads (multipart)
                    .route("/resume", web::post().to(api::files::upload_resume))
                    .route("/picture", web::post().to(api::files::upload_picture))
                    .route("/certificate", web::post().to(api::files::upload_certificate))
                    .route("/files/{file_id}", web::get().to(api::files::download_file))
                    .route("/files/{file_id}", web::delete().to(api::files::delete_file)),
            )
            // ==================== ADMINISTRATION ====================
            .service(
                web::scope("/api/v1/admin")
                    .wrap(middleware::AdminAuthMiddleware)
                    .route("/profiles", web::get().to(api::admin::list_profiles))
                    .route("/profiles", web::post().to(api::admin::create_profile))
                    .route("/profiles/{id}", web::get().to(api::admin::get_profile))
                    .route("/profiles/{id}", web::put().to(api::admin::update_profile))
                    .route("/profiles/{id}/education", web::post().to(api::admin::upsert_education))
                    .route("/profiles/{id}/experience", web::post().to(api::admin::upsert_experience))
                    .route("/profiles/{id}/skill", web::post().to(api::admin::upsert_skill))
                    .route(
                        "/profiles/{id}/designation/activate",
                        web::post().to(api::admin::activate_designation),
                    )
                    // Master data
                    .route("/skills", web::get().to(api::catalog::list_skills))
                    .route("/skills", web::post().to(api::catalog::create_skill))
                    .route("/designations", web::get().to(api::catalog::list_designations))
                    .route("/designations", web::post().to(api::catalog::create_designation))
                    .route("/lookups", web::get().to(api::catalog::list_lookups))
                    // Cross-profile listings
                    .route("/files", web::get().to(api::files::list_files))
                    .route("/files/{file_id}", web::get().to(api::files::admin_download_file))
                    .route("/plans", web::get().to(api::plans::list_all_plans)),
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
