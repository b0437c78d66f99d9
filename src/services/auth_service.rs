use crate::database::MongoDB;
use crate::models::{Profile, User};
use crate::repository::Repository;
use crate::utils::AppError;
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user_id
    pub email: String,
    pub roles: Vec<String>,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
    pub aud: String,
    pub iss: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub refresh_token: Option<String>,
    pub user: UserInfo,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub roles: Vec<String>,
}

fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "default-secret-change-me".to_string())
}

fn get_jwt_issuer() -> String {
    std::env::var("JWT_ISSUER").unwrap_or_else(|_| "profile-service".to_string())
}

fn get_jwt_audience() -> String {
    std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "profile-api".to_string())
}

fn build_claims(user_id: &str, email: &str, roles: &[String], ttl: Duration) -> Claims {
    let iat = Utc::now().timestamp() as usize;
    let exp = (Utc::now() + ttl).timestamp() as usize;

    Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        roles: roles.to_vec(),
        iat,
        exp,
        jti: Uuid::new_v4().to_string(),
        aud: get_jwt_audience(),
        iss: get_jwt_issuer(),
    }
}

pub fn generate_jwt(user: &User) -> Result<String, AppError> {
    let claims = build_claims(&user.user_id, &user.email, &user.roles, Duration::hours(24));

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_jwt_secret().as_ref()),
    )
    .map_err(|e| AppError::Unauthorized(format!("Failed to generate token: {}", e)))
}

// Longer expiry, no role payload
pub fn generate_refresh_token(user_id: &str) -> Result<String, AppError> {
    let claims = build_claims(user_id, "", &[], Duration::days(30));

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_jwt_secret().as_ref()),
    )
    .map_err(|e| AppError::Unauthorized(format!("Failed to generate refresh token: {}", e)))
}

/// Verify signature, expiry, issuer and audience; returns the claims
/// the middleware hands to handlers.
pub fn verify_token(token: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[get_jwt_audience()]);

    let mut issuers = HashSet::new();
    issuers.insert(get_jwt_issuer());
    validation.iss = Some(issuers);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(get_jwt_secret().as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

// User login
pub async fn login(db: &MongoDB, request: &LoginRequest) -> Result<AuthResponse, AppError> {
    let users = Repository::<User>::new(db, "users");

    let user = users
        .find_one(doc! { "email": &request.email })
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    let stored_password = user
        .password
        .as_ref()
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    let valid = verify(&request.password, stored_password)
        .map_err(|e| AppError::Unauthorized(format!("Password verification error: {}", e)))?;

    if !valid {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    if !user.is_active {
        return Err(AppError::Unauthorized("Account is inactive".to_string()));
    }

    users
        .set(
            doc! { "user_id": &user.user_id },
            doc! { "last_login": BsonDateTime::now() },
        )
        .await?;

    let token = generate_jwt(&user)?;
    let refresh_token = generate_refresh_token(&user.user_id)?;

    Ok(AuthResponse {
        token,
        refresh_token: Some(refresh_token),
        user: UserInfo {
            id: user.user_id,
            email: user.email,
            name: user.name,
            roles: user.roles,
        },
    })
}

/// Self-registration: creates the auth identity and the empty profile
/// document in one flow. Duplicate email surfaces as 400.
pub async fn register(db: &MongoDB, request: &RegisterRequest) -> Result<AuthResponse, AppError> {
    let users = Repository::<User>::new(db, "users");
    let profiles = Repository::<Profile>::new(db, "profiles");

    if request.email.trim().is_empty() {
        return Err(AppError::Validation("Email is required".to_string()));
    }
    if request.password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    if users
        .find_one(doc! { "email": &request.email })
        .await?
        .is_some()
    {
        return Err(AppError::Validation("User already exists".to_string()));
    }

    let hashed_password = hash(&request.password, DEFAULT_COST)
        .map_err(|e| AppError::Validation(format!("Failed to hash password: {}", e)))?;

    let new_user_id = ObjectId::new().to_hex();

    let new_user = User {
        _id: None,
        user_id: new_user_id.clone(),
        email: request.email.clone(),
        password: Some(hashed_password),
        name: request.name.clone(),
        roles: vec!["user".to_string()],
        is_active: true,
        created_at: Some(BsonDateTime::now()),
        updated_at: Some(BsonDateTime::now()),
        last_login: Some(BsonDateTime::now()),
    };

    users.insert(&new_user).await?;

    // Profile created on first self-registration; unique index on
    // user_id/email backs the duplicate rule.
    let profile = Profile::new(
        new_user_id.clone(),
        request.email.clone(),
        request.name.clone(),
    );
    profiles.insert(&profile).await?;

    let token = generate_jwt(&new_user)?;
    let refresh_token = generate_refresh_token(&new_user_id)?;

    log::info!("✅ User registered: {}", request.email);

    Ok(AuthResponse {
        token,
        refresh_token: Some(refresh_token),
        user: UserInfo {
            id: new_user_id,
            email: new_user.email,
            name: new_user.name,
            roles: new_user.roles,
        },
    })
}

// Refresh token
pub async fn refresh_token(
    db: &MongoDB,
    request: &RefreshTokenRequest,
) -> Result<AuthResponse, AppError> {
    let claims = verify_token(&request.refresh_token)?;

    let users = Repository::<User>::new(db, "users");

    let user = users
        .find_one(doc! { "user_id": &claims.sub })
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    if !user.is_active {
        return Err(AppError::Unauthorized("Account is inactive".to_string()));
    }

    let token = generate_jwt(&user)?;
    let new_refresh_token = generate_refresh_token(&user.user_id)?;

    Ok(AuthResponse {
        token,
        refresh_token: Some(new_refresh_token),
        user: UserInfo {
            id: user.user_id,
            email: user.email,
            name: user.name,
            roles: user.roles,
        },
    })
}

// Get current user
pub async fn get_current_user(db: &MongoDB, user_id: &str) -> Result<UserInfo, AppError> {
    let users = Repository::<User>::new(db, "users");

    let user = users
        .find_one(doc! { "user_id": user_id })
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(UserInfo {
        id: user.user_id,
        email: user.email,
        name: user.name,
        roles: user.roles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            _id: None,
            user_id: "507f1f77bcf86cd799439011".to_string(),
            email: "jane@example.com".to_string(),
            password: None,
            name: Some("Jane".to_string()),
            roles: vec!["user".to_string(), "admin".to_string()],
            is_active: true,
            created_at: None,
            updated_at: None,
            last_login: None,
        }
    }

    #[test]
    fn test_jwt_round_trip() {
        let user = test_user();
        let token = generate_jwt(&user).unwrap();
        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.sub, user.user_id);
        assert_eq!(claims.email, user.email);
        assert!(claims.roles.iter().any(|r| r == "admin"));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(verify_token("not-a-jwt").is_err());
    }

    #[test]
    fn test_verify_rejects_tampered_token() {
        let user = test_user();
        let token = generate_jwt(&user).unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('a') { 'b' } else { 'a' });
        assert!(verify_token(&tampered).is_err());
    }
}
