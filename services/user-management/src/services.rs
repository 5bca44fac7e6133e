use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use bunkmate_auth::{Claims, JwtService, PasswordService};
use bunkmate_common::{AppError, RedisService, UserRole, UserStatus};
use bunkmate_database::{BlockedHostel, User};

use crate::config::AppConfig;
use crate::models::*;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub redis_service: RedisService,
    pub jwt_service: JwtService,
    pub config: AppConfig,
}

pub struct UserService {
    db_pool: PgPool,
    redis_service: RedisService,
    jwt_service: JwtService,
    config: AppConfig,
}

impl UserService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db_pool: state.db_pool.clone(),
            redis_service: state.redis_service.clone(),
            jwt_service: state.jwt_service.clone(),
            config: state.config.clone(),
        }
    }

    // Registration
    pub async fn register_user(&self, request: RegisterRequest) -> Result<AuthResponse, AppError> {
        PasswordService::validate_password_strength(&request.password)?;

        let existing = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
        )
        .bind(&request.email)
        .fetch_one(&self.db_pool)
        .await
        .map_err(AppError::Database)?;

        if existing {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let hashed_password = PasswordService::hash_password(&request.password)?;
        let user_id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO users (user_id, email, display_name, role, hashed_password)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user_id)
        .bind(&request.email)
        .bind(&request.display_name)
        .bind(request.role.as_str())
        .bind(&hashed_password)
        .execute(&self.db_pool)
        .await
        .map_err(AppError::Database)?;

        tracing::info!("User registered: {} ({})", request.display_name, request.email);

        self.issue_session(
            user_id,
            request.email,
            request.display_name,
            request.role,
            UserStatus::Active,
            Utc::now(),
        )
        .await
    }

    // Login
    pub async fn login_user(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(&request.email)
            .fetch_optional(&self.db_pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !PasswordService::verify_password(&request.password, &user.hashed_password)? {
            return Err(AppError::Authentication(
                "Invalid email or password".to_string(),
            ));
        }

        let status = UserStatus::parse(&user.status)
            .ok_or_else(|| AppError::Internal("Invalid status in database".to_string()))?;
        if status == UserStatus::Inactive {
            return Err(AppError::Authorization(
                "Account has been deactivated".to_string(),
            ));
        }

        let role = UserRole::parse(&user.role)
            .ok_or_else(|| AppError::Internal("Invalid role in database".to_string()))?;

        tracing::info!("User logged in: {} ({})", user.display_name, user.email);

        self.issue_session(
            user.user_id,
            user.email,
            user.display_name,
            role,
            status,
            user.created_at,
        )
        .await
    }

    async fn issue_session(
        &self,
        user_id: Uuid,
        email: String,
        display_name: String,
        role: UserRole,
        status: UserStatus,
        created_at: chrono::DateTime<Utc>,
    ) -> Result<AuthResponse, AppError> {
        let claims = Claims::new(
            user_id,
            email.clone(),
            display_name.clone(),
            role,
            &self.config.jwt,
        );
        let token = self.jwt_service.generate_token(&claims)?;

        self.redis_service
            .set_session(
                &user_id.to_string(),
                &token,
                self.config.jwt.expiration_hours * 3600,
            )
            .await?;

        Ok(AuthResponse {
            token,
            user: UserInfo {
                user_id,
                email,
                display_name,
                role,
                status,
                created_at,
            },
            expires_at: Utc::now() + Duration::hours(self.config.jwt.expiration_hours as i64),
        })
    }

    // Logout
    pub async fn logout_user(&self, user_id: Uuid) -> Result<(), AppError> {
        self.redis_service.delete_session(&user_id.to_string()).await?;

        tracing::info!("User logged out: {}", user_id);
        Ok(())
    }

    pub async fn get_user_by_id(&self, user_id: Uuid) -> Result<User, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.db_pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    // Password reset
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.db_pool)
            .await
            .map_err(AppError::Database)?;

        // Do not leak whether the address exists
        if let Some(user) = user {
            let token = Uuid::new_v4().to_string();
            self.redis_service
                .set_reset_token(
                    &token,
                    &user.user_id.to_string(),
                    self.config.password_reset_ttl_seconds,
                )
                .await?;

            // Delivery is handled out of band; log for local development
            tracing::info!("Password reset token issued for {}", user.email);
        }

        Ok(())
    }

    pub async fn confirm_password_reset(
        &self,
        request: PasswordResetConfirmRequest,
    ) -> Result<(), AppError> {
        PasswordService::validate_password_strength(&request.new_password)?;

        let user_id = self
            .redis_service
            .take_reset_token(&request.token)
            .await?
            .ok_or_else(|| {
                AppError::Authentication("Invalid or expired reset token".to_string())
            })?;

        let user_id = Uuid::parse_str(&user_id)
            .map_err(|_| AppError::Internal("Invalid user ID in reset token".to_string()))?;

        let hashed = PasswordService::hash_password(&request.new_password)?;
        sqlx::query("UPDATE users SET hashed_password = $2, updated_at = NOW() WHERE user_id = $1")
            .bind(user_id)
            .bind(&hashed)
            .execute(&self.db_pool)
            .await
            .map_err(AppError::Database)?;

        // Force a fresh login with the new password
        self.redis_service.delete_session(&user_id.to_string()).await?;

        tracing::info!("Password reset completed for user {}", user_id);
        Ok(())
    }

    // Profile
    pub async fn get_profile(&self, user_id: Uuid) -> Result<ProfileResponse, AppError> {
        let user = self.get_user_by_id(user_id).await?;
        user_to_profile(user)
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: UpdateProfileRequest,
    ) -> Result<ProfileResponse, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                display_name = COALESCE($2, display_name),
                phone = COALESCE($3, phone),
                bio = COALESCE($4, bio),
                age = COALESCE($5, age),
                lifestyle_tags = COALESCE($6, lifestyle_tags),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&request.display_name)
        .bind(&request.phone)
        .bind(&request.bio)
        .bind(request.age)
        .bind(&request.lifestyle_tags)
        .fetch_optional(&self.db_pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        user_to_profile(user)
    }

    // Owner console: user moderation
    pub async fn list_users(&self) -> Result<Vec<UserSummary>, AppError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(&self.db_pool)
            .await
            .map_err(AppError::Database)?;

        users
            .into_iter()
            .map(|user| {
                Ok(UserSummary {
                    user_id: user.user_id,
                    email: user.email,
                    display_name: user.display_name,
                    role: UserRole::parse(&user.role)
                        .ok_or_else(|| AppError::Internal("Invalid role in database".to_string()))?,
                    status: UserStatus::parse(&user.status).ok_or_else(|| {
                        AppError::Internal("Invalid status in database".to_string())
                    })?,
                    total_spent: user.total_spent,
                    created_at: user.created_at,
                })
            })
            .collect()
    }

    pub async fn set_user_status(
        &self,
        user_id: Uuid,
        status: UserStatus,
    ) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE users SET status = $2, updated_at = NOW() WHERE user_id = $1")
            .bind(user_id)
            .bind(status.as_str())
            .execute(&self.db_pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        // Deactivation revokes any live session immediately
        if status == UserStatus::Inactive {
            self.redis_service.delete_session(&user_id.to_string()).await?;
        }

        tracing::info!("User {} status set to {}", user_id, status.as_str());
        Ok(())
    }

    // Hostel blocking
    pub async fn block_hostel(&self, user_id: Uuid, hostel_id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO blocked_hostels (user_id, hostel_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, hostel_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(hostel_id)
        .execute(&self.db_pool)
        .await
        .map_err(AppError::Database)?;

        Ok(())
    }

    pub async fn unblock_hostel(&self, user_id: Uuid, hostel_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM blocked_hostels WHERE user_id = $1 AND hostel_id = $2")
            .bind(user_id)
            .bind(hostel_id)
            .execute(&self.db_pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Hostel is not blocked".to_string()));
        }

        Ok(())
    }

    pub async fn list_blocked_hostels(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<BlockedHostelResponse>, AppError> {
        let blocked = sqlx::query_as::<_, BlockedHostel>(
            "SELECT * FROM blocked_hostels WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await
        .map_err(AppError::Database)?;

        Ok(blocked
            .into_iter()
            .map(|entry| BlockedHostelResponse {
                hostel_id: entry.hostel_id,
                created_at: entry.created_at,
            })
            .collect())
    }
}

fn user_to_profile(user: User) -> Result<ProfileResponse, AppError> {
    Ok(ProfileResponse {
        user_id: user.user_id,
        email: user.email,
        display_name: user.display_name,
        role: UserRole::parse(&user.role)
            .ok_or_else(|| AppError::Internal("Invalid role in database".to_string()))?,
        phone: user.phone,
        bio: user.bio,
        age: user.age,
        lifestyle_tags: user.lifestyle_tags,
        total_spent: user.total_spent,
        status: UserStatus::parse(&user.status)
            .ok_or_else(|| AppError::Internal("Invalid status in database".to_string()))?,
        created_at: user.created_at,
        updated_at: user.updated_at,
    })
}
