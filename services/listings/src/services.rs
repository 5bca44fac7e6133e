use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use bunkmate_common::{AppError, GenderPolicy, MealPolicy, RedisKeys, RedisService};
use bunkmate_database::{Hostel, Review, WishlistEntry};

use crate::config::AppConfig;
use crate::filters::{apply_filters, HostelFilters};
use crate::models::*;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub redis_service: RedisService,
    pub config: AppConfig,
}

pub struct ListingService {
    db_pool: PgPool,
    redis_service: RedisService,
    config: AppConfig,
}

impl ListingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db_pool: state.db_pool.clone(),
            redis_service: state.redis_service.clone(),
            config: state.config.clone(),
        }
    }

    // Search: fetch the full listing set (cached), drop hostels the viewer has
    // blocked, then apply the filter predicates in memory.
    pub async fn search_hostels(
        &self,
        viewer: Option<Uuid>,
        filters: &HostelFilters,
    ) -> Result<Vec<HostelResponse>, AppError> {
        let mut hostels = self.fetch_all_hostels().await?;

        if let Some(viewer) = viewer {
            let blocked: Vec<Uuid> = sqlx::query_scalar(
                "SELECT hostel_id FROM blocked_hostels WHERE user_id = $1",
            )
            .bind(viewer)
            .fetch_all(&self.db_pool)
            .await
            .map_err(AppError::Database)?;

            if !blocked.is_empty() {
                hostels.retain(|hostel| !blocked.contains(&hostel.hostel_id));
            }
        }

        Ok(apply_filters(hostels, filters))
    }

    async fn fetch_all_hostels(&self) -> Result<Vec<HostelResponse>, AppError> {
        let cache_key = RedisKeys::hostel_listing_cache();
        if let Ok(Some(cached)) = self
            .redis_service
            .cache_get::<Vec<HostelResponse>>(&cache_key)
            .await
        {
            return Ok(cached);
        }

        let rows = sqlx::query_as::<_, Hostel>("SELECT * FROM hostels ORDER BY created_at ASC")
            .fetch_all(&self.db_pool)
            .await
            .map_err(AppError::Database)?;

        let hostels: Vec<HostelResponse> = rows
            .into_iter()
            .map(HostelResponse::from_row)
            .collect::<Result<_, _>>()?;

        self.redis_service
            .cache_set(&cache_key, &hostels, self.config.listing_cache_ttl_seconds)
            .await?;

        Ok(hostels)
    }

    async fn invalidate_listing_cache(&self) -> Result<(), AppError> {
        self.redis_service
            .cache_delete(&RedisKeys::hostel_listing_cache())
            .await
    }

    pub async fn get_hostel(&self, hostel_id: Uuid) -> Result<HostelResponse, AppError> {
        let hostel = sqlx::query_as::<_, Hostel>("SELECT * FROM hostels WHERE hostel_id = $1")
            .bind(hostel_id)
            .fetch_optional(&self.db_pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Hostel not found".to_string()))?;

        HostelResponse::from_row(hostel)
    }

    // Owner console: hostel CRUD
    pub async fn create_hostel(
        &self,
        owner_id: Uuid,
        owner_name: &str,
        request: CreateHostelRequest,
    ) -> Result<HostelResponse, AppError> {
        if request.price_per_night <= Decimal::ZERO {
            return Err(AppError::Validation(
                "Price per night must be positive".to_string(),
            ));
        }

        let hostel = sqlx::query_as::<_, Hostel>(
            r#"
            INSERT INTO hostels (
                hostel_id, name, location, price_per_night, capacity,
                amenities, images, owner_id, owner_name, wifi_speed_mbps,
                meal_policy, gender_policy
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.name)
        .bind(&request.location)
        .bind(request.price_per_night)
        .bind(request.capacity)
        .bind(&request.amenities)
        .bind(&request.images)
        .bind(owner_id)
        .bind(owner_name)
        .bind(request.wifi_speed_mbps)
        .bind(request.meal_policy.unwrap_or(MealPolicy::NoMeals).as_str())
        .bind(request.gender_policy.unwrap_or(GenderPolicy::Mixed).as_str())
        .fetch_one(&self.db_pool)
        .await
        .map_err(AppError::Database)?;

        self.invalidate_listing_cache().await?;

        tracing::info!("Hostel created: {} by owner {}", hostel.hostel_id, owner_id);
        HostelResponse::from_row(hostel)
    }

    pub async fn update_hostel(
        &self,
        owner_id: Uuid,
        hostel_id: Uuid,
        request: UpdateHostelRequest,
    ) -> Result<HostelResponse, AppError> {
        if let Some(price) = request.price_per_night {
            if price <= Decimal::ZERO {
                return Err(AppError::Validation(
                    "Price per night must be positive".to_string(),
                ));
            }
        }

        let hostel = sqlx::query_as::<_, Hostel>(
            r#"
            UPDATE hostels SET
                name = COALESCE($3, name),
                location = COALESCE($4, location),
                price_per_night = COALESCE($5, price_per_night),
                capacity = COALESCE($6, capacity),
                amenities = COALESCE($7, amenities),
                images = COALESCE($8, images),
                wifi_speed_mbps = COALESCE($9, wifi_speed_mbps),
                meal_policy = COALESCE($10, meal_policy),
                gender_policy = COALESCE($11, gender_policy),
                updated_at = NOW()
            WHERE hostel_id = $1 AND owner_id = $2
            RETURNING *
            "#,
        )
        .bind(hostel_id)
        .bind(owner_id)
        .bind(&request.name)
        .bind(&request.location)
        .bind(request.price_per_night)
        .bind(request.capacity)
        .bind(&request.amenities)
        .bind(&request.images)
        .bind(request.wifi_speed_mbps)
        .bind(request.meal_policy.map(|p| p.as_str()))
        .bind(request.gender_policy.map(|p| p.as_str()))
        .fetch_optional(&self.db_pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("Hostel not found for this owner".to_string()))?;

        self.invalidate_listing_cache().await?;

        HostelResponse::from_row(hostel)
    }

    pub async fn delete_hostel(&self, owner_id: Uuid, hostel_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM hostels WHERE hostel_id = $1 AND owner_id = $2")
            .bind(hostel_id)
            .bind(owner_id)
            .execute(&self.db_pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Hostel not found for this owner".to_string()));
        }

        self.invalidate_listing_cache().await?;

        tracing::info!("Hostel deleted: {} by owner {}", hostel_id, owner_id);
        Ok(())
    }

    pub async fn list_owner_hostels(&self, owner_id: Uuid) -> Result<Vec<HostelResponse>, AppError> {
        let rows = sqlx::query_as::<_, Hostel>(
            "SELECT * FROM hostels WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.db_pool)
        .await
        .map_err(AppError::Database)?;

        rows.into_iter().map(HostelResponse::from_row).collect()
    }

    // Review submission: the insert and the running-average update commit or
    // roll back together, so rating and review_count never drift apart.
    pub async fn submit_review(
        &self,
        user_id: Uuid,
        hostel_id: Uuid,
        request: CreateReviewRequest,
    ) -> Result<ReviewResponse, AppError> {
        let mut tx = self.db_pool.begin().await.map_err(AppError::Database)?;

        let updated = sqlx::query(
            r#"
            UPDATE hostels SET
                rating = ROUND((rating * review_count + $2) / (review_count + 1), 1),
                review_count = review_count + 1,
                updated_at = NOW()
            WHERE hostel_id = $1
            "#,
        )
        .bind(hostel_id)
        .bind(request.rating)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound("Hostel not found".to_string()));
        }

        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (review_id, hostel_id, user_id, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(hostel_id)
        .bind(user_id)
        .bind(request.rating)
        .bind(&request.comment)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;

        self.invalidate_listing_cache().await?;

        tracing::info!("Review {} submitted for hostel {}", review.review_id, hostel_id);
        Ok(review.into())
    }

    pub async fn list_reviews(&self, hostel_id: Uuid) -> Result<Vec<ReviewResponse>, AppError> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE hostel_id = $1 ORDER BY created_at DESC",
        )
        .bind(hostel_id)
        .fetch_all(&self.db_pool)
        .await
        .map_err(AppError::Database)?;

        Ok(reviews.into_iter().map(ReviewResponse::from).collect())
    }

    // Wishlist toggle: delete-if-present else insert, in one transaction. The
    // unique (user_id, hostel_id) constraint makes rapid double submissions
    // collapse into a single entry.
    pub async fn toggle_wishlist(
        &self,
        user_id: Uuid,
        hostel_id: Uuid,
    ) -> Result<WishlistStatusResponse, AppError> {
        let mut tx = self.db_pool.begin().await.map_err(AppError::Database)?;

        let removed = sqlx::query(
            "DELETE FROM wishlist WHERE user_id = $1 AND hostel_id = $2",
        )
        .bind(user_id)
        .bind(hostel_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        if removed.rows_affected() > 0 {
            tx.commit().await.map_err(AppError::Database)?;
            return Ok(WishlistStatusResponse {
                hostel_id,
                wishlisted: false,
            });
        }

        let hostel = sqlx::query_as::<_, Hostel>("SELECT * FROM hostels WHERE hostel_id = $1")
            .bind(hostel_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Hostel not found".to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO wishlist (
                entry_id, user_id, hostel_id, hostel_name, hostel_image,
                hostel_location, price_per_night
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id, hostel_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(hostel_id)
        .bind(&hostel.name)
        .bind(hostel.images.first().cloned())
        .bind(&hostel.location)
        .bind(hostel.price_per_night)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;

        Ok(WishlistStatusResponse {
            hostel_id,
            wishlisted: true,
        })
    }

    pub async fn list_wishlist(&self, user_id: Uuid) -> Result<Vec<WishlistEntryResponse>, AppError> {
        let entries = sqlx::query_as::<_, WishlistEntry>(
            "SELECT * FROM wishlist WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await
        .map_err(AppError::Database)?;

        Ok(entries.into_iter().map(WishlistEntryResponse::from).collect())
    }

    pub async fn wishlist_status(
        &self,
        user_id: Uuid,
        hostel_id: Uuid,
    ) -> Result<WishlistStatusResponse, AppError> {
        let wishlisted = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM wishlist WHERE user_id = $1 AND hostel_id = $2)",
        )
        .bind(user_id)
        .bind(hostel_id)
        .fetch_one(&self.db_pool)
        .await
        .map_err(AppError::Database)?;

        Ok(WishlistStatusResponse {
            hostel_id,
            wishlisted,
        })
    }
}
