use crate::domain::{models::bar::Bar, ports::BarRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresBarRepo {
    pool: PgPool,
}

impl PostgresBarRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BarRepository for PostgresBarRepo {
    async fn create(&self, bar: &Bar) -> Result<Bar, AppError> {
        sqlx::query_as::<_, Bar>(
            "INSERT INTO bars (id, name, address, city, latitude, longitude, description, website, is_active, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING *"
        )
            .bind(&bar.id).bind(&bar.name).bind(&bar.address).bind(&bar.city)
            .bind(bar.latitude).bind(bar.longitude).bind(&bar.description).bind(&bar.website)
            .bind(bar.is_active).bind(bar.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Bar>, AppError> {
        sqlx::query_as::<_, Bar>("SELECT * FROM bars WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Bar>, AppError> {
        sqlx::query_as::<_, Bar>("SELECT * FROM bars WHERE is_active = TRUE ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, bar: &Bar) -> Result<Bar, AppError> {
        sqlx::query_as::<_, Bar>(
            "UPDATE bars SET name=$1, address=$2, city=$3, latitude=$4, longitude=$5, description=$6, website=$7
             WHERE id=$8
             RETURNING *"
        )
            .bind(&bar.name).bind(&bar.address).bind(&bar.city)
            .bind(bar.latitude).bind(bar.longitude).bind(&bar.description).bind(&bar.website)
            .bind(&bar.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn deactivate(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE bars SET is_active = FALSE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Bar not found".into()));
        }
        Ok(())
    }
}
