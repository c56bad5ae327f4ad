use crate::domain::{models::bar::Bar, ports::BarRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteBarRepo {
    pool: SqlitePool,
}

impl SqliteBarRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BarRepository for SqliteBarRepo {
    async fn create(&self, bar: &Bar) -> Result<Bar, AppError> {
        sqlx::query_as::<_, Bar>(
            "INSERT INTO bars (id, name, address, city, latitude, longitude, description, website, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
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
        sqlx::query_as::<_, Bar>("SELECT * FROM bars WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Bar>, AppError> {
        sqlx::query_as::<_, Bar>("SELECT * FROM bars WHERE is_active = 1 ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, bar: &Bar) -> Result<Bar, AppError> {
        sqlx::query_as::<_, Bar>(
            "UPDATE bars SET name=?, address=?, city=?, latitude=?, longitude=?, description=?, website=?
             WHERE id=?
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
        let result = sqlx::query("UPDATE bars SET is_active = 0 WHERE id = ?")
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
