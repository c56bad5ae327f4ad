use crate::domain::{
    models::{event::MasterEvent, instance::EventInstance},
    ports::EventRepository,
};
use crate::domain::services::scheduler::SyncPlan;
use crate::error::AppError;
use crate::infra::repositories::duplicate_date_conflict;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn insert_instance(
    tx: &mut Transaction<'_, Postgres>,
    instance: &EventInstance,
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO event_instances (id, event_id, date, custom_title, custom_description, custom_start_time, custom_end_time, custom_image_url, custom_external_link, custom_tag_id, is_cancelled, crosses_midnight, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)"
    )
        .bind(&instance.id).bind(&instance.event_id).bind(instance.date)
        .bind(&instance.custom_title).bind(&instance.custom_description)
        .bind(&instance.custom_start_time).bind(&instance.custom_end_time)
        .bind(&instance.custom_image_url).bind(&instance.custom_external_link)
        .bind(&instance.custom_tag_id).bind(instance.is_cancelled)
        .bind(instance.crosses_midnight).bind(instance.created_at)
        .execute(&mut **tx)
        .await
        .map_err(duplicate_date_conflict)?;
    Ok(())
}

#[async_trait]
impl EventRepository for PostgresEventRepo {
    async fn create_with_instances(
        &self,
        event: &MasterEvent,
        instances: &[EventInstance],
    ) -> Result<MasterEvent, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, MasterEvent>(
            "INSERT INTO events (id, bar_id, title, description, image_url, external_link, event_tag_id, start_time, end_time, crosses_midnight, pattern, weekdays, start_date, end_date, max_occurrences, is_active, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
             RETURNING *"
        )
            .bind(&event.id).bind(&event.bar_id).bind(&event.title).bind(&event.description)
            .bind(&event.image_url).bind(&event.external_link).bind(&event.event_tag_id)
            .bind(&event.start_time).bind(&event.end_time).bind(event.crosses_midnight)
            .bind(&event.pattern).bind(&event.weekdays).bind(event.start_date)
            .bind(event.end_date).bind(event.max_occurrences).bind(event.is_active)
            .bind(event.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        for instance in instances {
            insert_instance(&mut tx, instance).await?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<MasterEvent>, AppError> {
        sqlx::query_as::<_, MasterEvent>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_bar(&self, bar_id: &str) -> Result<Vec<MasterEvent>, AppError> {
        sqlx::query_as::<_, MasterEvent>(
            "SELECT * FROM events WHERE bar_id = $1 AND is_active = TRUE ORDER BY created_at ASC"
        )
            .bind(bar_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn apply_update(
        &self,
        event: &MasterEvent,
        plan: &SyncPlan,
    ) -> Result<MasterEvent, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let updated = sqlx::query_as::<_, MasterEvent>(
            "UPDATE events SET title=$1, description=$2, image_url=$3, external_link=$4, event_tag_id=$5, start_time=$6, end_time=$7, crosses_midnight=$8, pattern=$9, weekdays=$10, start_date=$11, end_date=$12, max_occurrences=$13
             WHERE id=$14
             RETURNING *"
        )
            .bind(&event.title).bind(&event.description).bind(&event.image_url)
            .bind(&event.external_link).bind(&event.event_tag_id).bind(&event.start_time)
            .bind(&event.end_time).bind(event.crosses_midnight).bind(&event.pattern)
            .bind(&event.weekdays).bind(event.start_date).bind(event.end_date)
            .bind(event.max_occurrences)
            .bind(&event.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        if let Some(instances) = &plan.regenerated {
            sqlx::query("DELETE FROM event_instances WHERE event_id = $1 AND date >= $2")
                .bind(&event.id)
                .bind(plan.today)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;

            for instance in instances {
                insert_instance(&mut tx, instance).await?;
            }
        }

        for field in &plan.reset_fields {
            let sql = format!(
                "UPDATE event_instances SET {} = NULL WHERE event_id = $1 AND date >= $2",
                field.column()
            );
            sqlx::query(&sql)
                .bind(&event.id)
                .bind(plan.today)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        if let Some(cancelled) = plan.set_cancelled {
            sqlx::query(
                "UPDATE event_instances SET is_cancelled = $1 WHERE event_id = $2 AND date >= $3"
            )
                .bind(cancelled)
                .bind(&event.id)
                .bind(plan.today)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        if let Some(crossing) = plan.recompute_crossing {
            sqlx::query(
                "UPDATE event_instances SET crosses_midnight = $1
                 WHERE event_id = $2 AND date >= $3 AND custom_start_time IS NULL AND custom_end_time IS NULL"
            )
                .bind(crossing)
                .bind(&event.id)
                .bind(plan.today)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn deactivate(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE events SET is_active = FALSE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Event not found".into()));
        }
        Ok(())
    }
}
