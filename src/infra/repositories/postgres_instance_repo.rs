use crate::domain::{models::instance::EventInstance, ports::InstanceRepository};
use crate::error::AppError;
use crate::infra::repositories::duplicate_date_conflict;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

pub struct PostgresInstanceRepo {
    pool: PgPool,
}

impl PostgresInstanceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InstanceRepository for PostgresInstanceRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<EventInstance>, AppError> {
        sqlx::query_as::<_, EventInstance>("SELECT * FROM event_instances WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(
        &self,
        event_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        include_cancelled: bool,
    ) -> Result<Vec<EventInstance>, AppError> {
        let mut sql = String::from("SELECT * FROM event_instances WHERE event_id = $1");
        let mut next_param = 1;
        if from.is_some() {
            next_param += 1;
            sql.push_str(&format!(" AND date >= ${}", next_param));
        }
        if to.is_some() {
            next_param += 1;
            sql.push_str(&format!(" AND date <= ${}", next_param));
        }
        if !include_cancelled {
            sql.push_str(" AND is_cancelled = FALSE");
        }
        sql.push_str(" ORDER BY date ASC");

        let mut query = sqlx::query_as::<_, EventInstance>(&sql).bind(event_id);
        if let Some(from) = from {
            query = query.bind(from);
        }
        if let Some(to) = to {
            query = query.bind(to);
        }

        query.fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, instance: &EventInstance) -> Result<EventInstance, AppError> {
        sqlx::query_as::<_, EventInstance>(
            "UPDATE event_instances SET date=$1, custom_title=$2, custom_description=$3, custom_start_time=$4, custom_end_time=$5, custom_image_url=$6, custom_external_link=$7, custom_tag_id=$8, is_cancelled=$9, crosses_midnight=$10
             WHERE id=$11
             RETURNING *"
        )
            .bind(instance.date)
            .bind(&instance.custom_title).bind(&instance.custom_description)
            .bind(&instance.custom_start_time).bind(&instance.custom_end_time)
            .bind(&instance.custom_image_url).bind(&instance.custom_external_link)
            .bind(&instance.custom_tag_id).bind(instance.is_cancelled)
            .bind(instance.crosses_midnight)
            .bind(&instance.id)
            .fetch_one(&self.pool)
            .await
            .map_err(duplicate_date_conflict)
    }
}
