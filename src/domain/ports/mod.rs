use crate::domain::models::{
    bar::Bar, event::MasterEvent, instance::EventInstance, tag::Tag,
};
use crate::domain::services::scheduler::SyncPlan;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait BarRepository: Send + Sync {
    async fn create(&self, bar: &Bar) -> Result<Bar, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Bar>, AppError>;
    async fn list(&self) -> Result<Vec<Bar>, AppError>;
    async fn update(&self, bar: &Bar) -> Result<Bar, AppError>;
    async fn deactivate(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn create(&self, tag: &Tag) -> Result<Tag, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Tag>, AppError>;
    async fn exists(&self, id: &str) -> Result<bool, AppError>;
    async fn list(&self) -> Result<Vec<Tag>, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Inserts the master row and all of its generated instances in one
    /// transaction; a failure on any row commits nothing.
    async fn create_with_instances(
        &self,
        event: &MasterEvent,
        instances: &[EventInstance],
    ) -> Result<MasterEvent, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<MasterEvent>, AppError>;
    async fn list_by_bar(&self, bar_id: &str) -> Result<Vec<MasterEvent>, AppError>;
    /// Writes the updated master row and applies every step of the sync
    /// plan inside one transaction; rolls everything back on any failure.
    async fn apply_update(
        &self,
        event: &MasterEvent,
        plan: &SyncPlan,
    ) -> Result<MasterEvent, AppError>;
    async fn deactivate(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait InstanceRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<EventInstance>, AppError>;
    async fn list_by_event(
        &self,
        event_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        include_cancelled: bool,
    ) -> Result<Vec<EventInstance>, AppError>;
    /// Persists an edited instance. Moving it onto a date already taken by
    /// a sibling of the same event fails with the duplicate-occurrence
    /// conflict.
    async fn update(&self, instance: &EventInstance) -> Result<EventInstance, AppError>;
}

/// Source of "today". Captured once per request so every step of one
/// logical operation agrees on where the past ends.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}
