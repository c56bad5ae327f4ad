use std::sync::Arc;
use crate::domain::ports::{
    BarRepository, Clock, EventRepository, InstanceRepository, TagRepository,
};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub bar_repo: Arc<dyn BarRepository>,
    pub tag_repo: Arc<dyn TagRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub instance_repo: Arc<dyn InstanceRepository>,
    pub clock: Arc<dyn Clock>,
}
