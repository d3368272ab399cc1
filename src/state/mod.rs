pub mod course;
pub mod field;
pub mod ids;
pub mod player;
pub mod rank;
pub mod scorecard;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    config::AppConfig,
    dao::{fallback_queue::FallbackQueue, gateway::PersistenceGateway},
    services::save_coordinator::SaveCoordinator,
};

use self::{course::Course, ids::UserspaceId, scorecard::ScorecardAggregate};

pub type SharedState = Arc<AppState>;

/// Central application state: open userspace, course catalog, active scorecard and the
/// persistence handles.
pub struct AppState {
    config: AppConfig,
    gateway: Arc<dyn PersistenceGateway>,
    saver: SaveCoordinator,
    userspace: RwLock<Option<UserspaceId>>,
    courses: RwLock<Vec<Course>>,
    scorecard: RwLock<Option<ScorecardAggregate>>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: AppConfig, gateway: Arc<dyn PersistenceGateway>) -> SharedState {
        let queue = FallbackQueue::new(config.queue_dir(), config.queue_base_key());
        let saver = SaveCoordinator::new(gateway.clone(), queue, config.retry_interval());
        Arc::new(Self {
            config,
            gateway,
            saver,
            userspace: RwLock::new(None),
            courses: RwLock::new(Vec::new()),
            scorecard: RwLock::new(None),
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Remote document store.
    pub fn gateway(&self) -> &Arc<dyn PersistenceGateway> {
        &self.gateway
    }

    /// Save pipeline shared by every request.
    pub fn saver(&self) -> &SaveCoordinator {
        &self.saver
    }

    /// Userspace opened by the last passphrase, if any.
    pub fn userspace(&self) -> &RwLock<Option<UserspaceId>> {
        &self.userspace
    }

    /// Course catalog of the open userspace.
    pub fn courses(&self) -> &RwLock<Vec<Course>> {
        &self.courses
    }

    /// Scorecard currently being edited.
    pub fn scorecard(&self) -> &RwLock<Option<ScorecardAggregate>> {
        &self.scorecard
    }
}
