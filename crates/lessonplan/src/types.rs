use std::sync::Arc;

use crate::config::Config;
use crate::db::UserDbManager;
use crate::store::{CollectionLocks, DocumentStore};
use crate::timetable::Rescheduler;

/// State shared by every request handler.
pub struct AppState {
    /// JSON collections (syllabus, semester, chapters, timetables)
    pub store: Arc<dyn DocumentStore>,
    /// User credentials
    pub users: UserDbManager,
    pub rescheduler: Rescheduler,
    /// Serializes load-modify-save cycles per collection
    pub locks: CollectionLocks,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, users: UserDbManager, config: &Config) -> Self {
        Self {
            store,
            users,
            rescheduler: Rescheduler::new(
                config.reschedule.collision_policy,
                config.reschedule.max_lectures_per_day,
            ),
            locks: CollectionLocks::new(),
        }
    }
}
