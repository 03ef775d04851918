use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::repositories::{OwnerLocks, ProjectRepository, TaskRepository, UserRepository};

/// Shared by every handler; repositories share one lock registry.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub users: UserRepository,
    pub projects: ProjectRepository,
    pub tasks: TaskRepository,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        let locks = Arc::new(OwnerLocks::new());

        Self {
            users: UserRepository::new(db.clone(), locks.clone()),
            projects: ProjectRepository::new(db.clone(), locks.clone()),
            tasks: TaskRepository::new(db.clone(), locks),
            db,
        }
    }
}
