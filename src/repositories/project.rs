use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::{LockKey, OwnerLocks, Ownership, RepoError, RepoResult};
use crate::entities::project::{self, ProjectStatus};
use crate::entities::{task, user};

#[derive(Debug, Clone)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub platform: String,
    pub client: String,
    pub estimated_fee: f64,
    pub status: ProjectStatus,
    pub deadline: NaiveDate,
}

/// Allow-listed project columns; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub platform: Option<String>,
    pub client: Option<String>,
    pub estimated_fee: Option<f64>,
    pub status: Option<ProjectStatus>,
    pub deadline: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct ProjectRepository {
    db: DatabaseConnection,
    locks: Arc<OwnerLocks>,
}

impl ProjectRepository {
    pub fn new(db: DatabaseConnection, locks: Arc<OwnerLocks>) -> Self {
        Self { db, locks }
    }

    /// Creates a project under `user_name` with the next per-user number.
    pub async fn create(&self, user_name: &str, draft: ProjectDraft) -> RepoResult<project::Model> {
        let owner = Ownership::new(&self.db).user(user_name).await?;

        let _guard = self.locks.acquire(LockKey::UserProjects(owner.id)).await;
        let txn = self.db.begin().await?;

        let number = claim_project_number(&txn, owner.id).await?;
        let now = Utc::now();

        let created = project::ActiveModel {
            user_id: Set(owner.id),
            number: Set(number),
            title: Set(draft.title),
            description: Set(draft.description),
            platform: Set(draft.platform),
            client: Set(draft.client),
            estimated_fee: Set(draft.estimated_fee),
            status: Set(draft.status),
            deadline: Set(draft.deadline),
            last_task_number: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(
            user_id = owner.id,
            project_id = created.id,
            number = created.number,
            "Project created"
        );
        Ok(created)
    }

    pub async fn find(&self, user_name: &str, number: i32) -> RepoResult<project::Model> {
        Ownership::new(&self.db).project(user_name, number).await
    }

    pub async fn update(
        &self,
        user_name: &str,
        number: i32,
        patch: ProjectPatch,
    ) -> RepoResult<project::Model> {
        let existing = Ownership::new(&self.db).project(user_name, number).await?;

        let mut changes = project::ActiveModel {
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(title) = patch.title {
            changes.title = Set(title);
        }
        if let Some(description) = patch.description {
            changes.description = Set(description);
        }
        if let Some(platform) = patch.platform {
            changes.platform = Set(platform);
        }
        if let Some(client) = patch.client {
            changes.client = Set(client);
        }
        if let Some(fee) = patch.estimated_fee {
            changes.estimated_fee = Set(fee);
        }
        if let Some(status) = patch.status {
            changes.status = Set(status);
        }
        if let Some(deadline) = patch.deadline {
            changes.deadline = Set(deadline);
        }

        let txn = self.db.begin().await?;

        let applied = project::Entity::update_many()
            .set(changes)
            .filter(project::Column::Id.eq(existing.id))
            .filter(project::Column::DeletedAt.is_null())
            .exec(&txn)
            .await?;
        if applied.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        let updated = project::Entity::find_by_id(existing.id)
            .one(&txn)
            .await?
            .ok_or(RepoError::NotFound)?;
        txn.commit().await?;

        tracing::info!(project_id = updated.id, number = updated.number, "Project updated");
        Ok(updated)
    }

    /// Marks the project, then its live tasks, as deleted in one transaction.
    pub async fn soft_delete(&self, user_name: &str, number: i32) -> RepoResult<()> {
        let existing = Ownership::new(&self.db).project(user_name, number).await?;
        let now = Utc::now();

        let txn = self.db.begin().await?;

        let marked = project::Entity::update_many()
            .col_expr(project::Column::DeletedAt, Expr::value(now))
            .filter(project::Column::Id.eq(existing.id))
            .filter(project::Column::DeletedAt.is_null())
            .exec(&txn)
            .await?;
        if marked.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        task::Entity::update_many()
            .col_expr(task::Column::DeletedAt, Expr::value(now))
            .filter(task::Column::ProjectId.eq(existing.id))
            .filter(task::Column::DeletedAt.is_null())
            .exec(&txn)
            .await?;

        txn.commit().await?;

        tracing::info!(project_id = existing.id, "Project soft-deleted");
        Ok(())
    }

    pub async fn find_all(&self, user_name: &str) -> RepoResult<Vec<project::Model>> {
        let owner = Ownership::new(&self.db).user(user_name).await?;

        Ok(project::Entity::find()
            .filter(project::Column::UserId.eq(owner.id))
            .filter(project::Column::DeletedAt.is_null())
            .order_by_asc(project::Column::Number)
            .all(&self.db)
            .await?)
    }

    /// Owner scope: every project of every user, soft-deleted ones included.
    pub async fn find_all_for_owner(&self) -> RepoResult<Vec<project::Model>> {
        Ok(project::Entity::find()
            .order_by_asc(project::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Owner scope: erases the project and its tasks by internal id.
    ///
    /// The project is marked first so a concurrent task create finds it gone
    /// instead of inserting under a row that is about to vanish.
    pub async fn hard_delete(&self, id: i32) -> RepoResult<()> {
        let txn = self.db.begin().await?;

        let marked = project::Entity::update_many()
            .col_expr(project::Column::DeletedAt, Expr::value(Utc::now()))
            .filter(project::Column::Id.eq(id))
            .exec(&txn)
            .await?;
        if marked.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        task::Entity::delete_many()
            .filter(task::Column::ProjectId.eq(id))
            .exec(&txn)
            .await?;
        project::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        tracing::info!(project_id = id, "Project hard-deleted");
        Ok(())
    }
}

/// Bumps the owner's project counter and returns the new value.
///
/// Fails with `NotFound` when the user vanished or was soft-deleted after it
/// was resolved.
async fn claim_project_number<C: ConnectionTrait>(conn: &C, user_id: i32) -> RepoResult<i32> {
    let bumped = user::Entity::update_many()
        .col_expr(
            user::Column::LastProjectNumber,
            Expr::col(user::Column::LastProjectNumber).add(1),
        )
        .filter(user::Column::Id.eq(user_id))
        .filter(user::Column::DeletedAt.is_null())
        .exec(conn)
        .await?;

    if bumped.rows_affected == 0 {
        return Err(RepoError::NotFound);
    }

    user::Entity::find_by_id(user_id)
        .select_only()
        .column(user::Column::LastProjectNumber)
        .into_tuple::<i32>()
        .one(conn)
        .await?
        .ok_or(RepoError::NotFound)
}
