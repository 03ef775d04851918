use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::{LockKey, OwnerLocks, Ownership, RepoError, RepoResult};
use crate::entities::project;
use crate::entities::task::{self, TaskPriority, TaskStatus};

#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: NaiveDate,
}

/// Allow-listed task columns; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct TaskRepository {
    db: DatabaseConnection,
    locks: Arc<OwnerLocks>,
}

impl TaskRepository {
    pub fn new(db: DatabaseConnection, locks: Arc<OwnerLocks>) -> Self {
        Self { db, locks }
    }

    pub async fn create(
        &self,
        user_name: &str,
        project_number: i32,
        draft: TaskDraft,
    ) -> RepoResult<task::Model> {
        let parent = Ownership::new(&self.db)
            .project(user_name, project_number)
            .await?;

        let _guard = self.locks.acquire(LockKey::ProjectTasks(parent.id)).await;
        let txn = self.db.begin().await?;

        let number = claim_task_number(&txn, parent.id).await?;
        let now = Utc::now();

        let created = task::ActiveModel {
            project_id: Set(parent.id),
            number: Set(number),
            title: Set(draft.title),
            description: Set(draft.description),
            status: Set(draft.status),
            priority: Set(draft.priority),
            due_date: Set(draft.due_date),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(
            project_id = parent.id,
            task_id = created.id,
            number = created.number,
            "Task created"
        );
        Ok(created)
    }

    pub async fn find(
        &self,
        user_name: &str,
        project_number: i32,
        task_number: i32,
    ) -> RepoResult<task::Model> {
        Ownership::new(&self.db)
            .task(user_name, project_number, task_number)
            .await
    }

    pub async fn update(
        &self,
        user_name: &str,
        project_number: i32,
        task_number: i32,
        patch: TaskPatch,
    ) -> RepoResult<task::Model> {
        let existing = Ownership::new(&self.db)
            .task(user_name, project_number, task_number)
            .await?;

        let mut changes = task::ActiveModel {
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(title) = patch.title {
            changes.title = Set(title);
        }
        if let Some(description) = patch.description {
            changes.description = Set(description);
        }
        if let Some(status) = patch.status {
            changes.status = Set(status);
        }
        if let Some(priority) = patch.priority {
            changes.priority = Set(priority);
        }
        if let Some(due_date) = patch.due_date {
            changes.due_date = Set(due_date);
        }

        let txn = self.db.begin().await?;

        let applied = task::Entity::update_many()
            .set(changes)
            .filter(task::Column::Id.eq(existing.id))
            .filter(task::Column::DeletedAt.is_null())
            .exec(&txn)
            .await?;
        if applied.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        let updated = task::Entity::find_by_id(existing.id)
            .one(&txn)
            .await?
            .ok_or(RepoError::NotFound)?;
        txn.commit().await?;

        tracing::info!(task_id = updated.id, number = updated.number, "Task updated");
        Ok(updated)
    }

    pub async fn soft_delete(
        &self,
        user_name: &str,
        project_number: i32,
        task_number: i32,
    ) -> RepoResult<()> {
        let existing = Ownership::new(&self.db)
            .task(user_name, project_number, task_number)
            .await?;

        let marked = task::Entity::update_many()
            .col_expr(task::Column::DeletedAt, Expr::value(Utc::now()))
            .filter(task::Column::Id.eq(existing.id))
            .filter(task::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await?;
        if marked.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        tracing::info!(task_id = existing.id, "Task soft-deleted");
        Ok(())
    }

    pub async fn find_all(
        &self,
        user_name: &str,
        project_number: i32,
    ) -> RepoResult<Vec<task::Model>> {
        let parent = Ownership::new(&self.db)
            .project(user_name, project_number)
            .await?;

        Ok(task::Entity::find()
            .filter(task::Column::ProjectId.eq(parent.id))
            .filter(task::Column::DeletedAt.is_null())
            .order_by_asc(task::Column::Number)
            .all(&self.db)
            .await?)
    }

    /// Owner scope: every task, soft-deleted ones included.
    pub async fn find_all_for_owner(&self) -> RepoResult<Vec<task::Model>> {
        Ok(task::Entity::find()
            .order_by_asc(task::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn hard_delete(&self, id: i32) -> RepoResult<()> {
        let deleted = task::Entity::delete_by_id(id).exec(&self.db).await?;
        if deleted.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        tracing::info!(task_id = id, "Task hard-deleted");
        Ok(())
    }
}

async fn claim_task_number<C: ConnectionTrait>(conn: &C, project_id: i32) -> RepoResult<i32> {
    let bumped = project::Entity::update_many()
        .col_expr(
            project::Column::LastTaskNumber,
            Expr::col(project::Column::LastTaskNumber).add(1),
        )
        .filter(project::Column::Id.eq(project_id))
        .filter(project::Column::DeletedAt.is_null())
        .exec(conn)
        .await?;

    if bumped.rows_affected == 0 {
        return Err(RepoError::NotFound);
    }

    project::Entity::find_by_id(project_id)
        .select_only()
        .column(project::Column::LastTaskNumber)
        .into_tuple::<i32>()
        .one(conn)
        .await?
        .ok_or(RepoError::NotFound)
}
