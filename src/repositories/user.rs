use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use sea_orm::sea_query::{Expr, SelectStatement};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait, Set, SqlErr,
    TransactionTrait,
};

use super::{LockKey, OwnerLocks, Ownership, RepoError, RepoResult};
use crate::entities::{project, task, user};

#[derive(Debug, Clone)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// The only user columns a caller may replace.
#[derive(Debug, Clone)]
pub struct UserPatch {
    pub name: String,
    pub email: String,
}

#[derive(Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
    locks: Arc<OwnerLocks>,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection, locks: Arc<OwnerLocks>) -> Self {
        Self { db, locks }
    }

    /// Inserts a new user. The identity lock covers every writer of
    /// `name`/`email`, so the pre-check cannot go stale before the insert;
    /// the unique indexes stay as the last line.
    pub async fn create(&self, draft: UserDraft) -> RepoResult<user::Model> {
        let password = hash_password(&draft.password)?;

        let _guard = self.locks.acquire(LockKey::Identity).await;
        ensure_identity_free(&self.db, &draft.name, &draft.email, None).await?;

        let now = Utc::now();
        let created = user::ActiveModel {
            name: Set(draft.name),
            email: Set(draft.email),
            password: Set(password),
            last_project_number: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(conflict_on_unique)?;

        tracing::info!(user_id = created.id, name = %created.name, "User created");
        Ok(created)
    }

    /// Checks a name/password pair against the stored argon2 hash.
    pub async fn authenticate(&self, name: &str, password: &str) -> RepoResult<user::Model> {
        let user = match Ownership::new(&self.db).user(name).await {
            Ok(user) => user,
            Err(RepoError::NotFound) => return Err(RepoError::Unauthenticated),
            Err(e) => return Err(e),
        };

        let parsed_hash =
            PasswordHash::new(&user.password).map_err(|e| RepoError::PasswordHash(e.to_string()))?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| RepoError::Unauthenticated)?;

        Ok(user)
    }

    pub async fn find(&self, name: &str) -> RepoResult<user::Model> {
        Ownership::new(&self.db).user(name).await
    }

    pub async fn update(&self, name: &str, patch: UserPatch) -> RepoResult<user::Model> {
        let _guard = self.locks.acquire(LockKey::Identity).await;

        let existing = Ownership::new(&self.db).user(name).await?;
        ensure_identity_free(&self.db, &patch.name, &patch.email, Some(existing.id)).await?;

        let changes = user::ActiveModel {
            name: Set(patch.name),
            email: Set(patch.email),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };

        let txn = self.db.begin().await?;

        let applied = user::Entity::update_many()
            .set(changes)
            .filter(user::Column::Id.eq(existing.id))
            .filter(user::Column::DeletedAt.is_null())
            .exec(&txn)
            .await
            .map_err(conflict_on_unique)?;
        if applied.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        let updated = user::Entity::find_by_id(existing.id)
            .one(&txn)
            .await?
            .ok_or(RepoError::NotFound)?;
        txn.commit().await?;

        tracing::info!(user_id = updated.id, name = %updated.name, "User updated");
        Ok(updated)
    }

    /// Marks the user, then every project it owns, then every task in those
    /// projects as deleted, all in one transaction.
    pub async fn soft_delete(&self, name: &str) -> RepoResult<()> {
        let existing = Ownership::new(&self.db).user(name).await?;
        let now = Utc::now();

        let txn = self.db.begin().await?;

        let marked = user::Entity::update_many()
            .col_expr(user::Column::DeletedAt, Expr::value(now))
            .filter(user::Column::Id.eq(existing.id))
            .filter(user::Column::DeletedAt.is_null())
            .exec(&txn)
            .await?;
        if marked.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        project::Entity::update_many()
            .col_expr(project::Column::DeletedAt, Expr::value(now))
            .filter(project::Column::UserId.eq(existing.id))
            .filter(project::Column::DeletedAt.is_null())
            .exec(&txn)
            .await?;

        task::Entity::update_many()
            .col_expr(task::Column::DeletedAt, Expr::value(now))
            .filter(task::Column::ProjectId.in_subquery(project_ids_of(existing.id)))
            .filter(task::Column::DeletedAt.is_null())
            .exec(&txn)
            .await?;

        txn.commit().await?;

        tracing::info!(user_id = existing.id, "User soft-deleted");
        Ok(())
    }

    /// Owner scope: every user, soft-deleted ones included.
    pub async fn find_all(&self) -> RepoResult<Vec<user::Model>> {
        Ok(user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Owner scope: erases the user with its projects and tasks.
    pub async fn hard_delete(&self, id: i32) -> RepoResult<()> {
        let now = Utc::now();
        let txn = self.db.begin().await?;

        let marked = user::Entity::update_many()
            .col_expr(user::Column::DeletedAt, Expr::value(now))
            .filter(user::Column::Id.eq(id))
            .exec(&txn)
            .await?;
        if marked.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        project::Entity::update_many()
            .col_expr(project::Column::DeletedAt, Expr::value(now))
            .filter(project::Column::UserId.eq(id))
            .exec(&txn)
            .await?;

        task::Entity::delete_many()
            .filter(task::Column::ProjectId.in_subquery(project_ids_of(id)))
            .exec(&txn)
            .await?;
        project::Entity::delete_many()
            .filter(project::Column::UserId.eq(id))
            .exec(&txn)
            .await?;
        user::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        tracing::info!(user_id = id, "User hard-deleted");
        Ok(())
    }
}

fn hash_password(password: &str) -> RepoResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| RepoError::PasswordHash(e.to_string()))
}

/// Fails with `AlreadyExists` when another user, live or soft-deleted, already
/// holds `name` or `email`.
async fn ensure_identity_free<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    email: &str,
    except: Option<i32>,
) -> RepoResult<()> {
    let mut query = user::Entity::find().filter(
        Condition::any()
            .add(user::Column::Name.eq(name))
            .add(user::Column::Email.eq(email)),
    );
    if let Some(id) = except {
        query = query.filter(user::Column::Id.ne(id));
    }

    match query.one(conn).await? {
        Some(_) => Err(RepoError::AlreadyExists),
        None => Ok(()),
    }
}

fn project_ids_of(user_id: i32) -> SelectStatement {
    project::Entity::find()
        .select_only()
        .column(project::Column::Id)
        .filter(project::Column::UserId.eq(user_id))
        .into_query()
}

fn conflict_on_unique(err: DbErr) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => RepoError::AlreadyExists,
        _ => RepoError::Database(err),
    }
}
