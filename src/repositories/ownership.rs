use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, JoinType, QueryFilter, QuerySelect, RelationTrait,
};

use super::{RepoError, RepoResult};
use crate::entities::{project, task, user};

/// Resolves public identifiers (user name, project number, task number) into
/// live rows, walking the foreign-key chain on every call.
pub struct Ownership<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> Ownership<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn user(&self, name: &str) -> RepoResult<user::Model> {
        user::Entity::find()
            .filter(user::Column::Name.eq(name))
            .filter(user::Column::DeletedAt.is_null())
            .one(self.conn)
            .await?
            .ok_or(RepoError::NotFound)
    }

    pub async fn project(&self, name: &str, number: i32) -> RepoResult<project::Model> {
        project::Entity::find()
            .join(JoinType::InnerJoin, project::Relation::User.def())
            .filter(user::Column::Name.eq(name))
            .filter(user::Column::DeletedAt.is_null())
            .filter(project::Column::Number.eq(number))
            .filter(project::Column::DeletedAt.is_null())
            .one(self.conn)
            .await?
            .ok_or(RepoError::NotFound)
    }

    pub async fn task(
        &self,
        name: &str,
        project_number: i32,
        task_number: i32,
    ) -> RepoResult<task::Model> {
        task::Entity::find()
            .join(JoinType::InnerJoin, task::Relation::Project.def())
            .join(JoinType::InnerJoin, project::Relation::User.def())
            .filter(user::Column::Name.eq(name))
            .filter(user::Column::DeletedAt.is_null())
            .filter(project::Column::Number.eq(project_number))
            .filter(project::Column::DeletedAt.is_null())
            .filter(task::Column::Number.eq(task_number))
            .filter(task::Column::DeletedAt.is_null())
            .one(self.conn)
            .await?
            .ok_or(RepoError::NotFound)
    }
}
