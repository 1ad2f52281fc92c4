use super::{DbError, Repository};
use crate::models::{Actor, ActorPatch, NewActor};
use async_trait::async_trait;
use sqlx::SqlitePool;

/// Actors stored in the `actors` table
#[derive(Debug, Clone)]
pub struct SqliteActorRepository {
    pool: SqlitePool,
}

impl SqliteActorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Actor, NewActor, ActorPatch> for SqliteActorRepository {
    async fn list(&self) -> Result<Vec<Actor>, DbError> {
        let actors = sqlx::query_as::<_, Actor>("SELECT id, name, age, gender FROM actors ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(actors)
    }

    async fn get(&self, id: i64) -> Result<Option<Actor>, DbError> {
        let actor =
            sqlx::query_as::<_, Actor>("SELECT id, name, age, gender FROM actors WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(actor)
    }

    async fn insert(&self, actor: NewActor) -> Result<i64, DbError> {
        let result = sqlx::query("INSERT INTO actors (name, age, gender) VALUES (?, ?, ?)")
            .bind(actor.name)
            .bind(actor.age)
            .bind(actor.gender)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    async fn update(&self, id: i64, patch: ActorPatch) -> Result<bool, DbError> {
        let result = sqlx::query(
            "UPDATE actors SET \
                name = COALESCE(?, name), \
                age = COALESCE(?, age), \
                gender = COALESCE(?, gender) \
             WHERE id = ?",
        )
        .bind(patch.name)
        .bind(patch.age)
        .bind(patch.gender)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM actors WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn actor(name: &str, age: i64) -> NewActor {
        NewActor {
            name: name.to_string(),
            age,
            gender: "F".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_list_in_id_order() {
        let repo = Database::in_memory().await.actors();

        let first = repo.insert(actor("Meryl Streep", 75)).await.unwrap();
        let second = repo.insert(actor("Viola Davis", 59)).await.unwrap();
        assert!(first > 0);
        assert!(second > first);

        let actors = repo.list().await.unwrap();
        assert_eq!(
            actors.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![first, second]
        );
        assert_eq!(actors[0].name, "Meryl Streep");
    }

    #[tokio::test]
    async fn test_partial_update() {
        let repo = Database::in_memory().await.actors();
        let id = repo.insert(actor("Meryl Streep", 75)).await.unwrap();

        let patch = ActorPatch {
            age: Some(76),
            ..Default::default()
        };
        assert!(repo.update(id, patch).await.unwrap());

        let stored = repo.get(id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Meryl Streep");
        assert_eq!(stored.age, 76);
        assert_eq!(stored.gender, "F");
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_row() {
        let repo = Database::in_memory().await.actors();

        assert!(!repo.update(42, ActorPatch::default()).await.unwrap());
        assert!(!repo.delete(42).await.unwrap());
        assert_eq!(repo.get(42).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = Database::in_memory().await.actors();
        let id = repo.insert(actor("Viola Davis", 59)).await.unwrap();

        assert!(repo.delete(id).await.unwrap());
        assert_eq!(repo.get(id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_non_positive_age_violates_schema() {
        let repo = Database::in_memory().await.actors();
        assert!(repo.insert(actor("Nobody", 0)).await.is_err());
    }
}
