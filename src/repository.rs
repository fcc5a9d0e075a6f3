use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryOrder, QuerySelect, Set,
};

use crate::{
    entities::movie,
    models::{MovieInput, Page, RECENT_LIMIT},
};

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Db(#[from] DbErr),
    #[error("movie {0} not found")]
    NotFound(i32),
}

pub type RepoResult<T> = Result<T, RepoError>;

/// CRUD over the `movie` table.
#[derive(Clone, Debug)]
pub struct MovieRepository {
    db: DatabaseConnection,
}

impl MovieRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: MovieInput) -> RepoResult<movie::Model> {
        let model = movie::ActiveModel {
            id: Default::default(),
            title: Set(input.title),
            kind: Set(input.kind),
            director: Set(input.director),
            budget: Set(input.budget),
            location: Set(input.location),
            duration: Set(input.duration),
            year_time: Set(input.year_time),
            image_url: Set(input.image_url),
            created_at: Set(now_ms()),
        };
        Ok(model.insert(&self.db).await?)
    }

    /// Newest identity first.
    pub async fn list(&self, page: Page) -> RepoResult<Vec<movie::Model>> {
        let movies = movie::Entity::find()
            .order_by_desc(movie::Column::Id)
            .offset(page.skip)
            .limit(page.take)
            .all(&self.db)
            .await?;
        Ok(movies)
    }

    pub async fn get(&self, id: i32) -> RepoResult<Option<movie::Model>> {
        Ok(movie::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Overwrites every editable column; an absent image URL clears the stored one.
    pub async fn update(&self, id: i32, input: MovieInput) -> RepoResult<movie::Model> {
        let existing = self.get(id).await?.ok_or(RepoError::NotFound(id))?;

        let mut model = existing.into_active_model();
        model.title = Set(input.title);
        model.kind = Set(input.kind);
        model.director = Set(input.director);
        model.budget = Set(input.budget);
        model.location = Set(input.location);
        model.duration = Set(input.duration);
        model.year_time = Set(input.year_time);
        model.image_url = Set(input.image_url);

        Ok(model.update(&self.db).await?)
    }

    pub async fn delete(&self, id: i32) -> RepoResult<()> {
        let res = movie::Entity::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    pub async fn count(&self) -> RepoResult<u64> {
        Ok(movie::Entity::find().count(&self.db).await?)
    }

    /// Most recently created first; ties on the millisecond fall back to identity.
    pub async fn recent(&self) -> RepoResult<Vec<movie::Model>> {
        let movies = movie::Entity::find()
            .order_by_desc(movie::Column::CreatedAt)
            .order_by_desc(movie::Column::Id)
            .limit(RECENT_LIMIT)
            .all(&self.db)
            .await?;
        Ok(movies)
    }
}

fn now_ms() -> i64 {
    jiff::Timestamp::now().as_millisecond()
}
