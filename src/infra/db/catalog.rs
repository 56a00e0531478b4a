use async_trait::async_trait;

use crate::application::repos::{CatalogRepo, RepoError};
use crate::domain::types::ContentKind;

use super::PostgresRepositories;
use super::util::map_sqlx_error;

#[async_trait]
impl CatalogRepo for PostgresRepositories {
    async fn content_exists(
        &self,
        content_id: &str,
        kind: ContentKind,
    ) -> Result<bool, RepoError> {
        let sql = match kind {
            ContentKind::Movie => "SELECT EXISTS (SELECT 1 FROM movies WHERE id = $1)",
            ContentKind::Show => "SELECT EXISTS (SELECT 1 FROM shows WHERE id = $1)",
        };

        sqlx::query_scalar(sql)
            .bind(content_id)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)
    }
}
