use time::OffsetDateTime;
use tracing::info;

use crate::domain::entities::MembershipRecord;

use super::service::MyListService;
use super::types::{AddItemCommand, MyListError, ensure_content_id, ensure_owner_id};

impl MyListService {
    /// Save a catalog entry to an owner's list.
    ///
    /// The catalog lookup is a precondition check only; the uniqueness
    /// guarantee comes from the storage-level constraint, which closes the
    /// race between two concurrent adds of the same content.
    pub async fn add_item(
        &self,
        owner_id: &str,
        command: AddItemCommand,
    ) -> Result<MembershipRecord, MyListError> {
        ensure_owner_id(owner_id)?;
        ensure_content_id(&command.content_id)?;

        let exists = self
            .catalog
            .content_exists(&command.content_id, command.content_kind)
            .await?;
        if !exists {
            return Err(MyListError::ContentNotFound {
                content_id: command.content_id,
                kind: command.content_kind,
            });
        }

        let record = self
            .memberships
            .insert_membership(
                owner_id,
                &command.content_id,
                command.content_kind,
                OffsetDateTime::now_utc(),
            )
            .await?;

        info!(
            owner_id,
            content_id = %record.content_id,
            content_kind = %record.content_kind,
            "membership added"
        );
        self.cache.invalidate_owner(owner_id).await;
        Ok(record)
    }

    /// Remove a catalog entry from an owner's list.
    pub async fn remove_item(
        &self,
        owner_id: &str,
        content_id: &str,
    ) -> Result<(), MyListError> {
        ensure_owner_id(owner_id)?;
        ensure_content_id(content_id)?;

        let removed = self
            .memberships
            .delete_membership(owner_id, content_id)
            .await?;
        if !removed {
            return Err(MyListError::MembershipNotFound);
        }

        info!(owner_id, content_id, "membership removed");
        self.cache.invalidate_owner(owner_id).await;
        Ok(())
    }
}
