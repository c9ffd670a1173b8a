use anyhow::Context;
use nogran_core_contact_contracts::{
    ContactDeleteError, ContactFeatureService, ContactGetError, ContactListResult,
    ContactSubmitError, ContactUpdateError,
};
use nogran_models::{
    contact::{ContactMessage, ContactMessageFilter, ContactMessageId},
    pagination::PaginationSlice,
};
use nogran_persistence_contracts::{contact::ContactRepository, Database, Transaction};
use nogran_shared_contracts::time::TimeService;
use nogran_utils::trace_instrument;
use tracing::info;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Default))]
pub struct ContactFeatureServiceImpl<Db, Time, ContactRepo> {
    pub db: Db,
    pub time: Time,
    pub contact_repo: ContactRepo,
}

impl<Db, Time, ContactRepo> ContactFeatureService
    for ContactFeatureServiceImpl<Db, Time, ContactRepo>
where
    Db: Database,
    Time: TimeService,
    ContactRepo: ContactRepository<Db::Transaction>,
{
    #[trace_instrument(skip(self))]
    async fn submit(&self, message: ContactMessage) -> Result<ContactMessage, ContactSubmitError> {
        let form = message.validate()?;

        let mut txn = self.db.begin_transaction().await?;

        let submitted_at = self.time.now();
        let id = self
            .contact_repo
            .create(&mut txn, &form, submitted_at)
            .await
            .context("Failed to store contact message")?;

        txn.commit().await?;

        info!(%id, "contact message submitted");

        Ok(ContactMessage::stored(id, form, submitted_at))
    }

    #[trace_instrument(skip(self))]
    async fn get(&self, id: ContactMessageId) -> Result<ContactMessage, ContactGetError> {
        let mut txn = self.db.begin_transaction().await?;

        self.contact_repo
            .get(&mut txn, id)
            .await
            .context("Failed to get contact message from database")?
            .ok_or(ContactGetError::NotFound)
    }

    #[trace_instrument(skip(self))]
    async fn list(
        &self,
        filter: ContactMessageFilter,
        pagination: PaginationSlice,
    ) -> anyhow::Result<ContactListResult> {
        let mut txn = self.db.begin_transaction().await?;

        let total = self
            .contact_repo
            .count(&mut txn, &filter)
            .await
            .context("Failed to count contact messages")?;

        let messages = self
            .contact_repo
            .list(&mut txn, &filter, pagination)
            .await
            .context("Failed to get contact messages from database")?;

        Ok(ContactListResult { total, messages })
    }

    #[trace_instrument(skip(self))]
    async fn update(
        &self,
        id: ContactMessageId,
        message: ContactMessage,
    ) -> Result<ContactMessage, ContactUpdateError> {
        let form = message.validate()?;

        let mut txn = self.db.begin_transaction().await?;

        let submitted_at = self.time.now();
        let updated = self
            .contact_repo
            .update(&mut txn, id, &form, submitted_at)
            .await
            .context("Failed to update contact message")?;
        if !updated {
            return Err(ContactUpdateError::NotFound);
        }

        txn.commit().await?;

        info!(%id, "contact message updated");

        Ok(ContactMessage::stored(id, form, submitted_at))
    }

    #[trace_instrument(skip(self))]
    async fn delete(&self, id: ContactMessageId) -> Result<(), ContactDeleteError> {
        let mut txn = self.db.begin_transaction().await?;

        let deleted = self
            .contact_repo
            .delete(&mut txn, id)
            .await
            .context("Failed to delete contact message")?;
        if !deleted {
            return Err(ContactDeleteError::NotFound);
        }

        txn.commit().await?;

        info!(%id, "contact message deleted");

        Ok(())
    }
}
