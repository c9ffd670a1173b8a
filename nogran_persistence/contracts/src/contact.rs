use std::future::Future;

use chrono::{DateTime, Utc};
use nogran_models::{
    contact::{ContactForm, ContactMessage, ContactMessageFilter, ContactMessageId},
    pagination::PaginationSlice,
};

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactRepository<Txn: Send + Sync + 'static>: Send + Sync + 'static {
    /// Return the total number of contact messages matching the given filter.
    fn count(
        &self,
        txn: &mut Txn,
        filter: &ContactMessageFilter,
    ) -> impl Future<Output = anyhow::Result<u64>> + Send;

    /// Return all contact messages matching the given filter, ordered by id.
    fn list(
        &self,
        txn: &mut Txn,
        filter: &ContactMessageFilter,
        pagination: PaginationSlice,
    ) -> impl Future<Output = anyhow::Result<Vec<ContactMessage>>> + Send;

    /// Return the contact message with the given id.
    fn get(
        &self,
        txn: &mut Txn,
        id: ContactMessageId,
    ) -> impl Future<Output = anyhow::Result<Option<ContactMessage>>> + Send;

    /// Store a new contact message.
    ///
    /// Returns the id generated by the database.
    fn create(
        &self,
        txn: &mut Txn,
        form: &ContactForm,
        submitted_at: DateTime<Utc>,
    ) -> impl Future<Output = anyhow::Result<ContactMessageId>> + Send;

    /// Replace the content of an existing contact message.
    ///
    /// Returns `false` if no message with the given id exists.
    fn update(
        &self,
        txn: &mut Txn,
        id: ContactMessageId,
        form: &ContactForm,
        submitted_at: DateTime<Utc>,
    ) -> impl Future<Output = anyhow::Result<bool>> + Send;

    /// Delete the contact message with the given id.
    fn delete(
        &self,
        txn: &mut Txn,
        id: ContactMessageId,
    ) -> impl Future<Output = anyhow::Result<bool>> + Send;
}

#[cfg(feature = "mock")]
impl<Txn: Send + Sync + 'static> MockContactRepository<Txn> {
    pub fn with_count(mut self, filter: ContactMessageFilter, result: u64) -> Self {
        self.expect_count()
            .once()
            .with(mockall::predicate::always(), mockall::predicate::eq(filter))
            .return_once(move |_, _| Box::pin(std::future::ready(Ok(result))));
        self
    }

    pub fn with_list(
        mut self,
        filter: ContactMessageFilter,
        pagination: PaginationSlice,
        result: Vec<ContactMessage>,
    ) -> Self {
        self.expect_list()
            .once()
            .with(
                mockall::predicate::always(),
                mockall::predicate::eq(filter),
                mockall::predicate::eq(pagination),
            )
            .return_once(|_, _, _| Box::pin(std::future::ready(Ok(result))));
        self
    }

    pub fn with_get(mut self, id: ContactMessageId, result: Option<ContactMessage>) -> Self {
        self.expect_get()
            .once()
            .with(mockall::predicate::always(), mockall::predicate::eq(id))
            .return_once(|_, _| Box::pin(std::future::ready(Ok(result))));
        self
    }

    pub fn with_create(
        mut self,
        form: ContactForm,
        submitted_at: DateTime<Utc>,
        result: ContactMessageId,
    ) -> Self {
        self.expect_create()
            .once()
            .with(
                mockall::predicate::always(),
                mockall::predicate::eq(form),
                mockall::predicate::eq(submitted_at),
            )
            .return_once(move |_, _, _| Box::pin(std::future::ready(Ok(result))));
        self
    }

    pub fn with_update(
        mut self,
        id: ContactMessageId,
        form: ContactForm,
        submitted_at: DateTime<Utc>,
        result: bool,
    ) -> Self {
        self.expect_update()
            .once()
            .with(
                mockall::predicate::always(),
                mockall::predicate::eq(id),
                mockall::predicate::eq(form),
                mockall::predicate::eq(submitted_at),
            )
            .return_once(move |_, _, _, _| Box::pin(std::future::ready(Ok(result))));
        self
    }

    pub fn with_delete(mut self, id: ContactMessageId, result: bool) -> Self {
        self.expect_delete()
            .once()
            .with(mockall::predicate::always(), mockall::predicate::eq(id))
            .return_once(move |_, _| Box::pin(std::future::ready(Ok(result))));
        self
    }
}
