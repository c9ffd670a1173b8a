use std::future::Future;

use nogran_models::{
    contact::{ContactMessage, ContactMessageFilter, ContactMessageId, ValidationFailure},
    pagination::PaginationSlice,
};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactFeatureService: Send + Sync + 'static {
    /// Validate and store a new contact message.
    ///
    /// The returned message carries the id and timestamp assigned on
    /// persistence. Any id or timestamp set on the input is ignored.
    fn submit(
        &self,
        message: ContactMessage,
    ) -> impl Future<Output = Result<ContactMessage, ContactSubmitError>> + Send;

    /// Return the contact message with the given id.
    fn get(
        &self,
        id: ContactMessageId,
    ) -> impl Future<Output = Result<ContactMessage, ContactGetError>> + Send;

    /// Return all contact messages matching the given filter.
    fn list(
        &self,
        filter: ContactMessageFilter,
        pagination: PaginationSlice,
    ) -> impl Future<Output = anyhow::Result<ContactListResult>> + Send;

    /// Validate and replace the content of an existing contact message.
    ///
    /// Refreshes the timestamp of the message. Its id never changes.
    fn update(
        &self,
        id: ContactMessageId,
        message: ContactMessage,
    ) -> impl Future<Output = Result<ContactMessage, ContactUpdateError>> + Send;

    /// Delete the contact message with the given id.
    fn delete(
        &self,
        id: ContactMessageId,
    ) -> impl Future<Output = Result<(), ContactDeleteError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactListResult {
    pub total: u64,
    pub messages: Vec<ContactMessage>,
}

#[derive(Debug, Error)]
pub enum ContactSubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum ContactGetError {
    #[error("The contact message does not exist.")]
    NotFound,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum ContactUpdateError {
    #[error("The contact message does not exist.")]
    NotFound,
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum ContactDeleteError {
    #[error("The contact message does not exist.")]
    NotFound,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
