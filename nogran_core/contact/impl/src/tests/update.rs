use std::time::Duration;

use nogran_core_contact_contracts::{ContactFeatureService, ContactUpdateError};
use nogran_demo::{contact::JOAO, unsaved};
use nogran_models::contact::{ContactMessage, ContactMessageId, FieldViolation};
use nogran_persistence_contracts::{contact::MockContactRepository, MockDatabase};
use nogran_shared_contracts::time::MockTimeService;
use nogran_utils::assert_matches;
use pretty_assertions::assert_eq;

use crate::{tests::Sut, ContactFeatureServiceImpl};

#[tokio::test]
async fn ok() {
    // Arrange
    let id = JOAO.id().unwrap();
    let now = JOAO.submitted_at().unwrap() + Duration::from_secs(24 * 3600);
    let message = unsaved(&JOAO).with_message("Ainda aguardo retorno.");

    let expected = ContactMessage::stored(id, message.validate().unwrap(), now);

    let db = MockDatabase::build(true);

    let time = MockTimeService::new().with_now(now);

    let contact_repo =
        MockContactRepository::new().with_update(id, message.validate().unwrap(), now, true);

    let sut = ContactFeatureServiceImpl {
        db,
        time,
        contact_repo,
    };

    // Act
    let result = sut.update(id, message).await;

    // Assert
    let result = result.unwrap();
    assert_eq!(result, expected);
    assert_eq!(result.id(), JOAO.id());
    assert_ne!(result.submitted_at(), JOAO.submitted_at());
}

#[tokio::test]
async fn keeps_identity() {
    // Arrange
    let id = JOAO.id().unwrap();
    let now = JOAO.submitted_at().unwrap() + Duration::from_secs(60);
    let mut message = unsaved(&JOAO);
    message.set_id(Some(ContactMessageId::new(99)));

    let db = MockDatabase::build(true);

    let time = MockTimeService::new().with_now(now);

    let contact_repo =
        MockContactRepository::new().with_update(id, message.validate().unwrap(), now, true);

    let sut = ContactFeatureServiceImpl {
        db,
        time,
        contact_repo,
    };

    // Act
    let result = sut.update(id, message).await;

    // Assert
    assert_eq!(result.unwrap().id(), Some(id));
}

#[tokio::test]
async fn not_found() {
    // Arrange
    let id = ContactMessageId::new(404);
    let now = JOAO.submitted_at().unwrap();
    let message = unsaved(&JOAO);

    let db = MockDatabase::build(false);

    let time = MockTimeService::new().with_now(now);

    let contact_repo =
        MockContactRepository::new().with_update(id, message.validate().unwrap(), now, false);

    let sut = ContactFeatureServiceImpl {
        db,
        time,
        contact_repo,
    };

    // Act
    let result = sut.update(id, message).await;

    // Assert
    assert_matches!(result, Err(ContactUpdateError::NotFound));
}

#[tokio::test]
async fn invalid_phone() {
    // Arrange
    let message = unsaved(&JOAO).with_phone("123");

    let sut = Sut::default();

    // Act
    let result = sut.update(JOAO.id().unwrap(), message).await;

    // Assert
    assert_matches!(
        result,
        Err(ContactUpdateError::Validation(failure))
            if failure.violations() == [FieldViolation::PHONE_LENGTH]
    );
}
