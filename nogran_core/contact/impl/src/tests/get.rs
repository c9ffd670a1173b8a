use nogran_core_contact_contracts::{ContactFeatureService, ContactGetError};
use nogran_demo::contact::JOAO;
use nogran_models::contact::ContactMessageId;
use nogran_persistence_contracts::{contact::MockContactRepository, MockDatabase};
use nogran_utils::assert_matches;
use pretty_assertions::assert_eq;

use crate::{tests::Sut, ContactFeatureServiceImpl};

#[tokio::test]
async fn ok() {
    // Arrange
    let db = MockDatabase::build(false);

    let contact_repo =
        MockContactRepository::new().with_get(JOAO.id().unwrap(), Some(JOAO.clone()));

    let sut = ContactFeatureServiceImpl {
        db,
        contact_repo,
        ..Sut::default()
    };

    // Act
    let result = sut.get(JOAO.id().unwrap()).await;

    // Assert
    assert_eq!(result.unwrap(), *JOAO);
}

#[tokio::test]
async fn not_found() {
    // Arrange
    let id = ContactMessageId::new(404);

    let db = MockDatabase::build(false);

    let contact_repo = MockContactRepository::new().with_get(id, None);

    let sut = ContactFeatureServiceImpl {
        db,
        contact_repo,
        ..Sut::default()
    };

    // Act
    let result = sut.get(id).await;

    // Assert
    assert_matches!(result, Err(ContactGetError::NotFound));
}
