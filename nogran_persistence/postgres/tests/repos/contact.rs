use std::{sync::LazyLock, time::Duration};

use nogran_demo::{
    contact::{ALL_CONTACT_MESSAGES, ANA, JOAO, MARIA},
    unsaved,
};
use nogran_models::contact::{ContactMessage, ContactMessageFilter, ContactMessageId};
use nogran_persistence_contracts::{contact::ContactRepository, Database, Transaction};
use nogran_persistence_postgres::contact::PostgresContactRepository;
use pretty_assertions::assert_eq;

use crate::{common::setup, make_slice, sliced};

const REPO: PostgresContactRepository = PostgresContactRepository;

macro_rules! filter {
    ($($key:ident: $value:expr),* $(,)?) => {
        ContactMessageFilter {
            $( $key: Some(TryFrom::try_from($value).unwrap()), )*
            ..Default::default()
        }
    };
}

static FILTER_TESTS: LazyLock<Vec<(ContactMessageFilter, Vec<&ContactMessage>)>> =
    LazyLock::new(|| {
        vec![
            (filter!(), ALL_CONTACT_MESSAGES.clone()),
            (filter!(name: "maria"), vec![&MARIA, &ANA]),
            (filter!(name: "MARIA S"), vec![&MARIA, &ANA]),
            (filter!(name: "MARIA SI"), vec![&MARIA]),
            (filter!(name: "joão"), vec![&JOAO]),
            (filter!(name: "does not exist"), vec![]),
            (filter!(email: "EXAMPLE.com"), vec![&MARIA, &ANA]),
            (filter!(email: "pereira@"), vec![&JOAO]),
            (filter!(name: "maria", email: "ana@"), vec![&ANA]),
            (filter!(name: "%"), vec![]),
        ]
    });

#[tokio::test]
async fn count() {
    let db = setup().await;
    let mut txn = db.begin_transaction().await.unwrap();

    for (filter, expected) in &*FILTER_TESTS {
        let count = REPO.count(&mut txn, filter).await.unwrap();
        assert_eq!(count, expected.len() as u64, "{filter:?}");
    }
}

#[tokio::test]
async fn list() {
    let db = setup().await;
    let mut txn = db.begin_transaction().await.unwrap();

    for (filter, expected) in &*FILTER_TESTS {
        for (limit, offset) in [(100, 0), (2, 0), (2, 1), (1, 2), (5, 7)] {
            let slice = make_slice(limit, offset);
            let result = REPO.list(&mut txn, filter, slice).await.unwrap();
            assert_eq!(
                &result.iter().collect::<Vec<_>>(),
                sliced(expected, slice),
                "{filter:?} {slice:?}"
            );
        }
    }
}

#[tokio::test]
async fn get() {
    let db = setup().await;
    let mut txn = db.begin_transaction().await.unwrap();

    for &message in &*ALL_CONTACT_MESSAGES {
        let result = REPO.get(&mut txn, message.id().unwrap()).await.unwrap();
        assert_eq!(result.as_ref(), Some(message));
    }

    let result = REPO.get(&mut txn, ContactMessageId::new(404)).await.unwrap();
    assert_eq!(result, None);
}

#[tokio::test]
async fn create() {
    let db = setup().await;
    let mut txn = db.begin_transaction().await.unwrap();

    let message = unsaved(&JOAO).with_name("Outra Pessoa");
    let form = message.validate().unwrap();
    let submitted_at = JOAO.submitted_at().unwrap() + Duration::from_secs(42);

    let id = REPO.create(&mut txn, &form, submitted_at).await.unwrap();
    assert_eq!(id, ContactMessageId::new(4));

    let result = REPO.get(&mut txn, id).await.unwrap();
    assert_eq!(
        result,
        Some(ContactMessage::stored(id, form, submitted_at))
    );
}

#[tokio::test]
async fn create_is_transactional() {
    let db = setup().await;

    let mut txn = db.begin_transaction().await.unwrap();
    let form = unsaved(&MARIA).validate().unwrap();
    let id = REPO
        .create(&mut txn, &form, MARIA.submitted_at().unwrap())
        .await
        .unwrap();
    txn.rollback().await.unwrap();

    let mut txn = db.begin_transaction().await.unwrap();
    assert_eq!(REPO.get(&mut txn, id).await.unwrap(), None);
    assert_eq!(
        REPO.count(&mut txn, &Default::default()).await.unwrap(),
        ALL_CONTACT_MESSAGES.len() as u64
    );
}

#[tokio::test]
async fn update() {
    let db = setup().await;
    let mut txn = db.begin_transaction().await.unwrap();

    let id = ANA.id().unwrap();
    let form = unsaved(&ANA)
        .with_message("Pode me ligar amanhã?")
        .validate()
        .unwrap();
    let submitted_at = ANA.submitted_at().unwrap() + Duration::from_secs(3600);

    let updated = REPO
        .update(&mut txn, id, &form, submitted_at)
        .await
        .unwrap();
    assert!(updated);

    let result = REPO.get(&mut txn, id).await.unwrap();
    assert_eq!(
        result,
        Some(ContactMessage::stored(id, form, submitted_at))
    );

    let result = REPO.get(&mut txn, MARIA.id().unwrap()).await.unwrap();
    assert_eq!(result.as_ref(), Some(&*MARIA));
}

#[tokio::test]
async fn update_not_found() {
    let db = setup().await;
    let mut txn = db.begin_transaction().await.unwrap();

    let form = unsaved(&ANA).validate().unwrap();
    let updated = REPO
        .update(
            &mut txn,
            ContactMessageId::new(404),
            &form,
            ANA.submitted_at().unwrap(),
        )
        .await
        .unwrap();

    assert!(!updated);
}

#[tokio::test]
async fn delete() {
    let db = setup().await;
    let mut txn = db.begin_transaction().await.unwrap();

    let id = JOAO.id().unwrap();

    assert!(REPO.delete(&mut txn, id).await.unwrap());
    assert!(!REPO.delete(&mut txn, id).await.unwrap());

    assert_eq!(REPO.get(&mut txn, id).await.unwrap(), None);
    assert_eq!(
        REPO.list(&mut txn, &Default::default(), make_slice(100, 0))
            .await
            .unwrap(),
        [MARIA.clone(), ANA.clone()]
    );
}
