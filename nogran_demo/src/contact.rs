use std::{sync::LazyLock, time::Duration};

use nogran_models::contact::ContactMessage;
use nogran_persistence_contracts::contact::ContactRepository;

use crate::DEMO_TIME;

pub static ALL_CONTACT_MESSAGES: LazyLock<Vec<&ContactMessage>> =
    LazyLock::new(|| vec![&MARIA, &JOAO, &ANA]);

pub static MARIA: LazyLock<ContactMessage> = LazyLock::new(|| {
    stored(
        1,
        ContactMessage::new()
            .with_name("Maria Silva")
            .with_phone("11999998888")
            .with_email("maria@example.com")
            .with_message("Olá"),
        0,
    )
});

pub static JOAO: LazyLock<ContactMessage> = LazyLock::new(|| {
    stored(
        2,
        ContactMessage::new()
            .with_name("João Pereira")
            .with_phone("21987654321")
            .with_email("joao.pereira@example.org")
            .with_message("Gostaria de saber mais sobre os cursos."),
        3600,
    )
});

pub static ANA: LazyLock<ContactMessage> = LazyLock::new(|| {
    stored(
        3,
        ContactMessage::new()
            .with_name("Ana Maria Souza")
            .with_phone("(31) 3333-4444")
            .with_email("ana@example.com")
            .with_message(""),
        2 * 3600,
    )
});

fn stored(id: i64, message: ContactMessage, seconds: u64) -> ContactMessage {
    ContactMessage::stored(
        id.into(),
        message.validate().unwrap(),
        *DEMO_TIME + Duration::from_secs(seconds),
    )
}

/// Stores the demo messages in order.
///
/// Expects an empty table, so the generated ids match the ones above.
pub async fn create<Txn: Send + Sync + 'static>(
    txn: &mut Txn,
    repo: impl ContactRepository<Txn>,
) -> anyhow::Result<()> {
    for &message in &*ALL_CONTACT_MESSAGES {
        let form = message.validate()?;
        let submitted_at = message
            .submitted_at()
            .ok_or_else(|| anyhow::anyhow!("Demo message has no timestamp"))?;
        let id = repo.create(txn, &form, submitted_at).await?;
        anyhow::ensure!(
            Some(id) == message.id(),
            "Demo message was stored with unexpected id {id}"
        );
    }
    Ok(())
}
