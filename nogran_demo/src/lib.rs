use std::sync::LazyLock;

use chrono::{DateTime, TimeZone, Utc};
use nogran_models::contact::ContactMessage;
use nogran_persistence_contracts::contact::ContactRepository;

pub mod contact;

pub static DEMO_TIME: LazyLock<DateTime<Utc>> =
    LazyLock::new(|| Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());

pub async fn create<Txn: Send + Sync + 'static>(
    txn: &mut Txn,
    contact: impl ContactRepository<Txn>,
) -> anyhow::Result<()> {
    contact::create(txn, contact).await?;
    Ok(())
}

/// Returns a copy of `message` without the fields assigned by the
/// persistence layer.
pub fn unsaved(message: &ContactMessage) -> ContactMessage {
    let mut message = message.clone();
    message.set_id(None);
    message.set_submitted_at(None);
    message
}
