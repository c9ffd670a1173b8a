use bb8_postgres::tokio_postgres::{types::ToSql, Row};
use chrono::{DateTime, Utc};
use nogran_models::{
    contact::{ContactForm, ContactMessage, ContactMessageFilter, ContactMessageId},
    pagination::PaginationSlice,
};
use nogran_persistence_contracts::contact::ContactRepository;

use crate::{arg_indices, columns, PostgresTransaction};

#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresContactRepository;

columns!(contact_message as "c": "id", "name", "phone", "email", "message", "submitted_at");
columns!(contact_content as "c": "name", "phone", "email", "message", "submitted_at");

impl ContactRepository<PostgresTransaction> for PostgresContactRepository {
    async fn count(
        &self,
        txn: &mut PostgresTransaction,
        filter: &ContactMessageFilter,
    ) -> anyhow::Result<u64> {
        let mut query = "select count(*) from contact_messages c where true".to_owned();
        let mut params: Vec<&(dyn ToSql + Sync)> = Vec::new();
        make_filter(filter, &mut query, &mut params);

        txn.txn()
            .query_one(&query, &params)
            .await
            .map(|row| row.get::<_, i64>(0) as _)
            .map_err(Into::into)
    }

    async fn list(
        &self,
        txn: &mut PostgresTransaction,
        filter: &ContactMessageFilter,
        pagination: PaginationSlice,
    ) -> anyhow::Result<Vec<ContactMessage>> {
        let mut query = format!("select {CONTACT_MESSAGE_COLS} from contact_messages c where true");
        let mut params: Vec<&(dyn ToSql + Sync)> = Vec::new();
        make_filter(filter, &mut query, &mut params);
        query.push_str(&format!(
            " order by c.id asc limit {} offset {}",
            *pagination.limit, pagination.offset
        ));

        txn.txn()
            .query(&query, &params)
            .await
            .map_err(Into::into)
            .and_then(|rows| {
                rows.into_iter()
                    .map(|row| decode_contact_message(&row, &mut 0))
                    .collect()
            })
    }

    async fn get(
        &self,
        txn: &mut PostgresTransaction,
        id: ContactMessageId,
    ) -> anyhow::Result<Option<ContactMessage>> {
        txn.txn()
            .query_opt(
                &format!("select {CONTACT_MESSAGE_COLS} from contact_messages c where c.id=$1"),
                &[&*id],
            )
            .await
            .map_err(Into::into)
            .and_then(|row| {
                row.map(|row| decode_contact_message(&row, &mut 0))
                    .transpose()
            })
    }

    async fn create(
        &self,
        txn: &mut PostgresTransaction,
        form: &ContactForm,
        submitted_at: DateTime<Utc>,
    ) -> anyhow::Result<ContactMessageId> {
        txn.txn()
            .query_one(
                &format!(
                    "insert into contact_messages ({CONTACT_CONTENT_COL_NAMES}) values ({}) \
                     returning id",
                    arg_indices(1..=CONTACT_CONTENT_CNT)
                ),
                &[
                    &*form.name,
                    &*form.phone,
                    &form.email.as_str(),
                    &*form.message,
                    &submitted_at,
                ],
            )
            .await
            .map(|row| row.get::<_, i64>(0).into())
            .map_err(Into::into)
    }

    async fn update(
        &self,
        txn: &mut PostgresTransaction,
        id: ContactMessageId,
        form: &ContactForm,
        submitted_at: DateTime<Utc>,
    ) -> anyhow::Result<bool> {
        txn.txn()
            .execute(
                "update contact_messages set name=$2, phone=$3, email=$4, message=$5, \
                 submitted_at=$6 where id=$1",
                &[
                    &*id,
                    &*form.name,
                    &*form.phone,
                    &form.email.as_str(),
                    &*form.message,
                    &submitted_at,
                ],
            )
            .await
            .map(|n| n != 0)
            .map_err(Into::into)
    }

    async fn delete(
        &self,
        txn: &mut PostgresTransaction,
        id: ContactMessageId,
    ) -> anyhow::Result<bool> {
        txn.txn()
            .execute("delete from contact_messages where id=$1", &[&*id])
            .await
            .map(|n| n != 0)
            .map_err(Into::into)
    }
}

fn make_filter<'a>(
    filter: &'a ContactMessageFilter,
    query: &mut String,
    params: &mut Vec<&'a (dyn ToSql + Sync)>,
) {
    if let Some(name) = &filter.name {
        params.push(&**name);
        query.push_str(&format!(
            " and strpos(lower(c.name), lower(${})) > 0",
            params.len()
        ));
    }
    if let Some(email) = &filter.email {
        params.push(&**email);
        query.push_str(&format!(
            " and strpos(lower(c.email), lower(${})) > 0",
            params.len()
        ));
    }
}

fn decode_contact_message(row: &Row, offset: &mut usize) -> anyhow::Result<ContactMessage> {
    let mut idx = || {
        *offset += 1;
        *offset - 1
    };

    let id = row.get::<_, i64>(idx()).into();
    let form = ContactForm {
        name: row.get::<_, String>(idx()).try_into()?,
        phone: row.get::<_, String>(idx()).try_into()?,
        email: row.get::<_, String>(idx()).parse()?,
        message: row.get::<_, String>(idx()).into(),
    };
    let submitted_at = row.get(idx());

    Ok(ContactMessage::stored(id, form, submitted_at))
}
