use anyhow::Context;
use clap::{Args, Subcommand};
use nogran_config::Config;
use nogran_core_contact_contracts::{
    ContactDeleteError, ContactFeatureService, ContactGetError, ContactListResult,
    ContactSubmitError, ContactUpdateError,
};
use nogran_core_contact_impl::ContactFeatureServiceImpl;
use nogran_models::{
    contact::{ContactMessage, ContactMessageFilter, ContactMessageId, ValidationFailure},
    pagination::PaginationSlice,
    SearchTerm,
};
use nogran_persistence_postgres::{contact::PostgresContactRepository, PostgresDatabase};
use nogran_shared_impl::time::TimeServiceImpl;

use crate::database;

type ContactFeature =
    ContactFeatureServiceImpl<PostgresDatabase, TimeServiceImpl, PostgresContactRepository>;

#[derive(Debug, Subcommand)]
pub enum ContactCommand {
    /// Submit a new contact message
    #[command(aliases(["s", "new", "n", "+"]))]
    Submit {
        #[command(flatten)]
        content: ContactContent,
        /// Print the stored message as json
        #[arg(long)]
        json: bool,
    },
    /// List stored contact messages
    #[command(aliases(["ls", "l"]))]
    List {
        /// Only list messages whose name contains this text (case insensitive)
        #[arg(long)]
        name: Option<String>,
        /// Only list messages whose email address contains this text (case
        /// insensitive)
        #[arg(long)]
        email: Option<String>,
        /// Maximum number of messages to list [default: contact.page_size]
        #[arg(short = 'n', long)]
        limit: Option<u64>,
        /// Number of messages to skip
        #[arg(long, default_value = "0")]
        offset: u64,
        #[arg(long)]
        json: bool,
    },
    /// Show a single contact message
    #[command(aliases(["g", "show"]))]
    Get {
        id: i64,
        #[arg(long)]
        json: bool,
    },
    /// Replace the content of a contact message
    #[command(aliases(["u", "edit"]))]
    Update {
        id: i64,
        #[command(flatten)]
        content: ContactContent,
        #[arg(long)]
        json: bool,
    },
    /// Delete a contact message
    #[command(aliases(["d", "rm"]))]
    Delete { id: i64 },
}

#[derive(Debug, Args)]
pub struct ContactContent {
    /// The full name of the sender
    name: Option<String>,
    /// The phone number of the sender
    phone: Option<String>,
    /// The email address of the sender
    email: Option<String>,
    /// The message text
    message: Option<String>,
}

impl From<ContactContent> for ContactMessage {
    fn from(value: ContactContent) -> Self {
        let mut message = ContactMessage::new();
        message.set_name(value.name);
        message.set_phone(value.phone);
        message.set_email(value.email);
        message.set_message(value.message);
        message
    }
}

impl ContactCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        let db = database::connect(&config.database).await?;
        let contact = ContactFeatureServiceImpl {
            db,
            time: TimeServiceImpl,
            contact_repo: PostgresContactRepository,
        };

        match self {
            Self::Submit { content, json } => submit(contact, content.into(), json).await,
            Self::List {
                name,
                email,
                limit,
                offset,
                json,
            } => {
                let filter = ContactMessageFilter {
                    name: name.map(parse_search_term).transpose()?,
                    email: email.map(parse_search_term).transpose()?,
                };
                let pagination = PaginationSlice {
                    limit: limit
                        .unwrap_or(config.contact.page_size)
                        .try_into()
                        .context("Invalid limit")?,
                    offset,
                };
                list(contact, filter, pagination, json).await
            }
            Self::Get { id, json } => get(contact, id.into(), json).await,
            Self::Update { id, content, json } => {
                update(contact, id.into(), content.into(), json).await
            }
            Self::Delete { id } => delete(contact, id.into()).await,
        }
    }
}

async fn submit(
    contact: ContactFeature,
    message: ContactMessage,
    json: bool,
) -> anyhow::Result<()> {
    match contact.submit(message).await {
        Ok(message) => print_message(&message, json),
        Err(ContactSubmitError::Validation(failure)) => invalid(failure),
        Err(ContactSubmitError::Other(err)) => {
            Err(err.context("Failed to submit contact message"))
        }
    }
}

async fn list(
    contact: ContactFeature,
    filter: ContactMessageFilter,
    pagination: PaginationSlice,
    json: bool,
) -> anyhow::Result<()> {
    let ContactListResult { total, messages } = contact
        .list(filter, pagination)
        .await
        .context("Failed to list contact messages")?;

    if json {
        let out = serde_json::json!({ "total": total, "messages": messages });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for message in &messages {
        print_message(message, false)?;
        println!();
    }
    println!(
        "Showing {} of {total} contact message(s) (offset {})",
        messages.len(),
        pagination.offset
    );

    Ok(())
}

async fn get(contact: ContactFeature, id: ContactMessageId, json: bool) -> anyhow::Result<()> {
    match contact.get(id).await {
        Ok(message) => print_message(&message, json),
        Err(ContactGetError::NotFound) => anyhow::bail!("Contact message {id} does not exist"),
        Err(ContactGetError::Other(err)) => Err(err.context("Failed to get contact message")),
    }
}

async fn update(
    contact: ContactFeature,
    id: ContactMessageId,
    message: ContactMessage,
    json: bool,
) -> anyhow::Result<()> {
    match contact.update(id, message).await {
        Ok(message) => print_message(&message, json),
        Err(ContactUpdateError::NotFound) => anyhow::bail!("Contact message {id} does not exist"),
        Err(ContactUpdateError::Validation(failure)) => invalid(failure),
        Err(ContactUpdateError::Other(err)) => {
            Err(err.context("Failed to update contact message"))
        }
    }
}

async fn delete(contact: ContactFeature, id: ContactMessageId) -> anyhow::Result<()> {
    match contact.delete(id).await {
        Ok(()) => {
            println!("Contact message {id} has been deleted");
            Ok(())
        }
        Err(ContactDeleteError::NotFound) => anyhow::bail!("Contact message {id} does not exist"),
        Err(ContactDeleteError::Other(err)) => {
            Err(err.context("Failed to delete contact message"))
        }
    }
}

fn invalid(failure: ValidationFailure) -> anyhow::Result<()> {
    for violation in failure.violations() {
        eprintln!("{violation}");
    }
    anyhow::bail!("Contact message is invalid")
}

fn parse_search_term(term: String) -> anyhow::Result<SearchTerm> {
    term.try_into().context("Invalid search term")
}

fn print_message(message: &ContactMessage, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(message)?);
        return Ok(());
    }

    let or_unset = |value: Option<&str>| value.unwrap_or("-").to_owned();
    println!(
        "#{} {} <{}> {}",
        message
            .id()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".into()),
        or_unset(message.name()),
        or_unset(message.email()),
        or_unset(message.phone()),
    );
    if let Some(submitted_at) = message.submitted_at() {
        println!("submitted at {}", submitted_at.to_rfc3339());
    }
    println!("{}", or_unset(message.message()));

    Ok(())
}
