use std::{
    collections::HashSet,
    fmt::{self, Write},
    time::Duration,
};

use anyhow::Context;
use bb8::{Pool, PooledConnection};
use bb8_postgres::{
    tokio_postgres::{self, NoTls},
    PostgresConnectionManager,
};
use nogran_persistence_contracts::{Database, Transaction};
use ouroboros::self_referencing;
use tracing::{info, trace};

pub mod contact;

type PgClient = tokio_postgres::Client;
type PgConnection<'a> = PooledConnection<'a, PostgresConnectionManager<NoTls>>;
type PgTransaction<'a> = tokio_postgres::Transaction<'a>;

#[derive(Debug, Clone)]
pub struct PostgresDatabase {
    pool: Pool<PostgresConnectionManager<NoTls>>,
}

#[derive(Debug)]
pub struct PostgresDatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Option<Duration>,
    pub max_lifetime: Option<Duration>,
}

impl PostgresDatabase {
    pub async fn connect(config: &PostgresDatabaseConfig) -> anyhow::Result<Self> {
        let manager = PostgresConnectionManager::new(
            config.url.parse().context("Invalid database url")?,
            NoTls,
        );
        let pool = Pool::builder()
            .max_size(config.max_connections)
            .min_idle(Some(config.min_connections))
            .connection_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .build(manager)
            .await
            .context("Failed to connect to database")?;

        Ok(Self { pool })
    }

    pub async fn list_migrations(&self) -> anyhow::Result<Vec<MigrationStatus>> {
        let conn = self.conn().await?;
        list_migrations(&conn).await
    }

    /// Applies the next `cnt` pending migrations (or all of them), each in its
    /// own transaction.
    ///
    /// Returns the names of the applied migrations.
    pub async fn run_migrations(&self, cnt: Option<usize>) -> anyhow::Result<Vec<&'static str>> {
        self.migrate(Direction::Up, cnt).await
    }

    /// Reverts the last `cnt` applied migrations (or all of them), most recent
    /// first.
    pub async fn revert_migrations(&self, cnt: Option<usize>) -> anyhow::Result<Vec<&'static str>> {
        self.migrate(Direction::Down, cnt).await
    }

    /// Drops every table, including the migration bookkeeping.
    pub async fn reset(&self) -> anyhow::Result<()> {
        self.conn()
            .await?
            .batch_execute("drop schema public cascade; create schema public;")
            .await
            .context("Failed to drop and recreate schema public")
    }

    async fn migrate(
        &self,
        direction: Direction,
        cnt: Option<usize>,
    ) -> anyhow::Result<Vec<&'static str>> {
        let mut conn = self.conn().await?;

        let mut selected = list_migrations(&conn).await?;
        match direction {
            Direction::Up => selected.retain(|s| !s.applied),
            Direction::Down => {
                selected.retain(|s| s.applied);
                selected.reverse();
            }
        }
        selected.truncate(cnt.unwrap_or(usize::MAX));

        let mut out = Vec::new();
        for MigrationStatus { migration, .. } in selected {
            let (script, bookkeeping) = match direction {
                Direction::Up => (migration.up, "insert into _migrations (name) values ($1)"),
                Direction::Down => (migration.down, "delete from _migrations where name=$1"),
            };

            let txn = conn
                .transaction()
                .await
                .context("Failed to begin transaction")?;
            txn.batch_execute(script)
                .await
                .with_context(|| format!("Migration {} failed ({direction})", migration.name))?;
            txn.execute(bookkeeping, &[&migration.name])
                .await
                .with_context(|| format!("Failed to record migration {}", migration.name))?;
            txn.commit().await.context("Failed to commit transaction")?;

            info!(migration = migration.name, %direction, "migrated");
            out.push(migration.name);
        }

        Ok(out)
    }

    async fn conn(&self) -> anyhow::Result<PgConnection<'_>> {
        self.pool
            .get()
            .await
            .context("Failed to acquire database connection")
    }
}

impl Database for PostgresDatabase {
    type Transaction = PostgresTransaction;

    async fn begin_transaction(&self) -> anyhow::Result<Self::Transaction> {
        trace!("begin transaction");

        let conn = self
            .pool
            .get_owned()
            .await
            .context("Failed to acquire database connection")?;

        PostgresTransactionAsyncSendTryBuilder {
            conn,
            txn_builder: |conn| Box::pin(async move { conn.transaction().await.map(Some) }),
        }
        .try_build()
        .await
        .context("Failed to begin transaction")
    }
}

/// A pooled connection together with the transaction that borrows it.
///
/// The transaction is `None` only after it has been committed or rolled back,
/// which consumes the wrapper.
#[self_referencing]
pub struct PostgresTransaction {
    conn: PgConnection<'static>,
    #[borrows(mut conn)]
    #[covariant]
    txn: Option<PgTransaction<'this>>,
}

impl PostgresTransaction {
    fn txn(&self) -> &PgTransaction<'_> {
        self.borrow_txn().as_ref().unwrap()
    }
}

impl Transaction for PostgresTransaction {
    async fn commit(mut self) -> anyhow::Result<()> {
        trace!("commit transaction");

        self.with_txn_mut(|txn| txn.take())
            .unwrap()
            .commit()
            .await
            .context("Failed to commit transaction")
    }

    async fn rollback(mut self) -> anyhow::Result<()> {
        trace!("rollback transaction");

        self.with_txn_mut(|txn| txn.take())
            .unwrap()
            .rollback()
            .await
            .context("Failed to rollback transaction")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub name: &'static str,
    pub up: &'static str,
    pub down: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct MigrationStatus {
    pub migration: Migration,
    pub applied: bool,
}

// generated by `build.rs` script
pub const MIGRATIONS: &[Migration] = include!(env!("MIGRATIONS"));

#[derive(Debug, Clone, Copy)]
enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "up",
            Self::Down => "down",
        })
    }
}

async fn list_migrations(conn: &PgClient) -> anyhow::Result<Vec<MigrationStatus>> {
    conn.batch_execute("create table if not exists _migrations (name text primary key);")
        .await
        .context("Failed to create migrations table")?;

    let applied = conn
        .query("select name from _migrations;", &[])
        .await
        .context("Failed to list migrations")?
        .into_iter()
        .map(|row| row.get(0))
        .collect::<HashSet<String>>();

    Ok(MIGRATIONS
        .iter()
        .map(|&migration| MigrationStatus {
            migration,
            applied: applied.contains(migration.name),
        })
        .collect())
}

/// Declares the column mapping of a table.
///
/// `columns!(foo as "f": "a", "b")` defines `FOO_CNT` (number of columns),
/// `FOO_COLS` (`"f"."a", "f"."b"`, for selects) and `FOO_COL_NAMES`
/// (`"a", "b"`, for inserts).
macro_rules! columns {
    ($vis:vis $ident:ident as $alias:literal: $fst:literal $(, $col:literal)* $(,)?) => {
        ::paste::paste! {
            #[allow(unused, reason = "not every mapping is used for inserts")]
            $vis const [< $ident:snake:upper _CNT >]: usize = [ $fst $(, $col)* ].len();
            $vis const [< $ident:snake:upper _COLS >]: &str = ::core::concat!( '"', $alias, "\".\"", $fst, '"' $(, ", \"" , $alias, "\".\"", $col, '"' )* );
            #[allow(unused, reason = "not every mapping is used for inserts")]
            $vis const [< $ident:snake:upper _COL_NAMES >]: &str = ::core::concat!( '"', $fst, '"' $(, ", \"", $col, '"' )* );
        }
    };
}
use columns;

/// Formats a list of query parameter placeholders, e.g. `$1, $2, $3`.
fn arg_indices(indices: impl IntoIterator<Item = usize>) -> String {
    let mut it = indices.into_iter();
    let mut out = String::new();
    if let Some(x) = it.next() {
        write!(&mut out, "${x}").unwrap();
    }
    for x in it {
        write!(&mut out, ", ${x}").unwrap();
    }
    out
}
