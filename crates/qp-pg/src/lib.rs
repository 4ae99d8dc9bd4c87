//! PostgreSQL index introspection.
//!
//! Reads the secondary indexes that actually exist in a live database,
//! so declared access patterns can be checked against the real thing
//! rather than against a schema description.
//!
//! - [`db()`] — Establishes a database connection from a URL
//! - [`Database`] — Index source over one namespace of a connection
use const_format::concatcp;
use qp_core::Error;
use qp_pattern::{IndexRecord, IndexSet};
use qp_schema::Indexes;
use std::sync::Arc;
use tokio_postgres::Client;

/// Catalog holding one row per index.
#[rustfmt::skip]
const PG_INDEX:     &str = "pg_catalog.pg_index";
/// Catalog holding tables and indexes alike.
#[rustfmt::skip]
const PG_CLASS:     &str = "pg_catalog.pg_class";
/// Catalog holding namespaces (schemas).
#[rustfmt::skip]
const PG_NAMESPACE: &str = "pg_catalog.pg_namespace";
/// Catalog holding table columns.
#[rustfmt::skip]
const PG_ATTRIBUTE: &str = "pg_catalog.pg_attribute";

/// Secondary indexes of one namespace with their key columns in key order.
///
/// Primary-key indexes are excluded, `INCLUDE` columns are cut off by
/// `indnkeyatts`, and expression indexes (attnum 0) are skipped since they
/// have no plain column tuple to match.
#[rustfmt::skip]
const INDEXES: &str = concatcp!(
    "SELECT   t.relname::text AS tbl, ",
             "i.relname::text AS idx, ",
             "array_agg(a.attname::text ORDER BY k.ord) AS cols ",
    "FROM     ", PG_INDEX,     " ix ",
    "JOIN     ", PG_CLASS,     " i  ON i.oid = ix.indexrelid ",
    "JOIN     ", PG_CLASS,     " t  ON t.oid = ix.indrelid ",
    "JOIN     ", PG_NAMESPACE, " n  ON n.oid = t.relnamespace ",
    "CROSS    JOIN LATERAL unnest(ix.indkey::int2[]) WITH ORDINALITY AS k(attnum, ord) ",
    "JOIN     ", PG_ATTRIBUTE, " a  ON a.attrelid = t.oid AND a.attnum = k.attnum ",
    "WHERE    n.nspname = $1 ",
    "AND      NOT ix.indisprimary ",
    "AND      k.ord <= ix.indnkeyatts ",
    "AND      NOT (0 = ANY(ix.indkey::int2[])) ",
    "GROUP BY t.relname, i.relname ",
    "ORDER BY t.relname, i.relname"
);

/// Establishes a database connection.
///
/// The connection task is spawned onto the current tokio runtime; a
/// connection that drops later is logged, not propagated.
pub async fn db(url: &str) -> Result<Arc<Client>, Error> {
    log::info!("connecting to database");
    let tls = tokio_postgres::tls::NoTls;
    let (client, connection) = tokio_postgres::connect(url, tls)
        .await
        .map_err(|e| Error::Database(format!("connection failed: {}", e)))?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            log::error!("database connection closed: {}", e);
        }
    });
    client
        .execute("SET client_min_messages TO WARNING", &[])
        .await
        .map_err(|e| Error::Database(e.to_string()))?;
    Ok(Arc::new(client))
}

/// Live-database index source for one namespace.
pub struct Database {
    client: Arc<Client>,
    namespace: String,
}

impl Database {
    pub fn new(client: Arc<Client>, namespace: &str) -> Self {
        Self {
            client,
            namespace: namespace.to_string(),
        }
    }
    /// Connects and scopes introspection to `namespace`.
    pub async fn connect(url: &str, namespace: &str) -> Result<Self, Error> {
        Ok(Self::new(db(url).await?, namespace))
    }
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

#[async_trait::async_trait]
impl Indexes for Database {
    async fn indexes(&self) -> Result<IndexSet, Error> {
        log::info!("introspecting indexes in namespace {}", self.namespace);
        let rows = self
            .client
            .query(INDEXES, &[&self.namespace])
            .await
            .map_err(|e| Error::Database(format!("index introspection failed: {}", e)))?
            .into_iter()
            .map(|row| {
                let table = row.get::<_, String>(0);
                let index = row.get::<_, String>(1);
                let columns = row.get::<_, Vec<String>>(2);
                (table, index, columns)
            })
            .collect::<Vec<_>>();
        Ok(index_set(rows))
    }
}

/// Folds introspected (table, index, columns) rows into an [`IndexSet`].
fn index_set<I>(rows: I) -> IndexSet
where
    I: IntoIterator<Item = (String, String, Vec<String>)>,
{
    rows.into_iter()
        .filter(|(_, _, columns)| !columns.is_empty())
        .fold(IndexSet::new(), |mut set, (table, index, columns)| {
            log::debug!("found index {} on {}", index, table);
            set.insert(IndexRecord::new(table, columns), Some(index.as_str()));
            set
        })
}
