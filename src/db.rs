// Document store for the CRM collections, backed by SQLite.
//
// The store owns identifier assignment: every inserted client gets an
// internal `_id` (UUID, string form) and a `created_at` timestamp. The
// internal id stays store-side; the gateway remaps it to the public `id`
// field. Uniqueness of email/document is enforced here with UNIQUE columns,
// so a duplicate write fails instead of succeeding silently.

use crate::types::{ClientInput, ClientPatch};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

// ============================================================================
// ERRORS
// ============================================================================

/// Failures surfaced by the store.
#[derive(Debug)]
pub enum StoreError {
    /// A UNIQUE constraint rejected the write (email or document taken).
    Duplicate(&'static str),
    /// Any other driver-level failure.
    Sqlite(rusqlite::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Duplicate(field) => {
                write!(f, "a client with this {} already exists", field)
            }
            StoreError::Sqlite(err) => write!(f, "store error: {}", err),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Duplicate(_) => None,
            StoreError::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        let duplicate_field = match &err {
            rusqlite::Error::SqliteFailure(code, Some(msg))
                if code.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                if msg.contains(".email") {
                    Some("email")
                } else if msg.contains(".document") {
                    Some("document")
                } else {
                    Some("record")
                }
            }
            _ => None,
        };

        match duplicate_field {
            Some(field) => StoreError::Duplicate(field),
            None => StoreError::Sqlite(err),
        }
    }
}

// ============================================================================
// CLIENT DOCUMENT
// ============================================================================

/// Store-side client record, carrying the internal identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientDocument {
    /// Internal store identifier. Never leaves the gateway unmapped.
    pub oid: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub document: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// CONNECTION LIFECYCLE
// ============================================================================

/// Open the store at `path` and make sure the collections exist.
///
/// The returned connection is the single owned handle; callers decide its
/// lifetime (open at startup, dropped at shutdown).
pub fn open_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    setup_database(&conn)?;
    Ok(conn)
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // ==========================================================================
    // Clients collection (the only one with a working read/write path)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS clients (
            _id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            phone TEXT NOT NULL,
            document TEXT NOT NULL UNIQUE,
            address TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Forward-declared collections: schema only, no endpoints yet
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS lots (
            _id TEXT PRIMARY KEY,
            code TEXT NOT NULL UNIQUE,
            location TEXT NOT NULL,
            width REAL NOT NULL,
            length REAL NOT NULL,
            total_price REAL NOT NULL,
            status TEXT NOT NULL DEFAULT 'available',
            description TEXT NOT NULL,
            images TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS contracts (
            _id TEXT PRIMARY KEY,
            client_id TEXT NOT NULL,
            lot_id TEXT NOT NULL,
            total_amount REAL NOT NULL,
            installments INTEGER NOT NULL,
            installment_amount REAL NOT NULL,
            start_date TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'active',
            signed_at TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS payments (
            _id TEXT PRIMARY KEY,
            contract_id TEXT NOT NULL,
            amount REAL NOT NULL,
            due_date TEXT NOT NULL,
            paid_at TEXT,
            status TEXT NOT NULL DEFAULT 'pending',
            payment_method TEXT,
            transaction_id TEXT
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_contracts_client ON contracts(client_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_payments_contract ON payments(contract_id)",
        [],
    )?;

    Ok(())
}

// ============================================================================
// CLIENT OPERATIONS
// ============================================================================

fn row_to_client(row: &Row) -> rusqlite::Result<ClientDocument> {
    let created_at_str: String = row.get(6)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|_| rusqlite::Error::InvalidQuery)?
        .with_timezone(&Utc);

    Ok(ClientDocument {
        oid: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        document: row.get(4)?,
        address: row.get(5)?,
        created_at,
    })
}

/// Persist a new client. The store assigns `_id` and `created_at`.
pub fn insert_client(conn: &Connection, input: &ClientInput) -> Result<ClientDocument, StoreError> {
    let doc = ClientDocument {
        oid: uuid::Uuid::new_v4().to_string(),
        name: input.name.clone(),
        email: input.email.clone(),
        phone: input.phone.clone(),
        document: input.document.clone(),
        address: input.address.clone(),
        created_at: Utc::now(),
    };

    conn.execute(
        "INSERT INTO clients (_id, name, email, phone, document, address, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            doc.oid,
            doc.name,
            doc.email,
            doc.phone,
            doc.document,
            doc.address,
            doc.created_at.to_rfc3339(),
        ],
    )?;

    Ok(doc)
}

/// All clients, newest first.
pub fn get_all_clients(conn: &Connection) -> Result<Vec<ClientDocument>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT _id, name, email, phone, document, address, created_at
         FROM clients
         ORDER BY created_at DESC",
    )?;

    let clients = stmt
        .query_map([], row_to_client)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(clients)
}

/// A single client by internal id, or None if it does not resolve.
pub fn get_client(conn: &Connection, oid: &str) -> Result<Option<ClientDocument>, StoreError> {
    let client = conn
        .query_row(
            "SELECT _id, name, email, phone, document, address, created_at
             FROM clients
             WHERE _id = ?1",
            params![oid],
            row_to_client,
        )
        .optional()?;

    Ok(client)
}

/// Replace the named fields on a client. `_id` and `created_at` are
/// untouched. Returns the updated record, or None if the id does not
/// resolve.
pub fn update_client(
    conn: &Connection,
    oid: &str,
    patch: &ClientPatch,
) -> Result<Option<ClientDocument>, StoreError> {
    let rows = conn.execute(
        "UPDATE clients SET
            name = COALESCE(?1, name),
            email = COALESCE(?2, email),
            phone = COALESCE(?3, phone),
            document = COALESCE(?4, document),
            address = COALESCE(?5, address)
         WHERE _id = ?6",
        params![
            patch.name,
            patch.email,
            patch.phone,
            patch.document,
            patch.address,
            oid,
        ],
    )?;

    if rows == 0 {
        return Ok(None);
    }

    get_client(conn, oid)
}

/// Hard delete. Returns whether a record was actually removed.
pub fn delete_client(conn: &Connection, oid: &str) -> Result<bool, StoreError> {
    let rows = conn.execute("DELETE FROM clients WHERE _id = ?1", params![oid])?;
    Ok(rows > 0)
}

pub fn count_clients(conn: &Connection) -> Result<i64, StoreError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM clients", [], |row| row.get(0))?;
    Ok(count)
}

// ============================================================================
// TESTS
// ============================================================================
