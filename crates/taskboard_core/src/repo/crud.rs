//! Generic CRUD repository contract and its SQLite implementation.
//!
//! # Responsibility
//! - Express the create/find/update/delete contract once for every entity.
//! - Keep SQL text generation and row mapping inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Entity::check_invariants()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `update` on a missing row is `NotFound`; `delete` on a missing row is a
//!   no-op.
//! - Listing order is `id ASC`.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::{EntityId, ModelValidationError};
use chrono::NaiveDate;
use log::{debug, warn};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Params, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by every entity DAO.
#[derive(Debug)]
pub enum RepoError {
    Validation(ModelValidationError),
    /// Transport failure or constraint violation reported by SQLite.
    Db(DbError),
    /// No row with this id exists.
    NotFound { entity: &'static str, id: EntityId },
    /// Entity has no id yet, so there is no row to address.
    Unsaved { entity: &'static str },
    /// `create` was called with an entity that already carries an id.
    AlreadyPersisted { entity: &'static str, id: EntityId },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to a valid entity.
    InvalidData(String),
}

impl RepoError {
    /// Returns whether SQLite rejected the statement on a foreign-key,
    /// uniqueness, check or not-null constraint.
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            Self::Db(err) => err.is_constraint_violation(),
            _ => false,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Unsaved { entity } => write!(f, "{entity} has not been created yet"),
            Self::AlreadyPersisted { entity, id } => {
                write!(f, "{entity} already persisted with id {id}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelValidationError> for RepoError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Row mapping for one entity table.
///
/// Implementors describe their table; `SqliteRepository` supplies the SQL.
pub trait Entity: Sized {
    /// Singular name used in errors and log events.
    const NAME: &'static str;
    const TABLE: &'static str;
    /// Mutable columns in bind order. `id` is implied and must not be listed.
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> Option<EntityId>;
    fn set_id(&mut self, id: EntityId);
    fn check_invariants(&self) -> Result<(), ModelValidationError>;
    /// Column values in `COLUMNS` order.
    fn to_values(&self) -> Vec<Value>;
    fn from_row(row: &Row<'_>) -> RepoResult<Self>;

    /// Fills fields derived from other tables after a row is read.
    fn load_relations(&mut self, _conn: &Connection) -> RepoResult<()> {
        Ok(())
    }
}

/// Create/find/update/delete contract shared by every entity DAO.
pub trait CrudRepository<E: Entity> {
    /// Inserts `entity`, stores the generated id on it and returns that id.
    fn create(&self, entity: &mut E) -> RepoResult<EntityId>;
    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<E>>;
    fn find_all(&self) -> RepoResult<Vec<E>>;
    /// Replaces every mutable column of the row addressed by `entity.id`.
    fn update(&self, entity: &E) -> RepoResult<()>;
    /// Removes the row. Missing rows are ignored.
    fn delete(&self, id: EntityId) -> RepoResult<()>;
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed repository for any `Entity`.
pub struct SqliteRepository<'conn, E> {
    conn: &'conn Connection,
    _entity: PhantomData<fn() -> E>,
}

impl<'conn, E: Entity> SqliteRepository<'conn, E> {
    /// Creates repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema does
    ///   not match `E`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_version(conn)?;
        ensure_entity_table::<E>(conn)?;
        Ok(Self::new_unchecked(conn))
    }

    pub(crate) fn new_unchecked(conn: &'conn Connection) -> Self {
        Self {
            conn,
            _entity: PhantomData,
        }
    }

    pub fn connection(&self) -> &'conn Connection {
        self.conn
    }

    /// Loads the lowest-id row matching `where_clause`.
    pub(crate) fn query_one<P: Params>(
        &self,
        where_clause: &str,
        params: P,
    ) -> RepoResult<Option<E>> {
        let sql = format!(
            "{} WHERE {where_clause} ORDER BY id ASC LIMIT 1;",
            select_sql::<E>()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params)?;
        if let Some(row) = rows.next()? {
            return Ok(Some(self.read_row(row)?));
        }
        Ok(None)
    }

    /// Loads every row matching `where_clause`, ordered by id.
    pub(crate) fn query_many<P: Params>(
        &self,
        where_clause: &str,
        params: P,
    ) -> RepoResult<Vec<E>> {
        let sql = format!(
            "{} WHERE {where_clause} ORDER BY id ASC;",
            select_sql::<E>()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params)?;
        let mut entities = Vec::new();
        while let Some(row) = rows.next()? {
            entities.push(self.read_row(row)?);
        }
        Ok(entities)
    }

    /// Sets a single nullable column, leaving the rest of the row untouched.
    pub(crate) fn update_column(
        &self,
        id: EntityId,
        column: &'static str,
        value: Value,
    ) -> RepoResult<()> {
        let changed = self.execute_write(
            "repo_update_column",
            &format!("UPDATE {} SET {column} = ?1 WHERE id = ?2;", E::TABLE),
            rusqlite::params![value, id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: E::NAME,
                id,
            });
        }
        debug!(
            "event=repo_update_column module=repo status=ok entity={} id={} column={}",
            E::NAME,
            id,
            column
        );
        Ok(())
    }

    /// Runs one write statement, logging SQLite failures at `warn`.
    fn execute_write<P: Params>(
        &self,
        event: &'static str,
        sql: &str,
        params: P,
    ) -> RepoResult<usize> {
        self.conn.execute(sql, params).map_err(|err| {
            warn!(
                "event={event} module=repo status=error entity={} error={}",
                E::NAME,
                err
            );
            RepoError::from(err)
        })
    }

    fn read_row(&self, row: &Row<'_>) -> RepoResult<E> {
        let mut entity = E::from_row(row)?;
        entity.load_relations(self.conn)?;
        entity.check_invariants()?;
        Ok(entity)
    }
}

impl<E: Entity> CrudRepository<E> for SqliteRepository<'_, E> {
    fn create(&self, entity: &mut E) -> RepoResult<EntityId> {
        if let Some(id) = entity.id() {
            return Err(RepoError::AlreadyPersisted {
                entity: E::NAME,
                id,
            });
        }
        entity.check_invariants()?;

        let placeholders = (1..=E::COLUMNS.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders});",
            E::TABLE,
            E::COLUMNS.join(", ")
        );

        self.execute_write("repo_create", &sql, params_from_iter(entity.to_values()))?;

        let id = self.conn.last_insert_rowid();
        entity.set_id(id);
        debug!(
            "event=repo_create module=repo status=ok entity={} id={}",
            E::NAME,
            id
        );
        Ok(id)
    }

    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<E>> {
        self.query_one("id = ?1", [id])
    }

    fn find_all(&self) -> RepoResult<Vec<E>> {
        self.query_many("1 = 1", [])
    }

    fn update(&self, entity: &E) -> RepoResult<()> {
        let id = entity
            .id()
            .ok_or(RepoError::Unsaved { entity: E::NAME })?;
        entity.check_invariants()?;

        let assignments = E::COLUMNS
            .iter()
            .enumerate()
            .map(|(index, column)| format!("{column} = ?{}", index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {assignments} WHERE id = ?{};",
            E::TABLE,
            E::COLUMNS.len() + 1
        );

        let mut values = entity.to_values();
        values.push(Value::Integer(id));
        let changed = self.execute_write("repo_update", &sql, params_from_iter(values))?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: E::NAME,
                id,
            });
        }

        debug!(
            "event=repo_update module=repo status=ok entity={} id={}",
            E::NAME,
            id
        );
        Ok(())
    }

    fn delete(&self, id: EntityId) -> RepoResult<()> {
        let changed = self.execute_write(
            "repo_delete",
            &format!("DELETE FROM {} WHERE id = ?1;", E::TABLE),
            [id],
        )?;
        debug!(
            "event=repo_delete module=repo status=ok entity={} id={} removed={}",
            E::NAME,
            id,
            changed
        );
        Ok(())
    }

    fn count(&self) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {};", E::TABLE),
            [],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count in {}", E::TABLE)))
    }
}

fn select_sql<E: Entity>() -> String {
    format!("SELECT id, {} FROM {}", E::COLUMNS.join(", "), E::TABLE)
}

pub(crate) fn ensure_schema_version(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}

pub(crate) fn ensure_entity_table<E: Entity>(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, E::TABLE)? {
        return Err(RepoError::MissingRequiredTable(E::TABLE));
    }

    let columns = table_columns(conn, E::TABLE)?;
    for column in std::iter::once("id").chain(E::COLUMNS.iter().copied()) {
        if !columns.iter().any(|current| current == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: E::TABLE,
                column,
            });
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>(1)?);
    }
    Ok(columns)
}

pub(crate) fn date_value(date: Option<NaiveDate>) -> Value {
    date.map_or(Value::Null, |day| {
        Value::Text(day.format("%Y-%m-%d").to_string())
    })
}

pub(crate) fn text_value(text: Option<&str>) -> Value {
    text.map_or(Value::Null, |value| Value::Text(value.to_string()))
}

pub(crate) fn id_value(id: Option<EntityId>) -> Value {
    id.map_or(Value::Null, Value::Integer)
}

pub(crate) fn flag_value(flag: bool) -> Value {
    Value::Integer(i64::from(flag))
}

pub(crate) fn read_flag(row: &Row<'_>, table: &str, column: &str) -> RepoResult<bool> {
    match row.get::<_, i64>(column)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid {column} value `{other}` in {table}.{column}"
        ))),
    }
}

pub(crate) fn read_enum<T>(
    row: &Row<'_>,
    table: &str,
    column: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> RepoResult<T> {
    let text: String = row.get(column)?;
    parse(&text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid {column} `{text}` in {table}.{column}"))
    })
}
