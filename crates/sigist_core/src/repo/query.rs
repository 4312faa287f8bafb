//! Per-table SQL statements and the filter resolver.

use crate::model::filter::Filter;

/// How a table assigns record identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    /// Random token generated before insert, stored as text.
    Token,
    /// `INTEGER PRIMARY KEY AUTOINCREMENT`; the insert binds `NULL`.
    Serial,
}

/// Read-only description of one deployment variant's table.
///
/// Column order is fixed: `id, first_name, last_name, email, job_title,
/// [feedback], created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub table: &'static str,
    pub id_kind: IdKind,
    pub has_feedback: bool,
    pub insert_sql: &'static str,
    pub select_by_id_sql: &'static str,
    pub select_by_email_sql: &'static str,
    pub select_by_first_name_sql: &'static str,
    pub select_all_sql: &'static str,
}

/// Feedback deployment: token ids plus free-text feedback.
pub const USER_FEEDBACK: TableSchema = TableSchema {
    table: "user_feedback",
    id_kind: IdKind::Token,
    has_feedback: true,
    insert_sql: "INSERT INTO user_feedback (id, first_name, last_name, email, job_title, feedback, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    select_by_id_sql: "SELECT id, first_name, last_name, email, job_title, feedback, created_at FROM user_feedback WHERE id = ?1",
    select_by_email_sql: "SELECT id, first_name, last_name, email, job_title, feedback, created_at FROM user_feedback WHERE email = ?1",
    select_by_first_name_sql: "SELECT id, first_name, last_name, email, job_title, feedback, created_at FROM user_feedback WHERE first_name = ?1",
    select_all_sql: "SELECT id, first_name, last_name, email, job_title, feedback, created_at FROM user_feedback",
};

/// Users deployment: database-assigned serial ids, no feedback column.
pub const USERS: TableSchema = TableSchema {
    table: "users",
    id_kind: IdKind::Serial,
    has_feedback: false,
    insert_sql: "INSERT INTO users (id, first_name, last_name, email, job_title, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    select_by_id_sql: "SELECT id, first_name, last_name, email, job_title, created_at FROM users WHERE id = ?1",
    select_by_email_sql: "SELECT id, first_name, last_name, email, job_title, created_at FROM users WHERE email = ?1",
    select_by_first_name_sql: "SELECT id, first_name, last_name, email, job_title, created_at FROM users WHERE first_name = ?1",
    select_all_sql: "SELECT id, first_name, last_name, email, job_title, created_at FROM users",
};

/// Canonical query chosen for a filter, with its optional bound argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedQuery<'a> {
    pub sql: &'static str,
    pub argument: Option<&'a str>,
}

/// Selects exactly one canonical query for `filter`.
///
/// The argument is always bound as text. For [`IdKind::Serial`] tables
/// SQLite's integer affinity converts numeric text on comparison, and
/// non-numeric text matches no row.
pub fn resolve<'a>(schema: &TableSchema, filter: &'a Filter) -> ResolvedQuery<'a> {
    let sql = match filter {
        Filter::ById(_) => schema.select_by_id_sql,
        Filter::ByEmail(_) => schema.select_by_email_sql,
        Filter::ByFirstName(_) => schema.select_by_first_name_sql,
        Filter::All => schema.select_all_sql,
    };

    ResolvedQuery {
        sql,
        argument: filter.argument(),
    }
}
