pub mod appointment;
pub mod doctor;
pub mod patient;

// PostgreSQL SQLSTATE for foreign_key_violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// True when `err` is a database error raised by a foreign key constraint.
pub(crate) fn violates_foreign_key(err: &eyre::Report) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|err| err.as_database_error())
        .and_then(|db_err| db_err.code())
        .is_some_and(|code| code == FOREIGN_KEY_VIOLATION)
}
