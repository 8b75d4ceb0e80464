/// Schema metadata for PostgreSQL tables.
///
/// All methods return `&'static str` so implementors can build their DDL at
/// compile time via `const_format::concatcp!`.
///
/// This trait contains no I/O operations. It only describes table structure.
/// [`crate::migrate`] is what applies it.
pub trait Schema {
    /// Returns the table name in the database.
    fn name() -> &'static str;
    /// Returns `CREATE TABLE IF NOT EXISTS` DDL statement.
    fn creates() -> &'static str;
    /// Returns `CREATE INDEX IF NOT EXISTS` statements for all indices.
    fn indices() -> &'static str;
}
