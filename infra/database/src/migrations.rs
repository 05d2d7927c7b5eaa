use crate::error::{DatabaseError, DatabaseErrorExt};
use fxhash::FxHashMap;
use sha2::{Digest, Sha256};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use surrealdb::types::SurrealValue;

const LEDGER_SCHEMA: &str = "
    DEFINE TABLE IF NOT EXISTS migration SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS slice ON migration TYPE string;
    DEFINE FIELD IF NOT EXISTS version ON migration TYPE string;
    DEFINE FIELD IF NOT EXISTS checksum ON migration TYPE string;
    DEFINE FIELD IF NOT EXISTS applied_at ON migration TYPE datetime DEFAULT time::now();
    DEFINE INDEX IF NOT EXISTS migration_key ON migration FIELDS slice, version UNIQUE;
";

/// One SurrealQL script owned by a feature slice.
///
/// Slices embed their scripts with `include_str!` and hand them to
/// [`DatabaseBuilder::migrations`](crate::DatabaseBuilder::migrations).
#[derive(Debug, Clone)]
pub struct Migration {
    slice: &'static str,
    version: &'static str,
    script: &'static str,
    checksum: String,
}

impl Migration {
    #[must_use]
    pub fn new(slice: &'static str, version: &'static str, script: &'static str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(script.as_bytes());
        Self { slice, version, script, checksum: hex::encode(hasher.finalize()) }
    }

    #[must_use]
    pub const fn slice(&self) -> &'static str {
        self.slice
    }

    #[must_use]
    pub const fn version(&self) -> &'static str {
        self.version
    }

    #[must_use]
    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    fn key(&self) -> String {
        format!("{}:{}", self.slice, self.version)
    }
}

/// Outcome of a migration run.
#[derive(Debug, Default)]
pub struct MigrationReport {
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
}

#[derive(Debug, SurrealValue)]
struct AppliedMigration {
    slice: String,
    version: String,
    checksum: String,
}

#[derive(Debug)]
pub(crate) struct MigrationRunner<'a> {
    db: &'a Surreal<Any>,
}

impl<'a> MigrationRunner<'a> {
    pub(crate) const fn new(db: &'a Surreal<Any>) -> Self {
        Self { db }
    }

    /// Applies every script not yet recorded, in the given order.
    ///
    /// A recorded script whose checksum changed aborts the run.
    pub(crate) async fn run(&self, migrations: &[Migration]) -> Result<MigrationReport, DatabaseError> {
        self.db
            .query(LEDGER_SCHEMA)
            .await?
            .check()
            .map_err(surrealdb::Error::from)
            .context("Preparing migration ledger")?;

        let applied = self.applied().await?;
        let mut report = MigrationReport::default();

        for migration in migrations {
            if let Some(existing) = applied.get(&migration.key()) {
                ensure_checksum_match(migration, &existing.checksum)?;
                report.skipped.push(migration.key());
                continue;
            }
            self.apply(migration).await?;
            report.applied.push(migration.key());
        }

        Ok(report)
    }

    async fn apply(&self, migration: &Migration) -> Result<(), DatabaseError> {
        let query = format!(
            "BEGIN TRANSACTION;
            {}
            CREATE migration SET slice = $slice, version = $version, checksum = $checksum;
            COMMIT TRANSACTION;",
            migration.script
        );

        self.db
            .query(query)
            .bind(("slice", migration.slice))
            .bind(("version", migration.version))
            .bind(("checksum", migration.checksum.clone()))
            .await?
            .check()
            .map_err(surrealdb::Error::from)
            .context(format!("Applying {}", migration.key()))?;

        Ok(())
    }

    async fn applied(&self) -> Result<FxHashMap<String, AppliedMigration>, DatabaseError> {
        let entries = self
            .db
            .query("SELECT slice, version, checksum FROM migration")
            .await
            .context("Loading applied migrations")?
            .take::<Vec<AppliedMigration>>(0)
            .context("Parsing applied migrations")?;

        Ok(entries
            .into_iter()
            .map(|entry| (format!("{}:{}", entry.slice, entry.version), entry))
            .collect())
    }
}

fn ensure_checksum_match(migration: &Migration, recorded: &str) -> Result<(), DatabaseError> {
    if recorded != migration.checksum {
        return Err(DatabaseError::Migration {
            message: format!(
                "Checksum mismatch for {} (recorded {recorded}, embedded {})",
                migration.key(),
                migration.checksum
            )
            .into(),
            context: Some("Applied scripts must not be edited".into()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_is_sha256_of_script() {
        let migration = Migration::new("gifts", "0001", "");
        assert_eq!(
            migration.checksum(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(migration.key(), "gifts:0001");
    }

    #[test]
    fn edited_script_is_detected() {
        let original = Migration::new("songs", "0001", "DEFINE TABLE song;");
        let edited = Migration::new("songs", "0001", "DEFINE TABLE song SCHEMALESS;");

        assert!(ensure_checksum_match(&original, original.checksum()).is_ok());
        let err = ensure_checksum_match(&edited, original.checksum()).unwrap_err();
        assert!(matches!(err, DatabaseError::Migration { .. }));
    }
}
