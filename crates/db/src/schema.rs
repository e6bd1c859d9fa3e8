use eyre::Result;
use slotbook_core::{SlotPolicy, models::slot::SlotDomain};
use sqlx::{Pool, Postgres};
use tracing::info;

/// DDL for one domain's slot table.
pub fn slot_table_ddl(domain: SlotDomain) -> Vec<String> {
    let table = domain.table();
    vec![
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                owner_type VARCHAR(255) NOT NULL,
                owner_id BIGINT NOT NULL,
                claimant_type VARCHAR(255) NULL,
                claimant_id BIGINT NULL,
                start_time TIMESTAMP NOT NULL,
                end_time TIMESTAMP NOT NULL,
                note TEXT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT LOCALTIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT LOCALTIMESTAMP,
                CONSTRAINT {table}_valid_time_range CHECK (end_time > start_time),
                CONSTRAINT {table}_claimant_complete
                    CHECK ((claimant_type IS NULL) = (claimant_id IS NULL))
            );
            "#
        ),
        format!("CREATE INDEX IF NOT EXISTS idx_{table}_owner ON {table}(owner_type, owner_id, start_time);"),
        format!("CREATE INDEX IF NOT EXISTS idx_{table}_claimant ON {table}(claimant_type, claimant_id);"),
        format!("CREATE INDEX IF NOT EXISTS idx_{table}_end_time ON {table}(end_time);"),
    ]
}

/// The `(owner, start_time)` unique index exists exactly when duplicates are
/// disallowed.
pub fn unique_start_ddl(domain: SlotDomain, policy: &SlotPolicy) -> String {
    let table = domain.table();
    if policy.allow_duplicate_start_time {
        format!("DROP INDEX IF EXISTS uq_{table}_owner_start;")
    } else {
        format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS uq_{table}_owner_start \
             ON {table}(owner_type, owner_id, start_time);"
        )
    }
}

pub async fn initialize_database(pool: &Pool<Postgres>, policy: &SlotPolicy) -> Result<()> {
    info!("Initializing database schema...");

    for domain in SlotDomain::ALL {
        for statement in slot_table_ddl(domain) {
            sqlx::query(&statement).execute(pool).await?;
        }
        sqlx::query(&unique_start_ddl(domain, policy))
            .execute(pool)
            .await?;
        info!(table = domain.table(), "Slot table ready");
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
