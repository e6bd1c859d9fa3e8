use async_trait::async_trait;
use slotbook_core::{
    errors::{BookingError, BookingResult},
    models::slot::PartyRef,
    store::{PartyRegistry, PartyResolver},
};
use sqlx::{Pool, Postgres};

/// Resolves party references against the host application's own tables.
#[derive(Debug, Clone)]
pub struct PgPartyResolver {
    pool: Pool<Postgres>,
    registry: PartyRegistry,
}

impl PgPartyResolver {
    pub fn new(pool: Pool<Postgres>, registry: PartyRegistry) -> Self {
        Self { pool, registry }
    }
}

#[async_trait]
impl PartyResolver for PgPartyResolver {
    fn is_registered(&self, kind: &str) -> bool {
        self.registry.contains(kind)
    }

    async fn exists(&self, party: &PartyRef) -> BookingResult<bool> {
        let Some(table) = self.registry.table_for(&party.kind) else {
            return Ok(false);
        };

        // `table` comes from the registry, which only holds plain identifiers.
        let sql = format!("SELECT EXISTS (SELECT 1 FROM {table} WHERE id = $1)");
        let exists = sqlx::query_scalar::<_, bool>(&sql)
            .bind(party.id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| BookingError::Store(e.into()))?;

        tracing::debug!(%party, exists, "Resolved party");
        Ok(exists)
    }
}
