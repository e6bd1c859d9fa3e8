use async_trait::async_trait;
use slotbook_core::{
    errors::{BookingError, BookingResult, Failure, Field, ValidationErrors},
    models::slot::{ClaimantFilter, NewSlot, PartyRef, Slot, SlotDomain, SlotQuery},
    store::SlotStore,
};
use sqlx::{Pool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::{DbSlot, SLOT_COLUMNS};

/// PostgreSQL-backed slots of one booking domain.
#[derive(Debug, Clone)]
pub struct PgSlotStore {
    pool: Pool<Postgres>,
    domain: SlotDomain,
}

impl PgSlotStore {
    pub fn new(pool: Pool<Postgres>, domain: SlotDomain) -> Self {
        Self { pool, domain }
    }

    fn map_insert_error(&self, err: sqlx::Error) -> BookingError {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                // The unique index is the authoritative duplicate guard.
                return ValidationErrors::single(
                    Field::StartTime,
                    Failure::DuplicateStartTime {
                        domain: self.domain,
                    },
                )
                .into();
            }
        }
        store_error(err)
    }
}

fn store_error(err: sqlx::Error) -> BookingError {
    BookingError::Store(err.into())
}

fn into_slots(rows: Vec<DbSlot>) -> BookingResult<Vec<Slot>> {
    rows.into_iter()
        .map(|row| row.into_slot().map_err(BookingError::Store))
        .collect()
}

/// Appends the WHERE clause for `query` to `builder`.
pub fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &SlotQuery) {
    let mut first = true;

    if let Some(owner) = &query.owner {
        clause(builder, &mut first);
        builder.push("owner_type = ").push_bind(owner.kind.clone());
        builder.push(" AND owner_id = ").push_bind(owner.id);
    }
    match &query.claimant {
        ClaimantFilter::Any => {}
        ClaimantFilter::Unclaimed => {
            clause(builder, &mut first);
            builder.push("claimant_id IS NULL");
        }
        ClaimantFilter::Claimed => {
            clause(builder, &mut first);
            builder.push("claimant_id IS NOT NULL");
        }
        ClaimantFilter::By(claimant) => {
            clause(builder, &mut first);
            builder.push("claimant_type = ").push_bind(claimant.kind.clone());
            builder.push(" AND claimant_id = ").push_bind(claimant.id);
        }
    }
    if let Some(after) = query.start_after {
        clause(builder, &mut first);
        builder.push("start_time > ").push_bind(after);
    }
    if let Some(from) = query.start_from {
        clause(builder, &mut first);
        builder.push("start_time >= ").push_bind(from);
    }
    if let Some(before) = query.start_before {
        clause(builder, &mut first);
        builder.push("start_time < ").push_bind(before);
    }
    if let Some(at) = query.start_at {
        clause(builder, &mut first);
        builder.push("start_time = ").push_bind(at);
    }
    if let Some(point) = query.contains {
        clause(builder, &mut first);
        builder.push("start_time <= ").push_bind(point);
        builder.push(" AND end_time > ").push_bind(point);
    }
}

fn clause(builder: &mut QueryBuilder<'_, Postgres>, first: &mut bool) {
    builder.push(if *first { " WHERE " } else { " AND " });
    *first = false;
}

pub fn select_query<'a>(table: &str, query: &SlotQuery) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {SLOT_COLUMNS} FROM {table}"));
    push_filters(&mut builder, query);
    builder.push(" ORDER BY start_time ASC, id ASC");
    if let Some(limit) = query.limit {
        builder.push(" LIMIT ").push_bind(limit);
    }
    builder
}

pub fn exists_query<'a>(table: &str, query: &SlotQuery) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT EXISTS (SELECT 1 FROM {table}"));
    push_filters(&mut builder, query);
    builder.push(")");
    builder
}

#[async_trait]
impl SlotStore for PgSlotStore {
    async fn insert_batch(&self, slots: Vec<NewSlot>) -> BookingResult<Vec<Slot>> {
        let table = self.domain.table();
        let sql = format!(
            r#"
            INSERT INTO {table}
                (id, owner_type, owner_id, claimant_type, claimant_id, start_time, end_time, note)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {SLOT_COLUMNS}
            "#
        );

        let mut tx = self.pool.begin().await.map_err(store_error)?;
        let mut rows = Vec::with_capacity(slots.len());
        for slot in &slots {
            let row = sqlx::query_as::<_, DbSlot>(&sql)
                .bind(Uuid::new_v4())
                .bind(&slot.owner.kind)
                .bind(slot.owner.id)
                .bind(slot.claimant.as_ref().map(|c| c.kind.as_str()))
                .bind(slot.claimant.as_ref().map(|c| c.id))
                .bind(slot.start_time)
                .bind(slot.end_time)
                .bind(slot.note.as_deref())
                .fetch_one(&mut *tx)
                .await
                // Dropping `tx` rolls the whole batch back.
                .map_err(|e| self.map_insert_error(e))?;
            rows.push(row);
        }
        tx.commit().await.map_err(|e| self.map_insert_error(e))?;

        tracing::debug!(table, inserted = rows.len(), "Inserted slot batch");
        into_slots(rows)
    }

    async fn query(&self, query: &SlotQuery) -> BookingResult<Vec<Slot>> {
        tracing::debug!(table = self.domain.table(), ?query, "Querying slots");
        let rows = select_query(self.domain.table(), query)
            .build_query_as::<DbSlot>()
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;
        into_slots(rows)
    }

    async fn exists(&self, query: &SlotQuery) -> BookingResult<bool> {
        exists_query(self.domain.table(), query)
            .build_query_scalar::<bool>()
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)
    }

    async fn find(&self, id: Uuid) -> BookingResult<Option<Slot>> {
        let sql = format!("SELECT {SLOT_COLUMNS} FROM {} WHERE id = $1", self.domain.table());
        let row = sqlx::query_as::<_, DbSlot>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;
        row.map(|r| r.into_slot().map_err(BookingError::Store))
            .transpose()
    }

    async fn update_claimant(
        &self,
        id: Uuid,
        expected: Option<PartyRef>,
        claimant: Option<PartyRef>,
    ) -> BookingResult<Option<Slot>> {
        let sql = format!(
            r#"
            UPDATE {}
            SET claimant_type = $2, claimant_id = $3, updated_at = LOCALTIMESTAMP
            WHERE id = $1
              AND claimant_type IS NOT DISTINCT FROM $4
              AND claimant_id IS NOT DISTINCT FROM $5
            RETURNING {SLOT_COLUMNS}
            "#,
            self.domain.table()
        );

        let row = sqlx::query_as::<_, DbSlot>(&sql)
            .bind(id)
            .bind(claimant.as_ref().map(|c| c.kind.as_str()))
            .bind(claimant.as_ref().map(|c| c.id))
            .bind(expected.as_ref().map(|c| c.kind.as_str()))
            .bind(expected.as_ref().map(|c| c.id))
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;

        tracing::debug!(%id, updated = row.is_some(), "Compare-and-set on slot claimant");
        row.map(|r| r.into_slot().map_err(BookingError::Store))
            .transpose()
    }
}
