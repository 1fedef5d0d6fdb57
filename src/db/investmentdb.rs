use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::investmentmodel::{
    Investment, InvestmentStatus, Transaction, TransactionStatus, TransactionType,
};

/// Result of recording a verified payment. A reference that was already
/// recorded is reported as such instead of creating a second investment.
#[derive(Debug)]
pub enum RecordOutcome {
    Created(Investment),
    AlreadyRecorded,
}

#[async_trait]
pub trait InvestmentExt {
    async fn record_verified_investment(
        &self,
        user_id: Uuid,
        property_id: Uuid,
        plan_id: &str,
        amount: i64,
        reference: &str,
        description: Option<&str>,
    ) -> Result<RecordOutcome, sqlx::Error>;

    async fn get_investments_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Investment>, sqlx::Error>;

    async fn get_transaction_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Transaction>, sqlx::Error>;
}

#[async_trait]
impl InvestmentExt for DBClient {
    async fn record_verified_investment(
        &self,
        user_id: Uuid,
        property_id: Uuid,
        plan_id: &str,
        amount: i64,
        reference: &str,
        description: Option<&str>,
    ) -> Result<RecordOutcome, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        // The unique index on reference makes this the idempotency gate:
        // a concurrent or repeated callback inserts nothing and returns
        // no row.
        let inserted: Option<(Uuid,)> = sqlx::query_as(
            r#"
            INSERT INTO transactions (user_id, tx_type, amount, status, reference, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (reference) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(TransactionType::Investment)
        .bind(amount)
        .bind(TransactionStatus::Success)
        .bind(reference)
        .bind(description)
        .fetch_optional(&mut *tx)
        .await?;

        if inserted.is_none() {
            tx.rollback().await?;
            return Ok(RecordOutcome::AlreadyRecorded);
        }

        let investment = sqlx::query_as::<_, Investment>(
            r#"
            INSERT INTO investments (user_id, property_id, plan_id, amount, status, start_date)
            VALUES ($1, $2, $3, $4, $5, NOW())
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(property_id)
        .bind(plan_id)
        .bind(amount)
        .bind(InvestmentStatus::Active)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(RecordOutcome::Created(investment))
    }

    async fn get_investments_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Investment>, sqlx::Error> {
        sqlx::query_as::<_, Investment>(
            "SELECT * FROM investments WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_transaction_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Transaction>, sqlx::Error> {
        sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions WHERE reference = $1",
        )
        .bind(reference)
        .fetch_optional(&self.pool)
        .await
    }
}
