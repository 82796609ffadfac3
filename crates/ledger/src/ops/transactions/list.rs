use sea_orm::{Condition, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*};

use crate::{Page, ResultLedger, Transaction, TransactionFilter, transactions};

use super::super::{Ledger, with_tx};

/// Stand-in limit when only an offset is given; some backends need a LIMIT
/// clause before OFFSET.
const UNBOUNDED_LIMIT: u64 = i64::MAX as u64;

trait ApplyTxFilters: QueryFilter + Sized {
    fn apply_tx_filters(self, filter: &TransactionFilter) -> Self;
}

impl<T> ApplyTxFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_tx_filters(mut self, filter: &TransactionFilter) -> Self {
        let wallet_id = filter.wallet_id.to_string();
        self = self.filter(
            Condition::any()
                .add(transactions::Column::SenderWalletId.eq(wallet_id.clone()))
                .add(transactions::Column::RecipientWalletId.eq(wallet_id)),
        );
        if let Some(operation_type) = filter.operation_type {
            self = self.filter(transactions::Column::OperationType.eq(operation_type.as_str()));
        }
        if let Some(gte) = filter.processed_at_gte {
            self = self.filter(transactions::Column::ProcessedAt.gte(gte));
        }
        if let Some(lte) = filter.processed_at_lte {
            self = self.filter(transactions::Column::ProcessedAt.lte(lte));
        }
        self
    }
}

impl Ledger {
    /// Lists the transactions a wallet took part in, newest first.
    ///
    /// Ordering is `(processed_at DESC, id DESC)`, so transactions stamped
    /// with the same instant come back in reverse insertion order and
    /// consecutive pages never overlap.
    pub async fn query_transactions(
        &self,
        page: Page,
        filter: &TransactionFilter,
    ) -> ResultLedger<Vec<Transaction>> {
        filter.validate()?;
        with_tx!(self, |db_tx| {
            let mut query = transactions::Entity::find()
                .apply_tx_filters(filter)
                .order_by_desc(transactions::Column::ProcessedAt)
                .order_by_desc(transactions::Column::Id);

            match (page.limit, page.offset) {
                (Some(limit), offset) => {
                    query = query.limit(limit);
                    if let Some(offset) = offset {
                        query = query.offset(offset);
                    }
                }
                (None, Some(offset)) => {
                    query = query.limit(UNBOUNDED_LIMIT).offset(offset);
                }
                (None, None) => {}
            }

            let rows: Vec<transactions::Model> = query.all(&db_tx).await?;
            let mut out = Vec::with_capacity(rows.len());
            for model in rows {
                out.push(Transaction::try_from(model)?);
            }
            Ok(out)
        })
    }
}
