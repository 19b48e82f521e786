//! Journal repository: Postgres implementation of the ledger store.
//!
//! Each [`JournalTx`] wraps one database transaction. Account rows are locked
//! with `SELECT ... FOR UPDATE` in id order, and the deferred balance trigger
//! re-checks every posted entry at commit.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    Set, TransactionTrait, Unchanged,
};
use seashore_core::ledger::{
    JournalEntry, JournalEntryLine, LedgerError, LedgerStore, LedgerTx, SourceLinks,
};
use seashore_shared::types::{
    AccountId, BranchId, ClientId, JournalEntryId, JournalLineId, LoanId, SavingsAccountId,
    TransactionId, UserId,
};
use uuid::Uuid;

use super::storage;
use crate::entities::{
    chart_of_accounts, journal_entries, journal_entry_lines, sea_orm_active_enums::EntryStatus,
};

/// Journal repository over a connection pool.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the entries of a branch, newest business date first.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the database query fails.
    pub async fn entries_for_branch(
        &self,
        branch: BranchId,
    ) -> Result<Vec<JournalEntry>, LedgerError> {
        let headers = journal_entries::Entity::find()
            .filter(journal_entries::Column::BranchId.eq(Uuid::from(branch)))
            .order_by_desc(journal_entries::Column::TransactionDate)
            .order_by_desc(journal_entries::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(storage)?;

        let mut entries = Vec::with_capacity(headers.len());
        for header in headers {
            entries.push(load_lines(&self.db, header).await?);
        }
        Ok(entries)
    }
}

#[async_trait]
impl LedgerStore for JournalRepository {
    type Tx = JournalTx;

    async fn begin(&self) -> Result<JournalTx, LedgerError> {
        self.db.begin().await.map(JournalTx::from).map_err(storage)
    }

    async fn find_entry(&self, id: JournalEntryId) -> Result<Option<JournalEntry>, LedgerError> {
        let header = journal_entries::Entity::find_by_id(Uuid::from(id))
            .one(&self.db)
            .await
            .map_err(storage)?;
        match header {
            Some(header) => load_lines(&self.db, header).await.map(Some),
            None => Ok(None),
        }
    }

    async fn balance_lines(
        &self,
        account: AccountId,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<JournalEntryLine>, LedgerError> {
        let mut query = journal_entry_lines::Entity::find()
            .join(
                JoinType::InnerJoin,
                journal_entry_lines::Relation::JournalEntries.def(),
            )
            .filter(journal_entry_lines::Column::AccountId.eq(Uuid::from(account)))
            .filter(
                journal_entries::Column::Status.is_in([EntryStatus::Posted, EntryStatus::Reversed]),
            );
        if let Some(as_of) = as_of {
            query = query.filter(journal_entries::Column::PostingDate.lte(as_of));
        }

        let lines = query
            .order_by_asc(journal_entry_lines::Column::JournalEntryId)
            .order_by_asc(journal_entry_lines::Column::LineNo)
            .all(&self.db)
            .await
            .map_err(storage)?;

        let codes = account_codes(&self.db, &lines).await?;
        lines
            .into_iter()
            .map(|line| line_from_model(line, &codes))
            .collect()
    }
}

/// One Postgres transaction used as a ledger unit of work.
///
/// Dropping it without committing rolls the transaction back.
#[derive(Debug)]
pub struct JournalTx {
    txn: DatabaseTransaction,
}

impl JournalTx {
    /// The underlying transaction, for business writes that must commit
    /// together with the journal entry.
    pub fn connection(&self) -> &DatabaseTransaction {
        &self.txn
    }
}

impl From<DatabaseTransaction> for JournalTx {
    fn from(txn: DatabaseTransaction) -> Self {
        Self { txn }
    }
}

#[async_trait]
impl LedgerTx for JournalTx {
    async fn lock_accounts(&mut self, ids: &[AccountId]) -> Result<(), LedgerError> {
        if ids.is_empty() {
            return Ok(());
        }
        chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::Id.is_in(ids.iter().copied().map(Uuid::from)))
            .order_by_asc(chart_of_accounts::Column::Id)
            .lock_exclusive()
            .all(&self.txn)
            .await
            .map_err(storage)?;
        Ok(())
    }

    async fn journal_number_taken(&mut self, number: &str) -> Result<bool, LedgerError> {
        let count = journal_entries::Entity::find()
            .filter(journal_entries::Column::JournalNumber.eq(number))
            .count(&self.txn)
            .await
            .map_err(storage)?;
        Ok(count > 0)
    }

    async fn insert_entry(&mut self, entry: &JournalEntry) -> Result<(), LedgerError> {
        header_to_model(entry).insert(&self.txn).await.map_err(storage)?;

        let lines = entry
            .lines
            .iter()
            .map(line_to_model)
            .collect::<Result<Vec<_>, _>>()?;
        journal_entry_lines::Entity::insert_many(lines)
            .exec(&self.txn)
            .await
            .map_err(storage)?;
        Ok(())
    }

    async fn load_entry_for_update(
        &mut self,
        id: JournalEntryId,
    ) -> Result<Option<JournalEntry>, LedgerError> {
        let header = journal_entries::Entity::find_by_id(Uuid::from(id))
            .lock_exclusive()
            .one(&self.txn)
            .await
            .map_err(storage)?;
        match header {
            Some(header) => load_lines(&self.txn, header).await.map(Some),
            None => Ok(None),
        }
    }

    async fn update_status(&mut self, entry: &JournalEntry) -> Result<(), LedgerError> {
        let model = journal_entries::ActiveModel {
            id: Unchanged(entry.id.into()),
            status: Set(entry.status.into()),
            posting_date: Set(entry.posting_date),
            posted_by: Set(entry.posted_by.map(Uuid::from)),
            posted_at: Set(entry.posted_at.map(Into::into)),
            ..Default::default()
        };
        match model.update(&self.txn).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(LedgerError::EntryNotFound(entry.id)),
            Err(err) => Err(storage(err)),
        }
    }

    async fn commit(self) -> Result<(), LedgerError> {
        self.txn.commit().await.map_err(storage)
    }

    async fn rollback(self) -> Result<(), LedgerError> {
        self.txn.rollback().await.map_err(storage)
    }
}

async fn load_lines<C: ConnectionTrait>(
    db: &C,
    header: journal_entries::Model,
) -> Result<JournalEntry, LedgerError> {
    let lines = journal_entry_lines::Entity::find()
        .filter(journal_entry_lines::Column::JournalEntryId.eq(header.id))
        .order_by_asc(journal_entry_lines::Column::LineNo)
        .all(db)
        .await
        .map_err(storage)?;
    let codes = account_codes(db, &lines).await?;
    let lines = lines
        .into_iter()
        .map(|line| line_from_model(line, &codes))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(header_from_model(header, lines))
}

async fn account_codes<C: ConnectionTrait>(
    db: &C,
    lines: &[journal_entry_lines::Model],
) -> Result<HashMap<Uuid, String>, LedgerError> {
    let mut ids: Vec<Uuid> = lines.iter().map(|line| line.account_id).collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let accounts = chart_of_accounts::Entity::find()
        .filter(chart_of_accounts::Column::Id.is_in(ids))
        .all(db)
        .await
        .map_err(storage)?;
    Ok(accounts
        .into_iter()
        .map(|account| (account.id, account.code))
        .collect())
}

fn header_to_model(entry: &JournalEntry) -> journal_entries::ActiveModel {
    journal_entries::ActiveModel {
        id: Set(entry.id.into()),
        journal_number: Set(entry.journal_number.clone()),
        kind: Set(entry.kind.into()),
        status: Set(entry.status.into()),
        transaction_date: Set(entry.transaction_date),
        posting_date: Set(entry.posting_date),
        branch_id: Set(entry.branch_id.into()),
        description: Set(entry.description.clone()),
        reference_number: Set(entry.reference_number.clone()),
        created_by: Set(entry.created_by.into()),
        created_at: Set(entry.created_at.into()),
        posted_by: Set(entry.posted_by.map(Uuid::from)),
        posted_at: Set(entry.posted_at.map(Into::into)),
        transaction_id: Set(entry.links.transaction_id.map(Uuid::from)),
        loan_id: Set(entry.links.loan_id.map(Uuid::from)),
        savings_account_id: Set(entry.links.savings_account_id.map(Uuid::from)),
        reverses_entry_id: Set(entry.reverses.map(Uuid::from)),
    }
}

fn header_from_model(model: journal_entries::Model, lines: Vec<JournalEntryLine>) -> JournalEntry {
    JournalEntry {
        id: JournalEntryId::from_uuid(model.id),
        journal_number: model.journal_number,
        kind: model.kind.into(),
        status: model.status.into(),
        transaction_date: model.transaction_date,
        posting_date: model.posting_date,
        branch_id: BranchId::from_uuid(model.branch_id),
        description: model.description,
        reference_number: model.reference_number,
        created_by: UserId::from_uuid(model.created_by),
        created_at: model.created_at.with_timezone(&Utc),
        posted_by: model.posted_by.map(UserId::from_uuid),
        posted_at: model.posted_at.map(|at| at.with_timezone(&Utc)),
        links: SourceLinks {
            transaction_id: model.transaction_id.map(TransactionId::from_uuid),
            loan_id: model.loan_id.map(LoanId::from_uuid),
            savings_account_id: model.savings_account_id.map(SavingsAccountId::from_uuid),
        },
        reverses: model.reverses_entry_id.map(JournalEntryId::from_uuid),
        lines,
    }
}

fn line_to_model(line: &JournalEntryLine) -> Result<journal_entry_lines::ActiveModel, LedgerError> {
    let line_no = i32::try_from(line.line_no)
        .map_err(|_| LedgerError::Storage(format!("line number {} out of range", line.line_no)))?;
    Ok(journal_entry_lines::ActiveModel {
        id: Set(line.id.into()),
        journal_entry_id: Set(line.entry_id.into()),
        line_no: Set(line_no),
        account_id: Set(line.account_id.into()),
        debit: Set(line.debit),
        credit: Set(line.credit),
        description: Set(line.description.clone()),
        client_id: Set(line.client_id.map(Uuid::from)),
    })
}

fn line_from_model(
    model: journal_entry_lines::Model,
    codes: &HashMap<Uuid, String>,
) -> Result<JournalEntryLine, LedgerError> {
    let line_no = u32::try_from(model.line_no)
        .map_err(|_| LedgerError::Storage(format!("negative line number {}", model.line_no)))?;
    Ok(JournalEntryLine {
        id: JournalLineId::from_uuid(model.id),
        entry_id: JournalEntryId::from_uuid(model.journal_entry_id),
        line_no,
        account_id: AccountId::from_uuid(model.account_id),
        account_code: codes.get(&model.account_id).cloned().unwrap_or_default(),
        debit: model.debit,
        credit: model.credit,
        description: model.description,
        client_id: model.client_id.map(ClientId::from_uuid),
    })
}
