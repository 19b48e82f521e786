//! Account repository: chart of accounts storage and code resolution.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    Set,
};
use seashore_core::ledger::{Account, AccountResolver, LedgerError};
use seashore_shared::types::{AccountId, BranchId};
use uuid::Uuid;

use super::storage;
use crate::entities::chart_of_accounts;

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account code already exists in the same scope.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<chart_of_accounts::Model> for Account {
    fn from(model: chart_of_accounts::Model) -> Self {
        Self {
            id: AccountId::from_uuid(model.id),
            code: model.code,
            name: model.name,
            account_type: model.account_type.into(),
            branch: model.branch_id.map(BranchId::from_uuid),
            is_active: model.is_active,
            allows_manual_entries: model.allows_manual_entries,
        }
    }
}

/// Account repository for the chart of accounts.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Adds an account to the chart.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is already used in the account's scope
    /// (globally, or within its branch).
    pub async fn create_account(&self, account: &Account) -> Result<Account, AccountError> {
        let scope = match account.branch {
            Some(branch) => chart_of_accounts::Column::BranchId.eq(Uuid::from(branch)),
            None => chart_of_accounts::Column::BranchId.is_null(),
        };
        let existing = chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::Code.eq(&account.code))
            .filter(scope)
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(AccountError::DuplicateCode(account.code.clone()));
        }

        let now = chrono::Utc::now().into();
        let model = chart_of_accounts::ActiveModel {
            id: Set(account.id.into()),
            code: Set(account.code.clone()),
            name: Set(account.name.clone()),
            account_type: Set(account.account_type.into()),
            branch_id: Set(account.branch.map(Uuid::from)),
            is_active: Set(account.is_active),
            allows_manual_entries: Set(account.allows_manual_entries),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = model.insert(&self.db).await?;
        Ok(model.into())
    }
}

fn visible_from(branch: BranchId) -> Condition {
    Condition::any()
        .add(chart_of_accounts::Column::BranchId.is_null())
        .add(chart_of_accounts::Column::BranchId.eq(Uuid::from(branch)))
}

#[async_trait]
impl AccountResolver for AccountRepository {
    async fn resolve(&self, code: &str, branch: BranchId) -> Result<Option<Account>, LedgerError> {
        let candidates = chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::Code.eq(code))
            .filter(chart_of_accounts::Column::IsActive.eq(true))
            .filter(visible_from(branch))
            .all(&self.db)
            .await
            .map_err(storage)?;

        // A branch-scoped account shadows the global one.
        let chosen = candidates
            .iter()
            .find(|model| model.branch_id.is_some())
            .or_else(|| candidates.first())
            .cloned();
        Ok(chosen.map(Account::from))
    }
}
