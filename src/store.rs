// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::entries::{check_entry, NewCategory, NewTransaction};
use crate::errors::{CoreError, CoreResult};
use crate::models::{Category, SummaryResult, Transaction};

/// `GET/POST /categories`, `DELETE /categories/{id}`.
pub trait CategoryStore {
    fn list_categories(&self) -> CoreResult<Vec<Category>>;
    fn create_category(&mut self, draft: &NewCategory) -> CoreResult<Category>;
    /// Must fail with [`CoreError::Conflict`] while any transaction still
    /// references the category.
    fn delete_category(&mut self, id: &str) -> CoreResult<()>;
}

/// `GET/POST /transactions`, `GET /transactions/summary`,
/// `DELETE /transactions/{id}`.
pub trait TransactionStore {
    fn list_transactions(&self) -> CoreResult<Vec<Transaction>>;
    /// Server-side totals, when the backend offers them.
    fn summary(&self) -> CoreResult<Option<SummaryResult>>;
    fn create_transaction(&mut self, draft: &NewTransaction) -> CoreResult<Transaction>;
    fn delete_transaction(&mut self, id: &str) -> CoreResult<()>;
}

/// Everything a command needs from a backend.
pub trait Store: CategoryStore + TransactionStore + Sync {}

impl<T: CategoryStore + TransactionStore + Sync> Store for T {}

impl<T: CategoryStore + ?Sized> CategoryStore for &mut T {
    fn list_categories(&self) -> CoreResult<Vec<Category>> {
        (**self).list_categories()
    }

    fn create_category(&mut self, draft: &NewCategory) -> CoreResult<Category> {
        (**self).create_category(draft)
    }

    fn delete_category(&mut self, id: &str) -> CoreResult<()> {
        (**self).delete_category(id)
    }
}

/// Categories and transactions fetched together. The two reads run
/// concurrently; nothing is aggregated until both have returned.
pub fn fetch_all<S>(store: &S) -> CoreResult<(Vec<Category>, Vec<Transaction>)>
where
    S: CategoryStore + TransactionStore + Sync + ?Sized,
{
    std::thread::scope(|scope| {
        let categories = scope.spawn(|| store.list_categories());
        let transactions = store.list_transactions();
        let categories = categories
            .join()
            .map_err(|_| CoreError::Network("category fetch panicked".into()))?;
        Ok((categories?, transactions?))
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// In-process store with the same integrity rules as the remote API. Backs
/// the `--data` offline mode and the test suite.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Snapshot,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(data: Snapshot) -> Self {
        Self { data }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.data
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;
        if !path.exists() {
            return Ok(Self::new());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Read data file {}", path.display()))?;
        let data: Snapshot = serde_json::from_str(&raw)
            .with_context(|| format!("Parse data file {}", path.display()))?;
        Ok(Self::from_snapshot(data))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&self.data)?;
        crate::export::write_atomic(path, json.as_bytes())?;
        Ok(())
    }

    fn next_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

impl CategoryStore for MemoryStore {
    fn list_categories(&self) -> CoreResult<Vec<Category>> {
        Ok(self.data.categories.clone())
    }

    fn create_category(&mut self, draft: &NewCategory) -> CoreResult<Category> {
        let category = Category {
            id: Self::next_id(),
            name: draft.name.clone(),
            r#type: draft.r#type,
            icon: Some(draft.icon.clone()),
        };
        self.data.categories.push(category.clone());
        Ok(category)
    }

    fn delete_category(&mut self, id: &str) -> CoreResult<()> {
        let pos = self
            .data
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CoreError::NotFound(format!("Category '{}' not found", id)))?;
        let in_use = self
            .data
            .transactions
            .iter()
            .filter(|tx| tx.category_id() == id)
            .count();
        if in_use > 0 {
            return Err(CoreError::Conflict(format!(
                "Category '{}' is still used by {} transaction(s)",
                self.data.categories[pos].name, in_use
            )));
        }
        self.data.categories.remove(pos);
        Ok(())
    }
}

impl TransactionStore for MemoryStore {
    fn list_transactions(&self) -> CoreResult<Vec<Transaction>> {
        let mut txs = self.data.transactions.clone();
        // Newest first, like the API
        txs.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(txs)
    }

    fn summary(&self) -> CoreResult<Option<SummaryResult>> {
        Ok(None)
    }

    fn create_transaction(&mut self, draft: &NewTransaction) -> CoreResult<Transaction> {
        let category = self
            .data
            .categories
            .iter()
            .find(|c| c.id == draft.category_id)
            .cloned()
            .ok_or_else(|| {
                CoreError::NotFound(format!("Category '{}' not found", draft.category_id))
            })?;
        check_entry(draft.amount, draft.r#type, &category)?;
        let tx = Transaction {
            id: Self::next_id(),
            amount: draft.amount,
            r#type: draft.r#type,
            date: draft.date,
            note: draft.note.clone(),
            category,
        };
        self.data.transactions.push(tx.clone());
        Ok(tx)
    }

    fn delete_transaction(&mut self, id: &str) -> CoreResult<()> {
        let before = self.data.transactions.len();
        self.data.transactions.retain(|tx| tx.id != id);
        if self.data.transactions.len() == before {
            return Err(CoreError::NotFound(format!("Transaction '{}' not found", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TxType;
    use chrono::NaiveDate;

    fn store_with_food() -> (MemoryStore, Category) {
        let mut store = MemoryStore::new();
        let food = store
            .create_category(&NewCategory::new("Food", TxType::Expense, Some("🍽️")).unwrap())
            .unwrap();
        (store, food)
    }

    fn spend(category: &Category, amount: i64) -> NewTransaction {
        NewTransaction {
            amount,
            r#type: TxType::Expense,
            category_id: category.id.clone(),
            date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            note: None,
        }
    }

    #[test]
    fn delete_referenced_category_conflicts() {
        let (mut store, food) = store_with_food();
        store.create_transaction(&spend(&food, 10_000)).unwrap();
        let err = store.delete_category(&food.id).unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
        assert_eq!(store.list_categories().unwrap().len(), 1);
    }

    #[test]
    fn delete_unknown_ids_are_not_found() {
        let (mut store, _) = store_with_food();
        assert!(matches!(
            store.delete_category("nope"),
            Err(CoreError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_transaction("nope"),
            Err(CoreError::NotFound(_))
        ));
    }

    #[test]
    fn transaction_embeds_its_category() {
        let (mut store, food) = store_with_food();
        let tx = store.create_transaction(&spend(&food, 5)).unwrap();
        assert_eq!(tx.category, food);
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        let (mut store, food) = store_with_food();
        for amount in [0, -500] {
            assert!(matches!(
                store.create_transaction(&spend(&food, amount)),
                Err(CoreError::Validation(_))
            ));
        }
        assert!(store.list_transactions().unwrap().is_empty());
    }

    #[test]
    fn transaction_type_must_match_its_category() {
        let (mut store, food) = store_with_food();
        let draft = NewTransaction {
            r#type: TxType::Income,
            ..spend(&food, 10_000)
        };
        assert!(matches!(
            store.create_transaction(&draft),
            Err(CoreError::Validation(_))
        ));
        assert!(store.list_transactions().unwrap().is_empty());
    }

    #[test]
    fn fetch_all_returns_both_collections() {
        let (mut store, food) = store_with_food();
        store.create_transaction(&spend(&food, 5)).unwrap();
        let (cats, txs) = fetch_all(&store).unwrap();
        assert_eq!(cats.len(), 1);
        assert_eq!(txs.len(), 1);
    }
}
