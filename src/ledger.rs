// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::entries::NewCategory;
use crate::errors::{CoreError, CoreResult};
use crate::models::{Category, TxType};
use crate::store::CategoryStore;

/// Local view of the category set, refreshed from the store after every
/// mutation so it never drifts from what the backend holds.
pub struct CategoryLedger<S> {
    store: S,
    categories: Vec<Category>,
}

impl<S: CategoryStore> CategoryLedger<S> {
    pub fn load(store: S) -> CoreResult<Self> {
        let categories = store.list_categories()?;
        Ok(Self { store, categories })
    }

    pub fn refresh(&mut self) -> CoreResult<()> {
        self.categories = self.store.list_categories()?;
        Ok(())
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn create(&mut self, name: &str, kind: TxType, icon: Option<&str>) -> CoreResult<Category> {
        let draft = NewCategory::new(name, kind, icon)?;
        let created = self.store.create_category(&draft)?;
        tracing::info!(id = %created.id, name = %created.name, "category created");
        self.refresh()?;
        Ok(created)
    }

    /// Removes a category. A category still referenced by a transaction
    /// yields [`CoreError::Conflict`] and the view is left untouched.
    pub fn delete(&mut self, id: &str) -> CoreResult<()> {
        match self.store.delete_category(id) {
            Ok(()) => {
                tracing::info!(%id, "category deleted");
                self.refresh()
            }
            Err(err @ CoreError::Conflict(_)) => {
                tracing::info!(%id, "category delete blocked: still referenced");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    pub fn list_by_type(&self, kind: TxType) -> Vec<&Category> {
        self.categories.iter().filter(|c| c.r#type == kind).collect()
    }

    pub fn find(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::NewTransaction;
    use crate::store::{MemoryStore, TransactionStore};
    use chrono::NaiveDate;

    #[test]
    fn create_validates_and_lists_by_type() {
        let mut ledger = CategoryLedger::load(MemoryStore::new()).unwrap();
        ledger.create("Food", TxType::Expense, Some("🍽️")).unwrap();
        ledger.create("Salary", TxType::Income, None).unwrap();
        ledger.create("Transport", TxType::Expense, None).unwrap();
        assert!(matches!(
            ledger.create(" ", TxType::Expense, None),
            Err(CoreError::Validation(_))
        ));

        let names: Vec<_> = ledger
            .list_by_type(TxType::Expense)
            .into_iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Food", "Transport"]);
        assert_eq!(ledger.list_by_type(TxType::Income)[0].icon.as_deref(), Some("🏷️"));
    }

    #[test]
    fn delete_guard_surfaces_conflict_then_allows_after_cleanup() {
        let mut ledger = CategoryLedger::load(MemoryStore::new()).unwrap();
        let food = ledger.create("Food", TxType::Expense, None).unwrap();
        let draft = NewTransaction::prepare(
            "12.000",
            TxType::Expense,
            Some(&food.id),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            None,
            ledger.categories(),
        )
        .unwrap();
        let tx = ledger.store_mut().create_transaction(&draft).unwrap();

        assert!(matches!(ledger.delete(&food.id), Err(CoreError::Conflict(_))));
        assert_eq!(ledger.list_by_type(TxType::Expense).len(), 1);

        ledger.store_mut().delete_transaction(&tx.id).unwrap();
        ledger.delete(&food.id).unwrap();
        assert!(ledger.list_by_type(TxType::Expense).is_empty());
        assert!(ledger.find(&food.id).is_none());
    }
}
