//! The live application state and its write-through persistence.
//!
//! `AppStore` owns the working set (members, categories, defaults, bills)
//! behind a mutex and saves the full snapshot through an injected storage
//! backend after every mutation. Save failures are logged and swallowed:
//! a storage problem costs durability for the session, never in-memory
//! consistency.

use log::{error, info, warn};
use shared::{AppSnapshot, Bill, Member};
use std::sync::{Arc, Mutex};

use crate::storage::SnapshotStorage;

/// Seed categories available on first run
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Home",
    "Car",
    "Utilities",
    "Internet",
    "Phone",
    "Insurance",
    "Credit Card",
    "Loan",
    "Investment",
    "Medical",
    "Subscription",
    "Groceries",
    "Misc",
];

/// Default reminder lead time in days
pub const DEFAULT_REMINDER_DAYS: u32 = 1;

/// The in-memory working set backing every service
#[derive(Debug, Clone, PartialEq)]
pub struct AppData {
    pub members: Vec<Member>,
    pub categories: Vec<String>,
    pub default_reminder_days: u32,
    pub default_recipients: Vec<String>,
    pub bills: Vec<Bill>,
}

impl Default for AppData {
    fn default() -> Self {
        Self {
            members: vec![
                Member {
                    id: "u1".to_string(),
                    name: "You".to_string(),
                    phone: Some("+15551234567".to_string()),
                },
                Member {
                    id: "u2".to_string(),
                    name: "Partner".to_string(),
                    phone: Some("+15557654321".to_string()),
                },
            ],
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            default_reminder_days: DEFAULT_REMINDER_DAYS,
            default_recipients: vec!["u1".to_string()],
            bills: Vec::new(),
        }
    }
}

/// Owns the application state and persists it through the injected backend
pub struct AppStore {
    data: Mutex<AppData>,
    storage: Arc<dyn SnapshotStorage>,
}

impl AppStore {
    /// Create the store, rehydrating from the storage backend.
    ///
    /// Missing fields in a stored snapshot keep their first-run defaults;
    /// a missing or unreadable snapshot starts a fresh session.
    pub fn new(storage: Arc<dyn SnapshotStorage>) -> Self {
        let mut data = AppData::default();

        match storage.load() {
            Ok(Some(snapshot)) => {
                info!("Rehydrating state from stored snapshot");
                Self::apply_snapshot_fields(&mut data, snapshot);
            }
            Ok(None) => {
                info!("No stored snapshot found, starting with defaults");
            }
            Err(e) => {
                warn!("Failed to load stored snapshot, starting with defaults: {}", e);
            }
        }

        Self {
            data: Mutex::new(data),
            storage,
        }
    }

    /// Apply each snapshot field independently, leaving the rest untouched
    fn apply_snapshot_fields(data: &mut AppData, snapshot: AppSnapshot) {
        if let Some(members) = snapshot.members {
            data.members = members;
        }
        if let Some(categories) = snapshot.categories {
            data.categories = categories;
        }
        if let Some(days) = snapshot.default_reminder_days {
            data.default_reminder_days = days;
        }
        if let Some(recipients) = snapshot.default_recipients {
            data.default_recipients = recipients;
        }
        if let Some(bills) = snapshot.bills {
            data.bills = bills;
        }
    }

    fn snapshot_from(data: &AppData) -> AppSnapshot {
        AppSnapshot {
            members: Some(data.members.clone()),
            categories: Some(data.categories.clone()),
            default_reminder_days: Some(data.default_reminder_days),
            default_recipients: Some(data.default_recipients.clone()),
            bills: Some(data.bills.clone()),
        }
    }

    /// Write the full snapshot through the backend. Failures are logged and
    /// swallowed so a mutation never fails for storage reasons.
    fn persist(&self, data: &AppData) {
        if let Err(e) = self.storage.save(&Self::snapshot_from(data)) {
            error!("Failed to persist snapshot, continuing in memory only: {}", e);
        }
    }

    /// The full current state as a snapshot (all fields present)
    pub fn snapshot(&self) -> AppSnapshot {
        let data = self.data.lock().unwrap();
        Self::snapshot_from(&data)
    }

    /// Merge a snapshot into the live state field-by-field and persist once
    pub fn merge_snapshot(&self, snapshot: AppSnapshot) {
        let mut data = self.data.lock().unwrap();
        Self::apply_snapshot_fields(&mut data, snapshot);
        self.persist(&data);
        info!("Merged snapshot into live state");
    }

    // --- bills ---

    pub fn bills(&self) -> Vec<Bill> {
        self.data.lock().unwrap().bills.clone()
    }

    pub fn get_bill(&self, bill_id: &str) -> Option<Bill> {
        let data = self.data.lock().unwrap();
        data.bills.iter().find(|b| b.id == bill_id).cloned()
    }

    /// Insert or replace a bill by id. Returns true when an existing record
    /// was replaced, false when the bill was newly inserted.
    pub fn upsert_bill(&self, bill: Bill) -> bool {
        let mut data = self.data.lock().unwrap();

        let replaced = if let Some(pos) = data.bills.iter().position(|b| b.id == bill.id) {
            data.bills[pos] = bill;
            true
        } else {
            data.bills.push(bill);
            false
        };

        self.persist(&data);
        replaced
    }

    /// Remove a bill by id. Returns false (and skips the persistence write)
    /// when no bill matched.
    pub fn remove_bill(&self, bill_id: &str) -> bool {
        let mut data = self.data.lock().unwrap();

        let before = data.bills.len();
        data.bills.retain(|b| b.id != bill_id);
        let removed = data.bills.len() != before;

        if removed {
            self.persist(&data);
        }
        removed
    }

    // --- members ---

    pub fn members(&self) -> Vec<Member> {
        self.data.lock().unwrap().members.clone()
    }

    pub fn get_member(&self, member_id: &str) -> Option<Member> {
        let data = self.data.lock().unwrap();
        data.members.iter().find(|m| m.id == member_id).cloned()
    }

    /// The acting member fallback: the first household member
    pub fn first_member(&self) -> Option<Member> {
        self.data.lock().unwrap().members.first().cloned()
    }

    pub fn add_member(&self, member: Member) {
        let mut data = self.data.lock().unwrap();
        data.members.push(member);
        self.persist(&data);
    }

    /// Remove a member by id, stripping it from the default recipients.
    /// Returns false when no member matched.
    pub fn remove_member(&self, member_id: &str) -> bool {
        let mut data = self.data.lock().unwrap();

        let before = data.members.len();
        data.members.retain(|m| m.id != member_id);
        let removed = data.members.len() != before;

        if removed {
            data.default_recipients.retain(|id| id != member_id);
            self.persist(&data);
        }
        removed
    }

    // --- categories & defaults ---

    pub fn categories(&self) -> Vec<String> {
        self.data.lock().unwrap().categories.clone()
    }

    /// Append a category, preserving insertion order. Returns false (and
    /// skips the persistence write) when the category already exists.
    pub fn add_category(&self, name: &str) -> bool {
        let mut data = self.data.lock().unwrap();

        if data.categories.iter().any(|c| c == name) {
            return false;
        }

        data.categories.push(name.to_string());
        self.persist(&data);
        true
    }

    pub fn default_reminder_days(&self) -> u32 {
        self.data.lock().unwrap().default_reminder_days
    }

    pub fn set_default_reminder_days(&self, days: u32) {
        let mut data = self.data.lock().unwrap();
        data.default_reminder_days = days;
        self.persist(&data);
    }

    pub fn default_recipients(&self) -> Vec<String> {
        self.data.lock().unwrap().default_recipients.clone()
    }

    pub fn set_default_recipients(&self, recipients: Vec<String>) {
        let mut data = self.data.lock().unwrap();
        data.default_recipients = recipients;
        self.persist(&data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemorySnapshotStorage, PersistenceError};
    use chrono::NaiveDate;

    /// Storage that rejects every save, for failure-swallowing tests
    struct FailingStorage;

    impl SnapshotStorage for FailingStorage {
        fn save(&self, _snapshot: &AppSnapshot) -> Result<(), PersistenceError> {
            Err(PersistenceError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )))
        }

        fn load(&self) -> Result<Option<AppSnapshot>, PersistenceError> {
            Ok(None)
        }
    }

    fn test_bill(id: &str, title: &str, due: &str) -> Bill {
        Bill {
            id: id.to_string(),
            title: title.to_string(),
            amount: 60.0,
            due: NaiveDate::parse_from_str(due, "%Y-%m-%d").unwrap(),
            category: "Internet".to_string(),
            notes: None,
            paid: false,
            created_by: "u1".to_string(),
            paid_by: None,
            reminder_days: None,
            recipients: None,
        }
    }

    fn setup_store() -> (AppStore, Arc<MemorySnapshotStorage>) {
        let storage = Arc::new(MemorySnapshotStorage::new());
        let store = AppStore::new(storage.clone());
        (store, storage)
    }

    #[test]
    fn test_first_run_defaults() {
        let (store, _storage) = setup_store();

        let members = store.members();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].id, "u1");
        assert_eq!(members[0].name, "You");
        assert_eq!(members[1].name, "Partner");

        assert_eq!(store.categories().len(), 13);
        assert!(store.categories().contains(&"Credit Card".to_string()));
        assert_eq!(store.default_reminder_days(), 1);
        assert_eq!(store.default_recipients(), vec!["u1".to_string()]);
        assert!(store.bills().is_empty());
    }

    #[test]
    fn test_rehydrates_from_stored_snapshot() {
        let stored = AppSnapshot {
            members: Some(vec![Member {
                id: "m1".to_string(),
                name: "Alex".to_string(),
                phone: None,
            }]),
            categories: Some(vec!["Rent".to_string()]),
            default_reminder_days: Some(4),
            default_recipients: Some(vec!["m1".to_string()]),
            bills: Some(vec![test_bill("bill::1", "Internet", "2024-03-16")]),
        };
        let storage = Arc::new(MemorySnapshotStorage::with_snapshot(stored));
        let store = AppStore::new(storage);

        assert_eq!(store.members().len(), 1);
        assert_eq!(store.categories(), vec!["Rent".to_string()]);
        assert_eq!(store.default_reminder_days(), 4);
        assert_eq!(store.bills().len(), 1);
    }

    #[test]
    fn test_partial_snapshot_keeps_defaults_for_missing_fields() {
        // Snapshot carries only a reminder setting - everything else defaults
        let stored = AppSnapshot {
            default_reminder_days: Some(7),
            ..Default::default()
        };
        let storage = Arc::new(MemorySnapshotStorage::with_snapshot(stored));
        let store = AppStore::new(storage);

        assert_eq!(store.default_reminder_days(), 7);
        assert_eq!(store.members().len(), 2);
        assert_eq!(store.categories().len(), 13);
        assert!(store.bills().is_empty());
    }

    #[test]
    fn test_snapshot_missing_bills_preserves_in_memory_bills() {
        let (store, _storage) = setup_store();
        store.upsert_bill(test_bill("bill::1", "Internet", "2024-03-16"));

        // A merge with no bills field leaves the collection alone
        store.merge_snapshot(AppSnapshot {
            default_reminder_days: Some(2),
            ..Default::default()
        });

        assert_eq!(store.bills().len(), 1);
        assert_eq!(store.default_reminder_days(), 2);
    }

    #[test]
    fn test_mutations_write_through() {
        let (store, storage) = setup_store();

        store.upsert_bill(test_bill("bill::1", "Internet", "2024-03-16"));
        assert_eq!(storage.save_count(), 1);

        store.set_default_reminder_days(3);
        assert_eq!(storage.save_count(), 2);

        // The persisted snapshot reflects the mutation immediately
        let persisted = storage.latest().unwrap();
        assert_eq!(persisted.bills.unwrap().len(), 1);
        assert_eq!(persisted.default_reminder_days, Some(3));
    }

    #[test]
    fn test_upsert_replaces_existing_bill() {
        let (store, _storage) = setup_store();

        let replaced = store.upsert_bill(test_bill("bill::1", "Internet", "2024-03-16"));
        assert!(!replaced);

        let mut edited = test_bill("bill::1", "Internet + TV", "2024-03-18");
        edited.amount = 80.0;
        let replaced = store.upsert_bill(edited);
        assert!(replaced);

        let bills = store.bills();
        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].title, "Internet + TV");
        assert_eq!(bills[0].amount, 80.0);
    }

    #[test]
    fn test_remove_bill_no_op_when_absent() {
        let (store, storage) = setup_store();
        store.upsert_bill(test_bill("bill::1", "Internet", "2024-03-16"));

        assert!(!store.remove_bill("bill::999"));
        assert_eq!(store.bills().len(), 1);
        // No-op removals skip the persistence write
        assert_eq!(storage.save_count(), 1);

        assert!(store.remove_bill("bill::1"));
        assert!(store.bills().is_empty());
        assert_eq!(storage.save_count(), 2);
    }

    #[test]
    fn test_add_category_deduplicates() {
        let (store, storage) = setup_store();

        assert!(store.add_category("Daycare"));
        assert!(!store.add_category("Daycare"));
        assert!(!store.add_category("Internet")); // seeded category

        let count = store
            .categories()
            .iter()
            .filter(|c| c.as_str() == "Daycare")
            .count();
        assert_eq!(count, 1);
        assert_eq!(storage.save_count(), 1);
    }

    #[test]
    fn test_remove_member_strips_default_recipients() {
        let (store, _storage) = setup_store();

        assert!(store.remove_member("u1"));
        assert!(store.default_recipients().is_empty());
        assert_eq!(store.members().len(), 1);

        assert!(!store.remove_member("u1"));
    }

    #[test]
    fn test_persistence_failure_is_swallowed() {
        let store = AppStore::new(Arc::new(FailingStorage));

        // The save fails behind the scenes but the mutation still lands
        store.upsert_bill(test_bill("bill::1", "Internet", "2024-03-16"));
        assert_eq!(store.bills().len(), 1);

        store.set_default_reminder_days(9);
        assert_eq!(store.default_reminder_days(), 9);
    }

    #[test]
    fn test_snapshot_carries_all_fields() {
        let (store, _storage) = setup_store();
        let snapshot = store.snapshot();

        assert!(snapshot.members.is_some());
        assert!(snapshot.categories.is_some());
        assert!(snapshot.default_reminder_days.is_some());
        assert!(snapshot.default_recipients.is_some());
        assert!(snapshot.bills.is_some());
    }
}
