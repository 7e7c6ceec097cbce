//! Bill management: validated creation, edits, paid toggling, deletion.
//!
//! Mutations go through the app store, which persists write-through. Save
//! validation (blank title, bad amount) blocks the mutation and leaves the
//! collection untouched; unknown ids on toggle/delete are silent no-ops.

use anyhow::{anyhow, Result};
use log::info;
use shared::{Bill, BillFormValidation, BillResponse, BillValidationError, CreateBillRequest};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::app_store::AppStore;

/// Service for bill CRUD and form validation
#[derive(Clone)]
pub struct BillService {
    store: Arc<AppStore>,
}

impl BillService {
    pub fn new(store: Arc<AppStore>) -> Self {
        Self { store }
    }

    /// Create a new bill.
    ///
    /// Assigns a fresh id, applies the global defaults for `reminder_days`
    /// and `recipients` when the request omits them, and records the acting
    /// member (or the first household member) as creator. New bills always
    /// start unpaid.
    pub fn create_bill(&self, request: CreateBillRequest) -> Result<BillResponse> {
        info!("Creating bill: title={}, due={}", request.title, request.due);

        self.validate_title_and_amount(&request.title, request.amount)?;

        let created_by = match request.created_by {
            Some(id) => {
                if self.store.get_member(&id).is_none() {
                    return Err(anyhow!("Unknown member: {}", id));
                }
                id
            }
            None => self
                .store
                .first_member()
                .map(|m| m.id)
                .ok_or_else(|| anyhow!("No household members configured"))?,
        };

        // Creation snapshots the current defaults as per-bill values
        let reminder_days = request
            .reminder_days
            .unwrap_or_else(|| self.store.default_reminder_days());
        let recipients = request
            .recipients
            .unwrap_or_else(|| self.store.default_recipients());

        let bill = Bill {
            id: self.next_bill_id()?,
            title: request.title.trim().to_string(),
            amount: request.amount,
            due: request.due,
            category: request.category,
            notes: request.notes,
            paid: false,
            created_by,
            paid_by: None,
            reminder_days: Some(reminder_days),
            recipients: Some(recipients),
        };

        self.store.upsert_bill(bill.clone());
        info!("Created bill: {} with ID: {}", bill.title, bill.id);

        Ok(BillResponse {
            bill,
            success_message: "Bill created successfully".to_string(),
        })
    }

    /// Replace the bill matching `bill.id`; when no record matches, the bill
    /// is inserted instead (upsert). Validation rules match `create_bill`,
    /// and `paid_by` is cleared whenever the bill is unpaid.
    pub fn update_bill(&self, bill: Bill) -> Result<BillResponse> {
        self.validate_title_and_amount(&bill.title, bill.amount)?;

        let mut bill = bill;
        bill.title = bill.title.trim().to_string();
        if !bill.paid {
            bill.paid_by = None;
        } else if bill.paid_by.is_none() {
            return Err(anyhow!("A paid bill must have a payer"));
        }

        let replaced = self.store.upsert_bill(bill.clone());
        info!(
            "{} bill: {} with ID: {}",
            if replaced { "Updated" } else { "Inserted" },
            bill.title,
            bill.id
        );

        Ok(BillResponse {
            bill,
            success_message: "Bill updated successfully".to_string(),
        })
    }

    /// Flip a bill's paid flag.
    ///
    /// Marking paid records the acting member (or the first household member)
    /// as payer; marking unpaid clears the payer. Returns `Ok(None)` for an
    /// unknown id.
    pub fn toggle_paid(&self, bill_id: &str, acting_member: Option<&str>) -> Result<Option<Bill>> {
        let mut bill = match self.store.get_bill(bill_id) {
            Some(bill) => bill,
            None => {
                info!("Toggle paid: no bill with ID {}, ignoring", bill_id);
                return Ok(None);
            }
        };

        if bill.paid {
            bill.paid = false;
            bill.paid_by = None;
        } else {
            let payer = match acting_member {
                Some(id) => {
                    if self.store.get_member(id).is_none() {
                        return Err(anyhow!("Unknown member: {}", id));
                    }
                    id.to_string()
                }
                None => self
                    .store
                    .first_member()
                    .map(|m| m.id)
                    .ok_or_else(|| anyhow!("No household members configured"))?,
            };
            bill.paid = true;
            bill.paid_by = Some(payer);
        }

        self.store.upsert_bill(bill.clone());
        info!("Toggled paid for bill {}: paid={}", bill.id, bill.paid);
        Ok(Some(bill))
    }

    /// Remove a bill. Returns false for an unknown id (silent no-op).
    /// Asking the user to confirm is the caller's concern.
    pub fn delete_bill(&self, bill_id: &str) -> bool {
        let removed = self.store.remove_bill(bill_id);
        if removed {
            info!("Deleted bill: {}", bill_id);
        }
        removed
    }

    pub fn get_bill(&self, bill_id: &str) -> Option<Bill> {
        self.store.get_bill(bill_id)
    }

    pub fn list_bills(&self) -> Vec<Bill> {
        self.store.bills()
    }

    /// The reminder lead time for a bill, falling back to the global default
    pub fn effective_reminder_days(&self, bill: &Bill) -> u32 {
        bill.reminder_days
            .unwrap_or_else(|| self.store.default_reminder_days())
    }

    /// The reminder recipients for a bill, falling back to the global default
    pub fn effective_recipients(&self, bill: &Bill) -> Vec<String> {
        bill.recipients
            .clone()
            .unwrap_or_else(|| self.store.default_recipients())
    }

    /// Validate form input before a save attempt, mirroring the save-time
    /// rules so the UI can surface errors up front
    pub fn validate_draft(&self, title: &str, amount_input: &str) -> BillFormValidation {
        let mut errors = Vec::new();

        if title.trim().is_empty() {
            errors.push(BillValidationError::EmptyTitle);
        }

        let cleaned_amount = if amount_input.trim().is_empty() {
            errors.push(BillValidationError::EmptyAmount);
            None
        } else {
            match self.clean_and_parse_amount(amount_input) {
                Ok(amount) if !amount.is_finite() => {
                    errors.push(BillValidationError::NonFiniteAmount);
                    None
                }
                Ok(amount) if amount < 0.0 => {
                    errors.push(BillValidationError::NegativeAmount);
                    None
                }
                Ok(amount) => Some(amount),
                Err(raw) => {
                    errors.push(BillValidationError::InvalidAmountFormat(raw));
                    None
                }
            }
        };

        BillFormValidation {
            is_valid: errors.is_empty(),
            errors,
            cleaned_amount,
        }
    }

    /// Strip currency formatting ("$", commas, spaces) and parse an amount
    pub fn clean_and_parse_amount(&self, amount_input: &str) -> Result<f64, String> {
        let cleaned = amount_input
            .trim()
            .replace("$", "")
            .replace(",", "")
            .replace(" ", "");

        cleaned
            .parse::<f64>()
            .map_err(|_| format!("'{}' is not a valid amount", amount_input.trim()))
    }

    fn validate_title_and_amount(&self, title: &str, amount: f64) -> Result<()> {
        if title.trim().is_empty() {
            return Err(anyhow!("Bill title cannot be empty"));
        }
        if !amount.is_finite() {
            return Err(anyhow!("Bill amount must be a finite number"));
        }
        if amount < 0.0 {
            return Err(anyhow!("Bill amount cannot be negative"));
        }
        Ok(())
    }

    /// Fresh time-based id; same-millisecond creations bump until free
    fn next_bill_id(&self) -> Result<String> {
        let now_millis = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis() as u64;

        let mut millis = now_millis;
        let mut id = Bill::generate_id(millis);
        while self.store.get_bill(&id).is_some() {
            millis += 1;
            id = Bill::generate_id(millis);
        }
        Ok(id)
    }
}
