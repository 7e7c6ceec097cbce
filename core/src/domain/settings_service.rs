//! Household settings: members, categories and reminder defaults.
//!
//! Member removal is conservative: a member referenced by any bill (as
//! creator, payer or reminder recipient) cannot be deleted, so bill history
//! never points at a missing member.

use anyhow::{anyhow, Result};
use log::info;
use shared::{CreateMemberRequest, Member, MemberResponse, SettingsResponse};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::app_store::AppStore;

/// Service responsible for household configuration
#[derive(Clone)]
pub struct SettingsService {
    store: Arc<AppStore>,
}

impl SettingsService {
    pub fn new(store: Arc<AppStore>) -> Self {
        Self { store }
    }

    /// Current household configuration in one response
    pub fn get_settings(&self) -> SettingsResponse {
        SettingsResponse {
            members: self.store.members(),
            categories: self.store.categories(),
            default_reminder_days: self.store.default_reminder_days(),
            default_recipients: self.store.default_recipients(),
        }
    }

    /// Add a household member. The phone number is optional and stored
    /// as entered (no format validation).
    pub fn add_member(&self, request: CreateMemberRequest) -> Result<MemberResponse> {
        info!("Creating member: name={}", request.name);

        if request.name.trim().is_empty() {
            return Err(anyhow!("Member name cannot be empty"));
        }

        let phone = request.phone.and_then(|p| {
            let trimmed = p.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        });

        let member = Member {
            id: self.next_member_id()?,
            name: request.name.trim().to_string(),
            phone,
        };

        self.store.add_member(member.clone());
        info!("Created member: {} with ID: {}", member.name, member.id);

        Ok(MemberResponse {
            member,
            success_message: "Member added successfully".to_string(),
        })
    }

    /// Remove a member. Returns false for an unknown id; fails while any
    /// bill still references the member. Removal also drops the member from
    /// the default reminder recipients.
    pub fn remove_member(&self, member_id: &str) -> Result<bool> {
        if self.store.get_member(member_id).is_none() {
            return Ok(false);
        }

        if self.member_is_referenced(member_id) {
            return Err(anyhow!(
                "Member {} is still referenced by existing bills",
                member_id
            ));
        }

        let removed = self.store.remove_member(member_id);
        if removed {
            info!("Deleted member: {}", member_id);
        }
        Ok(removed)
    }

    pub fn set_default_reminder_days(&self, days: u32) {
        info!("Setting default reminder lead time: {} days", days);
        self.store.set_default_reminder_days(days);
    }

    /// Replace the default reminder recipients. Ids are deduplicated
    /// preserving first occurrence; unknown ids are rejected.
    pub fn set_default_recipients(&self, recipients: Vec<String>) -> Result<()> {
        let mut deduped: Vec<String> = Vec::new();
        for id in recipients {
            if self.store.get_member(&id).is_none() {
                return Err(anyhow!("Unknown member: {}", id));
            }
            if !deduped.contains(&id) {
                deduped.push(id);
            }
        }

        info!("Setting default reminder recipients: {:?}", deduped);
        self.store.set_default_recipients(deduped);
        Ok(())
    }

    /// Append a category. Blank names are rejected; an existing name is a
    /// silent no-op so repeat submissions stay harmless.
    pub fn add_category(&self, name: &str) -> Result<()> {
        let cleaned = name.trim();
        if cleaned.is_empty() {
            return Err(anyhow!("Category name cannot be empty"));
        }

        let added = self.store.add_category(cleaned);
        if added {
            info!("Added category: {}", cleaned);
        }
        Ok(())
    }

    fn member_is_referenced(&self, member_id: &str) -> bool {
        self.store.bills().iter().any(|bill| {
            bill.created_by == member_id
                || bill.paid_by.as_deref() == Some(member_id)
                || bill
                    .recipients
                    .as_ref()
                    .map(|ids| ids.iter().any(|id| id == member_id))
                    .unwrap_or(false)
        })
    }

    /// Fresh time-based id; same-millisecond additions bump until free
    fn next_member_id(&self) -> Result<String> {
        let now_millis = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis() as u64;

        let mut millis = now_millis;
        let mut id = Member::generate_id(millis);
        while self.store.get_member(&id).is_some() {
            millis += 1;
            id = Member::generate_id(millis);
        }
        Ok(id)
    }
}
