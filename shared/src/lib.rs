use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A household participant. Referenced by id from bills
/// (`createdBy`, `paidBy`, `recipients`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    /// Optional phone number, stored as entered (reminder delivery is out of scope)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Bill ID in format: "bill::epoch_millis"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: String,
    /// Display title (never empty)
    pub title: String,
    /// Monetary amount in decimal form (validated non-negative at creation)
    pub amount: f64,
    /// Due date, the scheduling key for grid placement and overdue computation.
    /// Serializes as "YYYY-MM-DD".
    #[serde(rename = "dueISO")]
    pub due: NaiveDate,
    /// One of the configured category strings
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub paid: bool,
    /// Member id of the creator
    #[serde(rename = "createdBy")]
    pub created_by: String,
    /// Member id of the payer; present iff `paid` is true
    #[serde(rename = "paidBy", default, skip_serializing_if = "Option::is_none")]
    pub paid_by: Option<String>,
    /// Per-bill override of the global default reminder lead time
    #[serde(rename = "reminderDays", default, skip_serializing_if = "Option::is_none")]
    pub reminder_days: Option<u32>,
    /// Per-bill override of the global default recipient set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipients: Option<Vec<String>>,
}

/// The complete durable unit of application state, and the import/export unit.
///
/// Every field is optional on the wire so partial snapshots merge
/// field-by-field; snapshots written by this code carry all five fields.
/// There is no version field; the storage key carries the namespace version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<Member>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(
        rename = "defaultReminderDays",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub default_reminder_days: Option<u32>,
    #[serde(
        rename = "defaultRecipients",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub default_recipients: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bills: Option<Vec<Bill>>,
}

/// A single cell of the 42-cell month grid skeleton
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GridDay {
    pub date: NaiveDate,
    /// False for the padding cells borrowed from adjacent months
    pub in_current_month: bool,
}

/// A single day in the rendered calendar month, with its bill bucket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// Day-of-month number for display
    pub day: u32,
    pub in_current_month: bool,
    pub is_today: bool,
    pub bills: Vec<Bill>,
}

/// A calendar month joined with its bill data: always 42 days (6 full weeks),
/// Sunday-anchored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarMonth {
    pub month: u32,
    pub year: i32,
    pub days: Vec<CalendarDay>,
}

/// The currently viewed month for calendar navigation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarFocusDate {
    pub month: u32,
    pub year: i32,
}

impl Default for CalendarFocusDate {
    fn default() -> Self {
        let now = chrono::Local::now();
        Self {
            month: now.month(),
            year: now.year(),
        }
    }
}

/// Current date information for headers and default anchors
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentDateResponse {
    pub month: u32,
    pub year: i32,
    pub day: u32,
    pub formatted_date: String, // e.g., "March 16, 2024"
    pub iso_date: String,       // e.g., "2024-03-16"
}

/// Paid/unpaid money totals for one calendar month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyTotals {
    pub total: f64,
    pub paid: f64,
    /// Floored at zero, never negative
    pub unpaid: f64,
}

/// Unpaid bills split around a reference day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DueStatusPartition {
    /// Unpaid bills due strictly before the reference day
    pub overdue: Vec<Bill>,
    /// Unpaid bills due on or after the reference day
    pub upcoming: Vec<Bill>,
}

/// Request for creating a new bill
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateBillRequest {
    pub title: String,
    pub amount: f64,
    pub due: NaiveDate,
    pub category: String,
    pub notes: Option<String>,
    /// Creator member id; defaults to the first household member
    pub created_by: Option<String>,
    /// Reminder override; defaults to the global setting when absent
    pub reminder_days: Option<u32>,
    /// Recipient override; defaults to the global setting when absent
    pub recipients: Option<Vec<String>>,
}

/// Response after creating or updating a bill
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BillResponse {
    pub bill: Bill,
    pub success_message: String,
}

/// Request for adding a household member
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateMemberRequest {
    pub name: String,
    pub phone: Option<String>,
}

/// Response after adding a household member
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemberResponse {
    pub member: Member,
    pub success_message: String,
}

/// Current settings and household roster
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettingsResponse {
    pub members: Vec<Member>,
    pub categories: Vec<String>,
    pub default_reminder_days: u32,
    pub default_recipients: Vec<String>,
}

/// Validation result for bill form input
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BillFormValidation {
    pub is_valid: bool,
    pub errors: Vec<BillValidationError>,
    pub cleaned_amount: Option<f64>,
}

/// Specific validation errors for bill forms
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum BillValidationError {
    EmptyTitle,
    EmptyAmount,
    InvalidAmountFormat(String),
    NegativeAmount,
    NonFiniteAmount,
}

/// An export-ready snapshot document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportedSnapshot {
    /// Pretty-printed JSON of the full snapshot
    pub content: String,
    /// e.g., "bills-2024-03-16.json"
    pub filename: String,
    pub bill_count: usize,
}

/// Summary of a successful snapshot import
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportSummary {
    pub success_message: String,
    /// Bills contained in the imported document
    pub bill_count: usize,
}

/// Outcome of writing an export file to disk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportToPathResponse {
    pub success: bool,
    pub message: String,
    pub file_path: String,
    pub bill_count: usize,
}

impl Bill {
    /// Generate a bill ID based on timestamp
    pub fn generate_id(epoch_millis: u64) -> String {
        format!("bill::{}", epoch_millis)
    }

    /// Parse a bill ID to extract the timestamp
    pub fn parse_id(id: &str) -> Result<u64, BillIdError> {
        let parts: Vec<&str> = id.split("::").collect();
        if parts.len() != 2 || parts[0] != "bill" {
            return Err(BillIdError::InvalidFormat);
        }

        parts[1].parse::<u64>().map_err(|_| BillIdError::InvalidTimestamp)
    }

    /// Extract timestamp from bill ID
    pub fn extract_timestamp(&self) -> Result<u64, BillIdError> {
        Self::parse_id(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BillIdError {
    InvalidFormat,
    InvalidTimestamp,
}

impl fmt::Display for BillIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillIdError::InvalidFormat => write!(f, "Invalid bill ID format"),
            BillIdError::InvalidTimestamp => write!(f, "Invalid timestamp in bill ID"),
        }
    }
}

impl std::error::Error for BillIdError {}

impl Member {
    /// Generate a member ID based on timestamp
    pub fn generate_id(epoch_millis: u64) -> String {
        format!("member::{}", epoch_millis)
    }

    /// Parse a member ID to extract the timestamp
    pub fn parse_id(id: &str) -> Result<u64, MemberIdError> {
        let parts: Vec<&str> = id.split("::").collect();
        if parts.len() != 2 || parts[0] != "member" {
            return Err(MemberIdError::InvalidFormat);
        }

        parts[1]
            .parse::<u64>()
            .map_err(|_| MemberIdError::InvalidTimestamp)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemberIdError {
    InvalidFormat,
    InvalidTimestamp,
}

impl fmt::Display for MemberIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberIdError::InvalidFormat => write!(f, "Invalid member ID format"),
            MemberIdError::InvalidTimestamp => write!(f, "Invalid timestamp in member ID"),
        }
    }
}

impl std::error::Error for MemberIdError {}
