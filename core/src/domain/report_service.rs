//! Derived views over the bill collection.
//!
//! Everything here is computed on demand from the stored bills; nothing is
//! cached or written back. All projections preserve the collection's
//! insertion order unless a sort is part of the contract.

use chrono::{Datelike, NaiveDate};
use shared::{Bill, DueStatusPartition, MonthlyTotals};

/// How many bills the upcoming sidebar preview shows
pub const UPCOMING_PREVIEW_LIMIT: usize = 6;

/// Service responsible for search, due-status and totals projections
#[derive(Clone, Default)]
pub struct ReportService;

impl ReportService {
    pub fn new() -> Self {
        Self
    }

    /// Case-insensitive substring search over title, category and notes.
    /// A blank (empty or whitespace-only) query returns every bill unchanged.
    pub fn filter_bills(&self, bills: &[Bill], query: &str) -> Vec<Bill> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return bills.to_vec();
        }

        bills
            .iter()
            .filter(|bill| {
                let haystack = format!(
                    "{} {} {}",
                    bill.title,
                    bill.category,
                    bill.notes.as_deref().unwrap_or("")
                )
                .to_lowercase();
                haystack.contains(&q)
            })
            .cloned()
            .collect()
    }

    /// All bills due on exactly the given day
    pub fn bills_due_on(&self, bills: &[Bill], date: NaiveDate) -> Vec<Bill> {
        bills
            .iter()
            .filter(|bill| bill.due == date)
            .cloned()
            .collect()
    }

    /// Split the unpaid bills into overdue (due before the reference day) and
    /// upcoming (due on or after it). Paid bills appear in neither list.
    pub fn partition_by_due_status(
        &self,
        bills: &[Bill],
        reference: NaiveDate,
    ) -> DueStatusPartition {
        let mut overdue = Vec::new();
        let mut upcoming = Vec::new();

        for bill in bills {
            if bill.paid {
                continue;
            }
            if bill.due < reference {
                overdue.push(bill.clone());
            } else {
                upcoming.push(bill.clone());
            }
        }

        DueStatusPartition { overdue, upcoming }
    }

    /// Totals for the bills due in a calendar month.
    ///
    /// `unpaid` is floored at zero so odd imported data (negative amounts)
    /// never produces a negative outstanding figure.
    pub fn monthly_totals(&self, bills: &[Bill], month: u32, year: i32) -> MonthlyTotals {
        let in_month: Vec<&Bill> = bills
            .iter()
            .filter(|bill| bill.due.month() == month && bill.due.year() == year)
            .collect();

        let total: f64 = in_month.iter().map(|bill| bill.amount).sum();
        let paid: f64 = in_month
            .iter()
            .filter(|bill| bill.paid)
            .map(|bill| bill.amount)
            .sum();

        MonthlyTotals {
            total,
            paid,
            unpaid: (total - paid).max(0.0),
        }
    }

    /// The next unpaid bills due on or after the reference day, earliest
    /// first, truncated to `limit`. Bills sharing a due date keep their
    /// insertion order.
    pub fn upcoming_preview(&self, bills: &[Bill], reference: NaiveDate, limit: usize) -> Vec<Bill> {
        let mut upcoming: Vec<Bill> = bills
            .iter()
            .filter(|bill| !bill.paid && bill.due >= reference)
            .cloned()
            .collect();

        upcoming.sort_by_key(|bill| bill.due);
        upcoming.truncate(limit);
        upcoming
    }

    /// Format an amount for display, e.g. `$60.00`
    pub fn format_currency(&self, amount: f64) -> String {
        format!("${:.2}", amount)
    }
}
