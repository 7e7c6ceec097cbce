//! Calendar domain logic for the bill tracker.
//!
//! All date arithmetic lives here: day-key normalization, the fixed
//! 42-cell month grid, and the calendar month view joined with bill
//! data. The UI only handles presentation concerns; month navigation
//! state and grid computation are owned by this service.

use anyhow::{bail, Result};
use chrono::{Datelike, Duration, Local, NaiveDate};
use log;
use shared::{Bill, CalendarDay, CalendarFocusDate, CalendarMonth, CurrentDateResponse, GridDay};
use std::sync::{Arc, Mutex};

/// Grid size: always six full weeks, regardless of month length
const GRID_CELLS: i64 = 42;

/// Calendar service that handles all calendar-related business logic
#[derive(Clone)]
pub struct CalendarService {
    /// Current focus date for calendar navigation (month/year only).
    /// This is kept in memory and not persisted.
    current_focus_date: Arc<Mutex<CalendarFocusDate>>,
}

impl CalendarService {
    /// Create a new CalendarService instance
    pub fn new() -> Self {
        Self {
            current_focus_date: Arc::new(Mutex::new(CalendarFocusDate::default())),
        }
    }

    /// Build the 42-cell grid skeleton for the month containing `anchor`.
    ///
    /// Walks back from the first of the month to the preceding Sunday, then
    /// emits 42 consecutive days. Cells borrowed from adjacent months are
    /// marked `in_current_month = false` but still receive bill lookups.
    pub fn build_month_grid(&self, anchor: NaiveDate) -> Vec<GridDay> {
        // Day 1 always exists for a valid date
        let first = anchor.with_day(1).unwrap_or(anchor);

        // chrono's num_days_from_sunday: Sunday = 0, ..., Saturday = 6
        let offset = first.weekday().num_days_from_sunday() as i64;
        let start = first - Duration::days(offset);

        (0..GRID_CELLS)
            .map(|i| {
                let date = start + Duration::days(i);
                GridDay {
                    date,
                    in_current_month: date.month() == first.month()
                        && date.year() == first.year(),
                }
            })
            .collect()
    }

    /// Generate a calendar month view with per-day bill buckets
    pub fn generate_calendar_month(
        &self,
        month: u32,
        year: i32,
        bills: &[Bill],
        today: NaiveDate,
    ) -> Result<CalendarMonth> {
        let first = match NaiveDate::from_ymd_opt(year, month, 1) {
            Some(date) => date,
            None => bail!("Invalid month: {}/{}", month, year),
        };

        log::debug!(
            "🗓️ Generating calendar for {}/{} with {} bills",
            month,
            year,
            bills.len()
        );

        let days = self
            .build_month_grid(first)
            .into_iter()
            .map(|cell| {
                let day_bills: Vec<Bill> = bills
                    .iter()
                    .filter(|bill| bill.due == cell.date)
                    .cloned()
                    .collect();

                CalendarDay {
                    date: cell.date,
                    day: cell.date.day(),
                    in_current_month: cell.in_current_month,
                    is_today: cell.date == today,
                    bills: day_bills,
                }
            })
            .collect();

        Ok(CalendarMonth { month, year, days })
    }

    /// Reduce a date string to a day key, discarding any time component.
    ///
    /// Accepts plain day strings ("2024-03-16") as well as timestamps
    /// ("2024-03-16T09:00:00-04:00").
    pub fn parse_day_key(&self, value: &str) -> Option<NaiveDate> {
        let date_part = value.split('T').next().unwrap_or(value);
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
    }

    /// Today's day key in the local timezone
    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    /// Get the number of days in a given month and year
    pub fn days_in_month(&self, month: u32, year: i32) -> u32 {
        match month {
            2 => {
                if self.is_leap_year(year) {
                    29
                } else {
                    28
                }
            }
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    /// Check if a year is a leap year
    pub fn is_leap_year(&self, year: i32) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    /// Get the human-readable name for a month number
    pub fn month_name(&self, month: u32) -> &'static str {
        match month {
            1 => "January",
            2 => "February",
            3 => "March",
            4 => "April",
            5 => "May",
            6 => "June",
            7 => "July",
            8 => "August",
            9 => "September",
            10 => "October",
            11 => "November",
            12 => "December",
            _ => "Invalid Month",
        }
    }

    /// Get the abbreviated name for a month number
    pub fn month_short_name(&self, month: u32) -> &'static str {
        match month {
            1 => "Jan",
            2 => "Feb",
            3 => "Mar",
            4 => "Apr",
            5 => "May",
            6 => "Jun",
            7 => "Jul",
            8 => "Aug",
            9 => "Sep",
            10 => "Oct",
            11 => "Nov",
            12 => "Dec",
            _ => "???",
        }
    }

    /// Format a month heading, e.g. "March 2024"
    pub fn format_month_year(&self, month: u32, year: i32) -> String {
        format!("{} {}", self.month_name(month), year)
    }

    /// Format a day key for compact display, e.g. "Mar 16"
    pub fn format_short_date(&self, date: NaiveDate) -> String {
        format!("{} {}", self.month_short_name(date.month()), date.day())
    }

    /// Navigate to the previous month
    pub fn previous_month(&self, current_month: u32, current_year: i32) -> (u32, i32) {
        if current_month == 1 {
            (12, current_year - 1)
        } else {
            (current_month - 1, current_year)
        }
    }

    /// Navigate to the next month
    pub fn next_month(&self, current_month: u32, current_year: i32) -> (u32, i32) {
        if current_month == 12 {
            (1, current_year + 1)
        } else {
            (current_month + 1, current_year)
        }
    }

    /// Get current date information
    pub fn get_current_date(&self) -> CurrentDateResponse {
        let now = Local::now();
        let month = now.month();
        let year = now.year();
        let day = now.day();

        let formatted_date = format!("{} {}, {}", self.month_name(month), day, year);
        let iso_date = format!("{:04}-{:02}-{:02}", year, month, day);

        CurrentDateResponse {
            month,
            year,
            day,
            formatted_date,
            iso_date,
        }
    }

    /// Get the current focus date for calendar navigation
    pub fn get_focus_date(&self) -> CalendarFocusDate {
        self.current_focus_date.lock().unwrap().clone()
    }

    /// Set the focus date for calendar navigation
    pub fn set_focus_date(&self, month: u32, year: i32) -> Result<CalendarFocusDate> {
        if month < 1 || month > 12 {
            bail!("Invalid month: {}. Must be between 1 and 12", month);
        }

        let new_focus_date = CalendarFocusDate { month, year };

        {
            let mut focus_date = self.current_focus_date.lock().unwrap();
            *focus_date = new_focus_date.clone();
        }

        Ok(new_focus_date)
    }

    /// Navigate to the previous month
    pub fn navigate_previous_month(&self) -> CalendarFocusDate {
        let current_focus = self.get_focus_date();
        let (prev_month, prev_year) = self.previous_month(current_focus.month, current_focus.year);

        // This should never fail since previous_month returns valid values
        self.set_focus_date(prev_month, prev_year).unwrap()
    }

    /// Navigate to the next month
    pub fn navigate_next_month(&self) -> CalendarFocusDate {
        let current_focus = self.get_focus_date();
        let (next_month, next_year) = self.next_month(current_focus.month, current_focus.year);

        // This should never fail since next_month returns valid values
        self.set_focus_date(next_month, next_year).unwrap()
    }
}

impl Default for CalendarService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn create_test_bill(id: &str, title: &str, due: &str, amount: f64) -> Bill {
        Bill {
            id: id.to_string(),
            title: title.to_string(),
            amount,
            due: NaiveDate::parse_from_str(due, "%Y-%m-%d").unwrap(),
            category: "Utilities".to_string(),
            notes: None,
            paid: false,
            created_by: "u1".to_string(),
            paid_by: None,
            reminder_days: None,
            recipients: None,
        }
    }

    #[test]
    fn test_days_in_month() {
        let service = CalendarService::new();

        // Test regular months
        assert_eq!(service.days_in_month(1, 2025), 31); // January
        assert_eq!(service.days_in_month(4, 2025), 30); // April
        assert_eq!(service.days_in_month(2, 2025), 28); // February (non-leap)
        assert_eq!(service.days_in_month(2, 2024), 29); // February (leap year)
    }

    #[test]
    fn test_is_leap_year() {
        let service = CalendarService::new();

        assert!(!service.is_leap_year(2025)); // Regular year
        assert!(service.is_leap_year(2024)); // Divisible by 4
        assert!(!service.is_leap_year(1900)); // Divisible by 100 but not 400
        assert!(service.is_leap_year(2000)); // Divisible by 400
    }

    #[test]
    fn test_month_name() {
        let service = CalendarService::new();

        assert_eq!(service.month_name(1), "January");
        assert_eq!(service.month_name(6), "June");
        assert_eq!(service.month_name(12), "December");
        assert_eq!(service.month_name(13), "Invalid Month");
    }

    #[test]
    fn test_parse_day_key() {
        let service = CalendarService::new();

        assert_eq!(
            service.parse_day_key("2024-03-16"),
            NaiveDate::from_ymd_opt(2024, 3, 16)
        );

        // Timestamps reduce to their day component
        assert_eq!(
            service.parse_day_key("2025-06-13T09:00:00-04:00"),
            NaiveDate::from_ymd_opt(2025, 6, 13)
        );

        assert_eq!(service.parse_day_key("invalid-date"), None);
        assert_eq!(service.parse_day_key("2024-13-01"), None);
    }

    #[test]
    fn test_format_short_date() {
        let service = CalendarService::new();

        let date = NaiveDate::from_ymd_opt(2024, 3, 16).unwrap();
        assert_eq!(service.format_short_date(date), "Mar 16");
    }

    #[test]
    fn test_format_month_year() {
        let service = CalendarService::new();

        assert_eq!(service.format_month_year(3, 2024), "March 2024");
        assert_eq!(service.format_month_year(12, 2025), "December 2025");
    }

    #[test]
    fn test_build_month_grid_march_2024() {
        let service = CalendarService::new();

        // March 2024 starts on a Friday, so the grid opens on Sunday Feb 25
        let anchor = NaiveDate::from_ymd_opt(2024, 3, 16).unwrap();
        let grid = service.build_month_grid(anchor);

        assert_eq!(grid.len(), 42);
        assert_eq!(grid[0].date, NaiveDate::from_ymd_opt(2024, 2, 25).unwrap());
        assert!(!grid[0].in_current_month);

        // Five leading February cells, then March 1
        assert_eq!(grid[5].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!(grid[5].in_current_month);

        // The last cell runs into April
        assert_eq!(grid[41].date, NaiveDate::from_ymd_opt(2024, 4, 6).unwrap());
        assert!(!grid[41].in_current_month);
    }

    #[test]
    fn test_build_month_grid_month_starting_on_sunday() {
        let service = CalendarService::new();

        // June 2025 starts on a Sunday - no leading padding at all
        let anchor = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let grid = service.build_month_grid(anchor);

        assert_eq!(grid.len(), 42);
        assert_eq!(grid[0].date, anchor);
        assert!(grid[0].in_current_month);
    }

    #[test]
    fn test_build_month_grid_properties() {
        let service = CalendarService::new();

        // Structural guarantees hold for every month, leap years included
        for year in [2023, 2024, 2025, 2026] {
            for month in 1..=12 {
                let anchor = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
                let grid = service.build_month_grid(anchor);

                assert_eq!(grid.len(), 42, "grid size for {}/{}", month, year);
                assert_eq!(
                    grid[0].date.weekday(),
                    Weekday::Sun,
                    "first cell for {}/{}",
                    month,
                    year
                );

                // Strictly consecutive calendar days
                for pair in grid.windows(2) {
                    assert_eq!(pair[1].date, pair[0].date + Duration::days(1));
                }

                // Every day of the anchor month is present and marked in-month
                let in_month = grid.iter().filter(|d| d.in_current_month).count();
                assert_eq!(in_month, service.days_in_month(month, year) as usize);
            }
        }
    }

    #[test]
    fn test_build_month_grid_any_anchor_day() {
        let service = CalendarService::new();

        // Any day of the month produces the same grid as the first
        let from_first = service.build_month_grid(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let from_mid = service.build_month_grid(NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
        let from_last = service.build_month_grid(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());

        assert_eq!(from_first, from_mid);
        assert_eq!(from_first, from_last);
    }

    #[test]
    fn test_generate_calendar_month() {
        let service = CalendarService::new();

        let bills = vec![
            create_test_bill("bill::1", "Internet", "2024-03-16", 60.0),
            create_test_bill("bill::2", "Rent", "2024-03-05", 1200.0),
            // Lands on a trailing padding cell of the March grid
            create_test_bill("bill::3", "Water", "2024-04-03", 30.0),
        ];

        let today = NaiveDate::from_ymd_opt(2024, 3, 16).unwrap();
        let calendar = service
            .generate_calendar_month(3, 2024, &bills, today)
            .unwrap();

        assert_eq!(calendar.month, 3);
        assert_eq!(calendar.year, 2024);
        assert_eq!(calendar.days.len(), 42);

        // Bills bucket onto their due day exactly once
        let day_16 = calendar
            .days
            .iter()
            .find(|d| d.date == today)
            .expect("due day present in grid");
        assert_eq!(day_16.bills.len(), 1);
        assert_eq!(day_16.bills[0].title, "Internet");
        assert!(day_16.is_today);
        assert!(day_16.in_current_month);

        // Padding cells still receive bill lookups
        let april_3 = calendar
            .days
            .iter()
            .find(|d| d.date == NaiveDate::from_ymd_opt(2024, 4, 3).unwrap())
            .expect("padding day present in grid");
        assert!(!april_3.in_current_month);
        assert_eq!(april_3.bills.len(), 1);
        assert_eq!(april_3.bills[0].title, "Water");

        // Exactly one cell is marked today
        let today_count = calendar.days.iter().filter(|d| d.is_today).count();
        assert_eq!(today_count, 1);
    }

    #[test]
    fn test_generate_calendar_month_invalid_month() {
        let service = CalendarService::new();
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        assert!(service.generate_calendar_month(13, 2024, &[], today).is_err());
        assert!(service.generate_calendar_month(0, 2024, &[], today).is_err());
    }

    #[test]
    fn test_navigation() {
        let service = CalendarService::new();

        // Test previous month
        assert_eq!(service.previous_month(6, 2025), (5, 2025));
        assert_eq!(service.previous_month(1, 2025), (12, 2024));

        // Test next month
        assert_eq!(service.next_month(6, 2025), (7, 2025));
        assert_eq!(service.next_month(12, 2025), (1, 2026));
    }

    #[test]
    fn test_get_focus_date() {
        let service = CalendarService::new();

        // Should return current month/year by default
        let focus_date = service.get_focus_date();
        assert!(focus_date.month >= 1 && focus_date.month <= 12);
    }

    #[test]
    fn test_set_focus_date() {
        let service = CalendarService::new();

        // Test valid date
        let result = service.set_focus_date(6, 2025);
        assert!(result.is_ok());
        let focus_date = result.unwrap();
        assert_eq!(focus_date.month, 6);
        assert_eq!(focus_date.year, 2025);

        // Verify it's actually set
        let retrieved = service.get_focus_date();
        assert_eq!(retrieved.month, 6);
        assert_eq!(retrieved.year, 2025);

        // Test invalid month
        let result = service.set_focus_date(13, 2025);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid month"));

        let result = service.set_focus_date(0, 2025);
        assert!(result.is_err());
    }

    #[test]
    fn test_navigate_previous_month() {
        let service = CalendarService::new();

        // Set to June 2025
        service.set_focus_date(6, 2025).unwrap();

        // Navigate to previous month
        let focus_date = service.navigate_previous_month();
        assert_eq!(focus_date.month, 5);
        assert_eq!(focus_date.year, 2025);

        // Test year rollover
        service.set_focus_date(1, 2025).unwrap();
        let focus_date = service.navigate_previous_month();
        assert_eq!(focus_date.month, 12);
        assert_eq!(focus_date.year, 2024);
    }

    #[test]
    fn test_navigate_next_month() {
        let service = CalendarService::new();

        // Set to June 2025
        service.set_focus_date(6, 2025).unwrap();

        // Navigate to next month
        let focus_date = service.navigate_next_month();
        assert_eq!(focus_date.month, 7);
        assert_eq!(focus_date.year, 2025);

        // Test year rollover
        service.set_focus_date(12, 2025).unwrap();
        let focus_date = service.navigate_next_month();
        assert_eq!(focus_date.month, 1);
        assert_eq!(focus_date.year, 2026);
    }
}
