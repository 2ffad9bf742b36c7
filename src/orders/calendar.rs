//! Calendar bucket validation for order reports
//!
//! Each report validates its raw query arguments here and gets back an
//! [`OrderFilter`] that the store turns into a single typed query.

use chrono::NaiveDate;

use super::error::OrderError;
use super::repository::OrderFilter;

const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

/// Validate a (year, month, day) triple as a real calendar date
pub fn validate_date(year: i32, month: i32, day: i32) -> Result<NaiveDate, OrderError> {
    let invalid = || OrderError::InvalidDate { year, month, day };
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(invalid());
    }
    let month_u = u32::try_from(month).map_err(|_| invalid())?;
    let day_u = u32::try_from(day).map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month_u, day_u).ok_or_else(invalid)
}

/// Calendar quarter, Q1 = Jan..Mar through Q4 = Oct..Dec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quarter(i32);

impl Quarter {
    pub fn new(quarter: i32) -> Result<Self, OrderError> {
        if !(1..=4).contains(&quarter) {
            return Err(OrderError::ArgumentOutOfRange("quarter must be between 1 and 4"));
        }
        Ok(Self(quarter))
    }

    pub fn first_month(self) -> i32 {
        self.0 * 3 - 2
    }

    pub fn last_month(self) -> i32 {
        self.0 * 3
    }
}

pub fn daily(day: i32, month: i32, year: i32) -> Result<OrderFilter, OrderError> {
    validate_date(year, month, day)?;
    Ok(OrderFilter::Day { day, month, year })
}

pub fn monthly(month: i32, year: i32) -> Result<OrderFilter, OrderError> {
    validate_date(year, month, 1)?;
    Ok(OrderFilter::Month { month, year })
}

pub fn quarterly(quarter: i32, year: i32) -> Result<OrderFilter, OrderError> {
    if year < MIN_YEAR {
        return Err(OrderError::InvalidArgument("year must be positive"));
    }
    let quarter = Quarter::new(quarter)?;
    Ok(OrderFilter::MonthRange {
        first_month: quarter.first_month(),
        last_month: quarter.last_month(),
        year,
    })
}

pub fn yearly(year: i32) -> Result<OrderFilter, OrderError> {
    if year < MIN_YEAR {
        return Err(OrderError::InvalidArgument("year must be positive"));
    }
    Ok(OrderFilter::Year { year })
}
