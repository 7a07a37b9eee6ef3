//! Savings schedule arithmetic and generated identifiers.
//!
//! Amounts are minor currency units. A savings account runs from its start
//! date for `duration_months` calendar months, with one marking per day.

use chrono::{Datelike, Months, NaiveDate};
use rand::Rng;
use susu_sdk::SavingsAccount;

pub const DEFAULT_COMMISSION_DAYS: i32 = 30;

const TRACKING_NUMBER_LEN: usize = 10;
const BUSINESS_CODE_LEN: usize = 6;
const BUSINESS_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Last day of the account: `start + months - 1 day`. `None` when out of range
/// or `months` is not positive.
#[must_use]
pub fn end_date(start: NaiveDate, months: i32) -> Option<NaiveDate> {
    let months = u32::try_from(months).ok().filter(|m| *m > 0)?;
    start.checked_add_months(Months::new(months))?.pred_opt()
}

/// Number of scheduled days, both ends included.
#[must_use]
pub fn total_days(start: NaiveDate, end: NaiveDate) -> i64 {
    end.signed_duration_since(start).num_days() + 1
}

/// Calendar months touched by `start..=end`, partial months included.
#[must_use]
pub fn span_months(start: NaiveDate, end: NaiveDate) -> Option<i32> {
    let index = |d: NaiveDate| i64::from(d.year()) * 12 + i64::from(d.month0());
    i32::try_from(index(end) - index(start) + 1).ok()
}

/// `target` spread evenly over `days`, rounded half up.
#[must_use]
pub fn daily_share(target: i64, days: i64) -> Option<i64> {
    if days <= 0 {
        return None;
    }
    Some(target.checked_add(days / 2)? / days)
}

/// Every date from `start` to `end` inclusive.
#[must_use]
pub fn schedule_dates(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// `commission_amount` per started commission period over the whole account.
#[must_use]
pub fn total_commission(account: &SavingsAccount) -> i64 {
    let Ok(period) = u64::try_from(account.commission_days) else {
        return 0;
    };
    if period == 0 {
        return 0;
    }
    let days = u64::try_from(total_days(account.start_date, account.end_date)).unwrap_or(0);
    let periods = i64::try_from(days.div_ceil(period)).unwrap_or(i64::MAX);
    account.commission_amount.saturating_mul(periods)
}

/// Whether `date` is the first day of a commission period.
#[must_use]
pub fn opens_commission_period(start: NaiveDate, date: NaiveDate, commission_days: i32) -> bool {
    if commission_days <= 0 || date < start {
        return false;
    }
    date.signed_duration_since(start).num_days() % i64::from(commission_days) == 0
}

/// Ten random decimal digits.
#[must_use]
pub fn tracking_number() -> String {
    let mut rng = rand::rng();
    (0..TRACKING_NUMBER_LEN)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// Six random upper-case alphanumerics.
#[must_use]
pub fn business_code() -> String {
    let mut rng = rand::rng();
    (0..BUSINESS_CODE_LEN)
        .map(|_| {
            let idx = rng.random_range(0..BUSINESS_CODE_ALPHABET.len());
            char::from(BUSINESS_CODE_ALPHABET[idx])
        })
        .collect()
}
