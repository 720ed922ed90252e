//! Due dates, and the validation helpers shared by task creation and task edition

use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{TaskError, TaskResult};

/// The due date of a task.
///
/// This is always a real calendar date. It is transmitted as a `YYYY-MM-DD` string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EndDate {
    date: NaiveDate,
}

impl EndDate {
    /// The year must fit in four digits
    pub fn from_ymd(year: i32, month: u32, day: u32) -> TaskResult<Self> {
        if (0..=9999).contains(&year) == false {
            return Err(TaskError::validation(format!("{} is not a four-digit year", year)));
        }
        match NaiveDate::from_ymd_opt(year, month, day) {
            None => Err(TaskError::validation(format!("{:04}-{:02}-{:02} is not a valid calendar date", year, month, day))),
            Some(date) => Ok(Self { date }),
        }
    }

    /// Parse a date sent by the server, or typed by a user.
    ///
    /// Only the date part is significant, so that `2025-03-01` and `2025-03-01T00:00:00.000Z` are the same date.
    pub fn parse(text: &str) -> TaskResult<Self> {
        DateDraft::from_iso(text).to_end_date()
    }

    pub fn year(&self) -> i32  { self.date.year() }
    pub fn month(&self) -> u32 { self.date.month() }
    pub fn day(&self) -> u32   { self.date.day() }

    /// The `YYYY-MM-DD` form of this date
    pub fn to_iso(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Decompose this date into editable fields
    pub fn to_draft(&self) -> DateDraft {
        DateDraft {
            day: format!("{:02}", self.day()),
            month: format!("{:02}", self.month()),
            year: format!("{:04}", self.year()),
        }
    }
}

impl Display for EndDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_iso())
    }
}

impl TryFrom<&str> for EndDate {
    type Error = TaskError;
    fn try_from(text: &str) -> Result<Self, Self::Error> {
        EndDate::parse(text)
    }
}

impl TryFrom<&DateDraft> for EndDate {
    type Error = TaskError;
    fn try_from(draft: &DateDraft) -> Result<Self, Self::Error> {
        draft.to_end_date()
    }
}

/// Used to support serde
impl Serialize for EndDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_iso())
    }
}
/// Used to support serde
impl<'de> Deserialize<'de> for EndDate {
    fn deserialize<D>(deserializer: D) -> Result<EndDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        EndDate::parse(&text).map_err(serde::de::Error::custom)
    }
}



/// A date, as separate day/month/year text fields that a user is editing
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DateDraft {
    pub day: String,
    pub month: String,
    pub year: String,
}

impl DateDraft {
    pub fn new<D: ToString, M: ToString, Y: ToString>(day: D, month: M, year: Y) -> Self {
        Self {
            day: day.to_string(),
            month: month.to_string(),
            year: year.to_string(),
        }
    }

    /// Split an ISO date string (`YYYY-MM-DD`, optionally followed by a time) into fields.
    ///
    /// This never fails: missing parts are left empty, and will be rejected by [`Self::to_end_date`]
    pub fn from_iso(text: &str) -> Self {
        let date_part = text.trim().split('T').next().unwrap_or_default();
        let mut parts = date_part.splitn(3, '-');
        let year = parts.next().unwrap_or_default();
        let month = parts.next().unwrap_or_default();
        let day = parts.next().unwrap_or_default();
        Self::new(day, month, year)
    }

    /// Check every field, zero-pad the day and month, and build the resulting date
    pub fn to_end_date(&self) -> TaskResult<EndDate> {
        let day = pad_field(&self.day, "day", 2)?;
        let month = pad_field(&self.month, "month", 2)?;
        let year = pad_field(&self.year, "year", 4)?;

        // These cannot fail, the fields only contain a few ASCII digits
        let year: i32 = year.parse().map_err(|_| TaskError::validation("invalid year"))?;
        let month: u32 = month.parse().map_err(|_| TaskError::validation("invalid month"))?;
        let day: u32 = day.parse().map_err(|_| TaskError::validation("invalid day"))?;

        EndDate::from_ymd(year, month, day)
    }

    /// The `YYYY-MM-DD` string that will be sent to the server
    pub fn assemble(&self) -> TaskResult<String> {
        self.to_end_date().map(|date| date.to_iso())
    }
}

/// Days and months may be typed with a single digit, years must have all four
fn pad_field(value: &str, name: &str, width: usize) -> TaskResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(TaskError::validation(format!("Please enter a valid date (missing {})", name)));
    }
    if value.chars().all(|c| c.is_ascii_digit()) == false {
        return Err(TaskError::validation(format!("Please enter a valid date ({} must only contain digits)", name)));
    }
    if value.len() > width || (width == 4 && value.len() != 4) {
        return Err(TaskError::validation(format!("Please enter a valid date ({} must have {} digits)", name, width)));
    }
    Ok(format!("{:0>width$}", value, width = width))
}

/// Make sure a title is not blank, and return it without its surrounding whitespace
pub fn validate_title(title: &str) -> TaskResult<&str> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskError::validation("Task title cannot be empty"));
    }
    Ok(trimmed)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_server_dates() {
        let date = EndDate::parse("2025-03-01T00:00:00.000Z").unwrap();
        assert_eq!(date.to_iso(), "2025-03-01");
        assert_eq!(date, EndDate::parse("2025-03-01").unwrap());
        assert_eq!(date.to_draft(), DateDraft::new("01", "03", "2025"));
    }

    #[test]
    fn test_single_digits_are_padded() {
        let draft = DateDraft::new("3", "7", "2024");
        assert_eq!(draft.assemble().unwrap(), "2024-07-03");
        let draft = DateDraft::new(" 09 ", "11", "2024");
        assert_eq!(draft.assemble().unwrap(), "2024-11-09");
    }

    #[test]
    fn test_irreducible_dates_are_rejected() {
        let invalid = vec![
            DateDraft::new("", "03", "2025"),
            DateDraft::new("01", "", "2025"),
            DateDraft::new("01", "03", ""),
            DateDraft::new("001", "03", "2025"),
            DateDraft::new("01", "03", "25"),
            DateDraft::new("01", "03", "20255"),
            DateDraft::new("1a", "03", "2025"),
            DateDraft::new("-1", "03", "2025"),
            DateDraft::new("31", "02", "2025"),
            DateDraft::new("01", "13", "2025"),
            DateDraft::new("00", "01", "2025"),
        ];
        for draft in invalid {
            let result = draft.to_end_date();
            assert!(result.unwrap_err().is_validation(), "{:?} should be rejected", draft);
        }

        assert!(EndDate::parse("not a date").is_err());
        assert!(EndDate::parse("+10000-01-01").is_err());
        assert!(EndDate::parse("").is_err());
    }

    #[test]
    fn test_years_have_four_digits() {
        assert!(EndDate::from_ymd(10000, 1, 1).unwrap_err().is_validation());
        assert!(EndDate::from_ymd(-1, 1, 1).unwrap_err().is_validation());

        let first = EndDate::from_ymd(0, 1, 1).unwrap();
        assert_eq!(first.to_iso(), "0000-01-01");
        assert_eq!(first.to_draft().to_end_date().unwrap(), first);

        let last = EndDate::from_ymd(9999, 12, 31).unwrap();
        assert_eq!(last.to_iso(), "9999-12-31");
        assert_eq!(last.to_draft(), DateDraft::new("31", "12", "9999"));
    }

    #[test]
    fn test_titles() {
        assert_eq!(validate_title("  Buy milk ").unwrap(), "Buy milk");
        assert!(validate_title("").is_err());
        assert!(validate_title(" \t\n ").is_err());
    }

    #[test]
    fn test_serde() {
        let date = EndDate::from_ymd(2024, 2, 29).unwrap();
        assert_eq!(serde_json::to_string(&date).unwrap(), r#""2024-02-29""#);
        let back: EndDate = serde_json::from_str(r#""2024-02-29T12:00:00Z""#).unwrap();
        assert_eq!(back, date);
    }
}
