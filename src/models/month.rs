use chrono::{DateTime, Datelike, Utc};

use crate::error::AppError;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar month, 1 (January) to 12 (December), independent of year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthIndex(u32);

impl MonthIndex {
    /// Looks up an exact English month name, e.g. "March".
    pub fn from_name(name: &str) -> Option<Self> {
        MONTH_NAMES
            .iter()
            .position(|month| *month == name)
            .map(|position| Self(position as u32 + 1))
    }

    /// Resolves a month that the caller must supply.
    ///
    /// A missing or blank name is reported the same way as an unknown one.
    pub fn required(name: Option<&str>) -> Result<Self, AppError> {
        let name = name.unwrap_or_default();
        Self::from_name(name).ok_or_else(|| AppError::InvalidMonth(name.to_string()))
    }

    /// Resolves a month filter that may be left out. Blank counts as left out.
    pub fn optional(name: Option<&str>) -> Result<Option<Self>, AppError> {
        match name {
            None | Some("") => Ok(None),
            Some(name) => Self::required(Some(name)).map(Some),
        }
    }

    pub fn number(self) -> u32 {
        self.0
    }

    pub fn contains(self, date: &DateTime<Utc>) -> bool {
        date.month() == self.0
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{MonthIndex, MONTH_NAMES};
    use crate::error::AppError;

    #[test]
    fn months_are_one_based() {
        for (position, name) in MONTH_NAMES.iter().enumerate() {
            assert_eq!(
                MonthIndex::from_name(name).map(MonthIndex::number),
                Some(position as u32 + 1)
            );
        }
    }

    #[test]
    fn names_are_case_sensitive() {
        assert_eq!(MonthIndex::from_name("march"), None);
        assert_eq!(MonthIndex::from_name("Mar"), None);
    }

    #[test]
    fn required_month_rejects_missing_and_unknown() {
        assert_eq!(
            MonthIndex::required(None),
            Err(AppError::InvalidMonth(String::new()))
        );
        assert_eq!(
            MonthIndex::required(Some("Foo")),
            Err(AppError::InvalidMonth("Foo".to_string()))
        );
    }

    #[test]
    fn optional_month_treats_blank_as_absent() {
        assert_eq!(MonthIndex::optional(None), Ok(None));
        assert_eq!(MonthIndex::optional(Some("")), Ok(None));
        assert_eq!(
            MonthIndex::optional(Some("Foo")),
            Err(AppError::InvalidMonth("Foo".to_string()))
        );
    }

    #[test]
    fn contains_ignores_year() {
        let march = MonthIndex::from_name("March").unwrap();

        assert!(march.contains(&Utc.with_ymd_and_hms(2021, 3, 5, 0, 0, 0).unwrap()));
        assert!(march.contains(&Utc.with_ymd_and_hms(2022, 3, 31, 23, 59, 59).unwrap()));
        assert!(!march.contains(&Utc.with_ymd_and_hms(2022, 4, 1, 0, 0, 0).unwrap()));
    }
}
