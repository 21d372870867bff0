use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use thiserror::Error;

pub mod fetch;
pub mod output;
pub mod parse;
pub mod testudo;
pub mod umdio;

pub use fetch::{FetchConfig, FetchError, Fetcher, RetryPolicy};
pub use output::{write_json, Encoding};
pub use testudo::{Catalog, Testudo};
pub use umdio::UmdIo;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TermError {
    #[error("term {0:?} is not six digits (YYYYMM)")]
    Format(String),
    #[error("term {0:?} does not name a calendar month")]
    Month(String),
}

/// An academic term as UMD spells it, e.g. `202508` for Fall 2025.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Term {
    year: i32,
    month: u32,
}

impl Term {
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl FromStr for Term {
    type Err = TermError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TermError::Format(s.to_owned()));
        }

        let (year, month) = s.split_at(4);
        let year = year.parse().map_err(|_| TermError::Format(s.to_owned()))?;
        let month = month.parse().map_err(|_| TermError::Format(s.to_owned()))?;

        NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| TermError::Month(s.to_owned()))?;

        Ok(Term { year, month })
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}", self.year, self.month)
    }
}
