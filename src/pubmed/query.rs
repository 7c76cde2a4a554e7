//! Search term builder for the PubMed literature index

use std::fmt;
use std::str::FromStr;

use crate::error::{CorpusError, Result};

/// Publication date with year, month or day precision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PubDate {
    year: u32,
    month: Option<u32>,
    day: Option<u32>,
}

impl PubDate {
    /// Create a new PubDate with year only
    pub fn new(year: u32) -> Self {
        Self {
            year,
            month: None,
            day: None,
        }
    }

    /// Create a new PubDate with year and month
    pub fn with_month(year: u32, month: u32) -> Self {
        Self {
            year,
            month: Some(month),
            day: None,
        }
    }

    /// Create a new PubDate with year, month, and day
    pub fn with_day(year: u32, month: u32, day: u32) -> Self {
        Self {
            year,
            month: Some(month),
            day: Some(day),
        }
    }

    /// Format as PubMed date string
    pub fn to_pubmed_string(&self) -> String {
        match (self.month, self.day) {
            (Some(month), Some(day)) => format!("{}/{:02}/{:02}", self.year, month, day),
            (Some(month), None) => format!("{}/{:02}", self.year, month),
            _ => self.year.to_string(),
        }
    }
}

impl From<u32> for PubDate {
    fn from(year: u32) -> Self {
        Self::new(year)
    }
}

impl From<(u32, u32)> for PubDate {
    fn from((year, month): (u32, u32)) -> Self {
        Self::with_month(year, month)
    }
}

impl From<(u32, u32, u32)> for PubDate {
    fn from((year, month, day): (u32, u32, u32)) -> Self {
        Self::with_day(year, month, day)
    }
}

impl fmt::Display for PubDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pubmed_string())
    }
}

impl FromStr for PubDate {
    type Err = CorpusError;

    /// Accepts `YYYY`, `YYYY/MM` or `YYYY/MM/DD`
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CorpusError::InvalidQuery(format!("invalid publication date '{s}'"));

        let parts = s
            .trim()
            .split('/')
            .map(|part| part.parse::<u32>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>>>()?;

        let date = match parts.as_slice() {
            [year] => Self::new(*year),
            [year, month] => Self::with_month(*year, *month),
            [year, month, day] => Self::with_day(*year, *month, *day),
            _ => return Err(invalid()),
        };

        if date.month.is_some_and(|m| !(1..=12).contains(&m))
            || date.day.is_some_and(|d| !(1..=31).contains(&d))
        {
            return Err(invalid());
        }

        Ok(date)
    }
}

/// Builder for the keyword query sent to the literature index
///
/// # Example
///
/// ```
/// use pmc_corpus::pubmed::SearchQuery;
///
/// let term = SearchQuery::new()
///     .title_keyword("proteostasis")
///     .published_between((2021, 1, 1), Some(3000))
///     .build();
///
/// assert_eq!(
///     term,
///     r#"(proteostasis[Title]) AND ("2021/01/01"[Publication Date] : "3000"[Publication Date])"#
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    terms: Vec<String>,
    date_range: Option<(PubDate, PubDate)>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a free-text term
    pub fn query<S: Into<String>>(mut self, term: S) -> Self {
        let term = term.into();
        if !term.trim().is_empty() {
            self.terms.push(term.trim().to_string());
        }
        self
    }

    /// Restrict a keyword to article titles
    pub fn title_keyword<S: AsRef<str>>(self, keyword: S) -> Self {
        let keyword = keyword.as_ref().trim();
        if keyword.is_empty() {
            return self;
        }
        self.query(format!("{keyword}[Title]"))
    }

    /// Filter by publication date range; an open end runs to year 3000
    pub fn published_between<S, E>(mut self, start: S, end: Option<E>) -> Self
    where
        S: Into<PubDate>,
        E: Into<PubDate>,
    {
        let end = end.map(Into::into).unwrap_or(PubDate::new(3000));
        self.date_range = Some((start.into(), end));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.date_range.is_none()
    }

    /// Render the query in PubMed search syntax
    pub fn build(&self) -> String {
        let mut clauses: Vec<String> = self.terms.iter().map(|t| format!("({t})")).collect();

        if let Some((start, end)) = &self.date_range {
            clauses.push(format!(
                "(\"{start}\"[Publication Date] : \"{end}\"[Publication Date])"
            ));
        }

        clauses.join(" AND ")
    }
}
