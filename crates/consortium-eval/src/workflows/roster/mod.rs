//! Company roster: CSV import of scored companies plus the search and
//! highlighting used when assembling a consortium.

mod filter;
mod parser;

pub use filter::{ratio_flags, CompanySearchFilter, RatioFlags};

use crate::workflows::consortium::{CompanyRecord, FieldFreshness, ScoringCatalog};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read company roster: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid company roster CSV data: {}", err),
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// A roster entry as shown to whoever is picking consortium members.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyListing {
    #[serde(flatten)]
    pub company: CompanyRecord,
    pub summary_freshness: FieldFreshness,
    pub ratio_flags: RatioFlags,
}

/// Companies loaded from a roster export, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyRoster {
    companies: Vec<CompanyRecord>,
}

impl CompanyRoster {
    pub fn new(companies: Vec<CompanyRecord>) -> Self {
        Self { companies }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RosterImportError> {
        let companies = parser::parse_records(reader)?;
        info!(companies = companies.len(), "company roster imported");
        Ok(Self { companies })
    }

    pub fn companies(&self) -> &[CompanyRecord] {
        &self.companies
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    /// Exact (trimmed, case-insensitive) name lookup.
    pub fn find(&self, name: &str) -> Option<&CompanyRecord> {
        let wanted = name.trim();
        self.companies
            .iter()
            .find(|company| company.name.eq_ignore_ascii_case(wanted))
    }

    pub fn search(&self, filter: &CompanySearchFilter) -> Vec<&CompanyRecord> {
        self.companies
            .iter()
            .filter(|company| filter.matches(company))
            .collect()
    }

    /// Search results decorated with freshness and ratio highlights for
    /// `industry`.
    pub fn listings(
        &self,
        filter: &CompanySearchFilter,
        industry: &str,
        catalog: &ScoringCatalog,
    ) -> Vec<CompanyListing> {
        self.search(filter)
            .into_iter()
            .map(|company| CompanyListing {
                summary_freshness: company.summary_freshness(),
                ratio_flags: ratio_flags(company, industry, catalog),
                company: company.clone(),
            })
            .collect()
    }
}
