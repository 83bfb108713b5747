//! Income sources and the per-session income record

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

/// Amount bands offered for every income source.
///
/// Users pick a coarse bucket rather than an exact figure; the chosen label is
/// stored verbatim.
pub const AMOUNT_BANDS: [&str; 4] = ["Less than ₹5L", "₹5L to ₹10L", "₹10L to ₹50L", "Above ₹50L"];

/// Income source a user can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeSource {
    Salary,
    Rental,
    Business,
    #[serde(rename = "capitalgains")]
    CapitalGains,
    Interest,
}

impl IncomeSource {
    /// All sources in the order they are offered as quick replies
    pub const OFFERED: [IncomeSource; 5] = [
        IncomeSource::Salary,
        IncomeSource::Business,
        IncomeSource::CapitalGains,
        IncomeSource::Rental,
        IncomeSource::Interest,
    ];

    /// Stable record key
    pub fn key(&self) -> &'static str {
        match self {
            IncomeSource::Salary => "salary",
            IncomeSource::Rental => "rental",
            IncomeSource::Business => "business",
            IncomeSource::CapitalGains => "capitalgains",
            IncomeSource::Interest => "interest",
        }
    }

    /// Quick-reply label shown to the user
    pub fn option_label(&self) -> &'static str {
        match self {
            IncomeSource::Salary => "Salary",
            IncomeSource::Rental => "Rental Income",
            IncomeSource::Business => "Business/Profession",
            IncomeSource::CapitalGains => "Capital Gains",
            IncomeSource::Interest => "Interest Income",
        }
    }

    /// Noun used in the amount prompt
    pub fn prompt_noun(&self) -> &'static str {
        match self {
            IncomeSource::Salary => "annual salary",
            IncomeSource::Rental => "annual rental income",
            IncomeSource::Business => "business income",
            IncomeSource::CapitalGains => "capital gains",
            IncomeSource::Interest => "interest income",
        }
    }

    /// Record key with its first letter upper-cased ("capitalgains" -> "Capitalgains")
    pub fn capitalized_key(&self) -> String {
        let key = self.key();
        let mut chars = key.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Parse an exact record key
    pub fn from_key(key: &str) -> Result<Self> {
        Self::OFFERED
            .iter()
            .copied()
            .find(|source| source.key() == key)
            .ok_or_else(|| Error::UnknownIncomeSource(key.to_string()))
    }
}

impl std::fmt::Display for IncomeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for IncomeSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_key(s)
    }
}

/// Declared income sources and their band labels
///
/// Entries keep the position of their first insertion; overwriting a source
/// replaces the band in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomeRecord {
    entries: Vec<(IncomeSource, String)>,
}

impl IncomeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the band for a source
    ///
    /// Returns the previous band when the source was already present.
    pub fn insert(&mut self, source: IncomeSource, band: impl Into<String>) -> Option<String> {
        let band = band.into();
        match self.entries.iter_mut().find(|(s, _)| *s == source) {
            Some((_, existing)) => Some(std::mem::replace(existing, band)),
            None => {
                self.entries.push((source, band));
                None
            },
        }
    }

    pub fn get(&self, source: IncomeSource) -> Option<&str> {
        self.entries
            .iter()
            .find(|(s, _)| *s == source)
            .map(|(_, band)| band.as_str())
    }

    pub fn contains(&self, source: IncomeSource) -> bool {
        self.get(source).is_some()
    }

    /// Entries in first-entered order
    pub fn iter(&self) -> impl Iterator<Item = (IncomeSource, &str)> {
        self.entries.iter().map(|(s, band)| (*s, band.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Serialize for IncomeRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (source, band) in &self.entries {
            map.serialize_entry(source.key(), band)?;
        }
        map.end()
    }
}
