//! Plain-text reference file of section distributions.
//!
//! One line per section:
//!
//! ```text
//! h_d geo1 58 0.000012 0.000024 1.000012 1 0.000024
//! w_c uniform 11 0.1 0.1 2 2 0.001
//! l_o: N/A
//! ```
//!
//! Lines that are neither (geometry descriptions, type tags, blank lines)
//! are ignored, so a reference file may share a config file with other data.

use mesh_spacing::{DistributionKind, ExportRecord, Precision, Section};

use crate::errors::LoadError;

const UNDEFINED_MARKER: &str = ": N/A";

/// What a reference file says about one section.
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceEntry {
    Defined(ExportRecord),
    /// The section was listed without a distribution.
    Undefined,
}

/// Named distribution records in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceFile {
    entries: Vec<(String, ReferenceEntry)>,
}

impl ReferenceFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the given sections' distributions.
    pub fn from_sections<'a>(sections: impl IntoIterator<Item = &'a Section>, precision: Precision) -> Self {
        let mut file = Self::new();
        for section in sections {
            let entry = match section.distribution() {
                Some(d) => ReferenceEntry::Defined(d.export(precision)),
                None => ReferenceEntry::Undefined,
            };
            file.insert(section.name(), entry);
        }
        file
    }

    /// Add or replace the entry for `name`.
    pub fn insert(&mut self, name: impl Into<String>, entry: ReferenceEntry) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = entry,
            None => self.entries.push((name, entry)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ReferenceEntry> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, e)| e)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &ReferenceEntry)> {
        self.entries.iter().map(|(n, e)| (n.as_str(), e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for (name, entry) in &self.entries {
            match entry {
                ReferenceEntry::Defined(record) => {
                    out.push_str(name);
                    out.push(' ');
                    out.push_str(&record.to_line());
                }
                ReferenceEntry::Undefined => {
                    out.push_str(name);
                    out.push_str(UNDEFINED_MARKER);
                }
            }
            out.push('\n');
        }
        out
    }

    pub fn parse(text: &str) -> Result<Self, LoadError> {
        let mut file = Self::new();

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if let Some(name) = line.strip_suffix(UNDEFINED_MARKER) {
                if !name.is_empty() && !name.contains(char::is_whitespace) {
                    file.insert(name, ReferenceEntry::Undefined);
                }
                continue;
            }

            let Some((name, rest)) = line.split_once(char::is_whitespace) else {
                continue;
            };
            let rest = rest.trim_start();
            let is_record = rest
                .split_whitespace()
                .next()
                .is_some_and(|kind| kind.parse::<DistributionKind>().is_ok());
            if !is_record {
                continue;
            }

            let record = ExportRecord::parse(rest).map_err(|err| LoadError::MalformedLine {
                line: index + 1,
                reason: err.to_string(),
            })?;
            file.insert(name, ReferenceEntry::Defined(record));
        }

        Ok(file)
    }
}
