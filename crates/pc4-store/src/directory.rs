//! Organisational directory: organisations keyed by the postcode they sit at.
//!
//! Two CSV sources, each a directory of `*.csv` files with a header row:
//!
//! - organisations: `code,name,address1,town,postcode,primary_role,close_date`
//! - postcodes: `pcds` (or `pcd`) plus optional `oseast1m`, `osnrth1m`,
//!   `lsoa11`, `ccg`, `ctry`, `doterm`
//!
//! Columns other than the organisation code, name and postcode may be absent.

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use pc4_types::{normalise_postcode, Location, Organisation, PostcodeRecord};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::types::{StoreError, StoreResult};

#[derive(Debug, Deserialize)]
struct PostcodeRow {
    #[serde(default)]
    pcds: Option<String>,
    #[serde(default)]
    pcd: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    oseast1m: Option<u32>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    osnrth1m: Option<u32>,
    #[serde(default)]
    lsoa11: Option<String>,
    #[serde(default)]
    ccg: Option<String>,
    #[serde(default)]
    ctry: Option<String>,
    #[serde(default)]
    doterm: Option<String>,
}

impl PostcodeRow {
    fn into_record(self) -> Option<PostcodeRecord> {
        let postcode = self.pcds.or(self.pcd).as_deref().and_then(normalise_postcode)?;
        Some(PostcodeRecord {
            postcode,
            easting: self.oseast1m,
            northing: self.osnrth1m,
            lsoa: self.lsoa11,
            ccg: self.ccg,
            country: self.ctry,
            terminated: self.doterm,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OrganisationRow {
    code: String,
    name: String,
    #[serde(default)]
    address1: Option<String>,
    #[serde(default)]
    town: Option<String>,
    postcode: String,
    #[serde(default)]
    primary_role: Option<String>,
    #[serde(default)]
    close_date: Option<String>,
}

impl OrganisationRow {
    fn into_organisation(self) -> Option<Organisation> {
        Some(Organisation {
            postcode: normalise_postcode(&self.postcode)?,
            code: self.code,
            name: self.name,
            address: self.address1,
            town: self.town,
            primary_role: self.primary_role,
            close_date: self.close_date,
        })
    }
}

/// In-memory postcode and organisation index.
#[derive(Debug, Default)]
pub struct DirectoryIndex {
    postcodes: HashMap<String, PostcodeRecord>,
    organisations_by_postcode: HashMap<String, Vec<Organisation>>,
}

impl DirectoryIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every CSV file in the organisation and postcode directories.
    ///
    /// # Errors
    /// Fails if either directory is missing or holds no CSV files, or a file
    /// cannot be read.
    pub fn open<P: AsRef<Path>, Q: AsRef<Path>>(ods_dir: P, nhspd_dir: Q) -> StoreResult<Self> {
        let ods_files = csv_files(ods_dir.as_ref(), "organisation")?;
        let nhspd_files = csv_files(nhspd_dir.as_ref(), "postcode")?;

        let mut index = Self::new();
        for path in &nhspd_files {
            let count = index.load_postcodes(fs::File::open(path)?)?;
            debug!(path = %path.display(), count, "postcode file loaded");
        }
        for path in &ods_files {
            let count = index.load_organisations(fs::File::open(path)?)?;
            debug!(path = %path.display(), count, "organisation file loaded");
        }

        info!(
            postcodes = index.postcode_count(),
            organisations = index.organisation_count(),
            "organisational directory loaded"
        );
        Ok(index)
    }

    /// Loads postcode rows from CSV, returning how many were kept.
    pub fn load_postcodes<R: Read>(&mut self, reader: R) -> StoreResult<usize> {
        let rows = read_csv::<PostcodeRow, _>(reader)?;
        let mut count = 0;
        for record in rows.into_iter().filter_map(PostcodeRow::into_record) {
            self.postcodes.insert(record.postcode.clone(), record);
            count += 1;
        }
        Ok(count)
    }

    /// Loads organisation rows from CSV, returning how many were kept.
    pub fn load_organisations<R: Read>(&mut self, reader: R) -> StoreResult<usize> {
        let rows = read_csv::<OrganisationRow, _>(reader)?;
        let mut count = 0;
        for org in rows.into_iter().filter_map(OrganisationRow::into_organisation) {
            self.organisations_by_postcode
                .entry(org.postcode.clone())
                .or_default()
                .push(org);
            count += 1;
        }
        Ok(count)
    }

    /// Looks up a postcode and the organisations sited there.
    ///
    /// The code is normalised first, so case and spacing do not matter.
    pub fn fetch_postcode(&self, code: &str) -> Option<Location> {
        let postcode = normalise_postcode(code)?;
        let record = self.postcodes.get(&postcode)?.clone();

        let mut organisations = self
            .organisations_by_postcode
            .get(&postcode)
            .cloned()
            .unwrap_or_default();
        organisations.sort_by(|a, b| a.code.cmp(&b.code));

        Some(Location {
            postcode: record,
            organisations,
        })
    }

    /// Returns the number of postcodes loaded.
    pub fn postcode_count(&self) -> usize {
        self.postcodes.len()
    }

    /// Returns the number of organisations loaded.
    pub fn organisation_count(&self) -> usize {
        self.organisations_by_postcode.values().map(Vec::len).sum()
    }
}

fn csv_files(dir: &Path, kind: &'static str) -> StoreResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(StoreError::DirectoryNotFound {
            path: dir.display().to_string(),
        });
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(StoreError::NoDataFiles {
            kind,
            directory: dir.display().to_string(),
        });
    }

    files.sort();
    Ok(files)
}

/// Deserialises all rows, skipping and counting malformed ones.
fn read_csv<T, R>(reader: R) -> StoreResult<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
    R: Read,
{
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for row in csv_reader.deserialize::<T>() {
        match row {
            Ok(row) => rows.push(row),
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                if skipped == 0 {
                    warn!(error = %e, "skipping malformed directory row");
                }
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, "malformed directory rows skipped");
    }
    Ok(rows)
}
