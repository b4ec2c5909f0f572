//! Streaming parser for tab-delimited RF2 files.

use std::fs::File;
use std::io::{BufReader, Read};
use std::marker::PhantomData;
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord};
use pc4_types::SctId;

use crate::types::{Rf2Config, StoreError, StoreResult};

/// A row type that can be read from an RF2 file.
pub trait Rf2Record: Sized {
    /// Leading column names the file header must carry.
    const EXPECTED_COLUMNS: &'static [&'static str];

    /// Parses a record from a CSV row.
    fn from_record(record: &StringRecord) -> StoreResult<Self>;

    /// Returns true if the record is kept under `config`.
    fn passes_filter(&self, config: &Rf2Config) -> bool;
}

/// Reads an RF2 file record by record.
///
/// Records rejected by [`Rf2Record::passes_filter`] are skipped; malformed
/// rows are yielded as errors so the caller decides whether to stop.
pub struct Rf2Parser<R: Read, T: Rf2Record> {
    reader: Reader<R>,
    config: Rf2Config,
    _marker: PhantomData<T>,
}

impl<T: Rf2Record> Rf2Parser<BufReader<File>, T> {
    /// Opens a parser on a file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or has invalid headers.
    pub fn from_path<P: AsRef<Path>>(path: P, config: Rf2Config) -> StoreResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(StoreError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), config)
    }
}

impl<R: Read, T: Rf2Record> Rf2Parser<R, T> {
    /// Opens a parser on any reader.
    pub fn from_reader(reader: R, config: Rf2Config) -> StoreResult<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(false)
            .quoting(false)
            .trim(csv::Trim::None)
            .from_reader(reader);

        Self::validate_headers(&mut csv_reader)?;

        Ok(Self {
            reader: csv_reader,
            config,
            _marker: PhantomData,
        })
    }

    fn validate_headers(reader: &mut Reader<R>) -> StoreResult<()> {
        let headers = reader.headers()?;
        let expected = T::EXPECTED_COLUMNS;

        if headers.len() < expected.len() {
            return Err(StoreError::InvalidHeader {
                expected: expected.len(),
                found: headers.len(),
            });
        }

        for (i, expected_col) in expected.iter().enumerate() {
            let found = headers.get(i).unwrap_or("");
            // UTF-8 BOM
            let found = found.trim_start_matches('\u{feff}');
            if found != *expected_col {
                return Err(StoreError::UnexpectedColumn {
                    position: i,
                    expected: expected_col.to_string(),
                    found: found.to_string(),
                });
            }
        }

        Ok(())
    }
}

impl<R: Read, T: Rf2Record> Iterator for Rf2Parser<R, T> {
    type Item = StoreResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = StringRecord::new();
        loop {
            match self.reader.read_record(&mut record) {
                Ok(true) => {
                    if record.iter().all(|f| f.trim().is_empty()) {
                        continue;
                    }

                    match T::from_record(&record) {
                        Ok(parsed) if parsed.passes_filter(&self.config) => {
                            return Some(Ok(parsed))
                        }
                        Ok(_) => continue,
                        Err(e) => return Some(Err(e)),
                    }
                }
                Ok(false) => return None,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// Field parsers for RF2 values.
pub mod parse {
    use super::{SctId, StoreError, StoreResult};

    /// Parses an SCTID.
    pub fn sctid(value: &str) -> StoreResult<SctId> {
        value.parse::<u64>().map_err(|_| StoreError::InvalidSctId {
            value: value.to_string(),
        })
    }

    /// Parses a boolean from "0" or "1".
    pub fn boolean(value: &str) -> StoreResult<bool> {
        match value {
            "0" => Ok(false),
            "1" => Ok(true),
            _ => Err(StoreError::InvalidBoolean {
                value: value.to_string(),
            }),
        }
    }

    /// Parses an effective time (YYYYMMDD).
    pub fn effective_time(value: &str) -> StoreResult<u32> {
        if value.len() != 8 {
            return Err(StoreError::InvalidDate {
                value: value.to_string(),
            });
        }
        value.parse::<u32>().map_err(|_| StoreError::InvalidDate {
            value: value.to_string(),
        })
    }

    /// Parses an integer value.
    pub fn integer<T: std::str::FromStr>(value: &str) -> StoreResult<T> {
        value.parse::<T>().map_err(|_| StoreError::InvalidInteger {
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pc4_types::Concept;

    #[test]
    fn test_parse_sctid() {
        assert_eq!(parse::sctid("37340000").unwrap(), 37340000u64);
        assert_eq!(
            parse::sctid("999001261000000100").unwrap(),
            999001261000000100u64
        );
        assert!(parse::sctid("not_a_number").is_err());
        assert!(parse::sctid("").is_err());
    }

    #[test]
    fn test_parse_boolean() {
        assert!(!parse::boolean("0").unwrap());
        assert!(parse::boolean("1").unwrap());
        assert!(parse::boolean("true").is_err());
    }

    #[test]
    fn test_parse_effective_time() {
        assert_eq!(parse::effective_time("20020131").unwrap(), 20020131u32);
        assert!(parse::effective_time("2002-01-31").is_err());
        assert!(parse::effective_time("2002013").is_err());
    }

    #[test]
    fn test_parser_reads_and_filters_rows() {
        let data = "id\teffectiveTime\tactive\tmoduleId\tdefinitionStatusId\n\
                    24700007\t20020131\t1\t900000000000207008\t900000000000074008\n\
                    100005\t20020131\t0\t900000000000207008\t900000000000074008\n\
                    6118003\t20020131\t1\t900000000000207008\t900000000000074008\n";

        let parser =
            Rf2Parser::<_, Concept>::from_reader(data.as_bytes(), Rf2Config::default()).unwrap();
        let ids: Vec<_> = parser.map(|c| c.unwrap().id).collect();
        assert_eq!(ids, vec![24700007, 6118003]);
    }

    #[test]
    fn test_parser_rejects_wrong_header() {
        let data = "id\teffectiveTime\tstatus\tmoduleId\tdefinitionStatusId\n";
        let result = Rf2Parser::<_, Concept>::from_reader(data.as_bytes(), Rf2Config::default());
        assert!(matches!(
            result,
            Err(StoreError::UnexpectedColumn { position: 2, .. })
        ));
    }

    #[test]
    fn test_parser_accepts_bom() {
        let data = "\u{feff}id\teffectiveTime\tactive\tmoduleId\tdefinitionStatusId\n\
                    24700007\t20020131\t1\t900000000000207008\t900000000000074008\n";
        let parser =
            Rf2Parser::<_, Concept>::from_reader(data.as_bytes(), Rf2Config::default()).unwrap();
        assert_eq!(parser.count(), 1);
    }
}
