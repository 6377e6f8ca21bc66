//! Delimited flat-file reader producing [`PersonInput`] records.

use crate::config::ReaderConfig;
use crate::domain::model::PersonInput;
use crate::domain::ports::ItemReader;
use crate::utils::error::{BatchError, Result};
use std::fs::File;
use std::io;
use std::path::Path;

const FIELD_COUNT: usize = 2;

/// 欄位位置對應
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    first_name: usize,
    last_name: usize,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            first_name: 0,
            last_name: 1,
        }
    }
}

impl FieldMapping {
    /// 依名稱順序決定欄位位置，必須恰好包含 firstName 與 lastName 各一次
    pub fn from_names(names: &[String]) -> Result<Self> {
        let invalid = |reason: &str| BatchError::InvalidConfigValueError {
            field: "reader.field_names".to_string(),
            value: names.join(","),
            reason: reason.to_string(),
        };

        if names.len() != FIELD_COUNT {
            return Err(invalid("Exactly two field names are required"));
        }

        let mut first_name = None;
        let mut last_name = None;
        for (index, name) in names.iter().enumerate() {
            let slot = match name.as_str() {
                "firstName" | "first_name" => &mut first_name,
                "lastName" | "last_name" => &mut last_name,
                _ => return Err(invalid("Field names must be firstName and lastName")),
            };
            if slot.replace(index).is_some() {
                return Err(invalid("Field names must not repeat"));
            }
        }

        match (first_name, last_name) {
            (Some(first_name), Some(last_name)) => Ok(Self {
                first_name,
                last_name,
            }),
            _ => Err(invalid("Both firstName and lastName are required")),
        }
    }
}

type Opener<R> = Box<dyn Fn() -> io::Result<R> + Send>;

/// 輸入來源延後到 step 開始時才開啟，開檔失敗會成為 step 的失敗
pub struct DelimitedFileReader<R: io::Read> {
    reader: Option<csv::Reader<R>>,
    opener: Option<Opener<R>>,
    delimiter: u8,
    record: csv::StringRecord,
    mapping: FieldMapping,
    lines_to_skip: usize,
    skipped: usize,
    exhausted: bool,
    source: String,
}

impl DelimitedFileReader<File> {
    pub fn from_path<P: AsRef<Path>>(path: P, config: &ReaderConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let source = path.display().to_string();
        let opener: Opener<File> = Box::new(move || File::open(&path));
        Self::build(None, Some(opener), source, config)
    }
}

impl<R: io::Read> DelimitedFileReader<R> {
    pub fn from_reader(input: R, config: &ReaderConfig) -> Result<Self> {
        let delimiter = config.delimiter_byte()?;
        let reader = Self::csv_reader(input, delimiter);
        Self::build(Some(reader), None, "<stream>".to_string(), config)
    }

    fn build(
        reader: Option<csv::Reader<R>>,
        opener: Option<Opener<R>>,
        source: String,
        config: &ReaderConfig,
    ) -> Result<Self> {
        Ok(Self {
            reader,
            opener,
            delimiter: config.delimiter_byte()?,
            record: csv::StringRecord::new(),
            mapping: FieldMapping::from_names(&config.field_names)?,
            lines_to_skip: config.lines_to_skip,
            skipped: 0,
            exhausted: false,
            source,
        })
    }

    // 欄位數由我們自行檢查，才能回報行號
    fn csv_reader(input: R, delimiter: u8) -> csv::Reader<R> {
        csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(input)
    }

    fn next_record(&mut self) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        let Some(reader) = self.reader.as_mut() else {
            return Ok(false);
        };
        if !reader.read_record(&mut self.record)? {
            self.exhausted = true;
            tracing::debug!("Reached end of {}", self.source);
            return Ok(false);
        }
        Ok(true)
    }
}

impl<R: io::Read + Send> ItemReader for DelimitedFileReader<R> {
    type Item = PersonInput;

    fn open(&mut self) -> Result<()> {
        if self.reader.is_some() {
            return Ok(());
        }
        if let Some(opener) = &self.opener {
            let input = opener()?;
            self.reader = Some(Self::csv_reader(input, self.delimiter));
            tracing::debug!("Opened {}", self.source);
        }
        Ok(())
    }

    fn read(&mut self) -> Result<Option<PersonInput>> {
        self.open()?;

        while self.skipped < self.lines_to_skip {
            if !self.next_record()? {
                return Ok(None);
            }
            self.skipped += 1;
            tracing::debug!("Skipped header line {:?} in {}", self.record, self.source);
        }

        if !self.next_record()? {
            return Ok(None);
        }

        if self.record.len() != FIELD_COUNT {
            return Err(BatchError::MalformedRecord {
                line: self.record.position().map(|p| p.line()).unwrap_or(0),
                expected: FIELD_COUNT,
                found: self.record.len(),
            });
        }

        Ok(Some(PersonInput::new(
            &self.record[self.mapping.first_name],
            &self.record[self.mapping.last_name],
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader_for(content: &str) -> DelimitedFileReader<&[u8]> {
        DelimitedFileReader::from_reader(content.as_bytes(), &ReaderConfig::default()).unwrap()
    }

    fn read_all<R: io::Read + Send>(reader: &mut DelimitedFileReader<R>) -> Vec<PersonInput> {
        let mut items = Vec::new();
        while let Some(item) = reader.read().unwrap() {
            items.push(item);
        }
        items
    }

    #[test]
    fn test_reads_records_in_file_order_after_header() {
        let mut reader = reader_for("firstName,lastName\nJill,Doe\nJoe,Doe\n");

        let items = read_all(&mut reader);

        assert_eq!(
            items,
            vec![PersonInput::new("Jill", "Doe"), PersonInput::new("Joe", "Doe")]
        );
    }

    #[test]
    fn test_stays_exhausted() {
        let mut reader = reader_for("firstName,lastName\nJill,Doe");

        assert!(reader.read().unwrap().is_some());
        assert!(reader.read().unwrap().is_none());
        assert!(reader.read().unwrap().is_none());
    }

    #[test]
    fn test_header_only_file_is_empty() {
        let mut reader = reader_for("firstName,lastName\n");
        assert!(reader.read().unwrap().is_none());

        let mut empty = reader_for("");
        assert!(empty.read().unwrap().is_none());
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let mut reader = reader_for("firstName,lastName\nJill,Doe\n\n\nJoe,Doe\n");
        assert_eq!(read_all(&mut reader).len(), 2);
    }

    #[test]
    fn test_quoted_fields() {
        let mut reader = reader_for("firstName,lastName\n\"Mary, Jr\",\"O'Neil\"\n");
        let items = read_all(&mut reader);
        assert_eq!(items[0].first_name, "Mary, Jr");
        assert_eq!(items[0].last_name, "O'Neil");
    }

    #[test]
    fn test_missing_field_reports_line() {
        let mut reader = reader_for("firstName,lastName\nJill,Doe\nJoe\n");

        assert!(reader.read().unwrap().is_some());
        match reader.read() {
            Err(BatchError::MalformedRecord {
                line,
                expected,
                found,
            }) => {
                assert_eq!(line, 3);
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("expected malformed record, got {:?}", other),
        }
    }

    #[test]
    fn test_extra_field_is_malformed() {
        let mut reader = reader_for("firstName,lastName\nJill,Doe,Extra\n");
        assert!(matches!(
            reader.read(),
            Err(BatchError::MalformedRecord { found: 3, .. })
        ));
    }

    #[test]
    fn test_custom_delimiter_skip_and_field_order() {
        let config = ReaderConfig {
            delimiter: ";".to_string(),
            lines_to_skip: 2,
            field_names: vec!["lastName".to_string(), "firstName".to_string()],
            ..ReaderConfig::default()
        };
        let content = "# exported\nlast;first\nDoe;Jill\n";
        let mut reader = DelimitedFileReader::from_reader(content.as_bytes(), &config).unwrap();

        assert_eq!(read_all(&mut reader), vec![PersonInput::new("Jill", "Doe")]);
    }

    #[test]
    fn test_field_mapping_rejects_bad_names() {
        let names = |n: &[&str]| n.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        assert_eq!(
            FieldMapping::from_names(&names(&["firstName", "lastName"])).unwrap(),
            FieldMapping::default()
        );
        assert!(FieldMapping::from_names(&names(&["first_name", "last_name"])).is_ok());
        assert!(FieldMapping::from_names(&names(&["firstName"])).is_err());
        assert!(FieldMapping::from_names(&names(&["firstName", "firstName"])).is_err());
        assert!(FieldMapping::from_names(&names(&["firstName", "email"])).is_err());
    }

    #[test]
    fn test_missing_file_fails_on_open_not_construction() {
        let mut reader =
            DelimitedFileReader::from_path("/nonexistent/people.csv", &ReaderConfig::default())
                .unwrap();

        assert!(matches!(reader.open(), Err(BatchError::IoError(_))));
        assert!(matches!(reader.read(), Err(BatchError::IoError(_))));
    }

    #[test]
    fn test_path_reader_opens_lazily() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("people.csv");
        let mut reader = DelimitedFileReader::from_path(&path, &ReaderConfig::default()).unwrap();

        std::fs::write(&path, "firstName,lastName\nJill,Doe\n").unwrap();

        assert_eq!(read_all(&mut reader), vec![PersonInput::new("Jill", "Doe")]);
    }

    #[test]
    fn test_bad_config_still_rejected_at_construction() {
        let config = ReaderConfig {
            delimiter: "::".to_string(),
            ..ReaderConfig::default()
        };
        assert!(DelimitedFileReader::from_path("people.csv", &config).is_err());
    }
}
