/*!
 * Vocabulary script reading.
 *
 * A script is a CSV file whose first line is a header (never validated) and
 * whose every other line describes one drill file:
 *
 * `flag(y|n), artist, album, title, english, japanese, output_path, loop_count`
 */

use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::audio::MAX_LOOP_COUNT;
use crate::errors::ConfigError;

/// Flag value that enables a row
pub const ENABLE_MARKER: &str = "y";

/// Flag value that explicitly disables a row
pub const DISABLE_MARKER: &str = "n";

/// Number of fields in every data row
pub const FIELD_COUNT: usize = 8;

/// Interpretation of the first column of a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowFlag {
    /// Exactly the enable marker
    Enabled,
    /// Exactly the disable marker
    Disabled,
    /// Anything else; treated as disabled
    Unrecognized(String),
}

impl RowFlag {
    pub fn parse(value: &str) -> Self {
        match value {
            ENABLE_MARKER => Self::Enabled,
            DISABLE_MARKER => Self::Disabled,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled)
    }
}

/// One vocabulary item to render
#[derive(Debug, Clone, PartialEq)]
pub struct VocabularyRow {
    /// Line number in the script, used to identify the row in logs
    pub line: u64,
    pub enabled: bool,
    pub artist: String,
    pub album: String,
    pub title: String,
    pub english_text: String,
    pub japanese_text: String,
    pub output_path: PathBuf,
    /// Number of times the sentence pair is repeated, at least 1
    pub loop_count: u32,
}

impl VocabularyRow {
    /// Build a row from a raw CSV record.
    ///
    /// Fails when the record does not have exactly [`FIELD_COUNT`] fields or
    /// when the loop count is not a positive integer.
    pub fn from_record(line: u64, record: &StringRecord) -> Result<Self, ConfigError> {
        if record.len() != FIELD_COUNT {
            return Err(ConfigError::FieldCount {
                line,
                found: record.len(),
                expected: FIELD_COUNT,
            });
        }

        let field = |index: usize| record.get(index).unwrap_or_default().to_string();

        Ok(Self {
            line,
            enabled: RowFlag::parse(&field(0)).is_enabled(),
            artist: field(1),
            album: field(2),
            title: field(3),
            english_text: field(4),
            japanese_text: field(5),
            output_path: PathBuf::from(field(6)),
            loop_count: parse_loop_count(line, &field(7))?,
        })
    }

    /// Short human readable identifier for log lines
    pub fn label(&self) -> String {
        format!("line {} ({})", self.line, self.title)
    }
}

/// Parse the loop count column: a trimmed integer from 1 to [`MAX_LOOP_COUNT`]
pub fn parse_loop_count(line: u64, raw: &str) -> Result<u32, ConfigError> {
    match raw.trim().parse::<u32>() {
        Ok(count) if (1..=MAX_LOOP_COUNT).contains(&count) => Ok(count),
        _ => Err(ConfigError::InvalidLoopCount {
            line,
            value: raw.to_string(),
        }),
    }
}

/// A data record as read from the script, not yet validated
#[derive(Debug, Clone)]
pub struct ScriptRecord {
    pub line: u64,
    pub fields: StringRecord,
}

impl ScriptRecord {
    pub fn flag(&self) -> RowFlag {
        RowFlag::parse(self.fields.get(0).unwrap_or_default())
    }

    pub fn to_row(&self) -> Result<VocabularyRow, ConfigError> {
        VocabularyRow::from_record(self.line, &self.fields)
    }
}

/// Reader over the data records of a script
pub struct ScriptReader<R: Read> {
    reader: csv::Reader<R>,
}

impl ScriptReader<File> {
    /// Open a script file
    pub fn open<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| ConfigError::Script(format!("{}: {}", path.display(), e)))?;
        Ok(Self::from_reader(file, delimiter))
    }
}

impl<R: Read> ScriptReader<R> {
    /// Wrap any reader; the first record is consumed as the header
    pub fn from_reader(reader: R, delimiter: u8) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(reader);
        Self { reader }
    }

    /// Iterate over the data records in file order
    pub fn records(self) -> impl Iterator<Item = Result<ScriptRecord, ConfigError>> {
        self.reader.into_records().map(|result| {
            let fields = result.map_err(|e| ConfigError::UnreadableRecord {
                line: e.position().map(|p| p.line()),
                message: e.to_string(),
            })?;
            let line = fields.position().map(|p| p.line()).unwrap_or_default();
            Ok(ScriptRecord { line, fields })
        })
    }
}
