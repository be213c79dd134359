//! Source table decoding and parsing.
//!
//! Turns the raw bytes of the exported spreadsheet into a [`Table`]: a header
//! row plus data rows of string cells. No outlet-specific logic here.

use crate::error::{TableError, TableResult};

/// Cell contents read as "no value", matching spreadsheet export conventions.
pub const MISSING_MARKERS: [&str; 18] = [
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A",
    "#N/A N/A", "#NA", "<NA>", "1.#IND", "-1.#IND", "1.#QNAN", "-1.#QNAN",
];

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode the source bytes to text.
///
/// Valid UTF-8 is used as is (minus a leading BOM). Anything else goes through
/// charset detection, falling back to lossy UTF-8.
pub fn decode_table(bytes: &[u8]) -> String {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.strip_prefix('\u{feff}').unwrap_or(text).to_string();
    }

    match detect_encoding(bytes).as_str() {
        "iso-8859-1" => encoding_rs::ISO_8859_15.decode(bytes).0.into_owned(),
        "windows-1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Detect the delimiter by counting occurrences in the header line.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let mut best_sep = ',';
    let mut best_count = 0;

    for sep in [',', ';', '\t', '|'] {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// True when a raw cell carries no value.
pub fn is_missing(raw: &str) -> bool {
    raw.is_empty() || MISSING_MARKERS.contains(&raw)
}

/// Parsed table: header row plus data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Parse delimited text. Row 0 is the header row.
    ///
    /// Rows may be shorter or longer than the header; short rows read as
    /// missing cells.
    pub fn parse(content: &str, delimiter: char) -> TableResult<Self> {
        if content.trim().is_empty() {
            return Err(TableError::Empty);
        }

        let delimiter = u8::try_from(delimiter)
            .map_err(|_| TableError::Parse(format!("unsupported delimiter '{}'", delimiter)))?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(content.as_bytes());

        let mut records = reader.records();

        let headers: Vec<String> = match records.next() {
            Some(record) => record?.iter().map(String::from).collect(),
            None => return Err(TableError::Empty),
        };

        let mut rows = Vec::new();
        for record in records {
            rows.push(record?.iter().map(String::from).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Parse with the delimiter detected from the header line.
    pub fn parse_auto(content: &str) -> TableResult<Self> {
        Self::parse(content, detect_delimiter(content))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cell value, or `None` when absent or a missing marker.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .filter(|raw| !is_missing(raw))
    }
}
