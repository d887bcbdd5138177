// NCBI five-column feature table parser
//
// Format documentation: https://www.ncbi.nlm.nih.gov/WebSub/html/help/feature-table.html
//
//   >Feature gb|MN908947.3|
//   <1      >265    5'UTR
//   266     21555   gene
//                           gene    orf1ab
//   266     13483   CDS
//   13484   21555
//                           product ORF1ab polyprotein
//
// Feature lines carry start, end and key. A line with only start and end adds
// an interval to the feature above it. Qualifier lines start with three tabs.

use std::fmt;
use thiserror::Error;

/// Delimiter that opens every record in efetch `rettype=ft` output
pub const RECORD_DELIMITER: &str = ">Feature ";

/// What went wrong inside one record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeatureParseErrorKind {
    #[error("record has no header line")]
    MissingHeader,

    #[error("invalid coordinate '{0}'")]
    InvalidCoordinate(String),

    #[error("qualifier appears before any feature")]
    OrphanQualifier,

    #[error("interval continues no feature")]
    OrphanInterval,

    #[error("unrecognized line '{0}'")]
    UnexpectedLine(String),
}

/// A record that failed to parse, with enough context to find it again
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("record '{header}' line {line}: {kind}")]
pub struct FeatureParseError {
    pub header: String,
    /// 1-based line within the record, header included
    pub line: usize,
    pub kind: FeatureParseErrorKind,
}

/// Start and end of one interval, with `<`/`>` partial markers stripped off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    pub start: u64,
    pub end: u64,
    pub partial_start: bool,
    pub partial_end: bool,
}

impl Span {
    /// Coordinates without the partial flags
    pub fn position(&self) -> (u64, u64) {
        (self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lt = if self.partial_start { "<" } else { "" };
        let gt = if self.partial_end { ">" } else { "" };
        write!(f, "{}{}..{}{}", lt, self.start, gt, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Qualifier {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    /// First interval
    pub location: Span,
    /// Further intervals of a joined location
    pub joined: Vec<Span>,
    pub key: String,
    pub qualifiers: Vec<Qualifier>,
}

impl Feature {
    /// Value of the first qualifier, if it has one
    pub fn label(&self) -> Option<&str> {
        self.qualifiers
            .first()
            .and_then(|q| q.value.as_deref())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

/// One `>Feature` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRecord {
    /// Text after `>Feature `, e.g. `gb|MN908947.3|`
    pub header: String,
    pub features: Vec<Feature>,
}

/// Split a page into records and parse each one on its own.
///
/// A bad record never hides the records around it.
pub fn parse_records(text: &str) -> Vec<Result<FeatureRecord, FeatureParseError>> {
    text.split(RECORD_DELIMITER)
        .filter(|chunk| !chunk.trim().is_empty())
        .map(parse_record)
        .collect()
}

/// Parse one record, without its leading delimiter
pub fn parse_record(chunk: &str) -> Result<FeatureRecord, FeatureParseError> {
    let mut lines = chunk.lines();
    let header = lines.next().unwrap_or_default().trim().to_string();

    let fail = |line: usize, kind: FeatureParseErrorKind| FeatureParseError {
        header: header.clone(),
        line,
        kind,
    };

    if header.is_empty() {
        return Err(fail(1, FeatureParseErrorKind::MissingHeader));
    }

    let mut features: Vec<Feature> = Vec::new();

    for (offset, raw) in lines.enumerate() {
        let line_no = offset + 2;
        let line = raw.trim_end_matches('\r');

        if line.trim().is_empty() {
            continue;
        }

        if line.starts_with('\t') {
            let mut parts = line.trim_start_matches('\t').splitn(2, '\t');
            let name = parts.next().unwrap_or_default().trim();
            if name.is_empty() {
                continue;
            }
            let value = parts.next().map(|v| v.trim().to_string());

            let feature = features
                .last_mut()
                .ok_or_else(|| fail(line_no, FeatureParseErrorKind::OrphanQualifier))?;
            feature.qualifiers.push(Qualifier {
                name: name.to_string(),
                value,
            });
            continue;
        }

        // [offset=N] directives shift coordinates; they carry no features
        if line.starts_with('[') {
            continue;
        }

        let columns: Vec<&str> = line.split('\t').map(str::trim).collect();
        match columns.as_slice() {
            [start, end] | [start, end, ""] => {
                let span = parse_span(start, end).map_err(|kind| fail(line_no, kind))?;
                let feature = features
                    .last_mut()
                    .ok_or_else(|| fail(line_no, FeatureParseErrorKind::OrphanInterval))?;
                feature.joined.push(span);
            },
            [start, end, key, ..] => {
                let location = parse_span(start, end).map_err(|kind| fail(line_no, kind))?;
                features.push(Feature {
                    location,
                    joined: Vec::new(),
                    key: key.to_string(),
                    qualifiers: Vec::new(),
                });
            },
            _ => {
                return Err(fail(
                    line_no,
                    FeatureParseErrorKind::UnexpectedLine(line.to_string()),
                ))
            },
        }
    }

    Ok(FeatureRecord { header, features })
}

fn parse_span(start: &str, end: &str) -> Result<Span, FeatureParseErrorKind> {
    let (start, partial_start) = parse_coordinate(start)?;
    let (end, partial_end) = parse_coordinate(end)?;
    Ok(Span {
        start,
        end,
        partial_start,
        partial_end,
    })
}

fn parse_coordinate(raw: &str) -> Result<(u64, bool), FeatureParseErrorKind> {
    let digits = raw.trim_start_matches(['<', '>']);
    let partial = digits.len() != raw.len();
    digits
        .parse()
        .map(|pos| (pos, partial))
        .map_err(|_| FeatureParseErrorKind::InvalidCoordinate(raw.to_string()))
}
