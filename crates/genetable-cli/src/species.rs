// Species-level filtering of GenBank flat files
//
// Records end with a `//` line. The organism sits on the SOURCE block's
// `  ORGANISM  ` line, e.g.
//
//   SOURCE      Danio rerio (zebrafish)
//     ORGANISM  Danio rerio
//               Eukaryota; Metazoa; Chordata; ...
//
// A record is kept when that name is a binomial for a described species.

use std::io::{self, Write};
use tracing::debug;

const ORGANISM_PREFIX: &str = "  ORGANISM  ";

/// Second words that mark an unnamed or tentative species
const OPEN_NOMENCLATURE: &[&str] = &["sp.", "sp", "spp.", "spp", "cf.", "aff.", "bacterium", "environmental"];

/// First words that mark a name for unidentified material
const UNIDENTIFIED_PREFIXES: &[&str] = &["uncultured", "unidentified", "environmental"];

/// Counts from filtering one or more pages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpeciesSummary {
    pub records: usize,
    pub kept: usize,
    pub without_organism: usize,
}

impl SpeciesSummary {
    pub fn merge(&mut self, other: SpeciesSummary) {
        self.records += other.records;
        self.kept += other.kept;
        self.without_organism += other.without_organism;
    }
}

/// Split GenBank text into records, each ending with its `//` line.
///
/// Text after the last `//` belongs to no complete record and is dropped.
pub fn split_records(text: &str) -> Vec<&str> {
    let mut records = Vec::new();
    let mut start = 0;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        offset += line.len();
        if line.starts_with("//") {
            let record = &text[start..offset];
            if record.trim() != "//" {
                records.push(record.trim_start_matches(['\n', '\r']));
            }
            start = offset;
        }
    }

    if !text[start..].trim().is_empty() {
        debug!(bytes = text.len() - start, "Dropping incomplete trailing GenBank record");
    }

    records
}

/// Organism name from a record's `ORGANISM` line
pub fn organism_of(record: &str) -> Option<&str> {
    record
        .lines()
        .find_map(|line| line.strip_prefix(ORGANISM_PREFIX))
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// Whether `organism` names a species rather than a higher or unnamed taxon
pub fn is_species_level(organism: &str) -> bool {
    let mut words = organism.split_whitespace();
    let (Some(first), Some(second)) = (words.next(), words.next()) else {
        return false;
    };

    let first = first.to_lowercase();
    let second = second.to_lowercase();

    !UNIDENTIFIED_PREFIXES.contains(&first.as_str())
        && !OPEN_NOMENCLATURE.contains(&second.as_str())
}

/// Write the species-level records of one page to `out`
pub fn write_species_records<W: Write>(page: &str, out: &mut W) -> io::Result<SpeciesSummary> {
    let mut summary = SpeciesSummary::default();

    for record in split_records(page) {
        summary.records += 1;

        match organism_of(record) {
            Some(organism) if is_species_level(organism) => {
                out.write_all(record.as_bytes())?;
                if !record.ends_with('\n') {
                    out.write_all(b"\n")?;
                }
                summary.kept += 1;
            },
            Some(organism) => debug!(organism, "Skipping record above species level"),
            None => summary.without_organism += 1,
        }
    }

    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn record(accession: &str, organism: &str) -> String {
        [
            format!("LOCUS       {}               658 bp    DNA     linear   VRT 01-JAN-2020", accession),
            format!("DEFINITION  {} cytochrome oxidase subunit I (COI) gene, partial cds.", organism),
            format!("ACCESSION   {}", accession),
            format!("SOURCE      {}", organism),
            format!("  ORGANISM  {}", organism),
            "            Eukaryota; Metazoa; Chordata.".to_string(),
            "ORIGIN      ".to_string(),
            "        1 acgt".to_string(),
            "//".to_string(),
        ]
        .join("\n")
            + "\n"
    }

    #[test]
    fn test_split_records() {
        let text = format!("{}{}\n", record("MN1", "Danio rerio"), record("MN2", "Danio sp."));
        let records = split_records(&text);
        assert_eq!(records.len(), 2);
        assert!(records[0].starts_with("LOCUS       MN1"));
        assert!(records[0].ends_with("//\n"));
        assert!(records[1].starts_with("LOCUS       MN2"));
    }

    #[test]
    fn test_split_drops_incomplete_tail() {
        let text = format!("{}LOCUS       MN3", record("MN1", "Danio rerio"));
        assert_eq!(split_records(&text).len(), 1);
        assert!(split_records("").is_empty());
    }

    #[test]
    fn test_organism_of() {
        let rec = record("MN1", "Homo sapiens");
        assert_eq!(organism_of(&rec), Some("Homo sapiens"));
        assert_eq!(organism_of("LOCUS x\n//\n"), None);
    }

    #[test]
    fn test_species_level_names() {
        assert!(is_species_level("Homo sapiens"));
        assert!(is_species_level("Escherichia coli K-12"));
        assert!(is_species_level("Salmo trutta fario"));

        assert!(!is_species_level("Danio"));
        assert!(!is_species_level("Danio sp."));
        assert!(!is_species_level("Bacillus sp. JM-1"));
        assert!(!is_species_level("Gobius cf. niger"));
        assert!(!is_species_level("Poecilia aff. sphenops"));
        assert!(!is_species_level("uncultured bacterium"));
        assert!(!is_species_level("Uncultured Danio"));
        assert!(!is_species_level("unidentified fish"));
        assert!(!is_species_level("Rhizobiales bacterium"));
    }

    #[test]
    fn test_write_species_records() {
        let page = format!(
            "{}{}{}",
            record("MN1", "Danio rerio"),
            record("MN2", "Danio sp."),
            "LOCUS       MN3\n//\n"
        );
        let mut out = Vec::new();
        let summary = write_species_records(&page, &mut out).unwrap();

        assert_eq!(
            summary,
            SpeciesSummary {
                records: 3,
                kept: 1,
                without_organism: 1,
            }
        );
        let written = String::from_utf8(out).unwrap();
        assert!(written.contains("MN1"));
        assert!(!written.contains("MN2"));
    }
}
