//! E-utilities response types
//!
//! `esearch` answers in XML:
//!
//! ```xml
//! <eSearchResult>
//!   <Count>2</Count><RetMax>2</RetMax><RetStart>0</RetStart>
//!   <IdList><Id>2462554541</Id><Id>2462554539</Id></IdList>
//! </eSearchResult>
//! ```
//!
//! A rejected query still comes back as HTTP 200, with an `<ERROR>` element
//! in place of the count.

use crate::error::{CliError, Result};
use genetable_common::types::RecordId;
use serde::Deserialize;

/// Body of an esearch response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ESearchResult {
    #[serde(rename = "Count", default)]
    pub count: Option<u64>,

    #[serde(rename = "RetMax", default)]
    pub ret_max: Option<u64>,

    #[serde(rename = "RetStart", default)]
    pub ret_start: Option<u64>,

    #[serde(rename = "IdList", default)]
    pub id_list: IdList,

    #[serde(rename = "ERROR", default)]
    pub error: Option<String>,

    #[serde(rename = "ErrorList", default)]
    pub error_list: Option<MessageList>,

    #[serde(rename = "WarningList", default)]
    pub warning_list: Option<MessageList>,
}

/// `<IdList>` element
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdList {
    #[serde(rename = "Id", default)]
    pub ids: Vec<RecordId>,
}

/// `<ErrorList>` / `<WarningList>` element
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageList {
    #[serde(rename = "PhraseNotFound", default)]
    pub phrase_not_found: Vec<String>,

    #[serde(rename = "FieldNotFound", default)]
    pub field_not_found: Vec<String>,

    #[serde(rename = "QuotedPhraseNotFound", default)]
    pub quoted_phrase_not_found: Vec<String>,

    #[serde(rename = "PhraseIgnored", default)]
    pub phrase_ignored: Vec<String>,

    #[serde(rename = "OutputMessage", default)]
    pub output_message: Vec<String>,
}

impl MessageList {
    fn describe(&self) -> Vec<String> {
        let labelled = [
            ("phrase not found", &self.phrase_not_found),
            ("field not found", &self.field_not_found),
            ("quoted phrase not found", &self.quoted_phrase_not_found),
            ("phrase ignored", &self.phrase_ignored),
        ];

        let mut out: Vec<String> = labelled
            .iter()
            .flat_map(|(label, values)| values.iter().map(move |v| format!("{}: {}", label, v)))
            .collect();
        out.extend(self.output_message.iter().cloned());
        out
    }
}

impl ESearchResult {
    /// Parse an esearch XML body
    ///
    /// Fails when the XML does not deserialize, when Entrez reports an
    /// `<ERROR>`, or when the `<Count>` element is missing.
    pub fn parse(xml: &str) -> Result<Self> {
        let result: ESearchResult = quick_xml::de::from_str(xml)
            .map_err(|e| CliError::malformed(format!("esearch body is not valid XML: {}", e)))?;

        if let Some(message) = result.error.as_deref() {
            return Err(CliError::Entrez(message.trim().to_string()));
        }

        if result.count.is_none() {
            return Err(CliError::malformed("esearch body has no <Count> element"));
        }

        Ok(result)
    }

    /// Total number of records matching the query
    pub fn total(&self) -> u64 {
        self.count.unwrap_or(0)
    }

    pub fn ids(&self) -> &[RecordId] {
        &self.id_list.ids
    }

    pub fn into_ids(self) -> Vec<RecordId> {
        self.id_list.ids
    }

    /// Human-readable notes from `<ErrorList>` and `<WarningList>`
    pub fn notices(&self) -> Vec<String> {
        self.error_list
            .iter()
            .chain(self.warning_list.iter())
            .flat_map(MessageList::describe)
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const WITH_IDS: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<!DOCTYPE eSearchResult PUBLIC "-//NLM//DTD esearch 20060628//EN" "https://eutils.ncbi.nlm.nih.gov/eutils/dtd/20060628/esearch.dtd">
<eSearchResult><Count>3</Count><RetMax>3</RetMax><RetStart>0</RetStart><IdList>
<Id>2462554541</Id>
<Id>2462554539</Id>
<Id>1798174254.1</Id>
</IdList><TranslationSet/><TranslationStack>   <TermSet>    <Term>Homo sapiens[Organism]</Term>    <Field>Organism</Field>    <Count>41000</Count>    <Explode>Y</Explode>   </TermSet>   <OP>GROUP</OP>  </TranslationStack><QueryTranslation>"Homo sapiens"[Organism]</QueryTranslation></eSearchResult>
"#;

    #[test]
    fn test_parse_ids_and_count() {
        let result = ESearchResult::parse(WITH_IDS).unwrap();
        assert_eq!(result.total(), 3);
        assert_eq!(result.ret_max, Some(3));
        let ids: Vec<&str> = result.ids().iter().map(RecordId::as_str).collect();
        assert_eq!(ids, vec!["2462554541", "2462554539", "1798174254.1"]);
    }

    #[test]
    fn test_parse_count_only() {
        let xml = "<eSearchResult><Count>0</Count><RetMax>0</RetMax><RetStart>0</RetStart><IdList/>\
                   <WarningList><OutputMessage>No items found.</OutputMessage></WarningList></eSearchResult>";
        let result = ESearchResult::parse(xml).unwrap();
        assert_eq!(result.total(), 0);
        assert!(result.ids().is_empty());
        assert_eq!(result.notices(), vec!["No items found.".to_string()]);
    }

    #[test]
    fn test_error_element_is_reported() {
        let xml = "<eSearchResult><ERROR>Invalid db name specified: nucore</ERROR></eSearchResult>";
        match ESearchResult::parse(xml) {
            Err(CliError::Entrez(msg)) => assert!(msg.contains("Invalid db name")),
            other => panic!("expected Entrez error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_count_is_malformed() {
        let xml = "<eSearchResult><IdList><Id>1</Id></IdList></eSearchResult>";
        assert!(matches!(
            ESearchResult::parse(xml),
            Err(CliError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_html_error_page_is_malformed() {
        assert!(ESearchResult::parse("<html><body>Bad Gateway").is_err());
    }

    #[test]
    fn test_non_numeric_id_is_rejected() {
        let xml = "<eSearchResult><Count>1</Count><IdList><Id>NC_045512</Id></IdList></eSearchResult>";
        assert!(matches!(
            ESearchResult::parse(xml),
            Err(CliError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_error_list_notices() {
        let xml = "<eSearchResult><Count>0</Count><IdList/>\
                   <ErrorList><PhraseNotFound>Zzyzx</PhraseNotFound></ErrorList></eSearchResult>";
        let result = ESearchResult::parse(xml).unwrap();
        assert_eq!(result.notices(), vec!["phrase not found: Zzyzx".to_string()]);
    }
}
