use std::fmt;

use chrono::NaiveDate;
use tracing::{debug, info};

use super::directory::CreditorDirectory;
use crate::core::{
    Creditor, ExtractedInvoiceData, KontierungError, NewCreditor, normalize_iban, normalize_name,
    normalize_tax_id,
};

/// Leading characters used to fetch "similar" tax id candidates.
const SIMILAR_PREFIX_LEN: usize = 8;
/// Leading characters a similar candidate's tax id must contain.
const SIMILAR_MATCH_LEN: usize = 10;
/// Shortest name token tried by the token fallback.
const MIN_TOKEN_LEN: usize = 3;

/// Legal-form words that say nothing about which company is meant.
const LEGAL_FORM_TOKENS: &[&str] = &["gmbh", "mbh", "ohg", "e.k", "gbr", "co.kg", "ltd", "inc"];

/// How a creditor was identified. Variants are in cascade order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchBasis {
    /// Normalized tax id equal.
    TaxId,
    /// Tax id sharing the leading characters (OCR drift).
    SimilarTaxId,
    /// Normalized IBAN equal.
    Iban,
    /// Normalized name equal.
    ExactName,
    /// Creditor name contains the supplier name.
    NameContains,
    /// A distinctive word of the supplier name matches.
    NameToken,
}

impl MatchBasis {
    /// Whether the match rests on an identifier rather than a name.
    pub fn is_identifier(&self) -> bool {
        matches!(self, Self::TaxId | Self::SimilarTaxId | Self::Iban)
    }

    /// Short label used in logs and explanations.
    pub fn label(&self) -> &'static str {
        match self {
            Self::TaxId => "tax id",
            Self::SimilarTaxId => "similar tax id",
            Self::Iban => "IBAN",
            Self::ExactName => "name",
            Self::NameContains => "partial name",
            Self::NameToken => "name token",
        }
    }
}

impl fmt::Display for MatchBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A resolved creditor together with how it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The matched record.
    pub creditor: Creditor,
    /// The cascade step that matched.
    pub basis: MatchBasis,
}

/// Finds the creditor an invoice belongs to, or creates one.
///
/// Only the candidate fetches touch the directory; picking the best
/// candidate is done by pure selection functions.
pub struct CreditorResolver<'a, D: CreditorDirectory + ?Sized> {
    directory: &'a D,
}

impl<'a, D: CreditorDirectory + ?Sized> CreditorResolver<'a, D> {
    /// A resolver over `directory`.
    pub fn new(directory: &'a D) -> Self {
        Self { directory }
    }

    /// Run the cascade: tax id, similar tax id, IBAN, exact name, partial
    /// name, name token. First hit wins; inactive creditors never match.
    ///
    /// `Ok(None)` means not found. Errors are directory failures.
    pub fn resolve(
        &self,
        name: Option<&str>,
        tax_id: Option<&str>,
        iban: Option<&str>,
    ) -> Result<Option<Resolution>, KontierungError> {
        let tax_id = tax_id.map(normalize_tax_id).filter(|t| !t.is_empty());
        let iban = iban.map(normalize_iban).filter(|i| !i.is_empty());
        let name = name.map(str::trim).filter(|n| !n.is_empty());

        if let Some(tax_id) = &tax_id {
            let exact = self.directory.find_by_tax_id(tax_id)?;
            if let Some(c) = exact.filter(|c| c.is_active) {
                return Ok(Some(found(c, MatchBasis::TaxId)));
            }
            let prefix: String = tax_id.chars().take(SIMILAR_PREFIX_LEN).collect();
            if prefix.chars().count() == SIMILAR_PREFIX_LEN {
                let candidates = self.directory.find_by_tax_id_fragment(&prefix)?;
                if let Some(c) = select_similar_tax_id(tax_id, &candidates) {
                    return Ok(Some(found(c.clone(), MatchBasis::SimilarTaxId)));
                }
            }
        }

        if let Some(iban) = &iban {
            let hit = self.directory.find_by_iban(iban)?;
            if let Some(c) = hit.filter(|c| c.is_active) {
                return Ok(Some(found(c, MatchBasis::Iban)));
            }
        }

        let Some(name) = name else {
            debug!("No creditor match and no supplier name");
            return Ok(None);
        };

        let candidates = self.directory.find_by_name(name)?;
        if let Some(c) = select_exact_name(name, &candidates) {
            return Ok(Some(found(c.clone(), MatchBasis::ExactName)));
        }
        if let Some(c) = select_shortest_containing(name, &candidates) {
            return Ok(Some(found(c.clone(), MatchBasis::NameContains)));
        }

        for token in name_tokens(name) {
            let candidates = self.directory.find_by_name(&token)?;
            if let Some(c) = select_shortest_containing(&token, &candidates) {
                return Ok(Some(found(c.clone(), MatchBasis::NameToken)));
            }
        }

        debug!(name, "No creditor match");
        Ok(None)
    }

    /// Create an active creditor from extracted data.
    ///
    /// Returns `Ok(None)` without touching the directory when no supplier
    /// name was extracted; identifiers alone never create a record.
    pub fn create_from_invoice_data(
        &self,
        data: &ExtractedInvoiceData,
        today: NaiveDate,
    ) -> Result<Option<Creditor>, KontierungError> {
        let Some(name) = data
            .supplier_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
        else {
            return Ok(None);
        };

        let creditor = self.directory.create(NewCreditor {
            name: name.to_string(),
            tax_id: data.supplier_tax_id.as_deref().map(normalize_tax_id),
            iban: data.iban.as_deref().map(normalize_iban),
            address: data.supplier_address.clone(),
            notes: Some(provenance_note(today)),
        })?;
        info!(id = %creditor.id, name = %creditor.name, "Creditor created from invoice");
        Ok(Some(creditor))
    }
}

/// Note attached to creditors created from an invoice.
pub fn provenance_note(today: NaiveDate) -> String {
    format!("Automatically created from invoice on {}", today.format("%d.%m.%Y"))
}

fn found(creditor: Creditor, basis: MatchBasis) -> Resolution {
    debug!(id = %creditor.id, basis = basis.label(), "Creditor matched");
    Resolution { creditor, basis }
}

/// First active candidate whose tax id contains the query's ten leading
/// characters. A shorter overlap is a different company.
pub fn select_similar_tax_id<'c>(
    tax_id: &str,
    candidates: &'c [Creditor],
) -> Option<&'c Creditor> {
    let prefix: String = tax_id.chars().take(SIMILAR_MATCH_LEN).collect();
    if prefix.chars().count() < SIMILAR_MATCH_LEN {
        return None;
    }
    candidates.iter().filter(|c| c.is_active).find(|c| {
        c.tax_id
            .as_deref()
            .is_some_and(|t| normalize_tax_id(t).contains(&prefix))
    })
}

/// Active candidate whose normalized name equals the query.
pub fn select_exact_name<'c>(name: &str, candidates: &'c [Creditor]) -> Option<&'c Creditor> {
    let wanted = normalize_name(name);
    candidates
        .iter()
        .find(|c| c.is_active && normalize_name(&c.name) == wanted)
}

/// Shortest active candidate name containing the query; the first such
/// candidate wins ties.
pub fn select_shortest_containing<'c>(
    name: &str,
    candidates: &'c [Creditor],
) -> Option<&'c Creditor> {
    let wanted = normalize_name(name);
    if wanted.is_empty() {
        return None;
    }
    candidates
        .iter()
        .filter(|c| c.is_active && normalize_name(&c.name).contains(&wanted))
        .min_by_key(|c| c.name.chars().count())
}

/// Distinctive lower-case words of a supplier name, in order.
pub fn name_tokens(name: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for word in name.split_whitespace() {
        let word = word
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        if word.chars().count() < MIN_TOKEN_LEN
            || LEGAL_FORM_TOKENS.contains(&word.as_str())
            || tokens.contains(&word)
        {
            continue;
        }
        tokens.push(word);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CreditorBuilder;

    fn creditors() -> Vec<Creditor> {
        vec![
            CreditorBuilder::new("1", "Sonepar Deutschland Region Nord GmbH").build(),
            CreditorBuilder::new("2", "Sonepar Deutschland GmbH").build(),
            CreditorBuilder::new("3", "Sonepar").active(false).build(),
            CreditorBuilder::new("4", "FAMO GmbH").tax_id("DE123456789").build(),
            CreditorBuilder::new("5", "FAMO Service GmbH").tax_id("DE123456780").build(),
        ]
    }

    #[test]
    fn shortest_containing_name_wins() {
        let all = creditors();
        assert_eq!(select_shortest_containing("sonepar", &all).unwrap().id, "2");
    }

    #[test]
    fn exact_name_ignores_case_and_spacing() {
        let all = creditors();
        assert_eq!(select_exact_name("famo   gmbh", &all).unwrap().id, "4");
        assert!(select_exact_name("Sonepar", &all).is_none());
    }

    #[test]
    fn similar_needs_ten_leading_characters() {
        let all = creditors();
        assert_eq!(select_similar_tax_id("DE123456781", &all).unwrap().id, "4");
        assert!(select_similar_tax_id("DE12345670", &all).is_none());
        assert!(select_similar_tax_id("DE123456111", &all).is_none());
        assert!(select_similar_tax_id("DE99", &all).is_none());
    }

    #[test]
    fn tokens_skip_legal_forms_and_short_words() {
        assert_eq!(name_tokens("Musterfirma GmbH"), ["musterfirma"]);
        assert_eq!(
            name_tokens("Schmidt & Sohn GmbH & Co. KG"),
            ["schmidt", "sohn"]
        );
        assert_eq!(name_tokens("Müller e.K."), ["müller"]);
    }

    #[test]
    fn provenance_note_format() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(
            provenance_note(date),
            "Automatically created from invoice on 05.03.2024"
        );
    }

    #[test]
    fn basis_classification() {
        assert!(MatchBasis::Iban.is_identifier());
        assert!(MatchBasis::SimilarTaxId.is_identifier());
        assert!(!MatchBasis::NameContains.is_identifier());
        assert_eq!(MatchBasis::TaxId.to_string(), "tax id");
    }
}
