use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use super::error::{DictionaryError, Result};
use super::normalize;

/// Asset returned when no alias matches
pub const DEFAULT_PLACEHOLDER: &str = "/companies/default-company.svg";

/// Built-in aliases in definition order.
///
/// Order decides which key wins when several satisfy the containment tier
/// (every `... BANK ...` key matches any name carrying the `BANK` token), so
/// entries must only ever be appended.
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("GCB BANK PLC", "/banks/GCB_BANK_PLC.png"),
    ("ECOBANK GHANA PLC", "/banks/ECOBANK_GHANA_PLC.png"),
    ("ABSA BANK GHANA LTD", "/banks/ABSA_BANK_GHANA_LTD.png"),
    ("STANBIC BANK GHANA LTD", "/banks/STANBIC_BANK_GHANA_LTD.png"),
    (
        "STANDARD CHARTERED BANK GHANA PLC",
        "/banks/STANDARD_CHARTERED_BANK_GHANA_PLC.png",
    ),
    ("ZENITH BANK GHANA LTD", "/banks/ZENITH_BANK_GHANA_LTD.png"),
    ("FIDELITY BANK GHANA LTD", "/banks/FIDELITY_BANK_GHANA_LTD.png"),
    ("CALBANK PLC", "/banks/CALBANK_PLC.png"),
    ("ACCESS BANK GHANA PLC", "/banks/ACCESS_BANK_GHANA_PLC.png"),
    ("SOCIETE GENERALE GHANA PLC", "/banks/SOCIETE_GENERALE_GHANA_PLC.png"),
    ("REPUBLIC BANK GHANA PLC", "/banks/REPUBLIC_BANK_GHANA_PLC.png"),
    (
        "UNITED BANK FOR AFRICA GHANA LTD",
        "/banks/UNITED_BANK_FOR_AFRICA_GHANA_LTD.png",
    ),
    ("PRUDENTIAL BANK LTD", "/banks/PRUDENTIAL_BANK_LTD.png"),
    ("CONSOLIDATED BANK GHANA LTD", "/banks/CONSOLIDATED_BANK_GHANA_LTD.png"),
    (
        "AGRICULTURAL DEVELOPMENT BANK PLC",
        "/banks/AGRICULTURAL_DEVELOPMENT_BANK_PLC.png",
    ),
    ("NATIONAL INVESTMENT BANK LTD", "/banks/NATIONAL_INVESTMENT_BANK_LTD.png"),
    ("OMNIBSIC BANK GHANA LTD", "/banks/OMNIBSIC_BANK_GHANA_LTD.png"),
    ("FIRST ATLANTIC BANK LTD", "/banks/FIRST_ATLANTIC_BANK_LTD.png"),
    ("FBNBANK GHANA LTD", "/banks/FBNBANK_GHANA_LTD.png"),
    (
        "GUARANTY TRUST BANK GHANA LTD",
        "/banks/GUARANTY_TRUST_BANK_GHANA_LTD.png",
    ),
    ("BANK OF AFRICA GHANA LTD", "/banks/BANK_OF_AFRICA_GHANA_LTD.png"),
    ("UNIVERSAL MERCHANT BANK LTD", "/banks/UNIVERSAL_MERCHANT_BANK_LTD.png"),
    (
        "FIRST NATIONAL BANK GHANA LTD",
        "/banks/FIRST_NATIONAL_BANK_GHANA_LTD.png",
    ),
    ("ARB APEX BANK PLC", "/banks/ARB_APEX_BANK_PLC.png"),
    ("MTN GHANA", "/companies/MTN_GHANA.png"),
    ("VODAFONE GHANA", "/companies/VODAFONE_GHANA.png"),
    ("TULLOW OIL", "/companies/TULLOW_OIL.png"),
    ("KOSMOS ENERGY", "/companies/KOSMOS_ENERGY.png"),
    ("GHANA OIL COMPANY", "/companies/GHANA_OIL_COMPANY.png"),
    ("GOLD FIELDS GHANA", "/companies/GOLD_FIELDS_GHANA.png"),
    ("NEWMONT GHANA", "/companies/NEWMONT_GHANA.png"),
    ("ANGLOGOLD ASHANTI", "/companies/ANGLOGOLD_ASHANTI.png"),
    ("GUINNESS GHANA BREWERIES", "/companies/GUINNESS_GHANA_BREWERIES.png"),
    ("UNILEVER GHANA", "/companies/UNILEVER_GHANA.png"),
    ("NESTLE GHANA", "/companies/NESTLE_GHANA.png"),
    (
        "TOTALENERGIES MARKETING GHANA",
        "/companies/TOTALENERGIES_MARKETING_GHANA.png",
    ),
    (
        "ACCRA INTERNATIONAL CONFERENCE CENTRE",
        "/venues/ACCRA_INTERNATIONAL_CONFERENCE_CENTRE.png",
    ),
    (
        "KEMPINSKI HOTEL GOLD COAST CITY",
        "/venues/KEMPINSKI_HOTEL_GOLD_COAST_CITY.png",
    ),
    ("LABADI BEACH HOTEL", "/venues/LABADI_BEACH_HOTEL.png"),
];

/// One alias: canonical uppercase key and the asset it maps to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    pub key: String,
    pub asset: String,
}

/// On-disk layout. `[[alias]]` tables keep definition order.
#[derive(Debug, Deserialize)]
struct DictionaryFile {
    #[serde(default)]
    placeholder: Option<String>,

    #[serde(default, rename = "alias")]
    aliases: Vec<AliasEntry>,
}

/// Ordered mapping from canonical entity-name keys to asset references
///
/// Keys are unique and stored normalized (trimmed, uppercase). Iteration
/// follows definition order, which the resolver relies on for tie-breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasDictionary {
    entries: Vec<AliasEntry>,
    placeholder: String,
}

impl AliasDictionary {
    /// The dictionary shipped with the crate
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_ALIASES
                .iter()
                .map(|(key, asset)| AliasEntry {
                    key: (*key).to_string(),
                    asset: (*asset).to_string(),
                })
                .collect(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }

    /// Build a dictionary from `(key, asset)` pairs in definition order
    ///
    /// Keys are normalized before validation.
    ///
    /// # Errors
    /// Returns `DictionaryError` if a key or asset is empty, or two keys
    /// normalize to the same value.
    pub fn new<I, K, V>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut validated = Vec::new();

        for (index, (key, asset)) in entries.into_iter().enumerate() {
            let key = normalize(key.as_ref());
            if key.is_empty() {
                return Err(DictionaryError::EmptyKey(index));
            }

            let asset = asset.into();
            if asset.trim().is_empty() {
                return Err(DictionaryError::EmptyAsset(key));
            }

            if !seen.insert(key.clone()) {
                return Err(DictionaryError::DuplicateKey(key));
            }

            validated.push(AliasEntry { key, asset });
        }

        Ok(Self {
            entries: validated,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        })
    }

    /// Replace the fallback asset
    ///
    /// # Errors
    /// Returns `DictionaryError::EmptyPlaceholder` for an empty reference.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Result<Self> {
        let placeholder = placeholder.into();
        if placeholder.trim().is_empty() {
            return Err(DictionaryError::EmptyPlaceholder);
        }
        self.placeholder = placeholder;
        Ok(self)
    }

    /// Parse a dictionary from TOML text
    ///
    /// # Errors
    /// Returns `DictionaryError` if the text is not valid TOML or fails
    /// validation.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: DictionaryFile = toml::from_str(content)?;
        let dictionary = Self::new(
            file.aliases
                .into_iter()
                .map(|entry| (entry.key, entry.asset)),
        )?;

        match file.placeholder {
            Some(placeholder) => dictionary.with_placeholder(placeholder),
            None => Ok(dictionary),
        }
    }

    /// Load a dictionary from a TOML file
    ///
    /// # Errors
    /// Returns `DictionaryError` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Exact lookup by already-normalized key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.asset.as_str())
    }

    /// Entries in definition order
    #[must_use]
    pub fn entries(&self) -> &[AliasEntry] {
        &self.entries
    }

    /// Asset used when nothing matches
    #[must_use]
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AliasDictionary {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_passes_validation() {
        let builtin = AliasDictionary::builtin();
        let rebuilt = AliasDictionary::new(
            builtin
                .entries()
                .iter()
                .map(|entry| (entry.key.clone(), entry.asset.clone())),
        )
        .unwrap();

        assert_eq!(rebuilt, builtin);
        assert_eq!(builtin.placeholder(), DEFAULT_PLACEHOLDER);
    }

    #[test]
    fn test_new_normalizes_keys() {
        let dictionary =
            AliasDictionary::new([("  zenith bank ", "/banks/zenith.png")]).unwrap();

        assert_eq!(dictionary.entries()[0].key, "ZENITH BANK");
        assert_eq!(dictionary.get("ZENITH BANK"), Some("/banks/zenith.png"));
        assert_eq!(dictionary.get("zenith bank"), None);
    }

    #[test]
    fn test_new_preserves_definition_order() {
        let dictionary = AliasDictionary::new([
            ("ZENITH", "/a.png"),
            ("ZENITH BANK GHANA LTD", "/b.png"),
            ("ABSA", "/c.png"),
        ])
        .unwrap();

        let keys: Vec<&str> = dictionary.entries().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["ZENITH", "ZENITH BANK GHANA LTD", "ABSA"]);
    }

    #[test]
    fn test_new_rejects_duplicate_after_normalization() {
        let result = AliasDictionary::new([("Absa", "/a.png"), ("ABSA ", "/b.png")]);
        assert!(matches!(result, Err(DictionaryError::DuplicateKey(key)) if key == "ABSA"));
    }

    #[test]
    fn test_new_rejects_empty_key_and_asset() {
        let result = AliasDictionary::new([("OK", "/a.png"), ("   ", "/b.png")]);
        assert!(matches!(result, Err(DictionaryError::EmptyKey(1))));

        let result = AliasDictionary::new([("OK", " ")]);
        assert!(matches!(result, Err(DictionaryError::EmptyAsset(_))));
    }

    #[test]
    fn test_with_placeholder_rejects_empty() {
        let result = AliasDictionary::builtin().with_placeholder("");
        assert!(matches!(result, Err(DictionaryError::EmptyPlaceholder)));
    }

    #[test]
    fn test_from_toml_str() {
        let dictionary = AliasDictionary::from_toml_str(
            r#"
placeholder = "/img/none.svg"

[[alias]]
key = "zenith"
asset = "/banks/zenith.png"

[[alias]]
key = "Zenith Bank Ghana Ltd"
asset = "/banks/zenith-full.png"
"#,
        )
        .unwrap();

        assert_eq!(dictionary.len(), 2);
        assert_eq!(dictionary.entries()[0].key, "ZENITH");
        assert_eq!(dictionary.entries()[1].key, "ZENITH BANK GHANA LTD");
        assert_eq!(dictionary.placeholder(), "/img/none.svg");
    }

    #[test]
    fn test_from_toml_str_without_placeholder_uses_default() {
        let dictionary = AliasDictionary::from_toml_str("").unwrap();
        assert!(dictionary.is_empty());
        assert_eq!(dictionary.placeholder(), DEFAULT_PLACEHOLDER);
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("aliases.toml");
        fs::write(
            &path,
            "[[alias]]\nkey = \"MTN\"\nasset = \"/companies/mtn.png\"\n",
        )
        .unwrap();

        let dictionary = AliasDictionary::load(&path).unwrap();
        assert_eq!(dictionary.get("MTN"), Some("/companies/mtn.png"));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = AliasDictionary::load(&temp_dir.path().join("missing.toml"));
        assert!(matches!(result, Err(DictionaryError::Io(_))));
    }
}
