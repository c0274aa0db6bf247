use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use super::{DataError, InstrumentCatalog};

/// A listed instrument
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Instrument {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub market: Option<String>,
}

/// Read-only instrument catalog.
///
/// Cloning is cheap and every clone shares the same list. The list is never
/// mutated after construction; to refresh it, build a new catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    instruments: Arc<Vec<Instrument>>,
}

impl StaticCatalog {
    pub fn new(instruments: Vec<Instrument>) -> Self {
        Self {
            instruments: Arc::new(instruments),
        }
    }

    /// Load a JSON array of instruments
    pub fn from_json_file(path: &Path) -> Result<Self, DataError> {
        let raw = std::fs::read_to_string(path)?;
        let instruments: Vec<Instrument> = serde_json::from_str(&raw)?;

        tracing::info!(
            "Loaded {} instruments from {}",
            instruments.len(),
            path.display()
        );

        Ok(Self::new(instruments))
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Names for a picker: `popular` first (in the given order, only those
    /// listed in the catalog), then every other name sorted.
    pub fn selection_list(&self, popular: &[String]) -> Vec<String> {
        let listed: Vec<String> = self.names();
        let mut selection: Vec<String> = popular
            .iter()
            .filter(|p| listed.contains(p))
            .cloned()
            .collect();

        let mut others: Vec<String> = listed
            .into_iter()
            .filter(|n| !popular.contains(n))
            .collect();
        others.sort();
        others.dedup();

        selection.extend(others);
        selection
    }
}

impl InstrumentCatalog for StaticCatalog {
    fn lookup_code(&self, name: &str) -> Result<String, DataError> {
        self.instruments
            .iter()
            .find(|i| i.name == name)
            .map(|i| i.code.clone())
            .ok_or_else(|| DataError::NotFound(name.to_string()))
    }

    fn names(&self) -> Vec<String> {
        self.instruments.iter().map(|i| i.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_catalog() -> StaticCatalog {
        StaticCatalog::new(vec![
            Instrument {
                code: "005930".to_string(),
                name: "Samsung Electronics".to_string(),
                market: Some("KOSPI".to_string()),
            },
            Instrument {
                code: "035720".to_string(),
                name: "Kakao".to_string(),
                market: Some("KOSPI".to_string()),
            },
            Instrument {
                code: "000660".to_string(),
                name: "SK hynix".to_string(),
                market: None,
            },
        ])
    }

    #[test]
    fn test_lookup_exact_name() {
        let catalog = sample_catalog();
        assert_eq!(catalog.lookup_code("Kakao").unwrap(), "035720");
    }

    #[test]
    fn test_lookup_not_found() {
        let catalog = sample_catalog();
        let err = catalog.lookup_code("kakao").unwrap_err();
        assert!(matches!(err, DataError::NotFound(ref n) if n == "kakao"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_selection_list_order() {
        let catalog = sample_catalog();
        let popular = vec!["SK hynix".to_string(), "Unlisted".to_string()];

        assert_eq!(
            catalog.selection_list(&popular),
            vec!["SK hynix", "Kakao", "Samsung Electronics"]
        );
    }

    #[test]
    fn test_clones_share_instruments() {
        let catalog = sample_catalog();
        let clone = catalog.clone();
        assert!(Arc::ptr_eq(&catalog.instruments, &clone.instruments));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"code": "AAA", "name": "Alpha"}}, {{"code": "BBB", "name": "Beta", "market": "KOSDAQ"}}]"#
        )
        .unwrap();

        let catalog = StaticCatalog::from_json_file(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.lookup_code("Beta").unwrap(), "BBB");
        assert_eq!(catalog.instruments()[0].market, None);
    }

    #[test]
    fn test_from_json_file_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = StaticCatalog::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, DataError::Parse(_)));
    }
}
