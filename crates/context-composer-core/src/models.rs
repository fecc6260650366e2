//! Core data models: retrieved records and the fragments built from them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ComposeError, Result};
use crate::roles::{CueLexicon, RoleSet};

/// Provenance used when a record carries no provenance metadata.
pub const UNKNOWN_PROVENANCE: &str = "unknown";

/// Metadata key holding the provenance of a retrieved record.
pub const DEFAULT_PROVENANCE_KEY: &str = "dp";

/// A record as handed over by the retrieval collaborator.
///
/// `page_content` is optional only so that a malformed record can be
/// reported with its position instead of failing deserialization of the
/// whole batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievedItem {
    #[serde(default)]
    pub page_content: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl RetrievedItem {
    pub fn new(text: impl Into<String>, provenance: impl Into<String>) -> Self {
        let mut metadata = Map::new();
        metadata.insert(
            DEFAULT_PROVENANCE_KEY.to_string(),
            Value::String(provenance.into()),
        );
        Self {
            page_content: Some(text.into()),
            metadata,
        }
    }
}

/// An immutable retrieved unit entering composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    /// Trimmed text.
    pub text: String,
    /// Identifier of the originating data provider.
    pub provenance: String,
    /// Roles inferred from `text`; never empty.
    pub roles: RoleSet,
}

impl Fragment {
    /// Build a fragment, trimming the text and deriving its roles.
    pub fn new(text: &str, provenance: impl Into<String>, lexicon: &CueLexicon) -> Self {
        let text = text.trim().to_string();
        let roles = lexicon.assign_roles(&text);
        Self {
            text,
            provenance: provenance.into(),
            roles,
        }
    }

    /// Convert the `index`-th retrieved record into a fragment.
    ///
    /// A missing or `null` provenance becomes [`UNKNOWN_PROVENANCE`]. A
    /// missing text payload or a non-string provenance is a precondition
    /// violation of the retrieval contract and is reported, not coerced.
    pub fn from_retrieved(
        index: usize,
        item: &RetrievedItem,
        provenance_key: &str,
        lexicon: &CueLexicon,
    ) -> Result<Self> {
        let text = item
            .page_content
            .as_deref()
            .ok_or(ComposeError::MissingText { index })?;

        let provenance = match item.metadata.get(provenance_key) {
            None | Some(Value::Null) => UNKNOWN_PROVENANCE.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(ComposeError::InvalidProvenance {
                    index,
                    found: other.to_string(),
                })
            }
        };

        Ok(Self::new(text, provenance, lexicon))
    }
}

/// Convert a batch of retrieved records, preserving retrieval order.
pub fn fragments_from_retrieved(
    items: &[RetrievedItem],
    provenance_key: &str,
    lexicon: &CueLexicon,
) -> Result<Vec<Fragment>> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| Fragment::from_retrieved(i, item, provenance_key, lexicon))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::Role;
    use serde_json::json;

    #[test]
    fn test_text_is_trimmed() {
        let f = Fragment::new("  Texto con espacios.\n", "dp1", &CueLexicon::default());
        assert_eq!(f.text, "Texto con espacios.");
        assert_eq!(f.roles, RoleSet::from([Role::Descriptive]));
    }

    #[test]
    fn test_missing_provenance_defaults_to_unknown() {
        let item: RetrievedItem =
            serde_json::from_value(json!({"page_content": "Hola", "metadata": {}})).unwrap();
        let f = Fragment::from_retrieved(0, &item, "dp", &CueLexicon::default()).unwrap();
        assert_eq!(f.provenance, UNKNOWN_PROVENANCE);
    }

    #[test]
    fn test_null_provenance_defaults_to_unknown() {
        let item: RetrievedItem =
            serde_json::from_value(json!({"page_content": "Hola", "metadata": {"dp": null}}))
                .unwrap();
        let f = Fragment::from_retrieved(0, &item, "dp", &CueLexicon::default()).unwrap();
        assert_eq!(f.provenance, UNKNOWN_PROVENANCE);
    }

    #[test]
    fn test_missing_text_is_rejected_with_index() {
        let items = vec![
            RetrievedItem::new("uno", "dp1"),
            serde_json::from_value(json!({"metadata": {"dp": "dp2"}})).unwrap(),
        ];
        let err = fragments_from_retrieved(&items, "dp", &CueLexicon::default()).unwrap_err();
        assert_eq!(err, ComposeError::MissingText { index: 1 });
    }

    #[test]
    fn test_numeric_provenance_is_rejected() {
        let item: RetrievedItem =
            serde_json::from_value(json!({"page_content": "x", "metadata": {"dp": 3}})).unwrap();
        let err = Fragment::from_retrieved(4, &item, "dp", &CueLexicon::default()).unwrap_err();
        assert_eq!(
            err,
            ComposeError::InvalidProvenance {
                index: 4,
                found: "3".to_string()
            }
        );
    }

    #[test]
    fn test_custom_provenance_key() {
        let item: RetrievedItem = serde_json::from_value(
            json!({"page_content": "x", "metadata": {"source": "registro"}}),
        )
        .unwrap();
        let f = Fragment::from_retrieved(0, &item, "source", &CueLexicon::default()).unwrap();
        assert_eq!(f.provenance, "registro");
    }
}
