//! Role assignment from lexical cues.
//!
//! Every fragment carries a non-empty set of [`Role`]s inferred purely
//! from its text. A role is present when any of its cue phrases occurs
//! as a substring of the lower-cased text; when no cue matches at all the
//! fragment is [`Role::Descriptive`].
//!
//! Cue lists live in a [`CueLexicon`] value rather than in branching code,
//! so a deployment can swap the default Spanish markers for another
//! language without touching the algorithm.
//!
//! # Example
//!
//! ```rust
//! use context_composer_core::roles::{CueLexicon, Role};
//!
//! let lexicon = CueLexicon::default();
//! let roles = lexicon.assign_roles("El responsable debe cumplir, excepto si hay consentimiento.");
//! assert!(roles.contains(&Role::Normative));
//! assert!(roles.contains(&Role::Alternative));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::error::{ComposeError, Result};

/// Semantic role of a fragment.
///
/// Variants are declared in alphabetical order so that the derived `Ord`
/// matches the sorted label order used in group headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Disjunctive or exception language.
    Alternative,
    /// Fallback when no cue matches.
    Descriptive,
    /// Obligation language.
    Normative,
    /// Recommendation language.
    Orientative,
}

impl Role {
    /// All roles in label order.
    pub const ALL: [Role; 4] = [
        Role::Alternative,
        Role::Descriptive,
        Role::Normative,
        Role::Orientative,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Alternative => "alternative",
            Role::Descriptive => "descriptive",
            Role::Normative => "normative",
            Role::Orientative => "orientative",
        }
    }

    /// Position of the role in [`Role::ALL`], used to index static tables.
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "alternative" => Ok(Role::Alternative),
            "descriptive" => Ok(Role::Descriptive),
            "normative" => Ok(Role::Normative),
            "orientative" => Ok(Role::Orientative),
            other => Err(ComposeError::InvalidLexicon(format!(
                "unknown role '{}'",
                other
            ))),
        }
    }
}

/// Ordered set of roles. Two fragments with the same roles always compare
/// equal regardless of the order in which the roles were detected.
pub type RoleSet = BTreeSet<Role>;

/// Comma-joined, sorted role names: `"alternative, normative"`.
pub fn role_label(roles: &RoleSet) -> String {
    roles
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

const NORMATIVE_CUES: &[&str] = &[
    "debe",
    "deberá",
    "obligatorio",
    "requiere",
    "está obligado",
    "no puede",
];

const ALTERNATIVE_CUES: &[&str] = &["o bien", "alternativamente", "excepto", "en su defecto"];

const ORIENTATIVE_CUES: &[&str] = &[
    "se recomienda",
    "debería",
    "es aconsejable",
    "buena práctica",
];

/// Per-role cue phrases. [`Role::Descriptive`] never has cues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueLexicon {
    cues: BTreeMap<Role, Vec<String>>,
}

impl Default for CueLexicon {
    /// Spanish deontic, disjunctive, and recommendation markers.
    fn default() -> Self {
        let owned = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        let mut cues = BTreeMap::new();
        cues.insert(Role::Normative, owned(NORMATIVE_CUES));
        cues.insert(Role::Alternative, owned(ALTERNATIVE_CUES));
        cues.insert(Role::Orientative, owned(ORIENTATIVE_CUES));
        Self { cues }
    }
}

impl CueLexicon {
    /// Replace the cue list for `role`.
    ///
    /// Cues are lower-cased so matching stays case-insensitive. Fails for
    /// [`Role::Descriptive`], for an empty list, and for blank cues.
    pub fn with_cues<I, S>(mut self, role: Role, cues: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if role == Role::Descriptive {
            return Err(ComposeError::InvalidLexicon(
                "descriptive is the fallback role and cannot have cues".to_string(),
            ));
        }

        let mut list = Vec::new();
        for cue in cues {
            let cue = cue.as_ref().trim().to_lowercase();
            if cue.is_empty() {
                return Err(ComposeError::InvalidLexicon(format!(
                    "blank cue for role '{}'",
                    role
                )));
            }
            list.push(cue);
        }
        if list.is_empty() {
            return Err(ComposeError::InvalidLexicon(format!(
                "empty cue list for role '{}'",
                role
            )));
        }

        self.cues.insert(role, list);
        Ok(self)
    }

    /// Cue phrases for `role` (empty for descriptive).
    pub fn cues(&self, role: Role) -> &[String] {
        self.cues.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `text` contains any cue of `role`, ignoring case.
    pub fn has_cue(&self, role: Role, text: &str) -> bool {
        matches_any(self.cues(role), &text.to_lowercase())
    }

    /// Assign the role set of `text`. Never returns an empty set.
    pub fn assign_roles(&self, text: &str) -> RoleSet {
        let lowered = text.to_lowercase();
        let mut roles: RoleSet = self
            .cues
            .iter()
            .filter(|(_, cues)| matches_any(cues, &lowered))
            .map(|(role, _)| *role)
            .collect();

        if roles.is_empty() {
            roles.insert(Role::Descriptive);
        }
        roles
    }
}

fn matches_any(cues: &[String], lowered: &str) -> bool {
    cues.iter().any(|cue| lowered.contains(cue.as_str()))
}
