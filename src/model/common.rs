use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type Id = String;

/// Which reference catalog (and which per-image index) an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    Style,
    Motif,
}

impl std::fmt::Display for TagKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TagKind::Style => write!(f, "style"),
            TagKind::Motif => write!(f, "motif"),
        }
    }
}

impl std::str::FromStr for TagKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "style" | "styles" => Ok(TagKind::Style),
            "motif" | "motifs" => Ok(TagKind::Motif),
            _ => Err(format!("Unknown tag kind: {}", s)),
        }
    }
}

/// Display language for localized catalog names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ja,
    En,
}

impl Default for Language {
    fn default() -> Self {
        Language::Ja
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ja" | "jp" => Ok(Language::Ja),
            "en" => Ok(Language::En),
            _ => Err(format!("Unknown language: {}", s)),
        }
    }
}

pub fn generate_id() -> Id {
    Uuid::new_v4().to_string()
}
