use super::validation::{ValidationError, validate_cid, validate_smiles};
use serde::Serialize;
use std::fmt;

/// How the compound under study is identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompoundQuery {
    Cid(u64),
    Smiles(String),
}

impl CompoundQuery {
    pub fn cid(raw: &str) -> Result<Self, ValidationError> {
        validate_cid(raw).map(Self::Cid)
    }

    pub fn smiles(raw: &str) -> Result<Self, ValidationError> {
        validate_smiles(raw).map(Self::Smiles)
    }

    /// Short label used in log lines and run reports.
    pub fn label(&self) -> String {
        match self {
            Self::Cid(cid) => cid.to_string(),
            Self::Smiles(_) => "compound_smiles".to_string(),
        }
    }
}

impl fmt::Display for CompoundQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cid(cid) => write!(f, "CID {}", cid),
            Self::Smiles(smiles) => write!(f, "SMILES {}", smiles),
        }
    }
}

/// Compound properties returned by the chemical database collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Compound {
    pub cid: Option<u64>,
    pub canonical_smiles: String,
    pub isomeric_smiles: Option<String>,
    pub molecular_formula: Option<String>,
    pub molecular_weight: Option<f64>,
    pub iupac_name: Option<String>,
}

impl Compound {
    /// A compound known only by its SMILES string.
    pub fn from_smiles(smiles: impl Into<String>) -> Self {
        Self {
            cid: None,
            canonical_smiles: smiles.into(),
            isomeric_smiles: None,
            molecular_formula: None,
            molecular_weight: None,
            iupac_name: None,
        }
    }
}
