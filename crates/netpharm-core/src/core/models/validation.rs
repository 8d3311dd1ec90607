use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

const MIN_SMILES_LENGTH: usize = 3;
const SMILES_ALPHABET: &str = "CNOPSFClBrI[]()=#@+-\\/0123456789cnops";

static PATHWAY_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^R-[A-Z]{3}-\d+$").expect("pathway id pattern is valid"));

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ValidationError {
    #[error("Invalid CID format: '{0}'. Must be a positive integer.")]
    InvalidCid(String),

    #[error("SMILES string too short: '{0}'")]
    SmilesTooShort(String),

    #[error("SMILES contains invalid characters: '{0}'")]
    InvalidSmiles(String),

    #[error("Invalid pathway ID format: '{0}'. Expected e.g. 'R-HSA-1280218'.")]
    InvalidPathwayId(String),
}

pub fn validate_cid(raw: &str) -> Result<u64, ValidationError> {
    match raw.trim().parse::<u64>() {
        Ok(cid) if cid > 0 => Ok(cid),
        _ => Err(ValidationError::InvalidCid(raw.to_string())),
    }
}

pub fn validate_smiles(raw: &str) -> Result<String, ValidationError> {
    let smiles = raw.trim();
    if smiles.len() < MIN_SMILES_LENGTH {
        return Err(ValidationError::SmilesTooShort(smiles.to_string()));
    }
    if !smiles.chars().all(|c| SMILES_ALPHABET.contains(c)) {
        return Err(ValidationError::InvalidSmiles(smiles.to_string()));
    }
    Ok(smiles.to_string())
}

pub fn validate_pathway_id(raw: &str) -> Result<&str, ValidationError> {
    if PATHWAY_ID_PATTERN.is_match(raw) {
        Ok(raw)
    } else {
        Err(ValidationError::InvalidPathwayId(raw.to_string()))
    }
}
