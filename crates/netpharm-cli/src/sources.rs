//! Offline collaborators backed by local result files.
//!
//! Every file is read once when [`LocalSources::load`] runs; the collaborator calls made
//! during the pipeline only filter what is already in memory and never fail transiently.

use crate::config::{CompoundRecord, DataFiles};
use crate::error::{CliError, Result};
use netpharm::core::io::edge_table::EdgeTable;
use netpharm::core::io::traits::TableFile;
use netpharm::core::models::compound::{Compound, CompoundQuery};
use netpharm::core::models::enrichment::EnrichmentTerm;
use netpharm::core::models::interaction::{RawInteraction, strip_species_prefix};
use netpharm::core::models::pathways::{PathwayHit, PathwayParticipant};
use netpharm::core::models::symbol::Symbol;
use netpharm::core::models::targets::{PredictedTarget, TargetSource};
use netpharm::engine::collaborators::{
    Collaborators, CompoundSource, EnrichmentSource, InteractionSource, PathwaySource,
    TargetPredictor,
};
use netpharm::engine::error::FetchError;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::io::{self, Read};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum SourceFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed table: {0}")]
    Csv(#[from] csv::Error),
}

fn read_csv<T: DeserializeOwned>(
    reader: impl Read,
) -> std::result::Result<Vec<T>, SourceFileError> {
    let mut reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);
    reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, csv::Error>>()
        .map_err(SourceFileError::from)
}

fn load_table<F: TableFile>(path: &Path) -> Result<Vec<F::Record>>
where
    F::Error: Send + Sync + 'static,
{
    F::read_from_path(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

/// A target-prediction export: one row per predicted target. Other columns are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TargetRow {
    /// Gene name: `Common name` in SwissTargetPrediction exports, `Target Name` in SuperPred.
    #[serde(rename = "Common name", alias = "Target Name", alias = "symbol")]
    pub name: String,
    /// Kept as text since SuperPred exports percentages such as `80%`.
    #[serde(rename = "Probability", alias = "probability")]
    pub probability: String,
}

impl TargetRow {
    /// The first gene name of the row; multi-gene targets list several separated by spaces.
    fn symbol(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or_default()
    }

    fn probability(&self) -> Option<f64> {
        let raw = self.probability.trim();
        raw.strip_suffix('%')
            .unwrap_or(raw)
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
    }
}

pub struct TargetTable;

impl TableFile for TargetTable {
    type Record = TargetRow;
    type Error = SourceFileError;

    fn read_from(reader: impl Read) -> std::result::Result<Vec<TargetRow>, SourceFileError> {
        read_csv(reader)
    }
}

/// Pathway membership export: one row per (pathway, participant).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MembershipRow {
    pub pathway_id: String,
    #[serde(default)]
    pub pathway_name: String,
    pub symbol: String,
    #[serde(default, alias = "uniprot")]
    pub reference_id: String,
}

pub struct MembershipTable;

impl TableFile for MembershipTable {
    type Record = MembershipRow;
    type Error = SourceFileError;

    fn read_from(reader: impl Read) -> std::result::Result<Vec<MembershipRow>, SourceFileError> {
        read_csv(reader)
    }
}

/// Enrichment export: one row per annotation term.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnrichmentRow {
    pub source: String,
    pub term_id: String,
    #[serde(alias = "name")]
    pub term_name: String,
    pub p_value: f64,
    pub adjusted_p_value: f64,
    #[serde(default)]
    pub term_size: usize,
    /// Genes annotated with the term, separated by `;` or `,`.
    #[serde(default)]
    pub intersections: String,
}

pub struct EnrichmentTable;

impl TableFile for EnrichmentTable {
    type Record = EnrichmentRow;
    type Error = SourceFileError;

    fn read_from(reader: impl Read) -> std::result::Result<Vec<EnrichmentRow>, SourceFileError> {
        read_csv(reader)
    }
}

pub struct LocalCompound {
    record: CompoundRecord,
}

impl CompoundSource for LocalCompound {
    fn lookup(&self, query: &CompoundQuery) -> std::result::Result<Compound, FetchError> {
        let (cid, smiles) = match query {
            CompoundQuery::Cid(cid) => (Some(*cid), self.record.smiles.clone()),
            CompoundQuery::Smiles(smiles) => (self.record.cid, Some(smiles.clone())),
        };
        let mut compound = Compound::from_smiles(smiles.unwrap_or_default());
        compound.cid = cid;
        compound.molecular_formula = self.record.formula.clone();
        compound.iupac_name = self.record.name.clone();
        Ok(compound)
    }
}

pub struct LocalTargets {
    swiss: Vec<TargetRow>,
    superpred: Vec<TargetRow>,
}

impl TargetPredictor for LocalTargets {
    fn predict(
        &self,
        _compound: &Compound,
    ) -> std::result::Result<Vec<PredictedTarget>, FetchError> {
        let tagged = self
            .swiss
            .iter()
            .map(|row| (row, TargetSource::SwissTargetPrediction))
            .chain(self.superpred.iter().map(|row| (row, TargetSource::SuperPred)));

        let mut predictions = Vec::new();
        for (row, source) in tagged {
            match row.probability() {
                Some(probability) => {
                    predictions.push(PredictedTarget::new(row.symbol(), probability, source))
                }
                None => warn!(
                    target = %row.name,
                    probability = %row.probability,
                    %source,
                    "Skipping target with unreadable probability."
                ),
            }
        }
        Ok(predictions)
    }
}

pub struct LocalPathways {
    rows: Vec<MembershipRow>,
}

impl PathwaySource for LocalPathways {
    fn search(&self, keyword: &str) -> std::result::Result<Vec<PathwayHit>, FetchError> {
        let needle = keyword.to_lowercase();
        let mut seen = HashSet::new();
        let hits = self
            .rows
            .iter()
            .filter(|row| row.pathway_name.to_lowercase().contains(&needle))
            .filter(|row| seen.insert(row.pathway_id.as_str()))
            .map(|row| PathwayHit {
                id: row.pathway_id.clone(),
                name: row.pathway_name.clone(),
            })
            .collect();
        Ok(hits)
    }

    fn participants(
        &self,
        pathway_id: &str,
    ) -> std::result::Result<Vec<PathwayParticipant>, FetchError> {
        let members: Vec<PathwayParticipant> = self
            .rows
            .iter()
            .filter(|row| row.pathway_id == pathway_id)
            .map(|row| PathwayParticipant::new(row.symbol.as_str(), row.reference_id.as_str()))
            .collect();
        if members.is_empty() {
            return Err(FetchError::Permanent(format!(
                "pathway {} not found in membership table",
                pathway_id
            )));
        }
        Ok(members)
    }
}

pub struct LocalInteractions {
    rows: Vec<RawInteraction>,
}

impl InteractionSource for LocalInteractions {
    /// Rows whose endpoints are both in `genes`. Rows with a readable score below
    /// `required_score` are filtered out; unreadable ones are passed through so the graph
    /// builder can count them as dropped.
    fn query(
        &self,
        genes: &[Symbol],
        required_score: u32,
    ) -> std::result::Result<Vec<RawInteraction>, FetchError> {
        let wanted: HashSet<&str> = genes.iter().map(Symbol::as_str).collect();
        let in_scope = |raw: &str| {
            Symbol::new(strip_species_prefix(raw))
                .is_some_and(|symbol| wanted.contains(symbol.as_str()))
        };
        let rows: Vec<RawInteraction> = self
            .rows
            .iter()
            .filter(|row| in_scope(&row.entity_a) && in_scope(&row.entity_b))
            .filter(|row| match row.score.trim().parse::<f64>() {
                Ok(score) => score >= f64::from(required_score),
                Err(_) => true,
            })
            .cloned()
            .collect();
        debug!(
            table = self.rows.len(),
            returned = rows.len(),
            required_score,
            "Interaction table filtered."
        );
        Ok(rows)
    }
}

pub struct LocalEnrichment {
    rows: Vec<EnrichmentRow>,
}

impl EnrichmentSource for LocalEnrichment {
    /// Terms annotating at least one of `genes`, with intersections restricted to them.
    fn enrich(&self, genes: &[Symbol]) -> std::result::Result<Vec<EnrichmentTerm>, FetchError> {
        let wanted: HashSet<&Symbol> = genes.iter().collect();
        let terms = self
            .rows
            .iter()
            .filter_map(|row| {
                let intersections: Vec<Symbol> = row
                    .intersections
                    .split([';', ','])
                    .filter_map(Symbol::new)
                    .filter(|symbol| wanted.contains(symbol))
                    .collect();
                if intersections.is_empty() {
                    return None;
                }
                Some(EnrichmentTerm {
                    source: row.source.clone(),
                    term_id: row.term_id.clone(),
                    name: row.term_name.clone(),
                    p_value: row.p_value,
                    adjusted_p_value: row.adjusted_p_value,
                    term_size: row.term_size,
                    intersections,
                })
            })
            .collect();
        Ok(terms)
    }
}

/// All five collaborators, loaded from the files named in the run configuration.
pub struct LocalSources {
    pub compound: LocalCompound,
    pub targets: LocalTargets,
    pub pathways: LocalPathways,
    pub interactions: LocalInteractions,
    pub enrichment: LocalEnrichment,
}

impl LocalSources {
    pub fn load(compound: &CompoundRecord, files: &DataFiles) -> Result<Self> {
        let swiss = load_table::<TargetTable>(&files.swiss_targets)?;
        let superpred = load_table::<TargetTable>(&files.superpred_targets)?;
        let memberships = load_table::<MembershipTable>(&files.pathways)?;
        let interactions = load_table::<EdgeTable>(&files.interactions)?;
        let enrichment = load_table::<EnrichmentTable>(&files.enrichment)?;
        info!(
            swiss = swiss.len(),
            superpred = superpred.len(),
            memberships = memberships.len(),
            interactions = interactions.len(),
            enrichment_terms = enrichment.len(),
            "Local data files loaded."
        );

        Ok(Self {
            compound: LocalCompound {
                record: compound.clone(),
            },
            targets: LocalTargets { swiss, superpred },
            pathways: LocalPathways { rows: memberships },
            interactions: LocalInteractions { rows: interactions },
            enrichment: LocalEnrichment { rows: enrichment },
        })
    }

    pub fn collaborators(&self) -> Collaborators<'_> {
        Collaborators {
            compounds: &self.compound,
            targets: &self.targets,
            pathways: &self.pathways,
            interactions: &self.interactions,
            enrichment: &self.enrichment,
        }
    }
}
