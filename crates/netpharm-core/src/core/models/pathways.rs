use super::symbol::Symbol;
use super::targets::TargetSet;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// How a pathway entered the analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PathwayOrigin {
    /// The search term was itself a pathway identifier.
    DirectId,
    /// The pathway was a hit for this keyword.
    Keyword(String),
}

/// A pathway selected for protein extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathwayRef {
    pub id: String,
    pub name: String,
    pub origin: PathwayOrigin,
}

impl PathwayRef {
    pub fn direct(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: format!("Pathway {}", id),
            origin: PathwayOrigin::DirectId,
        }
    }
}

/// A keyword search hit returned by the pathway collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathwayHit {
    pub id: String,
    pub name: String,
}

/// A protein participating in a pathway, as returned by the pathway collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathwayParticipant {
    pub symbol: String,
    pub reference_id: String,
}

impl PathwayParticipant {
    pub fn new(symbol: impl Into<String>, reference_id: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            reference_id: reference_id.into(),
        }
    }
}

/// The pathways an entity participates in, with the reference identifiers seen for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PathwayMembership {
    pub pathways: IndexSet<String>,
    pub reference_ids: IndexSet<String>,
}

/// Mapping from entity to the pathways it participates in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PathwayProteinSet {
    members: IndexMap<Symbol, PathwayMembership>,
}

impl PathwayProteinSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `participant` belongs to `pathway_id`.
    ///
    /// # Return
    ///
    /// Returns `true` if the (symbol, pathway) pair was not already present. Participants
    /// with a blank symbol are ignored and return `false`.
    pub fn insert(&mut self, participant: &PathwayParticipant, pathway_id: &str) -> bool {
        let Some(symbol) = Symbol::new(&participant.symbol) else {
            return false;
        };
        let membership = self.members.entry(symbol).or_default();
        if !participant.reference_id.is_empty() {
            membership
                .reference_ids
                .insert(participant.reference_id.clone());
        }
        membership.pathways.insert(pathway_id.to_string())
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.members.contains_key(symbol)
    }

    pub fn get(&self, symbol: &str) -> Option<&PathwayMembership> {
        self.members.get(symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &PathwayMembership)> {
        self.members.iter()
    }
}

impl FromIterator<(Symbol, String)> for PathwayProteinSet {
    fn from_iter<I: IntoIterator<Item = (Symbol, String)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (symbol, pathway_id) in iter {
            set.members
                .entry(symbol)
                .or_default()
                .pathways
                .insert(pathway_id);
        }
        set
    }
}

/// Targets that also appear in at least one analyzed pathway.
///
/// Every member is present in both the `TargetSet` and the `PathwayProteinSet` it was
/// computed from, and carries the pathway annotation of the latter. Members keep the
/// target set's order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverlapSet {
    members: IndexMap<Symbol, PathwayMembership>,
}

impl OverlapSet {
    pub fn intersect(targets: &TargetSet, pathways: &PathwayProteinSet) -> Self {
        let members = targets
            .symbols()
            .filter_map(|symbol| {
                pathways
                    .get(symbol.as_str())
                    .map(|membership| (symbol.clone(), membership.clone()))
            })
            .collect();
        Self { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.members.contains_key(symbol)
    }

    pub fn get(&self, symbol: &str) -> Option<&PathwayMembership> {
        self.members.get(symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.members.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &PathwayMembership)> {
        self.members.iter()
    }
}
