//! Row types produced by the domain extractors.
//!
//! Field names are the column names of the relational tables the rows are
//! bulk-loaded into, so they stay snake_case French as the target schema uses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Votes domain
// ============================================================================

/// Referenced deputy. Only the identifier is known from vote documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Depute {
    pub id: String,
}

/// Referenced parliamentary group. `nom` is filled by the actors pass, never here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupeParlementaire {
    pub id: String,
    pub nom: Option<String>,
}

/// One roll-call vote (scrutin).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub uid: String,
    pub numero: String,
    pub legislature: String,
    pub date_vote: String,
    pub titre: String,
    pub type_vote_code: Option<String>,
    pub type_vote_libelle: Option<String>,
    pub type_majorite: Option<String>,
    pub resultat_code: Option<String>,
    pub resultat_libelle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteGroupe {
    pub vote_uid: String,
    pub groupe_id: String,
    pub nombre_membres: i64,
    pub position_majoritaire: String,
}

/// Individual position category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Pour,
    Contre,
    Abstention,
    NonVotant,
}

impl Position {
    /// All categories, in the order voter lists are read.
    pub const ALL: [Position; 4] = [
        Position::Pour,
        Position::Contre,
        Position::Abstention,
        Position::NonVotant,
    ];

    /// Key of this category's voter list inside `decompteNominatif`.
    pub fn source_key(self) -> &'static str {
        match self {
            Position::Pour => "pours",
            Position::Contre => "contres",
            Position::Abstention => "abstentions",
            Position::NonVotant => "nonVotants",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteDepute {
    pub vote_uid: String,
    pub depute_id: String,
    pub groupe_id: String,
    pub mandat_ref: String,
    pub position: Position,
    pub cause_position: Option<String>,
    /// `Some(true)` or `None`; the source never states `false` in a usable way.
    pub par_delegation: Option<bool>,
}

/// Source-provided totals for one vote (`syntheseVote`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteAgregat {
    pub vote_uid: String,
    pub nombre_votants: i64,
    pub suffrages_exprimes: i64,
    pub suffrages_requis: i64,
    pub total_pour: i64,
    pub total_contre: i64,
    pub total_abstentions: i64,
    pub total_non_votants: i64,
    pub total_non_votants_volontaires: i64,
}

/// Source-provided totals for one group on one vote (`decompteVoix`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteGroupeAgregat {
    pub vote_uid: String,
    pub groupe_id: String,
    pub pour: i64,
    pub contre: i64,
    pub abstentions: i64,
    pub non_votants: i64,
    pub non_votants_volontaires: i64,
}

// ============================================================================
// Actors domain
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acteur {
    pub uid: String,
    pub civilite: Option<String>,
    pub prenom: String,
    pub nom: String,
    pub date_naissance: Option<String>,
    pub ville_naissance: Option<String>,
    pub departement_naissance: Option<String>,
    pub pays_naissance: Option<String>,
    pub profession: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mandat {
    pub uid: String,
    pub acteur_uid: String,
    pub legislature: Option<String>,
    pub type_organe: Option<String>,
    pub date_debut: Option<String>,
    pub date_fin: Option<String>,
    pub qualite: Option<String>,
    pub organe_ref: Option<String>,
}

/// Organ referenced by at least one mandate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganeReference {
    pub id: String,
    pub type_organe: Option<String>,
}

// ============================================================================
// Failures and table mapping
// ============================================================================

/// A document that could not be extracted. Recorded, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionFailure {
    /// Base name of the source document
    pub file: String,
    pub error: String,
}

/// One output table: its key in the single-document export, its file name in
/// the per-table export, and its rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: &'static str,
    pub file_name: &'static str,
    pub rows: Vec<Value>,
}

impl Table {
    pub fn from_rows<T: Serialize>(
        name: &'static str,
        file_name: &'static str,
        rows: &[T],
    ) -> serde_json::Result<Self> {
        let rows = rows
            .iter()
            .map(serde_json::to_value)
            .collect::<serde_json::Result<Vec<_>>>()?;
        Ok(Self {
            name,
            file_name,
            rows,
        })
    }
}

/// Ordered mapping from table name to rows, as handed to the export sinks and
/// to any downstream loader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableSet {
    tables: Vec<Table>,
}

impl TableSet {
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    pub fn get(&self, name: &str) -> Option<&[Value]> {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.rows.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }

    /// Row count per table, in table order.
    pub fn counts(&self) -> Vec<(&'static str, usize)> {
        self.tables.iter().map(|t| (t.name, t.rows.len())).collect()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
