//! Roll-call vote (scrutin) extraction.
//!
//! One document describes one vote: its metadata, optional source totals,
//! and a per-group breakdown down to individual positions. Groups and
//! deputies are referenced by identifier and deduplicated across the run.

use serde_json::Value;
use std::collections::BTreeSet;

use crate::harvest::lookup::{
    as_sequence, at, count, delegation_flag, first, text, text_or_empty,
};
use crate::model::{
    Depute, ExtractionFailure, GroupeParlementaire, Position, Table, TableSet, Vote, VoteAgregat,
    VoteDepute, VoteGroupe, VoteGroupeAgregat,
};
use crate::traits::{DocumentError, Extractor};

pub const TABLE_DEPUTES: &str = "deputes";
pub const TABLE_GROUPES: &str = "groupes";
pub const TABLE_VOTES: &str = "votes";
pub const TABLE_VOTES_GROUPES: &str = "votesGroupes";
pub const TABLE_VOTES_DEPUTES: &str = "votesDeputes";
pub const TABLE_VOTES_AGREGATS: &str = "votesAgregats";
pub const TABLE_VOTES_GROUPES_AGREGATS: &str = "votesGroupesAgregats";

/// Keys under which documents carry the per-group breakdown, by preference.
const VENTILATION_KEYS: &[&[&str]] = &[&["ventilationVotes"], &["votes"], &["groupes"]];

/// Rows normalized from a single document, committed as a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrutinRows {
    pub vote: Vote,
    pub agregat: Option<VoteAgregat>,
    pub groupes: Vec<VoteGroupe>,
    pub groupes_agregats: Vec<VoteGroupeAgregat>,
    pub deputes: Vec<VoteDepute>,
}

/// Normalizes one vote document without touching any accumulated state.
pub fn normalize_scrutin(document: &Value) -> Result<ScrutinRows, DocumentError> {
    if !document.is_object() {
        return Err(DocumentError::NotAnObject);
    }
    let scrutin = at(document, &["scrutin"]).unwrap_or(document);
    let uid = text(scrutin, &[&["uid"]]).ok_or(DocumentError::MissingUid)?;

    let vote = Vote {
        uid: uid.clone(),
        numero: text_or_empty(scrutin, &[&["numero"]]),
        legislature: text_or_empty(scrutin, &[&["legislature"]]),
        date_vote: text_or_empty(scrutin, &[&["dateScrutin"]]),
        titre: text_or_empty(scrutin, &[&["titre"], &["objet", "libelle"]]),
        type_vote_code: text(scrutin, &[&["typeVote", "codeTypeVote"]]),
        type_vote_libelle: text(scrutin, &[&["typeVote", "libelleTypeVote"]]),
        type_majorite: text(scrutin, &[&["typeVote", "typeMajorite"]]),
        resultat_code: text(scrutin, &[&["sort", "code"]]),
        resultat_libelle: text(scrutin, &[&["sort", "libelle"]]),
    };

    let agregat = at(scrutin, &["syntheseVote"]).map(|synthese| VoteAgregat {
        vote_uid: uid.clone(),
        nombre_votants: count(synthese, &["nombreVotants"]),
        suffrages_exprimes: count(synthese, &["suffragesExprimes"]),
        suffrages_requis: count(synthese, &["nbrSuffragesRequis"]),
        total_pour: count(synthese, &["decompte", "pour"]),
        total_contre: count(synthese, &["decompte", "contre"]),
        total_abstentions: count(synthese, &["decompte", "abstentions"]),
        total_non_votants: count(synthese, &["decompte", "nonVotants"]),
        total_non_votants_volontaires: count(synthese, &["decompte", "nonVotantsVolontaires"]),
    });

    let mut rows = ScrutinRows {
        vote,
        agregat,
        groupes: Vec::new(),
        groupes_agregats: Vec::new(),
        deputes: Vec::new(),
    };

    for group in group_entries(scrutin) {
        // Placeholder entries without a reference are skipped.
        let Some(groupe_id) = text(group, &[&["organeRef"]]) else {
            continue;
        };

        rows.groupes.push(VoteGroupe {
            vote_uid: uid.clone(),
            groupe_id: groupe_id.clone(),
            nombre_membres: count(group, &["nombreMembresGroupe"]),
            position_majoritaire: text_or_empty(group, &[&["vote", "positionMajoritaire"]]),
        });

        if let Some(decompte) = at(group, &["vote", "decompteVoix"]) {
            rows.groupes_agregats.push(VoteGroupeAgregat {
                vote_uid: uid.clone(),
                groupe_id: groupe_id.clone(),
                pour: count(decompte, &["pour"]),
                contre: count(decompte, &["contre"]),
                abstentions: count(decompte, &["abstentions"]),
                non_votants: count(decompte, &["nonVotants"]),
                non_votants_volontaires: count(decompte, &["nonVotantsVolontaires"]),
            });
        }

        if let Some(nominatif) = at(group, &["vote", "decompteNominatif"]) {
            for position in Position::ALL {
                for voter in voters(nominatif, position) {
                    let Some(depute_id) = text(voter, &[&["acteurRef"]]) else {
                        continue;
                    };
                    rows.deputes.push(VoteDepute {
                        vote_uid: uid.clone(),
                        depute_id,
                        groupe_id: groupe_id.clone(),
                        mandat_ref: text_or_empty(voter, &[&["mandatRef"]]),
                        position,
                        cause_position: text(voter, &[&["causePositionVote"]]),
                        par_delegation: delegation_flag(voter.get("parDelegation")),
                    });
                }
            }
        }
    }

    Ok(rows)
}

fn group_entries(scrutin: &Value) -> Vec<&Value> {
    let Some(ventilation) = first(scrutin, VENTILATION_KEYS) else {
        return Vec::new();
    };
    let organe = at(ventilation, &["organe"]).unwrap_or(ventilation);
    as_sequence(first(organe, &[&["groupes", "groupe"], &["groupe"]]))
}

fn voters(nominatif: &Value, position: Position) -> Vec<&Value> {
    let Some(list) = at(nominatif, &[position.source_key()]) else {
        return Vec::new();
    };
    match at(list, &["votant"]) {
        Some(votant) => as_sequence(Some(votant)),
        None if list.is_array() => as_sequence(Some(list)),
        None => Vec::new(),
    }
}

/// Extractor for the votes domain.
#[derive(Debug, Default)]
pub struct VotesExtractor {
    deputes: BTreeSet<String>,
    groupes: BTreeSet<String>,
    votes: Vec<Vote>,
    votes_groupes: Vec<VoteGroupe>,
    votes_deputes: Vec<VoteDepute>,
    votes_agregats: Vec<VoteAgregat>,
    votes_groupes_agregats: Vec<VoteGroupeAgregat>,
    errors: Vec<ExtractionFailure>,
}

impl VotesExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    fn commit(&mut self, rows: ScrutinRows) {
        self.votes.push(rows.vote);
        self.votes_agregats.extend(rows.agregat);

        for groupe in &rows.groupes {
            self.groupes.insert(groupe.groupe_id.clone());
        }
        for depute in &rows.deputes {
            self.deputes.insert(depute.depute_id.clone());
        }

        self.votes_groupes.extend(rows.groupes);
        self.votes_groupes_agregats.extend(rows.groupes_agregats);
        self.votes_deputes.extend(rows.deputes);
    }

    pub fn deputes(&self) -> Vec<Depute> {
        self.deputes
            .iter()
            .map(|id| Depute { id: id.clone() })
            .collect()
    }

    pub fn groupes(&self) -> Vec<GroupeParlementaire> {
        self.groupes
            .iter()
            .map(|id| GroupeParlementaire {
                id: id.clone(),
                nom: None,
            })
            .collect()
    }

    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    pub fn votes_groupes(&self) -> &[VoteGroupe] {
        &self.votes_groupes
    }

    pub fn votes_deputes(&self) -> &[VoteDepute] {
        &self.votes_deputes
    }

    pub fn votes_agregats(&self) -> &[VoteAgregat] {
        &self.votes_agregats
    }

    pub fn votes_groupes_agregats(&self) -> &[VoteGroupeAgregat] {
        &self.votes_groupes_agregats
    }
}

impl Extractor for VotesExtractor {
    fn domain(&self) -> &'static str {
        "votes"
    }

    fn extract(&mut self, document: &Value) -> Result<(), DocumentError> {
        let rows = normalize_scrutin(document)?;
        self.commit(rows);
        Ok(())
    }

    fn record_failure(&mut self, failure: ExtractionFailure) {
        self.errors.push(failure);
    }

    fn tables(&self) -> serde_json::Result<TableSet> {
        Ok(TableSet::new(vec![
            Table::from_rows(TABLE_DEPUTES, "deputes.json", &self.deputes())?,
            Table::from_rows(TABLE_GROUPES, "groupes_parlementaires.json", &self.groupes())?,
            Table::from_rows(TABLE_VOTES, "scrutins.json", &self.votes)?,
            Table::from_rows(TABLE_VOTES_GROUPES, "scrutin_groupes.json", &self.votes_groupes)?,
            Table::from_rows(TABLE_VOTES_DEPUTES, "votes_deputes.json", &self.votes_deputes)?,
            Table::from_rows(
                TABLE_VOTES_AGREGATS,
                "scrutins_agregats_source.json",
                &self.votes_agregats,
            )?,
            Table::from_rows(
                TABLE_VOTES_GROUPES_AGREGATS,
                "scrutin_groupes_agregats_source.json",
                &self.votes_groupes_agregats,
            )?,
        ]))
    }

    fn errors(&self) -> &[ExtractionFailure] {
        &self.errors
    }
}
