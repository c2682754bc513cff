//! Actor (acteur) extraction: civil status, mandates, and the organs those
//! mandates reference.

use serde_json::Value;
use std::collections::BTreeMap;

use crate::harvest::lookup::{as_sequence, at, scalar_text, text, text_or_empty};
use crate::model::{Acteur, ExtractionFailure, Mandat, OrganeReference, Table, TableSet};
use crate::traits::{DocumentError, Extractor};

pub const TABLE_ACTEURS: &str = "acteurs";
pub const TABLE_MANDATS: &str = "mandats";
pub const TABLE_ORGANES: &str = "organes";

/// Rows normalized from a single actor document.
#[derive(Debug, Clone, PartialEq)]
pub struct ActeurRows {
    pub acteur: Acteur,
    pub mandats: Vec<Mandat>,
    /// Every organ referenced by the mandates, with the mandate's organ type.
    pub organes: Vec<OrganeReference>,
}

pub fn normalize_acteur(document: &Value) -> Result<ActeurRows, DocumentError> {
    if !document.is_object() {
        return Err(DocumentError::NotAnObject);
    }
    let acteur = at(document, &["acteur"]).unwrap_or(document);
    let uid = text(acteur, &[&["uid"]]).ok_or(DocumentError::MissingUid)?;

    let etat_civil = &acteur["etatCivil"];
    let row = Acteur {
        uid: uid.clone(),
        civilite: text(etat_civil, &[&["ident", "civ"]]),
        prenom: text_or_empty(etat_civil, &[&["ident", "prenom"]]),
        nom: text_or_empty(etat_civil, &[&["ident", "nom"]]),
        date_naissance: text(etat_civil, &[&["infoNaissance", "dateNais"]]),
        ville_naissance: text(etat_civil, &[&["infoNaissance", "villeNais"]]),
        departement_naissance: text(etat_civil, &[&["infoNaissance", "depNais"]]),
        pays_naissance: text(etat_civil, &[&["infoNaissance", "paysNais"]]),
        profession: text(
            acteur,
            &[&["profession", "libelleCourant"], &["profession", "libelle"]],
        ),
    };

    let mut mandats = Vec::new();
    let mut organes = Vec::new();

    for mandat in as_sequence(at(acteur, &["mandats", "mandat"])) {
        let Some(mandat_uid) = text(mandat, &[&["uid"]]) else {
            continue;
        };
        let type_organe = text(mandat, &[&["typeOrgane"]]);
        let refs: Vec<String> = as_sequence(at(mandat, &["organes", "organeRef"]))
            .into_iter()
            .filter_map(scalar_text)
            .collect();

        organes.extend(refs.iter().map(|id| OrganeReference {
            id: id.clone(),
            type_organe: type_organe.clone(),
        }));

        mandats.push(Mandat {
            uid: mandat_uid,
            acteur_uid: uid.clone(),
            legislature: text(mandat, &[&["legislature"]]),
            type_organe,
            date_debut: text(mandat, &[&["dateDebut"]]),
            date_fin: text(mandat, &[&["dateFin"]]),
            qualite: text(
                mandat,
                &[&["infosQualite", "codeQualite"], &["infosQualite", "libQualite"]],
            ),
            organe_ref: refs.into_iter().next(),
        });
    }

    Ok(ActeurRows {
        acteur: row,
        mandats,
        organes,
    })
}

/// Extractor for the actors domain.
#[derive(Debug, Default)]
pub struct ActeursExtractor {
    acteurs: Vec<Acteur>,
    mandats: Vec<Mandat>,
    /// Organ id to the first organ type seen for it.
    organes: BTreeMap<String, Option<String>>,
    errors: Vec<ExtractionFailure>,
}

impl ActeursExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acteurs(&self) -> &[Acteur] {
        &self.acteurs
    }

    pub fn mandats(&self) -> &[Mandat] {
        &self.mandats
    }

    pub fn organes(&self) -> Vec<OrganeReference> {
        self.organes
            .iter()
            .map(|(id, type_organe)| OrganeReference {
                id: id.clone(),
                type_organe: type_organe.clone(),
            })
            .collect()
    }
}

impl Extractor for ActeursExtractor {
    fn domain(&self) -> &'static str {
        "acteurs"
    }

    fn extract(&mut self, document: &Value) -> Result<(), DocumentError> {
        let rows = normalize_acteur(document)?;

        self.acteurs.push(rows.acteur);
        self.mandats.extend(rows.mandats);
        for organe in rows.organes {
            self.organes.entry(organe.id).or_insert(organe.type_organe);
        }
        Ok(())
    }

    fn record_failure(&mut self, failure: ExtractionFailure) {
        self.errors.push(failure);
    }

    fn tables(&self) -> serde_json::Result<TableSet> {
        Ok(TableSet::new(vec![
            Table::from_rows(TABLE_ACTEURS, "acteurs.json", &self.acteurs)?,
            Table::from_rows(TABLE_MANDATS, "mandats.json", &self.mandats)?,
            Table::from_rows(TABLE_ORGANES, "organes.json", &self.organes())?,
        ]))
    }

    fn errors(&self) -> &[ExtractionFailure] {
        &self.errors
    }
}
