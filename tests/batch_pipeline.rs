use assemblee_harvester::harvest::{BatchPipeline, DirectorySource, VotesExtractor};
use assemblee_harvester::jobs::{self, Job};
use assemblee_harvester::{Config, Extractor, ExtractionFailure};
use serde_json::{json, Value};
use std::path::Path;

fn write(path: &Path, value: &Value) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
}

fn seed_votes(root: &Path) {
    write(
        &root.join("votes/2023/VTANR5L16V1.json"),
        &json!({"scrutin": {
            "uid": "VTANR5L16V1",
            "numero": "1",
            "legislature": "16",
            "dateScrutin": "2023-01-10",
            "titre": "l'ensemble du projet de loi",
            "typeVote": {"codeTypeVote": "SPO", "libelleTypeVote": "scrutin public ordinaire", "typeMajorite": "majorité absolue des suffrages exprimés"},
            "sort": {"code": "adopté", "libelle": "L'Assemblée nationale a adopté."},
            "syntheseVote": {
                "nombreVotants": "3",
                "suffragesExprimes": "2",
                "nbrSuffragesRequis": "2",
                "decompte": {"pour": "2", "contre": "0", "abstentions": "1", "nonVotants": "0", "nonVotantsVolontaires": "0"}
            },
            "ventilationVotes": {"organe": {"organeRef": "PO800520", "groupes": {"groupe": [
                {
                    "organeRef": "PO800538",
                    "nombreMembresGroupe": "170",
                    "vote": {
                        "positionMajoritaire": "pour",
                        "decompteVoix": {"pour": "2", "contre": "0", "abstentions": "0", "nonVotants": "0"},
                        "decompteNominatif": {
                            "pours": {"votant": [
                                {"acteurRef": "PA1", "mandatRef": "PM1", "parDelegation": "false"},
                                {"acteurRef": "PA2", "mandatRef": "PM2", "parDelegation": "true"}
                            ]},
                            "contres": null
                        }
                    }
                },
                {
                    "organeRef": "PO800490",
                    "nombreMembresGroupe": "89",
                    "vote": {
                        "positionMajoritaire": "abstention",
                        "decompteNominatif": {"abstentions": {"votant": {"acteurRef": "PA3", "mandatRef": "PM3"}}}
                    }
                }
            ]}}}
        }}),
    );
    write(
        &root.join("votes/2024/VTANR5L16V2.json"),
        &json!({
            "uid": "VTANR5L16V2",
            "objet": {"libelle": "la motion de censure"},
            "votes": {"groupe": {
                "organeRef": "PO800538",
                "vote": {"positionMajoritaire": "contre", "decompteNominatif": {
                    "contres": {"votant": {"acteurRef": "PA1"}}
                }}
            }}
        }),
    );
    write(
        &root.join("votes/2024/broken.json"),
        &json!({"scrutin": {"numero": "3"}}),
    );
    std::fs::write(root.join("votes/2024/README.md"), "not a document").unwrap();
}

fn seed_acteurs(root: &Path) {
    write(
        &root.join("acteurs/PA1.json"),
        &json!({"acteur": {
            "uid": {"#text": "PA1"},
            "etatCivil": {"ident": {"civ": "Mme", "prenom": "Anne", "nom": "Martin"}},
            "mandats": {"mandat": {"uid": "PM1", "typeOrgane": "GP", "organes": {"organeRef": "PO800538"}}}
        }}),
    );
}

fn config_for(root: &Path) -> Config {
    Config {
        input_dir: root.join("in"),
        output_dir: root.join("out"),
        read_concurrency: 2,
        ..Config::default()
    }
}

fn read_json(path: &Path) -> Value {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_votes_job_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path());
    seed_votes(&config.input_dir);

    let summary = jobs::run_job(&config, Job::Votes).await.unwrap();

    assert_eq!(summary.documents_seen, 3);
    assert_eq!(summary.documents_failed, 1);
    assert_eq!(summary.rows("votes"), 2);
    assert_eq!(summary.rows("groupes"), 2);
    assert_eq!(summary.rows("deputes"), 3);
    assert_eq!(summary.rows("votesGroupes"), 3);
    assert_eq!(summary.rows("votesDeputes"), 4);
    assert_eq!(summary.rows("votesAgregats"), 1);
    assert_eq!(summary.rows("votesGroupesAgregats"), 1);

    let complete = read_json(&config.output_dir.join("votes-complete.json"));
    let keys: Vec<_> = complete.as_object().unwrap().keys().cloned().collect();
    for key in [
        "deputes",
        "groupes",
        "votes",
        "votesGroupes",
        "votesDeputes",
        "votesAgregats",
        "votesGroupesAgregats",
    ] {
        assert!(keys.contains(&key.to_string()), "missing {}", key);
    }
    assert_eq!(complete["votes"][1]["titre"], "la motion de censure");
    assert_eq!(complete["votesDeputes"][0]["par_delegation"], Value::Null);
    assert_eq!(complete["votesDeputes"][1]["par_delegation"], true);
    assert_eq!(complete["votesDeputes"][2]["position"], "abstention");

    let errors: Vec<ExtractionFailure> =
        serde_json::from_value(read_json(&config.output_dir.join("votes-complete-errors.json")))
            .unwrap();
    assert_eq!(
        errors,
        vec![ExtractionFailure {
            file: "broken.json".to_string(),
            error: "Missing uid".to_string(),
        }]
    );

    let tables = config.table_dir();
    for file in [
        "deputes.json",
        "groupes_parlementaires.json",
        "scrutins.json",
        "scrutin_groupes.json",
        "votes_deputes.json",
        "scrutins_agregats_source.json",
        "scrutin_groupes_agregats_source.json",
    ] {
        assert!(tables.join(file).is_file(), "missing {}", file);
    }
    assert_eq!(read_json(&tables.join("scrutins.json")), complete["votes"]);
}

#[tokio::test]
async fn test_each_job_exports_its_own_state() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path());
    seed_votes(&config.input_dir);
    seed_acteurs(&config.input_dir);

    let summaries = jobs::run_all(&config).await.unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].domain, "acteurs");
    assert_eq!(summaries[1].domain, "votes");

    let acteurs = read_json(&config.output_dir.join("acteurs-complete.json"));
    let votes = read_json(&config.output_dir.join("votes-complete.json"));
    assert_eq!(acteurs["acteurs"][0]["uid"], "PA1");
    assert!(acteurs.get("votes").is_none());
    assert_eq!(votes["votes"].as_array().unwrap().len(), 2);
    assert!(votes.get("acteurs").is_none());
    assert!(!config.output_dir.join("acteurs-complete-errors.json").exists());
    assert!(config.table_dir().join("mandats.json").is_file());
}

#[tokio::test]
async fn test_runs_are_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path());
    seed_votes(&config.input_dir);

    let mut tables = Vec::new();
    for concurrency in [1, 3] {
        let source = DirectorySource::new(config.votes_source_dir());
        let mut pipeline = BatchPipeline::new(source, VotesExtractor::new())
            .with_read_concurrency(concurrency);
        pipeline.run().await.unwrap();
        tables.push(pipeline.extractor().tables().unwrap());
    }
    assert_eq!(tables[0], tables[1]);
}

#[tokio::test]
async fn test_missing_source_directory_aborts_before_export() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path());

    let result = jobs::run_job(&config, Job::Votes).await;

    assert!(result.is_err());
    assert!(!config.output_dir.join("votes-complete.json").exists());
}
