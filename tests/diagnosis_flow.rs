//! End-to-end sessions through the transport facade.

use faultfinder::engine::{FinalOutcome, TaggedResult};
use faultfinder::{DiagnosisService, EngineConfig, KnowledgeBase, ServiceError, SessionToken};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_catalog(dir: &Path, catalog: serde_json::Value) -> std::path::PathBuf {
    let path = dir.join("base_conocimiento.json");
    fs::write(&path, catalog.to_string()).unwrap();
    path
}

fn example_a() -> serde_json::Value {
    json!({
        "version": 1,
        "description": "Big Tools",
        "entries": [
            {"name": "F1", "description": "Motor quemado",
             "props": ["MAQUINA: X", "PREGUNTA: motor enciende?", "SOLUCION_PASO_1: Revisar bobinado"]},
            {"name": "F2", "description": "Fusible abierto",
             "props": ["MAQUINA: X", "SOLUCION_PASO_1: Cambiar fusible"]},
            {"name": "F3", "description": "Sin aceite",
             "props": ["MAQUINA: X"]}
        ]
    })
}

fn example_b() -> serde_json::Value {
    json!({
        "version": 1,
        "description": "Big Tools",
        "entries": [
            {"name": "F", "description": "Sobrecalentamiento",
             "props": ["MAQUINA: Compresor", "SOLUCION_PASO_1: Limpiar filtro",
                       "SOLUCION_PASO_2: Revisar ventilador", "SOLUCION_PASO_3: Cambiar termostato"]}
        ]
    })
}

fn service_for(catalog: serde_json::Value) -> (TempDir, DiagnosisService) {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig {
        catalog_path: write_catalog(dir.path(), catalog),
        ..EngineConfig::default()
    };
    let service = DiagnosisService::from_config(&config).unwrap();
    (dir, service)
}

#[test]
fn question_then_isolation() {
    let (_dir, service) = service_for(example_a());

    let first = service.start_session("x", "la maquina no arranca").unwrap();
    assert_eq!(
        first.result,
        TaggedResult::Question {
            tag: "PREGUNTA: motor enciende?".to_string(),
            text: "motor enciende?".to_string(),
        }
    );

    let second = service.continue_session(&first.state, "si").unwrap();
    match second.result {
        TaggedResult::Instruction {
            text,
            active_fault_name,
            step,
            diagnosis,
        } => {
            assert_eq!(text, "Revisar bobinado");
            assert_eq!(active_fault_name, "F1");
            assert_eq!(step, 1);
            assert_eq!(diagnosis.as_deref(), Some("Motor quemado"));
        }
        other => panic!("Expected instruction, got {other:?}"),
    }
}

#[test]
fn negative_answer_leaves_unresolvable_pair() {
    let (_dir, service) = service_for(example_a());

    let first = service.start_session("x", "").unwrap();
    let second = service.continue_session(&first.state, "no").unwrap();

    assert_eq!(
        second.result,
        TaggedResult::from(FinalOutcome::Ambiguous {
            remaining: vec!["F2".to_string(), "F3".to_string()],
        })
    );
    let token = SessionToken::from_json(&second.state).unwrap();
    assert!(token.state.is_final());
}

#[test]
fn three_noes_exhaust_the_script() {
    let (_dir, service) = service_for(example_b());

    let mut response = service.start_session("compresor", "se calienta").unwrap();
    for expected in [2, 3] {
        response = service.continue_session(&response.state, "no").unwrap();
        assert!(matches!(response.result, TaggedResult::Instruction { step, .. } if step == expected));
    }

    response = service.continue_session(&response.state, "no").unwrap();
    assert_eq!(
        response.result,
        TaggedResult::from(FinalOutcome::Exhausted {
            active_fault_name: "F".to_string()
        })
    );

    let err = service.continue_session(&response.state, "si").unwrap_err();
    assert!(matches!(err, ServiceError::Engine(_)));
}

#[test]
fn yes_at_any_step_is_success() {
    for noes in 0..3 {
        let (_dir, service) = service_for(example_b());
        let mut response = service.start_session("compresor", "").unwrap();
        for _ in 0..noes {
            response = service.continue_session(&response.state, "no").unwrap();
        }

        let done = service.continue_session(&response.state, "si").unwrap();
        assert_eq!(
            done.result,
            TaggedResult::from(FinalOutcome::Success {
                fault_name: "F".to_string(),
                fault_description: "Sobrecalentamiento".to_string(),
            })
        );
    }
}

#[test]
fn session_finishes_on_the_catalog_it_started_with() {
    let (dir, service) = service_for(example_a());
    let first = service.start_session("x", "").unwrap();

    // the upload removes F1 and renumbers the rest
    let upload = json!({
        "version": 1,
        "description": "v2",
        "entries": [
            {"name": "F3", "description": "Sin aceite", "props": ["MAQUINA: X"]}
        ]
    });
    let generation = service.replace_catalog(&upload.to_string()).unwrap();
    assert_eq!(generation, 2);
    assert_eq!(
        KnowledgeBase::load(dir.path().join("base_conocimiento.json"))
            .unwrap()
            .description(),
        "v2"
    );

    let second = service.continue_session(&first.state, "si").unwrap();
    assert!(matches!(
        second.result,
        TaggedResult::Instruction { ref active_fault_name, .. } if active_fault_name == "F1"
    ));

    let fresh = service.start_session("x", "").unwrap();
    assert!(matches!(
        fresh.result,
        TaggedResult::Instruction { ref active_fault_name, .. } if active_fault_name == "F3"
    ));
}

#[test]
fn rejected_upload_keeps_serving() {
    let (dir, service) = service_for(example_a());
    let before = fs::read_to_string(dir.path().join("base_conocimiento.json")).unwrap();

    let bad = json!({"version": 2, "description": "", "entries": []});
    assert!(service.replace_catalog(&bad.to_string()).is_err());
    assert_eq!(
        fs::read_to_string(dir.path().join("base_conocimiento.json")).unwrap(),
        before
    );

    let first = service.start_session("x", "").unwrap();
    assert!(matches!(first.result, TaggedResult::Question { .. }));
}

#[test]
fn reload_picks_up_edited_file() {
    let (dir, service) = service_for(example_a());
    write_catalog(dir.path(), example_b());

    assert_eq!(service.reload().unwrap(), 2);
    assert_eq!(service.machines().len(), 1);
    assert!(service.machines().contains_key("compresor"));
}

#[test]
fn tampered_token_is_rejected() {
    let (_dir, service) = service_for(example_a());
    let first = service.start_session("x", "").unwrap();

    let mut token = SessionToken::from_json(&first.state).unwrap();
    if let faultfinder::SessionState::Diagnosis {
        asked_questions, ..
    } = &mut token.state
    {
        asked_questions.clear();
    }
    let err = service
        .continue_session(&token.to_json().unwrap(), "si")
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Engine(faultfinder::EngineError::InvalidState { .. })
    ));

    assert!(matches!(
        service.continue_session("not a token", "si"),
        Err(ServiceError::Token(_))
    ));
}
