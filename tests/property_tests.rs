//! Property-based tests for the diagnosis engine.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated catalogs and answer sequences.

use faultfinder::core::{Property, SessionState};
use faultfinder::engine::{
    Answer, DiagnosisEngine, FinalOutcome, OrderedQuestionPolicy, RandomQuestionPolicy,
    TaggedResult,
};
use faultfinder::knowledge::KnowledgeBase;
use faultfinder::SessionToken;
use proptest::prelude::*;

const MACHINES: [&str; 2] = ["X", "Torno CNC"];
const QUESTIONS: [&str; 4] = ["motor enciende?", "hay humo?", "hace ruido?", "luz roja?"];

#[derive(Clone, Debug)]
struct FaultSpec {
    machine: usize,
    questions: Vec<bool>,
    steps: u32,
}

prop_compose! {
    fn arbitrary_fault()(
        machine in 0..MACHINES.len(),
        questions in prop::collection::vec(any::<bool>(), QUESTIONS.len()),
        steps in 0..4u32,
    ) -> FaultSpec {
        FaultSpec { machine, questions, steps }
    }
}

prop_compose! {
    fn arbitrary_catalog()(faults in prop::collection::vec(arbitrary_fault(), 0..8)) -> KnowledgeBase {
        let mut kb = KnowledgeBase::default();
        for (i, spec) in faults.iter().enumerate() {
            let entry = kb.get_or_create(&format!("F{i}"));
            entry.description = format!("falla {i}");
            entry.properties.push(Property::machine(MACHINES[spec.machine]));
            for (q, present) in QUESTIONS.iter().zip(&spec.questions) {
                if *present {
                    entry.properties.push(Property::question(q));
                }
            }
            for step in 1..=spec.steps {
                entry
                    .properties
                    .push(Property::step(step, &format!("paso {step}")).unwrap());
            }
        }
        kb
    }
}

fn machine_id(index: usize) -> String {
    MACHINES[index].to_lowercase().replace(' ', "_")
}

fn answer(yes: bool) -> Answer {
    Answer::from(yes)
}

proptest! {
    #[test]
    fn start_candidates_are_exactly_the_tagged_faults(
        catalog in arbitrary_catalog(),
        machine in 0..MACHINES.len(),
    ) {
        let id = machine_id(machine);
        let expected: Vec<usize> = catalog
            .entries()
            .iter()
            .enumerate()
            .filter(|(_, e)| e.has_property(&format!("MAQUINA: {}", MACHINES[machine])))
            .map(|(i, _)| i)
            .collect();

        prop_assert_eq!(catalog.candidates_for(&id), expected.clone());

        let step = DiagnosisEngine::new().start_session(&catalog, &id, "");
        match &step.state {
            SessionState::Diagnosis { candidate_indices, .. } => {
                prop_assert_eq!(candidate_indices, &expected);
            }
            SessionState::Solution { active_fault_name, .. } => {
                prop_assert_eq!(expected.len(), 1);
                prop_assert_eq!(active_fault_name, &catalog.entries()[expected[0]].name);
            }
            SessionState::Closed { .. } => {}
        }

        if expected.is_empty() {
            prop_assert_eq!(step.result, TaggedResult::from(FinalOutcome::NoMatch));
        }
    }

    #[test]
    fn candidates_never_grow_and_questions_stop_once_isolated(
        catalog in arbitrary_catalog(),
        machine in 0..MACHINES.len(),
        answers in prop::collection::vec(any::<bool>(), 16),
        seed in any::<u64>(),
    ) {
        let engine = DiagnosisEngine::new().with_policy(RandomQuestionPolicy::seeded(seed));
        let mut step = engine.start_session(&catalog, &machine_id(machine), "");
        let mut previous = step.state.candidate_count();
        let mut isolated = false;

        for yes in answers {
            if step.state.is_final() {
                break;
            }
            if matches!(step.result, TaggedResult::Instruction { .. }) {
                isolated = true;
            }
            step = engine.continue_session(&catalog, &step.state, answer(yes)).unwrap();

            if isolated {
                prop_assert!(!matches!(step.result, TaggedResult::Question { .. }), "unexpected Question result");
            }
            if let (Some(before), Some(after)) = (previous, step.state.candidate_count()) {
                prop_assert!(after <= before);
            }
            previous = step.state.candidate_count();
        }
    }

    #[test]
    fn remediation_advances_one_step_per_no(
        steps in 1..6u32,
        success_at in prop::option::of(1..6u32),
    ) {
        let mut catalog = KnowledgeBase::default();
        let fault = catalog.get_or_create("F");
        fault.properties.push(Property::machine("X"));
        for i in 1..=steps {
            fault.properties.push(Property::step(i, &format!("paso {i}")).unwrap());
        }

        let engine = DiagnosisEngine::new();
        let mut step = engine.start_session(&catalog, "x", "");
        let mut current = 1;

        loop {
            match &step.result {
                TaggedResult::Instruction { step: shown, .. } => {
                    prop_assert_eq!(*shown, current);
                }
                TaggedResult::Final { outcome } => {
                    match outcome {
                        FinalOutcome::Success { .. } => {
                            prop_assert_eq!(Some(current), success_at);
                        }
                        FinalOutcome::Exhausted { .. } => {
                            prop_assert_eq!(current, steps + 1);
                            prop_assert!(success_at.map_or(true, |s| s > steps));
                        }
                        other => prop_assert!(false, "unexpected outcome {:?}", other),
                    }
                    break;
                }
                TaggedResult::Question { .. } => prop_assert!(false, "question in solution mode"),
            }

            let yes = success_at == Some(current);
            step = engine.continue_session(&catalog, &step.state, answer(yes)).unwrap();
            if !yes {
                current += 1;
            }
        }
    }

    #[test]
    fn replaying_an_answer_filters_identically(
        catalog in arbitrary_catalog(),
        machine in 0..MACHINES.len(),
        yes in any::<bool>(),
    ) {
        let id = machine_id(machine);
        let ordered = DiagnosisEngine::new().with_policy(OrderedQuestionPolicy);
        let random = DiagnosisEngine::new();
        let start = ordered.start_session(&catalog, &id, "");

        if let SessionState::Diagnosis { .. } = start.state {
            let first = ordered.continue_session(&catalog, &start.state, answer(yes)).unwrap();
            let second = ordered.continue_session(&catalog, &start.state, answer(yes)).unwrap();
            prop_assert_eq!(&first, &second);

            let third = random.continue_session(&catalog, &start.state, answer(yes)).unwrap();
            prop_assert_eq!(first.state.candidate_count(), third.state.candidate_count());
        }
    }

    #[test]
    fn token_survives_json_transport(
        catalog in arbitrary_catalog(),
        machine in 0..MACHINES.len(),
        generation in 1..1000u64,
    ) {
        let step = DiagnosisEngine::new().start_session(&catalog, &machine_id(machine), "");
        let token = SessionToken::issue(generation, step.state);

        let restored = SessionToken::from_json(&token.to_json().unwrap()).unwrap();
        prop_assert_eq!(restored, token);
    }
}
