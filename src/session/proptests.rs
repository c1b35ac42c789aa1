//! Property-based tests for the session state machine
//!
//! Random command/completion sequences are replayed against a `Session` and
//! the structural invariants are checked after every step.

use super::*;
use crate::adapters::{GenerationError, IngestionError};
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

/// A step in a generated scenario.
///
/// Completions refer to tokens by index into the list of tokens minted so
/// far, which makes stale and duplicate completions common.
#[derive(Debug, Clone)]
enum Step {
    Submit(String),
    Select(AssistantKind),
    Send(String),
    Reset,
    FinishIngestion { pick: usize, ok: bool },
    FinishGeneration { pick: usize, ok: bool },
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("   ".to_string()),
        "[a-zA-Z ?]{1,24}",
    ]
}

fn arb_kind() -> impl Strategy<Value = AssistantKind> {
    prop_oneof![
        Just(AssistantKind::Rfi),
        Just(AssistantKind::SolutionBrief),
        Just(AssistantKind::Proposal),
    ]
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        arb_text().prop_map(Step::Submit),
        arb_kind().prop_map(Step::Select),
        arb_text().prop_map(Step::Send),
        Just(Step::Reset),
        (0usize..8, any::<bool>()).prop_map(|(pick, ok)| Step::FinishIngestion { pick, ok }),
        (0usize..8, any::<bool>()).prop_map(|(pick, ok)| Step::FinishGeneration { pick, ok }),
    ]
}

fn record() -> OpportunityRecord {
    OpportunityRecord::new("Cybersecurity Assessment", "Department of Defense")
}

/// Tokens are picked newest-first so the current one is the most likely choice
fn pick_token(minted: &[OperationToken], pick: usize) -> Option<OperationToken> {
    minted.iter().rev().nth(pick % minted.len().max(1)).copied()
}

fn apply_step(
    session: &mut Session,
    minted: &mut Vec<OperationToken>,
    step: Step,
) -> Option<Result<Vec<Effect>, SessionError>> {
    let result = match step {
        Step::Submit(reference) => session.submit_opportunity_reference(&reference),
        Step::Select(kind) => session.select_assistant(kind),
        Step::Send(text) => session.send_message(&text),
        Step::Reset => Ok(session.reset()),
        Step::FinishIngestion { pick, ok } => {
            let token = pick_token(minted, pick)?;
            let result = if ok {
                Ok(record())
            } else {
                Err(IngestionError::rejected("not found"))
            };
            session.finish_ingestion(token, result)
        }
        Step::FinishGeneration { pick, ok } => {
            let token = pick_token(minted, pick)?;
            let result = if ok {
                Ok("draft".to_string())
            } else {
                Err(GenerationError::network("offline"))
            };
            session.finish_generation(token, result)
        }
    };

    if let Ok(effects) = &result {
        for effect in effects {
            if matches!(
                effect,
                Effect::FetchOpportunity { .. } | Effect::GenerateReply { .. }
            ) {
                minted.push(effect.token());
            }
        }
    }
    Some(result)
}

// ============================================================================
// State Validity Checkers
// ============================================================================

fn check_consistency(session: &Session) -> Result<(), TestCaseError> {
    let phase = session.current_phase();
    let outstanding = session.outstanding_operation();

    match outstanding.map(|op| op.kind) {
        Some(OperationKind::Ingestion) => {
            prop_assert_eq!(phase, SessionPhase::IngestingOpportunity);
        }
        Some(OperationKind::Generation) => {
            prop_assert_eq!(phase, SessionPhase::Conversing);
        }
        None => {
            prop_assert_ne!(phase, SessionPhase::IngestingOpportunity);
        }
    }

    prop_assert_eq!(
        session.opportunity_record().is_some(),
        phase.has_opportunity(),
        "record presence disagrees with {}",
        phase
    );
    prop_assert_eq!(
        session.assistant_kind().is_some(),
        phase == SessionPhase::Conversing
    );

    for (i, message) in session.message_log().all().iter().enumerate() {
        prop_assert_eq!(message.sequence, i as u64 + 1, "sequence gap at {}", i);
    }
    Ok(())
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Phase, record, kind, tracker and log agree after every step
    #[test]
    fn prop_session_stays_consistent(steps in proptest::collection::vec(arb_step(), 0..40)) {
        let mut session = Session::new();
        let mut minted = Vec::new();

        for step in steps {
            apply_step(&mut session, &mut minted, step);
            check_consistency(&session)?;
        }
    }

    // A rejected command or completion changes nothing observable
    #[test]
    fn prop_rejections_do_not_mutate(steps in proptest::collection::vec(arb_step(), 0..40)) {
        let mut session = Session::new();
        let mut minted = Vec::new();

        for step in steps {
            let before_phase = session.current_phase();
            let before_log = session.message_log().all().to_vec();
            let before_kind = session.assistant_kind();
            let before_op = session.outstanding_operation();

            if let Some(Err(rejection)) = apply_step(&mut session, &mut minted, step) {
                prop_assert_eq!(session.current_phase(), before_phase, "{}", rejection);
                prop_assert_eq!(session.message_log().all(), before_log.as_slice());
                prop_assert_eq!(session.assistant_kind(), before_kind);
                prop_assert_eq!(session.outstanding_operation(), before_op);
            }
        }
    }

    // Reset always yields a pristine session, whatever came before
    #[test]
    fn prop_reset_clears_everything(steps in proptest::collection::vec(arb_step(), 0..40)) {
        let mut session = Session::new();
        let mut minted = Vec::new();
        for step in steps {
            apply_step(&mut session, &mut minted, step);
        }

        session.reset();
        prop_assert_eq!(session.current_phase(), SessionPhase::AwaitingOpportunity);
        prop_assert!(session.opportunity_record().is_none());
        prop_assert!(session.assistant_kind().is_none());
        prop_assert!(session.message_log().all().is_empty());
        prop_assert!(!session.is_operation_pending());
    }

    // No token minted before a reset is ever accepted after it
    #[test]
    fn prop_pre_reset_tokens_are_inert(
        before in proptest::collection::vec(arb_step(), 0..30),
        after in proptest::collection::vec(arb_step(), 0..30),
        ok in any::<bool>(),
    ) {
        let mut session = Session::new();
        let mut minted = Vec::new();
        for step in before {
            apply_step(&mut session, &mut minted, step);
        }
        session.reset();
        let stale = std::mem::take(&mut minted);

        for step in after {
            apply_step(&mut session, &mut minted, step);
        }

        for token in stale {
            let len = session.message_log().len();
            let phase = session.current_phase();
            let ingestion = session.finish_ingestion(token, if ok {
                Ok(record())
            } else {
                Err(IngestionError::unknown("late"))
            });
            let generation = session.finish_generation(token, Ok("late".to_string()));

            prop_assert!(matches!(ingestion, Err(SessionError::StaleResult(_))));
            prop_assert!(matches!(generation, Err(SessionError::StaleResult(_))));
            prop_assert_eq!(session.message_log().len(), len);
            prop_assert_eq!(session.current_phase(), phase);
        }
    }

    // Blank messages never reach the log
    #[test]
    fn prop_blank_messages_rejected(kind in arb_kind(), spaces in "[ \t]{0,8}") {
        let mut session = Session::new();
        let effects = session.submit_opportunity_reference("https://x/opp/1").unwrap();
        session.finish_ingestion(effects[0].token(), Ok(record())).unwrap();
        session.select_assistant(kind).unwrap();
        let len = session.message_log().len();

        prop_assert_eq!(session.send_message(&spaces), Err(SessionError::EmptyMessage));
        prop_assert_eq!(session.message_log().len(), len);
    }

    // Selecting outside SelectingAssistant never changes the kind
    #[test]
    fn prop_select_outside_phase_rejected(
        steps in proptest::collection::vec(arb_step(), 0..30),
        kind in arb_kind(),
    ) {
        let mut session = Session::new();
        let mut minted = Vec::new();
        for step in steps {
            apply_step(&mut session, &mut minted, step);
        }

        if session.current_phase() != SessionPhase::SelectingAssistant {
            let before = session.assistant_kind();
            let rejected = session.select_assistant(kind).is_err();
            prop_assert!(rejected);
            prop_assert_eq!(session.assistant_kind(), before);
        }
    }
}
