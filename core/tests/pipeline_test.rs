//! End-to-end turns through the advisor with stub generators
use aabsmart_core::{
    Advisor, AdvisorConfig, Generation, GenerationError, GenerationRequest, IrrigationType,
    ScenarioKind, SessionRole, TextGenerator, WaterLevel,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Answers with the prompt it was given
struct EchoGenerator {
    calls: AtomicUsize,
}

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Generation {
            text: request.user.clone(),
            model: Some("echo".to_string()),
        })
    }
}

/// Holds each generation until released
struct GatedGenerator {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl TextGenerator for GatedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, GenerationError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(Generation {
            text: request.user.clone(),
            model: None,
        })
    }
}

struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<Generation, GenerationError> {
        Err(GenerationError::ModelNotFound("gemini-x".to_string()))
    }
}

fn config() -> AdvisorConfig {
    AdvisorConfig {
        session_max_turns: 10,
        max_tips: 3,
        default_land_size_ha: 5.0,
        temperature: 0.3,
        log_input_chars: 100,
        log_answer_chars: 200,
    }
}

fn echo_advisor() -> (Advisor, Arc<EchoGenerator>) {
    let generator = Arc::new(EchoGenerator {
        calls: AtomicUsize::new(0),
    });
    (Advisor::new(generator.clone(), config()), generator)
}

#[tokio::test]
async fn english_rice_tomato_turn() {
    let (advisor, generator) = echo_advisor();

    let result = advisor
        .run_turn(
            "farmer_x",
            "I have 5 hectares with rice and tomato, water is low, flood irrigation",
        )
        .await;

    let profile = &result.profile;
    assert_eq!(profile.main_crops, vec!["rice", "tomato"]);
    assert_eq!(profile.irrigation_type, IrrigationType::Flood);
    assert_eq!(profile.water_level, WaterLevel::Low);
    assert_eq!(profile.land_size_ha, Some(5.0));

    // 12000*2.5/0.5 + 6000*2.5/0.5
    assert!((result.water_footprint.total_water_m3 - 90_000.0).abs() < 1e-6);

    let conservative = &result.scenarios[0];
    let saving = &result.scenarios[1];
    assert_eq!(conservative.name, ScenarioKind::Conservative);
    assert_eq!(conservative.crop_mix["rice"], 2.5);
    assert_eq!(saving.crop_mix["rice"], 1.25);
    assert_eq!(saving.crop_mix["tomato"], 3.75);
    assert!(saving.total_water_m3 < conservative.total_water_m3);

    assert_eq!(result.tips.tips.len(), 3);
    assert!(!result.answer.is_failed());
    assert!(result.answer.text().contains("- Main crops: rice, tomato"));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn empty_message_yields_empty_results() {
    let (advisor, _) = echo_advisor();

    let result = advisor.run_turn("fresh", "").await;

    assert!(result.profile.main_crops.is_empty());
    assert_eq!(result.water_footprint.total_water_m3, 0.0);
    assert!(result.water_footprint.crop_water_m3.is_empty());
    assert!(result.scenarios.is_empty());
    assert_eq!(result.tips.tips.len(), 3);
    assert!(advisor.scenarios("fresh").is_empty());
}

#[tokio::test]
async fn profile_accumulates_across_turns() {
    let (advisor, _) = echo_advisor();

    advisor
        .run_turn("f1", "من در خراسان ۴ هکتار گندم دارم و آبیاری بارانی")
        .await;
    let second = advisor.run_turn("f1", "water is limited this year").await;

    let profile = second.profile;
    assert_eq!(profile.main_crops, vec!["wheat"]);
    assert_eq!(profile.region.as_deref(), Some("خراسان"));
    assert_eq!(profile.land_size_ha, Some(4.0));
    assert_eq!(profile.irrigation_type, IrrigationType::Sprinkler);
    assert_eq!(profile.water_level, WaterLevel::Low);
    assert_eq!(second.scenarios.len(), 2);

    let third = advisor.run_turn("f1", "ok").await;
    assert_eq!(third.profile.water_level, WaterLevel::Medium);
    assert_eq!(third.profile.irrigation_type, IrrigationType::Sprinkler);
}

#[tokio::test]
async fn session_is_bounded_per_farmer() {
    let (advisor, _) = echo_advisor();

    for i in 0..8 {
        advisor.run_turn("f1", &format!("message {i}")).await;
    }
    advisor.run_turn("f2", "hello").await;

    let history = advisor.session("f1");
    assert_eq!(history.len(), 10);
    // 16 turns recorded, the last 10 kept
    assert_eq!(history[0].role, SessionRole::User);
    assert_eq!(history[0].content, "message 3");
    assert_eq!(history[9].role, SessionRole::Assistant);

    assert_eq!(advisor.session("f2").len(), 2);
    assert_eq!(advisor.recent_turns("f1", 2).len(), 2);
}

#[tokio::test]
async fn failed_generation_is_structured() {
    let advisor = Advisor::new(Arc::new(FailingGenerator), config());

    let result = advisor.run_turn("f1", "rice, drip").await;

    assert!(result.answer.is_failed());
    assert!(result.answer.text().contains("Model not recognized: gemini-x"));
    assert_eq!(result.scenarios.len(), 2);

    let history = advisor.session("f1");
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].content, result.answer.text());
}

#[tokio::test]
async fn interaction_log_truncates_and_filters() {
    let (advisor, _) = echo_advisor();
    let long_message = format!("wheat {}", "x".repeat(300));

    advisor.run_turn("a", &long_message).await;
    advisor.run_turn("b", "barley").await;
    advisor.run_turn("a", "thanks").await;

    let all = advisor.logs(None, None).await;
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].user_message.chars().count(), 100);
    assert!(all[0].answer_preview.chars().count() <= 200);
    assert_eq!(all[0].num_scenarios, 2);

    let last_a = advisor.logs(Some("a"), Some(1)).await;
    assert_eq!(last_a.len(), 1);
    assert_eq!(last_a[0].user_message, "thanks");
}

#[tokio::test]
async fn reset_clears_farmer_state() {
    let (advisor, _) = echo_advisor();
    advisor.run_turn("f1", "rice").await;

    advisor.reset_farmer("f1").await;
    assert!(advisor.profile("f1").is_none());
    assert!(advisor.session("f1").is_empty());
    assert!(advisor.scenarios("f1").is_empty());

    advisor.run_turn("f2", "rice").await;
    advisor.reset_all().await;
    assert!(advisor.profile("f2").is_none());
    assert!(advisor.logs(None, None).await.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_turns_for_one_farmer_serialize() {
    let (advisor, generator) = echo_advisor();
    let advisor = Arc::new(advisor);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let advisor = advisor.clone();
            tokio::spawn(async move { advisor.run_turn("shared", &format!("wheat turn {i}")).await })
        })
        .collect();
    for handle in handles {
        handle.await.expect("turn task panicked");
    }

    let history = advisor.session("shared");
    assert_eq!(history.len(), 8);
    // user and assistant turns never interleave across requests
    for pair in history.chunks(2) {
        assert_eq!(pair[0].role, SessionRole::User);
        assert_eq!(pair[1].role, SessionRole::Assistant);
        assert!(pair[1].content.contains(&pair[0].content));
    }
    assert_eq!(advisor.logs(Some("shared"), None).await.len(), 4);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn reset_waits_for_running_turn() {
    let generator = Arc::new(GatedGenerator {
        entered: Notify::new(),
        release: Notify::new(),
    });
    let advisor = Arc::new(Advisor::new(generator.clone(), config()));

    let turn = {
        let advisor = advisor.clone();
        tokio::spawn(async move { advisor.run_turn("f1", "rice, flood").await })
    };
    generator.entered.notified().await;

    let reset = {
        let advisor = advisor.clone();
        tokio::spawn(async move { advisor.reset_farmer("f1").await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!reset.is_finished());

    generator.release.notify_one();
    turn.await.expect("turn task panicked");
    reset.await.expect("reset task panicked");

    // the reset ran after the turn finished writing
    assert!(advisor.profile("f1").is_none());
    assert!(advisor.session("f1").is_empty());
    assert!(advisor.scenarios("f1").is_empty());
    assert_eq!(advisor.busy_farmers(), 0);
}
