mod config;

use aabsmart_core::evaluation::run_golden;
use aabsmart_core::{Advisor, GeminiClient, TurnResult};
use config::DemoConfig;
use std::sync::Arc;
use tracing::{info, warn};

/// Farmer id used for a message passed on the command line
const CLI_FARMER_ID: &str = "demo_farmer";

const SCRIPTED_TURNS: &[(&str, &str, &str)] = &[
    (
        "Persian farmer query",
        "farmer_001",
        "سلام. من ۵ هکتار زمین دارم و گندم و جو می‌کارم. آب محدود است و از آبیاری غرقابی استفاده می‌کنم.",
    ),
    (
        "English query with high-water crops",
        "farmer_002",
        "I have 3 hectares with rice and tomato. Water is very limited. I'm using flood irrigation.",
    ),
    (
        "Drip irrigation farmer",
        "farmer_003",
        "من در اصفهان هستم. ۴ هکتار زمین دارم. پسته و گوجه فرنگی می‌کارم. آبیاری قطره‌ای استفاده می‌کنم.",
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging / tracing
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info,aabsmart_core=info,advisor_demo=info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(target = "advisor_demo", "Starting AabSmart advisor demo");

    let cfg = DemoConfig::load();
    if cfg.gemini.api_key.is_none() {
        warn!(
            target = "advisor_demo",
            "GEMINI_API_KEY is not set; answers will carry the generation error"
        );
    }

    let client = GeminiClient::new(cfg.gemini.clone())?;
    let advisor = Advisor::new(Arc::new(client), cfg.advisor.clone());

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.first().map(String::as_str) == Some("--golden") {
        let results = run_golden(&advisor).await;
        println!("{}", serde_json::to_string_pretty(&results)?);
        let passed = results.iter().filter(|r| r.passed).count();
        info!(target = "advisor_demo", passed, total = results.len(), "Golden run finished");
        return Ok(());
    }

    if args.is_empty() {
        for (title, farmer_id, message) in SCRIPTED_TURNS {
            println!("{}\n{title}\n{}", "=".repeat(80), "=".repeat(80));
            let result = advisor.run_turn(farmer_id, message).await;
            print_turn(&result)?;
        }
    } else {
        let message = args.join(" ");
        let result = advisor.run_turn(CLI_FARMER_ID, &message).await;
        print_turn(&result)?;
    }

    println!("{}\nInteraction log\n{}", "=".repeat(80), "=".repeat(80));
    for entry in advisor.logs(None, Some(cfg.log_summary_limit)).await {
        println!(
            "{} [{}] total={:.0} m³ scenarios={} failed={} :: {}",
            entry.timestamp.format("%H:%M:%S"),
            entry.farmer_id,
            entry.total_water_m3,
            entry.num_scenarios,
            entry.generation_failed,
            entry.user_message
        );
    }

    Ok(())
}

fn print_turn(result: &TurnResult) -> Result<(), serde_json::Error> {
    println!("Profile:\n{}", serde_json::to_string_pretty(&result.profile)?);
    println!(
        "Water footprint:\n{}",
        serde_json::to_string_pretty(&result.water_footprint)?
    );
    println!("Scenarios:\n{}", serde_json::to_string_pretty(&result.scenarios)?);
    println!("Answer:\n{}\n", result.answer.text());
    Ok(())
}
