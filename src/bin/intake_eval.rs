//! Runs the stock conversation scenarios against the configured model.
//!
//! Uses the same configuration as the server. Each scenario gets a fresh
//! service so conversations never share state.

use intake_agent::application::evaluation::{default_scenarios, run_scenario};
use intake_agent::bootstrap::{build_intake_service, init_tracing};
use intake_agent::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;
    let intake = config.load_intake()?;

    for scenario in default_scenarios() {
        println!("\n-------------------- Scenario: {} --------------------", scenario.name);
        for message in &scenario.messages {
            println!("User: {}", message);
        }

        let service = build_intake_service(&intake, &config.ai)?;
        let report = run_scenario(&service, &intake.fields, &scenario).await?;

        for reply in &report.replies {
            println!("Agent: {}", reply);
        }
        println!();
        print!("{}", report.render());
    }

    Ok(())
}
