use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use scholar::core::ScholarError;
use scholar::{Researcher, ScholarConfig};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("scholar=info")),
        )
        .init();

    println!("--- Scholar: Agentic Web Researcher ---");

    let config = match ScholarConfig::from_env() {
        Ok(config) => config,
        Err(ScholarError::MissingCredential(var)) => {
            eprintln!("Error: {var} not found.");
            eprintln!("Please set it in your environment or .env file.");
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return Err(err).context("invalid configuration"),
    };

    print!("\nEnter a topic to research (e.g., 'Transformers in NLP'): ");
    io::stdout().flush()?;
    let mut topic = String::new();
    io::stdin().lock().read_line(&mut topic)?;
    let topic = topic.trim();
    if topic.is_empty() {
        println!("No topic entered. Exiting.");
        return Ok(ExitCode::SUCCESS);
    }

    println!("\nInitialized agent for topic: {topic}");
    println!("Agent is thinking... (progress is logged below)\n");

    let researcher = Researcher::from_config(&config).context("error creating agent")?;
    let outcome = researcher
        .run(topic)
        .await
        .context("research run failed")?;

    if outcome.is_complete() {
        println!("\nSuccess! Report saved to '{}'", outcome.saved_to.display());
        println!("{}", "-".repeat(50));
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "\n[WARN] The agent stopped early ({:?}) or the report is incomplete.",
            outcome.result.terminated_reason
        );
        if !outcome.missing_sections.is_empty() {
            println!("Missing sections: {}", outcome.missing_sections.join(", "));
        }
        println!("Partial output saved to '{}'", outcome.saved_to.display());
        Ok(ExitCode::FAILURE)
    }
}
