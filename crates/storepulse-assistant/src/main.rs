// Storepulse assistant REPL
//
// Reads questions from stdin, answers via the agent loop. Any error from a
// turn degrades to an apology line and the loop continues; quit/exit ends
// the session.

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storepulse_assistant::{
    Assistant, AssistantConfig, BackendClient, BusiestSectionTool, CashierQueueTool,
    CurrentVisitorsTool, ToolRegistry,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storepulse_assistant=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AssistantConfig::from_env()?;
    tracing::info!(backend = %config.backend_api_url, model = %config.model, "assistant starting");

    let backend = Arc::new(BackendClient::new(&config.backend_api_url));
    let registry = ToolRegistry::builder()
        .tool(CurrentVisitorsTool::new(backend.clone()))
        .tool(BusiestSectionTool::new(backend.clone()))
        .tool(CashierQueueTool::new(backend))
        .build();

    let mut assistant = Assistant::new(&config, registry);

    println!("Storepulse assistant ready. Ask about visitors, sections, or the cashier queue.");
    println!("Type 'quit' or 'exit' to leave.");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        print!("You: ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "quit" | "exit") {
            break;
        }

        match assistant.handle(input).await {
            Ok(reply) => println!("Bot: {}", reply),
            Err(err) => {
                tracing::error!("turn failed: {}", err);
                println!("Bot: I'm sorry, something went wrong: {}", err);
            }
        }
    }

    println!("Goodbye.");
    Ok(())
}
