//! Example restaurant-recommendation agent CLI.
//!
//! # Usage
//!
//! ```bash
//! react [--location <CITY>] [--failure-rate <P>] [--seed <N>] [--log-format <F>] [QUERY]
//! ```
//!
//! # Example
//!
//! ```bash
//! RUST_LOG=toolscope_callbacks=debug react --failure-rate 0.5 --seed 3
//! ```

use example::{CliArgs, ConsoleReporter, ReactAgent, SYSTEM_PROMPT, ScriptedModel, USAGE, tools};
use std::sync::Arc;
use toolscope_callbacks::{CallbackHandler, CallbackManager, ObservabilityHooks};
use toolscope_core::TracingSetup;
use toolscope_models::Message;
use toolscope_tools::FaultInjector;
use tracing::Level;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let args = match CliArgs::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    TracingSetup::new()
        .with_level(Level::WARN)
        .with_format(args.log_format)
        .init();

    let faults = FaultInjector::with_probability(args.failure_rate);
    let faults = match args.seed {
        Some(seed) => faults.with_seed(seed),
        None => faults,
    };

    let hooks = Arc::new(ObservabilityHooks::with_reporter(ConsoleReporter));
    let manager = CallbackManager::new();
    if let Err(e) =
        manager.register_shared("console", Arc::clone(&hooks) as Arc<dyn CallbackHandler>)
    {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let agent = ReactAgent::new(
        ScriptedModel::new(&args.location),
        tools::registry(faults),
        manager,
        hooks,
    );

    println!("[STREAM] Start streaming...\n");

    let conversation = vec![Message::system(SYSTEM_PROMPT), Message::user(&args.query)];
    match agent.run(conversation).await {
        Ok(_) => println!("\n[STREAM] Finished"),
        Err(e) => {
            eprintln!("[ERROR] {e}");
            std::process::exit(1);
        }
    }
}
