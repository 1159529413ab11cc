use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::{Arc, Mutex as StdMutex};

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use zyppy_api::HttpStorefrontApi;
use zyppy_application::{CheckoutService, SessionService, TokioScheduler};
use zyppy_core::api::StorefrontApi;
use zyppy_core::payment::CheckoutPhase;
use zyppy_infrastructure::{ConfigService, JsonSessionRepository};

mod app;
mod render;

use app::{AppContext, PollReport};

#[derive(Parser)]
#[command(name = "zyppy")]
#[command(about = "Zyppy - order food from your terminal", long_about = None)]
struct Cli {
    /// Backend API base URL, overriding the configuration file
    #[arg(long)]
    api_url: Option<String>,
    /// Origin handed to the payment page for redirects, overriding the
    /// configuration file
    #[arg(long)]
    origin_url: Option<String>,
}

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        let commands = [
            "login", "logout", "go", "home", "orders", "open", "search", "cuisine", "find",
            "menu", "reviews", "add", "remove", "qty", "cart", "clear", "address", "checkout",
            "confirm", "track", "rate", "help", "quit",
        ];
        Self {
            commands: commands.iter().map(|command| command.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.contains(' ') {
            Ok((0, vec![]))
        } else {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|command| command.starts_with(line))
                .map(|command| Pair {
                    display: command.clone(),
                    replacement: command.clone(),
                })
                .collect();
            Ok((0, candidates))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let head = line.split_whitespace().next().unwrap_or("");
        if self.commands.iter().any(|command| command == head) {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if !line.is_empty() && !line.contains(' ') {
            self.commands
                .iter()
                .find(|command| command.starts_with(line) && command.len() > line.len())
                .map(|command| command[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// The main entry point for the Zyppy storefront REPL.
///
/// This async function sets up a rustyline-based REPL that:
/// 1. Resolves configuration (file, then command-line overrides)
/// 2. Wires the HTTP client, session store, and checkout services
/// 3. Restores a persisted session and lands on the restaurant list
/// 4. Dispatches commands line-by-line, printing errors without exiting
/// 5. Reports payment poll outcomes from the background task as they settle
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // ===== Backend Initialization =====
    let config_service = ConfigService::new();
    let config = config_service.get_config();
    let api_base_url = cli.api_url.unwrap_or(config.api_base_url);
    let origin_url = cli.origin_url.unwrap_or(config.origin_url);
    tracing::debug!("[Main] API base URL: {api_base_url}, origin: {origin_url}");

    let api: Arc<dyn StorefrontApi> = Arc::new(HttpStorefrontApi::new(&api_base_url));
    let repository = Arc::new(JsonSessionRepository::default_location()?);
    let session_service = Arc::new(SessionService::new(repository, Arc::clone(&api)));
    let checkout_service = Arc::new(CheckoutService::new(
        Arc::clone(&api),
        Arc::new(TokioScheduler),
    ));

    // Create a channel for receiving payment poll outcomes from background tasks
    let (report_tx, mut report_rx) = mpsc::channel::<PollReport>(8);

    let checkout_phase = Arc::new(StdMutex::new(CheckoutPhase::Idle));

    // Spawn the report printer task
    let printer_phase = Arc::clone(&checkout_phase);
    let report_printer = tokio::spawn(async move {
        while let Some(report) = report_rx.recv().await {
            render::payment_report(&report);
            *printer_phase.lock().unwrap() = CheckoutPhase::Settled(report.resolution.outcome);
        }
    });

    let mut ctx = AppContext::new(
        session_service,
        checkout_service,
        api,
        origin_url,
        checkout_phase,
        report_tx,
    );

    // ===== REPL Setup =====
    let helper = CliHelper::new();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    println!("{}", "=== Zyppy ===".bright_magenta().bold());
    println!(
        "{}",
        "Order food from your terminal. Type 'help' for commands, 'quit' to exit.".bright_black()
    );
    println!();

    match ctx.restore_session().await {
        Some(session) => {
            println!("{}", format!("Welcome back, {}!", session.name).bright_green());
            if let Err(err) = ctx.dispatch("home").await {
                eprintln!("{}", err.to_string().red());
            }
        }
        None => println!("{}", "Not logged in. Start with: login <email>".bright_black()),
    }

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline("zyppy> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                // Handle quit command
                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                // Skip empty lines
                if trimmed.is_empty() {
                    continue;
                }

                // Add to history
                let _ = rl.add_history_entry(&line);

                if let Err(err) = ctx.dispatch(trimmed).await {
                    eprintln!("{}", err.to_string().red());
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    // Cancel any in-flight payment poll and close the report channel
    ctx.shutdown();
    drop(ctx);
    let _ = report_printer.await;

    Ok(())
}
