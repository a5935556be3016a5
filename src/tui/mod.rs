//! Terminal UI for Nebula Sage

mod app;
mod ui;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use nebula_sage::{
    FeedbackProvider, LlmClient, OfflineOracle, Onboarding, OracleFeedback, ProviderKeyValidator,
    SageConfig, SeededSampler, SessionController, SessionEvent, TargetSampler, UniformSampler,
    narrator_from_config,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Duration;
use tracing::{error, info, instrument, warn};

use app::{Action, App};

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Options for [`run_tui`].
#[derive(Debug)]
pub struct TuiOptions {
    /// Loaded configuration.
    pub config: SageConfig,
    /// Use the offline Oracle.
    pub offline: bool,
    /// Seed for reproducible targets.
    pub seed: Option<u64>,
    /// Log destination while the UI owns the terminal.
    pub log_file: PathBuf,
}

/// Run the TUI client
pub async fn run_tui(options: TuiOptions) -> Result<()> {
    // Setup logging to file to avoid interfering with TUI
    let log_file = std::fs::File::create(&options.log_file)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,nebula_sage=debug")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized

    info!(offline = options.offline, "Starting Nebula Sage TUI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &options).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "TUI loop error");
    }
    res
}

/// Onboarding, then the game loop.
#[instrument(skip_all)]
async fn run_app(terminal: &mut Term, options: &TuiOptions) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let provider = *options.config.llm_provider();
    let provider_label = if options.offline {
        "offline".to_string()
    } else {
        provider.to_string()
    };
    let mut onboarding = Onboarding::new(ProviderKeyValidator::new(provider));

    let mut app = if options.offline {
        App::game(provider_label, build_controller(options, None, event_tx.clone()))
    } else if let Some(env_key) = options.config.api_key_from_env() {
        let mut app = App::onboarding(provider_label, None);
        app.begin_validation();
        terminal.draw(|f| ui::draw(f, &app))?;
        match onboarding.verify(&env_key).await {
            Ok(key) => app.enter_game(build_controller(options, Some(&key), event_tx.clone())),
            Err(e) => app.reject_key(format!(
                "{} was rejected. {}",
                provider.api_key_var(),
                e.message
            )),
        }
        app
    } else {
        App::onboarding(provider_label, None)
    };

    if let Some(controller) = app.controller() {
        controller.start().await;
    }

    loop {
        while let Ok(event) = event_rx.try_recv() {
            app.handle_event(event);
        }

        terminal.draw(|f| ui::draw(f, &app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        // Skip key release events (crossterm fires both press and release on some platforms).
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.handle_key(key) {
            Action::None => {}
            Action::Quit => {
                info!("User quit");
                break;
            }
            Action::SubmitKey(raw_key) => {
                app.begin_validation();
                terminal.draw(|f| ui::draw(f, &app))?;
                match onboarding.verify(&raw_key).await {
                    Ok(key) => {
                        let controller = build_controller(options, Some(&key), event_tx.clone());
                        controller.start().await;
                        app.enter_game(controller);
                    }
                    Err(e) => {
                        warn!(failures = onboarding.failures(), "Onboarding key rejected");
                        app.reject_key(e.message);
                    }
                }
            }
            Action::SubmitGuess(raw) => {
                if let Some(controller) = app.controller() {
                    let controller = controller.clone();
                    tokio::spawn(async move {
                        let outcome = controller.submit_guess(&raw).await;
                        tracing::debug!(?outcome, "Guess finished");
                    });
                }
            }
            Action::Reset => {
                if let Some(controller) = app.controller() {
                    controller.reset();
                }
            }
        }
    }

    if let Some(controller) = app.controller() {
        controller.shutdown().await;
    }
    Ok(())
}

/// Wires the Oracle, narrator and sampler into a controller.
#[instrument(skip(options, api_key, events))]
fn build_controller(
    options: &TuiOptions,
    api_key: Option<&str>,
    events: mpsc::UnboundedSender<SessionEvent>,
) -> SessionController {
    let config = &options.config;
    let feedback: Arc<dyn FeedbackProvider> = match api_key {
        Some(key) if !options.offline => {
            let client = LlmClient::new(config.llm_config_with_key(key.to_string()));
            Arc::new(OracleFeedback::new(client, config.language()))
        }
        _ => Arc::new(OfflineOracle),
    };
    let sampler: Arc<dyn TargetSampler> = match options.seed {
        Some(seed) => Arc::new(SeededSampler::new(seed)),
        None => Arc::new(UniformSampler),
    };
    let narrator = narrator_from_config(config, api_key);

    SessionController::new(feedback, narrator, sampler).with_events(events)
}
