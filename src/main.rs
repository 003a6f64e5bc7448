use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use contact_form::app::App;
use contact_form::config::{Config, ENDPOINT_ENV};
use contact_form::console::ConsoleView;
use contact_form::logging::{self, LogTarget};
use contact_form::{handler, tui, ui, ContactController, FormspreeClient};

#[derive(Parser)]
#[command(name = "contact")]
#[command(about = "Send a message through a Formspree-style contact form")]
struct Cli {
    /// Form endpoint URL (overrides config and CONTACT_FORM_ENDPOINT)
    #[arg(short, long, global = true)]
    endpoint: Option<String>,
    /// Path to a config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a message without the interactive form
    Send {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let env_endpoint = std::env::var(ENDPOINT_ENV).ok();
    let endpoint = config.resolve_endpoint(cli.endpoint.as_deref(), env_endpoint.as_deref())?;

    let controller = ContactController::new(FormspreeClient::new(&endpoint))
        .with_extra_fields(config.extra_fields.clone());

    match cli.command {
        Some(Commands::Send { name, email, message }) => {
            logging::init(LogTarget::Stderr)?;
            tracing::info!(%endpoint, "sending contact form");
            let mut view = ConsoleView::new(&name, &email, &message, std::io::stdout());
            let delivered = match controller.handle_submit(&mut view).await {
                Ok(outcome) => outcome.is_success(),
                Err(_) => false,
            };
            Ok(if delivered { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        None => {
            logging::init(LogTarget::File)?;
            tracing::info!(%endpoint, "starting contact form");
            let mut app = App::new(controller, config.owner_name(), config.banner_timeout());
            run_tui(&mut app).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_tui(app: &mut App<FormspreeClient>) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new(tui::TICK_RATE);

    let result = async {
        while !app.should_quit {
            terminal.draw(|frame| ui::render(app, frame))?;
            match events.next().await {
                Some(event) => handler::handle_event(app, event).await?,
                None => break,
            }
        }
        Ok::<_, anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    result
}
