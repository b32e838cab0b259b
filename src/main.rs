use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};

use opener_for_asana::asana::AsanaClient;
use opener_for_asana::dispatch::ActionDispatcher;
use opener_for_asana::hosts::{omnibox, workflow};
use opener_for_asana::platform::{self, credentials, Platform};
use opener_for_asana::suggest::SuggestionProvider;
use opener_for_asana::token::DecodeMode;
use opener_for_asana::logging;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Host {
    /// Desktop workflow runner (script-filter JSON, strict tokens).
    Workflow,
    /// Browser omnibox integration (XML-escaped labels, lenient tokens).
    Omnibox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Tokens {
    Strict,
    Lenient,
}

#[derive(Parser)]
#[command(name = "opener-for-asana", version, about)]
struct Cli {
    /// Host environment to bind the platform capabilities for.
    #[arg(long, value_enum, default_value_t = Host::Workflow)]
    host: Host,

    /// Override the host's default handling of prefix-less input.
    #[arg(long, value_enum)]
    tokens: Option<Tokens>,

    /// Enable debug logging.
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search tasks and print suggestions for the host launcher.
    Suggest { query: String },
    /// Open the task behind a committed token in the browser.
    Open { token: String },
    /// Toggle the completion flag of the task behind a committed token.
    Toggle { token: String },
    /// Act on raw committed input (token or free text, per token mode).
    Act { input: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.debug);

    let plat = Arc::new(match cli.host {
        Host::Workflow => workflow::platform(),
        Host::Omnibox => omnibox::platform(),
    });
    platform::set_platform(plat.clone());

    let decode_mode = match cli.tokens {
        Some(Tokens::Strict) => DecodeMode::Strict,
        Some(Tokens::Lenient) => DecodeMode::Lenient,
        None => match cli.host {
            Host::Workflow => workflow::DEFAULT_DECODE_MODE,
            Host::Omnibox => omnibox::DEFAULT_DECODE_MODE,
        },
    };

    run(cli.command, cli.host, plat, decode_mode).await
}

fn client(plat: &Platform) -> anyhow::Result<Arc<AsanaClient>> {
    let (token, workspace) = credentials(plat.config())?;
    Ok(Arc::new(AsanaClient::new(token, workspace)))
}

async fn run(
    command: Command,
    host: Host,
    plat: Arc<Platform>,
    decode_mode: DecodeMode,
) -> anyhow::Result<()> {
    match command {
        Command::Suggest { query } => {
            let provider = SuggestionProvider::new(plat.clone(), client(&plat)?);
            let suggestions = provider.pull_suggestions(&query).await?;
            let rendered = match host {
                Host::Workflow => workflow::render_items(&suggestions)?,
                Host::Omnibox => omnibox::render_results(&suggestions)?,
            };
            println!("{rendered}");
        }
        Command::Open { token } => {
            let dispatcher = ActionDispatcher::new(plat.clone(), client(&plat)?, decode_mode);
            println!("{}", dispatcher.open_task(&token).await?);
        }
        Command::Toggle { token } => {
            let dispatcher = ActionDispatcher::new(plat.clone(), client(&plat)?, decode_mode);
            println!("{}", dispatcher.toggle_task_status(&token).await?);
        }
        Command::Act { input } => {
            let dispatcher = ActionDispatcher::new(plat.clone(), client(&plat)?, decode_mode);
            println!("{}", dispatcher.act_on_input(&input).await?);
        }
    }
    Ok(())
}
