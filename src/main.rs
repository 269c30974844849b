use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use spotitag::{cli, config, error, store::EntityKind};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP API
    Serve,

    /// Create a user account
    Register(RegisterOptions),

    /// Search artists by name
    Search(SearchOptions),

    /// Show an artist and its albums
    Artist(IdOption),

    /// Show an album
    Album(IdOption),

    /// Replace a user's tags on an artist or album
    Tag(TagOptions),

    /// List a user's tags
    Tags(UserOption),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct RegisterOptions {
    #[clap(long)]
    username: String,
    #[clap(long)]
    email: String,
    #[clap(long)]
    password: String,
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    /// Artist name to search for
    query: String,
}

#[derive(Parser, Debug, Clone)]
pub struct IdOption {
    /// Spotify id
    id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct TagOptions {
    /// `artist` or `album`
    kind: EntityKind,

    /// Spotify id of the artist or album
    id: String,

    /// Tags separated by `;`, e.g. "good;live". Pass "" to remove all.
    tags: String,

    /// Account the tags belong to
    #[clap(long)]
    user: String,
}

#[derive(Parser, Debug, Clone)]
pub struct UserOption {
    #[clap(long)]
    user: String,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn init_tracing(default_level: &str) {
    let filter = std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|level| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match &cli.command {
        Command::Serve => init_tracing("info"),
        _ => init_tracing("warn"),
    }

    match cli.command {
        Command::Serve => cli::serve().await,
        Command::Register(opt) => cli::register(opt.username, opt.email, opt.password).await,
        Command::Search(opt) => cli::search(opt.query).await,
        Command::Artist(opt) => cli::artist(opt.id).await,
        Command::Album(opt) => cli::album(opt.id).await,
        Command::Tag(opt) => cli::tag(opt.kind, opt.id, opt.tags, opt.user).await,
        Command::Tags(opt) => cli::list_tags(opt.user).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
