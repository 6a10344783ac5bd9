use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use boardchat::compose::{self, Submission};
use boardchat::config::{
    ApiUrlSource, ClientConfig, ConfigError, DEFAULT_API_PORT, DEFAULT_CONNECT_TIMEOUT_SECS,
    DEFAULT_POLL_INTERVAL_MS,
};
use boardchat::identity::{MAX_USER_LEN, UserField};
use boardchat::poller::spawn_poller;
use boardchat::render::BoardView;
use boardchat::session::{ChatSession, InputOutcome};
use boardchat::sync::{BoardSync, HttpBoardApi, PostOutcome, SyncError};
use clap::{Args, Parser, Subcommand};
use time::UtcOffset;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "boardchat=info";
const CLEAR_SCREEN: &[u8] = b"\x1b[2J\x1b[H";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error("invalid user name {0:?}; names are 1-{MAX_USER_LEN} characters")]
    InvalidUser(String),
    #[error("message content is empty")]
    EmptyMessage,
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] io::Error),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "boardchat", version, about = "Polling chat client for a shared message board")]
struct Cli {
    #[command(flatten)]
    endpoint: EndpointArgs,

    /// Initial user name; a random `anon_xxxxx` name is generated otherwise.
    #[arg(long, env = "BOARDCHAT_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args, Debug)]
struct EndpointArgs {
    /// Board endpoint, used as-is.
    #[arg(long, env = "BOARDCHAT_API_URL")]
    api_url: Option<String>,

    /// Page URL to derive the endpoint from (same host, `--api-port`, root path).
    #[arg(long, env = "BOARDCHAT_PAGE_URL")]
    page_url: Option<String>,

    #[arg(long, env = "BOARDCHAT_API_PORT", default_value_t = DEFAULT_API_PORT)]
    api_port: u16,

    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    poll_interval_ms: u64,

    #[arg(long, default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS)]
    connect_timeout_secs: u64,

    /// Per-request timeout. Unset by default; a slow poll is superseded by the next one.
    #[arg(long)]
    request_timeout_ms: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive session: `/name <new>` renames, `/quit` exits, other lines are sent.
    Chat,
    /// Poll and render without reading input.
    Watch,
    /// Fetch the board once and print it.
    Show,
    /// Post one message, re-fetch, and print the board.
    Send { content: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Read before the runtime spawns worker threads; the lookup refuses to run
    // in a multi-threaded process on some platforms.
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);

    init_tracing();

    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)
        .and_then(|runtime| runtime.block_on(run(cli, offset)));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "boardchat failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: Cli, offset: UtcOffset) -> Result<(), CliError> {
    let config = client_config(cli.endpoint)?;
    info!(api_url = %config.api_url, "using board endpoint");

    let sync = BoardSync::new(Arc::new(HttpBoardApi::new(&config)?));
    let user = cli.user.as_deref().map_or_else(UserField::generated, UserField::new);
    let view = BoardView::new(user, offset);

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => run_live(ChatSession::new(view, sync.clone()), sync, config.poll_interval, true).await,
        Command::Watch => run_live(ChatSession::new(view, sync.clone()), sync, config.poll_interval, false).await,
        Command::Show => run_show(view, &sync).await,
        Command::Send { content } => run_send(view, &sync, &content).await,
    }
}

fn client_config(args: EndpointArgs) -> Result<ClientConfig, ConfigError> {
    let source = ApiUrlSource::from_options(args.api_url, args.page_url, args.api_port)?;
    Ok(ClientConfig::new(source.resolve()?)
        .with_poll_interval(Duration::from_millis(args.poll_interval_ms))?
        .with_connect_timeout(Duration::from_secs(args.connect_timeout_secs))
        .with_request_timeout(args.request_timeout_ms.map(Duration::from_millis)))
}

async fn run_show(mut view: BoardView, sync: &BoardSync) -> Result<(), CliError> {
    view.apply(sync.refresh().await?);
    Screen::plain().draw(&view)?;
    Ok(())
}

async fn run_send(mut view: BoardView, sync: &BoardSync, content: &str) -> Result<(), CliError> {
    let message = match compose::submit(view.user(), content) {
        Submission::Send(message) => message,
        Submission::Blocked => return Err(CliError::InvalidUser(view.user().name().to_owned())),
        Submission::Dropped => return Err(CliError::EmptyMessage),
    };

    let PostOutcome { posted, board } = sync.post_then_refresh(&message).await;
    posted?;
    view.apply(board?);
    Screen::plain().draw(&view)?;
    Ok(())
}

async fn run_live(
    mut session: ChatSession,
    sync: BoardSync,
    interval: Duration,
    read_input: bool,
) -> Result<(), CliError> {
    let (poller, mut events) = spawn_poller(sync, interval);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut screen = Screen::detect();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let result = loop {
        tokio::select! {
            _ = &mut ctrl_c => break Ok(()),
            event = events.recv() => {
                let Some(event) = event else { break Ok(()) };
                if session.on_event(event) {
                    if let Err(e) = screen.draw(session.view()) {
                        break Err(e.into());
                    }
                }
            }
            line = lines.next_line(), if read_input => match line {
                Ok(Some(line)) => {
                    // Ctrl-C must still exit while a post or its refresh hangs.
                    let Some(outcome) = session.handle_line_until(&line, &mut ctrl_c).await else {
                        break Ok(());
                    };
                    if outcome == InputOutcome::Quit {
                        break Ok(());
                    }
                    report(&outcome, session.view());
                    if let Err(e) = screen.draw(session.view()) {
                        break Err(e.into());
                    }
                }
                Ok(None) => break Ok(()),
                Err(e) => break Err(e.into()),
            },
        }
    };

    poller.stop().await;
    result
}

fn report(outcome: &InputOutcome, view: &BoardView) {
    match outcome {
        InputOutcome::Blocked => eprintln!(
            "not sent: {:?} is not a valid name (1-{MAX_USER_LEN} characters); use /name <new>",
            view.user().name()
        ),
        InputOutcome::Sent { posted: false } => eprintln!("not delivered; the board was refreshed"),
        InputOutcome::UnknownCommand(name) => eprintln!("unknown command /{name}; try /name <new> or /quit"),
        InputOutcome::Sent { posted: true }
        | InputOutcome::Dropped
        | InputOutcome::Renamed { .. }
        | InputOutcome::Quit => {}
    }
}

/// Stdout frame writer. Redraws only when the frame changes.
struct Screen {
    last: String,
    clear: bool,
}

impl Screen {
    fn detect() -> Self {
        Self { last: String::new(), clear: io::stdout().is_terminal() }
    }

    fn plain() -> Self {
        Self { last: String::new(), clear: false }
    }

    fn draw(&mut self, view: &BoardView) -> io::Result<()> {
        let frame = view.render_text();
        if frame == self.last {
            return Ok(());
        }
        let mut out = io::stdout().lock();
        if self.clear {
            out.write_all(CLEAR_SCREEN)?;
        }
        out.write_all(frame.as_bytes())?;
        out.flush()?;
        self.last = frame;
        Ok(())
    }
}
