use calendesk::api::ApiClient;
use calendesk::config::Config;
use calendesk::error::ClientResult;
use calendesk::views::event_list::TimeFilter;
use clap::{Parser, Subcommand};

pub mod auth;
pub mod calendly;
pub mod events;
pub mod util;

/// Terminal client for the scheduling backend
#[derive(Debug, Parser)]
#[command(name = "calendesk", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show who the backend thinks is logged in
    Status,
    /// Log in with Google through the backend
    Login {
        /// Print the login URL instead of opening a browser
        #[arg(long)]
        no_browser: bool,
    },
    /// End the backend session
    Logout,
    /// Show the logged in user's profile
    Profile,
    /// Probe the backend
    Ping {
        /// Also try the auth and events endpoints
        #[arg(long)]
        full: bool,
    },
    /// Work with scheduled events
    #[command(subcommand)]
    Events(EventsCommand),
    /// List event types
    EventTypes,
    /// Show event statistics
    Stats,
    /// List scheduled events, passing `key=value` filters through
    Scheduled {
        #[arg(long = "param", value_parser = util::parse_key_val)]
        params: Vec<(String, String)>,
    },
    /// List upcoming events
    Upcoming {
        /// Window in days
        #[arg(long)]
        days: Option<u32>,
    },
    /// Show the scheduling account's user info
    UserInfo,
    /// Create a single-use scheduling link
    Link {
        /// Event type URI
        event_type: String,
        #[arg(long, default_value_t = 1)]
        max_events: u32,
    },
    /// Show invitee details
    Invitee {
        /// Invitee URI
        uri: String,
    },
    /// Show analytics for an event type
    Analytics {
        event_type: String,
        start_date: String,
        end_date: String,
    },
    /// Scheduling account connection and checks
    #[command(subcommand)]
    Calendly(CalendlyCommand),
}

#[derive(Debug, Subcommand)]
pub enum EventsCommand {
    /// List events
    List {
        /// all, upcoming or past
        #[arg(long, default_value = "all")]
        filter: TimeFilter,
        /// Match against name, description and location
        #[arg(long)]
        search: Option<String>,
    },
    /// Create an event, or a scheduling link when an event type is given
    Create(events::CreateArgs),
    /// Delete an event by URI
    Delete { uri: String },
    /// Create a quick test event for tomorrow
    Test,
    /// Remove all test events
    ClearTest,
    /// Create a sample event with a fixed invitee
    Sample,
}

#[derive(Debug, Subcommand)]
pub enum CalendlyCommand {
    /// Open the account connection page
    Connect {
        #[arg(long)]
        no_browser: bool,
    },
    /// Finish the account connection with an authorization code
    Callback { code: String },
    /// Check that the backend accepts our session
    TestAuth,
    /// Show the integration configuration status
    Config,
}

/// Shared context for all commands
#[derive(Debug)]
pub struct CommandContext {
    pub config: Config,
    pub client: ApiClient,
}

impl CommandContext {
    pub fn new(config: Config, client: ApiClient) -> Self {
        Self { config, client }
    }
}

/// Type alias for command result
pub type CommandResult = ClientResult<()>;

/// Dispatch a parsed command line
pub async fn run(cli: Cli, ctx: CommandContext) -> CommandResult {
    match cli.command {
        Command::Status => auth::status(&ctx).await,
        Command::Login { no_browser } => auth::login(&ctx, !no_browser).await,
        Command::Logout => auth::logout(&ctx).await,
        Command::Profile => auth::profile(&ctx).await,
        Command::Ping { full } => auth::ping(&ctx, full).await,
        Command::Events(cmd) => match cmd {
            EventsCommand::List { filter, search } => {
                events::list(&ctx, filter, search.unwrap_or_default()).await
            }
            EventsCommand::Create(args) => events::create(&ctx, args).await,
            EventsCommand::Delete { uri } => events::delete(&ctx, &uri).await,
            EventsCommand::Test => events::quick_test(&ctx).await,
            EventsCommand::ClearTest => events::clear_test(&ctx).await,
            EventsCommand::Sample => calendly::sample(&ctx).await,
        },
        Command::EventTypes => events::event_types(&ctx).await,
        Command::Stats => calendly::stats(&ctx).await,
        Command::Scheduled { params } => calendly::scheduled(&ctx, &params).await,
        Command::Upcoming { days } => {
            calendly::upcoming(&ctx, days.unwrap_or(ctx.config.upcoming_days)).await
        }
        Command::UserInfo => calendly::user_info(&ctx).await,
        Command::Link {
            event_type,
            max_events,
        } => calendly::link(&ctx, &event_type, max_events).await,
        Command::Invitee { uri } => calendly::invitee(&ctx, &uri).await,
        Command::Analytics {
            event_type,
            start_date,
            end_date,
        } => calendly::analytics(&ctx, &event_type, &start_date, &end_date).await,
        Command::Calendly(cmd) => match cmd {
            CalendlyCommand::Connect { no_browser } => calendly::connect(&ctx, !no_browser).await,
            CalendlyCommand::Callback { code } => calendly::callback(&ctx, &code).await,
            CalendlyCommand::TestAuth => calendly::test_auth(&ctx).await,
            CalendlyCommand::Config => calendly::config_status(&ctx).await,
        },
    }
}
