use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use client::{
    AdminConsole, AdminRow, ApiClient, ClientError, CompetitionFeed, CompetitionForm, ListingView,
    Route, Session, read_json,
};
use rust_decimal::Decimal;
use storage::dto::competition::UpdateCompetitionRequest;
use storage::filter::{Choice, FilterOptions, PrizeRange};
use storage::models::{CompetitionCategory, EntryDifficulty};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "prizeboard")]
#[command(about = "Browse, save and manage competitions and sweepstakes", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(
        long,
        env = "PRIZEBOARD_API_URL",
        default_value = "http://localhost:8080",
        global = true
    )]
    api_url: String,

    /// Viewer identity used for saved competitions
    #[arg(long, env = "PRIZEBOARD_VIEWER_ID", global = true)]
    viewer: Option<Uuid>,

    #[arg(long, env = "PRIZEBOARD_ADMIN_KEY", global = true, hide_env_values = true)]
    admin_key: Option<String>,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List active competitions
    List {
        #[command(flatten)]
        filters: ListFilters,
    },
    /// Toggle the saved flag of a competition
    Save { id: Uuid },
    /// Manage competitions (requires an admin key)
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(clap::Args)]
struct ListFilters {
    #[arg(long, default_value = "All")]
    category: Choice<CompetitionCategory>,

    #[arg(long, default_value = "All")]
    difficulty: Choice<EntryDifficulty>,

    #[arg(long)]
    min_prize: Option<Decimal>,

    #[arg(long)]
    max_prize: Option<Decimal>,

    /// Latest deadline (YYYY-MM-DD)
    #[arg(long)]
    end_date: Option<NaiveDate>,

    #[arg(long, default_value = "")]
    search: String,
}

impl From<ListFilters> for FilterOptions {
    fn from(args: ListFilters) -> Self {
        Self {
            category: args.category,
            prize_range: PrizeRange::from_bounds(args.min_prize, args.max_prize),
            end_date: args.end_date,
            difficulty: args.difficulty,
            search: args.search,
        }
    }
}

#[derive(Subcommand)]
enum AdminCommands {
    List,
    /// Create a competition from a JSON form
    Create {
        #[arg(long)]
        file: PathBuf,
    },
    /// Apply a JSON patch to a competition
    Update {
        id: Uuid,

        #[arg(long)]
        file: PathBuf,
    },
    Archive { id: Uuid },
    Delete { id: Uuid },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("prizeboard={},client={}", log_level, log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api = Arc::new(
        ApiClient::new(&cli.api_url)?
            .with_viewer(cli.viewer)
            .with_admin_key(cli.admin_key.clone()),
    );
    let session = Session::resolve(api.as_ref(), cli.admin_key).await?;

    match cli.command {
        Commands::List { filters } => handle_list(api, session, filters.into()).await,
        Commands::Save { id } => handle_save(api, session, id).await?,
        Commands::Admin { command } => {
            if session.guard(Route::AdminCompetitions) != Route::AdminCompetitions {
                eprintln!("An admin key is required: pass --admin-key or set PRIZEBOARD_ADMIN_KEY");
                return Err(ClientError::Unauthorized.into());
            }
            handle_admin(api, &session, command).await?;
        }
    }

    Ok(())
}

async fn handle_list(api: Arc<ApiClient>, session: Session, filters: FilterOptions) {
    let feed = CompetitionFeed::new(api, session);
    feed.set_filters(filters).await;

    match ListingView::from(&feed.snapshot().await) {
        ListingView::Loading => println!("Loading..."),
        ListingView::Failed { message } => println!("{}", message),
        ListingView::Empty => {
            println!("No competitions found");
            println!("Try adjusting your filters or search query");
        }
        ListingView::Populated(cards) => {
            for card in cards {
                let marker = if card.is_saved { "*" } else { " " };
                println!(
                    "{} {}  {}  {} | {} | {} | ends {}",
                    marker,
                    card.id,
                    card.title,
                    card.prize,
                    card.category,
                    card.difficulty,
                    card.deadline
                );
                println!("    by {}: {}", card.sponsor, card.entry_url);
                if !card.requirements.is_empty() {
                    println!("    Entry Requirements:");
                    for requirement in &card.requirements {
                        println!("      - {}", requirement);
                    }
                }
                if !card.eligibility.is_empty() {
                    println!("    Eligibility:");
                    for criteria in &card.eligibility {
                        println!("      - {}", criteria);
                    }
                }
            }
        }
    }
}

async fn handle_save(
    api: Arc<ApiClient>,
    session: Session,
    id: Uuid,
) -> client::Result<()> {
    let feed = CompetitionFeed::new(api, session);

    match feed.toggle_saved(id).await? {
        None => println!("Set --viewer or PRIZEBOARD_VIEWER_ID to save competitions"),
        Some(true) => println!("Saved {}", id),
        Some(false) => println!("Removed {} from saved", id),
    }

    Ok(())
}

async fn handle_admin(
    api: Arc<ApiClient>,
    session: &Session,
    command: AdminCommands,
) -> client::Result<()> {
    let mut console = AdminConsole::open(api, session).await?;

    match command {
        AdminCommands::List => print_table(&console.table()),
        AdminCommands::Create { file } => {
            let mut form: CompetitionForm = read_json(&file).await?;
            form.id = None;

            let created = console.submit(&form).await?;
            println!("Created {} ({})", created.title, created.id);
        }
        AdminCommands::Update { id, file } => {
            let patch: UpdateCompetitionRequest = read_json(&file).await?;

            let updated = console.update(id, &patch).await?;
            println!("Updated {} ({})", updated.title, updated.id);
        }
        AdminCommands::Archive { id } => {
            let archived = console.archive(id).await?;
            println!("Archived {} ({})", archived.title, archived.id);
        }
        AdminCommands::Delete { id } => {
            console.delete(id).await?;
            println!("Deleted {}", id);
        }
    }

    Ok(())
}

fn print_table(rows: &[AdminRow]) {
    if rows.is_empty() {
        println!("No competitions");
        return;
    }

    println!(
        "{:<36}  {:<32}  {:<11}  {:>10}  {:<12}  {}",
        "ID", "TITLE", "CATEGORY", "PRIZE", "DEADLINE", "STATUS"
    );
    for row in rows {
        println!(
            "{:<36}  {:<32}  {:<11}  {:>10}  {:<12}  {}",
            row.id, row.title, row.category, row.prize, row.deadline, row.status
        );
    }
}
