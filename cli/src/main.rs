
use clap::{Args, Parser, Subcommand};
use dealscout_client::net::types::{County, DistressType, LeadId, MapBounds, MarketQuery, ResultLimit};
use dealscout_client::state::copilot::{CopilotContext, Role};
use dealscout_client::state::filters::SearchFiltersPatch;
use dealscout_client::state::scout::{ScoutFilters, ScoutPatch};
use dealscout_client::{ApiError, AppStore, ClientConfig, ConfigError, CopilotStore, FetchSlot, HttpLeadApi};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("{slot} request failed: {message}")]
    Fetch { slot: &'static str, message: String },
    #[error("lead {0} not found")]
    LeadNotFound(String),
    #[error("invalid JSON output: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "dealscout", about = "DealScout lead service CLI")]
struct Cli {
    #[arg(long, env = "DEALSCOUT_API_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch all leads, optionally narrowed by a deal query.
    Leads {
        #[arg(long)]
        query: Option<String>,
        /// Print only the lead with this id.
        #[arg(long)]
        select: Option<String>,
    },
    /// Fetch leads and group them by pipeline status.
    Board {
        #[arg(long)]
        query: Option<String>,
    },
    /// Fetch one lead by id.
    Lead { id: String },
    Scout(ScoutArgs),
    Market(MarketArgs),
    Heatmap {
        #[arg(long, value_parser = parse_county, default_value = "maricopa")]
        county: County,
    },
    /// Autocomplete addresses and cities.
    Suggest { text: String },
    /// Build a Co-Pilot transcript from the given user messages.
    Copilot(CopilotArgs),
}

#[derive(Args, Debug)]
struct ScoutArgs {
    /// Free-text search.
    #[arg(long, default_value = "")]
    text: String,

    #[arg(long, value_parser = parse_county, default_value = "maricopa")]
    county: County,

    #[arg(long, value_parser = parse_distress_type, default_value = "all")]
    distress_type: DistressType,

    #[arg(long, value_parser = parse_limit, default_value = "50")]
    limit: ResultLimit,

    #[arg(long = "signal")]
    signals: Vec<String>,

    #[arg(long = "property-type")]
    property_types: Vec<String>,

    /// Viewport as north,south,east,west.
    #[arg(long, value_parser = parse_bounds)]
    bounds: Option<MapBounds>,
}

#[derive(Args, Debug)]
struct MarketArgs {
    #[arg(long, value_parser = parse_county, default_value = "maricopa")]
    county: County,

    #[arg(long)]
    city: Option<String>,
}

#[derive(Args, Debug)]
struct CopilotArgs {
    /// Scope the conversation to a lead.
    #[arg(long, conflicts_with = "market")]
    lead: Option<String>,

    /// Scope the conversation to a market region.
    #[arg(long)]
    market: Option<String>,

    messages: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let dotenv = dotenvy::dotenv();
    init_tracing();
    report_dotenv(dotenv);

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url.as_deref() {
        config = config.with_base_url(base_url)?;
    }

    match cli.command {
        Command::Copilot(args) => run_copilot(args),
        command => run_with_store(&config, command).await,
    }
}

async fn run_with_store(config: &ClientConfig, command: Command) -> Result<(), CliError> {
    let api = HttpLeadApi::new(config)?;
    tracing::info!(base_url = %api.base_url(), "dealscout client ready");
    let store = AppStore::new(api);
    store.subscribe(|state| {
        tracing::debug!(
            leads = state.leads.len(),
            filtered = state.filtered_leads.len(),
            scout_results = state.scout.results.len(),
            zone = ?state.active_zone,
            "state changed"
        );
    });

    match command {
        Command::Leads { query, select } => run_leads(&store, query.as_deref(), select).await,
        Command::Board { query } => run_board(&store, query.as_deref()).await,
        Command::Lead { id } => run_lead(&store, id).await,
        Command::Scout(args) => run_scout(&store, args).await,
        Command::Market(args) => run_market(&store, args).await,
        Command::Heatmap { county } => run_heatmap(&store, county).await,
        Command::Suggest { text } => run_suggest(&store, &text).await,
        Command::Copilot(args) => run_copilot(args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// Log the `.env` outcome once tracing is up; `RUST_LOG` may come from it.
fn report_dotenv(result: Result<std::path::PathBuf, dotenvy::Error>) {
    match result {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "ignoring unreadable .env"),
    }
}

type Store = AppStore<HttpLeadApi>;

/// Turn a failed fetch slot into a command error.
fn check_slot(store: &Store, slot: FetchSlot) -> Result<(), CliError> {
    match store.snapshot().fetches.get(slot).error() {
        Some(message) => Err(CliError::Fetch { slot: slot.name(), message: message.to_owned() }),
        None => Ok(()),
    }
}

async fn load_leads(store: &Store, query: Option<&str>) -> Result<(), CliError> {
    store.fetch_leads().await;
    check_slot(store, FetchSlot::Leads)?;
    if let Some(query) = query {
        store.filter_deals(query);
    }
    Ok(())
}

async fn run_leads(store: &Store, query: Option<&str>, select: Option<String>) -> Result<(), CliError> {
    load_leads(store, query).await?;
    let Some(id) = select else {
        return print_json(&store.snapshot().filtered_leads);
    };

    store.set_selected_property(Some(LeadId::new(id.as_str())));
    let state = store.snapshot();
    match state.selected_property() {
        Some(lead) => print_json(lead),
        None => Err(CliError::LeadNotFound(id)),
    }
}

async fn run_board(store: &Store, query: Option<&str>) -> Result<(), CliError> {
    load_leads(store, query).await?;
    let state = store.snapshot();
    let columns: Vec<serde_json::Value> = state
        .leads_by_status()
        .into_iter()
        .map(|(status, leads)| serde_json::json!({ "status": status, "leads": leads }))
        .collect();
    print_json(&columns)
}

async fn run_lead(store: &Store, id: String) -> Result<(), CliError> {
    store.fetch_lead(LeadId::new(id)).await;
    check_slot(store, FetchSlot::LeadDetail)?;
    print_json(&store.snapshot().lead_detail)
}

async fn run_scout(store: &Store, args: ScoutArgs) -> Result<(), CliError> {
    store.set_search_filters(
        SearchFiltersPatch::default().county(args.county).distress_type(args.distress_type).limit(args.limit),
    );
    store.update_scout(
        ScoutPatch::default().query(args.text).bounds(args.bounds).filters(ScoutFilters {
            distress_signals: args.signals.into_iter().collect(),
            property_types: args.property_types.into_iter().collect(),
        }),
    );
    store.search_scout().await;
    check_slot(store, FetchSlot::Scout)?;
    print_json(&store.snapshot().scout.results)
}

async fn run_market(store: &Store, args: MarketArgs) -> Result<(), CliError> {
    store.fetch_market_analysis_for(MarketQuery { county: args.county, city: args.city }).await;
    check_slot(store, FetchSlot::Market)?;
    print_json(&store.snapshot().market)
}

async fn run_heatmap(store: &Store, county: County) -> Result<(), CliError> {
    store.set_search_filters(SearchFiltersPatch::default().county(county));
    store.fetch_heatmap().await;
    check_slot(store, FetchSlot::Heatmap)?;
    print_json(&store.snapshot().heatmap)
}

async fn run_suggest(store: &Store, text: &str) -> Result<(), CliError> {
    store.fetch_suggestions(text).await;
    check_slot(store, FetchSlot::Suggestions)?;
    print_json(&store.snapshot().suggestions)
}

fn run_copilot(args: CopilotArgs) -> Result<(), CliError> {
    let copilot = CopilotStore::new();
    copilot.subscribe(|state| tracing::debug!(messages = state.messages.len(), context = ?state.context, "copilot changed"));
    copilot.set_open(true);
    if let Some(id) = args.lead {
        copilot.set_context(CopilotContext::Lead { id: LeadId::new(id), label: None });
    } else if let Some(region) = args.market {
        copilot.set_context(CopilotContext::Market { region });
    }
    for message in args.messages {
        copilot.add_message(Role::User, message);
    }
    print_json(&*copilot.snapshot())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

fn parse_county(raw: &str) -> Result<County, String> {
    County::parse(raw).ok_or_else(|| format!("unknown county '{raw}' (expected maricopa, pinal, or pima)"))
}

fn parse_distress_type(raw: &str) -> Result<DistressType, String> {
    DistressType::parse(raw).ok_or_else(|| format!("unknown distress type '{raw}'"))
}

fn parse_limit(raw: &str) -> Result<ResultLimit, String> {
    let value: u32 = raw.parse().map_err(|_| format!("invalid limit '{raw}'"))?;
    ResultLimit::try_from(value)
}

fn parse_bounds(raw: &str) -> Result<MapBounds, String> {
    let parts: Vec<f64> = raw
        .split(',')
        .map(|part| part.trim().parse::<f64>().map_err(|_| format!("invalid coordinate '{part}'")))
        .collect::<Result<_, _>>()?;
    match parts.as_slice() {
        &[north, south, east, west] if north >= south => Ok(MapBounds { north, south, east, west }),
        [_, _, _, _] => Err("north must not be below south".to_owned()),
        _ => Err(format!("expected north,south,east,west but got '{raw}'")),
    }
}
