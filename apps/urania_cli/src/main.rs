use anyhow::Context;
use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use urania::coords::{parse_coordinate, Axis};
use urania::{compute_chart, ChartRequest, GeoLocation, HouseSystem};
use urania_config::{load_settings, parse_house_system};

#[derive(Parser, Debug)]
#[command(author, version, about, args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    chart: ChartArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the known house systems and their codes.
    Houses,
}

#[derive(Args, Debug)]
struct ChartArgs {
    /// Civil date and time (UT): YEAR MONTH DAY HOUR MINUTE.
    #[arg(
        num_args = 5,
        value_names = ["YEAR", "MONTH", "DAY", "HOUR", "MINUTE"],
        allow_negative_numbers = true
    )]
    moment: Vec<i32>,

    /// Civil date and time (UT) as 2000-01-01T12:00, instead of the positionals.
    #[arg(long, value_parser = parse_datetime, conflicts_with = "moment")]
    at: Option<NaiveDateTime>,

    /// Longitude: signed degrees (negative west) or 74W00'00".
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<String>,

    /// Latitude: signed degrees (negative south) or 40N42'51".
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<String>,

    /// House system name or code (default from config, else placidus).
    #[arg(long)]
    house: Option<String>,

    /// Config file (otherwise URANIA_CONFIG or configs/urania.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print bodies missing from the record to stderr.
    #[arg(long)]
    report: bool,

    /// Pretty-print the record.
    #[arg(long)]
    pretty: bool,

    /// Debug logging unless RUST_LOG says otherwise.
    #[arg(long, short)]
    verbose: bool,
}

fn parse_datetime(s: &str) -> Result<NaiveDateTime, String> {
    const FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];
    FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .ok_or_else(|| format!("expected YYYY-MM-DDTHH:MM, got {s:?}"))
}

fn build_request(args: &ChartArgs, default_house: HouseSystem) -> anyhow::Result<ChartRequest> {
    let lon = args
        .lon
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("--lon is required"))?;
    let lat = args
        .lat
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("--lat is required"))?;
    let location = GeoLocation {
        lat: parse_coordinate(lat, Axis::Latitude).context("Invalid --lat")?,
        lon: parse_coordinate(lon, Axis::Longitude).context("Invalid --lon")?,
    };
    let house_system = match args.house.as_deref() {
        Some(name) => parse_house_system(name).context("Invalid --house")?,
        None => default_house,
    };

    match (args.at, args.moment.as_slice()) {
        (Some(dt), _) => Ok(ChartRequest::from_datetime(dt, location, house_system)),
        (None, &[year, month, day, hour, minute]) => Ok(ChartRequest {
            year,
            month,
            day,
            hour,
            minute,
            location,
            house_system,
        }),
        (None, _) => anyhow::bail!("Give either YEAR MONTH DAY HOUR MINUTE or --at"),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn list_house_systems() {
    for (name, system) in HouseSystem::catalogue() {
        println!("{}  {}", system, name);
    }
}

fn run_chart(args: &ChartArgs) -> anyhow::Result<()> {
    let settings = load_settings(args.config.as_deref())?;
    let request = build_request(args, settings.house_system)?;
    let adapter = settings.adapter()?;
    if let Some(path) = adapter.ephemeris_path() {
        log::info!("Ephemeris path: {}", path.display());
    }
    log::info!(
        "Chart for {:04}-{:02}-{:02} {:02}:{:02} at {}, {} ({})",
        request.year,
        request.month,
        request.day,
        request.hour,
        request.minute,
        request.location.lat,
        request.location.lon,
        request.house_system.name().unwrap_or("uncatalogued")
    );

    let output = compute_chart(&adapter, &request, &settings.chart_options())
        .context("Chart computation failed")?;

    if args.pretty {
        let value: serde_json::Value = serde_json::from_str(&output.json)?;
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", output.json);
    }

    if args.report {
        for omitted in &output.omitted {
            eprintln!("[urania] omitted {}", omitted);
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.chart.verbose);

    match cli.command {
        Some(Command::Houses) => {
            list_house_systems();
            Ok(())
        }
        None => run_chart(&cli.chart),
    }
}
