//! WeatherDash CLI
//!
//! Current conditions, a multi-day forecast and weather alerts in the terminal.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::warn;
use weatherdash::dashboard::{DaySummary, View, WeatherReport};
use weatherdash::history::HistoryEntry;
use weatherdash::{
    DashboardConfig, DashboardService, GeocoderChain, OpenWeatherClient, PreferenceStore, Result,
    TemperatureUnit, WeatherDashError, logging,
};

/// WeatherDash CLI
#[derive(Parser)]
#[command(name = "weatherdash")]
#[command(author, version, about = "Weather dashboard in the terminal", long_about = None)]
struct Cli {
    /// Configuration file (default: <config dir>/weatherdash/config.toml)
    #[arg(short, long, global = true, env = "WEATHERDASH_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Weather for a city
    City {
        /// City name, e.g. "Paris" or "Paris,FR"
        name: String,

        /// Show remediation steps for every alert
        #[arg(short, long)]
        detailed: bool,
    },

    /// Weather at a position
    Coords {
        /// Latitude in decimal degrees
        #[arg(allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(allow_negative_numbers = true)]
        lon: f64,

        /// Show remediation steps for every alert
        #[arg(short, long)]
        detailed: bool,
    },

    /// Show recent searches
    History {
        /// Forget all recent searches
        #[arg(long)]
        clear: bool,
    },

    /// Set the temperature unit, or toggle it when none is given
    Unit {
        /// celsius or fahrenheit
        unit: Option<TemperatureUnit>,
    },

    /// Choose which panel a search shows
    View {
        /// current, forecast, charts or alerts
        view: View,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match DashboardConfig::load_from_path(cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e:#}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(&config.logging, cli.verbose) {
        eprintln!("⚠️  {e:#}");
    }

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: &DashboardConfig) -> Result<()> {
    match command {
        Commands::City { name, detailed } => {
            let service = build_service(config).await?;
            let report = service.search_city(&name).await?;
            let state = service.state().await;
            print_report(&report, state.unit(), state.view(), detailed);
        }

        Commands::Coords { lat, lon, detailed } => {
            let service = build_service(config).await?;
            let report = service.search_coordinates(lat, lon).await?;
            let state = service.state().await;
            print_report(&report, state.unit(), state.view(), detailed);
        }

        Commands::History { clear } => {
            let store = open_store(config)?;
            if clear {
                store.save_history(&[]).await.map_err(storage_error)?;
                println!("🗑️  Search history cleared");
                return Ok(());
            }

            let unit = store.load_unit().await.map_err(storage_error)?;
            let entries = store.load_history().await.map_err(storage_error)?;
            print_history(&entries, unit);
        }

        Commands::Unit { unit } => {
            let store = open_store(config)?;
            let unit = match unit {
                Some(unit) => unit,
                None => store.load_unit().await.map_err(storage_error)?.toggled(),
            };
            store.save_unit(unit).await.map_err(storage_error)?;
            println!("🌡️  Temperatures are shown in {unit} ({})", unit.symbol());
        }

        Commands::View { view } => {
            let store = open_store(config)?;
            store.save_view(view).await.map_err(storage_error)?;
            println!("🗂️  Searches show the {view} view");
        }
    }

    Ok(())
}

async fn build_service(
    config: &DashboardConfig,
) -> Result<DashboardService<OpenWeatherClient, GeocoderChain>> {
    let provider = OpenWeatherClient::new(&config.weather)?;
    let geocoder = GeocoderChain::new(&config.geocoding, &config.weather)?;
    let service = DashboardService::new(provider, geocoder, config);

    // Searching still works without saved preferences
    match open_store(config) {
        Ok(store) => Ok(service.with_store(store).await),
        Err(e) => {
            warn!("Preferences unavailable: {}", e);
            Ok(service)
        }
    }
}

fn open_store(config: &DashboardConfig) -> Result<PreferenceStore> {
    PreferenceStore::open(&config.storage.location).map_err(storage_error)
}

fn storage_error(e: anyhow::Error) -> WeatherDashError {
    WeatherDashError::storage(format!("{e:#}"))
}

fn print_report(report: &WeatherReport, unit: TemperatureUnit, view: View, detailed: bool) {
    print_current(report, unit);

    match view {
        View::Current => print_alerts(report, detailed),
        View::Forecast => print_days(report, unit),
        View::Charts => print_charts(report, unit),
        View::Alerts => print_alerts(report, true),
    }
}

fn print_current(report: &WeatherReport, unit: TemperatureUnit) {
    let now = &report.current;
    println!("\n📍 {}", report.location.display_name());
    println!(
        "{} {} ({})",
        now.condition.icon(),
        now.condition,
        now.description
    );
    println!(
        "   Temperature: {} (feels like {}, min {} / max {})",
        unit.format(now.temperature),
        unit.format(now.feels_like),
        unit.format(now.temp_min),
        unit.format(now.temp_max)
    );

    let dew_point = report
        .dew_point
        .map_or_else(|| "n/a".to_string(), |dp| unit.format(dp));
    println!("   Humidity:    {}% (dew point {dew_point})", now.humidity);

    let direction = report.wind_direction.unwrap_or("-");
    let gust = now
        .wind_gust
        .map_or_else(|| "n/a".to_string(), |g| format!("{g:.1} m/s"));
    println!(
        "   Wind:        {:.1} m/s {direction} ({}), gusts {gust}",
        now.wind_speed, report.wind_category
    );
    println!(
        "   Pressure:    {:.0} hPa, visibility {:.1} km, clouds {}%",
        now.pressure,
        now.visibility / 1000.0,
        now.cloudiness
    );

    if let (Some(sunrise), Some(sunset)) = (report.local_sunrise(), report.local_sunset()) {
        println!(
            "   Sun:         🌅 {}  🌇 {}",
            sunrise.format("%H:%M"),
            sunset.format("%H:%M")
        );
    }

    let insights = &report.insights;
    println!("\n💡 Insights");
    println!("   👕 {}", insights.clothing);
    println!("   🌡️  {}", insights.trend);
    println!("   💨 {}", insights.wind);
    println!("   👁️  {}", insights.visibility);
}

fn print_days(report: &WeatherReport, unit: TemperatureUnit) {
    if !report.has_forecast() {
        println!("\nNo forecast available");
        return;
    }

    println!("\n📅 Forecast");
    for day in &report.days {
        print_day(day, unit);
    }
}

fn print_day(day: &DaySummary, unit: TemperatureUnit) {
    let aggregate = &day.aggregate;
    println!(
        "   {}  {} {:<12} {:>13}  💧 {:>3}%  💨 {:.1} m/s",
        aggregate.date.format("%a %d %b"),
        aggregate.dominant_condition.icon(),
        aggregate.dominant_condition,
        day.format_range(unit),
        aggregate.precipitation_percent(),
        aggregate.avg_wind_speed
    );
}

fn print_charts(report: &WeatherReport, unit: TemperatureUnit) {
    let Some(summary) = report.chart_summary(unit) else {
        println!("\nNo forecast available");
        return;
    };

    println!("\n📈 Forecast trends");
    println!(
        "   Temperature: avg {:.1}{sym}, min {:.0}{sym}, max {:.0}{sym}",
        summary.temperature.average,
        summary.temperature.min,
        summary.temperature.max,
        sym = unit.symbol()
    );
    println!(
        "   Humidity:    avg {:.0}%, min {:.0}%, max {:.0}%",
        summary.humidity.average, summary.humidity.min, summary.humidity.max
    );
    println!(
        "   Wind:        avg {:.1} m/s, max {:.1} m/s, gusts up to {:.1} m/s",
        summary.wind_speed.average, summary.wind_speed.max, summary.max_gust
    );
}

fn print_alerts(report: &WeatherReport, detailed: bool) {
    if !report.has_alerts() {
        if detailed {
            println!("\n✅ No active alerts");
        }
        return;
    }

    println!("\n⚠️  Weather alerts");
    for alert in &report.alerts {
        println!(
            "   {} {} [{}]: {}",
            alert.category.icon(),
            alert.title,
            alert.severity.risk_label(),
            alert.message
        );
        if detailed {
            for step in &alert.remediation {
                println!("      - {step}");
            }
        }
    }
}

fn print_history(entries: &[HistoryEntry], unit: TemperatureUnit) {
    if entries.is_empty() {
        println!("No recent searches");
        return;
    }

    println!("🕘 Recent searches");
    for (index, entry) in entries.iter().enumerate() {
        println!(
            "   {}. {:<24} {:>6}  {} {:<12} {}",
            index + 1,
            entry.city,
            entry.display_temperature(unit),
            entry.condition.icon(),
            entry.condition,
            entry.captured_at.format("%Y-%m-%d %H:%M")
        );
    }
}
