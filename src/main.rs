mod app;
mod cli;
mod config;
mod datasources;
mod db;
mod error;
mod logic;
mod models;

use app::AppState;
use clap::Parser;
use cli::{Cli, Commands, LocationCommands};
use config::Config;
use db::Database;
use error::{CropWatchError, Result};
use logic::RefreshService;
use models::{
    Advisory, Alert, ConditionsSummary, ModelPerformanceReport, ModelScore, SavedLocation,
    SuitabilityResult,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging; -v flags override the environment filter
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or(Commands::Status);

    // `init` runs before config loading since it is what creates the config
    if matches!(command, Commands::Init) {
        Config::setup_interactive()?;
        println!("Run `cropwatch check` to verify connectivity.");
        return Ok(());
    }

    // First launch without an explicit --config drops into setup
    let config = if Config::exists(cli.config.as_ref()) || cli.config.is_some() {
        Config::load(cli.config.clone())?
    } else {
        let (config, _) = Config::setup_interactive()?;
        config
    };

    let db = Database::open(cli.data_dir.as_ref())?;
    let mut app = AppState::new(config, db)?;

    match command {
        // Returned above, before state construction
        Commands::Init => {}
        Commands::Check => check(&app).await?,
        Commands::Refresh => refresh(&mut app).await?,
        Commands::Status => status(&app)?,
        Commands::Alerts => alerts(&app)?,
        Commands::Crops => crops(&app),
        Commands::Select { ids } => {
            app.select_crops(ids)?;
            println!("Selected crops: {}", app.selected_crop_ids.join(", "));
        }
        Commands::Evaluate { crop } => evaluate(&app, crop.as_deref())?,
        Commands::Compare { crops } => compare(&app, crops.as_deref())?,
        Commands::Performance => performance(&app)?,
        Commands::Location { command } => location(&mut app, command)?,
    }

    Ok(())
}

async fn check(app: &AppState) -> Result<()> {
    let service = RefreshService::new(app.config.clone());

    println!(
        "Location: {}, {} ({:.2}, {:.2})",
        app.config.location.city,
        app.config.location.country,
        app.config.location.latitude,
        app.config.location.longitude
    );

    let status = service.check_connections().await;
    if service.has_weather_source() {
        let state = if status.openweathermap { "OK" } else { "OFFLINE" };
        println!("OpenWeatherMap: {}", state);
    } else {
        println!("OpenWeatherMap: not configured (conditions will be simulated)");
    }
    if service.has_prediction_backend() {
        let state = if status.prediction { "OK" } else { "OFFLINE" };
        println!("Prediction backend: {}", state);
    } else {
        println!("Prediction backend: not configured");
    }

    Ok(())
}

async fn refresh(app: &mut AppState) -> Result<()> {
    let service = RefreshService::new(app.config.clone());

    println!("Fetching conditions for {}...", app.config.location.city);
    let (generation, summary) = service.refresh().await;
    if summary.is_simulated() {
        println!("Live weather unavailable; conditions below are simulated.");
    }
    app.apply_refresh(generation, summary)?;
    status(app)
}

fn status(app: &AppState) -> Result<()> {
    print_summary(app.current_summary()?);
    print_alerts(&app.current_alerts()?);

    let results = app.evaluate_selected()?;
    for (result, advisories) in &results {
        print_evaluation(app, result, advisories);
    }
    println!();
    Ok(())
}

fn alerts(app: &AppState) -> Result<()> {
    print_alerts(&app.current_alerts()?);
    Ok(())
}

fn print_alerts(alerts: &[Alert]) {
    if alerts.is_empty() {
        println!("No active alerts.");
        return;
    }
    for alert in alerts {
        println!("{} [{}] {}", alert.severity.symbol(), alert.severity, alert.message);
        println!("    {}", alert.recommendation);
    }
}

fn crops(app: &AppState) {
    for crop in app.registry.all() {
        let marker = if app.selected_crop_ids.contains(&crop.id) {
            "*"
        } else {
            " "
        };
        println!();
        println!("{} {} ({})", marker, crop.name, crop.id);
        println!(
            "    Temperature: {:.0}-{:.0} C",
            crop.temperature_range.min, crop.temperature_range.max
        );
        println!(
            "    Humidity:    {:.0}-{:.0}%",
            crop.humidity_range.min, crop.humidity_range.max
        );
        println!("    Rainfall:    {}", crop.rainfall_description);
        println!("    Stages:      {}", crop.growth_stages.join(" > "));
    }
    println!();
    println!("* = selected for evaluation");
}

fn evaluate(app: &AppState, crop: Option<&str>) -> Result<()> {
    let results = match crop {
        Some(id) => vec![app.evaluate_crop(id)?],
        None => app.evaluate_selected()?,
    };

    for (result, advisories) in &results {
        print_evaluation(app, result, advisories);
    }
    println!();
    Ok(())
}

fn compare(app: &AppState, crops: Option<&[String]>) -> Result<()> {
    let comparison = app.compare_crops(crops)?;

    println!();
    print!("{:<24}", "");
    for id in &comparison.crop_ids {
        print!("{:>10}", id);
    }
    println!();
    for metric in &comparison.metrics {
        print!("{:<24}", metric.metric.as_str());
        for (_, score) in &metric.scores {
            print!("{:>10.1}", score);
        }
        println!();
    }
    println!();
    Ok(())
}

fn performance(app: &AppState) -> Result<()> {
    let summary = app.current_summary()?;
    match &summary.model_performance {
        Some(report) => {
            print_performance(report);
            Ok(())
        }
        None => Err(CropWatchError::NotFound(
            "No model performance data. Configure a prediction backend and run `cropwatch refresh`."
                .into(),
        )),
    }
}

fn location(app: &mut AppState, command: LocationCommands) -> Result<()> {
    match command {
        LocationCommands::Add {
            name,
            latitude,
            longitude,
        } => {
            app.add_location(SavedLocation::new(name.clone(), latitude, longitude))?;
            println!("Saved location '{}'.", name);
        }
        LocationCommands::List => {
            if app.locations.is_empty() {
                println!(
                    "No saved locations. Add one with `cropwatch location add <name> <lat> <lon>`."
                );
            }
            for location in &app.locations {
                let marker = if app.active_location.as_deref() == Some(location.name.as_str()) {
                    "*"
                } else {
                    " "
                };
                println!("{} {}", marker, location);
            }
        }
        LocationCommands::Remove { name } => {
            app.remove_location(&name)?;
            println!("Removed location '{}'.", name);
        }
        LocationCommands::Use { name } => {
            let location = app.use_location(&name)?;
            println!("Active location set to {}.", location);
            println!("Run `cropwatch refresh` to fetch conditions there.");
        }
    }
    Ok(())
}

fn print_summary(summary: &ConditionsSummary) {
    let reading = &summary.reading;
    let location = &summary.forecast.location;

    println!();
    println!(
        "Conditions for {}, {} [{}]",
        location.city,
        location.country,
        reading.source.as_str()
    );
    println!(
        "  Updated:     {}",
        summary.last_updated.format("%Y-%m-%d %H:%M UTC")
    );
    println!("  Sky:         {}", reading.description);
    println!("  Temperature: {:.1} C", reading.temperature_c);
    if let Some(prediction) = &summary.prediction {
        println!(
            "  Predicted:   {:.1} C ({:.0}% confidence)",
            prediction.temperature_c, prediction.confidence
        );
    }
    println!("  Humidity:    {:.0}%", reading.humidity_percent);
    println!("  Wind:        {:.1} km/h", reading.wind_speed_kmh);
    println!("  Pressure:    {:.0} hPa", reading.pressure_hpa);
    println!("  AQI:         {:.0}", reading.air_quality_index);

    if !summary.forecast.days.is_empty() {
        println!();
        println!("Forecast:");
        for day in &summary.forecast.days {
            println!(
                "  {} {}  {:>5.1} C  {:>3.0}%  {:>5.1} mm  AQI {:.0}",
                day.label,
                day.date.format("%m-%d"),
                day.temperature_c,
                day.humidity_percent,
                day.rainfall_mm,
                day.air_quality_index
            );
        }
    }
    println!();
}

fn print_evaluation(app: &AppState, result: &SuitabilityResult, advisories: &[Advisory]) {
    let name = app
        .registry
        .get(&result.crop_id)
        .map(|c| c.name.as_str())
        .unwrap_or(result.crop_id.as_str());

    println!();
    println!("{}: {:.1}/100", name, result.overall_score);
    println!(
        "  Temperature: {:<12} ({:.1})",
        result.temperature_verdict.as_str(),
        result.temperature_score
    );
    println!(
        "  Humidity:    {:<12} ({:.1})",
        result.humidity_verdict.as_str(),
        result.humidity_score
    );
    for advisory in advisories {
        println!("  [{}] {}", advisory.level, advisory.message);
        println!("      {}", advisory.action);
    }
}

fn print_performance(report: &ModelPerformanceReport) {
    println!();
    println!("Prediction model performance:");
    println!(
        "  {:<12} {:>8} {:>8} {:>10}",
        "Model", "MAE", "RMSE", "Accuracy"
    );
    print_score_row("Temperature", &report.temperature);
    print_score_row("Humidity", &report.humidity);
    print_score_row("Rainfall", &report.rainfall);
    print_score_row("Air quality", &report.air_quality);
    print_score_row("Ensemble", &report.ensemble);
    println!();
}

fn print_score_row(label: &str, score: &ModelScore) {
    println!(
        "  {:<12} {:>8.2} {:>8.2} {:>9.1}%",
        label, score.mae, score.rmse, score.accuracy
    );
}
