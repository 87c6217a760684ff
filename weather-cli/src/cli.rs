use std::{process::ExitCode, sync::Arc};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Password, PasswordDisplayMode};
use weather_core::{
    Config, Coordinates, FixedLocation, LocationSource, PermissionCache, RenderOptions,
    ViewState, WeatherProvider, WeatherTask, provider_from_config, render,
};

use crate::consent::PromptedLocation;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for where you are")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the AccuWeather API key and default coordinates.
    Configure,

    /// Show current weather for your location.
    Show(ShowArgs),

    /// Print where the config file lives.
    ConfigPath,
}

#[derive(Debug, clap::Args)]
pub struct ShowArgs {
    /// Latitude; overrides the configured location.
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude; overrides the configured location.
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Grant location access without asking.
    #[arg(short, long)]
    pub yes: bool,

    /// Print the view state as JSON instead of the text view.
    #[arg(long)]
    pub json: bool,

    /// Show the underlying reason when loading fails.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => {
                configure()?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Show(args) => show(args).await,
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

async fn show(args: ShowArgs) -> anyhow::Result<ExitCode> {
    let config = Config::load()?;
    let coords = pick_coordinates(&args, &config)?;
    let provider: Arc<dyn WeatherProvider> = Arc::from(provider_from_config(&config)?);

    let source: Arc<dyn LocationSource> = if args.yes {
        Arc::new(FixedLocation::granted(coords))
    } else {
        Arc::new(PermissionCache::new(PromptedLocation::new(coords)))
    };

    let opts = RenderOptions { verbose: args.verbose };
    if !args.json {
        eprint!("{}", render(&ViewState::Loading, opts));
    }

    // Dropping the task on Ctrl-C aborts the in-flight requests.
    let mut task = WeatherTask::spawn(source, provider);
    let state = tokio::select! {
        state = task.settled() => state,
        _ = tokio::signal::ctrl_c() => bail!("Cancelled"),
    };

    if args.json {
        let json = serde_json::to_string_pretty(&state).context("Failed to serialize view state")?;
        println!("{json}");
    } else {
        print!("{}", render(&state, opts));
    }

    Ok(match state {
        ViewState::Ready(_) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

/// Flags win over the config file.
fn pick_coordinates(args: &ShowArgs, config: &Config) -> anyhow::Result<Coordinates> {
    let coords = match (args.lat, args.lon, config.location) {
        (Some(lat), Some(lon), _) => Coordinates::new(lat, lon),
        (_, _, Some(stored)) => stored,
        _ => bail!(
            "No location available.\n\
             Hint: pass --lat and --lon, or run `weather configure` to store a default location."
        ),
    };

    if !coords.is_valid() {
        bail!("Coordinates out of range: {}", coords.to_query());
    }

    Ok(coords)
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = Password::new("AccuWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()?;
    if !key.trim().is_empty() {
        config.set_api_key(key.trim().to_string());
    }

    let current = config.location;
    let latitude = CustomType::<f64>::new("Default latitude:")
        .with_default(current.map_or(0.0, |c| c.latitude))
        .with_error_message("Please enter a number")
        .prompt()?;
    let longitude = CustomType::<f64>::new("Default longitude:")
        .with_default(current.map_or(0.0, |c| c.longitude))
        .with_error_message("Please enter a number")
        .prompt()?;

    let coords = Coordinates::new(latitude, longitude);
    if !coords.is_valid() {
        bail!("Coordinates out of range: {}", coords.to_query());
    }
    config.set_location(coords);

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show_args(argv: &[&str]) -> ShowArgs {
        let cli = Cli::try_parse_from(argv).expect("arguments should parse");
        match cli.command {
            Command::Show(args) => args,
            other => panic!("expected show, got {other:?}"),
        }
    }

    #[test]
    fn flags_override_configured_location() {
        let args = show_args(&["weather", "show", "--lat", "-33.9", "--lon", "18.4"]);
        let config = Config {
            location: Some(Coordinates::new(12.97, 77.59)),
            ..Config::default()
        };

        let coords = pick_coordinates(&args, &config).unwrap();
        assert_eq!(coords, Coordinates::new(-33.9, 18.4));
    }

    #[test]
    fn falls_back_to_configured_location() {
        let args = show_args(&["weather", "show", "--yes"]);
        assert!(args.yes);

        let config = Config {
            location: Some(Coordinates::new(12.97, 77.59)),
            ..Config::default()
        };
        assert_eq!(pick_coordinates(&args, &config).unwrap(), Coordinates::new(12.97, 77.59));
    }

    #[test]
    fn no_location_anywhere_is_an_error_with_hint() {
        let args = show_args(&["weather", "show"]);
        let err = pick_coordinates(&args, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("weather configure"));
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let args = show_args(&["weather", "show", "--lat", "95", "--lon", "0"]);
        let err = pick_coordinates(&args, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn lat_without_lon_does_not_parse() {
        assert!(Cli::try_parse_from(["weather", "show", "--lat", "1"]).is_err());
    }
}
