#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use presentation_settings::config::settings_path;
use presentation_settings::constants::audio::{MAX_SLIDER_VOLUME, MIN_SLIDER_VOLUME};
use presentation_settings::constants::display::DEFAULT_MODES;
use presentation_settings::{
    resolve_index, AspectRatio, DetailLevel, DisplayHost, FileStore, FsFileStore, HeadlessDisplay, MemoryFileStore,
    MixerLevels, Resolution, SettingsRecord, SettingsStore,
};

/// Inspect and change persisted presentation settings
#[derive(Parser, Debug)]
#[command(name = "presentation-settings", version)]
struct Cli {
    /// Settings file (defaults to the platform config dir)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Display mode reported by the host, in ascending order (repeatable)
    #[arg(long = "mode", global = true, value_name = "WxH")]
    modes: Vec<Resolution>,

    /// Current display mode (defaults to the last --mode)
    #[arg(long, global = true, value_name = "WxH")]
    current: Option<Resolution>,

    /// Host starts in full screen
    #[arg(long, global = true)]
    fullscreen: bool,

    /// Never write the settings file
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the current settings and the resolution options
    Show,
    /// Print the resolution ladder and the level mapping
    Ladder,
    /// Apply every persisted setting to the host
    Apply,
    /// Change one setting
    Set {
        #[command(subcommand)]
        setting: Setting,
    },
    /// Overwrite the settings file with defaults
    Reset,
}

#[derive(Subcommand, Debug)]
enum Setting {
    Music {
        #[arg(allow_negative_numbers = true, value_parser = parse_finite)]
        volume: f32,
    },
    Sound {
        #[arg(allow_negative_numbers = true, value_parser = parse_finite)]
        volume: f32,
    },
    /// max, high, middle or low
    Resolution { level: DetailLevel },
    Fullscreen {
        #[arg(action = ArgAction::Set)]
        enabled: bool,
    },
    PostProcessing {
        #[arg(action = ArgAction::Set)]
        enabled: bool,
    },
    /// Applied for this run only, never persisted
    Brightness {
        #[arg(allow_negative_numbers = true, value_parser = parse_finite)]
        value: f32,
    },
}

/// Non-finite values would be written as `null` and make the whole file
/// unreadable on the next start
fn parse_finite(s: &str) -> Result<f32> {
    let value: f32 = s.trim().parse().with_context(|| format!("invalid number '{s}'"))?;
    if !value.is_finite() {
        anyhow::bail!("'{s}' is not a finite number");
    }
    Ok(value)
}

fn init_logging() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to install tracing subscriber")
}

fn build_display(cli: &Cli) -> HeadlessDisplay {
    let modes = if cli.modes.is_empty() {
        DEFAULT_MODES.iter().map(|&(w, h)| Resolution::new(w, h)).collect()
    } else {
        cli.modes.clone()
    };
    let current = cli
        .current
        .or_else(|| modes.last().copied())
        .unwrap_or(Resolution::new(0, 0));
    HeadlessDisplay::new(modes, current, cli.fullscreen)
}

/// In-memory copy of the settings file so a dry run sees the real contents
fn dry_run_files(path: &Path) -> MemoryFileStore {
    let disk = FsFileStore;
    if !disk.exists(path) {
        return MemoryFileStore::new();
    }
    match disk.read_all(path) {
        Ok(bytes) => MemoryFileStore::new().with_file(path, bytes),
        Err(e) => {
            warn!(error = %format!("{e:#}"), "Dry run could not read the settings file");
            MemoryFileStore::new()
        }
    }
}

fn print_record(record: &SettingsRecord) {
    println!("music volume:    {}", record.music_volume);
    println!("sound volume:    {}", record.sound_volume);
    println!("resolution:      {}", record.resolution_level);
    println!("full screen:     {}", record.full_screen);
    println!("post-processing: {}", record.post_processing);
}

fn run<F: FileStore>(command: Command, mut store: SettingsStore<HeadlessDisplay, MixerLevels, F>) -> Result<()> {
    let _events = store.subscribe(|event| info!(?event, "settings event"));

    match command {
        Command::Show => {
            println!("settings file:   {}", store.path().display());
            print_record(store.record());
            let options = store.resolution_options();
            if options.is_empty() {
                println!("resolution options: none (using {})", store.display().current_resolution());
            } else {
                println!("resolution options:");
                for option in options {
                    println!("  {option}");
                }
            }
        }
        Command::Ladder => {
            let ladder = store.ladder();
            match store.display().supported_resolutions().last().copied().and_then(AspectRatio::of) {
                Some(ratio) => println!("reference ratio: {ratio} ({:.3})", ratio.as_f32()),
                None => println!("reference ratio: none"),
            }
            for (index, entry) in ladder.entries().iter().enumerate() {
                println!("  [{index}] {entry} ({} px)", entry.pixel_count());
            }
            for level in DetailLevel::ALL {
                let resolution = store.resolution_for(level);
                if ladder.is_empty() {
                    println!("{level:>6} -> {resolution} (fallback)");
                } else {
                    println!("{level:>6} -> [{}] {resolution}", resolve_index(level, ladder.len()));
                }
            }
        }
        Command::Apply => {
            store.apply_all();
            println!("applied {} at {}", store.record().resolution_level, store.display().current_resolution());
            for (channel, decibels) in store.audio().channels() {
                println!("  {channel}: {decibels:.2} dB");
            }
        }
        Command::Set { setting } => match setting {
            Setting::Music { volume } => {
                warn_volume_range(volume);
                store.set_music_volume(volume);
            }
            Setting::Sound { volume } => {
                warn_volume_range(volume);
                store.set_sound_volume(volume);
            }
            Setting::Resolution { level } => store.set_resolution_level(level),
            Setting::Fullscreen { enabled } => store.set_full_screen(enabled),
            Setting::PostProcessing { enabled } => store.set_post_processing(enabled),
            Setting::Brightness { value } => {
                store.set_brightness(value);
                println!("brightness: {}", store.display().brightness());
            }
        },
        Command::Reset => {
            let defaults = SettingsRecord::defaults(store.display().is_full_screen());
            store
                .save(&defaults)
                .with_context(|| format!("Failed to reset {}", store.path().display()))?;
            store.reload();
            print_record(store.record());
        }
    }

    Ok(())
}

/// The store takes any value; sliders are expected to stay in range
fn warn_volume_range(volume: f32) {
    if !(MIN_SLIDER_VOLUME..=MAX_SLIDER_VOLUME).contains(&volume) {
        warn!(volume, min = MIN_SLIDER_VOLUME, max = MAX_SLIDER_VOLUME, "Volume outside slider range, storing as given");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let path = cli.config.clone().unwrap_or_else(settings_path);
    let host = build_display(&cli);
    let mode_count = host.supported_resolutions().len();
    info!(path = %path.display(), modes = mode_count, "starting");

    if cli.dry_run {
        let files = dry_run_files(&path);
        run(cli.command, SettingsStore::open(path, host, MixerLevels::new(), files))
    } else {
        run(cli.command, SettingsStore::open(path, host, MixerLevels::new(), FsFileStore))
    }
}
