/// Ear Trainer - chord progression ear training in the terminal
use clap::{Args, Parser, Subcommand};
use ear_core::FixedKeySelector;
use ear_playback::{EndBehavior, PlaybackMode, PlaybackScheduler};
use ear_trainer::{
    describe_event, event_json, run_session, AppConfig, Command, ConsoleRenderer, Overrides,
};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ear-trainer")]
#[command(about = "Plays chord progressions in a random key and quizzes you on them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available progressions
    List {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// JSON catalog to use instead of the built-in progressions
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Play a progression (p = pause/resume, s = stop, r = restart, q = quit)
    Play(PlayArgs),
}

#[derive(Args)]
struct PlayArgs {
    /// Progression id (see `list`)
    progression: String,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// recognition (answer shown with the chord) or audiation (answer after)
    #[arg(short, long, value_parser = parse_mode)]
    mode: Option<PlaybackMode>,

    /// Leave out the bass doubling
    #[arg(long)]
    no_voice: bool,

    /// Play the chords without a melody tone
    #[arg(long, alias = "harmony-only")]
    only_harmony: bool,

    /// Print events as JSON lines instead of text
    #[arg(long)]
    json: bool,

    /// Tempo in beats per minute
    #[arg(short, long)]
    tempo: Option<u32>,

    /// Play in a fixed key such as `Am` or `Eb` instead of a random one
    #[arg(short, long)]
    key: Option<String>,

    /// What to do after the last chord: loop or stop
    #[arg(long = "end", value_parser = parse_end_behavior)]
    end_behavior: Option<EndBehavior>,

    /// JSON catalog to use instead of the built-in progressions
    #[arg(long)]
    catalog: Option<PathBuf>,
}

impl PlayArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            tempo_bpm: self.tempo,
            end_behavior: self.end_behavior,
            playback_mode: self.mode,
            no_voice: self.no_voice,
            harmony_only: self.only_harmony,
            key: self.key.clone(),
            catalog_path: self.catalog.clone(),
        }
    }
}

fn parse_mode(value: &str) -> Result<PlaybackMode, String> {
    PlaybackMode::from_str(value).ok_or_else(|| format!("unknown mode '{}'", value))
}

fn parse_end_behavior(value: &str) -> Result<EndBehavior, String> {
    EndBehavior::from_str(value).ok_or_else(|| format!("expected loop or stop, got '{}'", value))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ear_trainer=info,ear_playback=info,ear_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { config, catalog } => {
            list(config, catalog)?;
        }
        Commands::Play(args) => {
            play(args).await?;
        }
    }

    Ok(())
}

fn list(config_path: Option<PathBuf>, catalog_path: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = AppConfig::load(config_path.as_deref())?;
    config.apply(Overrides {
        catalog_path,
        ..Overrides::default()
    });
    config.validate()?;

    let catalog = config.load_catalog()?;
    for template in catalog.iter() {
        println!(
            "{:<16} {:<20} {} chords",
            template.id,
            template.display_name,
            template.slots.len()
        );
    }
    for error in catalog.rejected().values() {
        eprintln!("skipped: {}", error);
    }

    Ok(())
}

async fn play(args: PlayArgs) -> anyhow::Result<()> {
    // Load configuration
    let mut config = AppConfig::load(args.config.as_deref())?;
    config.apply(args.overrides());
    config.validate()?;

    let catalog = Arc::new(config.load_catalog()?);
    let mut scheduler = PlaybackScheduler::new(
        catalog,
        Box::new(ConsoleRenderer::new()),
        config.scheduler_config(),
    );
    if let Some(key) = config.fixed_key()? {
        scheduler = scheduler.with_key_selector(Box::new(FixedKeySelector(key)));
    }
    scheduler.set_playback_mode(config.playback_mode)?;
    scheduler.set_no_voice(config.no_voice)?;

    tracing::info!(
        "Tempo {} bpm, {} mode{}{}",
        config.tempo_bpm,
        config.playback_mode.as_str(),
        if config.no_voice { ", no voice" } else { "" },
        if config.harmony_only { ", harmony only" } else { "" }
    );

    // Terminal input runs on its own thread so a pending read never holds up
    // shutdown
    let (tx, rx) = mpsc::channel(16);

    // Ctrl-C quits cleanly; holding this sender also keeps the session alive
    // when stdin is not a terminal and hits EOF
    let quit_tx = tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = quit_tx.send(Command::Quit).await;
        }
    });

    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match Command::parse(&line) {
                Some(command) => {
                    if tx.blocking_send(command).is_err() {
                        break;
                    }
                }
                None => eprintln!("commands: p (pause/resume), s (stop), r (restart), q (quit)"),
            }
        }
    });

    let json = args.json;
    run_session(&mut scheduler, &args.progression, rx, |event| {
        if json {
            match event_json(event) {
                Ok(line) => println!("{}", line),
                Err(e) => tracing::warn!("Could not encode event: {}", e),
            }
        } else if let Some(line) = describe_event(event) {
            println!("{}", line);
        }
    })
    .await?;

    Ok(())
}
