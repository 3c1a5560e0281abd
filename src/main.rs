use anyhow::{anyhow, bail, Context, Result};
use log::{info, LevelFilter};
use map_annotate::capture::ShapeCapture;
use map_annotate::config::Config;
use map_annotate::controller::{Annotator, SubmitOutcome};
use map_annotate::geometry::{Geometry, RawShape};
use map_annotate::notify::{AssumeYes, Confirm, LogNotifier, TerminalConfirm};
use map_annotate::output::{write_view, Output};
use map_annotate::widget::HeadlessMap;
use map_annotate::{normalize, read_json_lines};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "map_annotate")]
/// Capture, normalize and submit shapes drawn on a map
struct Opt {
    /// Config file (toml)
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Backend base url, overrides config and environment
    #[structopt(short, long)]
    endpoint: Option<String>,

    /// More output, repeat for more
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(StructOpt, Debug)]
enum Command {
    /// Submit the last shape drawn in a recording of widget events
    Submit {
        /// Name of the shape
        #[structopt(short, long)]
        name: String,

        /// Do not ask for confirmation
        #[structopt(short, long)]
        yes: bool,

        /// Widget events as json lines, stdin if omitted or "-"
        #[structopt(parse(from_os_str))]
        input: Option<PathBuf>,
    },
    /// Print canonical geometries for widget events
    Normalize {
        /// Write a GeoJSON FeatureCollection instead of json lines
        #[structopt(short, long)]
        geojson: bool,

        #[structopt(parse(from_os_str))]
        input: Option<PathBuf>,
    },
    /// Load geometries on a map and print the resulting viewport
    View {
        #[structopt(parse(from_os_str))]
        input: Option<PathBuf>,
    },
}

fn reads_stdin(input: &Option<PathBuf>) -> bool {
    input.as_ref().map_or(true, |path| path.as_os_str() == "-")
}

fn open(input: &Option<PathBuf>) -> Result<Box<dyn BufRead>> {
    match input {
        Some(path) if !reads_stdin(input) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

fn load_config(opt: &Opt) -> Result<Config> {
    let mut config = match &opt.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    config.apply_env(|name| std::env::var(name).ok());
    if let Some(endpoint) = &opt.endpoint {
        config.endpoint = Some(endpoint.clone());
    }
    Ok(config)
}

async fn submit(config: Config, name: &str, yes: bool, input: &Option<PathBuf>) -> Result<()> {
    let events: Vec<RawShape> = read_json_lines(open(input)?)?;
    let confirm: Box<dyn Confirm> = if yes {
        Box::new(AssumeYes)
    } else {
        if reads_stdin(input) {
            bail!("reading events from stdin, pass --yes to submit without a prompt");
        }
        Box::new(TerminalConfirm::new(BufReader::new(io::stdin()), io::stderr()))
    };
    let store = config.store()?;
    let map = HeadlessMap::new(config.view, config.tiles.clone());
    let mut annotator = Annotator::new(map, Box::new(store), Box::new(LogNotifier), confirm)
        .with_clear_reset(config.clear_reset());

    for event in events.iter() {
        annotator.on_shape_created(event);
    }
    annotator.set_name(name);

    match annotator.submit().await? {
        SubmitOutcome::Created(confirmation) => {
            println!(
                "created {} with {} shape(s)",
                confirmation.name, confirmation.shapes
            );
        }
        SubmitOutcome::Declined => info!("nothing submitted"),
    }
    Ok(())
}

fn view(config: Config, input: &Option<PathBuf>) -> Result<()> {
    let geometries: Vec<Geometry> = read_json_lines(open(input)?)?;
    let mut capture = ShapeCapture::new(HeadlessMap::new(config.view, config.tiles.clone()));
    let layers = capture.load(&geometries);
    info!("loaded {} shape(s)", layers);
    write_view(&mut io::stdout(), capture.widget()).map_err(|e| anyhow!("{}", e))?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::from_args();

    let level = match opt.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let config = load_config(&opt)?;

    match &opt.cmd {
        Command::Submit { name, yes, input } => submit(config, name, *yes, input).await,
        Command::Normalize { geojson, input } => {
            let geometries = normalize(open(input)?)?;
            let mut stdout = io::stdout();
            let written = if *geojson {
                geometries.write_geojson(&mut stdout)
            } else {
                geometries.write_json_lines(&mut stdout)
            };
            written.map_err(|e| anyhow!("{}", e))
        }
        Command::View { input } => view(config, input),
    }
}
