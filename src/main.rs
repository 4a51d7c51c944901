use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use diary_share::compose::{ShareFormat, Typefaces};
use diary_share::config::{self, OutputEncoding};
use diary_share::dates::ShortDateFormatter;
use diary_share::logger::LogLogger;
use diary_share::output;
use diary_share::photo::FilePhoto;
use diary_share::render::{RenderEnv, render_share_image};
use diary_share::types::{DiaryEntry, PhotoHandle};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "diary-share")]
#[command(about = "Render photo diary entries into share images")]
#[command(long_about = "\
Render photo diary entries into share images

A share image is the entry's photos (up to three, cropped to fill) next to
or above its date, title and text. Long entries are shrunk to fit, then
truncated with an ellipsis. A small \"Made with Photo Diary\" stamp sits in
the bottom-right corner of the text area.

Formats:
  square        1080x1080   photos left, text right
  portrait      1080x1920   photos top, text bottom
  square-hd     2160x2160
  portrait-hd   2160x3840

Run 'diary-share gen-config' to generate a documented share.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (defaults are used when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Diary entry as JSON ({"title", "content", "date"}); replaces the text flags
    #[arg(long, conflicts_with_all = ["title", "content", "content_file", "date"])]
    entry: Option<PathBuf>,

    /// Entry title
    #[arg(long, default_value = "")]
    title: String,

    /// Entry text
    #[arg(long, conflicts_with = "content_file")]
    content: Option<String>,

    /// Read the entry text from a file
    #[arg(long)]
    content_file: Option<PathBuf>,

    /// Entry date, YYYY-MM-DD or YYYY-MM-DDTHH:MM[:SS] (default: now)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDateTime>,

    /// Photo file; repeat for up to three photos
    #[arg(long = "photo")]
    photos: Vec<PathBuf>,

    /// square, portrait, square-hd or portrait-hd
    #[arg(long, default_value_t = ShareFormat::Portrait)]
    format: ShareFormat,

    /// Output file (default: share-<format>.<ext>)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Override the config locale for the date label
    #[arg(long)]
    locale: Option<String>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Render a diary entry into a share image
    Render(RenderArgs),
    /// List the share formats and their pixel sizes
    Formats,
    /// Print a stock share.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Render(args) => render(args, cli.config.as_deref())?,
        Command::Formats => output::print_formats_table(),
        Command::GenConfig => print!("{}", config::stock_config_toml()),
    }

    Ok(())
}

fn render(args: RenderArgs, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = config::load_config(config_path)?;
    if let Some(locale) = args.locale {
        config.locale = locale;
        config.validate()?;
    }

    let diary = match &args.entry {
        Some(path) => serde_json::from_str::<DiaryEntry>(&std::fs::read_to_string(path)?)?,
        None => DiaryEntry {
            title: args.title,
            content: match (&args.content, &args.content_file) {
                (Some(text), _) => text.clone(),
                (None, Some(path)) => std::fs::read_to_string(path)?,
                (None, None) => String::new(),
            },
            date: args
                .date
                .unwrap_or_else(|| chrono::Local::now().naive_local()),
        },
    };

    let faces = Typefaces::load(
        config.fonts.regular.as_deref(),
        config.fonts.bold.as_deref(),
    )?;
    let files: Vec<FilePhoto> = args.photos.iter().map(FilePhoto::new).collect();
    let photos: Vec<&dyn PhotoHandle> = files.iter().map(|p| p as &dyn PhotoHandle).collect();
    let env = RenderEnv {
        config: &config,
        faces: &faces,
        logger: &LogLogger,
        dates: &ShortDateFormatter,
    };

    let image = render_share_image(&diary, &photos, args.format, &env)?;
    let path = args
        .output
        .unwrap_or_else(|| default_output(args.format, config.output.encoding));
    image.write_to(&path)?;

    if args.json {
        let summary = output::RenderSummary::new(args.format, &image, &path);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        output::print_render_summary(args.format, &image, &path);
    }
    Ok(())
}

fn default_output(format: ShareFormat, encoding: OutputEncoding) -> PathBuf {
    PathBuf::from(format!("share-{format}.{}", encoding.extension()))
}

fn parse_date(value: &str) -> Result<NaiveDateTime, String> {
    let value = value.trim();
    for pattern in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, pattern) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("invalid date '{value}' (expected YYYY-MM-DD[THH:MM[:SS]])"))
}
