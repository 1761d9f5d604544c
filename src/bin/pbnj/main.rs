use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use spdlog::{info, warn};

use pbnj::client::export_client::ExportClient;
use pbnj::client::http_client::HttpContentClient;
use pbnj::client::ContentClient;
use pbnj::config::Config;
use pbnj::image_url::{FitMode, ImageFormat, ImageUrls};
use pbnj::load_query::QueryLoader;
use pbnj::logger::configure_logger;
use pbnj::presentation::{resolve_locations, studio_config};
use pbnj::queries::{load_all_posts, load_post_by_slug};
use pbnj::schema::{schema, MarkerLevel};
use pbnj::view::list_renderer::ListRenderer;
use pbnj::view::post_renderer::PostRenderer;
use pbnj::view::{DEFAULT_LIST_TPL, DEFAULT_POST_TPL};

use crate::config::open_config;

mod config;

const CFG_FILE_NAME: &str = "pbnj.toml";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config path
    #[arg(short, long)]
    config_path: Option<String>,

    /// Answer queries from a dataset export (ndjson) instead of the API
    #[arg(short, long)]
    export: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prints the studio schema as json
    Schema,
    /// Prints the studio configuration as json
    Studio,
    /// Lists all posts, newest first
    Posts(RenderArgs),
    /// Shows a single post
    Post {
        #[arg(short, long)]
        slug: String,
        #[command(flatten)]
        render: RenderArgs,
    },
    /// Builds a CDN url for an image asset id or url
    ImageUrl(ImageUrlArgs),
    /// Prints the site locations of a document (json file)
    Locations { document: PathBuf },
    /// Validates every document of a dataset export against the schema
    Check { export: PathBuf },
}

#[derive(clap::Args, Debug)]
struct RenderArgs {
    /// Render html instead of printing the query result
    #[arg(long)]
    html: bool,

    /// Template used with --html
    #[arg(short, long)]
    template: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct ImageUrlArgs {
    /// Asset id (image-<id>-<w>x<h>-<ext>) or CDN url
    source: String,
    #[arg(short, long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    #[arg(short, long)]
    format: Option<FormatArg>,
    #[arg(short, long)]
    quality: Option<u8>,
    #[arg(long)]
    fit: Option<FitArg>,
    /// Let the CDN pick the best format for the client
    #[arg(short, long)]
    auto_format: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Jpg,
    Pjpg,
    Png,
    Webp,
}

impl From<FormatArg> for ImageFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Jpg => ImageFormat::Jpg,
            FormatArg::Pjpg => ImageFormat::Pjpg,
            FormatArg::Png => ImageFormat::Png,
            FormatArg::Webp => ImageFormat::Webp,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FitArg {
    Clip,
    Crop,
    Fill,
    Fillmax,
    Max,
    Scale,
    Min,
}

impl From<FitArg> for FitMode {
    fn from(value: FitArg) -> Self {
        match value {
            FitArg::Clip => FitMode::Clip,
            FitArg::Crop => FitMode::Crop,
            FitArg::Fill => FitMode::Fill,
            FitArg::Fillmax => FitMode::FillMax,
            FitArg::Max => FitMode::Max,
            FitArg::Scale => FitMode::Scale,
            FitArg::Min => FitMode::Min,
        }
    }
}

fn read_template(path: &Option<PathBuf>, default: &str) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Could not read template {}", path.display())),
        None => Ok(default.to_string()),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_posts<C: ContentClient>(loader: &QueryLoader<C>, config: &Config, args: &RenderArgs) -> Result<()> {
    let loaded = load_all_posts(loader).await?;
    info!("Loaded {} posts with perspective={}", loaded.data.len(), loaded.perspective);

    if !args.html {
        return print_json(&loaded.data);
    }

    let template = read_template(&args.template, DEFAULT_LIST_TPL)?;
    let images = ImageUrls::new(&config.sanity);
    let renderer = ListRenderer::new(&template, &images, &config.site.base)?;
    println!("{}", renderer.render(&loaded.data));
    Ok(())
}

async fn run_post<C: ContentClient>(loader: &QueryLoader<C>, config: &Config, slug: &str, args: &RenderArgs) -> Result<()> {
    let loaded = load_post_by_slug(loader, slug).await?;
    let Some(post) = loaded.data else {
        bail!("No post with slug '{}'", slug);
    };

    if !args.html {
        return print_json(&post);
    }

    let template = read_template(&args.template, DEFAULT_POST_TPL)?;
    let images = ImageUrls::new(&config.sanity);
    let renderer = PostRenderer::new(&template, &images)?;
    println!("{}", renderer.render(&post));
    Ok(())
}

fn loader<C: ContentClient>(client: C, config: &Config) -> QueryLoader<C> {
    QueryLoader::new(client, Arc::new(config.sanity.clone()))
}

fn image_url(config: &Config, args: &ImageUrlArgs) -> Result<String> {
    let images = ImageUrls::new(&config.sanity);
    let mut builder = images.image(args.source.as_str());
    if let Some(width) = args.width {
        builder = builder.width(width);
    }
    if let Some(height) = args.height {
        builder = builder.height(height);
    }
    if let Some(format) = args.format {
        builder = builder.format(format.into());
    }
    if let Some(quality) = args.quality {
        builder = builder.quality(quality);
    }
    if let Some(fit) = args.fit {
        builder = builder.fit(fit.into());
    }
    if args.auto_format {
        builder = builder.auto_format();
    }
    Ok(builder.url()?)
}

fn check_export(path: &Path) -> Result<()> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read export {}", path.display()))?;

    let documents = content.lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(idx, line)| serde_json::from_str::<Value>(line)
            .with_context(|| format!("Invalid json on line {}", idx + 1)))
        .collect::<Result<Vec<_>>>()?;

    let markers = schema().validate_dataset(&documents);
    for m in markers.iter() {
        println!("{} {:?} {}: {}", m.id, m.marker.level, m.marker.path, m.marker.message);
    }

    info!("Checked {} documents", documents.len());
    let errors = markers.iter().filter(|m| m.marker.level == MarkerLevel::Error).count();
    if errors > 0 {
        bail!("{} validation errors", errors);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    // stdout is reserved for command output until the configured logger is in place
    if let Err(err) = configure_logger(&Config::default()) {
        eprintln!("Error creating console logger. Desc={}", err);
    }
    let config = open_config(args.config_path.map(PathBuf::from))?;

    if let Err(err) = configure_logger(&config) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    match args.command {
        Command::Schema => println!("{}", schema().to_studio_json()?),
        Command::Studio => print_json(&studio_config(&config))?,
        Command::ImageUrl(ref image_args) => println!("{}", image_url(&config, image_args)?),
        Command::Locations { ref document } => {
            let content = fs::read_to_string(document)
                .with_context(|| format!("Could not read {}", document.display()))?;
            let document: Value = serde_json::from_str(&content)?;
            print_json(&resolve_locations(&document))?;
        }
        Command::Check { ref export } => check_export(export)?,
        Command::Posts(ref render) => match args.export {
            Some(ref export) => run_posts(&loader(ExportClient::open(export)?, &config), &config, render).await?,
            None => run_posts(&loader(HttpContentClient::new(&config.sanity)?, &config), &config, render).await?,
        },
        Command::Post { ref slug, ref render } => match args.export {
            Some(ref export) => run_post(&loader(ExportClient::open(export)?, &config), &config, slug, render).await?,
            None => run_post(&loader(HttpContentClient::new(&config.sanity)?, &config), &config, slug, render).await?,
        },
    }

    Ok(())
}
