#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pagelens::browser::{Browser, BrowserType};
use pagelens::distill::{self, ActionTarget, ElementResolver};
use pagelens::errors::PagelensError;
use pagelens::snapshot::{self, PageSnapshot};
use pagelens::types::{DistillConfig, DistillResult, OutputFormat, ViewportSize};

#[derive(Parser)]
#[command(name = "pagelens")]
#[command(about = "Page distillation for LLM agents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConnectionOpts {
    /// Browser to use
    #[arg(short, long, default_value = "firefox")]
    browser: String,

    /// WebDriver endpoint (defaults to the browser's standard port)
    #[arg(long)]
    webdriver_url: Option<String>,

    /// Set viewport size (WIDTHxHEIGHT, e.g., 1920x1080)
    #[arg(long)]
    viewport: Option<String>,

    /// Run browser in visible mode (disables headless)
    #[arg(long = "no-headless")]
    no_headless: bool,
}

#[derive(Args)]
struct DistillOpts {
    /// Pixels of tolerance above and below the visible viewport
    #[arg(long, default_value_t = 1000.0)]
    buffer: f64,

    /// Maximum label length in characters
    #[arg(long, default_value_t = 100)]
    max_text: usize,

    /// Include hidden and off-screen elements
    #[arg(long)]
    include_hidden: bool,

    /// Minimum element width in pixels
    #[arg(long, default_value_t = 1.0)]
    min_width: f64,

    /// Minimum element height in pixels
    #[arg(long, default_value_t = 1.0)]
    min_height: f64,

    /// Per-frame evaluation timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    frame_timeout: u64,
}

impl DistillOpts {
    fn to_config(&self) -> DistillConfig {
        DistillConfig {
            viewport_buffer: self.buffer,
            max_text_length: self.max_text,
            include_hidden: self.include_hidden,
            min_width: self.min_width,
            min_height: self.min_height,
            frame_timeout_ms: self.frame_timeout,
        }
    }
}

#[derive(Args)]
struct TargetOpts {
    /// Identifier issued by the distillation pass this command runs
    #[arg(long)]
    id: Option<u32>,

    /// Fallback CSS selector addressing (main frame)
    #[arg(long)]
    selector: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Distill a page into numbered, addressable fragments
    Distill {
        /// URL to distill
        url: String,

        #[command(flatten)]
        conn: ConnectionOpts,

        #[command(flatten)]
        opts: DistillOpts,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,
    },

    /// Distill a page, falling back to a plain outline on failure
    Snapshot {
        /// URL to snapshot
        url: String,

        #[command(flatten)]
        conn: ConnectionOpts,

        #[command(flatten)]
        opts: DistillOpts,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,
    },

    /// Click an element
    Click {
        /// URL to navigate to
        url: String,

        #[command(flatten)]
        target: TargetOpts,

        #[command(flatten)]
        conn: ConnectionOpts,

        #[command(flatten)]
        opts: DistillOpts,
    },

    /// Type text into an element
    Type {
        /// URL to navigate to
        url: String,

        /// Text to type
        text: String,

        /// Clear the field before typing
        #[arg(long, default_value = "false")]
        clear: bool,

        #[command(flatten)]
        target: TargetOpts,

        #[command(flatten)]
        conn: ConnectionOpts,

        #[command(flatten)]
        opts: DistillOpts,
    },

    /// Hover over an element
    Hover {
        /// URL to navigate to
        url: String,

        #[command(flatten)]
        target: TargetOpts,

        #[command(flatten)]
        conn: ConnectionOpts,

        #[command(flatten)]
        opts: DistillOpts,
    },

    /// Select a value in a select element
    Select {
        /// URL to navigate to
        url: String,

        /// Option value to select
        value: String,

        #[command(flatten)]
        target: TargetOpts,

        #[command(flatten)]
        conn: ConnectionOpts,

        #[command(flatten)]
        opts: DistillOpts,
    },
}

const HOVER_SCRIPT: &str = r#"
    return (function(selector) {
        const el = document.querySelector(selector);
        if (!el) return false;
        el.dispatchEvent(new MouseEvent('mouseover', { bubbles: true }));
        el.dispatchEvent(new MouseEvent('mouseenter', { bubbles: false }));
        return true;
    })(arguments[0]);
"#;

const SELECT_SCRIPT: &str = r#"
    return (function(selector, value) {
        const el = document.querySelector(selector);
        if (!el) return false;
        el.value = value;
        el.dispatchEvent(new Event('input', { bubbles: true }));
        el.dispatchEvent(new Event('change', { bubbles: true }));
        return true;
    })(arguments[0], arguments[1]);
"#;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            let err = PagelensError::from(e);
            eprintln!("Error: {}", err);
            std::process::exit(err.exit_code());
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Distill {
            url,
            conn,
            opts,
            format,
        } => {
            let browser = connect(&conn).await?;
            let result = navigate_and_distill(&browser, &url, &opts.to_config()).await?;
            print_distillation(&result, format)?;
            browser.close().await
        }

        Commands::Snapshot {
            url,
            conn,
            opts,
            format,
        } => {
            let browser = connect(&conn).await?;
            validate_url(&url)?;
            browser.goto(&url).await?;
            let snap = snapshot::capture(&browser, &opts.to_config()).await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snap)?),
                OutputFormat::Simple => match &snap {
                    PageSnapshot::Distilled(result) => print_distillation(result, format)?,
                    PageSnapshot::Outline(outline) => {
                        println!("Outline of {} ({})", outline.title, outline.url);
                        for heading in &outline.headings {
                            println!("  {}", heading);
                        }
                    }
                },
            }
            browser.close().await
        }

        Commands::Click {
            url,
            target,
            conn,
            opts,
        } => {
            let target = ActionTarget::from_flags(target.id, target.selector)?;
            let browser = connect(&conn).await?;
            let pass = prepare_action(&browser, &url, &target, &opts.to_config()).await?;
            let resolver = ElementResolver::new(&browser, &pass);
            let element = resolver.locate(&target).await?;
            element.click().await.context("Failed to click element")?;
            println!("{}", json!({ "status": "clicked" }));
            browser.close().await
        }

        Commands::Type {
            url,
            text,
            clear,
            target,
            conn,
            opts,
        } => {
            let target = ActionTarget::from_flags(target.id, target.selector)?;
            let browser = connect(&conn).await?;
            let pass = prepare_action(&browser, &url, &target, &opts.to_config()).await?;
            let resolver = ElementResolver::new(&browser, &pass);
            let element = resolver.locate(&target).await?;
            if clear {
                element.clear().await.context("Failed to clear field")?;
            }
            element
                .send_keys(&text)
                .await
                .context("Failed to type into element")?;
            println!("{}", json!({ "status": "typed", "chars": text.len() }));
            browser.close().await
        }

        Commands::Hover {
            url,
            target,
            conn,
            opts,
        } => {
            let target = ActionTarget::from_flags(target.id, target.selector)?;
            let browser = connect(&conn).await?;
            let pass = prepare_action(&browser, &url, &target, &opts.to_config()).await?;
            let selector = in_frame_selector(&browser, &pass, &target).await?;
            let hovered = browser
                .execute(HOVER_SCRIPT, vec![json!(&selector)])
                .await?
                .as_bool()
                .unwrap_or(false);
            if !hovered {
                anyhow::bail!("Element not found: {}", selector);
            }
            println!("{}", json!({ "status": "hovered" }));
            browser.close().await
        }

        Commands::Select {
            url,
            value,
            target,
            conn,
            opts,
        } => {
            let target = ActionTarget::from_flags(target.id, target.selector)?;
            let browser = connect(&conn).await?;
            let pass = prepare_action(&browser, &url, &target, &opts.to_config()).await?;
            let selector = in_frame_selector(&browser, &pass, &target).await?;
            let selected = browser
                .execute(SELECT_SCRIPT, vec![json!(&selector), json!(&value)])
                .await?
                .as_bool()
                .unwrap_or(false);
            if !selected {
                anyhow::bail!("Element not found: {}", selector);
            }
            println!("{}", json!({ "status": "selected", "value": value }));
            browser.close().await
        }
    }
}

async fn connect(conn: &ConnectionOpts) -> Result<Browser> {
    let browser_type: BrowserType = conn.browser.parse()?;
    let viewport = conn
        .viewport
        .as_deref()
        .map(ViewportSize::parse)
        .transpose()?;
    Browser::new(
        browser_type,
        conn.webdriver_url.clone(),
        viewport,
        !conn.no_headless,
    )
    .await
}

fn validate_url(url: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid URL: {}", url))?;
    Ok(())
}

async fn navigate_and_distill(
    browser: &Browser,
    url: &str,
    config: &DistillConfig,
) -> Result<DistillResult> {
    validate_url(url)?;
    browser.goto(url).await?;
    distill::distill(browser, config).await
}

/// Actions addressed by identifier run a fresh distillation pass first;
/// identifiers are only valid against the pass that issued them. Selector
/// addressing skips the pass.
async fn prepare_action(
    browser: &Browser,
    url: &str,
    target: &ActionTarget,
    config: &DistillConfig,
) -> Result<DistillResult> {
    validate_url(url)?;
    browser.goto(url).await?;
    match target {
        ActionTarget::Id(_) => distill::distill(browser, config).await,
        ActionTarget::Selector(_) => Ok(empty_pass()),
    }
}

fn empty_pass() -> DistillResult {
    DistillResult {
        elements: Vec::new(),
        text: String::new(),
        discovered: 0,
        retained: 0,
        warnings: Vec::new(),
    }
}

/// CSS selector usable in the session's current frame context for the
/// target: the marker attribute for identifiers (after resolving, which
/// switches into the owning frame), or the user's selector at the top
/// frame.
async fn in_frame_selector(
    browser: &Browser,
    pass: &DistillResult,
    target: &ActionTarget,
) -> Result<String> {
    match target {
        ActionTarget::Id(id) => {
            let resolver = ElementResolver::new(browser, pass);
            resolver.resolve(*id).await?;
            Ok(format!("[{}=\"{}\"]", distill::MARKER_ATTR, id))
        }
        ActionTarget::Selector(selector) => {
            browser.switch_to_top().await?;
            Ok(selector.clone())
        }
    }
}

fn print_distillation(result: &DistillResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
        OutputFormat::Simple => {
            println!(
                "{} element(s) retained of {} discovered",
                result.retained, result.discovered
            );
            for warning in &result.warnings {
                println!("warning [{}]: {}", warning.frame, warning.message);
            }
            if !result.text.is_empty() {
                println!("{}", result.text);
            }
        }
    }
    Ok(())
}
