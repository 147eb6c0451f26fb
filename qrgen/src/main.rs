use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use qr_core::render::{ChartApiEncoder, NativeEncoder, QrServerEncoder};
use qr_core::{ContactRecord, EncoderChain, FormSession, Locale, Messages, Mode, RenderRequest};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod preview;

/// Generate QR codes for URLs, text, and contact information
#[derive(Parser)]
#[command(name = "qrgen", version)]
struct Cli {
    /// UI locale tag (en-US or vi-VN; language prefixes accepted)
    #[arg(long, global = true, env = "QRGEN_LOCALE")]
    locale: Option<String>,
    /// Directory the PNG is written to
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,
    /// Copy the payload text to the system clipboard
    #[arg(long, global = true)]
    copy: bool,
    /// Print a scannable QR code to the terminal
    #[arg(long, global = true)]
    preview: bool,
    /// Print the payload text only; skip rendering and saving
    #[arg(long, global = true)]
    payload_only: bool,
    /// Pin rendering to a single encoder tier instead of the fallback chain
    #[arg(long, global = true, value_enum)]
    encoder: Option<EncoderChoice>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode a website URL (https:// is added when the scheme is missing)
    Url { url: String },
    /// Encode free-form text
    Text { text: String },
    /// Encode contact details as a vCard
    Contact {
        #[command(flatten)]
        fields: ContactOpts,
        /// Read contact fields from a TOML file; flags override file values
        #[arg(long, value_name = "FILE")]
        from_file: Option<PathBuf>,
    },
}

impl Command {
    fn mode(&self) -> Mode {
        match self {
            Command::Url { .. } => Mode::Url,
            Command::Text { .. } => Mode::Text,
            Command::Contact { .. } => Mode::Contact,
        }
    }
}

#[derive(Args, Clone, Default)]
struct ContactOpts {
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    organization: Option<String>,
    /// Contact website URL
    #[arg(long)]
    url: Option<String>,
}

impl ContactOpts {
    fn apply(&self, record: &mut ContactRecord) {
        if let Some(v) = &self.first_name {
            record.first_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            record.last_name = v.clone();
        }
        if let Some(v) = &self.phone {
            record.phone = v.clone();
        }
        if let Some(v) = &self.email {
            record.email = v.clone();
        }
        if let Some(v) = &self.organization {
            record.organization = v.clone();
        }
        if let Some(v) = &self.url {
            record.url = v.clone();
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EncoderChoice {
    Native,
    Chart,
    Qrserver,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_chain(choice: Option<EncoderChoice>, config: &config::Config) -> EncoderChain {
    match choice {
        None => EncoderChain::standard(
            config.chart_endpoint.as_deref(),
            config.qr_server_endpoint.as_deref(),
        ),
        Some(EncoderChoice::Native) => EncoderChain::single(Box::new(NativeEncoder)),
        Some(EncoderChoice::Chart) => EncoderChain::single(Box::new(
            config
                .chart_endpoint
                .as_deref()
                .map(ChartApiEncoder::new)
                .unwrap_or_default(),
        )),
        Some(EncoderChoice::Qrserver) => EncoderChain::single(Box::new(
            config
                .qr_server_endpoint
                .as_deref()
                .map(QrServerEncoder::new)
                .unwrap_or_default(),
        )),
    }
}

fn fill_session(session: &mut FormSession, command: &Command) -> Result<RenderRequest> {
    Ok(match command {
        Command::Url { url } => session.set_url(url.clone()),
        Command::Text { text } => session.set_text(text.clone()),
        Command::Contact { fields, from_file } => {
            let mut record = match from_file {
                Some(path) => {
                    let raw = fs::read_to_string(path)
                        .with_context(|| format!("reading contact file {}", path.display()))?;
                    toml::from_str(&raw)
                        .with_context(|| format!("parsing contact file {}", path.display()))?
                }
                None => ContactRecord::default(),
            };
            fields.apply(&mut record);
            session.set_contact(record)
        }
    })
}

fn copy_to_clipboard(payload: &str, messages: &Messages) {
    let written = arboard::Clipboard::new().and_then(|mut cb| cb.set_text(payload.to_string()));
    match written {
        Ok(()) => println!("{}", messages.copied),
        // No user-facing error; the confirmation is simply not shown.
        Err(e) => warn!(error = %e, "clipboard write failed"),
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = config::load()?;
    let locale = cli
        .locale
        .as_deref()
        .or(config.locale.as_deref())
        .map(Locale::matching)
        .unwrap_or_default();
    let messages = locale.messages();
    debug!(locale = %locale, "locale resolved");

    let mut session = FormSession::new(cli.command.mode());
    let request = fill_session(&mut session, &cli.command)?;

    if request.payload.is_empty() {
        println!("{}", messages.fill_form_prompt);
        return Ok(());
    }

    if cli.payload_only {
        println!("{}", request.payload);
        if cli.copy {
            copy_to_clipboard(&request.payload, messages);
        }
        return Ok(());
    }

    let chain = build_chain(cli.encoder, &config);
    let rendered = chain.render(&request.payload)?;
    if !session.is_current(request.generation) {
        // A later edit superseded this render; drop the stale result.
        return Ok(());
    }
    debug!(encoder = %rendered.encoder, "render complete");

    let out_dir = cli
        .output
        .or(config.output_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&out_dir)?;
    let path = out_dir.join(format!("qr-code-{}.png", session.mode().as_str()));
    fs::write(&path, &rendered.png)?;

    if cli.preview {
        println!("{}", messages.generated_qr_code);
        println!("{}", preview::unicode_qr(&request.payload)?);
        println!("{}", messages.scan_qr_code);
    }
    println!("{} {}", messages.download, path.display());
    println!("{}", messages.qr_code_data);
    println!("{}", request.payload);

    if cli.copy {
        copy_to_clipboard(&request.payload, messages);
    }

    Ok(())
}
