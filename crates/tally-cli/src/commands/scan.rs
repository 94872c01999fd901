//! Scan command - read a receipt and extract its fields.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use tally_core::models::config::{OcrConfig, OcrProviderKind};
use tally_core::store::ExpenseStore;
use tally_core::{
    Category, Currency, FallbackRecognizer, LocalRecognizer, NewExpense, ParsedReceipt,
    ReceiptParser, TallyConfig,
};

use super::{load_config, open_ledger};
use crate::vision::VisionRecognizer;

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Receipt image, or a .txt file holding OCR output
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Record the scanned receipt as an expense
    #[arg(long)]
    save: bool,

    #[command(flatten)]
    overrides: SaveArgs,
}

/// Values used with `--save`, filling in or correcting scanned fields.
#[derive(Args)]
struct SaveArgs {
    /// Store name, replacing the scanned one
    #[arg(long, requires = "save")]
    store: Option<String>,

    /// Amount, replacing the scanned one
    #[arg(long, requires = "save")]
    amount: Option<Decimal>,

    /// Purchase date (YYYY-MM-DD, default today)
    #[arg(long, requires = "save")]
    date: Option<NaiveDate>,

    /// Currency (INR or USD, default from config)
    #[arg(long, requires = "save")]
    currency: Option<Currency>,

    /// Category (e.g. "Food & Dining", "groceries")
    #[arg(long, requires = "save")]
    category: Option<Category>,

    /// Split the bill between this many people
    #[arg(long, requires = "save")]
    split: Option<u32>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let extension = args
        .input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    info!("Scanning {}", args.input.display());

    let text = match extension.as_str() {
        "txt" => fs::read_to_string(&args.input)?,
        "png" | "jpg" | "jpeg" | "webp" | "bmp" | "tiff" | "gif" => {
            recognize_image(&args.input, &config.ocr).await?
        }
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    };

    let receipt = ReceiptParser::new()
        .with_max_items(config.extraction.max_items)
        .parse(&text);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&receipt)?),
        OutputFormat::Text => print!("{}", format_text(&receipt, config.display.currency)),
    }

    if args.save {
        save_receipt(&receipt, args.overrides, &config)?;
    }

    Ok(())
}

async fn recognize_image(path: &Path, config: &OcrConfig) -> anyhow::Result<String> {
    let image = fs::read(path)?;
    let chain = build_chain(config);

    if chain.is_empty() {
        anyhow::bail!(
            "No OCR provider is available.\n\n\
             Set a vision API key with 'tally config set ocr.vision_api_key <KEY>',\n\
             or place det.onnx, latin_rec.onnx and latin_dict.txt in {}.",
            config.model_dir.display()
        );
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Reading receipt ({})...", chain.provider_names().join(", ")));

    let result = chain.recognize(&image).await;
    pb.finish_and_clear();

    let recognized = result?;
    debug!(
        "{} returned {} characters",
        recognized.provider,
        recognized.text.len()
    );
    eprintln!(
        "{} Text read with {}",
        style("ℹ").blue(),
        recognized.provider
    );

    Ok(recognized.text)
}

fn build_chain(config: &OcrConfig) -> FallbackRecognizer {
    let mut chain = FallbackRecognizer::new();

    for kind in &config.providers {
        match kind {
            OcrProviderKind::Vision => match VisionRecognizer::from_config(config) {
                Ok(Some(provider)) => chain.push(Box::new(provider)),
                Ok(None) => debug!("No vision API key configured, skipping vision provider"),
                Err(e) => warn!("Vision provider unavailable: {}", e),
            },
            OcrProviderKind::Local => match LocalRecognizer::from_config(config) {
                Ok(provider) => chain.push(Box::new(provider)),
                Err(e) => warn!("Local OCR unavailable: {}", e),
            },
        }
    }

    chain
}

fn format_text(receipt: &ParsedReceipt, currency: Currency) -> String {
    let mut output = String::new();

    let store = receipt.store_name.as_deref().unwrap_or("-");
    output.push_str(&format!("Store:  {}\n", store));

    let amount = receipt
        .amount
        .map(|a| currency.format(a))
        .unwrap_or_else(|| "-".to_string());
    output.push_str(&format!("Amount: {}\n", amount));

    if !receipt.items.is_empty() {
        output.push_str("Items:\n");
        for item in &receipt.items {
            output.push_str(&format!("  - {}\n", item));
        }
    }

    for field in receipt.missing_fields() {
        output.push_str(&format!(
            "{} Could not detect {}, please enter it manually\n",
            style("!").yellow(),
            field
        ));
    }

    output
}

fn save_receipt(
    receipt: &ParsedReceipt,
    overrides: SaveArgs,
    config: &TallyConfig,
) -> anyhow::Result<()> {
    let date = overrides
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let currency = overrides.currency.unwrap_or(config.display.currency);

    let mut draft = NewExpense::from_receipt(receipt, date, currency);
    if let Some(store) = overrides.store {
        draft.store_name = store;
    }
    if overrides.amount.is_some() {
        draft.amount = overrides.amount;
    }
    draft.category = overrides.category;
    draft.split_with = overrides.split;

    if let Err(e) = draft.validate() {
        anyhow::bail!("Cannot save receipt: {}. Pass it with --store or --amount.", e);
    }

    let (mut store, session) = open_ledger(config)?;
    let expense = store.create(&session, draft)?;

    println!(
        "{} Saved expense {} ({} at {})",
        style("✓").green(),
        expense.id,
        expense.currency.format(expense.amount),
        expense.store_name
    );

    Ok(())
}
