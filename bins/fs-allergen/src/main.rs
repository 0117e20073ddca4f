//! fs-allergen: allergen detection for product ingredient lists.

mod logging;
mod output;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use foodshare_allergen::batch::{detect_batch, BatchItem, BatchSummary};
use foodshare_allergen::{
    AllergenProfile, DetectionReport, Detector, Ingredients, ProductDetails, ProductInfo, Safety,
};
use foodshare_core::config::{Config, ProfileConfig};
use foodshare_core::error::{exit_codes, Error, ResultExt};
use output::Status;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fs-allergen")]
#[command(about = "Allergen detection for product ingredient lists")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Default)]
struct ProfileArgs {
    /// Allergen profile JSON (`{"Milk": {"selected": true}}`)
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Select an allergen, adding it if missing (repeatable)
    #[arg(long = "select", value_name = "NAME")]
    select: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print normalized ingredient terms
    Normalize {
        /// Ingredient text (read from stdin when omitted)
        text: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a product document against a profile
    Detect {
        /// Product JSON (OpenFoodFacts response or bare product)
        #[arg(long)]
        product: PathBuf,
        /// Alternate product source used when the product has no ingredient text
        #[arg(long)]
        fallback: Option<PathBuf>,
        #[command(flatten)]
        profile: ProfileArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check raw ingredient text and tags against a profile
    Check {
        /// Ingredient text
        #[arg(long)]
        text: Option<String>,
        /// Allergen tag such as `en:milk` (repeatable)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
        #[command(flatten)]
        profile: ProfileArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check many product documents
    Batch {
        /// Product JSON files
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[command(flatten)]
        profile: ProfileArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Similarity score between two words
    Score {
        /// First word
        a: String,
        /// Second word
        b: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            Status::error(&err.to_string());
            std::process::exit(err.exit_code());
        }
    };

    logging::init(&config.schema.logging.level, cli.verbose)?;
    tracing::debug!(path = ?config.path, "Configuration loaded");

    let detector = Detector::from_config(&config.schema.detection);
    let profile_config = &config.schema.profile;

    let exit_code = match cli.command {
        Commands::Normalize { text, json } => finish(run_normalize(&detector, text, json), json),
        Commands::Detect { product, fallback, profile, json } => {
            let result = run_detect(
                &detector,
                &product,
                fallback.as_deref(),
                &profile,
                profile_config,
                json,
            );
            finish(result, json)
        }
        Commands::Check { text, tags, profile, json } => {
            let result = run_check(&detector, text.as_deref(), &tags, &profile, profile_config, json);
            finish(result, json)
        }
        Commands::Batch { files, profile, json } => {
            finish(run_batch(&detector, &files, &profile, profile_config, json), json)
        }
        Commands::Score { a, b, json } => finish(run_score(&detector, &a, &b, json), json),
    };

    std::process::exit(exit_code);
}

/// Report a command failure and map it to its exit code.
///
/// With `--json` the failure is printed as an error report document.
fn finish(result: foodshare_core::Result<i32>, json: bool) -> i32 {
    result.unwrap_or_else(|err| {
        match serde_json::to_string_pretty(&error_document(&err)) {
            Ok(doc) if json => println!("{}", doc),
            _ => Status::error(&err.to_string()),
        }
        err.exit_code()
    })
}

fn error_document(err: &Error) -> serde_json::Value {
    serde_json::json!({ "error": err.to_report() })
}

fn run_normalize(detector: &Detector, text: Option<String>, json: bool) -> foodshare_core::Result<i32> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(Error::from)
                .context("While reading ingredient text from stdin")?;
            buf
        }
    };

    let terms = detector.normalize_ingredients(Some(&text));
    if json {
        println!("{}", serde_json::to_string_pretty(&terms)?);
    } else {
        for term in &terms {
            println!("{}", term);
        }
    }
    Ok(exit_codes::SUCCESS)
}

fn run_detect(
    detector: &Detector,
    product: &Path,
    fallback: Option<&Path>,
    args: &ProfileArgs,
    config: &ProfileConfig,
    json: bool,
) -> foodshare_core::Result<i32> {
    let profile = load_profile(args, config)?;
    let mut details = load_product(product)?;
    if let Some(fallback) = fallback {
        details = details.with_ingredients_fallback(&load_product(fallback)?);
    }

    let report = detector.detect_product(&details, &profile);
    print_report(details.display_name(), &report, json)?;
    Ok(verdict_exit_code(report.safety))
}

fn run_check(
    detector: &Detector,
    text: Option<&str>,
    tags: &[String],
    args: &ProfileArgs,
    config: &ProfileConfig,
    json: bool,
) -> foodshare_core::Result<i32> {
    let profile = load_profile(args, config)?;
    let report = detector.report(Ingredients::from(text), &profile, tags);
    print_report("Ingredients", &report, json)?;
    Ok(verdict_exit_code(report.safety))
}

fn run_batch(
    detector: &Detector,
    files: &[PathBuf],
    args: &ProfileArgs,
    config: &ProfileConfig,
    json: bool,
) -> foodshare_core::Result<i32> {
    let profile = load_profile(args, config)?;

    let mut items = Vec::with_capacity(files.len());
    let mut skipped = 0;
    for path in files {
        match load_product(path) {
            Ok(product) => items.push(BatchItem {
                id: path.display().to_string(),
                product,
            }),
            Err(err) => {
                skipped += 1;
                Status::warning(&format!("Skipping {}: {}", path.display(), err.message));
            }
        }
    }

    let results = detect_batch(detector, &profile, &items);
    let summary = BatchSummary::from_results(&results);

    if json {
        let doc = serde_json::json!({
            "results": results,
            "summary": summary,
            "skipped": skipped,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        for result in &results {
            println!(
                "{}  {}  {}  {}",
                result.id,
                result.name,
                result.report.safety,
                output::format_allergens(&result.report.detected)
            );
        }
        Status::header("Summary");
        Status::success(&format!(
            "{} safe",
            output::format_count(summary.safe, "product", "products")
        ));
        if summary.not_safe > 0 {
            Status::warning(&format!(
                "{} not safe",
                output::format_count(summary.not_safe, "product", "products")
            ));
        }
        if summary.unknown > 0 {
            Status::warning(&format!(
                "{} without allergen information",
                output::format_count(summary.unknown, "product", "products")
            ));
        }
    }

    if items.is_empty() {
        return Ok(exit_codes::INPUT_ERROR);
    }
    if summary.not_safe + summary.unknown > 0 {
        return Ok(exit_codes::FAILURE);
    }
    Ok(exit_codes::SUCCESS)
}

fn run_score(detector: &Detector, a: &str, b: &str, json: bool) -> foodshare_core::Result<i32> {
    let matcher = detector.matcher();
    let score = matcher.score(&a.trim().to_lowercase(), &b.trim().to_lowercase());
    let within = score <= matcher.threshold();

    if json {
        let doc = serde_json::json!({
            "a": a,
            "b": b,
            "score": score,
            "threshold": matcher.threshold(),
            "within_threshold": within,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        println!("Score: {:.3}", score);
        println!("Threshold: {:.3}", matcher.threshold());
        if within {
            Status::success("Within fuzzy threshold");
        } else {
            Status::info("Outside fuzzy threshold");
        }
    }
    Ok(exit_codes::SUCCESS)
}

fn print_report(name: &str, report: &DetectionReport, json: bool) -> foodshare_core::Result<()> {
    if json {
        let doc = serde_json::json!({ "product": name, "report": report });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        output::report(name, report);
    }
    Ok(())
}

fn verdict_exit_code(safety: Safety) -> i32 {
    match safety {
        Safety::Safe => exit_codes::SUCCESS,
        Safety::NotSafe | Safety::Unknown => exit_codes::FAILURE,
    }
}

fn read_file(path: &Path) -> foodshare_core::Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::file_not_found(path)
        } else {
            Error::from(e).with_context(format!("While reading {}", path.display()))
        }
    })
}

/// Build the profile for a command.
///
/// A profile file replaces the configured defaults and selections; `--select`
/// applies on top of either.
fn load_profile(args: &ProfileArgs, config: &ProfileConfig) -> foodshare_core::Result<AllergenProfile> {
    let mut profile = match &args.profile {
        Some(path) => {
            let json = read_file(path)?;
            AllergenProfile::from_json(&json)
                .map_err(|e| Error::profile_parse(e.to_string()))
                .context(format!("While reading profile {}", path.display()))?
        }
        None => {
            let mut profile = if config.use_defaults {
                AllergenProfile::with_defaults()
            } else {
                AllergenProfile::new()
            };
            for name in &config.selected {
                profile.set_selected(name, true);
            }
            profile
        }
    };

    for name in &args.select {
        profile.set_selected(name, true);
    }

    tracing::debug!(selected = ?profile.selected_names(), "Profile loaded");
    Ok(profile)
}

/// Read a product document.
///
/// Accepts a lookup response (`{"product": {...}, "status": 1}`) or a bare
/// product object.
fn load_product(path: &Path) -> foodshare_core::Result<ProductDetails> {
    let json = read_file(path)?;
    let context = format!("While reading product {}", path.display());

    let info = ProductInfo::from_json(&json)
        .map_err(|e| Error::product_parse(e.to_string()))
        .context(context.clone())?;

    if info.product.is_none() && info.status.is_none() && info.status_verbose.is_none() {
        let bare: ProductDetails = serde_json::from_str(&json)
            .map_err(|e| Error::product_parse(e.to_string()))
            .context(context)?;
        return Ok(bare);
    }

    info.details()
        .cloned()
        .map_err(Error::from)
        .context(context)
}
