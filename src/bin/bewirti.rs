//! Bewirti CLI tool
//!
//! Command-line front end for generating hospitality receipts.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bewirti::date::{parse_date_expression, resolve_date};
use bewirti::pipeline::DEFAULT_LOGO_PATH;
use bewirti::{generate_receipt, Amount, Error, ReceiptForm, ReceiptOptions, UploadedFile};

/// Bewirti - Der Bewirtungsbeleg Buddy
#[derive(Parser)]
#[command(name = "bewirti")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Receipt with an uploaded PDF invoice
    bewirti build --reason \"Projektabschluss\" --date 2024-03-07 \\
        --attendee \"Anna Schmidt\" --attendee \"Bernd Meier\" \\
        --amount 12.50 --tip 2 --receipt rechnung.pdf

    # Receipt with a photo of the bill, dated last Friday, without logo
    bewirti build --reason \"Kundentermin\" --date freitag --attendees-file gaeste.txt \\
        --amount 48,90 --photo beleg.jpg --no-logo -o beleg.pdf --open

    # Inspect a generated receipt
    bewirti info bewirtungsbeleg.pdf")]
struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a hospitality receipt PDF
    Build(BuildArgs),

    /// Show information about a PDF file
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },
}

#[derive(Args)]
struct BuildArgs {
    /// Occasion of the hospitality (Anlass der Bewirtung)
    #[arg(long, default_value = "")]
    reason: String,

    /// Day of the hospitality (e.g. "today", "gestern", "freitag", "2024-03-07", "07.03.2024")
    #[arg(long, default_value = "today")]
    date: String,

    /// Attendee name, repeat for each person
    #[arg(long = "attendee")]
    attendees: Vec<String>,

    /// File with one attendee per line
    #[arg(long)]
    attendees_file: Option<PathBuf>,

    /// Amount of the bill, e.g. 12.50 or 12,50
    #[arg(long, value_parser = parse_amount)]
    amount: Amount,

    /// Tip
    #[arg(long, default_value = "0", value_parser = parse_amount)]
    tip: Amount,

    /// Existing receipt to attach (PDF or image)
    #[arg(long, conflicts_with = "photo")]
    receipt: Option<PathBuf>,

    /// Photo of the receipt
    #[arg(long)]
    photo: Option<PathBuf>,

    /// Logo shown in the top-right corner of the summary page
    #[arg(long, env = "BEWIRTI_LOGO", default_value = DEFAULT_LOGO_PATH)]
    logo: PathBuf,

    /// Leave the logo out
    #[arg(long)]
    no_logo: bool,

    /// Output PDF file path
    #[arg(short, long, default_value = "bewirtungsbeleg.pdf")]
    output: PathBuf,

    /// Open the output file after creation
    #[arg(long)]
    open: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let result = match cli.command {
        Commands::Build(args) => cmd_build(args),
        Commands::Info { input } => cmd_info(input),
    };

    if let Err(e) = result {
        if let Some(Error::Validation(errors)) = e.downcast_ref::<Error>() {
            for message in errors.messages() {
                eprintln!("{}", message);
            }
        } else {
            eprintln!("Error: {:#}", e);
        }
        process::exit(1);
    }
}

fn init_logger(verbose: bool) {
    let default_filter = if verbose { "bewirti=debug" } else { "bewirti=error" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

/// Open a file with the system default application
fn open_file(path: &Path) -> anyhow::Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(path)
            .spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(path)
            .spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", &path.display().to_string()])
            .spawn()?;
    }
    Ok(())
}

fn parse_amount(s: &str) -> Result<Amount, String> {
    Amount::parse(s).map_err(|e| e.to_string())
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()).into());
    }
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Collect the form from the command line and generate the receipt
fn cmd_build(args: BuildArgs) -> anyhow::Result<()> {
    let date = resolve_date(&parse_date_expression(&args.date)?)?;

    let mut attendee_lines = args.attendees;
    if let Some(path) = &args.attendees_file {
        let text = String::from_utf8(read_input(path)?)
            .with_context(|| format!("{} is not valid UTF-8", path.display()))?;
        attendee_lines.extend(text.lines().map(str::to_string));
    }

    let uploaded_file = match &args.receipt {
        Some(path) => Some(UploadedFile {
            name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            bytes: read_input(path)?,
        }),
        None => None,
    };
    let captured_photo = match &args.photo {
        Some(path) => Some(read_input(path)?),
        None => None,
    };

    let form = ReceiptForm {
        reason: args.reason,
        date,
        attendees: attendee_lines.join("\n"),
        amount: args.amount,
        tip: args.tip,
        include_logo: !args.no_logo,
        captured_photo,
        uploaded_file,
    };
    let options = ReceiptOptions { logo_path: args.logo };

    let receipt = generate_receipt(form, &options)?;

    for warning in &receipt.warnings {
        eprintln!("Warning: {}", warning);
    }

    std::fs::write(&args.output, &receipt.bytes)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    eprintln!("{}", receipt.message);
    eprintln!("Output: {} ({} pages)", args.output.display(), receipt.page_count);

    if args.open {
        open_file(&args.output)?;
    }

    Ok(())
}

/// Show information about a PDF
fn cmd_info(input: PathBuf) -> anyhow::Result<()> {
    let metadata = bewirti::pdf::extract_metadata(&input)?;

    println!("File: {}", input.display());
    println!("Pages: {}", metadata.page_count);

    if let Some(title) = metadata.title {
        println!("Title: {}", title);
    }
    if let Some(author) = metadata.author {
        println!("Author: {}", author);
    }
    if let Some(producer) = metadata.producer {
        println!("Producer: {}", producer);
    }

    Ok(())
}
