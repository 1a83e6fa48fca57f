use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use colored::*;
use std::fs;
use std::io;
use std::path::PathBuf;

use artcheck::cli::output::OutputFormat;
use artcheck::config::LangProfile;
use artcheck::{cli, dict, Config, Pipeline};

#[derive(Parser, Debug)]
#[command(name = "artcheck")]
#[command(version, about = "Typo screening for packaging-artwork PDFs", long_about = None)]
struct Cli {
    /// Artwork file to screen (PDF or PDF-like design export)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// OCR recognition profile (kor, eng, kor+eng)
    #[arg(short, long)]
    lang: Option<LangProfile>,

    /// Rasterization resolution for the OCR fallback
    #[arg(long)]
    dpi: Option<u32>,

    /// Output format (text, json)
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Exit with code 0 even if typo candidates are found
    #[arg(long)]
    no_fail: bool,

    /// Write the full extracted text to this file
    #[arg(long, value_name = "PATH")]
    dump_text: Option<PathBuf>,

    /// Korean spelling/grammar service endpoint
    #[arg(long, value_name = "URL")]
    service_url: Option<String>,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Dictionary management
    Dict {
        #[command(subcommand)]
        action: DictCommands,
    },
}

#[derive(Parser, Debug)]
enum DictCommands {
    /// List installed dictionaries
    List,
    /// Download a dictionary
    Download {
        /// Language code (e.g., en_US, en_GB)
        language: String,
    },
    /// Show dictionary info
    Info {
        /// Language code
        language: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle shell completion generation
    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "artcheck", &mut io::stdout());
        return Ok(());
    }

    // Handle subcommands
    if let Some(command) = cli.command {
        return handle_command(command);
    }

    let Some(file) = cli.file else {
        anyhow::bail!("No file specified. Use --help for usage information.");
    };
    if !file.exists() {
        anyhow::bail!("File not found: {}", file.display());
    }

    // Load configuration
    let mut config = Config::load(cli.lang, cli.service_url.clone())?;
    if let Some(dpi) = cli.dpi {
        config.dpi = dpi;
    }

    let colored = !cli.no_color;
    let profile = config.lang_profile;

    let pipeline = Pipeline::new(config)?;

    let analysis = match pipeline.run(&file) {
        Ok(analysis) => analysis,
        Err(e) => {
            if colored {
                eprintln!("{} {}", "✗".red().bold(), e.to_string().red());
            } else {
                eprintln!("✗ {}", e);
            }
            std::process::exit(1);
        }
    };

    cli::output::print_analysis(&file, &analysis, profile, colored, &cli.format);

    if let Some(path) = &cli.dump_text {
        fs::write(path, &analysis.text)?;
        println!("\nExtracted text written to {}", path.display());
    }

    if matches!(cli.format, OutputFormat::Text) {
        cli::output::print_summary(analysis.report.len(), colored);
    }

    // Exit with appropriate code
    if !analysis.report.is_empty() && !cli.no_fail {
        std::process::exit(1);
    }

    Ok(())
}

fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Dict { action } => match action {
            DictCommands::List => {
                dict::manager::list_dictionaries()?;
            }
            DictCommands::Download { language } => {
                dict::manager::download_dictionary(&language)?;
            }
            DictCommands::Info { language } => {
                dict::manager::show_info(&language)?;
            }
        },
    }
    Ok(())
}
