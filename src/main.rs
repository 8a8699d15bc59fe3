use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use correx::cli::output::{self, OutputFormat};
use correx::engine::personal::FilePersonalDictionary;
use correx::model::HttpModelAdapter;
use correx::{apply_corrections, dict, Config, CorrectionEngine};
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "correx")]
#[command(version, about = "Local-first spelling and grammar correction", long_about = None)]
struct Cli {
    /// Files to correct (reads stdin when none are given)
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Apply the merged corrections in place (stdin input prints the
    /// corrected text instead)
    #[arg(short, long)]
    fix: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Exit with code 0 even if corrections are suggested
    #[arg(long)]
    no_fail: bool,

    /// Output format (text, json)
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,

    /// Add words to the personal dictionary and exit
    #[arg(long)]
    add_word: Vec<String>,

    /// Pattern to ignore (regex)
    #[arg(long)]
    ignore_pattern: Vec<String>,

    /// Personal dictionary file
    #[arg(long)]
    personal_dict: Option<PathBuf>,

    /// Frequency dictionary file (word<space>frequency lines)
    #[arg(long)]
    dictionary: Option<PathBuf>,

    /// Inference endpoint for the model pipeline (e.g.
    /// http://localhost:8080/generate)
    #[arg(long)]
    model_endpoint: Option<String>,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Frequency dictionary management
    Dict {
        #[command(subcommand)]
        action: DictCommands,
    },
}

#[derive(Parser, Debug)]
enum DictCommands {
    /// List installed frequency dictionaries
    List,
    /// Download a frequency dictionary
    Download {
        /// Language code (e.g., en)
        language: String,
    },
    /// Update all frequency dictionaries
    Update,
    /// Show frequency dictionary info
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
        generate(shell, &mut cmd, "correx", &mut io::stdout());
        return Ok(());
    }

    // Handle subcommands
    if let Some(command) = cli.command {
        return handle_command(command);
    }

    // Load configuration
    let config = Config::load(
        cli.dictionary.clone(),
        cli.personal_dict.clone(),
        cli.ignore_pattern.clone(),
        cli.model_endpoint.clone(),
    )?;

    let personal_path = config
        .personal_dictionary
        .clone()
        .context("No personal dictionary path available")?;
    let personal = FilePersonalDictionary::open(&personal_path)
        .with_context(|| format!("Failed to open {}", personal_path.display()))?;

    let mut engine = CorrectionEngine::new(config.clone(), Box::new(personal));

    // Words approved from the command line; exits unless there is also
    // input to correct.
    if !cli.add_word.is_empty() {
        for word in &cli.add_word {
            engine.add_personal_word(word)?;
            println!("Added '{}' to personal dictionary", word);
        }
        if cli.files.is_empty() {
            return Ok(());
        }
    }

    if let Some(endpoint) = &config.model_endpoint {
        match HttpModelAdapter::new(endpoint, Duration::from_secs(config.model_timeout_secs)) {
            Ok(adapter) => engine.set_model_adapter(Box::new(adapter)),
            Err(e) => eprintln!("Warning: model adapter unavailable: {}", e),
        }
    }

    let colored = !cli.no_color;
    let mut total_corrections = 0;
    let mut total_fixed = 0;
    let mut inputs = 0;

    if cli.files.is_empty() {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        inputs += 1;

        let corrections = engine.correct(&text);
        if cli.fix {
            print!("{}", apply_corrections(&text, &corrections));
            total_fixed += corrections.len();
        } else {
            output::print_corrections("<stdin>", &text, &corrections, colored, &cli.format);
            total_corrections += corrections.len();
        }
    } else {
        for file_path in &cli.files {
            if !file_path.exists() {
                eprintln!("Error: File not found: {}", file_path.display());
                continue;
            }
            inputs += 1;

            let text = std::fs::read_to_string(file_path)
                .with_context(|| format!("Failed to read file: {}", file_path.display()))?;
            let corrections = engine.correct(&text);

            if cli.fix {
                if !corrections.is_empty() {
                    let fixed = apply_corrections(&text, &corrections);
                    std::fs::write(file_path, fixed).with_context(|| {
                        format!("Failed to write file: {}", file_path.display())
                    })?;
                }
                total_fixed += corrections.len();
            } else {
                output::print_corrections(
                    &file_path.display().to_string(),
                    &text,
                    &corrections,
                    colored,
                    &cli.format,
                );
                total_corrections += corrections.len();
            }
        }
    }

    if cli.fix {
        // Stdin fix mode already wrote the corrected text to stdout.
        if !cli.files.is_empty() {
            output::print_fix_summary(total_fixed, inputs, colored);
        }
    } else if matches!(cli.format, OutputFormat::Text) {
        output::print_check_summary(total_corrections, inputs, colored);
    }

    if total_corrections > 0 && !cli.no_fail && !cli.fix {
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
            DictCommands::Update => {
                dict::manager::update_dictionaries()?;
            }
            DictCommands::Info { language } => {
                dict::manager::show_info(&language)?;
            }
        },
    }
    Ok(())
}
