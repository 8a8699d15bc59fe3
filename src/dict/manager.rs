use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::PathBuf;

// Pinned to a release tag for reproducibility; 'master' could change the
// wordlist under us.
const FREQUENCY_LIST_BASE_URL: &str =
    "https://raw.githubusercontent.com/wolfgarbe/SymSpell/v6.7.2/SymSpell.FrequencyDictionary";
const FREQUENCY_LIST_VERSION: &str = "6.7.2";

pub struct DictionaryInfo {
    pub language: String,
    pub path: PathBuf,
    pub word_count: usize,
    pub size_bytes: u64,
}

pub fn list_dictionaries() -> Result<()> {
    let data_dir = crate::config::Config::data_dir().context("Failed to get data directory")?;

    if !data_dir.exists() {
        println!("{}", "No frequency dictionaries installed.".yellow());
        println!(
            "Run {} to download one.",
            "correx dict download en".cyan()
        );
        return Ok(());
    }

    println!("{}", "Installed frequency dictionaries:".bold());
    println!();

    let entries = fs::read_dir(&data_dir)?;
    let mut found_any = false;

    for entry in entries {
        let entry = entry?;
        let path = entry.path();

        if path.extension().and_then(|s| s.to_str()) == Some("txt") {
            found_any = true;
            let language = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown");

            let metadata = fs::metadata(&path)?;
            let size_kb = metadata.len() / 1024;

            println!(
                "  {} {} ({})",
                "✓".green(),
                language.cyan().bold(),
                format!("{}KB", size_kb).dimmed()
            );
        }
    }

    if !found_any {
        println!("{}", "No frequency dictionaries found.".yellow());
    }

    println!();
    println!(
        "Data directory: {}",
        data_dir.display().to_string().dimmed()
    );

    Ok(())
}

pub fn download_dictionary(language: &str) -> Result<()> {
    println!(
        "{} frequency list for {} (version: {})...",
        "Downloading".cyan().bold(),
        language.yellow(),
        FREQUENCY_LIST_VERSION.dimmed()
    );

    let data_dir = crate::config::Config::data_dir().context("Failed to get data directory")?;

    fs::create_dir_all(&data_dir).context("Failed to create data directory")?;

    let url = match language {
        "en" => format!("{}/en-80k.txt", FREQUENCY_LIST_BASE_URL),
        other => {
            anyhow::bail!(
                "Language '{}' is not supported. Only 'en' is currently available.",
                other
            );
        }
    };

    println!("Source: {}", url.dimmed());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message("Downloading...");

    let response = reqwest::blocking::get(&url).context("Failed to download frequency list")?;

    if !response.status().is_success() {
        anyhow::bail!(
            "Failed to download frequency list: HTTP {}",
            response.status()
        );
    }

    let content = response.text()?;
    pb.finish_with_message("Download complete");

    // Validate before installing; a truncated or mangled download would
    // silently gut every correction tier.
    println!("{}", "Validating...".cyan());
    let dict = crate::engine::dictionary::FrequencyDictionary::from_reader(content.as_bytes())
        .context("Downloaded frequency list did not parse")?;

    println!("Found {} words", dict.len().to_string().yellow());

    let dict_path = data_dir.join(format!("{}.txt", language));
    fs::write(&dict_path, &content)
        .with_context(|| format!("Failed to write {}", dict_path.display()))?;

    println!(
        "{} Frequency dictionary installed: {}",
        "✓".green().bold(),
        dict_path.display().to_string().cyan()
    );

    Ok(())
}

pub fn update_dictionaries() -> Result<()> {
    let data_dir = crate::config::Config::data_dir().context("Failed to get data directory")?;

    if !data_dir.exists() {
        println!("{}", "No frequency dictionaries installed.".yellow());
        return Ok(());
    }

    let entries = fs::read_dir(&data_dir)?;
    let mut languages = Vec::new();

    for entry in entries {
        let entry = entry?;
        let path = entry.path();

        if path.extension().and_then(|s| s.to_str()) == Some("txt") {
            if let Some(language) = path.file_stem().and_then(|s| s.to_str()) {
                languages.push(language.to_string());
            }
        }
    }

    if languages.is_empty() {
        println!("{}", "No frequency dictionaries to update.".yellow());
        return Ok(());
    }

    println!(
        "{} {} {}...",
        "Updating".cyan().bold(),
        languages.len(),
        if languages.len() == 1 {
            "dictionary"
        } else {
            "dictionaries"
        }
    );
    println!();

    for language in languages {
        download_dictionary(&language)?;
        println!();
    }

    println!("{} All frequency dictionaries updated!", "✓".green().bold());

    Ok(())
}

pub fn show_info(language: &str) -> Result<()> {
    let data_dir = crate::config::Config::data_dir().context("Failed to get data directory")?;

    let dict_path = data_dir.join(format!("{}.txt", language));

    if !dict_path.exists() {
        println!(
            "{} Frequency dictionary for {} not found.",
            "✗".red().bold(),
            language.yellow()
        );
        println!(
            "Run {} to download it.",
            format!("correx dict download {}", language).cyan()
        );
        return Ok(());
    }

    let metadata = fs::metadata(&dict_path)?;

    println!("{}", format!("Frequency dictionary: {}", language).bold());
    println!("  Path: {}", dict_path.display());
    println!("  Size: {} KB", metadata.len() / 1024);
    println!("  Version: {}", FREQUENCY_LIST_VERSION);
    println!("  Format: word<space>frequency, one entry per line");

    match crate::engine::dictionary::FrequencyDictionary::from_path(&dict_path) {
        Ok(dict) => {
            println!("  Words: {}", dict.len().to_string().yellow());
        }
        Err(e) => {
            println!("  {}: {}", "Error loading dictionary".red(), e);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_dictionaries_does_not_panic() {
        // Environment-dependent; just ensure it runs.
        let _ = list_dictionaries();
    }
}
