use crate::Correction;
use colored::*;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    source: &'a str,
    total_corrections: usize,
    corrections: &'a [Correction],
}

/// Render the merged correction list for one input.
pub fn print_corrections(
    source_name: &str,
    text: &str,
    corrections: &[Correction],
    colored_output: bool,
    format: &OutputFormat,
) {
    match format {
        OutputFormat::Text => print_text(source_name, text, corrections, colored_output),
        OutputFormat::Json => print_json(source_name, corrections),
    }
}

fn print_text(source_name: &str, text: &str, corrections: &[Correction], colored_output: bool) {
    if corrections.is_empty() {
        return;
    }

    if colored_output {
        println!("\n{}", source_name.bold().underline());
    } else {
        println!("\n{}", source_name);
    }

    for correction in corrections {
        let (line, column) = line_col(text, correction.start);
        let position = format!("{}:{}", line, column);
        let kind = serde_json::to_value(correction.kind)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();

        let shown_original = if correction.is_insertion() {
            "(insert)"
        } else {
            correction.original.as_str()
        };

        if colored_output {
            println!(
                "  {} {} {} {} {}",
                position.blue().bold(),
                shown_original.red().bold(),
                "→".dimmed(),
                correction.suggested.green(),
                format!("[{}]", kind).dimmed()
            );
            if let Some(explanation) = &correction.explanation {
                println!("    {}", explanation.dimmed());
            }
        } else {
            println!(
                "  {} {} -> {} [{}]",
                position, shown_original, correction.suggested, kind
            );
            if let Some(explanation) = &correction.explanation {
                println!("    {}", explanation);
            }
        }
    }
}

fn print_json(source_name: &str, corrections: &[Correction]) {
    let output = JsonOutput {
        source: source_name,
        total_corrections: corrections.len(),
        corrections,
    };

    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}

/// 1-indexed line and column for a byte offset.
fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let clamped = offset.min(text.len());
    let before = &text[..clamped];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    (line, clamped - line_start + 1)
}

pub fn print_check_summary(total: usize, inputs: usize, colored: bool) {
    println!();
    if total == 0 {
        if colored {
            println!("{}", "✓ No corrections suggested!".green().bold());
        } else {
            println!("✓ No corrections suggested!");
        }
    } else {
        let noun = if total == 1 {
            "correction"
        } else {
            "corrections"
        };
        if colored {
            println!(
                "{} {} {} suggested in {} {}",
                "✗".red().bold(),
                total.to_string().red().bold(),
                noun,
                inputs,
                if inputs == 1 { "input" } else { "inputs" }
            );
        } else {
            println!(
                "✗ {} {} suggested in {} {}",
                total,
                noun,
                inputs,
                if inputs == 1 { "input" } else { "inputs" }
            );
        }
    }
}

pub fn print_fix_summary(total_fixed: usize, inputs: usize, colored: bool) {
    println!();
    if total_fixed == 0 {
        if colored {
            println!("{}", "No corrections needed!".green().bold());
        } else {
            println!("No corrections needed!");
        }
    } else {
        let noun = if total_fixed == 1 {
            "correction"
        } else {
            "corrections"
        };
        if colored {
            println!(
                "{} {} {} applied to {} {}",
                "✓".green().bold(),
                total_fixed.to_string().green().bold(),
                noun,
                inputs,
                if inputs == 1 { "input" } else { "inputs" }
            );
        } else {
            println!(
                "✓ {} {} applied to {} {}",
                total_fixed,
                noun,
                inputs,
                if inputs == 1 { "input" } else { "inputs" }
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col() {
        let text = "first line\nsecond line\nthird";
        assert_eq!(line_col(text, 0), (1, 1));
        assert_eq!(line_col(text, 6), (1, 7));
        assert_eq!(line_col(text, 11), (2, 1));
        assert_eq!(line_col(text, 14), (2, 4));
        assert_eq!(line_col(text, 23), (3, 1));
    }

    #[test]
    fn test_output_format_parse() {
        assert!(matches!("text".parse(), Ok(OutputFormat::Text)));
        assert!(matches!("JSON".parse(), Ok(OutputFormat::Json)));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
