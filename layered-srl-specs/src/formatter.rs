//! Failure report formatting for fixture runs.

use std::fmt::Write;

use crate::SpecError;

/// Format a fixture error as a multi-line report.
pub fn format_failure(error: &SpecError) -> String {
    let mut output = String::new();

    match error {
        SpecError::Mismatch {
            fixture,
            mismatches,
        } => {
            let _ = writeln!(output, "\nFAIL: {}", fixture);
            let _ = writeln!(output);
            for mismatch in mismatches {
                let _ = writeln!(output, "  - {}", mismatch);
            }
        }
        other => {
            let _ = writeln!(output, "\nERROR: {}", other);
        }
    }

    output
}

/// Combine the reports of every failing fixture, with a summary line.
pub fn format_summary(total: usize, errors: &[SpecError]) -> String {
    let mut output: String = errors.iter().map(format_failure).collect();
    let _ = writeln!(
        output,
        "\n{} of {} fixtures passed",
        total.saturating_sub(errors.len()),
        total
    );
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mismatch() {
        let error = SpecError::Mismatch {
            fixture: "coref.toml".to_string(),
            mismatches: vec![
                "corpus has 2 sentences, expected 3".to_string(),
                "mentions: got [], expected [(0, 1, 1)]".to_string(),
            ],
        };

        assert_eq!(
            format_summary(4, &[error]),
            "\nFAIL: coref.toml\n\n  \
             - corpus has 2 sentences, expected 3\n  \
             - mentions: got [], expected [(0, 1, 1)]\n\
             \n3 of 4 fixtures passed\n"
        );
    }

    #[test]
    fn test_format_load_error() {
        let error = SpecError::Load {
            path: "missing.toml".to_string(),
            message: "not found".to_string(),
        };
        assert_eq!(
            format_failure(&error),
            "\nERROR: failed to load fixture: missing.toml: not found\n"
        );
    }
}
