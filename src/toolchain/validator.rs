//! Input document validation
//!
//! A publishable input is an existing file with a recognized DITA extension.

use crate::core::traits::{InputValidator, ValidationOutcome};
use std::path::Path;

/// Extensions accepted as publishable inputs (matched case-insensitively)
const RECOGNIZED_EXTENSIONS: &[&str] = &["dita", "ditamap", "bookmap"];

/// Validates candidate input documents
///
/// Deterministic and side-effect free apart from a single existence check;
/// safe to call concurrently without synchronization.
#[derive(Debug, Default)]
pub struct DitaInputValidator;

impl DitaInputValidator {
    pub fn new() -> Self {
        Self
    }
}

impl InputValidator for DitaInputValidator {
    fn validate(&self, path: &Path) -> ValidationOutcome {
        let recognized = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                RECOGNIZED_EXTENSIONS
                    .iter()
                    .any(|r| r.eq_ignore_ascii_case(ext))
            });

        if !recognized {
            return ValidationOutcome::invalid(format!(
                "'{}' is not a DITA document (expected .dita, .ditamap, or .bookmap)",
                path.display()
            ));
        }

        if !path.is_file() {
            return ValidationOutcome::invalid(format!(
                "input file not found: {}",
                path.display()
            ));
        }

        ValidationOutcome::ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_unrecognized_extension_is_invalid() {
        let validator = DitaInputValidator::new();

        for name in ["notes.txt", "report.pdf", "map.xml", "no_extension"] {
            let outcome = validator.validate(Path::new(name));
            assert!(!outcome.valid, "{name} should be rejected");
            assert!(outcome.error.as_deref().is_some_and(|e| !e.is_empty()));
        }
    }

    #[test]
    fn test_recognized_extensions_for_existing_files() {
        let temp_dir = TempDir::new().unwrap();
        let validator = DitaInputValidator::new();

        for name in ["topic.dita", "book.ditamap", "guide.bookmap", "LOUD.DITA"] {
            let path = temp_dir.path().join(name);
            File::create(&path).unwrap();

            let outcome = validator.validate(&path);
            assert!(outcome.valid, "{name} should be accepted");
            assert!(outcome.error.is_none());
        }
    }

    #[test]
    fn test_missing_file_with_good_extension_is_invalid() {
        let validator = DitaInputValidator::new();
        let outcome = validator.validate(Path::new("/nonexistent/report.dita"));

        assert!(!outcome.valid);
        assert!(outcome.error.as_deref().unwrap().contains("not found"));
    }

    #[test]
    fn test_directory_with_dita_suffix_is_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("folder.dita");
        std::fs::create_dir(&dir).unwrap();

        let validator = DitaInputValidator::new();
        assert!(!validator.validate(&dir).valid);
    }
}
