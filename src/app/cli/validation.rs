//! CLI argument validation
//!
//! Checks argument consistency once the config file has been merged, and
//! resolves the report format.

use crate::core::validation::ValidationError;
use crate::report::ReportFormat;

use super::args::Args;

impl Args {
    /// Validate CLI arguments for consistency and constraints
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_run_dir()?;
        self.report_format()?;
        self.validate_output()?;
        Ok(())
    }

    fn validate_run_dir(&self) -> Result<(), ValidationError> {
        if self.list_layouts {
            return Ok(());
        }
        match &self.run_dir {
            None => Err(ValidationError::new("A run directory is required")),
            Some(dir) if dir.as_os_str().is_empty() => {
                Err(ValidationError::new("The run directory cannot be empty"))
            }
            Some(_) => Ok(()),
        }
    }

    fn validate_output(&self) -> Result<(), ValidationError> {
        if let Some(output) = &self.output {
            if output.as_os_str().is_empty() {
                return Err(ValidationError::new("Option --output cannot be empty"));
            }
        }
        Ok(())
    }

    /// Report format from --format, else from the --output extension, else text
    pub fn report_format(&self) -> Result<ReportFormat, ValidationError> {
        if let Some(name) = &self.format {
            return ReportFormat::from_name(name).ok_or_else(|| {
                ValidationError::new(&format!(
                    "Unknown report format '{}' (expected one of: {})",
                    name,
                    ReportFormat::names().collect::<Vec<_>>().join(", ")
                ))
            });
        }
        let inferred = self
            .output
            .as_deref()
            .and_then(ReportFormat::from_path)
            .unwrap_or_default();
        Ok(inferred)
    }
}
