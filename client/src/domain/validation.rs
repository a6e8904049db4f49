//! Field-level validation outcome shared by records and forms.

use serde::Serialize;

/// Result of validating a record or form.
///
/// Validation never fails; it reports every broken rule in the order the
/// rules were checked.
///
/// # Examples
/// ```
/// use hireboard::domain::ValidationReport;
///
/// let mut report = ValidationReport::default();
/// report.require(false, "Name is required");
/// assert!(!report.is_valid());
/// assert_eq!(report.joined(), "Name is required");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<String>,
}

impl ValidationReport {
    /// Record `message` unless `ok` holds.
    pub fn require(&mut self, ok: bool, message: impl Into<String>) {
        if !ok {
            self.errors.push(message.into());
        }
    }

    /// Whether no rule failed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages of the failed rules.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Messages joined for a single-line notice.
    pub fn joined(&self) -> String {
        self.errors.join(", ")
    }

    /// Convert into `Err(messages)` when any rule failed.
    pub fn into_result(self) -> Result<(), Vec<String>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

// Presentation layers read `{isValid, errors}`.
impl Serialize for ValidationReport {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("ValidationReport", 2)?;
        state.serialize_field("isValid", &self.is_valid())?;
        state.serialize_field("errors", &self.errors)?;
        state.end()
    }
}
