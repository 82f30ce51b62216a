//! Single form-control state: a value plus interaction tracking.

#[cfg(test)]
#[path = "field_test.rs"]
mod field_test;

/// A form control's value and whether the user has interacted with it.
///
/// `dirty` means the value was changed by user input; `touched` means the
/// control was visited (blurred). Validation display rules combine both so
/// a freshly rendered form never shows errors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Field {
    value: String,
    touched: bool,
    dirty: bool,
}

impl Field {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn touched(&self) -> bool {
        self.touched
    }

    #[must_use]
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    /// Replace the value as user input would: marks the field dirty.
    pub fn set(&mut self, value: &str) {
        self.value = value.to_owned();
        self.dirty = true;
    }

    /// Replace the value programmatically without marking it dirty or
    /// touched (prefill semantics).
    pub fn patch(&mut self, value: &str) {
        self.value = value.to_owned();
    }

    /// Mark the field visited, as a blur event would.
    pub fn touch(&mut self) {
        self.touched = true;
    }
}
