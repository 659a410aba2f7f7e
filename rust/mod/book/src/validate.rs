//! Field constraints for book payloads.
//!
//! Violations are collected per field rather than failing on the first one,
//! so a caller sees every problem with a payload at once.

use std::collections::BTreeMap;

use crate::model::{BookAttrs, CreateBook, UpdateBook};

pub const MAX_TEXT_LEN: usize = 255;
pub const MAX_RATING: u8 = 10;

/// Field name → human-readable rule violation.
pub type ValidationErrors = BTreeMap<String, String>;

/// Anything carrying validated book fields.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

impl Validate for CreateBook {
    fn validate(&self) -> Result<(), ValidationErrors> {
        check_fields(&self.title, &self.author, &self.attrs)
    }
}

impl Validate for UpdateBook {
    fn validate(&self) -> Result<(), ValidationErrors> {
        check_fields(&self.title, &self.author, &self.attrs)
    }
}

fn check_fields(title: &str, author: &str, attrs: &BookAttrs) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_text(&mut errors, "title", title);
    check_text(&mut errors, "author", author);
    check_text_len(&mut errors, "attrs.picture", &attrs.picture);
    check_text_len(&mut errors, "attrs.description", &attrs.description);
    if attrs.rating > MAX_RATING {
        errors.insert(
            "attrs.rating".to_string(),
            format!("must be between 1 and {} (0 for unrated)", MAX_RATING),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_text(errors: &mut ValidationErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.insert(field.to_string(), "is required".to_string());
    } else {
        check_text_len(errors, field, value);
    }
}

fn check_text_len(errors: &mut ValidationErrors, field: &str, value: &str) {
    if value.chars().count() > MAX_TEXT_LEN {
        errors.insert(
            field.to_string(),
            format!("must be at most {} characters", MAX_TEXT_LEN),
        );
    }
}
