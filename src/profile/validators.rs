// src/profile/validators.rs

use super::models::ProfileForm;
use crate::common::{ValidationResult, Validator};

// ============================================================================
// Username Normalization
// ============================================================================
//
// The two forms normalize differently on purpose: the completion form only
// lower-cases, while the edit form also strips everything outside
// [a-z0-9_]. Unifying them would silently change which handles the claim
// path can produce, so both behaviors are kept and tested separately.

/// Completion-form normalization: lower-case only, no character stripping
pub fn normalize_claim_username(raw: &str) -> String {
    raw.to_lowercase()
}

/// Edit-form normalization: lower-case, then drop every character outside
/// [a-z0-9_]
pub fn normalize_edit_username(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| matches!(c, 'a'..='z' | '0'..='9' | '_'))
        .collect()
}

// ============================================================================
// Form Validation
// ============================================================================

/// Maximum bio length, enforced at input time only - storage does not
/// guarantee it
pub const BIO_MAX_CHARS: usize = 150;

pub struct ProfileFormValidator;

impl Validator<ProfileForm> for ProfileFormValidator {
    fn validate(&self, data: &ProfileForm) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.name.trim().is_empty() {
            result.add_error("name", "Name is required");
        }

        if data.username.trim().is_empty() {
            result.add_error("username", "Username is required");
        }

        if let Some(bio) = &data.bio {
            if bio.chars().count() > BIO_MAX_CHARS {
                result.add_error("bio", "Bio must be 150 characters or fewer");
            }
        }

        result
    }
}
