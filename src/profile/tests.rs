//! Tests for the profile module
//!
//! Covers the divergent username normalizations, form validation, the
//! claim/edit persistence semantics and the unique-username mapping.

#[cfg(test)]
mod tests {
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    use super::super::handlers::avatar::avatar_key;
    use super::super::handlers::profile::{
        is_username_conflict, map_profile_write_error, persist_claim, persist_update,
    };
    use super::super::models::ProfileForm;
    use super::super::validators::{
        normalize_claim_username, normalize_edit_username, ProfileFormValidator,
    };
    use crate::common::helpers::profile_path;
    use crate::common::migrations::run_migrations;
    use crate::common::{ApiError, Validator};

    async fn setup_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    fn form(name: &str, username: &str, bio: Option<&str>) -> ProfileForm {
        ProfileForm {
            name: name.to_string(),
            username: username.to_string(),
            bio: bio.map(str::to_string),
            avatar: None,
        }
    }

    // ============================================================================
    // Normalization Tests
    // ============================================================================
    //
    // The completion form and the edit form deliberately disagree; each
    // path's documented output is pinned here.

    #[test]
    fn claim_normalization_lower_cases_without_stripping() {
        assert_eq!(normalize_claim_username("Jo.hn Doe!!"), "jo.hn doe!!");
        assert_eq!(normalize_claim_username("Ada Lovelace"), "ada lovelace");
        assert_eq!(normalize_claim_username("plain_user_9"), "plain_user_9");
    }

    #[test]
    fn edit_normalization_lower_cases_and_strips() {
        assert_eq!(normalize_edit_username("Jo.hn Doe!!"), "johndoe");
        assert_eq!(normalize_edit_username("Ada Lovelace"), "adalovelace");
        assert_eq!(normalize_edit_username("plain_user_9"), "plain_user_9");
    }

    #[test]
    fn same_input_diverges_between_the_two_paths() {
        let raw = "Jo.hn Doe!!";
        assert_ne!(normalize_claim_username(raw), normalize_edit_username(raw));
    }

    // ============================================================================
    // Validator Tests
    // ============================================================================

    #[test]
    fn valid_form_passes_validation() {
        let result = ProfileFormValidator.validate(&form("Ada", "ada", Some("mathematician")));
        assert!(result.is_valid);
        assert_eq!(result.errors.len(), 0);
    }

    #[test]
    fn missing_name_fails_validation() {
        let result = ProfileFormValidator.validate(&form("  ", "ada", None));
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "name"));
    }

    #[test]
    fn missing_username_fails_validation() {
        let result = ProfileFormValidator.validate(&form("Ada", "", None));
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "username"));
    }

    #[test]
    fn bio_at_150_chars_passes_and_151_fails() {
        let at_limit = "x".repeat(150);
        let result = ProfileFormValidator.validate(&form("Ada", "ada", Some(&at_limit)));
        assert!(result.is_valid);

        let over_limit = "x".repeat(151);
        let result = ProfileFormValidator.validate(&form("Ada", "ada", Some(&over_limit)));
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "bio"));
    }

    // ============================================================================
    // Claim Persistence Tests
    // ============================================================================

    #[tokio::test]
    async fn claim_transitions_a_stub_to_claimed() {
        let pool = setup_pool().await;

        sqlx::query("INSERT INTO profiles (id, email) VALUES ('u1', 'u1@example.com')")
            .execute(&pool)
            .await
            .unwrap();

        let claim = form("Ada", &normalize_claim_username("Ada Lovelace"), Some("bio"));
        let profile = persist_claim(&pool, "u1", Some("u1@example.com"), &claim, None)
            .await
            .unwrap();

        // Lower-cased but unstripped: the completion form's documented gap
        assert_eq!(profile.username.as_deref(), Some("ada lovelace"));
        assert_eq!(profile.name.as_deref(), Some("Ada"));

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM profiles WHERE id = 'u1'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count.0, 1);
    }

    #[test]
    fn claim_redirect_target_carries_the_unstripped_username() {
        let username = normalize_claim_username("Ada Lovelace");
        assert_eq!(profile_path(&username), "/ada%20lovelace");
    }

    #[tokio::test]
    async fn claim_without_prior_stub_inserts_the_row() {
        let pool = setup_pool().await;

        let claim = form("Ada", "ada", None);
        let profile = persist_claim(&pool, "u1", Some("u1@example.com"), &claim, None)
            .await
            .unwrap();

        assert_eq!(profile.username.as_deref(), Some("ada"));
        assert_eq!(profile.avatar_url, None);
    }

    #[tokio::test]
    async fn duplicate_username_surfaces_as_validation_error() {
        let pool = setup_pool().await;

        let claim = form("Ada", "ada", None);
        persist_claim(&pool, "u1", None, &claim, None).await.unwrap();

        let rival = form("Not Ada", "ada", None);
        let err = persist_claim(&pool, "u2", None, &rival, None)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::ValidationError(_)));

        // The losing writer must not leave a claimed row behind
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM profiles WHERE id = 'u2'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count.0, 0);
    }

    // ============================================================================
    // Edit Persistence Tests
    // ============================================================================

    #[tokio::test]
    async fn update_is_a_single_statement_keyed_by_id() {
        let pool = setup_pool().await;

        persist_claim(&pool, "u1", None, &form("Ada", "ada", None), None)
            .await
            .unwrap();

        let edit = form("Ada L.", &normalize_edit_username("Ada Lovelace"), Some("new bio"));
        let profile = persist_update(&pool, "u1", &edit, Some("/api/avatars/u1-1.png"))
            .await
            .unwrap();

        assert_eq!(profile.username.as_deref(), Some("adalovelace"));
        assert_eq!(profile.name.as_deref(), Some("Ada L."));
        assert_eq!(profile.bio.as_deref(), Some("new bio"));
        assert_eq!(profile.avatar_url.as_deref(), Some("/api/avatars/u1-1.png"));
    }

    #[tokio::test]
    async fn update_keeps_avatar_url_when_no_new_image_is_supplied() {
        let pool = setup_pool().await;

        persist_claim(
            &pool,
            "u1",
            None,
            &form("Ada", "ada", None),
            Some("/api/avatars/u1-1.png"),
        )
        .await
        .unwrap();

        // The handler passes the current avatar_url through unchanged when
        // the form carries no avatar part
        let profile = persist_update(
            &pool,
            "u1",
            &form("Ada", "ada", None),
            Some("/api/avatars/u1-1.png"),
        )
        .await
        .unwrap();

        assert_eq!(profile.avatar_url.as_deref(), Some("/api/avatars/u1-1.png"));
    }

    #[tokio::test]
    async fn failed_update_leaves_the_row_untouched() {
        let pool = setup_pool().await;

        persist_claim(&pool, "u1", None, &form("Ada", "ada", Some("ada bio")), None)
            .await
            .unwrap();
        persist_claim(&pool, "u2", None, &form("Bob", "bob", None), None)
            .await
            .unwrap();

        // u2 tries to take u1's username: the single statement fails whole
        let err = persist_update(&pool, "u2", &form("Bob", "ada", Some("bob bio")), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));

        let (username, bio): (Option<String>, Option<String>) =
            sqlx::query_as("SELECT username, bio FROM profiles WHERE id = 'u2'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(username.as_deref(), Some("bob"));
        assert_eq!(bio, None);
    }

    // ============================================================================
    // Error Mapping Tests
    // ============================================================================

    #[test]
    fn non_database_errors_are_not_username_conflicts() {
        assert!(!is_username_conflict(&sqlx::Error::RowNotFound));

        let mapped = map_profile_write_error(sqlx::Error::RowNotFound);
        assert!(matches!(mapped, ApiError::DatabaseError(_)));
    }

    // ============================================================================
    // Avatar Key Tests
    // ============================================================================

    #[test]
    fn avatar_key_derives_from_identity_timestamp_and_extension() {
        assert_eq!(
            avatar_key("u1", "holiday.PHOTO.png", 1700000000000).unwrap(),
            "u1-1700000000000.png"
        );
        assert_eq!(
            avatar_key("u1", "pic.jpeg", 1700000000000).unwrap(),
            "u1-1700000000000.jpeg"
        );
    }

    #[test]
    fn avatar_key_rejects_unsupported_extensions() {
        let err = avatar_key("u1", "payload.svg", 1700000000000).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err = avatar_key("u1", "no_extension", 1700000000000).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
