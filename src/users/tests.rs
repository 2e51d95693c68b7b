//! Tests for the legacy user routes

#[cfg(test)]
mod tests {
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    use super::super::handlers::validate_create_user;
    use super::super::models::{CreateUserRequest, LegacyUser};
    use crate::common::migrations::run_migrations;
    use crate::common::ApiError;

    async fn setup_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    #[test]
    fn missing_fields_are_rejected() {
        let err = validate_create_user(CreateUserRequest {
            name: None,
            username: Some("ada".to_string()),
        })
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err = validate_create_user(CreateUserRequest {
            name: Some("Ada".to_string()),
            username: None,
        })
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err = validate_create_user(CreateUserRequest {
            name: Some("   ".to_string()),
            username: Some("ada".to_string()),
        })
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn complete_request_passes_through() {
        let (name, username) = validate_create_user(CreateUserRequest {
            name: Some("Ada".to_string()),
            username: Some("ada".to_string()),
        })
        .unwrap();

        assert_eq!(name, "Ada");
        assert_eq!(username, "ada");
    }

    #[tokio::test]
    async fn first_user_is_the_lowest_id() {
        let pool = setup_pool().await;

        sqlx::query("INSERT INTO users (name, username) VALUES ('Ada', 'ada'), ('Bob', 'bob')")
            .execute(&pool)
            .await
            .unwrap();

        let row: Option<(String,)> =
            sqlx::query_as("SELECT name FROM users ORDER BY id LIMIT 1")
                .fetch_optional(&pool)
                .await
                .unwrap();

        assert_eq!(row, Some(("Ada".to_string(),)));
    }

    #[tokio::test]
    async fn inserted_user_row_is_returned_in_full() {
        let pool = setup_pool().await;

        let result = sqlx::query("INSERT INTO users (name, username) VALUES ('Ada', 'ada')")
            .execute(&pool)
            .await
            .unwrap();

        let user = sqlx::query_as::<_, LegacyUser>("SELECT * FROM users WHERE id = ?")
            .bind(result.last_insert_rowid())
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_eq!(user.name, "Ada");
        assert_eq!(user.username, "ada");
        assert!(user.created_at.is_some());
    }
}
