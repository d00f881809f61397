#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path, query_param},
    };

    use crate::{
        client::rest_client_error::RestClientError,
        common::app_state::AppState,
        config::config::AppConfig,
        health::{
            db,
            handlers::run_health_checks,
            models::{CheckError, CheckName},
        },
        tests::setup_logging,
    };

    const TABLE_PATH: &str = "/rest/v1/videos";

    fn setup_state(server: &MockServer) -> Arc<AppState> {
        setup_logging();
        let config = AppConfig::from_vars([
            ("NEXT_PUBLIC_SUPABASE_URL", server.uri()),
            ("NEXT_PUBLIC_SUPABASE_ANON_KEY", "anon-key".to_string()),
            ("DB_TABLE_NAME", "videos".to_string()),
            ("DB_PRIMARY_KEY", "id".to_string()),
        ])
        .unwrap();

        AppState::from_config(config).unwrap()
    }

    async fn mount_single_row(server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(TABLE_PATH))
            .and(query_param("select", "*"))
            .and(query_param("limit", "1"))
            .and(header("prefer", "count=exact"))
            .respond_with(response)
            .mount(server)
            .await;
    }

    async fn mount_key_column(server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(TABLE_PATH))
            .and(query_param("select", "id"))
            .and(query_param("limit", "1"))
            .respond_with(response)
            .mount(server)
            .await;
    }

    async fn mount_row_count(server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("HEAD"))
            .and(path(TABLE_PATH))
            .and(query_param("select", "*"))
            .and(header("prefer", "count=exact"))
            .respond_with(response)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn healthy_table_passes_every_check() {
        let server = MockServer::start().await;
        let state = setup_state(&server);

        mount_single_row(
            &server,
            ResponseTemplate::new(200)
                .insert_header("content-range", "0-0/3")
                .set_body_json(json!([{ "id": 1, "title": "first" }])),
        )
        .await;
        mount_key_column(
            &server,
            ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }])),
        )
        .await;
        mount_row_count(
            &server,
            ResponseTemplate::new(200).insert_header("content-range", "*/3"),
        )
        .await;

        let report = run_health_checks(state).await;

        assert!(report.is_healthy(), "Unexpected failures: {:?}", report.checks);
        assert_eq!(report.table, "videos");
        assert_eq!(report.row_count, Some(3));
        assert_eq!(
            report.checks.iter().map(|c| c.name).collect::<Vec<_>>(),
            vec![CheckName::SingleRow, CheckName::KeyColumn, CheckName::RowCount]
        );
    }

    #[tokio::test]
    async fn empty_table_is_healthy() {
        let server = MockServer::start().await;
        let state = setup_state(&server);

        mount_single_row(
            &server,
            ResponseTemplate::new(200)
                .insert_header("content-range", "*/0")
                .set_body_json(json!([])),
        )
        .await;
        mount_key_column(&server, ResponseTemplate::new(200).set_body_json(json!([]))).await;
        mount_row_count(
            &server,
            ResponseTemplate::new(200).insert_header("content-range", "*/0"),
        )
        .await;

        let report = run_health_checks(state).await;

        assert!(report.is_healthy(), "Unexpected failures: {:?}", report.checks);
        assert_eq!(report.row_count, Some(0));
    }

    #[tokio::test]
    async fn sends_api_key_headers() {
        let server = MockServer::start().await;
        let state = setup_state(&server);

        Mock::given(method("GET"))
            .and(path(TABLE_PATH))
            .and(header("apikey", "anon-key"))
            .and(header("authorization", "Bearer anon-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 7 }])))
            .expect(1)
            .mount(&server)
            .await;

        let result = db::check_key_column(
            state.get_rest_client(),
            state.get_client(),
            "videos",
            "id",
        )
        .await;

        assert!(result.is_ok(), "Check failed: {:?}", result);
    }

    #[tokio::test]
    async fn row_without_primary_key_fails() {
        let server = MockServer::start().await;
        let state = setup_state(&server);

        mount_single_row(
            &server,
            ResponseTemplate::new(200)
                .insert_header("content-range", "0-0/1")
                .set_body_json(json!([{ "uuid": "abc", "title": "first" }])),
        )
        .await;

        let result = db::check_single_row(
            state.get_rest_client(),
            state.get_client(),
            "videos",
            "id",
        )
        .await;

        match result {
            Err(CheckError::MissingKeyField(field)) => assert_eq!(field, "id"),
            other => panic!("Expected missing key field, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_count_header_fails_row_count() {
        let server = MockServer::start().await;
        let state = setup_state(&server);

        mount_row_count(&server, ResponseTemplate::new(200)).await;

        let result =
            db::check_row_count(state.get_rest_client(), state.get_client(), "videos").await;

        assert!(matches!(result, Err(CheckError::MissingCount)));
    }

    #[tokio::test]
    async fn api_errors_fail_every_check() {
        let server = MockServer::start().await;
        let state = setup_state(&server);

        let body = json!({
            "code": "42P01",
            "message": "relation \"public.videos\" does not exist",
            "details": null,
            "hint": null,
        });
        Mock::given(method("GET"))
            .and(path(TABLE_PATH))
            .respond_with(ResponseTemplate::new(404).set_body_json(body))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path(TABLE_PATH))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let report = run_health_checks(state.clone()).await;

        assert!(!report.is_healthy());
        assert_eq!(report.failed().count(), 3);
        assert_eq!(report.row_count, None);

        let single_row = &report.checks[0];
        assert!(single_row.detail.as_deref().unwrap().contains("42P01"));

        let row_count = &report.checks[2];
        assert!(row_count.detail.as_deref().unwrap().contains("Not Found"));

        let result = db::check_key_column(
            state.get_rest_client(),
            state.get_client(),
            "videos",
            "id",
        )
        .await;
        match result {
            Err(CheckError::Query(RestClientError::Api(status, api_error))) => {
                assert_eq!(status.as_u16(), 404);
                assert_eq!(api_error.code.as_deref(), Some("42P01"));
            }
            other => panic!("Expected api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreachable_service_fails_with_http_error() {
        setup_logging();
        let config = AppConfig::from_vars([
            ("NEXT_PUBLIC_SUPABASE_URL", "http://127.0.0.1:1"),
            ("NEXT_PUBLIC_SUPABASE_ANON_KEY", "anon-key"),
            ("DB_TABLE_NAME", "videos"),
            ("DB_PRIMARY_KEY", "id"),
        ])
        .unwrap();
        let state = AppState::from_config(config).unwrap();

        let result =
            db::check_row_count(state.get_rest_client(), state.get_client(), "videos").await;

        assert!(matches!(
            result,
            Err(CheckError::Query(RestClientError::Http(_)))
        ));
    }
}
