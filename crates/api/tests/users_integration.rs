use futures::future::join_all;
use userlist_api::error::ApiError;
use userlist_api::{ApiClient, UserQuery};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn page_body(page: i64, emails: &[&str]) -> serde_json::Value {
    let results: Vec<serde_json::Value> = emails
        .iter()
        .map(|email| {
            serde_json::json!({
                "gender": "female",
                "name": {"title": "Ms", "first": "Test", "last": "User"},
                "email": email,
                "login": {"uuid": format!("uuid-{email}")},
                "nat": "US"
            })
        })
        .collect();

    serde_json::json!({
        "results": results,
        "info": {"seed": "fixed", "results": emails.len(), "page": page, "version": "1.4"}
    })
}

#[tokio::test]
async fn test_get_users_requests_page_and_results() {
    let mock_server = MockServer::start().await;
    let body = page_body(2, &["a@example.com", "b@example.com"]);

    Mock::given(method("GET"))
        .and(path("/api"))
        .and(query_param("page", "2"))
        .and(query_param("results", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(format!("{}/api", mock_server.uri())).unwrap();
    let response = client.get_users_page(2, 5).await.unwrap();

    assert_eq!(serde_json::to_value(&response).unwrap(), body);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), Some("page=2&results=5"));
}

#[tokio::test]
async fn test_get_users_default_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api"))
        .and(query_param("page", "1"))
        .and(query_param("results", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, &["x@example.com"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(format!("{}/api", mock_server.uri())).unwrap();
    let response = client.get_users(UserQuery::default()).await.unwrap();

    assert_eq!(response.info.page, Some(1));
    assert_eq!(response.results[0].email, "x@example.com");
}

#[tokio::test]
async fn test_get_users_keeps_unmodelled_fields() {
    let mock_server = MockServer::start().await;
    let body = serde_json::json!({
        "results": [{
            "gender": "male",
            "name": {"title": "Mr", "first": "Alan", "last": "Turing"},
            "email": "alan@example.com",
            "login": {"uuid": "u", "username": "alan", "password": "enigma", "sha256": "abc"},
            "dob": {"date": "1912-06-23T00:00:00.000Z", "age": 41},
            "registered": {"date": "2004-01-01T00:00:00.000Z", "age": 20},
            "id": {"name": "NINO", "value": "AB 12 34 56 C"},
            "picture": {
                "large": "https://example.com/l.jpg",
                "medium": "https://example.com/m.jpg",
                "thumbnail": "https://example.com/t.jpg"
            },
            "location": {"city": "Wilmslow", "postcode": "SK9"}
        }],
        "info": {"seed": "s", "results": 1, "page": 1, "version": "1.4", "generated": true},
        "debug": {"took_ms": 3}
    });

    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(format!("{}/api", mock_server.uri())).unwrap();
    let response = client.get_users(UserQuery::default()).await.unwrap();

    assert_eq!(serde_json::to_value(&response).unwrap(), body);
    assert_eq!(response.results[0].extra["id"]["name"], "NINO");
}

#[tokio::test]
async fn test_negative_page_is_echoed_back() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("page", "-1"))
        .and(query_param("results", "0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"results": [], "info": {"page": -1, "results": 0}})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri()).unwrap();
    let response = client.get_users(UserQuery::new(-1, 0)).await.unwrap();

    assert!(response.is_empty());
    assert_eq!(response.info.page, Some(-1));
    assert_eq!(response.info.results, Some(0));
}

#[tokio::test]
async fn test_get_json_returns_raw_body() {
    let mock_server = MockServer::start().await;
    let body = serde_json::json!({
        "results": [],
        "info": {"page": 3},
        "extra": {"nested": [1, 2, 3]}
    });

    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(format!("{}/api", mock_server.uri())).unwrap();
    let raw: serde_json::Value = client.get_json(UserQuery::new(3, 10)).await.unwrap();

    assert_eq!(raw, body);
}

#[tokio::test]
async fn test_empty_page_is_not_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(99, &[])))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri()).unwrap();
    let response = client.get_users_page(99, 10).await.unwrap();

    assert!(response.is_empty());
}

#[tokio::test]
async fn test_network_failure_returns_error() {
    let mock_server = MockServer::start().await;
    let uri = mock_server.uri();
    drop(mock_server);

    let client = ApiClient::new(uri).unwrap();
    let result = client.get_users(UserQuery::default()).await;

    assert!(matches!(result, Err(ApiError::RequestFailed(_))));
}

#[tokio::test]
async fn test_invalid_json_returns_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri()).unwrap();
    let result = client.get_users(UserQuery::default()).await;

    assert!(matches!(result, Err(ApiError::JsonError(_))));
}

#[tokio::test]
async fn test_wrong_shape_returns_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"users": [], "page": 1})),
        )
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri()).unwrap();
    let result = client.get_users(UserQuery::default()).await;

    assert!(matches!(result, Err(ApiError::JsonError(_))));
}

#[tokio::test]
async fn test_blank_email_fails_validation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, &["ok@example.com", ""])))
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri()).unwrap();
    let result = client.get_users(UserQuery::default()).await;

    match result {
        Err(ApiError::InvalidResponse(message)) => assert!(message.contains("index 1")),
        other => panic!("expected InvalidResponse, got {other:?}"),
    }
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ApiClient::new(mock_server.uri()).unwrap();
    let result = client.get_users(UserQuery::default()).await;

    match result {
        Err(ApiError::HttpStatus { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "Service Unavailable");
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_concurrent_requests_use_their_own_query() {
    let mock_server = MockServer::start().await;

    for page in 1..=4i64 {
        let email = format!("page{page}@example.com");
        Mock::given(method("GET"))
            .and(path("/api"))
            .and(query_param("page", page.to_string()))
            .and(query_param("results", (page * 2).to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(page, &[email.as_str()])))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let client = ApiClient::new(format!("{}/api", mock_server.uri())).unwrap();
    let calls = (1..=4i64).map(|page| {
        let client = client.clone();
        async move { client.get_users_page(page, page * 2).await }
    });

    let responses = join_all(calls).await;

    for (index, response) in responses.into_iter().enumerate() {
        let page = index as i64 + 1;
        let response = response.unwrap();
        assert_eq!(response.info.page, Some(page));
        assert_eq!(response.results[0].email, format!("page{page}@example.com"));
    }

    let mut queries: Vec<String> = mock_server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter_map(|r| r.url.query().map(str::to_string))
        .collect();
    queries.sort();
    assert_eq!(
        queries,
        vec![
            "page=1&results=2",
            "page=2&results=4",
            "page=3&results=6",
            "page=4&results=8",
        ]
    );
}
