use api_client::{ApiClient, ApiConfig, ApiError, CancellationToken, Endpoint, KpiSource};
use serde_json::json;

async fn client_for(server: &mockito::ServerGuard) -> ApiClient {
    ApiClient::new(ApiConfig::new(server.url())).unwrap()
}

fn summary_body() -> String {
    json!({
        "periods": ["2024-01", "2024-02"],
        "total_sales": 2513313541.16,
        "total_expenses": -2841960946116.74,
        "net_profit": -2839447632575.58,
        "profit_margin": -112976.77,
        "accounts_receivable": 1500.0,
        "accounts_payable": -500.0,
        "cash_flow_summary": {"operating": 1.0, "investment": 2.0, "financing": 3.0}
    })
    .to_string()
}

fn cash_flow_body() -> String {
    json!({
        "periods": ["2024-01", "2024-02"],
        "operating_cash_flow": {"2024-01": 10.0, "2024-02": 20.0},
        "financing_cash_flow": {"2024-01": 1.0},
        "investment_cash_flow": {},
        "accumulated_cash_flow": {"2024-01": 11.0, "2024-02": 31.0},
        "total_cash_flow": {"2024-01": 11.0, "2024-02": 20.0}
    })
    .to_string()
}

#[tokio::test]
async fn loads_financial_bundle() {
    let mut server = mockito::Server::new_async().await;
    let summary = server
        .mock("GET", "/api/kpis/financial/summary")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(summary_body())
        .create_async()
        .await;
    let cash_flow = server
        .mock("GET", "/api/kpis/financial/cash-flow")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(cash_flow_body())
        .create_async()
        .await;

    let client = client_for(&server).await;
    let data = client.financial().await.unwrap();

    summary.assert_async().await;
    cash_flow.assert_async().await;
    assert_eq!(data.summary.accounts_payable, -500.0);
    assert_eq!(data.cash_flow.total_cash_flow["2024-02"], 20.0);
}

#[tokio::test]
async fn first_failure_short_circuits() {
    let mut server = mockito::Server::new_async().await;
    let accounts = server
        .mock("GET", "/api/kpis/accounts")
        .with_status(500)
        .create_async()
        .await;
    let receivable = server
        .mock("GET", "/api/kpis/accounts/receivable")
        .with_status(200)
        .with_body("{}")
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server).await;
    let err = client.accounts().await.unwrap_err();

    accounts.assert_async().await;
    receivable.assert_async().await;
    assert!(matches!(
        err,
        ApiError::Status {
            endpoint: Endpoint::Accounts,
            status: 500
        }
    ));
    let message = err.user_message(&KpiSource::base_url(&client));
    assert!(message.contains(&server.url()));
    assert!(message.contains("Error 500: could not fetch accounts data"));
}

#[tokio::test]
async fn malformed_json_is_a_decode_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/ml/sales-forecast")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{not json")
        .create_async()
        .await;

    let client = client_for(&server).await;
    let err = client.sales_forecast().await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::Decode {
            endpoint: Endpoint::SalesForecast,
            ..
        }
    ));
}

#[tokio::test]
async fn training_is_posted() {
    let mut server = mockito::Server::new_async().await;
    let train = server
        .mock("POST", "/api/ml/train/sales-forecast")
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "trained"}"#)
        .create_async()
        .await;

    let client = client_for(&server).await;
    let body = client.train_sales_forecast().await.unwrap();

    train.assert_async().await;
    assert_eq!(body["status"], "trained");
}

#[tokio::test]
async fn cancelled_token_stops_requests() {
    let mut server = mockito::Server::new_async().await;
    let sales = server
        .mock("GET", "/api/kpis/sales")
        .with_status(200)
        .with_body("{}")
        .expect(0)
        .create_async()
        .await;

    let token = CancellationToken::new();
    token.cancel();
    let client = client_for(&server).await.with_cancellation(token);
    let err = client.sales().await.unwrap_err();

    sales.assert_async().await;
    assert!(err.is_cancelled());
    assert_eq!(err.endpoint(), Some(Endpoint::Sales));
}

#[tokio::test]
async fn cancelling_mid_request_aborts_the_fetch() {
    // Accepts the connection and never answers.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let held = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_secs(30)).await;
        drop(socket);
    });

    let token = CancellationToken::new();
    let client = ApiClient::new(ApiConfig::new(format!("http://{addr}")))
        .unwrap()
        .with_cancellation(token.clone());
    let canceller = tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        token.cancel();
    });

    let err = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        client.fetch::<serde_json::Value>(Endpoint::SalesForecast),
    )
    .await
    .expect("fetch should stop once the token is cancelled")
    .unwrap_err();

    canceller.await.unwrap();
    held.abort();
    assert!(err.is_cancelled());
    assert_eq!(err.endpoint(), Some(Endpoint::SalesForecast));
}

#[tokio::test]
async fn unreachable_server_is_a_request_error() {
    // Port 9 (discard) is almost never listening.
    let client = ApiClient::new(ApiConfig::new("http://127.0.0.1:9")).unwrap();
    let err = client.fetch::<serde_json::Value>(Endpoint::Sales).await.unwrap_err();
    assert!(matches!(err, ApiError::Request { .. }));
}
