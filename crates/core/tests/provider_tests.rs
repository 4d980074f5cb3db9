// ═══════════════════════════════════════════════════════════════════
// Provider Tests — RestHoldingsProvider URLs, payload parsing, HTTP
// ═══════════════════════════════════════════════════════════════════

use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use stock_dashboard_core::errors::CoreError;
use stock_dashboard_core::models::holding::{Holding, HoldingId, NewHolding};
use stock_dashboard_core::models::settings::Settings;
use stock_dashboard_core::providers::rest::{parse_holdings_payload, RestHoldingsProvider};
use stock_dashboard_core::providers::traits::HoldingsProvider;

// ═══════════════════════════════════════════════════════════════════
// Test Helpers — one-shot HTTP responder
// ═══════════════════════════════════════════════════════════════════

/// Accept a single connection, answer it with `status` and `body`, and
/// hand back the raw request text.
async fn serve_once(status: &'static str, body: String) -> (Settings, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];

        // Headers first, then as much body as Content-Length announces.
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|l| {
                        let (k, v) = l.split_once(':')?;
                        k.eq_ignore_ascii_case("content-length")
                            .then(|| v.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if request.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&request).to_string()
    });

    let settings = Settings {
        api_base_url: format!("http://{addr}"),
        ..Settings::default()
    };
    (settings, handle)
}

fn sample(id: u64) -> Holding {
    Holding {
        id: HoldingId::Number(id),
        name: "Apple".into(),
        ticker: "AAPL".into(),
        quantity: 2.0,
        buy_price: 100.0,
        current_price: Some(120.0),
    }
}

// ═══════════════════════════════════════════════════════════════════
// Construction & URLs
// ═══════════════════════════════════════════════════════════════════

mod construction {
    use super::*;

    #[test]
    fn builds_from_default_settings() {
        let provider = RestHoldingsProvider::new(&Settings::default()).unwrap();
        assert_eq!(provider.name(), "REST");
        assert_eq!(provider.collection_url().as_str(), "http://localhost:3001/stocks");
    }

    #[test]
    fn rejects_invalid_settings() {
        let settings = Settings {
            api_base_url: "not a url".into(),
            ..Settings::default()
        };
        assert!(matches!(
            RestHoldingsProvider::new(&settings),
            Err(CoreError::Config(_))
        ));
    }

    #[test]
    fn zero_timeout_is_allowed() {
        let settings = Settings {
            request_timeout_secs: 0,
            ..Settings::default()
        };
        assert!(RestHoldingsProvider::new(&settings).is_ok());
    }

    #[test]
    fn item_url_appends_id() {
        let provider = RestHoldingsProvider::new(&Settings::default()).unwrap();
        assert_eq!(
            provider.item_url(&HoldingId::from(12)).as_str(),
            "http://localhost:3001/stocks/12"
        );
        assert_eq!(
            provider.item_url(&HoldingId::from("abc")).as_str(),
            "http://localhost:3001/stocks/abc"
        );
    }

    #[test]
    fn item_url_escapes_path_characters() {
        let provider = RestHoldingsProvider::new(&Settings::default()).unwrap();
        let url = provider.item_url(&HoldingId::from("a/b"));
        assert_eq!(url.as_str(), "http://localhost:3001/stocks/a%2Fb");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Payload parsing
// ═══════════════════════════════════════════════════════════════════

mod payload {
    use super::*;

    #[test]
    fn array_of_holdings() {
        let list = parse_holdings_payload(json!([
            { "id": 1, "name": "A", "ticker": "A", "quantity": 1, "buyPrice": 2, "currentPrice": 3 },
            { "id": "x", "name": "B", "ticker": "B", "quantity": "4", "buyPrice": "5" }
        ]))
        .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].id, HoldingId::Text("x".into()));
        assert_eq!(list[1].current_price, None);
    }

    #[test]
    fn empty_array() {
        assert!(parse_holdings_payload(json!([])).unwrap().is_empty());
    }

    #[test]
    fn non_array_is_malformed() {
        for payload in [json!({}), json!(null), json!("stocks"), json!(3), json!(true)] {
            assert!(
                matches!(parse_holdings_payload(payload.clone()), Err(CoreError::MalformedResponse(_))),
                "{payload} should be rejected"
            );
        }
    }

    #[test]
    fn object_error_names_the_shape() {
        let err = parse_holdings_payload(json!({ "stocks": [] })).unwrap_err();
        assert_eq!(
            err,
            CoreError::MalformedResponse("expected an array of holdings, got an object".into())
        );
    }

    #[test]
    fn bad_record_is_malformed() {
        let result = parse_holdings_payload(json!([{ "name": "no id" }]));
        assert!(matches!(result, Err(CoreError::MalformedResponse(_))));
    }

    #[test]
    fn one_bad_record_rejects_the_whole_payload() {
        let payload = json!([
            { "id": 1, "name": "A", "ticker": "A", "quantity": 1, "buyPrice": 2, "currentPrice": 3 },
            { "id": 2, "name": "B", "ticker": "B", "quantity": "", "buyPrice": 2 }
        ]);
        match parse_holdings_payload(payload) {
            Err(CoreError::MalformedResponse(message)) => {
                assert!(message.contains("index 1"), "{message}");
            }
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn infinite_price_rejects_the_whole_payload() {
        let payload = json!([
            { "id": 1, "name": "A", "ticker": "A", "quantity": 2, "buyPrice": 1, "currentPrice": "inf" },
            { "id": 2, "name": "B", "ticker": "B", "quantity": 1, "buyPrice": 1, "currentPrice": 10 }
        ]);
        assert!(matches!(
            parse_holdings_payload(payload),
            Err(CoreError::MalformedResponse(_))
        ));
    }
}

// ═══════════════════════════════════════════════════════════════════
// HTTP round-trips
// ═══════════════════════════════════════════════════════════════════

mod http {
    use super::*;

    #[tokio::test]
    async fn list_fetches_collection() {
        let body = json!([sample(1), sample(2)]).to_string();
        let (settings, server) = serve_once("200 OK", body).await;
        let provider = RestHoldingsProvider::new(&settings).unwrap();

        let list = provider.list().await.unwrap();
        assert_eq!(list, vec![sample(1), sample(2)]);

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /stocks "), "{request}");
    }

    #[tokio::test]
    async fn list_rejects_object_payload() {
        let (settings, server) = serve_once("200 OK", json!({ "error": "nope" }).to_string()).await;
        let provider = RestHoldingsProvider::new(&settings).unwrap();

        let err = provider.list().await.unwrap_err();
        assert!(matches!(err, CoreError::MalformedResponse(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn list_reports_http_status() {
        let (settings, server) = serve_once("500 Internal Server Error", "{}".into()).await;
        let provider = RestHoldingsProvider::new(&settings).unwrap();

        let err = provider.list().await.unwrap_err();
        assert!(matches!(err, CoreError::Api { status: 500, .. }), "{err:?}");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn create_posts_candidate_with_null_price() {
        let (settings, server) = serve_once("201 Created", json!(sample(7)).to_string()).await;
        let provider = RestHoldingsProvider::new(&settings).unwrap();
        let candidate = NewHolding {
            name: "Apple".into(),
            ticker: "AAPL".into(),
            quantity: 2.0,
            buy_price: 100.0,
            current_price: None,
        };

        let created = provider.create(&candidate).await.unwrap();
        assert_eq!(created.id, HoldingId::Number(7));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /stocks "), "{request}");
        assert!(request.contains("\"currentPrice\":null"), "{request}");
        assert!(!request.contains("\"id\""), "{request}");
    }

    #[tokio::test]
    async fn update_puts_to_item_url() {
        let (settings, server) = serve_once("200 OK", json!(sample(3)).to_string()).await;
        let provider = RestHoldingsProvider::new(&settings).unwrap();

        let stored = provider.update(&sample(3)).await.unwrap();
        assert_eq!(stored, sample(3));

        let request = server.await.unwrap();
        assert!(request.starts_with("PUT /stocks/3 "), "{request}");
    }

    #[tokio::test]
    async fn update_rejects_non_holding_body() {
        let (settings, server) = serve_once("200 OK", json!([1, 2]).to_string()).await;
        let provider = RestHoldingsProvider::new(&settings).unwrap();

        let err = provider.update(&sample(3)).await.unwrap_err();
        assert!(matches!(err, CoreError::MalformedResponse(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn delete_succeeds_on_2xx() {
        let (settings, server) = serve_once("200 OK", "{}".into()).await;
        let provider = RestHoldingsProvider::new(&settings).unwrap();

        provider.delete(&HoldingId::from("abc")).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("DELETE /stocks/abc "), "{request}");
    }

    #[tokio::test]
    async fn delete_reports_not_found() {
        let (settings, server) = serve_once("404 Not Found", "{}".into()).await;
        let provider = RestHoldingsProvider::new(&settings).unwrap();

        let err = provider.delete(&HoldingId::from(1)).await.unwrap_err();
        assert!(matches!(err, CoreError::Api { status: 404, .. }));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let settings = Settings {
            api_base_url: format!("http://{addr}"),
            ..Settings::default()
        };
        let provider = RestHoldingsProvider::new(&settings).unwrap();
        let err = provider.list().await.unwrap_err();
        assert!(matches!(err, CoreError::Network(_)), "{err:?}");
    }
}
