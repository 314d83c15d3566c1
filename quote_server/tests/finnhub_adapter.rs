mod common;

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

use common::aggregator_with;
use quote_server::model::live_quote::{FinnhubProvider, LiveQuote, ProviderError, QuoteProvider};

/// Answer exactly one HTTP request with `status` and `body`; returns the base URL and the
/// raw request head.
fn respond_once(status: &'static str, body: &'static str) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 4096];
            let size = stream.read(&mut buf).unwrap_or(0);
            let _ = tx.send(String::from_utf8_lossy(&buf[..size]).to_string());
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\
                 Connection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });
    (format!("http://{}/api/v1", addr), rx)
}

#[test]
fn fetches_and_translates_quote() {
    let (url, requests) =
        respond_once("200 OK", r#"{"c":189.984,"o":188.5,"pc":0,"h":191,"l":187}"#);
    let provider = FinnhubProvider::new(&url, "test-key").unwrap();

    let quote = provider.fetch_quote("AAPL").unwrap();
    assert_eq!(
        quote,
        LiveQuote {
            price: 189.98,
            open: Some(188.5),
            prev_close: None,
        }
    );

    let request = requests.recv().unwrap();
    assert!(request.starts_with("GET /api/v1/quote?symbol=AAPL&token=test-key "), "{request}");
}

#[test]
fn non_success_status_is_a_failure() {
    let (url, _requests) =
        respond_once("429 Too Many Requests", r#"{"error":"API limit reached"}"#);
    let provider = FinnhubProvider::new(&url, "k").unwrap();
    assert!(matches!(provider.fetch_quote("AAPL"), Err(ProviderError::Status(429))));
}

#[test]
fn non_numeric_price_is_a_failure() {
    let (url, _requests) = respond_once("200 OK", r#"{"c":null}"#);
    let provider = FinnhubProvider::new(&url, "k").unwrap();
    assert!(matches!(provider.fetch_quote("AAPL"), Err(ProviderError::Payload(_))));
}

#[test]
fn unreachable_provider_is_a_transport_failure() {
    let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let provider = FinnhubProvider::new(&format!("http://{addr}"), "k").unwrap();
    assert!(matches!(provider.fetch_quote("AAPL"), Err(ProviderError::Transport(_))));
}

#[test]
fn failing_provider_still_yields_a_full_batch() {
    let (url, _requests) = respond_once("500 Internal Server Error", "{}");
    let provider = FinnhubProvider::new(&url, "k").unwrap();
    let aggregator = aggregator_with("AAPL", Some(Box::new(provider)));

    let batch = aggregator.get_batch().unwrap();
    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].symbol, "AAPL");
    assert!((95.0..=105.0).contains(&batch[0].price));
    assert_eq!(batch[0].history, vec![batch[0].price]);
}
