//! Delivery against a live HTTP server

use paywire_webhooks::{
    DeliveryError, DeliveryState, DispatchCoordinator, HttpTransport, InMemorySubscriberRepository,
    NewSubscriber, RetryPolicy, RetryScheduler, SubscriberRepository, WebhookConfig,
    WebhookPayload, WebhookTransport,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn scheduler(max_attempts: u32) -> RetryScheduler {
    let config = WebhookConfig::builder()
        .connect_timeout(Duration::from_millis(500))
        .read_timeout(Duration::from_millis(200))
        .user_agent("paywire-test/1.0")
        .retry_policy(RetryPolicy::exponential(max_attempts, Duration::from_millis(20)))
        .build();

    let transport = HttpTransport::new(&config).unwrap();
    RetryScheduler::new(Arc::new(transport), config.retry_policy)
}

fn payload() -> WebhookPayload {
    WebhookPayload::from_event("PAYMENT_CREATED", &json!({"eventType": "PAYMENT_CREATED"}))
        .unwrap()
}

#[tokio::test]
async fn test_successful_delivery_sends_json_post() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(header("content-type", "application/json"))
        .and(header("user-agent", "paywire-test/1.0"))
        .and(body_json(json!({"eventType": "PAYMENT_CREATED"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let task = scheduler(3)
        .deliver(format!("{}/hook", server.uri()), payload())
        .await
        .unwrap();

    assert_eq!(task.state, DeliveryState::Succeeded);
    assert_eq!(task.attempts, 1);
}

#[tokio::test]
async fn test_any_2xx_is_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let task = scheduler(3).deliver(server.uri(), payload()).await.unwrap();
    assert!(task.state.is_success());
}

#[tokio::test]
async fn test_server_error_exhausts_all_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let task = scheduler(3)
        .deliver(format!("{}/hook", server.uri()), payload())
        .await
        .unwrap();

    assert_eq!(task.state, DeliveryState::Exhausted);
    assert_eq!(task.attempts, 3);
    assert_eq!(task.last_error, Some(DeliveryError::Status(500)));
}

#[tokio::test]
async fn test_recovers_after_one_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let task = scheduler(3).deliver(server.uri(), payload()).await.unwrap();
    assert_eq!(task.state, DeliveryState::Succeeded);
    assert_eq!(task.attempts, 2);
}

#[tokio::test]
async fn test_client_errors_are_retried_too() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&server)
        .await;

    let task = scheduler(2).deliver(server.uri(), payload()).await.unwrap();
    assert_eq!(task.state, DeliveryState::Exhausted);
    assert_eq!(task.last_error, Some(DeliveryError::Status(404)));
}

#[tokio::test]
async fn test_slow_response_counts_as_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let task = scheduler(1).deliver(server.uri(), payload()).await.unwrap();
    assert_eq!(task.state, DeliveryState::Exhausted);

    let error = task.last_error.unwrap();
    assert_eq!(error.status(), None);
}

#[tokio::test]
async fn test_unreachable_host_is_a_connect_error() {
    // Bind and drop to get a port nobody listens on
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let task = scheduler(2)
        .deliver(format!("http://127.0.0.1:{}/hook", port), payload())
        .await
        .unwrap();

    assert_eq!(task.state, DeliveryState::Exhausted);
    assert_eq!(task.attempts, 2);
    assert!(matches!(task.last_error, Some(DeliveryError::Connect(_))));
}

#[tokio::test]
async fn test_malformed_url_is_retried_then_exhausted() {
    let task = scheduler(2).deliver("not-a-url", payload()).await.unwrap();

    assert_eq!(task.state, DeliveryState::Exhausted);
    assert_eq!(task.attempts, 2);
    assert!(matches!(task.last_error, Some(DeliveryError::InvalidUrl(_))));
}

#[tokio::test]
async fn test_fan_out_reaches_each_active_subscriber() {
    let healthy = MockServer::start().await;
    let broken = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&healthy)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&broken)
        .await;

    let repository = InMemorySubscriberRepository::new();
    for subscriber in [
        NewSubscriber::new(healthy.uri()),
        NewSubscriber::new(broken.uri()),
        NewSubscriber::new("http://127.0.0.1:9/never").inactive(),
    ] {
        repository.save(subscriber).await.unwrap();
    }

    let coordinator = DispatchCoordinator::new(scheduler(3));
    let subscribers = repository.find_all().await.unwrap();
    assert_eq!(coordinator.dispatch(&payload(), &subscribers), 2);

    // Backoff is 20ms + 40ms; allow generous slack
    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(healthy.received_requests().await.unwrap().len(), 1);
    assert_eq!(broken.received_requests().await.unwrap().len(), 3);
}

/// Answers `200 OK` at once, then trickles a large body one byte at a time
async fn trickling_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                return;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let head = concat!(
            "HTTP/1.1 200 OK\r\n",
            "content-type: text/plain\r\n",
            "content-length: 100000\r\n",
            "\r\n"
        );
        if socket.write_all(head.as_bytes()).await.is_err() {
            return;
        }
        loop {
            tokio::time::sleep(Duration::from_millis(100)).await;
            if socket.write_all(b"x").await.is_err() {
                return;
            }
        }
    });

    format!("http://{}/hook", addr)
}

#[tokio::test]
async fn test_success_status_returns_without_reading_body() {
    let url = trickling_server().await;
    let config = WebhookConfig::builder()
        .connect_timeout(Duration::from_millis(500))
        .read_timeout(Duration::from_millis(200))
        .build();
    let transport = HttpTransport::new(&config).unwrap();

    let outcome = tokio::time::timeout(Duration::from_secs(2), transport.send(&url, &payload()))
        .await
        .expect("attempt should end once the status line arrives");

    assert_eq!(outcome, Ok(()));
}
