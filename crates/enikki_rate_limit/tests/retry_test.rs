use enikki_rate_limit::{
    Pacer, RetryObserver, RetryPolicy, TracingObserver, with_retry, with_retry_if,
};
use std::fmt::Display;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct RecordingObserver {
    failures: Mutex<Vec<(usize, String)>>,
    exhausted: Mutex<Option<usize>>,
}

impl RetryObserver for RecordingObserver {
    fn attempt_failed(&self, _operation: &str, attempt: usize, _max: usize, error: &dyn Display) {
        self.failures
            .lock()
            .unwrap()
            .push((attempt, error.to_string()));
    }

    fn exhausted(&self, _operation: &str, attempts: usize, _error: &dyn Display) {
        *self.exhausted.lock().unwrap() = Some(attempts);
    }
}

#[tokio::test(start_paused = true)]
async fn stops_after_max_attempts_and_returns_last_error() {
    let observer = RecordingObserver::default();
    let calls = Arc::new(Mutex::new(0usize));
    let policy = RetryPolicy::fixed(3, Duration::from_secs(2)).unwrap();
    let started = tokio::time::Instant::now();

    let result: Result<(), _> = with_retry(&policy, &observer, "image", |attempt| {
        let calls = calls.clone();
        async move {
            *calls.lock().unwrap() += 1;
            Err(format!("failure {attempt}"))
        }
    })
    .await;

    let exhausted = result.unwrap_err();
    assert_eq!(exhausted.attempts, 3);
    assert_eq!(exhausted.last_error, "failure 3");
    assert_eq!(*calls.lock().unwrap(), 3);
    assert_eq!(observer.failures.lock().unwrap().len(), 3);
    assert_eq!(*observer.exhausted.lock().unwrap(), Some(3));
    // Two waits between three attempts.
    assert!(started.elapsed() >= Duration::from_secs(4));
}

#[tokio::test(start_paused = true)]
async fn returns_first_success() {
    let observer = RecordingObserver::default();
    let policy = RetryPolicy::fixed(3, Duration::from_secs(2)).unwrap();

    let value = with_retry(&policy, &observer, "image", |attempt| async move {
        if attempt == 1 {
            Err("transient")
        } else {
            Ok(attempt * 10)
        }
    })
    .await
    .unwrap();

    assert_eq!(value, 20);
    assert_eq!(
        *observer.failures.lock().unwrap(),
        vec![(1, "transient".to_string())]
    );
    assert_eq!(*observer.exhausted.lock().unwrap(), None);
}

#[tokio::test]
async fn single_attempt_policy_does_not_retry() {
    let calls = Arc::new(Mutex::new(0usize));

    let result: Result<(), _> = with_retry(&RetryPolicy::once(), &TracingObserver, "summary", |_| {
        let calls = calls.clone();
        async move {
            *calls.lock().unwrap() += 1;
            Err("boom")
        }
    })
    .await;

    assert_eq!(result.unwrap_err().attempts, 1);
    assert_eq!(*calls.lock().unwrap(), 1);
}

#[test]
fn policy_deserializes_from_settings() {
    let policy: RetryPolicy =
        serde_json::from_str(r#"{"max_attempts": 3, "backoff_ms": 2000}"#).unwrap();
    assert_eq!(policy, RetryPolicy::fixed(3, Duration::from_secs(2)).unwrap());

    let zero: Result<RetryPolicy, _> =
        serde_json::from_str(r#"{"max_attempts": 0, "backoff_ms": 0}"#);
    assert!(zero.is_err());
}

#[tokio::test]
async fn disabled_pacer_never_waits() {
    let pacer = Pacer::new(Duration::ZERO);
    assert!(!pacer.is_enabled());
    for _ in 0..10 {
        pacer.pace().await;
    }
}

#[tokio::test]
async fn pacer_spaces_consecutive_calls() {
    let pacer = Pacer::new(Duration::from_millis(50));
    let shared = pacer.clone();
    let started = std::time::Instant::now();

    pacer.pace().await;
    shared.pace().await;
    pacer.pace().await;

    assert!(started.elapsed() >= Duration::from_millis(90));
}

#[tokio::test(start_paused = true)]
async fn permanent_error_stops_early() {
    let observer = RecordingObserver::default();
    let policy = RetryPolicy::fixed(5, Duration::from_secs(2)).unwrap();

    let result: Result<(), _> = with_retry_if(
        &policy,
        &observer,
        "summary",
        |err: &String| err.starts_with("503"),
        |attempt| async move {
            if attempt == 1 {
                Err("503 overloaded".to_string())
            } else {
                Err("400 bad request".to_string())
            }
        },
    )
    .await;

    let exhausted = result.unwrap_err();
    assert_eq!(exhausted.attempts, 2);
    assert_eq!(exhausted.last_error, "400 bad request");
    assert_eq!(observer.failures.lock().unwrap().len(), 2);
}
