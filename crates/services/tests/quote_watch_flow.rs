//! 刷新 → 读取 → 评估 → 分发 的完整流程，全部使用进程内协作方

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::Mutex;
use tokio::time::Instant;

use quote_watch_domain::{
    AccountBook, AccountBookSource, Advisor, Alert, Holding, InstrumentClass, Notifier, PriceBar,
    QuoteRecord, QuoteSource, QuoteWatchError, Snapshot, SnapshotRepository, TickerUniverse,
};
use quote_watch_infrastructure::{
    InMemorySnapshotRepository, JsonAccountBookRepository, SnapshotState,
};
use quote_watch_services::market::serialize;
use quote_watch_services::{
    AlertEvaluator, DispatchReport, NotificationDispatcher, QuoteRefreshService, SnapshotService,
};

/// 按代码返回预设结果，并记录调用顺序
struct StubQuoteSource {
    quotes: HashMap<String, Result<QuoteRecord, QuoteWatchError>>,
    calls: Mutex<Vec<(String, Instant)>>,
}

impl StubQuoteSource {
    fn new(entries: Vec<(&str, Result<QuoteRecord, QuoteWatchError>)>) -> Self {
        Self {
            quotes: entries
                .into_iter()
                .map(|(symbol, result)| (symbol.to_string(), result))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.iter().map(|(s, _)| s.clone()).collect()
    }

    async fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().await.iter().map(|(_, at)| *at).collect()
    }
}

#[async_trait]
impl QuoteSource for StubQuoteSource {
    fn name(&self) -> &str {
        "stub"
    }

    async fn fetch(&self, symbol: &str, _class: InstrumentClass) -> Result<QuoteRecord, QuoteWatchError> {
        self.calls.lock().await.push((symbol.to_string(), Instant::now()));
        self.quotes
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| Err(QuoteWatchError::missing(symbol, "longName")))
    }
}

struct BrokenRepository;

#[async_trait]
impl SnapshotRepository for BrokenRepository {
    fn name(&self) -> &str {
        "broken"
    }

    async fn put(&self, _blob: &str) -> Result<(), QuoteWatchError> {
        Err(QuoteWatchError::StoreUnavailable("disk full".to_string()))
    }

    async fn get(&self) -> Result<String, QuoteWatchError> {
        Err(QuoteWatchError::StoreUnavailable("disk full".to_string()))
    }
}

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), QuoteWatchError> {
        self.sent
            .lock()
            .await
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}

fn quote(symbol: &str, name: &str, current: Decimal, opens: &[Decimal]) -> QuoteRecord {
    QuoteRecord {
        instrument_class: InstrumentClass::infer(symbol),
        symbol: symbol.to_string(),
        display_name: name.to_string(),
        current_price: current,
        currency: "USD".to_string(),
        recent_history: opens.iter().map(|o| PriceBar::from_open(*o)).collect(),
        sustainability_scores: None,
    }
}

fn universe(raw: &str) -> TickerUniverse {
    TickerUniverse::parse(raw).unwrap()
}

fn services(
    source: Arc<StubQuoteSource>,
) -> (QuoteRefreshService, SnapshotService, Arc<InMemorySnapshotRepository>) {
    let repository = Arc::new(InMemorySnapshotRepository::new());
    let state = Arc::new(SnapshotState::new());
    let refresh = QuoteRefreshService::new(source, repository.clone(), state.clone(), Duration::ZERO);
    let read = SnapshotService::new(repository.clone(), state);
    (refresh, read, repository)
}

#[tokio::test]
async fn full_pass_commits_every_ticker() {
    let source = Arc::new(StubQuoteSource::new(vec![
        ("AAPL", Ok(quote("AAPL", "Apple Inc.", dec!(150), &[dec!(152), dec!(148)]))),
        ("BTC-USD", Ok(quote("BTC-USD", "Bitcoin USD", dec!(60000), &[dec!(61000), dec!(59000)]))),
    ]));
    let (refresh, read, repository) = services(source.clone());

    let outcome = refresh.refresh(&universe("AAPL,BTC-USD")).await.unwrap();

    assert!(outcome.is_complete());
    assert_eq!(outcome.snapshot.len(), 2);
    assert_eq!(source.calls().await, vec!["AAPL", "BTC-USD"]);

    let stored = Snapshot::from_blob(&repository.get().await.unwrap()).unwrap();
    assert_eq!(stored, outcome.snapshot);
    assert_eq!(*read.get_snapshot().await, outcome.snapshot);
}

#[tokio::test]
async fn provider_failure_aborts_pass_and_commits_partial_snapshot() {
    let source = Arc::new(StubQuoteSource::new(vec![
        ("AAPL", Ok(quote("AAPL", "Apple Inc.", dec!(150), &[dec!(152), dec!(148)]))),
        ("MSFT", Err(QuoteWatchError::missing("MSFT", "longName"))),
        ("TSLA", Ok(quote("TSLA", "Tesla, Inc.", dec!(200), &[dec!(201), dec!(199)]))),
    ]));
    let (refresh, read, _repository) = services(source.clone());

    let outcome = refresh.refresh(&universe("AAPL,MSFT,TSLA")).await.unwrap();

    assert_eq!(outcome.aborted, Some(QuoteWatchError::missing("MSFT", "longName")));
    assert_eq!(source.calls().await, vec!["AAPL", "MSFT"]);

    let snapshot = read.get_snapshot().await;
    assert_eq!(snapshot.len(), 1);
    assert!(snapshot.get("AAPL").is_some());
}

#[tokio::test]
async fn empty_history_is_skipped_not_committed() {
    let source = Arc::new(StubQuoteSource::new(vec![
        ("AAPL", Ok(quote("AAPL", "Apple Inc.", dec!(150), &[]))),
        ("MSFT", Ok(quote("MSFT", "Microsoft", dec!(300), &[dec!(301)]))),
    ]));
    let (refresh, _read, _repository) = services(source);

    let outcome = refresh.refresh(&universe("AAPL,MSFT")).await.unwrap();

    assert!(outcome.is_complete());
    assert_eq!(outcome.skipped, vec!["AAPL".to_string()]);
    assert!(outcome.snapshot.records().all(|q| !q.recent_history.is_empty()));
    assert!(outcome.snapshot.get("MSFT").is_some());
}

#[tokio::test]
async fn store_failure_fails_the_pass_and_keeps_memory_snapshot() {
    let source = Arc::new(StubQuoteSource::new(vec![(
        "AAPL",
        Ok(quote("AAPL", "Apple Inc.", dec!(150), &[dec!(152), dec!(148)])),
    )]));
    let repository: Arc<dyn SnapshotRepository> = Arc::new(BrokenRepository);
    let state = Arc::new(SnapshotState::new());
    let refresh = QuoteRefreshService::new(source, repository.clone(), state.clone(), Duration::ZERO);
    let read = SnapshotService::new(repository, state);

    let result = refresh.refresh(&universe("AAPL")).await;

    assert!(matches!(result, Err(QuoteWatchError::StoreUnavailable(_))));
    // 读路径不报错，回退到（仍为空的）内存快照
    assert_eq!(serialize(read.get_snapshot().await.as_ref()), "[]");
}

#[tokio::test]
async fn refresh_evaluate_dispatch_end_to_end() {
    let source = Arc::new(StubQuoteSource::new(vec![
        ("AAPL", Ok(quote("AAPL", "Apple Inc.", dec!(150), &[dec!(152), dec!(148)]))),
        ("MSFT", Ok(quote("MSFT", "Microsoft", dec!(300), &[dec!(301), dec!(299)]))),
    ]));
    let (refresh, _read, _repository) = services(source);
    let outcome = refresh.refresh(&universe("AAPL,MSFT")).await.unwrap();

    let book = AccountBook {
        directory: [("adv-1".to_string(), "alice@example.com".to_string())]
            .into_iter()
            .collect(),
        advisors: vec![
            Advisor {
                account_id: "adv-1".to_string(),
                holdings: vec![
                    Holding::new("AAPL", vec![Alert::new("150"), Alert::new("160")]),
                    Holding::new("MSFT", vec![Alert::new("not a price"), Alert::new("300")]),
                    Holding::new("NFLX", vec![Alert::new("400")]),
                ],
            },
            Advisor {
                account_id: "unknown".to_string(),
                holdings: vec![Holding::new("AAPL", vec![Alert::new("150")])],
            },
        ],
        managers: vec![],
    };

    let triggered = AlertEvaluator::new().evaluate_book(&outcome.snapshot, &book);
    assert_eq!(triggered.len(), 2);

    let notifier = Arc::new(RecordingNotifier::default());
    let report = NotificationDispatcher::new(notifier.clone())
        .dispatch(&triggered)
        .await;
    assert_eq!(report, DispatchReport { sent: 2, failed: 0 });

    let sent = notifier.sent.lock().await;
    assert_eq!(sent[0].0, "alice@example.com");
    assert_eq!(sent[0].1, "Price alert: Apple Inc.");
    assert!(sent[0].2.contains("150"));
    assert_eq!(sent[1].1, "Price alert: Microsoft");
}

#[tokio::test(start_paused = true)]
async fn pacing_waits_between_calls_only() {
    let pacing = Duration::from_secs(2);
    let source = Arc::new(StubQuoteSource::new(vec![
        ("AAPL", Ok(quote("AAPL", "Apple Inc.", dec!(150), &[dec!(152), dec!(148)]))),
        ("MSFT", Ok(quote("MSFT", "Microsoft", dec!(300), &[dec!(301), dec!(299)]))),
        ("TSLA", Ok(quote("TSLA", "Tesla, Inc.", dec!(200), &[dec!(201), dec!(199)]))),
    ]));
    let repository = Arc::new(InMemorySnapshotRepository::new());
    let refresh = QuoteRefreshService::new(
        source.clone(),
        repository,
        Arc::new(SnapshotState::new()),
        pacing,
    );

    let start = Instant::now();
    let outcome = refresh.refresh(&universe("AAPL,MSFT,TSLA")).await.unwrap();
    let elapsed = start.elapsed();

    assert!(outcome.is_complete());
    assert!(elapsed >= pacing * 2, "elapsed {:?}", elapsed);
    assert!(elapsed < pacing * 3, "elapsed {:?}", elapsed);

    let times = source.call_times().await;
    assert_eq!(times.len(), 3);
    assert_eq!(times[0], start);
    assert!(times[1] - times[0] >= pacing);
    assert!(times[2] - times[1] >= pacing);
}

#[tokio::test(start_paused = true)]
async fn pacing_stops_after_aborting_error() {
    let pacing = Duration::from_secs(2);
    let source = Arc::new(StubQuoteSource::new(vec![
        ("AAPL", Ok(quote("AAPL", "Apple Inc.", dec!(150), &[dec!(152), dec!(148)]))),
        ("MSFT", Err(QuoteWatchError::missing("MSFT", "longName"))),
        ("TSLA", Ok(quote("TSLA", "Tesla, Inc.", dec!(200), &[dec!(201), dec!(199)]))),
    ]));
    let repository = Arc::new(InMemorySnapshotRepository::new());
    let refresh = QuoteRefreshService::new(
        source.clone(),
        repository,
        Arc::new(SnapshotState::new()),
        pacing,
    );

    let start = Instant::now();
    let outcome = refresh.refresh(&universe("AAPL,MSFT,TSLA")).await.unwrap();
    let elapsed = start.elapsed();

    assert!(!outcome.is_complete());
    assert_eq!(source.calls().await, vec!["AAPL", "MSFT"]);
    // 只有 AAPL 与 MSFT 之间的一次等待
    assert!(elapsed >= pacing, "elapsed {:?}", elapsed);
    assert!(elapsed < pacing * 2, "elapsed {:?}", elapsed);
}

#[tokio::test]
async fn malformed_targets_do_not_block_sibling_alerts() {
    let source = Arc::new(StubQuoteSource::new(vec![(
        "AAPL",
        Ok(quote("AAPL", "Apple Inc.", dec!(150), &[dec!(152), dec!(148)])),
    )]));
    let (refresh, _read, _repository) = services(source);
    let outcome = refresh.refresh(&universe("AAPL")).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("accounts.json");
    tokio::fs::write(
        &path,
        r#"{"directory": {"adv-1": "alice@example.com", "adv-2": "bob@example.com"},
            "advisors": [
                {"account_id": "adv-1", "holdings": [
                    {"instrument_symbol": "AAPL", "alerts": [{"target_price": "150"}]}]},
                {"account_id": "adv-2", "holdings": [
                    {"instrument_symbol": "AAPL", "alerts": [
                        {"target_price": null}, {"target_price": true}, {"target_price": {}},
                        {"id": "no-target"}, {"target_price": 1e400},
                        {"target_price": "150"}]}]}]}"#,
    )
    .await
    .unwrap();

    let book = JsonAccountBookRepository::new(&path).load().await.unwrap();
    let triggered = AlertEvaluator::new().evaluate_book(&outcome.snapshot, &book);

    let recipients: Vec<&str> = triggered.iter().map(|t| t.recipient_email.as_str()).collect();
    assert_eq!(recipients, vec!["alice@example.com", "bob@example.com"]);
    assert!(triggered.iter().all(|t| t.triggered_price == dec!(150)));
}
