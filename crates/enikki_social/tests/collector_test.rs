use chrono::{DateTime, Duration, TimeZone, Utc};
use enikki_core::TimeWindow;
use enikki_rate_limit::Pacer;
use enikki_social::testing::{FakePlatform, bot_message, message};
use enikki_social::{
    CollectionOrchestrator, MessageCollector, PlatformChannel, PlatformCommunity,
};

const BOT_ID: u64 = 1;
const GENERAL: u64 = 100;
const RANDOM: u64 = 101;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 9, 3, 0, 0).unwrap()
}

fn collector() -> MessageCollector {
    MessageCollector::new(Pacer::disabled())
}

fn general() -> PlatformChannel {
    PlatformChannel::new(GENERAL, "general")
}

#[tokio::test]
async fn keeps_only_messages_inside_the_window() {
    let now = now();
    let window = TimeWindow::week_ending(now);
    let platform = FakePlatform::new(BOT_ID).with_history(
        GENERAL,
        vec![
            message(10, 2, "alice", "at start", *window.start()),
            message(11, 2, "alice", "mid week", now - Duration::days(3)),
            message(12, 3, "bob", "at end", now),
            message(9, 3, "bob", "too old", *window.start() - Duration::seconds(1)),
        ],
    );

    let collected = collector().collect(&platform, &general(), &window, BOT_ID).await;

    let contents: Vec<_> = collected.iter().map(|m| m.content().as_str()).collect();
    assert_eq!(contents, ["at end", "mid week", "at start"]);
    assert!(collected.iter().all(|m| window.contains(*m.timestamp())));
}

#[tokio::test]
async fn stops_at_first_message_older_than_window() {
    let now = now();
    let window = TimeWindow::week_ending(now);
    // Ids 1..=250, one hour apart going back from now; only the first 168
    // hours fall inside the week.
    let history: Vec<_> = (1..=250u64)
        .map(|id| {
            let age = Duration::hours((250 - id) as i64);
            message(id, 2, "alice", "hi", now - age)
        })
        .collect();
    let platform = FakePlatform::new(BOT_ID).with_history(GENERAL, history);

    let collected = collector().collect(&platform, &general(), &window, BOT_ID).await;

    assert_eq!(collected.len(), 169);
    // Page 1 covers ids 250..=151, page 2 reaches the boundary; no third fetch.
    assert_eq!(platform.fetch_count(GENERAL), 2);
    assert_eq!(platform.fetches()[1], (GENERAL, Some(151)));
}

#[tokio::test]
async fn excludes_self_bots_and_blank_content() {
    let now = now();
    let window = TimeWindow::week_ending(now);
    let platform = FakePlatform::new(BOT_ID).with_history(
        GENERAL,
        vec![
            message(1, BOT_ID, "enikki", "last week's digest", now - Duration::hours(5)),
            bot_message(2, 50, "other-bot", "beep", now - Duration::hours(4)),
            message(3, 2, "alice", "   \n\t ", now - Duration::hours(3)),
            message(4, 2, "alice", "", now - Duration::hours(2)),
            message(5, 3, "bob", "real message", now - Duration::hours(1)),
        ],
    );

    let collected = collector().collect(&platform, &general(), &window, BOT_ID).await;

    assert_eq!(collected.len(), 1);
    assert_eq!(collected[0].author(), "bob");
}

#[tokio::test]
async fn fetch_failure_keeps_partial_history() {
    let now = now();
    let window = TimeWindow::week_ending(now);
    let history: Vec<_> = (1..=150u64)
        .map(|id| message(id, 2, "alice", "hi", now - Duration::minutes((150 - id) as i64)))
        .collect();
    let platform = FakePlatform::new(BOT_ID)
        .with_history(GENERAL, history)
        .with_failing_fetch(GENERAL, 1);

    let collected = collector().collect(&platform, &general(), &window, BOT_ID).await;

    assert_eq!(collected.len(), 100);
    assert_eq!(platform.fetch_count(GENERAL), 2);
}

#[tokio::test]
async fn orchestrator_sorts_and_omits_empty_groups() -> anyhow::Result<()> {
    let now = now();
    let window = TimeWindow::week_ending(now);
    let platform = FakePlatform::new(BOT_ID)
        .with_community(
            PlatformCommunity::new(10, "Alpha"),
            vec![general(), PlatformChannel::new(RANDOM, "random")],
        )
        .with_community(
            PlatformCommunity::new(20, "Quiet"),
            vec![PlatformChannel::new(200, "silence")],
        )
        .with_history(
            GENERAL,
            vec![
                message(3, 2, "alice", "third", now - Duration::hours(1)),
                message(1, 3, "bob", "first", now - Duration::hours(3)),
                message(2, 2, "alice", "second", now - Duration::hours(2)),
            ],
        )
        .with_history(
            200,
            vec![message(7, 2, "alice", "ancient", now - Duration::days(30))],
        );

    let digests = CollectionOrchestrator::new(collector())
        .collect_all(&platform, &window)
        .await?;

    assert_eq!(digests.len(), 1);
    assert_eq!(digests[0].community_name(), "Alpha");
    assert_eq!(digests[0].channels().len(), 1);
    let channel = &digests[0].channels()[0];
    assert_eq!(channel.channel_name(), "general");
    let contents: Vec<_> = channel.messages().iter().map(|m| m.content().as_str()).collect();
    assert_eq!(contents, ["first", "second", "third"]);
    Ok(())
}

#[tokio::test]
async fn orchestrator_with_no_activity_returns_empty() -> anyhow::Result<()> {
    let platform = FakePlatform::new(BOT_ID)
        .with_community(PlatformCommunity::new(10, "Alpha"), vec![general()]);

    let digests = CollectionOrchestrator::new(collector())
        .collect_all(&platform, &TimeWindow::week_ending(now()))
        .await?;

    assert!(digests.is_empty());
    Ok(())
}
