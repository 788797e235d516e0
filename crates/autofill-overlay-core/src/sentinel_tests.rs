use std::time::Duration;

use autofill_overlay_protocols::style_map;

use super::*;
use crate::host::MemoryDocument;

struct Fixture {
    document: MemoryDocument,
    iframe: ElementId,
    guard: StyleGuard,
    sentinel: MutationSentinel,
}

impl Fixture {
    fn new() -> Self {
        let document = MemoryDocument::new();
        let iframe = document.insert_element(document.body(), "iframe");
        let defaults = vec![
            ("src".to_string(), "chrome-extension://x/overlay/menu.html".to_string()),
            ("title".to_string(), "menu".to_string()),
            ("allowtransparency".to_string(), "true".to_string()),
            ("tabindex".to_string(), "-1".to_string()),
        ];
        for (name, value) in &defaults {
            document.set_attribute(iframe, name, value);
        }

        let mut guard = StyleGuard::new(iframe);
        let mut sentinel = MutationSentinel::new(&SentinelConfig::default(), defaults);
        guard.apply_styles(
            &document,
            &mut sentinel,
            Some(iframe),
            &style_map([("position", "fixed"), ("z-index", "2147483647"), ("opacity", "0")]),
        );

        Self {
            document,
            iframe,
            guard,
            sentinel,
        }
    }

    /// Deliver whatever the observer queued as one batch.
    fn flush(&mut self) -> SentinelVerdict {
        let records = self.document.take_mutation_records();
        self.sentinel
            .handle_mutations(&self.document, &mut self.guard, &records)
    }

    fn deliver(&mut self, records: &[MutationRecord]) -> SentinelVerdict {
        self.sentinel
            .handle_mutations(&self.document, &mut self.guard, records)
    }
}

#[tokio::test]
async fn test_starts_suspended_until_first_guarded_write() {
    let sentinel = MutationSentinel::new(&SentinelConfig::default(), Vec::new());
    assert_eq!(sentinel.state(), ObserverState::Suspended);

    let fixture = Fixture::new();
    assert_eq!(fixture.sentinel.state(), ObserverState::Observing);
    assert!(fixture.document.is_observed(fixture.iframe));
}

#[tokio::test]
async fn test_style_tampering_restores_snapshot() {
    let mut fixture = Fixture::new();
    let expected = fixture.document.inline_style(fixture.iframe);

    fixture
        .document
        .set_attribute(fixture.iframe, "style", "display: none; z-index: 0");
    assert_ne!(fixture.document.inline_style(fixture.iframe), expected);

    assert_eq!(fixture.flush(), SentinelVerdict::Contained);
    assert_eq!(fixture.document.inline_style(fixture.iframe), expected);
    assert_eq!(fixture.document.inline_style(fixture.iframe), *fixture.guard.expected_style());
    assert!(fixture.document.take_mutation_records().is_empty());
}

#[tokio::test]
async fn test_style_property_tampering_restores_snapshot() {
    let mut fixture = Fixture::new();
    let expected = fixture.guard.expected_style().clone();

    fixture
        .document
        .set_style_property(fixture.iframe, "pointer-events", "none", false);
    fixture.flush();

    assert_eq!(fixture.document.inline_style(fixture.iframe), expected);
}

#[tokio::test]
async fn test_foreign_attribute_removed_and_counted_once() {
    let mut fixture = Fixture::new();

    fixture
        .document
        .set_attribute(fixture.iframe, "onload", "steal()");
    assert_eq!(fixture.flush(), SentinelVerdict::Contained);

    assert!(fixture.document.get_attribute(fixture.iframe, "onload").is_none());
    assert_eq!(fixture.sentinel.counters().foreign_mutations, 1);

    // The removal itself is observed; the follow-up batch finds nothing to revert.
    assert_eq!(fixture.flush(), SentinelVerdict::Contained);
    assert_eq!(fixture.sentinel.counters().foreign_mutations, 1);
    assert_eq!(fixture.sentinel.counters().observer_iterations, 2);
}

#[tokio::test]
async fn test_changed_default_attribute_restored() {
    let mut fixture = Fixture::new();

    fixture
        .document
        .set_attribute(fixture.iframe, "src", "https://evil.test/");
    fixture.flush();

    assert_eq!(
        fixture.document.get_attribute(fixture.iframe, "src").as_deref(),
        Some("chrome-extension://x/overlay/menu.html")
    );
    assert_eq!(fixture.sentinel.counters().foreign_mutations, 1);
}

#[tokio::test]
async fn test_foreign_mutation_limit_forces_close() {
    let mut fixture = Fixture::new();

    for index in 0..9 {
        fixture
            .document
            .set_attribute(fixture.iframe, &format!("data-x{index}"), "1");
        assert_eq!(fixture.flush(), SentinelVerdict::Contained);
    }
    assert_eq!(fixture.sentinel.counters().foreign_mutations, 9);

    fixture
        .document
        .set_attribute(fixture.iframe, "data-x9", "1");
    assert_eq!(fixture.flush(), SentinelVerdict::ForceClose);
    assert_eq!(fixture.sentinel.counters().foreign_mutations, 10);
}

#[tokio::test]
async fn test_tenth_foreign_attribute_in_single_record_forces_close() {
    let mut fixture = Fixture::new();
    for index in 0..10 {
        fixture
            .document
            .set_attribute(fixture.iframe, &format!("data-x{index}"), "1");
    }
    fixture.document.take_mutation_records();

    let verdict = fixture.deliver(&[MutationRecord::attribute(fixture.iframe, "data-x9")]);

    assert_eq!(verdict, SentinelVerdict::ForceClose);
    assert_eq!(fixture.sentinel.counters().foreign_mutations, 10);
}

#[tokio::test]
async fn test_tenth_foreign_attribute_across_records_forces_close() {
    let mut fixture = Fixture::new();
    for index in 0..10 {
        fixture
            .document
            .set_attribute(fixture.iframe, &format!("data-x{index}"), "1");
    }

    let records = fixture.document.take_mutation_records();
    assert_eq!(records.len(), 10);
    assert_eq!(fixture.deliver(&records), SentinelVerdict::ForceClose);
    assert_eq!(fixture.sentinel.counters().foreign_mutations, 10);
}

#[tokio::test]
async fn test_counter_at_limit_forces_close_without_reverting() {
    let mut fixture = Fixture::new();
    for index in 0..10 {
        fixture
            .document
            .set_attribute(fixture.iframe, &format!("data-x{index}"), "1");
    }
    fixture.flush();

    fixture
        .document
        .set_attribute(fixture.iframe, "data-late", "1");
    assert_eq!(fixture.flush(), SentinelVerdict::ForceClose);
    assert_eq!(
        fixture
            .document
            .get_attribute(fixture.iframe, "data-late")
            .as_deref(),
        Some("1")
    );
}

#[tokio::test]
async fn test_excessive_iterations_force_close_and_reset() {
    let mut fixture = Fixture::new();
    let record = MutationRecord::attribute(fixture.iframe, "title");

    for _ in 0..20 {
        assert_eq!(fixture.deliver(&[record.clone()]), SentinelVerdict::Contained);
    }
    assert_eq!(fixture.sentinel.counters().observer_iterations, 20);

    assert_eq!(fixture.deliver(&[record]), SentinelVerdict::ForceClose);
    assert_eq!(fixture.sentinel.counters(), MutationCounters::default());
}

#[tokio::test]
async fn test_tripped_batch_is_abandoned() {
    let mut fixture = Fixture::new();
    let record = MutationRecord::attribute(fixture.iframe, "title");
    for _ in 0..20 {
        fixture.deliver(&[record.clone()]);
    }

    fixture
        .document
        .set_attribute(fixture.iframe, "data-late", "1");
    let records = fixture.document.take_mutation_records();
    assert_eq!(fixture.deliver(&records), SentinelVerdict::ForceClose);
    assert_eq!(
        fixture.document.get_attribute(fixture.iframe, "data-late").as_deref(),
        Some("1")
    );
}

#[tokio::test(start_paused = true)]
async fn test_counters_decay_after_quiet_window() {
    let mut fixture = Fixture::new();
    fixture
        .document
        .set_attribute(fixture.iframe, "data-x", "1");
    fixture.flush();
    assert_eq!(fixture.sentinel.counters().observer_iterations, 1);
    assert_eq!(fixture.sentinel.counters().foreign_mutations, 1);

    tokio::time::sleep(Duration::from_millis(2001)).await;
    tokio::task::yield_now().await;

    assert_eq!(fixture.sentinel.counters(), MutationCounters::default());
}

#[tokio::test(start_paused = true)]
async fn test_reset_timer_rearmed_on_every_batch() {
    let mut fixture = Fixture::new();
    let record = MutationRecord::attribute(fixture.iframe, "title");

    fixture.deliver(&[record.clone()]);
    tokio::time::sleep(Duration::from_millis(1500)).await;
    fixture.deliver(&[record]);
    tokio::time::sleep(Duration::from_millis(1500)).await;
    tokio::task::yield_now().await;

    assert_eq!(fixture.sentinel.counters().observer_iterations, 2);

    tokio::time::sleep(Duration::from_millis(600)).await;
    tokio::task::yield_now().await;
    assert_eq!(fixture.sentinel.counters().observer_iterations, 0);
}

#[tokio::test]
async fn test_suspended_sentinel_ignores_batches() {
    let mut fixture = Fixture::new();
    fixture.sentinel.shutdown(&fixture.document, fixture.iframe);

    let verdict = fixture.deliver(&[MutationRecord::attribute(fixture.iframe, "data-x")]);
    assert_eq!(verdict, SentinelVerdict::Contained);
    assert_eq!(fixture.sentinel.counters().observer_iterations, 0);
}
