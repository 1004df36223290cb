use std::sync::Arc;

use super::mock::{FailingPiiDetector, MockPiiDetector};
use super::*;

fn entity(entity_type: &str, start: usize, end: usize) -> PiiEntity {
    PiiEntity {
        entity_type: entity_type.to_string(),
        start,
        end,
        score: 0.85,
    }
}

#[tokio::test]
async fn unavailable_capability_is_a_passthrough() {
    let redactor = PiiRedactor::new(PiiCapability::Unavailable);
    let result = redactor.redact("call me at 555-0100").await;

    assert_eq!(result.text, "call me at 555-0100");
    assert!(!result.redacted);
    assert!(result.entities.is_empty());
}

#[tokio::test]
async fn failing_detector_degrades_to_noop() {
    let redactor = PiiRedactor::new(PiiCapability::Detector(Arc::new(FailingPiiDetector)));
    let result = redactor.redact("my email is a@b.com").await;

    assert_eq!(result.text, "my email is a@b.com");
    assert!(!result.redacted);
}

#[tokio::test]
async fn detected_spans_are_replaced_with_placeholder() {
    // "my email is a@b.com" -> span 12..19 covers "a@b.com"
    let detector = MockPiiDetector::with_entities(vec![entity("EMAIL_ADDRESS", 12, 19)]);
    let redactor = PiiRedactor::new(PiiCapability::Detector(Arc::new(detector)));

    let result = redactor.redact("my email is a@b.com").await;
    assert_eq!(result.text, "my email is <PII>");
    assert!(result.redacted);
    assert_eq!(result.entities.len(), 1);
}

#[tokio::test]
async fn multiple_spans_replaced_right_to_left() {
    // "a@b.com and 555-0100"
    let detector = MockPiiDetector::with_entities(vec![
        entity("EMAIL_ADDRESS", 0, 7),
        entity("PHONE_NUMBER", 12, 20),
    ]);
    let redactor = PiiRedactor::new(PiiCapability::Detector(Arc::new(detector)));

    let result = redactor.redact("a@b.com and 555-0100").await;
    assert_eq!(result.text, "<PII> and <PII>");
}

#[tokio::test]
async fn overlapping_spans_collapse() {
    let detector = MockPiiDetector::with_entities(vec![
        entity("PERSON", 0, 5),
        entity("PERSON", 3, 8),
    ]);
    let redactor = PiiRedactor::new(PiiCapability::Detector(Arc::new(detector)));

    let result = redactor.redact("Jane Doe asked").await;
    assert_eq!(result.text, "<PII> asked");
}

#[tokio::test]
async fn no_entities_means_no_redaction_flag() {
    let detector = MockPiiDetector::empty();
    let redactor = PiiRedactor::new(PiiCapability::Detector(Arc::new(detector)));

    let result = redactor.redact("nothing sensitive here").await;
    assert!(!result.redacted);
    assert_eq!(result.text, "nothing sensitive here");
}

#[test]
fn out_of_range_spans_are_clamped() {
    let out = substitute_spans("short", &[entity("X", 2, 99)]);
    assert_eq!(out, "sh<PII>");
}
