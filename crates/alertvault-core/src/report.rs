//! Plain-text alert reports
//!
//! Downstream consumers parse the report line by line, so the layout below
//! must stay byte-for-byte stable.

use serde::{Deserialize, Serialize};

use crate::models::AlertEvent;

/// Content type of the stored report envelope
pub const REPORT_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

/// Pair each `to` entry with the `envelope_to` entry at the same index.
///
/// Pairing is positional: the `to` value lands in the quoted slot and the
/// envelope address in the angle brackets. Entries without an envelope
/// counterpart are emitted as-is. Nothing is produced unless both lists are
/// present and non-empty.
pub fn render_recipients(to: Option<&[String]>, envelope_to: Option<&[String]>) -> Vec<String> {
    let (Some(to), Some(envelope_to)) = (to, envelope_to) else {
        return Vec::new();
    };
    if to.is_empty() || envelope_to.is_empty() {
        return Vec::new();
    }

    to.iter()
        .enumerate()
        .map(|(i, display)| match envelope_to.get(i) {
            Some(envelope) if !envelope.is_empty() => format!("\"{display}\" <{envelope}>"),
            _ => display.clone(),
        })
        .collect()
}

/// `"{from_name}" <{from}>`, or `<{from}>` without a display name
pub fn render_sender(from: Option<&str>, from_name: Option<&str>) -> String {
    let from = from.unwrap_or_default();
    match from_name {
        Some(name) if !name.is_empty() => format!("\"{name}\" <{from}>"),
        _ => format!("<{from}>"),
    }
}

/// Swap the first `T` date/time separator for a space
pub fn normalize_timestamp(ts: Option<&str>) -> String {
    ts.map(|ts| ts.replacen('T', " ", 1)).unwrap_or_default()
}

/// One reason per line
pub fn join_reasons(reasons: Option<&[String]>) -> String {
    reasons.map(|r| r.join("\n")).unwrap_or_default()
}

/// Rendered fields of an alert, in report order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedReport {
    /// Final disposition
    pub disposition: String,
    /// Timestamp with a space separator
    pub date: String,
    /// Rendered sender
    pub from: String,
    /// Rendered recipients
    pub to: Vec<String>,
    /// Message subject
    pub subject: String,
    /// Message-ID header
    pub message_id: String,
    /// Reasons, newline-separated
    pub alert_reasons: String,
    /// Alert identifier
    pub alert_id: String,
}

impl FormattedReport {
    /// Extract and render the reportable fields of an event
    pub fn from_event(event: &AlertEvent) -> Self {
        Self {
            disposition: event.final_disposition.clone().unwrap_or_default(),
            date: normalize_timestamp(event.ts.as_deref()),
            from: render_sender(event.from.as_deref(), event.from_name.as_deref()),
            to: render_recipients(event.to.as_deref(), event.envelope_to.as_deref()),
            subject: event.subject.clone().unwrap_or_default(),
            message_id: event.message_id.clone().unwrap_or_default(),
            alert_reasons: join_reasons(event.alert_reasons.as_deref()),
            alert_id: event.alert_id.clone().unwrap_or_default(),
        }
    }

    /// The report text
    pub fn text(&self) -> String {
        format!(
            "\n  Disposition:{}\n  Date:{}\n  From:{}\n  To:{}\n  Subject:{}\n  Message-ID:{}\n  Alert Reasons:{}\n  Alert ID:{}\n  ",
            self.disposition,
            self.date,
            self.from,
            self.to.join(", "),
            self.subject,
            self.message_id,
            self.alert_reasons,
            self.alert_id,
        )
    }

    /// Wrap the text for storage
    pub fn envelope(&self) -> ReportEnvelope {
        ReportEnvelope { text: self.text() }
    }
}

/// JSON document written to the bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEnvelope {
    /// Rendered report
    pub text: String,
}

impl ReportEnvelope {
    /// Serialized body
    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    fn line<'a>(text: &'a str, label: &str) -> &'a str {
        text.lines()
            .find(|l| l.trim_start().starts_with(label))
            .map(str::trim_start)
            .unwrap()
    }

    #[test]
    fn test_recipients_paired_by_index() {
        let to = strings(&["Alice", "Bob"]);
        let envelope = strings(&["alice@corp.example", "bob@corp.example"]);

        let rendered = render_recipients(Some(&to), Some(&envelope));
        assert_eq!(
            rendered,
            vec![
                "\"Alice\" <alice@corp.example>".to_string(),
                "\"Bob\" <bob@corp.example>".to_string(),
            ]
        );
    }

    #[test]
    fn test_recipients_without_envelope_counterpart_unadorned() {
        let to = strings(&["alice@corp.example", "bob@corp.example", "carol@corp.example"]);
        let envelope = strings(&["alice@corp.example", ""]);

        let rendered = render_recipients(Some(&to), Some(&envelope));
        assert_eq!(
            rendered,
            strings(&[
                "\"alice@corp.example\" <alice@corp.example>",
                "bob@corp.example",
                "carol@corp.example",
            ])
        );
    }

    #[rstest]
    #[case(None, Some(vec!["a@x.example".to_string()]))]
    #[case(Some(vec![]), Some(vec!["a@x.example".to_string()]))]
    #[case(Some(vec!["a@x.example".to_string()]), None)]
    #[case(Some(vec!["a@x.example".to_string()]), Some(vec![]))]
    fn test_recipients_require_both_lists(
        #[case] envelope_to: Option<Vec<String>>,
        #[case] to: Option<Vec<String>>,
    ) {
        assert!(render_recipients(to.as_deref(), envelope_to.as_deref()).is_empty());
    }

    #[rstest]
    #[case(Some("a@b.com"), Some("Acme"), "\"Acme\" <a@b.com>")]
    #[case(Some("a@b.com"), None, "<a@b.com>")]
    #[case(Some("a@b.com"), Some(""), "<a@b.com>")]
    #[case(None, None, "<>")]
    fn test_sender(#[case] from: Option<&str>, #[case] name: Option<&str>, #[case] expected: &str) {
        assert_eq!(render_sender(from, name), expected);
    }

    #[rstest]
    #[case(Some("2024-01-02T03:04:05Z"), "2024-01-02 03:04:05Z")]
    #[case(Some("2024-01-02 03:04:05"), "2024-01-02 03:04:05")]
    #[case(Some("2024-01-02T03:04:05T"), "2024-01-02 03:04:05T")]
    #[case(None, "")]
    fn test_normalize_timestamp(#[case] ts: Option<&str>, #[case] expected: &str) {
        assert_eq!(normalize_timestamp(ts), expected);
    }

    #[test]
    fn test_reasons_lines() {
        let reasons = strings(&["spam", "phishing"]);
        let report = FormattedReport::from_event(&AlertEvent {
            alert_reasons: Some(reasons),
            ..AlertEvent::default()
        });
        assert!(report.text().contains("Alert Reasons:spam\nphishing\n"));

        let empty = FormattedReport::from_event(&AlertEvent::default());
        assert_eq!(line(&empty.text(), "Alert Reasons:"), "Alert Reasons:");
    }

    #[test]
    fn test_date_line() {
        let report = FormattedReport::from_event(&AlertEvent {
            ts: Some("2024-01-02T03:04:05Z".to_string()),
            ..AlertEvent::default()
        });
        assert_eq!(line(&report.text(), "Date:"), "Date:2024-01-02 03:04:05Z");

        let empty = FormattedReport::from_event(&AlertEvent::default());
        assert_eq!(line(&empty.text(), "Date:"), "Date:");
    }

    // Pins the exact stored layout, including the positional recipient
    // pairing. Changing either must be a deliberate edit here.
    #[test]
    fn test_report_layout_fixture() {
        let event = AlertEvent {
            final_disposition: Some("MALICIOUS".to_string()),
            smtp_helo_server_name: Some("mx.attacker.example".to_string()),
            envelope_to: Some(strings(&["bob@corp.example", "carol@corp.example"])),
            to: Some(strings(&["Bob Smith", "Carol Jones"])),
            alert_reasons: Some(strings(&["spoofed display name", "new domain"])),
            envelope_from: Some("bounce@attacker.example".to_string()),
            from: Some("ceo@attacker.example".to_string()),
            from_name: Some("The CEO".to_string()),
            subject: Some("Urgent wire".to_string()),
            message_id: Some("<id-1@attacker.example>".to_string()),
            ts: Some("2024-01-02T03:04:05Z".to_string()),
            alert_id: Some("123".to_string()),
        };

        let expected = "\n  Disposition:MALICIOUS\n  Date:2024-01-02 03:04:05Z\n  From:\"The CEO\" <ceo@attacker.example>\n  To:\"Bob Smith\" <bob@corp.example>, \"Carol Jones\" <carol@corp.example>\n  Subject:Urgent wire\n  Message-ID:<id-1@attacker.example>\n  Alert Reasons:spoofed display name\nnew domain\n  Alert ID:123\n  ";
        assert_eq!(FormattedReport::from_event(&event).text(), expected);
    }

    #[test]
    fn test_empty_event_layout() {
        let expected = "\n  Disposition:\n  Date:\n  From:<>\n  To:\n  Subject:\n  Message-ID:\n  Alert Reasons:\n  Alert ID:\n  ";
        assert_eq!(FormattedReport::from_event(&AlertEvent::default()).text(), expected);
    }

    #[test]
    fn test_envelope_json() {
        let report = FormattedReport::from_event(&AlertEvent {
            alert_id: Some("7".to_string()),
            ..AlertEvent::default()
        });
        let bytes = report.envelope().to_bytes().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value, serde_json::json!({ "text": report.text() }));
    }
}
