//! Wire serialization for outbound messages

use std::path::{Path, PathBuf};

use super::message::Message;

/// Scheduled-delivery timestamps go on the wire in RFC-1123 style with the
/// zone abbreviation, e.g. `Tue, 2 Jan 2024 15:04:05 UTC`.
const DELIVERY_TIME_FORMAT: &str = "%a, %-d %b %Y %H:%M:%S %Z";

/// A message flattened into the provider's wire form: named string values
/// plus named file references, in emission order.
///
/// Repeated names are all transmitted, never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    values: Vec<(String, String)>,
    files: Vec<(String, PathBuf)>,
}

impl FormPayload {
    fn add_value(&mut self, name: &str, value: &str) {
        self.values.push((name.to_string(), value.to_string()));
    }

    fn add_file(&mut self, name: &str, path: &Path) {
        self.files.push((name.to_string(), path.to_path_buf()));
    }

    /// The named string values, in emission order.
    pub fn values(&self) -> &[(String, String)] {
        &self.values
    }

    /// The named file references, in emission order.
    pub fn files(&self) -> &[(String, PathBuf)] {
        &self.files
    }

    /// Every value recorded under `name`, in emission order.
    pub fn values_named(&self, name: &str) -> Vec<&str> {
        self.values
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }
}

/// Translates a boolean option into the yes/no setting the provider
/// expects.
fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

impl Message {
    /// Flattens the message into its wire form.
    ///
    /// Pure over the accumulated state; attached files are referenced by
    /// path here and only read when the form is transmitted. Options that
    /// were never set are omitted entirely, which the provider treats
    /// differently from an explicit "no".
    pub fn form_payload(&self) -> FormPayload {
        let mut payload = FormPayload::default();

        payload.add_value("from", &self.from);
        payload.add_value("subject", &self.subject);
        payload.add_value("text", &self.text);

        for recipient in &self.to {
            payload.add_value("to", recipient);
        }

        for recipient in &self.cc {
            payload.add_value("cc", recipient);
        }

        for recipient in &self.bcc {
            payload.add_value("bcc", recipient);
        }

        for tag in &self.tags {
            payload.add_value("o:tag", tag);
        }

        for campaign in &self.campaigns {
            payload.add_value("o:campaign", campaign);
        }

        if let Some(html) = &self.html {
            if !html.is_empty() {
                payload.add_value("html", html);
            }
        }

        if let Some(dkim) = self.dkim {
            payload.add_value("o:dkim", yes_no(dkim));
        }

        if let Some(delivery_time) = self.delivery_time {
            payload.add_value(
                "o:deliverytime",
                &delivery_time.format(DELIVERY_TIME_FORMAT).to_string(),
            );
        }

        if self.test_mode {
            payload.add_value("o:testmode", "yes");
        }

        if let Some(tracking) = self.tracking {
            payload.add_value("o:tracking", yes_no(tracking));
        }

        if let Some(tracking_clicks) = self.tracking_clicks {
            payload.add_value("o:tracking-clicks", yes_no(tracking_clicks));
        }

        if let Some(tracking_opens) = self.tracking_opens {
            payload.add_value("o:tracking-opens", yes_no(tracking_opens));
        }

        for (name, value) in &self.headers {
            payload.add_value(&format!("h:{}", name), value);
        }

        for (name, value) in &self.variables {
            payload.add_value(&format!("v:{}", name), value);
        }

        for attachment in &self.attachments {
            payload.add_file("attachment", attachment);
        }

        for inline in &self.inlines {
            payload.add_file("inline", inline);
        }

        payload
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use testresult::TestResult;

    use super::*;

    fn minimal_message() -> Message {
        Message::new("a@example.com", "hi", "hello", &["b@example.com"])
    }

    #[test]
    fn test_minimal_message_round_trip() -> TestResult {
        let message = minimal_message();

        message.validate()?;

        let expected: Vec<(String, String)> = [
            ("from", "a@example.com"),
            ("subject", "hi"),
            ("text", "hello"),
            ("to", "b@example.com"),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

        let payload = message.form_payload();

        assert_eq!(expected, payload.values());
        assert!(payload.files().is_empty());

        Ok(())
    }

    #[test]
    fn test_unset_options_are_omitted() {
        let payload = minimal_message().form_payload();

        for name in [
            "o:dkim",
            "o:tracking",
            "o:tracking-clicks",
            "o:tracking-opens",
            "o:testmode",
            "o:deliverytime",
            "html",
        ] {
            assert!(
                payload.values_named(name).is_empty(),
                "{} should be absent",
                name
            );
        }
    }

    #[test]
    fn test_tracking_opens_false_differs_from_unset() {
        let unset = minimal_message();

        let mut disabled = minimal_message();
        disabled.set_tracking_opens(false);

        assert!(unset.form_payload().values_named("o:tracking-opens").is_empty());
        assert_eq!(
            vec!["no"],
            disabled.form_payload().values_named("o:tracking-opens")
        );
    }

    #[test]
    fn test_set_options_emit_yes_no() {
        let mut message = minimal_message();

        message.set_dkim(true);
        message.set_tracking(false);
        message.set_tracking_clicks(true);

        let payload = message.form_payload();

        assert_eq!(vec!["yes"], payload.values_named("o:dkim"));
        assert_eq!(vec!["no"], payload.values_named("o:tracking"));
        assert_eq!(vec!["yes"], payload.values_named("o:tracking-clicks"));
    }

    #[test]
    fn test_test_mode_emits_yes_only_when_enabled() {
        let mut message = minimal_message();

        assert!(message.form_payload().values_named("o:testmode").is_empty());

        message.enable_test_mode();

        assert_eq!(vec!["yes"], message.form_payload().values_named("o:testmode"));
    }

    #[test]
    fn test_repeated_fields_are_all_transmitted() {
        let mut message = minimal_message();

        message.add_recipient("c@example.com");
        message.add_cc("d@example.com");
        message.add_bcc("e@example.com");
        message.add_tag("newsletter");
        message.add_tag("weekly");
        message.add_campaign("spring");

        let payload = message.form_payload();

        assert_eq!(
            vec!["b@example.com", "c@example.com"],
            payload.values_named("to")
        );
        assert_eq!(vec!["d@example.com"], payload.values_named("cc"));
        assert_eq!(vec!["e@example.com"], payload.values_named("bcc"));
        assert_eq!(vec!["newsletter", "weekly"], payload.values_named("o:tag"));
        assert_eq!(vec!["spring"], payload.values_named("o:campaign"));
    }

    #[test]
    fn test_delivery_time_uses_reference_layout() {
        let mut message = minimal_message();

        message.set_delivery_time(Utc.with_ymd_and_hms(2024, 1, 2, 15, 4, 5).unwrap());

        assert_eq!(
            vec!["Tue, 2 Jan 2024 15:04:05 UTC"],
            message.form_payload().values_named("o:deliverytime")
        );
    }

    #[test]
    fn test_html_body_is_emitted_when_non_empty() {
        let mut message = minimal_message();

        message.set_html("");
        assert!(message.form_payload().values_named("html").is_empty());

        message.set_html("<p>hello</p>");
        assert_eq!(
            vec!["<p>hello</p>"],
            message.form_payload().values_named("html")
        );
    }

    #[test]
    fn test_headers_and_variables_are_prefixed() -> TestResult {
        let mut message = minimal_message();

        message.add_header("X-Custom", "value");
        message.add_variable("count", &42)?;

        let payload = message.form_payload();

        assert_eq!(vec!["value"], payload.values_named("h:X-Custom"));
        assert_eq!(vec!["42"], payload.values_named("v:count"));

        Ok(())
    }

    #[test]
    fn test_attachments_and_inlines_become_file_entries() {
        let mut message = minimal_message();

        message.add_attachment("/tmp/report.pdf");
        message.add_attachment("/tmp/summary.pdf");
        message.add_inline("/tmp/logo.png");

        let files = message.form_payload().files().to_vec();

        assert_eq!(
            vec![
                ("attachment".to_string(), PathBuf::from("/tmp/report.pdf")),
                ("attachment".to_string(), PathBuf::from("/tmp/summary.pdf")),
                ("inline".to_string(), PathBuf::from("/tmp/logo.png")),
            ],
            files
        );
    }
}
