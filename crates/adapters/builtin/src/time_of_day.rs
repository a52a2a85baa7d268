//! Time of day — a fixed minute, or a window that may span midnight.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use triggerhub_app::ports::handler::sub_variant_from_table;
use triggerhub_app::ports::{ConstructArgs, SharedListener, TriggerHandler, TriggerType};
use triggerhub_domain::edit::{AppliedEdit, EditFields};
use triggerhub_domain::error::HandlerError;
use triggerhub_domain::id::{SubVariantPosition, TriggerUid};
use triggerhub_domain::markup::Markup;

use crate::blob::{self, hhmm};
use crate::markup::{Form, Sentence};

const SUB_VARIANTS: &[&str] = &["At", "Between"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    At,
    Between,
}

impl Mode {
    fn from_position(position: SubVariantPosition) -> Option<Self> {
        match position.get() {
            1 => Some(Self::At),
            2 => Some(Self::Between),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct TimeConfig {
    #[serde(default, with = "hhmm", skip_serializing_if = "Option::is_none")]
    at: Option<NaiveTime>,
    #[serde(default, with = "hhmm", skip_serializing_if = "Option::is_none")]
    after: Option<NaiveTime>,
    #[serde(default, with = "hhmm", skip_serializing_if = "Option::is_none")]
    before: Option<NaiveTime>,
}

/// Inclusive window check; `after > before` wraps past midnight.
fn within(now: NaiveTime, after: NaiveTime, before: NaiveTime) -> bool {
    if after <= before {
        now >= after && now <= before
    } else {
        now >= after || now <= before
    }
}

fn same_minute(left: NaiveTime, right: NaiveTime) -> bool {
    left.hour() == right.hour() && left.minute() == right.minute()
}

fn hhmm_text(time: Option<NaiveTime>) -> String {
    time.map(|time| time.format(hhmm::FORMAT).to_string())
        .unwrap_or_default()
}

/// Parses an optional `HH:MM` field; blank clears the value.
fn parse_field(raw: &str) -> Result<Option<NaiveTime>, chrono::ParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveTime::parse_from_str(raw, hhmm::FORMAT).map(Some)
}

pub struct TimeOfDayTrigger {
    uid: TriggerUid,
    mode: Option<Mode>,
    config: TimeConfig,
    saved: Vec<u8>,
    listener: Option<SharedListener>,
    debug: bool,
}

impl TriggerType for TimeOfDayTrigger {
    const TYPE_NAME: &'static str = "builtin.time_of_day";

    fn new_default() -> Self {
        Self {
            uid: TriggerUid::default(),
            mode: None,
            config: TimeConfig::default(),
            saved: Vec::new(),
            listener: None,
            debug: false,
        }
    }

    fn from_descriptor(args: ConstructArgs) -> Result<Self, HandlerError> {
        Ok(Self {
            uid: args.identity.uid,
            mode: Mode::from_position(args.sub_variant),
            config: blob::decode(&args.config_data)?,
            saved: args.config_data,
            listener: Some(args.listener),
            debug: args.debug,
        })
    }
}

impl TriggerHandler for TimeOfDayTrigger {
    fn name(&self) -> String {
        "Time of day".to_string()
    }

    fn sub_variant_count(&self) -> u32 {
        2
    }

    fn sub_variant_name(&self, position: SubVariantPosition) -> Result<String, HandlerError> {
        sub_variant_from_table(SUB_VARIANTS, position)
    }

    fn render_config_ui(&self) -> Result<Markup, HandlerError> {
        let form = Form::new(self.uid);
        match self.mode {
            Some(Mode::At) => form.text("at", "At", &hhmm_text(self.config.at), "HH:MM"),
            Some(Mode::Between) => form
                .text("after", "After", &hhmm_text(self.config.after), "HH:MM")
                .text("before", "Before", &hhmm_text(self.config.before), "HH:MM"),
            None => form,
        }
        .render()
    }

    fn apply_edits(&mut self, fields: &EditFields) -> Result<AppliedEdit, HandlerError> {
        let mut next = self.config.clone();
        for (name, slot) in [
            ("at", &mut next.at),
            ("after", &mut next.after),
            ("before", &mut next.before),
        ] {
            let Some(raw) = fields.get(name) else {
                continue;
            };
            match parse_field(raw) {
                Ok(value) => *slot = value,
                Err(err) => {
                    if self.debug {
                        tracing::debug!(uid = %self.uid, field = name, error = %err, "rejected time");
                    }
                    return Ok(AppliedEdit::rejected(self.saved.clone()));
                }
            }
        }
        self.config = next;
        Ok(AppliedEdit::accepted(blob::encode(&self.config)?))
    }

    fn is_fully_configured(&self) -> Result<bool, HandlerError> {
        Ok(match self.mode {
            Some(Mode::At) => self.config.at.is_some(),
            Some(Mode::Between) => self.config.after.is_some() && self.config.before.is_some(),
            None => false,
        })
    }

    fn describe(&self) -> Result<Markup, HandlerError> {
        match (self.mode, &self.config) {
            (Some(Mode::At), TimeConfig { at: Some(at), .. }) => Sentence::new()
                .text("At ")
                .value(at.format(hhmm::FORMAT).to_string())
                .render(),
            (
                Some(Mode::Between),
                TimeConfig {
                    after: Some(after),
                    before: Some(before),
                    ..
                },
            ) => Sentence::new()
                .text("Between ")
                .value(after.format(hhmm::FORMAT).to_string())
                .text(" and ")
                .value(before.format(hhmm::FORMAT).to_string())
                .render(),
            _ => Sentence::new().text("Time of day (not set)").render(),
        }
    }

    fn evaluate(&self, is_condition: bool) -> Result<bool, HandlerError> {
        let now = crate::listener(self.listener.as_ref())?.now().time();
        let result = match (self.mode, &self.config) {
            (Some(Mode::At), TimeConfig { at: Some(at), .. }) => {
                if is_condition {
                    now >= *at
                } else {
                    same_minute(now, *at)
                }
            }
            (
                Some(Mode::Between),
                TimeConfig {
                    after: Some(after),
                    before: Some(before),
                    ..
                },
            ) => {
                if is_condition {
                    within(now, *after, *before)
                } else {
                    same_minute(now, *after)
                }
            }
            _ => false,
        };
        if self.debug {
            tracing::debug!(uid = %self.uid, %now, is_condition, result, "time of day evaluated");
        }
        Ok(result)
    }

    fn supports_combination(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use triggerhub_domain::descriptor::InstanceIdentity;

    use crate::test_support::FixedListener;

    fn build(sub_variant: u32, config: &str, now: &str) -> TimeOfDayTrigger {
        TimeOfDayTrigger::from_descriptor(ConstructArgs {
            identity: InstanceIdentity::new(8, 1),
            sub_variant: SubVariantPosition::new(sub_variant),
            config_data: config.as_bytes().to_vec(),
            listener: Arc::new(FixedListener::at(now)),
            debug: false,
        })
        .unwrap()
    }

    fn time(text: &str) -> NaiveTime {
        NaiveTime::parse_from_str(text, hhmm::FORMAT).unwrap()
    }

    #[test]
    fn should_handle_same_day_window() {
        assert!(within(time("12:00"), time("08:00"), time("22:00")));
        assert!(!within(time("23:00"), time("08:00"), time("22:00")));
    }

    #[test]
    fn should_handle_overnight_window() {
        assert!(within(time("23:30"), time("22:00"), time("06:00")));
        assert!(within(time("05:59"), time("22:00"), time("06:00")));
        assert!(!within(time("12:00"), time("22:00"), time("06:00")));
    }

    #[test]
    fn should_fire_at_exact_minute_only() {
        let config = r#"{"at":"07:30"}"#;
        assert!(build(1, config, "2024-06-03 07:30:45").evaluate(false).unwrap());
        assert!(!build(1, config, "2024-06-03 07:31").evaluate(false).unwrap());
    }

    #[test]
    fn should_hold_at_or_after_as_condition() {
        let config = r#"{"at":"07:30"}"#;
        assert!(build(1, config, "2024-06-03 09:00").evaluate(true).unwrap());
        assert!(!build(1, config, "2024-06-03 07:29").evaluate(true).unwrap());
    }

    #[test]
    fn should_check_window_as_condition() {
        let config = r#"{"after":"22:00","before":"06:00"}"#;
        assert!(build(2, config, "2024-06-03 02:00").evaluate(true).unwrap());
        assert!(!build(2, config, "2024-06-03 12:00").evaluate(true).unwrap());
    }

    #[test]
    fn should_fire_when_window_opens() {
        let config = r#"{"after":"22:00","before":"06:00"}"#;
        assert!(build(2, config, "2024-06-03 22:00").evaluate(false).unwrap());
        assert!(!build(2, config, "2024-06-03 23:00").evaluate(false).unwrap());
    }

    #[test]
    fn should_be_false_when_unset() {
        let trigger = build(2, r#"{"after":"22:00"}"#, "2024-06-03 23:00");
        assert!(!trigger.evaluate(true).unwrap());
        assert!(!trigger.is_fully_configured().unwrap());
    }

    #[test]
    fn should_accept_valid_times() {
        let mut trigger = build(2, "", "2024-06-03 12:00");
        let fields: EditFields = [
            ("after".to_string(), "22:00".to_string()),
            ("before".to_string(), " 06:00 ".to_string()),
        ]
        .into();

        let edit = trigger.apply_edits(&fields).unwrap();

        assert!(edit.success);
        assert_eq!(edit.config_data, br#"{"after":"22:00","before":"06:00"}"#);
        assert!(trigger.is_fully_configured().unwrap());
    }

    #[test]
    fn should_reject_malformed_time_and_keep_saved_data() {
        let saved = r#"{"at":"07:30"}"#;
        let mut trigger = build(1, saved, "2024-06-03 12:00");
        let fields: EditFields = [("at".to_string(), "25:99".to_string())].into();

        let edit = trigger.apply_edits(&fields).unwrap();

        assert!(!edit.success);
        assert_eq!(edit.config_data, saved.as_bytes());
        assert_eq!(trigger.config.at, Some(time("07:30")));
    }

    #[test]
    fn should_render_window_inputs() {
        let trigger = build(2, r#"{"after":"22:00","before":"06:00"}"#, "2024-06-03 12:00");
        let html = trigger.render_config_ui().unwrap();
        assert!(html.as_str().contains(r#"name="after" value="22:00""#));
        assert!(html.as_str().contains(r#"name="before" value="06:00""#));
    }

    #[test]
    fn should_describe_window() {
        let trigger = build(2, r#"{"after":"22:00","before":"06:00"}"#, "2024-06-03 12:00");
        assert_eq!(
            trigger.describe().unwrap().as_str(),
            r#"Between <span class="trigger-value">22:00</span> and <span class="trigger-value">06:00</span>"#
        );
    }
}
