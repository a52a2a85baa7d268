//! Weekday — true on a chosen set of days.

use chrono::{Datelike, NaiveDate, Weekday as Day};
use serde::{Deserialize, Serialize};

use triggerhub_app::ports::handler::sub_variant_from_table;
use triggerhub_app::ports::{ConstructArgs, SharedListener, TriggerHandler, TriggerType};
use triggerhub_domain::edit::{AppliedEdit, EditFields};
use triggerhub_domain::error::HandlerError;
use triggerhub_domain::id::{SubVariantPosition, TriggerUid};
use triggerhub_domain::markup::Markup;

use crate::blob;
use crate::markup::{Form, Sentence};

const SUB_VARIANTS: &[&str] = &["Mon-Fri", "Weekend", "Any day"];
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DaySet {
    WorkDays,
    Weekend,
    AnyDay,
}

impl DaySet {
    fn from_position(position: SubVariantPosition) -> Option<Self> {
        match position.get() {
            1 => Some(Self::WorkDays),
            2 => Some(Self::Weekend),
            3 => Some(Self::AnyDay),
            _ => None,
        }
    }

    fn contains(self, day: Day) -> bool {
        let weekend = matches!(day, Day::Sat | Day::Sun);
        match self {
            Self::WorkDays => !weekend,
            Self::Weekend => weekend,
            Self::AnyDay => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct WeekdayConfig {
    /// Dates on which the trigger is false even if the day matches.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    skip: Vec<NaiveDate>,
}

/// True on working days, weekends, or every day, except for skipped dates.
pub struct WeekdayTrigger {
    uid: TriggerUid,
    days: Option<DaySet>,
    config: WeekdayConfig,
    saved: Vec<u8>,
    listener: Option<SharedListener>,
    debug: bool,
}

impl TriggerType for WeekdayTrigger {
    const TYPE_NAME: &'static str = "builtin.weekday";

    fn new_default() -> Self {
        Self {
            uid: TriggerUid::default(),
            days: None,
            config: WeekdayConfig::default(),
            saved: Vec::new(),
            listener: None,
            debug: false,
        }
    }

    fn from_descriptor(args: ConstructArgs) -> Result<Self, HandlerError> {
        Ok(Self {
            uid: args.identity.uid,
            days: DaySet::from_position(args.sub_variant),
            config: blob::decode(&args.config_data)?,
            saved: args.config_data,
            listener: Some(args.listener),
            debug: args.debug,
        })
    }
}

impl TriggerHandler for WeekdayTrigger {
    fn name(&self) -> String {
        "Weekday".to_string()
    }

    fn sub_variant_count(&self) -> u32 {
        3
    }

    fn sub_variant_name(&self, position: SubVariantPosition) -> Result<String, HandlerError> {
        sub_variant_from_table(SUB_VARIANTS, position)
    }

    fn render_config_ui(&self) -> Result<Markup, HandlerError> {
        Form::new(self.uid)
            .text(
                "skip",
                "Skip dates (comma separated)",
                &self.skip_list(),
                "YYYY-MM-DD",
            )
            .render()
    }

    fn apply_edits(&mut self, fields: &EditFields) -> Result<AppliedEdit, HandlerError> {
        let Some(raw) = fields.get("skip") else {
            return Ok(AppliedEdit::accepted(blob::encode(&self.config)?));
        };
        let parsed: Result<Vec<NaiveDate>, _> = raw
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| NaiveDate::parse_from_str(part, DATE_FORMAT))
            .collect();
        match parsed {
            Ok(mut dates) => {
                dates.sort_unstable();
                dates.dedup();
                self.config.skip = dates;
                Ok(AppliedEdit::accepted(blob::encode(&self.config)?))
            }
            Err(err) => {
                if self.debug {
                    tracing::debug!(uid = %self.uid, error = %err, "rejected skip dates");
                }
                Ok(AppliedEdit::rejected(self.saved.clone()))
            }
        }
    }

    fn is_fully_configured(&self) -> Result<bool, HandlerError> {
        Ok(self.days.is_some())
    }

    fn describe(&self) -> Result<Markup, HandlerError> {
        let Some(days) = self.days else {
            return Sentence::new().text("Weekday (no days selected)").render();
        };
        let label = match days {
            DaySet::WorkDays => SUB_VARIANTS[0],
            DaySet::Weekend => SUB_VARIANTS[1],
            DaySet::AnyDay => SUB_VARIANTS[2],
        };
        let sentence = Sentence::new().text("On ").value(label);
        if self.config.skip.is_empty() {
            sentence.render()
        } else {
            sentence.text(", except ").value(self.skip_list()).render()
        }
    }

    fn evaluate(&self, _is_condition: bool) -> Result<bool, HandlerError> {
        let Some(days) = self.days else {
            return Ok(false);
        };
        let today = crate::listener(self.listener.as_ref())?.now().date();
        let result = days.contains(today.weekday()) && !self.config.skip.contains(&today);
        if self.debug {
            tracing::debug!(uid = %self.uid, %today, result, "weekday evaluated");
        }
        Ok(result)
    }

    fn supports_combination(&self) -> bool {
        true
    }
}

impl WeekdayTrigger {
    fn skip_list(&self) -> String {
        self.config
            .skip
            .iter()
            .map(|date| date.format(DATE_FORMAT).to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
