//! Fixtures shared by the unit tests of this crate.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{Datelike, NaiveDate, Weekday as Day};
use serde::{Deserialize, Serialize};

use triggerhub_domain::edit::{AppliedEdit, EditFields};
use triggerhub_domain::error::HandlerError;
use triggerhub_domain::id::{EntityRef, SubVariantPosition, TriggerUid};
use triggerhub_domain::markup::Markup;
use triggerhub_domain::time::LocalTimestamp;

use crate::ports::handler::sub_variant_from_table;
use crate::ports::{
    ConstructArgs, Diagnostic, DiagnosticSink, SharedListener, TriggerHandler, TriggerListener,
    TriggerType,
};

// ── Listener ───────────────────────────────────────────────────

pub(crate) struct FixedListener {
    pub now: LocalTimestamp,
    pub states: HashMap<EntityRef, String>,
}

impl Default for FixedListener {
    fn default() -> Self {
        Self {
            // A Monday.
            now: NaiveDate::from_ymd_opt(2024, 6, 3)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            states: HashMap::new(),
        }
    }
}

impl TriggerListener for FixedListener {
    fn now(&self) -> LocalTimestamp {
        self.now
    }

    fn entity_state(&self, entity: EntityRef) -> Option<String> {
        self.states.get(&entity).cloned()
    }
}

// ── Spy diagnostics ────────────────────────────────────────────

#[derive(Default)]
pub(crate) struct SpyDiagnostics {
    recorded: Mutex<Vec<Diagnostic>>,
}

impl SpyDiagnostics {
    pub fn recorded(&self) -> Vec<Diagnostic> {
        self.recorded.lock().unwrap().clone()
    }
}

impl DiagnosticSink for SpyDiagnostics {
    fn record(&self, diagnostic: &Diagnostic) {
        self.recorded.lock().unwrap().push(diagnostic.clone());
    }
}

// ── Handlers ───────────────────────────────────────────────────

/// Name-only handler; never true.
pub(crate) struct Fixed {
    name: &'static str,
}

impl Fixed {
    pub fn named(name: &'static str) -> Self {
        Self { name }
    }
}

impl TriggerHandler for Fixed {
    fn name(&self) -> String {
        self.name.to_string()
    }

    fn evaluate(&self, _is_condition: bool) -> Result<bool, HandlerError> {
        Ok(false)
    }
}

/// Answers normally but panics when dropped.
pub(crate) struct DropBomb {
    name: &'static str,
}

impl DropBomb {
    pub fn named(name: &'static str) -> Self {
        Self { name }
    }
}

impl TriggerHandler for DropBomb {
    fn name(&self) -> String {
        self.name.to_string()
    }

    fn evaluate(&self, _is_condition: bool) -> Result<bool, HandlerError> {
        Ok(true)
    }
}

impl Drop for DropBomb {
    fn drop(&mut self) {
        panic!("drop exploded");
    }
}

const DAYS: &[&str] = &["Mon-Fri", "Weekend", "Any day"];

#[derive(Debug, Default, Serialize, Deserialize)]
struct WeekdayConfig {
    #[serde(default)]
    skip: Vec<String>,
}

/// A small but complete trigger type.
pub(crate) struct Weekday {
    uid: TriggerUid,
    sub_variant: SubVariantPosition,
    config: WeekdayConfig,
    listener: Option<SharedListener>,
}

impl TriggerType for Weekday {
    const TYPE_NAME: &'static str = "test.weekday";

    fn new_default() -> Self {
        Self {
            uid: TriggerUid::default(),
            sub_variant: SubVariantPosition::NONE,
            config: WeekdayConfig::default(),
            listener: None,
        }
    }

    fn from_descriptor(args: ConstructArgs) -> Result<Self, HandlerError> {
        let config = if args.config_data.is_empty() {
            WeekdayConfig::default()
        } else {
            serde_json::from_slice(&args.config_data)?
        };
        Ok(Self {
            uid: args.identity.uid,
            sub_variant: args.sub_variant,
            config,
            listener: Some(args.listener),
        })
    }
}

impl TriggerHandler for Weekday {
    fn name(&self) -> String {
        "Weekday".to_string()
    }

    fn sub_variant_count(&self) -> u32 {
        3
    }

    fn sub_variant_name(&self, position: SubVariantPosition) -> Result<String, HandlerError> {
        sub_variant_from_table(DAYS, position)
    }

    fn render_config_ui(&self) -> Result<Markup, HandlerError> {
        Ok(Markup::new(format!(
            "<input name=\"skip\" value=\"{}\">",
            self.config.skip.join(",")
        )))
    }

    fn apply_edits(&mut self, fields: &EditFields) -> Result<AppliedEdit, HandlerError> {
        if let Some(skip) = fields.get("skip") {
            self.config.skip = skip
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        Ok(AppliedEdit::accepted(serde_json::to_vec(&self.config)?))
    }

    fn is_fully_configured(&self) -> Result<bool, HandlerError> {
        Ok(!self.sub_variant.is_none())
    }

    fn describe(&self) -> Result<Markup, HandlerError> {
        let day = self.sub_variant_name(self.sub_variant)?;
        Ok(Markup::new(format!("Weekday: {day} (uid {})", self.uid)))
    }

    fn evaluate(&self, _is_condition: bool) -> Result<bool, HandlerError> {
        let listener = self.listener.as_ref().ok_or(HandlerError::Unsupported {
            capability: "evaluate",
        })?;
        let day = listener.now().weekday();
        let weekend = matches!(day, Day::Sat | Day::Sun);
        Ok(match self.sub_variant.get() {
            1 => !weekend,
            2 => weekend,
            3 => true,
            _ => false,
        })
    }

    fn supports_combination(&self) -> bool {
        true
    }
}

/// Every capability reports an error.
pub(crate) struct Faulty;

impl TriggerHandler for Faulty {
    fn name(&self) -> String {
        "Faulty".to_string()
    }

    fn sub_variant_count(&self) -> u32 {
        panic!("sub-variant table missing")
    }

    fn render_config_ui(&self) -> Result<Markup, HandlerError> {
        Err(anyhow::anyhow!("template missing").into())
    }

    fn apply_edits(&mut self, _fields: &EditFields) -> Result<AppliedEdit, HandlerError> {
        Err(HandlerError::InvalidField {
            field: "at".to_string(),
            reason: "not a time".to_string(),
        })
    }

    fn is_fully_configured(&self) -> Result<bool, HandlerError> {
        Err(anyhow::anyhow!("state unreadable").into())
    }

    fn describe(&self) -> Result<Markup, HandlerError> {
        panic!("describe exploded")
    }

    fn evaluate(&self, _is_condition: bool) -> Result<bool, HandlerError> {
        Err(anyhow::anyhow!("evaluation failed").into())
    }

    fn references_entity(&self, _entity: EntityRef) -> Result<bool, HandlerError> {
        Err(anyhow::anyhow!("reference lookup failed").into())
    }

    fn supports_combination(&self) -> bool {
        panic!("combination flag missing")
    }
}

/// Panics on evaluation whenever its saved state is not the literal `ok`.
pub(crate) struct Fragile {
    data: Vec<u8>,
}

impl TriggerType for Fragile {
    const TYPE_NAME: &'static str = "test.fragile";

    fn new_default() -> Self {
        Self { data: Vec::new() }
    }

    fn from_descriptor(args: ConstructArgs) -> Result<Self, HandlerError> {
        Ok(Self {
            data: args.config_data,
        })
    }
}

impl TriggerHandler for Fragile {
    fn name(&self) -> String {
        "Fragile".to_string()
    }

    fn evaluate(&self, _is_condition: bool) -> Result<bool, HandlerError> {
        assert!(self.data == b"ok", "corrupt state");
        Ok(true)
    }

    fn references_entity(&self, entity: EntityRef) -> Result<bool, HandlerError> {
        Ok(entity == EntityRef::new(7))
    }
}
