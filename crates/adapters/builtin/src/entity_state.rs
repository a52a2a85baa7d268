//! Entity state — true while an external entity reports a given state.

use serde::{Deserialize, Serialize};

use triggerhub_app::ports::handler::sub_variant_from_table;
use triggerhub_app::ports::{ConstructArgs, SharedListener, TriggerHandler, TriggerType};
use triggerhub_domain::edit::{AppliedEdit, EditFields};
use triggerhub_domain::error::HandlerError;
use triggerhub_domain::id::{EntityRef, SubVariantPosition, TriggerUid};
use triggerhub_domain::markup::Markup;

use crate::blob;
use crate::markup::{Form, Sentence};

const SUB_VARIANTS: &[&str] = &["Changes to", "Is"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    ChangesTo,
    Is,
}

impl Mode {
    fn from_position(position: SubVariantPosition) -> Option<Self> {
        match position.get() {
            1 => Some(Self::ChangesTo),
            2 => Some(Self::Is),
            _ => None,
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Self::ChangesTo => "changes to",
            Self::Is => "is",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct EntityStateConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    entity: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    state: Option<String>,
}

pub struct EntityStateTrigger {
    uid: TriggerUid,
    mode: Option<Mode>,
    config: EntityStateConfig,
    saved: Vec<u8>,
    listener: Option<SharedListener>,
    debug: bool,
}

impl TriggerType for EntityStateTrigger {
    const TYPE_NAME: &'static str = "builtin.entity_state";

    fn new_default() -> Self {
        Self {
            uid: TriggerUid::default(),
            mode: None,
            config: EntityStateConfig::default(),
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

impl EntityStateTrigger {
    fn parse_edits(&self, fields: &EditFields) -> Result<EntityStateConfig, HandlerError> {
        let mut next = self.config.clone();
        if let Some(raw) = fields.get("entity") {
            let raw = raw.trim();
            next.entity = if raw.is_empty() {
                None
            } else {
                let entity: EntityRef = raw.parse().map_err(|_| HandlerError::InvalidField {
                    field: "entity".to_string(),
                    reason: format!("`{raw}` is not an entity reference"),
                })?;
                Some(entity)
            };
        }
        if let Some(raw) = fields.get("state") {
            let raw = raw.trim();
            next.state = (!raw.is_empty()).then(|| raw.to_string());
        }
        Ok(next)
    }
}

impl TriggerHandler for EntityStateTrigger {
    fn name(&self) -> String {
        "Entity state".to_string()
    }

    fn sub_variant_count(&self) -> u32 {
        2
    }

    fn sub_variant_name(&self, position: SubVariantPosition) -> Result<String, HandlerError> {
        sub_variant_from_table(SUB_VARIANTS, position)
    }

    fn render_config_ui(&self) -> Result<Markup, HandlerError> {
        let entity = self
            .config
            .entity
            .map(|entity| entity.to_string())
            .unwrap_or_default();
        Form::new(self.uid)
            .text("entity", "Entity", &entity, "entity number")
            .text(
                "state",
                "State",
                self.config.state.as_deref().unwrap_or_default(),
                "on",
            )
            .render()
    }

    fn apply_edits(&mut self, fields: &EditFields) -> Result<AppliedEdit, HandlerError> {
        match self.parse_edits(fields) {
            Ok(next) => {
                self.config = next;
                Ok(AppliedEdit::accepted(blob::encode(&self.config)?))
            }
            Err(err) => {
                if self.debug {
                    tracing::debug!(uid = %self.uid, error = %err, "rejected entity state edit");
                }
                Ok(AppliedEdit::rejected(self.saved.clone()))
            }
        }
    }

    fn is_fully_configured(&self) -> Result<bool, HandlerError> {
        Ok(self.mode.is_some() && self.config.entity.is_some() && self.config.state.is_some())
    }

    fn describe(&self) -> Result<Markup, HandlerError> {
        let (Some(mode), Some(entity), Some(state)) =
            (self.mode, self.config.entity, self.config.state.as_deref())
        else {
            return Sentence::new().text("Entity state (not set)").render();
        };
        Sentence::new()
            .text("Entity ")
            .value(entity.to_string())
            .text(format!(" {} ", mode.verb()))
            .value(state)
            .render()
    }

    fn evaluate(&self, _is_condition: bool) -> Result<bool, HandlerError> {
        let (Some(_), Some(entity), Some(expected)) =
            (self.mode, self.config.entity, self.config.state.as_deref())
        else {
            return Ok(false);
        };
        let current = crate::listener(self.listener.as_ref())?.entity_state(entity);
        let result = current.as_deref() == Some(expected);
        if self.debug {
            tracing::debug!(uid = %self.uid, %entity, ?current, expected, result, "entity state evaluated");
        }
        Ok(result)
    }

    fn references_entity(&self, entity: EntityRef) -> Result<bool, HandlerError> {
        Ok(self.config.entity == Some(entity))
    }

    fn supports_combination(&self) -> bool {
        true
    }
}
