//! Descriptors and instance keys — how the host refers to trigger types and
//! to configured triggers.

use serde::{Deserialize, Serialize};

use crate::id::{OwnerRef, SubVariantPosition, TriggerUid, TypePosition};

/// Catalogue entry for a registered trigger type.
///
/// The `name` is the identity; the `position` is the stable external index
/// hosts persist inside their rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriggerTypeDescriptor {
    pub position: TypePosition,
    pub name: String,
}

impl std::fmt::Display for TriggerTypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {}", self.position, self.name)
    }
}

/// Host-owned identity of a configured trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceIdentity {
    pub uid: TriggerUid,
    pub owner_ref: OwnerRef,
}

impl InstanceIdentity {
    #[must_use]
    pub fn new(uid: impl Into<TriggerUid>, owner_ref: impl Into<OwnerRef>) -> Self {
        Self {
            uid: uid.into(),
            owner_ref: owner_ref.into(),
        }
    }
}

/// Everything needed to rebuild one configured trigger: which type, which
/// sub-variant, which saved state.
///
/// `config_data` is opaque here; only the trigger type's handler interprets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerInstanceKey {
    pub type_position: TypePosition,
    #[serde(default)]
    pub sub_type_position: SubVariantPosition,
    #[serde(default)]
    pub identity: InstanceIdentity,
    #[serde(default)]
    pub config_data: Vec<u8>,
}

impl TriggerInstanceKey {
    /// Key for a freshly added trigger: no sub-variant, no saved state.
    #[must_use]
    pub fn new(type_position: impl Into<TypePosition>, identity: InstanceIdentity) -> Self {
        Self {
            type_position: type_position.into(),
            sub_type_position: SubVariantPosition::NONE,
            identity,
            config_data: Vec::new(),
        }
    }

    /// Select a sub-variant.
    #[must_use]
    pub fn with_sub_type(mut self, position: impl Into<SubVariantPosition>) -> Self {
        self.sub_type_position = position.into();
        self
    }

    /// Attach saved configuration bytes.
    #[must_use]
    pub fn with_config(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.config_data = data.into();
        self
    }
}

impl std::fmt::Display for TriggerInstanceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "trigger({}/{}, uid={}, owner={}, {} bytes)",
            self.type_position,
            self.sub_type_position,
            self.identity.uid,
            self.identity.owner_ref,
            self.config_data.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_start_without_sub_type_or_config() {
        let key = TriggerInstanceKey::new(2, InstanceIdentity::new(10, 20));
        assert_eq!(key.type_position, TypePosition::new(2));
        assert!(key.sub_type_position.is_none());
        assert!(key.config_data.is_empty());
    }

    #[test]
    fn should_apply_builder_methods() {
        let key = TriggerInstanceKey::new(1, InstanceIdentity::default())
            .with_sub_type(3)
            .with_config(b"{}".to_vec());
        assert_eq!(key.sub_type_position, SubVariantPosition::new(3));
        assert_eq!(key.config_data, b"{}");
    }

    #[test]
    fn should_display_key_summary() {
        let key = TriggerInstanceKey::new(1, InstanceIdentity::new(5, 6))
            .with_sub_type(2)
            .with_config("abc");
        assert_eq!(key.to_string(), "trigger(1/2, uid=5, owner=6, 3 bytes)");
    }

    #[test]
    fn should_parse_key_with_missing_optional_fields() {
        let key: TriggerInstanceKey = serde_json::from_str(r#"{"type_position": 4}"#).unwrap();
        assert_eq!(key.type_position, TypePosition::new(4));
        assert!(key.sub_type_position.is_none());
        assert_eq!(key.identity, InstanceIdentity::default());
    }

    #[test]
    fn should_display_descriptor() {
        let descriptor = TriggerTypeDescriptor {
            position: TypePosition::new(1),
            name: "builtin.weekday".to_string(),
        };
        assert_eq!(descriptor.to_string(), "#1 builtin.weekday");
    }
}
