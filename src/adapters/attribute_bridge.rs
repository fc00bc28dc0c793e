//! Smart-home attribute bridge.
//!
//! The protocol stack delivers attribute writes as `(cluster, attribute,
//! value)` triples from its own task. Only three of them drive the lights;
//! this module maps those onto [`ControlCommand`]s and validates them
//! before they touch the control surface.
//!
//! | Cluster              | Attribute          | Command        |
//! |----------------------|--------------------|----------------|
//! | OnOff `0x0006`       | OnOff `0x0000`     | `SetPower`     |
//! | LevelControl `0x0008`| CurrentLevel `0x0000` | `SetBrightness` |
//! | ModeSelect `0x0050`  | CurrentMode `0x0003`  | `SetPattern`   |

use log::{debug, warn};

use crate::app::commands::{CommandError, ControlCommand};
use crate::app::control::ControlState;

pub const CLUSTER_ON_OFF: u32 = 0x0006;
pub const ATTR_ON_OFF: u32 = 0x0000;

pub const CLUSTER_LEVEL_CONTROL: u32 = 0x0008;
pub const ATTR_CURRENT_LEVEL: u32 = 0x0000;

pub const CLUSTER_MODE_SELECT: u32 = 0x0050;
pub const ATTR_CURRENT_MODE: u32 = 0x0003;

/// Level value the protocol reserves for "null".
pub const NULL_LEVEL: u8 = 255;

/// Attribute payload as delivered by the protocol stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrValue {
    Bool(bool),
    U8(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeUpdate {
    pub cluster_id: u32,
    pub attribute_id: u32,
    pub value: AttrValue,
}

/// Translate one attribute write. Attributes that do not drive the lights,
/// or that arrive with the wrong payload type, are `UnknownAttribute`.
pub fn to_command(update: &AttributeUpdate) -> Result<ControlCommand, CommandError> {
    match (update.cluster_id, update.attribute_id, update.value) {
        (CLUSTER_ON_OFF, ATTR_ON_OFF, AttrValue::Bool(on)) => Ok(ControlCommand::SetPower(on)),
        (CLUSTER_LEVEL_CONTROL, ATTR_CURRENT_LEVEL, AttrValue::U8(level)) => {
            if level == NULL_LEVEL {
                return Err(CommandError::BrightnessOutOfRange(u16::from(level)));
            }
            ControlCommand::brightness(u16::from(level))
        }
        (CLUSTER_MODE_SELECT, ATTR_CURRENT_MODE, AttrValue::U8(mode)) => {
            ControlCommand::pattern(mode)
        }
        _ => Err(CommandError::UnknownAttribute),
    }
}

/// Attribute-update callback body: translate, then apply.
///
/// Unrelated attributes are accepted and ignored so the protocol stack
/// keeps its own bookkeeping. Rejected values leave the control state
/// untouched and are reported back.
pub fn handle_update(control: &ControlState, update: &AttributeUpdate) -> Result<(), CommandError> {
    match to_command(update) {
        Ok(command) => {
            debug!("attr: {:?}", command);
            control.apply(command);
            Ok(())
        }
        Err(CommandError::UnknownAttribute) => {
            debug!(
                "attr: ignoring cluster 0x{:04x} attr 0x{:04x}",
                update.cluster_id, update.attribute_id
            );
            Ok(())
        }
        Err(e) => {
            warn!("attr: rejected update: {}", e);
            Err(e)
        }
    }
}
