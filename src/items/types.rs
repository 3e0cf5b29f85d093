use serde::{Deserialize, Serialize};

/// Orientation of an item inside a container grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    Horizontal,
    Vertical,
}

impl Rotation {
    pub fn from_rotated(rotated: bool) -> Self {
        if rotated {
            Rotation::Vertical
        } else {
            Rotation::Horizontal
        }
    }

    pub fn is_rotated(&self) -> bool {
        matches!(self, Rotation::Vertical)
    }
}

/// Where an item sits inside its parent.
///
/// Grid items carry a cell position and rotation; cartridges in a magazine
/// or ammo box are addressed by stack index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemLocation {
    Grid { x: u32, y: u32, r: Rotation },
    Index(u32),
}

/// One node of a flat item hierarchy. Children point at their parent by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub id: String,
    pub tpl: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<ItemLocation>,
}

impl ItemRecord {
    /// A parentless item with no stack or location data.
    pub fn root(id: impl Into<String>, tpl: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tpl: tpl.into(),
            parent_id: None,
            slot_id: None,
            stack_count: None,
            location: None,
        }
    }

    /// An item attached to `parent_id` in slot `slot_id`.
    pub fn child(
        id: impl Into<String>,
        tpl: impl Into<String>,
        parent_id: impl Into<String>,
        slot_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            tpl: tpl.into(),
            parent_id: Some(parent_id.into()),
            slot_id: Some(slot_id.into()),
            stack_count: None,
            location: None,
        }
    }

    pub fn with_stack(mut self, count: u32) -> Self {
        self.stack_count = Some(count);
        self
    }

    pub fn with_location(mut self, location: ItemLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn is_child_of(&self, parent_id: &str) -> bool {
        self.parent_id.as_deref() == Some(parent_id)
    }
}
