//! Scene catalog and display labels.
//!
//! Wire messages carry raw scene ids; the notification layer wants a short
//! human label ("come to the Square"). Unrecognized ids fall back to a
//! generic label rather than leaking internal scene names to users.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Label used when a scene id is not in the catalog.
pub const UNKNOWN_SCENE_LABEL: &str = "somewhere";

/// Known in-app scenes a muster request can originate from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneName {
    /// The shared public plaza.
    Square,
    /// A friend group's hideout.
    Hideout,
    /// A user's personal room.
    Room,
}

impl SceneName {
    /// Raw scene id as carried on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Hideout => "hideout",
            Self::Room => "room",
        }
    }

    /// Short label shown to users.
    pub fn display_label(self) -> &'static str {
        match self {
            Self::Square => "the Square",
            Self::Hideout => "the Hideout",
            Self::Room => "their Room",
        }
    }
}

impl FromStr for SceneName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "square" => Ok(Self::Square),
            "hideout" => Ok(Self::Hideout),
            "room" => Ok(Self::Room),
            _ => Err(()),
        }
    }
}

/// Map a raw scene id to its display label, falling back to
/// [`UNKNOWN_SCENE_LABEL`] for ids outside the catalog.
pub fn display_scene_name(scene_id: &str) -> &str {
    scene_id
        .parse::<SceneName>()
        .map_or(UNKNOWN_SCENE_LABEL, SceneName::display_label)
}
