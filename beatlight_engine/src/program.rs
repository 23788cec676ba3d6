// Lighting program types and the JSON wire format.
//
// Two layers:
// - Typed: `GroupLightAssignment`, `BeatProgramEntry` and `LightProgram`
//   carry validated keys and `EffectTuple`s. This is what the selector and
//   assembler produce.
// - Wire: `RawGroupLight`, `RawBeatEntry` and `RawProgram` mirror the JSON
//   consumed by show control, with plain integers so that foreign files
//   (ground-truth annotations, hand edits) can be loaded and checked even
//   when they hold out-of-range values.
//
// Output shape, field order included:
//
//   {"beats": [{"time": .., "duration": .., "groupLights": [
//       {"groupLightKey": .., "MotionEffect": .., "ColorEffect": ..,
//        "IntensityEffect": .., "VfxEffect": ..}]}]}
//
// `BeatTimeline` is the input side: `{"beats": [{time, duration,
// bandEnergy?}]}`. Unknown extra fields in either file are ignored.

use std::path::Path;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::beat::BeatEvent;
use crate::catalog::GroupLightKey;
use crate::effect::{EffectField, EffectTuple, RawEffectTuple};
use crate::error::ProgramIoError;

// ---------------------------------------------------------------------------
// Typed program
// ---------------------------------------------------------------------------

/// One group's effects on one beat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GroupLightAssignment {
    pub key: GroupLightKey,
    pub effects: EffectTuple,
}

impl GroupLightAssignment {
    pub fn to_raw(&self) -> RawGroupLight {
        RawGroupLight::new(self.key.get() as i64, self.effects.to_raw())
    }
}

/// Assignments of one beat, ascending by key. At most one per catalog key.
pub type GroupLights = SmallVec<[GroupLightAssignment; GroupLightKey::COUNT]>;

#[derive(Clone, Debug, PartialEq)]
pub struct BeatProgramEntry {
    pub beat: BeatEvent,
    pub group_lights: GroupLights,
}

impl BeatProgramEntry {
    /// An entry with every group inactive.
    pub fn dark(beat: BeatEvent) -> Self {
        BeatProgramEntry {
            beat,
            group_lights: SmallVec::new(),
        }
    }

    pub fn is_dark(&self) -> bool {
        self.group_lights.is_empty()
    }

    pub fn to_raw(&self) -> RawBeatEntry {
        RawBeatEntry {
            time: self.beat.time,
            duration: self.beat.duration,
            group_lights: self.group_lights.iter().map(GroupLightAssignment::to_raw).collect(),
        }
    }
}

/// A complete program, one entry per input beat in input order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LightProgram {
    pub beats: Vec<BeatProgramEntry>,
}

impl LightProgram {
    pub fn len(&self) -> usize {
        self.beats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beats.is_empty()
    }

    pub fn to_raw(&self) -> RawProgram {
        RawProgram {
            beats: self.beats.iter().map(BeatProgramEntry::to_raw).collect(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        self.to_raw().to_json_pretty()
    }

    pub fn save(&self, path: &Path) -> Result<(), ProgramIoError> {
        self.to_raw().save(path)
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// One wire group light. Effect fields are optional on read so that a file
/// missing one can be reported instead of silently read as 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGroupLight {
    #[serde(rename = "groupLightKey")]
    pub group_light_key: i64,
    #[serde(rename = "MotionEffect", default, skip_serializing_if = "Option::is_none")]
    pub motion_effect: Option<i64>,
    #[serde(rename = "ColorEffect", default, skip_serializing_if = "Option::is_none")]
    pub color_effect: Option<i64>,
    #[serde(rename = "IntensityEffect", default, skip_serializing_if = "Option::is_none")]
    pub intensity_effect: Option<i64>,
    #[serde(rename = "VfxEffect", default, skip_serializing_if = "Option::is_none")]
    pub vfx_effect: Option<i64>,
}

impl RawGroupLight {
    pub fn new(key: i64, effects: RawEffectTuple) -> Self {
        RawGroupLight {
            group_light_key: key,
            motion_effect: Some(effects.motion),
            color_effect: Some(effects.color),
            intensity_effect: Some(effects.intensity),
            vfx_effect: Some(effects.vfx),
        }
    }

    fn field(&self, field: EffectField) -> Option<i64> {
        match field {
            EffectField::Motion => self.motion_effect,
            EffectField::Color => self.color_effect,
            EffectField::Intensity => self.intensity_effect,
            EffectField::Vfx => self.vfx_effect,
        }
    }

    /// Effect fields absent from the file, in wire order.
    pub fn missing_fields(&self) -> Vec<EffectField> {
        EffectField::ALL
            .into_iter()
            .filter(|&f| self.field(f).is_none())
            .collect()
    }

    /// The effects with absent fields read as 0.
    pub fn effects(&self) -> RawEffectTuple {
        RawEffectTuple::new(
            self.motion_effect.unwrap_or(0),
            self.color_effect.unwrap_or(0),
            self.intensity_effect.unwrap_or(0),
            self.vfx_effect.unwrap_or(0),
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawBeatEntry {
    pub time: f64,
    pub duration: f64,
    #[serde(rename = "groupLights", default)]
    pub group_lights: Vec<RawGroupLight>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProgram {
    pub beats: Vec<RawBeatEntry>,
}

impl RawProgram {
    pub fn from_json_str(json: &str) -> Result<Self, ProgramIoError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ProgramIoError> {
        let data = std::fs::read_to_string(path).map_err(|e| ProgramIoError::io(path, e))?;
        Self::from_json_str(&data)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn save(&self, path: &Path) -> Result<(), ProgramIoError> {
        write_json(path, &self.to_json_pretty()?)
    }
}

/// Input beats as delivered by beat detection.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BeatTimeline {
    pub beats: Vec<BeatEvent>,
}

impl BeatTimeline {
    pub fn from_json_str(json: &str) -> Result<Self, ProgramIoError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ProgramIoError> {
        let data = std::fs::read_to_string(path).map_err(|e| ProgramIoError::io(path, e))?;
        Self::from_json_str(&data)
    }

    pub fn save(&self, path: &Path) -> Result<(), ProgramIoError> {
        write_json(path, &serde_json::to_string_pretty(self)?)
    }
}

fn write_json(path: &Path, json: &str) -> Result<(), ProgramIoError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ProgramIoError::io(parent, e))?;
    }
    std::fs::write(path, json).map_err(|e| ProgramIoError::io(path, e))
}
