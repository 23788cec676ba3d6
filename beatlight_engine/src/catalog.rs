// Group catalog: the fixed registry of lighting groups.
//
// Seven group keys (0..=6) map many-to-one onto three group types:
//   0, 1    -> Vfx          (special effects: fireworks, smoke, ...)
//   2, 3    -> SingleLight  (individual moving heads)
//   4, 5, 6 -> MultiLight   (synchronized laser banks)
//
// The table is a `static` array with no mutation path. Lookups are O(1) and
// safe from any thread. `GroupLightKey` is a validated newtype so the rest of
// the engine never handles a raw key that missed the catalog check.
//
// Each group type also names the motions it typically uses. That set is a
// soft preference consumed by `preference.rs` and the program validator, not
// a legality rule (see `legalizer.rs`).

use std::fmt;

use crate::effect::MotionEffect;
use crate::error::CatalogError;

/// Capability class of a lighting group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupType {
    Vfx,
    SingleLight,
    MultiLight,
}

impl GroupType {
    pub const ALL: [GroupType; 3] = [GroupType::Vfx, GroupType::SingleLight, GroupType::MultiLight];

    /// Motions this group type is typically driven with. `None` is always
    /// acceptable and listed first.
    pub fn preferred_motions(self) -> &'static [MotionEffect] {
        match self {
            GroupType::Vfx => &[MotionEffect::None],
            GroupType::SingleLight => &[
                MotionEffect::None,
                MotionEffect::Wave,
                MotionEffect::Rotate,
                MotionEffect::CircleRotate,
                MotionEffect::PingPong,
            ],
            GroupType::MultiLight => &[
                MotionEffect::None,
                MotionEffect::LaserCone,
                MotionEffect::LaserFan,
            ],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GroupType::Vfx => "VFX_GROUP",
            GroupType::SingleLight => "SINGLE_LIGHT_GROUP",
            GroupType::MultiLight => "MULTI_LIGHT_GROUP",
        }
    }
}

impl fmt::Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

static CATALOG: [GroupType; GroupLightKey::COUNT] = [
    GroupType::Vfx,
    GroupType::Vfx,
    GroupType::SingleLight,
    GroupType::SingleLight,
    GroupType::MultiLight,
    GroupType::MultiLight,
    GroupType::MultiLight,
];

/// A lighting group identity that is known to exist in the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupLightKey(u8);

impl GroupLightKey {
    /// Number of groups in the catalog.
    pub const COUNT: usize = 7;

    /// Every catalog key, in ascending order.
    pub const ALL: [GroupLightKey; Self::COUNT] = [
        GroupLightKey(0),
        GroupLightKey(1),
        GroupLightKey(2),
        GroupLightKey(3),
        GroupLightKey(4),
        GroupLightKey(5),
        GroupLightKey(6),
    ];

    /// Validate a raw key against the catalog.
    pub fn new(raw: i64) -> Result<Self, CatalogError> {
        match u8::try_from(raw) {
            Ok(k) if (k as usize) < Self::COUNT => Ok(GroupLightKey(k)),
            _ => Err(CatalogError::UnknownKey(raw)),
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub fn group_type(self) -> GroupType {
        CATALOG[self.index()]
    }
}

impl fmt::Display for GroupLightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Look up the group type of a raw key.
pub fn type_of(key: i64) -> Result<GroupType, CatalogError> {
    GroupLightKey::new(key).map(GroupLightKey::group_type)
}
