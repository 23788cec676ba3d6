// Effect legalizer: the hard fixture-capability rules.
//
// Legality depends only on the owning group's type:
// - Vfx groups: Motion = Color = Intensity = 0, Vfx in {0, 1, 2}.
// - SingleLight / MultiLight groups: Vfx = 0.
// - Any group: every field within its enum range.
//
// Motion preferences per light group type are NOT checked here; they are
// weights applied by the selector (`preference.rs`). Keeping the two apart
// means a discouraged motion can still be emitted, while an illegal tuple
// never can: the selector passes every drawn tuple through `repair()`
// before emission.
//
// `repair()` maps any raw tuple to the nearest legal typed tuple and is
// idempotent: `repair(t, repair(t, x).to_raw()) == repair(t, x)`.

use std::fmt;

use crate::catalog::GroupType;
use crate::effect::{
    ColorEffect, EffectField, EffectTuple, IntensityEffect, MotionEffect, RawEffectTuple, VfxEffect,
};

/// One reason a raw tuple is illegal for a group type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Violation {
    /// Value outside the field's enum range.
    OutOfRange { field: EffectField, value: i64 },
    /// A VFX group carrying a light field.
    LightFieldOnVfxGroup { field: EffectField, value: i64 },
    /// A light group carrying a VFX effect.
    VfxOnLightGroup { group: GroupType, value: i64 },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::OutOfRange { field, value } => {
                write!(f, "{field}={value} out of range")
            }
            Violation::LightFieldOnVfxGroup { field, value } => {
                write!(f, "{field} should be 0 on a VFX group, got {value}")
            }
            Violation::VfxOnLightGroup { group, value } => {
                write!(f, "VfxEffect should be 0 on a {group}, got {value}")
            }
        }
    }
}

fn in_range(field: EffectField, value: i64) -> bool {
    match field {
        EffectField::Motion => MotionEffect::from_wire(value).is_some(),
        EffectField::Color => ColorEffect::from_wire(value).is_some(),
        EffectField::Intensity => IntensityEffect::from_wire(value).is_some(),
        EffectField::Vfx => VfxEffect::from_wire(value).is_some(),
    }
}

/// Every rule the tuple breaks for this group type, in field order.
pub fn violations(group: GroupType, raw: &RawEffectTuple) -> Vec<Violation> {
    let mut out = Vec::new();
    for field in EffectField::ALL {
        let value = raw.field(field);
        if !in_range(field, value) {
            out.push(Violation::OutOfRange { field, value });
        }
    }

    match group {
        GroupType::Vfx => {
            for field in [EffectField::Motion, EffectField::Color, EffectField::Intensity] {
                let value = raw.field(field);
                if value != 0 {
                    out.push(Violation::LightFieldOnVfxGroup { field, value });
                }
            }
        }
        GroupType::SingleLight | GroupType::MultiLight => {
            if raw.vfx != 0 {
                out.push(Violation::VfxOnLightGroup {
                    group,
                    value: raw.vfx,
                });
            }
        }
    }
    out
}

/// Whether a group of this type may ever emit the tuple.
pub fn is_legal(group: GroupType, raw: &RawEffectTuple) -> bool {
    let ranges_ok = EffectField::ALL.iter().all(|&f| in_range(f, raw.field(f)));
    let group_ok = match group {
        GroupType::Vfx => raw.motion == 0 && raw.color == 0 && raw.intensity == 0,
        GroupType::SingleLight | GroupType::MultiLight => raw.vfx == 0,
    };
    ranges_ok && group_ok
}

/// Map a raw tuple to the nearest legal tuple for this group type.
///
/// Out-of-range values become 0. VFX groups lose their light fields; light
/// groups lose their VFX field. Fields that are already legal are kept.
pub fn repair(group: GroupType, raw: &RawEffectTuple) -> EffectTuple {
    let motion = MotionEffect::from_wire(raw.motion).unwrap_or_default();
    let color = ColorEffect::from_wire(raw.color).unwrap_or_default();
    let intensity = IntensityEffect::from_wire(raw.intensity).unwrap_or_default();
    let vfx = VfxEffect::from_wire(raw.vfx).unwrap_or_default();

    match group {
        GroupType::Vfx => EffectTuple::vfx(vfx),
        GroupType::SingleLight | GroupType::MultiLight => {
            EffectTuple::light(motion, color, intensity)
        }
    }
}

/// `is_legal` for a typed tuple. Typed fields are always in range, so only
/// the group-type rules can fail.
pub fn is_legal_tuple(group: GroupType, tuple: &EffectTuple) -> bool {
    is_legal(group, &tuple.to_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::type_of;

    #[test]
    fn vfx_group_accepts_only_vfx_field() {
        let g = GroupType::Vfx;
        assert!(is_legal(g, &RawEffectTuple::new(0, 0, 0, 0)));
        assert!(is_legal(g, &RawEffectTuple::new(0, 0, 0, 1)));
        assert!(is_legal(g, &RawEffectTuple::new(0, 0, 0, 2)));
        assert!(!is_legal(g, &RawEffectTuple::new(0, 0, 0, 3)));
        assert!(!is_legal(g, &RawEffectTuple::new(1, 0, 0, 1)));
        assert!(!is_legal(g, &RawEffectTuple::new(0, 2, 0, 1)));
        assert!(!is_legal(g, &RawEffectTuple::new(0, 0, 4, 1)));
    }

    #[test]
    fn light_groups_reject_vfx_but_not_discouraged_motion() {
        for g in [GroupType::SingleLight, GroupType::MultiLight] {
            // Every in-range motion is legal; preference is a weighting.
            for m in 0..=6 {
                assert!(is_legal(g, &RawEffectTuple::new(m, 1, 1, 0)));
            }
            assert!(!is_legal(g, &RawEffectTuple::new(3, 1, 1, 1)));
        }
    }

    #[test]
    fn out_of_range_color_and_intensity_are_illegal_everywhere() {
        for g in GroupType::ALL {
            assert!(!is_legal(g, &RawEffectTuple::new(0, 4, 0, 0)));
            assert!(!is_legal(g, &RawEffectTuple::new(0, 0, 5, 0)));
            assert!(!is_legal(g, &RawEffectTuple::new(0, 0, -1, 0)));
        }
    }

    #[test]
    fn repair_vfx_out_of_range_goes_to_zero() {
        let g = type_of(1).unwrap();
        let repaired = repair(g, &RawEffectTuple::new(0, 0, 0, 3));
        assert_eq!(repaired, EffectTuple::OFF);
    }

    #[test]
    fn repair_strips_light_fields_from_vfx_groups() {
        let repaired = repair(GroupType::Vfx, &RawEffectTuple::new(4, 2, 1, 2));
        assert_eq!(repaired, EffectTuple::vfx(VfxEffect::Wave));
    }

    #[test]
    fn repair_strips_vfx_from_light_groups_and_clamps_fields() {
        let repaired = repair(GroupType::SingleLight, &RawEffectTuple::new(9, 3, 7, 2));
        assert_eq!(
            repaired,
            EffectTuple::light(MotionEffect::None, ColorEffect::PingPongColor, IntensityEffect::None)
        );
    }

    #[test]
    fn repair_keeps_legal_tuples_unchanged() {
        let raw = RawEffectTuple::new(1, 2, 3, 0);
        let repaired = repair(GroupType::MultiLight, &raw);
        assert_eq!(repaired.to_raw(), raw);
    }

    #[test]
    fn repair_is_idempotent_and_always_legal() {
        let samples = [-3, 0, 1, 2, 3, 4, 5, 6, 7, 100];
        for g in GroupType::ALL {
            for &m in &samples {
                for &c in &samples {
                    for &v in &samples {
                        let raw = RawEffectTuple::new(m, c, (m + c).rem_euclid(9) - 2, v);
                        let once = repair(g, &raw);
                        let twice = repair(g, &once.to_raw());
                        assert_eq!(once, twice, "repair not idempotent for {raw:?} on {g}");
                        assert!(is_legal_tuple(g, &once), "repair produced illegal {once:?} on {g}");
                    }
                }
            }
        }
    }

    #[test]
    fn violations_explain_every_failure() {
        let v = violations(GroupType::Vfx, &RawEffectTuple::new(1, 0, 9, 0));
        assert_eq!(
            v,
            vec![
                Violation::OutOfRange {
                    field: EffectField::Intensity,
                    value: 9
                },
                Violation::LightFieldOnVfxGroup {
                    field: EffectField::Motion,
                    value: 1
                },
                Violation::LightFieldOnVfxGroup {
                    field: EffectField::Intensity,
                    value: 9
                },
            ]
        );
        assert!(violations(GroupType::MultiLight, &RawEffectTuple::new(2, 1, 1, 0)).is_empty());
    }

    #[test]
    fn violations_agree_with_is_legal() {
        for g in GroupType::ALL {
            for raw in [
                RawEffectTuple::new(0, 0, 0, 0),
                RawEffectTuple::new(0, 0, 0, 2),
                RawEffectTuple::new(3, 1, 1, 0),
                RawEffectTuple::new(3, 1, 1, 1),
                RawEffectTuple::new(8, 0, 0, 0),
            ] {
                assert_eq!(violations(g, &raw).is_empty(), is_legal(g, &raw));
            }
        }
    }
}
