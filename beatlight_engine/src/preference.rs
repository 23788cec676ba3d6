// Soft per-group-type preferences.
//
// `PreferenceTable` holds one weight per enum value for each (group type,
// effect field) pair. Weights are multipliers fed into the selector's
// weighted draws; they never reject a value outright, which is the
// legalizer's job. Built once from `PreferenceParams` and read-only after.
//
// VFX groups draw only the VFX field: their motion, color and intensity
// tables put all weight on `None`. Light groups never draw a VFX value.

use crate::catalog::GroupType;
use crate::config::{check_table, PreferenceParams};
use crate::effect::{ColorEffect, EffectField, IntensityEffect, MotionEffect, VfxEffect};
use crate::error::ConfigError;

/// Weights for one group type, indexed by wire value.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldWeights {
    pub motion: Vec<f64>,
    pub color: Vec<f64>,
    pub intensity: Vec<f64>,
    pub vfx: Vec<f64>,
}

impl FieldWeights {
    pub fn get(&self, field: EffectField) -> &[f64] {
        match field {
            EffectField::Motion => &self.motion,
            EffectField::Color => &self.color,
            EffectField::Intensity => &self.intensity,
            EffectField::Vfx => &self.vfx,
        }
    }
}

/// Weight vector of `len` entries with everything on value 0.
fn only_off(len: usize) -> Vec<f64> {
    let mut w = vec![0.0; len];
    w[0] = 1.0;
    w
}

#[derive(Clone, Debug, PartialEq)]
pub struct PreferenceTable {
    vfx: FieldWeights,
    single: FieldWeights,
    multi: FieldWeights,
}

impl PreferenceTable {
    /// Build from config, checking every table against its enum bound.
    pub fn from_params(params: &PreferenceParams) -> Result<Self, ConfigError> {
        check_table("preference.singleMotion", &params.single_motion, MotionEffect::COUNT)?;
        check_table("preference.multiMotion", &params.multi_motion, MotionEffect::COUNT)?;
        check_table("preference.lightColor", &params.light_color, ColorEffect::COUNT)?;
        check_table("preference.lightIntensity", &params.light_intensity, IntensityEffect::COUNT)?;
        check_table("preference.vfx", &params.vfx, VfxEffect::COUNT)?;

        let light = |motion: &[f64]| FieldWeights {
            motion: motion.to_vec(),
            color: params.light_color.clone(),
            intensity: params.light_intensity.clone(),
            vfx: only_off(VfxEffect::COUNT),
        };

        Ok(PreferenceTable {
            vfx: FieldWeights {
                motion: only_off(MotionEffect::COUNT),
                color: only_off(ColorEffect::COUNT),
                intensity: only_off(IntensityEffect::COUNT),
                vfx: params.vfx.clone(),
            },
            single: light(&params.single_motion),
            multi: light(&params.multi_motion),
        })
    }

    pub fn for_group(&self, group: GroupType) -> &FieldWeights {
        match group {
            GroupType::Vfx => &self.vfx,
            GroupType::SingleLight => &self.single,
            GroupType::MultiLight => &self.multi,
        }
    }

    pub fn weights(&self, group: GroupType, field: EffectField) -> &[f64] {
        self.for_group(group).get(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_table() -> PreferenceTable {
        PreferenceTable::from_params(&PreferenceParams::default()).unwrap()
    }

    #[test]
    fn vfx_groups_only_weight_vfx_field() {
        let table = default_table();
        let w = table.for_group(GroupType::Vfx);
        assert_eq!(w.motion[0], 1.0);
        assert!(w.motion[1..].iter().all(|&x| x == 0.0));
        assert!(w.color[1..].iter().all(|&x| x == 0.0));
        assert!(w.intensity[1..].iter().all(|&x| x == 0.0));
        assert_eq!(w.vfx, vec![0.0, 1.0, 1.0]);
    }

    #[test]
    fn light_groups_never_weight_vfx() {
        let table = default_table();
        for g in [GroupType::SingleLight, GroupType::MultiLight] {
            assert_eq!(table.weights(g, EffectField::Vfx), &[1.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn discouraged_motions_keep_a_nonzero_weight() {
        let table = default_table();
        let single = table.weights(GroupType::SingleLight, EffectField::Motion);
        let multi = table.weights(GroupType::MultiLight, EffectField::Motion);
        assert!(single[MotionEffect::LaserCone.wire() as usize] > 0.0);
        assert!(multi[MotionEffect::Rotate.wire() as usize] > 0.0);
        assert!(single[MotionEffect::Rotate.wire() as usize] > multi[MotionEffect::Rotate.wire() as usize]);
    }

    #[test]
    fn short_table_is_an_enum_bound_error() {
        let params = PreferenceParams {
            vfx: vec![0.0, 1.0],
            ..PreferenceParams::default()
        };
        let err = PreferenceTable::from_params(&params).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::EnumBound {
                table: "preference.vfx",
                expected: 3,
                actual: 2
            }
        ));
    }
}
