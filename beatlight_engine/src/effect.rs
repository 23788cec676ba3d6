// Effect enums and the effect tuple.
//
// Each of the four effect fields is a small closed enum whose discriminant is
// its wire integer, with 0 always meaning "off". Inside the engine only the
// typed `EffectTuple` flows through decision logic. `RawEffectTuple` carries
// plain integers and exists solely at the serialization and validation
// boundary, where out-of-range values from a foreign file must be
// representable so they can be reported or repaired.

use std::fmt;

/// Declares a wire-backed effect enum with `ALL`, `wire()`, `from_wire()`
/// and `name()`. Every enum must have a `None = 0` variant.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value),+
        }

        impl $name {
            /// Every variant, in ascending wire order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Number of variants (one past the largest wire value).
            pub const COUNT: usize = Self::ALL.len();

            pub const fn wire(self) -> u8 {
                self as u8
            }

            pub fn from_wire(value: i64) -> Option<Self> {
                match value {
                    $($value => Some($name::$variant),)+
                    _ => None,
                }
            }

            pub const fn is_off(self) -> bool {
                matches!(self, $name::None)
            }

            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant),)+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::None
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

wire_enum! {
    /// Beam movement pattern.
    MotionEffect {
        None = 0,
        LaserCone = 1,
        LaserFan = 2,
        Wave = 3,
        Rotate = 4,
        CircleRotate = 5,
        PingPong = 6,
    }
}

wire_enum! {
    /// Beam coloring scheme.
    ColorEffect {
        None = 0,
        StaticColor = 1,
        RandomPerBeam = 2,
        PingPongColor = 3,
    }
}

wire_enum! {
    /// Brightness modulation.
    IntensityEffect {
        None = 0,
        /// Follows the track's spectrum; pairs with bass-heavy beats.
        SpectrumBased = 1,
        PingPongIntensity = 2,
        AlternatingBeams = 3,
        WaveIntensity = 4,
    }
}

wire_enum! {
    /// Special-effect trigger, reserved for VFX groups.
    VfxEffect {
        None = 0,
        Simultaneous = 1,
        Wave = 2,
    }
}

/// Names one of the four effect fields, for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EffectField {
    Motion,
    Color,
    Intensity,
    Vfx,
}

impl EffectField {
    pub const ALL: [EffectField; 4] = [
        EffectField::Motion,
        EffectField::Color,
        EffectField::Intensity,
        EffectField::Vfx,
    ];

    /// Field name as it appears on the wire.
    pub fn wire_name(self) -> &'static str {
        match self {
            EffectField::Motion => "MotionEffect",
            EffectField::Color => "ColorEffect",
            EffectField::Intensity => "IntensityEffect",
            EffectField::Vfx => "VfxEffect",
        }
    }
}

impl fmt::Display for EffectField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// The effect descriptor for one group on one beat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectTuple {
    pub motion: MotionEffect,
    pub color: ColorEffect,
    pub intensity: IntensityEffect,
    pub vfx: VfxEffect,
}

impl EffectTuple {
    pub const OFF: EffectTuple = EffectTuple {
        motion: MotionEffect::None,
        color: ColorEffect::None,
        intensity: IntensityEffect::None,
        vfx: VfxEffect::None,
    };

    /// A VFX-only tuple.
    pub const fn vfx(vfx: VfxEffect) -> Self {
        EffectTuple {
            vfx,
            ..Self::OFF
        }
    }

    /// A light tuple with no VFX component.
    pub const fn light(motion: MotionEffect, color: ColorEffect, intensity: IntensityEffect) -> Self {
        EffectTuple {
            motion,
            color,
            intensity,
            vfx: VfxEffect::None,
        }
    }

    /// True when every field is off.
    pub const fn is_off(&self) -> bool {
        self.motion.is_off() && self.color.is_off() && self.intensity.is_off() && self.vfx.is_off()
    }

    pub fn to_raw(self) -> RawEffectTuple {
        RawEffectTuple::from(self)
    }
}

/// Wire-level tuple. Values may be out of range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RawEffectTuple {
    pub motion: i64,
    pub color: i64,
    pub intensity: i64,
    pub vfx: i64,
}

impl RawEffectTuple {
    pub const fn new(motion: i64, color: i64, intensity: i64, vfx: i64) -> Self {
        RawEffectTuple {
            motion,
            color,
            intensity,
            vfx,
        }
    }

    pub fn field(&self, field: EffectField) -> i64 {
        match field {
            EffectField::Motion => self.motion,
            EffectField::Color => self.color,
            EffectField::Intensity => self.intensity,
            EffectField::Vfx => self.vfx,
        }
    }
}

impl From<EffectTuple> for RawEffectTuple {
    fn from(t: EffectTuple) -> Self {
        RawEffectTuple {
            motion: t.motion.wire() as i64,
            color: t.color.wire() as i64,
            intensity: t.intensity.wire() as i64,
            vfx: t.vfx.wire() as i64,
        }
    }
}
