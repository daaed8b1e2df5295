//! Discrete brightness steps
//!
//! The left pad cycles through four fixed levels and, when the
//! `auto-brightness` feature is enabled, an automatic mode driven by the
//! ambient light sensor.

const STEP_ID_QUARTER: u8 = 0;
const STEP_ID_HALF: u8 = 1;
const STEP_ID_THREE_QUARTERS: u8 = 2;
const STEP_ID_FULL: u8 = 3;
const STEP_ID_AUTO: u8 = 4;

/// Brightness of each fixed step
pub const STEP_VALUES: [f32; 4] = [0.25, 0.5, 0.75, 1.0];

/// Brightness step selected by the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum BrightnessStep {
    Quarter = STEP_ID_QUARTER,
    Half = STEP_ID_HALF,
    ThreeQuarters = STEP_ID_THREE_QUARTERS,
    #[default]
    Full = STEP_ID_FULL,
    /// Driven by ambient light
    Auto = STEP_ID_AUTO,
}

impl BrightnessStep {
    pub const fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            STEP_ID_QUARTER => Self::Quarter,
            STEP_ID_HALF => Self::Half,
            STEP_ID_THREE_QUARTERS => Self::ThreeQuarters,
            STEP_ID_FULL => Self::Full,
            STEP_ID_AUTO if cfg!(feature = "auto-brightness") => Self::Auto,
            _ => return None,
        })
    }

    pub const fn as_raw(self) -> u8 {
        self as u8
    }

    /// Next step in the cycle, wrapping around
    pub const fn next(self) -> Self {
        match self {
            Self::Quarter => Self::Half,
            Self::Half => Self::ThreeQuarters,
            Self::ThreeQuarters => Self::Full,
            Self::Full if cfg!(feature = "auto-brightness") => Self::Auto,
            Self::Full | Self::Auto => Self::Quarter,
        }
    }

    /// Step preceding this one in the cycle
    ///
    /// The step before `Quarter` is `Full`, never `Auto`.
    pub const fn previous(self) -> Self {
        match self {
            Self::Quarter => Self::Full,
            Self::Half => Self::Quarter,
            Self::ThreeQuarters => Self::Half,
            Self::Full => Self::ThreeQuarters,
            Self::Auto => Self::Full,
        }
    }

    /// Table brightness of a fixed step, `None` for `Auto`
    pub const fn value(self) -> Option<f32> {
        match self {
            Self::Auto => None,
            step => Some(STEP_VALUES[step as usize]),
        }
    }

    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }
}
