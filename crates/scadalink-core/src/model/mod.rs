// ── Device-group domain model ──
//
// Typed, fixed-shape state records for each device group and the
// rules that turn a raw wire value into a field value.

mod profile;
mod trainer_kit;
mod water_pump;

use std::fmt;

use serde::Serialize;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

pub use profile::GroupProfile;
pub use trainer_kit::TrainerKitState;
pub use water_pump::{PUMP_TAGS, WaterPumpState};

/// Values within this distance of `1.0` read as `true`.
///
/// Applied to every boolean-coded tag of every group.
pub const BOOL_TOLERANCE: f64 = 1e-6;

/// Outcome of feeding one reading into a state record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagUpdate {
    /// The name matches no field of this group.
    Unknown,
    /// Known field, same value as before.
    Unchanged,
    /// Known field, new value stored.
    Changed,
}

impl TagUpdate {
    pub fn is_changed(self) -> bool {
        self == Self::Changed
    }
}

/// A fixed-shape state record for one device group.
///
/// `Default` is the documented power-on state (`false` / `0` everywhere).
pub trait GroupState:
    Clone + Default + PartialEq + fmt::Debug + Serialize + Send + Sync + 'static
{
    /// Wire names of every tag this record tracks, in request order.
    const TAGS: &'static [&'static str];

    /// Profile for the stock deployment of this group.
    fn default_profile() -> GroupProfile;

    /// Coerce `value` to the field type `name` maps to and store it.
    fn apply_reading(&mut self, name: &str, value: f64) -> TagUpdate;
}

// ── Coercion helpers ─────────────────────────────────────────────────

/// Boolean-coded tag: on when the value is (approximately) `1`.
pub fn coerce_bool(raw: f64) -> bool {
    (raw - 1.0).abs() < BOOL_TOLERANCE
}

/// Integer tag: nearest integer, ties to even, saturating at the `i32` range.
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
pub fn coerce_int(raw: f64) -> i32 {
    raw.round_ties_even()
        .clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

/// Store `next` into `slot` when it differs (exact equality).
pub(crate) fn assign<T: PartialEq>(slot: &mut T, next: T) -> TagUpdate {
    if *slot == next {
        TagUpdate::Unchanged
    } else {
        *slot = next;
        TagUpdate::Changed
    }
}

// ── Group selection ──────────────────────────────────────────────────

/// The device groups this crate ships models for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum GroupKind {
    TrainerKit,
    WaterPump,
}

impl GroupKind {
    pub fn profile(self) -> GroupProfile {
        match self {
            Self::TrainerKit => TrainerKitState::default_profile(),
            Self::WaterPump => WaterPumpState::default_profile(),
        }
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Actuation value for a switchable tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SwitchState {
    #[strum(serialize = "off")]
    Off,
    #[strum(serialize = "on")]
    On,
}

impl SwitchState {
    /// Value sent on the wire.
    pub fn wire_value(self) -> i64 {
        match self {
            Self::Off => 0,
            Self::On => 1,
        }
    }
}

impl From<bool> for SwitchState {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}
