//! Battery level readers.
//!
//! A [`Status`](crate::status::Status) records the device power level at the
//! moment a position was captured. The reader is a trait seam so that hosts
//! without a battery (or tests) can supply a fixed value.
//!
//! A failed or missing reading never blocks status recording - it yields the
//! [`UNKNOWN_POWER_LEVEL`] sentinel instead.

use std::path::PathBuf;

/// Sentinel power level reported when no battery reading is available.
///
/// Level -1 over scale 1, times 100. Consumers treat any negative power
/// level as "unknown".
pub const UNKNOWN_POWER_LEVEL: f32 = -100.0;

/// Trait for reading the current device power level.
pub trait BatteryReader: Send + Sync {
    /// Returns the current charge as a percentage (0-100), or
    /// [`UNKNOWN_POWER_LEVEL`] if no reading is available.
    fn read(&self) -> f32;
}

/// Battery reader backed by the Linux power-supply sysfs interface.
///
/// Reads `/sys/class/power_supply/<supply>/capacity`, which contains the
/// charge percentage as a plain integer.
#[derive(Debug, Clone)]
pub struct SysfsBatteryReader {
    capacity_path: PathBuf,
}

impl SysfsBatteryReader {
    /// Default power supply name on most laptops and SBCs.
    pub const DEFAULT_SUPPLY: &'static str = "BAT0";

    /// Create a reader for the named power supply.
    pub fn new(supply: &str) -> Self {
        Self {
            capacity_path: PathBuf::from(format!("/sys/class/power_supply/{supply}/capacity")),
        }
    }
}

impl Default for SysfsBatteryReader {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SUPPLY)
    }
}

impl BatteryReader for SysfsBatteryReader {
    fn read(&self) -> f32 {
        match std::fs::read_to_string(&self.capacity_path) {
            Ok(contents) => match contents.trim().parse::<f32>() {
                Ok(level) => level,
                Err(e) => {
                    tracing::warn!(
                        path = %self.capacity_path.display(),
                        error = %e,
                        "Unparseable battery capacity, using sentinel"
                    );
                    UNKNOWN_POWER_LEVEL
                }
            },
            Err(e) => {
                tracing::debug!(
                    path = %self.capacity_path.display(),
                    error = %e,
                    "No battery reading available, using sentinel"
                );
                UNKNOWN_POWER_LEVEL
            }
        }
    }
}

/// Battery reader that always returns a fixed level.
///
/// For tests and for hosts without a battery.
#[derive(Debug, Clone, Copy)]
pub struct FixedBatteryReader(pub f32);

impl BatteryReader for FixedBatteryReader {
    fn read(&self) -> f32 {
        self.0
    }
}
