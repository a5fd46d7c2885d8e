use std::fmt;

use serde::Serialize;

/// Logical battery properties answered by the query interface.
///
/// Kept in one place with the capability list and the dispatch match in the
/// parent module; a property added here must be added to both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryProperty {
    Present,
    Capacity,
    TimeToEmptyNow,
    TimeToEmptyAvg,
    TimeToFullAvg,
    CurrentNow,
    CurrentAvg,
    VoltageNow,
    Temperature,
    CycleCount,
}

impl BatteryProperty {
    /// Stable identifier, as exposed to the host framework.
    pub fn as_str(&self) -> &'static str {
        match self {
            BatteryProperty::Present => "present",
            BatteryProperty::Capacity => "capacity",
            BatteryProperty::TimeToEmptyNow => "time_to_empty_now",
            BatteryProperty::TimeToEmptyAvg => "time_to_empty_avg",
            BatteryProperty::TimeToFullAvg => "time_to_full_avg",
            BatteryProperty::CurrentNow => "current_now",
            BatteryProperty::CurrentAvg => "current_avg",
            BatteryProperty::VoltageNow => "voltage_now",
            BatteryProperty::Temperature => "temperature",
            BatteryProperty::CycleCount => "cycle_count",
        }
    }
}

impl fmt::Display for BatteryProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_serde_name() {
        let json = serde_json::to_string(&BatteryProperty::TimeToEmptyNow).unwrap();
        assert_eq!(json, format!("\"{}\"", BatteryProperty::TimeToEmptyNow));
    }
}
