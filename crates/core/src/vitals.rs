//! Vital-sign readings and the named measurements they carry.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{PatientId, Timestamp};

/// A named physiological measurement carried by every reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalType {
    OxygenSaturation,
    BloodPressureSystolic,
    BloodPressureDiastolic,
    Heartbeat,
    Temperature,
    BloodGlucose,
    RespirationRate,
}

impl VitalType {
    /// Every vital type, in the order readings list them.
    pub const ALL: [VitalType; 7] = [
        VitalType::OxygenSaturation,
        VitalType::BloodPressureSystolic,
        VitalType::BloodPressureDiastolic,
        VitalType::Heartbeat,
        VitalType::Temperature,
        VitalType::BloodGlucose,
        VitalType::RespirationRate,
    ];

    /// Canonical wire / column name.
    pub fn as_str(self) -> &'static str {
        match self {
            VitalType::OxygenSaturation => "oxygen_saturation",
            VitalType::BloodPressureSystolic => "blood_pressure_systolic",
            VitalType::BloodPressureDiastolic => "blood_pressure_diastolic",
            VitalType::Heartbeat => "heartbeat",
            VitalType::Temperature => "temperature",
            VitalType::BloodGlucose => "blood_glucose",
            VitalType::RespirationRate => "respiration_rate",
        }
    }

    /// Display unit for values of this vital.
    pub fn unit(self) -> &'static str {
        match self {
            VitalType::OxygenSaturation => "%",
            VitalType::BloodPressureSystolic | VitalType::BloodPressureDiastolic => "mmHg",
            VitalType::Heartbeat => "bpm",
            VitalType::Temperature => "°F",
            VitalType::BloodGlucose => "mg/dL",
            VitalType::RespirationRate => "breaths/min",
        }
    }

    /// Parse a canonical name back into a vital type.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == name)
    }
}

impl fmt::Display for VitalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The measurement block of a reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalSigns {
    pub oxygen_saturation: i32,
    pub blood_pressure_systolic: i32,
    pub blood_pressure_diastolic: i32,
    pub heartbeat: i32,
    pub temperature: f64,
    pub blood_glucose: i32,
    pub respiration_rate: i32,
}

impl VitalSigns {
    /// Value of a single measurement, widened to `f64`.
    pub fn value_of(&self, vital: VitalType) -> f64 {
        match vital {
            VitalType::OxygenSaturation => f64::from(self.oxygen_saturation),
            VitalType::BloodPressureSystolic => f64::from(self.blood_pressure_systolic),
            VitalType::BloodPressureDiastolic => f64::from(self.blood_pressure_diastolic),
            VitalType::Heartbeat => f64::from(self.heartbeat),
            VitalType::Temperature => self.temperature,
            VitalType::BloodGlucose => f64::from(self.blood_glucose),
            VitalType::RespirationRate => f64::from(self.respiration_rate),
        }
    }
}

/// One timestamped snapshot of a patient's measurements.
///
/// Readings are immutable once stored; the most recent one by `timestamp`
/// is what the live vitals feed forwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalReading {
    pub patient_id: PatientId,
    pub timestamp: Timestamp,
    pub vital_signs: VitalSigns,
    /// Device that produced the reading.
    pub device_id: String,
    /// When the ingestion pipeline processed the reading, if recorded.
    pub processing_time: Option<Timestamp>,
    /// Patient display name as captured by the device.
    #[serde(default)]
    pub name: String,
    /// Patient category, e.g. `ICU`.
    #[serde(default)]
    pub category: String,
    /// Recorded condition, e.g. `Post-Surgery`.
    #[serde(default)]
    pub condition: String,
    /// Set by ingestion when the reading already raised alerts upstream.
    #[serde(default)]
    pub alerts_generated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_parse() {
        for vital in VitalType::ALL {
            assert_eq!(VitalType::parse(vital.as_str()), Some(vital));
        }
        assert_eq!(VitalType::parse("pulse"), None);
    }

    #[test]
    fn serde_name_matches_as_str() {
        let json = serde_json::to_value(VitalType::BloodPressureSystolic).unwrap();
        assert_eq!(json, "blood_pressure_systolic");
    }

    #[test]
    fn value_of_widens_integer_measurements() {
        let signs = VitalSigns {
            oxygen_saturation: 97,
            blood_pressure_systolic: 121,
            blood_pressure_diastolic: 79,
            heartbeat: 72,
            temperature: 98.6,
            blood_glucose: 105,
            respiration_rate: 16,
        };
        assert_eq!(signs.value_of(VitalType::OxygenSaturation), 97.0);
        assert_eq!(signs.value_of(VitalType::Temperature), 98.6);
        assert_eq!(signs.value_of(VitalType::RespirationRate), 16.0);
    }

    #[test]
    fn reading_without_patient_details_deserializes_with_defaults() {
        let json = serde_json::json!({
            "patient_id": "P006",
            "timestamp": "2025-03-01T12:00:00Z",
            "vital_signs": {
                "oxygen_saturation": 95,
                "blood_pressure_systolic": 120,
                "blood_pressure_diastolic": 80,
                "heartbeat": 72,
                "temperature": 98.6,
                "blood_glucose": 100,
                "respiration_rate": 16
            },
            "device_id": "monitor-01",
            "processing_time": null
        });

        let reading: VitalReading = serde_json::from_value(json).unwrap();
        assert_eq!(reading.name, "");
        assert_eq!(reading.condition, "");
        assert!(!reading.alerts_generated);

        let out = serde_json::to_value(&reading).unwrap();
        assert_eq!(out["category"], "");
        assert_eq!(out["alerts_generated"], false);
    }
}
