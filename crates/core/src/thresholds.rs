//! Threshold evaluation engine for patient vitals.
//!
//! Pure logic with no store access or clock, and no id generation. The caller
//! fetches the reading, runs [`evaluate`], and turns each returned
//! [`AlertCandidate`] into an [`Alert`](crate::alert::Alert).

use crate::alert::{AlertCandidate, AlertSeverity};
use crate::error::CoreError;
use crate::vitals::{VitalReading, VitalType};

/// Which side of a threshold is clinically bad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Values strictly below the threshold breach it.
    LowIsBad,
    /// Values strictly above the threshold breach it.
    HighIsBad,
}

impl Direction {
    fn breaches(self, value: f64, threshold: f64) -> bool {
        match self {
            Direction::LowIsBad => value < threshold,
            Direction::HighIsBad => value > threshold,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Direction::LowIsBad => "LOW",
            Direction::HighIsBad => "HIGH",
        }
    }
}

/// A (critical, warning) threshold band for one vital type.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdRule {
    pub vital: VitalType,
    pub direction: Direction,
    pub critical: f64,
    pub warning: f64,
}

impl ThresholdRule {
    pub const fn new(vital: VitalType, direction: Direction, critical: f64, warning: f64) -> Self {
        Self {
            vital,
            direction,
            critical,
            warning,
        }
    }

    /// Check that the critical band lies beyond the warning band.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.critical.is_finite() || !self.warning.is_finite() {
            return Err(CoreError::Validation(format!(
                "thresholds for {} must be finite",
                self.vital
            )));
        }
        let ordered = match self.direction {
            Direction::LowIsBad => self.critical < self.warning,
            Direction::HighIsBad => self.critical > self.warning,
        };
        if !ordered {
            return Err(CoreError::Validation(format!(
                "critical threshold for {} must be more extreme than the warning threshold",
                self.vital
            )));
        }
        Ok(())
    }

    /// Most severe band the value falls into, if any.
    fn classify(&self, value: f64) -> Option<AlertSeverity> {
        if self.direction.breaches(value, self.critical) {
            Some(AlertSeverity::Critical)
        } else if self.direction.breaches(value, self.warning) {
            Some(AlertSeverity::Warning)
        } else {
            None
        }
    }
}

/// The default rule table, in evaluation order.
pub const DEFAULT_RULES: [ThresholdRule; 2] = [
    ThresholdRule::new(VitalType::OxygenSaturation, Direction::LowIsBad, 88.0, 92.0),
    ThresholdRule::new(
        VitalType::BloodPressureSystolic,
        Direction::HighIsBad,
        180.0,
        140.0,
    ),
];

/// Evaluate one reading against `rules` and return the breaches.
///
/// Rules are applied in slice order. Each rule yields at most one
/// candidate: critical is checked first and, when it matches, the warning
/// band for the same vital is not emitted.
pub fn evaluate(reading: &VitalReading, rules: &[ThresholdRule]) -> Vec<AlertCandidate> {
    rules
        .iter()
        .filter_map(|rule| {
            let value = reading.vital_signs.value_of(rule.vital);
            let severity = rule.classify(value)?;
            Some(build_candidate(reading, rule, severity, value))
        })
        .collect()
}

fn build_candidate(
    reading: &VitalReading,
    rule: &ThresholdRule,
    severity: AlertSeverity,
    value: f64,
) -> AlertCandidate {
    let level = match severity {
        AlertSeverity::Critical => "CRITICAL",
        AlertSeverity::Warning => "WARNING",
    };
    let unit = rule.vital.unit();
    AlertCandidate {
        patient_id: reading.patient_id.clone(),
        vital_type: rule.vital,
        severity,
        value,
        unit: unit.to_string(),
        message: format!(
            "{level} {}: {} is {value:.1} {unit}",
            rule.direction.label(),
            rule.vital
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::vitals::VitalSigns;

    fn make_reading(oxygen: i32, systolic: i32) -> VitalReading {
        VitalReading {
            patient_id: "P006".to_string(),
            timestamp: Utc::now(),
            vital_signs: VitalSigns {
                oxygen_saturation: oxygen,
                blood_pressure_systolic: systolic,
                blood_pressure_diastolic: 80,
                heartbeat: 72,
                temperature: 98.6,
                blood_glucose: 100,
                respiration_rate: 16,
            },
            device_id: "DEV-1".to_string(),
            processing_time: None,
            name: String::new(),
            category: String::new(),
            condition: String::new(),
            alerts_generated: false,
        }
    }

    #[test]
    fn no_alerts_when_within_normal_bands() {
        for oxygen in 92..=100 {
            for systolic in [90, 120, 140] {
                let alerts = evaluate(&make_reading(oxygen, systolic), &DEFAULT_RULES);
                assert!(alerts.is_empty(), "oxygen={oxygen} systolic={systolic}");
            }
        }
    }

    #[test]
    fn critical_oxygen_never_also_emits_warning() {
        for oxygen in [0, 50, 85, 87] {
            let alerts = evaluate(&make_reading(oxygen, 120), &DEFAULT_RULES);
            assert_eq!(alerts.len(), 1);
            assert_eq!(alerts[0].vital_type, VitalType::OxygenSaturation);
            assert_eq!(alerts[0].severity, AlertSeverity::Critical);
        }
    }

    #[test]
    fn warning_oxygen_between_88_and_92() {
        for oxygen in 88..92 {
            let alerts = evaluate(&make_reading(oxygen, 120), &DEFAULT_RULES);
            assert_eq!(alerts.len(), 1);
            assert_eq!(alerts[0].severity, AlertSeverity::Warning);
            assert_eq!(alerts[0].unit, "%");
        }
    }

    #[test]
    fn systolic_bands_are_strictly_above() {
        assert!(evaluate(&make_reading(95, 140), &DEFAULT_RULES).is_empty());

        let warning = evaluate(&make_reading(95, 141), &DEFAULT_RULES);
        assert_eq!(warning[0].severity, AlertSeverity::Warning);

        let still_warning = evaluate(&make_reading(95, 180), &DEFAULT_RULES);
        assert_eq!(still_warning[0].severity, AlertSeverity::Warning);

        let critical = evaluate(&make_reading(95, 181), &DEFAULT_RULES);
        assert_eq!(critical.len(), 1);
        assert_eq!(critical[0].severity, AlertSeverity::Critical);
        assert_eq!(critical[0].unit, "mmHg");
    }

    #[test]
    fn results_follow_declared_rule_order() {
        let alerts = evaluate(&make_reading(85, 150), &DEFAULT_RULES);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].vital_type, VitalType::OxygenSaturation);
        assert_eq!(alerts[0].severity, AlertSeverity::Critical);
        assert_eq!(alerts[0].value, 85.0);
        assert_eq!(alerts[1].vital_type, VitalType::BloodPressureSystolic);
        assert_eq!(alerts[1].severity, AlertSeverity::Warning);
        assert_eq!(alerts[1].value, 150.0);
    }

    #[test]
    fn message_names_level_direction_and_value() {
        let alerts = evaluate(&make_reading(85, 190), &DEFAULT_RULES);
        assert_eq!(alerts[0].message, "CRITICAL LOW: oxygen_saturation is 85.0 %");
        assert_eq!(
            alerts[1].message,
            "CRITICAL HIGH: blood_pressure_systolic is 190.0 mmHg"
        );
    }

    #[test]
    fn evaluation_is_deterministic() {
        let reading = make_reading(89, 185);
        assert_eq!(
            evaluate(&reading, &DEFAULT_RULES),
            evaluate(&reading, &DEFAULT_RULES)
        );
    }

    #[test]
    fn custom_rules_extend_the_table() {
        let mut rules = DEFAULT_RULES.to_vec();
        rules.push(ThresholdRule::new(
            VitalType::Heartbeat,
            Direction::HighIsBad,
            130.0,
            110.0,
        ));
        let mut reading = make_reading(97, 120);
        reading.vital_signs.heartbeat = 115;

        let alerts = evaluate(&reading, &rules);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].vital_type, VitalType::Heartbeat);
        assert_eq!(alerts[0].unit, "bpm");
    }

    #[test]
    fn empty_rule_table_yields_nothing() {
        assert!(evaluate(&make_reading(10, 250), &[]).is_empty());
    }

    #[test]
    fn default_rules_are_well_ordered() {
        for rule in &DEFAULT_RULES {
            assert!(rule.validate().is_ok());
        }
    }

    #[test]
    fn validate_rejects_inverted_bands() {
        let low = ThresholdRule::new(VitalType::OxygenSaturation, Direction::LowIsBad, 92.0, 88.0);
        assert!(low.validate().is_err());

        let high = ThresholdRule::new(
            VitalType::BloodPressureSystolic,
            Direction::HighIsBad,
            140.0,
            180.0,
        );
        assert!(high.validate().is_err());

        let nan = ThresholdRule::new(VitalType::Temperature, Direction::HighIsBad, f64::NAN, 100.0);
        assert!(nan.validate().is_err());
    }
}
