//! Self-reported lifestyle factors that refine confidence and cycle-length
//! estimates.
//!
//! The profile is a read-only snapshot. Unknown keys and unknown enum values
//! are rejected when deserializing, so a typo in an imported profile fails
//! loudly instead of silently dropping a factor.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Lifestyle factors can add at most this many confidence points.
pub const MAX_LIFESTYLE_BONUS: f64 = 15.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StressLevel {
    Low,
    #[default]
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseFrequency {
    None,
    Light,
    #[default]
    Moderate,
    Intense,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SleepQuality {
    Poor,
    Fair,
    #[default]
    Good,
    Excellent,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WorkSchedule {
    #[default]
    Regular,
    Shift,
    Irregular,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContraceptiveType {
    #[default]
    None,
    Pill,
    Iud,
    Implant,
    Patch,
    Ring,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SmokingStatus {
    #[default]
    Never,
    Former,
    Current,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DietType {
    #[default]
    Standard,
    Vegetarian,
    Vegan,
    Keto,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightChanges {
    #[default]
    Stable,
    Gaining,
    Losing,
    Fluctuating,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TravelFrequency {
    Rare,
    #[default]
    Occasional,
    Frequent,
}

/// Health conditions offered by the registration questionnaire. Both the
/// long label and the short name are accepted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum HealthCondition {
    #[serde(rename = "PCOS (Polycystic Ovary Syndrome)", alias = "PCOS")]
    Pcos,
    Endometriosis,
    #[serde(rename = "Thyroid disorder", alias = "Thyroid")]
    ThyroidDisorder,
    Diabetes,
    #[serde(rename = "Eating disorder")]
    EatingDisorder,
    #[serde(rename = "Chronic stress/anxiety")]
    ChronicStress,
    Depression,
    #[serde(rename = "Other hormonal disorder")]
    OtherHormonal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LifestyleProfile {
    #[serde(default)]
    pub age: Option<u8>,
    pub stress_level: StressLevel,
    pub exercise_frequency: ExerciseFrequency,
    pub sleep_quality: SleepQuality,
    pub work_schedule: WorkSchedule,
    pub contraceptive_type: ContraceptiveType,
    #[serde(default)]
    pub health_conditions: Vec<HealthCondition>,
    pub smoking_status: SmokingStatus,
    pub diet_type: DietType,
    pub weight_changes: WeightChanges,
    pub travel_frequency: TravelFrequency,
    #[serde(default)]
    pub medications: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl LifestyleProfile {
    pub fn validate(&self) -> Result<()> {
        if let Some(age) = self.age {
            if !(10..=65).contains(&age) {
                return Err(Error::InvalidLifestyle(format!(
                    "age {age} is outside the supported range 10-65"
                )));
            }
        }
        Ok(())
    }

    pub fn has_condition(&self, condition: HealthCondition) -> bool {
        self.health_conditions.contains(&condition)
    }

    /// Confidence points earned by factors associated with regular cycles.
    pub fn confidence_bonus(&self) -> f64 {
        let mut bonus: f64 = 0.0;

        if matches!(self.age, Some(18..=35)) {
            bonus += 3.0;
        }
        bonus += match self.stress_level {
            StressLevel::Low => 4.0,
            StressLevel::Moderate => 2.0,
            StressLevel::High => 0.0,
        };
        bonus += match self.exercise_frequency {
            ExerciseFrequency::Moderate => 3.0,
            ExerciseFrequency::Light => 2.0,
            ExerciseFrequency::None | ExerciseFrequency::Intense => 0.0,
        };
        if matches!(
            self.sleep_quality,
            SleepQuality::Good | SleepQuality::Excellent
        ) {
            bonus += 3.0;
        }
        if self.work_schedule == WorkSchedule::Regular {
            bonus += 2.0;
        }

        bonus.min(MAX_LIFESTYLE_BONUS)
    }

    /// Days added to the expected cycle length by factors known to lengthen
    /// or disrupt cycles.
    pub fn cycle_length_adjustment(&self) -> f64 {
        let mut adjustment = 0.0;

        if self.stress_level == StressLevel::High {
            adjustment += 0.5;
        }
        if self.exercise_frequency == ExerciseFrequency::Intense {
            adjustment += 0.3;
        }
        if self.sleep_quality == SleepQuality::Poor {
            adjustment += 0.3;
        }
        if matches!(
            self.work_schedule,
            WorkSchedule::Shift | WorkSchedule::Irregular
        ) {
            adjustment += 0.4;
        }
        if self.has_condition(HealthCondition::Pcos) {
            adjustment += 1.0;
        }
        if self.has_condition(HealthCondition::ThyroidDisorder) {
            adjustment += 0.5;
        }

        adjustment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_json(extra: &str) -> String {
        format!(
            r#"{{
                "stressLevel": "high",
                "exerciseFrequency": "intense",
                "sleepQuality": "poor",
                "workSchedule": "shift",
                "contraceptiveType": "pill",
                "smokingStatus": "never",
                "dietType": "vegan",
                "weightChanges": "stable",
                "travelFrequency": "rare"{extra}
            }}"#
        )
    }

    #[test]
    fn parses_questionnaire_json() {
        let json = full_json(r#", "age": 29, "healthConditions": ["PCOS (Polycystic Ovary Syndrome)", "Thyroid disorder"]"#);
        let profile: LifestyleProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(profile.age, Some(29));
        assert!(profile.has_condition(HealthCondition::Pcos));
        assert!(profile.has_condition(HealthCondition::ThyroidDisorder));
        assert_eq!(profile.contraceptive_type, ContraceptiveType::Pill);
    }

    #[test]
    fn accepts_short_condition_names() {
        let json = full_json(r#", "healthConditions": ["PCOS"]"#);
        let profile: LifestyleProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(profile.health_conditions, vec![HealthCondition::Pcos]);
    }

    #[test]
    fn rejects_unknown_keys_and_values() {
        let unknown_key = full_json(r#", "favouriteColour": "blue""#);
        assert!(serde_json::from_str::<LifestyleProfile>(&unknown_key).is_err());

        let unknown_value = full_json("").replace("\"high\"", "\"extreme\"");
        assert!(serde_json::from_str::<LifestyleProfile>(&unknown_value).is_err());
    }

    #[test]
    fn validates_age_range() {
        let mut profile = LifestyleProfile {
            age: Some(9),
            ..LifestyleProfile::default()
        };
        assert!(matches!(profile.validate(), Err(Error::InvalidLifestyle(_))));
        profile.age = Some(40);
        assert!(profile.validate().is_ok());
        profile.age = None;
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn confidence_bonus_is_capped() {
        let steady = LifestyleProfile {
            age: Some(25),
            stress_level: StressLevel::Low,
            exercise_frequency: ExerciseFrequency::Moderate,
            sleep_quality: SleepQuality::Excellent,
            work_schedule: WorkSchedule::Regular,
            ..LifestyleProfile::default()
        };
        assert_eq!(steady.confidence_bonus(), 15.0);

        let disrupted = LifestyleProfile {
            age: Some(40),
            stress_level: StressLevel::High,
            exercise_frequency: ExerciseFrequency::Intense,
            sleep_quality: SleepQuality::Poor,
            work_schedule: WorkSchedule::Irregular,
            ..LifestyleProfile::default()
        };
        assert_eq!(disrupted.confidence_bonus(), 0.0);
    }

    #[test]
    fn adjustments_accumulate() {
        let profile = LifestyleProfile {
            stress_level: StressLevel::High,
            exercise_frequency: ExerciseFrequency::Intense,
            sleep_quality: SleepQuality::Poor,
            work_schedule: WorkSchedule::Shift,
            health_conditions: vec![HealthCondition::Pcos, HealthCondition::ThyroidDisorder],
            ..LifestyleProfile::default()
        };
        assert!((profile.cycle_length_adjustment() - 3.0).abs() < 1e-9);
        assert_eq!(LifestyleProfile::default().cycle_length_adjustment(), 0.0);
    }
}
