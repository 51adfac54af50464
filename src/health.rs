//! Body metrics shared by the profile editor, the user endpoints and the
//! scoring engine.

use serde::{Deserialize, Serialize};

/// Rendered in place of a metric whose inputs are missing.
pub const PLACEHOLDER: &str = "--";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M", alias = "m")]
    Male,
    #[serde(rename = "F", alias = "f")]
    Female,
}

impl Gender {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "M" | "m" => Some(Gender::Male),
            "F" | "f" => Some(Gender::Female),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }
}

/// Body mass index from weight in kg and height in cm.
pub fn bmi(weight_kg: f64, height_cm: f64) -> Option<f64> {
    if !usable(weight_kg) || !usable(height_cm) {
        return None;
    }
    let meters = height_cm / 100.0;
    Some(weight_kg / (meters * meters))
}

/// Basal metabolic rate in kcal/day (Harris-Benedict, revised).
pub fn bmr(weight_kg: f64, height_cm: f64, age: i32, gender: Gender) -> Option<f64> {
    if !usable(weight_kg) || !usable(height_cm) || age <= 0 {
        return None;
    }
    let age = f64::from(age);
    let value = match gender {
        Gender::Male => 88.362 + 13.397 * weight_kg + 4.799 * height_cm - 5.677 * age,
        Gender::Female => 447.593 + 9.247 * weight_kg + 3.098 * height_cm - 4.330 * age,
    };
    Some(value)
}

// Zero counts as missing, the same as an empty input.
fn usable(v: f64) -> bool {
    v.is_finite() && v != 0.0
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HealthInputs {
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
}

impl HealthInputs {
    /// Parses raw form values; blank or unparsable fields become `None`.
    pub fn from_form(weight: &str, height: &str, age: &str, gender: &str) -> Self {
        Self {
            weight: weight.trim().parse::<f64>().ok(),
            height: height.trim().parse::<f64>().ok(),
            age: age.trim().parse::<i32>().ok(),
            gender: Gender::parse(gender),
        }
    }

    pub fn bmi(&self) -> Option<f64> {
        bmi(self.weight?, self.height?)
    }

    pub fn bmr(&self) -> Option<f64> {
        bmr(self.weight?, self.height?, self.age?, self.gender?)
    }

    pub fn bmi_label(&self) -> String {
        self.bmi()
            .map(|v| format!("{v:.1}"))
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    }

    pub fn bmr_label(&self) -> String {
        self.bmr()
            .map(|v| format!("{v:.0} kcal"))
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    }
}
