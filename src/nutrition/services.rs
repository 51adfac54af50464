//! Daily nutrition analysis for a set of dishes.
//!
//! Targets come from the user's BMR at a light activity level, split
//! 15/30/55 across protein, fat and carbohydrate. Without a BMR the fixed
//! 2000 kcal profile applies.

use crate::dishes::repo::Dish;
use crate::recommendations::services::ACTIVITY_FACTOR;
use crate::users::repo::User;

const DEFAULT_CALORIES: f64 = 2000.0;
const DEFAULT_PROTEIN: f64 = 60.0;
const DEFAULT_FAT: f64 = 65.0;
const DEFAULT_CARBOHYDRATE: f64 = 300.0;

const SODIUM_LIMIT_MG: f64 = 2300.0;
const HYPERTENSION_SODIUM_LIMIT_MG: f64 = 1500.0;
const MIN_BALANCE: f64 = 70.0;

pub const HEALTHY: &str = "Healthy";
pub const NEEDS_IMPROVEMENT: &str = "Needs improvement";
pub const UNHEALTHY: &str = "Unhealthy";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Condition {
    Diabetes,
    Hypertension,
    Hyperlipidemia,
}

impl Condition {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "diabetes" => Some(Self::Diabetes),
            "hypertension" => Some(Self::Hypertension),
            "hyperlipidemia" => Some(Self::Hyperlipidemia),
            _ => None,
        }
    }

    fn advice(self) -> &'static str {
        match self {
            Self::Diabetes => "Diabetes: limit carbohydrates, prefer low-GI foods and eat at regular times.",
            Self::Hypertension => "Hypertension: keep sodium low, eat potassium-rich foods and manage your weight.",
            Self::Hyperlipidemia => "Hyperlipidemia: cut saturated fat, add omega-3 sources and eat more oats.",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Nutrients {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbohydrate: f64,
    pub fiber: f64,
    pub sodium: f64,
    pub cholesterol: f64,
}

impl Nutrients {
    pub fn sum(dishes: &[Dish]) -> Self {
        dishes.iter().fold(Self::default(), |acc, d| Self {
            calories: acc.calories + d.calories.unwrap_or(0.0),
            protein: acc.protein + d.protein.unwrap_or(0.0),
            fat: acc.fat + d.fat.unwrap_or(0.0),
            carbohydrate: acc.carbohydrate + d.carbohydrate.unwrap_or(0.0),
            fiber: acc.fiber + d.fiber.unwrap_or(0.0),
            sodium: acc.sodium + d.sodium.unwrap_or(0.0),
            cholesterol: acc.cholesterol + d.cholesterol.unwrap_or(0.0),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Targets {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbohydrate: f64,
}

impl Targets {
    pub fn for_bmr(bmr: Option<f64>) -> Self {
        match bmr {
            Some(bmr) => {
                let daily = bmr * ACTIVITY_FACTOR;
                Self {
                    calories: daily,
                    protein: daily * 0.15 / 4.0,
                    fat: daily * 0.30 / 9.0,
                    carbohydrate: daily * 0.55 / 4.0,
                }
            }
            None => Self {
                calories: DEFAULT_CALORIES,
                protein: DEFAULT_PROTEIN,
                fat: DEFAULT_FAT,
                carbohydrate: DEFAULT_CARBOHYDRATE,
            },
        }
    }
}

/// Share of energy from each macronutrient, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MacroSplit {
    pub protein: f64,
    pub fat: f64,
    pub carbohydrate: f64,
}

impl MacroSplit {
    pub fn of(totals: &Nutrients) -> Self {
        if totals.calories <= 0.0 {
            return Self::default();
        }
        Self {
            protein: totals.protein * 4.0 / totals.calories * 100.0,
            fat: totals.fat * 9.0 / totals.calories * 100.0,
            carbohydrate: totals.carbohydrate * 4.0 / totals.calories * 100.0,
        }
    }

    /// 100 for a 22.5/27.5/55 split, minus one point per percent off.
    pub fn balance(&self) -> f64 {
        let off = (self.protein - 22.5).abs()
            + (self.fat - 27.5).abs()
            + (self.carbohydrate - 55.0).abs();
        (100.0 - off).max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub totals: Nutrients,
    pub targets: Targets,
    pub split: MacroSplit,
    pub health_score: i32,
    pub health_status: &'static str,
    pub warnings: String,
    pub recommendations: String,
    pub included_dishes: Vec<String>,
}

pub fn status_for(score: i32) -> &'static str {
    if score >= 80 {
        HEALTHY
    } else if score >= 60 {
        NEEDS_IMPROVEMENT
    } else {
        UNHEALTHY
    }
}

pub fn analyze(user: &User, dishes: &[Dish]) -> Analysis {
    let totals = Nutrients::sum(dishes);
    let targets = Targets::for_bmr(user.bmr());
    let split = MacroSplit::of(&totals);
    let balance = split.balance();
    let conditions: Vec<Condition> = user
        .diseases
        .iter()
        .filter_map(|d| Condition::parse(d))
        .collect();

    let calories_exceeded = totals.calories > targets.calories * 1.1;
    let calories_low = totals.calories < targets.calories * 0.8;
    let protein_low = totals.protein < targets.protein * 0.9;
    let sodium_high = totals.sodium > SODIUM_LIMIT_MG;
    let unbalanced = balance < MIN_BALANCE;

    let mut score = 100;
    let mut warnings = Vec::new();
    if calories_exceeded {
        score -= 20;
        warnings.push("Calorie intake is above target; cut back on high-calorie foods.");
    }
    if protein_low {
        score -= 15;
        warnings.push("Protein intake is too low; add protein-rich foods.");
    }
    if sodium_high {
        score -= 15;
        warnings.push("Sodium intake is too high; reduce salt.");
    }
    if unbalanced {
        score -= 10;
        warnings.push("Macronutrient balance is off; adjust the mix of foods.");
    }
    for c in &conditions {
        match c {
            Condition::Diabetes if totals.carbohydrate > targets.carbohydrate * 1.2 => {
                score -= 25;
                warnings.push("Carbohydrate intake is too high for blood sugar control.");
            }
            Condition::Hypertension if totals.sodium > HYPERTENSION_SODIUM_LIMIT_MG => {
                score -= 25;
                warnings.push("Sodium intake is too high for blood pressure control.");
            }
            _ => {}
        }
    }
    let health_score = score.max(0);

    let mut advice = Vec::new();
    if calories_exceeded {
        advice.push("Choose low-calorie, high-fiber foods, control portions and exercise more.");
    } else if calories_low {
        advice.push("Eat a little more, favour nutrient-dense foods and have smaller, frequent meals.");
    }
    if protein_low {
        advice.push("Protein: add lean meat, fish or beans and include protein in every meal.");
    }
    if unbalanced {
        advice.push("Balance: combine the three macronutrients, vary your diet and eat fewer processed foods.");
    }
    advice.extend(conditions.iter().map(|c| c.advice()));
    if advice.is_empty() {
        advice.push("Your intake is well balanced. Keep up the good habits.");
    }

    Analysis {
        totals,
        targets,
        split,
        health_score,
        health_status: status_for(health_score),
        warnings: warnings.join(" "),
        recommendations: advice.join(" "),
        included_dishes: dishes.iter().map(|d| d.name.clone()).collect(),
    }
}
