//! Recommendation scoring.
//!
//! A dish is first screened out if it conflicts with the user's allergies,
//! dietary restrictions, diseases or the request's nutrient limits. The
//! survivors are scored on five weighted matches:
//!
//! | match      | weight |
//! |------------|--------|
//! | cuisine    | 0.25   |
//! | flavor     | 0.20   |
//! | ingredient | 0.15   |
//! | health     | 0.25   |
//! | nutrition  | 0.15   |
//!
//! and the weighted sum is scaled to 0..=100.

use std::collections::HashSet;

use crate::dishes::repo::Dish;
use crate::recommendations::dto::{default_count, RecommendationRequest};
use crate::users::repo::User;

const CUISINE_WEIGHT: f64 = 0.25;
const FLAVOR_WEIGHT: f64 = 0.20;
const INGREDIENT_WEIGHT: f64 = 0.15;
const HEALTH_WEIGHT: f64 = 0.25;
const NUTRITION_WEIGHT: f64 = 0.15;

const NEUTRAL: f64 = 0.5;

/// Light activity multiplier applied to BMR for daily energy need.
pub const ACTIVITY_FACTOR: f64 = 1.5;

pub const VEGETARIAN: &str = "vegetarian";

const MEAT_MARKERS: &[&str] = &[
    "meat", "beef", "pork", "chicken", "lamb", "mutton", "duck", "goose", "fish", "shrimp",
    "prawn", "crab", "bacon", "ham", "sausage",
];

#[derive(Debug, Clone)]
pub struct Scored {
    pub dish: Dish,
    pub score: f64,
    pub reason: String,
    pub cuisine_match: f64,
    pub flavor_match: f64,
    pub ingredient_match: f64,
    pub health_match: f64,
    pub nutrition_match: f64,
}

/// Screens, scores and ranks `dishes` for `user`, best first.
pub fn rank(user: &User, dishes: Vec<Dish>, req: &RecommendationRequest) -> Vec<Scored> {
    let mut scored: Vec<Scored> = dishes
        .into_iter()
        .filter(|d| is_candidate(d, user, req))
        .map(|d| score(user, d, req))
        .collect();
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(req.count.unwrap_or_else(default_count));
    scored
}

fn merged<'a>(profile: &'a [String], extra: &'a Option<Vec<String>>) -> HashSet<&'a str> {
    profile
        .iter()
        .chain(extra.iter().flatten())
        .map(String::as_str)
        .collect()
}

pub fn is_candidate(dish: &Dish, user: &User, req: &RecommendationRequest) -> bool {
    !has_allergen_conflict(dish, user, req)
        && !has_dietary_conflict(dish, user, req)
        && !has_health_conflict(dish, user)
        && meets_nutrient_limits(dish, req)
}

fn has_allergen_conflict(dish: &Dish, user: &User, req: &RecommendationRequest) -> bool {
    let allergies = merged(&user.allergies, &req.allergies);
    dish.allergens.iter().any(|a| allergies.contains(a.as_str()))
}

fn has_dietary_conflict(dish: &Dish, user: &User, req: &RecommendationRequest) -> bool {
    let restrictions = merged(&user.dietary_restrictions, &req.dietary_restrictions);
    let vegetarian = restrictions
        .iter()
        .any(|r| r.eq_ignore_ascii_case(VEGETARIAN));
    vegetarian && dish.ingredients.iter().any(|i| mentions_meat(i))
}

// Whole words only, so "champignon" is not "ham".
fn mentions_meat(ingredient: &str) -> bool {
    ingredient
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| {
            let singular = word.strip_suffix('s').unwrap_or(word);
            MEAT_MARKERS.contains(&word) || MEAT_MARKERS.contains(&singular)
        })
}

fn names_any(conditions: &[String], diseases: &[String]) -> bool {
    diseases
        .iter()
        .any(|d| conditions.iter().any(|c| c.eq_ignore_ascii_case(d)))
}

fn has_health_conflict(dish: &Dish, user: &User) -> bool {
    names_any(&dish.health_warnings, &user.diseases)
}

fn meets_nutrient_limits(dish: &Dish, req: &RecommendationRequest) -> bool {
    let over = |limit: Option<f64>, v: Option<f64>| matches!((limit, v), (Some(l), Some(v)) if v > l);
    let under = |limit: Option<f64>, v: Option<f64>| matches!((limit, v), (Some(l), Some(v)) if v < l);
    !over(req.max_calories, dish.calories)
        && !under(req.min_protein, dish.protein)
        && !over(req.max_fat, dish.fat)
}

fn score(user: &User, dish: Dish, req: &RecommendationRequest) -> Scored {
    let mut reasons: Vec<String> = Vec::new();

    let cuisine_match = preference_match(
        &merged(&user.preferred_cuisines, &req.preferred_cuisines),
        dish.cuisine.as_deref(),
    );
    if cuisine_match > 0.7 {
        if let Some(c) = &dish.cuisine {
            reasons.push(format!("Matches your favourite {c} cuisine"));
        }
    }

    let flavor_match = preference_match(
        &merged(&user.preferred_flavors, &req.preferred_flavors),
        dish.flavor.as_deref(),
    );
    if flavor_match > 0.7 {
        if let Some(f) = &dish.flavor {
            reasons.push(format!("{f} flavor suits your taste"));
        }
    }

    let ingredient_match = ingredient_match(
        &merged(&user.preferred_ingredients, &req.preferred_ingredients),
        &dish.ingredients,
    );

    let health_match = health_match(user, &dish);
    if health_match > 0.8 {
        reasons.push("Good for your health".to_string());
    }

    let nutrition_match = nutrition_match(user.bmr(), dish.calories);

    let total = cuisine_match * CUISINE_WEIGHT
        + flavor_match * FLAVOR_WEIGHT
        + ingredient_match * INGREDIENT_WEIGHT
        + health_match * HEALTH_WEIGHT
        + nutrition_match * NUTRITION_WEIGHT;

    let reason = if reasons.is_empty() {
        "Overall good match".to_string()
    } else {
        reasons.join("; ")
    };

    Scored {
        dish,
        score: total * 100.0,
        reason,
        cuisine_match,
        flavor_match,
        ingredient_match,
        health_match,
        nutrition_match,
    }
}

fn preference_match(preferred: &HashSet<&str>, value: Option<&str>) -> f64 {
    if preferred.is_empty() {
        return NEUTRAL;
    }
    match value {
        Some(v) if preferred.contains(v) => 1.0,
        _ => 0.3,
    }
}

fn ingredient_match(preferred: &HashSet<&str>, ingredients: &[String]) -> f64 {
    if preferred.is_empty() || ingredients.is_empty() {
        return NEUTRAL;
    }
    let hits = ingredients
        .iter()
        .map(|i| preferred.iter().filter(|p| i.contains(**p)).count())
        .sum::<usize>();
    (hits as f64 / preferred.len() as f64).min(1.0)
}

fn health_match(user: &User, dish: &Dish) -> f64 {
    let mut score = NEUTRAL;

    if names_any(&dish.health_benefits, &user.diseases) {
        score += 0.3;
    }

    if let (Some(bmi), Some(calories)) = (user.bmi(), dish.calories) {
        let overweight_light = bmi > 25.0 && calories < 150.0;
        let underweight_rich = bmi < 18.5 && calories > 200.0;
        if overweight_light || underweight_rich {
            score += 0.2;
        }
    }

    score.min(1.0)
}

/// Compares the dish to a third of the user's daily energy need.
fn nutrition_match(bmr: Option<f64>, calories: Option<f64>) -> f64 {
    let (Some(bmr), Some(calories)) = (bmr, calories) else {
        return NEUTRAL;
    };
    let meal_target = bmr * ACTIVITY_FACTOR / 3.0;
    let ratio = calories / meal_target;
    if (0.8..=1.2).contains(&ratio) {
        1.0
    } else if (0.6..=1.5).contains(&ratio) {
        0.7
    } else {
        0.3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dishes::repo::sample_dish;
    use crate::users::repo::sample_user;
    use uuid::Uuid;

    fn request(count: usize) -> RecommendationRequest {
        RecommendationRequest {
            user_id: Uuid::new_v4(),
            count: Some(count),
            ..Default::default()
        }
    }

    #[test]
    fn allergens_from_profile_and_request_both_exclude() {
        let mut user = sample_user();
        user.allergies = vec!["peanut".into()];
        let mut peanut = sample_dish("Kung Pao Chicken", "Sichuan", "spicy");
        peanut.allergens = vec!["peanut".into()];
        let mut shrimp = sample_dish("Har Gow", "Cantonese", "light");
        shrimp.allergens = vec!["shellfish".into()];
        let plain = sample_dish("Steamed Rice", "Cantonese", "light");

        let mut req = request(10);
        req.allergies = Some(vec!["shellfish".into()]);
        let ranked = rank(&user, vec![peanut, shrimp, plain], &req);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].dish.name, "Steamed Rice");
    }

    #[test]
    fn vegetarian_excludes_meat_ingredients() {
        let mut user = sample_user();
        user.dietary_restrictions = vec!["Vegetarian".into()];
        let mut pork = sample_dish("Twice Cooked Pork", "Sichuan", "spicy");
        pork.ingredients = vec!["Pork belly".into(), "leek".into()];
        let mut tofu = sample_dish("Mapo Tofu", "Sichuan", "spicy");
        tofu.ingredients = vec!["tofu".into(), "chili".into()];

        let ranked = rank(&user, vec![pork, tofu], &request(10));
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].dish.name, "Mapo Tofu");
    }

    #[test]
    fn vegetarian_keeps_ingredients_that_only_contain_a_meat_word() {
        let mut user = sample_user();
        user.dietary_restrictions = vec!["vegetarian".into()];
        let mut mushrooms = sample_dish("Braised Mushrooms", "Cantonese", "savory");
        mushrooms.ingredients = vec!["champignon".into(), "shallot".into()];
        let mut crackers = sample_dish("Graham Crackers", "Western", "sweet");
        crackers.ingredients = vec!["graham flour".into(), "meatless crumble".into()];
        let mut prawns = sample_dish("Garlic Prawns", "Cantonese", "savory");
        prawns.ingredients = vec!["tiger prawns".into(), "garlic".into()];

        let ranked = rank(&user, vec![mushrooms, crackers, prawns], &request(10));
        let names: Vec<_> = ranked.iter().map(|s| s.dish.name.as_str()).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"Braised Mushrooms"));
        assert!(names.contains(&"Graham Crackers"));
    }

    #[test]
    fn disease_names_match_regardless_of_case() {
        let mut user = sample_user();
        user.diseases = vec!["Diabetes".into()];
        let mut sweet = sample_dish("Candied Yam", "Cantonese", "sweet");
        sweet.health_warnings = vec!["diabetes".into()];
        assert!(!is_candidate(&sweet, &user, &request(1)));

        let mut melon = sample_dish("Bitter Melon", "Cantonese", "bitter");
        melon.health_benefits = vec!["DIABETES".into()];
        assert!((health_match(&user, &melon) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn health_warning_and_nutrient_limits_exclude() {
        let mut user = sample_user();
        user.diseases = vec!["hypertension".into()];
        let mut salty = sample_dish("Salted Fish", "Cantonese", "salty");
        salty.health_warnings = vec!["hypertension".into()];
        let mut heavy = sample_dish("Dongpo Pork", "Zhejiang", "sweet");
        heavy.calories = Some(900.0);
        let light = sample_dish("Cucumber Salad", "Sichuan", "sour");

        let mut req = request(10);
        req.max_calories = Some(500.0);
        let ranked = rank(&user, vec![salty, heavy, light], &req);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].dish.name, "Cucumber Salad");
    }

    #[test]
    fn neutral_profile_scores_every_match_at_half_or_better() {
        let mut user = sample_user();
        user.age = None;
        let dish = sample_dish("Fried Rice", "Cantonese", "savory");
        let s = score(&user, dish, &request(1));
        assert_eq!(s.cuisine_match, 0.5);
        assert_eq!(s.flavor_match, 0.5);
        assert_eq!(s.ingredient_match, 0.5);
        assert_eq!(s.health_match, 0.5);
        assert_eq!(s.nutrition_match, 0.5);
        assert!((s.score - 50.0).abs() < 1e-9);
        assert_eq!(s.reason, "Overall good match");
    }

    #[test]
    fn preferences_raise_score_and_fill_reason() {
        let mut user = sample_user();
        user.preferred_cuisines = vec!["Sichuan".into()];
        user.preferred_flavors = vec!["spicy".into()];
        let liked = sample_dish("Mapo Tofu", "Sichuan", "spicy");
        let other = sample_dish("Sweet and Sour Pork", "Cantonese", "sweet");

        let ranked = rank(&user, vec![other, liked], &request(2));
        assert_eq!(ranked[0].dish.name, "Mapo Tofu");
        assert_eq!(ranked[0].cuisine_match, 1.0);
        assert_eq!(ranked[1].cuisine_match, 0.3);
        assert!(ranked[0].reason.contains("Sichuan"));
        assert!(ranked[0].reason.contains("spicy"));
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn ingredient_match_counts_substring_hits_and_caps() {
        let preferred: HashSet<&str> = ["tofu", "chili"].into_iter().collect();
        let one = ingredient_match(&preferred, &["silken tofu".to_string(), "rice".into()]);
        assert_eq!(one, 0.5);
        let all = ingredient_match(
            &preferred,
            &["tofu".to_string(), "chili oil".into(), "dried chili".into()],
        );
        assert_eq!(all, 1.0);
    }

    #[test]
    fn health_match_rewards_benefits_and_bmi_fit() {
        let mut user = sample_user();
        user.weight = Some(95.0);
        user.diseases = vec!["diabetes".into()];
        let mut dish = sample_dish("Bitter Melon", "Cantonese", "bitter");
        dish.calories = Some(90.0);
        dish.health_benefits = vec!["diabetes".into()];
        assert_eq!(health_match(&user, &dish), 1.0);

        dish.calories = Some(400.0);
        assert!((health_match(&user, &dish) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn nutrition_match_bands() {
        let bmr = 1600.0;
        let target = bmr * ACTIVITY_FACTOR / 3.0;
        assert_eq!(nutrition_match(Some(bmr), Some(target)), 1.0);
        assert_eq!(nutrition_match(Some(bmr), Some(target * 1.4)), 0.7);
        assert_eq!(nutrition_match(Some(bmr), Some(target * 2.0)), 0.3);
        assert_eq!(nutrition_match(None, Some(target)), 0.5);
    }

    #[test]
    fn rank_truncates_to_count() {
        let user = sample_user();
        let dishes = (0..8)
            .map(|i| sample_dish(&format!("Dish {i}"), "Hunan", "spicy"))
            .collect();
        assert_eq!(rank(&user, dishes, &request(6)).len(), 6);
    }
}
