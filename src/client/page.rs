use std::collections::BTreeMap;

use crate::client::notify::Notifier;
use crate::client::render;
use crate::client::tags::{Preferences, TagKind};
use crate::dishes::dto::DishPayload;
use crate::health::{Gender, HealthInputs, PLACEHOLDER};
use crate::users::dto::{UserDto, UserPayload};

pub const GUEST: &str = "Guest";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Section {
    #[default]
    Home,
    Dishes,
    Recommendations,
    Nutrition,
    Profile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Login,
    AddDish,
}

/// What the header button does when pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoginButton {
    #[default]
    Login,
    Logout,
}

impl LoginButton {
    pub fn label(self) -> &'static str {
        match self {
            LoginButton::Login => "Login",
            LoginButton::Logout => "Logout",
        }
    }
}

fn text_or_empty<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

fn non_blank(raw: &str) -> Option<String> {
    let v = raw.trim();
    (!v.is_empty()).then(|| v.to_string())
}

fn number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Raw profile inputs, kept as typed text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub username: String,
    pub email: String,
    pub age: String,
    pub gender: String,
    pub weight: String,
    pub height: String,
}

impl ProfileForm {
    pub fn from_user(u: &UserDto) -> Self {
        Self {
            username: u.username.clone(),
            email: u.email.clone(),
            age: text_or_empty(u.age),
            gender: text_or_empty(u.gender.map(|g| g.as_str())),
            weight: text_or_empty(u.weight),
            height: text_or_empty(u.height),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn health_inputs(&self) -> HealthInputs {
        HealthInputs::from_form(&self.weight, &self.height, &self.age, &self.gender)
    }

    /// Blank or unparsable numbers become null; the preference lists are
    /// always sent.
    pub fn to_payload(&self, prefs: &Preferences) -> UserPayload {
        let mut payload = UserPayload {
            username: Some(self.username.trim().to_string()),
            email: Some(self.email.trim().to_string()),
            age: self.age.trim().parse::<i32>().ok(),
            gender: Gender::parse(&self.gender),
            weight: number(&self.weight),
            height: number(&self.height),
            ..Default::default()
        };
        prefs.apply_to(&mut payload);
        payload
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DishForm {
    pub name: String,
    pub cuisine: String,
    pub flavor: String,
    pub price: String,
    pub description: String,
    pub calories: String,
    pub protein: String,
    pub fat: String,
    pub carbohydrate: String,
}

impl DishForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn to_payload(&self) -> DishPayload {
        DishPayload {
            name: Some(self.name.trim().to_string()),
            cuisine: non_blank(&self.cuisine),
            flavor: non_blank(&self.flavor),
            price: number(&self.price),
            description: non_blank(&self.description),
            calories: number(&self.calories),
            protein: number(&self.protein),
            fat: number(&self.fat),
            carbohydrate: number(&self.carbohydrate),
            ..Default::default()
        }
    }
}

/// Everything the page shows. Fragments are pre-rendered HTML.
#[derive(Debug, Clone)]
pub struct Page {
    pub total_users: usize,
    pub total_dishes: usize,
    pub current_user_label: String,
    pub login_button: LoginButton,
    pub active_section: Section,
    pub open_modal: Option<Modal>,
    pub profile_form: ProfileForm,
    pub dish_form: DishForm,
    pub bmi_value: String,
    pub bmr_value: String,
    pub cuisine_filter: String,
    pub flavor_filter: String,
    pub cuisine_options: String,
    pub flavor_options: String,
    pub dishes_grid: String,
    pub recommendations_grid: String,
    pub nutrition_report: String,
    pub tag_containers: BTreeMap<&'static str, String>,
    pub toast: Notifier,
}

impl Default for Page {
    fn default() -> Self {
        let mut page = Self {
            total_users: 0,
            total_dishes: 0,
            current_user_label: GUEST.to_string(),
            login_button: LoginButton::Login,
            active_section: Section::Home,
            open_modal: None,
            profile_form: ProfileForm::default(),
            dish_form: DishForm::default(),
            bmi_value: PLACEHOLDER.to_string(),
            bmr_value: PLACEHOLDER.to_string(),
            cuisine_filter: String::new(),
            flavor_filter: String::new(),
            cuisine_options: render::filter_options(&[]),
            flavor_options: render::filter_options(&[]),
            dishes_grid: String::new(),
            recommendations_grid: String::new(),
            nutrition_report: String::new(),
            tag_containers: BTreeMap::new(),
            toast: Notifier::default(),
        };
        page.render_tags(&Preferences::default());
        page
    }
}

impl Page {
    pub fn show_user(&mut self, user: Option<&UserDto>) {
        match user {
            Some(u) => {
                self.current_user_label = u.username.clone();
                self.login_button = LoginButton::Logout;
            }
            None => {
                self.current_user_label = GUEST.to_string();
                self.login_button = LoginButton::Login;
            }
        }
    }

    pub fn render_tags(&mut self, prefs: &Preferences) {
        for kind in TagKind::ALL {
            if let Some(id) = kind.container_id() {
                self.tag_containers
                    .insert(id, render::tags(id, prefs.get(kind).items()));
            }
        }
    }

    pub fn render_health(&mut self) {
        let inputs = self.profile_form.health_inputs();
        self.bmi_value = inputs.bmi_label();
        self.bmr_value = inputs.bmr_label();
    }
}
