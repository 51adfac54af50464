//! The view-controller. Each user action is an async method that calls the
//! backend and re-renders the affected part of the [`Page`]. Failures never
//! escape: they are logged and surfaced as a toast.

use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::client::api::Backend;
use crate::client::catalog::DishCatalog;
use crate::client::notify::Severity;
use crate::client::page::{DishForm, Modal, Page, ProfileForm, Section};
use crate::client::render;
use crate::client::session::SessionStore;
use crate::client::tags::{Preferences, TagKind};
use crate::recommendations::dto::RecommendationRequest;
use crate::users::dto::UserDto;

/// How many recommendations the page asks for.
pub const RECOMMENDATION_COUNT: usize = 6;

pub struct App<B, S> {
    backend: B,
    session: S,
    page: Page,
    current_user: Option<UserDto>,
    catalog: DishCatalog,
    prefs: Preferences,
}

impl<B: Backend, S: SessionStore> App<B, S> {
    pub fn new(backend: B, session: S) -> Self {
        Self {
            backend,
            session,
            page: Page::default(),
            current_user: None,
            catalog: DishCatalog::default(),
            prefs: Preferences::default(),
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn current_user(&self) -> Option<&UserDto> {
        self.current_user.as_ref()
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn catalog(&self) -> &DishCatalog {
        &self.catalog
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn toast(&mut self, message: &str, severity: Severity) {
        self.page.toast.show(message, severity);
    }

    /// Page load: counters and the dish cache in parallel, then the saved
    /// session if there is one.
    #[instrument(skip(self))]
    pub async fn init(&mut self) {
        let (users, dishes) =
            tokio::join!(self.backend.list_users(), self.backend.list_dishes());

        if let (Ok(u), Ok(d)) = (&users, &dishes) {
            self.page.total_users = u.len();
            self.page.total_dishes = d.len();
        }
        if let Err(e) = &users {
            error!(error = %e, "loading users failed");
        }
        match dishes {
            Ok(d) => self.set_catalog(d),
            Err(e) => {
                error!(error = %e, "loading dishes failed");
                self.toast("Failed to load dishes", Severity::Error);
            }
        }

        self.restore_session();
    }

    fn restore_session(&mut self) {
        match self.session.load() {
            Ok(Some(user)) => {
                info!(username = %user.username, "session restored");
                self.current_user = Some(user);
                self.page.show_user(self.current_user.as_ref());
                self.load_user_profile();
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "discarding unreadable session");
                self.forget_session();
            }
        }
    }

    fn persist_session(&self, user: &UserDto) {
        if let Err(e) = self.session.save(user) {
            error!(error = %e, "saving session failed");
        }
    }

    fn forget_session(&self) {
        if let Err(e) = self.session.clear() {
            error!(error = %e, "clearing session failed");
        }
    }

    pub async fn load_statistics(&mut self) {
        let (users, dishes) =
            tokio::join!(self.backend.list_users(), self.backend.list_dishes());
        match (users, dishes) {
            (Ok(u), Ok(d)) => {
                self.page.total_users = u.len();
                self.page.total_dishes = d.len();
            }
            (Err(e), _) | (_, Err(e)) => error!(error = %e, "loading statistics failed"),
        }
    }

    pub async fn load_dishes(&mut self) {
        match self.backend.list_dishes().await {
            Ok(d) => self.set_catalog(d),
            Err(e) => {
                error!(error = %e, "loading dishes failed");
                self.toast("Failed to load dishes", Severity::Error);
            }
        }
    }

    fn set_catalog(&mut self, dishes: Vec<crate::dishes::dto::DishDto>) {
        self.catalog.replace(dishes);
        self.refresh_filters();
        self.page.dishes_grid = render::dishes_grid(self.catalog.all());
    }

    fn refresh_filters(&mut self) {
        self.page.cuisine_options = render::filter_options(&self.catalog.cuisines());
        self.page.flavor_options = render::filter_options(&self.catalog.flavors());
    }

    pub fn show_section(&mut self, section: Section) {
        self.page.active_section = section;
        match section {
            Section::Dishes => {
                self.page.dishes_grid = render::dishes_grid(self.catalog.all());
            }
            Section::Recommendations => self.page.recommendations_grid.clear(),
            Section::Nutrition => self.page.nutrition_report.clear(),
            Section::Home | Section::Profile => {}
        }
    }

    pub fn filter_dishes(&mut self, cuisine: &str, flavor: &str) {
        self.page.cuisine_filter = cuisine.to_string();
        self.page.flavor_filter = flavor.to_string();
        self.page.dishes_grid = render::dishes_grid(self.catalog.filter(cuisine, flavor));
    }

    pub fn open_modal(&mut self, modal: Modal) {
        self.page.open_modal = Some(modal);
    }

    pub fn close_modal(&mut self) {
        self.page.open_modal = None;
    }

    /// Accepts the user only when the email matches the stored one.
    #[instrument(skip(self, email))]
    pub async fn login(&mut self, username: &str, email: &str) {
        match self.backend.user_by_username(username.trim()).await {
            Ok(user) if user.email == email.trim() => {
                info!(user_id = %user.id, "logged in");
                self.persist_session(&user);
                self.current_user = Some(user);
                self.page.show_user(self.current_user.as_ref());
                self.load_user_profile();
                self.close_modal();
                self.toast("Logged in", Severity::Success);
            }
            Ok(_) => {
                warn!("email does not match");
                self.toast("Username and email do not match", Severity::Error);
            }
            Err(e) if e.is_not_found() => self.toast("User not found", Severity::Error),
            Err(e) => {
                error!(error = %e, "login failed");
                self.toast("Login failed", Severity::Error);
            }
        }
    }

    pub fn show_register_form(&mut self) {
        self.close_modal();
        self.show_section(Section::Profile);
        self.toast("Fill in your profile to register", Severity::Warning);
    }

    pub fn logout(&mut self) {
        self.current_user = None;
        self.forget_session();
        self.page.show_user(None);
        self.page.profile_form.reset();
        self.page.render_health();
        self.clear_tags();
        self.toast("Logged out", Severity::Success);
    }

    pub fn load_user_profile(&mut self) {
        let Some(user) = &self.current_user else {
            return;
        };
        self.page.profile_form = ProfileForm::from_user(user);
        self.prefs = Preferences::from_user(user);
        self.page.render_tags(&self.prefs);
        self.page.render_health();
    }

    /// Mirrors typing into the profile inputs.
    pub fn set_profile_form(&mut self, form: ProfileForm) {
        self.page.profile_form = form;
        self.update_health_metrics();
    }

    pub fn update_health_metrics(&mut self) {
        self.page.render_health();
    }

    /// Creates the user when none is logged in, otherwise updates it.
    #[instrument(skip(self, form))]
    pub async fn save_profile(&mut self, form: ProfileForm) {
        let payload = form.to_payload(&self.prefs);
        self.set_profile_form(form);

        let result = match self.current_user.as_ref().map(|u| u.id) {
            Some(id) => self.backend.update_user(id, &payload).await,
            None => self.backend.create_user(&payload).await,
        };
        match result {
            Ok(user) => {
                info!(user_id = %user.id, "profile saved");
                self.persist_session(&user);
                self.current_user = Some(user);
                self.page.show_user(self.current_user.as_ref());
                self.toast("Profile saved", Severity::Success);
            }
            Err(e) => {
                error!(error = %e, "saving profile failed");
                self.toast("Save failed, check your input", Severity::Error);
            }
        }
    }

    pub fn submit_tag(&mut self, kind: TagKind, raw: &str) -> bool {
        let added = self.prefs.get_mut(kind).submit(raw);
        if added {
            self.page.render_tags(&self.prefs);
        }
        added
    }

    pub fn remove_tag(&mut self, kind: TagKind, index: usize) -> Option<String> {
        let removed = self.prefs.get_mut(kind).remove(index);
        self.page.render_tags(&self.prefs);
        removed
    }

    pub fn clear_tags(&mut self) {
        self.prefs.clear_all();
        self.page.render_tags(&self.prefs);
    }

    #[instrument(skip(self, form))]
    pub async fn add_dish(&mut self, form: DishForm) {
        let payload = form.to_payload();
        self.page.dish_form = form;

        match self.backend.create_dish(&payload).await {
            Ok(dish) => {
                info!(dish_id = %dish.id, "dish added");
                self.catalog.push(dish);
                self.refresh_filters();
                self.page.dishes_grid = render::dishes_grid(self.catalog.all());
                self.close_modal();
                self.page.dish_form.reset();
                self.toast("Dish added", Severity::Success);
                self.load_statistics().await;
            }
            Err(e) => {
                error!(error = %e, "adding dish failed");
                self.toast("Failed to add dish", Severity::Error);
            }
        }
    }

    fn logged_in_id(&mut self) -> Option<Uuid> {
        let id = self.current_user.as_ref().map(|u| u.id);
        if id.is_none() {
            self.toast("Please log in first", Severity::Warning);
        }
        id
    }

    #[instrument(skip(self))]
    pub async fn generate_recommendations(&mut self, meal_type: Option<&str>) {
        let Some(user_id) = self.logged_in_id() else {
            return;
        };
        let req = RecommendationRequest {
            user_id,
            meal_type: meal_type
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string),
            count: Some(RECOMMENDATION_COUNT),
            ..Default::default()
        };
        match self.backend.generate_recommendations(&req).await {
            Ok(recs) => {
                self.page.recommendations_grid = render::recommendations_grid(&recs);
                self.toast("Recommendations ready", Severity::Success);
            }
            Err(e) => {
                error!(error = %e, "generating recommendations failed");
                self.toast("Failed to generate recommendations", Severity::Error);
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn generate_nutrition_report(&mut self) {
        let Some(user_id) = self.logged_in_id() else {
            return;
        };
        match self.backend.quick_report(user_id).await {
            Ok(report) => {
                self.page.nutrition_report = render::nutrition_report(&report);
                self.toast("Nutrition report ready", Severity::Success);
            }
            Err(e) => {
                error!(error = %e, "generating nutrition report failed");
                self.toast("Failed to generate nutrition report", Severity::Error);
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn show_nutrition_history(&mut self) {
        let Some(user_id) = self.logged_in_id() else {
            return;
        };
        match self.backend.nutrition_history(user_id).await {
            Ok(history) => self.page.nutrition_report = render::nutrition_history(&history),
            Err(e) => {
                error!(error = %e, "loading nutrition history failed");
                self.toast("Failed to load history", Severity::Error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use reqwest::StatusCode;
    use time::macros::date;

    use super::*;
    use crate::client::catalog::sample_dish_dto;
    use crate::client::error::ClientError;
    use crate::client::page::{LoginButton, GUEST};
    use crate::client::session::{sample_user_dto, FileSessionStore, MemorySessionStore};
    use crate::dishes::dto::{DishDto, DishPayload};
    use crate::nutrition::dto::NutritionReportDto;
    use crate::recommendations::dto::RecommendationDto;
    use crate::users::dto::UserPayload;

    #[derive(Default)]
    struct FakeBackend {
        users: Mutex<Vec<UserDto>>,
        dishes: Mutex<Vec<DishDto>>,
        calls: Mutex<Vec<String>>,
        last_recommendation: Mutex<Option<RecommendationRequest>>,
        history: Vec<NutritionReportDto>,
        fail_dishes: bool,
    }

    impl FakeBackend {
        fn seeded() -> Self {
            let fake = FakeBackend::default();
            fake.users
                .lock()
                .unwrap()
                .push(sample_user_dto("alice", "alice@example.com"));
            fake.users
                .lock()
                .unwrap()
                .push(sample_user_dto("bob", "bob@example.com"));
            *fake.dishes.lock().unwrap() = vec![
                sample_dish_dto("Mapo Tofu", "Sichuan", "spicy"),
                sample_dish_dto("Kung Pao Chicken", "Sichuan", "sweet"),
                sample_dish_dto("Char Siu", "Cantonese", "sweet"),
            ];
            fake
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn user_from(id: Uuid, p: &UserPayload) -> UserDto {
        UserDto {
            id,
            username: p.username.clone().unwrap_or_default(),
            email: p.email.clone().unwrap_or_default(),
            age: p.age,
            gender: p.gender,
            weight: p.weight,
            height: p.height,
            preferred_cuisines: p.preferred_cuisines.clone().unwrap_or_default(),
            preferred_flavors: p.preferred_flavors.clone().unwrap_or_default(),
            preferred_ingredients: p.preferred_ingredients.clone().unwrap_or_default(),
            allergies: p.allergies.clone().unwrap_or_default(),
            dietary_restrictions: p.dietary_restrictions.clone().unwrap_or_default(),
            diseases: p.diseases.clone().unwrap_or_default(),
            created_at: None,
        }
    }

    fn report() -> NutritionReportDto {
        NutritionReportDto {
            id: None,
            user_id: None,
            report_date: date!(2025 - 03 - 14),
            generated_at: None,
            total_calories: 900.0,
            total_protein: 40.0,
            total_fat: 30.0,
            total_carbohydrate: 100.0,
            total_fiber: 0.0,
            total_sodium: 0.0,
            total_cholesterol: 0.0,
            recommended_calories: 2000.0,
            recommended_protein: 60.0,
            recommended_fat: 65.0,
            recommended_carbohydrate: 300.0,
            protein_percentage: 0.0,
            fat_percentage: 0.0,
            carbohydrate_percentage: 0.0,
            health_score: 62,
            health_status: "Needs improvement".into(),
            recommendations: "Eat more.".into(),
            warnings: String::new(),
            included_dishes: vec!["Mapo Tofu".into()],
        }
    }

    #[async_trait]
    impl Backend for FakeBackend {
        async fn list_users(&self) -> Result<Vec<UserDto>, ClientError> {
            self.record("GET /users".into());
            Ok(self.users.lock().unwrap().clone())
        }

        async fn list_dishes(&self) -> Result<Vec<DishDto>, ClientError> {
            self.record("GET /dishes".into());
            if self.fail_dishes {
                return Err(ClientError::Status(StatusCode::INTERNAL_SERVER_ERROR));
            }
            Ok(self.dishes.lock().unwrap().clone())
        }

        async fn user_by_username(&self, username: &str) -> Result<UserDto, ClientError> {
            self.record(format!("GET /users/username/{username}"));
            self.users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.username == username)
                .cloned()
                .ok_or(ClientError::Status(StatusCode::NOT_FOUND))
        }

        async fn create_user(&self, payload: &UserPayload) -> Result<UserDto, ClientError> {
            self.record("POST /users".into());
            let user = user_from(Uuid::new_v4(), payload);
            self.users.lock().unwrap().push(user.clone());
            Ok(user)
        }

        async fn update_user(
            &self,
            id: Uuid,
            payload: &UserPayload,
        ) -> Result<UserDto, ClientError> {
            self.record(format!("PUT /users/{id}"));
            let user = user_from(id, payload);
            let mut users = self.users.lock().unwrap();
            match users.iter_mut().find(|u| u.id == id) {
                Some(slot) => {
                    *slot = user.clone();
                    Ok(user)
                }
                None => Err(ClientError::Status(StatusCode::NOT_FOUND)),
            }
        }

        async fn create_dish(&self, payload: &DishPayload) -> Result<DishDto, ClientError> {
            self.record("POST /dishes".into());
            let name = payload.name.clone().unwrap_or_default();
            if name.is_empty() {
                return Err(ClientError::Status(StatusCode::BAD_REQUEST));
            }
            let mut dish = sample_dish_dto(
                &name,
                payload.cuisine.as_deref().unwrap_or_default(),
                payload.flavor.as_deref().unwrap_or_default(),
            );
            dish.price = payload.price;
            self.dishes.lock().unwrap().push(dish.clone());
            Ok(dish)
        }

        async fn generate_recommendations(
            &self,
            req: &RecommendationRequest,
        ) -> Result<Vec<RecommendationDto>, ClientError> {
            self.record("POST /recommendations/generate".into());
            *self.last_recommendation.lock().unwrap() = Some(req.clone());
            let recs = self
                .dishes
                .lock()
                .unwrap()
                .iter()
                .map(|d| RecommendationDto {
                    id: None,
                    dish: d.clone(),
                    score: 85.0,
                    reason: "Overall good match".into(),
                    cuisine_match: Some(0.5),
                    flavor_match: Some(0.5),
                    ingredient_match: None,
                    health_match: Some(0.5),
                    nutrition_match: None,
                    recommended_at: None,
                    is_clicked: false,
                    is_ordered: false,
                    user_rating: None,
                    user_feedback: None,
                })
                .collect();
            Ok(recs)
        }

        async fn quick_report(&self, user_id: Uuid) -> Result<NutritionReportDto, ClientError> {
            self.record(format!("POST /nutrition/quick-report/{user_id}"));
            Ok(report())
        }

        async fn nutrition_history(
            &self,
            user_id: Uuid,
        ) -> Result<Vec<NutritionReportDto>, ClientError> {
            self.record(format!("GET /nutrition/history/{user_id}"));
            Ok(self.history.clone())
        }
    }

    async fn started(fake: FakeBackend) -> App<FakeBackend, MemorySessionStore> {
        let mut app = App::new(fake, MemorySessionStore::default());
        app.init().await;
        app
    }

    fn last_toast<B: Backend, S: SessionStore>(app: &App<B, S>) -> (String, Severity) {
        let t = app.page().toast.last().expect("a toast was shown");
        (t.message.clone(), t.severity)
    }

    #[tokio::test]
    async fn init_fills_counters_filters_and_guest_state() {
        let app = started(FakeBackend::seeded()).await;
        let page = app.page();
        assert_eq!(page.total_users, 2);
        assert_eq!(page.total_dishes, 3);
        assert!(page.cuisine_options.contains(r#"value="Cantonese""#));
        assert!(page.flavor_options.contains(r#"value="spicy""#));
        assert_eq!(page.current_user_label, GUEST);
        assert_eq!(page.login_button, LoginButton::Login);
        assert!(app.current_user().is_none());
    }

    #[tokio::test]
    async fn dish_load_failure_is_a_toast_not_a_crash() {
        let fake = FakeBackend {
            fail_dishes: true,
            ..FakeBackend::seeded()
        };
        let app = started(fake).await;
        assert!(app.catalog().is_empty());
        assert_eq!(page_counts(&app), (0, 0));
        assert_eq!(last_toast(&app), ("Failed to load dishes".into(), Severity::Error));
    }

    fn page_counts<B: Backend, S: SessionStore>(app: &App<B, S>) -> (usize, usize) {
        (app.page().total_users, app.page().total_dishes)
    }

    #[tokio::test]
    async fn login_with_wrong_email_leaves_session_unset() {
        let mut app = started(FakeBackend::seeded()).await;
        app.open_modal(Modal::Login);
        app.login("alice", "mallory@example.com").await;

        assert!(app.current_user().is_none());
        assert!(app.session.load().unwrap().is_none());
        assert_eq!(app.page().open_modal, Some(Modal::Login));
        assert_eq!(
            last_toast(&app),
            ("Username and email do not match".into(), Severity::Error)
        );
    }

    #[tokio::test]
    async fn login_unknown_user_reports_not_found() {
        let mut app = started(FakeBackend::seeded()).await;
        app.login("nobody", "nobody@example.com").await;
        assert!(app.current_user().is_none());
        assert_eq!(last_toast(&app), ("User not found".into(), Severity::Error));
    }

    #[tokio::test]
    async fn login_fills_profile_and_persists() {
        let mut app = started(FakeBackend::seeded()).await;
        app.open_modal(Modal::Login);
        app.login(" alice ", "alice@example.com").await;

        let page = app.page();
        assert_eq!(page.current_user_label, "alice");
        assert_eq!(page.login_button.label(), "Logout");
        assert_eq!(page.open_modal, None);
        assert_eq!(page.profile_form.email, "alice@example.com");
        assert_eq!(page.bmi_value, "22.9");
        assert_eq!(page.bmr_value, "1507 kcal");
        assert!(page.tag_containers["cuisine-tags"].contains("Sichuan"));
        assert!(page.tag_containers["allergy-tags"].contains("peanut"));
        assert_eq!(
            app.session.load().unwrap().map(|u| u.username),
            Some("alice".into())
        );
    }

    #[tokio::test]
    async fn logout_then_reload_shows_guest() {
        let tmp = tempfile::tempdir().unwrap();

        let mut app = App::new(FakeBackend::seeded(), FileSessionStore::new(tmp.path()));
        app.init().await;
        app.login("alice", "alice@example.com").await;

        let mut reloaded =
            App::new(FakeBackend::seeded(), FileSessionStore::new(tmp.path()));
        reloaded.init().await;
        assert_eq!(reloaded.page().current_user_label, "alice");

        app.logout();
        assert!(!FileSessionStore::new(tmp.path()).path().exists());
        assert_eq!(app.page().profile_form, ProfileForm::default());
        assert!(app.preferences().get(TagKind::Cuisine).is_empty());
        assert_eq!(app.page().bmi_value, "--");

        let mut reloaded =
            App::new(FakeBackend::seeded(), FileSessionStore::new(tmp.path()));
        reloaded.init().await;
        assert!(reloaded.current_user().is_none());
        assert_eq!(reloaded.page().current_user_label, GUEST);
        assert_eq!(reloaded.page().login_button, LoginButton::Login);
    }

    #[tokio::test]
    async fn unreadable_session_falls_back_to_guest() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(tmp.path());
        std::fs::write(store.path(), "not json").unwrap();

        let mut app = App::new(FakeBackend::seeded(), store.clone());
        app.init().await;
        assert!(app.current_user().is_none());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn register_form_opens_profile_with_warning() {
        let mut app = started(FakeBackend::seeded()).await;
        app.open_modal(Modal::Login);
        app.show_register_form();
        assert_eq!(app.page().open_modal, None);
        assert_eq!(app.page().active_section, Section::Profile);
        assert_eq!(last_toast(&app).1, Severity::Warning);
    }

    #[tokio::test]
    async fn save_profile_creates_then_updates() {
        let mut app = started(FakeBackend::seeded()).await;
        app.submit_tag(TagKind::Cuisine, "Hunan");
        app.submit_tag(TagKind::Disease, "diabetes");
        let form = ProfileForm {
            username: "carol".into(),
            email: "carol@example.com".into(),
            age: "41".into(),
            gender: "F".into(),
            weight: "60".into(),
            height: "165".into(),
        };
        app.save_profile(form.clone()).await;

        let user = app.current_user().cloned().unwrap();
        assert_eq!(user.username, "carol");
        assert_eq!(user.preferred_cuisines, vec!["Hunan".to_string()]);
        assert_eq!(user.diseases, vec!["diabetes".to_string()]);
        assert_eq!(app.page().current_user_label, "carol");
        assert_eq!(app.session.load().unwrap(), Some(user.clone()));

        app.save_profile(ProfileForm {
            weight: "58".into(),
            ..form
        })
        .await;
        let calls = app.backend().calls();
        assert!(calls.contains(&"POST /users".to_string()));
        assert!(calls.contains(&format!("PUT /users/{}", user.id)));
        assert_eq!(app.current_user().and_then(|u| u.weight), Some(58.0));
        assert_eq!(last_toast(&app), ("Profile saved".into(), Severity::Success));
    }

    #[tokio::test]
    async fn tag_editing_rerenders_without_gaps() {
        let mut app = started(FakeBackend::seeded()).await;
        assert!(app.submit_tag(TagKind::Flavor, "spicy"));
        assert!(!app.submit_tag(TagKind::Flavor, " spicy "));
        assert!(app.submit_tag(TagKind::Flavor, "sour"));
        assert!(app.submit_tag(TagKind::Flavor, "sweet"));

        assert_eq!(app.remove_tag(TagKind::Flavor, 0), Some("spicy".into()));
        let html = &app.page().tag_containers["flavor-tags"];
        assert!(html.contains(r#"data-index="0""#));
        assert!(html.contains(r#"data-index="1""#));
        assert!(!html.contains(r#"data-index="2""#));
        assert!(!html.contains("spicy"));

        app.clear_tags();
        assert!(app.page().tag_containers["flavor-tags"].is_empty());
    }

    #[tokio::test]
    async fn filtering_renders_exact_subset() {
        let mut app = started(FakeBackend::seeded()).await;
        app.show_section(Section::Dishes);
        app.filter_dishes("Sichuan", "spicy");
        let grid = &app.page().dishes_grid;
        assert!(grid.contains("Mapo Tofu"));
        assert!(!grid.contains("Kung Pao"));
        assert!(!grid.contains("Char Siu"));

        app.filter_dishes("", "");
        assert_eq!(app.page().dishes_grid.matches("dish-card fade-in").count(), 3);
    }

    #[tokio::test]
    async fn adding_a_dish_updates_cache_and_stats() {
        let mut app = started(FakeBackend::seeded()).await;
        app.open_modal(Modal::AddDish);
        let form = DishForm {
            name: "Dan Dan Noodles".into(),
            cuisine: "Sichuan".into(),
            flavor: "numbing".into(),
            price: "22".into(),
            ..Default::default()
        };
        app.add_dish(form).await;

        assert_eq!(app.catalog().len(), 4);
        assert!(app.page().dishes_grid.contains("Dan Dan Noodles"));
        assert!(app.page().flavor_options.contains("numbing"));
        assert_eq!(app.page().open_modal, None);
        assert_eq!(app.page().dish_form, DishForm::default());
        assert_eq!(app.page().total_dishes, 4);
    }

    #[tokio::test]
    async fn rejected_dish_keeps_form_and_modal() {
        let mut app = started(FakeBackend::seeded()).await;
        app.open_modal(Modal::AddDish);
        let form = DishForm {
            cuisine: "Sichuan".into(),
            ..Default::default()
        };
        app.add_dish(form.clone()).await;
        assert_eq!(app.catalog().len(), 3);
        assert_eq!(app.page().open_modal, Some(Modal::AddDish));
        assert_eq!(app.page().dish_form, form);
        assert_eq!(last_toast(&app).1, Severity::Error);
    }

    #[tokio::test]
    async fn views_need_a_logged_in_user() {
        let mut app = started(FakeBackend::seeded()).await;
        let before = app.backend().calls().len();

        app.generate_recommendations(Some("lunch")).await;
        app.generate_nutrition_report().await;
        app.show_nutrition_history().await;

        assert_eq!(app.backend().calls().len(), before);
        assert_eq!(last_toast(&app), ("Please log in first".into(), Severity::Warning));
    }

    #[tokio::test]
    async fn recommendations_request_six_for_meal_type() {
        let mut app = started(FakeBackend::seeded()).await;
        app.login("alice", "alice@example.com").await;
        let user_id = app.current_user().map(|u| u.id).unwrap();

        app.generate_recommendations(Some("lunch")).await;
        let req = app.backend().last_recommendation.lock().unwrap().clone().unwrap();
        assert_eq!(req.user_id, user_id);
        assert_eq!(req.count, Some(RECOMMENDATION_COUNT));
        assert_eq!(req.meal_type.as_deref(), Some("lunch"));
        assert_eq!(
            app.page().recommendations_grid.matches("recommendation-card").count(),
            3
        );

        app.generate_recommendations(Some("")).await;
        let req = app.backend().last_recommendation.lock().unwrap().clone().unwrap();
        assert!(req.meal_type.is_none());
    }

    #[tokio::test]
    async fn nutrition_report_and_history_render() {
        let fake = FakeBackend {
            history: vec![report()],
            ..FakeBackend::seeded()
        };
        let mut app = started(fake).await;
        app.login("alice", "alice@example.com").await;

        app.generate_nutrition_report().await;
        assert!(app.page().nutrition_report.contains("score-good"));
        assert!(app.page().nutrition_report.contains("Needs improvement"));

        app.show_nutrition_history().await;
        assert!(app.page().nutrition_report.contains("2025-03-14"));

        app.show_section(Section::Nutrition);
        assert!(app.page().nutrition_report.is_empty());
    }

    #[tokio::test]
    async fn empty_history_shows_empty_state() {
        let mut app = started(FakeBackend::seeded()).await;
        app.login("bob", "bob@example.com").await;
        app.show_nutrition_history().await;
        assert_eq!(app.page().nutrition_report, render::EMPTY_HISTORY);
    }
}
