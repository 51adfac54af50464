use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::client::error::ClientError;
use crate::dishes::dto::{DishDto, DishPayload};
use crate::nutrition::dto::NutritionReportDto;
use crate::recommendations::dto::{RecommendationDto, RecommendationRequest};
use crate::users::dto::{UserDto, UserPayload};

/// Every endpoint the client consumes.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_users(&self) -> Result<Vec<UserDto>, ClientError>;
    async fn list_dishes(&self) -> Result<Vec<DishDto>, ClientError>;
    async fn user_by_username(&self, username: &str) -> Result<UserDto, ClientError>;
    async fn create_user(&self, payload: &UserPayload) -> Result<UserDto, ClientError>;
    async fn update_user(&self, id: Uuid, payload: &UserPayload) -> Result<UserDto, ClientError>;
    async fn create_dish(&self, payload: &DishPayload) -> Result<DishDto, ClientError>;
    async fn generate_recommendations(
        &self,
        req: &RecommendationRequest,
    ) -> Result<Vec<RecommendationDto>, ClientError>;
    async fn quick_report(&self, user_id: Uuid) -> Result<NutritionReportDto, ClientError>;
    async fn nutrition_history(&self, user_id: Uuid)
        -> Result<Vec<NutritionReportDto>, ClientError>;
}

#[derive(Clone)]
pub struct HttpBackend {
    http: Client,
    base: String,
}

impl HttpBackend {
    pub fn new(api_url: &str) -> Self {
        Self {
            http: Client::new(),
            base: format!("{}/api", api_url.trim_end_matches('/')),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.url(path);
        debug!(%url, "GET");
        decode(self.http.get(url).send().await?).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ClientError> {
        let url = self.url(path);
        debug!(%url, "POST");
        let mut req = self.http.post(url);
        if let Some(body) = body {
            req = req.json(body);
        }
        decode(req.send().await?).await
    }

    async fn put<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = self.url(path);
        debug!(%url, "PUT");
        decode(self.http.put(url).json(body).send().await?).await
    }
}

async fn decode<T: DeserializeOwned>(res: reqwest::Response) -> Result<T, ClientError> {
    let status = res.status();
    if !status.is_success() {
        return Err(ClientError::Status(status));
    }
    let body = res.text().await?;
    Ok(serde_json::from_str(&body)?)
}

fn username_path(username: &str) -> String {
    format!("/users/username/{}", urlencoding::encode(username))
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_users(&self) -> Result<Vec<UserDto>, ClientError> {
        self.get("/users").await
    }

    async fn list_dishes(&self) -> Result<Vec<DishDto>, ClientError> {
        self.get("/dishes").await
    }

    async fn user_by_username(&self, username: &str) -> Result<UserDto, ClientError> {
        self.get(&username_path(username)).await
    }

    async fn create_user(&self, payload: &UserPayload) -> Result<UserDto, ClientError> {
        self.post("/users", Some(payload)).await
    }

    async fn update_user(&self, id: Uuid, payload: &UserPayload) -> Result<UserDto, ClientError> {
        self.put(&format!("/users/{id}"), payload).await
    }

    async fn create_dish(&self, payload: &DishPayload) -> Result<DishDto, ClientError> {
        self.post("/dishes", Some(payload)).await
    }

    async fn generate_recommendations(
        &self,
        req: &RecommendationRequest,
    ) -> Result<Vec<RecommendationDto>, ClientError> {
        self.post("/recommendations/generate", Some(req)).await
    }

    async fn quick_report(&self, user_id: Uuid) -> Result<NutritionReportDto, ClientError> {
        self.post::<(), _>(&format!("/nutrition/quick-report/{user_id}"), None)
            .await
    }

    async fn nutrition_history(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<NutritionReportDto>, ClientError> {
        self.get(&format!("/nutrition/history/{user_id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_path_is_api_under_configured_url() {
        let b = HttpBackend::new("http://localhost:8080/");
        assert_eq!(b.url("/dishes"), "http://localhost:8080/api/dishes");
    }

    #[test]
    fn usernames_are_percent_encoded() {
        assert_eq!(username_path("li lei"), "/users/username/li%20lei");
        assert_eq!(username_path("a/b"), "/users/username/a%2Fb");
    }
}
