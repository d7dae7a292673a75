//! Thin parameterized wrappers over the backend admin endpoints.

use serde::{Deserialize, Serialize};
use serde_json::json;
use url::form_urlencoded;

use crate::api::client::ApiClient;
use crate::api::envelope::ResponseEnvelope;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    pub role: String,
    pub is_active: bool,
    #[serde(default)]
    pub last_login_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: i64,
    pub active_users: i64,
    pub admin_users: i64,
    pub new_users_today: i64,
    pub new_users_this_week: i64,
    pub new_users_this_month: i64,
    #[serde(default)]
    pub recent_users: Vec<RecentUser>,
    #[serde(default)]
    pub recent_activity: Vec<ActivityEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResult<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub name: String,
    pub path: String,
    pub size: i64,
    pub is_dir: bool,
    pub mod_time: String,
    pub extension: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesResult {
    pub files: Vec<FileInfo>,
    pub total: i64,
    pub total_size: i64,
    pub current_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSetting {
    pub id: String,
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    pub group: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    fn as_str(self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }
}

/// Query parameters for the user list endpoint.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<SortDir>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

impl ListParams {
    fn query(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(page) = self.page {
            query.append_pair("page", &page.to_string());
        }
        if let Some(page_size) = self.page_size {
            query.append_pair("pageSize", &page_size.to_string());
        }
        if let Some(search) = self.search.as_deref() {
            query.append_pair("search", search);
        }
        if let Some(sort_by) = self.sort_by.as_deref() {
            query.append_pair("sortBy", sort_by);
        }
        if let Some(sort_dir) = self.sort_dir {
            query.append_pair("sortDir", sort_dir.as_str());
        }
        if let Some(role) = self.role.as_deref() {
            query.append_pair("role", role);
        }
        if let Some(is_active) = self.is_active {
            query.append_pair("isActive", &is_active.to_string());
        }
        let query = query.finish();
        if query.is_empty() {
            String::new()
        } else {
            format!("?{query}")
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

pub async fn dashboard(client: &ApiClient) -> ResponseEnvelope<DashboardStats> {
    client.get("/admin/dashboard").await
}

pub async fn list_users(
    client: &ApiClient,
    params: &ListParams,
) -> ResponseEnvelope<ListResult<AdminUser>> {
    client.get(&format!("/admin/users{}", params.query())).await
}

pub async fn get_user(client: &ApiClient, id: &str) -> ResponseEnvelope<AdminUser> {
    client.get(&format!("/admin/users/{id}")).await
}

pub async fn create_user(
    client: &ApiClient,
    input: &CreateUserInput,
) -> ResponseEnvelope<AdminUser> {
    client.post("/admin/users", Some(json!(input))).await
}

pub async fn update_user(
    client: &ApiClient,
    id: &str,
    input: &UpdateUserInput,
) -> ResponseEnvelope<AdminUser> {
    client
        .put(&format!("/admin/users/{id}"), Some(json!(input)))
        .await
}

pub async fn delete_user(client: &ApiClient, id: &str) -> ResponseEnvelope<Message> {
    client.delete(&format!("/admin/users/{id}")).await
}

pub async fn list_files(client: &ApiClient, dir: Option<&str>) -> ResponseEnvelope<FilesResult> {
    let path = match dir {
        Some(dir) => format!("/admin/files?dir={}", urlencoding::encode(dir)),
        None => "/admin/files".to_string(),
    };
    client.get(&path).await
}

pub async fn delete_file(client: &ApiClient, path: &str) -> ResponseEnvelope<Message> {
    client
        .delete(&format!("/admin/files/{}", urlencoding::encode(path)))
        .await
}

pub async fn list_settings(
    client: &ApiClient,
    group: Option<&str>,
) -> ResponseEnvelope<Vec<AppSetting>> {
    let path = match group {
        Some(group) => format!("/admin/settings?group={}", urlencoding::encode(group)),
        None => "/admin/settings".to_string(),
    };
    client.get(&path).await
}

pub async fn get_setting(client: &ApiClient, key: &str) -> ResponseEnvelope<AppSetting> {
    client.get(&format!("/admin/settings/{key}")).await
}

pub async fn update_setting(
    client: &ApiClient,
    key: &str,
    value: &str,
) -> ResponseEnvelope<AppSetting> {
    client
        .put(
            &format!("/admin/settings/{key}"),
            Some(json!({ "value": value })),
        )
        .await
}

pub async fn update_settings(
    client: &ApiClient,
    settings: &[(String, String)],
) -> ResponseEnvelope<Vec<AppSetting>> {
    let entries: Vec<_> = settings
        .iter()
        .map(|(key, value)| json!({ "key": key, "value": value }))
        .collect();
    client
        .put("/admin/settings", Some(json!({ "settings": entries })))
        .await
}
