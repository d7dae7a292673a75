//! Admin page gates: role-checked, then page data fetched server-side with
//! the access token minted during the gate check. Data-fetch failures are
//! inline errors, not redirects.

use axum::{
    extract::{Query, State},
    http::Uri,
    response::{IntoResponse, Json, Response},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::json;

use super::pages::refresh_cookie;
use super::{redirect_found, GatewayState};
use crate::api::admin::{self, ListParams, SortDir};
use crate::session::{Gate, SessionUser};

const ADMIN_ROLE: &str = "admin";

async fn gate(state: &GatewayState, uri: &Uri, jar: &CookieJar) -> Result<SessionUser, Response> {
    let cookie = refresh_cookie(state, jar);
    match state
        .guard
        .require_role(uri.path(), cookie.as_deref(), ADMIN_ROLE)
        .await
    {
        Gate::Allow(session) => Ok(session),
        Gate::Redirect(location) => Err(redirect_found(&location)),
    }
}

pub async fn dashboard_page(
    State(state): State<GatewayState>,
    uri: Uri,
    jar: CookieJar,
) -> Response {
    let session = match gate(&state, &uri, &jar).await {
        Ok(session) => session,
        Err(redirect) => return redirect,
    };
    let client = match state.page_client(&session) {
        Ok(client) => client,
        Err(err) => return err.into_response(),
    };
    match admin::dashboard(&client).await.into_result() {
        Ok(stats) => Json(json!({ "user": session.user, "stats": stats })).into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersPageQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

impl UsersPageQuery {
    fn into_params(self) -> ListParams {
        ListParams {
            page: self.page,
            page_size: self.page_size,
            search: self.search,
            sort_by: self.sort_by,
            sort_dir: self.sort_dir.as_deref().and_then(|dir| match dir {
                "asc" => Some(SortDir::Asc),
                "desc" => Some(SortDir::Desc),
                _ => None,
            }),
            role: self.role,
            is_active: self.is_active,
        }
    }
}

pub async fn users_page(
    State(state): State<GatewayState>,
    uri: Uri,
    jar: CookieJar,
    Query(query): Query<UsersPageQuery>,
) -> Response {
    let session = match gate(&state, &uri, &jar).await {
        Ok(session) => session,
        Err(redirect) => return redirect,
    };
    let client = match state.page_client(&session) {
        Ok(client) => client,
        Err(err) => return err.into_response(),
    };
    match admin::list_users(&client, &query.into_params())
        .await
        .into_result()
    {
        Ok(users) => Json(json!({ "user": session.user, "users": users })).into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FilesPageQuery {
    pub dir: Option<String>,
}

pub async fn files_page(
    State(state): State<GatewayState>,
    uri: Uri,
    jar: CookieJar,
    Query(query): Query<FilesPageQuery>,
) -> Response {
    let session = match gate(&state, &uri, &jar).await {
        Ok(session) => session,
        Err(redirect) => return redirect,
    };
    let client = match state.page_client(&session) {
        Ok(client) => client,
        Err(err) => return err.into_response(),
    };
    match admin::list_files(&client, query.dir.as_deref())
        .await
        .into_result()
    {
        Ok(files) => Json(json!({ "user": session.user, "files": files })).into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SettingsPageQuery {
    pub group: Option<String>,
}

pub async fn settings_page(
    State(state): State<GatewayState>,
    uri: Uri,
    jar: CookieJar,
    Query(query): Query<SettingsPageQuery>,
) -> Response {
    let session = match gate(&state, &uri, &jar).await {
        Ok(session) => session,
        Err(redirect) => return redirect,
    };
    let client = match state.page_client(&session) {
        Ok(client) => client,
        Err(err) => return err.into_response(),
    };
    match admin::list_settings(&client, query.group.as_deref())
        .await
        .into_result()
    {
        Ok(settings) => Json(json!({ "user": session.user, "settings": settings })).into_response(),
        Err(err) => err.into_response(),
    }
}
