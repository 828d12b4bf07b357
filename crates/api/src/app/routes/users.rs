use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use userdir_auth::{Action, Role, authorize};
use userdir_core::AccountId;
use userdir_directory::{
    AccountPatch, DEFAULT_PAGE_SIZE, NewAccount, Profile, QuerySpec, SortDirection, SortField,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::CallerContext;

/// Routes that need no claims.
pub fn public_router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Routes behind the bearer-token middleware.
pub fn protected_router() -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/me", get(me))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterRequest>,
) -> axum::response::Response {
    let account = match services.directory.register(body.into_registration()) {
        Ok(a) => a,
        Err(e) => return errors::directory_error_to_response(e),
    };

    let issued = match services
        .tokens
        .issue(account.id, &account.username, account.role)
    {
        Ok(t) => t,
        Err(e) => return errors::token_error_to_response(e),
    };

    (
        StatusCode::CREATED,
        Json(json!({
            "token": issued.token,
            "username": account.username,
            "birthdate": account.birthdate,
        })),
    )
        .into_response()
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    let account = match services.directory.authenticate(&body.username, &body.password) {
        Ok(a) => a,
        Err(e) => return errors::directory_error_to_response(e),
    };

    let issued = match services
        .tokens
        .issue(account.id, &account.username, account.role)
    {
        Ok(t) => t,
        Err(e) => return errors::token_error_to_response(e),
    };

    (
        StatusCode::OK,
        Json(json!({
            "token": issued.token,
            "username": account.username,
        })),
    )
        .into_response()
}

pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
) -> axum::response::Response {
    let action = Action::ReadSelf(caller.account_id());
    if let Err(e) = authorize(Some(caller.claims()), &action) {
        return errors::policy_error_to_response(e);
    }

    match services.directory.find_by_id(caller.account_id()) {
        Ok(account) => (StatusCode::OK, Json(dto::account_to_json(&account))).into_response(),
        Err(e) => errors::directory_error_to_response(e),
    }
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Query(params): Query<dto::ListParams>,
) -> axum::response::Response {
    if let Err(e) = authorize(Some(caller.claims()), &Action::ListUsers) {
        return errors::policy_error_to_response(e);
    }

    let spec = match query_spec_from_params(params) {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    let page = match services.directory.list(&spec) {
        Ok(p) => p,
        Err(e) => return errors::directory_error_to_response(e),
    };

    let rows: Vec<_> = page.items.iter().map(dto::account_to_json).collect();
    (
        StatusCode::OK,
        Json(json!({
            "count": page.total_count,
            "rows": rows,
        })),
    )
        .into_response()
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: AccountId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::directory_error_to_response(e),
    };

    let action = if id == caller.account_id() {
        Action::ReadSelf(id)
    } else {
        Action::ReadAny(id)
    };
    if let Err(e) = authorize(Some(caller.claims()), &action) {
        return errors::policy_error_to_response(e);
    }

    match services.directory.find_by_id(id) {
        Ok(account) => (StatusCode::OK, Json(dto::account_to_json(&account))).into_response(),
        Err(e) => errors::directory_error_to_response(e),
    }
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Json(body): Json<dto::CreateUserRequest>,
) -> axum::response::Response {
    if let Err(e) = authorize(Some(caller.claims()), &Action::CreateUser) {
        return errors::policy_error_to_response(e);
    }

    let role = match parse_role(body.role.as_deref()) {
        Ok(r) => r.unwrap_or_default(),
        Err(resp) => return resp,
    };

    let new = NewAccount {
        username: body.username,
        password: body.password,
        email: body.email,
        profile: Profile {
            first_name: body.first_name,
            last_name: body.last_name,
            gender: body.gender,
            birthdate: body.birthdate,
        },
        role,
    };

    match services.directory.create(new) {
        Ok(account) => {
            (StatusCode::CREATED, Json(dto::account_to_json(&account))).into_response()
        }
        Err(e) => errors::directory_error_to_response(e),
    }
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateUserRequest>,
) -> axum::response::Response {
    let id: AccountId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::directory_error_to_response(e),
    };

    let role = match parse_role(body.role.as_deref()) {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    let action = Action::UpdateUser {
        target: id,
        sets_role: role.is_some(),
    };
    if let Err(e) = authorize(Some(caller.claims()), &action) {
        return errors::policy_error_to_response(e);
    }

    let patch = AccountPatch {
        username: body.username,
        password: body.password,
        email: body.email,
        first_name: body.first_name,
        last_name: body.last_name,
        gender: body.gender,
        birthdate: body.birthdate,
        role,
    };

    match services.directory.update(id, patch) {
        Ok(account) => (StatusCode::OK, Json(dto::account_to_json(&account))).into_response(),
        Err(e) => errors::directory_error_to_response(e),
    }
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: AccountId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::directory_error_to_response(e),
    };

    if let Err(e) = authorize(Some(caller.claims()), &Action::DeleteUser(id)) {
        return errors::policy_error_to_response(e);
    }

    match services.directory.delete(id) {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(e) => errors::directory_error_to_response(e),
    }
}

fn parse_role(role: Option<&str>) -> Result<Option<Role>, axum::response::Response> {
    role.map(str::parse::<Role>)
        .transpose()
        .map_err(errors::directory_error_to_response)
}

fn query_spec_from_params(
    params: dto::ListParams,
) -> Result<QuerySpec, axum::response::Response> {
    let sort_field = match params.sort_by.as_deref() {
        Some(s) => s
            .parse::<SortField>()
            .map_err(errors::directory_error_to_response)?,
        None => SortField::default(),
    };

    let direction = match params.order.as_deref() {
        Some(s) => s
            .parse::<SortDirection>()
            .map_err(errors::directory_error_to_response)?,
        None => SortDirection::default(),
    };

    let role = parse_role(params.role.as_deref())?;

    Ok(QuerySpec {
        page: params.page.unwrap_or(1),
        page_size: params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 100),
        sort_field,
        direction,
        search: params.search,
        gender: params.gender,
        role,
    })
}
