//! User CRUD handlers.
//!
//! ```text
//! POST   /user/      {"name":"mario","surname":"rossi"}
//! GET    /user/
//! GET    /user/{id}
//! PATCH  /user/{id}  {"surname":"bianchi"}
//! DELETE /user/{id}
//! DELETE /user/
//! ```
//!
//! Handlers parse path and body input into domain values, call the driving
//! ports held in [`HttpState`] and serialise the result. The collection
//! routes answer with and without the trailing slash.

use actix_web::{HttpResponse, delete, get, patch, web};
use serde::Deserialize;

use crate::domain::{Error, NewUser, User, UserPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::{json_config, rejected_body};
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_optional_name, parse_required_name, parse_user_id,
};

const ID_FIELD: FieldName = FieldName::new("id");
const NAME_FIELD: FieldName = FieldName::new("name");
const SURNAME_FIELD: FieldName = FieldName::new("surname");

/// Request body for `POST /user/`.
///
/// Both fields are required; they are optional here so a missing field is
/// reported as `missing_field` rather than a generic body error.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    #[schema(example = "mario")]
    pub name: Option<String>,
    #[schema(example = "rossi")]
    pub surname: Option<String>,
}

impl TryFrom<CreateUserRequest> for NewUser {
    type Error = Error;

    fn try_from(value: CreateUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: parse_required_name(value.name, NAME_FIELD)?,
            surname: parse_required_name(value.surname, SURNAME_FIELD)?,
        })
    }
}

/// Request body for `PATCH /user/{id}`.
///
/// Omitted or `null` fields keep their stored value.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    #[schema(example = "mario")]
    pub name: Option<String>,
    #[schema(example = "bianchi")]
    pub surname: Option<String>,
}

impl TryFrom<UpdateUserRequest> for UserPatch {
    type Error = Error;

    fn try_from(value: UpdateUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: parse_optional_name(value.name, NAME_FIELD)?,
            surname: parse_optional_name(value.surname, SURNAME_FIELD)?,
        })
    }
}

/// Path parameters for `/user/{id}`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Path)]
pub struct UserPath {
    /// 24 character hexadecimal object id.
    #[param(example = "655ba3d28d4531f9e785989d")]
    pub id: String,
}

/// Create a user.
#[utoipa::path(
    post,
    path = "/user/",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "Created user", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "User store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<web::Json<User>> {
    let new_user = NewUser::try_from(payload.into_inner())?;
    let user = state.users.create_user(new_user).await?;
    Ok(web::Json(user))
}

/// List stored users in creation order, up to the configured cap.
#[utoipa::path(
    get,
    path = "/user/",
    responses(
        (status = 200, description = "Users", body = [UserSchema]),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "User store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<User>>> {
    let users = state.users_query.list_users().await?;
    Ok(web::Json(users))
}

/// Delete every stored user.
#[utoipa::path(
    delete,
    path = "/user/",
    responses(
        (status = 204, description = "All users deleted"),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "User store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteAllUsers"
)]
pub async fn delete_all_users(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    state.users.delete_all_users().await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Fetch one user.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use user_service::inbound::http::users::get_user;
///
/// let app = App::new().service(get_user);
/// ```
#[utoipa::path(
    get,
    path = "/user/{id}",
    params(UserPath),
    responses(
        (status = 200, description = "User", body = UserSchema),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "No such user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "User store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/user/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<UserPath>,
) -> ApiResult<web::Json<User>> {
    let id = parse_user_id(&path.id, ID_FIELD)?;
    let user = state.users_query.get_user(&id).await?;
    Ok(web::Json(user))
}

/// Merge-patch one user and return the stored result.
///
/// An empty object leaves the record untouched and returns it. The id is
/// checked before the body.
#[utoipa::path(
    patch,
    path = "/user/{id}",
    params(UserPath),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "No such user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "User store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/user/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<UserPath>,
    payload: Result<web::Json<UpdateUserRequest>, actix_web::Error>,
) -> ApiResult<web::Json<User>> {
    let id = parse_user_id(&path.id, ID_FIELD)?;
    let payload = payload.map_err(rejected_body)?;
    let patch = UserPatch::try_from(payload.into_inner())?;
    let user = state.users.update_user(&id, patch).await?;
    Ok(web::Json(user))
}

/// Delete one user. Deleting an absent user also succeeds.
#[utoipa::path(
    delete,
    path = "/user/{id}",
    params(UserPath),
    responses(
        (status = 204, description = "User deleted or already absent"),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "User store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/user/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<UserPath>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path.id, ID_FIELD)?;
    state.users.delete_user(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Register the user routes and their JSON extractor settings.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use user_service::inbound::http::state::HttpState;
/// use user_service::inbound::http::users;
/// use user_service::outbound::memory::InMemoryUserRepository;
/// use std::sync::Arc;
///
/// let state = HttpState::from_repository(Arc::new(InMemoryUserRepository::new()), 100);
/// let app = App::new()
///     .app_data(web::Data::new(state))
///     .configure(users::configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(
            web::resource(["/user", "/user/"])
                .route(web::get().to(list_users))
                .route(web::post().to(create_user))
                .route(web::delete().to(delete_all_users)),
        )
        .service(get_user)
        .service(update_user)
        .service(delete_user);
}
