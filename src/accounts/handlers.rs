use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    accounts::{
        dto::{
            AccountOut, AvailabilityResponse, EmailQuery, LoginRequest, PhoneQuery,
            RegisterRequest, UsernameQuery,
        },
        repo_types::UniqueField,
        services::{authenticate, create_account, field_available, is_valid_email, Registration},
    },
    error::AppError,
    state::AppState,
};

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn availability_routes() -> Router<AppState> {
    Router::new()
        .route("/check-username", get(check_username))
        .route("/check-email", get(check_email))
        .route("/check-phone", get(check_phone))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AccountOut>), AppError> {
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }

    let account = create_account(
        state.accounts.as_ref(),
        Registration {
            name: payload.name,
            username: payload.username,
            dob: payload.dob,
            email: payload.email,
            phone: payload.phone,
            password: payload.password,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(account)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AccountOut>, AppError> {
    match authenticate(state.accounts.as_ref(), &payload.username, &payload.password).await? {
        Some(account) => {
            info!(account_id = account.id, "user logged in");
            Ok(Json(account))
        }
        None => {
            warn!(username = %payload.username, "login rejected");
            Err(AppError::InvalidCredentials)
        }
    }
}

async fn availability(
    state: &AppState,
    field: UniqueField,
    value: &str,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let available = field_available(state.accounts.as_ref(), field, value).await?;
    Ok(Json(AvailabilityResponse { available }))
}

#[instrument(skip(state))]
pub async fn check_username(
    State(state): State<AppState>,
    Query(q): Query<UsernameQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    availability(&state, UniqueField::Username, &q.username).await
}

#[instrument(skip(state))]
pub async fn check_email(
    State(state): State<AppState>,
    Query(q): Query<EmailQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    availability(&state, UniqueField::Email, &q.email).await
}

#[instrument(skip(state))]
pub async fn check_phone(
    State(state): State<AppState>,
    Query(q): Query<PhoneQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    availability(&state, UniqueField::Phone, &q.phone).await
}
