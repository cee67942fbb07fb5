// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    middleware::i18n::Locale,
    models::auth::{LoginPayload, ParTokens, RefreshPayload, UpdatePasswordPayload},
    models::usuario::{RegisterPayload, Usuario},
};

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Par de tokens emitido", body = ParTokens),
        (status = 401, description = "Credenciais inválidas ou conta bloqueada")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<ParTokens>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let tokens = app_state
        .auth_service
        .login(&payload.cpf, &payload.senha)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(tokens))
}

// POST /api/auth/refresh
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "Auth",
    request_body = RefreshPayload,
    responses(
        (status = 200, description = "Novo par de tokens (rotação)", body = ParTokens),
        (status = 401, description = "Refresh token inválido ou expirado")
    )
)]
pub async fn refresh(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<RefreshPayload>,
) -> Result<Json<ParTokens>, ApiError> {
    let tokens = app_state
        .auth_service
        .refresh(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(tokens))
}

// POST /api/auth/register — autocadastro do motoboy
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Cadastro criado aguardando aprovação", body = Usuario),
        (status = 400, description = "Dados de CNH/moto/PIX incompletos"),
        (status = 409, description = "CPF ou e-mail já cadastrado")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let usuario = app_state
        .auth_service
        .registrar(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(usuario)))
}

// PUT /api/auth/update-password
#[utoipa::path(
    put,
    path = "/api/auth/update-password",
    tag = "Auth",
    request_body = UpdatePasswordPayload,
    responses(
        (status = 204, description = "Senha alterada"),
        (status = 401, description = "Senha atual não confere")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_password(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(autenticado): AuthenticatedUser,
    Json(payload): Json<UpdatePasswordPayload>,
) -> Result<StatusCode, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    app_state
        .auth_service
        .atualizar_senha(&autenticado.usuario, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/auth/me — perfil do usuário autenticado
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses((status = 200, description = "Usuário autenticado", body = Usuario)),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(autenticado): AuthenticatedUser) -> Json<Usuario> {
    Json(autenticado.usuario)
}
