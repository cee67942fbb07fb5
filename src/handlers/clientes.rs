// src/handlers/clientes.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    middleware::rbac::{AdminOuEscritorio, RequireRole},
    models::cliente::{AtivoPayload, Cliente, ClientePayload},
    models::filtros::Filtros,
};

// GET /api/clientes
#[utoipa::path(
    get,
    path = "/api/clientes",
    tag = "Clientes",
    params(Filtros),
    responses((status = 200, description = "Listagem paginada de clientes", body = Object)),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOuEscritorio>,
    Query(filtros): Query<Filtros>,
) -> Result<impl IntoResponse, ApiError> {
    let pagina = app_state
        .cliente_service
        .listar(&filtros)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(pagina))
}

// POST /api/clientes
#[utoipa::path(
    post,
    path = "/api/clientes",
    tag = "Clientes",
    request_body = ClientePayload,
    responses(
        (status = 201, description = "Cliente criado", body = Cliente),
        (status = 409, description = "CNPJ já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOuEscritorio>,
    Json(payload): Json<ClientePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let cliente = app_state
        .cliente_service
        .criar(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(cliente)))
}

// GET /api/clientes/{id}
#[utoipa::path(
    get,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses((status = 200, description = "Cliente", body = Cliente)),
    security(("api_jwt" = []))
)]
pub async fn buscar(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOuEscritorio>,
    Path(id): Path<Uuid>,
) -> Result<Json<Cliente>, ApiError> {
    let cliente = app_state
        .cliente_service
        .buscar(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(cliente))
}

// PUT /api/clientes/{id}
#[utoipa::path(
    put,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    request_body = ClientePayload,
    responses((status = 200, description = "Cliente atualizado", body = Cliente)),
    security(("api_jwt" = []))
)]
pub async fn atualizar(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOuEscritorio>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClientePayload>,
) -> Result<Json<Cliente>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let cliente = app_state
        .cliente_service
        .atualizar(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(cliente))
}

// PATCH /api/clientes/{id}/status — alternar ativo/inativo
#[utoipa::path(
    patch,
    path = "/api/clientes/{id}/status",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    request_body = AtivoPayload,
    responses((status = 200, description = "Status alternado", body = Cliente)),
    security(("api_jwt" = []))
)]
pub async fn alternar_status(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOuEscritorio>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtivoPayload>,
) -> Result<Json<Cliente>, ApiError> {
    let cliente = app_state
        .cliente_service
        .alternar_ativo(id, payload.ativo)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(cliente))
}

// DELETE /api/clientes/{id}
#[utoipa::path(
    delete,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses((status = 204, description = "Cliente removido")),
    security(("api_jwt" = []))
)]
pub async fn excluir(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOuEscritorio>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .cliente_service
        .excluir(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}
