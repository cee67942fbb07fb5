// src/handlers/empresas.rs

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
    models::cliente::AtivoPayload,
    models::empresa::{Empresa, EmpresaPayload},
    models::filtros::Filtros,
};

// GET /api/empresas
#[utoipa::path(
    get,
    path = "/api/empresas",
    tag = "Empresas",
    params(Filtros),
    responses((status = 200, description = "Listagem paginada de empresas", body = Object)),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOuEscritorio>,
    Query(filtros): Query<Filtros>,
) -> Result<impl IntoResponse, ApiError> {
    let pagina = app_state
        .empresa_service
        .listar(&filtros)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(pagina))
}

// POST /api/empresas
#[utoipa::path(
    post,
    path = "/api/empresas",
    tag = "Empresas",
    request_body = EmpresaPayload,
    responses(
        (status = 201, description = "Empresa criada", body = Empresa),
        (status = 409, description = "CNPJ já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOuEscritorio>,
    Json(payload): Json<EmpresaPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let empresa = app_state
        .empresa_service
        .criar(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(empresa)))
}

// GET /api/empresas/{id}
#[utoipa::path(
    get,
    path = "/api/empresas/{id}",
    tag = "Empresas",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    responses((status = 200, description = "Empresa", body = Empresa)),
    security(("api_jwt" = []))
)]
pub async fn buscar(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOuEscritorio>,
    Path(id): Path<Uuid>,
) -> Result<Json<Empresa>, ApiError> {
    let empresa = app_state
        .empresa_service
        .buscar(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(empresa))
}

// PUT /api/empresas/{id}
#[utoipa::path(
    put,
    path = "/api/empresas/{id}",
    tag = "Empresas",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    request_body = EmpresaPayload,
    responses((status = 200, description = "Empresa atualizada", body = Empresa)),
    security(("api_jwt" = []))
)]
pub async fn atualizar(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOuEscritorio>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EmpresaPayload>,
) -> Result<Json<Empresa>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let empresa = app_state
        .empresa_service
        .atualizar(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(empresa))
}

// PATCH /api/empresas/{id}/status
#[utoipa::path(
    patch,
    path = "/api/empresas/{id}/status",
    tag = "Empresas",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    request_body = AtivoPayload,
    responses((status = 200, description = "Status alternado", body = Empresa)),
    security(("api_jwt" = []))
)]
pub async fn alternar_status(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOuEscritorio>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtivoPayload>,
) -> Result<Json<Empresa>, ApiError> {
    let empresa = app_state
        .empresa_service
        .alternar_ativo(id, payload.ativo)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(empresa))
}

// DELETE /api/empresas/{id}
#[utoipa::path(
    delete,
    path = "/api/empresas/{id}",
    tag = "Empresas",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    responses((status = 204, description = "Empresa removida")),
    security(("api_jwt" = []))
)]
pub async fn excluir(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOuEscritorio>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .empresa_service
        .excluir(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}
