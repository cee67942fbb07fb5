// src/handlers/registros.rs
//
// Administração dos registros de ponto: listagem filtrada, correção
// manual e o espelho mensal em PDF.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    middleware::rbac::{AdminOuEscritorio, RequireRole},
    models::filtros::Filtros,
    models::ponto::CorrecaoPayload,
};

// GET /api/registros-ponto
#[utoipa::path(
    get,
    path = "/api/registros-ponto",
    tag = "Registros",
    params(Filtros),
    responses((status = 200, description = "Listagem paginada de registros", body = Object)),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOuEscritorio>,
    Query(filtros): Query<Filtros>,
) -> Result<impl IntoResponse, ApiError> {
    let pagina = app_state
        .ponto_service
        .listar(&filtros)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(pagina))
}

// PATCH /api/registros-ponto/{id} — correção manual de batidas
#[utoipa::path(
    patch,
    path = "/api/registros-ponto/{id}",
    tag = "Registros",
    params(("id" = Uuid, Path, description = "ID do registro")),
    request_body = CorrecaoPayload,
    responses((status = 200, description = "Registro recalculado", body = Object)),
    security(("api_jwt" = []))
)]
pub async fn corrigir(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOuEscritorio>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CorrecaoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let registro = app_state
        .ponto_service
        .corrigir(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(registro))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EspelhoParams {
    pub usuario_id: Uuid,
    pub mes: u32,
    pub ano: i32,
}

// GET /api/registros-ponto/espelho — espelho de ponto mensal em PDF
#[utoipa::path(
    get,
    path = "/api/registros-ponto/espelho",
    tag = "Registros",
    params(EspelhoParams),
    responses(
        (status = 200, description = "PDF do espelho de ponto", content_type = "application/pdf"),
        (status = 404, description = "Colaborador não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn espelho(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOuEscritorio>,
    Query(params): Query<EspelhoParams>,
) -> Result<impl IntoResponse, ApiError> {
    let pdf = app_state
        .documento_service
        .espelho_mensal(params.usuario_id, params.mes, params.ano)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/pdf")],
        pdf,
    ))
}
