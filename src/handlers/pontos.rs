// src/handlers/pontos.rs
//
// A tela operacional de ponto: estado do dia, alternância da jornada e
// pausas. Motoboy só enxerga e movimenta a própria jornada; admin e
// escritório podem operar em nome de qualquer colaborador.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    middleware::i18n::Locale,
    middleware::rbac::{QualquerColaborador, RequireRole},
    models::ponto::{PausaFimPayload, PausaInicioPayload, PontoHoje, TogglePayload},
    models::usuario::UsuarioAutenticado,
};

fn conferir_escopo(autenticado: &UsuarioAutenticado, usuario_id: Uuid) -> Result<(), AppError> {
    if autenticado.perfil == "motoboy" && autenticado.usuario.id != usuario_id {
        return Err(AppError::InsufficientRole);
    }
    Ok(())
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HojeParams {
    pub usuario_id: Uuid,
}

// GET /api/pontos/hoje?usuario_id=
#[utoipa::path(
    get,
    path = "/api/pontos/hoje",
    tag = "Pontos",
    params(HojeParams),
    responses((status = 200, description = "Registro do dia e estado derivado", body = PontoHoje)),
    security(("api_jwt" = []))
)]
pub async fn hoje(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<QualquerColaborador>,
    AuthenticatedUser(autenticado): AuthenticatedUser,
    Query(params): Query<HojeParams>,
) -> Result<Json<PontoHoje>, ApiError> {
    conferir_escopo(&autenticado, params.usuario_id).map_err(|e| e.to_api_error(&locale))?;

    let hoje = app_state
        .ponto_service
        .hoje(params.usuario_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(hoje))
}

// POST /api/pontos/toggle — inicia ou encerra a jornada
#[utoipa::path(
    post,
    path = "/api/pontos/toggle",
    tag = "Pontos",
    request_body = TogglePayload,
    responses(
        (status = 200, description = "Jornada aberta ou encerrada", body = Object),
        (status = 409, description = "Pausa em aberto impede o encerramento"),
        (status = 422, description = "Colaborador sem vínculo ativo")
    ),
    security(("api_jwt" = []))
)]
pub async fn toggle(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<QualquerColaborador>,
    AuthenticatedUser(autenticado): AuthenticatedUser,
    Json(payload): Json<TogglePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;
    conferir_escopo(&autenticado, payload.usuario_id).map_err(|e| e.to_api_error(&locale))?;

    let registro = app_state
        .ponto_service
        .toggle(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(registro))
}

// POST /api/pontos/pausa/inicio
#[utoipa::path(
    post,
    path = "/api/pontos/pausa/inicio",
    tag = "Pontos",
    request_body = PausaInicioPayload,
    responses(
        (status = 201, description = "Pausa iniciada", body = Object),
        (status = 409, description = "Já existe pausa em aberto")
    ),
    security(("api_jwt" = []))
)]
pub async fn pausa_inicio(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<QualquerColaborador>,
    AuthenticatedUser(autenticado): AuthenticatedUser,
    Json(payload): Json<PausaInicioPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let registro = app_state
        .ponto_service
        .registro_por_id(payload.ponto_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    conferir_escopo(&autenticado, registro.usuario_id).map_err(|e| e.to_api_error(&locale))?;

    let pausa = app_state
        .ponto_service
        .pausa_inicio(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(pausa)))
}

// POST /api/pontos/pausa/fim
#[utoipa::path(
    post,
    path = "/api/pontos/pausa/fim",
    tag = "Pontos",
    request_body = PausaFimPayload,
    responses(
        (status = 200, description = "Pausa encerrada", body = Object),
        (status = 422, description = "Nenhuma pausa em aberto")
    ),
    security(("api_jwt" = []))
)]
pub async fn pausa_fim(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<QualquerColaborador>,
    AuthenticatedUser(autenticado): AuthenticatedUser,
    Json(payload): Json<PausaFimPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let registro = app_state
        .ponto_service
        .registro_da_pausa(payload.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    conferir_escopo(&autenticado, registro.usuario_id).map_err(|e| e.to_api_error(&locale))?;

    let pausa = app_state
        .ponto_service
        .pausa_fim(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(pausa))
}
