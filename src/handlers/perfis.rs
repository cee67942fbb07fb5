// src/handlers/perfis.rs

use axum::{Json, extract::State};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    middleware::rbac::{QualquerColaborador, RequireRole},
    models::usuario::Perfil,
};

// GET /api/perfis — popula os selects de perfil nos formulários
#[utoipa::path(
    get,
    path = "/api/perfis",
    tag = "Perfis",
    responses((status = 200, description = "Perfis disponíveis", body = Vec<Perfil>)),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<QualquerColaborador>,
) -> Result<Json<Vec<Perfil>>, ApiError> {
    let perfis = app_state
        .perfil_repo
        .listar()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(perfis))
}
