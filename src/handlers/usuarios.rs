// src/handlers/usuarios.rs

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
    middleware::auth::AuthenticatedUser,
    middleware::i18n::Locale,
    middleware::rbac::{AdminOuEscritorio, RequireRole, SomenteAdmin},
    models::filtros::Filtros,
    models::usuario::{
        CreateUsuarioPayload, StatusPayload, UpdateUsuarioPayload, Usuario, UsuarioDetalhe,
    },
    models::vinculo::{TurnoPayload, Vinculo},
};

// GET /api/usuarios
#[utoipa::path(
    get,
    path = "/api/usuarios",
    tag = "Usuarios",
    params(Filtros),
    responses((status = 200, description = "Listagem paginada de colaboradores", body = Object)),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOuEscritorio>,
    Query(filtros): Query<Filtros>,
) -> Result<impl IntoResponse, ApiError> {
    let pagina = app_state
        .usuario_service
        .listar(&filtros)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(pagina))
}

// POST /api/usuarios
#[utoipa::path(
    post,
    path = "/api/usuarios",
    tag = "Usuarios",
    request_body = CreateUsuarioPayload,
    responses(
        (status = 201, description = "Colaborador criado", body = Usuario),
        (status = 400, description = "Bloco motoboy incompleto ou turnos inválidos"),
        (status = 409, description = "CPF ou e-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<SomenteAdmin>,
    Json(payload): Json<CreateUsuarioPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let usuario = app_state
        .usuario_service
        .criar(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(usuario)))
}

// GET /api/usuarios/{id}
#[utoipa::path(
    get,
    path = "/api/usuarios/{id}",
    tag = "Usuarios",
    params(("id" = Uuid, Path, description = "ID do colaborador")),
    responses((status = 200, description = "Cadastro com vínculos", body = UsuarioDetalhe)),
    security(("api_jwt" = []))
)]
pub async fn buscar(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOuEscritorio>,
    Path(id): Path<Uuid>,
) -> Result<Json<UsuarioDetalhe>, ApiError> {
    let detalhe = app_state
        .usuario_service
        .buscar(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(detalhe))
}

// PUT /api/usuarios/{id}
#[utoipa::path(
    put,
    path = "/api/usuarios/{id}",
    tag = "Usuarios",
    params(("id" = Uuid, Path, description = "ID do colaborador")),
    request_body = UpdateUsuarioPayload,
    responses((status = 200, description = "Cadastro atualizado", body = Usuario)),
    security(("api_jwt" = []))
)]
pub async fn atualizar(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<SomenteAdmin>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUsuarioPayload>,
) -> Result<Json<Usuario>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let usuario = app_state
        .usuario_service
        .atualizar(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(usuario))
}

// PATCH /api/usuarios/{id}/status — também aprova cadastros PENDENTE
#[utoipa::path(
    patch,
    path = "/api/usuarios/{id}/status",
    tag = "Usuarios",
    params(("id" = Uuid, Path, description = "ID do colaborador")),
    request_body = StatusPayload,
    responses(
        (status = 200, description = "Status alterado", body = Usuario),
        (status = 409, description = "Tentativa de alterar a própria conta")
    ),
    security(("api_jwt" = []))
)]
pub async fn alternar_status(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<SomenteAdmin>,
    AuthenticatedUser(ator): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusPayload>,
) -> Result<Json<Usuario>, ApiError> {
    let usuario = app_state
        .usuario_service
        .atualizar_status(ator.usuario.id, id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(usuario))
}

// DELETE /api/usuarios/{id}
#[utoipa::path(
    delete,
    path = "/api/usuarios/{id}",
    tag = "Usuarios",
    params(("id" = Uuid, Path, description = "ID do colaborador")),
    responses(
        (status = 204, description = "Colaborador removido"),
        (status = 409, description = "Tentativa de excluir a própria conta")
    ),
    security(("api_jwt" = []))
)]
pub async fn excluir(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<SomenteAdmin>,
    AuthenticatedUser(ator): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .usuario_service
        .excluir(ator.usuario.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}

// PUT /api/usuarios/{id}/turnos — troca atômica do conjunto de turnos
#[utoipa::path(
    put,
    path = "/api/usuarios/{id}/turnos",
    tag = "Usuarios",
    params(("id" = Uuid, Path, description = "ID do colaborador")),
    request_body = Vec<TurnoPayload>,
    responses(
        (status = 200, description = "Vínculos substituídos", body = Vec<Vinculo>),
        (status = 400, description = "Sobreposição ou duração mínima violada")
    ),
    security(("api_jwt" = []))
)]
pub async fn substituir_turnos(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<SomenteAdmin>,
    Path(id): Path<Uuid>,
    Json(turnos): Json<Vec<TurnoPayload>>,
) -> Result<Json<Vec<Vinculo>>, ApiError> {
    let vinculos = app_state
        .usuario_service
        .substituir_turnos(id, &turnos)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(vinculos))
}

// DELETE /api/usuarios/vinculos/{id}
#[utoipa::path(
    delete,
    path = "/api/usuarios/vinculos/{id}",
    tag = "Usuarios",
    params(("id" = Uuid, Path, description = "ID do vínculo")),
    responses((status = 204, description = "Vínculo removido")),
    security(("api_jwt" = []))
)]
pub async fn excluir_vinculo(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<SomenteAdmin>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state
        .usuario_service
        .excluir_vinculo(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}
