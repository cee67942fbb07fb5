// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::register,
        handlers::auth::update_password,
        handlers::auth::get_me,

        // --- Clientes ---
        handlers::clientes::listar,
        handlers::clientes::criar,
        handlers::clientes::buscar,
        handlers::clientes::atualizar,
        handlers::clientes::alternar_status,
        handlers::clientes::excluir,

        // --- Empresas ---
        handlers::empresas::listar,
        handlers::empresas::criar,
        handlers::empresas::buscar,
        handlers::empresas::atualizar,
        handlers::empresas::alternar_status,
        handlers::empresas::excluir,

        // --- Usuários / vínculos ---
        handlers::usuarios::listar,
        handlers::usuarios::criar,
        handlers::usuarios::buscar,
        handlers::usuarios::atualizar,
        handlers::usuarios::alternar_status,
        handlers::usuarios::excluir,
        handlers::usuarios::substituir_turnos,
        handlers::usuarios::excluir_vinculo,

        // --- Perfis ---
        handlers::perfis::listar,

        // --- Pontos ---
        handlers::pontos::hoje,
        handlers::pontos::toggle,
        handlers::pontos::pausa_inicio,
        handlers::pontos::pausa_fim,

        // --- Registros ---
        handlers::registros::listar,
        handlers::registros::corrigir,
        handlers::registros::espelho,
    ),
    components(schemas(
        models::auth::ParTokens,
        models::auth::LoginPayload,
        models::auth::RefreshPayload,
        models::auth::UpdatePasswordPayload,
        models::usuario::Usuario,
        models::usuario::UsuarioDetalhe,
        models::usuario::Perfil,
        models::usuario::StatusUsuario,
        models::usuario::StatusPayload,
        models::usuario::CreateUsuarioPayload,
        models::usuario::UpdateUsuarioPayload,
        models::usuario::RegisterPayload,
        models::cliente::Cliente,
        models::cliente::ClientePayload,
        models::cliente::AtivoPayload,
        models::empresa::Empresa,
        models::empresa::EmpresaPayload,
        models::vinculo::Vinculo,
        models::vinculo::TurnoPayload,
        models::ponto::RegistroPonto,
        models::ponto::Pausa,
        models::ponto::Localizacao,
        models::ponto::StatusBatida,
        models::ponto::EstadoJornada,
        models::ponto::PontoHoje,
        models::ponto::TogglePayload,
        models::ponto::PausaInicioPayload,
        models::ponto::PausaFimPayload,
        models::ponto::CorrecaoPayload,
        models::ponto::DetalheBatida,
        models::ponto::ResumoCalculo,
        models::ponto::DetalhesCalculo,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login, refresh e autocadastro"),
        (name = "Clientes", description = "Estabelecimentos atendidos"),
        (name = "Empresas", description = "Empresas contratantes"),
        (name = "Usuarios", description = "Colaboradores e vínculos"),
        (name = "Perfis", description = "Perfis de acesso"),
        (name = "Pontos", description = "Tela operacional de ponto"),
        (name = "Registros", description = "Administração dos registros de ponto"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_jwt",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
