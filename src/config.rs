// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{
        ClienteRepository, EmpresaRepository, PerfilRepository, PontoRepository,
        UsuarioRepository, VinculoRepository,
    },
    services::{
        auth::AuthService, cliente_service::ClienteService, documento_service::DocumentoService,
        empresa_service::EmpresaService, ponto_service::PontoService,
        usuario_service::UsuarioService,
    },
};

// O estado compartilhado acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub auth_service: AuthService,
    pub usuario_service: UsuarioService,
    pub cliente_service: ClienteService,
    pub empresa_service: EmpresaService,
    pub ponto_service: PontoService,
    pub documento_service: DocumentoService,
    pub perfil_repo: PerfilRepository,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let usuario_repo = UsuarioRepository::new(db_pool.clone());
        let perfil_repo = PerfilRepository::new(db_pool.clone());
        let vinculo_repo = VinculoRepository::new(db_pool.clone());
        let cliente_repo = ClienteRepository::new(db_pool.clone());
        let empresa_repo = EmpresaRepository::new(db_pool.clone());
        let ponto_repo = PontoRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            usuario_repo.clone(),
            perfil_repo.clone(),
            jwt_secret.clone(),
            db_pool.clone(),
        );
        let usuario_service = UsuarioService::new(
            usuario_repo.clone(),
            vinculo_repo.clone(),
            perfil_repo.clone(),
            db_pool.clone(),
        );
        let cliente_service = ClienteService::new(cliente_repo);
        let empresa_service = EmpresaService::new(empresa_repo);
        let ponto_service = PontoService::new(ponto_repo.clone(), vinculo_repo);
        let documento_service = DocumentoService::new(ponto_repo, usuario_repo);

        Ok(Self {
            db_pool,
            jwt_secret,
            auth_service,
            usuario_service,
            cliente_service,
            empresa_service,
            ponto_service,
            documento_service,
            perfil_repo,
        })
    }
}
