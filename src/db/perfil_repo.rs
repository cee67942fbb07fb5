// src/db/perfil_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::usuario::Perfil;

#[derive(Clone)]
pub struct PerfilRepository {
    pool: PgPool,
}

impl PerfilRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar(&self) -> Result<Vec<Perfil>, AppError> {
        let perfis = sqlx::query_as::<_, Perfil>("SELECT * FROM perfis ORDER BY nome")
            .fetch_all(&self.pool)
            .await?;
        Ok(perfis)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Perfil>, AppError> {
        let perfil = sqlx::query_as::<_, Perfil>("SELECT * FROM perfis WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(perfil)
    }

    pub async fn find_by_nome(&self, nome: &str) -> Result<Option<Perfil>, AppError> {
        let perfil = sqlx::query_as::<_, Perfil>("SELECT * FROM perfis WHERE nome = $1")
            .bind(nome)
            .fetch_optional(&self.pool)
            .await?;
        Ok(perfil)
    }
}
