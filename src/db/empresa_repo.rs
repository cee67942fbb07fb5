// src/db/empresa_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::common::documento;
use crate::common::error::AppError;
use crate::db::TAMANHO_PAGINA;
use crate::models::empresa::{Empresa, EmpresaPayload};
use crate::models::filtros::Filtros;

#[derive(Clone)]
pub struct EmpresaRepository {
    pool: PgPool,
}

fn mapear_unicidade(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() && db_err.constraint() == Some("empresas_cnpj_key") {
            return AppError::CnpjAlreadyExists;
        }
    }
    e.into()
}

impl EmpresaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Empresa>, AppError> {
        let empresa = sqlx::query_as::<_, Empresa>("SELECT * FROM empresas WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(empresa)
    }

    pub async fn create(&self, payload: &EmpresaPayload) -> Result<Empresa, AppError> {
        let empresa = sqlx::query_as::<_, Empresa>(
            r#"
            INSERT INTO empresas (nome_fantasia, razao_social, cnpj)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&payload.nome_fantasia)
        .bind(&payload.razao_social)
        .bind(documento::normalizar(&payload.cnpj))
        .fetch_one(&self.pool)
        .await
        .map_err(mapear_unicidade)?;

        Ok(empresa)
    }

    pub async fn update(&self, id: Uuid, payload: &EmpresaPayload) -> Result<Empresa, AppError> {
        let empresa = sqlx::query_as::<_, Empresa>(
            r#"
            UPDATE empresas SET
                nome_fantasia = $2, razao_social = $3, cnpj = $4, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.nome_fantasia)
        .bind(&payload.razao_social)
        .bind(documento::normalizar(&payload.cnpj))
        .fetch_optional(&self.pool)
        .await
        .map_err(mapear_unicidade)?;

        empresa.ok_or_else(|| AppError::ResourceNotFound(format!("Empresa {id}")))
    }

    pub async fn set_ativo(&self, id: Uuid, ativo: bool) -> Result<Empresa, AppError> {
        let empresa = sqlx::query_as::<_, Empresa>(
            "UPDATE empresas SET ativo = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(ativo)
        .fetch_optional(&self.pool)
        .await?;
        empresa.ok_or_else(|| AppError::ResourceNotFound(format!("Empresa {id}")))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let removido = sqlx::query("DELETE FROM empresas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if removido.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound(format!("Empresa {id}")));
        }
        Ok(())
    }

    pub async fn listar(&self, filtros: &Filtros) -> Result<(Vec<Empresa>, i64), AppError> {
        fn aplicar_filtros(qb: &mut QueryBuilder<'_, Postgres>, filtros: &Filtros) {
            qb.push(" WHERE 1=1");
            if let Some(busca) = &filtros.busca {
                let padrao = format!("%{busca}%");
                qb.push(" AND (nome_fantasia ILIKE ")
                    .push_bind(padrao.clone())
                    .push(" OR razao_social ILIKE ")
                    .push_bind(padrao.clone())
                    .push(" OR cnpj ILIKE ")
                    .push_bind(padrao)
                    .push(")");
            }
            match filtros.status.as_deref() {
                Some("ativo") => {
                    qb.push(" AND ativo = TRUE");
                }
                Some("inativo") => {
                    qb.push(" AND ativo = FALSE");
                }
                _ => {}
            }
        }

        let mut contagem: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM empresas");
        aplicar_filtros(&mut contagem, filtros);
        let total: i64 = contagem.build_query_scalar().fetch_one(&self.pool).await?;

        let mut listagem: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT * FROM empresas");
        aplicar_filtros(&mut listagem, filtros);
        listagem.push(" ORDER BY nome_fantasia");

        let pagina = filtros.pagina.unwrap_or(1).max(1) as i64;
        listagem
            .push(" LIMIT ")
            .push_bind(TAMANHO_PAGINA)
            .push(" OFFSET ")
            .push_bind((pagina - 1) * TAMANHO_PAGINA);

        let empresas = listagem
            .build_query_as::<Empresa>()
            .fetch_all(&self.pool)
            .await?;

        Ok((empresas, total))
    }
}
