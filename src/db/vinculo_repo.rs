// src/db/vinculo_repo.rs

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::vinculo::{TurnoPayload, Vinculo};

#[derive(Clone)]
pub struct VinculoRepository {
    pool: PgPool,
}

impl VinculoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vinculo>, AppError> {
        let vinculo = sqlx::query_as::<_, Vinculo>("SELECT * FROM vinculos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(vinculo)
    }

    pub async fn listar_por_usuario(&self, usuario_id: Uuid) -> Result<Vec<Vinculo>, AppError> {
        let vinculos = sqlx::query_as::<_, Vinculo>(
            "SELECT * FROM vinculos WHERE usuario_id = $1 ORDER BY hora_inicio",
        )
        .bind(usuario_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(vinculos)
    }

    pub async fn ativos_por_usuario(&self, usuario_id: Uuid) -> Result<Vec<Vinculo>, AppError> {
        let vinculos = sqlx::query_as::<_, Vinculo>(
            "SELECT * FROM vinculos WHERE usuario_id = $1 AND ativo = TRUE ORDER BY hora_inicio",
        )
        .bind(usuario_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(vinculos)
    }

    /// Substitui o conjunto inteiro de turnos do usuário. Os horários já
    /// chegaram validados pelo serviço; aqui é só a troca atômica.
    pub async fn substituir(
        &self,
        conn: &mut PgConnection,
        usuario_id: Uuid,
        turnos: &[TurnoPayload],
    ) -> Result<Vec<Vinculo>, AppError> {
        sqlx::query("DELETE FROM vinculos WHERE usuario_id = $1")
            .bind(usuario_id)
            .execute(&mut *conn)
            .await?;

        let mut inseridos = Vec::with_capacity(turnos.len());
        for turno in turnos {
            let inicio = turno
                .hora_inicio_naive()
                .ok_or_else(|| anyhow::anyhow!("horário de início inválido após validação"))?;
            let fim = turno
                .hora_fim_naive()
                .ok_or_else(|| anyhow::anyhow!("horário de fim inválido após validação"))?;

            let vinculo = sqlx::query_as::<_, Vinculo>(
                r#"
                INSERT INTO vinculos (
                    usuario_id, cliente_id, empresa_id, hora_inicio, hora_fim,
                    valor_contrato, valor_aluguel, valor_bonus, ajuda_custo, mei
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING *
                "#,
            )
            .bind(usuario_id)
            .bind(turno.cliente_id)
            .bind(turno.empresa_id)
            .bind(inicio)
            .bind(fim)
            .bind(turno.valor_contrato)
            .bind(turno.valor_aluguel)
            .bind(turno.valor_bonus)
            .bind(turno.ajuda_custo)
            .bind(turno.mei)
            .fetch_one(&mut *conn)
            .await?;

            inseridos.push(vinculo);
        }

        Ok(inseridos)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let removido = sqlx::query("DELETE FROM vinculos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if removido.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound(format!("Vínculo {id}")));
        }
        Ok(())
    }
}
