// src/db/ponto_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::db::TAMANHO_PAGINA;
use crate::models::filtros::Filtros;
use crate::models::ponto::{Pausa, RegistroPonto, StatusBatida};

#[derive(Clone)]
pub struct PontoRepository {
    pool: PgPool,
}

impl PontoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn carregar_pausas(&self, registro: &mut RegistroPonto) -> Result<(), AppError> {
        registro.pausas = sqlx::query_as::<_, Pausa>(
            "SELECT * FROM pausas WHERE ponto_id = $1 ORDER BY inicio_hora",
        )
        .bind(registro.id)
        .fetch_all(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<RegistroPonto>, AppError> {
        let registro =
            sqlx::query_as::<_, RegistroPonto>("SELECT * FROM registros_ponto WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        match registro {
            None => Ok(None),
            Some(mut registro) => {
                self.carregar_pausas(&mut registro).await?;
                Ok(Some(registro))
            }
        }
    }

    /// Último registro do dia corrente (UTC) do usuário, com pausas.
    pub async fn hoje(&self, usuario_id: Uuid) -> Result<Option<RegistroPonto>, AppError> {
        let registro = sqlx::query_as::<_, RegistroPonto>(
            r#"
            SELECT * FROM registros_ponto
            WHERE usuario_id = $1 AND entrada_hora::date = CURRENT_DATE
            ORDER BY entrada_hora DESC
            LIMIT 1
            "#,
        )
        .bind(usuario_id)
        .fetch_optional(&self.pool)
        .await?;

        match registro {
            None => Ok(None),
            Some(mut registro) => {
                self.carregar_pausas(&mut registro).await?;
                Ok(Some(registro))
            }
        }
    }

    pub async fn abrir(
        &self,
        usuario_id: Uuid,
        vinculo_id: Uuid,
        entrada_hora: DateTime<Utc>,
        entrada_loc: &Value,
        status_entrada: StatusBatida,
    ) -> Result<RegistroPonto, AppError> {
        let registro = sqlx::query_as::<_, RegistroPonto>(
            r#"
            INSERT INTO registros_ponto
                (usuario_id, vinculo_id, entrada_hora, entrada_loc, status_entrada)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(usuario_id)
        .bind(vinculo_id)
        .bind(entrada_hora)
        .bind(entrada_loc)
        .bind(status_entrada)
        .fetch_one(&self.pool)
        .await?;

        Ok(registro)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn fechar(
        &self,
        id: Uuid,
        saida_hora: DateTime<Utc>,
        saida_loc: &Value,
        status_entrada: StatusBatida,
        status_saida: StatusBatida,
        saldo_minutos: i32,
        detalhes_calculo: &Value,
    ) -> Result<RegistroPonto, AppError> {
        let mut registro = sqlx::query_as::<_, RegistroPonto>(
            r#"
            UPDATE registros_ponto SET
                saida_hora = $2, saida_loc = $3, status_entrada = $4,
                status_saida = $5, saldo_minutos = $6, detalhes_calculo = $7,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(saida_hora)
        .bind(saida_loc)
        .bind(status_entrada)
        .bind(status_saida)
        .bind(saldo_minutos)
        .bind(detalhes_calculo)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::ResourceNotFound(format!("Registro {id}")))?;

        self.carregar_pausas(&mut registro).await?;
        Ok(registro)
    }

    /// Correção manual: regrava batidas e o recálculo correspondente.
    #[allow(clippy::too_many_arguments)]
    pub async fn corrigir(
        &self,
        id: Uuid,
        entrada_hora: DateTime<Utc>,
        saida_hora: Option<DateTime<Utc>>,
        status_entrada: Option<StatusBatida>,
        status_saida: Option<StatusBatida>,
        saldo_minutos: Option<i32>,
        detalhes_calculo: Option<&Value>,
    ) -> Result<RegistroPonto, AppError> {
        let mut registro = sqlx::query_as::<_, RegistroPonto>(
            r#"
            UPDATE registros_ponto SET
                entrada_hora = $2, saida_hora = $3, status_entrada = $4,
                status_saida = $5, saldo_minutos = $6, detalhes_calculo = $7,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(entrada_hora)
        .bind(saida_hora)
        .bind(status_entrada)
        .bind(status_saida)
        .bind(saldo_minutos)
        .bind(detalhes_calculo)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::ResourceNotFound(format!("Registro {id}")))?;

        self.carregar_pausas(&mut registro).await?;
        Ok(registro)
    }

    pub async fn pausa_por_id(&self, id: Uuid) -> Result<Option<Pausa>, AppError> {
        let pausa = sqlx::query_as::<_, Pausa>("SELECT * FROM pausas WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(pausa)
    }

    pub async fn pausa_iniciar(
        &self,
        ponto_id: Uuid,
        inicio_hora: DateTime<Utc>,
        inicio_loc: &Value,
        km: Option<Decimal>,
    ) -> Result<Pausa, AppError> {
        let pausa = sqlx::query_as::<_, Pausa>(
            r#"
            INSERT INTO pausas (ponto_id, inicio_hora, inicio_loc, km)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(ponto_id)
        .bind(inicio_hora)
        .bind(inicio_loc)
        .bind(km)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // O índice parcial garante uma única pausa aberta por registro,
            // mesmo com dois dispositivos disputando.
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some("pausas_aberta_unica_idx")
                {
                    return AppError::OpenPauseExists;
                }
            }
            e.into()
        })?;

        Ok(pausa)
    }

    pub async fn pausa_finalizar(
        &self,
        id: Uuid,
        fim_hora: DateTime<Utc>,
        fim_loc: &Value,
        km: Option<Decimal>,
    ) -> Result<Pausa, AppError> {
        let pausa = sqlx::query_as::<_, Pausa>(
            r#"
            UPDATE pausas SET fim_hora = $2, fim_loc = $3, km = COALESCE($4, km)
            WHERE id = $1 AND fim_hora IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(fim_hora)
        .bind(fim_loc)
        .bind(km)
        .fetch_optional(&self.pool)
        .await?;

        pausa.ok_or(AppError::NoOpenPause)
    }

    pub async fn listar(&self, filtros: &Filtros) -> Result<(Vec<RegistroPonto>, i64), AppError> {
        fn aplicar_filtros(qb: &mut QueryBuilder<'_, Postgres>, filtros: &Filtros) {
            qb.push(" WHERE 1=1");
            if let Some(busca) = &filtros.busca {
                qb.push(" AND u.nome_completo ILIKE ")
                    .push_bind(format!("%{busca}%"));
            }
            if let Some(usuario_id) = filtros.usuario_id {
                qb.push(" AND r.usuario_id = ").push_bind(usuario_id);
            }
            if let Some(cliente_id) = filtros.cliente_id {
                qb.push(" AND v.cliente_id = ").push_bind(cliente_id);
            }
            if let Some(empresa_id) = filtros.empresa_id {
                qb.push(" AND v.empresa_id = ").push_bind(empresa_id);
            }
            if let Some(status) = filtros.status_entrada.as_deref().and_then(batida_do_filtro) {
                qb.push(" AND r.status_entrada = ").push_bind(status);
            }
            if let Some(status) = filtros.status_saida.as_deref().and_then(batida_do_filtro) {
                qb.push(" AND r.status_saida = ").push_bind(status);
            }
            match filtros.periodo.as_deref() {
                Some("hoje") => {
                    qb.push(" AND r.entrada_hora::date = CURRENT_DATE");
                }
                Some("semana") => {
                    qb.push(" AND r.entrada_hora >= date_trunc('week', now())");
                }
                Some("mes") => {
                    qb.push(" AND r.entrada_hora >= date_trunc('month', now())");
                }
                _ => {}
            }
            if let Some(mes) = filtros.mes {
                qb.push(" AND EXTRACT(MONTH FROM r.entrada_hora) = ")
                    .push_bind(mes as i32);
            }
            if let Some(ano) = filtros.ano {
                qb.push(" AND EXTRACT(YEAR FROM r.entrada_hora) = ")
                    .push_bind(ano as i32);
            }
        }

        const JUNCOES: &str = r#" FROM registros_ponto r
            JOIN usuarios u ON u.id = r.usuario_id
            JOIN vinculos v ON v.id = r.vinculo_id"#;

        let mut contagem: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT COUNT(*){JUNCOES}"));
        aplicar_filtros(&mut contagem, filtros);
        let total: i64 = contagem.build_query_scalar().fetch_one(&self.pool).await?;

        let mut listagem: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT r.*{JUNCOES}"));
        aplicar_filtros(&mut listagem, filtros);
        listagem.push(" ORDER BY r.entrada_hora DESC");

        let pagina = filtros.pagina.unwrap_or(1).max(1) as i64;
        listagem
            .push(" LIMIT ")
            .push_bind(TAMANHO_PAGINA)
            .push(" OFFSET ")
            .push_bind((pagina - 1) * TAMANHO_PAGINA);

        let mut registros = listagem
            .build_query_as::<RegistroPonto>()
            .fetch_all(&self.pool)
            .await?;

        for registro in &mut registros {
            self.carregar_pausas(registro).await?;
        }

        Ok((registros, total))
    }

    /// Registros de um usuário num mês de referência, para o espelho de ponto.
    pub async fn por_mes(
        &self,
        usuario_id: Uuid,
        mes: u32,
        ano: i32,
    ) -> Result<Vec<RegistroPonto>, AppError> {
        let mut registros = sqlx::query_as::<_, RegistroPonto>(
            r#"
            SELECT * FROM registros_ponto
            WHERE usuario_id = $1
              AND EXTRACT(MONTH FROM entrada_hora) = $2
              AND EXTRACT(YEAR FROM entrada_hora) = $3
            ORDER BY entrada_hora
            "#,
        )
        .bind(usuario_id)
        .bind(mes as i32)
        .bind(ano)
        .fetch_all(&self.pool)
        .await?;

        for registro in &mut registros {
            self.carregar_pausas(registro).await?;
        }

        Ok(registros)
    }
}

fn batida_do_filtro(valor: &str) -> Option<StatusBatida> {
    match valor {
        "pontual" => Some(StatusBatida::Pontual),
        "atrasado" => Some(StatusBatida::Atrasado),
        "antecipado" => Some(StatusBatida::Antecipado),
        "hora_extra" => Some(StatusBatida::HoraExtra),
        _ => None,
    }
}
