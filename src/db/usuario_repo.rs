// src/db/usuario_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::common::documento;
use crate::common::error::AppError;
use crate::db::TAMANHO_PAGINA;
use crate::models::filtros::Filtros;
use crate::models::usuario::{DadosPerfil, NovoUsuario, StatusUsuario, Usuario};

// Repositório de usuários: toda interação com a tabela 'usuarios'.
#[derive(Clone)]
pub struct UsuarioRepository {
    pool: PgPool,
}

// Colunas do bloco motoboy achatadas para o INSERT/UPDATE.
struct ColunasMotoboy<'a> {
    cnh_registro: Option<&'a str>,
    cnh_categoria: Option<&'a str>,
    cnh_validade: Option<chrono::NaiveDate>,
    moto_placa: Option<&'a str>,
    moto_modelo: Option<&'a str>,
    moto_ano: Option<i32>,
    mei_cnpj: Option<&'a str>,
    chave_pix: Option<&'a str>,
}

impl<'a> From<&'a DadosPerfil> for ColunasMotoboy<'a> {
    fn from(dados: &'a DadosPerfil) -> Self {
        match dados {
            DadosPerfil::Padrao => ColunasMotoboy {
                cnh_registro: None,
                cnh_categoria: None,
                cnh_validade: None,
                moto_placa: None,
                moto_modelo: None,
                moto_ano: None,
                mei_cnpj: None,
                chave_pix: None,
            },
            DadosPerfil::Motoboy(m) => ColunasMotoboy {
                cnh_registro: Some(&m.cnh_registro),
                cnh_categoria: Some(&m.cnh_categoria),
                cnh_validade: Some(m.cnh_validade),
                moto_placa: Some(&m.moto_placa),
                moto_modelo: Some(&m.moto_modelo),
                moto_ano: m.moto_ano,
                mei_cnpj: m.mei_cnpj.as_deref(),
                chave_pix: Some(&m.chave_pix),
            },
        }
    }
}

fn mapear_unicidade(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            if let Some(constraint) = db_err.constraint() {
                return match constraint {
                    "usuarios_email_key" => AppError::EmailAlreadyExists,
                    "usuarios_cpf_key" => AppError::CpfAlreadyExists,
                    _ => AppError::UniqueConstraintViolation(constraint.to_string()),
                };
            }
        }
    }
    e.into()
}

impl UsuarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(usuario)
    }

    pub async fn find_by_cpf(&self, cpf: &str) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE cpf = $1")
            .bind(documento::normalizar(cpf))
            .fetch_optional(&self.pool)
            .await?;
        Ok(usuario)
    }

    pub async fn create(
        &self,
        conn: &mut sqlx::PgConnection,
        novo: &NovoUsuario,
    ) -> Result<Usuario, AppError> {
        let colunas = ColunasMotoboy::from(&novo.dados);

        let usuario = sqlx::query_as::<_, Usuario>(
            r#"
            INSERT INTO usuarios (
                nome_completo, email, cpf, senha_hash, perfil_id, status,
                senha_padrao, telefone, data_nascimento, endereco,
                cnh_registro, cnh_categoria, cnh_validade,
                moto_placa, moto_modelo, moto_ano, mei_cnpj, chave_pix
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING *
            "#,
        )
        .bind(&novo.nome_completo)
        .bind(&novo.email)
        .bind(documento::normalizar(&novo.cpf))
        .bind(&novo.senha_hash)
        .bind(novo.perfil_id)
        .bind(novo.status)
        .bind(novo.senha_padrao)
        .bind(&novo.telefone)
        .bind(novo.data_nascimento)
        .bind(&novo.endereco)
        .bind(colunas.cnh_registro)
        .bind(colunas.cnh_categoria)
        .bind(colunas.cnh_validade)
        .bind(colunas.moto_placa)
        .bind(colunas.moto_modelo)
        .bind(colunas.moto_ano)
        .bind(colunas.mei_cnpj)
        .bind(colunas.chave_pix)
        .fetch_one(conn)
        .await
        .map_err(mapear_unicidade)?;

        Ok(usuario)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        conn: &mut sqlx::PgConnection,
        id: Uuid,
        nome_completo: &str,
        email: &str,
        perfil_id: Uuid,
        telefone: Option<&str>,
        data_nascimento: Option<chrono::NaiveDate>,
        endereco: Option<&serde_json::Value>,
        dados: &DadosPerfil,
    ) -> Result<Usuario, AppError> {
        let colunas = ColunasMotoboy::from(dados);

        let usuario = sqlx::query_as::<_, Usuario>(
            r#"
            UPDATE usuarios SET
                nome_completo = $2, email = $3, perfil_id = $4,
                telefone = $5, data_nascimento = $6, endereco = $7,
                cnh_registro = $8, cnh_categoria = $9, cnh_validade = $10,
                moto_placa = $11, moto_modelo = $12, moto_ano = $13,
                mei_cnpj = $14, chave_pix = $15,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(nome_completo)
        .bind(email)
        .bind(perfil_id)
        .bind(telefone)
        .bind(data_nascimento)
        .bind(endereco)
        .bind(colunas.cnh_registro)
        .bind(colunas.cnh_categoria)
        .bind(colunas.cnh_validade)
        .bind(colunas.moto_placa)
        .bind(colunas.moto_modelo)
        .bind(colunas.moto_ano)
        .bind(colunas.mei_cnpj)
        .bind(colunas.chave_pix)
        .fetch_optional(conn)
        .await
        .map_err(mapear_unicidade)?;

        usuario.ok_or(AppError::UserNotFound)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: StatusUsuario,
    ) -> Result<Usuario, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>(
            "UPDATE usuarios SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        usuario.ok_or(AppError::UserNotFound)
    }

    pub async fn update_senha(&self, id: Uuid, senha_hash: &str) -> Result<(), AppError> {
        let alterado = sqlx::query(
            "UPDATE usuarios SET senha_hash = $2, senha_padrao = FALSE, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(senha_hash)
        .execute(&self.pool)
        .await?;

        if alterado.rows_affected() == 0 {
            return Err(AppError::UserNotFound);
        }
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let removido = sqlx::query("DELETE FROM usuarios WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if removido.rows_affected() == 0 {
            return Err(AppError::UserNotFound);
        }
        Ok(())
    }

    pub async fn listar(&self, filtros: &Filtros) -> Result<(Vec<Usuario>, i64), AppError> {
        fn aplicar_filtros(qb: &mut QueryBuilder<'_, Postgres>, filtros: &Filtros) {
            qb.push(" WHERE 1=1");
            if let Some(busca) = &filtros.busca {
                let padrao = format!("%{busca}%");
                qb.push(" AND (u.nome_completo ILIKE ")
                    .push_bind(padrao.clone())
                    .push(" OR u.email ILIKE ")
                    .push_bind(padrao.clone())
                    .push(" OR u.cpf ILIKE ")
                    .push_bind(padrao)
                    .push(")");
            }
            if let Some(status) = filtros.status.as_deref().and_then(status_do_filtro) {
                qb.push(" AND u.status = ").push_bind(status);
            }
            // A "categoria" das telas de colaborador é o slug do perfil.
            if let Some(categoria) = &filtros.categoria {
                qb.push(" AND p.nome = ").push_bind(categoria.clone());
            }
        }

        let mut contagem: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT COUNT(*) FROM usuarios u JOIN perfis p ON p.id = u.perfil_id",
        );
        aplicar_filtros(&mut contagem, filtros);
        let total: i64 = contagem.build_query_scalar().fetch_one(&self.pool).await?;

        let mut listagem: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT u.* FROM usuarios u JOIN perfis p ON p.id = u.perfil_id",
        );
        aplicar_filtros(&mut listagem, filtros);
        listagem.push(" ORDER BY u.nome_completo");

        let pagina = filtros.pagina.unwrap_or(1).max(1) as i64;
        listagem
            .push(" LIMIT ")
            .push_bind(TAMANHO_PAGINA)
            .push(" OFFSET ")
            .push_bind((pagina - 1) * TAMANHO_PAGINA);

        let usuarios = listagem
            .build_query_as::<Usuario>()
            .fetch_all(&self.pool)
            .await?;

        Ok((usuarios, total))
    }
}

fn status_do_filtro(valor: &str) -> Option<StatusUsuario> {
    match valor {
        "ativo" => Some(StatusUsuario::Ativo),
        "inativo" => Some(StatusUsuario::Inativo),
        "pendente" => Some(StatusUsuario::Pendente),
        _ => None,
    }
}
