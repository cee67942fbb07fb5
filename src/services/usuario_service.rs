// src/services/usuario_service.rs

use bcrypt::hash;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{PerfilRepository, UsuarioRepository, VinculoRepository},
    models::filtros::{Filtros, Pagina},
    models::usuario::{
        CreateUsuarioPayload, DadosPerfil, NovoUsuario, PerfilKind, StatusUsuario,
        UpdateUsuarioPayload, Usuario, UsuarioDetalhe,
    },
    models::vinculo::{TurnoPayload, Vinculo, validar_turnos},
};

// Senha provisionada quando o administrador cadastra sem informar uma;
// a conta nasce com `senha_padrao` ligado e troca no primeiro acesso.
pub const SENHA_PROVISIONADA: &str = "embu123";

#[derive(Clone)]
pub struct UsuarioService {
    usuario_repo: UsuarioRepository,
    vinculo_repo: VinculoRepository,
    perfil_repo: PerfilRepository,
    pool: sqlx::PgPool,
}

impl UsuarioService {
    pub fn new(
        usuario_repo: UsuarioRepository,
        vinculo_repo: VinculoRepository,
        perfil_repo: PerfilRepository,
        pool: sqlx::PgPool,
    ) -> Self {
        Self {
            usuario_repo,
            vinculo_repo,
            perfil_repo,
            pool,
        }
    }

    async fn resolver_perfil(&self, perfil_id: Uuid) -> Result<PerfilKind, AppError> {
        let perfil = self
            .perfil_repo
            .find_by_id(perfil_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Perfil {perfil_id}")))?;

        PerfilKind::from_nome(&perfil.nome)
            .ok_or_else(|| anyhow::anyhow!("perfil desconhecido: {}", perfil.nome).into())
    }

    // O bloco condicional e os turnos são validados ANTES de abrir a
    // transação; o banco só vê cadastros completos.
    fn validar_turnos_do_perfil(
        kind: PerfilKind,
        turnos: &[TurnoPayload],
    ) -> Result<(), AppError> {
        if kind == PerfilKind::Motoboy && turnos.is_empty() {
            let mut erros = std::collections::HashMap::new();
            erros.insert("turnos".to_string(), "required".to_string());
            return Err(AppError::FieldValidationError(erros));
        }
        validar_turnos(turnos).map_err(AppError::FieldValidationError)
    }

    pub async fn criar(&self, payload: &CreateUsuarioPayload) -> Result<Usuario, AppError> {
        let kind = self.resolver_perfil(payload.perfil_id).await?;
        let dados = DadosPerfil::montar(kind, payload.campos_motoboy())?;
        Self::validar_turnos_do_perfil(kind, &payload.turnos)?;

        let senha = payload
            .senha
            .clone()
            .unwrap_or_else(|| SENHA_PROVISIONADA.to_string());
        let senha_padrao = payload.senha.is_none();

        let senha_hash = tokio::task::spawn_blocking(move || hash(&senha, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let novo = NovoUsuario {
            nome_completo: payload.nome_completo.clone(),
            email: payload.email.clone(),
            cpf: payload.cpf.clone(),
            senha_hash,
            perfil_id: payload.perfil_id,
            status: StatusUsuario::Ativo,
            senha_padrao,
            telefone: payload.telefone.clone(),
            data_nascimento: payload.data_nascimento,
            endereco: payload.endereco.clone(),
            dados,
        };

        // Usuário e vínculos entram na mesma transação: se um turno falhar,
        // o cadastro inteiro é desfeito.
        let mut tx = self.pool.begin().await?;
        let usuario = self.usuario_repo.create(&mut *tx, &novo).await?;
        self.vinculo_repo
            .substituir(&mut *tx, usuario.id, &payload.turnos)
            .await?;
        tx.commit().await?;

        Ok(usuario)
    }

    pub async fn atualizar(
        &self,
        id: Uuid,
        payload: &UpdateUsuarioPayload,
    ) -> Result<Usuario, AppError> {
        let kind = self.resolver_perfil(payload.perfil_id).await?;
        let dados = DadosPerfil::montar(kind, payload.campos_motoboy())?;
        Self::validar_turnos_do_perfil(kind, &payload.turnos)?;

        let mut tx = self.pool.begin().await?;
        let usuario = self
            .usuario_repo
            .update(
                &mut *tx,
                id,
                &payload.nome_completo,
                &payload.email,
                payload.perfil_id,
                payload.telefone.as_deref(),
                payload.data_nascimento,
                payload.endereco.as_ref(),
                &dados,
            )
            .await?;
        self.vinculo_repo
            .substituir(&mut *tx, usuario.id, &payload.turnos)
            .await?;
        tx.commit().await?;

        Ok(usuario)
    }

    pub async fn buscar(&self, id: Uuid) -> Result<UsuarioDetalhe, AppError> {
        let usuario = self
            .usuario_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::UserNotFound)?;
        let links = self.vinculo_repo.listar_por_usuario(id).await?;
        Ok(UsuarioDetalhe { usuario, links })
    }

    pub async fn listar(&self, filtros: &Filtros) -> Result<Pagina<Usuario>, AppError> {
        let (itens, total) = self.usuario_repo.listar(filtros).await?;
        Ok(Pagina::nova(itens, total, filtros))
    }

    /// Também é o caminho da aprovação de cadastros PENDENTE.
    pub async fn atualizar_status(
        &self,
        ator_id: Uuid,
        id: Uuid,
        status: StatusUsuario,
    ) -> Result<Usuario, AppError> {
        if ator_id == id {
            return Err(AppError::SelfOperationNotAllowed);
        }
        self.usuario_repo.update_status(id, status).await
    }

    pub async fn excluir(&self, ator_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if ator_id == id {
            return Err(AppError::SelfOperationNotAllowed);
        }
        self.usuario_repo.delete(id).await
    }

    pub async fn substituir_turnos(
        &self,
        usuario_id: Uuid,
        turnos: &[TurnoPayload],
    ) -> Result<Vec<Vinculo>, AppError> {
        let usuario = self
            .usuario_repo
            .find_by_id(usuario_id)
            .await?
            .ok_or(AppError::UserNotFound)?;
        let kind = self.resolver_perfil(usuario.perfil_id).await?;
        Self::validar_turnos_do_perfil(kind, turnos)?;

        let mut tx = self.pool.begin().await?;
        let vinculos = self
            .vinculo_repo
            .substituir(&mut *tx, usuario_id, turnos)
            .await?;
        tx.commit().await?;

        Ok(vinculos)
    }

    pub async fn excluir_vinculo(&self, id: Uuid) -> Result<(), AppError> {
        self.vinculo_repo.delete(id).await
    }
}
