// src/services/cliente_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ClienteRepository,
    models::cliente::{Cliente, ClientePayload},
    models::filtros::{Filtros, Pagina},
};

#[derive(Clone)]
pub struct ClienteService {
    repo: ClienteRepository,
}

impl ClienteService {
    pub fn new(repo: ClienteRepository) -> Self {
        Self { repo }
    }

    pub async fn criar(&self, payload: &ClientePayload) -> Result<Cliente, AppError> {
        self.repo.create(payload).await
    }

    pub async fn atualizar(&self, id: Uuid, payload: &ClientePayload) -> Result<Cliente, AppError> {
        self.repo.update(id, payload).await
    }

    pub async fn buscar(&self, id: Uuid) -> Result<Cliente, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Cliente {id}")))
    }

    pub async fn listar(&self, filtros: &Filtros) -> Result<Pagina<Cliente>, AppError> {
        let (itens, total) = self.repo.listar(filtros).await?;
        Ok(Pagina::nova(itens, total, filtros))
    }

    pub async fn alternar_ativo(&self, id: Uuid, ativo: bool) -> Result<Cliente, AppError> {
        self.repo.set_ativo(id, ativo).await
    }

    pub async fn excluir(&self, id: Uuid) -> Result<(), AppError> {
        self.repo.delete(id).await
    }
}
