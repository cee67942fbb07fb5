// src/services/empresa_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::EmpresaRepository,
    models::empresa::{Empresa, EmpresaPayload},
    models::filtros::{Filtros, Pagina},
};

#[derive(Clone)]
pub struct EmpresaService {
    repo: EmpresaRepository,
}

impl EmpresaService {
    pub fn new(repo: EmpresaRepository) -> Self {
        Self { repo }
    }

    pub async fn criar(&self, payload: &EmpresaPayload) -> Result<Empresa, AppError> {
        self.repo.create(payload).await
    }

    pub async fn atualizar(&self, id: Uuid, payload: &EmpresaPayload) -> Result<Empresa, AppError> {
        self.repo.update(id, payload).await
    }

    pub async fn buscar(&self, id: Uuid) -> Result<Empresa, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Empresa {id}")))
    }

    pub async fn listar(&self, filtros: &Filtros) -> Result<Pagina<Empresa>, AppError> {
        let (itens, total) = self.repo.listar(filtros).await?;
        Ok(Pagina::nova(itens, total, filtros))
    }

    pub async fn alternar_ativo(&self, id: Uuid, ativo: bool) -> Result<Empresa, AppError> {
        self.repo.set_ativo(id, ativo).await
    }

    pub async fn excluir(&self, id: Uuid) -> Result<(), AppError> {
        self.repo.delete(id).await
    }
}
