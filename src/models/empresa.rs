// src/models/empresa.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::documento;

// Empresa contratante associada aos vínculos de trabalho.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Empresa {
    pub id: Uuid,
    pub nome_fantasia: String,
    pub razao_social: String,
    pub cnpj: String,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EmpresaPayload {
    #[validate(length(min = 2, message = "O nome fantasia é obrigatório."))]
    pub nome_fantasia: String,
    #[validate(length(min = 2, message = "A razão social é obrigatória."))]
    pub razao_social: String,
    #[validate(custom(function = documento::cnpj_valido))]
    pub cnpj: String,
}
