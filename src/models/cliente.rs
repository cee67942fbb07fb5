// src/models/cliente.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::documento;

// Estabelecimento atendido pelos motoboys.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Cliente {
    pub id: Uuid,
    pub nome_fantasia: String,
    pub razao_social: String,
    pub cnpj: String,
    #[schema(value_type = Object)]
    pub endereco: Option<Value>,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ClientePayload {
    #[validate(length(min = 2, message = "O nome fantasia é obrigatório."))]
    pub nome_fantasia: String,
    #[validate(length(min = 2, message = "A razão social é obrigatória."))]
    pub razao_social: String,
    #[validate(custom(function = documento::cnpj_valido))]
    pub cnpj: String,
    #[schema(value_type = Object)]
    pub endereco: Option<Value>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AtivoPayload {
    pub ativo: bool,
}
