// src/models/auth.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::documento;

// Par de tokens devolvido no login e no refresh. O cliente também
// desserializa este formato, então Serialize e Deserialize andam juntos.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ParTokens {
    pub access_token: String,
    pub refresh_token: String,
}

// Tipo embutido na claim `tipo`: um access token apresentado na rota de
// refresh (ou vice-versa) é recusado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoToken {
    Access,
    Refresh,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,      // ID do usuário
    pub perfil: String, // slug do perfil ("admin", "motoboy", ...)
    pub tipo: TipoToken,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(custom(function = documento::cpf_valido))]
    #[schema(example = "529.982.247-25")]
    pub cpf: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub senha: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RefreshPayload {
    #[validate(length(min = 1, message = "required"))]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePasswordPayload {
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub senha: String,
    // Dispensada quando a conta ainda usa a senha padrão provisionada.
    pub senha_atual: Option<String>,
}
