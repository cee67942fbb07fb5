use std::collections::HashMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::common::i18n;
use crate::middleware::i18n::Locale;

// Erro interno da aplicação, com `thiserror` para melhor ergonomia.
// As conversões automáticas (`#[from]`) cobrem as bibliotecas de baixo nível;
// o restante são regras de negócio nomeadas uma a uma.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Regras que precisam apontar campos específicos (ex.: turnos[2]),
    // reportadas como mapa campo -> código de erro.
    #[error("Campos inválidos")]
    FieldValidationError(HashMap<String, String>),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("CPF já existe")]
    CpfAlreadyExists,

    #[error("CNPJ já existe")]
    CnpjAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Refresh token inválido")]
    InvalidRefreshToken,

    #[error("Usuário inativo")]
    InactiveUser,

    #[error("Cadastro pendente de aprovação")]
    PendingUser,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Recurso não encontrado: {0}")]
    ResourceNotFound(String),

    #[error("Operação sobre a própria conta")]
    SelfOperationNotAllowed,

    #[error("Perfil sem permissão")]
    InsufficientRole,

    #[error("Nenhuma jornada em aberto")]
    NoOpenShift,

    #[error("Já existe uma pausa em aberto")]
    OpenPauseExists,

    #[error("Nenhuma pausa em aberto")]
    NoOpenPause,

    #[error("Pausa em aberto impede o encerramento")]
    PauseStillOpen,

    #[error("Usuário sem vínculo ativo")]
    NoActiveVinculo,

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// Envelope de transporte: o que de fato sai pela rede.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<serde_json::Value>,
}

impl AppError {
    // Código estável usado tanto no catálogo de mensagens quanto pelos
    // consumidores da API.
    fn codigo(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation",
            AppError::FieldValidationError(_) => "validation",
            AppError::EmailAlreadyExists => "email_exists",
            AppError::CpfAlreadyExists => "cpf_exists",
            AppError::CnpjAlreadyExists => "cnpj_exists",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::InvalidToken => "invalid_token",
            AppError::InvalidRefreshToken => "invalid_refresh",
            AppError::InactiveUser => "inactive_user",
            AppError::PendingUser => "pending_user",
            AppError::UserNotFound => "user_not_found",
            AppError::ResourceNotFound(_) => "not_found",
            AppError::SelfOperationNotAllowed => "self_operation",
            AppError::InsufficientRole => "insufficient_role",
            AppError::NoOpenShift => "no_open_shift",
            AppError::OpenPauseExists => "open_pause_exists",
            AppError::NoOpenPause => "no_open_pause",
            AppError::PauseStillOpen => "pause_still_open",
            AppError::NoActiveVinculo => "no_active_vinculo",
            _ => "internal",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::FieldValidationError(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::EmailAlreadyExists
            | AppError::CpfAlreadyExists
            | AppError::CnpjAlreadyExists
            | AppError::OpenPauseExists
            | AppError::PauseStillOpen
            | AppError::SelfOperationNotAllowed
            | AppError::UniqueConstraintViolation(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials
            | AppError::InvalidToken
            | AppError::InvalidRefreshToken
            | AppError::InactiveUser
            | AppError::PendingUser => StatusCode::UNAUTHORIZED,
            AppError::InsufficientRole => StatusCode::FORBIDDEN,
            AppError::UserNotFound | AppError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            AppError::NoOpenShift
            | AppError::NoOpenPause
            | AppError::NoActiveVinculo => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let status = self.status();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu;
            // o cliente recebe só o texto genérico.
            tracing::error!("Erro interno do servidor: {}", self);
        }

        let details = match self {
            AppError::ValidationError(errors) => {
                let mut mapa = HashMap::new();
                for (campo, erros) in errors.field_errors() {
                    let mensagens: Vec<String> = erros
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    mapa.insert(campo.to_string(), mensagens);
                }
                Some(json!(mapa))
            }
            AppError::FieldValidationError(mapa) => Some(json!(mapa)),
            _ => None,
        };

        ApiError {
            status,
            error: i18n::mensagem(locale, self.codigo()).to_string(),
            details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => Json(json!({ "error": self.error, "details": details })),
            None => Json(json!({ "error": self.error })),
        };
        (self.status, body).into_response()
    }
}

// O middleware de autenticação devolve AppError diretamente; sem um
// `Locale` extraído, a resposta usa o idioma padrão.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::padrao()).into_response()
    }
}
