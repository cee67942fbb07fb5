use crate::middleware::i18n::Locale;

// Catálogo de mensagens voltadas ao usuário final. O padrão do sistema é
// pt; "en" existe para integrações externas.
pub fn mensagem(locale: &Locale, codigo: &str) -> &'static str {
    match locale.0.as_str() {
        "en" => mensagem_en(codigo),
        _ => mensagem_pt(codigo),
    }
}

fn mensagem_pt(codigo: &str) -> &'static str {
    match codigo {
        "validation" => "Um ou mais campos são inválidos.",
        "email_exists" => "Este e-mail já está em uso.",
        "cpf_exists" => "Este CPF já está cadastrado.",
        "cnpj_exists" => "Este CNPJ já está cadastrado.",
        "invalid_credentials" => "CPF ou senha inválidos.",
        "invalid_token" => "Token de autenticação inválido ou ausente.",
        "invalid_refresh" => "Sessão expirada. Faça login novamente.",
        "inactive_user" => "Usuário inativo. Procure o administrador.",
        "pending_user" => "Cadastro aguardando aprovação.",
        "user_not_found" => "Usuário não encontrado.",
        "not_found" => "Recurso não encontrado.",
        "self_operation" => "Você não pode desativar ou excluir a própria conta.",
        "insufficient_role" => "Seu perfil não permite realizar esta ação.",
        "no_open_shift" => "Nenhuma jornada em aberto.",
        "open_pause_exists" => "Já existe uma pausa em aberto.",
        "no_open_pause" => "Nenhuma pausa em aberto.",
        "pause_still_open" => "Finalize a pausa antes de encerrar a jornada.",
        "no_active_vinculo" => "O colaborador não possui vínculo ativo.",
        _ => "Ocorreu um erro inesperado.",
    }
}

fn mensagem_en(codigo: &str) -> &'static str {
    match codigo {
        "validation" => "One or more fields are invalid.",
        "email_exists" => "This e-mail is already in use.",
        "cpf_exists" => "This CPF is already registered.",
        "cnpj_exists" => "This CNPJ is already registered.",
        "invalid_credentials" => "Invalid CPF or password.",
        "invalid_token" => "Missing or invalid authentication token.",
        "invalid_refresh" => "Session expired. Please sign in again.",
        "inactive_user" => "Inactive user. Contact the administrator.",
        "pending_user" => "Registration pending approval.",
        "user_not_found" => "User not found.",
        "not_found" => "Resource not found.",
        "self_operation" => "You cannot deactivate or delete your own account.",
        "insufficient_role" => "Your role does not allow this action.",
        "no_open_shift" => "No open shift.",
        "open_pause_exists" => "There is already an open pause.",
        "no_open_pause" => "No open pause.",
        "pause_still_open" => "Finish the open pause before closing the shift.",
        "no_active_vinculo" => "The collaborator has no active work link.",
        _ => "An unexpected error occurred.",
    }
}
