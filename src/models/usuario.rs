// src/models/usuario.rs

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::documento;
use crate::common::error::AppError;
use crate::models::vinculo::TurnoPayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_usuario", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusUsuario {
    Ativo,
    Inativo,
    Pendente,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Perfil {
    pub id: Uuid,
    pub nome: String,
}

// Os três perfis que o sistema conhece. Qualquer linha nova na tabela
// `perfis` precisa de um braço aqui — os matches são exaustivos de propósito.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerfilKind {
    Admin,
    Escritorio,
    Motoboy,
}

impl PerfilKind {
    pub fn from_nome(nome: &str) -> Option<Self> {
        match nome {
            "admin" => Some(PerfilKind::Admin),
            "escritorio" => Some(PerfilKind::Escritorio),
            "motoboy" => Some(PerfilKind::Motoboy),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PerfilKind::Admin => "admin",
            PerfilKind::Escritorio => "escritorio",
            PerfilKind::Motoboy => "motoboy",
        }
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Usuario {
    pub id: Uuid,
    pub nome_completo: String,
    pub email: String,
    pub cpf: String,

    #[serde(skip_serializing, default)] // IMPORTANTE para segurança
    pub senha_hash: String,

    pub perfil_id: Uuid,
    pub status: StatusUsuario,
    pub senha_padrao: bool,

    pub telefone: Option<String>,
    pub data_nascimento: Option<NaiveDate>,
    #[schema(value_type = Object)]
    pub endereco: Option<Value>,

    // Bloco preenchido apenas para o perfil motoboy
    pub cnh_registro: Option<String>,
    pub cnh_categoria: Option<String>,
    pub cnh_validade: Option<NaiveDate>,
    pub moto_placa: Option<String>,
    pub moto_modelo: Option<String>,
    pub moto_ano: Option<i32>,
    pub mei_cnpj: Option<String>,
    pub chave_pix: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Usuário autenticado carregado pelo middleware, já com o slug do perfil
// resolvido. É o que os guards de rota consultam.
#[derive(Debug, Clone)]
pub struct UsuarioAutenticado {
    pub usuario: Usuario,
    pub perfil: String,
}

// --- Modelo de domínio discriminado ---
//
// O formulário chega com todos os campos opcionais; aqui ele é rebaixado
// para um tipo soma. Um valor `Motoboy` não existe sem CNH, moto e PIX.

#[derive(Debug, Clone, PartialEq)]
pub struct DadosMotoboy {
    pub cnh_registro: String,
    pub cnh_categoria: String,
    pub cnh_validade: NaiveDate,
    pub moto_placa: String,
    pub moto_modelo: String,
    pub moto_ano: Option<i32>,
    pub mei_cnpj: Option<String>,
    pub chave_pix: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DadosPerfil {
    Motoboy(DadosMotoboy),
    Padrao,
}

// Bundle dos campos condicionais como chegam do formulário.
#[derive(Debug, Clone, Default)]
pub struct CamposMotoboy {
    pub cnh_registro: Option<String>,
    pub cnh_categoria: Option<String>,
    pub cnh_validade: Option<NaiveDate>,
    pub moto_placa: Option<String>,
    pub moto_modelo: Option<String>,
    pub moto_ano: Option<i32>,
    pub mei_cnpj: Option<String>,
    pub chave_pix: Option<String>,
}

impl DadosPerfil {
    /// Rebaixa os campos do formulário para o tipo soma, exigindo o bloco
    /// completo quando o perfil é motoboy. Faltas voltam como mapa
    /// campo -> código.
    pub fn montar(kind: PerfilKind, campos: CamposMotoboy) -> Result<DadosPerfil, AppError> {
        match kind {
            PerfilKind::Admin | PerfilKind::Escritorio => Ok(DadosPerfil::Padrao),
            PerfilKind::Motoboy => {
                let mut erros: HashMap<String, String> = HashMap::new();

                let obrigatorio = |campo: Option<String>,
                                   nome: &str,
                                   erros: &mut HashMap<String, String>|
                 -> Option<String> {
                    match campo.filter(|v| !v.trim().is_empty()) {
                        Some(v) => Some(v),
                        None => {
                            erros.insert(nome.to_string(), "required".to_string());
                            None
                        }
                    }
                };

                let cnh_registro = obrigatorio(campos.cnh_registro, "cnh_registro", &mut erros);
                let cnh_categoria = obrigatorio(campos.cnh_categoria, "cnh_categoria", &mut erros);
                let moto_placa = obrigatorio(campos.moto_placa, "moto_placa", &mut erros);
                let moto_modelo = obrigatorio(campos.moto_modelo, "moto_modelo", &mut erros);
                let chave_pix = obrigatorio(campos.chave_pix, "chave_pix", &mut erros);

                let cnh_validade = match campos.cnh_validade {
                    Some(data) => Some(data),
                    None => {
                        erros.insert("cnh_validade".to_string(), "required".to_string());
                        None
                    }
                };

                let mei_cnpj = match campos.mei_cnpj.filter(|v| !v.trim().is_empty()) {
                    Some(cnpj) if !documento::validar_cnpj(&cnpj) => {
                        erros.insert("mei_cnpj".to_string(), "cnpj_invalido".to_string());
                        None
                    }
                    outro => outro,
                };

                if !erros.is_empty() {
                    return Err(AppError::FieldValidationError(erros));
                }

                Ok(DadosPerfil::Motoboy(DadosMotoboy {
                    cnh_registro: cnh_registro.unwrap(),
                    cnh_categoria: cnh_categoria.unwrap(),
                    cnh_validade: cnh_validade.unwrap(),
                    moto_placa: moto_placa.unwrap(),
                    moto_modelo: moto_modelo.unwrap(),
                    moto_ano: campos.moto_ano,
                    mei_cnpj,
                    chave_pix: chave_pix.unwrap(),
                }))
            }
        }
    }
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUsuarioPayload {
    #[validate(length(min = 3, message = "O nome deve ter no mínimo 3 caracteres."))]
    pub nome_completo: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(custom(function = documento::cpf_valido))]
    pub cpf: String,
    // Sem senha o serviço provisiona a padrão e liga `senha_padrao`.
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub senha: Option<String>,
    pub perfil_id: Uuid,
    pub telefone: Option<String>,
    pub data_nascimento: Option<NaiveDate>,
    #[schema(value_type = Object)]
    pub endereco: Option<Value>,

    pub cnh_registro: Option<String>,
    pub cnh_categoria: Option<String>,
    pub cnh_validade: Option<NaiveDate>,
    pub moto_placa: Option<String>,
    pub moto_modelo: Option<String>,
    pub moto_ano: Option<i32>,
    pub mei_cnpj: Option<String>,
    pub chave_pix: Option<String>,

    #[serde(default)]
    pub turnos: Vec<TurnoPayload>,
}

impl CreateUsuarioPayload {
    pub fn campos_motoboy(&self) -> CamposMotoboy {
        CamposMotoboy {
            cnh_registro: self.cnh_registro.clone(),
            cnh_categoria: self.cnh_categoria.clone(),
            cnh_validade: self.cnh_validade,
            moto_placa: self.moto_placa.clone(),
            moto_modelo: self.moto_modelo.clone(),
            moto_ano: self.moto_ano,
            mei_cnpj: self.mei_cnpj.clone(),
            chave_pix: self.chave_pix.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUsuarioPayload {
    #[validate(length(min = 3, message = "O nome deve ter no mínimo 3 caracteres."))]
    pub nome_completo: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    pub perfil_id: Uuid,
    pub telefone: Option<String>,
    pub data_nascimento: Option<NaiveDate>,
    #[schema(value_type = Object)]
    pub endereco: Option<Value>,

    pub cnh_registro: Option<String>,
    pub cnh_categoria: Option<String>,
    pub cnh_validade: Option<NaiveDate>,
    pub moto_placa: Option<String>,
    pub moto_modelo: Option<String>,
    pub moto_ano: Option<i32>,
    pub mei_cnpj: Option<String>,
    pub chave_pix: Option<String>,

    #[serde(default)]
    pub turnos: Vec<TurnoPayload>,
}

impl UpdateUsuarioPayload {
    pub fn campos_motoboy(&self) -> CamposMotoboy {
        CamposMotoboy {
            cnh_registro: self.cnh_registro.clone(),
            cnh_categoria: self.cnh_categoria.clone(),
            cnh_validade: self.cnh_validade,
            moto_placa: self.moto_placa.clone(),
            moto_modelo: self.moto_modelo.clone(),
            moto_ano: self.moto_ano,
            mei_cnpj: self.mei_cnpj.clone(),
            chave_pix: self.chave_pix.clone(),
        }
    }
}

// Autocadastro do motoboy em campo: sempre nasce PENDENTE.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterPayload {
    #[validate(length(min = 3, message = "O nome deve ter no mínimo 3 caracteres."))]
    pub nome_completo: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(custom(function = documento::cpf_valido))]
    pub cpf: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub senha: String,
    pub telefone: Option<String>,
    pub data_nascimento: Option<NaiveDate>,
    #[schema(value_type = Object)]
    pub endereco: Option<Value>,

    pub cnh_registro: Option<String>,
    pub cnh_categoria: Option<String>,
    pub cnh_validade: Option<NaiveDate>,
    pub moto_placa: Option<String>,
    pub moto_modelo: Option<String>,
    pub moto_ano: Option<i32>,
    pub mei_cnpj: Option<String>,
    pub chave_pix: Option<String>,
}

impl RegisterPayload {
    pub fn campos_motoboy(&self) -> CamposMotoboy {
        CamposMotoboy {
            cnh_registro: self.cnh_registro.clone(),
            cnh_categoria: self.cnh_categoria.clone(),
            cnh_validade: self.cnh_validade,
            moto_placa: self.moto_placa.clone(),
            moto_modelo: self.moto_modelo.clone(),
            moto_ano: self.moto_ano,
            mei_cnpj: self.mei_cnpj.clone(),
            chave_pix: self.chave_pix.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StatusPayload {
    pub status: StatusUsuario,
}

// Detalhe devolvido por GET /usuarios/{id}: o cadastro com seus vínculos.
#[derive(Debug, Serialize, ToSchema)]
pub struct UsuarioDetalhe {
    #[serde(flatten)]
    pub usuario: Usuario,
    pub links: Vec<crate::models::vinculo::Vinculo>,
}

// Linha pronta para inserção, já com o bloco do perfil resolvido.
#[derive(Debug)]
pub struct NovoUsuario {
    pub nome_completo: String,
    pub email: String,
    pub cpf: String,
    pub senha_hash: String,
    pub perfil_id: Uuid,
    pub status: StatusUsuario,
    pub senha_padrao: bool,
    pub telefone: Option<String>,
    pub data_nascimento: Option<NaiveDate>,
    pub endereco: Option<Value>,
    pub dados: DadosPerfil,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campos_completos() -> CamposMotoboy {
        CamposMotoboy {
            cnh_registro: Some("12345678900".to_string()),
            cnh_categoria: Some("A".to_string()),
            cnh_validade: NaiveDate::from_ymd_opt(2027, 3, 1),
            moto_placa: Some("ABC1D23".to_string()),
            moto_modelo: Some("Honda CG 160".to_string()),
            moto_ano: Some(2022),
            mei_cnpj: Some("11.222.333/0001-81".to_string()),
            chave_pix: Some("pix@example.com".to_string()),
        }
    }

    #[test]
    fn motoboy_sem_cnh_falha() {
        let mut campos = campos_completos();
        campos.cnh_registro = None;
        let erro = DadosPerfil::montar(PerfilKind::Motoboy, campos).unwrap_err();
        match erro {
            AppError::FieldValidationError(mapa) => {
                assert_eq!(mapa.get("cnh_registro").unwrap(), "required");
            }
            outro => panic!("erro inesperado: {outro:?}"),
        }
    }

    #[test]
    fn mesmos_campos_em_perfil_padrao_passam() {
        let mut campos = campos_completos();
        campos.cnh_registro = None;
        campos.moto_placa = None;
        let dados = DadosPerfil::montar(PerfilKind::Escritorio, campos).unwrap();
        assert_eq!(dados, DadosPerfil::Padrao);
    }

    #[test]
    fn motoboy_completo_monta_o_bloco() {
        let dados = DadosPerfil::montar(PerfilKind::Motoboy, campos_completos()).unwrap();
        match dados {
            DadosPerfil::Motoboy(m) => {
                assert_eq!(m.moto_placa, "ABC1D23");
                assert_eq!(m.mei_cnpj.as_deref(), Some("11.222.333/0001-81"));
            }
            DadosPerfil::Padrao => panic!("esperava bloco motoboy"),
        }
    }

    #[test]
    fn campo_em_branco_conta_como_ausente() {
        let mut campos = campos_completos();
        campos.chave_pix = Some("   ".to_string());
        let erro = DadosPerfil::montar(PerfilKind::Motoboy, campos).unwrap_err();
        match erro {
            AppError::FieldValidationError(mapa) => {
                assert_eq!(mapa.get("chave_pix").unwrap(), "required");
            }
            outro => panic!("erro inesperado: {outro:?}"),
        }
    }

    #[test]
    fn mei_cnpj_invalido_e_reportado() {
        let mut campos = campos_completos();
        campos.mei_cnpj = Some("11.222.333/0001-99".to_string());
        let erro = DadosPerfil::montar(PerfilKind::Motoboy, campos).unwrap_err();
        match erro {
            AppError::FieldValidationError(mapa) => {
                assert_eq!(mapa.get("mei_cnpj").unwrap(), "cnpj_invalido");
            }
            outro => panic!("erro inesperado: {outro:?}"),
        }
    }
}
