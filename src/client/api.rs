// src/client/api.rs
//
// Cliente autenticado da API. A sessão é um objeto injetado (nada de
// globais de módulo): célula de tokens atrás de um RwLock mais um
// memoizador do refresh — um 401 dispara UMA renovação e os concorrentes
// reaproveitam o resultado pela geração da sessão.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::models::auth::ParTokens;
use crate::models::filtros::Filtros;
use crate::models::ponto::{Localizacao, Pausa, PontoHoje, RegistroPonto};
use crate::models::usuario::Usuario;

#[derive(Debug, Error)]
pub enum ClienteErro {
    #[error("falha de transporte: {0}")]
    Transporte(String),

    #[error("nenhuma sessão ativa")]
    SemSessao,

    #[error("sessão expirada")]
    SessaoExpirada,

    #[error("resposta {status}: {mensagem}")]
    Http { status: u16, mensagem: String },

    #[error("resposta fora do formato esperado: {0}")]
    Decodificacao(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metodo {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

#[derive(Debug, Clone)]
pub struct Requisicao {
    pub metodo: Metodo,
    pub caminho: String,
    pub corpo: Option<Value>,
    pub bearer: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Resposta {
    pub status: u16,
    pub corpo: Value,
}

impl Resposta {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transporte: Send + Sync {
    async fn executar(&self, requisicao: Requisicao) -> Result<Resposta, ClienteErro>;
}

// Estado da sessão: sem-sessão -> sessão -> (401) -> renovando ->
// sessão | encerrada. A geração cresce a cada par de tokens novo.
struct Sessao {
    tokens: RwLock<Option<ParTokens>>,
    geracao: AtomicU64,
    renovacao: Mutex<()>,
}

pub struct ApiCliente {
    transporte: Arc<dyn Transporte>,
    sessao: Sessao,
}

impl ApiCliente {
    pub fn new(transporte: Arc<dyn Transporte>) -> Self {
        Self {
            transporte,
            sessao: Sessao {
                tokens: RwLock::new(None),
                geracao: AtomicU64::new(0),
                renovacao: Mutex::new(()),
            },
        }
    }

    pub async fn sessao_ativa(&self) -> bool {
        self.sessao.tokens.read().await.is_some()
    }

    pub async fn sair(&self) {
        *self.sessao.tokens.write().await = None;
    }

    pub async fn login(&self, cpf: &str, senha: &str) -> Result<(), ClienteErro> {
        let resposta = self
            .transporte
            .executar(Requisicao {
                metodo: Metodo::Post,
                caminho: "/api/auth/login".to_string(),
                corpo: Some(json!({ "cpf": cpf, "senha": senha })),
                bearer: None,
            })
            .await?;

        if !resposta.ok() {
            return Err(erro_http(resposta));
        }

        let par: ParTokens = serde_json::from_value(resposta.corpo)?;
        *self.sessao.tokens.write().await = Some(par);
        self.sessao.geracao.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    /// Executa uma chamada autenticada. Um 401 dispara a renovação
    /// compartilhada e UMA repetição; se a repetição também falhar em
    /// 401, a sessão é derrubada.
    pub async fn requisitar(
        &self,
        metodo: Metodo,
        caminho: &str,
        corpo: Option<Value>,
    ) -> Result<Value, ClienteErro> {
        let (access, geracao) = self.access_atual().await?;

        let resposta = self
            .transporte
            .executar(Requisicao {
                metodo,
                caminho: caminho.to_string(),
                corpo: corpo.clone(),
                bearer: Some(access),
            })
            .await?;

        if resposta.status != 401 {
            return materializar(resposta);
        }

        let access = self.renovar(geracao).await?;

        let resposta = self
            .transporte
            .executar(Requisicao {
                metodo,
                caminho: caminho.to_string(),
                corpo,
                bearer: Some(access),
            })
            .await?;

        if resposta.status == 401 {
            self.sair().await;
            return Err(ClienteErro::SessaoExpirada);
        }

        materializar(resposta)
    }

    async fn access_atual(&self) -> Result<(String, u64), ClienteErro> {
        let tokens = self.sessao.tokens.read().await;
        let par = tokens.as_ref().ok_or(ClienteErro::SemSessao)?;
        Ok((
            par.access_token.clone(),
            self.sessao.geracao.load(Ordering::Acquire),
        ))
    }

    // Renovação single-flight: quem chega primeiro renova; quem esperou o
    // cadeado confere a geração e reaproveita o par novo sem repetir a
    // chamada de refresh.
    async fn renovar(&self, geracao_vista: u64) -> Result<String, ClienteErro> {
        let _guarda = self.sessao.renovacao.lock().await;

        if self.sessao.geracao.load(Ordering::Acquire) != geracao_vista {
            return self.access_atual().await.map(|(access, _)| access);
        }

        let refresh_token = {
            let tokens = self.sessao.tokens.read().await;
            tokens
                .as_ref()
                .map(|par| par.refresh_token.clone())
                .ok_or(ClienteErro::SemSessao)?
        };

        let resposta = self
            .transporte
            .executar(Requisicao {
                metodo: Metodo::Post,
                caminho: "/api/auth/refresh".to_string(),
                corpo: Some(json!({ "refresh_token": refresh_token })),
                bearer: None,
            })
            .await?;

        if !resposta.ok() {
            // Refresh recusado: a sessão inteira cai.
            self.sair().await;
            return Err(ClienteErro::SessaoExpirada);
        }

        let par: ParTokens = serde_json::from_value(resposta.corpo)?;
        let access = par.access_token.clone();
        *self.sessao.tokens.write().await = Some(par);
        self.sessao.geracao.fetch_add(1, Ordering::AcqRel);

        Ok(access)
    }

    // --- Chamadas tipadas usadas pelo terminal ---

    pub async fn me(&self) -> Result<Usuario, ClienteErro> {
        let corpo = self.requisitar(Metodo::Get, "/api/auth/me", None).await?;
        Ok(serde_json::from_value(corpo)?)
    }

    pub async fn ponto_hoje(&self, usuario_id: Uuid) -> Result<PontoHoje, ClienteErro> {
        let corpo = self
            .requisitar(
                Metodo::Get,
                &format!("/api/pontos/hoje?usuario_id={usuario_id}"),
                None,
            )
            .await?;
        Ok(serde_json::from_value(corpo)?)
    }

    pub async fn ponto_toggle(
        &self,
        usuario_id: Uuid,
        localizacao: &Localizacao,
    ) -> Result<RegistroPonto, ClienteErro> {
        let corpo = self
            .requisitar(
                Metodo::Post,
                "/api/pontos/toggle",
                Some(json!({ "usuario_id": usuario_id, "localizacao": localizacao })),
            )
            .await?;
        Ok(serde_json::from_value(corpo)?)
    }

    pub async fn pausa_inicio(
        &self,
        ponto_id: Uuid,
        localizacao: &Localizacao,
    ) -> Result<Pausa, ClienteErro> {
        let corpo = self
            .requisitar(
                Metodo::Post,
                "/api/pontos/pausa/inicio",
                Some(json!({ "ponto_id": ponto_id, "localizacao": localizacao })),
            )
            .await?;
        Ok(serde_json::from_value(corpo)?)
    }

    pub async fn pausa_fim(
        &self,
        pausa_id: Uuid,
        localizacao: &Localizacao,
    ) -> Result<Pausa, ClienteErro> {
        let corpo = self
            .requisitar(
                Metodo::Post,
                "/api/pontos/pausa/fim",
                Some(json!({ "id": pausa_id, "localizacao": localizacao })),
            )
            .await?;
        Ok(serde_json::from_value(corpo)?)
    }

    /// Listagem administrativa com a query string canônica dos filtros.
    pub async fn listar_registros(&self, filtros: &Filtros) -> Result<Value, ClienteErro> {
        let query = filtros.query_string();
        let caminho = if query.is_empty() {
            "/api/registros-ponto".to_string()
        } else {
            format!("/api/registros-ponto?{query}")
        };
        self.requisitar(Metodo::Get, &caminho, None).await
    }
}

fn materializar(resposta: Resposta) -> Result<Value, ClienteErro> {
    if resposta.ok() {
        Ok(resposta.corpo)
    } else {
        Err(erro_http(resposta))
    }
}

fn erro_http(resposta: Resposta) -> ClienteErro {
    let mensagem = resposta
        .corpo
        .get("error")
        .and_then(|v| v.as_str())
        .unwrap_or("erro desconhecido")
        .to_string();
    ClienteErro::Http {
        status: resposta.status,
        mensagem,
    }
}
