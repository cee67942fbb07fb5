// src/client/http.rs

use async_trait::async_trait;
use serde_json::Value;

use crate::client::api::{ClienteErro, Metodo, Requisicao, Resposta, Transporte};

// Transporte real sobre reqwest. `base_url` vem de EMBU_API_URL
// (padrão http://localhost:3000).
pub struct TransporteReqwest {
    http: reqwest::Client,
    base_url: String,
}

impl TransporteReqwest {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Transporte for TransporteReqwest {
    async fn executar(&self, requisicao: Requisicao) -> Result<Resposta, ClienteErro> {
        let url = format!("{}{}", self.base_url, requisicao.caminho);

        let mut builder = match requisicao.metodo {
            Metodo::Get => self.http.get(&url),
            Metodo::Post => self.http.post(&url),
            Metodo::Put => self.http.put(&url),
            Metodo::Patch => self.http.patch(&url),
            Metodo::Delete => self.http.delete(&url),
        };

        if let Some(bearer) = &requisicao.bearer {
            builder = builder.bearer_auth(bearer);
        }
        if let Some(corpo) = &requisicao.corpo {
            builder = builder.json(corpo);
        }

        let resposta = builder
            .send()
            .await
            .map_err(|e| ClienteErro::Transporte(e.to_string()))?;

        let status = resposta.status().as_u16();
        let texto = resposta
            .text()
            .await
            .map_err(|e| ClienteErro::Transporte(e.to_string()))?;

        // 204 e afins chegam sem corpo
        let corpo = if texto.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&texto).unwrap_or(Value::Null)
        };

        Ok(Resposta { status, corpo })
    }
}
