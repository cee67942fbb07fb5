// src/models/filtros.rs
//
// Estado reutilizável dos filtros de listagem. O mesmo tipo é o extrator
// `Query` das rotas de listagem no servidor e o construtor de query string
// no cliente, então a forma canônica vale nas duas direções: valores
// iguais à sentinela "todos" (ou vazios) nunca aparecem na URL.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::IntoParams;
use uuid::Uuid;

pub const SENTINELA_TODOS: &str = "todos";

// Envelope das listagens paginadas.
#[derive(Debug, Serialize, Deserialize)]
pub struct Pagina<T> {
    pub itens: Vec<T>,
    pub total: i64,
    pub pagina: u32,
}

impl<T> Pagina<T> {
    pub fn nova(itens: Vec<T>, total: i64, filtros: &Filtros) -> Self {
        Self {
            itens,
            total,
            pagina: filtros.pagina.unwrap_or(1).max(1),
        }
    }
}

fn texto_ou_todos<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let valor = Option::<String>::deserialize(deserializer)?;
    Ok(valor.filter(|v| !v.is_empty() && v != SENTINELA_TODOS))
}

fn numero_ou_todos<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let valor = Option::<String>::deserialize(deserializer)?;
    match valor.as_deref() {
        None | Some("") => Ok(None),
        Some(v) if v == SENTINELA_TODOS => Ok(None),
        Some(v) => v.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

fn uuid_ou_todos<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let valor = Option::<String>::deserialize(deserializer)?;
    match valor.as_deref() {
        None | Some("") => Ok(None),
        Some(v) if v == SENTINELA_TODOS => Ok(None),
        Some(v) => Uuid::parse_str(v).map(Some).map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Filtros {
    #[serde(default, deserialize_with = "texto_ou_todos", skip_serializing_if = "Option::is_none")]
    pub busca: Option<String>,
    #[serde(default, deserialize_with = "texto_ou_todos", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "texto_ou_todos", skip_serializing_if = "Option::is_none")]
    pub periodo: Option<String>,
    #[serde(default, deserialize_with = "numero_ou_todos", skip_serializing_if = "Option::is_none")]
    pub mes: Option<u32>,
    #[serde(default, deserialize_with = "numero_ou_todos", skip_serializing_if = "Option::is_none")]
    pub ano: Option<u32>,
    #[serde(default, deserialize_with = "texto_ou_todos", skip_serializing_if = "Option::is_none")]
    pub categoria: Option<String>,
    #[serde(default, deserialize_with = "uuid_ou_todos", skip_serializing_if = "Option::is_none")]
    pub cliente_id: Option<Uuid>,
    #[serde(default, deserialize_with = "uuid_ou_todos", skip_serializing_if = "Option::is_none")]
    pub empresa_id: Option<Uuid>,
    #[serde(default, deserialize_with = "uuid_ou_todos", skip_serializing_if = "Option::is_none")]
    pub usuario_id: Option<Uuid>,
    #[serde(default, deserialize_with = "texto_ou_todos", skip_serializing_if = "Option::is_none")]
    pub status_entrada: Option<String>,
    #[serde(default, deserialize_with = "texto_ou_todos", skip_serializing_if = "Option::is_none")]
    pub status_saida: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagina: Option<u32>,
}

fn normalizar(valor: impl Into<String>) -> Option<String> {
    let valor = valor.into();
    if valor.is_empty() || valor == SENTINELA_TODOS {
        None
    } else {
        Some(valor)
    }
}

impl Filtros {
    pub fn set_busca(&mut self, valor: impl Into<String>) {
        self.busca = normalizar(valor);
        self.pagina = None;
    }

    pub fn set_status(&mut self, valor: impl Into<String>) {
        self.status = normalizar(valor);
        self.pagina = None;
    }

    pub fn set_periodo(&mut self, valor: impl Into<String>) {
        self.periodo = normalizar(valor);
        self.pagina = None;
    }

    pub fn set_mes(&mut self, valor: Option<u32>) {
        self.mes = valor;
        self.pagina = None;
    }

    pub fn set_ano(&mut self, valor: Option<u32>) {
        self.ano = valor;
        self.pagina = None;
    }

    pub fn set_categoria(&mut self, valor: impl Into<String>) {
        self.categoria = normalizar(valor);
        self.pagina = None;
    }

    pub fn set_cliente(&mut self, valor: Option<Uuid>) {
        self.cliente_id = valor;
        self.pagina = None;
    }

    pub fn set_empresa(&mut self, valor: Option<Uuid>) {
        self.empresa_id = valor;
        self.pagina = None;
    }

    pub fn set_usuario(&mut self, valor: Option<Uuid>) {
        self.usuario_id = valor;
        self.pagina = None;
    }

    pub fn set_status_entrada(&mut self, valor: impl Into<String>) {
        self.status_entrada = normalizar(valor);
        self.pagina = None;
    }

    pub fn set_status_saida(&mut self, valor: impl Into<String>) {
        self.status_saida = normalizar(valor);
        self.pagina = None;
    }

    pub fn set_pagina(&mut self, valor: Option<u32>) {
        self.pagina = valor;
    }

    /// Aplicação em lote: a folha de filtros mobile coleta o estado inteiro
    /// e descarrega de uma vez. A página volta ao início.
    pub fn aplicar(&mut self, lote: Filtros) {
        *self = Filtros {
            pagina: None,
            ..lote
        };
    }

    pub fn limpar(&mut self) {
        *self = Filtros::default();
    }

    /// Compara cada campo acompanhado contra o seu padrão neutro.
    pub fn tem_filtros_ativos(&self) -> bool {
        self.busca.is_some()
            || self.status.is_some()
            || self.periodo.is_some()
            || self.mes.is_some()
            || self.ano.is_some()
            || self.categoria.is_some()
            || self.cliente_id.is_some()
            || self.empresa_id.is_some()
            || self.usuario_id.is_some()
            || self.status_entrada.is_some()
            || self.status_saida.is_some()
    }

    /// Query string canônica: só campos ativos, sem sentinelas.
    pub fn query_string(&self) -> String {
        serde_html_form::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_ativo_aparece_na_query() {
        let mut filtros = Filtros::default();
        filtros.set_status("ativo");
        assert!(filtros.query_string().contains("status=ativo"));
    }

    #[test]
    fn sentinela_todos_remove_a_chave() {
        let mut filtros = Filtros::default();
        filtros.set_status("ativo");
        filtros.set_status(SENTINELA_TODOS);
        assert!(!filtros.query_string().contains("status"));
        assert_eq!(filtros.query_string(), "");
    }

    #[test]
    fn desserializacao_normaliza_sentinelas() {
        let filtros: Filtros =
            serde_html_form::from_str("status=todos&busca=&mes=6&periodo=semana").unwrap();
        assert_eq!(filtros.status, None);
        assert_eq!(filtros.busca, None);
        assert_eq!(filtros.mes, Some(6));
        assert_eq!(filtros.periodo.as_deref(), Some("semana"));
    }

    #[test]
    fn ida_e_volta_preserva_campos_ativos() {
        let mut filtros = Filtros::default();
        filtros.set_status("ativo");
        filtros.set_mes(Some(6));
        filtros.set_usuario(Some(Uuid::new_v4()));

        let reparsed: Filtros = serde_html_form::from_str(&filtros.query_string()).unwrap();
        assert_eq!(reparsed, filtros);
    }

    #[test]
    fn aplicar_em_lote_substitui_e_zera_pagina() {
        let mut filtros = Filtros::default();
        filtros.set_status("ativo");
        filtros.set_pagina(Some(4));

        let mut lote = Filtros::default();
        lote.set_periodo("mes");
        filtros.aplicar(lote);

        assert_eq!(filtros.status, None);
        assert_eq!(filtros.periodo.as_deref(), Some("mes"));
        assert_eq!(filtros.pagina, None);
    }

    #[test]
    fn limpar_volta_ao_padrao() {
        let mut filtros = Filtros::default();
        filtros.set_busca("joão");
        filtros.set_status("inativo");
        assert!(filtros.tem_filtros_ativos());

        filtros.limpar();
        assert!(!filtros.tem_filtros_ativos());
        assert_eq!(filtros, Filtros::default());
    }

    #[test]
    fn pagina_nao_conta_como_filtro_ativo() {
        let mut filtros = Filtros::default();
        filtros.set_pagina(Some(3));
        assert!(!filtros.tem_filtros_ativos());
    }
}
