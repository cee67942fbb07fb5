// src/models/ponto.rs
//
// Registro de ponto de uma jornada: batidas de entrada/saída, pausas e o
// resultado do cálculo de status/saldo. A derivação do estado da jornada
// é pura para ser compartilhada entre o servidor e o terminal de campo.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_batida", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusBatida {
    Pontual,
    Atrasado,
    Antecipado,
    HoraExtra,
}

// Amostra de geolocalização exigida em toda batida (política fail-closed:
// sem localização, nenhum ponto é gravado).
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct Localizacao {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    pub precisao: Option<f64>,
}

impl Localizacao {
    pub fn como_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Pausa {
    pub id: Uuid,
    pub ponto_id: Uuid,
    pub inicio_hora: DateTime<Utc>,
    pub fim_hora: Option<DateTime<Utc>>,
    #[schema(value_type = Object)]
    pub inicio_loc: Value,
    #[schema(value_type = Object)]
    pub fim_loc: Option<Value>,
    pub km: Option<Decimal>,
}

impl Pausa {
    pub fn aberta(&self) -> bool {
        self.fim_hora.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct RegistroPonto {
    pub id: Uuid,
    pub usuario_id: Uuid,
    pub vinculo_id: Uuid,
    pub entrada_hora: DateTime<Utc>,
    pub saida_hora: Option<DateTime<Utc>>,
    #[schema(value_type = Object)]
    pub entrada_loc: Value,
    #[schema(value_type = Object)]
    pub saida_loc: Option<Value>,
    pub status_entrada: Option<StatusBatida>,
    pub status_saida: Option<StatusBatida>,
    pub saldo_minutos: Option<i32>,
    #[schema(value_type = Object)]
    pub detalhes_calculo: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    // Carregadas em consulta separada; não é uma coluna.
    #[sqlx(skip)]
    #[serde(default)]
    pub pausas: Vec<Pausa>,
}

impl RegistroPonto {
    pub fn pausa_aberta(&self) -> Option<&Pausa> {
        self.pausas.iter().find(|p| p.aberta())
    }

    pub fn em_aberto(&self) -> bool {
        self.saida_hora.is_none()
    }
}

// --- Resultado do cálculo (gravado em detalhes_calculo) ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DetalheBatida {
    pub status: StatusBatida,
    pub diferenca_minutos: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResumoCalculo {
    pub previsto_minutos: i32,
    pub trabalhado_minutos: i32,
    pub pausas_minutos: i32,
    pub saldo_minutos: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DetalhesCalculo {
    pub entrada: DetalheBatida,
    pub saida: DetalheBatida,
    pub resumo: ResumoCalculo,
}

// --- Estado da jornada ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EstadoJornada {
    Ocioso,
    Trabalhando,
    EmPausa,
}

impl EstadoJornada {
    /// Deriva o estado a partir do registro do dia: sem registro ou com
    /// saída batida -> ocioso; pausa em aberto -> em pausa; senão,
    /// trabalhando.
    pub fn derivar(registro: Option<&RegistroPonto>) -> Self {
        match registro {
            None => EstadoJornada::Ocioso,
            Some(r) if r.saida_hora.is_some() => EstadoJornada::Ocioso,
            Some(r) if r.pausa_aberta().is_some() => EstadoJornada::EmPausa,
            Some(_) => EstadoJornada::Trabalhando,
        }
    }
}

// Resposta de GET /api/pontos/hoje, consumida tal qual pelo terminal.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PontoHoje {
    pub estado: EstadoJornada,
    pub registro: Option<RegistroPonto>,
}

// --- Payloads ---

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct TogglePayload {
    pub usuario_id: Uuid,
    #[validate(nested)]
    pub localizacao: Localizacao,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct PausaInicioPayload {
    pub ponto_id: Uuid,
    #[validate(nested)]
    pub localizacao: Localizacao,
    pub km: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct PausaFimPayload {
    pub id: Uuid,
    #[validate(nested)]
    pub localizacao: Localizacao,
    pub km: Option<Decimal>,
}

// Correção manual de um registro pela administração.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CorrecaoPayload {
    pub entrada_hora: Option<DateTime<Utc>>,
    pub saida_hora: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn registro_base() -> RegistroPonto {
        let entrada = Utc.with_ymd_and_hms(2025, 6, 2, 11, 0, 0).unwrap();
        RegistroPonto {
            id: Uuid::new_v4(),
            usuario_id: Uuid::new_v4(),
            vinculo_id: Uuid::new_v4(),
            entrada_hora: entrada,
            saida_hora: None,
            entrada_loc: serde_json::json!({"latitude": -23.6, "longitude": -46.8}),
            saida_loc: None,
            status_entrada: None,
            status_saida: None,
            saldo_minutos: None,
            detalhes_calculo: None,
            created_at: entrada,
            updated_at: entrada,
            pausas: vec![],
        }
    }

    fn pausa(ponto_id: Uuid, aberta: bool) -> Pausa {
        let inicio = Utc.with_ymd_and_hms(2025, 6, 2, 13, 0, 0).unwrap();
        Pausa {
            id: Uuid::new_v4(),
            ponto_id,
            inicio_hora: inicio,
            fim_hora: (!aberta).then(|| inicio + chrono::Duration::minutes(30)),
            inicio_loc: serde_json::json!({"latitude": -23.6, "longitude": -46.8}),
            fim_loc: None,
            km: None,
        }
    }

    #[test]
    fn sem_registro_fica_ocioso() {
        assert_eq!(EstadoJornada::derivar(None), EstadoJornada::Ocioso);
    }

    #[test]
    fn pausa_aberta_deixa_em_pausa() {
        let mut registro = registro_base();
        registro.pausas.push(pausa(registro.id, true));
        assert_eq!(
            EstadoJornada::derivar(Some(&registro)),
            EstadoJornada::EmPausa
        );
    }

    #[test]
    fn pausa_encerrada_volta_a_trabalhando() {
        let mut registro = registro_base();
        registro.pausas.push(pausa(registro.id, false));
        assert_eq!(
            EstadoJornada::derivar(Some(&registro)),
            EstadoJornada::Trabalhando
        );
    }

    #[test]
    fn saida_batida_fica_ocioso_mesmo_com_pausa_aberta() {
        let mut registro = registro_base();
        registro.saida_hora = Some(registro.entrada_hora + chrono::Duration::hours(8));
        registro.pausas.push(pausa(registro.id, true));
        assert_eq!(
            EstadoJornada::derivar(Some(&registro)),
            EstadoJornada::Ocioso
        );
    }
}
