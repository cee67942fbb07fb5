// src/models/vinculo.rs
//
// Vínculo ("turno"): a ligação colaborador x cliente x empresa com janela
// de horário e termos financeiros. A aritmética de intervalos vive aqui
// para que o serviço de usuários e o cálculo de ponto usem as mesmas regras.

use std::collections::HashMap;

use chrono::{DateTime, NaiveTime, Timelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

pub const MINUTOS_POR_DIA: u32 = 1440;
pub const DURACAO_MINIMA_MINUTOS: u32 = 60;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Vinculo {
    pub id: Uuid,
    pub usuario_id: Uuid,
    pub cliente_id: Uuid,
    pub empresa_id: Uuid,
    #[schema(value_type = String, example = "08:00:00")]
    pub hora_inicio: NaiveTime,
    #[schema(value_type = String, example = "18:00:00")]
    pub hora_fim: NaiveTime,
    pub valor_contrato: Decimal,
    pub valor_aluguel: Decimal,
    pub valor_bonus: Decimal,
    pub ajuda_custo: Decimal,
    pub mei: bool,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vinculo {
    pub fn janela(&self) -> JanelaTurno {
        JanelaTurno {
            inicio: self.hora_inicio.hour() * 60 + self.hora_inicio.minute(),
            fim: self.hora_fim.hour() * 60 + self.hora_fim.minute(),
        }
    }
}

// Um turno como payload de formulário, com horários "HH:MM".
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TurnoPayload {
    pub cliente_id: Uuid,
    pub empresa_id: Uuid,
    #[schema(example = "08:00")]
    pub hora_inicio: String,
    #[schema(example = "18:00")]
    pub hora_fim: String,
    #[serde(default)]
    pub valor_contrato: Decimal,
    #[serde(default)]
    pub valor_aluguel: Decimal,
    #[serde(default)]
    pub valor_bonus: Decimal,
    #[serde(default)]
    pub ajuda_custo: Decimal,
    #[serde(default)]
    pub mei: bool,
}

impl TurnoPayload {
    pub fn janela(&self) -> Option<JanelaTurno> {
        Some(JanelaTurno {
            inicio: minutos_do_horario(&self.hora_inicio)?,
            fim: minutos_do_horario(&self.hora_fim)?,
        })
    }

    pub fn hora_inicio_naive(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.hora_inicio, "%H:%M").ok()
    }

    pub fn hora_fim_naive(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.hora_fim, "%H:%M").ok()
    }
}

/// "HH:MM" -> minutos desde a meia-noite.
pub fn minutos_do_horario(horario: &str) -> Option<u32> {
    let hora = NaiveTime::parse_from_str(horario, "%H:%M").ok()?;
    Some(hora.hour() * 60 + hora.minute())
}

// Janela de um turno em minutos do dia. Turnos que viram a meia-noite têm
// `fim < inicio` e são tratados como dois segmentos: [inicio, 1440) e [0, fim).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JanelaTurno {
    pub inicio: u32,
    pub fim: u32,
}

impl JanelaTurno {
    pub fn vira_meia_noite(&self) -> bool {
        self.fim < self.inicio
    }

    pub fn duracao_minutos(&self) -> u32 {
        if self.vira_meia_noite() {
            (MINUTOS_POR_DIA - self.inicio) + self.fim
        } else {
            self.fim - self.inicio
        }
    }

    fn segmentos(&self) -> Vec<(u32, u32)> {
        if self.vira_meia_noite() {
            vec![(self.inicio, MINUTOS_POR_DIA), (0, self.fim)]
        } else {
            vec![(self.inicio, self.fim)]
        }
    }

    // Extremos encostados (fim1 == inicio2) não contam como conflito:
    // turnos consecutivos são uma configuração válida.
    pub fn sobrepoe(&self, outra: &JanelaTurno) -> bool {
        self.segmentos().iter().any(|(s1, e1)| {
            outra
                .segmentos()
                .iter()
                .any(|(s2, e2)| s1 < e2 && s2 < e1)
        })
    }
}

/// Valida o conjunto de turnos de um colaborador: horários bem formados,
/// duração mínima e ausência de sobreposição par a par. Violações voltam
/// como mapa `turnos[i]` -> código, apontando as duas linhas de um conflito.
pub fn validar_turnos(turnos: &[TurnoPayload]) -> Result<(), HashMap<String, String>> {
    let mut erros: HashMap<String, String> = HashMap::new();
    let mut janelas: Vec<Option<JanelaTurno>> = Vec::with_capacity(turnos.len());

    for (i, turno) in turnos.iter().enumerate() {
        match turno.janela() {
            None => {
                erros.insert(format!("turnos[{i}]"), "horario_invalido".to_string());
                janelas.push(None);
            }
            Some(janela) => {
                if janela.duracao_minutos() < DURACAO_MINIMA_MINUTOS {
                    erros.insert(format!("turnos[{i}]"), "duracao_minima".to_string());
                }
                janelas.push(Some(janela));
            }
        }
    }

    for i in 0..janelas.len() {
        for j in (i + 1)..janelas.len() {
            if let (Some(a), Some(b)) = (&janelas[i], &janelas[j]) {
                if a.sobrepoe(b) {
                    erros
                        .entry(format!("turnos[{i}]"))
                        .or_insert_with(|| "conflito_horario".to_string());
                    erros
                        .entry(format!("turnos[{j}]"))
                        .or_insert_with(|| "conflito_horario".to_string());
                }
            }
        }
    }

    if erros.is_empty() { Ok(()) } else { Err(erros) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turno(inicio: &str, fim: &str) -> TurnoPayload {
        TurnoPayload {
            cliente_id: Uuid::new_v4(),
            empresa_id: Uuid::new_v4(),
            hora_inicio: inicio.to_string(),
            hora_fim: fim.to_string(),
            valor_contrato: Decimal::ZERO,
            valor_aluguel: Decimal::ZERO,
            valor_bonus: Decimal::ZERO,
            ajuda_custo: Decimal::ZERO,
            mei: false,
        }
    }

    #[test]
    fn turnos_disjuntos_passam() {
        let turnos = vec![
            turno("08:00", "12:00"),
            turno("13:00", "18:00"),
            // Vira a meia-noite mas não toca nos anteriores
            turno("22:00", "06:00"),
        ];
        assert!(validar_turnos(&turnos).is_ok());
    }

    #[test]
    fn sobreposicao_marca_os_dois_indices() {
        let turnos = vec![turno("08:00", "12:00"), turno("11:00", "15:00")];
        let erros = validar_turnos(&turnos).unwrap_err();
        assert_eq!(erros.get("turnos[0]").unwrap(), "conflito_horario");
        assert_eq!(erros.get("turnos[1]").unwrap(), "conflito_horario");
    }

    #[test]
    fn turno_noturno_curto_falha_na_duracao_minima() {
        // 23:30 -> 00:15 = 45 minutos
        let turnos = vec![turno("23:30", "00:15")];
        let erros = validar_turnos(&turnos).unwrap_err();
        assert_eq!(erros.get("turnos[0]").unwrap(), "duracao_minima");
    }

    #[test]
    fn turno_noturno_longo_tem_duracao_correta() {
        let janela = turno("22:00", "06:00").janela().unwrap();
        assert!(janela.vira_meia_noite());
        assert_eq!(janela.duracao_minutos(), 480);
    }

    #[test]
    fn sobreposicao_atraves_da_meia_noite_e_detectada() {
        // O segmento [0, 06:00) do noturno cruza com o [05:00, 09:00)
        let turnos = vec![turno("22:00", "06:00"), turno("05:00", "09:00")];
        let erros = validar_turnos(&turnos).unwrap_err();
        assert_eq!(erros.len(), 2);
        assert!(erros.values().all(|c| c == "conflito_horario"));
    }

    #[test]
    fn turnos_encostados_nao_conflitam() {
        let turnos = vec![turno("08:00", "12:00"), turno("12:00", "16:00")];
        assert!(validar_turnos(&turnos).is_ok());
    }

    #[test]
    fn horario_mal_formado_e_reportado() {
        let turnos = vec![turno("8h", "12:00")];
        let erros = validar_turnos(&turnos).unwrap_err();
        assert_eq!(erros.get("turnos[0]").unwrap(), "horario_invalido");
    }

    #[test]
    fn duracao_curta_e_conflito_nao_se_sobrescrevem() {
        // O primeiro turno é curto demais E conflita com o segundo;
        // o código de duração, reportado primeiro, prevalece para ele.
        let turnos = vec![turno("08:00", "08:30"), turno("08:00", "12:00")];
        let erros = validar_turnos(&turnos).unwrap_err();
        assert_eq!(erros.get("turnos[0]").unwrap(), "duracao_minima");
        assert_eq!(erros.get("turnos[1]").unwrap(), "conflito_horario");
    }
}
