// src/services/ponto_service.rs
//
// O motor de cálculo do ponto: classificação das batidas contra a janela
// do vínculo, saldo em minutos e as transições jornada/pausa. As funções
// de cálculo são puras; o serviço orquestra repositórios em volta delas.

use chrono::{DateTime, Timelike, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{PontoRepository, VinculoRepository},
    models::filtros::{Filtros, Pagina},
    models::ponto::{
        CorrecaoPayload, DetalheBatida, DetalhesCalculo, EstadoJornada, Pausa, PausaFimPayload,
        PausaInicioPayload, PontoHoje, RegistroPonto, ResumoCalculo, StatusBatida, TogglePayload,
    },
    models::vinculo::{JanelaTurno, MINUTOS_POR_DIA, Vinculo},
};

/// Diferenças de até 10 minutos contam como pontualidade.
pub const TOLERANCIA_MINUTOS: i32 = 10;

#[derive(Clone)]
pub struct PontoService {
    ponto_repo: PontoRepository,
    vinculo_repo: VinculoRepository,
}

impl PontoService {
    pub fn new(ponto_repo: PontoRepository, vinculo_repo: VinculoRepository) -> Self {
        Self {
            ponto_repo,
            vinculo_repo,
        }
    }

    pub async fn hoje(&self, usuario_id: Uuid) -> Result<PontoHoje, AppError> {
        let registro = self.ponto_repo.hoje(usuario_id).await?;
        Ok(PontoHoje {
            estado: EstadoJornada::derivar(registro.as_ref()),
            registro,
        })
    }

    /// Alterna a jornada: sem registro aberto inicia um; com registro aberto
    /// encerra e grava o cálculo. Uma pausa em aberto trava o encerramento.
    pub async fn toggle(&self, payload: &TogglePayload) -> Result<RegistroPonto, AppError> {
        let agora = Utc::now();
        let localizacao = payload.localizacao.como_json();

        match self.ponto_repo.hoje(payload.usuario_id).await? {
            Some(registro) if registro.em_aberto() => {
                if registro.pausa_aberta().is_some() {
                    return Err(AppError::PauseStillOpen);
                }

                let vinculo = self
                    .vinculo_repo
                    .find_by_id(registro.vinculo_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::ResourceNotFound(format!("Vínculo {}", registro.vinculo_id))
                    })?;

                let detalhes = calcular_detalhes(
                    registro.entrada_hora,
                    agora,
                    &registro.pausas,
                    &vinculo.janela(),
                );

                self.ponto_repo
                    .fechar(
                        registro.id,
                        agora,
                        &localizacao,
                        detalhes.entrada.status,
                        detalhes.saida.status,
                        detalhes.resumo.saldo_minutos,
                        &serde_json::to_value(&detalhes)
                            .map_err(|e| anyhow::anyhow!("serialização do cálculo: {e}"))?,
                    )
                    .await
            }
            _ => {
                let vinculos = self
                    .vinculo_repo
                    .ativos_por_usuario(payload.usuario_id)
                    .await?;
                let vinculo = escolher_vinculo(&vinculos, minutos_do_instante(agora))
                    .ok_or(AppError::NoActiveVinculo)?;

                let diferenca =
                    diferenca_minutos(minutos_do_instante(agora), vinculo.janela().inicio);

                self.ponto_repo
                    .abrir(
                        payload.usuario_id,
                        vinculo.id,
                        agora,
                        &localizacao,
                        classificar_entrada(diferenca),
                    )
                    .await
            }
        }
    }

    pub async fn pausa_inicio(&self, payload: &PausaInicioPayload) -> Result<Pausa, AppError> {
        let registro = self
            .ponto_repo
            .find_by_id(payload.ponto_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Registro {}", payload.ponto_id)))?;

        if !registro.em_aberto() {
            return Err(AppError::NoOpenShift);
        }
        // Checagem rápida; o índice parcial do banco decide a corrida.
        if registro.pausa_aberta().is_some() {
            return Err(AppError::OpenPauseExists);
        }

        self.ponto_repo
            .pausa_iniciar(
                registro.id,
                Utc::now(),
                &payload.localizacao.como_json(),
                payload.km,
            )
            .await
    }

    pub async fn pausa_fim(&self, payload: &PausaFimPayload) -> Result<Pausa, AppError> {
        self.ponto_repo
            .pausa_finalizar(
                payload.id,
                Utc::now(),
                &payload.localizacao.como_json(),
                payload.km,
            )
            .await
    }

    pub async fn registro_por_id(&self, id: Uuid) -> Result<RegistroPonto, AppError> {
        self.ponto_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Registro {id}")))
    }

    /// Registro dono de uma pausa, para as checagens de escopo das rotas.
    pub async fn registro_da_pausa(&self, pausa_id: Uuid) -> Result<RegistroPonto, AppError> {
        let pausa = self
            .ponto_repo
            .pausa_por_id(pausa_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Pausa {pausa_id}")))?;
        self.registro_por_id(pausa.ponto_id).await
    }

    pub async fn listar(&self, filtros: &Filtros) -> Result<Pagina<RegistroPonto>, AppError> {
        let (itens, total) = self.ponto_repo.listar(filtros).await?;
        Ok(Pagina::nova(itens, total, filtros))
    }

    /// Correção manual da administração: regrava batidas e refaz o cálculo.
    pub async fn corrigir(
        &self,
        id: Uuid,
        payload: &CorrecaoPayload,
    ) -> Result<RegistroPonto, AppError> {
        let registro = self
            .ponto_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Registro {id}")))?;

        let entrada = payload.entrada_hora.unwrap_or(registro.entrada_hora);
        let saida = payload.saida_hora.or(registro.saida_hora);

        let vinculo = self
            .vinculo_repo
            .find_by_id(registro.vinculo_id)
            .await?
            .ok_or_else(|| {
                AppError::ResourceNotFound(format!("Vínculo {}", registro.vinculo_id))
            })?;
        let janela = vinculo.janela();

        match saida {
            Some(saida) => {
                let detalhes = calcular_detalhes(entrada, saida, &registro.pausas, &janela);
                self.ponto_repo
                    .corrigir(
                        id,
                        entrada,
                        Some(saida),
                        Some(detalhes.entrada.status),
                        Some(detalhes.saida.status),
                        Some(detalhes.resumo.saldo_minutos),
                        Some(
                            &serde_json::to_value(&detalhes)
                                .map_err(|e| anyhow::anyhow!("serialização do cálculo: {e}"))?,
                        ),
                    )
                    .await
            }
            None => {
                let diferenca = diferenca_minutos(minutos_do_instante(entrada), janela.inicio);
                self.ponto_repo
                    .corrigir(
                        id,
                        entrada,
                        None,
                        Some(classificar_entrada(diferenca)),
                        None,
                        None,
                        None,
                    )
                    .await
            }
        }
    }
}

// --- Funções puras de cálculo ---

pub fn minutos_do_instante(instante: DateTime<Utc>) -> u32 {
    instante.hour() * 60 + instante.minute()
}

/// Diferença assinada entre dois horários do dia, normalizada para
/// [-720, 720) para que janelas que cruzam a meia-noite comparem certo.
pub fn diferenca_minutos(real: u32, previsto: u32) -> i32 {
    let mut diferenca = real as i32 - previsto as i32;
    let dia = MINUTOS_POR_DIA as i32;
    if diferenca >= dia / 2 {
        diferenca -= dia;
    } else if diferenca < -dia / 2 {
        diferenca += dia;
    }
    diferenca
}

pub fn classificar_entrada(diferenca: i32) -> StatusBatida {
    if diferenca.abs() <= TOLERANCIA_MINUTOS {
        StatusBatida::Pontual
    } else if diferenca > 0 {
        StatusBatida::Atrasado
    } else {
        StatusBatida::Antecipado
    }
}

pub fn classificar_saida(diferenca: i32) -> StatusBatida {
    if diferenca.abs() <= TOLERANCIA_MINUTOS {
        StatusBatida::Pontual
    } else if diferenca > 0 {
        StatusBatida::HoraExtra
    } else {
        StatusBatida::Antecipado
    }
}

fn pausas_minutos(pausas: &[Pausa], fim_padrao: DateTime<Utc>) -> i64 {
    pausas
        .iter()
        .map(|p| (p.fim_hora.unwrap_or(fim_padrao) - p.inicio_hora).num_minutes())
        .sum()
}

pub fn calcular_detalhes(
    entrada: DateTime<Utc>,
    saida: DateTime<Utc>,
    pausas: &[Pausa],
    janela: &JanelaTurno,
) -> DetalhesCalculo {
    let dif_entrada = diferenca_minutos(minutos_do_instante(entrada), janela.inicio);
    let dif_saida = diferenca_minutos(minutos_do_instante(saida), janela.fim);

    let pausas_min = pausas_minutos(pausas, saida) as i32;
    let trabalhado = (saida - entrada).num_minutes() as i32 - pausas_min;
    let previsto = janela.duracao_minutos() as i32;

    DetalhesCalculo {
        entrada: DetalheBatida {
            status: classificar_entrada(dif_entrada),
            diferenca_minutos: dif_entrada,
        },
        saida: DetalheBatida {
            status: classificar_saida(dif_saida),
            diferenca_minutos: dif_saida,
        },
        resumo: ResumoCalculo {
            previsto_minutos: previsto,
            trabalhado_minutos: trabalhado,
            pausas_minutos: pausas_min,
            saldo_minutos: trabalhado - previsto,
        },
    }
}

/// Com mais de um vínculo ativo, o turno escolhido é o de início mais
/// próximo do instante atual (distância circular no relógio).
pub fn escolher_vinculo(vinculos: &[Vinculo], agora_minutos: u32) -> Option<&Vinculo> {
    vinculos.iter().min_by_key(|v| {
        diferenca_minutos(agora_minutos, v.janela().inicio).abs()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn janela(inicio: u32, fim: u32) -> JanelaTurno {
        JanelaTurno { inicio, fim }
    }

    #[test]
    fn dentro_da_tolerancia_e_pontual() {
        assert_eq!(classificar_entrada(0), StatusBatida::Pontual);
        assert_eq!(classificar_entrada(10), StatusBatida::Pontual);
        assert_eq!(classificar_entrada(-10), StatusBatida::Pontual);
    }

    #[test]
    fn fora_da_tolerancia_classifica_pelos_lados() {
        assert_eq!(classificar_entrada(11), StatusBatida::Atrasado);
        assert_eq!(classificar_entrada(-11), StatusBatida::Antecipado);
        assert_eq!(classificar_saida(11), StatusBatida::HoraExtra);
        assert_eq!(classificar_saida(-11), StatusBatida::Antecipado);
    }

    #[test]
    fn diferenca_normaliza_na_virada_do_dia() {
        // Entrada 00:05 contra turno das 23:50: 15 minutos de atraso,
        // não -1425.
        assert_eq!(diferenca_minutos(5, 23 * 60 + 50), 15);
        // Entrada 23:50 contra turno de 00:05: 15 minutos adiantado.
        assert_eq!(diferenca_minutos(23 * 60 + 50, 5), -15);
    }

    #[test]
    fn calculo_completo_de_um_dia_normal() {
        // Turno 08:00-18:00 (600 min), entrada 08:05, saída 18:20,
        // uma pausa de 60 min.
        let entrada = Utc.with_ymd_and_hms(2025, 6, 2, 8, 5, 0).unwrap();
        let saida = Utc.with_ymd_and_hms(2025, 6, 2, 18, 20, 0).unwrap();
        let pausa = Pausa {
            id: Uuid::new_v4(),
            ponto_id: Uuid::new_v4(),
            inicio_hora: Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap(),
            fim_hora: Some(Utc.with_ymd_and_hms(2025, 6, 2, 13, 0, 0).unwrap()),
            inicio_loc: json!({}),
            fim_loc: None,
            km: None,
        };

        let detalhes = calcular_detalhes(entrada, saida, &[pausa], &janela(8 * 60, 18 * 60));

        assert_eq!(detalhes.entrada.status, StatusBatida::Pontual);
        assert_eq!(detalhes.saida.status, StatusBatida::HoraExtra);
        assert_eq!(detalhes.resumo.previsto_minutos, 600);
        assert_eq!(detalhes.resumo.pausas_minutos, 60);
        // 615 corridos - 60 de pausa = 555 trabalhados
        assert_eq!(detalhes.resumo.trabalhado_minutos, 555);
        assert_eq!(detalhes.resumo.saldo_minutos, -45);
    }

    #[test]
    fn turno_noturno_calcula_atravessando_a_meia_noite() {
        // Turno 22:00-06:00; entrada 21:58 e saída 06:04 do dia seguinte.
        let entrada = Utc.with_ymd_and_hms(2025, 6, 2, 21, 58, 0).unwrap();
        let saida = Utc.with_ymd_and_hms(2025, 6, 3, 6, 4, 0).unwrap();

        let detalhes = calcular_detalhes(entrada, saida, &[], &janela(22 * 60, 6 * 60));

        assert_eq!(detalhes.entrada.status, StatusBatida::Pontual);
        assert_eq!(detalhes.saida.status, StatusBatida::Pontual);
        assert_eq!(detalhes.resumo.previsto_minutos, 480);
        assert_eq!(detalhes.resumo.trabalhado_minutos, 486);
        assert_eq!(detalhes.resumo.saldo_minutos, 6);
    }
}
