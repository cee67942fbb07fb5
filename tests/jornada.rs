// Máquina de estados da tela de ponto dirigida por ticks sintéticos:
// nada de relógio real, o monitor só reage ao que a fonte devolve.

use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::json;
use tokio::sync::Mutex;
use uuid::Uuid;

use embu_express::client::api::ClienteErro;
use embu_express::client::jornada::{FontePonto, FonteTicks, MonitorJornada};
use embu_express::models::ponto::{EstadoJornada, Pausa, PontoHoje, RegistroPonto};

fn registro(saida: bool, pausa_aberta: Option<bool>) -> RegistroPonto {
    let entrada = Utc.with_ymd_and_hms(2025, 6, 2, 11, 0, 0).unwrap();
    let id = Uuid::new_v4();

    let pausas = match pausa_aberta {
        None => vec![],
        Some(aberta) => vec![Pausa {
            id: Uuid::new_v4(),
            ponto_id: id,
            inicio_hora: entrada + chrono::Duration::hours(2),
            fim_hora: (!aberta).then(|| entrada + chrono::Duration::hours(3)),
            inicio_loc: json!({"latitude": -23.6, "longitude": -46.8}),
            fim_loc: None,
            km: None,
        }],
    };

    RegistroPonto {
        id,
        usuario_id: Uuid::new_v4(),
        vinculo_id: Uuid::new_v4(),
        entrada_hora: entrada,
        saida_hora: saida.then(|| entrada + chrono::Duration::hours(9)),
        entrada_loc: json!({"latitude": -23.6, "longitude": -46.8}),
        saida_loc: None,
        status_entrada: None,
        status_saida: None,
        saldo_minutos: None,
        detalhes_calculo: None,
        created_at: entrada,
        updated_at: entrada,
        pausas,
    }
}

fn hoje(registro: Option<RegistroPonto>) -> PontoHoje {
    PontoHoje {
        estado: EstadoJornada::derivar(registro.as_ref()),
        registro,
    }
}

// Fonte enfileirada: cada consulta devolve o próximo retrato do servidor.
struct FonteSequencia {
    fila: Mutex<VecDeque<PontoHoje>>,
}

#[async_trait]
impl FontePonto for FonteSequencia {
    async fn hoje(&self) -> Result<PontoHoje, ClienteErro> {
        let mut fila = self.fila.lock().await;
        fila.pop_front()
            .ok_or_else(|| ClienteErro::Transporte("fila de respostas esgotada".to_string()))
    }
}

// Relógio sintético: um número finito de ticks imediatos.
struct TicksSinteticos {
    restantes: usize,
}

#[async_trait]
impl FonteTicks for TicksSinteticos {
    async fn proximo(&mut self) -> bool {
        if self.restantes == 0 {
            return false;
        }
        self.restantes -= 1;
        true
    }
}

#[tokio::test]
async fn jornada_completa_dirigida_por_ticks() {
    let fonte = FonteSequencia {
        fila: Mutex::new(VecDeque::from([
            hoje(None),                                 // madrugada: nada batido
            hoje(Some(registro(false, None))),          // entrada batida
            hoje(Some(registro(false, Some(true)))),    // pausa aberta
            hoje(Some(registro(false, Some(false)))),   // pausa encerrada
            hoje(Some(registro(true, None))),           // saída batida
        ])),
    };

    let mut monitor = MonitorJornada::new(fonte);
    let mut ticks = TicksSinteticos { restantes: 5 };

    let mut estados = Vec::new();
    while ticks.proximo().await {
        estados.push(monitor.atualizar().await.unwrap());
    }

    assert_eq!(
        estados,
        vec![
            EstadoJornada::Ocioso,
            EstadoJornada::Trabalhando,
            EstadoJornada::EmPausa,
            EstadoJornada::Trabalhando,
            EstadoJornada::Ocioso,
        ]
    );
}

#[tokio::test]
async fn tempo_decorrido_e_derivado_e_nunca_persistido() {
    let aberto = registro(false, None);
    let entrada = aberto.entrada_hora;

    let fonte = FonteSequencia {
        fila: Mutex::new(VecDeque::from([hoje(Some(aberto))])),
    };
    let mut monitor = MonitorJornada::new(fonte);
    monitor.atualizar().await.unwrap();

    // O decorrido é função pura de (entrada, agora): dois relógios
    // diferentes dão respostas diferentes sem nenhum estado guardado.
    let agora = entrada + chrono::Duration::minutes(95);
    assert_eq!(monitor.decorrido(agora).unwrap().num_minutes(), 95);

    let mais_tarde = entrada + chrono::Duration::minutes(200);
    assert_eq!(monitor.decorrido(mais_tarde).unwrap().num_minutes(), 200);
}

#[tokio::test]
async fn jornada_encerrada_nao_conta_tempo() {
    let fonte = FonteSequencia {
        fila: Mutex::new(VecDeque::from([hoje(Some(registro(true, None)))])),
    };
    let mut monitor = MonitorJornada::new(fonte);
    monitor.atualizar().await.unwrap();

    assert_eq!(monitor.estado(), EstadoJornada::Ocioso);
    assert!(monitor.decorrido(Utc::now()).is_none());
}

#[tokio::test]
async fn falha_da_fonte_preserva_o_ultimo_estado() {
    let fonte = FonteSequencia {
        fila: Mutex::new(VecDeque::from([hoje(Some(registro(false, None)))])),
    };
    let mut monitor = MonitorJornada::new(fonte);
    monitor.atualizar().await.unwrap();
    assert_eq!(monitor.estado(), EstadoJornada::Trabalhando);

    // Fila esgotada simula a rede fora do ar: o erro sobe, o estado fica.
    assert!(monitor.atualizar().await.is_err());
    assert_eq!(monitor.estado(), EstadoJornada::Trabalhando);
}
