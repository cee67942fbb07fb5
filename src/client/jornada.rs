// src/client/jornada.rs
//
// A máquina de estados da tela de ponto, separada do relógio real: o
// monitor consome uma fonte de registros e uma fonte de ticks injetadas,
// então os testes dirigem a jornada com ticks sintéticos.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::client::api::{ApiCliente, ClienteErro};
use crate::models::ponto::{EstadoJornada, Localizacao, PontoHoje, RegistroPonto};

/// De onde vem o registro do dia (a API real ou um dublê de teste).
#[async_trait]
pub trait FontePonto: Send + Sync {
    async fn hoje(&self) -> Result<PontoHoje, ClienteErro>;
}

pub struct FonteApi {
    pub cliente: Arc<ApiCliente>,
    pub usuario_id: Uuid,
}

#[async_trait]
impl FontePonto for FonteApi {
    async fn hoje(&self) -> Result<PontoHoje, ClienteErro> {
        self.cliente.ponto_hoje(self.usuario_id).await
    }
}

/// Relógio da tela: o terminal usa um intervalo real; os testes, uma
/// sequência finita.
#[async_trait]
pub trait FonteTicks: Send {
    /// Espera o próximo tick; `false` encerra o laço de atualização.
    async fn proximo(&mut self) -> bool;
}

pub struct TicksIntervalo {
    intervalo: tokio::time::Interval,
}

impl TicksIntervalo {
    pub fn a_cada(periodo: Duration) -> Self {
        Self {
            intervalo: tokio::time::interval(periodo),
        }
    }
}

#[async_trait]
impl FonteTicks for TicksIntervalo {
    async fn proximo(&mut self) -> bool {
        self.intervalo.tick().await;
        true
    }
}

/// Amostra de localização exigida antes de qualquer batida. `None`
/// aborta a ação em silêncio (fail-closed): sem localização não se
/// registra ponto.
pub trait ProvedorLocalizacao: Send + Sync {
    fn localizacao_atual(&self) -> Option<Localizacao>;
}

pub struct LocalizacaoFixa(pub Localizacao);

impl ProvedorLocalizacao for LocalizacaoFixa {
    fn localizacao_atual(&self) -> Option<Localizacao> {
        Some(self.0.clone())
    }
}

pub struct MonitorJornada<F: FontePonto> {
    fonte: F,
    estado: EstadoJornada,
    registro: Option<RegistroPonto>,
}

impl<F: FontePonto> MonitorJornada<F> {
    pub fn new(fonte: F) -> Self {
        Self {
            fonte,
            estado: EstadoJornada::Ocioso,
            registro: None,
        }
    }

    pub fn estado(&self) -> EstadoJornada {
        self.estado
    }

    pub fn registro(&self) -> Option<&RegistroPonto> {
        self.registro.as_ref()
    }

    /// Reconsulta a fonte e deriva o estado localmente. Chamada a cada
    /// tick e logo após cada ação — o monitor nunca "chuta" o estado,
    /// sempre reflete a última verdade do servidor.
    pub async fn atualizar(&mut self) -> Result<EstadoJornada, ClienteErro> {
        let hoje = self.fonte.hoje().await?;
        self.registro = hoje.registro;
        self.estado = EstadoJornada::derivar(self.registro.as_ref());
        Ok(self.estado)
    }

    /// Tempo decorrido da jornada aberta, recalculado a cada chamada.
    /// Só exibição: nada disso é persistido e o valor renasce no reload.
    pub fn decorrido(&self, agora: DateTime<Utc>) -> Option<chrono::Duration> {
        self.registro
            .as_ref()
            .filter(|r| r.em_aberto())
            .map(|r| agora - r.entrada_hora)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SemGps;

    impl ProvedorLocalizacao for SemGps {
        fn localizacao_atual(&self) -> Option<Localizacao> {
            None
        }
    }

    #[test]
    fn provedor_fixo_sempre_amostra() {
        let provedor = LocalizacaoFixa(Localizacao {
            latitude: -23.64,
            longitude: -46.85,
            precisao: Some(8.0),
        });
        let amostra = provedor.localizacao_atual().unwrap();
        assert_eq!(amostra.latitude, -23.64);
    }

    #[test]
    fn sem_gps_nenhuma_amostra_sai() {
        // O chamador aborta a batida quando a amostra é None.
        assert!(SemGps.localizacao_atual().is_none());
    }
}
