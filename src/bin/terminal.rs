// src/bin/terminal.rs
//
// Terminal de ponto do colaborador em campo: mostra o estado da jornada,
// atualiza a cada 60s e aceita os comandos iniciar/pausar/retomar/
// encerrar. Toda batida exige uma amostra de localização; sem ela a ação
// é abortada em silêncio.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};

use embu_express::client::api::ApiCliente;
use embu_express::client::http::TransporteReqwest;
use embu_express::client::jornada::{
    FonteApi, FonteTicks, MonitorJornada, ProvedorLocalizacao, TicksIntervalo,
};
use embu_express::models::ponto::{EstadoJornada, Localizacao};

const PERIODO_ATUALIZACAO: Duration = Duration::from_secs(60);

// Localização vinda do ambiente (o terminal roda em aparelhos com GPS
// externo que exporta EMBU_LAT/EMBU_LON). Sem as variáveis, nenhuma
// batida acontece.
struct LocalizacaoDeAmbiente;

impl ProvedorLocalizacao for LocalizacaoDeAmbiente {
    fn localizacao_atual(&self) -> Option<Localizacao> {
        let latitude: f64 = env::var("EMBU_LAT").ok()?.parse().ok()?;
        let longitude: f64 = env::var("EMBU_LON").ok()?.parse().ok()?;
        Some(Localizacao {
            latitude,
            longitude,
            precisao: None,
        })
    }
}

fn rotulo(estado: EstadoJornada) -> &'static str {
    match estado {
        EstadoJornada::Ocioso => "fora da jornada",
        EstadoJornada::Trabalhando => "trabalhando",
        EstadoJornada::EmPausa => "em pausa",
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_target(false).compact().init();

    let base_url =
        env::var("EMBU_API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let cpf = env::var("EMBU_CPF").expect("EMBU_CPF deve ser definido");
    let senha = env::var("EMBU_SENHA").expect("EMBU_SENHA deve ser definida");

    let cliente = Arc::new(ApiCliente::new(Arc::new(TransporteReqwest::new(base_url))));
    cliente
        .login(&cpf, &senha)
        .await
        .map_err(|e| anyhow::anyhow!("login falhou: {e}"))?;

    let usuario = cliente
        .me()
        .await
        .map_err(|e| anyhow::anyhow!("perfil indisponível: {e}"))?;
    println!("Olá, {}!", usuario.nome_completo);
    println!("Comandos: iniciar | pausar | retomar | encerrar | status | sair");

    let provedor = LocalizacaoDeAmbiente;
    let mut monitor = MonitorJornada::new(FonteApi {
        cliente: cliente.clone(),
        usuario_id: usuario.id,
    });

    if let Ok(estado) = monitor.atualizar().await {
        println!("Estado atual: {}", rotulo(estado));
    }

    let mut ticks = TicksIntervalo::a_cada(PERIODO_ATUALIZACAO);
    let mut linhas = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = ticks.proximo() => {
                match monitor.atualizar().await {
                    Ok(estado) => {
                        if let Some(decorrido) = monitor.decorrido(chrono::Utc::now()) {
                            println!(
                                "[{}] {}h{:02}min de jornada",
                                rotulo(estado),
                                decorrido.num_hours(),
                                decorrido.num_minutes() % 60
                            );
                        }
                    }
                    Err(e) => tracing::warn!("atualização falhou: {e}"),
                }
            }
            linha = linhas.next_line() => {
                let Some(linha) = linha? else { break };
                let comando = linha.trim();

                // Política fail-closed: comandos de batida sem amostra de
                // localização são descartados sem chamada ao servidor.
                let localizacao = match comando {
                    "iniciar" | "pausar" | "retomar" | "encerrar" => {
                        match provedor.localizacao_atual() {
                            Some(loc) => Some(loc),
                            None => {
                                tracing::debug!("sem localização; ação '{comando}' abortada");
                                continue;
                            }
                        }
                    }
                    _ => None,
                };

                match comando {
                    "iniciar" | "encerrar" => {
                        let loc = localizacao.unwrap();
                        if let Err(e) = cliente.ponto_toggle(usuario.id, &loc).await {
                            tracing::warn!("toggle falhou: {e}");
                        }
                    }
                    "pausar" => {
                        let loc = localizacao.unwrap();
                        match monitor.registro().map(|r| r.id) {
                            Some(ponto_id) => {
                                if let Err(e) = cliente.pausa_inicio(ponto_id, &loc).await {
                                    tracing::warn!("início de pausa falhou: {e}");
                                }
                            }
                            None => println!("Nenhuma jornada em aberto."),
                        }
                    }
                    "retomar" => {
                        let loc = localizacao.unwrap();
                        match monitor.registro().and_then(|r| r.pausa_aberta()).map(|p| p.id) {
                            Some(pausa_id) => {
                                if let Err(e) = cliente.pausa_fim(pausa_id, &loc).await {
                                    tracing::warn!("fim de pausa falhou: {e}");
                                }
                            }
                            None => println!("Nenhuma pausa em aberto."),
                        }
                    }
                    "status" => {}
                    "sair" => break,
                    "" => continue,
                    outro => {
                        println!("Comando desconhecido: {outro}");
                        continue;
                    }
                }

                // Cada ação reconsulta o servidor em vez de chutar o estado
                match monitor.atualizar().await {
                    Ok(estado) => println!("Estado atual: {}", rotulo(estado)),
                    Err(e) => tracing::warn!("atualização falhou: {e}"),
                }
            }
        }
    }

    Ok(())
}
