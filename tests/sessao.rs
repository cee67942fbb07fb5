// Sessão do cliente: renovação single-flight, repetição única após 401
// e derrubada da sessão quando o refresh falha.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use embu_express::client::api::{
    ApiCliente, ClienteErro, Metodo, Requisicao, Resposta, Transporte,
};

// Servidor falso: emite tokens "acc-N"/"ref-N" e só aceita o access da
// geração corrente. `invalidar` simula a expiração do access token.
struct ServidorFalso {
    geracao: AtomicU64,
    refreshes: AtomicU64,
    refresh_quebrado: AtomicBool,
}

impl ServidorFalso {
    fn novo() -> Arc<Self> {
        Arc::new(Self {
            geracao: AtomicU64::new(0),
            refreshes: AtomicU64::new(0),
            refresh_quebrado: AtomicBool::new(false),
        })
    }

    fn invalidar(&self) {
        self.geracao.fetch_add(1, Ordering::SeqCst);
    }

    fn par_atual(&self) -> serde_json::Value {
        let g = self.geracao.load(Ordering::SeqCst);
        json!({ "access_token": format!("acc-{g}"), "refresh_token": format!("ref-{g}") })
    }
}

#[async_trait]
impl Transporte for ServidorFalso {
    async fn executar(&self, requisicao: Requisicao) -> Result<Resposta, ClienteErro> {
        match (requisicao.metodo, requisicao.caminho.as_str()) {
            (Metodo::Post, "/api/auth/login") => Ok(Resposta {
                status: 200,
                corpo: self.par_atual(),
            }),
            (Metodo::Post, "/api/auth/refresh") => {
                self.refreshes.fetch_add(1, Ordering::SeqCst);
                if self.refresh_quebrado.load(Ordering::SeqCst) {
                    return Ok(Resposta {
                        status: 401,
                        corpo: json!({ "error": "Sessão expirada. Faça login novamente." }),
                    });
                }
                // Janela artificial para os 401 concorrentes disputarem o
                // cadeado de renovação.
                tokio::time::sleep(Duration::from_millis(20)).await;
                self.invalidar();
                Ok(Resposta {
                    status: 200,
                    corpo: self.par_atual(),
                })
            }
            _ => {
                let esperado = format!("acc-{}", self.geracao.load(Ordering::SeqCst));
                if requisicao.bearer.as_deref() == Some(esperado.as_str()) {
                    Ok(Resposta {
                        status: 200,
                        corpo: json!({ "ok": true, "caminho": requisicao.caminho }),
                    })
                } else {
                    Ok(Resposta {
                        status: 401,
                        corpo: json!({ "error": "Token de autenticação inválido ou ausente." }),
                    })
                }
            }
        }
    }
}

#[tokio::test]
async fn dois_401_concorrentes_disparam_um_unico_refresh() {
    let servidor = ServidorFalso::novo();
    let cliente = ApiCliente::new(servidor.clone());

    cliente.login("529.982.247-25", "embu123").await.unwrap();
    servidor.invalidar();

    let (a, b) = tokio::join!(
        cliente.requisitar(Metodo::Get, "/api/pontos/hoje?usuario_id=x", None),
        cliente.requisitar(Metodo::Get, "/api/registros-ponto", None),
    );

    // As duas chamadas originais terminam bem, com exatamente uma ida ao
    // endpoint de refresh entre elas.
    assert!(a.is_ok(), "primeira chamada falhou: {a:?}");
    assert!(b.is_ok(), "segunda chamada falhou: {b:?}");
    assert_eq!(servidor.refreshes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn requisicao_e_repetida_uma_vez_com_o_token_novo() {
    let servidor = ServidorFalso::novo();
    let cliente = ApiCliente::new(servidor.clone());

    cliente.login("529.982.247-25", "embu123").await.unwrap();
    servidor.invalidar();

    let corpo = cliente
        .requisitar(Metodo::Get, "/api/auth/me", None)
        .await
        .unwrap();

    assert_eq!(corpo["ok"], json!(true));
    assert_eq!(servidor.refreshes.load(Ordering::SeqCst), 1);
    assert!(cliente.sessao_ativa().await);
}

#[tokio::test]
async fn refresh_recusado_derruba_a_sessao() {
    let servidor = ServidorFalso::novo();
    let cliente = ApiCliente::new(servidor.clone());

    cliente.login("529.982.247-25", "embu123").await.unwrap();
    servidor.invalidar();
    servidor.refresh_quebrado.store(true, Ordering::SeqCst);

    let resultado = cliente.requisitar(Metodo::Get, "/api/auth/me", None).await;

    assert!(matches!(resultado, Err(ClienteErro::SessaoExpirada)));
    assert!(!cliente.sessao_ativa().await);
}

#[tokio::test]
async fn sem_login_nao_ha_chamada_autenticada() {
    let servidor = ServidorFalso::novo();
    let cliente = ApiCliente::new(servidor.clone());

    let resultado = cliente.requisitar(Metodo::Get, "/api/auth/me", None).await;
    assert!(matches!(resultado, Err(ClienteErro::SemSessao)));
}
