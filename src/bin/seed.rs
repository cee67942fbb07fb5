// src/bin/seed.rs
//
// Provisiona um ambiente de demonstração: admin com senha padrão,
// clientes, empresa e motoboys com vínculos. Os documentos saem dos
// geradores de CPF/CNPJ, então todo cadastro passa nos validadores
// dos formulários.

use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;

use embu_express::common::documento::{gerar_cnpj, gerar_cpf};
use embu_express::db::{
    ClienteRepository, EmpresaRepository, PerfilRepository, UsuarioRepository, VinculoRepository,
};
use embu_express::models::cliente::ClientePayload;
use embu_express::models::empresa::EmpresaPayload;
use embu_express::models::usuario::{
    DadosMotoboy, DadosPerfil, NovoUsuario, StatusUsuario,
};
use embu_express::models::vinculo::TurnoPayload;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_target(false).compact().init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await?;

    sqlx::migrate!().run(&pool).await?;

    let usuario_repo = UsuarioRepository::new(pool.clone());
    let perfil_repo = PerfilRepository::new(pool.clone());
    let cliente_repo = ClienteRepository::new(pool.clone());
    let empresa_repo = EmpresaRepository::new(pool.clone());
    let vinculo_repo = VinculoRepository::new(pool.clone());

    // Idempotência simples: se o admin já existe, não há nada a fazer.
    if usuario_repo.find_by_cpf("52998224725").await?.is_some() {
        tracing::info!("Seed já aplicado; nada a fazer.");
        return Ok(());
    }

    let perfil_admin = perfil_repo
        .find_by_nome("admin")
        .await?
        .ok_or_else(|| anyhow::anyhow!("perfil admin não provisionado"))?;
    let perfil_motoboy = perfil_repo
        .find_by_nome("motoboy")
        .await?
        .ok_or_else(|| anyhow::anyhow!("perfil motoboy não provisionado"))?;

    let senha_hash = bcrypt::hash("embu123", bcrypt::DEFAULT_COST)?;

    let mut conn = pool.acquire().await?;

    let admin = usuario_repo
        .create(
            &mut *conn,
            &NovoUsuario {
                nome_completo: "Administrador Embu".to_string(),
                email: "admin@embuexpress.com.br".to_string(),
                cpf: "529.982.247-25".to_string(),
                senha_hash: senha_hash.clone(),
                perfil_id: perfil_admin.id,
                status: StatusUsuario::Ativo,
                senha_padrao: true,
                telefone: None,
                data_nascimento: None,
                endereco: None,
                dados: DadosPerfil::Padrao,
            },
        )
        .await?;
    tracing::info!("👤 Admin criado: {} (senha padrão 'embu123')", admin.email);

    let cliente_a = cliente_repo
        .create(&ClientePayload {
            nome_fantasia: "Pizzaria Bella Embu".to_string(),
            razao_social: "Bella Alimentos Ltda".to_string(),
            cnpj: gerar_cnpj(),
            endereco: Some(serde_json::json!({
                "logradouro": "Av. Elias Yazbek, 1200",
                "cidade": "Embu das Artes",
                "uf": "SP"
            })),
        })
        .await?;

    let cliente_b = cliente_repo
        .create(&ClientePayload {
            nome_fantasia: "Drogaria Central".to_string(),
            razao_social: "Central Farma ME".to_string(),
            cnpj: gerar_cnpj(),
            endereco: None,
        })
        .await?;

    let empresa = empresa_repo
        .create(&EmpresaPayload {
            nome_fantasia: "Embu Express".to_string(),
            razao_social: "Embu Express Logística Ltda".to_string(),
            cnpj: gerar_cnpj(),
        })
        .await?;

    for (nome, turno) in [
        (
            "Carlos Souza",
            TurnoPayload {
                cliente_id: cliente_a.id,
                empresa_id: empresa.id,
                hora_inicio: "08:00".to_string(),
                hora_fim: "18:00".to_string(),
                valor_contrato: Decimal::new(3_200_00, 2),
                valor_aluguel: Decimal::new(400_00, 2),
                valor_bonus: Decimal::ZERO,
                ajuda_custo: Decimal::new(150_00, 2),
                mei: true,
            },
        ),
        (
            "Marcos Lima",
            TurnoPayload {
                cliente_id: cliente_b.id,
                empresa_id: empresa.id,
                hora_inicio: "18:00".to_string(),
                hora_fim: "23:30".to_string(),
                valor_contrato: Decimal::new(1_900_00, 2),
                valor_aluguel: Decimal::ZERO,
                valor_bonus: Decimal::new(200_00, 2),
                ajuda_custo: Decimal::ZERO,
                mei: false,
            },
        ),
    ] {
        let cpf = gerar_cpf();
        let email = format!(
            "{}@embuexpress.com.br",
            nome.to_lowercase().replace(' ', ".")
        );

        let motoboy = usuario_repo
            .create(
                &mut *conn,
                &NovoUsuario {
                    nome_completo: nome.to_string(),
                    email,
                    cpf: cpf.clone(),
                    senha_hash: senha_hash.clone(),
                    perfil_id: perfil_motoboy.id,
                    status: StatusUsuario::Ativo,
                    senha_padrao: true,
                    telefone: None,
                    data_nascimento: None,
                    endereco: None,
                    dados: DadosPerfil::Motoboy(DadosMotoboy {
                        cnh_registro: "98765432100".to_string(),
                        cnh_categoria: "A".to_string(),
                        cnh_validade: chrono::NaiveDate::from_ymd_opt(2028, 1, 31).unwrap(),
                        moto_placa: "BRA2E19".to_string(),
                        moto_modelo: "Honda CG 160".to_string(),
                        moto_ano: Some(2021),
                        mei_cnpj: None,
                        chave_pix: cpf,
                    }),
                },
            )
            .await?;

        vinculo_repo
            .substituir(&mut *conn, motoboy.id, &[turno])
            .await?;
        tracing::info!("🏍️  Motoboy criado: {}", motoboy.nome_completo);
    }

    tracing::info!("✅ Seed concluído com sucesso!");
    Ok(())
}
