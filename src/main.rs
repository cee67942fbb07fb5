//src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, patch, post, put},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use embu_express::config::AppState;
use embu_express::docs::ApiDoc;
use embu_express::handlers;
use embu_express::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação: públicas + o bloco que exige sessão
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/refresh", post(handlers::auth::refresh))
        .route("/register", post(handlers::auth::register))
        .merge(
            Router::new()
                .route("/update-password", put(handlers::auth::update_password))
                .route("/me", get(handlers::auth::get_me))
                .layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    auth_guard,
                )),
        );

    let clientes_routes = Router::new()
        .route(
            "/",
            get(handlers::clientes::listar).post(handlers::clientes::criar),
        )
        .route(
            "/{id}",
            get(handlers::clientes::buscar)
                .put(handlers::clientes::atualizar)
                .delete(handlers::clientes::excluir),
        )
        .route("/{id}/status", patch(handlers::clientes::alternar_status))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let empresas_routes = Router::new()
        .route(
            "/",
            get(handlers::empresas::listar).post(handlers::empresas::criar),
        )
        .route(
            "/{id}",
            get(handlers::empresas::buscar)
                .put(handlers::empresas::atualizar)
                .delete(handlers::empresas::excluir),
        )
        .route("/{id}/status", patch(handlers::empresas::alternar_status))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let usuarios_routes = Router::new()
        .route(
            "/",
            get(handlers::usuarios::listar).post(handlers::usuarios::criar),
        )
        .route(
            "/{id}",
            get(handlers::usuarios::buscar)
                .put(handlers::usuarios::atualizar)
                .delete(handlers::usuarios::excluir),
        )
        .route("/{id}/status", patch(handlers::usuarios::alternar_status))
        .route("/{id}/turnos", put(handlers::usuarios::substituir_turnos))
        .route(
            "/vinculos/{id}",
            axum::routing::delete(handlers::usuarios::excluir_vinculo),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let perfis_routes = Router::new()
        .route("/", get(handlers::perfis::listar))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let pontos_routes = Router::new()
        .route("/hoje", get(handlers::pontos::hoje))
        .route("/toggle", post(handlers::pontos::toggle))
        .route("/pausa/inicio", post(handlers::pontos::pausa_inicio))
        .route("/pausa/fim", post(handlers::pontos::pausa_fim))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let registros_routes = Router::new()
        .route("/", get(handlers::registros::listar))
        .route("/espelho", get(handlers::registros::espelho))
        .route("/{id}", patch(handlers::registros::corrigir))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/clientes", clientes_routes)
        .nest("/api/empresas", empresas_routes)
        .nest("/api/usuarios", usuarios_routes)
        .nest("/api/perfis", perfis_routes)
        .nest("/api/pontos", pontos_routes)
        .nest("/api/registros-ponto", registros_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
