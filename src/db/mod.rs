pub mod cliente_repo;
pub use cliente_repo::ClienteRepository;
pub mod empresa_repo;
pub use empresa_repo::EmpresaRepository;
pub mod perfil_repo;
pub use perfil_repo::PerfilRepository;
pub mod ponto_repo;
pub use ponto_repo::PontoRepository;
pub mod usuario_repo;
pub use usuario_repo::UsuarioRepository;
pub mod vinculo_repo;
pub use vinculo_repo::VinculoRepository;

/// Tamanho fixo das páginas de listagem.
pub const TAMANHO_PAGINA: i64 = 20;
