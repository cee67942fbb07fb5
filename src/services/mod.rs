pub mod auth;
pub mod cliente_service;
pub mod documento_service;
pub mod empresa_service;
pub mod ponto_service;
pub mod usuario_service;
