pub mod auth;
pub mod cliente;
pub mod empresa;
pub mod filtros;
pub mod ponto;
pub mod usuario;
pub mod vinculo;
