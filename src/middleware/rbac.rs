// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{common::error::AppError, models::usuario::UsuarioAutenticado};

/// 1. O trait que define quais perfis uma rota aceita
pub trait RoleDef: Send + Sync + 'static {
    fn perfis() -> &'static [&'static str];
}

/// 2. O extractor (guardião). Sem usuário nos extensions -> 401;
/// perfil fora do conjunto -> 403. O usuário só entra nos extensions
/// depois de totalmente carregado, então não existe janela em que uma
/// rota protegida responda com permissões pela metade.
pub struct RequireRole<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let autenticado = parts
            .extensions
            .get::<UsuarioAutenticado>()
            .ok_or(AppError::InvalidToken)?;

        if !T::perfis().contains(&autenticado.perfil.as_str()) {
            return Err(AppError::InsufficientRole);
        }

        Ok(RequireRole(PhantomData))
    }
}

// ---
// CONJUNTOS DE PERFIS
// ---

pub struct SomenteAdmin;
impl RoleDef for SomenteAdmin {
    fn perfis() -> &'static [&'static str] {
        &["admin"]
    }
}

pub struct AdminOuEscritorio;
impl RoleDef for AdminOuEscritorio {
    fn perfis() -> &'static [&'static str] {
        &["admin", "escritorio"]
    }
}

pub struct QualquerColaborador;
impl RoleDef for QualquerColaborador {
    fn perfis() -> &'static [&'static str] {
        &["admin", "escritorio", "motoboy"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conjuntos_de_perfis_cobrem_os_slugs_esperados() {
        assert_eq!(SomenteAdmin::perfis().to_vec(), vec!["admin"]);
        assert!(AdminOuEscritorio::perfis().contains(&"escritorio"));
        assert!(QualquerColaborador::perfis().contains(&"motoboy"));
        assert!(!AdminOuEscritorio::perfis().contains(&"motoboy"));
    }
}
