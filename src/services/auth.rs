// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::{
    common::error::AppError,
    db::{PerfilRepository, UsuarioRepository},
    models::auth::{Claims, ParTokens, RefreshPayload, TipoToken, UpdatePasswordPayload},
    models::usuario::{
        DadosPerfil, NovoUsuario, PerfilKind, RegisterPayload, StatusUsuario, Usuario,
        UsuarioAutenticado,
    },
};

const ACCESS_TTL_MINUTOS: i64 = 15;
const REFRESH_TTL_DIAS: i64 = 14;

#[derive(Clone)]
pub struct AuthService {
    usuario_repo: UsuarioRepository,
    perfil_repo: PerfilRepository,
    jwt_secret: String,
    pool: sqlx::PgPool,
}

impl AuthService {
    pub fn new(
        usuario_repo: UsuarioRepository,
        perfil_repo: PerfilRepository,
        jwt_secret: String,
        pool: sqlx::PgPool,
    ) -> Self {
        Self {
            usuario_repo,
            perfil_repo,
            jwt_secret,
            pool,
        }
    }

    pub async fn login(&self, cpf: &str, senha: &str) -> Result<ParTokens, AppError> {
        let usuario = self
            .usuario_repo
            .find_by_cpf(cpf)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let senha_clone = senha.to_owned();
        let hash_clone = usuario.senha_hash.clone();

        // Verificação de bcrypt fora do executor async
        let senha_confere = tokio::task::spawn_blocking(move || verify(&senha_clone, &hash_clone))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !senha_confere {
            return Err(AppError::InvalidCredentials);
        }

        match usuario.status {
            StatusUsuario::Ativo => {}
            StatusUsuario::Inativo => return Err(AppError::InactiveUser),
            StatusUsuario::Pendente => return Err(AppError::PendingUser),
        }

        self.criar_par_tokens(&usuario).await
    }

    /// Troca um refresh token válido por um novo par (rotação stateless).
    pub async fn refresh(&self, payload: &RefreshPayload) -> Result<ParTokens, AppError> {
        let claims = self.decodificar(&payload.refresh_token)?;
        if claims.tipo != TipoToken::Refresh {
            return Err(AppError::InvalidRefreshToken);
        }

        let usuario = self
            .usuario_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidRefreshToken)?;

        if usuario.status != StatusUsuario::Ativo {
            return Err(AppError::InvalidRefreshToken);
        }

        self.criar_par_tokens(&usuario).await
    }

    /// Valida um access token e carrega o usuário com o slug do perfil.
    /// Usado pelo middleware em toda rota protegida.
    pub async fn validar_access(&self, token: &str) -> Result<UsuarioAutenticado, AppError> {
        let claims = self.decodificar(token).map_err(|_| AppError::InvalidToken)?;
        if claims.tipo != TipoToken::Access {
            return Err(AppError::InvalidToken);
        }

        let usuario = self
            .usuario_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)?;

        match usuario.status {
            StatusUsuario::Ativo => {}
            StatusUsuario::Inativo => return Err(AppError::InactiveUser),
            StatusUsuario::Pendente => return Err(AppError::PendingUser),
        }

        let perfil = self
            .perfil_repo
            .find_by_id(usuario.perfil_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("perfil {} inexistente", usuario.perfil_id))?;

        Ok(UsuarioAutenticado {
            usuario,
            perfil: perfil.nome,
        })
    }

    pub async fn atualizar_senha(
        &self,
        usuario: &Usuario,
        payload: &UpdatePasswordPayload,
    ) -> Result<(), AppError> {
        // Conta recém-provisionada troca a senha padrão sem informar a atual.
        if !usuario.senha_padrao {
            let atual = payload
                .senha_atual
                .clone()
                .ok_or(AppError::InvalidCredentials)?;
            let hash_clone = usuario.senha_hash.clone();

            let confere = tokio::task::spawn_blocking(move || verify(&atual, &hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

            if !confere {
                return Err(AppError::InvalidCredentials);
            }
        }

        let nova = payload.senha.clone();
        let nova_hash = tokio::task::spawn_blocking(move || hash(&nova, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        self.usuario_repo.update_senha(usuario.id, &nova_hash).await
    }

    /// Autocadastro do motoboy: nasce PENDENTE e aguarda ativação.
    pub async fn registrar(&self, payload: &RegisterPayload) -> Result<Usuario, AppError> {
        let perfil = self
            .perfil_repo
            .find_by_nome(PerfilKind::Motoboy.as_str())
            .await?
            .ok_or_else(|| anyhow::anyhow!("perfil motoboy não provisionado"))?;

        let dados = DadosPerfil::montar(PerfilKind::Motoboy, payload.campos_motoboy())?;

        let senha_clone = payload.senha.clone();
        let senha_hash = tokio::task::spawn_blocking(move || hash(&senha_clone, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let novo = NovoUsuario {
            nome_completo: payload.nome_completo.clone(),
            email: payload.email.clone(),
            cpf: payload.cpf.clone(),
            senha_hash,
            perfil_id: perfil.id,
            status: StatusUsuario::Pendente,
            senha_padrao: false,
            telefone: payload.telefone.clone(),
            data_nascimento: payload.data_nascimento,
            endereco: payload.endereco.clone(),
            dados,
        };

        let mut conn = self.pool.acquire().await?;
        self.usuario_repo.create(&mut *conn, &novo).await
    }

    fn decodificar(&self, token: &str) -> Result<Claims, AppError> {
        let dados = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;
        Ok(dados.claims)
    }

    async fn criar_par_tokens(&self, usuario: &Usuario) -> Result<ParTokens, AppError> {
        let perfil = self
            .perfil_repo
            .find_by_id(usuario.perfil_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("perfil {} inexistente", usuario.perfil_id))?;

        Ok(ParTokens {
            access_token: self.criar_token(
                usuario,
                &perfil.nome,
                TipoToken::Access,
                chrono::Duration::minutes(ACCESS_TTL_MINUTOS),
            )?,
            refresh_token: self.criar_token(
                usuario,
                &perfil.nome,
                TipoToken::Refresh,
                chrono::Duration::days(REFRESH_TTL_DIAS),
            )?,
        })
    }

    fn criar_token(
        &self,
        usuario: &Usuario,
        perfil: &str,
        tipo: TipoToken,
        validade: chrono::Duration,
    ) -> Result<String, AppError> {
        let agora = Utc::now();
        let claims = Claims {
            sub: usuario.id,
            perfil: perfil.to_string(),
            tipo,
            exp: (agora + validade).timestamp() as usize,
            iat: agora.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
