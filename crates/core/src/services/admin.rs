//! Admin accounts, login, and server-side sessions.

use chrono::{Duration, Utc};
use sea_orm::Set;
use techsprint_common::{hash_password, verify_password, AppError, AppResult, IdGenerator};
use techsprint_db::{
    entities::{admin, admin::AdminRole, admin_session},
    repositories::{AdminRepository, AdminSessionRepository},
};

/// Admin service: authentication, sessions, and account management.
#[derive(Clone)]
pub struct AdminService {
    admin_repo: AdminRepository,
    session_repo: AdminSessionRepository,
    id_gen: IdGenerator,
    session_ttl_minutes: i64,
}

/// Input for creating an admin account.
pub struct CreateAdminInput {
    pub username: String,
    pub password: String,
    pub role: AdminRole,
}

/// Successful login: the admin row and its fresh session.
pub struct LoginResult {
    pub admin: admin::Model,
    pub session: admin_session::Model,
}

impl AdminService {
    /// Create a new admin service.
    #[must_use]
    pub const fn new(
        admin_repo: AdminRepository,
        session_repo: AdminSessionRepository,
        session_ttl_minutes: i64,
    ) -> Self {
        Self {
            admin_repo,
            session_repo,
            id_gen: IdGenerator::new(),
            session_ttl_minutes,
        }
    }

    /// Log in and create a session.
    ///
    /// Unknown username, wrong password, and deactivated accounts all
    /// surface the same `Unauthorized` so the response does not leak which
    /// part failed.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginResult> {
        let admin = self
            .admin_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !admin.active {
            return Err(AppError::Unauthorized);
        }

        if !verify_password(password, &admin.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        let now = Utc::now();
        let session = admin_session::ActiveModel {
            id: Set(self.id_gen.generate()),
            admin_id: Set(admin.id.clone()),
            token: Set(self.id_gen.generate_token()),
            created_at: Set(now.into()),
            expires_at: Set((now + Duration::minutes(self.session_ttl_minutes)).into()),
        };
        let session = self.session_repo.create(session).await?;

        tracing::info!(admin = %admin.username, role = ?admin.role, "Admin logged in");

        Ok(LoginResult { admin, session })
    }

    /// Authenticate a bearer token.
    ///
    /// Rejects unknown tokens, expired sessions (reaped on sight), and
    /// sessions whose admin has been deactivated since login.
    pub async fn authenticate(&self, token: &str) -> AppResult<admin::Model> {
        let session = self
            .session_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if session.expires_at < Utc::now() {
            if let Err(e) = self.session_repo.delete_by_token(token).await {
                tracing::warn!(error = %e, "Failed to reap expired session");
            }
            return Err(AppError::Unauthorized);
        }

        let admin = self
            .admin_repo
            .find_by_id(&session.admin_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !admin.active {
            return Err(AppError::Unauthorized);
        }

        Ok(admin)
    }

    /// Log out: delete the session server-side. Idempotent.
    pub async fn logout(&self, token: &str) -> AppResult<()> {
        self.session_repo.delete_by_token(token).await?;
        Ok(())
    }

    /// Create an admin account (main admin).
    pub async fn create(&self, input: CreateAdminInput) -> AppResult<admin::Model> {
        let username = input.username.trim();
        if username.is_empty() {
            return Err(AppError::BadRequest("Username is required".to_string()));
        }
        if input.password.len() < 8 {
            return Err(AppError::BadRequest(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        if self.admin_repo.find_by_username(username).await?.is_some() {
            return Err(AppError::BadRequest("Username already taken".to_string()));
        }

        let model = admin::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(username.to_string()),
            password_hash: Set(hash_password(&input.password)?),
            role: Set(input.role),
            active: Set(true),
            created_at: Set(Utc::now().into()),
        };

        self.admin_repo.create(model).await
    }

    /// List all admin accounts (main admin).
    pub async fn list(&self) -> AppResult<Vec<admin::Model>> {
        self.admin_repo.list().await
    }

    /// Activate or deactivate an account; deactivation also revokes its
    /// sessions (main admin).
    pub async fn set_active(&self, id: &str, active: bool) -> AppResult<admin::Model> {
        let admin = self.admin_repo.get_by_id(id).await?;
        let mut model: admin::ActiveModel = admin.into();
        model.active = Set(active);
        let updated = self.admin_repo.update(model).await?;

        if !active {
            self.session_repo.delete_by_admin(id).await?;
        }

        Ok(updated)
    }

    /// Delete an account and its sessions (main admin).
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.session_repo.delete_by_admin(id).await?;
        let removed = self.admin_repo.delete_by_id(id).await?;
        if removed == 0 {
            return Err(AppError::NotFound(format!("Admin {id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn admin_row(id: &str, username: &str, password: &str, active: bool) -> admin::Model {
        admin::Model {
            id: id.to_string(),
            username: username.to_string(),
            password_hash: hash_password(password).unwrap(),
            role: AdminRole::Sub,
            active,
            created_at: Utc::now().into(),
        }
    }

    fn session_row(admin_id: &str, token: &str, ttl_minutes: i64) -> admin_session::Model {
        let now = Utc::now();
        admin_session::Model {
            id: "sess1".to_string(),
            admin_id: admin_id.to_string(),
            token: token.to_string(),
            created_at: now.into(),
            expires_at: (now + Duration::minutes(ttl_minutes)).into(),
        }
    }

    fn service(
        admin_db: Arc<sea_orm::DatabaseConnection>,
        session_db: Arc<sea_orm::DatabaseConnection>,
    ) -> AdminService {
        AdminService::new(
            AdminRepository::new(admin_db),
            AdminSessionRepository::new(session_db),
            60,
        )
    }

    #[tokio::test]
    async fn test_login_success_creates_session() {
        let admin_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[admin_row("adm1", "verifier", "hunter22aa", true)]])
                .into_connection(),
        );
        let session_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[session_row("adm1", "tok", 60)]])
                .into_connection(),
        );

        let svc = service(admin_db, session_db);
        let result = svc.login("verifier", "hunter22aa").await.unwrap();
        assert_eq!(result.admin.id, "adm1");
        assert_eq!(result.session.admin_id, "adm1");
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_unauthorized() {
        let admin_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[admin_row("adm1", "verifier", "hunter22aa", true)]])
                .into_connection(),
        );
        let session_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let svc = service(admin_db, session_db);
        assert!(matches!(
            svc.login("verifier", "wrong").await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_login_inactive_admin_is_unauthorized() {
        let admin_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[admin_row("adm1", "verifier", "hunter22aa", false)]])
                .into_connection(),
        );
        let session_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let svc = service(admin_db, session_db);
        assert!(matches!(
            svc.login("verifier", "hunter22aa").await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_login_unknown_username_is_unauthorized() {
        let admin_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<admin::Model>::new()])
                .into_connection(),
        );
        let session_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let svc = service(admin_db, session_db);
        assert!(matches!(
            svc.login("nobody", "whatever12").await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_authenticate_valid_token() {
        let admin_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[admin_row("adm1", "verifier", "hunter22aa", true)]])
                .into_connection(),
        );
        let session_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[session_row("adm1", "tok", 60)]])
                .into_connection(),
        );

        let svc = service(admin_db, session_db);
        let admin = svc.authenticate("tok").await.unwrap();
        assert_eq!(admin.id, "adm1");
    }

    #[tokio::test]
    async fn test_authenticate_expired_session_is_unauthorized() {
        let admin_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let session_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[session_row("adm1", "tok", -5)]])
                // expired-session reap
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let svc = service(admin_db, session_db);
        assert!(matches!(
            svc.authenticate("tok").await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_token_is_unauthorized() {
        let admin_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let session_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<admin_session::Model>::new()])
                .into_connection(),
        );

        let svc = service(admin_db, session_db);
        assert!(matches!(
            svc.authenticate("ghost").await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_short_password() {
        let empty = || Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let svc = service(empty(), empty());

        let result = svc
            .create(CreateAdminInput {
                username: "newadmin".to_string(),
                password: "short".to_string(),
                role: AdminRole::Sub,
            })
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
