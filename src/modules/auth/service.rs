use crate::api::error;
use crate::modules::auth::{
    model::{LoginModel, LoginResponse},
    schema::AdminAccount,
};
use crate::utils::{verify_password, Claims};

#[derive(Clone)]
pub struct AuthService {
    accounts: Vec<AdminAccount>,
    secret: String,
    expiration: u64,
}

impl AuthService {
    pub fn new(accounts: Vec<AdminAccount>, secret: impl Into<String>, expiration: u64) -> Self {
        Self { accounts, secret: secret.into(), expiration }
    }

    pub fn login(&self, model: LoginModel) -> Result<LoginResponse, error::SystemError> {
        let account = self
            .accounts
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(model.email.trim()))
            .ok_or_else(|| error::SystemError::unauthorized("Invalid email or password"))?;

        let valid = verify_password(&account.password_hash, &model.password)?;
        if !valid {
            return Err(error::SystemError::unauthorized("Invalid email or password"));
        }

        let access_token =
            Claims::new(&account.email, &account.role, self.expiration).encode(self.secret.as_bytes())?;
        log::info!("{} signed in as {:?}", account.email, account.role);

        Ok(LoginResponse { access_token, role: account.role, expires_in: self.expiration })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, error::SystemError> {
        Claims::decode(token, self.secret.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::auth::schema::AdminRole;
    use crate::utils::hash_password;

    fn service() -> AuthService {
        let accounts = vec![
            AdminAccount {
                email: "admin@portfolio.com".into(),
                password_hash: hash_password("portfolio2024").unwrap(),
                role: AdminRole::Admin,
            },
            AdminAccount {
                email: "photo@portfolio.com".into(),
                password_hash: hash_password("lumiere").unwrap(),
                role: AdminRole::Photographer,
            },
        ];
        AuthService::new(accounts, "test-secret", 3600)
    }

    fn login(email: &str, password: &str) -> LoginModel {
        LoginModel { email: email.into(), password: password.into() }
    }

    #[test]
    fn valid_login_issues_token() {
        let svc = service();
        let res = svc.login(login("Photo@Portfolio.com", "lumiere")).unwrap();
        assert_eq!(res.role, AdminRole::Photographer);

        let claims = svc.verify(&res.access_token).unwrap();
        assert_eq!(claims.sub, "photo@portfolio.com");
        assert_eq!(claims.role, AdminRole::Photographer);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn wrong_password_or_email_is_unauthorized() {
        let svc = service();
        assert!(matches!(
            svc.login(login("admin@portfolio.com", "nope")),
            Err(error::SystemError::Unauthorized(_))
        ));
        assert!(matches!(
            svc.login(login("ghost@portfolio.com", "portfolio2024")),
            Err(error::SystemError::Unauthorized(_))
        ));
    }

    #[test]
    fn foreign_token_is_rejected() {
        let token = Claims::new("x", &AdminRole::Admin, 60).encode(b"other").unwrap();
        assert!(service().verify(&token).is_err());
    }
}
