pub struct Env {
    pub jwt_secret: String,
    pub access_token_expiration: u64,
    pub frontend_url: String,
    pub ip: String,
    pub port: u16,
    pub admin_email: String,
    pub admin_password_hash: String,
    pub photographer_email: Option<String>,
    pub photographer_password_hash: Option<String>,
    pub data_dir: String,
    pub upload_dir: String,
    pub upload_url_prefix: String,
    pub max_upload_size: usize,
    pub autosave_enabled: bool,
    pub autosave_interval_secs: u64,
    pub git_repo_dir: String,
    pub git_remote: String,
    pub git_branch: String,
    pub git_push: bool,
}

fn var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn flag(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(v) => matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

impl Env {
    fn new() -> Self {
        let jwt_secret = std::env::var("SECRET_KEY")
            .expect("SECRET_KEY must be set in .env file or environment variable");

        let access_token_expiration = var_or("ACCESS_TOKEN_EXPIRATION", "86400")
            .parse::<u64>()
            .expect("ACCESS_TOKEN_EXPIRATION must be a valid u64 integer");

        let admin_email = std::env::var("ADMIN_EMAIL")
            .expect("ADMIN_EMAIL must be set in .env file or environment variable");
        let admin_password_hash = std::env::var("ADMIN_PASSWORD_HASH")
            .expect("ADMIN_PASSWORD_HASH must be set in .env file or environment variable");
        let photographer_email = std::env::var("PHOTOGRAPHER_EMAIL").ok().filter(|v| !v.is_empty());
        let photographer_password_hash =
            std::env::var("PHOTOGRAPHER_PASSWORD_HASH").ok().filter(|v| !v.is_empty());

        let frontend_url = var_or("FRONTEND_URL", "http://localhost:3000");
        let ip = var_or("IP", "127.0.0.1");
        let port = var_or("PORT", "8080").parse::<u16>().expect("PORT must be a valid u16 integer");

        let data_dir = var_or("DATA_DIR", "./data");
        let upload_dir = var_or("UPLOAD_DIR", "./public/uploads/photos");
        let upload_url_prefix = var_or("UPLOAD_URL_PREFIX", "/uploads/photos");
        let max_upload_size = var_or("MAX_UPLOAD_SIZE", "10485760")
            .parse::<usize>()
            .expect("MAX_UPLOAD_SIZE must be a valid byte count");

        let autosave_enabled = flag("AUTOSAVE_ENABLED", true);
        let autosave_interval_secs = var_or("AUTOSAVE_INTERVAL_SECS", "300")
            .parse::<u64>()
            .expect("AUTOSAVE_INTERVAL_SECS must be a valid u64 integer");

        let git_repo_dir = var_or("GIT_REPO_DIR", ".");
        let git_remote = var_or("GIT_REMOTE", "origin");
        let git_branch = var_or("GIT_BRANCH", "main");
        let git_push = flag("GIT_PUSH", true);

        Env {
            jwt_secret,
            access_token_expiration,
            frontend_url,
            ip,
            port,
            admin_email,
            admin_password_hash,
            photographer_email,
            photographer_password_hash,
            data_dir,
            upload_dir,
            upload_url_prefix,
            max_upload_size,
            autosave_enabled,
            autosave_interval_secs,
            git_repo_dir,
            git_remote,
            git_branch,
            git_push,
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}
