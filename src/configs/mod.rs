use actix_web::{middleware::from_fn, web};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    api::error,
    constants::Env,
    middlewares::{authentication, authorization},
    modules::{
        auth::{self, AdminAccount, AdminRole, AuthService},
        autosave::{self, AutoSave, AutoSaveConfig},
        category::{self, CategoryRepository, CategoryRepositoryJson, CategoryService},
        gallery::{self, GalleryRepository, GalleryRepositoryJson, GalleryService},
        photo::{self, PhotoRepository, PhotoRepositoryJson, PhotoService, UploadConfig},
        settings::{self, SettingsRepositoryJson, SettingsService},
        stats::{self, StatsService},
        storage::DirtyFlag,
        version_control::{git::GitConfig, ChangeLog, GitSink, VersionControlSink},
    },
};

/// Everything needed to assemble the services, decoupled from the process environment.
#[derive(Debug, Clone)]
pub struct CmsConfig {
    pub data_dir: PathBuf,
    pub upload: UploadConfig,
    pub accounts: Vec<AdminAccount>,
    pub jwt_secret: String,
    pub access_token_expiration: u64,
    pub autosave: AutoSaveConfig,
    pub git: GitConfig,
}

impl CmsConfig {
    pub fn from_env(env: &Env) -> Self {
        let mut accounts = vec![AdminAccount {
            email: env.admin_email.clone(),
            password_hash: env.admin_password_hash.clone(),
            role: AdminRole::Admin,
        }];
        if let (Some(email), Some(hash)) = (&env.photographer_email, &env.photographer_password_hash) {
            accounts.push(AdminAccount {
                email: email.clone(),
                password_hash: hash.clone(),
                role: AdminRole::Photographer,
            });
        }

        let data_dir = PathBuf::from(&env.data_dir);
        let upload_dir = PathBuf::from(&env.upload_dir);

        CmsConfig {
            upload: UploadConfig {
                max_file_size: env.max_upload_size,
                upload_dir: env.upload_dir.clone(),
                base_url: env.upload_url_prefix.clone(),
                ..UploadConfig::default()
            },
            accounts,
            jwt_secret: env.jwt_secret.clone(),
            access_token_expiration: env.access_token_expiration,
            autosave: AutoSaveConfig {
                enabled: env.autosave_enabled,
                interval: Duration::from_secs(env.autosave_interval_secs.max(1)),
            },
            git: GitConfig {
                repo_dir: PathBuf::from(&env.git_repo_dir),
                tracked: vec![data_dir.clone(), upload_dir],
                remote: env.git_remote.clone(),
                branch: env.git_branch.clone(),
                push: env.git_push,
            },
            data_dir,
        }
    }
}

#[derive(Clone)]
pub struct AppServices {
    pub photos: PhotoService,
    pub galleries: GalleryService,
    pub categories: CategoryService,
    pub settings: SettingsService,
    pub stats: StatsService,
    pub auth: AuthService,
    pub autosave: Arc<AutoSave>,
    pub upload_url_prefix: String,
}

impl AppServices {
    pub async fn build(config: CmsConfig) -> Result<Self, error::SystemError> {
        let sink = Arc::new(GitSink::new(config.git.clone()));
        Self::with_sink(config, sink).await
    }

    /// Creates the data and upload directories and wires every service over
    /// one shared dirty flag.
    pub async fn with_sink(
        config: CmsConfig,
        sink: Arc<dyn VersionControlSink + Send + Sync>,
    ) -> Result<Self, error::SystemError> {
        tokio::fs::create_dir_all(&config.data_dir).await?;
        tokio::fs::create_dir_all(&config.upload.upload_dir).await?;

        let dirty = DirtyFlag::default();
        let data = |name: &str| config.data_dir.join(name);

        let photo_repo: Arc<dyn PhotoRepository + Send + Sync> =
            Arc::new(PhotoRepositoryJson::new(data("photos.json"), dirty.clone()));
        let gallery_repo: Arc<dyn GalleryRepository + Send + Sync> =
            Arc::new(GalleryRepositoryJson::new(data("galleries.json"), dirty.clone()));
        let category_repo: Arc<dyn CategoryRepository + Send + Sync> =
            Arc::new(CategoryRepositoryJson::new(data("categories.json"), dirty.clone()));
        let settings_repo = Arc::new(SettingsRepositoryJson::new(data("settings.json"), dirty.clone()));

        let autosave = AutoSave::new(dirty, sink, config.autosave.clone())
            .with_change_log(ChangeLog::new(data("cms/change-log.json")));

        log::info!(
            "Data in {}, uploads in {}",
            config.data_dir.display(),
            config.upload.upload_dir
        );

        Ok(Self {
            photos: PhotoService::new(photo_repo.clone(), config.upload.clone()),
            galleries: GalleryService::new(gallery_repo.clone(), photo_repo.clone()),
            categories: CategoryService::new(category_repo.clone(), photo_repo.clone()),
            settings: SettingsService::new(settings_repo),
            stats: StatsService::new(photo_repo, gallery_repo, category_repo),
            auth: AuthService::new(config.accounts, config.jwt_secret, config.access_token_expiration),
            autosave: Arc::new(autosave),
            upload_url_prefix: config.upload.base_url,
        })
    }
}

/// Registers services and routes: public `/api`, authenticated `/api/cms`,
/// and the stored uploads.
pub fn configure(services: AppServices) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::JsonConfig::default().error_handler(|err, _| {
            error::Error::bad_request(err.to_string()).into()
        }))
        .app_data(web::QueryConfig::default().error_handler(|err, _| {
            error::Error::bad_request(err.to_string()).into()
        }))
        .app_data(web::Data::new(services.photos))
        .app_data(web::Data::new(services.galleries))
        .app_data(web::Data::new(services.categories))
        .app_data(web::Data::new(services.settings))
        .app_data(web::Data::new(services.stats))
        .app_data(web::Data::new(services.auth))
        .app_data(web::Data::from(services.autosave))
        .configure(photo::route::uploads_configure(services.upload_url_prefix))
        .service(
            web::scope("/api")
                .configure(auth::route::public_api_configure)
                .configure(photo::route::public_api_configure)
                .configure(gallery::route::public_api_configure)
                .configure(settings::route::public_api_configure)
                .service(
                    web::scope("/cms")
                        .wrap(from_fn(authorization(vec![AdminRole::Admin, AdminRole::Photographer])))
                        .wrap(from_fn(authentication))
                        .configure(photo::route::configure)
                        .configure(gallery::route::configure)
                        .configure(category::route::configure)
                        .configure(stats::route::configure)
                        .service(
                            web::scope("")
                                .wrap(from_fn(authorization(vec![AdminRole::Admin])))
                                .configure(settings::route::configure)
                                .configure(autosave::route::configure),
                        ),
                ),
        );
    }
}
