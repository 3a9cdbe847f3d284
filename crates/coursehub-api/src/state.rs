//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use coursehub_core::config::AppConfig;
use coursehub_database::repositories::grant::GrantRepository;
use coursehub_database::repositories::invite::InviteRepository;
use coursehub_database::repositories::link::LinkRepository;
use coursehub_database::repositories::resource::ResourceRepository;
use coursehub_service::notifier::{InviteNotifier, LogNotifier, WebhookNotifier};
use coursehub_service::share::access::AccessService;
use coursehub_service::share::authority::ShareAuthorizer;
use coursehub_service::share::invite::InviteService;
use coursehub_service::share::link::LinkService;
use coursehub_service::token::TokenGenerator;

use coursehub_core::error::AppError;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,
    /// Invitation lifecycle service.
    pub invite_service: Arc<InviteService>,
    /// Share link service.
    pub link_service: Arc<LinkService>,
    /// Access evaluation service.
    pub access_service: Arc<AccessService>,
}

impl AppState {
    /// Wire repositories and services from a config and a connected pool.
    pub fn build(config: AppConfig, db_pool: PgPool) -> Result<Self, AppError> {
        let grant_repo = Arc::new(GrantRepository::new(db_pool.clone()));
        let invite_repo = Arc::new(InviteRepository::new(db_pool.clone()));
        let link_repo = Arc::new(LinkRepository::new(db_pool.clone()));
        let resource_repo = Arc::new(ResourceRepository::new(db_pool.clone()));

        let authorizer = Arc::new(ShareAuthorizer::new(
            Arc::clone(&resource_repo),
            Arc::clone(&grant_repo),
        ));
        let token_generator = Arc::new(TokenGenerator::new(&config.share));

        let notifier: Arc<dyn InviteNotifier> = if config.notifier.enabled {
            Arc::new(WebhookNotifier::new(&config.notifier)?)
        } else {
            Arc::new(LogNotifier)
        };

        let invite_service = Arc::new(InviteService::new(
            db_pool.clone(),
            Arc::clone(&invite_repo),
            Arc::clone(&grant_repo),
            Arc::clone(&authorizer),
            Arc::clone(&token_generator),
            notifier,
            config.share.clone(),
        ));

        let link_service = Arc::new(LinkService::new(
            db_pool.clone(),
            Arc::clone(&link_repo),
            Arc::clone(&grant_repo),
            Arc::clone(&authorizer),
            Arc::clone(&token_generator),
            config.share.clone(),
        ));

        let access_service = Arc::new(AccessService::new(
            Arc::clone(&grant_repo),
            Arc::clone(&authorizer),
        ));

        Ok(Self {
            config: Arc::new(config),
            db_pool,
            invite_service,
            link_service,
            access_service,
        })
    }
}
