use std::sync::Arc;

use crate::{
    auth::JwtService,
    cache::{CacheStore, QuizCache, RedisCacheStore},
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        MongoPermissionRepository, MongoQuizRepository, MongoRoleRepository, MongoUserRepository,
        PermissionRepository, QuizRepository, RoleRepository, UserRepository,
    },
    services::{AuthService, PermissionService, QuizService},
};

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub permission_service: Arc<PermissionService>,
    pub quiz_service: Arc<QuizService>,
    pub jwt_service: Arc<JwtService>,
    pub cache_store: Arc<dyn CacheStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the real backends: MongoDB collections behind the repositories
    /// and Redis behind the cache. Index creation runs here so a fresh
    /// deployment is usable immediately.
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;
        let cache_store = Arc::new(RedisCacheStore::connect(&config.redis_url).await?);

        let user_repository = Arc::new(MongoUserRepository::new(&db));
        user_repository.ensure_indexes().await?;
        let role_repository = Arc::new(MongoRoleRepository::new(&db));
        role_repository.ensure_indexes().await?;
        let permission_repository = Arc::new(MongoPermissionRepository::new(&db));
        permission_repository.ensure_indexes().await?;
        let quiz_repository = Arc::new(MongoQuizRepository::new(&db));
        quiz_repository.ensure_indexes().await?;

        Ok(Self::from_parts(
            config,
            cache_store,
            user_repository,
            role_repository,
            permission_repository,
            quiz_repository,
        ))
    }

    /// Assembles the services from explicit backends. Tests hand in
    /// in-memory fakes here; `new` hands in the real ones.
    pub fn from_parts(
        config: Config,
        cache_store: Arc<dyn CacheStore>,
        user_repository: Arc<dyn UserRepository>,
        role_repository: Arc<dyn RoleRepository>,
        permission_repository: Arc<dyn PermissionRepository>,
        quiz_repository: Arc<dyn QuizRepository>,
    ) -> Self {
        let jwt_service = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_expiration_hours,
        ));

        let auth_service = Arc::new(AuthService::new(
            user_repository.clone(),
            role_repository.clone(),
            permission_repository.clone(),
            jwt_service.clone(),
        ));
        let permission_service = Arc::new(PermissionService::new(
            permission_repository,
            role_repository,
            user_repository,
        ));
        let quiz_cache = QuizCache::new(cache_store.clone(), quiz_repository.clone());
        let quiz_service = Arc::new(QuizService::new(quiz_repository, quiz_cache));

        Self {
            auth_service,
            permission_service,
            quiz_service,
            jwt_service,
            cache_store,
            config: Arc::new(config),
        }
    }
}
