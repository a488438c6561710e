//! In-memory backends shared by the integration test binaries.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicI64, AtomicU64, AtomicUsize, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::RwLock;

use quizdeck_server::{
    app_state::AppState,
    cache::CacheStore,
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{
        Answer, NewPermission, NewQuiz, NewRole, NewUser, Permission, Question, Quiz, Role, User,
    },
    models::dto::request::RegisterRequest,
    repositories::{PermissionRepository, QuizRepository, RoleRepository, UserRepository},
};

/// Cache fake driven by a logical clock, so TTL expiry is tested by calling
/// [`InMemoryCacheStore::advance`] instead of sleeping.
pub struct InMemoryCacheStore {
    clock: AtomicU64,
    entries: std::sync::Mutex<HashMap<String, (String, u64)>>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self {
            clock: AtomicU64::new(0),
            entries: std::sync::Mutex::new(HashMap::new()),
        }
    }

    pub fn advance(&self, secs: u64) {
        self.clock.fetch_add(secs, Ordering::SeqCst);
    }

    pub fn contains(&self, key: &str) -> bool {
        let now = self.clock.load(Ordering::SeqCst);
        self.entries
            .lock()
            .expect("lock cache entries")
            .get(key)
            .is_some_and(|(_, expires_at)| now < *expires_at)
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let now = self.clock.load(Ordering::SeqCst);
        let mut entries = self.entries.lock().expect("lock cache entries");

        match entries.get(key) {
            Some((value, expires_at)) if now < *expires_at => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl_secs: u64) -> AppResult<()> {
        let now = self.clock.load(Ordering::SeqCst);
        self.entries
            .lock()
            .expect("lock cache entries")
            .insert(key.to_string(), (value.to_string(), now + ttl_secs));
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.lock().expect("lock cache entries").remove(key);
        Ok(())
    }
}

pub struct InMemoryUserRepository {
    users: RwLock<HashMap<i64, User>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: NewUser) -> AppResult<User> {
        let mut users = self.users.write().await;
        // Mirror the unique indexes
        if users
            .values()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(AppError::DatabaseError(format!(
                "duplicate key on users: {}",
                user.username
            )));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let user = User::new(id, user.username, user.email, user.password_hash);
        users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> AppResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == username || u.email == email)
            .cloned())
    }

    async fn update_roles(&self, id: i64, role_ids: &[i64]) -> AppResult<User> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", id)))?;
        user.role_ids = role_ids.to_vec();
        Ok(user.clone())
    }

    async fn remove_role_from_all(&self, role_id: i64) -> AppResult<()> {
        let mut users = self.users.write().await;
        for user in users.values_mut() {
            user.role_ids.retain(|id| *id != role_id);
        }
        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

pub struct InMemoryRoleRepository {
    roles: RwLock<HashMap<i64, Role>>,
    next_id: AtomicI64,
}

impl InMemoryRoleRepository {
    pub fn new() -> Self {
        Self {
            roles: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn insert(&self, role: NewRole) -> AppResult<Role> {
        let mut roles = self.roles.write().await;
        if roles.values().any(|r| r.name == role.name) {
            return Err(AppError::DatabaseError(format!(
                "duplicate key on roles: {}",
                role.name
            )));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let role = Role {
            id,
            name: role.name,
            description: role.description,
            permission_ids: role.permission_ids,
        };
        roles.insert(id, role.clone());
        Ok(role)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Role>> {
        Ok(self.roles.read().await.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<Role>> {
        let roles = self.roles.read().await;
        let mut found: Vec<Role> = ids.iter().filter_map(|id| roles.get(id).cloned()).collect();
        found.sort_by_key(|r| r.id);
        found.dedup_by_key(|r| r.id);
        Ok(found)
    }

    async fn find_all(&self) -> AppResult<Vec<Role>> {
        let mut roles: Vec<Role> = self.roles.read().await.values().cloned().collect();
        roles.sort_by_key(|r| r.id);
        Ok(roles)
    }

    async fn update(&self, role: Role) -> AppResult<Role> {
        let mut roles = self.roles.write().await;
        if !roles.contains_key(&role.id) {
            return Err(AppError::NotFound(format!(
                "Role with id '{}' not found",
                role.id
            )));
        }
        roles.insert(role.id, role.clone());
        Ok(role)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.roles.write().await.remove(&id).is_some())
    }

    async fn remove_permission_from_all(&self, permission_id: i64) -> AppResult<()> {
        let mut roles = self.roles.write().await;
        for role in roles.values_mut() {
            role.permission_ids.retain(|id| *id != permission_id);
        }
        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

pub struct InMemoryPermissionRepository {
    permissions: RwLock<HashMap<i64, Permission>>,
    next_id: AtomicI64,
}

impl InMemoryPermissionRepository {
    pub fn new() -> Self {
        Self {
            permissions: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl PermissionRepository for InMemoryPermissionRepository {
    async fn insert(&self, permission: NewPermission) -> AppResult<Permission> {
        let mut permissions = self.permissions.write().await;
        if permissions.values().any(|p| p.name == permission.name) {
            return Err(AppError::DatabaseError(format!(
                "duplicate key on permissions: {}",
                permission.name
            )));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let permission = Permission {
            id,
            name: permission.name,
            description: permission.description,
            resource: permission.resource,
            action: permission.action,
        };
        permissions.insert(id, permission.clone());
        Ok(permission)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Permission>> {
        Ok(self.permissions.read().await.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<Permission>> {
        let permissions = self.permissions.read().await;
        let mut found: Vec<Permission> =
            ids.iter().filter_map(|id| permissions.get(id).cloned()).collect();
        found.sort_by_key(|p| p.id);
        found.dedup_by_key(|p| p.id);
        Ok(found)
    }

    async fn find_all(&self) -> AppResult<Vec<Permission>> {
        let mut permissions: Vec<Permission> =
            self.permissions.read().await.values().cloned().collect();
        permissions.sort_by_key(|p| p.id);
        Ok(permissions)
    }

    async fn update(&self, permission: Permission) -> AppResult<Permission> {
        let mut permissions = self.permissions.write().await;
        if !permissions.contains_key(&permission.id) {
            return Err(AppError::NotFound(format!(
                "Permission with id '{}' not found",
                permission.id
            )));
        }
        permissions.insert(permission.id, permission.clone());
        Ok(permission)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.permissions.write().await.remove(&id).is_some())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Stores whole quiz trees. Child deletes edit the tree in place, so the
/// sequencing of a cascade is still observable through the per-method call
/// counters.
pub struct InMemoryQuizRepository {
    quizzes: RwLock<HashMap<i64, Quiz>>,
    next_quiz_id: AtomicI64,
    next_question_id: AtomicI64,
    next_answer_id: AtomicI64,
    pub find_all_calls: AtomicUsize,
    pub find_by_id_calls: AtomicUsize,
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self {
            quizzes: RwLock::new(HashMap::new()),
            next_quiz_id: AtomicI64::new(1),
            next_question_id: AtomicI64::new(1),
            next_answer_id: AtomicI64::new(1),
            find_all_calls: AtomicUsize::new(0),
            find_by_id_calls: AtomicUsize::new(0),
        }
    }

    pub async fn count(&self) -> usize {
        self.quizzes.read().await.len()
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn find_all(&self) -> AppResult<Vec<Quiz>> {
        self.find_all_calls.fetch_add(1, Ordering::SeqCst);
        let mut quizzes: Vec<Quiz> = self.quizzes.read().await.values().cloned().collect();
        quizzes.sort_by_key(|q| q.id);
        Ok(quizzes)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Quiz>> {
        self.find_by_id_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.quizzes.read().await.get(&id).cloned())
    }

    async fn insert(&self, quiz: NewQuiz) -> AppResult<Quiz> {
        let quiz_id = self.next_quiz_id.fetch_add(1, Ordering::SeqCst);

        let mut questions = Vec::with_capacity(quiz.questions.len());
        for new_question in quiz.questions {
            let question_id = self.next_question_id.fetch_add(1, Ordering::SeqCst);
            let answers = new_question
                .answers
                .into_iter()
                .map(|a| Answer {
                    id: self.next_answer_id.fetch_add(1, Ordering::SeqCst),
                    question_id,
                    text: a.text,
                    is_correct: a.is_correct,
                })
                .collect();
            questions.push(Question {
                id: question_id,
                quiz_id,
                text: new_question.text,
                answers,
            });
        }

        let quiz = Quiz {
            id: quiz_id,
            title: quiz.title,
            questions,
        };
        self.quizzes.write().await.insert(quiz_id, quiz.clone());
        Ok(quiz)
    }

    async fn update_title(&self, id: i64, title: &str) -> AppResult<bool> {
        let mut quizzes = self.quizzes.write().await;
        match quizzes.get_mut(&id) {
            Some(quiz) => {
                quiz.title = title.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_answer(&self, id: i64) -> AppResult<bool> {
        let mut quizzes = self.quizzes.write().await;
        for quiz in quizzes.values_mut() {
            for question in &mut quiz.questions {
                let before = question.answers.len();
                question.answers.retain(|a| a.id != id);
                if question.answers.len() < before {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    async fn delete_question(&self, id: i64) -> AppResult<bool> {
        let mut quizzes = self.quizzes.write().await;
        for quiz in quizzes.values_mut() {
            let before = quiz.questions.len();
            quiz.questions.retain(|q| q.id != id);
            if quiz.questions.len() < before {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn delete_quiz(&self, id: i64) -> AppResult<bool> {
        Ok(self.quizzes.write().await.remove(&id).is_some())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

/// An [`AppState`] wired to in-memory backends, with handles kept so tests
/// can inspect and manipulate them directly.
pub struct TestBackend {
    pub state: AppState,
    pub users: Arc<InMemoryUserRepository>,
    pub roles: Arc<InMemoryRoleRepository>,
    pub permissions: Arc<InMemoryPermissionRepository>,
    pub quizzes: Arc<InMemoryQuizRepository>,
    pub cache: Arc<InMemoryCacheStore>,
}

fn test_config() -> Config {
    Config {
        mongo_conn_string: "mongodb://localhost:27017".to_string(),
        mongo_db_name: "quizdb-test".to_string(),
        redis_url: "redis://localhost:6379".to_string(),
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 8080,
        jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
        jwt_expiration_hours: 1,
    }
}

pub fn test_backend() -> TestBackend {
    let users = Arc::new(InMemoryUserRepository::new());
    let roles = Arc::new(InMemoryRoleRepository::new());
    let permissions = Arc::new(InMemoryPermissionRepository::new());
    let quizzes = Arc::new(InMemoryQuizRepository::new());
    let cache = Arc::new(InMemoryCacheStore::new());

    let state = AppState::from_parts(
        test_config(),
        cache.clone(),
        users.clone(),
        roles.clone(),
        permissions.clone(),
        quizzes.clone(),
    );

    TestBackend {
        state,
        users,
        roles,
        permissions,
        quizzes,
        cache,
    }
}

/// Creates the named permissions, bundles them into a role, registers the
/// user and assigns the role. Returns the user id.
pub async fn register_with_grants(
    backend: &TestBackend,
    username: &str,
    password: &str,
    role_name: &str,
    grants: &[(&str, &str)],
) -> i64 {
    let mut permission_ids = Vec::new();
    for (resource, action) in grants {
        let permission = backend
            .permissions
            .insert(NewPermission {
                name: format!("{} {} ({})", resource, action, role_name),
                description: None,
                resource: resource.to_string(),
                action: action.to_string(),
            })
            .await
            .expect("insert permission");
        permission_ids.push(permission.id);
    }

    let role = backend
        .roles
        .insert(NewRole {
            name: role_name.to_string(),
            description: None,
            permission_ids,
        })
        .await
        .expect("insert role");

    let auth = backend
        .state
        .auth_service
        .register(RegisterRequest {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: password.to_string(),
        })
        .await
        .expect("register user");

    backend
        .state
        .permission_service
        .assign_role(auth.user.id, role.id)
        .await
        .expect("assign role");

    auth.user.id
}
