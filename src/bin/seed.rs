use quizdeck_server::{
    auth::password,
    config::Config,
    db::Database,
    errors::AppResult,
    models::domain::{NewAnswer, NewPermission, NewQuestion, NewQuiz, NewRole, NewUser},
    repositories::{
        MongoPermissionRepository, MongoQuizRepository, MongoRoleRepository, MongoUserRepository,
        PermissionRepository, QuizRepository, RoleRepository, UserRepository,
    },
};

/// Loads a development fixture set: the full permission catalog, the three
/// stock roles, one account per role and a sample quiz. Skips everything if
/// the admin account already exists.
#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Err(e) = seed().await {
        log::error!("Seeding failed: {}", e);
        std::process::exit(1);
    }
}

async fn seed() -> AppResult<()> {
    let config = Config::from_env();
    let db = Database::connect(&config).await?;

    let users = MongoUserRepository::new(&db);
    let roles = MongoRoleRepository::new(&db);
    let permissions = MongoPermissionRepository::new(&db);
    let quizzes = MongoQuizRepository::new(&db);

    users.ensure_indexes().await?;
    roles.ensure_indexes().await?;
    permissions.ensure_indexes().await?;
    quizzes.ensure_indexes().await?;

    if users.find_by_username("admin").await?.is_some() {
        log::info!("Seed data already present, nothing to do");
        return Ok(());
    }

    log::info!("Creating permissions");
    let catalog = [
        ("Read Quiz", "quiz", "read"),
        ("Create Quiz", "quiz", "create"),
        ("Update Quiz", "quiz", "update"),
        ("Delete Quiz", "quiz", "delete"),
        ("Submit Quiz", "quiz", "submit"),
        ("Read Permission", "permission", "read"),
        ("Create Permission", "permission", "create"),
        ("Update Permission", "permission", "update"),
        ("Delete Permission", "permission", "delete"),
        ("Read Role", "role", "read"),
        ("Create Role", "role", "create"),
        ("Update Role", "role", "update"),
        ("Delete Role", "role", "delete"),
        ("Manage User", "user", "manage"),
    ];
    let mut created = Vec::with_capacity(catalog.len());
    for (name, resource, action) in catalog {
        let permission = permissions
            .insert(NewPermission {
                name: name.to_string(),
                description: None,
                resource: resource.to_string(),
                action: action.to_string(),
            })
            .await?;
        log::info!("Created permission '{}'", permission.permission_string());
        created.push(permission);
    }

    log::info!("Creating roles");
    let admin_role = roles
        .insert(NewRole {
            name: "admin".to_string(),
            description: Some("Administrator with full access to all features".to_string()),
            permission_ids: created.iter().map(|p| p.id).collect(),
        })
        .await?;

    let moderator_role = roles
        .insert(NewRole {
            name: "moderator".to_string(),
            description: Some("Moderator with quiz management and read access".to_string()),
            permission_ids: created
                .iter()
                .filter(|p| {
                    p.resource == "quiz"
                        || (p.resource == "permission" && p.action == "read")
                        || (p.resource == "role" && p.action == "read")
                })
                .map(|p| p.id)
                .collect(),
        })
        .await?;

    let user_role = roles
        .insert(NewRole {
            name: "user".to_string(),
            description: Some("Regular user with basic quiz access".to_string()),
            permission_ids: created
                .iter()
                .filter(|p| p.resource == "quiz" && matches!(p.action.as_str(), "read" | "submit"))
                .map(|p| p.id)
                .collect(),
        })
        .await?;

    log::info!("Creating users");
    let accounts = [
        ("admin", "admin123", admin_role.id),
        ("moderator", "mod123", moderator_role.id),
        ("user", "user123", user_role.id),
    ];
    for (username, plain_password, role_id) in accounts {
        let password_hash = password::hash_password(plain_password).await?;
        let user = users
            .insert(NewUser {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password_hash,
            })
            .await?;
        users.update_roles(user.id, &[role_id]).await?;
        log::info!("Created user '{}' (password '{}')", username, plain_password);
    }

    let quiz = quizzes
        .insert(NewQuiz {
            title: "General Knowledge".to_string(),
            questions: vec![
                NewQuestion {
                    text: "What is the capital of France?".to_string(),
                    answers: vec![
                        NewAnswer {
                            text: "Paris".to_string(),
                            is_correct: true,
                        },
                        NewAnswer {
                            text: "London".to_string(),
                            is_correct: false,
                        },
                        NewAnswer {
                            text: "Berlin".to_string(),
                            is_correct: false,
                        },
                    ],
                },
                NewQuestion {
                    text: "Which planet is known as the Red Planet?".to_string(),
                    answers: vec![
                        NewAnswer {
                            text: "Venus".to_string(),
                            is_correct: false,
                        },
                        NewAnswer {
                            text: "Mars".to_string(),
                            is_correct: true,
                        },
                    ],
                },
            ],
        })
        .await?;
    log::info!("Created sample quiz '{}' with id {}", quiz.title, quiz.id);

    log::info!("Seed data created successfully");
    Ok(())
}
