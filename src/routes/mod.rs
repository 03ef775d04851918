pub mod admin;
pub mod health;
pub mod projects;
pub mod tasks;
pub mod users;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::FieldError;
use crate::middleware::{auth::auth_middleware, reserved::reserved_guard};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        users::signup,
        users::login,
        users::get_user,
        users::update_user,
        users::delete_user,
        projects::create_project,
        projects::list_projects,
        projects::get_project,
        projects::update_project,
        projects::delete_project,
        tasks::create_task,
        tasks::list_tasks,
        tasks::get_task,
        tasks::update_task,
        tasks::delete_task,
        admin::list_users,
        admin::delete_user,
        admin::list_projects,
        admin::delete_project,
        admin::list_tasks,
        admin::delete_task,
    ),
    components(
        schemas(
            FieldError,
            health::HealthResponse,
            users::SignupRequest,
            users::LoginRequest,
            users::LoginResponse,
            users::UpdateUserRequest,
            users::UserResponse,
            projects::CreateProjectRequest,
            projects::UpdateProjectRequest,
            projects::ProjectResponse,
            tasks::CreateTaskRequest,
            tasks::UpdateTaskRequest,
            tasks::TaskResponse,
            admin::UserForOwnerResponse,
            admin::ProjectForOwnerResponse,
            admin::TaskForOwnerResponse,
            crate::entities::project::ProjectStatus,
            crate::entities::task::TaskStatus,
            crate::entities::task::TaskPriority,
        )
    ),
    tags(
        (name = "General", description = "Service information"),
        (name = "Users", description = "Signup, login and the caller's own account"),
        (name = "Projects", description = "Projects of the authenticated user"),
        (name = "Tasks", description = "Tasks of one of the user's projects"),
        (name = "Admin", description = "Owner-scope listing and hard deletes")
    ),
    info(
        title = "Worktrack API",
        version = "0.1.0",
        description = "Multi-tenant project and task tracker",
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            utoipa::openapi::security::SecurityScheme::Http(
                utoipa::openapi::security::Http::new(
                    utoipa::openapi::security::HttpAuthScheme::Bearer,
                ),
            ),
        );
    }
}

pub fn create_routes(state: AppState) -> Router {
    let swagger_router: Router = SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into();

    // The reserved guard is added last so it runs before auth.
    let user_routes = Router::new()
        .route(
            "/{user}",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/{user}/projects",
            post(projects::create_project).get(projects::list_projects),
        )
        .route(
            "/{user}/projects/{project_id}",
            get(projects::get_project)
                .patch(projects::update_project)
                .delete(projects::delete_project),
        )
        .route(
            "/{user}/projects/{project_id}/tasks",
            post(tasks::create_task).get(tasks::list_tasks),
        )
        .route(
            "/{user}/projects/{project_id}/tasks/{task_id}",
            get(tasks::get_task)
                .patch(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route_layer(middleware::from_fn(auth_middleware))
        .route_layer(middleware::from_fn(reserved_guard));

    let admin_routes = Router::new()
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/{id}", delete(admin::delete_user))
        .route("/admin/projects", get(admin::list_projects))
        .route("/admin/projects/{id}", delete(admin::delete_project))
        .route("/admin/tasks", get(admin::list_tasks))
        .route("/admin/tasks/{id}", delete(admin::delete_task));

    let app_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/signup", post(users::signup))
        .route("/login", post(users::login))
        .merge(admin_routes)
        .merge(user_routes)
        .with_state(state);

    Router::new()
        .merge(swagger_router)
        .merge(app_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
