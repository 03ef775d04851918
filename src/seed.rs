//! Demo data written through the repositories, so numbering and hashing
//! behave exactly as they do for API clients.

use chrono::NaiveDate;

use crate::entities::project::ProjectStatus;
use crate::entities::task::{TaskPriority, TaskStatus};
use crate::repositories::{ProjectDraft, RepoError, RepoResult, TaskDraft, UserDraft};
use crate::state::AppState;

struct DemoUser {
    name: &'static str,
    email: &'static str,
    projects: &'static [DemoProject],
}

struct DemoProject {
    title: &'static str,
    client: &'static str,
    status: ProjectStatus,
    deadline: (i32, u32, u32),
    tasks: &'static [(&'static str, TaskStatus, TaskPriority)],
}

const DEMO_PASSWORD: &str = "password123";

const DEMO_USERS: &[DemoUser] = &[
    DemoUser {
        name: "alice",
        email: "alice@example.com",
        projects: &[
            DemoProject {
                title: "Corporate site renewal",
                client: "Acme",
                status: ProjectStatus::InProgress,
                deadline: (2025, 5, 31),
                tasks: &[
                    ("Wireframes", TaskStatus::Done, TaskPriority::High),
                    ("Top page markup", TaskStatus::Doing, TaskPriority::Medium),
                    ("Contact form", TaskStatus::Todo, TaskPriority::Low),
                ],
            },
            DemoProject {
                title: "Landing page",
                client: "Globex",
                status: ProjectStatus::NotStarted,
                deadline: (2025, 8, 15),
                tasks: &[("Copy review", TaskStatus::Todo, TaskPriority::Medium)],
            },
        ],
    },
    DemoUser {
        name: "bob",
        email: "bob@example.com",
        projects: &[DemoProject {
            title: "Inventory app",
            client: "Initech",
            status: ProjectStatus::Completed,
            deadline: (2024, 12, 20),
            tasks: &[("Release build", TaskStatus::Done, TaskPriority::High)],
        }],
    },
];

/// Creates the demo users with their projects and tasks; users that already
/// exist are left untouched.
pub async fn seed(state: &AppState) -> RepoResult<()> {
    for demo in DEMO_USERS {
        let created = state
            .users
            .create(UserDraft {
                name: demo.name.to_string(),
                email: demo.email.to_string(),
                password: DEMO_PASSWORD.to_string(),
            })
            .await;

        match created {
            Ok(_) => {}
            Err(RepoError::AlreadyExists) => {
                tracing::info!(name = demo.name, "Demo user already present, skipping");
                continue;
            }
            Err(e) => return Err(e),
        }

        for project in demo.projects {
            let deadline = date(project.deadline)?;
            let created_project = state
                .projects
                .create(
                    demo.name,
                    ProjectDraft {
                        title: project.title.to_string(),
                        description: String::new(),
                        platform: "Web".to_string(),
                        client: project.client.to_string(),
                        estimated_fee: 0.0,
                        status: project.status,
                        deadline,
                    },
                )
                .await?;

            for (title, status, priority) in project.tasks {
                state
                    .tasks
                    .create(
                        demo.name,
                        created_project.number,
                        TaskDraft {
                            title: title.to_string(),
                            description: format!("{title} for {}", project.title),
                            status: *status,
                            priority: *priority,
                            due_date: deadline,
                        },
                    )
                    .await?;
            }
        }
    }

    tracing::info!("Demo data seeded");
    Ok(())
}

fn date((year, month, day): (i32, u32, u32)) -> RepoResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| RepoError::InvalidArgument(format!("invalid date {year}-{month}-{day}")))
}
