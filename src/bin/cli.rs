//! Steward CLI - personal task assistant.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::disallowed_macros)]

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};

use steward::ai::{OpenAiProvider, OracleProvider};
use steward::engine::{Engine, RecommendationContext, TaskDraft, TaskUpdate};
use steward::entities::{HouseholdMember, Priority, TaskDomain, TaskStatus, UserProfile};
use steward::errors::StewardError;
use steward::storage::FileStorage;
use steward::ui;

#[derive(Parser)]
#[command(name = "steward")]
#[command(about = "Personal task assistant", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project root directory
    #[arg(long, global = true)]
    project: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the task store
    Init,

    /// Capture a new task
    Add {
        /// Task title
        #[arg(short, long)]
        title: String,

        /// Task description
        #[arg(short, long)]
        description: Option<String>,

        /// Domain (family, home, job, company, personal)
        #[arg(long, default_value = "personal")]
        domain: String,

        /// Priority (critical, high, medium, low, someday)
        #[arg(short, long)]
        priority: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,

        /// Estimated duration in minutes
        #[arg(long)]
        duration: Option<u32>,
    },

    /// List tasks
    List {
        /// Filter by status
        #[arg(short, long)]
        status: Option<String>,

        /// Only open tasks
        #[arg(long)]
        open: bool,
    },

    /// Show details of a task
    Show {
        /// Task ID
        id: String,
    },

    /// Set task status
    SetStatus {
        /// Task ID
        #[arg(short, long)]
        id: String,

        /// New status
        #[arg(short, long)]
        status: String,
    },

    /// Mark a task done
    Done {
        /// Task ID
        id: String,
    },

    /// Remove a task
    Remove {
        /// Task ID
        #[arg(short, long)]
        id: String,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Ask what to work on right now
    WhatNow {
        /// Minutes available until the next commitment
        #[arg(long)]
        minutes: Option<u32>,

        /// Energy level (high, medium, low)
        #[arg(long)]
        energy: Option<String>,

        /// Location (home, office, outside)
        #[arg(long)]
        location: Option<String>,
    },

    /// Break a task into action steps
    Decompose {
        /// Task ID
        id: String,
    },

    /// Show a task's action pipeline
    Actions {
        /// Task ID
        id: String,

        /// Mark an action done
        #[arg(long)]
        complete: Option<String>,
    },

    /// Show overdue and due-soon nudges
    Nudges,

    /// Build a plan for today
    Plan {
        /// Plan date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Recompute priority scores for open tasks
    Rescore,

    /// Manage household members
    #[command(subcommand)]
    Members(MembersCommands),

    /// Manage recurring templates
    #[command(subcommand)]
    Templates(TemplatesCommands),
}

#[derive(Subcommand)]
enum MembersCommands {
    /// List the household roster
    List,

    /// Register a member
    Add {
        /// Member name
        #[arg(short, long)]
        name: String,

        /// Role (parent, nanny, cleaner, ...)
        #[arg(short, long)]
        role: Option<String>,

        /// Skills (comma-separated)
        #[arg(short, long)]
        skills: Option<String>,

        /// Paid outside help rather than family
        #[arg(long)]
        external: bool,
    },

    /// Remove a member
    Remove {
        /// Member ID
        id: String,
    },
}

#[derive(Subcommand)]
enum TemplatesCommands {
    /// List recurring templates
    List,

    /// Seed the built-in household templates
    Seed,

    /// Create a task from a template
    Use {
        /// Template ID
        id: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
    },
}

fn get_project_path(cli_path: Option<PathBuf>) -> PathBuf {
    cli_path.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn default_user() -> UserProfile {
    let name = std::env::var("STEWARD_USER").unwrap_or_else(|_| "You".to_string());
    UserProfile::new("default", name, "")
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        ui::print_error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), StewardError> {
    let project_path = get_project_path(cli.project);
    let storage = Arc::new(FileStorage::new(&project_path));
    let oracle = Arc::new(OpenAiProvider::from_env());

    if !oracle.is_configured() {
        tracing::debug!("OPENAI_API_KEY not set, running on deterministic fallbacks");
    }

    let engine = Engine::new(
        Arc::clone(&storage) as Arc<dyn steward::storage::Storage>,
        oracle,
    );
    let user = default_user();
    let today = Utc::now().date_naive();

    match cli.command {
        Commands::Init => {
            if engine.storage().is_initialized().await? {
                ui::print_warning("Store already initialized");
                return Ok(());
            }

            engine.storage().initialize().await?;
            ui::print_success("Store initialized");
            ui::print_info(&format!(
                "Task store created at: {}",
                project_path.join(".steward").display()
            ));
        }

        Commands::Add {
            title,
            description,
            domain,
            priority,
            due,
            duration,
        } => {
            check_initialized(&engine).await?;

            let mut draft = TaskDraft::new(&user.id, title, domain.parse::<TaskDomain>()?);
            draft.description = description;
            if let Some(p) = priority {
                draft.priority = p.parse::<Priority>()?;
            }
            draft.due_date = due;
            draft.estimated_duration_min = duration;

            let task = engine.create_task(draft, today).await?;
            ui::print_success(&format!(
                "Captured task {} - {} (score {:.2})",
                ui::short_id(&task.id),
                task.title,
                task.priority_score
            ));
        }

        Commands::List { status, open } => {
            check_initialized(&engine).await?;

            let mut tasks = if open {
                engine.open_tasks(&user.id).await?
            } else {
                engine.list_tasks(&user.id).await?
            };
            if let Some(s) = status {
                let filter = s.parse::<TaskStatus>()?;
                tasks.retain(|t| t.status == filter);
            }

            if tasks.is_empty() {
                ui::print_info("No tasks found");
            } else {
                let table = ui::task_table(&tasks);
                println!("{table}");
                println!();
                ui::print_info(&format!("{} task(s) total", tasks.len()));
            }
        }

        Commands::Show { id } => {
            check_initialized(&engine).await?;

            let task = engine.get_task(&id).await?;
            ui::display_task_details(&task);
        }

        Commands::SetStatus { id, status } => {
            check_initialized(&engine).await?;

            let new_status: TaskStatus = status.parse()?;
            let update = TaskUpdate {
                status: Some(new_status),
                ..TaskUpdate::default()
            };
            engine.update_task(&id, update, today).await?;
            ui::print_success(&format!("Task {id} is now {new_status}"));
        }

        Commands::Done { id } => {
            check_initialized(&engine).await?;

            let task = engine.complete_task(&id).await?;
            ui::print_success(&format!("Done: {}", task.title));
        }

        Commands::Remove { id, yes } => {
            check_initialized(&engine).await?;

            if !yes {
                ui::print_warning(&format!("About to delete task {id}. Use --yes to confirm."));
                return Ok(());
            }

            engine.delete_task(&id).await?;
            ui::print_success(&format!("Removed task {id}"));
        }

        Commands::WhatNow {
            minutes,
            energy,
            location,
        } => {
            check_initialized(&engine).await?;

            let context = RecommendationContext {
                available_duration_min: minutes,
                energy_level: energy,
                location,
            };
            let decision = engine.what_now(&user, Utc::now(), &context).await?;
            ui::display_recommendations(&decision.value, decision.source);
        }

        Commands::Decompose { id } => {
            check_initialized(&engine).await?;

            let decision = engine.plan_task(&id, &user).await?;
            let table = ui::action_table(&decision.value);
            println!("{table}");
            ui::print_success(&format!(
                "Generated {} action(s)",
                decision.value.len()
            ));
        }

        Commands::Actions { id, complete } => {
            check_initialized(&engine).await?;

            if let Some(action_id) = complete {
                let action = engine.complete_action(&action_id).await?;
                ui::print_success(&format!("Completed: {}", action.label));
            }

            let actions = engine.task_actions(&id).await?;
            if actions.is_empty() {
                ui::print_info("No actions yet. Run 'steward decompose' first.");
            } else {
                let table = ui::action_table(&actions);
                println!("{table}");
            }
        }

        Commands::Nudges => {
            check_initialized(&engine).await?;

            let nudges = engine.nudges(&user.id, today).await?;
            ui::display_nudges(&nudges);
        }

        Commands::Plan { date } => {
            check_initialized(&engine).await?;

            let plan_date = date.unwrap_or(today);
            let decision = engine.daily_plan(&user, plan_date).await?;
            ui::display_daily_plan(&decision.value, decision.source);
        }

        Commands::Rescore => {
            check_initialized(&engine).await?;

            let count = engine.rescore_open_tasks(&user.id, today).await?;
            ui::print_success(&format!("Rescored {count} task(s)"));
        }

        Commands::Members(command) => match command {
            MembersCommands::List => {
                check_initialized(&engine).await?;

                let members = engine.members(&user.id).await?;
                if members.is_empty() {
                    ui::print_info("No household members registered");
                } else {
                    let table = ui::member_table(&members);
                    println!("{table}");
                }
            }

            MembersCommands::Add {
                name,
                role,
                skills,
                external,
            } => {
                check_initialized(&engine).await?;

                let skill_list = skills
                    .map(|s| s.split(',').map(|x| x.trim().to_string()).collect())
                    .unwrap_or_default();
                let mut member = HouseholdMember::new(
                    uuid::Uuid::new_v4().to_string(),
                    &user.id,
                    &name,
                    skill_list,
                );
                if let Some(r) = role {
                    member.role = r;
                }
                member.is_external = external;

                engine.add_member(&member).await?;
                ui::print_success(&format!("Registered {name}"));
            }

            MembersCommands::Remove { id } => {
                check_initialized(&engine).await?;

                engine.remove_member(&id).await?;
                ui::print_success(&format!("Removed member {id}"));
            }
        },

        Commands::Templates(command) => match command {
            TemplatesCommands::List => {
                check_initialized(&engine).await?;

                let templates = engine.storage().get_templates(&user.id).await?;
                if templates.is_empty() {
                    ui::print_info("No templates. Run 'steward templates seed' first.");
                } else {
                    for template in &templates {
                        println!(
                            "{}  {} ({}, {})",
                            ui::short_id(&template.id),
                            template.title,
                            template.domain,
                            template.frequency
                        );
                    }
                }
            }

            TemplatesCommands::Seed => {
                check_initialized(&engine).await?;

                let templates = engine.seed_templates(&user.id).await?;
                ui::print_success(&format!("{} template(s) on record", templates.len()));
            }

            TemplatesCommands::Use { id, due } => {
                check_initialized(&engine).await?;

                let (task, actions) = engine
                    .instantiate_template(&user.id, &id, due, today)
                    .await?;
                ui::print_success(&format!(
                    "Created task {} - {} with {} action(s)",
                    ui::short_id(&task.id),
                    task.title,
                    actions.len()
                ));
            }
        },
    }

    Ok(())
}

async fn check_initialized(engine: &Engine) -> Result<(), StewardError> {
    if !engine.storage().is_initialized().await? {
        return Err(StewardError::NotInitialized);
    }
    Ok(())
}
