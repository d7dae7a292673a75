use clap::Subcommand;
use serde_json::json;

use crate::api::admin::{self, CreateUserInput, ListParams, SortDir, UpdateUserInput};
use crate::api::ApiClient;
use crate::cli::{utils, OutputFormat};

#[derive(Subcommand)]
pub enum AdminCommands {
    #[command(about = "Show dashboard statistics")]
    Dashboard,

    #[command(about = "User management")]
    Users {
        #[command(subcommand)]
        cmd: UserCommands,
    },

    #[command(about = "Uploaded file management")]
    Files {
        #[command(subcommand)]
        cmd: FileCommands,
    },

    #[command(about = "Application settings")]
    Settings {
        #[command(subcommand)]
        cmd: SettingCommands,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "List users")]
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(long, help = "Search by email or name")]
        search: Option<String>,
        #[arg(long, help = "Filter by role (user or admin)")]
        role: Option<String>,
        #[arg(long, help = "Sort field")]
        sort_by: Option<String>,
        #[arg(long, help = "Sort descending")]
        desc: bool,
    },

    #[command(about = "Show one user")]
    Show {
        #[arg(help = "User id")]
        id: String,
    },

    #[command(about = "Create a user")]
    Create {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password")]
        password: String,
        #[arg(long, help = "Display name")]
        name: Option<String>,
        #[arg(long, help = "Role (user or admin)")]
        role: Option<String>,
    },

    #[command(about = "Update a user")]
    Update {
        #[arg(help = "User id")]
        id: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        role: Option<String>,
        #[arg(long, help = "Activate or deactivate (true/false)")]
        active: Option<bool>,
    },

    #[command(about = "Delete a user")]
    Delete {
        #[arg(help = "User id")]
        id: String,
    },
}

#[derive(Subcommand)]
pub enum FileCommands {
    #[command(about = "List uploaded files")]
    List {
        #[arg(long, help = "Subdirectory to list")]
        dir: Option<String>,
    },

    #[command(about = "Delete an uploaded file")]
    Delete {
        #[arg(help = "File path relative to the upload root")]
        path: String,
    },
}

#[derive(Subcommand)]
pub enum SettingCommands {
    #[command(about = "List settings")]
    List {
        #[arg(long, help = "Filter by settings group")]
        group: Option<String>,
    },

    #[command(about = "Show one setting")]
    Get {
        #[arg(help = "Setting key")]
        key: String,
    },

    #[command(about = "Update one setting")]
    Set {
        #[arg(help = "Setting key")]
        key: String,
        #[arg(help = "New value")]
        value: String,
    },
}

pub async fn handle(
    cmd: AdminCommands,
    client: &ApiClient,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        AdminCommands::Dashboard => {
            let stats = admin::dashboard(client).await.into_result()?;
            utils::output_listing(
                output_format,
                &format!(
                    "{} users ({} active, {} admins)",
                    stats.total_users, stats.active_users, stats.admin_users
                ),
                stats
                    .recent_activity
                    .iter()
                    .map(|entry| format!("{} {}", entry.timestamp, entry.message))
                    .collect(),
                json!(stats),
            )
        }
        AdminCommands::Users { cmd } => handle_users(cmd, client, output_format).await,
        AdminCommands::Files { cmd } => handle_files(cmd, client, output_format).await,
        AdminCommands::Settings { cmd } => handle_settings(cmd, client, output_format).await,
    }
}

async fn handle_users(
    cmd: UserCommands,
    client: &ApiClient,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        UserCommands::List {
            page,
            page_size,
            search,
            role,
            sort_by,
            desc,
        } => {
            let params = ListParams {
                page,
                page_size,
                search,
                sort_by,
                sort_dir: desc.then_some(SortDir::Desc),
                role,
                is_active: None,
            };
            let result = admin::list_users(client, &params).await.into_result()?;
            utils::output_listing(
                output_format,
                &format!(
                    "{} users (page {}/{})",
                    result.total, result.page, result.total_pages
                ),
                result
                    .items
                    .iter()
                    .map(|user| {
                        format!(
                            "{} {} [{}]{}",
                            user.id,
                            user.email,
                            user.role,
                            if user.is_active { "" } else { " (inactive)" }
                        )
                    })
                    .collect(),
                json!(result),
            )
        }
        UserCommands::Show { id } => {
            let user = admin::get_user(client, &id).await.into_result()?;
            utils::output_success(
                output_format,
                &format!("{} [{}]", user.email, user.role),
                Some(json!({ "user": user })),
            )
        }
        UserCommands::Create {
            email,
            password,
            name,
            role,
        } => {
            let input = CreateUserInput {
                email,
                password,
                name,
                role,
                is_active: None,
            };
            let user = admin::create_user(client, &input).await.into_result()?;
            utils::output_success(
                output_format,
                &format!("created user {}", user.email),
                Some(json!({ "user": user })),
            )
        }
        UserCommands::Update {
            id,
            email,
            password,
            name,
            role,
            active,
        } => {
            let input = UpdateUserInput {
                email,
                password,
                name,
                role,
                is_active: active,
            };
            let user = admin::update_user(client, &id, &input).await.into_result()?;
            utils::output_success(
                output_format,
                &format!("updated user {}", user.email),
                Some(json!({ "user": user })),
            )
        }
        UserCommands::Delete { id } => {
            let result = admin::delete_user(client, &id).await.into_result()?;
            utils::output_success(output_format, &result.message, None)
        }
    }
}

async fn handle_files(
    cmd: FileCommands,
    client: &ApiClient,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        FileCommands::List { dir } => {
            let result = admin::list_files(client, dir.as_deref())
                .await
                .into_result()?;
            utils::output_listing(
                output_format,
                &format!(
                    "{} entries in {} ({} bytes)",
                    result.total, result.current_dir, result.total_size
                ),
                result
                    .files
                    .iter()
                    .map(|file| {
                        if file.is_dir {
                            format!("{}/", file.name)
                        } else {
                            format!("{} ({} bytes)", file.name, file.size)
                        }
                    })
                    .collect(),
                json!(result),
            )
        }
        FileCommands::Delete { path } => {
            let result = admin::delete_file(client, &path).await.into_result()?;
            utils::output_success(output_format, &result.message, None)
        }
    }
}

async fn handle_settings(
    cmd: SettingCommands,
    client: &ApiClient,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        SettingCommands::List { group } => {
            let settings = admin::list_settings(client, group.as_deref())
                .await
                .into_result()?;
            utils::output_listing(
                output_format,
                &format!("{} settings", settings.len()),
                settings
                    .iter()
                    .map(|setting| format!("{} = {} [{}]", setting.key, setting.value, setting.group))
                    .collect(),
                json!(settings),
            )
        }
        SettingCommands::Get { key } => {
            let setting = admin::get_setting(client, &key).await.into_result()?;
            utils::output_success(
                output_format,
                &format!("{} = {}", setting.key, setting.value),
                Some(json!({ "setting": setting })),
            )
        }
        SettingCommands::Set { key, value } => {
            let setting = admin::update_setting(client, &key, &value)
                .await
                .into_result()?;
            utils::output_success(
                output_format,
                &format!("{} = {}", setting.key, setting.value),
                Some(json!({ "setting": setting })),
            )
        }
    }
}
