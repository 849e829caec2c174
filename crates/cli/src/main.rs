use anyhow::Context;
use clap::{Parser, Subcommand};
use habit_client::config::{refresh_mode_from_env_values, DEFAULT_API_PREFIX, DEFAULT_SERVER_URL};
use habit_client::{refresh_for, ClientConfig, HabitClient, HabitFilter, HttpHabitApi};
use habit_core::Habit;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "habit")]
#[command(about = "Habit tracker CLI")]
struct Cli {
    /// Server base URL
    #[arg(long, global = true, env = "HABIT_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server: String,
    /// Path prefix of the habit routes
    #[arg(long, global = true, env = "HABIT_API_PREFIX", default_value = DEFAULT_API_PREFIX)]
    api_prefix: String,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List habits, newest first
    List {
        /// Only habits in this category
        #[arg(long)]
        category: Option<String>,
        /// Only habits carrying this tag
        #[arg(long)]
        tag: Option<String>,
    },
    /// Add a habit
    Add {
        /// Habit name
        name: String,
        /// Habit category
        category: String,
        /// Tags (comma-separated)
        #[arg(long, default_value = "")]
        tags: String,
    },
    /// Edit a habit's name, category or tags
    Edit {
        /// Habit id
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Tags (comma-separated); replaces the existing tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// Mark a habit as completed
    Complete {
        /// Habit id
        id: String,
        /// Mark as not completed instead
        #[arg(long)]
        undo: bool,
    },
    /// Delete a habit
    Delete {
        /// Habit id
        id: String,
    },
    /// Print the collection every time it changes
    Watch {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        tag: Option<String>,
        /// `poll`, `push` or `push-only`
        #[arg(long, env = "HABIT_REFRESH")]
        refresh: Option<String>,
        /// Polling interval (and push fallback interval) in milliseconds
        #[arg(long, env = "HABIT_POLL_INTERVAL_MS")]
        interval_ms: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("habit_client=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use 'habit --help' for commands");
        return Ok(());
    };

    let config = ClientConfig::new(cli.server, cli.api_prefix, Default::default())?;
    let api = HttpHabitApi::new(&config)?;
    let mut client = HabitClient::new(api.clone());

    match command {
        Commands::List { category, tag } => {
            client.filter = HabitFilter::new(category, tag);
            client.refresh().await.context("Failed to load habits")?;
            print_habits(&client.visible());
        }
        Commands::Add {
            name,
            category,
            tags,
        } => {
            client.form.name = name;
            client.form.category = category;
            client.form.tags = tags;
            match client.submit().await? {
                Some(habit) => println!("Added habit with ID: {}", habit.id),
                None => eprintln!("Name and category are required"),
            }
        }
        Commands::Edit {
            id,
            name,
            category,
            tags,
        } => {
            client.refresh().await.context("Failed to load habits")?;
            client.start_edit(&id)?;
            if let Some(name) = name {
                client.form.name = name;
            }
            if let Some(category) = category {
                client.form.category = category;
            }
            if let Some(tags) = tags {
                client.form.tags = tags;
            }
            match client.submit().await? {
                Some(habit) => println!("Updated habit with ID: {}", habit.id),
                None => eprintln!("Name and category cannot be empty"),
            }
        }
        Commands::Complete { id, undo } => {
            let habit = client.set_completed(&id, !undo).await?;
            println!("{}", format_habit(&habit));
        }
        Commands::Delete { id } => {
            client.delete(&id).await?;
            println!("Deleted habit with ID: {}", id);
        }
        Commands::Watch {
            category,
            tag,
            refresh,
            interval_ms,
        } => {
            let config = config.with_refresh(refresh_mode_from_env_values(refresh, interval_ms)?)?;
            client.filter = HabitFilter::new(category, tag);

            let strategy = refresh_for(&config, api);
            let mut subscription = client.subscribe(strategy.as_ref());

            let ctrl_c = tokio::signal::ctrl_c();
            tokio::pin!(ctrl_c);
            loop {
                let updated = tokio::select! {
                    update = client.next_update_from(&mut subscription) => Some(update.is_some()),
                    _ = &mut ctrl_c => None,
                };
                match updated {
                    None => break,
                    Some(false) => {
                        eprintln!("Real-time channel closed, no further updates");
                        break;
                    }
                    Some(true) => {}
                }
                println!("--- {} habits ---", client.cache().len());
                print_habits(&client.visible());
            }
        }
    }

    Ok(())
}

fn print_habits(habits: &[&Habit]) {
    if habits.is_empty() {
        println!("No habits found.");
    } else {
        for habit in habits {
            println!("{}", format_habit(habit));
        }
    }
}

fn format_habit(habit: &Habit) -> String {
    format!(
        "ID: {}, Name: {}, Category: {}, Tags: [{}], Completed: {}, Created: {}",
        habit.id,
        habit.name,
        habit.category,
        habit.tags.join(", "),
        if habit.is_completed { "yes" } else { "no" },
        habit.created_at
    )
}
