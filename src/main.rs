use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::error;

use animerec::client::ClientError;
use animerec::config::{config_schema, load_config_from, DEFAULT_CONFIG_PATH};
use animerec::guard::GuardDecision;
use animerec::models::Credentials;
use animerec::startup;
use animerec::utils::init_logging;

#[derive(Parser, Debug)]
#[command(name = "animerec", version, about = "Anime recommendation client")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the JSON schema of the configuration file.
    Schema,
    /// Show backend health and the restored session.
    Status,
    /// Log in and persist the tokens in the configured store.
    Login {
        email: String,
        #[arg(long, env = "ANIMEREC_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored tokens.
    Logout,
    /// Show what the route guard decides for a path.
    Guard { path: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Commands::Schema = cli.command {
        match config_schema() {
            Ok(schema) => println!("{}", schema),
            Err(e) => {
                eprintln!("Error rendering schema: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let config = match load_config_from(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("Error initializing logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli.command, Arc::new(config)).await {
        error!("{}", e);
        eprintln!("Error: {}", e);
        let session_ended = e
            .downcast_ref::<ClientError>()
            .is_some_and(ClientError::ends_session);
        if session_ended {
            eprintln!("The session has ended, run `animerec login` again.");
            std::process::exit(2);
        }
        std::process::exit(1);
    }
}

async fn run(
    command: Commands,
    config: Arc<animerec::config::ConfigV1>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = startup::run(config).await?;
    let state = app.session.state();

    match command {
        Commands::Schema => {}
        Commands::Status => {
            match app.session.client().health().await {
                Ok(health) => println!("backend: {} (version {})", health.status, health.version),
                Err(e) => println!("backend: unreachable ({})", e),
            }
            match state.user() {
                Some(user) => println!(
                    "session: {} <{}>{}",
                    user.name,
                    user.email,
                    if user.is_admin { " [admin]" } else { "" }
                ),
                None => println!("session: logged out"),
            }
            if state.is_authenticated() {
                let stats = app.anime.stats().await?;
                println!(
                    "lists: {} favorites, {} watched, {} new recommendations",
                    stats.favorites_count, stats.watched_count, stats.unviewed_recommendations
                );
            }
        }
        Commands::Login { email, password } => {
            let user = app
                .session
                .login(&Credentials::new(email, password))
                .await?;
            let landing = app.guard.landing(&app.session.state());
            println!("logged in as {} <{}>, landing on {}", user.name, user.email, landing);
        }
        Commands::Logout => {
            app.session.logout().await;
            println!("logged out");
        }
        Commands::Guard { path } => match app.guard.evaluate_path(&state, &path) {
            Some(GuardDecision::Render) => println!("{}: render", path),
            Some(GuardDecision::Redirect(route)) => println!("{}: redirect to {}", path, route),
            Some(GuardDecision::Denied) => println!("{}: access denied", path),
            Some(GuardDecision::Pending) => println!("{}: pending", path),
            None => println!("{}: not found", path),
        },
    }

    Ok(())
}
