mod cli;

use atrium::api::routes::create_router;
use atrium::auth::google::{GoogleTokenVerifier, HttpGoogleVerifier};
use atrium::auth::jwt::AuthService;
use atrium::auth::otp::OtpService;
use atrium::db::{directory::DirectoryRoleLookup, DirectoryClient};
use atrium::pages::notifications::{seed_notifications, NotificationCenter};
use atrium::utils::prefs::PreferenceStore;
use atrium::{AppState, AtriumConfig, AtriumConfigManager, ChatFeeds};
use axum::Router;
use cli::{output::Output, Cli, Commands};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    // Secrets come from the environment; a local .env is optional.
    dotenvy::dotenv().ok();

    match cli.command {
        Some(Commands::Init {
            ref path,
            force,
            ref host,
            port,
        }) => {
            let result = cli::init::run(
                cli::init::InitConfig {
                    path: path.clone(),
                    force,
                    host: host.clone(),
                    port,
                },
                &output,
            );
            match result {
                cli::init::InitResult::Success => {}
                cli::init::InitResult::AlreadyExists => std::process::exit(1),
                cli::init::InitResult::Error(_) => std::process::exit(1),
            }
        }
        Some(Commands::Config { full, validate }) => {
            if let Err(e) = show_config(&cli, full, validate, &output) {
                output.error(&format!("{}", e));
                std::process::exit(1);
            }
        }
        None => {
            if let Err(e) = run_server(&cli, &output).await {
                output.error(&format!("{}", e));
                std::process::exit(1);
            }
        }
    }
}

fn show_config(cli: &Cli, full: bool, validate: bool, output: &Output) -> anyhow::Result<()> {
    let config = AtriumConfig::load(&cli.config)?;

    if validate {
        config.validate()?;
        output.success("Configuration is valid");
    }

    output.header("Configuration");
    output.kv(
        "server",
        &format!("{}:{}", config.server.host, config.server.port),
    );
    output.kv("log level", &config.server.log_level);
    output.kv("database", &config.database.url);
    output.kv(
        "google sign-in",
        if config.google.is_some() {
            "enabled"
        } else {
            "disabled"
        },
    );
    output.kv("otp ttl", &format!("{}s", config.otp.ttl_seconds));

    if full {
        println!("\n{}", toml::to_string_pretty(&config)?);
    }

    Ok(())
}

/// Open the directory store: remote Turso when the feature and env
/// configuration are present, a local file otherwise.
async fn build_directory(config: &AtriumConfig) -> anyhow::Result<DirectoryClient> {
    #[cfg(feature = "turso")]
    if let (Some(url_env), Some(token_env)) = (
        config.database.turso_url_env.as_deref(),
        config.database.turso_token_env.as_deref(),
    ) {
        if let (Some(url), Some(token)) = (config.resolve_env(url_env), config.resolve_env(token_env))
        {
            tracing::info!("Using remote Turso database");
            return Ok(DirectoryClient::new_remote(url, token).await?);
        }
    }

    if let Some(parent) = std::path::Path::new(&config.database.url).parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(DirectoryClient::new_local(&config.database.url).await?)
}

async fn run_server(cli: &Cli, output: &Output) -> anyhow::Result<()> {
    output.banner();

    let mut config_manager = AtriumConfigManager::new(&cli.config)?;
    let config = config_manager.config();

    let log_level = if cli.verbose {
        "debug".to_string()
    } else {
        config.server.log_level.clone()
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    config_manager.start_watching()?;

    let auth_service = Arc::new(AuthService::new(
        config.jwt_secret()?,
        config.auth.jwt_access_expiry,
        config.auth.jwt_refresh_expiry,
    ));

    // The constructors run the schema migration before returning.
    let directory = Arc::new(build_directory(&config).await?);
    output.success(&format!("Directory store ready at {}", config.database.url));

    let google_verifier: Option<Arc<dyn GoogleTokenVerifier>> = config.google.as_ref().map(|g| {
        Arc::new(HttpGoogleVerifier::new(
            g.tokeninfo_url.clone(),
            g.client_id.clone(),
        )) as Arc<dyn GoogleTokenVerifier>
    });
    if google_verifier.is_some() {
        output.info("Google sign-in enabled");
    }

    let state = AppState {
        config_manager: Arc::new(config_manager),
        directory: directory.clone(),
        auth_service: auth_service.clone(),
        otp_service: Arc::new(OtpService::new(config.otp.ttl_seconds)),
        google_verifier,
        role_lookup: Arc::new(DirectoryRoleLookup::new(directory)),
        feeds: Arc::new(ChatFeeds::new()),
        boards: Arc::new(parking_lot::RwLock::new(HashMap::new())),
        notifications: Arc::new(NotificationCenter::new(seed_notifications())),
        prefs: Arc::new(PreferenceStore::open("./data/prefs.json")),
    };

    let app = Router::new()
        .nest("/api", create_router(auth_service))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    output.success(&format!("Listening on http://{}", addr));

    axum::serve(listener, app).await?;
    Ok(())
}
