use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use futurepath_core::CompletionPolicy;
use services::{ApiClient, ApiConfig, AuthToken, Credentials, QuestionnaireService};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use ui::{App, UiApp, build_app_context};

const ENV_TOKEN: &str = "FUTUREPATH_TOKEN";
const ENV_EMAIL: &str = "FUTUREPATH_EMAIL";
const ENV_PASSWORD: &str = "FUTUREPATH_PASSWORD";

#[derive(Debug, PartialEq, Eq)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidPolicy { raw: String },
    IncompleteCredentials,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidPolicy { raw } => {
                write!(f, "invalid --policy value: {raw} (expected confirmed or optimistic)")
            }
            ArgsError::IncompleteCredentials => {
                write!(f, "--email and --password must be given together")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    questionnaire: Arc<QuestionnaireService>,
    student_name: Option<String>,
}

impl UiApp for DesktopApp {
    fn questionnaire(&self) -> Arc<QuestionnaireService> {
        Arc::clone(&self.questionnaire)
    }

    fn student_name(&self) -> Option<String> {
        self.student_name.clone()
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- [--api-url <url>] [--token <jwt> | --email <email> --password <password>]"
    );
    eprintln!("                     [--policy confirmed|optimistic]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api-url {}", services::DEFAULT_API_URL);
    eprintln!("  --policy confirmed");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  FUTUREPATH_API_URL, FUTUREPATH_API_TIMEOUT_SECS, FUTUREPATH_TOKEN,");
    eprintln!("  FUTUREPATH_EMAIL, FUTUREPATH_PASSWORD, RUST_LOG");
}

#[derive(Debug, PartialEq, Eq)]
enum Auth {
    Token(String),
    Login { email: String, password: String },
    Anonymous,
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    api_url: Option<String>,
    auth: Auth,
    policy: CompletionPolicy,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Run(Args),
    Help,
}

fn parse_policy(raw: String) -> Result<CompletionPolicy, ArgsError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "confirmed" => Ok(CompletionPolicy::Confirmed),
        "optimistic" => Ok(CompletionPolicy::Optimistic),
        _ => Err(ArgsError::InvalidPolicy { raw }),
    }
}

impl Args {
    /// Flags win over environment variables.
    fn parse(
        mut args: impl Iterator<Item = String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Command, ArgsError> {
        let present = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut api_url = None;
        let mut token = present(ENV_TOKEN);
        let mut email = present(ENV_EMAIL);
        let mut password = present(ENV_PASSWORD);
        let mut policy = CompletionPolicy::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api-url" => api_url = Some(require_value(&mut args, "--api-url")?),
                "--token" => token = Some(require_value(&mut args, "--token")?),
                "--email" => email = Some(require_value(&mut args, "--email")?),
                "--password" => password = Some(require_value(&mut args, "--password")?),
                "--policy" => policy = parse_policy(require_value(&mut args, "--policy")?)?,
                "--help" | "-h" => return Ok(Command::Help),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let auth = match (token, email, password) {
            (Some(token), _, _) => Auth::Token(token),
            (None, Some(email), Some(password)) => Auth::Login { email, password },
            (None, None, None) => Auth::Anonymous,
            (None, _, _) => return Err(ArgsError::IncompleteCredentials),
        };

        Ok(Command::Run(Self {
            api_url,
            auth,
            policy,
        }))
    }
}

fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    // A subscriber may already be installed when embedded; keep the existing one.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Resolve the bearer token, logging in first when credentials were given.
async fn authenticate(
    client: &mut ApiClient,
    auth: Auth,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    match auth {
        Auth::Token(raw) => {
            client.set_token(AuthToken::new(raw));
            Ok(None)
        }
        Auth::Login { email, password } => {
            let login = client.login(&Credentials::new(email, password)).await?;
            let user = &login.user;
            if !user.role.can_take_questionnaire() {
                tracing::warn!(
                    role = ?user.role,
                    "signed-in user is not a student; the backend may refuse questionnaire calls"
                );
            }
            client.set_token(login.access_token());
            let name = if user.first_name.trim().is_empty() {
                user.email.clone()
            } else {
                user.first_name.clone()
            };
            Ok(Some(name))
        }
        Auth::Anonymous => {
            tracing::warn!("no access token configured; the bundled questions will be used");
            Ok(None)
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let command = Args::parse(std::env::args().skip(1), |key| std::env::var(key).ok())
        .map_err(|e| {
            eprintln!("{e}");
            print_usage();
            e
        })?;
    let args = match command {
        Command::Help => {
            print_usage();
            return Ok(());
        }
        Command::Run(args) => args,
    };

    init_tracing();

    let env_config = ApiConfig::from_env()?;
    let config = match args.api_url.as_deref() {
        Some(url) => ApiConfig::new(url)?.with_timeout(env_config.timeout()),
        None => env_config,
    };
    tracing::info!(api = %config.base_url(), policy = ?args.policy, "starting FuturePath");

    let mut client = ApiClient::new(config)?;
    let student_name = authenticate(&mut client, args.auth).await?;

    let questionnaire =
        Arc::new(QuestionnaireService::new(Arc::new(client)).with_policy(args.policy));
    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        questionnaire,
        student_name,
    });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("FuturePath")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
