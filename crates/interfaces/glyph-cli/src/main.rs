use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use glyph_app_core::{BackendGateway, LauncherKernel};
use glyph_cli::simulated::{ScriptedNavigator, SimulatedBackend};
use glyph_cli::{commands, CliTheme};
use glyph_config::{
    clamp_approval_delay, DEFAULT_SIMULATED_APPROVAL_DELAY_MS, LAUNCHER_LOCATION,
    ONBOARDING_WELCOME_LOCATION,
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,
    /// How long the simulated backend waits before answering a device login.
    #[arg(
        long,
        global = true,
        env = "GLYPH_APPROVAL_DELAY_MS",
        default_value_t = DEFAULT_SIMULATED_APPROVAL_DELAY_MS
    )]
    approval_delay_ms: u64,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a device login against the simulated backend
    Login {
        #[arg(long, help = "Decline the device code instead of approving it")]
        deny: bool,
    },
    /// Walk the first-run wizard
    Onboard {
        #[arg(long, value_enum, default_value_t = CliTheme::System)]
        theme: CliTheme,
        #[arg(long, help = "Leave the Java step incomplete")]
        skip_runtime: bool,
    },
    /// List instances, optionally filtered by name
    Instances {
        #[arg(short, long)]
        search: Option<String>,
    },
}

fn setup_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let delay = Duration::from_millis(clamp_approval_delay(cli.approval_delay_ms));
    let backend = SimulatedBackend::new(delay);

    match cli.command {
        Commands::Login { deny } => {
            let backend = if deny { backend.denying_logins() } else { backend };
            let kernel = build_kernel(backend, ONBOARDING_WELCOME_LOCATION);
            let report = commands::run_login(&kernel).await?;
            if report.profile.is_none() && !report.cancelled {
                anyhow::bail!("login failed");
            }
        }
        Commands::Onboard {
            theme,
            skip_runtime,
        } => {
            let kernel = build_kernel(backend, ONBOARDING_WELCOME_LOCATION);
            let report = commands::run_onboarding(&kernel, theme.into(), skip_runtime).await?;
            println!(":: Now at {}", report.location);
        }
        Commands::Instances { search } => {
            let kernel = build_kernel(backend, LAUNCHER_LOCATION);
            commands::run_instances(&kernel, search).await?;
        }
    }

    Ok(())
}

fn build_kernel(backend: SimulatedBackend, location: &str) -> LauncherKernel {
    let gateway: Arc<dyn BackendGateway> = Arc::new(backend);
    LauncherKernel::new(gateway, Arc::new(ScriptedNavigator::at(location)))
}
