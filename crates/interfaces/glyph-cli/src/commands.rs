use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};

use glyph_app_core::{LauncherKernel, LoginSession, WizardErrorKind};
use glyph_core::{InstanceSummary, Profile, Theme, WizardStep};

const POPUP_POLL: Duration = Duration::from_millis(25);

#[derive(Debug, Clone)]
pub struct LoginReport {
    /// Popup contents as first shown, if the details ever arrived.
    pub shown: Option<LoginSession>,
    pub profile: Option<Profile>,
    pub cancelled: bool,
    pub has_avatar: bool,
}

pub async fn run_login(kernel: &LauncherKernel) -> Result<LoginReport> {
    kernel
        .start_onboarding()
        .await
        .context("Failed to start login services")?;

    println!(":: Starting device login...");

    let profiles = kernel.profiles.clone();
    let mut login = tokio::spawn(async move { profiles.login().await });
    let mut ticker = tokio::time::interval(POPUP_POLL);
    let mut shown: Option<LoginSession> = None;
    let mut cancelled = false;

    let profile = loop {
        tokio::select! {
            res = &mut login => break res.context("Login task failed")?,
            _ = ticker.tick() => {
                if shown.is_none() && kernel.auth.popup_visible() {
                    let session = kernel.auth.session();
                    println!("   Open:  {}", session.verification_uri);
                    println!("   Code:  {}", session.code);
                    shown = Some(session);
                }
            }
            _ = tokio::signal::ctrl_c(), if !cancelled => {
                println!(":: Cancelling login...");
                kernel.auth.cancel_login_popup().await;
                cancelled = true;
            }
        }
    };

    let has_avatar = match &profile {
        Some(p) => {
            println!(":: Logged in as {} ({})", p.name, p.id);
            !kernel.avatars.avatar(&p.id).await.is_empty()
        }
        None if cancelled => {
            println!(":: Login cancelled.");
            false
        }
        None => {
            println!(":: Login failed.");
            false
        }
    };

    Ok(LoginReport {
        shown,
        profile,
        cancelled,
        has_avatar,
    })
}

#[derive(Debug, Clone)]
pub struct OnboardingReport {
    pub visited: Vec<WizardStep>,
    /// Step the walk could not leave, if it stopped early.
    pub stopped_at: Option<WizardStep>,
    pub location: String,
}

impl OnboardingReport {
    pub fn finished(&self) -> bool {
        self.stopped_at.is_none()
    }
}

/// Walks the wizard from the navigator's current location, acting at each
/// step the way a first-time user would.
pub async fn run_onboarding(
    kernel: &LauncherKernel,
    theme: Theme,
    skip_runtime: bool,
) -> Result<OnboardingReport> {
    kernel
        .start_onboarding()
        .await
        .context("Failed to start onboarding services")?;

    let mut visited = vec![kernel.wizard.current_step()?];

    loop {
        let step = kernel.wizard.current_step()?;
        println!(":: [{}/{}] {}", step.index() + 1, WizardStep::ALL.len(), step.label());

        match step {
            WizardStep::Theme => kernel.wizard.set_theme(theme),
            WizardStep::Account if kernel.wizard.is_blocked() => {
                let report = run_login(kernel).await?;
                if report.profile.is_none() {
                    bail!("Login did not complete; onboarding cannot continue");
                }
            }
            WizardStep::Runtime if !skip_runtime => {
                kernel.wizard.open_automatic_runtime_setup();
                kernel.wizard.complete_automatic_runtime_setup();
            }
            WizardStep::Complete => {
                kernel
                    .wizard
                    .finish()
                    .await
                    .context("Failed to mark onboarding complete")?;
                println!(":: Onboarding complete.");
                break;
            }
            _ => {}
        }

        match kernel.wizard.advance() {
            Ok(next) => {
                debug!(from = step.label(), to = next.label(), "Advanced");
                visited.push(next);
            }
            Err(e) if e.kind() == WizardErrorKind::Blocked => {
                warn!(step = step.label(), "Onboarding stopped");
                println!(":: Cannot continue past {} yet.", step.label());
                return Ok(OnboardingReport {
                    visited,
                    stopped_at: Some(step),
                    location: kernel.wizard.location(),
                });
            }
            Err(e) => return Err(e.into()),
        }
    }

    info!(theme = ?kernel.wizard.theme(), "Onboarding walk finished");
    Ok(OnboardingReport {
        visited,
        stopped_at: None,
        location: kernel.wizard.location(),
    })
}

pub async fn run_instances(
    kernel: &LauncherKernel,
    search: Option<String>,
) -> Result<Vec<InstanceSummary>> {
    kernel
        .start_launcher()
        .await
        .context("Failed to start launcher services")?;

    if let Some(text) = search {
        kernel.instances.set_search(text);
    }

    let instances = kernel.instances.filtered();
    if instances.is_empty() {
        println!(":: No instances match.");
    }
    for i in &instances {
        let loader = &i.game.modloader;
        if loader.version.is_empty() {
            println!("   {:<24} {} ({})", i.name, i.game.version, loader.loader);
        } else {
            println!(
                "   {:<24} {} ({} {})",
                i.name, i.game.version, loader.loader, loader.version
            );
        }
    }

    Ok(instances)
}
