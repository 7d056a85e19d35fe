use crate::bootstrap::Connector;
use crate::config::{self, Settings};
use crate::error::{Error, StartupError};
use crate::mentions::CommandMentions;
use crate::{commands, updater};
use poise::serenity_prelude as serenity;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{error, info, warn};

pub struct Data {
    pub shard_manager: Arc<serenity::ShardManager>,
    pub settings: Arc<Settings>,
    pub mentions: CommandMentions,
    pub avatar_url: Option<String>,
    pub started_at: Instant,
}

pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Discord session backed by serenity and poise.
pub struct Session {
    settings: Arc<Settings>,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }
}

impl Connector for Session {
    async fn connect(self, token: String) -> Result<(), StartupError> {
        let setup_failure = SetupFailure::default();
        let framework = build_framework(self.settings, setup_failure.clone());
        let mut client = serenity::Client::builder(token, config::gateway_intents())
            .framework(framework)
            .await
            .map_err(StartupError::from_session)?;

        let shard_manager = client.shard_manager.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            shard_manager.shutdown_all().await;
        });

        client
            .start_autosharded()
            .await
            .map_err(StartupError::from_session)?;
        setup_failure.check()
    }
}

/// Resolves once the process is asked to stop.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("unable to listen for Ctrl-C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!("unable to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl-C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}

/// Holds the error that stopped framework setup, if any.
///
/// Setup runs inside the gateway event loop, so its failure cannot be
/// returned directly. The session reads it back after the shards stop.
#[derive(Clone, Default)]
pub struct SetupFailure {
    error: Arc<Mutex<Option<serenity::Error>>>,
}

impl SetupFailure {
    /// Keeps the first failure; later ones are only logged by the caller.
    pub fn record(&self, err: serenity::Error) {
        let mut slot = self.error.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some(err);
        }
    }

    pub fn check(&self) -> Result<(), StartupError> {
        let taken = self
            .error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match taken {
            Some(err) => Err(StartupError::from_session(err)),
            None => Ok(()),
        }
    }
}

/// Builds the Poise framework with all commands.
///
/// A failed setup stops every shard and is recorded in `setup_failure`.
pub fn build_framework(
    settings: Arc<Settings>,
    setup_failure: SetupFailure,
) -> poise::Framework<Data, Error> {
    let options = framework_options(&settings);
    poise::Framework::builder()
        .options(options)
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                match setup_framework(ctx, ready, framework, settings).await {
                    Ok(data) => Ok(data),
                    Err(err) => {
                        error!("framework setup failed: {err}");
                        let reason = err.to_string();
                        setup_failure.record(err);
                        framework.shard_manager().shutdown_all().await;
                        Err(reason.into())
                    }
                }
            })
        })
        .build()
}

fn framework_options(settings: &Settings) -> poise::FrameworkOptions<Data, Error> {
    poise::FrameworkOptions {
        commands: commands::load_all(),
        prefix_options: config::prefix_options(),
        owners: settings
            .owner_ids
            .iter()
            .map(|id| serenity::UserId::new(*id))
            .collect(),
        initialize_owners: false,
        on_error: |error| Box::pin(commands::util::command_error_handler(error)),
        pre_command: |ctx| {
            Box::pin(async move {
                tracing::debug!(
                    command = %ctx.command().qualified_name,
                    user = %ctx.author().id,
                    "running command"
                );
            })
        },
        ..Default::default()
    }
}

async fn setup_framework(
    ctx: &serenity::Context,
    ready: &serenity::Ready,
    framework: &poise::Framework<Data, Error>,
    settings: Arc<Settings>,
) -> Result<Data, serenity::Error> {
    let mentions = register_commands(ctx, framework).await?;
    info!("synced {} global commands", mentions.len());

    ctx.set_activity(Some(serenity::ActivityData::listening("/help")));

    if let Some(repo_url) = settings.update_source() {
        let repo_url = repo_url.to_string();
        tokio::spawn(async move { updater::check_for_updates(&repo_url).await });
    }

    info!("{} has logged in successfully", ready.user.name);

    Ok(Data {
        shard_manager: framework.shard_manager().clone(),
        settings,
        mentions,
        avatar_url: ready.user.avatar_url(),
        started_at: Instant::now(),
    })
}

async fn register_commands(
    ctx: &serenity::Context,
    framework: &poise::Framework<Data, Error>,
) -> Result<CommandMentions, serenity::Error> {
    let commands = poise::builtins::create_application_commands(&framework.options().commands);
    let registered = serenity::Command::set_global_commands(&ctx.http, commands).await?;
    let mentions = CommandMentions::from_registered(&registered);
    if mentions.is_empty() {
        warn!("Discord returned no registered commands");
    }
    Ok(mentions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::serenity::gateway::GatewayError;

    #[test]
    fn test_setup_failure_defaults_to_ok() {
        assert!(SetupFailure::default().check().is_ok());
    }

    #[test]
    fn test_setup_failure_is_reported() {
        let failure = SetupFailure::default();
        failure
            .clone()
            .record(serenity::Error::Gateway(GatewayError::InvalidAuthentication));

        assert!(matches!(
            failure.check(),
            Err(StartupError::Authentication(_))
        ));
        assert!(failure.check().is_ok());
    }

    #[test]
    fn test_setup_failure_keeps_first_error() {
        let failure = SetupFailure::default();
        failure.record(serenity::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "sync failed",
        )));
        failure.record(serenity::Error::Gateway(GatewayError::InvalidAuthentication));

        let err = failure.check().unwrap_err();
        assert!(matches!(err, StartupError::Connectivity(_)));
        assert_eq!(err.exit_code(), 4);
    }
}
