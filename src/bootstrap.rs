use crate::env::Environment;
use crate::error::StartupError;
use tracing::info;

/// Opens a session with Discord and drives it until shutdown.
///
/// Returning `Ok(())` means the session ended cleanly, for example after
/// Ctrl-C. The transport is free to retry transient failures internally
/// before giving up with an error.
pub trait Connector {
    fn connect(self, token: String) -> impl Future<Output = Result<(), StartupError>> + Send;
}

/// Starts a session using `token` and waits for it to end.
pub async fn start<C: Connector>(token: String, connector: C) -> Result<(), StartupError> {
    info!("connecting to Discord");
    connector.connect(token).await?;
    info!("session closed");
    Ok(())
}

/// Loads the token from `env` and starts the session.
///
/// A missing or blank token fails before `connector` is touched.
pub async fn run<C: Connector>(env: &Environment, connector: C) -> Result<(), StartupError> {
    let token = env.load_token()?;
    info!("configuration loaded");
    start(token, connector).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::TOKEN;
    use crate::error::ConfigError;
    use serenity::gateway::GatewayError;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[derive(Clone, Copy)]
    enum Remote {
        Accepts,
        Holds,
        Rejects,
        Unreachable,
    }

    /// Records every connection attempt instead of touching the network.
    #[derive(Clone)]
    struct FakeDiscord {
        remote: Remote,
        attempts: Arc<Mutex<Vec<String>>>,
        release: Arc<Mutex<Option<oneshot::Receiver<()>>>>,
    }

    impl FakeDiscord {
        fn new(remote: Remote) -> Self {
            Self {
                remote,
                attempts: Arc::new(Mutex::new(Vec::new())),
                release: Arc::new(Mutex::new(None)),
            }
        }

        /// Keeps the session open until the returned sender fires.
        fn holding() -> (Self, oneshot::Sender<()>) {
            let (tx, rx) = oneshot::channel();
            let discord = Self::new(Remote::Holds);
            *discord.release.lock().unwrap() = Some(rx);
            (discord, tx)
        }

        fn attempts(&self) -> Vec<String> {
            self.attempts.lock().unwrap().clone()
        }
    }

    impl Connector for FakeDiscord {
        async fn connect(self, token: String) -> Result<(), StartupError> {
            self.attempts.lock().unwrap().push(token);
            match self.remote {
                Remote::Accepts => Ok(()),
                Remote::Holds => {
                    let release = self.release.lock().unwrap().take();
                    if let Some(release) = release {
                        let _ = release.await;
                    }
                    Ok(())
                }
                Remote::Rejects => Err(StartupError::from_session(serenity::Error::Gateway(
                    GatewayError::InvalidAuthentication,
                ))),
                Remote::Unreachable => Err(StartupError::from_session(serenity::Error::Io(
                    std::io::Error::new(std::io::ErrorKind::TimedOut, "gateway timed out"),
                ))),
            }
        }
    }

    fn env(token: Option<&str>) -> Environment {
        Environment::from_vars(token.map(|token| (TOKEN, token)))
    }

    #[tokio::test]
    async fn test_empty_token_makes_no_connection() {
        let discord = FakeDiscord::new(Remote::Accepts);
        let err = run(&env(Some("")), discord.clone()).await.unwrap_err();

        assert!(matches!(
            err,
            StartupError::Configuration(ConfigError::Blank(TOKEN))
        ));
        assert_ne!(err.exit_code(), 0);
        assert!(discord.attempts().is_empty());
    }

    #[tokio::test]
    async fn test_missing_token_makes_no_connection() {
        let discord = FakeDiscord::new(Remote::Accepts);
        let err = run(&env(None), discord.clone()).await.unwrap_err();

        assert!(matches!(
            err,
            StartupError::Configuration(ConfigError::Missing(TOKEN))
        ));
        assert!(discord.attempts().is_empty());
    }

    #[tokio::test]
    async fn test_accepted_token_runs_session() {
        let discord = FakeDiscord::new(Remote::Accepts);
        run(&env(Some("abc123")), discord.clone()).await.unwrap();

        assert_eq!(discord.attempts(), vec!["abc123".to_string()]);
    }

    #[tokio::test]
    async fn test_accepted_session_stays_up_until_closed() {
        let (discord, release) = FakeDiscord::holding();
        let environment = env(Some("abc123"));
        let observer = discord.clone();
        let mut session = tokio::spawn(async move { run(&environment, discord).await });

        let still_running = tokio::time::timeout(Duration::from_millis(50), &mut session).await;
        assert!(still_running.is_err());
        assert_eq!(observer.attempts(), vec!["abc123".to_string()]);

        release.send(()).unwrap();
        session.await.unwrap().unwrap();
        assert_eq!(observer.attempts().len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_token_is_authentication_error() {
        let discord = FakeDiscord::new(Remote::Rejects);
        let err = run(&env(Some("abc123")), discord.clone()).await.unwrap_err();

        assert!(matches!(err, StartupError::Authentication(_)));
        assert_ne!(err.exit_code(), 0);
        assert_eq!(discord.attempts().len(), 1);
    }

    #[tokio::test]
    async fn test_network_failure_is_connectivity_error() {
        let discord = FakeDiscord::new(Remote::Unreachable);
        let err = start("abc123".to_string(), discord.clone())
            .await
            .unwrap_err();

        assert!(matches!(err, StartupError::Connectivity(_)));
        assert_eq!(discord.attempts().len(), 1);
    }
}
