/*

Copyright 2025 The Kitbot Developers

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.

*/

use std::process::ExitCode;
use tracing::{error, info};

mod bootstrap;
mod commands;
mod config;
mod constants;
mod env;
mod error;
mod functions;
mod kitbot;
mod logging;
mod mentions;
mod updater;

pub use error::Error;
pub use kitbot::{Context, Data};

use error::StartupError;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let environment = env::Environment::capture();

    let settings = match config::Settings::from_env(&environment) {
        Ok(settings) => settings,
        Err(err) => {
            logging::init_console();
            return report(err.into());
        }
    };
    let _log_guard = match logging::init(&settings.logging) {
        Ok(guard) => guard,
        Err(err) => {
            logging::init_console();
            return report(err.into());
        }
    };

    info!("starting {} v{}", config::BOT_NAME, config::VERSION);
    match bootstrap::run(&environment, kitbot::Session::new(settings)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(err),
    }
}

fn report(err: StartupError) -> ExitCode {
    error!("{err}");
    if let StartupError::Authentication(_) = err {
        error!(
            "check the bot token at {}",
            constants::links::DEVELOPER_PORTAL
        );
    }
    err.into()
}
