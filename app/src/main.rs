use anyhow::{Context, Result};
use app::{bridge::Bridge, config::app_config::AppConfig};
use internal::domain::command::ControlCommand;
use log::{info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

const CONFIG_ENV: &str = "MOISTURE_BRIDGE_CONFIG";
const DEFAULT_CONFIG: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG.to_string());
    let conf = AppConfig::load(&path).with_context(|| format!("Unable to load configuration from {path}"))?;

    let bridge = Bridge::start(&conf);

    // headless client: mirrors what a browser would receive
    let (session, mut updates) = bridge.connect_client();
    let console = tokio::spawn(async move {
        while let Some(event) = updates.recv().await {
            match event.to_json() {
                Ok(json) => info!("{} {json}", event.name()),
                Err(e) => warn!("Unable to serialize status event: {e}"),
            }
        }
    });
    info!("Console session {} connected", session.id);

    // operator actions from stdin: on | off | auto | status
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.context("Unable to listen for shutdown signal")?;
                break;
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) => operate(&bridge, line.trim()),
                // stdin closed or broken, keep serving until the signal
                Ok(None) => {
                    tokio::signal::ctrl_c().await.context("Unable to listen for shutdown signal")?;
                    break;
                }
                Err(e) => {
                    warn!("Unable to read operator input, ignoring stdin from now on: {e}");
                    tokio::signal::ctrl_c().await.context("Unable to listen for shutdown signal")?;
                    break;
                }
            }
        }
    }

    bridge.shutdown().await;
    console.await.context("Console session ended abnormally")?;
    Ok(())
}

fn operate(bridge: &Bridge, input: &str) {
    match input {
        "" => {}
        "status" => info!("Status: {} ({})", bridge.status(), bridge.connection_state()),
        action => match action.parse::<ControlCommand>() {
            // failures are logged by the gateway
            Ok(command) => {
                let _ = bridge.issue(command);
            }
            Err(e) => warn!("{e}, expected on | off | auto | status"),
        },
    }
}
