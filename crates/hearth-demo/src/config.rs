use std::time::Duration;

use anyhow::{bail, Context, Result};
use hearth_bridge::{BridgeConfig, StepErrorPolicy, StepMode};

/// Demo configuration, parsed from the command line.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub bridge: BridgeConfig,
    pub title: String,
    pub initial_size: (f64, f64),
    /// Frame rate the demo engine paces itself to. `None` steps flat out.
    pub target_fps: Option<u32>,
    /// Make every step fail once this many frames have rendered.
    pub fail_after: Option<u64>,
    pub log_filter: Option<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            bridge: BridgeConfig::self_driven(),
            title: "hearth".to_string(),
            initial_size: (960.0, 540.0),
            target_fps: Some(60),
            fail_after: None,
            log_filter: None,
        }
    }
}

impl DemoConfig {
    /// Parses `--flag value` style arguments (program name already stripped).
    pub fn from_args<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--host-driven" => config.bridge.mode = StepMode::HostDriven,
                "--self-driven" => config.bridge.mode = StepMode::SelfDriven,
                "--stop-on-error" => config.bridge.on_step_error = StepErrorPolicy::Stop,
                "--teardown-timeout-ms" => {
                    let ms: u64 = parse_value(&arg, args.next())?;
                    config.bridge.teardown_timeout = Some(Duration::from_millis(ms));
                }
                "--fps" => {
                    let fps: u32 = parse_value(&arg, args.next())?;
                    config.target_fps = (fps > 0).then_some(fps);
                }
                "--fail-after" => config.fail_after = Some(parse_value(&arg, args.next())?),
                "--log" => config.log_filter = Some(required(&arg, args.next())?),
                "--title" => config.title = required(&arg, args.next())?,
                other => bail!("unknown argument '{other}'"),
            }
        }

        Ok(config)
    }
}

fn required(flag: &str, value: Option<String>) -> Result<String> {
    value.with_context(|| format!("{flag} expects a value"))
}

fn parse_value<T>(flag: &str, value: Option<String>) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = required(flag, value)?;
    raw.parse()
        .with_context(|| format!("invalid value '{raw}' for {flag}"))
}
