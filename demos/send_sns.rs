//! Send an SMS through AWS SNS.
//!
//! Credentials come from `config/*.toml`, `SMSGATE__GATEWAYS__AWS_SNS__*`
//! variables, or the `--region/--access-key/--secret-key/--sender-id` flags.
use smsgate::prelude::*;

use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut config = AppConfig::load()?;
    smsgate::logging::init(&config.logging)?;

    if config.gateways.aws_sns.is_none() {
        config.gateways.aws_sns = Some(SnsConfig::new(
            arg_or_env("--region", "AWS_REGION"),
            arg_or_env("--access-key", "AWS_ACCESS_KEY_ID"),
            arg_or_env("--secret-key", "AWS_SECRET_ACCESS_KEY"),
            arg_or_env("--sender-id", "SMS_SENDER_ID"),
        ));
    }
    let to = arg_or_env("--to", "SMS_TO");
    let text = arg_or_env("--text", "SMS_TEXT");

    let registry = smsgate::gateways_from_config(&config)?;
    let gateway = registry
        .get("aws-sns")
        .ok_or("aws-sns gateway is not configured")?;

    match gateway.dispatch(SendRequest { to: &to, text: &text }).await {
        Ok(res) => println!(
            "Sent via {} with id {}\nRaw: {}",
            res.provider,
            res.id,
            serde_json::to_string_pretty(&res.raw)?
        ),
        Err(e) => println!("Send failed: {}", e),
    }
    Ok(())
}

fn arg_or_env(flag: &str, env_key: &str) -> String {
    let args: Vec<String> = std::env::args().collect();
    if let Some(idx) = args.iter().position(|a| a == flag) {
        if idx + 1 < args.len() {
            return args[idx + 1].clone();
        }
    }
    env::var(env_key).unwrap_or_default()
}
