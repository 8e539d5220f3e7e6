mod cli;

use clap::Parser;
use eyre::{eyre, WrapErr};
use serde::Serialize;
use serde_json::Value;

use ledger_client_core::config::resolve_auth_token;
use ledger_client_core::error::TransportErrorKind;
use ledger_client_core::types::ViewRequest;
use ledger_client_core::{ClientConfig, ClientError, LedgerClient, QueryOptions, RangeOptions};

use cli::Command;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let config = build_config(&args)?;
    let node_url = config.node_url().to_string();
    tracing::info!(node_url = %node_url, "using node");

    let client = LedgerClient::new(config).context("build node client")?;
    let output = run(&client, args.command).await.map_err(|err| {
        let message = format_node_error(&node_url, &err);
        eyre!(message).wrap_err("while querying the node")
    })?;

    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("render output")?
    );
    Ok(())
}

fn build_config(args: &cli::Cli) -> eyre::Result<ClientConfig> {
    let mut config = match &args.node_url {
        Some(url) => ClientConfig::new(url).context("parse --node-url")?,
        None => ClientConfig::for_network(args.network),
    };

    let token = resolve_auth_token(args.auth_token.as_deref(), args.auth_token_file.as_deref())
        .context("resolve auth token")?;
    if let Some(token) = token {
        config = config.with_auth_token(token);
    }
    for (name, value) in &args.headers {
        config = config
            .with_header(name, value)
            .with_context(|| format!("invalid --header `{name}`"))?;
    }
    if let Some(limit) = args.requests_per_second {
        config = config
            .with_requests_per_second(limit)
            .context("invalid --requests-per-second")?;
    }
    config
        .with_max_pages(args.max_pages)
        .context("invalid --max-pages")
}

// ==============================================================================
// Commands
// ==============================================================================

#[derive(Debug, thiserror::Error)]
enum CommandError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("failed to render response: {0}")]
    Render(#[from] serde_json::Error),
}

fn to_json<T: Serialize>(value: T) -> Result<Value, CommandError> {
    Ok(serde_json::to_value(value)?)
}

async fn run(client: &LedgerClient, command: Command) -> Result<Value, CommandError> {
    match command {
        Command::LedgerInfo => to_json(client.get_ledger_info(None).await?),
        Command::ChainId => to_json(client.get_chain_id().await?),
        Command::Account {
            address,
            ledger_version,
        } => {
            let options = QueryOptions {
                ledger_version,
                ..QueryOptions::default()
            };
            let (account, resources, modules) = futures::try_join!(
                client.get_account(&address, &options),
                client.get_account_resources(&address, &options),
                client.get_account_modules(&address, &options),
            )?;
            let modules: Vec<Value> = modules
                .into_iter()
                .map(|module| {
                    serde_json::json!({
                        "name": module.abi.as_ref().and_then(|abi| abi.get("name")),
                        "bytecode_len": module.bytecode.len(),
                    })
                })
                .collect();
            Ok(serde_json::json!({
                "address": address.to_string(),
                "short_form": address.short_form(),
                "account": to_json(account)?,
                "resources": to_json(resources)?,
                "modules": modules,
            }))
        }
        Command::Resources {
            address,
            ledger_version,
            limit,
        } => {
            let options = QueryOptions {
                ledger_version,
                limit,
                overrides: None,
            };
            to_json(client.get_account_resources(&address, &options).await?)
        }
        Command::Resource {
            address,
            resource_type,
            ledger_version,
        } => {
            let options = QueryOptions {
                ledger_version,
                ..QueryOptions::default()
            };
            to_json(
                client
                    .get_account_resource(&address, &resource_type, &options)
                    .await?,
            )
        }
        Command::Modules {
            address,
            ledger_version,
            limit,
        } => {
            let options = QueryOptions {
                ledger_version,
                limit,
                overrides: None,
            };
            to_json(client.get_account_modules(&address, &options).await?)
        }
        Command::Transactions {
            address,
            start,
            limit,
        } => {
            let range = RangeOptions {
                start,
                limit,
                overrides: None,
            };
            let txns = match address {
                Some(address) => client.get_account_transactions(&address, &range).await?,
                None => client.get_transactions(&range).await?,
            };
            to_json(txns)
        }
        Command::Block {
            height,
            by_version,
            with_transactions,
        } => {
            let block = if by_version {
                client
                    .get_block_by_version(height, with_transactions, None)
                    .await?
            } else {
                client
                    .get_block_by_height(height, with_transactions, None)
                    .await?
            };
            to_json(block)
        }
        Command::Txn { id } => {
            let txn = match id.parse::<u64>() {
                Ok(version) => client.get_transaction_by_version(version, None).await?,
                Err(_) => client.get_transaction_by_hash(&id, None).await?,
            };
            to_json(txn)
        }
        Command::View {
            function,
            type_arguments,
            arguments,
            ledger_version,
        } => {
            let view = ViewRequest {
                function,
                type_arguments,
                arguments: arguments.iter().map(String::as_str).map(parse_view_arg).collect(),
            };
            to_json(client.view(&view, ledger_version, None).await?)
        }
        Command::GasPrice => to_json(client.estimate_gas_price(None).await?),
    }
}

/// View arguments are JSON; anything that does not parse is sent as a string,
/// so addresses need no quoting on the command line.
fn parse_view_arg(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

// ==============================================================================
// Error Hints
// ==============================================================================

fn format_node_error(node_url: &str, err: &CommandError) -> String {
    let CommandError::Client(err) = err else {
        return err.to_string();
    };

    let mut lines = vec![
        format!("request to node `{node_url}` failed"),
        format!("{} error: {err}", err.kind()),
    ];

    match err {
        ClientError::Transport(transport) => {
            let message = transport.message.as_str();
            if message.contains("dns error") || message.contains("Could not resolve host") {
                lines.push(
                    "hint: hostname resolution failed; verify the node hostname and your DNS/network"
                        .into(),
                );
            } else if message.contains("tls")
                || message.contains("certificate")
                || message.contains("SSL")
            {
                lines.push(
                    "hint: TLS handshake failed; verify certificate trust and that the node uses HTTPS"
                        .into(),
                );
            } else if transport.kind == TransportErrorKind::Timeout {
                lines.push("hint: the node did not answer in time; retry or pick another node".into());
            } else if transport.kind == TransportErrorKind::Connect {
                lines.push(
                    "hint: connection refused or unreachable; verify --node-url and network access"
                        .into(),
                );
            }
        }
        ClientError::Api(api) => match api.status.as_u16() {
            401 | 403 => lines.push(
                "hint: authentication failed; verify --auth-token or --auth-token-file".into(),
            ),
            404 => lines.push(format!(
                "hint: nothing found at `{}`; verify the address, type tag or ledger version",
                api.request.endpoint().unwrap_or_default()
            )),
            410 => lines.push(
                "hint: the requested ledger version has been pruned by this node".into(),
            ),
            429 => lines.push(
                "hint: the node is rate limiting; lower --requests-per-second".into(),
            ),
            _ => {}
        },
        ClientError::Parse(_) => lines.push(
            "hint: unexpected response body; verify the node URL points at the REST API root (ending in /v1)"
                .into(),
        ),
        ClientError::PaginationExhausted(exhausted) => lines.push(format!(
            "hint: stopped after {} requests with {} items; raise --max-pages",
            exhausted.requests,
            exhausted.partial.len()
        )),
        ClientError::Format(_) => {}
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use ledger_client_core::error::{PaginationExhausted, TransportError};

    use super::*;

    #[test]
    fn view_args_accept_json_or_bare_words() {
        assert_eq!(parse_view_arg("true"), Value::Bool(true));
        assert_eq!(parse_view_arg("[1,2]"), serde_json::json!([1, 2]));
        assert_eq!(parse_view_arg("0x1"), Value::String("0x1".to_owned()));
        assert_eq!(parse_view_arg("\"100\""), Value::String("100".to_owned()));
    }

    #[test]
    fn connect_failure_gets_reachability_hint() {
        let err = CommandError::Client(ClientError::Transport(TransportError::new(
            TransportErrorKind::Connect,
            "http://127.0.0.1:8080/v1",
            "error sending request",
        )));
        let message = format_node_error("http://127.0.0.1:8080/v1", &err);
        assert!(message.contains("transport_error"));
        assert!(message.contains("verify --node-url"));
    }

    #[test]
    fn exhausted_walk_suggests_raising_bound() {
        let err = CommandError::Client(ClientError::from(PaginationExhausted {
            requests: 3,
            last_cursor: "c3".to_owned(),
            partial: vec![Value::Null; 6],
        }));
        let message = format_node_error("https://node.example/v1", &err);
        assert!(message.contains("stopped after 3 requests with 6 items"));
    }
}
