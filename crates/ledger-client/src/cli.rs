use std::path::PathBuf;

use clap::{Parser, Subcommand};

use ledger_client_core::config::DEFAULT_MAX_PAGES;
use ledger_client_core::{AccountAddress, Network};

/// ledger: query a ledger node's REST API and print the JSON result.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Node REST API root, e.g. `https://fullnode.testnet.aptoslabs.com/v1`.
    /// Takes precedence over `--network`.
    #[arg(long, env = "LEDGER_NODE_URL", global = true)]
    pub node_url: Option<String>,

    /// Well-known network to use when no node URL is given.
    #[arg(long, default_value = "mainnet", global = true)]
    pub network: Network,

    /// Bearer token sent with every request.
    #[arg(long, env = "LEDGER_AUTH_TOKEN", hide_env_values = true, global = true)]
    pub auth_token: Option<String>,

    /// File whose first non-empty line is the bearer token.
    #[arg(long, global = true)]
    pub auth_token_file: Option<PathBuf>,

    /// Extra header sent with every request (repeatable).
    #[arg(long = "header", value_name = "NAME:VALUE", value_parser = parse_header, global = true)]
    pub headers: Vec<(String, String)>,

    /// Client-side request rate limit.
    #[arg(long, global = true)]
    pub requests_per_second: Option<u32>,

    /// Maximum requests issued while following a paginated listing.
    #[arg(long, default_value_t = DEFAULT_MAX_PAGES, global = true)]
    pub max_pages: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Current ledger state of the node.
    LedgerInfo,

    /// Chain id reported by the node.
    ChainId,

    /// Account data together with all of its resources and modules.
    Account {
        address: AccountAddress,
        #[arg(long)]
        ledger_version: Option<u64>,
    },

    /// All resources held by an account.
    Resources {
        address: AccountAddress,
        #[arg(long)]
        ledger_version: Option<u64>,
        /// Page size requested per call.
        #[arg(long)]
        limit: Option<u16>,
    },

    /// One resource by Move type tag.
    Resource {
        address: AccountAddress,
        /// Type tag, e.g. `0x1::account::Account`.
        resource_type: String,
        #[arg(long)]
        ledger_version: Option<u64>,
    },

    /// All modules published by an account.
    Modules {
        address: AccountAddress,
        #[arg(long)]
        ledger_version: Option<u64>,
        #[arg(long)]
        limit: Option<u16>,
    },

    /// One page of transactions, for an account when one is given.
    Transactions {
        address: Option<AccountAddress>,
        #[arg(long)]
        start: Option<u64>,
        #[arg(long)]
        limit: Option<u16>,
    },

    /// A block by height, or by a ledger version it contains.
    Block {
        height: u64,
        /// Treat the argument as a ledger version instead of a height.
        #[arg(long)]
        by_version: bool,
        #[arg(long)]
        with_transactions: bool,
    },

    /// A transaction by `0x`-prefixed hash or by ledger version.
    Txn { id: String },

    /// Run a Move view function.
    View {
        /// Fully qualified function, e.g. `0x1::coin::balance`.
        function: String,
        #[arg(long = "type-arg")]
        type_arguments: Vec<String>,
        /// Argument as JSON; bare words are sent as strings (repeatable).
        #[arg(long = "arg")]
        arguments: Vec<String>,
        #[arg(long)]
        ledger_version: Option<u64>,
    },

    /// Gas unit price estimate.
    GasPrice,
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected NAME:VALUE, got `{raw}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("header name is empty in `{raw}`"));
    }
    Ok((name.to_owned(), value.trim().to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_mainnet_and_default_page_bound() {
        let cli = Cli::try_parse_from(["ledger", "ledger-info"]).expect("valid args");
        assert_eq!(cli.network, Network::Mainnet);
        assert_eq!(cli.max_pages, DEFAULT_MAX_PAGES);
        assert!(matches!(cli.command, Command::LedgerInfo));
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ledger",
            "resources",
            "0x1",
            "--limit",
            "25",
            "--network",
            "testnet",
            "--header",
            "x-team: core",
        ])
        .expect("valid args");

        assert_eq!(cli.network, Network::Testnet);
        assert_eq!(cli.headers, vec![("x-team".to_owned(), "core".to_owned())]);
        let Command::Resources { address, limit, .. } = cli.command else {
            panic!("expected resources command");
        };
        assert_eq!(address.short_form(), "0x1");
        assert_eq!(limit, Some(25));
    }

    #[test]
    fn rejects_malformed_address_and_header() {
        assert!(Cli::try_parse_from(["ledger", "account", "0xzz"]).is_err());
        assert!(Cli::try_parse_from(["ledger", "--header", "no-colon", "chain-id"]).is_err());
    }

    #[test]
    fn view_collects_repeated_arguments() {
        let cli = Cli::try_parse_from([
            "ledger",
            "view",
            "0x1::coin::balance",
            "--type-arg",
            "0x1::aptos_coin::AptosCoin",
            "--arg",
            "0x1",
        ])
        .expect("valid args");
        let Command::View {
            type_arguments,
            arguments,
            ..
        } = cli.command
        else {
            panic!("expected view command");
        };
        assert_eq!(type_arguments, vec!["0x1::aptos_coin::AptosCoin"]);
        assert_eq!(arguments, vec!["0x1"]);
    }
}
