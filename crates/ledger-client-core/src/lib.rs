pub mod account;
pub mod address;
pub mod client;
pub mod config;
pub mod error;
pub mod general;
pub mod memo;
pub mod pagination;
pub mod request;
pub mod translate;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod test_util;

pub use address::{AccountAddress, HexString};
pub use client::LedgerClient;
pub use config::{ClientConfig, Network};
pub use error::{
    ApiError, ClientError, ConfigError, FormatError, PaginationExhausted, ParseError,
    TransportError,
};
pub use request::{CallOverrides, QueryOptions, RangeOptions, RequestDescriptor};
