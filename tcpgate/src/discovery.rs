//! 環境変数からのエンドポイント検出
//!
//! `<NAME>_TCP_ADDR` / `<NAME>_TCP_PORT` の組を探してエンドポイント一覧を作る。
//! 不正なエントリは警告ログを出してスキップする。

use crate::endpoint::Endpoint;
use std::collections::BTreeMap;
use tracing::warn;

/// Suffix of the address variable
pub const ADDR_SUFFIX: &str = "_TCP_ADDR";

/// Suffix of the port variable
pub const PORT_SUFFIX: &str = "_TCP_PORT";

/// Discover endpoints from the current process environment.
///
/// Variables that are not valid unicode are ignored.
pub fn discover_from_env() -> Vec<Endpoint> {
    discover(
        std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?))),
    )
}

/// Discover endpoints from `(key, value)` pairs.
///
/// The result is sorted by service name.
pub fn discover<I>(vars: I) -> Vec<Endpoint>
where
    I: IntoIterator<Item = (String, String)>,
{
    let vars: BTreeMap<String, String> = vars.into_iter().collect();
    let mut endpoints = Vec::new();

    for (key, address) in &vars {
        let Some(name) = key.strip_suffix(ADDR_SUFFIX) else {
            continue;
        };

        let port_key = format!("{}{}", name, PORT_SUFFIX);
        let port = vars.get(&port_key).map(String::as_str).unwrap_or_default();

        match Endpoint::parse(name, address.as_str(), port) {
            Ok(endpoint) => endpoints.push(endpoint),
            Err(e) => {
                warn!(
                    port_key = %port_key,
                    value = %port,
                    service = %name,
                    error = %e,
                    "Skipping service with invalid TCP address or port"
                );
            }
        }
    }

    endpoints.sort_by(|a, b| a.name().cmp(b.name()));
    endpoints
}
