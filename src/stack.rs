use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("unknown network stack `{0}`, expected one of: legacy, lwip, libbsd")]
pub struct UnknownStack(pub String);

/// The three mutually exclusive TCP/IP stacks a build can target. Exactly one
/// is selected per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkStack {
    Legacy,
    Lwip,
    Libbsd,
}

impl NetworkStack {
    pub const ALL: [NetworkStack; 3] =
        [NetworkStack::Legacy, NetworkStack::Lwip, NetworkStack::Libbsd];

    pub fn name(self) -> &'static str {
        match self {
            NetworkStack::Legacy => "legacy",
            NetworkStack::Lwip => "lwip",
            NetworkStack::Libbsd => "libbsd",
        }
    }

    /// The adapter translating the stack's init interface to the common
    /// net_adapter.h contract the test programs compile against.
    pub fn adapter_source(self) -> &'static str {
        match self {
            NetworkStack::Legacy => "net/legacy/net_adapter.c",
            NetworkStack::Lwip => "net/lwip/net_adapter.c",
            NetworkStack::Libbsd => "net/libbsd/net_adapter.c",
        }
    }

    /// Extra headers shipped next to the adapter. Only libbsd carries one.
    pub fn adapter_include_dir(self) -> &'static str {
        match self {
            NetworkStack::Legacy => "net/legacy",
            NetworkStack::Lwip => "net/lwip",
            NetworkStack::Libbsd => "net/libbsd",
        }
    }

    /// Preprocessor define selecting stack-specific code paths in the
    /// adapters and test programs.
    pub fn define(self) -> &'static str {
        match self {
            NetworkStack::Legacy => "RTEMS_NET_LEGACY",
            NetworkStack::Lwip => "RTEMS_NET_LWIP",
            NetworkStack::Libbsd => "RTEMS_NET_LIBBSD",
        }
    }

    /// Static libraries the stack itself contributes to the link line.
    /// libbsd also needs libm, pulled in at BSP configure time.
    pub fn stack_libs(self) -> &'static [&'static str] {
        match self {
            NetworkStack::Legacy => &["networking"],
            NetworkStack::Lwip => &["lwip"],
            NetworkStack::Libbsd => &["bsd", "m"],
        }
    }
}

impl FromStr for NetworkStack {
    type Err = UnknownStack;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legacy" => Ok(NetworkStack::Legacy),
            "lwip" => Ok(NetworkStack::Lwip),
            "libbsd" => Ok(NetworkStack::Libbsd),
            other => Err(UnknownStack(other.to_string())),
        }
    }
}

impl fmt::Display for NetworkStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
