//! Default value functions for serde deserialization.
//!
//! These functions forward to constants defined in `gost_core::defaults`.

use gost_core::defaults;

/// Generate default value functions that forward to gost_core::defaults constants.
macro_rules! default_fns {
    ($($fn_name:ident => $const_name:ident : $ty:ty),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> $ty {
                defaults::$const_name
            }
        )*
    };
}

default_fns! {
    default_dial_timeout_secs   => DEFAULT_DIAL_TIMEOUT_SECS: u64,
    default_idle_timeout_secs   => DEFAULT_IDLE_TIMEOUT_SECS: u64,
    default_shutdown_timeout_secs => DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64,
    default_relay_buffer_size   => DEFAULT_RELAY_BUFFER_SIZE: usize,
    default_tcp_keepalive_secs  => DEFAULT_KEEPALIVE_SECS: u64,
    default_tcp_no_delay        => DEFAULT_TCP_NO_DELAY: bool,
    default_tcp_reuse_port      => DEFAULT_TCP_REUSE_PORT: bool,
    default_connection_backlog  => DEFAULT_CONNECTION_BACKLOG: u32,
}
