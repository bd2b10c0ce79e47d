//! Server configuration (C11): the typed knobs an embedding application can
//! override before calling [`crate::server::run`]. Grounded on the teacher's
//! own small typed-config-with-defaults pattern (`src/engine/src/cfg/mod.rs`'s
//! `SchedulerCfg`), generalized from a single process-wide static to a plain
//! value passed explicitly into `run`.

/// Settings for [`crate::server::run`]. Construct with [`Default::default`]
/// and override only the fields you need via struct-update syntax:
///
/// ```
/// use loomhttp::ServerConfig;
///
/// let config = ServerConfig {
///     port: 8080,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ServerConfig {
    /// TCP port every worker binds, shared via `SO_REUSEPORT`.
    pub port: u16,
    /// Number of worker OS threads, each running its own scheduler.
    pub worker_count: usize,
    /// Size of the per-connection read buffer, in bytes.
    pub read_buffer_size: usize,
    /// Size of the per-connection write buffer, in bytes.
    pub write_buffer_size: usize,
    /// `listen()` backlog passed to each worker's listening socket.
    pub backlog: i32,
    /// Whether the connection driver logs one line per completed request.
    pub log_requests: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 7070,
            worker_count: 6,
            read_buffer_size: 8192,
            write_buffer_size: 1024,
            backlog: 128,
            log_requests: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.port, 7070);
        assert_eq!(cfg.worker_count, 6);
        assert_eq!(cfg.read_buffer_size, 8192);
        assert_eq!(cfg.write_buffer_size, 1024);
        assert_eq!(cfg.backlog, 128);
        assert!(cfg.log_requests);
    }

    #[test]
    fn struct_update_overrides_one_field() {
        let cfg = ServerConfig {
            port: 8080,
            ..Default::default()
        };
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.worker_count, 6);
    }
}
