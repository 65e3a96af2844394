use std::net::SocketAddr;

use clap::Parser;

/// Runtime configuration for the todo server. Every option can also be set
/// through its environment variable.
#[derive(Debug, Clone, Parser)]
#[command(name = "todo-server", version, about = "JSON CRUD API over a single todo table")]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "TODO_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// SQLite database path (`:memory:` for a throwaway database).
    #[arg(long, env = "TODO_DATABASE", default_value = "todo.db")]
    pub database: String,

    /// Reject create/update bodies whose status is not pending, in-progress or complete.
    #[arg(long, env = "TODO_STRICT_STATUS")]
    pub strict_status: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            database: "todo.db".to_string(),
            strict_status: false,
        }
    }
}
