use clap::Parser;

use crate::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "blog-api")]
#[command(about = "Blog publishing REST backend")]
#[command(version)]
pub struct Cli {
    #[arg(long, help = "Port to listen on (overrides PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Keep data in memory instead of PostgreSQL")]
    pub in_memory: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the environment config
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.in_memory {
            config.database.url = None;
        }
    }
}
