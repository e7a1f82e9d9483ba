use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use lemmapack_db::LoadMode;

/// Command line and environment settings for the lookup service.
///
/// Flags take precedence over the environment variables named on each field.
#[derive(Debug, Parser)]
#[command(name = "lemmapack-server")]
#[command(about = "Serve paradigm lookups over a lemmapack dictionary")]
pub struct ServerArgs {
    #[arg(long, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,
    /// Directory holding `words.txt` and `inflections.txt`.
    #[arg(long, env = "DICT_DIR", default_value = "dict")]
    pub dict_dir: PathBuf,
    #[arg(
        long,
        env = "DICT_LOAD_MODE",
        value_enum,
        default_value_t = DictMode::Mmap,
        ignore_case = true
    )]
    pub dict_mode: DictMode,
    /// Omit `Cache-Control` headers from lookup responses.
    #[arg(long)]
    pub no_cache: bool,
}

impl ServerArgs {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum DictMode {
    Mmap,
    Owned,
}

impl From<DictMode> for LoadMode {
    fn from(mode: DictMode) -> Self {
        match mode {
            DictMode::Mmap => LoadMode::Mmap,
            DictMode::Owned => LoadMode::Owned,
        }
    }
}
