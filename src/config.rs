use clap::Parser;

pub(crate) const DEFAULT_ADDR: &str = "127.0.0.1:8080";
pub(crate) const DEFAULT_DB_PATH: &str = "./snippetbin.db";

#[derive(Debug, Parser)]
#[command(name = "snippetbin", version, about = "Snippet storage service")]
pub(crate) struct Cli {
    /// http service address
    #[arg(long, default_value = DEFAULT_ADDR)]
    pub(crate) addr: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addr_defaults_to_loopback() {
        let cli = Cli::try_parse_from(["snippetbin"]).unwrap();
        assert_eq!(cli.addr, "127.0.0.1:8080");
    }

    #[test]
    fn addr_can_be_overridden() {
        let cli = Cli::try_parse_from(["snippetbin", "--addr", "0.0.0.0:9000"]).unwrap();
        assert_eq!(cli.addr, "0.0.0.0:9000");
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(Cli::try_parse_from(["snippetbin", "--db", "x.db"]).is_err());
    }
}
