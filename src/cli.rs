// CLI definitions using clap

use clap::Parser;
use ducky_transport::timing;

#[derive(Parser, Debug)]
#[command(name = "ducky-alertd")]
#[command(author, version, about = "Blink a Ducky keyboard's backlight while Alertmanager alerts fire")]
pub struct Cli {
    /// Address to listen on for Alertmanager webhooks (":PORT" binds all interfaces)
    #[arg(short, long, default_value = ":9095", value_name = "ADDR")]
    pub listen: String,

    /// How long to wait for a keyboard reply, in milliseconds
    #[arg(long, default_value_t = timing::READ_TIMEOUT_MS, value_parser = clap::value_parser!(i32).range(1..))]
    pub read_timeout_ms: i32,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse the process arguments, accepting the single-dash `-listen`
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_args(std::env::args()))
    }

    /// Address to hand to the TCP listener
    pub fn bind_addr(&self) -> String {
        normalize_listen_addr(&self.listen)
    }
}

/// Rewrite Go-flag style `-listen` / `-listen=ADDR` to `--listen`
pub fn normalize_args(args: impl IntoIterator<Item = String>) -> Vec<String> {
    args.into_iter()
        .map(|arg| match arg.strip_prefix("-listen") {
            Some(rest) if rest.is_empty() || rest.starts_with('=') => format!("--listen{rest}"),
            _ => arg,
        })
        .collect()
}

/// Expand `:PORT` to `0.0.0.0:PORT`; anything else is used as given
pub fn normalize_listen_addr(addr: &str) -> String {
    match addr.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{port}"),
        None => addr.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let args = std::iter::once("ducky-alertd")
            .chain(args.iter().copied())
            .map(String::from);
        Cli::try_parse_from(normalize_args(args)).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.listen, ":9095");
        assert_eq!(cli.bind_addr(), "0.0.0.0:9095");
        assert_eq!(cli.read_timeout_ms, timing::READ_TIMEOUT_MS);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_listen_forms() {
        assert_eq!(parse(&["--listen", "127.0.0.1:8080"]).listen, "127.0.0.1:8080");
        assert_eq!(parse(&["-l", ":1234"]).bind_addr(), "0.0.0.0:1234");
        assert_eq!(parse(&["-listen", ":9000"]).listen, ":9000");
        assert_eq!(parse(&["-listen=localhost:9000"]).listen, "localhost:9000");
    }

    #[test]
    fn test_normalize_leaves_other_args() {
        let args = normalize_args(["x", "-v", "-listener", "--listen=:1"].map(String::from));
        assert_eq!(args, vec!["x", "-v", "-listener", "--listen=:1"]);
    }

    #[test]
    fn test_listen_addr_passthrough() {
        assert_eq!(normalize_listen_addr("[::1]:9095"), "[::1]:9095");
        assert_eq!(normalize_listen_addr("host:80"), "host:80");
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let args = ["ducky-alertd", "--read-timeout-ms", "0"].map(String::from);
        assert!(Cli::try_parse_from(args).is_err());
    }
}
