use std::path::PathBuf;

use argparse::{ArgumentParser, Print, Store, StoreOption};

pub struct ArgsOptions {
    pub config_file_path: PathBuf,

    // Update interval override in milliseconds
    pub interval_ms: Option<u64>,
}

impl ArgsOptions {
    pub fn parse() -> Self {
        let mut options = ArgsOptions::default();

        {
            let mut parser = ArgumentParser::new();

            // Configuration file path
            parser.refer(&mut options.config_file_path).add_option(
                &["-c", "--config"],
                Store,
                "The file path of the configuration file",
            );

            // Update interval override
            parser.refer(&mut options.interval_ms).add_option(
                &["-i", "--interval"],
                StoreOption,
                "Override the update interval in milliseconds",
            );

            // Show monitor version
            parser.add_option(
                &["-V", "--version"],
                Print(env!("CARGO_PKG_VERSION").to_string()),
                "Show the monitor version",
            );

            parser.parse_args_or_exit();
        }

        options
    }
}

// TODO: change this to /etc/gputempd/config.json
impl Default for ArgsOptions {
    fn default() -> Self {
        Self {
            config_file_path: PathBuf::from("gputempd/config.json"),
            interval_ms: None,
        }
    }
}
