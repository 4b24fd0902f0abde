use std::env;
use std::error::Error;
use std::io::{self, BufRead};
use std::path::PathBuf;

use serde_json::Value;

use paperback::{Mode, PaperbackWriter, WriterConfig};

#[derive(Debug)]
enum Command {
    Run(CliOptions),
    Help,
    Version,
}

#[derive(Debug)]
struct CliOptions {
    config: WriterConfig,
    parse_json: bool,
}

fn help_text() -> String {
    String::from(
        "paperback - write piped lines to the console, a log file, or both\n\
         \n\
         USAGE:\n\
         \x20 paperback [OPTIONS]\n\
         \x20 some-command | paperback --mode both --directory logs\n\
         \n\
         Reads standard input line by line; every line goes through the writer.\n\
         \n\
         OPTIONS:\n\
         \x20 --directory <path>          Directory for the log file (default: current directory)\n\
         \x20 --basename <name>           Log filename stem (default: paperback)\n\
         \x20 --extension <ext>           Log filename extension (default: txt)\n\
         \x20 --no-extension              Drop the extension entirely\n\
         \x20 --timestamp-format <fmt>    strftime pattern stamped into the filename\n\
         \x20                             (default: %m-%d-%y-%-I:%M:%S-%P)\n\
         \x20 --no-timestamp              Leave the timestamp out of the filename\n\
         \x20 --mode <both|console|file>  Write target, by name or as 1|2|3 (default: console)\n\
         \x20 --raw                       Render JSON values compactly on one line\n\
         \x20 --json                      Parse each input line as JSON before writing\n\
         \x20 -h, --help                  Show this help\n\
         \x20 -V, --version               Show version\n",
    )
}

fn take_value(flag: &str, iter: &mut std::slice::Iter<String>) -> Result<String, Box<dyn Error>> {
    match iter.next() {
        Some(value) => Ok(value.clone()),
        None => Err(format!("missing value for {flag}").into()),
    }
}

fn parse_args(args: &[String]) -> Result<Command, Box<dyn Error>> {
    let mut config = WriterConfig::default();
    let mut parse_json = false;
    let mut iter = args.iter();

    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "--directory" => {
                config.directory = Some(PathBuf::from(take_value(flag, &mut iter)?));
            }
            "--basename" => {
                config.basename = take_value(flag, &mut iter)?;
            }
            "--extension" => {
                config.extension = Some(take_value(flag, &mut iter)?);
            }
            "--no-extension" => {
                config.extension = None;
            }
            "--timestamp-format" => {
                config.timestamp_format = take_value(flag, &mut iter)?;
            }
            "--no-timestamp" => {
                config.timestamp = false;
            }
            "--mode" => {
                config.mode = take_value(flag, &mut iter)?.parse::<Mode>()?;
            }
            "--raw" => {
                config.inspect = false;
            }
            "--json" => {
                parse_json = true;
            }
            other => return Err(format!("unknown flag: {other}").into()),
        }
    }

    Ok(Command::Run(CliOptions { config, parse_json }))
}

fn pipe_stdin(options: CliOptions) -> Result<(), Box<dyn Error>> {
    let mut writer = PaperbackWriter::new(options.config)?;
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if options.parse_json {
            // Lines that are not valid JSON pass through as plain text.
            match serde_json::from_str::<Value>(&line) {
                Ok(value) => writer.write(&value)?,
                Err(_) => writer.write(&line)?,
            };
        } else {
            writer.write(&line)?;
        }
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    match parse_args(&args)? {
        Command::Help => {
            print!("{}", help_text());
            Ok(())
        }
        Command::Version => {
            println!("paperback {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::Run(options) => pipe_stdin(options),
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("paperback: {err}");
        std::process::exit(1);
    }
}
