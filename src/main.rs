use anyhow::Result;
use clap::Parser;

use jtl_cli::cli::commands::{configure, translate};
use jtl_cli::cli::{Args, Command};
use jtl_cli::output::{self, OutputConfig};
use jtl_cli::translation::print_languages;
use jtl_cli::ui::is_prompt_cancellation;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    output::init(OutputConfig::from_flags(args.quiet, args.no_color));

    match args.command {
        Some(Command::Languages) => {
            print_languages();
        }
        Some(Command::Configure { show }) => {
            if show {
                configure::print_config()?;
            } else {
                configure::run_configure()?;
            }
        }
        None => {
            let options = translate::TranslateOptions {
                file: args.file,
                to: args.to,
                output: args.output,
                key: args.key,
                access_token: args.access_token,
                endpoint: args.endpoint,
                batch_size: args.batch_size,
                yes: args.yes,
            };

            match translate::run_translate(options).await {
                Ok(translate::TranslateOutcome::NoLanguagesSucceeded) => {
                    std::process::exit(exitcode::UNAVAILABLE);
                }
                Ok(_) => {}
                Err(e) if is_prompt_cancellation(&e) => {
                    eprintln!();
                    eprintln!("Translation canceled by user");
                }
                Err(e) => return Err(e),
            }
        }
    }

    Ok(())
}
