use clap::Parser;
use djedi::application::{RenderOptions, RenderTemplateService, ScanOptions, ScanTemplatesService};
use djedi::cli::{format_scan_report, Cli, Commands};
use djedi::error::DjediError;

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<(), DjediError> {
    match cli.command {
        Commands::Render {
            template,
            content,
            vars,
            config,
            no_edit,
        } => {
            let vars = parse_vars(&vars)?;
            let output = RenderTemplateService::execute(RenderOptions {
                template,
                content,
                vars,
                config,
                no_edit,
            })?;
            print!("{}", output);
            Ok(())
        }
        Commands::Scan { dir, ext } => {
            let reports = ScanTemplatesService::execute(ScanOptions {
                dir,
                extension: ext,
            })?;
            print!("{}", format_scan_report(&reports));
            Ok(())
        }
    }
}

/// Parse --var key=value pairs
fn parse_vars(raw: &[String]) -> Result<Vec<(String, String)>, DjediError> {
    raw.iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .ok_or_else(|| {
                    DjediError::Config(format!("Invalid --var '{}', expected key=value", pair))
                })
        })
        .collect()
}
