use clap::Parser;
use pinvoke_bindgen::interface::cli::{print_config_errors, Cli};
use pinvoke_bindgen::{generate_from_config, Error};

fn main() {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(err) => {
            print_config_errors(&err);
            std::process::exit(1);
        }
    };
    if let Err(err) = config.validate() {
        print_config_errors(&err);
        std::process::exit(1);
    }

    match generate_from_config(&config) {
        Ok(report) if report.emitted() == 0 => {
            eprintln!("Warning: no declaration could be bound");
        }
        Ok(_) => {}
        Err(Error::Config(err)) => {
            print_config_errors(&err);
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    }
}
