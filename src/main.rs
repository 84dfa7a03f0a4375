use std::path::Path;
use std::process;

use clap::{crate_version, App, Arg};
use tracing_subscriber::{fmt, EnvFilter};

use gazette::build;
use gazette::config::Config;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_target(false).init();

    let matches = App::new("gazette")
        .version(crate_version!())
        .about("Builds a static HTML blog from Markdown posts")
        .arg(
            Arg::with_name("directory")
                .value_name("DIRECTORY")
                .help("Project directory (defaults to the current directory)"),
        )
        .get_matches();
    let directory = Path::new(matches.value_of("directory").unwrap_or("."));

    let config = match Config::load(directory) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("gazette: {}", err);
            process::exit(1);
        }
    };

    // The clock is read exactly once; everything downstream takes the date
    // as an argument.
    let build_date = chrono::Local::now().naive_local().date();

    match build::build_site(&config, build_date) {
        Ok(report) => {
            println!("\nBuild complete! Generated {} posts.", report.posts_written);
        }
        Err(err) => {
            eprintln!("gazette: {}", err);
            process::exit(1);
        }
    }
}
