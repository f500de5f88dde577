use clap::Parser;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::error::Error;
use std::path::Path;
use subnet_zero::cli::{run, Cli};
use subnet_zero::config::Settings;

fn init_logging(settings: &Settings) -> Result<(), Box<dyn Error>> {
    if Path::new(&settings.log_config).exists() {
        log4rs::init_file(&settings.log_config, Default::default())?;
        return Ok(());
    }
    let level = settings.log_level.parse::<LevelFilter>().unwrap_or(LevelFilter::Info);
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{h({l:<5})} {t} - {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))?;
    log4rs::init_config(config)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let settings = Settings::from_env();
    init_logging(&settings)?;
    log::info!("#Start main() provider={}", settings.provider);

    let cli = Cli::parse();
    for line in run(cli, &settings)? {
        println!("{line}");
    }
    Ok(())
}
