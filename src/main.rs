use clap::Parser;

use mc_backup_lib::archiver;
use mc_backup_lib::cli::{Action, Cli};
use mc_backup_lib::config::BackupConfig;
use mc_backup_lib::event;

fn main() {
    let cli = Cli::parse();

    // init logger
    let mut env_logger = env_logger::builder();
    if let Some(level) = cli.verbose {
        env_logger.filter_level(level);
    }
    env_logger.try_init().expect("env_logger should not fail");

    let config: BackupConfig = match std::fs::read_to_string(&cli.config) {
        Ok(config_str) => match toml::from_str(&config_str) {
            Err(e) => {
                log::error!("Reading the settings file failed: {e}");
                return;
            }
            Ok(cfg) => cfg,
        },
        Err(e) => {
            if std::fs::exists(&cli.config).is_ok_and(|b| !b) {
                log::debug!(
                    "Writing default settings to {} because it doesn't exist yet",
                    cli.config.display()
                );
                let default_config = BackupConfig::default();
                let config_str = toml::to_string_pretty(&default_config)
                    .expect("default settings should be serializable");
                if let Err(e) = std::fs::write(&cli.config, config_str) {
                    log::warn!(
                        "Writing default settings to {} failed {e}",
                        cli.config.display(),
                    );
                }

                default_config
            } else {
                log::error!("Reading the settings file failed: {e}");
                return;
            }
        }
    };

    match cli.action {
        Action::Trigger { event } => event::dispatch(&config, event),
        Action::Backup => {
            match archiver::run_backup_cycle(
                &config.source_path,
                &config.backup_root,
                config.max_backups,
            ) {
                Ok(archive) => log::info!("World backup created: {}", archive.display()),
                Err(e) => log::warn!("World backup failed: {e}"),
            }
        }
    }
}
