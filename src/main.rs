use anyhow::Context;
use clap::{CommandFactory, Parser};
use geonames_pdf::core::report::{format_gazetteer_loaded, format_listing};
use geonames_pdf::domain::ports::ConfigProvider;
use geonames_pdf::utils::error::ErrorSeverity;
use geonames_pdf::utils::{logger, validation::Validate};
use geonames_pdf::{
    CliConfig, HfModelHub, LocalStorage, OnnxModelLoader, SetupChecker, SetupOutcome,
    ToponymEngine, ToponymError, ToponymPipeline,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: &ToponymError) -> ! {
    tracing::error!(
        "{} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(e.severity()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let settings = cli.load_settings().unwrap_or_else(|e| fail(&e));
    let list_languages = cli.list_languages;
    let install_language = cli.install_language.clone();
    let skip_setup = cli.skip_setup;
    let assume_yes = cli.yes;
    let monitor_enabled = cli.monitor;

    let config = cli.into_app_config(settings);
    if let Err(e) = config.validate() {
        fail(&e);
    }

    let hub = Arc::new(HfModelHub::new(&config.settings.hub));
    let checker = SetupChecker::new(
        Arc::clone(&hub),
        config.catalog().clone(),
        &config.settings.setup,
    );

    let mut stdout = io::stdout();
    if list_languages {
        checker.list_languages(&mut stdout).unwrap_or_else(|e| fail(&e));
        return Ok(());
    }
    if let Some(code) = install_language {
        let installed = checker
            .install_language(&code, &mut stdout)
            .await
            .unwrap_or_else(|e| fail(&e));
        std::process::exit(if installed { 0 } else { 1 });
    }

    if !skip_setup {
        let mut stdin = io::stdin().lock();
        let outcome = checker
            .first_run(&mut stdin, &mut stdout, assume_yes)
            .await
            .unwrap_or_else(|e| fail(&e));
        if outcome == SetupOutcome::Incomplete {
            fail(&ToponymError::SetupError {
                message: format!(
                    "essential models missing, marker not written at {}",
                    checker.marker_path().display()
                ),
            });
        }
    }

    if config.pdf_path().is_none() {
        CliConfig::command()
            .error(
                clap::error::ErrorKind::MissingRequiredArgument,
                "the PDF_PATH argument is required unless --list-languages or --install-language is given",
            )
            .exit();
    }

    let gazetteer_given = config.gazetteer_path().is_some();
    if let Some(gazetteer) = config.gazetteer_path() {
        println!("📖 Loading gazetteer from: {}", gazetteer.display());
    }
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(
        config
            .output_dir()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
    );
    let loader = OnnxModelLoader::new(hub, config.settings.ner.clone());
    let pipeline = ToponymPipeline::new(storage, config, loader);
    if gazetteer_given {
        println!("{}", format_gazetteer_loaded(pipeline.gazetteer().len()));
    }
    let engine = ToponymEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output) => {
            let listing = format_listing(&output.report);
            let mut stdout = io::stdout().lock();
            writeln!(stdout).context("writing toponym list")?;
            stdout
                .write_all(listing.as_bytes())
                .context("writing toponym list")?;
            tracing::info!("Extraction finished with {} toponyms", output.report.toponyms.len());
        }
        Err(e) => fail(&e),
    }

    Ok(())
}
