use clap::Parser;
use plss_restore::config::{CliConfig, Command};
use plss_restore::utils::error::ErrorSeverity;
use plss_restore::utils::logger::{self, LogFormat};
use plss_restore::utils::validation::Validate;
use plss_restore::{
    Coordinate, CornerTag, RestorationResult, RestorationSession, SectionAddress, SessionConfig,
    SurveyError,
};
use std::path::Path;

fn main() {
    let config = CliConfig::parse();

    logger::init_logger(LogFormat::Compact, config.verbose);
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = run(config.command) {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

fn run(command: Command) -> Result<(), SurveyError> {
    match command {
        Command::Resolve {
            section,
            corner,
            grid,
        } => {
            let grid = grid.to_grid()?;
            let address = SectionAddress::new(section, CornerTag::from_label(&corner));
            let coordinate = grid.resolve(&address)?;
            println!(
                "📍 {}: Northing {:.2}, Easting {:.2}",
                address, coordinate.northing, coordinate.easting
            );
        }
        Command::Locate {
            northing,
            easting,
            grid,
        } => {
            let grid = grid.to_grid()?;
            match grid.locate(&Coordinate::new(northing, easting)) {
                Some(section) => println!("📍 Sec. {}", section),
                None => println!(
                    "⚠️ ({:.2}, {:.2}) is outside the township",
                    northing, easting
                ),
            }
        }
        Command::Snap {
            northing,
            easting,
            tolerance,
            grid,
        } => {
            let grid = grid.to_grid()?;
            match grid.snap(&Coordinate::new(northing, easting), tolerance) {
                Some(suggestion) => println!(
                    "📌 Snap to {} at {} ({:.2} ft away)",
                    suggestion.address, suggestion.coordinate, suggestion.distance
                ),
                None => println!("No corner within {} ft", tolerance),
            }
        }
        Command::Restore {
            config,
            json,
            dry_run,
        } => restore(&config, json, dry_run)?,
    }
    Ok(())
}

fn restore(path: &Path, json: bool, dry_run: bool) -> Result<(), SurveyError> {
    tracing::info!("📁 Loading session from: {}", path.display());
    let config = SessionConfig::from_file(path)?;
    config.validate()?;

    let session = config.to_session()?;
    display_session_summary(&config, &session);

    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - no restoration computed");
        return Ok(());
    }

    let result = session.restore()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        display_result(&result);
    }
    Ok(())
}

fn display_session_summary(config: &SessionConfig, session: &RestorationSession) {
    println!("📋 Session: {}", config.session.name);
    if let Some(description) = &config.session.description {
        println!("  {}", description);
    }
    println!("  Mode: {}", session.mode());
    if session.points().is_empty() {
        println!("  No control points");
    }
    for point in session.points().iter() {
        println!("  {}: {}", point.role, point.coordinate);
    }

    let inputs = session.inputs();
    for (line, input) in [
        ("NS", inputs.ns),
        ("EW", inputs.ew),
        ("North", inputs.north),
        ("South", inputs.south),
        ("East", inputs.east),
        ("West", inputs.west),
    ] {
        if let Some(input) = input {
            println!(
                "  {} line: record {} ft, measured {} ft",
                line, input.record, input.measured
            );
        }
    }

    let diagnostics = session.diagnostics();
    println!(
        "  Span tolerance: ±{} ft, adjacent limit: {} ch",
        diagnostics.span_tolerance, diagnostics.max_adjacent_chains
    );
    println!();
}

fn display_result(result: &RestorationResult) {
    println!("🧮 Derivation:");
    for step in &result.trace {
        println!("  {}", step);
    }

    println!();
    if result.is_clean() {
        println!("✅ All checks passed");
    } else {
        for warning in &result.warnings {
            println!("⚠️ {}", warning);
        }
    }

    println!();
    println!(
        "📍 Restored Coordinates: Northing {:.2}, Easting {:.2}",
        result.coordinate.northing, result.coordinate.easting
    );
}
