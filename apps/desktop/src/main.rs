use std::{path::PathBuf, str::FromStr, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    compile,
    export::{export_csv, CsvOptions},
    transport::DEFAULT_SERVICE_URL,
    reaction_equation, significant_points, CorrectionError, HttpSimulationTransport,
    ModeSelection, ReactorForm, Stoichiometry, SubmissionController, SubmissionError,
    SubmissionOutcome,
};
use shared::{domain::ParameterField, protocol::SimulationResult};
use storage::{sqlite_url, ConfigurationStore, Storage};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "desktop", about = "Batch reactor simulation client")]
struct Cli {
    /// SQLite file holding the persisted form.
    #[arg(long, env = "REACTOR_STORE", default_value = "reactor.db")]
    store: PathBuf,
    #[arg(long, env = "REACTOR_SERVICE_URL", default_value = DEFAULT_SERVICE_URL)]
    service_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the stored configuration and its validation errors.
    Show,
    /// Set a numeric input, e.g. `set targetConversion 0.8`.
    Set { field: String, value: String },
    /// Change a mode selector, e.g. `mode operationType non-isothermic`.
    Mode { name: String, value: String },
    /// Print the request document the service would receive.
    Compile,
    /// Restore the default configuration.
    Reset,
    /// Submit the stored configuration to the simulation service.
    Run {
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Resubmit with the suggested conversion when equilibrium is exceeded.
        #[arg(long)]
        accept_equilibrium: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();
    let cli = Cli::parse();

    let storage = Storage::new(&sqlite_url(&cli.store))
        .await
        .with_context(|| format!("failed to open store {}", cli.store.display()))?;
    let store = ConfigurationStore::new(Arc::new(storage));
    let mut form = ReactorForm::new(store.load().await?);

    match cli.command {
        Command::Show => print_form(&form),
        Command::Set { field, value } => {
            let field = ParameterField::from_str(&field)?;
            form.set_parameter(field, value);
            store.save(form.configuration()).await?;
            print_errors(&form);
        }
        Command::Mode { name, value } => {
            form.select(ModeSelection::parse(&name, &value)?);
            store.save(form.configuration()).await?;
            print_errors(&form);
        }
        Command::Compile => {
            let request = compile(form.configuration());
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
        Command::Reset => {
            form.reset();
            store.clear().await?;
            println!("configuration reset to defaults");
        }
        Command::Run {
            csv,
            accept_equilibrium,
        } => {
            let transport = HttpSimulationTransport::new(&cli.service_url)?;
            let mut controller =
                SubmissionController::new(Arc::new(transport)).with_store(store.clone());

            let token = controller.cancel_token();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    token.cancel();
                }
            });

            let result = run(&mut controller, &mut form, accept_equilibrium).await?;
            println!(
                "{}",
                reaction_equation(Stoichiometry::from_configuration(form.configuration()))
            );
            print_result(&result);
            if let Some(path) = csv {
                export_csv(&result, &path, &CsvOptions::default())?;
                info!(path = %path.display(), rows = result.data.len(), "results exported");
                println!("wrote {}", path.display());
            }
        }
    }

    Ok(())
}

async fn run(
    controller: &mut SubmissionController,
    form: &mut ReactorForm,
    accept_equilibrium: bool,
) -> Result<SimulationResult> {
    let config = form.configuration().clone();
    let outcome = match controller.submit(&config).await {
        Ok(outcome) => outcome,
        Err(SubmissionError::Validation(errors)) => {
            for (field, message) in errors.iter() {
                eprintln!("{field}: {message}");
            }
            bail!("configuration has {} invalid field(s)", errors.len());
        }
        Err(error) => return fallback_or(controller, error),
    };

    match outcome {
        SubmissionOutcome::Completed(result) => Ok(result),
        SubmissionOutcome::EquilibriumWarning(dialog) => {
            eprintln!("{}", dialog.message);
            eprintln!(
                "target conversion {} exceeds equilibrium conversion {}; suggested {}",
                dialog.target_conversion, dialog.equilibrium_conversion, dialog.temp_conversion
            );
            if !accept_equilibrium {
                controller.cancel_correction();
                bail!("rerun with --accept-equilibrium to use the suggested conversion");
            }
            match controller
                .confirm_correction(&dialog.temp_conversion, form)
                .await
            {
                Ok(SubmissionOutcome::Completed(result)) => Ok(result),
                Ok(SubmissionOutcome::EquilibriumWarning(_)) => {
                    bail!("service still reports an equilibrium violation")
                }
                Err(CorrectionError::Submission(error)) => fallback_or(controller, error),
                Err(error) => Err(error.into()),
            }
        }
    }
}

fn fallback_or(
    controller: &SubmissionController,
    error: SubmissionError,
) -> Result<SimulationResult> {
    match controller.display_result() {
        Some(result) if error.is_recoverable() => {
            warn!(%error, "showing sample data");
            eprintln!("{error}");
            Ok(result)
        }
        _ => Err(error.into()),
    }
}

fn print_form(form: &ReactorForm) {
    let config = form.configuration();
    println!(
        "{}",
        reaction_equation(Stoichiometry::from_configuration(config))
    );
    println!();
    println!("operationType     {}", config.operation_type);
    println!("isothermicMode    {}", config.isothermic_mode);
    println!("energyMode        {}", config.energy_mode);
    println!("reactionOrder     {}", config.reaction_order);
    println!("reactionType      {}", config.reaction_type);
    println!("equilibriumMethod {}", config.equilibrium_method);
    println!("rateConstantMode  {}", config.rate_constant_mode);
    println!("volumeCalculate   {}", config.volume_calculate);
    println!("productOfInterest {}", config.product_of_interest);
    println!("excessB           {}", config.excess_b);
    println!("unitOfTime        {}", config.unit_of_time);
    println!();
    for field in ParameterField::ALL {
        let marker = if form.errors().get(*field).is_some() { "!" } else { " " };
        println!("{marker} {:<28} {}", field.as_str(), config.parameter(*field));
    }
    print_errors(form);
}

fn print_errors(form: &ReactorForm) {
    for (field, message) in form.errors().iter() {
        println!("{field}: {message}");
    }
}

fn print_result(result: &SimulationResult) {
    if !result.message.is_empty() {
        println!("{}", result.message);
    }
    let summary = &result.additional_data;
    let rows = [
        ("final conversion", summary.final_conversion),
        ("final temperature", summary.final_temperature),
        ("reaction time", summary.reaction_time),
        ("reaction rate", summary.reaction_rate),
        ("volume", summary.volume),
        ("equilibrium conversion", summary.equilibrium_conversion),
    ];
    for (label, value) in rows {
        if let Some(value) = value {
            println!("{label:<24}{value:.4}");
        }
    }

    let cell = |value: Option<f64>| value.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"));
    println!(
        "{:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "time", "X", "[A]", "[B]", "[C]", "[D]", "T"
    );
    for point in significant_points(&result.data) {
        println!(
            "{:>10.3} {:>10.4} {:>10} {:>10} {:>10} {:>10} {:>10}",
            point.time,
            point.conversion,
            cell(point.concentration_a),
            cell(point.concentration_b),
            cell(point.concentration_c),
            cell(point.concentration_d),
            cell(point.temperature)
        );
    }
}
