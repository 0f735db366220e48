// --- QuickPlan: catálogo, horarios de oferta y asesor - Archivo principal ---

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use quickplan::algorithm::conflict::courses_with_coincident_sections;
use quickplan::algorithm::{save_schedule, ScheduleGenerator, DEFAULT_SECTIONS_PER_COURSE};
use quickplan::catalog::{builtin, plan_credits, PlanChoices};
use quickplan::cli::{run_session, CANCELLED_MESSAGE};
use quickplan::{load_catalog, run_server, save_catalog, AppConfig, AppState, BedrockOracle, CatalogStore, RecommendationClient};

#[derive(Parser)]
#[command(name = "quickplan", version)]
#[command(about = "QuickPlan - course catalog, section schedules and schedule recommendations", long_about = None)]
struct Cli {
    /// Logs de depuración (equivale a RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Subcomando (sin subcomando se inicia la sesión interactiva del asesor)
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Catálogo de requisitos
    Catalog {
        #[command(subcommand)]
        action: CatalogCommand,
    },
    /// Genera el horario de oferta con secciones para cada curso del catálogo
    Schedule {
        #[arg(long)]
        catalog: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_SECTIONS_PER_COURSE)]
        sections: u32,
        /// Semilla para una salida reproducible
        #[arg(long)]
        seed: Option<u64>,
        /// Sin franjas repetidas dentro de un mismo curso
        #[arg(long)]
        distinct_slots: bool,
    },
    /// Plan de un estudiante: un camino por requisito con alternativas
    Plan {
        /// "REQUISITO=CAMINO", una vez por requisito
        #[arg(long = "choose", value_name = "GROUP=PATH")]
        choose: Vec<String>,
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Sesión interactiva del asesor
    Advise {
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Formulario web del asesor
    Serve {
        #[arg(long)]
        bind: Option<String>,
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum CatalogCommand {
    /// Escribe el catálogo embebido (BS en Computer Science)
    Init {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Resumen del catálogo
    Show {
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    // stderr: stdout queda para la sesión interactiva
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = AppConfig::from_env().context("invalid configuration")?;

    match cli.command.unwrap_or(Command::Advise { catalog: None }) {
        Command::Catalog { action: CatalogCommand::Init { out } } => {
            catalog_init(out.as_deref().unwrap_or(config.catalog_path.as_path()))
        }
        Command::Catalog { action: CatalogCommand::Show { catalog } } => {
            catalog_show(catalog.as_deref().unwrap_or(config.catalog_path.as_path()))
        }
        Command::Schedule { catalog, out, sections, seed, distinct_slots } => {
            let catalog = open_catalog(catalog.as_deref().unwrap_or(config.catalog_path.as_path()))?;
            let out = out.unwrap_or_else(|| config.schedule_path.clone());
            schedule(&catalog, &out, sections, seed, distinct_slots)
        }
        Command::Plan { choose, catalog } => {
            let catalog = open_catalog(catalog.as_deref().unwrap_or(config.catalog_path.as_path()))?;
            plan(&catalog, &choose)
        }
        Command::Advise { catalog } => {
            let catalog = optional_catalog(catalog.as_deref().unwrap_or(config.catalog_path.as_path()));
            advise(&config, catalog)
        }
        Command::Serve { bind, catalog } => {
            let catalog = optional_catalog(catalog.as_deref().unwrap_or(config.catalog_path.as_path()));
            let bind = bind.unwrap_or_else(|| config.bind.clone());
            serve(&config, &bind, catalog)
        }
    }
}

/// Catálogo obligatorio; si falta, sugiere `catalog init`.
fn open_catalog(path: &Path) -> Result<CatalogStore> {
    match load_catalog(path) {
        Ok(c) => Ok(c),
        Err(e) if e.is_not_found() => bail!("{}\nhint: run `quickplan catalog init` to write the built-in catalog", e),
        Err(e) => Err(e).with_context(|| format!("cannot use catalog {}", path.display())),
    }
}

/// Para el asesor el catálogo sólo habilita la verificación local.
fn optional_catalog(path: &Path) -> Option<CatalogStore> {
    match load_catalog(path) {
        Ok(c) => Some(c),
        Err(e) => {
            warn!("recommendations will not be checked against the catalog: {}", e);
            None
        }
    }
}

fn catalog_init(out: &Path) -> Result<ExitCode> {
    let store = builtin::computer_science_bs()?;
    save_catalog(&store, out)?;
    println!("Catalog written to {} ({} leaf courses, {} credits)", out.display(), store.leaf_count(), store.credit_total());
    Ok(ExitCode::SUCCESS)
}

fn catalog_show(path: &Path) -> Result<ExitCode> {
    let store = open_catalog(path)?;
    println!("Catalog {}", path.display());
    for (name, category) in store.categories() {
        let credits = category.credit_target().map(|c| c.to_string()).unwrap_or_else(|| "-".into());
        println!("  {:<28} {:<18} {:>3} courses  {:>3} credits", name, category.kind(), category.leaves().len(), credits);
    }
    println!("Total: {} leaf courses, {} credits", store.leaf_count(), store.credit_total());
    for group in store.path_groups() {
        println!("  choose one for \"{}\": {}", group.course, group.path_names().join(" | "));
    }
    for (course, pre) in store.prereq_graph().unknown_prereqs() {
        println!("  warning: {} requires {}, which is not in the catalog", course, pre);
    }
    Ok(ExitCode::SUCCESS)
}

fn schedule(catalog: &CatalogStore, out: &Path, sections: u32, seed: Option<u64>, distinct: bool) -> Result<ExitCode> {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let generator = ScheduleGenerator::new().sections_per_course(sections).distinct_slots(distinct);
    let schedule = generator.generate(catalog, &mut rng)?;
    save_schedule(&schedule, out)?;

    let coincident = courses_with_coincident_sections(&schedule);
    info!("{} courses with at least two sections at the same time", coincident);
    println!(
        "Schedule written to {} ({} courses, {} sections)",
        out.display(),
        schedule.len(),
        schedule.iter().map(|c| c.sections.len()).sum::<usize>()
    );
    Ok(ExitCode::SUCCESS)
}

fn plan(catalog: &CatalogStore, choose: &[String]) -> Result<ExitCode> {
    let choices = PlanChoices::parse(choose).map_err(|e| anyhow!(e))?;
    let planned = match catalog.select_plan(&choices) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {}", e);
            for group in catalog.path_groups() {
                eprintln!("  --choose \"{}=<{}>\"", group.course, group.path_names().join("|"));
            }
            return Ok(ExitCode::FAILURE);
        }
    };
    for p in &planned {
        let origin = p.path.as_deref().or(p.bucket.as_deref()).unwrap_or("");
        println!("{:<60} {:>2}  {} / {}", p.course.course, p.course.credits, p.category, origin);
    }
    println!("{} courses, {} credits", planned.len(), plan_credits(&planned));
    Ok(ExitCode::SUCCESS)
}

fn recommendation_client(config: &AppConfig) -> Result<RecommendationClient> {
    let oracle = BedrockOracle::new(config)?;
    Ok(RecommendationClient::new(Arc::new(oracle)))
}

/// Sesión interactiva en un hilo bloqueante; Ctrl-C la cancela.
fn advise(config: &AppConfig, catalog: Option<CatalogStore>) -> Result<ExitCode> {
    let client = recommendation_client(config)?;
    let rt = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

    let code = rt.block_on(async move {
        let session = tokio::task::spawn_blocking(move || {
            let mut input = io::stdin().lock();
            let mut output = io::stdout().lock();
            run_session(&mut input, &mut output, &client, catalog.as_ref())
        });
        tokio::select! {
            res = session => res.unwrap_or_else(|e| {
                error!("advisor session aborted: {}", e);
                1
            }),
            _ = tokio::signal::ctrl_c() => {
                println!("\n\n{}", CANCELLED_MESSAGE);
                1
            }
        }
    });
    // el hilo puede seguir bloqueado leyendo stdin
    rt.shutdown_background();

    Ok(if code == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn serve(config: &AppConfig, bind: &str, catalog: Option<CatalogStore>) -> Result<ExitCode> {
    let state = AppState {
        client: recommendation_client(config)?,
        submissions_path: config.submissions_path.clone(),
        catalog,
    };
    println!("=== QuickPlan advisor ===");
    println!("Iniciando servidor en http://{}", bind);
    let rt = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    rt.block_on(run_server(bind, state)).with_context(|| format!("server on {} failed", bind))?;
    Ok(ExitCode::SUCCESS)
}
