// ─────────────────────────────────────────────────────────────────────
// Condensate Field Kit — Command-Line Front End
// ─────────────────────────────────────────────────────────────────────
//! `condensate --N 400 400 --L 100 100 --pump 100 add 10 0 0 plus 1 none gauss ...`
//!
//! Resolves the run configuration, the domain decomposition and every
//! field envelope, prepares the output directory, loads the initial
//! field from `--loadFrom` (the output directory when absent), and
//! prints a JSON run summary. `--dumpInitial` writes the selected
//! matrices and scalar series of the prepared state, plus the first
//! time-resolved frame when `--historyMatrix` is set. `--config run.json` replaces the flag-derived
//! run configuration.

use std::fs;
use std::process::ExitCode;

use serde::Serialize;

use condensate_field::{DomainDecomposition, FieldRole, FieldRoles};
use condensate_io::{
    load_matrices, write_matrices, HistoryRecorder, HostState, MatrixLayout, OutputContext,
    RunControls, TimeOutput,
};
use condensate_types::{ArgList, CondensateError, CondensateResult, RunConfig};

#[derive(Serialize)]
struct RunSummary<'a> {
    config: &'a RunConfig,
    domain: &'a DomainDecomposition,
    controls: RunControls,
    roles: &'a FieldRoles,
    term_counts: Vec<(&'static str, usize)>,
    loaded_cells: usize,
}

fn load_config(args: &ArgList) -> CondensateResult<RunConfig> {
    match args.value_cursor("--config") {
        Some(mut i) => {
            let path = args.next_str("config", &mut i)?;
            let json = fs::read_to_string(path).map_err(|_| CondensateError::MissingFile {
                path: path.to_string(),
            })?;
            RunConfig::from_json(&json)
        }
        None => RunConfig::from_args(args),
    }
}

fn run(args: &ArgList) -> CondensateResult<()> {
    let config = load_config(args)?;
    config.validate()?;
    let domain = DomainDecomposition::resolve(&config.grid)?;
    let roles = FieldRoles::from_args(args)?;

    let ctx = OutputContext::create(&config);
    let mut state = HostState::zeros(&domain);
    let loaded_cells = load_matrices(&ctx, &mut state);
    state.capture_initial();

    let layout = MatrixLayout::from(&domain);
    if args.has("--dumpInitial") {
        let files = write_matrices(&ctx, &config, &state, &layout);
        log::info!("Wrote {files} matrix file(s)");

        let mut recorder =
            HistoryRecorder::new(&config.history, config.history_cut_row(), domain.use_twin_mode());
        recorder.record(&state.current, &layout, state.t);
        recorder.write_all(&ctx, config.does_output(&["max", "scalar"]), &config.history);

        if config.history.enabled {
            let mut frames = TimeOutput::new(&config.history, &layout);
            frames.on_output(&ctx, &state, &layout);
        }
    }

    let summary = RunSummary {
        config: &config,
        domain: &domain,
        controls: RunControls::from_config(&config),
        roles: &roles,
        term_counts: FieldRole::ALL
            .iter()
            .map(|r| (r.key(), roles.get(*r).size()))
            .collect(),
        loaded_cells,
    };
    let json = serde_json::to_string_pretty(&summary)
        .map_err(|e| CondensateError::Config(format!("summary serialization failed: {e}")))?;
    println!("{json}");
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = ArgList::from_env();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
