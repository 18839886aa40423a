use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use hv_app::{
    EosConfig, EquationDispatchConfig, EquationKind, HyperbolicModuleConfig, IndicatorConfig,
    LimiterConfig, RiemannSolverConfig,
};
use hv_core::{HyperbolicSystemView, NodeIndex, StateVector};
use hv_ensemble::SingleRankReducer;
use hv_equations::{EulerAeos, PolytropicGasEos, ShallowWater};
use hv_offline::{InMemoryOfflineData, Line1DBuilder};
use hv_step::{IdViolationStrategy, StepOutcome};

#[derive(Parser)]
#[command(name = "hv-cli")]
#[command(about = "hyperviscid CLI -- invariant-domain-preserving hyperbolic solver demos", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sod shock tube on the polytropic Euler-AEOS instantiation.
    Sod {
        #[arg(long, default_value_t = 101)]
        nodes: usize,
        #[arg(long, default_value_t = 200)]
        steps: usize,
        #[arg(long, default_value_t = 0.5)]
        cfl: f64,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Dam-break on the shallow water instantiation.
    DamBreak {
        #[arg(long, default_value_t = 101)]
        nodes: usize,
        #[arg(long, default_value_t = 200)]
        steps: usize,
        #[arg(long, default_value_t = 0.5)]
        cfl: f64,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Load a YAML run config and build every configured equation instance
    /// without stepping it, reporting construction/config errors.
    Validate {
        config_path: PathBuf,
    },
}

fn main() -> anyhow_free::CliResult<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Sod {
            nodes,
            steps,
            cfl,
            output,
        } => run_sod(nodes, steps, cfl, output.as_deref()),
        Commands::DamBreak {
            nodes,
            steps,
            cfl,
            output,
        } => run_dam_break(nodes, steps, cfl, output.as_deref()),
        Commands::Validate { config_path } => run_validate(&config_path),
    }
}

/// Small local stand-in for a boxed-error CLI result, avoiding an extra
/// dependency for this crate.
mod anyhow_free {
    pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;
}

fn euler_module(cfl: f64) -> HyperbolicModuleConfig {
    HyperbolicModuleConfig {
        indicator: IndicatorConfig::Smoothness {
            field: hv_app::FieldSelectorConfig::Density,
        },
        riemann: RiemannSolverConfig::default(),
        limiter: LimiterConfig::default(),
        cfl_number: cfl,
        // `Warn` rather than `RaiseException`: a restart leaves `state`
        // untouched, and retrying at `tau = tau_max` again would recompute
        // the identical `tau_max` from the identical state and restart
        // forever. The CLI demo seeds tolerate the occasional tolerated
        // violation instead of looping.
        id_violation_strategy: IdViolationStrategy::Warn,
        limiter_iterations: 2,
    }
}

fn sod_initial_state(nodes: usize) -> StateVector {
    let system: EulerAeos<PolytropicGasEos, 1> = EulerAeos::new(PolytropicGasEos { gamma: 1.4 });
    let mut state = StateVector::zeros(EulerAeos::<PolytropicGasEos, 1>::NUM_COMPONENTS, nodes);
    let left = system.from_primitive(&[1.0, 0.0, 2.5, 0.0, 0.0]);
    let right = system.from_primitive(&[0.125, 0.0, 2.0, 0.0, 0.0]);
    for i in 0..nodes {
        state.set(NodeIndex::from_index(i), if i < nodes / 2 { &left } else { &right });
    }
    state
}

fn dam_break_initial_state(nodes: usize) -> StateVector {
    let mut state = StateVector::zeros(ShallowWater::<1>::NUM_COMPONENTS, nodes);
    for i in 0..nodes {
        let h = if i < nodes / 2 { 2.0 } else { 0.5 };
        state.set(NodeIndex::from_index(i), &[h, 0.0, 0.0, 0.0, 0.0]);
    }
    state
}

fn run_sod(nodes: usize, steps: usize, cfl: f64, output: Option<&Path>) -> anyhow_free::CliResult<()> {
    let dispatch = EquationDispatchConfig {
        dimension: 1,
        equation: EquationKind::EulerAeos {
            eos: EosConfig::Polytropic { gamma: 1.4 },
        },
    };
    let module = euler_module(cfl);
    let equation = hv_app::build_equation(&dispatch, &module)?;

    let mesh = Line1DBuilder::new(nodes, 1.0);
    let offline = mesh.build()?;
    let state = sod_initial_state(nodes);
    let final_state = run_steps(equation.as_ref(), &offline, state, steps)?;
    println!(
        "Sod shock tube: {steps} steps, n={nodes}, cfl={cfl}, restarts={}, warnings={}",
        equation.n_restarts(),
        equation.n_warnings(),
);
    write_csv(&final_state, &|i| mesh.position(i), output)
}

fn run_dam_break(nodes: usize, steps: usize, cfl: f64, output: Option<&Path>) -> anyhow_free::CliResult<()> {
    let dispatch = EquationDispatchConfig {
        dimension: 1,
        equation: EquationKind::ShallowWater { gravity: 9.81 },
    };
    let module = euler_module(cfl);
    let equation = hv_app::build_equation(&dispatch, &module)?;

    let mesh = Line1DBuilder::new(nodes, 1.0);
    let offline = mesh.build()?;
    let state = dam_break_initial_state(nodes);
    let final_state = run_steps(equation.as_ref(), &offline, state, steps)?;
    println!(
        "Dam break: {steps} steps, n={nodes}, cfl={cfl}, restarts={}, warnings={}",
        equation.n_restarts(),
        equation.n_warnings(),
);
    write_csv(&final_state, &|i| mesh.position(i), output)
}

/// Advances `state` by `steps` accepted calls to `equation.step`.
/// `StepOutcome::Restart` is a typed sentinel, not an error ;
/// this loop just logs and retries rather than treating it as failure.
fn run_steps(
    equation: &dyn hv_app::ErasedEquation,
    offline: &InMemoryOfflineData,
    mut state: StateVector,
    steps: usize,
) -> anyhow_free::CliResult<StateVector> {
    let reducer = SingleRankReducer;
    let mut taken = 0;
    while taken < steps {
        match equation.step(offline, &reducer, &state, None)? {
            StepOutcome::Accepted { state: next, .. } => {
                state = next;
                taken += 1;
            }
            StepOutcome::Restart(reason) => {
                tracing::warn!(?reason, "cli retrying after restart");
            }
        }
    }
    Ok(state)
}

fn write_csv(
    state: &StateVector,
    position_of: &dyn Fn(usize) -> f64,
    output: Option<&Path>,
) -> anyhow_free::CliResult<()> {
    let mut csv = String::from("node,x");
    for c in 0..state.num_components() {
        csv.push_str(&format!(",u{c}"));
    }
    csv.push('\n');
    for i in 0..state.len() {
        let mut u = [0.0; hv_core::MAX_COMPONENTS];
        state.get(NodeIndex::from_index(i), &mut u);
        csv.push_str(&format!("{i},{}", position_of(i)));
        for c in 0..state.num_components() {
            csv.push_str(&format!(",{}", u[c]));
        }
        csv.push('\n');
    }

    match output {
        Some(path) => {
            std::fs::write(path, csv)?;
            println!("wrote {}", path.display());
        }
        None => print!("{csv}"),
    }
    Ok(())
}

fn run_validate(config_path: &Path) -> anyhow_free::CliResult<()> {
    let config = hv_app::config::load_yaml(config_path)?;
    for instance in &config.equations {
        hv_app::build_equation(&instance.dispatch, &instance.module)?;
        println!("✓ {} builds", instance.name);
    }
    Ok(())
}
