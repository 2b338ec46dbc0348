//! Command line interface

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use kdam::{tqdm, BarExt};

use crate::equation::compile_equation;
use crate::error::Error;
use crate::io::{read_circuit_file, write_circuit_file, write_csv, write_csv_file};
use crate::limits::Limits;
use crate::network::stats::stats;
use crate::network::{Circuit, Value};
use crate::sim::{
    check_equivalence, enumerate_truth_table, enumerate_truth_table_with, evaluate, Step,
    StepSimulator,
};

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Command line arguments
#[derive(Subcommand)]
pub enum Commands {
    /// Show statistics about a circuit
    ///
    /// Will print statistics on the number of variables, outputs and gates, the list of
    /// gates, and the function of the first output as a hexadecimal lookup table.
    #[clap()]
    Show(ShowArgs),

    /// Evaluate a circuit for an assignment of the variables
    ///
    /// Variables are assigned with -s, for example `-s A=1 -s B=0`.
    /// Unassigned variables are unset, and so are the outputs that depend on them.
    #[clap(alias = "eval")]
    Evaluate(EvalArgs),

    /// Compute the truth table of a circuit
    ///
    /// The table is written in CSV format, one column per variable then the first output.
    #[clap(alias = "tt")]
    Table(TableArgs),

    /// Propagate the signals through a circuit, one level at a time
    #[clap(alias = "sim")]
    Step(StepArgs),

    /// Compile an equation and save the circuit
    ///
    /// Following extensions are supported: .json, .bench
    #[clap()]
    Compile(CompileArgs),

    /// Check equivalence between two circuits
    ///
    /// The command will fail if the first outputs of the circuits differ, and will output
    /// the failing assignment.
    #[clap(alias = "equiv")]
    CheckEquivalence(EquivArgs),
}

impl Commands {
    /// Run the command
    pub fn run(&self) -> Result<(), Error> {
        match self {
            Commands::Show(a) => a.run(),
            Commands::Evaluate(a) => a.run(),
            Commands::Table(a) => a.run(),
            Commands::Step(a) => a.run(),
            Commands::Compile(a) => a.run(),
            Commands::CheckEquivalence(a) => a.run(),
        }
    }
}

/// Command arguments for resource limits
#[derive(Args)]
pub struct LimitArgs {
    /// Maximum nesting depth of equations
    #[arg(long, default_value_t = Limits::default().max_depth)]
    max_depth: usize,

    /// Maximum number of variables in a truth table
    #[arg(long, default_value_t = Limits::default().max_table_vars)]
    max_vars: usize,
}

impl LimitArgs {
    fn limits(&self) -> Limits {
        Limits::new(self.max_depth, self.max_vars)
    }
}

/// Command arguments to obtain a circuit, from an equation or from a file
#[derive(Args)]
pub struct CircuitArgs {
    /// Equation to compile, such as "A + B . !C"
    #[arg(required_unless_present = "circuit", conflicts_with = "circuit")]
    equation: Option<String>,

    /// Circuit file in JSON format, instead of an equation
    #[arg(long)]
    circuit: Option<PathBuf>,

    #[command(flatten)]
    limits: LimitArgs,
}

impl CircuitArgs {
    fn load(&self) -> Result<Circuit, Error> {
        match (&self.equation, &self.circuit) {
            (_, Some(path)) => read_circuit_file(path),
            (Some(eq), None) => Ok(compile_equation(eq, &self.limits.limits())?),
            (None, None) => Ok(Circuit::new()),
        }
    }
}

/// Command arguments for circuit informations
#[derive(Args)]
pub struct ShowArgs {
    #[command(flatten)]
    source: CircuitArgs,
}

impl ShowArgs {
    /// Run the command
    pub fn run(&self) -> Result<(), Error> {
        let mut circuit = self.source.load()?;
        println!("{}", stats(&circuit));
        println!("{}", circuit);
        if circuit.check_acyclic().is_err() {
            return Ok(());
        }
        let table = enumerate_truth_table(&mut circuit, &self.source.limits.limits())?;
        if let Some(lut) = table.to_lut(0) {
            let letters: Vec<String> = table.letters().iter().map(|c| c.to_string()).collect();
            println!(
                "Function of {}({}): 0x{}",
                table.sinks()[0],
                letters.join(", "),
                lut.to_hex_string()
            );
        }
        Ok(())
    }
}

/// Parse an assignment of the form A=1
fn parse_assignment(s: &str) -> Result<(char, bool), String> {
    let (letter, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected an assignment such as A=1, got {s}"))?;
    let mut chars = letter.trim().chars();
    let letter = match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => c.to_ascii_uppercase(),
        _ => return Err(format!("Expected a single letter, got {letter}")),
    };
    match value.trim() {
        "0" => Ok((letter, false)),
        "1" => Ok((letter, true)),
        v => Err(format!("Expected 0 or 1, got {v}")),
    }
}

/// Command arguments for evaluation
#[derive(Args)]
pub struct EvalArgs {
    #[command(flatten)]
    source: CircuitArgs,

    /// Value of a variable, such as A=1
    #[arg(short = 's', long = "set", value_parser = parse_assignment)]
    assignments: Vec<(char, bool)>,
}

impl EvalArgs {
    /// Run the command
    pub fn run(&self) -> Result<(), Error> {
        let mut circuit = self.source.load()?;
        for (c, b) in &self.assignments {
            if circuit.set_input(*c, Value::from(*b)) == 0 {
                println!("Variable {c} does not appear in the circuit");
            }
        }
        let eval = evaluate(&circuit, &circuit.input_assignment())?;
        circuit.apply_values(&eval);
        for (i, s) in eval.sinks().iter().enumerate() {
            println!("o{} = {} = {}", i, s, eval.value(*s));
        }
        Ok(())
    }
}

/// Command arguments for truth tables
#[derive(Args)]
pub struct TableArgs {
    #[command(flatten)]
    source: CircuitArgs,

    /// Output file for the table; the table is printed if not given
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

impl TableArgs {
    /// Run the command
    pub fn run(&self) -> Result<(), Error> {
        let mut circuit = self.source.load()?;
        let limits = self.source.limits.limits();
        match &self.output {
            None => {
                let table = enumerate_truth_table(&mut circuit, &limits)?;
                write_csv(&mut std::io::stdout().lock(), &table)?;
            }
            Some(path) => {
                let mut progress = tqdm!();
                progress.set_description("Rows");
                let mut progress_error = None;
                let table = enumerate_truth_table_with(&mut circuit, &limits, |done, total| {
                    progress.total = total;
                    if let Err(e) = progress.update_to(done) {
                        progress_error.get_or_insert(e);
                    }
                })?;
                if let Some(e) = progress_error {
                    return Err(Error::Io(e));
                }
                progress
                    .write(format!(
                        "Truth table with {} variables and {} rows",
                        table.letters().len(),
                        table.nb_rows()
                    ))
                    .map_err(Error::Io)?;
                write_csv_file(path, &table)?;
            }
        }
        Ok(())
    }
}

/// Command arguments for step-by-step propagation
#[derive(Args)]
pub struct StepArgs {
    #[command(flatten)]
    source: CircuitArgs,

    /// Value of a variable, such as A=1
    #[arg(short = 's', long = "set", value_parser = parse_assignment)]
    assignments: Vec<(char, bool)>,
}

impl StepArgs {
    /// Run the command
    pub fn run(&self) -> Result<(), Error> {
        let mut circuit = self.source.load()?;
        for (c, b) in &self.assignments {
            circuit.set_input(*c, Value::from(*b));
        }
        let mut sim = StepSimulator::new();
        loop {
            match sim.advance(&mut circuit)? {
                Step::Sources(ids) => {
                    let names: Vec<String> = ids.iter().map(|i| i.to_string()).collect();
                    println!("Step 0: {}", names.join(", "));
                }
                Step::Propagated {
                    step,
                    frontier,
                    evaluation,
                } => {
                    let names: Vec<String> = frontier
                        .iter()
                        .map(|i| format!("{}={}", i, evaluation.value(*i)))
                        .collect();
                    println!("Step {}: {}", step, names.join(", "));
                }
                Step::Finished => break,
            }
        }
        let unreached = circuit.gates().iter().filter(|g| !g.is_active()).count();
        if unreached != 0 {
            println!("{unreached} gates were not reached");
        }
        Ok(())
    }
}

/// Command arguments for compilation
#[derive(Args)]
pub struct CompileArgs {
    #[command(flatten)]
    source: CircuitArgs,

    /// Output file for the circuit
    #[arg(short = 'o', long)]
    output: PathBuf,
}

impl CompileArgs {
    /// Run the command
    pub fn run(&self) -> Result<(), Error> {
        let circuit = self.source.load()?;
        write_circuit_file(&self.output, &circuit)
    }
}

/// Command arguments for equivalence checking
#[derive(Args)]
pub struct EquivArgs {
    /// Equations to compare
    equations: Vec<String>,

    /// Circuit files to compare, in JSON format; they come before the equations
    #[arg(long)]
    circuit: Vec<PathBuf>,

    #[command(flatten)]
    limits: LimitArgs,
}

impl EquivArgs {
    /// Run the command
    pub fn run(&self) -> Result<(), Error> {
        let limits = self.limits.limits();
        let mut circuits = Vec::new();
        for path in &self.circuit {
            circuits.push(read_circuit_file(path)?);
        }
        for eq in &self.equations {
            circuits.push(compile_equation(eq, &limits)?);
        }
        if circuits.len() != 2 {
            println!("Expected two circuits to compare, got {}", circuits.len());
            std::process::exit(2);
        }
        match check_equivalence(&circuits[0], &circuits[1], &limits)? {
            Some(assignment) => {
                println!("Circuits are not equivalent");
                println!("Failing assignment: {assignment}");
                std::process::exit(1);
            }
            None => {
                println!("Circuits are equivalent");
                Ok(())
            }
        }
    }
}
