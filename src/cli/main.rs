/*!
The command-line interface to the library.

# Use

```sh
musket_cli [-option ...] file.cnf
```

Plain CNF is assumed unless `-grp` (GCNF) or `-var` (VGCNF) says otherwise.
Progress lines are prefixed with `c `; `-comp` adds the competition-format
`s`/`v` summary.

Exit codes: 20 when the run completed (including a satisfiable verdict), 1 when
it was cut short or failed internally, 3 on input or usage errors.
*/

use std::fs::File;
use std::io::{BufReader, Write};

use musket::{
    builder,
    config::{Config, OutputFormat},
    db::state::MusState,
    extractor::{ExtractionOutcome, MusExtractor},
    reports::write as result_write,
    types::err::ErrorKind,
    verify::Tester,
};

mod args;
use args::parse_args;

const EXIT_DONE: i32 = 20;
const EXIT_INTERRUPTED: i32 = 1;
const EXIT_USAGE: i32 = 3;

/// Entrypoint to the CLI.
fn main() {
    env_logger::init();

    let argv: Vec<String> = std::env::args().collect();
    let request = match parse_args(&argv) {
        Ok(request) => request,
        Err(message) => {
            println!("c {message}");
            std::process::exit(EXIT_USAGE);
        }
    };
    let cfg = request.config;

    if cfg.verbosity.value >= 0 {
        println!("c musket {} on {}", env!("CARGO_PKG_VERSION"), request.input);
    }

    let gset = match load_input(&request.input, &cfg) {
        Ok(gset) => gset,
        Err(e) => {
            println!("c {e}");
            std::process::exit(EXIT_USAGE);
        }
    };
    if cfg.verbosity.value >= 0 {
        print!(
            "c Input size: {} groups, {} clauses, max.var={}",
            gset.init_gsize(),
            gset.init_size(),
            gset.max_var()
        );
        if gset.var_mode() {
            print!(", {} variable groups", gset.vgsize());
        }
        println!(".");
    }

    let mut state = MusState::new(gset);
    let mut extractor = MusExtractor::new(cfg.clone());

    let outcome = match extractor.process(&mut state) {
        Ok(outcome) => outcome,
        Err(ErrorKind::Config(e)) => {
            println!("c {e}");
            std::process::exit(EXIT_USAGE);
        }
        Err(e) => {
            println!("c {e}");
            std::process::exit(EXIT_INTERRUPTED);
        }
    };

    report_results(&cfg, &state, &outcome);

    if cfg.test_mode && outcome.is_unsat() {
        match Tester::new(&cfg).process(&state) {
            Ok(verdict) => println!("c Result check: {verdict}."),
            Err(e) => println!("c Result check failed: {e}"),
        }
    }

    if cfg.comp_format {
        println!("s {}", outcome.report);
        if outcome.is_unsat() {
            let mut stdout = std::io::stdout();
            let _ = result_write::write_comp(&mut stdout, &state);
            let _ = stdout.flush();
        }
    }

    if cfg.write_output {
        extractor.reconstruct(&mut state);
        if let Err(e) = write_result(&cfg, &request.input, &state) {
            println!("c {e}");
            std::process::exit(EXIT_INTERRUPTED);
        }
    }

    if cfg.verbosity.value >= 0 {
        println!("c Terminating musket.");
    }
    match outcome.interrupted {
        true => std::process::exit(EXIT_INTERRUPTED),
        false => std::process::exit(EXIT_DONE),
    }
}

/// Reads the input file in the format the flags announce.
fn load_input(path: &str, cfg: &Config) -> Result<musket::db::group_set::GroupSet, ErrorKind> {
    let file = File::open(path).map_err(|_| {
        ErrorKind::from(musket::types::err::ParseError::NoFile(path.to_string()))
    })?;
    let reader = BufReader::new(file);
    if cfg.var_mode {
        builder::vgcnf::read_vgcnf(reader)
    } else if cfg.grp_mode {
        builder::gcnf::read_gcnf(reader)
    } else {
        builder::dimacs::read_cnf(reader)
    }
}

/// Prints the human-readable summary.
fn report_results(cfg: &Config, state: &MusState, outcome: &ExtractionOutcome) {
    if cfg.verbosity.value < 0 {
        return;
    }
    if !outcome.is_unsat() {
        println!("c The instance is {}.", outcome.report);
        return;
    }

    if outcome.interrupted || outcome.approximate {
        println!("c WARNING: the computation was cut short; the result is an over-approximation.");
    } else {
        println!("c The result is exact.");
    }
    println!(
        "c Necessary groups: {} out of {} candidates; removed: {}.",
        state.num_necessary(),
        state.num_necessary() + state.num_removed() + state.num_untested(),
        state.num_removed()
    );
    if cfg.verbosity.value >= 1 {
        println!("c Calls to the oracle: {}.", outcome.sat_calls);
        println!(
            "c SAT outcomes: {}, UNSAT outcomes: {}.",
            outcome.stats.sat_outcomes, outcome.stats.unsat_outcomes
        );
        if cfg.rotating() {
            println!(
                "c Groups detected by model rotation: {} ({} rotation points).",
                outcome.stats.rot_groups, outcome.rotation_points
            );
        }
        if cfg.refine {
            println!(
                "c Groups removed with refinement: {}.",
                outcome.stats.ref_groups
            );
        }
        if cfg.redundancy_removal() {
            println!("c Tainted cores: {}.", outcome.stats.tainted_cores);
        }
        println!("c CPU time of extraction: {:.3} sec.", outcome.cpu_time);
    }
}

/// Writes the result instance to the requested or derived path.
fn write_result(cfg: &Config, input: &str, state: &MusState) -> Result<(), ErrorKind> {
    let grouped = cfg.grp_mode || cfg.output_format == OutputFormat::NecessaryG0;
    let extension = match grouped {
        true => "gcnf",
        false => "cnf",
    };
    let path = match &cfg.output_file {
        Some(name) => format!("{name}.{extension}"),
        None => format!("{input}.mus.{extension}"),
    };

    let mut file = File::create(&path)
        .map_err(|e| ErrorKind::from(musket::types::err::WriteError::Io(e.to_string())))?;
    if cfg.grp_mode {
        result_write::write_gcnf(&mut file, state)?;
    } else {
        match cfg.output_format {
            OutputFormat::PlainCnf => result_write::write_cnf(&mut file, state)?,
            OutputFormat::UnknownFirst => result_write::write_cnf_unknown_first(&mut file, state)?,
            OutputFormat::NecessaryG0 => result_write::write_gcnf_necessary_g0(&mut file, state)?,
        }
    }
    if cfg.verbosity.value >= 0 {
        println!("c Result written to {path}.");
    }
    Ok(())
}
