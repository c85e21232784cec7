/*!
Command-line argument handling.

Flags follow the single-dash convention of the solver-tool tradition; anything unrecognised, malformed, or out of range terminates with a specific message and the usage exit code.
*/

use musket::config::{
    Config, ExtractionMode, GroupOrder, OutputFormat, PhasePolicy, ProgressionSearch,
    RedundancyMode, RotationMode, SubsetPick, TrimCriterion,
};

/// The usage text.
pub const HELP: &str = "\
musket: (V/G)MUS extractor

Usage: musket_cli [<option> ...] <input>
where <option> is one of the following:

 Execution control:
  -h        prints this help and exits
  -v NNN    verbosity level, -1 to 5 [default: 0]
  -T TTT    wall-clock deadline in seconds, 0 = none [default: 0]
  -comp     competition output format [default: off]
  -w        write the result instance to the default file [default: off]
  -wf FFF   write the result instance to FFF.[g]cnf [default: no writing]
  -test     re-run extraction on the result to verify minimality [default: off]

 Main functionality:
  -grp      input is group-CNF (gcnf); output preserves groups [default: off]
  -var      input carries a variable-group assignment (vgcnf) [default: off]
  -nomus    preprocess only, do not extract [default: off]
  -ins      insertion-based extraction [default: deletion]
  -dich     dichotomic extraction [default: deletion]
  -prog     progression-based extraction [default: deletion]
  -chunk C  chunked extraction with chunks of C groups, 0 = one chunk [default: off]
  -subset M S L  subset extraction: M=0 order, M=1 resolution-graph 1-hood;
            subsets of size S>0; L>=0 UNSAT outcomes before falling back, 0 = none
  -fbar     abstraction-refinement extraction [default: off]

 Optimizations and heuristics:
  -norf     do not refine working sets with assumption cores [default: refine]
  -norot    do not detect necessary groups by model rotation [default: rotate]
  -emr      extended model rotation over group sets [default: off]
  -smr D    visit-capped model rotation with depth D > 0 [default: off]
  -rdepth D rotation depth for -emr, 0 = unlimited [default: 1]
  -rwidth W rotation width for -emr, 0 = unlimited [default: 1]
  -reorder  fast-track rotation output in the schedule [default: off]
  -rr       redundancy removal [default: off]
  -rra      adaptive redundancy removal [default: off]
  -ig0      ignore background clauses during rotation (unsound in general) [default: off]
  -bglob    block rotation through globally necessary groups [default: off]
  -order N  scheduling order: 0 = default (group id, descending), 1 = longest
            first, 2 = shortest first, 3 = ascending, 4 = random [default: 0]

 Preprocessing:
  -trim N   iterate trimming N times [default: off]
  -tprct P  trim until the reduction of an iteration is below P percent [default: off]
  -tfp      trim until fixpoint [default: off]
  -ichk     initial UNSAT check [default: off]
  -bcp      simplify by top-level unit propagation [default: off]
  -bce      simplify by blocked-clause elimination [default: off]
  -bce:2g0  move blocked clauses into group 0 instead of removing them [default: off]
  -bce:ig0  leave group-0 clauses out of BCE (unsound in general) [default: off]

 SAT oracle control:
  -ph N     default polarity: 0 = false, 1 = true, 2 = random, 3 = oracle default [default: 3]

 Output control:
  -wfmt N   written format in plain-CNF mode: 0 = plain CNF, 1 = plain CNF with
            unknown clauses first, 2 = gcnf with necessary clauses in group 0 [default: 0]
";

/// The result of argument parsing: a configuration and the input path.
pub struct CliRequest {
    pub config: Config,
    pub input: String,
}

/// Parses the arguments, or returns the message to fail with.
pub fn parse_args(args: &[String]) -> Result<CliRequest, String> {
    let mut config = Config::default();
    let mut input: Option<String> = None;

    let mut at = 1;
    let next_value = |args: &[String], at: &mut usize, flag: &str| -> Result<String, String> {
        *at += 1;
        match args.get(*at) {
            Some(value) => Ok(value.clone()),
            None => Err(format!("{flag} requires a value")),
        }
    };

    while at < args.len() {
        let arg = args[at].as_str();
        match arg {
            "-h" => {
                println!("{HELP}");
                std::process::exit(0);
            }

            "-v" => {
                let value = next_value(args, &mut at, "-v")?;
                let parsed: i32 = value.parse().map_err(|_| "-v requires an integer")?;
                if !config.verbosity.try_set(parsed) {
                    let (min, max) = config.verbosity.min_max();
                    return Err(format!("-v requires a value between {min} and {max}"));
                }
            }

            "-T" => {
                let value = next_value(args, &mut at, "-T")?;
                let parsed: u64 = value.parse().map_err(|_| "-T requires a non-negative integer")?;
                config.timeout.value = parsed;
            }

            "-grp" => config.grp_mode = true,

            "-var" => config.var_mode = true,

            "-nomus" => config.mus_mode = false,

            "-ins" => config.extraction = ExtractionMode::Insertion,

            "-dich" => config.extraction = ExtractionMode::Dichotomic,

            "-prog" => config.extraction = ExtractionMode::Progression,

            "-chunk" => {
                config.extraction = ExtractionMode::Chunked;
                let value = next_value(args, &mut at, "-chunk")?;
                let parsed: usize =
                    value.parse().map_err(|_| "-chunk requires a non-negative integer")?;
                config.chunk_size.value = parsed;
            }

            "-subset" => {
                config.extraction = ExtractionMode::Subset;
                let mode = next_value(args, &mut at, "-subset")?;
                let size = next_value(args, &mut at, "-subset")?;
                let limit = next_value(args, &mut at, "-subset")?;
                config.subset_pick = match mode.as_str() {
                    "0" => SubsetPick::Order,
                    "1" => SubsetPick::RGraphHood,
                    _ => return Err("-subset mode must be 0 or 1".to_string()),
                };
                let size: usize = size.parse().map_err(|_| "-subset size must be a positive integer")?;
                if !config.subset_size.try_set(size) {
                    return Err("-subset size must be a positive integer".to_string());
                }
                let limit: usize =
                    limit.parse().map_err(|_| "-subset limit must be a non-negative integer")?;
                config.subset_unsat_limit.value = limit;
            }

            "-fbar" => config.extraction = ExtractionMode::Fbar,

            "-norf" => config.refine = false,

            "-norot" => config.rotation = RotationMode::Off,

            "-emr" => config.rotation = RotationMode::Extended,

            "-imr" => {
                return Err(
                    "-imr selects rotation for satisfiable-subformula extraction, which this build does not include"
                        .to_string(),
                );
            }

            "-smr" => {
                config.rotation = RotationMode::VisitCapped;
                let value = next_value(args, &mut at, "-smr")?;
                let parsed: u32 = value.parse().map_err(|_| "-smr requires a positive integer")?;
                if !config.smr_depth.try_set(parsed) {
                    return Err("-smr requires a positive integer".to_string());
                }
            }

            "-rdepth" => {
                let value = next_value(args, &mut at, "-rdepth")?;
                config.rot_depth.value =
                    value.parse().map_err(|_| "-rdepth requires a non-negative integer")?;
            }

            "-rwidth" => {
                let value = next_value(args, &mut at, "-rwidth")?;
                config.rot_width.value =
                    value.parse().map_err(|_| "-rwidth requires a non-negative integer")?;
            }

            "-reorder" => config.reorder = true,

            "-rr" => config.redundancy = RedundancyMode::Static,

            "-rra" => config.redundancy = RedundancyMode::Adaptive,

            "-ig0" => config.ignore_g0 = true,

            "-bglob" => config.ignore_global = false,

            "-order" => {
                let value = next_value(args, &mut at, "-order")?;
                let parsed: u32 = value.parse().map_err(|_| "-order requires an integer")?;
                config.order = GroupOrder::from_code(parsed)
                    .ok_or_else(|| "-order requires a value between 0 and 4".to_string())?;
            }

            "-trim" => {
                let value = next_value(args, &mut at, "-trim")?;
                let parsed: u32 = value.parse().map_err(|_| "-trim requires a positive integer")?;
                config.trim = match parsed {
                    0 => TrimCriterion::Off,
                    n => TrimCriterion::Iterations(n),
                };
            }

            "-tprct" => {
                let value = next_value(args, &mut at, "-tprct")?;
                let parsed: u32 = value.parse().map_err(|_| "-tprct requires a positive integer")?;
                config.trim = match parsed {
                    0 => TrimCriterion::Off,
                    p => TrimCriterion::Percent(p),
                };
            }

            "-tfp" => config.trim = TrimCriterion::Fixpoint,

            "-ichk" => config.init_unsat_check = true,

            "-ph" => {
                let value = next_value(args, &mut at, "-ph")?;
                let parsed: u32 = value.parse().map_err(|_| "-ph requires an integer")?;
                config.phase = PhasePolicy::from_code(parsed)
                    .ok_or_else(|| "-ph requires a value between 0 and 3".to_string())?;
            }

            "-comp" => config.comp_format = true,

            "-w" => config.write_output = true,

            "-wf" => {
                config.write_output = true;
                config.output_file = Some(next_value(args, &mut at, "-wf")?);
            }

            "-wfmt" => {
                let value = next_value(args, &mut at, "-wfmt")?;
                config.output_format = match value.as_str() {
                    "0" => OutputFormat::PlainCnf,
                    "1" => OutputFormat::UnknownFirst,
                    "2" => OutputFormat::NecessaryG0,
                    _ => return Err("-wfmt requires a value between 0 and 2".to_string()),
                };
            }

            "-test" => config.test_mode = true,

            "-bcp" => config.bcp = true,

            "-bce" => config.bce = true,

            "-bce:2g0" => config.bce_to_g0 = true,

            "-bce:ig0" => config.bce_ignore_g0 = true,

            "-param1" => {
                let value = next_value(args, &mut at, "-param1")?;
                config.progression_search = match value.as_str() {
                    "0" => ProgressionSearch::Binary,
                    "1" => ProgressionSearch::Linear,
                    "2" => ProgressionSearch::BinaryFalsified,
                    "3" => ProgressionSearch::LinearFalsified,
                    _ => return Err("-param1 requires a value between 0 and 3".to_string()),
                };
            }

            _ => {
                if arg.starts_with('-') {
                    return Err(format!("unable to parse argument: {arg}"));
                }
                if input.is_some() {
                    return Err(format!("unexpected extra argument: {arg}"));
                }
                input = Some(arg.to_string());
            }
        }
        at += 1;
    }

    match input {
        Some(input) => Ok(CliRequest { config, input }),
        None => Err("options but no file name provided".to_string()),
    }
}
