/*!
The top-level extraction driver.

Ties the pipeline together: configuration validation → preprocessing → trimming or the initial UNSAT check → the strategy loop → the result summary.
The checker (and through it the oracle) is built once and reused across trimming and extraction, so learnt clauses carry over.
*/

use std::time::Instant;

use crate::{
    checker::SatChecker,
    config::{Config, ExtractionMode, PhasePolicy, TrimCriterion},
    db::state::MusState,
    misc::log::targets,
    oracle::{GroupOracle, VarisatOracle},
    preprocess::{BceSimplifier, BcpSimplifier},
    reports::Report,
    strategies::{Extraction, ExtractionStats},
    types::err::{ConfigError, ErrorKind, StateError},
    work::{CheckUnsat, SimplifyBce, SimplifyBcp, TrimGroupSet, WorkItem},
};

/// The summary of one extraction run.
#[derive(Clone, Copy, Debug)]
pub struct ExtractionOutcome {
    /// The verdict on the instance.
    pub report: Report,

    /// The run was cut short; the classification over-approximates the MUS.
    pub interrupted: bool,

    /// The classification relies on undetermined oracle outcomes.
    pub approximate: bool,

    /// Counters of the strategy run.
    pub stats: ExtractionStats,

    /// Oracle calls made, trimming included.
    pub sat_calls: u32,

    /// Assignments visited by model rotation.
    pub rotation_points: u64,

    /// Wall-clock seconds spent in the driver.
    pub cpu_time: f64,
}

impl ExtractionOutcome {
    pub fn is_unsat(&self) -> bool {
        self.report == Report::Unsatisfiable
    }

    /// True when the necessary set is exact: a completed, non-approximated run.
    pub fn exact(&self) -> bool {
        self.is_unsat() && !self.interrupted && !self.approximate
    }
}

/// A worker that knows to compute a MUS of a group set.
pub struct MusExtractor {
    config: Config,
    checker: Option<SatChecker>,

    /// The BCP record, kept for solution reconstruction before output.
    bcp_record: Option<SimplifyBcp>,
}

impl MusExtractor {
    pub fn new(config: Config) -> Self {
        MusExtractor {
            config,
            checker: None,
            bcp_record: None,
        }
    }

    /// Puts the instance back together after preprocessing, for writing out.
    pub fn reconstruct(&mut self, state: &mut MusState) {
        if let Some(record) = self.bcp_record.take() {
            BcpSimplifier::default().reconstruct(&record, state);
        }
    }

    /// Supplies a checker to use, e.g. to inject an oracle; otherwise the default back-end is built.
    pub fn set_checker(&mut self, checker: SatChecker) {
        self.checker = Some(checker);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Computes the MUS of `state`, classifying every candidate group.
    pub fn process(&mut self, state: &mut MusState) -> Result<ExtractionOutcome, ErrorKind> {
        self.validate(state)?;
        let started = Instant::now();

        let mut checker = match self.checker.take() {
            Some(checker) => checker,
            None => SatChecker::new(Box::new(VarisatOracle::new())),
        };
        if self.config.phase != PhasePolicy::SolverDefault
            && !checker.oracle().set_phase(self.config.phase)
        {
            log::info!(target: targets::ORACLE, "The back-end does not honour the polarity request");
        }

        let mut outcome = ExtractionOutcome {
            report: Report::Unknown,
            interrupted: false,
            approximate: false,
            stats: ExtractionStats::default(),
            sat_calls: 0,
            rotation_points: 0,
            cpu_time: 0.0,
        };

        // An empty instance is satisfiable, with nothing to classify.
        if state.gset().size() == 0 {
            outcome.report = Report::Satisfiable;
            outcome.cpu_time = started.elapsed().as_secs_f64();
            return Ok(outcome);
        }

        // Preprocessing.
        if self.config.bcp {
            let mut item = SimplifyBcp::new(self.config.grp_mode);
            let mut simplifier = BcpSimplifier::default();
            simplifier.process(&mut item, state);
            if item.conflict() {
                // The top level alone is contradictory: the background is the result.
                log::info!(target: targets::PREPROCESSING, "Top-level conflict during BCP");
                state.make_empty_mus();
                self.bcp_record = Some(item);
                outcome.report = Report::Unsatisfiable;
                outcome.sat_calls = checker.sat_calls();
                outcome.cpu_time = started.elapsed().as_secs_f64();
                self.checker = Some(checker);
                return Ok(outcome);
            }
            log::info!(target: targets::PREPROCESSING, "BCP removed {} clauses, {} groups", item.rcl_count, item.rg_count);
            self.bcp_record = Some(item);
        }
        if self.config.bce {
            let mut item = SimplifyBce {
                blocked_to_g0: self.config.bce_to_g0,
                ignore_g0: self.config.bce_ignore_g0,
                ..SimplifyBce::default()
            };
            let mut simplifier = BceSimplifier::default();
            simplifier.process(&mut item, state);
            log::info!(target: targets::PREPROCESSING, "BCE removed {} clauses, {} groups", item.rcl_count, item.rg_count);
        }

        // Trimming, or the initial UNSAT check.
        if self.config.trimming() {
            let mut item = TrimGroupSet::default();
            match self.config.trim {
                TrimCriterion::Fixpoint => item.fixpoint = true,
                TrimCriterion::Iterations(n) => item.iter_limit = n,
                TrimCriterion::Percent(p) => item.pct_limit = p,
                TrimCriterion::Off => {}
            }
            checker.process_trim(&mut item, state)?;
            if !item.is_unsat() {
                outcome.report = Report::Satisfiable;
                outcome.sat_calls = checker.sat_calls();
                outcome.cpu_time = started.elapsed().as_secs_f64();
                self.checker = Some(checker);
                return Ok(outcome);
            }
            log::info!(target: targets::TRIM, "Group set size after trimming: {} groups", state.real_gsize());
        } else if self.config.init_unsat_check {
            let mut item = CheckUnsat::new();
            checker.process_unsat(&mut item, state)?;
            if !(item.completed() && item.is_unsat()) {
                outcome.report = Report::Satisfiable;
                outcome.sat_calls = checker.sat_calls();
                outcome.cpu_time = started.elapsed().as_secs_f64();
                self.checker = Some(checker);
                return Ok(outcome);
            }
        }

        // The strategy loop.
        if self.config.mus_mode {
            let mut run = Extraction::new(&self.config, &mut checker, state);
            match run.run(state) {
                Ok(()) => {
                    outcome.report = Report::Unsatisfiable;
                }
                Err(ErrorKind::State(StateError::Satisfiable)) => {
                    outcome.report = Report::Satisfiable;
                }
                Err(e) => return Err(e),
            }
            outcome.interrupted = run.interrupted();
            outcome.stats = run.stats;
            outcome.rotation_points = run.rotation_points();
            outcome.approximate = state.num_fake() > 0;
        } else {
            // Preprocessing only; the classification stands as loaded.
            outcome.report = Report::Unknown;
        }

        outcome.sat_calls = checker.sat_calls();
        outcome.cpu_time = started.elapsed().as_secs_f64();
        self.checker = Some(checker);
        Ok(outcome)
    }

    /// Rejects configurations the selected strategy cannot honour.
    fn validate(&self, state: &MusState) -> Result<(), ErrorKind> {
        let grouped = self.config.grp_mode;
        let var_grouped = self.config.var_mode || state.var_mode();
        match self.config.extraction {
            ExtractionMode::Deletion => Ok(()),
            ExtractionMode::Fbar => match var_grouped {
                true => Err(ConfigError::VarGroupsUnsupported("the fbar strategy").into()),
                false => Ok(()),
            },
            mode => {
                let name: &'static str = match mode {
                    ExtractionMode::Insertion => "the insertion strategy",
                    ExtractionMode::Dichotomic => "the dichotomic strategy",
                    ExtractionMode::Progression => "the progression strategy",
                    ExtractionMode::Chunked => "the chunked strategy",
                    ExtractionMode::Subset => "the subset strategy",
                    _ => unreachable!(),
                };
                if grouped {
                    Err(ConfigError::GroupsUnsupported(name).into())
                } else if var_grouped {
                    Err(ConfigError::VarGroupsUnsupported(name).into())
                } else {
                    Ok(())
                }
            }
        }
    }
}
