/*!
Configuration of an extraction.

All knobs live in a single [Config] structure.
Bounded numeric knobs use [ConfigOption] so callers can validate against and report the permitted range; mode selection is by enums with integer codes matching the CLI surface.
*/

mod config_option;
pub use config_option::ConfigOption;

/// The extraction strategy driving the main loop.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExtractionMode {
    /// Deletion-based extraction; the baseline.
    Deletion,

    /// Insertion-based extraction over an ordered working vector.
    Insertion,

    /// Dichotomic search for each transition group.
    Dichotomic,

    /// Progression: geometric probing from the tail of the working vector.
    Progression,

    /// Chunked deletion with amortised negation encodings.
    Chunked,

    /// Subset-based deletion.
    Subset,

    /// Abstraction-refinement extraction for mostly-satisfiable instances.
    Fbar,
}

impl std::fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deletion => write!(f, "deletion"),
            Self::Insertion => write!(f, "insertion"),
            Self::Dichotomic => write!(f, "dichotomic"),
            Self::Progression => write!(f, "progression"),
            Self::Chunked => write!(f, "chunked"),
            Self::Subset => write!(f, "subset"),
            Self::Fbar => write!(f, "fbar"),
        }
    }
}

/// The model-rotation variant to run on SAT outcomes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RotationMode {
    /// No rotation.
    Off,

    /// Recursive rotation through single falsified groups.
    Recursive,

    /// Recursive rotation with a per-(group, literal) visit cap.
    VisitCapped,

    /// Extended rotation over bounded sets of falsified groups.
    Extended,
}

/// The scheduling order over candidate groups.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GroupOrder {
    /// Largest group id first.
    Default,

    /// Largest summed clause length first.
    LongestFirst,

    /// Smallest summed clause length first.
    ShortestFirst,

    /// Smallest group id first.
    Reverse,

    /// A seeded random shuffle.
    Random,
}

impl GroupOrder {
    /// The order for a CLI code; `None` for an unknown code.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Default),
            1 => Some(Self::LongestFirst),
            2 => Some(Self::ShortestFirst),
            3 => Some(Self::Reverse),
            4 => Some(Self::Random),
            _ => None,
        }
    }
}

/// Redundancy removal: asserting the negation of the tested group.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RedundancyMode {
    Off,

    /// Always encode the negation.
    Static,

    /// Encode the negation, but back off after a tainted core until the next SAT outcome.
    Adaptive,
}

/// Policy for undetermined oracle outcomes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ApproxPolicy {
    /// Undetermined outcomes abort the strategy.
    Off,

    /// Treat the group as necessary; the result over-approximates the MUS.
    Over,

    /// Treat the group as unnecessary; the result under-approximates the MUS.
    Under,

    /// Put the group back on the schedule.
    Reschedule,
}

/// Default variable polarity requested from the oracle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PhasePolicy {
    False,
    True,
    Random,
    SolverDefault,
}

impl PhasePolicy {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::False),
            1 => Some(Self::True),
            2 => Some(Self::Random),
            3 => Some(Self::SolverDefault),
            _ => None,
        }
    }
}

/// Termination criterion for the trimming loop.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TrimCriterion {
    /// No trimming.
    Off,

    /// A fixed number of iterations.
    Iterations(u32),

    /// Stop once the relative reduction of an iteration falls under a percentage.
    Percent(u32),

    /// Iterate until a fixpoint.
    Fixpoint,
}

/// Subset selection heuristic for the subset strategy.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubsetPick {
    /// Take the next `s` groups in scheduling order.
    Order,

    /// A group plus its 1-neighbourhood in the resolution graph.
    RGraphHood,
}

/// Target-set analysis used by the progression strategy on SAT outcomes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProgressionSearch {
    /// Binary search over the target set.
    Binary,

    /// Linear scan over the target set.
    Linear,

    /// Binary search restricted to groups falsified by the witness.
    BinaryFalsified,

    /// Linear scan restricted to groups falsified by the witness.
    LinearFalsified,
}

/// How the result instance is written in plain-CNF mode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OutputFormat {
    /// Plain CNF of the surviving clauses.
    PlainCnf,

    /// Plain CNF with the unclassified clauses first.
    UnknownFirst,

    /// GCNF with the necessary clauses in group 0 and one group per unclassified clause.
    NecessaryG0,
}

/// The primary configuration structure.
#[derive(Clone)]
pub struct Config {
    /// Verbosity of progress reporting on stdout.
    pub verbosity: ConfigOption<i32>,

    /// Wall-clock deadline in seconds; 0 means none.
    pub timeout: ConfigOption<u64>,

    /// Input carries group labels (GCNF).
    pub grp_mode: bool,

    /// Input carries a variable-group assignment (VGCNF).
    pub var_mode: bool,

    /// Extract a MUS; when false only preprocessing runs.
    pub mus_mode: bool,

    /// The strategy driving the main loop.
    pub extraction: ExtractionMode,

    /// Chunk size for the chunked strategy; 0 means a single chunk.
    pub chunk_size: ConfigOption<usize>,

    /// Subset selection heuristic.
    pub subset_pick: SubsetPick,

    /// Subset size for the subset strategy.
    pub subset_size: ConfigOption<usize>,

    /// UNSAT-outcome limit before the subset strategy falls back to deletion; 0 means none.
    pub subset_unsat_limit: ConfigOption<usize>,

    /// Target-set analysis for the progression strategy.
    pub progression_search: ProgressionSearch,

    /// Refine working sets from assumption cores on UNSAT outcomes.
    pub refine: bool,

    /// Model rotation variant.
    pub rotation: RotationMode,

    /// Visit cap per (group, literal) for the visit-capped rotator.
    pub smr_depth: ConfigOption<u32>,

    /// Rotation depth for the extended rotator; 0 means unlimited.
    pub rot_depth: ConfigOption<u32>,

    /// Rotation width for the extended rotator; 0 means unlimited.
    pub rot_width: ConfigOption<u32>,

    /// Collect fast-track groups during rotation and elevate them in the schedule.
    pub reorder: bool,

    /// Ignore background clauses falsified during rotation (unsound in general).
    pub ignore_g0: bool,

    /// Rotate through globally necessary groups; rotation state is call-local.
    pub ignore_global: bool,

    /// Redundancy removal mode.
    pub redundancy: RedundancyMode,

    /// Trimming policy.
    pub trim: TrimCriterion,

    /// Run an initial UNSAT check before extraction.
    pub init_unsat_check: bool,

    /// Scheduling order over candidate groups.
    pub order: GroupOrder,

    /// Seed for the random scheduling order.
    pub seed: u64,

    /// Default variable polarity requested from the oracle.
    pub phase: PhasePolicy,

    /// Policy for undetermined oracle outcomes.
    pub approx: ApproxPolicy,

    /// Conflict budget per oracle call when approximating; 0 means none.
    pub conflict_budget: ConfigOption<u64>,

    /// Competition output format.
    pub comp_format: bool,

    /// Write the result instance out.
    pub write_output: bool,

    /// Path for the written result; derived from the input when absent.
    pub output_file: Option<String>,

    /// Output format variant in plain-CNF mode.
    pub output_format: OutputFormat,

    /// Re-run extraction on the result to verify minimality.
    pub test_mode: bool,

    /// Simplify by top-level unit propagation before extraction.
    pub bcp: bool,

    /// Simplify by blocked-clause elimination before extraction.
    pub bce: bool,

    /// During BCE, move blocked clauses into group 0 instead of removing them.
    pub bce_to_g0: bool,

    /// During BCE, leave group-0 clauses untouched (unsound in general).
    pub bce_ignore_g0: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            verbosity: ConfigOption { name: "verbosity", min: -1, max: 5, value: 0 },

            timeout: ConfigOption { name: "timeout", min: 0, max: u64::MAX, value: 0 },

            grp_mode: false,
            var_mode: false,
            mus_mode: true,

            extraction: ExtractionMode::Deletion,

            chunk_size: ConfigOption { name: "chunk", min: 0, max: usize::MAX, value: 0 },

            subset_pick: SubsetPick::Order,

            subset_size: ConfigOption { name: "subset size", min: 1, max: usize::MAX, value: 1 },

            subset_unsat_limit: ConfigOption {
                name: "subset unsat limit",
                min: 0,
                max: usize::MAX,
                value: 0,
            },

            progression_search: ProgressionSearch::Binary,

            refine: true,

            rotation: RotationMode::Recursive,

            smr_depth: ConfigOption { name: "smr depth", min: 1, max: u32::MAX, value: 1 },

            rot_depth: ConfigOption { name: "rotation depth", min: 0, max: u32::MAX, value: 1 },

            rot_width: ConfigOption { name: "rotation width", min: 0, max: u32::MAX, value: 1 },

            reorder: false,
            ignore_g0: false,
            ignore_global: true,

            redundancy: RedundancyMode::Off,

            trim: TrimCriterion::Off,

            init_unsat_check: false,

            order: GroupOrder::Default,

            seed: 0,

            phase: PhasePolicy::SolverDefault,

            approx: ApproxPolicy::Off,

            conflict_budget: ConfigOption {
                name: "conflict budget",
                min: 0,
                max: u64::MAX,
                value: 0,
            },

            comp_format: false,

            write_output: false,
            output_file: None,
            output_format: OutputFormat::PlainCnf,

            test_mode: false,

            bcp: false,
            bce: false,
            bce_to_g0: false,
            bce_ignore_g0: false,
        }
    }
}

impl Config {
    /// True when rotation is enabled in any variant.
    pub fn rotating(&self) -> bool {
        self.rotation != RotationMode::Off
    }

    /// True when redundancy removal is enabled in any variant.
    pub fn redundancy_removal(&self) -> bool {
        self.redundancy != RedundancyMode::Off
    }

    /// True when trimming is enabled.
    pub fn trimming(&self) -> bool {
        self.trim != TrimCriterion::Off
    }

    /// The output prefix for progress lines.
    pub fn prefix(&self) -> &'static str {
        "c "
    }
}
