/*!
Model rotation: turning one witnessing assignment into many necessary groups.

When a group `g` is shown necessary, the oracle hands back an assignment α satisfying every remaining group except `g`.
Flipping a single variable of α can shift the falsified clauses from `g` into exactly one other group `g'` --- in which case the flipped assignment witnesses the necessity of `g'`, with no oracle call spent.
The rotators explore the space of such flips; assignments are carried as sparse *deltas* against the original model, applied and un-applied around each queue entry.

Three rotators are provided:
- the [recursive](RecursiveRotator) rotator walks single falsified groups, with a pluggable decision on when to rotate through a group again;
- the [extended](ExtendedRotator) rotator walks bounded *sets* of falsified groups, suppressing revisits through an incrementally-maintained assignment hash;
- the [variable-group](VmusRotator) rotator lifts the idea to variable groups.
*/

mod recursive;
pub use recursive::{PlainDecider, RecursiveRotator, RotationDecider, VisitCapDecider};

mod extended;
pub use extended::ExtendedRotator;

mod vmus;
pub use vmus::VmusRotator;

use crate::{
    config::{Config, RotationMode},
    db::state::MusState,
    work::RotateModel,
};

/// A worker that knows to process a [RotateModel] item.
pub trait ModelRotator {
    /// Handles the rotation item. Returns true when the item completed.
    fn process(&mut self, item: &mut RotateModel, state: &MusState) -> bool;

    /// The number of assignments visited by the rotator.
    fn num_points(&self) -> u64;
}

/// The rotator matching the configuration; `None` when rotation is off.
pub fn build_rotator(config: &Config) -> Option<Box<dyn ModelRotator>> {
    if config.var_mode {
        return match config.rotation {
            RotationMode::Off => None,
            _ => Some(Box::new(VmusRotator::default())),
        };
    }
    match config.rotation {
        RotationMode::Off => None,
        RotationMode::Recursive => {
            Some(Box::new(RecursiveRotator::new(PlainDecider::default())))
        }
        RotationMode::VisitCapped => Some(Box::new(RecursiveRotator::new(
            VisitCapDecider::new(config.smr_depth.value),
        ))),
        RotationMode::Extended => Some(Box::new(ExtendedRotator::default())),
    }
}

/// Seeds a rotation item from the configuration.
pub fn configure_item(item: &mut RotateModel, config: &Config) {
    item.rot_depth = config.rot_depth.value;
    item.rot_width = config.rot_width.value;
    item.collect_ft_gids = config.reorder;
    item.ignore_g0 = config.ignore_g0;
    item.ignore_global = config.ignore_global;
}
