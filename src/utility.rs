//! Utility scoring for behavior selection.
//!
//! Each candidate behavior is one row in [`BEHAVIORS`]: an input extracted
//! from the entity's drives, a response curve, and a weight. Arbitration folds
//! the table in order and keeps the first strictly-best row, so table order is
//! the tie-break policy. Adding a behavior means adding a row.

use crate::ecs::components::{Action, NeedLevels};

/// Survival bonus applied to fleeing.
pub const FLEE_PRIORITY: f32 = 1.5;
/// Attacking is a weaker route to food than eating.
pub const ATTACK_DAMPING: f32 = 0.8;

/// Monotonic shaping function over a normalized input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCurve {
    Linear,
    Quadratic,
    InverseLinear,
}

impl ResponseCurve {
    #[inline]
    pub fn apply(self, x: f32) -> f32 {
        match self {
            Self::Linear => x,
            Self::Quadratic => x * x,
            Self::InverseLinear => 1.0 - x,
        }
    }
}

/// What a scorer gets to look at.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext {
    pub needs: NeedLevels,
    /// Entities in the stimulus buffer this tick.
    pub visible: usize,
}

/// One row of the behavior table.
#[derive(Debug, Clone, Copy)]
pub struct Behavior {
    pub action: Action,
    /// Raw normalized urgency.
    pub input: fn(&ScoringContext) -> f32,
    pub curve: ResponseCurve,
    /// Multiply the curved value by the raw input again, so urgency grows
    /// superlinearly as the input approaches 1.
    pub self_weighted: bool,
    pub weight: f32,
}

impl Behavior {
    #[inline]
    pub fn score(&self, ctx: &ScoringContext) -> f32 {
        let x = (self.input)(ctx);
        let shaped = self.curve.apply(x);
        let shaped = if self.self_weighted { x * shaped } else { shaped };
        shaped * self.weight
    }
}

fn hunger(ctx: &ScoringContext) -> f32 {
    ctx.needs.hunger
}

fn fatigue(ctx: &ScoringContext) -> f32 {
    1.0 - ctx.needs.energy
}

fn danger(ctx: &ScoringContext) -> f32 {
    1.0 - ctx.needs.safety
}

fn wanderlust(ctx: &ScoringContext) -> f32 {
    ctx.needs.curiosity * ctx.needs.energy
}

fn predation(ctx: &ScoringContext) -> f32 {
    if ctx.visible == 0 {
        return 0.0;
    }
    ctx.needs.hunger * ctx.needs.energy
}

/// Candidate behaviors in priority order. Earlier rows win exact ties.
pub const BEHAVIORS: [Behavior; 5] = [
    Behavior {
        action: Action::Eat,
        input: hunger,
        curve: ResponseCurve::Quadratic,
        self_weighted: true,
        weight: 1.0,
    },
    Behavior {
        action: Action::Sleep,
        input: fatigue,
        curve: ResponseCurve::Quadratic,
        self_weighted: true,
        weight: 1.0,
    },
    Behavior {
        action: Action::Flee,
        input: danger,
        curve: ResponseCurve::Quadratic,
        self_weighted: true,
        weight: FLEE_PRIORITY,
    },
    Behavior {
        action: Action::Explore,
        input: wanderlust,
        curve: ResponseCurve::Linear,
        self_weighted: false,
        weight: 1.0,
    },
    Behavior {
        action: Action::Attack,
        input: predation,
        curve: ResponseCurve::Linear,
        self_weighted: false,
        weight: ATTACK_DAMPING,
    },
];

/// Winning action and the score that justified it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Choice {
    pub action: Action,
    pub utility: f32,
}

impl Choice {
    /// Floor every behavior must beat.
    pub const IDLE: Choice = Choice {
        action: Action::Idle,
        utility: 0.0,
    };
}

/// Fold `table` in order, replacing the best only on strict improvement.
/// Returns Idle with utility 0 when nothing scores above zero.
pub fn arbitrate(table: &[Behavior], ctx: &ScoringContext) -> Choice {
    table.iter().fold(Choice::IDLE, |best, behavior| {
        let utility = behavior.score(ctx);
        if utility > best.utility {
            Choice {
                action: behavior.action,
                utility,
            }
        } else {
            best
        }
    })
}
