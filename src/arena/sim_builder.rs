use crate::core::{PerSide, PlayerProfile, Side};

use super::{
    errors::SimulationError, historian::Historian, match_context::MatchContext, player::Player,
    round_context::DEFAULT_BALLS_PER_SIDE, simulation::MatchSimulation, strategy::Strategy,
};

/// Rounds played before a match that can't produce a winner is abandoned.
pub const DEFAULT_MAX_ROUNDS: u32 = 100;

/// # MatchSimulationBuilder
///
/// `MatchSimulationBuilder` is a builder to allow for complex
/// configurations of a match between two players. A profile for each side
/// is required, other fields are optional.
///
/// ## Setters
///
/// Each setter will set the optional value to the passed in value. Then return
/// the mutated builder.
///
/// Unless told otherwise each player uses the strategy named in its profile,
/// and the first round's starter is picked at random.
///
/// ## Examples
///
/// ```
/// use petanque_sim::arena::MatchSimulationBuilder;
/// use petanque_sim::core::{PlayerProfile, StrategyKind};
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let shooter = PlayerProfile::builder()
///     .hit_rate(0.5)
///     .strategy(StrategyKind::conditional())
///     .build()
///     .unwrap();
/// let mut sim = MatchSimulationBuilder::default()
///     .profiles(PlayerProfile::default(), shooter)
///     .logging(true)
///     .build()
///     .unwrap();
///
/// let mut rng = StdRng::seed_from_u64(420);
/// let result = sim.run(&mut rng).unwrap();
/// assert!(result.log.is_some());
/// ```
pub struct MatchSimulationBuilder {
    players: PerSide<Option<Player>>,
    historians: Vec<Box<dyn Historian>>,
    balls_per_side: u8,
    max_rounds: u32,
    first_thrower: Option<Side>,
    logging: bool,
    panic_on_historian_error: bool,
}

impl MatchSimulationBuilder {
    /// Set the profiles for both sides.
    pub fn profiles(self, profile_a: PlayerProfile, profile_b: PlayerProfile) -> Self {
        self.profile(Side::A, profile_a).profile(Side::B, profile_b)
    }

    /// Set the profile for one side, playing the strategy the profile names.
    pub fn profile(mut self, side: Side, profile: PlayerProfile) -> Self {
        self.players[side] = Some(Player::new(profile));
        self
    }

    /// Set a side to play with a custom strategy.
    pub fn player(mut self, side: Side, profile: PlayerProfile, strategy: Box<dyn Strategy>) -> Self {
        self.players[side] = Some(Player::with_strategy(profile, strategy));
        self
    }

    /// Set the historians for the simulation created by this builder.
    pub fn historians(mut self, historians: Vec<Box<dyn Historian>>) -> Self {
        self.historians = historians;
        self
    }

    pub fn balls_per_side(mut self, balls_per_side: u8) -> Self {
        self.balls_per_side = balls_per_side;
        self
    }

    /// Give up on the match after this many rounds. Zero is treated as one.
    pub fn max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }

    /// Who throws first in the first round.
    pub fn first_thrower(mut self, side: Side) -> Self {
        self.first_thrower = Some(side);
        self
    }

    /// Keep a full log of every round in the result.
    pub fn logging(mut self, logging: bool) -> Self {
        self.logging = logging;
        self
    }

    /// Should the simulation panic if a historian errors.
    /// Default is false and the historian is removed instead.
    pub fn panic_on_historian_error(mut self, panic_on_historian_error: bool) -> Self {
        self.panic_on_historian_error = panic_on_historian_error;
        self
    }

    /// Given the fields already specified create a new MatchSimulation.
    ///
    /// @returns SimulationError if a side has no profile or there are no
    /// balls to throw.
    pub fn build(self) -> Result<MatchSimulation, SimulationError> {
        let PerSide {
            a: Some(player_a),
            b: Some(player_b),
        } = self.players
        else {
            return Err(SimulationError::NeedProfiles);
        };
        if self.balls_per_side == 0 {
            return Err(SimulationError::ZeroBalls);
        }

        Ok(MatchSimulation {
            players: PerSide::new(player_a, player_b),
            context: MatchContext::new(),
            balls_per_side: self.balls_per_side,
            max_rounds: self.max_rounds,
            first_thrower: self.first_thrower,
            logging: self.logging,
            historians: self.historians,
            panic_on_historian_error: self.panic_on_historian_error,
        })
    }
}

impl Default for MatchSimulationBuilder {
    fn default() -> Self {
        Self {
            players: PerSide::new(None, None),
            historians: vec![],
            balls_per_side: DEFAULT_BALLS_PER_SIDE,
            max_rounds: DEFAULT_MAX_ROUNDS,
            first_thrower: None,
            logging: false,
            panic_on_historian_error: false,
        }
    }
}
